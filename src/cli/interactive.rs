//! Line-based session standing in for the converter form: each edit is
//! applied to the controller and the form is drawn again.

use super::ui;
use crate::core::view::{View, render};
use crate::core::{Amount, ConversionRequest, Converter, LoadState, RateTableProvider};
use anyhow::{Result, anyhow, bail};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

const HELP: &str = "Commands:
  amount <n>     set the amount to convert
  from <CODE>    set the source currency
  to <CODE>      set the target currency
  swap           exchange source and target currencies
  list           show all exchange rates
  help           show this message
  quit           leave the session";

#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    Amount(String),
    From(String),
    To(String),
    Swap,
    List,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(2, char::is_whitespace);
        let keyword = parts.next().unwrap_or_default().to_lowercase();
        let argument = parts.next().unwrap_or_default().trim().to_string();

        match keyword.as_str() {
            "amount" | "a" => Ok(SessionCommand::Amount(argument)),
            "from" | "f" if !argument.is_empty() => Ok(SessionCommand::From(argument)),
            "to" | "t" if !argument.is_empty() => Ok(SessionCommand::To(argument)),
            "from" | "f" | "to" | "t" => Err(anyhow!("Missing currency code for '{keyword}'")),
            "swap" | "s" => Ok(SessionCommand::Swap),
            "list" | "l" => Ok(SessionCommand::List),
            "help" | "h" | "?" => Ok(SessionCommand::Help),
            "quit" | "q" | "exit" => Ok(SessionCommand::Quit),
            _ => Err(anyhow!("Unknown command: {keyword} (type 'help')")),
        }
    }
}

fn apply(converter: &mut Converter, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Amount(text) => converter.set_amount(text.parse::<Amount>()?)?,
        SessionCommand::From(code) => converter.set_from(&code)?,
        SessionCommand::To(code) => converter.set_to(&code)?,
        SessionCommand::Swap => converter.swap()?,
        SessionCommand::List | SessionCommand::Help | SessionCommand::Quit => {}
    }
    Ok(())
}

/// Drives a loaded converter from `input` until EOF or `quit`.
pub fn run_session<R: BufRead, W: Write>(
    converter: &mut Converter,
    input: R,
    mut output: W,
) -> Result<()> {
    writeln!(output, "{}", ui::render_view(&render(converter)))?;
    if !matches!(render(converter), View::Form(_)) {
        return Ok(());
    }
    writeln!(
        output,
        "{}",
        ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle)
    )?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                continue;
            }
        };
        debug!(?command, "Session command");

        match &command {
            SessionCommand::Quit => break,
            SessionCommand::Help => {
                writeln!(output, "{HELP}")?;
                continue;
            }
            SessionCommand::List => {
                if let Some(table) = converter.state().table() {
                    writeln!(output, "{}", table.display_as_table())?;
                }
                continue;
            }
            _ => {}
        }

        match apply(converter, command) {
            Ok(()) => writeln!(output, "\n{}", ui::render_view(&render(converter)))?,
            Err(e) => writeln!(output, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?,
        }
    }

    Ok(())
}

pub async fn run<W: Write>(
    provider: &(dyn RateTableProvider + Send + Sync),
    base_currency: &str,
    defaults: ConversionRequest,
    output: &mut W,
) -> Result<()> {
    let mut converter = super::load_session(provider, base_currency, defaults).await?;
    if let LoadState::Failed(message) = converter.state() {
        bail!("{message}");
    }

    let stdin = std::io::stdin();
    run_session(&mut converter, stdin.lock(), output)
}
