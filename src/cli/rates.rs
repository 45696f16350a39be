use super::ui;
use crate::core::{ConversionRequest, LoadState, RateTable, RateTableProvider};
use anyhow::{Result, bail};
use comfy_table::Cell;
use std::io::Write;

impl RateTable {
    pub fn display_as_table(&self) -> String {
        let base = self.base();

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate (per 1 {base})")),
        ]);

        for (code, rate) in self.iter() {
            table.add_row(vec![Cell::new(code), ui::rate_cell(rate)]);
        }

        let as_of = self
            .date()
            .map_or("N/A".to_string(), |d| d.format("%Y-%m-%d").to_string());

        let mut output = format!(
            "Exchange rates: {}\n\n",
            ui::style_text(base, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{} {}",
            ui::style_text("As of:", ui::StyleType::Label),
            ui::style_text(&as_of, ui::StyleType::Subtle)
        ));
        output
    }
}

pub async fn run<W: Write>(
    provider: &(dyn RateTableProvider + Send + Sync),
    base_currency: &str,
    output: &mut W,
) -> Result<()> {
    let converter =
        super::load_session(provider, base_currency, ConversionRequest::default()).await?;

    match converter.state() {
        LoadState::Ready(table) => {
            writeln!(output, "{}", table.display_as_table())?;
            Ok(())
        }
        LoadState::Failed(message) => bail!("{message}"),
        state => bail!("Exchange rates did not load: {state:?}"),
    }
}
