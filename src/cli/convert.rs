use super::ui;
use crate::core::{Amount, ConversionRequest, ConversionResult, LoadState, RateTableProvider};
use anyhow::{Result, bail};
use std::io::Write;
use tracing::debug;

/// Overrides applied on top of the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub amount: Option<Amount>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub swap: bool,
}

impl ConvertOptions {
    pub fn apply(&self, mut request: ConversionRequest) -> ConversionRequest {
        if let Some(amount) = self.amount {
            request.amount = amount;
        }
        if let Some(from) = &self.from {
            request.from = from.trim().to_uppercase();
        }
        if let Some(to) = &self.to {
            request.to = to.trim().to_uppercase();
        }
        request
    }
}

pub fn display_conversion(request: &ConversionRequest, result: &ConversionResult) -> String {
    format!(
        "{} {} = {} {}",
        request.amount,
        request.from,
        ui::style_text(&result.to_string(), ui::StyleType::Result),
        request.to
    )
}

pub async fn run<W: Write>(
    provider: &(dyn RateTableProvider + Send + Sync),
    base_currency: &str,
    defaults: ConversionRequest,
    options: &ConvertOptions,
    output: &mut W,
) -> Result<()> {
    let request = options.apply(defaults);
    debug!(?request, "Converting");

    let mut converter = super::load_session(provider, base_currency, request).await?;
    if let LoadState::Failed(message) = converter.state() {
        bail!("{message}");
    }

    if options.swap {
        converter.swap()?;
    }
    let result = converter.convert()?;

    writeln!(output, "{}", display_conversion(converter.request(), &result))?;
    Ok(())
}
