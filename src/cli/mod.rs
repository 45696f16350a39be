pub mod convert;
pub mod interactive;
pub mod rates;
pub mod setup;
pub mod ui;

use crate::core::{ConversionRequest, Converter, RateTableProvider};
use anyhow::Result;

/// Creates a session and runs its one rate fetch behind a spinner.
pub async fn load_session(
    provider: &(dyn RateTableProvider + Send + Sync),
    base_currency: &str,
    request: ConversionRequest,
) -> Result<Converter> {
    let mut converter = Converter::new(request);

    let pb = ui::new_spinner("Loading exchange rates...");
    let loaded = converter.load(provider, base_currency).await;
    pb.finish_and_clear();

    loaded?;
    Ok(converter)
}
