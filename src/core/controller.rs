//! Session state for a single converter: load lifecycle, user selection and
//! the derived result.
//!
//! `LoadState` moves strictly `Idle -> Loading -> Ready | Failed` and stays
//! put once resolved. An edit to the request is applied only if the edited
//! request converts against the loaded table.

use crate::core::convert::{
    Amount, ConversionRequest, ConversionResult, ConvertError, compute_result, swap,
};
use crate::core::rates::{RateTable, RateTableProvider};
use anyhow::Result;
use thiserror::Error;
use tracing::{debug, error, instrument};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch exchange rates";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(RateTable),
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn table(&self) -> Option<&RateTable> {
        match self {
            LoadState::Ready(table) => Some(table),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("Rates can only be loaded once per session")]
    AlreadyStarted,
    #[error("No rate request is outstanding")]
    NotLoading,
}

pub struct Converter {
    state: LoadState,
    request: ConversionRequest,
    result: Option<ConversionResult>,
}

impl Converter {
    pub fn new(request: ConversionRequest) -> Self {
        Converter {
            state: LoadState::Idle,
            request,
            result: None,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    /// The converted value, only while rates are loaded.
    pub fn result(&self) -> Option<&ConversionResult> {
        self.state.table().and(self.result.as_ref())
    }

    /// Converts the current request, failing loudly on unknown codes.
    pub fn convert(&self) -> Result<ConversionResult, ConvertError> {
        let table = self.state.table().ok_or(ConvertError::NotReady)?;
        compute_result(table, &self.request)
    }

    pub fn begin_loading(&mut self) -> Result<(), TransitionError> {
        if self.state != LoadState::Idle {
            return Err(TransitionError::AlreadyStarted);
        }
        self.state = LoadState::Loading;
        Ok(())
    }

    /// Resolves the outstanding fetch. Failures are logged and replaced with
    /// a generic message.
    pub fn finish_loading(&mut self, fetched: Result<RateTable>) -> Result<(), TransitionError> {
        if !self.state.is_loading() {
            return Err(TransitionError::NotLoading);
        }
        match fetched {
            Ok(table) => {
                debug!(currencies = table.len(), "Exchange rates loaded");
                self.state = LoadState::Ready(table);
                if let Err(e) = self.commit(self.request.clone()) {
                    debug!(error = %e, "Initial selection is not convertible");
                }
            }
            Err(e) => {
                error!(error = ?e, "{FETCH_FAILED_MESSAGE}");
                self.state = LoadState::Failed(FETCH_FAILED_MESSAGE.to_string());
            }
        }
        Ok(())
    }

    /// Runs the single fetch of this session against `provider`.
    #[instrument(name = "LoadRates", skip(self, provider), fields(base = %base))]
    pub async fn load(
        &mut self,
        provider: &(dyn RateTableProvider + Send + Sync),
        base: &str,
    ) -> Result<(), TransitionError> {
        self.begin_loading()?;
        let fetched = provider.fetch_rates(base).await;
        self.finish_loading(fetched)
    }

    pub fn set_amount(&mut self, amount: Amount) -> Result<(), ConvertError> {
        let candidate = ConversionRequest {
            amount,
            ..self.request.clone()
        };
        self.commit(candidate)
    }

    pub fn set_from(&mut self, code: &str) -> Result<(), ConvertError> {
        let from = self.known_code(code)?;
        let candidate = ConversionRequest {
            from,
            ..self.request.clone()
        };
        self.commit(candidate)
    }

    pub fn set_to(&mut self, code: &str) -> Result<(), ConvertError> {
        let to = self.known_code(code)?;
        let candidate = ConversionRequest {
            to,
            ..self.request.clone()
        };
        self.commit(candidate)
    }

    pub fn swap(&mut self) -> Result<(), ConvertError> {
        self.commit(swap(&self.request))
    }

    fn known_code(&self, code: &str) -> Result<String, ConvertError> {
        let table = self.state.table().ok_or(ConvertError::NotReady)?;
        let code = code.trim().to_uppercase();
        if table.contains(&code) {
            Ok(code)
        } else {
            Err(ConvertError::UnknownCurrency(code))
        }
    }

    /// Replaces the request and its result together. On error neither changes.
    fn commit(&mut self, candidate: ConversionRequest) -> Result<(), ConvertError> {
        let table = self.state.table().ok_or(ConvertError::NotReady)?;
        let result = compute_result(table, &candidate)?;
        self.request = candidate;
        self.result = Some(result);
        Ok(())
    }
}

impl Default for Converter {
    fn default() -> Self {
        Converter::new(ConversionRequest::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_table() -> RateTable {
        RateTable::from_upstream(
            "USD",
            None,
            [("INR".to_string(), 83.0), ("EUR".to_string(), 0.9)],
        )
    }

    struct MockProvider {
        fail: bool,
        call_count: AtomicUsize,
    }

    impl MockProvider {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                call_count: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RateTableProvider for MockProvider {
        async fn fetch_rates(&self, _base: &str) -> Result<RateTable> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(anyhow!("connection refused"))
            } else {
                Ok(sample_table())
            }
        }
    }

    #[test]
    fn test_new_converter_is_idle() {
        let converter = Converter::default();
        assert_eq!(converter.state(), &LoadState::Idle);
        assert!(converter.result().is_none());
    }

    #[test]
    fn test_loading_state_has_no_result() {
        let mut converter = Converter::default();
        converter.begin_loading().unwrap();
        assert!(converter.state().is_loading());
        assert!(converter.result().is_none());
    }

    #[test]
    fn test_ready_computes_default_request() {
        let mut converter = Converter::default();
        converter.begin_loading().unwrap();
        converter.finish_loading(Ok(sample_table())).unwrap();

        assert_eq!(converter.state().table(), Some(&sample_table()));
        assert_eq!(converter.result().unwrap().to_string(), "83.00");
    }

    #[test]
    fn test_failure_uses_generic_message() {
        let mut converter = Converter::default();
        converter.begin_loading().unwrap();
        converter
            .finish_loading(Err(anyhow!("HTTP error: 503")))
            .unwrap();

        assert_eq!(
            converter.state(),
            &LoadState::Failed(FETCH_FAILED_MESSAGE.to_string())
        );
        assert!(converter.result().is_none());
    }

    #[test]
    fn test_transitions_are_one_shot() {
        let mut converter = Converter::default();
        assert_eq!(
            converter.finish_loading(Ok(sample_table())),
            Err(TransitionError::NotLoading)
        );

        converter.begin_loading().unwrap();
        assert_eq!(converter.begin_loading(), Err(TransitionError::AlreadyStarted));

        converter.finish_loading(Err(anyhow!("boom"))).unwrap();
        assert_eq!(converter.begin_loading(), Err(TransitionError::AlreadyStarted));
        assert_eq!(
            converter.finish_loading(Ok(sample_table())),
            Err(TransitionError::NotLoading)
        );
        assert!(matches!(converter.state(), LoadState::Failed(_)));
    }

    #[test]
    fn test_edits_recompute_result() {
        let mut converter = Converter::default();
        converter.begin_loading().unwrap();
        converter.finish_loading(Ok(sample_table())).unwrap();

        converter.set_amount(Amount::new(10.0).unwrap()).unwrap();
        assert_eq!(converter.result().unwrap().to_string(), "830.00");

        converter.set_to("eur").unwrap();
        assert_eq!(converter.request().to, "EUR");
        assert_eq!(converter.result().unwrap().to_string(), "9.00");

        converter.set_from("INR").unwrap();
        assert_eq!(converter.result().unwrap().to_string(), "0.11");
    }

    #[test]
    fn test_swap_uses_prior_values() {
        let mut converter = Converter::default();
        converter.begin_loading().unwrap();
        converter.finish_loading(Ok(sample_table())).unwrap();
        converter.set_amount(Amount::new(83.0).unwrap()).unwrap();

        converter.swap().unwrap();
        assert_eq!(converter.request().from, "INR");
        assert_eq!(converter.request().to, "USD");
        assert_eq!(converter.result().unwrap().to_string(), "1.00");

        converter.swap().unwrap();
        assert_eq!(converter.request().from, "USD");
        assert_eq!(converter.request().to, "INR");
    }

    #[test]
    fn test_unknown_code_keeps_selection() {
        let mut converter = Converter::default();
        converter.begin_loading().unwrap();
        converter.finish_loading(Ok(sample_table())).unwrap();

        assert_eq!(
            converter.set_from("GBP"),
            Err(ConvertError::UnknownCurrency("GBP".to_string()))
        );
        assert_eq!(converter.request().from, "USD");
        assert_eq!(converter.result().unwrap().to_string(), "83.00");
    }

    #[test]
    fn test_convert_reports_unknown_initial_code() {
        let mut converter = Converter::new(ConversionRequest::new(
            Amount::default(),
            "USD",
            "XYZ",
        ));
        assert_eq!(converter.convert(), Err(ConvertError::NotReady));

        converter.begin_loading().unwrap();
        converter.finish_loading(Ok(sample_table())).unwrap();
        assert!(converter.result().is_none());
        assert_eq!(
            converter.convert(),
            Err(ConvertError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn test_edits_before_ready_are_rejected() {
        let mut converter = Converter::default();
        assert_eq!(converter.set_to("EUR"), Err(ConvertError::NotReady));
        assert_eq!(
            converter.set_amount(Amount::new(5.0).unwrap()),
            Err(ConvertError::NotReady)
        );
        assert_eq!(converter.request(), &ConversionRequest::default());
    }

    #[test]
    fn test_failed_edit_keeps_request_and_result_together() {
        let mut converter = Converter::default();
        converter.begin_loading().unwrap();
        converter.finish_loading(Ok(sample_table())).unwrap();

        // 1e29 * 83 does not fit in a Decimal
        assert_eq!(
            converter.set_amount(Amount::new(1e29).unwrap()),
            Err(ConvertError::OutOfRange)
        );
        assert_eq!(converter.request(), &ConversionRequest::default());
        assert_eq!(converter.result().unwrap().to_string(), "83.00");
        assert_eq!(
            converter.convert().unwrap(),
            *converter.result().unwrap()
        );

        converter.set_amount(Amount::new(2.0).unwrap()).unwrap();
        assert_eq!(converter.result().unwrap().to_string(), "166.00");
    }

    #[tokio::test]
    async fn test_load_fetches_once() {
        let provider = MockProvider::new(false);
        let mut converter = Converter::default();

        converter.load(&provider, "USD").await.unwrap();
        assert!(converter.state().table().is_some());

        let second = converter.load(&provider, "USD").await;
        assert_eq!(second, Err(TransitionError::AlreadyStarted));
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_failure() {
        let provider = MockProvider::new(true);
        let mut converter = Converter::default();

        converter.load(&provider, "USD").await.unwrap();
        assert_eq!(
            converter.state(),
            &LoadState::Failed(FETCH_FAILED_MESSAGE.to_string())
        );
    }
}
