//! Exchange rate table and the provider abstraction that fills it

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Rates for every known currency code, relative to a single base currency.
///
/// The base currency is always present with a rate of `1.0`. A table is
/// built once from an upstream response and never edited afterwards; a
/// refresh produces a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    date: Option<NaiveDate>,
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Builds a table from upstream rates, which never list the base itself.
    pub fn from_upstream(
        base: &str,
        date: Option<NaiveDate>,
        upstream: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        let mut rates: BTreeMap<String, f64> = upstream.into_iter().collect();
        rates.insert(base.to_string(), 1.0);
        RateTable {
            base: base.to_string(),
            date,
            rates,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    /// Currency codes in display order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[async_trait]
pub trait RateTableProvider: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable>;
}
