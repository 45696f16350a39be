//! Conversion arithmetic: amounts, requests, results and swapping

use crate::core::rates::{DEFAULT_BASE_CURRENCY, RateTable};
use rust_decimal::prelude::{Decimal, RoundingStrategy};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Amount is not a number: {0}")]
    NotANumber(String),
    #[error("Amount must not be negative: {0}")]
    Negative(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("Exchange rates are not loaded yet")]
    NotReady,
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Converted value is out of range")]
    OutOfRange,
}

/// A finite, non-negative amount of money.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotANumber(value.to_string()));
        }
        if value < 0.0 {
            return Err(AmountError::Negative(value.to_string()));
        }
        // Fold -0.0 into 0.0 so it never displays as "-0"
        Ok(Amount(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount(1.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
        if value.is_finite() && value < 0.0 {
            return Err(AmountError::Negative(trimmed.to_string()));
        }
        Amount::new(value).map_err(|_| AmountError::NotANumber(trimmed.to_string()))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: Amount,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    pub fn new(amount: Amount, from: &str, to: &str) -> Self {
        ConversionRequest {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl Default for ConversionRequest {
    fn default() -> Self {
        ConversionRequest::new(Amount::default(), DEFAULT_BASE_CURRENCY, "INR")
    }
}

/// A converted value rounded to two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionResult(Decimal);

impl ConversionResult {
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Display for ConversionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Converts `request.amount` using `amount / rate[from] * rate[to]`.
pub fn compute_result(
    table: &RateTable,
    request: &ConversionRequest,
) -> Result<ConversionResult, ConvertError> {
    let from_rate = table
        .rate(&request.from)
        .ok_or_else(|| ConvertError::UnknownCurrency(request.from.clone()))?;
    let to_rate = table
        .rate(&request.to)
        .ok_or_else(|| ConvertError::UnknownCurrency(request.to.clone()))?;

    let converted = request.amount.value() / from_rate * to_rate;
    // Round the exact binary value, so 1.005 (stored as 1.00499...) gives 1.00
    let rounded = Decimal::from_f64_retain(converted)
        .ok_or(ConvertError::OutOfRange)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(ConversionResult(rounded))
}

/// Exchanges source and target currencies, reading both before writing either.
pub fn swap(request: &ConversionRequest) -> ConversionRequest {
    let (from, to) = (request.from.clone(), request.to.clone());
    ConversionRequest {
        amount: request.amount,
        from: to,
        to: from,
    }
}
