//! Core business logic abstractions

pub mod config;
pub mod controller;
pub mod convert;
pub mod log;
pub mod rates;
pub mod view;

// Re-export main types for cleaner imports
pub use controller::{Converter, LoadState};
pub use convert::{Amount, ConversionRequest, ConversionResult, ConvertError};
pub use rates::{RateTable, RateTableProvider};
