//! Display-side currency handling: rate tables, conversion and formatting.

pub mod conversion;
pub mod format;
pub mod rates;

pub use conversion::{convert, list_currencies, search_currencies, CurrencyEntry};
pub use format::{format_money, format_rate};
pub use rates::{RateSnapshot, RateSource, RateTable, StaticRateSource};

#[cfg(feature = "amortization")]
pub use conversion::convert_amortization;
