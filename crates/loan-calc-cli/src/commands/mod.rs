pub mod currency;
pub mod loan;

use loan_calc_core::currency::{RateSnapshot, RateSource, StaticRateSource};

use crate::input::file::JsonRateSource;

/// Rates from `--rates <file.json>` when given, otherwise the built-in table.
pub fn load_rates(path: Option<&str>) -> Result<RateSnapshot, Box<dyn std::error::Error>> {
    let snapshot = match path {
        Some(path) => JsonRateSource::new(path).fetch_rates()?,
        None => StaticRateSource::mock().fetch_rates()?,
    };
    Ok(snapshot)
}
