//! `<year>-<fuelCode>` model-year values, as listed by `ConsultarAnoModelo`
//! and sent back on the valuation and models-by-year calls.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: char = '-';

/// Manufacture year plus fuel-type code. Both halves are kept as the upstream
/// strings so the value sent back is exactly the value that was listed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelYear {
    year: String,
    fuel_code: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed model-year {0:?}: expected <year>-<fuelCode>")]
pub struct ModelYearError(pub String);

impl ModelYear {
    pub fn new(year: impl Into<String>, fuel_code: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            fuel_code: fuel_code.into(),
        }
    }

    /// Manufacture year, e.g. `"2015"` (`"32000"` is upstream's "zero km").
    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn fuel_code(&self) -> &str {
        &self.fuel_code
    }
}

impl FromStr for ModelYear {
    type Err = ModelYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(SEPARATOR) {
            Some((year, fuel))
                if !year.is_empty() && !fuel.is_empty() && !fuel.contains(SEPARATOR) =>
            {
                Ok(ModelYear::new(year, fuel))
            }
            _ => Err(ModelYearError(s.to_string())),
        }
    }
}

impl fmt::Display for ModelYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.year, SEPARATOR, self.fuel_code)
    }
}
