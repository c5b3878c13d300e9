//! Market pairs.
//!
//! Markets are written `BASE_QUOTE` (e.g. `BTC_USD`): amounts are counted in
//! the base commodity and prices in the quote commodity.

use std::{fmt, str::FromStr};

use crate::{Commodity, EngineError};

const SEPARATOR: char = '_';

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Market {
    pub base: Commodity,
    pub quote: Commodity,
}

impl Market {
    pub fn new(base: Commodity, quote: Commodity) -> Self {
        Self { base, quote }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.base, self.quote)
    }
}

impl FromStr for Market {
    type Err = EngineError;

    /// Splits `BASE_QUOTE` into its two commodities.
    ///
    /// Exactly one separator is accepted and both sides must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EngineError::MalformedMarket(s.to_string());

        let mut parts = s.split(SEPARATOR);
        let (Some(base), Some(quote), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        if base.trim().is_empty() || quote.trim().is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            base: Commodity::try_from(base).map_err(|_| malformed())?,
            quote: Commodity::try_from(quote).map_err(|_| malformed())?,
        })
    }
}
