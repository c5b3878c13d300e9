use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Currency or token code attached to an [`Amount`](crate::Amount).
///
/// Codes are free-form tickers (`BTC`, `USD`, `DASH`, ...) because exchanges
/// list new assets all the time. A code is stored upper-case and must not
/// contain whitespace or the `_` market separator.
///
/// ```rust
/// use engine::Commodity;
///
/// let btc = Commodity::try_from(" btc ").unwrap();
/// assert_eq!(btc.code(), "BTC");
/// assert!(Commodity::try_from("BTC_USD").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Commodity(String);

impl Commodity {
    /// Canonical commodity code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Commodity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Commodity {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim();
        if code.is_empty() {
            return Err(EngineError::InvalidCommodity("empty code".to_string()));
        }
        if code.chars().any(|c| c.is_whitespace() || c == '_') {
            return Err(EngineError::InvalidCommodity(format!(
                "unsupported code: {code}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Commodity {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Commodity> for String {
    fn from(value: Commodity) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_uppercased() {
        assert_eq!(Commodity::try_from("dash").unwrap().code(), "DASH");
        assert_eq!(Commodity::try_from("USDT").unwrap().to_string(), "USDT");
    }

    #[test]
    fn rejects_empty_and_separators() {
        assert!(Commodity::try_from("").is_err());
        assert!(Commodity::try_from("  ").is_err());
        assert!(Commodity::try_from("BTC USD").is_err());
        assert!(Commodity::try_from("BTC_USD").is_err());
    }
}
