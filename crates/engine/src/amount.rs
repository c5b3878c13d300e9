use std::{fmt, ops::Neg, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{Commodity, EngineError, ResultEngine};

/// Number of fractional digits kept and printed for every amount.
pub const PRECISION: u32 = 8;

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Signed quantity of a commodity, fixed to 8 decimal places.
///
/// Use this type for every monetary value handed to the ledger renderer so the
/// printed postings always carry their commodity.
///
/// # Examples
///
/// ```rust
/// use engine::{Amount, Commodity};
/// use rust_decimal::Decimal;
///
/// let btc = Commodity::try_from("BTC").unwrap();
/// let amount = Amount::new(Decimal::new(11, 1), btc);
/// assert_eq!(amount.to_string(), "1.10000000 BTC");
/// assert_eq!((-amount).to_string(), "-1.10000000 BTC");
/// ```
///
/// Parsing accepts `<number> <code>`:
///
/// ```rust
/// use engine::Amount;
///
/// let fee: Amount = "0.01 btc".parse().unwrap();
/// assert_eq!(fee.to_string(), "0.01000000 BTC");
/// assert!("0.01".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    quantity: Decimal,
    commodity: Commodity,
}

impl Amount {
    /// Creates an amount, rounding the quantity to 8 decimals.
    #[must_use]
    pub fn new(quantity: Decimal, commodity: Commodity) -> Self {
        Self {
            quantity: round(quantity),
            commodity,
        }
    }

    /// Zero of the given commodity.
    #[must_use]
    pub fn zero(commodity: Commodity) -> Self {
        Self::new(Decimal::ZERO, commodity)
    }

    /// Returns the numeric value, without its commodity.
    #[must_use]
    pub fn number(&self) -> Decimal {
        self.quantity
    }

    #[must_use]
    pub fn commodity(&self) -> &Commodity {
        &self.commodity
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Returns `true` if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Returns `true` if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.quantity < Decimal::ZERO
    }

    /// Magnitude of the amount, same commodity.
    #[must_use]
    pub fn abs(&self) -> Amount {
        Amount::new(self.quantity.abs(), self.commodity.clone())
    }

    /// Same value under another commodity.
    #[must_use]
    pub fn retag(&self, commodity: Commodity) -> Amount {
        Amount::new(self.quantity, commodity)
    }

    /// Reciprocal quantity (`1 / self`), same commodity.
    ///
    /// Used to express a price the other way around: `770 USD` per BTC
    /// becomes `0.00129870` BTC per USD once retagged.
    pub fn inverted(&self) -> ResultEngine<Amount> {
        let inverse = Decimal::ONE.checked_div(self.quantity).ok_or_else(|| {
            EngineError::InvalidAmount(format!("cannot invert {self}"))
        })?;
        Ok(Amount::new(inverse, self.commodity.clone()))
    }

    /// `self + rhs`. Operands are expected to share a commodity; the left
    /// one is kept.
    pub fn checked_add(&self, rhs: &Amount) -> ResultEngine<Amount> {
        debug_assert_eq!(self.commodity, rhs.commodity, "commodity mismatch");
        self.checked(self.quantity.checked_add(rhs.quantity), "+", rhs)
    }

    /// `self - rhs`, same rules as [`Amount::checked_add`].
    pub fn checked_sub(&self, rhs: &Amount) -> ResultEngine<Amount> {
        debug_assert_eq!(self.commodity, rhs.commodity, "commodity mismatch");
        self.checked(self.quantity.checked_sub(rhs.quantity), "-", rhs)
    }

    /// `self * factor`, same commodity.
    pub fn checked_mul(&self, factor: Decimal) -> ResultEngine<Amount> {
        self.quantity
            .checked_mul(factor)
            .map(|product| Amount::new(product, self.commodity.clone()))
            .ok_or_else(|| EngineError::InvalidAmount(format!("overflow: {self} * {factor}")))
    }

    fn checked(&self, result: Option<Decimal>, op: &str, rhs: &Amount) -> ResultEngine<Amount> {
        result
            .map(|quantity| Amount::new(quantity, self.commodity.clone()))
            .ok_or_else(|| EngineError::InvalidAmount(format!("overflow: {self} {op} {rhs}")))
    }

    /// Quantity printed with exactly 8 decimals and no commodity.
    #[must_use]
    pub fn quantity_string(&self) -> String {
        let mut quantity = self.quantity;
        if quantity.is_zero() {
            quantity.set_sign_positive(true);
        }
        quantity.rescale(PRECISION);
        quantity.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity_string(), self.commodity)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount::new(-self.quantity, self.commodity)
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses `<number> <code>`, e.g. `770 USD` or `-0.5 BTC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s}"));

        let mut parts = s.split_whitespace();
        let (Some(number), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let quantity = Decimal::from_str(number).map_err(|_| invalid())?;

        Ok(Amount::new(quantity, Commodity::try_from(code)?))
    }
}

impl TryFrom<String> for Amount {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

/// A numeric record field, before or after it received its commodity.
///
/// Records are built from raw numbers (`Raw`) and become `Tagged` once
/// normalized. Tagging only looks at the number, so tagging an already tagged
/// value again yields the same amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuantityRepr", into = "String")]
pub enum Quantity {
    Raw(Decimal),
    Tagged(Amount),
}

impl Quantity {
    /// Returns the numeric value, ignoring any commodity.
    #[must_use]
    pub fn number(&self) -> Decimal {
        match self {
            Self::Raw(value) => round(*value),
            Self::Tagged(amount) => amount.number(),
        }
    }

    /// Attaches `commodity` to the numeric value.
    #[must_use]
    pub fn tag(&self, commodity: &Commodity) -> Amount {
        Amount::new(self.number(), commodity.clone())
    }

    /// Returns the tagged amount, if any.
    #[must_use]
    pub fn amount(&self) -> Option<&Amount> {
        match self {
            Self::Raw(_) => None,
            Self::Tagged(amount) => Some(amount),
        }
    }

    #[must_use]
    pub fn is_tagged(&self) -> bool {
        matches!(self, Self::Tagged(_))
    }

    /// Same quantity with a non-negative sign.
    #[must_use]
    pub fn abs(&self) -> Quantity {
        match self {
            Self::Raw(value) => Self::Raw(value.abs()),
            Self::Tagged(amount) => Self::Tagged(amount.abs()),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::Raw(Decimal::ZERO)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(value) => {
                let mut value = round(*value);
                value.rescale(PRECISION);
                write!(f, "{value}")
            }
            Self::Tagged(amount) => write!(f, "{amount}"),
        }
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self::Raw(value)
    }
}

impl From<Amount> for Quantity {
    fn from(value: Amount) -> Self {
        Self::Tagged(value)
    }
}

impl From<Quantity> for String {
    fn from(value: Quantity) -> Self {
        value.to_string()
    }
}

impl FromStr for Quantity {
    type Err = EngineError;

    /// Accepts either a bare number or `<number> <code>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.contains(char::is_whitespace) {
            return trimmed.parse().map(Self::Tagged);
        }
        Decimal::from_str(trimmed)
            .map(Self::Raw)
            .map_err(|_| EngineError::InvalidAmount(format!("invalid amount: {s}")))
    }
}

/// JSON integers are read exactly. Fractional JSON numbers go through `f64`
/// and keep about 15 significant digits; pass them as strings when every
/// digit matters.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityRepr {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl TryFrom<QuantityRepr> for Quantity {
    type Error = EngineError;

    fn try_from(value: QuantityRepr) -> Result<Self, Self::Error> {
        match value {
            QuantityRepr::Signed(number) => Ok(Self::Raw(Decimal::from(number))),
            QuantityRepr::Unsigned(number) => Ok(Self::Raw(Decimal::from(number))),
            QuantityRepr::Float(number) => Decimal::try_from(number)
                .map(Self::Raw)
                .map_err(|_| EngineError::InvalidAmount(format!("invalid amount: {number}"))),
            QuantityRepr::Text(text) => text.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn commodity(code: &str) -> Commodity {
        Commodity::try_from(code).unwrap()
    }

    #[test]
    fn display_uses_eight_decimals() {
        assert_eq!(Amount::new(dec!(0), commodity("BTC")).to_string(), "0.00000000 BTC");
        assert_eq!(Amount::new(dec!(1.1), commodity("BTC")).to_string(), "1.10000000 BTC");
        assert_eq!(Amount::new(dec!(-847), commodity("USD")).to_string(), "-847.00000000 USD");
        assert_eq!(
            Amount::new(dec!(0.123456789), commodity("BTC")).to_string(),
            "0.12345679 BTC"
        );
    }

    #[test]
    fn negated_zero_prints_unsigned() {
        let zero = -Amount::zero(commodity("USD"));
        assert_eq!(zero.to_string(), "0.00000000 USD");
    }

    #[test]
    fn arithmetic_keeps_commodity() {
        let a = Amount::new(dec!(1.1), commodity("BTC"));
        let b = Amount::new(dec!(0.01), commodity("BTC"));
        assert_eq!(a.checked_sub(&b).unwrap().to_string(), "1.09000000 BTC");
        assert_eq!(a.checked_add(&b).unwrap().to_string(), "1.11000000 BTC");
        assert_eq!(a.checked_mul(dec!(770)).unwrap().to_string(), "847.00000000 BTC");
    }

    #[test]
    fn overflow_is_an_error() {
        let big = Amount::new(Decimal::MAX, commodity("USD"));
        assert!(matches!(
            big.checked_mul(dec!(2)),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            big.checked_add(&big),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            (-big.clone()).checked_sub(&big),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn inverted_price() {
        let price = Amount::new(dec!(770), commodity("BTC"));
        assert_eq!(price.inverted().unwrap().to_string(), "0.00129870 BTC");
        assert!(Amount::zero(commodity("BTC")).inverted().is_err());
    }

    #[test]
    fn parse_requires_commodity() {
        let amount: Amount = "770 usd".parse().unwrap();
        assert_eq!(amount, Amount::new(dec!(770), commodity("USD")));
        assert!("770".parse::<Amount>().is_err());
        assert!("seven USD".parse::<Amount>().is_err());
        assert!("1 BTC extra".parse::<Amount>().is_err());
    }

    #[test]
    fn tagging_uses_only_the_number() {
        let raw = Quantity::from(dec!(1.1));
        let once = raw.tag(&commodity("BTC"));
        let twice = Quantity::from(once.clone()).tag(&commodity("BTC"));
        assert_eq!(once, twice);

        let retagged = Quantity::from(once).tag(&commodity("DASH"));
        assert_eq!(retagged.to_string(), "1.10000000 DASH");
    }

    #[test]
    fn quantity_deserializes_numbers_and_strings() {
        let parsed: Vec<Quantity> = serde_json::from_str(r#"[1.1, "770", "0.01 BTC"]"#).unwrap();
        assert!(!parsed[0].is_tagged());
        assert_eq!(parsed[0].number(), dec!(1.1));
        assert_eq!(parsed[1], Quantity::Raw(dec!(770)));
        assert_eq!(
            parsed[2],
            Quantity::Tagged(Amount::new(dec!(0.01), commodity("BTC")))
        );
    }

    #[test]
    fn long_quantities_keep_every_digit() {
        let parsed: Vec<Quantity> = serde_json::from_str(
            r#"[9007199254740993, 18446744073709551615, -9007199254740993,
                "12345678901.12345678", "12345678901.12345678 BTC"]"#,
        )
        .unwrap();
        assert_eq!(parsed[0], Quantity::Raw(dec!(9007199254740993)));
        assert_eq!(parsed[1], Quantity::Raw(Decimal::from(u64::MAX)));
        assert_eq!(parsed[2], Quantity::Raw(dec!(-9007199254740993)));
        assert_eq!(parsed[3], Quantity::Raw(dec!(12345678901.12345678)));
        assert_eq!(parsed[4].to_string(), "12345678901.12345678 BTC");
    }
}
