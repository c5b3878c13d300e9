//! Conversion between quantities and the integer columns they are stored in.

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{EngineError, Quantity, ResultEngine, amount::PRECISION};

/// Minor units per whole commodity unit (`10^8`).
const MINOR_UNITS: i64 = 100_000_000;

/// Convert a quantity into stored minor units.
///
/// The commodity is dropped: it is recovered by normalizing the reloaded
/// record against its market or currency.
pub(crate) fn to_minor(quantity: &Quantity, label: &str) -> ResultEngine<i64> {
    quantity
        .number()
        .checked_mul(Decimal::from(MINOR_UNITS))
        .and_then(|scaled| scaled.trunc().to_i64())
        .ok_or_else(|| EngineError::InvalidAmount(format!("{label} out of range: {quantity}")))
}

/// Rebuild an untagged quantity from stored minor units.
pub(crate) fn from_minor(value: i64) -> Quantity {
    Quantity::Raw(Decimal::new(value, PRECISION))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn minor_units_keep_eight_decimals() {
        let stored = to_minor(&Quantity::Raw(dec!(1.10000001)), "amount").unwrap();
        assert_eq!(stored, 110_000_001);
        assert_eq!(from_minor(stored).number(), dec!(1.10000001));
        assert_eq!(from_minor(-77_000_000_000).number(), dec!(-770));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let huge = Quantity::Raw(Decimal::MAX);
        assert!(matches!(
            to_minor(&huge, "price"),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
