//! Cross-rate tickers.
//!
//! Two tickers sharing an intermediate commodity (`A_B` and `B_C`) are
//! multiplied into a synthetic `A_C` ticker.

use crate::{Amount, EngineError, Market, Normalize, Quantity, ResultEngine, Ticker};

/// Exchange name of tickers that were composed rather than quoted by a venue.
pub const COMPOSITE_EXCHANGE: &str = "composite";

/// Combine `first` (`A_B`) and `second` (`B_C`) into an `A_C` ticker.
///
/// `bid`, `ask` and `last` are the products of the matching fields. `high` and
/// `low` are multiplied the same way, which gives a best-effort value only:
/// the two extremes need not have happened at the same time. Volume has no
/// meaning for a synthetic pair and is zero.
pub fn compose_tickers(first: &Ticker, second: &Ticker) -> ResultEngine<Ticker> {
    let first_market: Market = first.market.parse()?;
    let second_market: Market = second.market.parse()?;
    if first_market.quote != second_market.base {
        return Err(EngineError::MarketMismatch(format!(
            "{first_market} does not chain into {second_market}"
        )));
    }

    let first = first.normalize()?;
    let second = second.normalize()?;
    let quote = &second_market.quote;
    let cross = |a: &Quantity, b: &Quantity| -> ResultEngine<Quantity> {
        a.tag(quote).checked_mul(b.number()).map(Quantity::Tagged)
    };

    Ok(Ticker {
        bid: cross(&first.bid, &second.bid)?,
        ask: cross(&first.ask, &second.ask)?,
        high: cross(&first.high, &second.high)?,
        low: cross(&first.low, &second.low)?,
        volume: Quantity::Tagged(Amount::zero(first_market.base.clone())),
        last: cross(&first.last, &second.last)?,
        market: Market::new(first_market.base, second_market.quote.clone()).to_string(),
        exchange: COMPOSITE_EXCHANGE.to_string(),
        time: first.time.max(second.time),
    })
}

impl Ticker {
    /// See [`compose_tickers`].
    pub fn compose(&self, next: &Ticker) -> ResultEngine<Ticker> {
        compose_tickers(self, next)
    }

    /// Returns `true` for tickers built by [`compose_tickers`].
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.exchange == COMPOSITE_EXCHANGE
    }
}
