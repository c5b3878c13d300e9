//! Market quote snapshots.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Quantity,
    ledger::DATE_FORMAT,
    util::{from_minor, to_minor},
};

/// Quote snapshot of a market on one exchange.
///
/// `bid`, `ask`, `high`, `low` and `last` are quote-commodity prices, `volume`
/// is traded quantity in the base commodity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    pub bid: Quantity,
    pub ask: Quantity,
    pub high: Quantity,
    pub low: Quantity,
    pub volume: Quantity,
    pub last: Quantity,
    pub market: String,
    pub exchange: String,
    pub time: DateTime<Utc>,
}

impl Ticker {
    pub fn new(
        bid: impl Into<Quantity>,
        ask: impl Into<Quantity>,
        high: impl Into<Quantity>,
        low: impl Into<Quantity>,
        volume: impl Into<Quantity>,
        last: impl Into<Quantity>,
        market: &str,
        exchange: &str,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            bid: bid.into(),
            ask: ask.into(),
            high: high.into(),
            low: low.into(),
            volume: volume.into(),
            last: last.into(),
            market: market.to_string(),
            exchange: exchange.to_string(),
            time,
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Ticker(bid={}, ask={}, high={}, low={}, volume={}, last={}, market='{}', \
             exchange='{}', time={})>",
            self.bid,
            self.ask,
            self.high,
            self.low,
            self.volume,
            self.last,
            self.market,
            self.exchange,
            self.time.format(DATE_FORMAT)
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tickers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub bid: i64,
    pub ask: i64,
    pub high: i64,
    pub low: i64,
    pub volume: i64,
    pub last: i64,
    pub market: String,
    pub exchange: String,
    pub time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Ticker> for ActiveModel {
    type Error = EngineError;

    fn try_from(ticker: &Ticker) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::NotSet,
            bid: ActiveValue::Set(to_minor(&ticker.bid, "bid")?),
            ask: ActiveValue::Set(to_minor(&ticker.ask, "ask")?),
            high: ActiveValue::Set(to_minor(&ticker.high, "high")?),
            low: ActiveValue::Set(to_minor(&ticker.low, "low")?),
            volume: ActiveValue::Set(to_minor(&ticker.volume, "volume")?),
            last: ActiveValue::Set(to_minor(&ticker.last, "last")?),
            market: ActiveValue::Set(ticker.market.clone()),
            exchange: ActiveValue::Set(ticker.exchange.clone()),
            time: ActiveValue::Set(ticker.time),
        })
    }
}

impl From<Model> for Ticker {
    fn from(model: Model) -> Self {
        Self {
            bid: from_minor(model.bid),
            ask: from_minor(model.ask),
            high: from_minor(model.high),
            low: from_minor(model.low),
            volume: from_minor(model.volume),
            last: from_minor(model.last),
            market: model.market,
            exchange: model.exchange,
            time: model.time,
        }
    }
}
