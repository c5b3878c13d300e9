//! Executed trades.
//!
//! A [`Trade`] is immutable once recorded. Its `amount` is counted in the base
//! commodity of the market, its `price` in the quote commodity, and its `fee`
//! in whichever commodity [`FeeSide`] names.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    Amount, EngineError, Market, Quantity, ResultEngine,
    ledger::DATE_FORMAT,
    util::{from_minor, to_minor},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl TryFrom<&str> for TradeSide {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(EngineError::InvalidRecord(format!(
                "invalid trade side: {other}"
            ))),
        }
    }
}

/// Which side of the market the trade fee is paid in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeSide {
    Base,
    Quote,
}

impl FeeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Quote => "quote",
        }
    }
}

impl TryFrom<&str> for FeeSide {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "base" => Ok(Self::Base),
            "quote" => Ok(Self::Quote),
            other => Err(EngineError::InvalidRecord(format!(
                "invalid fee side: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TradeParams")]
pub struct Trade {
    /// `exchange|id`, unique across exchanges.
    pub trade_id: String,
    pub exchange: String,
    pub market: String,
    pub side: TradeSide,
    pub amount: Quantity,
    pub price: Quantity,
    pub fee: Quantity,
    pub fee_side: FeeSide,
    pub time: DateTime<Utc>,
}

/// Commodity-tagged view of a trade's numeric fields.
pub(crate) struct TradeAmounts {
    pub market: Market,
    pub amount: Amount,
    pub price: Amount,
    pub fee: Amount,
}

impl Trade {
    /// Build a trade from exchange data.
    ///
    /// The exchange's own id is prefixed with `exchange|` unless it already
    /// carries that prefix.
    pub fn new(
        trade_id: &str,
        exchange: &str,
        market: &str,
        side: TradeSide,
        amount: impl Into<Quantity>,
        price: impl Into<Quantity>,
        fee: impl Into<Quantity>,
        fee_side: FeeSide,
        time: DateTime<Utc>,
    ) -> Self {
        let prefix = format!("{exchange}|");
        let trade_id = if trade_id.starts_with(&prefix) {
            trade_id.to_string()
        } else {
            format!("{prefix}{trade_id}")
        };

        Self {
            trade_id,
            exchange: exchange.to_string(),
            market: market.to_string(),
            side,
            amount: amount.into(),
            price: price.into(),
            fee: fee.into(),
            fee_side,
            time,
        }
    }

    pub(crate) fn amounts(&self) -> ResultEngine<TradeAmounts> {
        let market: Market = self.market.parse()?;
        let fee_commodity = match self.fee_side {
            FeeSide::Base => &market.base,
            FeeSide::Quote => &market.quote,
        };

        Ok(TradeAmounts {
            amount: self.amount.tag(&market.base),
            price: self.price.tag(&market.quote),
            fee: self.fee.tag(fee_commodity),
            market,
        })
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Trade(trade_id='{}', side='{}', amount={}, price={}, fee={}, fee_side='{}', \
             market='{}', exchange='{}', time={})>",
            self.trade_id,
            self.side.as_str(),
            self.amount,
            self.price,
            self.fee,
            self.fee_side.as_str(),
            self.market,
            self.exchange,
            self.time.format(DATE_FORMAT)
        )
    }
}

#[derive(Deserialize)]
struct TradeParams {
    trade_id: String,
    exchange: String,
    market: String,
    side: TradeSide,
    amount: Quantity,
    price: Quantity,
    #[serde(default)]
    fee: Quantity,
    fee_side: FeeSide,
    time: DateTime<Utc>,
}

impl From<TradeParams> for Trade {
    fn from(params: TradeParams) -> Self {
        Trade::new(
            &params.trade_id,
            &params.exchange,
            &params.market,
            params.side,
            params.amount,
            params.price,
            params.fee,
            params.fee_side,
            params.time,
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub trade_id: String,
    pub exchange: String,
    pub market: String,
    pub trade_side: String,
    pub amount: i64,
    pub price: i64,
    pub fee: i64,
    pub fee_side: String,
    pub time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Trade> for ActiveModel {
    type Error = EngineError;

    fn try_from(trade: &Trade) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::NotSet,
            trade_id: ActiveValue::Set(trade.trade_id.clone()),
            exchange: ActiveValue::Set(trade.exchange.clone()),
            market: ActiveValue::Set(trade.market.clone()),
            trade_side: ActiveValue::Set(trade.side.as_str().to_string()),
            amount: ActiveValue::Set(to_minor(&trade.amount, "amount")?),
            price: ActiveValue::Set(to_minor(&trade.price, "price")?),
            fee: ActiveValue::Set(to_minor(&trade.fee, "fee")?),
            fee_side: ActiveValue::Set(trade.fee_side.as_str().to_string()),
            time: ActiveValue::Set(trade.time),
        })
    }
}

/// Rebuilds the stored trade. The amounts come back untagged; callers
/// normalize the result.
impl TryFrom<Model> for Trade {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            trade_id: model.trade_id,
            exchange: model.exchange,
            market: model.market,
            side: TradeSide::try_from(model.trade_side.as_str())?,
            amount: from_minor(model.amount),
            price: from_minor(model.price),
            fee: from_minor(model.fee),
            fee_side: FeeSide::try_from(model.fee_side.as_str())?,
            time: model.time,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    fn trade(trade_id: &str) -> Trade {
        Trade::new(
            trade_id,
            "helper",
            "BTC_USD",
            TradeSide::Sell,
            dec!(1.1),
            dec!(770),
            dec!(1),
            FeeSide::Quote,
            Utc.with_ymd_and_hms(2016, 7, 10, 4, 56, 21).unwrap(),
        )
    }

    #[test]
    fn trade_id_is_namespaced_once() {
        assert_eq!(trade("id").trade_id, "helper|id");
        assert_eq!(trade("helper|id").trade_id, "helper|id");
        assert_eq!(trade("other|id").trade_id, "helper|other|id");
    }

    #[test]
    fn fee_follows_fee_side() {
        let mut t = trade("id");
        assert_eq!(t.amounts().unwrap().fee.commodity().code(), "USD");
        t.fee_side = FeeSide::Base;
        assert_eq!(t.amounts().unwrap().fee.commodity().code(), "BTC");
    }

    #[test]
    fn deserializes_through_constructor() {
        let json = r#"{
            "trade_id": "42",
            "exchange": "kraken",
            "market": "DASH_BTC",
            "side": "buy",
            "amount": 3,
            "price": "0.0125",
            "fee_side": "base",
            "time": "2016-07-10T04:56:21Z"
        }"#;
        let t: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(t.trade_id, "kraken|42");
        assert_eq!(t.fee.number(), dec!(0));
        assert_eq!(t.price.number(), dec!(0.0125));
    }

    #[test]
    fn invalid_side_is_rejected() {
        assert_eq!(
            TradeSide::try_from("hold"),
            Err(EngineError::InvalidRecord("invalid trade side: hold".to_string()))
        );
    }
}
