//! Limit orders placed on an exchange.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Quantity,
    ledger::DATE_FORMAT,
    util::{from_minor, to_minor},
};

/// Prefix of ids handed out before the exchange acknowledges an order.
pub const TEMPORARY_ORDER_PREFIX: &str = "tmp";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Bid,
    Ask,
}

impl OrderSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bid => "bid",
            Self::Ask => "ask",
        }
    }
}

impl TryFrom<&str> for OrderSide {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "bid" => Ok(Self::Bid),
            "ask" => Ok(Self::Ask),
            other => Err(EngineError::InvalidRecord(format!(
                "invalid order side: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    #[default]
    Pending,
    Open,
    Closed,
}

impl OrderState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl TryFrom<&str> for OrderState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(EngineError::InvalidRecord(format!(
                "invalid order state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LimitOrderParams")]
pub struct LimitOrder {
    pub price: Quantity,
    pub amount: Quantity,
    /// Quantity already executed, in the base commodity.
    pub exec_amount: Quantity,
    pub market: String,
    pub side: OrderSide,
    pub exchange: String,
    pub order_id: String,
    pub state: OrderState,
    pub create_time: DateTime<Utc>,
    pub change_time: DateTime<Utc>,
}

impl LimitOrder {
    /// Build a pending order with nothing executed yet.
    ///
    /// Without an `order_id` a temporary `tmp|...` id is generated. An id
    /// without a `|` is namespaced as `exchange|order_id`.
    pub fn new(
        price: impl Into<Quantity>,
        amount: impl Into<Quantity>,
        market: &str,
        side: OrderSide,
        exchange: &str,
        order_id: Option<&str>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            price: price.into(),
            amount: amount.into(),
            exec_amount: Quantity::Raw(Decimal::ZERO),
            market: market.to_string(),
            side,
            exchange: exchange.to_string(),
            order_id: namespaced_order_id(exchange, order_id),
            state: OrderState::Pending,
            create_time: time,
            change_time: time,
        }
    }

    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.order_id
            .strip_prefix(TEMPORARY_ORDER_PREFIX)
            .is_some_and(|rest| rest.starts_with('|'))
    }
}

fn namespaced_order_id(exchange: &str, order_id: Option<&str>) -> String {
    match order_id {
        None => {
            let random = Uuid::new_v4().simple().to_string();
            format!("{TEMPORARY_ORDER_PREFIX}|{}", &random[..15])
        }
        Some(id) if !id.contains('|') => format!("{exchange}|{id}"),
        Some(id) => id.to_string(),
    }
}

impl fmt::Display for LimitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<LimitOrder(price={}, amount={}, exec_amount={}, market='{}', side='{}', \
             exchange='{}', order_id='{}', state='{}', create_time={})>",
            self.price,
            self.amount,
            self.exec_amount,
            self.market,
            self.side.as_str(),
            self.exchange,
            self.order_id,
            self.state.as_str(),
            self.create_time.format(DATE_FORMAT)
        )
    }
}

#[derive(Deserialize)]
struct LimitOrderParams {
    price: Quantity,
    amount: Quantity,
    #[serde(default)]
    exec_amount: Quantity,
    market: String,
    side: OrderSide,
    exchange: String,
    order_id: Option<String>,
    #[serde(default)]
    state: OrderState,
    create_time: DateTime<Utc>,
    change_time: Option<DateTime<Utc>>,
}

impl From<LimitOrderParams> for LimitOrder {
    fn from(params: LimitOrderParams) -> Self {
        let mut order = LimitOrder::new(
            params.price,
            params.amount,
            &params.market,
            params.side,
            &params.exchange,
            params.order_id.as_deref(),
            params.create_time,
        );
        order.exec_amount = params.exec_amount;
        order.state = params.state;
        order.change_time = params.change_time.unwrap_or(params.create_time);
        order
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "limit_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub create_time: DateTimeUtc,
    pub change_time: DateTimeUtc,
    pub price: i64,
    pub amount: i64,
    pub exec_amount: i64,
    pub market: String,
    pub side: String,
    pub exchange: String,
    #[sea_orm(unique)]
    pub order_id: String,
    pub state: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&LimitOrder> for ActiveModel {
    type Error = EngineError;

    fn try_from(order: &LimitOrder) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::NotSet,
            create_time: ActiveValue::Set(order.create_time),
            change_time: ActiveValue::Set(order.change_time),
            price: ActiveValue::Set(to_minor(&order.price, "price")?),
            amount: ActiveValue::Set(to_minor(&order.amount, "amount")?),
            exec_amount: ActiveValue::Set(to_minor(&order.exec_amount, "exec_amount")?),
            market: ActiveValue::Set(order.market.clone()),
            side: ActiveValue::Set(order.side.as_str().to_string()),
            exchange: ActiveValue::Set(order.exchange.clone()),
            order_id: ActiveValue::Set(order.order_id.clone()),
            state: ActiveValue::Set(order.state.as_str().to_string()),
        })
    }
}

impl TryFrom<Model> for LimitOrder {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            price: from_minor(model.price),
            amount: from_minor(model.amount),
            exec_amount: from_minor(model.exec_amount),
            market: model.market,
            side: OrderSide::try_from(model.side.as_str())?,
            exchange: model.exchange,
            order_id: model.order_id,
            state: OrderState::try_from(model.state.as_str())?,
            create_time: model.create_time,
            change_time: model.change_time,
        })
    }
}
