//! Hot wallet balances, for internal bookkeeping.
//!
//! Unlike [`Balance`](crate::Balance) these are not owned by a user: one row
//! is a snapshot of what the operator holds on a payment network.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Quantity,
    ledger::DATE_FORMAT,
    util::{from_minor, to_minor},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotWalletBalance {
    pub available: Quantity,
    pub total: Quantity,
    pub currency: String,
    /// e.g. Bitcoin, Dash
    pub network: String,
    pub time: DateTime<Utc>,
}

impl HotWalletBalance {
    pub fn new(
        available: impl Into<Quantity>,
        total: impl Into<Quantity>,
        currency: &str,
        network: &str,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            available: available.into(),
            total: total.into(),
            currency: currency.to_string(),
            network: network.to_string(),
            time,
        }
    }
}

impl fmt::Display for HotWalletBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<HotWalletBalance(available={}, total={}, currency='{}', network='{}', time={})>",
            self.available,
            self.total,
            self.currency,
            self.network,
            self.time.format(DATE_FORMAT)
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hot_wallet_balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub available: i64,
    pub total: i64,
    pub currency: String,
    pub network: String,
    pub time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&HotWalletBalance> for ActiveModel {
    type Error = EngineError;

    fn try_from(balance: &HotWalletBalance) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::NotSet,
            available: ActiveValue::Set(to_minor(&balance.available, "available")?),
            total: ActiveValue::Set(to_minor(&balance.total, "total")?),
            currency: ActiveValue::Set(balance.currency.clone()),
            network: ActiveValue::Set(balance.network.clone()),
            time: ActiveValue::Set(balance.time),
        })
    }
}

impl From<Model> for HotWalletBalance {
    fn from(model: Model) -> Self {
        Self {
            available: from_minor(model.available),
            total: from_minor(model.total),
            currency: model.currency,
            network: model.network,
            time: model.time,
        }
    }
}
