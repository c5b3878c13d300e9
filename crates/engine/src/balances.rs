//! User balances.
//!
//! Balances are append-only snapshots: only the most recent row for a
//! `(user, currency)` pair is authoritative, older rows are history.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Quantity,
    util::{from_minor, to_minor},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub total: Quantity,
    pub available: Quantity,
    pub currency: String,
    pub reference: Option<String>,
    pub user_id: i64,
    pub time: DateTime<Utc>,
}

impl Balance {
    pub fn new(
        total: impl Into<Quantity>,
        available: impl Into<Quantity>,
        currency: &str,
        reference: Option<&str>,
        user_id: i64,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            total: total.into(),
            available: available.into(),
            currency: currency.to_string(),
            reference: reference.map(str::to_string),
            user_id,
            time,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub total: i64,
    pub available: i64,
    pub currency: String,
    pub reference: Option<String>,
    pub user_id: i64,
    pub time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Balance> for ActiveModel {
    type Error = EngineError;

    fn try_from(balance: &Balance) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::NotSet,
            total: ActiveValue::Set(to_minor(&balance.total, "total")?),
            available: ActiveValue::Set(to_minor(&balance.available, "available")?),
            currency: ActiveValue::Set(balance.currency.clone()),
            reference: ActiveValue::Set(balance.reference.clone()),
            user_id: ActiveValue::Set(balance.user_id),
            time: ActiveValue::Set(balance.time),
        })
    }
}

impl From<Model> for Balance {
    fn from(model: Model) -> Self {
        Self {
            total: from_minor(model.total),
            available: from_minor(model.available),
            currency: model.currency,
            reference: model.reference,
            user_id: model.user_id,
            time: model.time,
        }
    }
}
