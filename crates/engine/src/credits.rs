//! Credits: funds added to a user's balance.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Quantity,
    ledger::DATE_FORMAT,
    util::{from_minor, to_minor},
};

/// Lifecycle of a wallet transfer, shared by credits and debits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    Unconfirmed,
    Complete,
    Error,
}

impl TransferState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unconfirmed => "unconfirmed",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

// `Self::Error` would clash with the `Error` variant.
impl TryFrom<&str> for TransferState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, EngineError> {
        match value {
            "unconfirmed" => Ok(Self::Unconfirmed),
            "complete" => Ok(Self::Complete),
            "error" => Ok(TransferState::Error),
            other => Err(EngineError::InvalidRecord(format!(
                "invalid transfer state: {other}"
            ))),
        }
    }
}

/// A credit, which adds tokens to a user's balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub amount: Quantity,
    /// Payment network address or account number.
    pub address: String,
    pub currency: String,
    /// e.g. Bitcoin, Dash, Crypto Capital
    pub network: String,
    pub state: TransferState,
    /// e.g. `invoice#1`
    pub reference: Option<String>,
    /// Unique external id, e.g. `<txid>:<vout>`.
    pub ref_id: String,
    pub user_id: i64,
    pub time: DateTime<Utc>,
}

impl Credit {
    pub fn new(
        amount: impl Into<Quantity>,
        address: &str,
        currency: &str,
        network: &str,
        state: TransferState,
        reference: Option<&str>,
        ref_id: &str,
        user_id: i64,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            amount: amount.into(),
            address: address.to_string(),
            currency: currency.to_string(),
            network: network.to_string(),
            state,
            reference: reference.map(str::to_string),
            ref_id: ref_id.to_string(),
            user_id,
            time,
        }
    }

    /// Account segment used in ledger postings; falls back to the network.
    pub(crate) fn account(&self) -> &str {
        self.reference.as_deref().unwrap_or(&self.network)
    }
}

impl fmt::Display for Credit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Credit(amount={}, address='{}', currency='{}', network='{}', state='{}', \
             reference='{}', ref_id='{}', time={})>",
            self.amount,
            self.address,
            self.currency,
            self.network,
            self.state.as_str(),
            self.reference.as_deref().unwrap_or("None"),
            self.ref_id,
            self.time.format(DATE_FORMAT)
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "credits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount: i64,
    pub address: String,
    pub currency: String,
    pub network: String,
    pub state: String,
    pub reference: Option<String>,
    #[sea_orm(unique)]
    pub ref_id: String,
    pub user_id: i64,
    pub time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Credit> for ActiveModel {
    type Error = EngineError;

    fn try_from(credit: &Credit) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::NotSet,
            amount: ActiveValue::Set(to_minor(&credit.amount, "amount")?),
            address: ActiveValue::Set(credit.address.clone()),
            currency: ActiveValue::Set(credit.currency.clone()),
            network: ActiveValue::Set(credit.network.clone()),
            state: ActiveValue::Set(credit.state.as_str().to_string()),
            reference: ActiveValue::Set(credit.reference.clone()),
            ref_id: ActiveValue::Set(credit.ref_id.clone()),
            user_id: ActiveValue::Set(credit.user_id),
            time: ActiveValue::Set(credit.time),
        })
    }
}

impl TryFrom<Model> for Credit {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: from_minor(model.amount),
            address: model.address,
            currency: model.currency,
            network: model.network,
            state: TransferState::try_from(model.state.as_str())?,
            reference: model.reference,
            ref_id: model.ref_id,
            user_id: model.user_id,
            time: model.time,
        })
    }
}
