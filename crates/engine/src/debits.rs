//! Debits: funds removed from a user's balance.
//!
//! `amount` and `fee` are kept as magnitudes; the ledger renderer applies the
//! signs.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Quantity, TransferState,
    ledger::DATE_FORMAT,
    util::{from_minor, to_minor},
};

/// A debit, which subtracts tokens from a user's balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DebitParams")]
pub struct Debit {
    pub amount: Quantity,
    /// Network fee paid on top of the transfer, e.g. a miner fee.
    pub fee: Quantity,
    pub address: String,
    pub currency: String,
    pub network: String,
    pub state: TransferState,
    pub reference: Option<String>,
    pub ref_id: String,
    pub user_id: i64,
    pub time: DateTime<Utc>,
}

impl Debit {
    /// Build a debit. Signed inputs are stored as their magnitude.
    pub fn new(
        amount: impl Into<Quantity>,
        fee: impl Into<Quantity>,
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
            amount: amount.into().abs(),
            fee: fee.into().abs(),
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

    pub(crate) fn account(&self) -> &str {
        self.reference.as_deref().unwrap_or(&self.network)
    }
}

impl fmt::Display for Debit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Debit(amount={}, fee={}, address='{}', currency='{}', network='{}', state='{}', \
             reference='{}', ref_id='{}', time={})>",
            self.amount,
            self.fee,
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

#[derive(Deserialize)]
struct DebitParams {
    amount: Quantity,
    #[serde(default)]
    fee: Quantity,
    address: String,
    currency: String,
    network: String,
    state: TransferState,
    reference: Option<String>,
    ref_id: String,
    user_id: i64,
    time: DateTime<Utc>,
}

impl From<DebitParams> for Debit {
    fn from(params: DebitParams) -> Self {
        Debit::new(
            params.amount,
            params.fee,
            &params.address,
            &params.currency,
            &params.network,
            params.state,
            params.reference.as_deref(),
            &params.ref_id,
            params.user_id,
            params.time,
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount: i64,
    pub fee: i64,
    pub address: String,
    pub currency: String,
    pub network: String,
    pub state: String,
    pub reference: Option<String>,
    pub ref_id: String,
    pub user_id: i64,
    pub time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Debit> for ActiveModel {
    type Error = EngineError;

    fn try_from(debit: &Debit) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::NotSet,
            amount: ActiveValue::Set(to_minor(&debit.amount, "amount")?),
            fee: ActiveValue::Set(to_minor(&debit.fee, "fee")?),
            address: ActiveValue::Set(debit.address.clone()),
            currency: ActiveValue::Set(debit.currency.clone()),
            network: ActiveValue::Set(debit.network.clone()),
            state: ActiveValue::Set(debit.state.as_str().to_string()),
            reference: ActiveValue::Set(debit.reference.clone()),
            ref_id: ActiveValue::Set(debit.ref_id.clone()),
            user_id: ActiveValue::Set(debit.user_id),
            time: ActiveValue::Set(debit.time),
        })
    }
}

impl TryFrom<Model> for Debit {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: from_minor(model.amount),
            fee: from_minor(model.fee),
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
