//! Payment network addresses and account numbers owned by users.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressState {
    #[default]
    Pending,
    Active,
    Blocked,
}

impl AddressState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Blocked => "blocked",
        }
    }
}

impl TryFrom<&str> for AddressState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "blocked" => Ok(Self::Blocked),
            other => Err(EngineError::InvalidRecord(format!(
                "invalid address state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// e.g. `1PkzTWAyfR9yoFw2jptKQ3g6E5nKXPsy8r`
    pub address: String,
    pub currency: String,
    pub network: String,
    #[serde(default)]
    pub state: AddressState,
    pub user_id: i64,
}

impl Address {
    pub fn new(
        address: &str,
        currency: &str,
        network: &str,
        state: AddressState,
        user_id: i64,
    ) -> Self {
        Self {
            address: address.to_string(),
            currency: currency.to_string(),
            network: network.to_string(),
            state,
            user_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub address: String,
    pub currency: String,
    pub network: String,
    pub state: String,
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Address> for ActiveModel {
    fn from(address: &Address) -> Self {
        Self {
            id: ActiveValue::NotSet,
            address: ActiveValue::Set(address.address.clone()),
            currency: ActiveValue::Set(address.currency.clone()),
            network: ActiveValue::Set(address.network.clone()),
            state: ActiveValue::Set(address.state.as_str().to_string()),
            user_id: ActiveValue::Set(address.user_id),
        }
    }
}

impl TryFrom<Model> for Address {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            address: model.address,
            currency: model.currency,
            network: model.network,
            state: AddressState::try_from(model.state.as_str())?,
            user_id: model.user_id,
        })
    }
}
