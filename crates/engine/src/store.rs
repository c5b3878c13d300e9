//! Record storage.
//!
//! Records are stored as plain rows: amounts become integer minor units and
//! lose their commodity. Every read normalizes the rebuilt record again, so
//! callers always get tagged amounts back.

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    Address, Balance, Commodity, Credit, Debit, EngineError, HotWalletBalance, Journal,
    LimitOrder, Market, Normalize, ResultEngine, Ticker, Trade, addresses, balances, credits,
    debits, hot_wallets, limit_orders, tickers, trades,
};

/// Any record the store knows how to persist.
///
/// Serialized with a `kind` tag, e.g. `{"kind": "trade", ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Trade(Trade),
    Credit(Credit),
    Debit(Debit),
    Balance(Balance),
    Ticker(Ticker),
    LimitOrder(LimitOrder),
    HotWalletBalance(HotWalletBalance),
    Address(Address),
}

impl Record {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Trade(_) => "trade",
            Self::Credit(_) => "credit",
            Self::Debit(_) => "debit",
            Self::Balance(_) => "balance",
            Self::Ticker(_) => "ticker",
            Self::LimitOrder(_) => "limit_order",
            Self::HotWalletBalance(_) => "hot_wallet_balance",
            Self::Address(_) => "address",
        }
    }
}

impl Normalize for Record {
    fn normalize(&self) -> ResultEngine<Self> {
        Ok(match self {
            Self::Trade(r) => Self::Trade(r.normalize()?),
            Self::Credit(r) => Self::Credit(r.normalize()?),
            Self::Debit(r) => Self::Debit(r.normalize()?),
            Self::Balance(r) => Self::Balance(r.normalize()?),
            Self::Ticker(r) => Self::Ticker(r.normalize()?),
            Self::LimitOrder(r) => Self::LimitOrder(r.normalize()?),
            Self::HotWalletBalance(r) => Self::HotWalletBalance(r.normalize()?),
            Self::Address(r) => Self::Address(r.normalize()?),
        })
    }
}

/// Normalizes `record` and inserts it, returning the new row id.
async fn insert_record<C: ConnectionTrait>(db: &C, record: &Record) -> ResultEngine<i32> {
    let id = match record.normalize()? {
        Record::Trade(r) => trades::ActiveModel::try_from(&r)?.insert(db).await?.id,
        Record::Credit(r) => credits::ActiveModel::try_from(&r)?.insert(db).await?.id,
        Record::Debit(r) => debits::ActiveModel::try_from(&r)?.insert(db).await?.id,
        Record::Balance(r) => balances::ActiveModel::try_from(&r)?.insert(db).await?.id,
        Record::Ticker(r) => tickers::ActiveModel::try_from(&r)?.insert(db).await?.id,
        Record::LimitOrder(r) => limit_orders::ActiveModel::try_from(&r)?.insert(db).await?.id,
        Record::HotWalletBalance(r) => {
            hot_wallets::ActiveModel::try_from(&r)?
                .insert(db)
                .await?
                .id
        }
        Record::Address(r) => addresses::ActiveModel::from(&r).insert(db).await?.id,
    };
    tracing::debug!("stored {} #{id}", record.kind());
    Ok(id)
}

#[derive(Clone, Debug)]
pub struct Store {
    database: DatabaseConnection,
}

impl Store {
    /// Return a builder for `Store`.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    /// Store a single record.
    pub async fn insert(&self, record: &Record) -> ResultEngine<i32> {
        insert_record(&self.database, record).await
    }

    pub async fn insert_trade(&self, trade: &Trade) -> ResultEngine<i32> {
        self.insert(&Record::Trade(trade.clone())).await
    }

    pub async fn insert_credit(&self, credit: &Credit) -> ResultEngine<i32> {
        self.insert(&Record::Credit(credit.clone())).await
    }

    pub async fn insert_debit(&self, debit: &Debit) -> ResultEngine<i32> {
        self.insert(&Record::Debit(debit.clone())).await
    }

    /// Append a balance snapshot. Earlier snapshots are kept as history.
    pub async fn insert_balance(&self, balance: &Balance) -> ResultEngine<i32> {
        self.insert(&Record::Balance(balance.clone())).await
    }

    pub async fn insert_ticker(&self, ticker: &Ticker) -> ResultEngine<i32> {
        self.insert(&Record::Ticker(ticker.clone())).await
    }

    pub async fn insert_limit_order(&self, order: &LimitOrder) -> ResultEngine<i32> {
        self.insert(&Record::LimitOrder(order.clone())).await
    }

    /// Append a hot wallet snapshot.
    pub async fn insert_hot_wallet_balance(
        &self,
        balance: &HotWalletBalance,
    ) -> ResultEngine<i32> {
        self.insert(&Record::HotWalletBalance(balance.clone())).await
    }

    pub async fn insert_address(&self, address: &Address) -> ResultEngine<i32> {
        self.insert(&Record::Address(address.clone())).await
    }

    /// Store a batch of records in one database transaction.
    ///
    /// Either every record is stored or none is.
    pub async fn import(&self, records: &[Record]) -> ResultEngine<usize> {
        let db_tx = self.database.begin().await?;
        for record in records {
            insert_record(&db_tx, record).await?;
        }
        db_tx.commit().await?;

        tracing::info!("imported {} records", records.len());
        Ok(records.len())
    }

    /// All trades, oldest first.
    pub async fn trades(&self) -> ResultEngine<Vec<Trade>> {
        trades::Entity::find()
            .order_by_asc(trades::Column::Time)
            .order_by_asc(trades::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| Trade::try_from(model)?.normalize())
            .collect()
    }

    /// All credits, oldest first.
    pub async fn credits(&self) -> ResultEngine<Vec<Credit>> {
        credits::Entity::find()
            .order_by_asc(credits::Column::Time)
            .order_by_asc(credits::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| Credit::try_from(model)?.normalize())
            .collect()
    }

    /// All debits, oldest first.
    pub async fn debits(&self) -> ResultEngine<Vec<Debit>> {
        debits::Entity::find()
            .order_by_asc(debits::Column::Time)
            .order_by_asc(debits::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| Debit::try_from(model)?.normalize())
            .collect()
    }

    /// The authoritative balance of `user_id` in `currency`: the newest
    /// snapshot by time, then by insertion order.
    pub async fn latest_balance(&self, user_id: i64, currency: &str) -> ResultEngine<Balance> {
        let currency = Commodity::try_from(currency)?;
        let model = balances::Entity::find()
            .filter(balances::Column::UserId.eq(user_id))
            .filter(balances::Column::Currency.eq(currency.code()))
            .order_by_desc(balances::Column::Time)
            .order_by_desc(balances::Column::Id)
            .one(&self.database)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("{currency} balance of user {user_id}"))
            })?;

        Balance::from(model).normalize()
    }

    /// The newest ticker of `market` on `exchange`.
    pub async fn latest_ticker(&self, exchange: &str, market: &str) -> ResultEngine<Ticker> {
        let market: Market = market.parse()?;
        let model = tickers::Entity::find()
            .filter(tickers::Column::Exchange.eq(exchange))
            .filter(tickers::Column::Market.eq(market.to_string()))
            .order_by_desc(tickers::Column::Time)
            .order_by_desc(tickers::Column::Id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("{exchange} {market} ticker")))?;

        Ticker::from(model).normalize()
    }

    /// The newest hot wallet snapshot of `currency` on `network`.
    pub async fn latest_hot_wallet_balance(
        &self,
        currency: &str,
        network: &str,
    ) -> ResultEngine<HotWalletBalance> {
        let currency = Commodity::try_from(currency)?;
        let model = hot_wallets::Entity::find()
            .filter(hot_wallets::Column::Currency.eq(currency.code()))
            .filter(hot_wallets::Column::Network.eq(network))
            .order_by_desc(hot_wallets::Column::Time)
            .order_by_desc(hot_wallets::Column::Id)
            .one(&self.database)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("{currency} hot wallet on {network}"))
            })?;

        HotWalletBalance::from(model).normalize()
    }

    /// Addresses owned by `user_id`, in insertion order.
    pub async fn addresses(&self, user_id: i64) -> ResultEngine<Vec<Address>> {
        addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_asc(addresses::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| Address::try_from(model)?.normalize())
            .collect()
    }

    pub async fn limit_order(&self, order_id: &str) -> ResultEngine<LimitOrder> {
        let model = limit_orders::Entity::find()
            .filter(limit_orders::Column::OrderId.eq(order_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(order_id.to_string()))?;

        LimitOrder::try_from(model)?.normalize()
    }

    /// Every stored trade, credit and debit rendered as one journal.
    pub async fn journal(&self) -> ResultEngine<Journal> {
        let mut journal = Journal::new();
        for trade in self.trades().await? {
            journal.push(&trade)?;
        }
        for credit in self.credits().await? {
            journal.push(&credit)?;
        }
        for debit in self.debits().await? {
            journal.push(&debit)?;
        }

        tracing::debug!("rendered journal with {} entries", journal.len());
        Ok(journal)
    }
}

/// The builder for `Store`
#[derive(Default)]
pub struct StoreBuilder {
    database: DatabaseConnection,
}

impl StoreBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> StoreBuilder {
        self.database = db;
        self
    }

    /// Construct `Store`
    pub fn build(self) -> Store {
        Store {
            database: self.database,
        }
    }
}
