//! Initial schema.
//!
//! - `trades`: fills reported by an exchange
//! - `credits`: incoming transfers
//! - `debits`: outgoing transfers
//! - `balances`: append-only balance snapshots per user and currency
//! - `tickers`: market quotes, including composed cross rates
//! - `limit_orders`: orders placed on an exchange
//!
//! Amounts are stored as integer minor units (`10^-8`).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Trades {
    Table,
    Id,
    TradeId,
    Exchange,
    Market,
    TradeSide,
    Amount,
    Price,
    Fee,
    FeeSide,
    Time,
}

#[derive(Iden)]
enum Credits {
    Table,
    Id,
    Amount,
    Address,
    Currency,
    Network,
    State,
    Reference,
    RefId,
    UserId,
    Time,
}

#[derive(Iden)]
enum Debits {
    Table,
    Id,
    Amount,
    Fee,
    Address,
    Currency,
    Network,
    State,
    Reference,
    RefId,
    UserId,
    Time,
}

#[derive(Iden)]
enum Balances {
    Table,
    Id,
    Total,
    Available,
    Currency,
    Reference,
    UserId,
    Time,
}

#[derive(Iden)]
enum Tickers {
    Table,
    Id,
    Bid,
    Ask,
    High,
    Low,
    Volume,
    Last,
    Market,
    Exchange,
    Time,
}

#[derive(Iden)]
enum LimitOrders {
    Table,
    Id,
    CreateTime,
    ChangeTime,
    Price,
    Amount,
    ExecAmount,
    Market,
    Side,
    Exchange,
    OrderId,
    State,
}

fn id<T: Iden + 'static>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn minor<T: Iden + 'static>(column: T) -> ColumnDef {
    ColumnDef::new(column).big_integer().not_null().to_owned()
}

fn time<T: Iden + 'static>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Trades
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trades::Table)
                    .if_not_exists()
                    .col(&mut id(Trades::Id))
                    .col(
                        ColumnDef::new(Trades::TradeId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Trades::Exchange).string().not_null())
                    .col(ColumnDef::new(Trades::Market).string().not_null())
                    .col(ColumnDef::new(Trades::TradeSide).string().not_null())
                    .col(&mut minor(Trades::Amount))
                    .col(&mut minor(Trades::Price))
                    .col(&mut minor(Trades::Fee))
                    .col(ColumnDef::new(Trades::FeeSide).string().not_null())
                    .col(&mut time(Trades::Time))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trades-time")
                    .table(Trades::Table)
                    .col(Trades::Time)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Credits and debits
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Credits::Table)
                    .if_not_exists()
                    .col(&mut id(Credits::Id))
                    .col(&mut minor(Credits::Amount))
                    .col(ColumnDef::new(Credits::Address).string().not_null())
                    .col(ColumnDef::new(Credits::Currency).string().not_null())
                    .col(ColumnDef::new(Credits::Network).string().not_null())
                    .col(ColumnDef::new(Credits::State).string().not_null())
                    .col(ColumnDef::new(Credits::Reference).string())
                    .col(
                        ColumnDef::new(Credits::RefId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Credits::UserId).big_integer().not_null())
                    .col(&mut time(Credits::Time))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Debits::Table)
                    .if_not_exists()
                    .col(&mut id(Debits::Id))
                    .col(&mut minor(Debits::Amount))
                    .col(&mut minor(Debits::Fee))
                    .col(ColumnDef::new(Debits::Address).string().not_null())
                    .col(ColumnDef::new(Debits::Currency).string().not_null())
                    .col(ColumnDef::new(Debits::Network).string().not_null())
                    .col(ColumnDef::new(Debits::State).string().not_null())
                    .col(ColumnDef::new(Debits::Reference).string())
                    .col(ColumnDef::new(Debits::RefId).string().not_null())
                    .col(ColumnDef::new(Debits::UserId).big_integer().not_null())
                    .col(&mut time(Debits::Time))
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Balances
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Balances::Table)
                    .if_not_exists()
                    .col(&mut id(Balances::Id))
                    .col(&mut minor(Balances::Total))
                    .col(&mut minor(Balances::Available))
                    .col(ColumnDef::new(Balances::Currency).string().not_null())
                    .col(ColumnDef::new(Balances::Reference).string())
                    .col(ColumnDef::new(Balances::UserId).big_integer().not_null())
                    .col(&mut time(Balances::Time))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-balances-user_id-currency")
                    .table(Balances::Table)
                    .col(Balances::UserId)
                    .col(Balances::Currency)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Tickers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Tickers::Table)
                    .if_not_exists()
                    .col(&mut id(Tickers::Id))
                    .col(&mut minor(Tickers::Bid))
                    .col(&mut minor(Tickers::Ask))
                    .col(&mut minor(Tickers::High))
                    .col(&mut minor(Tickers::Low))
                    .col(&mut minor(Tickers::Volume))
                    .col(&mut minor(Tickers::Last))
                    .col(ColumnDef::new(Tickers::Market).string().not_null())
                    .col(ColumnDef::new(Tickers::Exchange).string().not_null())
                    .col(&mut time(Tickers::Time))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tickers-exchange-market")
                    .table(Tickers::Table)
                    .col(Tickers::Exchange)
                    .col(Tickers::Market)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Limit orders
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LimitOrders::Table)
                    .if_not_exists()
                    .col(&mut id(LimitOrders::Id))
                    .col(&mut time(LimitOrders::CreateTime))
                    .col(&mut time(LimitOrders::ChangeTime))
                    .col(&mut minor(LimitOrders::Price))
                    .col(&mut minor(LimitOrders::Amount))
                    .col(&mut minor(LimitOrders::ExecAmount))
                    .col(ColumnDef::new(LimitOrders::Market).string().not_null())
                    .col(ColumnDef::new(LimitOrders::Side).string().not_null())
                    .col(ColumnDef::new(LimitOrders::Exchange).string().not_null())
                    .col(
                        ColumnDef::new(LimitOrders::OrderId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LimitOrders::State).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LimitOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tickers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Balances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Debits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Credits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trades::Table).to_owned())
            .await?;
        Ok(())
    }
}
