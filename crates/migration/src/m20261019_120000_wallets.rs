//! Operator wallets.
//!
//! - `hot_wallet_balances`: append-only snapshots per currency and network
//! - `addresses`: payment addresses owned by users

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum HotWalletBalances {
    Table,
    Id,
    Available,
    Total,
    Currency,
    Network,
    Time,
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
    Address,
    Currency,
    Network,
    State,
    UserId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HotWalletBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HotWalletBalances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HotWalletBalances::Available)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HotWalletBalances::Total)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HotWalletBalances::Currency)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HotWalletBalances::Network).string().not_null())
                    .col(
                        ColumnDef::new(HotWalletBalances::Time)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-hot_wallet_balances-currency-network")
                    .table(HotWalletBalances::Table)
                    .col(HotWalletBalances::Currency)
                    .col(HotWalletBalances::Network)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::Address).string().not_null())
                    .col(ColumnDef::new(Addresses::Currency).string().not_null())
                    .col(ColumnDef::new(Addresses::Network).string().not_null())
                    .col(
                        ColumnDef::new(Addresses::State)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Addresses::UserId).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-addresses-user_id")
                    .table(Addresses::Table)
                    .col(Addresses::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HotWalletBalances::Table).to_owned())
            .await?;
        Ok(())
    }
}
