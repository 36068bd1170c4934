use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_table("accumulated_amounts").await? {
            manager
                .create_table(
                    Table::create()
                        .table(AccumulatedAmounts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(AccumulatedAmounts::Address).text().not_null())
                        .col(ColumnDef::new(AccumulatedAmounts::FarmId).text().not_null())
                        .col(
                            ColumnDef::new(AccumulatedAmounts::Amount)
                                .decimal_len(30, 16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AccumulatedAmounts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .primary_key(
                            Index::create()
                                .col(AccumulatedAmounts::Address)
                                .col(AccumulatedAmounts::FarmId),
                        )
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_table("nft_statistics").await? {
            manager
                .create_table(
                    Table::create()
                        .table(NftStatistics::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(NftStatistics::DenomId).text().not_null())
                        .col(ColumnDef::new(NftStatistics::NftId).text().not_null())
                        .col(
                            ColumnDef::new(NftStatistics::PeriodEnd)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(NftStatistics::FarmId).text().not_null())
                        .col(
                            ColumnDef::new(NftStatistics::PeriodStart)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(NftStatistics::GrossReward)
                                .decimal_len(30, 16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(NftStatistics::MaintenanceFee)
                                .decimal_len(30, 16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(NftStatistics::PlatformFee)
                                .decimal_len(30, 16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(NftStatistics::Owners)
                                .json_binary()
                                .not_null()
                                .default("[]"),
                        )
                        .primary_key(
                            Index::create()
                                .col(NftStatistics::DenomId)
                                .col(NftStatistics::NftId)
                                .col(NftStatistics::PeriodEnd),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("nft_statistics_farm_id")
                        .table(NftStatistics::Table)
                        .col(NftStatistics::FarmId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_table("payout_transactions").await? {
            manager
                .create_table(
                    Table::create()
                        .table(PayoutTransactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PayoutTransactions::Txid)
                                .text()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PayoutTransactions::Status).text().not_null())
                        .col(
                            ColumnDef::new(PayoutTransactions::FarmWallet)
                                .text()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayoutTransactions::TimeSent)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayoutTransactions::RetryCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("payout_transactions_status")
                        .table(PayoutTransactions::Table)
                        .col(PayoutTransactions::Status)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_table("farm_utxos").await? {
            manager
                .create_table(
                    Table::create()
                        .table(FarmUtxos::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(FarmUtxos::Txid).text().not_null())
                        .col(ColumnDef::new(FarmUtxos::Vout).integer().not_null())
                        .col(ColumnDef::new(FarmUtxos::FarmId).text().not_null())
                        .col(
                            ColumnDef::new(FarmUtxos::Processed)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .primary_key(Index::create().col(FarmUtxos::Txid).col(FarmUtxos::Vout))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("farm_utxos_farm_id")
                        .table(FarmUtxos::Table)
                        .col(FarmUtxos::FarmId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_table("rbf_links").await? {
            manager
                .create_table(
                    Table::create()
                        .table(RbfLinks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RbfLinks::OldTxid)
                                .text()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RbfLinks::NewTxid).text().not_null())
                        .col(ColumnDef::new(RbfLinks::FarmWallet).text().not_null())
                        .col(
                            ColumnDef::new(RbfLinks::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RbfLinks::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FarmUtxos::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PayoutTransactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(NftStatistics::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AccumulatedAmounts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum AccumulatedAmounts {
    Table,
    Address,
    FarmId,
    Amount,
    UpdatedAt,
}

#[derive(Iden)]
enum NftStatistics {
    Table,
    DenomId,
    NftId,
    PeriodEnd,
    FarmId,
    PeriodStart,
    GrossReward,
    MaintenanceFee,
    PlatformFee,
    Owners,
}

#[derive(Iden)]
enum PayoutTransactions {
    Table,
    Txid,
    Status,
    FarmWallet,
    TimeSent,
    RetryCount,
}

#[derive(Iden)]
enum FarmUtxos {
    Table,
    Txid,
    Vout,
    FarmId,
    Processed,
}

#[derive(Iden)]
enum RbfLinks {
    Table,
    OldTxid,
    NewTxid,
    FarmWallet,
    CreatedAt,
}
