use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, Set,
    TransactionError, TransactionTrait,
};
use std::collections::HashSet;

use crate::domain::contracts::{PayoutStore, RunResult};
use crate::domain::errors::PayoutError;
use crate::domain::models::{NftStatistics, TransactionRecord, TxStatus, UtxoRef};
use crate::infrastructure::persistence::entities::{
    accumulated_amounts, farm_utxos, nft_statistics, payout_transactions, rbf_links,
};
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::Repositories;

/// Database-backed implementation of the payout store.
///
/// Reads go through the per-table repositories; the two multi-table writes
/// (run result, fee-bump replacement) run inside one database transaction so
/// bookkeeping can never half-apply.
pub struct PayoutStorage {
    conn: DatabaseConnection,
    repositories: Repositories,
}

impl PayoutStorage {
    pub fn new(conn: DatabaseConnection, repositories: Repositories) -> Self {
        Self { conn, repositories }
    }
}

fn unwrap_txn_error(error: TransactionError<DbErr>) -> DbError {
    match error {
        TransactionError::Connection(e) => DbError::from(e),
        TransactionError::Transaction(e) => DbError::from(e),
    }
}

fn statistics_model(stats: &NftStatistics) -> Result<nft_statistics::ActiveModel, DbErr> {
    let owners = serde_json::to_value(&stats.owners)
        .map_err(|e| DbErr::Custom(format!("owner breakdown serialization: {}", e)))?;

    Ok(nft_statistics::ActiveModel {
        denom_id: Set(stats.denom_id.clone()),
        nft_id: Set(stats.nft_id.clone()),
        period_end: Set(stats.period_end),
        farm_id: Set(stats.farm_id.clone()),
        period_start: Set(stats.period_start),
        gross_reward: Set(stats.gross_reward),
        maintenance_fee: Set(stats.maintenance_fee),
        platform_fee: Set(stats.platform_fee),
        owners: Set(owners),
    })
}

fn transaction_model(record: &TransactionRecord) -> payout_transactions::ActiveModel {
    payout_transactions::ActiveModel {
        txid: Set(record.txid.clone()),
        status: Set(record.status.as_str().to_string()),
        farm_wallet: Set(record.farm_wallet.clone()),
        time_sent: Set(record.time_sent),
        retry_count: Set(record.retry_count),
    }
}

async fn insert_ledger_utxos(txn: &DatabaseTransaction, result: &RunResult) -> Result<(), DbErr> {
    // Newly observed outputs are remembered unprocessed; the consumed one
    // flips to processed. A flip is one-way, rows are never reused.
    for ledger in &result.utxos {
        let model = farm_utxos::ActiveModel {
            txid: Set(ledger.utxo.txid.clone()),
            vout: Set(ledger.utxo.vout as i32),
            farm_id: Set(ledger.farm_id.clone()),
            processed: Set(ledger.processed),
        };

        let conflict = if ledger.processed {
            OnConflict::columns([farm_utxos::Column::Txid, farm_utxos::Column::Vout])
                .update_column(farm_utxos::Column::Processed)
                .to_owned()
        } else {
            OnConflict::columns([farm_utxos::Column::Txid, farm_utxos::Column::Vout])
                .do_nothing()
                .to_owned()
        };

        farm_utxos::Entity::insert(model)
            .on_conflict(conflict)
            .exec_without_returning(txn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl PayoutStore for PayoutStorage {
    async fn last_statistics_for(
        &self,
        denom_id: &str,
        nft_id: &str,
    ) -> Result<Option<NftStatistics>, PayoutError> {
        Ok(self.repositories.statistics.last_for(denom_id, nft_id).await?)
    }

    async fn accumulated_amount(
        &self,
        address: &str,
        farm_id: &str,
    ) -> Result<Decimal, PayoutError> {
        Ok(self.repositories.accumulation.get(address, farm_id).await?)
    }

    async fn processed_utxos(&self, farm_id: &str) -> Result<HashSet<UtxoRef>, PayoutError> {
        Ok(self.repositories.utxo.processed_for_farm(farm_id).await?)
    }

    async fn save_run_result(&self, result: &RunResult) -> Result<(), PayoutError> {
        let result = result.clone();

        self.conn
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    // Accumulation balances: upsert, one row per address/farm
                    let now = Utc::now();
                    for update in &result.accumulation {
                        let model = accumulated_amounts::ActiveModel {
                            address: Set(update.address.clone()),
                            farm_id: Set(update.farm_id.clone()),
                            amount: Set(update.amount),
                            updated_at: Set(now),
                        };
                        accumulated_amounts::Entity::insert(model)
                            .on_conflict(
                                OnConflict::columns([
                                    accumulated_amounts::Column::Address,
                                    accumulated_amounts::Column::FarmId,
                                ])
                                .update_columns([
                                    accumulated_amounts::Column::Amount,
                                    accumulated_amounts::Column::UpdatedAt,
                                ])
                                .to_owned(),
                            )
                            .exec_without_returning(txn)
                            .await?;
                    }

                    // Statistics are write-once per (nft, period end)
                    for stats in &result.statistics {
                        statistics_model(stats)?.insert(txn).await?;
                    }

                    if let Some(record) = &result.transaction {
                        transaction_model(record).insert(txn).await?;
                    }

                    insert_ledger_utxos(txn, &result).await?;

                    Ok(())
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        Ok(())
    }

    async fn pending_transactions(&self) -> Result<Vec<TransactionRecord>, PayoutError> {
        Ok(self.repositories.transaction.pending().await?)
    }

    async fn update_statuses(
        &self,
        txids: &[String],
        status: TxStatus,
    ) -> Result<(), PayoutError> {
        Ok(self
            .repositories
            .transaction
            .update_statuses(txids, status)
            .await?)
    }

    async fn record_replacement(
        &self,
        old_txid: &str,
        new_txid: &str,
        farm_wallet: &str,
        retry_count: i32,
    ) -> Result<(), PayoutError> {
        let old_txid = old_txid.to_string();
        let new_txid = new_txid.to_string();
        let farm_wallet = farm_wallet.to_string();

        self.conn
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    use sea_orm::sea_query::Expr;
                    use sea_orm::{ColumnTrait, QueryFilter};

                    // The old record must still be pending; replacing a
                    // terminal record would fork the chain
                    let updated = payout_transactions::Entity::update_many()
                        .col_expr(
                            payout_transactions::Column::Status,
                            Expr::value(TxStatus::Replaced.as_str()),
                        )
                        .filter(payout_transactions::Column::Txid.eq(old_txid.clone()))
                        .filter(
                            payout_transactions::Column::Status
                                .eq(TxStatus::Pending.as_str()),
                        )
                        .exec(txn)
                        .await?;
                    if updated.rows_affected != 1 {
                        return Err(DbErr::Custom(format!(
                            "transaction {} is not pending, cannot replace",
                            old_txid
                        )));
                    }

                    let now = Utc::now();
                    rbf_links::ActiveModel {
                        old_txid: Set(old_txid),
                        new_txid: Set(new_txid.clone()),
                        farm_wallet: Set(farm_wallet.clone()),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    payout_transactions::ActiveModel {
                        txid: Set(new_txid),
                        status: Set(TxStatus::Pending.as_str().to_string()),
                        farm_wallet: Set(farm_wallet),
                        time_sent: Set(now),
                        retry_count: Set(retry_count),
                    }
                    .insert(txn)
                    .await?;

                    Ok(())
                })
            })
            .await
            .map_err(unwrap_txn_error)?;

        Ok(())
    }
}
