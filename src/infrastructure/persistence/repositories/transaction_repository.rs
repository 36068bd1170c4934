use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::models::{TransactionRecord, TxStatus};
use crate::infrastructure::persistence::entities::payout_transactions;
use crate::infrastructure::persistence::error::DbError;

/// Repository for payout transaction tracking
#[derive(Clone)]
pub struct TransactionRepository {
    conn: DatabaseConnection,
}

impl TransactionRepository {
    /// Create a new TransactionRepository
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All transactions still awaiting reconciliation, oldest first
    pub async fn pending(&self) -> Result<Vec<TransactionRecord>, DbError> {
        let results = payout_transactions::Entity::find()
            .filter(payout_transactions::Column::Status.eq(TxStatus::Pending.as_str()))
            .order_by_asc(payout_transactions::Column::TimeSent)
            .all(&self.conn)
            .await?;

        results.into_iter().map(to_domain_model).collect()
    }

    /// Move a batch of pending transactions to a terminal status. The filter
    /// on the current status keeps terminal records immutable.
    pub async fn update_statuses(
        &self,
        txids: &[String],
        status: TxStatus,
    ) -> Result<(), DbError> {
        if txids.is_empty() {
            return Ok(());
        }

        payout_transactions::Entity::update_many()
            .col_expr(
                payout_transactions::Column::Status,
                Expr::value(status.as_str()),
            )
            .filter(payout_transactions::Column::Txid.is_in(txids.to_vec()))
            .filter(payout_transactions::Column::Status.eq(TxStatus::Pending.as_str()))
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}

/// Convert a database entity to a domain model
fn to_domain_model(entity: payout_transactions::Model) -> Result<TransactionRecord, DbError> {
    let status = TxStatus::parse(&entity.status).ok_or_else(|| {
        DbError::CorruptRecord(format!(
            "unknown status {} on transaction {}",
            entity.status, entity.txid
        ))
    })?;

    Ok(TransactionRecord {
        txid: entity.txid,
        status,
        farm_wallet: entity.farm_wallet,
        time_sent: entity.time_sent,
        retry_count: entity.retry_count,
    })
}
