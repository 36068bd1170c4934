use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::collections::HashSet;

use crate::domain::models::UtxoRef;
use crate::infrastructure::persistence::entities::farm_utxos;
use crate::infrastructure::persistence::error::DbError;

/// Repository for the funding-output ledger
#[derive(Clone)]
pub struct UtxoRepository {
    conn: DatabaseConnection,
}

impl UtxoRepository {
    /// Create a new UtxoRepository
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Outputs already consumed by earlier runs for a farm. A processed
    /// output is never selected as funding again.
    pub async fn processed_for_farm(&self, farm_id: &str) -> Result<HashSet<UtxoRef>, DbError> {
        let results = farm_utxos::Entity::find()
            .filter(farm_utxos::Column::FarmId.eq(farm_id))
            .filter(farm_utxos::Column::Processed.eq(true))
            .all(&self.conn)
            .await?;

        Ok(results
            .into_iter()
            .map(|row| UtxoRef {
                txid: row.txid,
                vout: row.vout as u32,
            })
            .collect())
    }
}
