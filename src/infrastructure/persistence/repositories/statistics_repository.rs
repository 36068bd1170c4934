use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::models::{NftStatistics, OwnerInformation};
use crate::infrastructure::persistence::entities::nft_statistics;
use crate::infrastructure::persistence::error::DbError;

/// Repository for NFT payout statistics
#[derive(Clone)]
pub struct StatisticsRepository {
    conn: DatabaseConnection,
}

impl StatisticsRepository {
    /// Create a new StatisticsRepository
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Latest statistics record for an NFT; its period end seeds the next
    /// run's period start
    pub async fn last_for(
        &self,
        denom_id: &str,
        nft_id: &str,
    ) -> Result<Option<NftStatistics>, DbError> {
        let result = nft_statistics::Entity::find()
            .filter(nft_statistics::Column::DenomId.eq(denom_id))
            .filter(nft_statistics::Column::NftId.eq(nft_id))
            .order_by_desc(nft_statistics::Column::PeriodEnd)
            .one(&self.conn)
            .await?;

        result.map(to_domain_model).transpose()
    }
}

/// Convert a database entity to a domain model
fn to_domain_model(entity: nft_statistics::Model) -> Result<NftStatistics, DbError> {
    let owners: Vec<OwnerInformation> =
        serde_json::from_value(entity.owners.clone()).map_err(|e| {
            DbError::CorruptRecord(format!(
                "owner breakdown for NFT {}/{} at {}: {}",
                entity.denom_id, entity.nft_id, entity.period_end, e
            ))
        })?;

    Ok(NftStatistics {
        farm_id: entity.farm_id,
        denom_id: entity.denom_id,
        nft_id: entity.nft_id,
        period_start: entity.period_start,
        period_end: entity.period_end,
        gross_reward: entity.gross_reward,
        maintenance_fee: entity.maintenance_fee,
        platform_fee: entity.platform_fee,
        owners,
    })
}
