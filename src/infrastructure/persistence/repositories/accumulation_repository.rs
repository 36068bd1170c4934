use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::infrastructure::persistence::entities::accumulated_amounts;
use crate::infrastructure::persistence::error::DbError;

/// Repository for accumulated sub-threshold balances
#[derive(Clone)]
pub struct AccumulationRepository {
    conn: DatabaseConnection,
}

impl AccumulationRepository {
    /// Create a new AccumulationRepository
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Stored balance for an address/farm pair; addresses never seen before
    /// start at zero
    pub async fn get(&self, address: &str, farm_id: &str) -> Result<Decimal, DbError> {
        let result = accumulated_amounts::Entity::find_by_id((
            address.to_string(),
            farm_id.to_string(),
        ))
        .one(&self.conn)
        .await?;

        Ok(result.map(|row| row.amount).unwrap_or(Decimal::ZERO))
    }
}
