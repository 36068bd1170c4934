use sea_orm::DatabaseConnection;

use crate::infrastructure::persistence::connection::DbPool;
use crate::infrastructure::persistence::repositories::{
    AccumulationRepository, Repositories, StatisticsRepository, TransactionRepository,
    UtxoRepository,
};
use crate::infrastructure::persistence::store::PayoutStorage;

/// Factory for creating repositories
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create all repositories
    pub fn create_repositories(db_pool: &DbPool) -> Repositories {
        let conn = db_pool.get_connection().clone();

        Repositories::new(
            Self::create_accumulation_repository(conn.clone()),
            Self::create_statistics_repository(conn.clone()),
            Self::create_transaction_repository(conn.clone()),
            Self::create_utxo_repository(conn),
        )
    }

    /// Create the payout store over a connection and its repositories
    pub fn create_storage(db_pool: &DbPool) -> PayoutStorage {
        let conn = db_pool.get_connection().clone();
        PayoutStorage::new(conn.clone(), Self::create_repositories(db_pool))
    }

    /// Create an accumulation repository
    pub fn create_accumulation_repository(conn: DatabaseConnection) -> AccumulationRepository {
        AccumulationRepository::new(conn)
    }

    /// Create a statistics repository
    pub fn create_statistics_repository(conn: DatabaseConnection) -> StatisticsRepository {
        StatisticsRepository::new(conn)
    }

    /// Create a transaction repository
    pub fn create_transaction_repository(conn: DatabaseConnection) -> TransactionRepository {
        TransactionRepository::new(conn)
    }

    /// Create a utxo repository
    pub fn create_utxo_repository(conn: DatabaseConnection) -> UtxoRepository {
        UtxoRepository::new(conn)
    }
}
