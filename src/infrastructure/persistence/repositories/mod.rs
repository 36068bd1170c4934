pub mod accumulation_repository;
pub mod statistics_repository;
pub mod transaction_repository;
pub mod utxo_repository;

pub use accumulation_repository::AccumulationRepository;
pub use statistics_repository::StatisticsRepository;
pub use transaction_repository::TransactionRepository;
pub use utxo_repository::UtxoRepository;

/// Container for all repositories
#[derive(Clone)]
pub struct Repositories {
    pub accumulation: AccumulationRepository,
    pub statistics: StatisticsRepository,
    pub transaction: TransactionRepository,
    pub utxo: UtxoRepository,
}

impl Repositories {
    pub fn new(
        accumulation: AccumulationRepository,
        statistics: StatisticsRepository,
        transaction: TransactionRepository,
        utxo: UtxoRepository,
    ) -> Self {
        Self {
            accumulation,
            statistics,
            transaction,
            utxo,
        }
    }
}
