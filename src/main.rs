use std::process::exit;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use farm_payout_engine::application::PayoutScheduler;
use farm_payout_engine::config::AppConfig;
use farm_payout_engine::infrastructure::api::BackendApiClient;
use farm_payout_engine::infrastructure::bitcoin::WalletRpcClient;
use farm_payout_engine::infrastructure::persistence::{DbPool, RepositoryFactory};
use farm_payout_engine::utils::logging;

#[tokio::main]
async fn main() {
    logging::init_logger();

    logging::log_info(&format!(
        "farm-payout-engine v{}",
        env!("CARGO_PKG_VERSION")
    ));

    let config = AppConfig::from_env();

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_signal = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logging::log_info("Ctrl+C received, finishing the current farm then stopping");
            shutdown_signal.store(true, Ordering::SeqCst);
        }
    });

    match DbPool::new(&config).await {
        Ok(db_pool) => {
            let storage = RepositoryFactory::create_storage(&db_pool);

            match BackendApiClient::new(&config) {
                Ok(api_client) => match WalletRpcClient::new(&config) {
                    Ok(wallet_client) => {
                        let scheduler = PayoutScheduler::new(
                            &config,
                            &api_client,
                            &wallet_client,
                            &storage,
                            shutdown,
                        );

                        if let Err(e) = scheduler.run().await {
                            logging::log_error(&format!("Scheduler stopped with error: {}", e));
                            exit(1);
                        }
                    }
                    Err(e) => {
                        logging::log_error(&format!("Failed to create wallet client: {}", e));
                        exit(1);
                    }
                },
                Err(e) => {
                    logging::log_error(&format!("Failed to create API client: {}", e));
                    exit(1);
                }
            }
        }
        Err(e) => {
            logging::log_error(&format!("Failed to connect to database: {}", e));
            exit(1);
        }
    }
}
