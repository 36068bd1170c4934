mod common;

use rust_decimal::Decimal;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use farm_payout_engine::application::PayoutScheduler;

use common::{test_config, test_farm, FakeDataSource, FakeStore, FakeWallet};

#[tokio::test]
async fn escalates_after_consecutive_pass_failures() {
    let mut config = test_config();
    config.payout.pay_interval_ms = 5;
    config.payout.retry_interval_ms = 60_000;
    config.payout.max_pass_failures = 2;

    // A zero wallet balance fails every payout pass at validation
    let source = FakeDataSource {
        farms: vec![test_farm()],
        ..FakeDataSource::default()
    };
    let wallet = FakeWallet::new(Decimal::ZERO, vec![]);
    let store = FakeStore::default();
    let shutdown = Arc::new(AtomicBool::new(false));

    let scheduler = PayoutScheduler::new(&config, &source, &wallet, &store, shutdown);
    let result = tokio::time::timeout(Duration::from_secs(30), scheduler.run())
        .await
        .expect("scheduler should escalate, not keep retrying");
    assert!(result.is_err());

    // Exactly two passes ran before the scheduler gave up
    assert_eq!(wallet.state.lock().unwrap().load_calls.len(), 2);
}

#[tokio::test]
async fn successful_passes_run_until_shutdown() {
    let mut config = test_config();
    config.payout.pay_interval_ms = 5;
    config.payout.retry_interval_ms = 60_000;
    config.payout.max_pass_failures = 2;

    // No approved farms: the payout pass succeeds without doing anything, so
    // the failure counter never moves and only shutdown ends the loop
    let source = FakeDataSource::default();
    let wallet = FakeWallet::new(Decimal::ZERO, vec![]);
    let store = FakeStore::default();
    let shutdown = Arc::new(AtomicBool::new(false));

    let scheduler = PayoutScheduler::new(&config, &source, &wallet, &store, Arc::clone(&shutdown));
    let stopper = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.store(true, std::sync::atomic::Ordering::SeqCst);
    };

    let (result, ()) = tokio::join!(
        tokio::time::timeout(Duration::from_secs(30), scheduler.run()),
        stopper
    );
    assert!(result.expect("scheduler should stop on shutdown").is_ok());
}

#[tokio::test]
async fn returns_cleanly_when_shutdown_is_already_requested() {
    let config = test_config();
    let source = FakeDataSource::default();
    let wallet = FakeWallet::new(Decimal::ZERO, vec![]);
    let store = FakeStore::default();
    let shutdown = Arc::new(AtomicBool::new(true));

    let scheduler = PayoutScheduler::new(&config, &source, &wallet, &store, shutdown);
    assert!(scheduler.run().await.is_ok());

    // Nothing ran
    assert!(wallet.state.lock().unwrap().load_calls.is_empty());
}
