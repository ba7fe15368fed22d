//! Reactor Integration Test
//!
//! Runs the reactor against the paper broker:
//! 1. Initial cycle copies the source onto the destination
//! 2. A source trade triggers the next cycle
//! 3. Broken feeds are resubscribed, with backoff
//! 4. Shutdown and fatal feed errors end the loop

use mirror_core::{AccountId, InstrumentId, OrderIntent};
use mirror_engine::{Replicator, SyncConfig};
use mirror_gateway::{PaperBroker, PaperSeed};
use mirror_ports::{OrderGateway, OrderRequest};
use mirror_runner::{
    Reactor, ReactorState, ReactorStatus, RestartPolicy, RunMode, RunnerConfig, RunnerError,
    bootstrap,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

// Source: 100 X @ 1.2 and 100 Y @ 1 = 220. Destination: 440 cash.
// With a 1% reserve: ratio = 435.6 / 220 = 1.98, targets of 198 units each.
const SEED: &str = r#"{
    "instruments": [
        { "uid": "X", "name": "Example Corp", "ticker": "EXM", "lot": 10,
          "currency": "RUB", "price": "1.2" },
        { "uid": "Y", "name": "Yonder Inc", "ticker": "YND", "lot": 10,
          "currency": "RUB", "price": "1" }
    ],
    "accounts": [
        { "id": "src", "name": "Source",
          "positions": [ { "instrument": "X", "quantity": "100" },
                         { "instrument": "Y", "quantity": "100" } ] },
        { "id": "dst", "name": "Destination", "cash": { "RUB": "440" } }
    ]
}"#;

const WAIT: Duration = Duration::from_secs(5);

fn broker() -> Arc<PaperBroker> {
    let seed = PaperSeed::from_json(SEED).unwrap();
    Arc::new(PaperBroker::from_seed(seed).unwrap())
}

fn src() -> AccountId {
    AccountId::new("src")
}

fn dst() -> AccountId {
    AccountId::new("dst")
}

fn x() -> InstrumentId {
    InstrumentId::new("X")
}

fn y() -> InstrumentId {
    InstrumentId::new("Y")
}

struct Running {
    status: watch::Receiver<ReactorStatus>,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<Result<(), RunnerError>>,
}

fn spawn_reactor(broker: Arc<PaperBroker>, src: AccountId, policy: RestartPolicy) -> Running {
    let config = SyncConfig::new(false, dec!(0.004), dec!(0.01)).unwrap();
    let reactor = Reactor::new(Replicator::new(broker, config), src, dst(), policy);
    let status = reactor.status();
    let (shutdown, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { reactor.run(shutdown_rx).await });
    Running {
        status,
        shutdown,
        handle,
    }
}

async fn wait_until(
    status: &mut watch::Receiver<ReactorStatus>,
    condition: impl FnMut(&ReactorStatus) -> bool,
) -> ReactorStatus {
    tokio::time::timeout(WAIT, status.wait_for(condition))
        .await
        .expect("reactor did not reach the expected state")
        .unwrap()
        .clone()
}

async fn stop(running: Running) {
    running.shutdown.send(true).unwrap();
    running.handle.await.unwrap().unwrap();
}

/// Source sells all of Y: 100 units back to cash
async fn source_sells_y(broker: &PaperBroker) {
    let request = OrderRequest::new(src(), OrderIntent::sell(y(), 10));
    broker.submit_order(&request).await.unwrap();
}

#[tokio::test]
async fn test_initial_cycle_then_source_trade_triggers_sync() {
    let _ = env_logger::try_init();
    let broker = broker();
    let mut running = spawn_reactor(broker.clone(), src(), RestartPolicy::immediate());

    // 19.8 lots of each round to 20
    let status = wait_until(&mut running.status, |s| s.cycles == 1 && s.subscribed).await;
    assert_eq!(status.state, ReactorState::Idle);
    assert_eq!(broker.quantity_of(&dst(), &x()).await, dec!(200));
    assert_eq!(broker.quantity_of(&dst(), &y()).await, dec!(200));

    // 435.6 / 120 = 3.63: sell 20 lots of Y, buy 163 units of X ≈ 16 lots
    source_sells_y(&broker).await;
    wait_until(&mut running.status, |s| s.cycles == 2).await;

    assert_eq!(broker.quantity_of(&dst(), &y()).await, dec!(0));
    assert_eq!(broker.quantity_of(&dst(), &x()).await, dec!(360));
    assert_eq!(
        broker
            .quantity_of(&dst(), &InstrumentId::new("RUB"))
            .await,
        dec!(8)
    );

    // The destination's own fills are seen but not acted on
    let status = wait_until(&mut running.status, |s| s.events >= 3).await;
    assert_eq!(status.cycles, 2);
    assert_eq!(status.failed_cycles, 0);

    stop(running).await;
}

#[tokio::test]
async fn test_resubscribes_after_disconnect() {
    let broker = broker();
    let mut running = spawn_reactor(broker.clone(), src(), RestartPolicy::immediate());
    wait_until(&mut running.status, |s| s.cycles == 1 && s.subscribed).await;

    broker.disconnect_streams().await;
    wait_until(&mut running.status, |s| s.resubscriptions == 1 && s.subscribed).await;

    // The fresh subscription still drives cycles
    source_sells_y(&broker).await;
    let status = wait_until(&mut running.status, |s| s.cycles == 2).await;
    assert_eq!(status.resubscriptions, 1);
    assert_eq!(broker.quantity_of(&dst(), &y()).await, dec!(0));

    stop(running).await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_subscriptions_back_off() {
    let broker = broker();
    broker.fail_next_subscriptions(3).await;

    let started = tokio::time::Instant::now();
    let mut running = spawn_reactor(broker.clone(), src(), RestartPolicy::default());

    let status = tokio::time::timeout(
        Duration::from_secs(120),
        running.status.wait_for(|s| s.subscribed),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    // 1s + 2s + 4s
    assert_eq!(status.resubscriptions, 3);
    assert!(started.elapsed() >= Duration::from_secs(7));

    stop(running).await;
}

#[tokio::test]
async fn test_failed_initial_cycle_does_not_stop_reactor() {
    let broker = broker();
    broker.fail_next_portfolio_requests(1).await;
    let mut running = spawn_reactor(broker.clone(), src(), RestartPolicy::immediate());

    let status = wait_until(&mut running.status, |s| s.subscribed).await;
    assert_eq!(status.failed_cycles, 1);
    assert_eq!(status.cycles, 0);
    assert!(broker.submitted_orders().await.is_empty());

    // The next trigger catches up
    source_sells_y(&broker).await;
    wait_until(&mut running.status, |s| s.cycles == 1).await;
    assert!(broker.quantity_of(&dst(), &x()).await > dec!(0));

    stop(running).await;
}

#[tokio::test]
async fn test_ambiguous_holding_fails_cycles_but_keeps_listening() {
    let _ = env_logger::try_init();
    // "GAZ" matches its own uid and the "Gazprom" name
    let seed = PaperSeed::from_json(
        r#"{
        "instruments": [
            { "uid": "GAZ", "name": "Gaz", "ticker": "GZ1", "lot": 1,
              "currency": "RUB", "price": "10" },
            { "uid": "GZP", "name": "Gazprom", "ticker": "GAZP", "lot": 1,
              "currency": "RUB", "price": "20" }
        ],
        "accounts": [
            { "id": "src", "name": "Source", "cash": { "RUB": "100" },
              "positions": [ { "instrument": "GAZ", "quantity": "5" } ] },
            { "id": "dst", "name": "Destination", "cash": { "RUB": "440" } }
        ]
    }"#,
    )
    .unwrap();
    let broker = Arc::new(PaperBroker::from_seed(seed).unwrap());
    let mut running = spawn_reactor(broker.clone(), src(), RestartPolicy::immediate());

    let status = wait_until(&mut running.status, |s| s.subscribed).await;
    assert_eq!(status.failed_cycles, 1);
    assert_eq!(status.cycles, 0);

    // A source trade triggers another cycle, which fails the same way
    let request = OrderRequest::new(src(), OrderIntent::buy(InstrumentId::new("GZP"), 1));
    broker.submit_order(&request).await.unwrap();
    let status = wait_until(&mut running.status, |s| s.failed_cycles == 2).await;
    assert_eq!(status.cycles, 0);
    assert!(status.subscribed);

    // Only the source's own order went out
    assert_eq!(broker.submitted_orders().await.len(), 1);

    stop(running).await;
}

#[tokio::test]
async fn test_unknown_account_is_fatal() {
    let broker = broker();
    let running = spawn_reactor(broker, AccountId::new("ghost"), RestartPolicy::immediate());

    let result = tokio::time::timeout(WAIT, running.handle)
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(result, Err(RunnerError::Broker(_))));

    let status = running.status.borrow().clone();
    assert_eq!(status.failed_cycles, 1);
    assert!(!status.subscribed);
}

#[tokio::test]
async fn test_shutdown_while_waiting_for_events() {
    let broker = broker();
    let mut running = spawn_reactor(broker.clone(), src(), RestartPolicy::immediate());
    wait_until(&mut running.status, |s| s.subscribed).await;

    running.shutdown.send(true).unwrap();
    let result = tokio::time::timeout(WAIT, running.handle).await.unwrap();
    assert!(result.unwrap().is_ok());
}

#[tokio::test]
async fn test_once_mode_runs_a_single_cycle() {
    let broker = broker();
    let config = RunnerConfig {
        src: Some("src".into()),
        dst: Some("dst".into()),
        ..Default::default()
    };
    let (_shutdown, shutdown_rx) = watch::channel(false);

    bootstrap::run(broker.clone(), &config, RunMode::Once, shutdown_rx)
        .await
        .unwrap();

    assert_eq!(broker.submitted_orders().await.len(), 2);
    assert_eq!(broker.subscriber_count().await, 0);
}

#[tokio::test]
async fn test_list_mode_needs_no_accounts() {
    let broker = broker();
    let (_shutdown, shutdown_rx) = watch::channel(false);

    bootstrap::run(
        broker.clone(),
        &RunnerConfig::default(),
        RunMode::List,
        shutdown_rx,
    )
    .await
    .unwrap();

    assert!(broker.submitted_orders().await.is_empty());
}

#[tokio::test]
async fn test_follow_mode_without_accounts_fails() {
    let (_shutdown, shutdown_rx) = watch::channel(false);

    let err = bootstrap::run(broker(), &RunnerConfig::default(), RunMode::Follow, shutdown_rx)
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::MissingAccount("source")));
}

fn assert_send<T: Send>(_: &T) {}

#[tokio::test]
async fn test_reactor_future_is_send() {
    let config = SyncConfig::new(false, dec!(0.004), dec!(0.01)).unwrap();
    let reactor = Reactor::new(
        Replicator::new(broker(), config),
        src(),
        dst(),
        RestartPolicy::immediate(),
    );
    let (_shutdown, shutdown_rx) = watch::channel(false);

    let future = reactor.run(shutdown_rx);
    assert_send(&future);
}
