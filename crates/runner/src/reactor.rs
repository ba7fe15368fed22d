//! Reactor - keeps the destination in step with the source
//!
//! ```text
//!          start
//!            │ initial cycle
//!            ▼
//!   ┌──► subscribe(src, dst) ──────── transient error ──► backoff ──┐
//!   │        │                                                     │
//!   │        ▼                                                     │
//!   │   Idle ◄────────── cycle done ─────────── Syncing            │
//!   │    │  actionable event ──────────────────►  ▲                │
//!   │    │  other event: ignored                                   │
//!   │    │                                                         │
//!   │    └─ stream closed / transport error ──► backoff ───────────┤
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cycles run inline, so at most one is in flight and events are handled in
//! arrival order. Cycle failures are logged and the loop goes on. Only a
//! non-transient feed error ends the loop with an error; shutdown ends it
//! cleanly.

use log::{debug, error, info, warn};
use mirror_core::{AccountId, PositionEvent};
use mirror_engine::{REPORT, Replicator, SyncReport, is_actionable};
use mirror_ports::{Broker, BrokerError, PositionSubscription};
use std::time::Duration;
use tokio::sync::watch;

use crate::error::RunnerResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReactorState {
    #[default]
    Idle,
    Syncing,
}

/// Observable progress of a reactor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactorStatus {
    pub state: ReactorState,
    /// A feed subscription is open
    pub subscribed: bool,
    pub events: u64,
    pub cycles: u64,
    pub failed_cycles: u64,
    pub resubscriptions: u64,
}

/// Delay before each resubscription attempt
///
/// Doubles from `initial_backoff` up to `max_backoff`; the count resets once an
/// event arrives on a fresh subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RestartPolicy {
    /// Resubscribe right away
    pub fn immediate() -> Self {
        Self {
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

enum StreamEnd {
    Shutdown,
    Failed(BrokerError),
}

/// Resolves once shutdown is requested or its sender is gone
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

pub struct Reactor<B: ?Sized> {
    replicator: Replicator<B>,
    src: AccountId,
    dst: AccountId,
    policy: RestartPolicy,
    status: watch::Sender<ReactorStatus>,
}

impl<B> Reactor<B>
where
    B: Broker + ?Sized,
{
    pub fn new(
        replicator: Replicator<B>,
        src: AccountId,
        dst: AccountId,
        policy: RestartPolicy,
    ) -> Self {
        let (status, _) = watch::channel(ReactorStatus::default());
        Self {
            replicator,
            src,
            dst,
            policy,
            status,
        }
    }

    pub fn status(&self) -> watch::Receiver<ReactorStatus> {
        self.status.subscribe()
    }

    /// Run one sync cycle, logging instead of returning its failure
    pub async fn cycle(&self) -> Option<SyncReport> {
        self.status.send_modify(|s| s.state = ReactorState::Syncing);

        let result = self.replicator.sync(&self.src, &self.dst).await;
        let report = match result {
            Ok(report) => {
                info!(
                    target: REPORT,
                    "Cycle done: {} orders placed",
                    report.placed.len()
                );
                Some(report)
            }
            Err(err) if err.is_retryable() => {
                warn!("Sync cycle failed, retrying on the next trigger: {}", err);
                None
            }
            Err(err) if err.is_lookup_failure() => {
                error!("Sync cycle aborted, instrument lookup failed: {}", err);
                None
            }
            Err(err) => {
                error!("Sync cycle failed: {}", err);
                None
            }
        };

        let succeeded = report.is_some();
        self.status.send_modify(|s| {
            s.state = ReactorState::Idle;
            if succeeded {
                s.cycles += 1;
            } else {
                s.failed_cycles += 1;
            }
        });
        report
    }

    /// Run until shutdown or a fatal feed error
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> RunnerResult<()> {
        info!("Mirroring {} onto {}", self.src, self.dst);
        if *shutdown.borrow() {
            return Ok(());
        }

        self.cycle().await;

        let accounts = [self.src.clone(), self.dst.clone()];
        let mut attempt = 0u32;
        loop {
            let subscribed = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                result = self.replicator.broker().subscribe(&accounts) => result,
            };

            match subscribed {
                Ok(mut subscription) => {
                    info!("Listening for position changes");
                    self.status.send_modify(|s| s.subscribed = true);
                    let end = self
                        .consume(subscription.as_mut(), &mut shutdown, &mut attempt)
                        .await;
                    self.status.send_modify(|s| s.subscribed = false);

                    match end {
                        StreamEnd::Shutdown => break,
                        StreamEnd::Failed(err) if err.is_transient() => {
                            warn!("Position feed failed: {}", err);
                        }
                        StreamEnd::Failed(err) => {
                            error!("Position feed failed: {}", err);
                            return Err(err.into());
                        }
                    }
                }
                Err(err) if err.is_transient() => {
                    warn!("Subscription failed: {}", err);
                }
                Err(err) => {
                    error!("Subscription failed: {}", err);
                    return Err(err.into());
                }
            }

            let delay = self.policy.delay(attempt);
            attempt = attempt.saturating_add(1);
            self.status.send_modify(|s| s.resubscriptions += 1);
            warn!("Resubscribing in {:?} (attempt {})", delay, attempt);

            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Reactor stopped");
        Ok(())
    }

    async fn consume(
        &self,
        subscription: &mut dyn PositionSubscription,
        shutdown: &mut watch::Receiver<bool>,
        attempt: &mut u32,
    ) -> StreamEnd {
        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown_requested(shutdown) => return StreamEnd::Shutdown,
                next = subscription.next() => next,
            };

            let event = match next {
                Ok(event) => event,
                Err(err) => return StreamEnd::Failed(err),
            };

            *attempt = 0;
            self.status.send_modify(|s| s.events += 1);

            if is_actionable(&event, &self.src, &self.dst) {
                self.cycle().await;
            } else {
                self.report_ignored(&event);
            }
        }
    }

    fn report_ignored(&self, event: &PositionEvent) {
        match event.position.as_ref() {
            Some(update) => {
                info!(
                    target: REPORT,
                    "Ignoring change on {}: {} security lines, {} cash lines",
                    update.account_id,
                    update.securities.len(),
                    update.money.len()
                );
                for line in &update.money {
                    info!(
                        target: REPORT,
                        "  {}, {}",
                        line.available,
                        line.blocked.blocked_label()
                    );
                }
            }
            None => info!(target: REPORT, "Ignoring event without position data"),
        }
        debug!("Ignored event: {:?}", event);
    }
}
