//! One replication cycle
//!
//! ```text
//! compute_ratio ──► target_positions ──► load_instruments
//!                                              │
//!                        plan_sells / plan_buys ◄┘
//!                                │
//!                          guard::evaluate ──► submit sells, then buys
//! ```

use log::{error, info};
use mirror_core::{AccountId, OrderId, OrderIntent};
use mirror_ports::{Broker, OrderRequest};
use std::sync::Arc;

use crate::config::SyncConfig;
use crate::diff::{TargetMap, load_instruments, plan_buys, plan_sells, target_positions};
use crate::error::SyncResult;
use crate::guard::{self, GuardDecision};
use crate::ratio::{RatioSnapshot, compute_ratio};
use crate::report::REPORT;

/// Everything decided by a cycle before any order goes out
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    pub snapshot: RatioSnapshot,
    pub targets: TargetMap,
    pub sells: Vec<OrderIntent>,
    pub buys: Vec<OrderIntent>,
    pub decision: GuardDecision,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.sells.is_empty() && self.buys.is_empty()
    }
}

/// Result of a completed cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub plan: SyncPlan,
    /// Orders accepted by the broker, sells first
    pub placed: Vec<OrderId>,
}

/// Mirrors a source account onto a destination account
pub struct Replicator<B: ?Sized> {
    broker: Arc<B>,
    config: SyncConfig,
}

impl<B> Replicator<B>
where
    B: Broker + ?Sized,
{
    pub fn new(broker: Arc<B>, config: SyncConfig) -> Self {
        Self { broker, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn broker(&self) -> &Arc<B> {
        &self.broker
    }

    /// Decide a cycle's orders without sending them
    pub async fn plan(&self, src: &AccountId, dst: &AccountId) -> SyncResult<SyncPlan> {
        let snapshot = compute_ratio(&*self.broker, src, dst, self.config.reserve()).await?;
        let targets = target_positions(&snapshot.src_positions, snapshot.ratio);

        let ids = snapshot
            .dst_positions
            .keys()
            .chain(targets.keys())
            .cloned()
            .collect();
        let book = load_instruments(&*self.broker, ids).await?;

        let sells = plan_sells(&snapshot.dst_positions, &targets, &book);
        let buys = plan_buys(
            &snapshot.src_positions,
            &snapshot.dst_positions,
            &targets,
            &book,
        );

        let decision = guard::evaluate(
            &sells,
            &buys,
            &snapshot.src_positions,
            &snapshot.dst_positions,
            snapshot.dst_effective_total,
            &self.config,
        );
        info!(
            target: REPORT,
            "Plan of {} sells and {} buys, {}",
            sells.len(),
            buys.len(),
            decision
        );

        Ok(SyncPlan {
            snapshot,
            targets,
            sells,
            buys,
            decision,
        })
    }

    /// Run one full cycle: plan, guard, submit
    pub async fn sync(&self, src: &AccountId, dst: &AccountId) -> SyncResult<SyncReport> {
        let plan = self.plan(src, dst).await?;

        let placed = if plan.decision.should_execute() {
            let mut placed = self.submit(dst, &plan.sells).await?;
            placed.extend(self.submit(dst, &plan.buys).await?);
            placed
        } else {
            Vec::new()
        };

        Ok(SyncReport { plan, placed })
    }

    async fn submit(&self, dst: &AccountId, intents: &[OrderIntent]) -> SyncResult<Vec<OrderId>> {
        let mut placed = Vec::new();
        for intent in intents {
            let request = OrderRequest::new(dst.clone(), intent.clone());
            match self.broker.submit_order(&request).await {
                Ok(order_id) => {
                    info!(target: REPORT, "Placed {}: order {}", intent, order_id);
                    placed.push(order_id);
                }
                Err(err) => {
                    error!(target: REPORT, "Rejected {}: {}", intent, err);
                    return Err(err.into());
                }
            }
        }
        Ok(placed)
    }
}
