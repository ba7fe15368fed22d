//! Order Plan Guard
//!
//! Holds back plans too small to be worth their transaction costs. The plan's
//! notional is the larger of its two legs, each priced at `lots × unit price`
//! (sells at destination prices, buys at source prices), and it must be
//! strictly above `dst_effective_total × threshold`.

use mirror_core::{OrderIntent, format_decimal};
use rust_decimal::Decimal;

use crate::config::SyncConfig;
use crate::ratio::PositionMap;

/// Outcome of the guard for one plan
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Execute { notional: Decimal, floor: Decimal },
    BelowThreshold { notional: Decimal, floor: Decimal },
    /// Large enough, but simulation mode is on
    Simulation { notional: Decimal, floor: Decimal },
}

impl GuardDecision {
    pub fn should_execute(&self) -> bool {
        matches!(self, GuardDecision::Execute { .. })
    }

    pub fn notional(&self) -> Decimal {
        match self {
            GuardDecision::Execute { notional, .. }
            | GuardDecision::BelowThreshold { notional, .. }
            | GuardDecision::Simulation { notional, .. } => *notional,
        }
    }
}

impl std::fmt::Display for GuardDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardDecision::Execute { notional, floor } => write!(
                f,
                "executing: notional {} above {}",
                format_decimal(*notional),
                format_decimal(*floor)
            ),
            GuardDecision::BelowThreshold { notional, floor } => write!(
                f,
                "skipped: notional {} not above {}",
                format_decimal(*notional),
                format_decimal(*floor)
            ),
            GuardDecision::Simulation { notional, floor } => write!(
                f,
                "simulation: notional {} against {}, no orders sent",
                format_decimal(*notional),
                format_decimal(*floor)
            ),
        }
    }
}

fn leg_notional(intents: &[OrderIntent], prices: &PositionMap) -> Decimal {
    intents
        .iter()
        .map(|intent| {
            let price = prices
                .get(&intent.instrument_id)
                .map(|p| p.price())
                .unwrap_or(Decimal::ZERO);
            Decimal::from(intent.lots) * price
        })
        .sum()
}

/// Larger of the sell leg (destination prices) and the buy leg (source prices)
pub fn plan_notional(
    sells: &[OrderIntent],
    buys: &[OrderIntent],
    src_positions: &PositionMap,
    dst_positions: &PositionMap,
) -> Decimal {
    leg_notional(sells, dst_positions).max(leg_notional(buys, src_positions))
}

pub fn evaluate(
    sells: &[OrderIntent],
    buys: &[OrderIntent],
    src_positions: &PositionMap,
    dst_positions: &PositionMap,
    dst_effective_total: Decimal,
    config: &SyncConfig,
) -> GuardDecision {
    let notional = plan_notional(sells, buys, src_positions, dst_positions);
    let floor = dst_effective_total * config.threshold();

    if notional <= floor {
        GuardDecision::BelowThreshold { notional, floor }
    } else if config.simulation() {
        GuardDecision::Simulation { notional, floor }
    } else {
        GuardDecision::Execute { notional, floor }
    }
}

pub fn should_execute(
    sells: &[OrderIntent],
    buys: &[OrderIntent],
    src_positions: &PositionMap,
    dst_positions: &PositionMap,
    dst_effective_total: Decimal,
    config: &SyncConfig,
) -> bool {
    evaluate(
        sells,
        buys,
        src_positions,
        dst_positions,
        dst_effective_total,
        config,
    )
    .should_execute()
}
