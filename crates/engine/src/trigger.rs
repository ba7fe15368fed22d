//! Trigger Filter
//!
//! Decides which position-change events start a sync cycle. Only "settlement
//! finished" states of either leg qualify:
//!
//! - source account, at least one security line, none of them blocked
//! - destination account, no security lines, cash present and none of it blocked

use mirror_core::{AccountId, PositionEvent, PositionsUpdate, SecurityLine};

pub fn is_actionable(event: &PositionEvent, src: &AccountId, dst: &AccountId) -> bool {
    let Some(update) = event.position.as_ref() else {
        return false;
    };

    (&update.account_id == src && source_settled(update))
        || (&update.account_id == dst && destination_settled(update))
}

fn source_settled(update: &PositionsUpdate) -> bool {
    !update.securities.is_empty() && update.securities.iter().all(SecurityLine::is_unblocked)
}

fn destination_settled(update: &PositionsUpdate) -> bool {
    update.securities.is_empty()
        && !update.money.is_empty()
        && update.money.iter().all(|line| line.blocked.is_zero())
}
