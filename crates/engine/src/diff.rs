//! Position Diff Engine
//!
//! Turns the gap between destination holdings and scaled source holdings into
//! lot-sized order intents. Instruments that are not in normal trading are
//! left alone whatever the gap.
//!
//! Lot rounding is half-to-even: `round(quantity / lot)` with
//! [`RoundingStrategy::MidpointNearestEven`], so 2.5 lots become 2 and 3.5 lots
//! become 4.

use indexmap::IndexMap;
use log::{debug, info};
use mirror_core::{Instrument, InstrumentId, OrderIntent, Quantity, format_decimal};
use mirror_ports::InstrumentDirectory;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::error::SyncResult;
use crate::ratio::PositionMap;
use crate::report::REPORT;

/// Desired destination quantity per instrument
pub type TargetMap = IndexMap<InstrumentId, Quantity>;

/// Instruments fetched for the current cycle
pub type InstrumentBook = HashMap<InstrumentId, Instrument>;

/// Scale every source holding by the ratio
pub fn target_positions(src_positions: &PositionMap, ratio: Decimal) -> TargetMap {
    src_positions
        .iter()
        .map(|(uid, position)| (uid.clone(), position.quantity * ratio))
        .collect()
}

/// Whole lots in `quantity`, rounded half-to-even
///
/// Non-positive quantities give nothing; counts beyond `u64` saturate.
pub fn lots_for(quantity: Quantity, lot_size: Decimal) -> u64 {
    if quantity <= Decimal::ZERO || lot_size <= Decimal::ZERO {
        return 0;
    }
    // Positive here, so a failed conversion can only be an overflow
    (quantity / lot_size)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_u64()
        .unwrap_or(u64::MAX)
}

/// Fetch every instrument the cycle may trade
///
/// Looked up fresh each cycle since trading status changes during the day.
pub async fn load_instruments<D>(
    directory: &D,
    ids: Vec<InstrumentId>,
) -> SyncResult<InstrumentBook>
where
    D: InstrumentDirectory + ?Sized,
{
    let mut book = InstrumentBook::new();
    for uid in ids {
        if book.contains_key(&uid) {
            continue;
        }
        let instrument = directory.instrument_by_uid(&uid).await?;
        book.insert(uid, instrument);
    }
    Ok(book)
}

fn tradable<'a>(book: &'a InstrumentBook, uid: &InstrumentId) -> Option<&'a Instrument> {
    let Some(instrument) = book.get(uid) else {
        debug!("No instrument data for {}, skipping", uid);
        return None;
    };
    if !instrument.is_normal_trading() {
        debug!(
            "Skipping {}: trading status {:?}",
            instrument, instrument.trading_status
        );
        return None;
    }
    Some(instrument)
}

/// Sell what the destination holds beyond its targets
///
/// Holdings without a target are sold out entirely. Emission follows the
/// destination snapshot order.
pub fn plan_sells(
    dst_positions: &PositionMap,
    targets: &TargetMap,
    book: &InstrumentBook,
) -> Vec<OrderIntent> {
    let mut intents = Vec::new();

    for (uid, position) in dst_positions {
        let Some(instrument) = tradable(book, uid) else {
            continue;
        };

        let excess = match targets.get(uid) {
            Some(target) if *target < position.quantity => position.quantity - *target,
            Some(_) => continue,
            None => position.quantity,
        };

        let lots = lots_for(excess, instrument.lot_size());
        if lots > 0 {
            info!(
                target: REPORT,
                "Sell {} lots of {} (excess {})",
                lots,
                instrument,
                format_decimal(excess)
            );
            intents.push(OrderIntent::sell(uid.clone(), lots));
        }
    }

    intents
}

/// Buy what the destination lacks against its targets
///
/// Emission follows the target (source snapshot) order. Source prices give the
/// estimated cost in the report.
pub fn plan_buys(
    src_positions: &PositionMap,
    dst_positions: &PositionMap,
    targets: &TargetMap,
    book: &InstrumentBook,
) -> Vec<OrderIntent> {
    let mut intents = Vec::new();

    for (uid, target) in targets {
        let Some(instrument) = tradable(book, uid) else {
            continue;
        };

        let shortfall = match dst_positions.get(uid) {
            Some(held) if *target > held.quantity => *target - held.quantity,
            Some(_) => continue,
            None => *target,
        };

        let lots = lots_for(shortfall, instrument.lot_size());
        if lots > 0 {
            let estimate = src_positions
                .get(uid)
                .map(|p| p.price() * Decimal::from(lots) * instrument.lot_size())
                .unwrap_or(Decimal::ZERO);
            info!(
                target: REPORT,
                "Buy {} lots of {} (shortfall {}, about {})",
                lots,
                instrument,
                format_decimal(shortfall),
                format_decimal(estimate)
            );
            intents.push(OrderIntent::buy(uid.clone(), lots));
        }
    }

    intents
}
