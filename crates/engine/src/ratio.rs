//! Ratio Calculator
//!
//! Sizes the destination against the source:
//!
//! ```text
//! src_total           = Σ value of tradable source positions
//! dst_total           = Σ value of every destination position (cash included)
//! dst_effective_total = dst_total × (1 − reserve)
//! ratio               = dst_effective_total / src_total
//! ```
//!
//! Position values are already rounded to 9 fractional digits, so the sums stay
//! at the broker's resolution.

use indexmap::IndexMap;
use log::info;
use mirror_core::{AccountId, InstrumentId, Position, format_decimal};
use mirror_ports::{InstrumentDirectory, PortfolioSource};
use rust_decimal::Decimal;

use crate::error::{SyncError, SyncResult};
use crate::report::{REPORT, describe_position};

/// Tradable positions of one account keyed by instrument, in snapshot order
pub type PositionMap = IndexMap<InstrumentId, Position>;

/// Both snapshots and the sizing derived from them
#[derive(Debug, Clone, PartialEq)]
pub struct RatioSnapshot {
    pub src_positions: PositionMap,
    pub dst_positions: PositionMap,
    pub src_total: Decimal,
    pub dst_total: Decimal,
    pub dst_effective_total: Decimal,
    pub ratio: Decimal,
}

/// Fetch both portfolios, report them and compute the ratio
///
/// Every security line is reported under its instrument name, so a lookup
/// that is missing or ambiguous aborts the cycle.
pub async fn compute_ratio<B>(
    broker: &B,
    src: &AccountId,
    dst: &AccountId,
    reserve: Decimal,
) -> SyncResult<RatioSnapshot>
where
    B: PortfolioSource + InstrumentDirectory + ?Sized,
{
    let src_snapshot = broker.portfolio(src).await?;
    let dst_snapshot = broker.portfolio(dst).await?;
    report_snapshot(broker, src, &src_snapshot).await?;
    report_snapshot(broker, dst, &dst_snapshot).await?;
    ratio_from_snapshots(src, src_snapshot, dst_snapshot, reserve)
}

async fn report_snapshot<D>(
    directory: &D,
    account: &AccountId,
    positions: &[Position],
) -> SyncResult<()>
where
    D: InstrumentDirectory + ?Sized,
{
    for position in positions {
        let line = describe_position(directory, position).await?;
        info!(target: REPORT, "{} {}", account, line);
    }
    Ok(())
}

/// Pure half of [`compute_ratio`]
pub fn ratio_from_snapshots(
    src: &AccountId,
    src_snapshot: Vec<Position>,
    dst_snapshot: Vec<Position>,
    reserve: Decimal,
) -> SyncResult<RatioSnapshot> {
    let mut src_positions = PositionMap::new();
    let mut src_total = Decimal::ZERO;
    for position in src_snapshot {
        if position.is_currency() {
            continue;
        }
        src_total += position.value();
        src_positions.insert(position.instrument_id.clone(), position);
    }

    let mut dst_positions = PositionMap::new();
    let mut dst_total = Decimal::ZERO;
    for position in dst_snapshot {
        dst_total += position.value();
        if !position.is_currency() {
            dst_positions.insert(position.instrument_id.clone(), position);
        }
    }

    info!(target: REPORT, "Source total: {}", format_decimal(src_total));
    info!(target: REPORT, "Destination total: {}", format_decimal(dst_total));

    if src_total.is_zero() {
        return Err(SyncError::EmptySourcePortfolio {
            account: src.clone(),
        });
    }

    let dst_effective_total = dst_total * (Decimal::ONE - reserve);
    let ratio = dst_effective_total
        .checked_div(src_total)
        .ok_or(SyncError::RatioOverflow {
            src_total,
            dst_effective_total,
        })?;

    info!(
        target: REPORT,
        "Ratio: {} (destination after reserve: {})",
        format_decimal(ratio),
        format_decimal(dst_effective_total)
    );

    Ok(RatioSnapshot {
        src_positions,
        dst_positions,
        src_total,
        dst_total,
        dst_effective_total,
        ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_core::{InstrumentKind, Money};
    use rust_decimal_macros::dec;

    fn security(account: &str, uid: &str, quantity: Decimal, price: Money) -> Position {
        Position::new(
            AccountId::new(account),
            InstrumentId::new(uid),
            InstrumentKind::Share,
            quantity,
            price,
        )
    }

    fn cash(account: &str, amount: Decimal) -> Position {
        Position::new(
            AccountId::new(account),
            InstrumentId::new("RUB"),
            InstrumentKind::Currency,
            amount,
            Money::new("RUB", 1, 0),
        )
    }

    #[test]
    fn test_scenario_ratio() {
        // 100 units of X @ 1.2 against 240 of cash, 238.8 after a 0.5% reserve
        let src = vec![
            cash("src", dec!(5)),
            security("src", "X", dec!(100), Money::new("RUB", 1, 200_000_000)),
        ];
        let dst = vec![cash("dst", dec!(240))];

        let snapshot =
            ratio_from_snapshots(&AccountId::new("src"), src, dst, dec!(0.005)).unwrap();

        assert_eq!(snapshot.src_total, dec!(120));
        assert_eq!(snapshot.dst_total, dec!(240));
        assert_eq!(snapshot.dst_effective_total, dec!(238.8));
        assert_eq!(snapshot.ratio, dec!(1.99));
        assert_eq!(snapshot.src_positions.len(), 1);
        assert!(snapshot.dst_positions.is_empty());
    }

    #[test]
    fn test_ratio_times_source_is_effective_destination() {
        let src = vec![
            security("src", "A", dec!(3), Money::new("RUB", 7, 0)),
            security("src", "B", dec!(11), Money::new("RUB", 0, 130_000_000)),
        ];
        let dst = vec![
            cash("dst", dec!(100)),
            security("dst", "A", dec!(1), Money::new("RUB", 7, 0)),
        ];

        let snapshot = ratio_from_snapshots(&AccountId::new("src"), src, dst, dec!(0.01)).unwrap();

        let diff = (snapshot.ratio * snapshot.src_total - snapshot.dst_effective_total).abs();
        assert!(diff < dec!(0.000000001));
        assert_eq!(snapshot.dst_total, dec!(107));
        assert_eq!(
            snapshot.dst_positions.keys().collect::<Vec<_>>(),
            vec![&InstrumentId::new("A")]
        );
    }

    #[test]
    fn test_all_currency_source_is_empty() {
        let err = ratio_from_snapshots(
            &AccountId::new("src"),
            vec![cash("src", dec!(1000))],
            vec![cash("dst", dec!(10))],
            dec!(0.01),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SyncError::EmptySourcePortfolio {
                account: AccountId::new("src")
            }
        );
    }

    #[test]
    fn test_empty_source_is_empty() {
        let err =
            ratio_from_snapshots(&AccountId::new("src"), Vec::new(), Vec::new(), dec!(0))
                .unwrap_err();
        assert!(matches!(err, SyncError::EmptySourcePortfolio { .. }));
    }

    #[test]
    fn test_ratio_beyond_decimal_range_is_an_overflow() {
        // 10^20 of cash against a source worth 10^-9
        let src = vec![security("src", "A", dec!(1), Money::new("RUB", 0, 1))];
        let dst = vec![cash("dst", Decimal::from(10u64.pow(19)) * dec!(10))];

        let err = ratio_from_snapshots(&AccountId::new("src"), src, dst, dec!(0)).unwrap_err();
        assert!(matches!(err, SyncError::RatioOverflow { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_snapshot_order_is_preserved() {
        let src = vec![
            security("src", "C", dec!(1), Money::new("RUB", 1, 0)),
            security("src", "A", dec!(1), Money::new("RUB", 1, 0)),
            security("src", "B", dec!(1), Money::new("RUB", 1, 0)),
        ];
        let snapshot =
            ratio_from_snapshots(&AccountId::new("src"), src, Vec::new(), dec!(0)).unwrap();

        let order: Vec<_> = snapshot.src_positions.keys().map(|k| k.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        assert_eq!(snapshot.ratio, Decimal::ZERO);
    }
}
