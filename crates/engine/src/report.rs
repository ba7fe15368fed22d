//! Portfolio reporting
//!
//! Presentation only: everything goes to the `mirror::report` log target.

use log::info;
use mirror_core::{Account, InstrumentSummary, Position, format_decimal};
use mirror_ports::{AccountDirectory, InstrumentDirectory, PortfolioSource};
use rust_decimal::Decimal;

use crate::error::{SyncError, SyncResult};

/// Log target for totals, plans, placed orders and ignored events
pub const REPORT: &str = "mirror::report";

/// Rendered holdings of one account
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReport {
    pub account: Account,
    pub lines: Vec<String>,
    pub total: Decimal,
}

/// Look up an instrument that must match exactly once
pub async fn resolve_instrument<D>(directory: &D, query: &str) -> SyncResult<InstrumentSummary>
where
    D: InstrumentDirectory + ?Sized,
{
    let mut matches = directory.find_instrument(query).await?;
    match matches.len() {
        0 => Err(SyncError::InstrumentNotFound {
            query: query.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        n => Err(SyncError::InstrumentAmbiguous {
            query: query.to_string(),
            matches: n,
        }),
    }
}

/// `CUR - value` for cash, `name(TICKER) - qty - CUR - value` for securities
pub async fn describe_position<D>(directory: &D, position: &Position) -> SyncResult<String>
where
    D: InstrumentDirectory + ?Sized,
{
    if position.is_currency() {
        return Ok(position.value_label());
    }
    let summary = resolve_instrument(directory, position.instrument_id.as_str()).await?;
    Ok(format!(
        "{} - {} - {}",
        summary,
        format_decimal(position.quantity),
        position.value_label()
    ))
}

pub struct Reporter<'a, B: ?Sized> {
    broker: &'a B,
}

impl<'a, B> Reporter<'a, B>
where
    B: AccountDirectory + PortfolioSource + InstrumentDirectory + ?Sized,
{
    pub fn new(broker: &'a B) -> Self {
        Self { broker }
    }

    pub async fn resolve(&self, query: &str) -> SyncResult<InstrumentSummary> {
        resolve_instrument(self.broker, query).await
    }

    pub async fn describe(&self, position: &Position) -> SyncResult<String> {
        describe_position(self.broker, position).await
    }

    pub async fn portfolio(&self, account: &Account) -> SyncResult<PortfolioReport> {
        let positions = self.broker.portfolio(&account.id).await?;

        let mut lines = Vec::with_capacity(positions.len());
        let mut total = Decimal::ZERO;
        for position in &positions {
            lines.push(self.describe(position).await?);
            total += position.value();
        }

        Ok(PortfolioReport {
            account: account.clone(),
            lines,
            total,
        })
    }

    /// Report every account the broker lists
    pub async fn all_portfolios(&self) -> SyncResult<Vec<PortfolioReport>> {
        let accounts = self.broker.accounts().await?;

        let mut reports = Vec::with_capacity(accounts.len());
        for account in &accounts {
            let report = self.portfolio(account).await?;
            info!(target: REPORT, "{}", report.account);
            for line in &report.lines {
                info!(target: REPORT, "  {}", line);
            }
            info!(target: REPORT, "  Total: {}", format_decimal(report.total));
            reports.push(report);
        }
        Ok(reports)
    }
}
