//! Paper broker - in-memory implementation of every broker port

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use log::{debug, info};
use mirror_core::{
    Account, AccountId, Direction, Instrument, InstrumentId, InstrumentKind, InstrumentSummary,
    Money, MoneyLine, OrderId, Position, PositionEvent, PositionsUpdate, SecurityLine,
    TradingStatus,
};
use mirror_ports::{
    AccountDirectory, BrokerError, BrokerResult, InstrumentDirectory, OrderGateway, OrderRequest,
    PortfolioSource, PositionStream, PositionSubscription,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::seed::PaperSeed;
use crate::error::SeedError;
use crate::transport::channel::EventBus;

/// Holdings of one paper account, in broker order
#[derive(Debug, Clone)]
struct PaperAccount {
    name: String,
    lines: IndexMap<InstrumentId, Position>,
}

impl PaperAccount {
    fn quantity(&self, uid: &InstrumentId) -> Decimal {
        self.lines
            .get(uid)
            .map(|p| p.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    fn adjust(
        &mut self,
        account_id: &AccountId,
        uid: &InstrumentId,
        kind: InstrumentKind,
        price: Money,
        delta: Decimal,
    ) {
        let line = self.lines.entry(uid.clone()).or_insert_with(|| {
            Position::new(account_id.clone(), uid.clone(), kind, Decimal::ZERO, price)
        });
        line.quantity += delta;

        // Flat security lines disappear, cash lines stay
        if line.quantity.is_zero() && !kind.is_currency() {
            self.lines.shift_remove(uid);
        }
    }

    fn credit_cash(&mut self, account_id: &AccountId, currency: &str, amount: Decimal) {
        self.adjust(
            account_id,
            &InstrumentId::new(currency),
            InstrumentKind::Currency,
            Money::new(currency, 1, 0),
            amount,
        );
    }

    fn update(&self, account_id: &AccountId) -> PositionsUpdate {
        let securities = self
            .lines
            .values()
            .filter(|p| !p.is_currency())
            .map(|p| SecurityLine {
                instrument_id: p.instrument_id.clone(),
                balance: p.quantity.trunc().to_i64().unwrap_or_default(),
                blocked: 0,
            })
            .collect();
        let money = self
            .lines
            .values()
            .filter(|p| p.is_currency())
            .map(|p| MoneyLine {
                available: Money::from_decimal(p.currency(), p.quantity)
                    .unwrap_or_else(|| Money::zero(p.currency())),
                blocked: Money::zero(p.currency()),
            })
            .collect();

        PositionsUpdate {
            account_id: account_id.clone(),
            securities,
            money,
        }
    }
}

/// Failures to inject on the next calls
#[derive(Debug, Default)]
struct PendingFailures {
    portfolio: u32,
    subscribe: u32,
}

fn take_failure(counter: &mut u32) -> bool {
    if *counter > 0 {
        *counter -= 1;
        true
    } else {
        false
    }
}

#[derive(Debug, Default)]
struct PaperState {
    accounts: IndexMap<AccountId, PaperAccount>,
    instruments: IndexMap<InstrumentId, Instrument>,
    prices: HashMap<InstrumentId, Money>,
    orders: Vec<(OrderId, OrderRequest)>,
    failures: PendingFailures,
}

impl PaperState {
    fn from_seed(seed: PaperSeed) -> Result<Self, SeedError> {
        let mut state = PaperState::default();

        for inst in seed.instruments {
            let uid = InstrumentId::new(inst.uid);
            let price = Money::from_decimal(inst.currency.as_str(), inst.price)
                .ok_or_else(|| SeedError::Invalid(format!("price of {} out of range", uid)))?;
            state.prices.insert(uid.clone(), price);
            state.instruments.insert(
                uid.clone(),
                Instrument {
                    uid,
                    name: inst.name,
                    ticker: inst.ticker,
                    kind: inst.kind,
                    lot: inst.lot,
                    trading_status: inst.trading_status,
                },
            );
        }

        for acc in seed.accounts {
            let account_id = AccountId::new(acc.id);
            if state.accounts.contains_key(&account_id) {
                return Err(SeedError::DuplicateAccount(account_id.0));
            }
            let mut account = PaperAccount {
                name: acc.name,
                lines: IndexMap::new(),
            };
            for (currency, amount) in acc.cash {
                account.credit_cash(&account_id, &currency, amount);
            }
            for pos in acc.positions {
                let uid = InstrumentId::new(pos.instrument);
                let (Some(instrument), Some(price)) =
                    (state.instruments.get(&uid), state.prices.get(&uid))
                else {
                    return Err(SeedError::UnknownInstrument {
                        account: account_id.0,
                        instrument: uid.0,
                    });
                };
                account.adjust(
                    &account_id,
                    &uid,
                    instrument.kind,
                    price.clone(),
                    pos.quantity,
                );
            }
            state.accounts.insert(account_id, account);
        }

        Ok(state)
    }

    fn account_mut(&mut self, account_id: &AccountId) -> BrokerResult<&mut PaperAccount> {
        self.accounts
            .get_mut(account_id)
            .ok_or_else(|| BrokerError::NotFound(format!("account {}", account_id)))
    }

    /// Fill an order immediately at the current price
    fn fill(&mut self, request: &OrderRequest) -> BrokerResult<PositionsUpdate> {
        let intent = &request.intent;
        if intent.lots == 0 {
            return Err(BrokerError::Rejected("order for zero lots".to_string()));
        }

        let instrument = self
            .instruments
            .get(&intent.instrument_id)
            .cloned()
            .ok_or_else(|| BrokerError::NotFound(format!("instrument {}", intent.instrument_id)))?;
        if !instrument.is_normal_trading() {
            return Err(BrokerError::Rejected(format!(
                "{} is not available for trading ({:?})",
                instrument, instrument.trading_status
            )));
        }
        let price = self
            .prices
            .get(&instrument.uid)
            .cloned()
            .ok_or_else(|| BrokerError::Rejected(format!("no price for {}", instrument)))?;

        let units = Decimal::from(intent.lots) * instrument.lot_size();
        let amount = units * price.to_decimal();
        let cash_id = InstrumentId::new(price.currency.as_str());
        let account_id = request.account_id.clone();
        let account = self.account_mut(&account_id)?;

        match intent.direction {
            Direction::Buy => {
                let cash = account.quantity(&cash_id);
                if cash < amount {
                    return Err(BrokerError::Rejected(format!(
                        "insufficient funds: need {} {}, have {}",
                        amount, price.currency, cash
                    )));
                }
                account.credit_cash(&account_id, &price.currency, -amount);
                account.adjust(&account_id, &instrument.uid, instrument.kind, price.clone(), units);
            }
            Direction::Sell => {
                let held = account.quantity(&instrument.uid);
                if held < units {
                    return Err(BrokerError::Rejected(format!(
                        "insufficient position in {}: need {}, have {}",
                        instrument, units, held
                    )));
                }
                account.adjust(&account_id, &instrument.uid, instrument.kind, price.clone(), -units);
                account.credit_cash(&account_id, &price.currency, amount);
            }
        }

        Ok(account.update(&account_id))
    }
}

/// In-memory broker
///
/// Implements every port the engine consumes. Orders fill instantly and
/// completely at the instrument's current price, so after each fill the
/// account's position-change event carries no blocked quantities.
pub struct PaperBroker {
    state: RwLock<PaperState>,
    bus: EventBus,
}

impl PaperBroker {
    /// Create a broker from a seed
    pub fn from_seed(seed: PaperSeed) -> Result<Self, SeedError> {
        let state = PaperState::from_seed(seed)?;
        info!(
            "Paper broker ready: {} accounts, {} instruments",
            state.accounts.len(),
            state.instruments.len()
        );
        Ok(Self {
            state: RwLock::new(state),
            bus: EventBus::default(),
        })
    }

    /// Create a broker from a JSON seed file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        Self::from_seed(PaperSeed::from_file(path)?)
    }

    /// Change an instrument's trading status
    pub async fn set_trading_status(
        &self,
        uid: &InstrumentId,
        status: TradingStatus,
    ) -> BrokerResult<()> {
        let mut state = self.state.write().await;
        let instrument = state
            .instruments
            .get_mut(uid)
            .ok_or_else(|| BrokerError::NotFound(format!("instrument {}", uid)))?;
        instrument.trading_status = status;
        Ok(())
    }

    /// Move an instrument's current price
    pub async fn set_price(&self, uid: &InstrumentId, price: Money) -> BrokerResult<()> {
        let mut state = self.state.write().await;
        if !state.instruments.contains_key(uid) {
            return Err(BrokerError::NotFound(format!("instrument {}", uid)));
        }
        state.prices.insert(uid.clone(), price);
        Ok(())
    }

    /// Publish a raw event on the position feed
    pub async fn publish(&self, event: PositionEvent) -> usize {
        self.bus.publish(event).await
    }

    /// Break every open position subscription
    pub async fn disconnect_streams(&self) {
        self.bus.disconnect().await;
    }

    /// Number of currently open position subscriptions
    pub async fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count().await
    }

    /// Make the next `count` portfolio requests fail with a transport error
    pub async fn fail_next_portfolio_requests(&self, count: u32) {
        self.state.write().await.failures.portfolio = count;
    }

    /// Make the next `count` subscription attempts fail with a transport error
    pub async fn fail_next_subscriptions(&self, count: u32) {
        self.state.write().await.failures.subscribe = count;
    }

    /// Quantity of an instrument (or cash, by currency code) held by an account
    pub async fn quantity_of(&self, account_id: &AccountId, uid: &InstrumentId) -> Decimal {
        self.state
            .read()
            .await
            .accounts
            .get(account_id)
            .map(|a| a.quantity(uid))
            .unwrap_or(Decimal::ZERO)
    }

    /// Every order accepted so far, in submission order
    pub async fn submitted_orders(&self) -> Vec<(OrderId, OrderRequest)> {
        self.state.read().await.orders.clone()
    }
}

#[async_trait]
impl PortfolioSource for PaperBroker {
    async fn portfolio(&self, account_id: &AccountId) -> BrokerResult<Vec<Position>> {
        let mut state = self.state.write().await;
        if take_failure(&mut state.failures.portfolio) {
            return Err(BrokerError::Transport("injected portfolio failure".to_string()));
        }

        let account = state
            .accounts
            .get(account_id)
            .ok_or_else(|| BrokerError::NotFound(format!("account {}", account_id)))?;
        let positions = account
            .lines
            .values()
            .map(|line| {
                let mut line = line.clone();
                if let Some(price) = state.prices.get(&line.instrument_id) {
                    line.current_price = price.clone();
                }
                line
            })
            .collect();
        Ok(positions)
    }
}

#[async_trait]
impl InstrumentDirectory for PaperBroker {
    async fn find_instrument(&self, query: &str) -> BrokerResult<Vec<InstrumentSummary>> {
        let state = self.state.read().await;

        // Uid, ticker and name hits are all candidates; callers decide on ambiguity
        let uid = InstrumentId::new(query);
        let needle = query.to_lowercase();
        Ok(state
            .instruments
            .values()
            .filter(|i| {
                i.uid == uid
                    || i.ticker.eq_ignore_ascii_case(query)
                    || i.name.to_lowercase().contains(&needle)
            })
            .map(Instrument::summary)
            .collect())
    }

    async fn instrument_by_uid(&self, uid: &InstrumentId) -> BrokerResult<Instrument> {
        self.state
            .read()
            .await
            .instruments
            .get(uid)
            .cloned()
            .ok_or_else(|| BrokerError::NotFound(format!("instrument {}", uid)))
    }
}

#[async_trait]
impl OrderGateway for PaperBroker {
    async fn submit_order(&self, request: &OrderRequest) -> BrokerResult<OrderId> {
        let (order_id, update) = {
            let mut state = self.state.write().await;
            let update = state.fill(request)?;
            let order_id = OrderId::new(Uuid::new_v4().to_string());
            state.orders.push((order_id.clone(), request.clone()));
            (order_id, update)
        };
        debug!("Paper fill {} on {}: {}", order_id, request.account_id, request.intent);

        self.bus
            .publish(PositionEvent::new(Some(update), Utc::now()))
            .await;
        Ok(order_id)
    }
}

#[async_trait]
impl PositionStream for PaperBroker {
    async fn subscribe(
        &self,
        accounts: &[AccountId],
    ) -> BrokerResult<Box<dyn PositionSubscription>> {
        {
            let mut state = self.state.write().await;
            if take_failure(&mut state.failures.subscribe) {
                return Err(BrokerError::Transport("injected subscription failure".to_string()));
            }
            if let Some(unknown) = accounts.iter().find(|id| !state.accounts.contains_key(*id)) {
                return Err(BrokerError::NotFound(format!("account {}", unknown)));
            }
        }
        Ok(Box::new(self.bus.subscribe(accounts).await))
    }
}

#[async_trait]
impl AccountDirectory for PaperBroker {
    async fn accounts(&self) -> BrokerResult<Vec<Account>> {
        Ok(self
            .state
            .read()
            .await
            .accounts
            .iter()
            .map(|(id, acc)| Account {
                id: id.clone(),
                name: acc.name.clone(),
            })
            .collect())
    }
}
