//! Tokio channel-based position feed for single-process mode
//!
//! Uses a broadcast channel for pub/sub semantics within a single process.
//! No serialization overhead - events are passed directly.

use async_trait::async_trait;
use log::warn;
use mirror_core::{AccountId, PositionEvent};
use mirror_ports::{BrokerError, BrokerResult, PositionSubscription};
use std::collections::HashSet;
use tokio::sync::{RwLock, broadcast};

/// Default buffered events per subscriber
const DEFAULT_CAPACITY: usize = 1000;

/// Broadcast hub for position-change events
///
/// Every subscription sees the events published after it was opened.
/// [`EventBus::disconnect`] drops the current channel so that all open
/// subscriptions end with `StreamClosed`, like a broken broker connection.
pub struct EventBus {
    tx: RwLock<broadcast::Sender<PositionEvent>>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus with the given per-subscriber capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx: RwLock::new(tx),
            capacity,
        }
    }

    /// Publish an event, returning how many subscriptions received it
    pub async fn publish(&self, event: PositionEvent) -> usize {
        // No subscribers is fine
        self.tx.read().await.send(event).unwrap_or(0)
    }

    /// Open a subscription filtered to the given accounts
    pub async fn subscribe(&self, accounts: &[AccountId]) -> ChannelSubscription {
        ChannelSubscription {
            rx: self.tx.read().await.subscribe(),
            accounts: accounts.iter().cloned().collect(),
        }
    }

    /// Tear down every open subscription
    pub async fn disconnect(&self) {
        let (tx, _) = broadcast::channel(self.capacity);
        *self.tx.write().await = tx;
    }

    pub async fn subscriber_count(&self) -> usize {
        self.tx.read().await.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Subscription handed out by [`EventBus`]
pub struct ChannelSubscription {
    rx: broadcast::Receiver<PositionEvent>,
    accounts: HashSet<AccountId>,
}

impl ChannelSubscription {
    /// Payload-less events are always delivered; others only for subscribed accounts
    fn wants(&self, event: &PositionEvent) -> bool {
        match event.account_id() {
            Some(account_id) => self.accounts.contains(account_id),
            None => true,
        }
    }
}

#[async_trait]
impl PositionSubscription for ChannelSubscription {
    async fn next(&mut self) -> BrokerResult<PositionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.wants(&event) => return Ok(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Position subscription lagged, skipped {} events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(BrokerError::StreamClosed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mirror_core::PositionsUpdate;

    fn event_for(account: &str) -> PositionEvent {
        PositionEvent::new(
            Some(PositionsUpdate {
                account_id: AccountId::new(account),
                securities: Vec::new(),
                money: Vec::new(),
            }),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_subscription_filters_accounts() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe(&[AccountId::new("src")]).await;

        bus.publish(event_for("other")).await;
        bus.publish(event_for("src")).await;

        let event = sub.next().await.unwrap();
        assert_eq!(event.account_id(), Some(&AccountId::new("src")));
    }

    #[tokio::test]
    async fn test_payloadless_events_are_delivered() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe(&[AccountId::new("src")]).await;

        bus.publish(PositionEvent::new(None, Utc::now())).await;

        let event = sub.next().await.unwrap();
        assert!(event.position.is_none());
    }

    #[tokio::test]
    async fn test_disconnect_closes_open_subscriptions() {
        let bus = EventBus::new(10);
        let mut old = bus.subscribe(&[AccountId::new("src")]).await;

        bus.disconnect().await;
        assert_eq!(old.next().await.unwrap_err(), BrokerError::StreamClosed);

        // A fresh subscription works again
        let mut fresh = bus.subscribe(&[AccountId::new("src")]).await;
        assert_eq!(bus.publish(event_for("src")).await, 1);
        assert!(fresh.next().await.is_ok());
    }
}
