use crate::import::dispatcher::CollectionRefresh;
use crate::import::wizard::WizardState;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};
use tokio::sync::mpsc as tokio_mpsc;
use tracing::debug;

type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Update published by the wizard service
#[derive(Debug, Clone, PartialEq)]
pub enum WizardUpdate {
    /// The active session moved or changed settings
    StateChanged(WizardState),
    /// Message for the user; errors cross the service boundary as text
    Notice { level: NoticeLevel, message: String },
    /// The session ended. `refresh` is set when an import went through.
    Closed { refresh: Option<CollectionRefresh> },
}

/// Broadcasts wizard updates to every live subscriber
#[derive(Clone)]
pub struct WizardUpdates {
    subscriptions: Arc<Mutex<HashMap<SubscriptionId, tokio_mpsc::UnboundedSender<WizardUpdate>>>>,
    next_id: Arc<AtomicU64>,
}

impl WizardUpdates {
    /// Spawn the task that forwards service updates to subscribers
    pub fn new(
        mut update_rx: tokio_mpsc::UnboundedReceiver<WizardUpdate>,
        runtime_handle: tokio::runtime::Handle,
    ) -> Self {
        let subscriptions: Arc<Mutex<HashMap<SubscriptionId, _>>> =
            Arc::new(Mutex::new(HashMap::new()));
        let subscriptions_clone = subscriptions.clone();

        runtime_handle.spawn(async move {
            while let Some(update) = update_rx.recv().await {
                let mut subs = subscriptions_clone.lock().unwrap();

                // A failed send means the receiver was dropped
                subs.retain(|_, tx: &mut tokio_mpsc::UnboundedSender<WizardUpdate>| {
                    tx.send(update.clone()).is_ok()
                });
            }
            debug!("Wizard update channel closed");
        });

        Self {
            subscriptions,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Receive every update published from now on.
    /// The subscription is removed once the receiver is dropped.
    pub fn subscribe(&self) -> tokio_mpsc::UnboundedReceiver<WizardUpdate> {
        let (tx, rx) = tokio_mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        self.subscriptions.lock().unwrap().insert(id, tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(message: &str) -> WizardUpdate {
        WizardUpdate::Notice {
            level: NoticeLevel::Info,
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_updates() {
        let (tx, rx) = tokio_mpsc::unbounded_channel();
        let updates = WizardUpdates::new(rx, tokio::runtime::Handle::current());
        let mut first = updates.subscribe();
        let mut second = updates.subscribe();

        tx.send(notice("hello")).unwrap();

        assert_eq!(first.recv().await, Some(notice("hello")));
        assert_eq!(second.recv().await, Some(notice("hello")));
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_removed() {
        let (tx, rx) = tokio_mpsc::unbounded_channel();
        let updates = WizardUpdates::new(rx, tokio::runtime::Handle::current());
        let dropped = updates.subscribe();
        let mut kept = updates.subscribe();
        drop(dropped);

        tx.send(notice("one")).unwrap();
        assert_eq!(kept.recv().await, Some(notice("one")));

        assert_eq!(updates.subscriptions.lock().unwrap().len(), 1);
    }
}
