//! In-memory event bus.

use std::sync::{Mutex, mpsc};

use thiserror::Error;

use crate::bus::{EventBus, Subscription};

#[derive(Debug, Error)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    #[error("event bus lock poisoned")]
    Poisoned,
}

/// In-memory pub/sub bus backed by one `mpsc` channel per subscription.
///
/// Delivery is synchronous and in publish order. Subscriptions whose receiver
/// was dropped are pruned as soon as a publish fails to reach them.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    senders: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }

    /// Live subscriptions as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.senders.lock().map(|senders| senders.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<usize, Self::Error> {
        let mut senders = self.senders.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        // The last subscription takes the message itself; the others get clones.
        let last = senders.len().saturating_sub(1);
        let mut message = Some(message);
        let mut index = 0;
        senders.retain(|tx| {
            let payload = if index == last { message.take() } else { message.clone() };
            index += 1;
            payload.is_some_and(|payload| tx.send(payload).is_ok())
        });

        Ok(senders.len())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock still hands out a subscription; it just never fires.
        if let Ok(mut senders) = self.senders.lock() {
            senders.push(tx);
        }

        Subscription::new(rx)
    }
}
