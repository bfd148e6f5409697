//! Publish/subscribe abstraction (mechanics only).
//!
//! The bus is how state holders tell their consumers that something changed.
//! It replaces framework-specific context providers: a consumer holds a
//! [`Subscription`] and drains it whenever it wants to re-render.
//!
//! - **Broadcast**: every subscription receives a copy of every message
//!   published after it was created.
//! - **No persistence**: messages published before `subscribe()` are not replayed.
//! - **Ordering**: messages from a single publisher arrive in publish order.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a message stream.
///
/// ```ignore
/// let changes = store.subscribe();
///
/// while let Ok(change) = changes.try_recv() {
///     render(&change.cart);
/// }
/// ```
///
/// A subscription is meant to be drained by one consumer. Dropping it
/// unsubscribes; the bus prunes dead subscribers on the next publish.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Transport-agnostic pub/sub bus.
///
/// `publish()` reports how many live subscriptions the message reached.
/// It can fail (e.g. internal lock poisoning). Publishers decide
/// whether that is fatal; for change notification it never is, because the
/// state itself has already been committed.
///
/// Implementations must be `Send + Sync` so a single bus can be shared by
/// every handle of the state holder.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<usize, Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<usize, Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
