//! Bounded queues connecting pipeline stages
//!
//! Thin wrappers over `tokio::sync::mpsc` that keep a depth counter so the
//! health endpoint can report how much work is waiting. A full queue makes
//! the producer wait; nothing is ever dropped on send.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

/// The receiving side of a queue is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} queue closed")]
pub struct QueueClosed(pub &'static str);

#[derive(Debug)]
struct QueueState {
    name: &'static str,
    capacity: usize,
    depth: AtomicUsize,
}

/// Create a bounded queue
///
/// # Panics
/// Panics if `capacity` is zero, like `tokio::sync::mpsc::channel`.
pub fn bounded<T>(name: &'static str, capacity: usize) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = mpsc::channel(capacity);
    let state = Arc::new(QueueState {
        name,
        capacity,
        depth: AtomicUsize::new(0),
    });

    (
        QueueSender {
            tx,
            state: Arc::clone(&state),
        },
        QueueReceiver { rx, state },
    )
}

/// Producer handle; clone it to add producers
#[derive(Debug)]
pub struct QueueSender<T> {
    tx: mpsc::Sender<T>,
    state: Arc<QueueState>,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> QueueSender<T> {
    /// Send an item, waiting while the queue is full
    pub async fn send(&self, item: T) -> Result<(), QueueClosed> {
        let permit = self
            .tx
            .reserve()
            .await
            .map_err(|_| QueueClosed(self.state.name))?;
        // Count before handing over so a concurrent recv never underflows
        self.state.depth.fetch_add(1, Ordering::SeqCst);
        permit.send(item);
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn gauge(&self) -> QueueGauge {
        QueueGauge {
            state: Arc::clone(&self.state),
        }
    }
}

/// Consumer handle
#[derive(Debug)]
pub struct QueueReceiver<T> {
    rx: mpsc::Receiver<T>,
    state: Arc<QueueState>,
}

impl<T> QueueReceiver<T> {
    /// Next item in arrival order; `None` once every sender is gone and the
    /// queue is empty
    pub async fn recv(&mut self) -> Option<T> {
        let item = self.rx.recv().await?;
        self.state.depth.fetch_sub(1, Ordering::SeqCst);
        Some(item)
    }

    pub fn name(&self) -> &'static str {
        self.state.name
    }

    pub fn gauge(&self) -> QueueGauge {
        QueueGauge {
            state: Arc::clone(&self.state),
        }
    }
}

/// Read-only view of a queue's depth
#[derive(Debug, Clone)]
pub struct QueueGauge {
    state: Arc<QueueState>,
}

impl QueueGauge {
    pub fn name(&self) -> &'static str {
        self.state.name
    }

    pub fn capacity(&self) -> usize {
        self.state.capacity
    }

    /// Items sent and not yet received
    pub fn len(&self) -> usize {
        self.state.depth.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> QueueStats {
        QueueStats {
            name: self.name(),
            capacity: self.capacity(),
            len: self.len(),
        }
    }
}

/// Point-in-time queue depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub name: &'static str,
    pub capacity: usize,
    pub len: usize,
}
