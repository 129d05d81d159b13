//! Live, re-emitting contact queries
//!
//! A `LiveQuery` owns a background task that emits the complete ordered
//! contact list once on start and again after every change notification
//! from its store. Dropping the query aborts the task, so nothing it
//! fetched afterwards can reach the consumer.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::error::StorageResult;
use crate::types::{Contact, SortOrder};

/// Emissions buffered before the refresh task waits on the consumer
const EMISSION_BUFFER: usize = 16;

/// Subscription to one ordered view of the contact table
pub struct LiveQuery {
    order: SortOrder,
    receiver: mpsc::Receiver<Vec<Contact>>,
    task: JoinHandle<()>,
}

impl LiveQuery {
    /// Start a live query
    ///
    /// `changes` must be subscribed before this call returns to the caller's
    /// store operation, so that no change between the first fetch and the
    /// first wait is missed. `fetch` is called once per emission.
    pub fn spawn<F, Fut>(order: SortOrder, changes: broadcast::Receiver<()>, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = StorageResult<Vec<Contact>>> + Send + 'static,
    {
        let (tx, receiver) = mpsc::channel(EMISSION_BUFFER);
        let task = tokio::spawn(refresh_loop(order, changes, tx, fetch));

        tracing::debug!(%order, "Live query started");
        Self {
            order,
            receiver,
            task,
        }
    }

    /// Order this query emits in
    pub fn order(&self) -> SortOrder {
        self.order
    }

}

/// Yields the full ordered list on every emission; ends once the store has
/// shut down.
impl Stream for LiveQuery {
    type Item = Vec<Contact>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for LiveQuery {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!(order = %self.order, "Live query cancelled");
    }
}

async fn refresh_loop<F, Fut>(
    order: SortOrder,
    mut changes: broadcast::Receiver<()>,
    tx: mpsc::Sender<Vec<Contact>>,
    fetch: F,
) where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = StorageResult<Vec<Contact>>> + Send + 'static,
{
    loop {
        match fetch().await {
            Ok(contacts) => {
                if tx.send(contacts).await.is_err() {
                    // Consumer went away
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(%order, error = %e, "Live query refresh failed");
            }
        }

        match changes.recv().await {
            Ok(()) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(%order, skipped, "Live query lagged behind store changes");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }

        // One re-query covers every change already queued
        while changes.try_recv().is_ok() {}
    }
}
