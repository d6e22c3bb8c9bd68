//! Background-task handoff streams.
//!
//! A [`TaskStream`] is the consumer half of a single background task that
//! writes into a bounded queue. The task receives an [`Outlet`], which is the
//! only writer. The task's cancellation token is a child of the caller's
//! token, and the stream holds a drop guard for it: cancelling the caller's
//! token or dropping the stream both stop the task at its next suspension
//! point. Once the token fires the stream yields `None`, even when items
//! are still queued.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Writer half handed to the background task.
#[derive(Debug)]
pub struct Outlet<T> {
    tx: mpsc::Sender<T>,
    cancel: CancellationToken,
}

impl<T> Outlet<T> {
    /// Hand one item to the consumer.
    ///
    /// Waits for queue space. Returns `false` when the task should stop:
    /// the token was cancelled or the consumer is gone.
    pub async fn emit(&self, item: T) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            sent = self.tx.send(item) => sent.is_ok(),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Consumer half of a background producer task.
#[derive(Debug)]
pub struct TaskStream<T> {
    rx: mpsc::Receiver<T>,
    task: JoinHandle<()>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl<T: Send + 'static> TaskStream<T> {
    /// Spawn `producer` with a queue of `capacity` slots (at least one).
    pub fn spawn<F, Fut>(capacity: usize, parent: &CancellationToken, producer: F) -> Self
    where
        F: FnOnce(Outlet<T>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let cancel = parent.child_token();
        let outlet = Outlet {
            tx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(producer(outlet));

        Self {
            rx,
            task,
            _guard: cancel.clone().drop_guard(),
            cancel,
        }
    }
}

impl<T> TaskStream<T> {
    /// Stop the producer and end the stream. Queued items are discarded.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the producer task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Receive the next item, or `None` once the producer is done or the
    /// token has fired.
    pub async fn recv(&mut self) -> Option<T> {
        futures::future::poll_fn(|cx| self.poll_item(cx)).await
    }

    fn poll_item(&mut self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        if self.cancel.is_cancelled() {
            self.rx.close();
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            // The token may have fired while the item sat in the queue.
            Poll::Ready(Some(_)) if self.cancel.is_cancelled() => {
                self.rx.close();
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl<T> Stream for TaskStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.poll_item(cx)
    }
}
