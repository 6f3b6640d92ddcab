use crate::elapsed::{elapsed_for, recovery_message};
use crate::models::{ElapsedResponse, LatestOrder};
use crate::orders::OrderBook;
use chrono::{Local, NaiveDateTime};
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info};

pub const TICK: Duration = Duration::from_secs(1);

/// Snapshot of the countdown for the latest order at `now`.
pub fn elapsed_snapshot(book: &OrderBook, now: NaiveDateTime) -> ElapsedResponse {
    match book.latest() {
        Some(order) => {
            let elapsed = elapsed_for(order, now);
            ElapsedResponse {
                latest: Some(LatestOrder::from(order)),
                clock: Some(elapsed.clock()),
                message: Some(recovery_message(elapsed.total_hours).to_string()),
                elapsed: Some(elapsed),
            }
        }
        None => ElapsedResponse {
            latest: None,
            elapsed: None,
            clock: None,
            message: None,
        },
    }
}

/// Recomputes the countdown on a fixed period and publishes it.
///
/// Dropping the handle stops the task.
pub struct ElapsedTicker {
    rx: watch::Receiver<Arc<ElapsedResponse>>,
    task: JoinHandle<()>,
}

impl ElapsedTicker {
    pub fn spawn(book: Arc<OrderBook>, period: Duration) -> Self {
        Self::spawn_with_clock(book, period, || Local::now().naive_local())
    }

    pub fn spawn_with_clock<F>(book: Arc<OrderBook>, period: Duration, clock: F) -> Self
    where
        F: Fn() -> NaiveDateTime + Send + 'static,
    {
        let (tx, rx) = watch::channel(Arc::new(elapsed_snapshot(&book, clock())));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let snapshot = elapsed_snapshot(&book, clock());
                if tx.send(Arc::new(snapshot)).is_err() {
                    debug!("no elapsed subscribers left; ticker exiting");
                    break;
                }
            }
        });

        Self { rx, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ElapsedResponse>> {
        self.rx.clone()
    }

    pub fn current(&self) -> Arc<ElapsedResponse> {
        Arc::clone(&self.rx.borrow())
    }

    pub fn stop(self) {
        info!("stopping elapsed ticker");
        // Drop aborts the task.
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
