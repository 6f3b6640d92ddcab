use crate::models::ElapsedResponse;
use crate::orders::OrderBook;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared, read-only after start-up; no locking needed.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderBook>,
    pub elapsed: watch::Receiver<Arc<ElapsedResponse>>,
}

impl AppState {
    pub fn new(orders: Arc<OrderBook>, elapsed: watch::Receiver<Arc<ElapsedResponse>>) -> Self {
        Self { orders, elapsed }
    }
}
