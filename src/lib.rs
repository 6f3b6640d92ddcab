pub mod activity;
pub mod app;
pub mod calendar;
pub mod elapsed;
pub mod errors;
pub mod handlers;
pub mod import;
pub mod models;
pub mod orders;
pub mod ranking;
pub mod state;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod ticker;
pub mod ui;

pub use app::router;
pub use orders::OrderBook;
pub use state::AppState;
pub use storage::{load_orders, resolve_data_path};
pub use ticker::ElapsedTicker;
