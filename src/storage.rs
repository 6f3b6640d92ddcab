use crate::errors::AppError;
use crate::models::OrdersFile;
use crate::orders::OrderBook;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("ORDERS_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/orders.json")
}

/// Reads the orders document; a missing or unreadable file yields an empty book.
pub async fn load_orders(path: &Path) -> OrderBook {
    let file = match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<OrdersFile>(&bytes) {
            Ok(file) => file,
            Err(err) => {
                error!("failed to parse orders file {}: {err}", path.display());
                OrdersFile::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("orders file {} not found; starting empty", path.display());
            OrdersFile::default()
        }
        Err(err) => {
            error!("failed to read orders file {}: {err}", path.display());
            OrdersFile::default()
        }
    };

    let book = OrderBook::from_file(file);
    info!(orders = book.len(), "loaded orders from {}", path.display());
    book
}

pub async fn write_orders(path: &Path, file: &OrdersFile) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(file).map_err(AppError::internal)?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        env::temp_dir().join(format!("order_dashboard_{name}_{}_{nanos}.json", std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let book = load_orders(&temp_path("missing")).await;
        assert!(book.is_empty());
    }

    #[tokio::test]
    async fn garbage_file_loads_empty() {
        let path = temp_path("garbage");
        fs::write(&path, b"{ not json").await.unwrap();
        let book = load_orders(&path).await;
        assert!(book.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn document_round_trips_through_disk() {
        let path = temp_path("written");
        let document: OrdersFile = serde_json::from_value(serde_json::json!({
            "lastUpdated": "2025-01-10",
            "orders": [
                { "date": "2025-01-09", "time": "18:05", "restaurant": "Curry House",
                  "total": 27.4, "items": 3, "type": "delivery" },
                { "date": "2025-01-02", "restaurant": "Bagel Stop",
                  "total": 8.0, "items": 1, "type": "pickup" }
            ]
        }))
        .unwrap();

        write_orders(&path, &document).await.unwrap();
        let book = load_orders(&path).await;
        assert_eq!(book.len(), 2);
        assert_eq!(book.latest().unwrap().restaurant, "Curry House");
        assert_eq!(book.last_updated(), Some("2025-01-10"));
        let _ = fs::remove_file(&path).await;
    }
}
