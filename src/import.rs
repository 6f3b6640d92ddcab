//! Offline half of the order importer.
//!
//! Saved GraphQL pages of consumer orders are flattened into the orders
//! document served by the dashboard. Fetching the pages is left to the
//! browser session that owns the cookies.

use crate::activity::round_cents;
use crate::errors::AppError;
use crate::models::{OrderRecord, OrderType, OrdersFile};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

pub const PAGE_SIZE: usize = 50;

/// One consumer order as returned by the orders query.
///
/// `id` is required so that a page envelope is never mistaken for an order.
/// Nested fields the API may send as `null` fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_pickup: bool,
    #[serde(default)]
    pub grand_total: Option<RawMoney>,
    #[serde(default)]
    pub store: Option<RawStore>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<RawSubOrder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMoney {
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_amount: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStore {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubOrder {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    #[serde(default, deserialize_with = "null_as_default")]
    get_consumer_orders_with_details: Vec<RawOrder>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One GraphQL response as saved from the browser.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageResponse {
    data: Option<PageData>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
    #[serde(default)]
    #[allow(dead_code)]
    extensions: Option<serde_json::Value>,
}

/// Accepted shapes of a saved export.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SavedExport {
    Pages(Vec<PageResponse>),
    Orders(Vec<RawOrder>),
}

impl SavedExport {
    /// Splits the export into pages of raw orders.
    pub fn into_pages(self, page_size: usize) -> Vec<Vec<RawOrder>> {
        match self {
            Self::Pages(pages) => pages
                .into_iter()
                .map(|page| {
                    if let Some(errors) = &page.errors {
                        warn!("saved page carries errors: {errors}");
                    }
                    page.data
                        .map(|data| data.get_consumer_orders_with_details)
                        .unwrap_or_default()
                })
                .collect(),
            Self::Orders(orders) => {
                if orders.is_empty() {
                    return vec![Vec::new()];
                }
                orders
                    .chunks(page_size.max(1))
                    .map(<[RawOrder]>::to_vec)
                    .collect()
            }
        }
    }
}

/// Concatenates pages, stopping after an empty or short page.
pub fn collect_pages<I>(pages: I, page_size: usize) -> Vec<RawOrder>
where
    I: IntoIterator<Item = Vec<RawOrder>>,
{
    let mut all = Vec::new();
    for page in pages {
        if page.is_empty() {
            break;
        }
        let short = page.len() < page_size;
        all.extend(page);
        info!("collected {} orders so far", all.len());
        if short {
            break;
        }
    }
    all
}

/// Flattens raw orders into records; orders without a usable timestamp are dropped.
pub fn transform(raw: &[RawOrder]) -> Vec<OrderRecord> {
    raw.iter().filter_map(transform_one).collect()
}

fn transform_one(order: &RawOrder) -> Option<OrderRecord> {
    let Some(stamp) = order.submitted_at.as_deref().or(order.created_at.as_deref()) else {
        warn!(id = %order.id, "skipping order without a timestamp");
        return None;
    };
    let placed = match DateTime::parse_from_rfc3339(stamp) {
        Ok(placed) => placed.with_timezone(&Local).naive_local(),
        Err(err) => {
            warn!(id = %order.id, %stamp, "skipping order with malformed timestamp: {err}");
            return None;
        }
    };

    let items = order
        .orders
        .iter()
        .flat_map(|sub| sub.items.iter())
        .map(|item| item.quantity.filter(|quantity| *quantity > 0).unwrap_or(1))
        .sum();
    let cents = order.grand_total.as_ref().map_or(0, |total| total.unit_amount);

    Some(OrderRecord {
        date: placed.date().to_string(),
        time: Some(placed.format("%H:%M").to_string()),
        restaurant: order
            .store
            .as_ref()
            .and_then(|store| store.name.clone())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string()),
        total: round_cents(cents.max(0) as f64 / 100.0),
        items,
        kind: if order.is_pickup {
            OrderType::Pickup
        } else {
            OrderType::Delivery
        },
    })
}

/// Collects, flattens and sorts a saved export into an orders document.
///
/// Fails instead of producing an empty document when the export held orders
/// but none of them could be converted.
pub fn import_export(
    export: SavedExport,
    page_size: usize,
    today: NaiveDate,
) -> Result<OrdersFile, AppError> {
    let raw = collect_pages(export.into_pages(page_size), page_size);
    info!("total orders fetched: {}", raw.len());

    let records = transform(&raw);
    if !raw.is_empty() && records.is_empty() {
        return Err(AppError::bad_request(format!(
            "none of the {} exported orders could be converted",
            raw.len()
        )));
    }
    let skipped = raw.len() - records.len();
    if skipped > 0 {
        warn!(skipped, "some exported orders were skipped");
    }

    Ok(build_document(records, today))
}

/// Sorts records newest first and stamps the document with `today`.
pub fn build_document(mut records: Vec<OrderRecord>, today: NaiveDate) -> OrdersFile {
    records.sort_by(|a, b| (&b.date, &b.time).cmp(&(&a.date, &a.time)));
    OrdersFile {
        last_updated: Some(today.to_string()),
        orders: records,
    }
}
