use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Pickup,
    Delivery,
}

/// One order as it appears in the orders document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub restaurant: String,
    pub total: f64,
    pub items: u32,
    #[serde(rename = "type")]
    pub kind: OrderType,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrdersFile {
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "skip_invalid_records")]
    pub orders: Vec<OrderRecord>,
}

/// Keeps every record that deserializes and drops the rest with a warning.
fn skip_invalid_records<'de, D>(deserializer: D) -> Result<Vec<OrderRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(index, "skipping unreadable order record: {err}");
                None
            }
        })
        .collect())
}

/// A validated order with parsed calendar values.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub restaurant: String,
    pub total: f64,
    pub items: u32,
    pub kind: OrderType,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatestOrder {
    pub date: String,
    pub time: Option<String>,
    pub restaurant: String,
    pub total: f64,
    pub items: u32,
    #[serde(rename = "type")]
    pub kind: OrderType,
}

impl From<&Order> for LatestOrder {
    fn from(order: &Order) -> Self {
        Self {
            date: order.date.to_string(),
            time: order.time.map(|time| time.format("%H:%M").to_string()),
            restaurant: order.restaurant.clone(),
            total: order.total,
            items: order.items,
            kind: order.kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elapsed {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_hours: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub count: u32,
    pub spent: f64,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_days: u32,
    pub total_orders: u32,
    pub days_with_orders: u32,
    pub clean_days: u32,
    pub streak: u32,
    pub success_rate: u32,
    pub max_count: u32,
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestaurantCount {
    pub restaurant: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OrderMix {
    pub orders: u32,
    pub pickup: u32,
    pub delivery: u32,
    pub items: u64,
    pub total_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    Day { date: NaiveDate, count: u32, level: u8 },
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub label: String,
    pub month: u32,
    pub column: usize,
    pub span: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarGrid {
    pub weeks: Vec<[CalendarCell; 7]>,
    pub months: Vec<MonthLabel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElapsedResponse {
    pub latest: Option<LatestOrder>,
    pub elapsed: Option<Elapsed>,
    pub clock: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub days: Vec<DailyBucket>,
    pub summary: ActivitySummary,
}

#[derive(Debug, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub summary: ActivitySummary,
}

#[derive(Debug, Serialize)]
pub struct YearResponse {
    pub year: i32,
    pub days: Vec<DailyBucket>,
    pub grid: CalendarGrid,
    pub summary: ActivitySummary,
    pub top_restaurants: Vec<RestaurantCount>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub last_updated: Option<String>,
    pub today: NaiveDate,
    pub latest: ElapsedResponse,
    pub last_30_days: ActivityResponse,
    pub all_time: ActivitySummary,
    pub years: Vec<YearSummary>,
    pub top_restaurants: Vec<RestaurantCount>,
    pub mix: OrderMix,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RestaurantsQuery {
    pub year: Option<i32>,
    pub limit: Option<usize>,
}
