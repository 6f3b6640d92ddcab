use crate::models::{Order, OrderRecord, OrdersFile};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Reverse;
use tracing::warn;

/// The order collection, validated and sorted newest first.
///
/// Built once at load time and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    last_updated: Option<String>,
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn from_file(file: OrdersFile) -> Self {
        let mut orders: Vec<Order> = file.orders.iter().filter_map(parse_record).collect();

        let sorted = orders
            .windows(2)
            .all(|pair| sort_key(&pair[0]) >= sort_key(&pair[1]));
        if !sorted {
            warn!("orders were not sorted newest first; re-sorting");
            orders.sort_by_key(|order| Reverse(sort_key(order)));
        }

        Self {
            last_updated: file.last_updated,
            orders,
        }
    }

    pub fn from_orders(mut orders: Vec<Order>) -> Self {
        orders.sort_by_key(|order| Reverse(sort_key(order)));
        Self {
            last_updated: None,
            orders,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn latest(&self) -> Option<&Order> {
        self.orders.first()
    }

    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.orders.last().map(|order| order.date)
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Distinct calendar years present, newest first.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.orders.iter().map(|order| order.date.year()).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }
}

impl Order {
    /// Local timestamp of the order; a missing time means midnight.
    pub fn placed_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

fn sort_key(order: &Order) -> (NaiveDate, Option<NaiveTime>) {
    (order.date, order.time)
}

fn parse_record(record: &OrderRecord) -> Option<Order> {
    let date = match NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(err) => {
            warn!(date = %record.date, "skipping order with malformed date: {err}");
            return None;
        }
    };

    let time = record
        .time
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| match NaiveTime::parse_from_str(value, "%H:%M") {
            Ok(time) => Some(time),
            Err(err) => {
                warn!(time = %value, "ignoring malformed order time: {err}");
                None
            }
        });

    Some(Order {
        date,
        time,
        restaurant: record.restaurant.clone(),
        total: record.total.max(0.0),
        items: record.items,
        kind: record.kind,
    })
}
