use crate::models::{DailyBucket, OrderMix, OrderType};
use crate::orders::OrderBook;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// An inclusive range of calendar days. `end < start` is an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` days ending at `today`, `today` included.
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let start = today - Duration::days(i64::from(days)) + Duration::days(1);
        Self { start, end: today }
    }

    /// From the earliest recorded order to `today`; just `today` when there are none.
    pub fn since_earliest(book: &OrderBook, today: NaiveDate) -> Self {
        let start = book.earliest_date().map_or(today, |earliest| earliest.min(today));
        Self { start, end: today }
    }

    pub fn calendar_year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// Truncates the range so it never extends past `day`.
    pub fn ending_by(self, day: NaiveDate) -> Self {
        Self {
            start: self.start,
            end: self.end.min(day),
        }
    }

    pub fn len(&self) -> u32 {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start).num_days() as u32 + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start
            .iter_days()
            .take(self.len() as usize)
    }
}

/// Heatmap shade: 0 for no orders, 3 for three or more.
pub fn intensity(count: u32) -> u8 {
    count.min(3) as u8
}

/// One bucket per calendar day in `range`, zero days included.
pub fn daily_buckets(book: &OrderBook, range: DateRange) -> Vec<DailyBucket> {
    let mut by_date: HashMap<NaiveDate, (u32, f64)> = HashMap::new();
    for order in book.orders().iter().filter(|order| range.contains(order.date)) {
        let entry = by_date.entry(order.date).or_default();
        entry.0 = entry.0.saturating_add(1);
        entry.1 += order.total;
    }

    range
        .iter_days()
        .map(|date| {
            let (count, spent) = by_date.get(&date).copied().unwrap_or_default();
            DailyBucket {
                date,
                count,
                spent: round_cents(spent),
                level: intensity(count),
            }
        })
        .collect()
}

/// Order counts by fulfillment type within `range`.
pub fn order_mix(book: &OrderBook, range: Option<DateRange>) -> OrderMix {
    let mut mix = OrderMix::default();
    for order in book
        .orders()
        .iter()
        .filter(|order| range.is_none_or(|range| range.contains(order.date)))
    {
        mix.orders += 1;
        match order.kind {
            OrderType::Pickup => mix.pickup += 1,
            OrderType::Delivery => mix.delivery += 1,
        }
        mix.items += u64::from(order.items);
        mix.total_spent += order.total;
    }
    mix.total_spent = round_cents(mix.total_spent);
    mix
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
