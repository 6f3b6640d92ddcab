use crate::models::RestaurantCount;
use crate::orders::OrderBook;
use chrono::Datelike;
use std::collections::HashMap;

pub const OVERVIEW_TOP: usize = 3;
pub const YEAR_TOP: usize = 5;

/// Most frequent restaurants, optionally limited to one calendar year.
///
/// Ties keep the order in which restaurants were first seen.
pub fn top_restaurants(book: &OrderBook, year: Option<i32>, limit: usize) -> Vec<RestaurantCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<RestaurantCount> = Vec::new();

    for order in book
        .orders()
        .iter()
        .filter(|order| year.is_none_or(|year| order.date.year() == year))
    {
        match index.get(order.restaurant.as_str()) {
            Some(&slot) => ranked[slot].count += 1,
            None => {
                index.insert(order.restaurant.as_str(), ranked.len());
                ranked.push(RestaurantCount {
                    restaurant: order.restaurant.clone(),
                    count: 1,
                });
            }
        }
    }

    // `sort_by` is stable, so first-seen order survives ties.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}
