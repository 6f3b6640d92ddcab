use crate::activity::{DateRange, daily_buckets, order_mix};
use crate::calendar::build_grid;
use crate::models::{ActivityResponse, DashboardResponse, YearResponse, YearSummary};
use crate::orders::OrderBook;
use crate::ranking::{OVERVIEW_TOP, YEAR_TOP, top_restaurants};
use crate::streak::summarize;
use crate::ticker::elapsed_snapshot;
use chrono::{Local, NaiveDate, NaiveDateTime};

pub const RECENT_DAYS: u32 = 30;

pub fn build_dashboard(book: &OrderBook) -> DashboardResponse {
    build_dashboard_at(book, Local::now().naive_local())
}

pub fn build_dashboard_at(book: &OrderBook, now: NaiveDateTime) -> DashboardResponse {
    let today = now.date();

    let all_time = summarize(&daily_buckets(book, DateRange::since_earliest(book, today)));
    let years = book
        .years()
        .into_iter()
        .filter_map(|year| {
            let range = DateRange::calendar_year(year)?.ending_by(today);
            Some(YearSummary {
                year,
                summary: summarize(&daily_buckets(book, range)),
            })
        })
        .collect();

    DashboardResponse {
        last_updated: book.last_updated().map(str::to_string),
        today,
        latest: elapsed_snapshot(book, now),
        last_30_days: build_activity_at(book, today, RECENT_DAYS),
        all_time,
        years,
        top_restaurants: top_restaurants(book, None, OVERVIEW_TOP),
        mix: order_mix(book, None),
    }
}

pub fn build_activity_at(book: &OrderBook, today: NaiveDate, days: u32) -> ActivityResponse {
    let days = daily_buckets(book, DateRange::last_days(today, days));
    let summary = summarize(&days);
    ActivityResponse { days, summary }
}

/// Heatmap and stats for one calendar year.
///
/// The grid covers the whole year; the summary stops at `today`.
pub fn build_year_at(book: &OrderBook, year: i32, today: NaiveDate) -> Option<YearResponse> {
    let range = DateRange::calendar_year(year)?;
    let days = daily_buckets(book, range);
    let grid = build_grid(&days);
    let summary = summarize(&daily_buckets(book, range.ending_by(today)));

    Some(YearResponse {
        year,
        days,
        grid,
        summary,
        top_restaurants: top_restaurants(book, Some(year), YEAR_TOP),
    })
}
