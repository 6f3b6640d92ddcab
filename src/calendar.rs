use crate::models::{CalendarCell, CalendarGrid, DailyBucket, MonthLabel};
use chrono::{Datelike, Weekday};

/// Lays buckets out in Sunday-first week columns.
///
/// The first column is padded on the left and the last on the right with
/// [`CalendarCell::Empty`]. A month label starts at the column whose first
/// real day falls in a new month and spans until the next label.
pub fn build_grid(buckets: &[DailyBucket]) -> CalendarGrid {
    let Some(first) = buckets.first() else {
        return CalendarGrid {
            weeks: Vec::new(),
            months: Vec::new(),
        };
    };

    let leading = leading_padding(first.date.weekday());
    let cells: Vec<CalendarCell> = std::iter::repeat_n(CalendarCell::Empty, leading)
        .chain(buckets.iter().map(|bucket| CalendarCell::Day {
            date: bucket.date,
            count: bucket.count,
            level: bucket.level,
        }))
        .collect();

    let weeks: Vec<[CalendarCell; 7]> = cells
        .chunks(7)
        .map(|chunk| std::array::from_fn(|row| chunk.get(row).cloned().unwrap_or(CalendarCell::Empty)))
        .collect();

    let months = month_labels(&weeks);
    CalendarGrid { weeks, months }
}

/// Number of sentinel cells before a week column starting on `weekday`.
pub fn leading_padding(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

fn month_labels(weeks: &[[CalendarCell; 7]]) -> Vec<MonthLabel> {
    let mut labels: Vec<MonthLabel> = Vec::new();
    let mut current: Option<(i32, u32)> = None;

    for (column, week) in weeks.iter().enumerate() {
        let Some(date) = week.iter().find_map(|cell| match cell {
            CalendarCell::Day { date, .. } => Some(*date),
            CalendarCell::Empty => None,
        }) else {
            continue;
        };

        let key = (date.year(), date.month());
        if current != Some(key) {
            current = Some(key);
            labels.push(MonthLabel {
                label: date.format("%b").to_string(),
                month: date.month(),
                column,
                span: 0,
            });
        }
    }

    let columns = weeks.len();
    let starts: Vec<usize> = labels.iter().map(|label| label.column).collect();
    for (index, label) in labels.iter_mut().enumerate() {
        let next = starts.get(index + 1).copied().unwrap_or(columns);
        label.span = next - label.column;
    }
    labels
}

impl CalendarGrid {
    /// Real days in the grid; sentinel cells are not counted.
    pub fn real_days(&self) -> usize {
        self.weeks
            .iter()
            .flatten()
            .filter(|cell| matches!(cell, CalendarCell::Day { .. }))
            .count()
    }

    pub fn active_days(&self) -> usize {
        self.weeks
            .iter()
            .flatten()
            .filter(|cell| matches!(cell, CalendarCell::Day { count, .. } if *count > 0))
            .count()
    }
}
