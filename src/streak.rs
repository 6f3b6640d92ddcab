use crate::activity::round_cents;
use crate::models::{ActivitySummary, DailyBucket};

/// Consecutive zero-order days ending at the last bucket.
pub fn current_streak(buckets: &[DailyBucket]) -> u32 {
    buckets
        .iter()
        .rev()
        .take_while(|bucket| bucket.count == 0)
        .count() as u32
}

/// Percentage of clean days, rounded half up. An empty range counts as 100.
pub fn success_rate(clean_days: u32, total_days: u32) -> u32 {
    if total_days == 0 {
        return 100;
    }
    let (clean, total) = (u64::from(clean_days), u64::from(total_days));
    ((200 * clean + total) / (2 * total)) as u32
}

pub fn summarize(buckets: &[DailyBucket]) -> ActivitySummary {
    let total_days = buckets.len() as u32;
    let days_with_orders = buckets.iter().filter(|bucket| bucket.count > 0).count() as u32;
    let clean_days = total_days - days_with_orders;

    ActivitySummary {
        start_date: buckets.first().map(|bucket| bucket.date),
        end_date: buckets.last().map(|bucket| bucket.date),
        total_days,
        total_orders: buckets.iter().map(|bucket| bucket.count).sum(),
        days_with_orders,
        clean_days,
        streak: current_streak(buckets),
        success_rate: success_rate(clean_days, total_days),
        max_count: buckets.iter().map(|bucket| bucket.count).max().unwrap_or(0).max(1),
        total_spent: round_cents(buckets.iter().map(|bucket| bucket.spent).sum()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::intensity;
    use chrono::{Duration, NaiveDate};

    fn buckets(counts: &[u32]) -> Vec<DailyBucket> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        counts
            .iter()
            .enumerate()
            .map(|(offset, &count)| DailyBucket {
                date: start + Duration::days(offset as i64),
                count,
                spent: f64::from(count) * 10.0,
                level: intensity(count),
            })
            .collect()
    }

    #[test]
    fn streak_stops_at_first_order_from_the_end() {
        assert_eq!(current_streak(&buckets(&[0, 2, 0, 0, 0])), 3);
        assert_eq!(current_streak(&buckets(&[0, 0, 1])), 0);
        assert_eq!(current_streak(&buckets(&[0, 0, 0])), 3);
        assert_eq!(current_streak(&[]), 0);
    }

    #[test]
    fn success_rate_rounds_half_up() {
        assert_eq!(success_rate(1, 8), 13);
        assert_eq!(success_rate(1, 3), 33);
        assert_eq!(success_rate(2, 3), 67);
        assert_eq!(success_rate(30, 30), 100);
        assert_eq!(success_rate(0, 0), 100);
    }

    #[test]
    fn success_rate_never_rises_as_orders_increase() {
        let mut counts = vec![0u32; 30];
        let mut previous = summarize(&buckets(&counts)).success_rate;
        assert_eq!(previous, 100);
        for index in 0..counts.len() {
            counts[index] += 1;
            let rate = summarize(&buckets(&counts)).success_rate;
            assert!(rate <= previous);
            previous = rate;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn summary_counts_clean_and_active_days() {
        let summary = summarize(&buckets(&[0, 1, 3, 0]));
        assert_eq!(summary.total_days, 4);
        assert_eq!(summary.total_orders, 4);
        assert_eq!(summary.days_with_orders, 2);
        assert_eq!(summary.clean_days, 2);
        assert_eq!(summary.streak, 1);
        assert_eq!(summary.success_rate, 50);
        assert_eq!(summary.max_count, 3);
        assert_eq!(summary.total_spent, 40.0);
    }

    #[test]
    fn empty_summary_is_fully_clean() {
        let summary = summarize(&[]);
        assert_eq!(summary.success_rate, 100);
        assert_eq!(summary.max_count, 1);
        assert!(summary.start_date.is_none());
    }
}
