use crate::models::{Elapsed, Order};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

/// Time between an order placed at `date`/`time` and `now`.
///
/// Values are naive wall-clock arithmetic truncated to whole seconds.
/// Orders dated after `now` clamp to zero.
pub fn elapsed_since(date: NaiveDate, time: Option<NaiveTime>, now: NaiveDateTime) -> Elapsed {
    let placed_at = date.and_time(time.unwrap_or(NaiveTime::MIN));
    let diff = (now - placed_at).num_seconds();
    if diff < 0 {
        debug!(%placed_at, %now, "order is in the future; clamping elapsed time to zero");
    }
    from_seconds(diff.max(0))
}

pub fn elapsed_for(order: &Order, now: NaiveDateTime) -> Elapsed {
    elapsed_since(order.date, order.time, now)
}

pub fn from_seconds(total_seconds: i64) -> Elapsed {
    let hours = total_seconds / 3600;
    Elapsed {
        days: total_seconds / 86_400,
        hours,
        minutes: (total_seconds % 3600) / 60,
        seconds: total_seconds % 60,
        total_hours: hours,
    }
}

impl Elapsed {
    pub fn total_seconds(&self) -> i64 {
        self.days * 86_400 + (self.hours % 24) * 3600 + self.minutes * 60 + self.seconds
    }

    /// `HH:MM:SS` with the hours wrapped to the current day.
    pub fn clock(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.hours % 24,
            self.minutes,
            self.seconds
        )
    }
}

pub fn recovery_message(total_hours: i64) -> &'static str {
    match total_hours {
        h if h < 1 => "you literally just ordered. come on.",
        h if h < 6 => "still digesting the regret.",
        h if h < 12 => "the shame is still fresh.",
        h if h < 24 => "not even a full day yet.",
        h if h < 48 => "one day strong. barely.",
        h if h < 72 => "48 hours. your wallet is cautiously optimistic.",
        h if h < 168 => "almost a week? who even are you?",
        h if h < 336 => "two weeks. your bank account weeps with joy.",
        h if h < 720 => "a month? are you okay? blink twice if you need help.",
        _ => "legendary. or you forgot your password.",
    }
}
