use std::sync::RwLock;

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "now" for capsule creation and of "today" for the unlock gate.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for unlocking. No time-of-day component.
    fn today(&self) -> NaiveDate;
}

/// Wall clock. `today` follows the server's local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock for tests and demos.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: RwLock::new(now) }
    }

    /// Noon UTC on the given day.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(noon(date))
    }

    pub fn set_today(&self, date: NaiveDate) {
        if let Ok(mut now) = self.now.write() {
            *now = noon(date);
        }
    }
}

fn noon(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc()
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.read().map(|now| *now).unwrap_or_default()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_moves_only_when_told() {
        let day = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let clock = FixedClock::on(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.today(), day);

        let later = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        clock.set_today(later);
        assert_eq!(clock.today(), later);
    }
}
