use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Timelike, Utc};
use std::sync::Mutex;

/// Trait for providing the current date/time to the engine
/// This allows for flexible date handling (system time, overrides, fixed clocks in tests)
pub trait DateProvider: Send + Sync {
    /// Get the current date/time
    fn get_current_time(&self) -> DateTime<Utc>;
}

/// Default date provider that uses the system's current date/time
pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Date provider that uses an overridden date instead of system time
/// Preserves the current hours/minutes/seconds from system time
pub struct OverrideDateProvider {
    override_date: NaiveDate,
}

impl OverrideDateProvider {
    /// Create a new override date provider with a specific date
    pub fn new(override_date: NaiveDate) -> Self {
        Self { override_date }
    }
}

impl DateProvider for OverrideDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let naive_datetime = self
            .override_date
            .and_hms_opt(now.hour(), now.minute(), now.second())
            .unwrap_or_else(|| self.override_date.and_time(NaiveTime::MIN));
        DateTime::from_naive_utc_and_offset(naive_datetime, Utc)
    }
}

/// Date provider pinned to an instant that only moves when told to
pub struct FixedDateProvider {
    current: Mutex<DateTime<Utc>>,
}

impl FixedDateProvider {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn set(&self, time: DateTime<Utc>) {
        if let Ok(mut current) = self.current.lock() {
            *current = time;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut current) = self.current.lock() {
            *current += by;
        }
    }
}

impl DateProvider for FixedDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        match self.current.lock() {
            Ok(current) => *current,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Calendar date of `time` as seen from a fixed UTC offset (in minutes)
///
/// Out-of-range offsets fall back to UTC.
pub fn local_date(time: DateTime<Utc>, utc_offset_minutes: i32) -> NaiveDate {
    let offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
        .unwrap_or_else(|| Utc.fix());
    time.with_timezone(&offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_system_date_provider_returns_current_time() {
        let provider = SystemDateProvider;
        let time1 = provider.get_current_time();
        let time2 = provider.get_current_time();

        assert!((time2 - time1).num_seconds() <= 1);
    }

    #[test]
    fn test_override_date_provider_uses_override_date() {
        let override_date = NaiveDate::from_ymd_opt(2025, 11, 18).unwrap();
        let provider = OverrideDateProvider::new(override_date);
        let time = provider.get_current_time();

        assert_eq!(time.format("%Y-%m-%d").to_string(), "2025-11-18");
    }

    #[test]
    fn test_fixed_date_provider_only_moves_when_advanced() {
        let start = at(2025, 1, 15, 12);
        let provider = FixedDateProvider::new(start);
        assert_eq!(provider.get_current_time(), start);

        provider.advance(Duration::days(2));
        assert_eq!(provider.get_current_time(), at(2025, 1, 17, 12));

        provider.set(start);
        assert_eq!(provider.get_current_time(), start);
    }

    #[test]
    fn test_local_date_respects_offset() {
        let late_evening_utc = at(2025, 1, 15, 23);
        assert_eq!(
            local_date(late_evening_utc, 0),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
        // UTC+2 is already the next day
        assert_eq!(
            local_date(late_evening_utc, 120),
            NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()
        );
        // UTC-5 is still the same day
        assert_eq!(
            local_date(late_evening_utc, -300),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_local_date_out_of_range_offset_falls_back_to_utc() {
        let time = at(2025, 1, 15, 23);
        assert_eq!(
            local_date(time, 100_000),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }
}
