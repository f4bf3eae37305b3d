//! Day-granularity date arithmetic

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::DataError;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Source of "now". Captured once per aggregation pass.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parse an expiration date as sent by the API.
///
/// Accepts `YYYY-MM-DD` (taken at 00:00 UTC) and RFC 3339 timestamps.
pub fn parse_expiration(raw: Option<&str>) -> Result<DateTime<Utc>, DataError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(DataError::MissingExpirationDate)?;

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DataError::InvalidExpirationDate(raw.to_string()))
}

/// Whole days from `now` to `target`, rounded up.
///
/// A target earlier in the same day yields 0, anything in the past yields <= 0.
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let delta = (target - now).num_milliseconds();
    // ceil(delta / day) for a positive divisor
    -(-delta).div_euclid(MILLIS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_date_only() {
        let parsed = parse_expiration(Some("2025-03-01")).unwrap();
        assert_eq!(parsed, at(2025, 3, 1, 0));
    }

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_expiration(Some("2025-03-01T00:00:00.000Z")).unwrap();
        assert_eq!(parsed, at(2025, 3, 1, 0));

        let offset = parse_expiration(Some("2025-03-01T05:00:00+05:00")).unwrap();
        assert_eq!(offset, at(2025, 3, 1, 0));
    }

    #[test]
    fn test_parse_missing_and_invalid() {
        assert_eq!(parse_expiration(None), Err(DataError::MissingExpirationDate));
        assert_eq!(parse_expiration(Some("  ")), Err(DataError::MissingExpirationDate));
        assert_eq!(
            parse_expiration(Some("31/02/2025")),
            Err(DataError::InvalidExpirationDate("31/02/2025".to_string()))
        );
        assert!(parse_expiration(Some("2025-02-30")).is_err());
    }

    #[test]
    fn test_days_until_today_is_zero() {
        let now = at(2025, 3, 1, 14);
        assert_eq!(days_until(at(2025, 3, 1, 0), now), 0);
        assert_eq!(days_until(now, now), 0);
    }

    #[test]
    fn test_days_until_rounds_up() {
        let now = at(2025, 3, 1, 14);
        assert_eq!(days_until(at(2025, 3, 2, 0), now), 1);
        assert_eq!(days_until(at(2025, 3, 31, 0), now), 30);
        assert_eq!(days_until(now + Duration::milliseconds(1), now), 1);
        assert_eq!(days_until(now + Duration::days(1), now), 1);
    }

    #[test]
    fn test_days_until_past_is_not_positive() {
        let now = at(2025, 3, 10, 9);
        assert_eq!(days_until(at(2025, 3, 9, 0), now), -1);
        assert_eq!(days_until(at(2025, 3, 5, 0), now), -5);
        assert_eq!(days_until(now - Duration::days(1), now), -1);
    }

    #[test]
    fn test_fixed_clock() {
        let instant = at(2025, 1, 1, 12);
        assert_eq!(FixedClock(instant).now(), instant);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn days_until_is_ceiling_of_offset(offset_ms in -3_000_000_000_000i64..3_000_000_000_000i64) {
            let now = Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0).unwrap();
            let days = days_until(now + Duration::milliseconds(offset_ms), now);

            prop_assert!(days * MILLIS_PER_DAY >= offset_ms);
            prop_assert!((days - 1) * MILLIS_PER_DAY < offset_ms);
        }
    }
}
