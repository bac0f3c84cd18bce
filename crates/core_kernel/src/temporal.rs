//! Business timezone handling
//!
//! Loads are stamped with a UTC instant, but "today" and date-range listings
//! are calendar days in the operator's timezone. [`Timezone`] converts a
//! calendar day into the half-open UTC window `[start, next_start)`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::error::CoreError;

/// Timezone wrapper used for calendar-day queries
///
/// Wraps `chrono_tz::Tz` with serialization by IANA name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| CoreError::configuration(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Returns the IANA name of the zone
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Returns the calendar date of `instant` in this timezone
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// Returns today's calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    /// Gets local midnight at the start of `date` as UTC
    ///
    /// When midnight falls into a DST gap the earliest valid local time
    /// after it is used.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        self.resolve_local(midnight)
    }

    /// Returns the half-open UTC window `[start, end)` covering `date`
    pub fn day_window(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.start_of_day(date);
        let end = date
            .succ_opt()
            .map(|next| self.start_of_day(next))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        (start, end)
    }

    /// Returns the UTC window covering the inclusive date range `from..=to`
    pub fn date_range_window(&self, from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let (start, _) = self.day_window(from);
        let (_, end) = self.day_window(to);
        (start, end)
    }

    fn resolve_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let mut shifted = local;
        // DST gaps are at most a few hours wide
        for _ in 0..24 {
            if let Some(resolved) = self.0.from_local_datetime(&shifted).earliest() {
                return resolved.with_timezone(&Utc);
            }
            shifted += Duration::minutes(30);
        }
        Utc.from_utc_datetime(&local)
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iana_name() {
        let tz: Timezone = "Asia/Kolkata".parse().unwrap();
        assert_eq!(tz.name(), "Asia/Kolkata");
        assert!("Mars/Olympus".parse::<Timezone>().is_err());
    }

    #[test]
    fn test_day_window_in_offset_zone() {
        let tz: Timezone = "Asia/Kolkata".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let (start, end) = tz.day_window(date);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap());
    }

    #[test]
    fn test_local_date_crosses_utc_midnight() {
        let tz: Timezone = "Asia/Kolkata".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap();
        assert_eq!(tz.local_date(instant), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn test_date_range_window_is_inclusive_of_both_days() {
        let tz = Timezone::default();
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let (start, end) = tz.date_range_window(from, to);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_serde_by_name() {
        let tz: Timezone = serde_json::from_str("\"Europe/Berlin\"").unwrap();
        assert_eq!(serde_json::to_string(&tz).unwrap(), "\"Europe/Berlin\"");
    }
}
