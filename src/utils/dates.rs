//! Lenient calendar-day parsing.
//!
//! Clients send stay dates either as `YYYY-MM-DD` or as RFC 3339 timestamps
//! (date pickers usually emit midnight in the user's zone). Timestamps are
//! normalized to their UTC calendar day.

use chrono::{DateTime, NaiveDate, Utc};

/// Parses a day from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

/// Serde adapter for a required lenient day.
pub mod day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_day(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}")))
    }
}

/// Serde adapter for a list of lenient days.
pub mod day_list {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Vec<String> = Vec::deserialize(deserializer)?;
        raw.iter()
            .map(|s| {
                super::parse_day(s)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(with = "day")]
        at: NaiveDate,
        #[serde(default, with = "day_list")]
        days: Vec<NaiveDate>,
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_plain_date() {
        assert_eq!(parse_day("2026-05-01"), Some(d(2026, 5, 1)));
    }

    #[test]
    fn test_timestamp_normalized_to_utc_day() {
        assert_eq!(parse_day("2026-05-01T00:00:00Z"), Some(d(2026, 5, 1)));
        assert_eq!(parse_day("2026-05-01T01:30:00+03:00"), Some(d(2026, 4, 30)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(parse_day("tomorrow"), None);
        assert_eq!(parse_day("2026-13-01"), None);
    }

    #[test]
    fn test_serde_adapters() {
        let p: Probe =
            serde_json::from_str(r#"{"at": "2026-05-01", "days": ["2026-05-02T10:00:00Z"]}"#)
                .unwrap();
        assert_eq!(p.at, d(2026, 5, 1));
        assert_eq!(p.days, vec![d(2026, 5, 2)]);

        assert!(serde_json::from_str::<Probe>(r#"{"at": "nope"}"#).is_err());
    }
}
