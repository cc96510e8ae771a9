//! The canonical `MM/YYYY` key that buckets ledger data by calendar month.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identifies one calendar month/year bucket. The string form is always
/// `MM/YYYY` with a zero-padded month, and the derived key for a given
/// month/year pair is unique and stable.
///
/// Ordering is chronological: year first, then month. `year` is declared
/// before `month` so the derived `Ord` gives that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    /// Creates a key for `month`/`year`. Fails with `Error::InvalidPeriod`
    /// when `month` is outside 1..=12 or `year` has more than four digits.
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(Error::InvalidPeriod(format!("{month:02}/{year:04}")));
        }
        Ok(Self { year, month })
    }

    /// Creates the key for the month that contains `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The number of days in this month, computed as the day before the first
    /// of the next month so that leap years fall out of the calendar math.
    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .map(|last| last.day())
            .unwrap_or_default()
    }

    /// True when `date` falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for PeriodKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPeriod(s.to_string());
        let (month_str, year_str) = s.split_once('/').ok_or_else(invalid)?;
        if month_str.len() != 2 || year_str.len() != 4 {
            return Err(invalid());
        }
        let month: u32 = month_str.parse().map_err(|_| invalid())?;
        let year: i32 = year_str.parse().map_err(|_| invalid())?;
        PeriodKey::new(month, year)
    }
}

impl Serialize for PeriodKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PeriodKey::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        for (month, year) in [(1, 2025), (10, 2024), (12, 1999)] {
            let key = PeriodKey::new(month, year).unwrap();
            let reparsed = PeriodKey::from_str(&key.to_string()).unwrap();
            assert_eq!(key, reparsed);
            assert_eq!(reparsed.month(), month);
            assert_eq!(reparsed.year(), year);
        }
    }

    #[test]
    fn test_key_format() {
        let key = PeriodKey::new(2, 2024).unwrap();
        assert_eq!(key.to_string(), "02/2024");
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            PeriodKey::new(0, 2024),
            Err(Error::InvalidPeriod(_))
        ));
        assert!(matches!(
            PeriodKey::new(13, 2024),
            Err(Error::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_strings() {
        for bad in ["1/2024", "01-2024", "01/24", "ab/2024", "01/20245", ""] {
            assert!(PeriodKey::from_str(bad).is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(PeriodKey::new(2, 2024).unwrap().days_in_month(), 29);
        assert_eq!(PeriodKey::new(2, 2023).unwrap().days_in_month(), 28);
        assert_eq!(PeriodKey::new(4, 2024).unwrap().days_in_month(), 30);
        assert_eq!(PeriodKey::new(12, 2024).unwrap().days_in_month(), 31);
    }

    #[test]
    fn test_chronological_sort() {
        let mut keys: Vec<PeriodKey> = ["01/2025", "12/2024", "02/2024"]
            .iter()
            .map(|s| PeriodKey::from_str(s).unwrap())
            .collect();
        keys.sort();
        let sorted: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(sorted, vec!["02/2024", "12/2024", "01/2025"]);
    }

    #[test]
    fn test_contains() {
        let key = PeriodKey::new(10, 2024).unwrap();
        assert!(key.contains(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()));
        assert!(key.contains(NaiveDate::from_ymd_opt(2024, 10, 31).unwrap()));
        assert!(!key.contains(NaiveDate::from_ymd_opt(2024, 11, 1).unwrap()));
        assert!(!key.contains(NaiveDate::from_ymd_opt(2023, 10, 1).unwrap()));
    }

    #[test]
    fn test_serde_as_string() {
        let key = PeriodKey::new(3, 2025).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"03/2025\"");
        let back: PeriodKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
