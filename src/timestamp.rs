//! Canonical build timestamps.
//!
//! A build timestamp is a UTC instant rendered as `yyyyMMddHHmmss`, 14 ASCII
//! digits with no separators. It is embedded in snapshot versions and written
//! to the build receipt, so the textual form is the contract.

use std::fmt;

use chrono::{
    DateTime,
    NaiveDateTime,
    NaiveTime,
    SecondsFormat,
    SubsecRound,
    Utc,
};

use crate::error::ResolveError;

/// `chrono` format string for `yyyyMMddHHmmss`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

const TIMESTAMP_LEN: usize = 14;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A build timestamp with second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuildTimestamp(DateTime<Utc>);

impl BuildTimestamp {
    /// Second-precision timestamp for `instant`; sub-second parts are dropped.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant.trunc_subsecs(0))
    }

    /// Timestamp for the start of the UTC day containing `instant`.
    pub fn start_of_day(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive().and_time(NaiveTime::MIN).and_utc())
    }

    /// Parses the canonical `yyyyMMddHHmmss` form.
    pub fn parse(value: &str) -> Result<Self, ResolveError> {
        let malformed = |reason: String| ResolveError::MalformedTimestamp {
            value: value.to_string(),
            reason,
        };

        if value.len() != TIMESTAMP_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(format!("expected {TIMESTAMP_LEN} digits")));
        }

        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|e| malformed(e.to_string()))
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// RFC 3339 rendering, e.g. `2024-01-02T03:04:05Z`.
    pub fn to_iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for BuildTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn instant(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, h, m, s).unwrap()
    }

    #[test]
    fn formats_as_fourteen_digits() {
        let ts = BuildTimestamp::at(instant(3, 4, 5));
        assert_eq!(ts.to_string(), "20240102030405");
    }

    #[test]
    fn parse_then_format_round_trips() {
        let ts = BuildTimestamp::parse("20240102030405").unwrap();
        assert_eq!(ts.to_string(), "20240102030405");
        assert_eq!(ts.instant(), instant(3, 4, 5));
    }

    #[test]
    fn start_of_day_zeroes_time() {
        let ts = BuildTimestamp::start_of_day(instant(23, 59, 59));
        assert_eq!(ts.to_string(), "20240102000000");
    }

    #[test]
    fn at_drops_subseconds() {
        let with_millis = instant(3, 4, 5) + chrono::Duration::milliseconds(987);
        assert_eq!(
            BuildTimestamp::at(with_millis),
            BuildTimestamp::at(instant(3, 4, 5))
        );
    }

    #[test]
    fn iso_rendering() {
        let ts = BuildTimestamp::parse("20240102030405").unwrap();
        assert_eq!(ts.to_iso(), "2024-01-02T03:04:05Z");
    }

    #[test]
    fn rejects_wrong_shape() {
        let bad_values = [
            "",
            "2024010203040",
            "202401020304050",
            "2024-01-02T03:04",
            "2024010203040x",
        ];
        for bad in bad_values {
            assert!(
                matches!(
                    BuildTimestamp::parse(bad),
                    Err(ResolveError::MalformedTimestamp { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(BuildTimestamp::parse("20241302030405").is_err());
        assert!(BuildTimestamp::parse("20240230000000").is_err());
        assert!(BuildTimestamp::parse("20240102250000").is_err());
    }
}
