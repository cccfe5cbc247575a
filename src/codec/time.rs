//! Instants and durations.

use super::{trim_quotes, unquote, FormatError};
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// An instant written as a Unix timestamp in milliseconds.
///
/// Sub-second precision is dropped on decode, so encoding always produces a
/// multiple of 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wraps an instant, truncating it to whole seconds.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at))
    }

    /// Builds a timestamp from Unix milliseconds.
    pub fn from_millis(millis: i64) -> Result<Self, FormatError> {
        DateTime::from_timestamp(millis / 1000, 0)
            .map(Self)
            .ok_or_else(|| FormatError::new("timestamp", &millis.to_string(), "out of range"))
    }

    /// Decodes the raw JSON token, e.g. `1700000000000`.
    pub fn decode(raw: &str) -> Result<Self, FormatError> {
        let text = trim_quotes(raw);
        let millis = text
            .parse::<i64>()
            .map_err(|e| FormatError::new("timestamp", raw, e.to_string()))?;
        Self::from_millis(millis)
    }

    /// Encodes as Unix milliseconds, unquoted.
    pub fn encode(&self) -> String {
        self.as_millis().to_string()
    }

    /// Unix milliseconds.
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp() * 1000
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::new(at)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_millis())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IntegerVisitor {
            expecting: "a Unix timestamp in milliseconds",
            from_i64: Timestamp::from_millis,
            decode: Timestamp::decode,
        })
    }
}

/// An instant written as a `"YYYY-MM-DD HH:MM:SS"` string in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(DateTime<Utc>);

impl SimTime {
    const LAYOUT: &'static str = "%Y-%m-%d %H:%M:%S";
    const LOOSE_LAYOUT: &'static str = "%Y-%m-%d %H:%M:%S%.f";

    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Decodes the raw JSON token, which must be a quoted string.
    pub fn decode(raw: &str) -> Result<Self, FormatError> {
        Self::parse(unquote("sim time", raw)?)
    }

    /// Parses an unquoted wall-clock string.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        NaiveDateTime::parse_from_str(text, Self::LAYOUT)
            .or_else(|_| NaiveDateTime::parse_from_str(text, Self::LOOSE_LAYOUT))
            .map(|naive| Self(naive.and_utc()))
            .map_err(|e| FormatError::new("sim time", text, e.to_string()))
    }

    /// Encodes as a quoted wall-clock string.
    pub fn encode(&self) -> String {
        format!("\"{}\"", self)
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for SimTime {
    fn default() -> Self {
        Self(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::LAYOUT))
    }
}

impl From<DateTime<Utc>> for SimTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Serialize for SimTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SimTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SimTimeVisitor;

        impl Visitor<'_> for SimTimeVisitor {
            type Value = SimTime;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a \"YYYY-MM-DD HH:MM:SS\" string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SimTime, E> {
                SimTime::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(SimTimeVisitor)
    }
}

/// A signed duration written as an integer number of milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Milliseconds(TimeDelta);

impl Milliseconds {
    pub fn from_millis(millis: i64) -> Result<Self, FormatError> {
        TimeDelta::try_milliseconds(millis)
            .map(Self)
            .ok_or_else(|| FormatError::new("milliseconds", &millis.to_string(), "out of range"))
    }

    pub fn decode(raw: &str) -> Result<Self, FormatError> {
        let millis = trim_quotes(raw)
            .parse::<i64>()
            .map_err(|e| FormatError::new("milliseconds", raw, e.to_string()))?;
        Self::from_millis(millis)
    }

    pub fn encode(&self) -> String {
        self.as_millis().to_string()
    }

    pub fn as_millis(&self) -> i64 {
        self.0.num_milliseconds()
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }
}

impl Serialize for Milliseconds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_millis())
    }
}

impl<'de> Deserialize<'de> for Milliseconds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IntegerVisitor {
            expecting: "a number of milliseconds",
            from_i64: Milliseconds::from_millis,
            decode: Milliseconds::decode,
        })
    }
}

static LAPTIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<minutes>\d+):)?(?P<seconds>[0-5]?\d)\.(?P<millis>\d{3})$")
        .expect("laptime pattern is valid")
});

/// A lap time written as `"[M:]SS.mmm"`.
///
/// The textual form omits the minutes when they are zero and does not pad the
/// seconds: one minute and five seconds is written `1:5.003`. Decoding accepts
/// both padded and unpadded seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Laptime(Duration);

impl Laptime {
    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Decodes the raw JSON token, which must be a quoted string.
    pub fn decode(raw: &str) -> Result<Self, FormatError> {
        Self::parse(unquote("laptime", raw)?)
    }

    /// Parses an unquoted lap time such as `1:43.580` or `15.000`.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let caps = LAPTIME_PATTERN
            .captures(text)
            .ok_or_else(|| FormatError::new("laptime", text, "expected [M:]SS.mmm"))?;

        let field = |name: &str| -> Result<u64, FormatError> {
            caps.name(name)
                .map_or(Ok(0), |m| m.as_str().parse::<u64>())
                .map_err(|e| FormatError::new("laptime", text, e.to_string()))
        };

        let minutes = field("minutes")?;
        let seconds = field("seconds")?;
        let millis = field("millis")?;

        let total = minutes
            .checked_mul(60_000)
            .and_then(|ms| ms.checked_add(seconds * 1000 + millis))
            .ok_or_else(|| FormatError::new("laptime", text, "out of range"))?;

        Ok(Self::from_millis(total))
    }

    /// Encodes as a quoted string.
    pub fn encode(&self) -> String {
        format!("\"{}\"", self)
    }

    pub fn as_millis(&self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for Laptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.as_millis();
        let minutes = total / 60_000;
        let seconds = (total / 1000) % 60;
        let millis = total % 1000;

        if minutes > 0 {
            write!(f, "{}:{}.{:03}", minutes, seconds, millis)
        } else {
            write!(f, "{}.{:03}", seconds, millis)
        }
    }
}

impl From<Duration> for Laptime {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl Serialize for Laptime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Laptime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LaptimeVisitor;

        impl Visitor<'_> for LaptimeVisitor {
            type Value = Laptime;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a \"[M:]SS.mmm\" lap time")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Laptime, E> {
                Laptime::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(LaptimeVisitor)
    }
}

/// Accepts an integer either as a JSON number or as a numeric string.
struct IntegerVisitor<T> {
    expecting: &'static str,
    from_i64: fn(i64) -> Result<T, FormatError>,
    decode: fn(&str) -> Result<T, FormatError>,
}

impl<T> Visitor<'_> for IntegerVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expecting)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        (self.from_i64)(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        let v = i64::try_from(v).map_err(E::custom)?;
        (self.from_i64)(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        (self.decode)(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_timestamp_decode_and_encode() {
        let ts = Timestamp::decode("1700000000000").unwrap();
        assert_eq!(ts.as_datetime().timestamp(), 1_700_000_000);
        assert_eq!(ts.encode(), "1700000000000");
    }

    #[test]
    fn test_timestamp_truncates_to_seconds() {
        let ts = Timestamp::decode("1700000000999").unwrap();
        assert_eq!(ts.encode(), "1700000000000");
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        let err = Timestamp::decode("soon").unwrap_err();
        assert_eq!(err.kind, "timestamp");
    }

    #[test]
    fn test_timestamp_from_json_number_and_string() {
        let a: Timestamp = serde_json::from_str("1700000000000").unwrap();
        let b: Timestamp = serde_json::from_str("\"1700000000000\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "1700000000000");
    }

    #[test]
    fn test_sim_time_decode() {
        let t = SimTime::decode("\"2023-11-14 12:00:00\"").unwrap();
        assert_eq!(
            t.as_datetime(),
            Utc.with_ymd_and_hms(2023, 11, 14, 12, 0, 0).unwrap()
        );
        assert_eq!(t.encode(), "\"2023-11-14 12:00:00\"");
    }

    #[test]
    fn test_sim_time_accepts_fractional_seconds() {
        let t = SimTime::decode("\"2023-11-14 12:00:00.250\"").unwrap();
        assert_eq!(t.as_datetime().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_sim_time_rejects_other_layouts() {
        assert!(SimTime::decode("\"14/11/2023 12:00\"").is_err());
        assert!(SimTime::decode("\"2023-11-14T12:00:00Z\"").is_err());
    }

    #[test]
    fn test_sim_time_requires_quotes() {
        let err = SimTime::decode("2023-11-14 12:00:00").unwrap_err();
        assert_eq!(err.reason, "expected a quoted string");
    }

    #[test]
    fn test_sim_time_serde() {
        let t: SimTime = serde_json::from_str("\"2021-03-09 18:45:00\"").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"2021-03-09 18:45:00\"");
        assert!(serde_json::from_str::<SimTime>("12").is_err());
    }

    #[test]
    fn test_milliseconds_is_signed() {
        let m = Milliseconds::decode("-1500").unwrap();
        assert_eq!(m.as_delta(), TimeDelta::milliseconds(-1500));
        assert_eq!(m.encode(), "-1500");
    }

    #[test]
    fn test_milliseconds_serde() {
        let m: Milliseconds = serde_json::from_str("90500").unwrap();
        assert_eq!(m.as_millis(), 90_500);
        assert_eq!(serde_json::to_string(&m).unwrap(), "90500");
    }

    #[test]
    fn test_laptime_decode_examples() {
        assert_eq!(Laptime::decode("\"1:43.580\"").unwrap().as_millis(), 103_580);
        assert_eq!(Laptime::decode("\"15.000\"").unwrap().as_millis(), 15_000);
        assert_eq!(Laptime::decode("\"1.234\"").unwrap().as_millis(), 1_234);
        assert_eq!(Laptime::decode("\"99:59.999\"").unwrap().as_millis(), 5_999_999);
        assert_eq!(Laptime::decode("\"5:55.555\"").unwrap().as_millis(), 355_555);
    }

    #[test]
    fn test_laptime_accepts_padded_seconds() {
        assert_eq!(Laptime::decode("\"1:07.123\"").unwrap().as_millis(), 67_123);
    }

    #[test]
    fn test_laptime_rejects_bad_input() {
        for bad in [
            "\"1:60.000\"",
            "\"1:43.58\"",
            "\"1:43.5800\"",
            "\"abc\"",
            "\"\"",
            "\"1:\"",
            "1:43.580",
        ] {
            assert!(Laptime::decode(bad).is_err(), "{bad} should not decode");
        }
    }

    #[test]
    fn test_laptime_string() {
        assert_eq!(Laptime::from_millis(102_548).to_string(), "1:42.548");
        assert_eq!(Laptime::from_millis(1_234).to_string(), "1.234");
        assert_eq!(Laptime::from_millis(0).to_string(), "0.000");
    }

    #[test]
    fn test_laptime_string_does_not_pad_seconds() {
        let lap = Laptime::from_millis(5 * 60_000 + 5_003);
        assert_eq!(lap.to_string(), "5:5.003");
        assert_eq!(lap.encode(), "\"5:5.003\"");
        assert_eq!(Laptime::decode(&lap.encode()).unwrap(), lap);
    }

    #[test]
    fn test_laptime_serde() {
        let lap: Laptime = serde_json::from_str("\"2:01.001\"").unwrap();
        assert_eq!(serde_json::to_string(&lap).unwrap(), "\"2:1.001\"");
    }

    proptest! {
        #[test]
        fn prop_laptime_value_survives_reencoding(
            minutes in proptest::option::of(0u64..1000),
            seconds in 0u64..60,
            millis in 0u64..1000,
            pad in any::<bool>(),
        ) {
            let secs = if pad { format!("{:02}", seconds) } else { seconds.to_string() };
            let text = match minutes {
                Some(m) => format!("\"{}:{}.{:03}\"", m, secs, millis),
                None => format!("\"{}.{:03}\"", secs, millis),
            };

            let decoded = Laptime::decode(&text).unwrap();
            let again = Laptime::decode(&decoded.encode()).unwrap();
            prop_assert_eq!(again, decoded);
            prop_assert_eq!(
                decoded.as_millis(),
                minutes.unwrap_or(0) * 60_000 + seconds * 1000 + millis
            );
        }
    }
}
