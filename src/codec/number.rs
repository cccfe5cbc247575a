//! Integers written as human-readable strings.

use super::{trim_quotes, FormatError};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// An unsigned counter written with optional thousands separators, e.g. `"1,234,567"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StringifiedUint64(pub u64);

impl StringifiedUint64 {
    pub fn decode(raw: &str) -> Result<Self, FormatError> {
        let digits = trim_quotes(raw).replace(',', "");
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|e| FormatError::new("stringified uint64", raw, e.to_string()))
    }

    /// Encodes as a plain decimal number without separators.
    pub fn encode(&self) -> String {
        self.0.to_string()
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StringifiedUint64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for StringifiedUint64 {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl Serialize for StringifiedUint64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for StringifiedUint64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CounterVisitor;

        impl Visitor<'_> for CounterVisitor {
            type Value = StringifiedUint64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an unsigned integer, optionally as a comma-separated string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(StringifiedUint64(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v).map(StringifiedUint64).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                StringifiedUint64::decode(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(CounterVisitor)
    }
}

/// An iRating or ttRating.
///
/// The member site writes `"---"` for a category the member has no rating in;
/// that decodes to an unrated value rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rating(Option<i64>);

impl Rating {
    const UNRATED: &'static str = "---";

    pub fn new(value: i64) -> Self {
        Self(Some(value))
    }

    pub fn unrated() -> Self {
        Self(None)
    }

    pub fn decode(raw: &str) -> Result<Self, FormatError> {
        let text = trim_quotes(raw);
        if text == Self::UNRATED {
            return Ok(Self(None));
        }

        text.parse::<i64>()
            .map(Self::new)
            .map_err(|e| FormatError::new("rating", raw, e.to_string()))
    }

    /// Encodes a rated value as a bare number and an unrated one as `"---"`.
    pub fn encode(&self) -> String {
        match self.0 {
            Some(v) => v.to_string(),
            None => format!("\"{}\"", Self::UNRATED),
        }
    }

    pub fn value(&self) -> Option<i64> {
        self.0
    }

    pub fn is_unrated(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => fmt::Display::fmt(&v, f),
            None => f.write_str(Self::UNRATED),
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(v) => serializer.serialize_i64(v),
            None => serializer.serialize_str(Self::UNRATED),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RatingVisitor;

        impl Visitor<'_> for RatingVisitor {
            type Value = Rating;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer rating or \"---\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rating, E> {
                Ok(Rating::new(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rating, E> {
                i64::try_from(v).map(Rating::new).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Rating, E> {
                Rating::decode(v).map_err(E::custom)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Rating, E> {
                Ok(Rating::unrated())
            }
        }

        deserializer.deserialize_any(RatingVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stringified_uint64_strips_commas() {
        assert_eq!(StringifiedUint64::decode("1,234,567").unwrap().get(), 1_234_567);
        assert_eq!(StringifiedUint64::decode("\"1,234,567\"").unwrap().get(), 1_234_567);
        assert_eq!(StringifiedUint64(1_234_567).encode(), "1234567");
    }

    #[test]
    fn test_stringified_uint64_rejects_non_numeric() {
        assert!(StringifiedUint64::decode("\"12a\"").is_err());
        assert!(StringifiedUint64::decode("-5").is_err());
        assert!(StringifiedUint64::decode("\"\"").is_err());
    }

    #[test]
    fn test_stringified_uint64_serde() {
        let v: StringifiedUint64 = serde_json::from_str("\"98,765\"").unwrap();
        assert_eq!(v.get(), 98_765);
        assert_eq!(serde_json::to_string(&v).unwrap(), "98765");

        let v: StringifiedUint64 = serde_json::from_str("42").unwrap();
        assert_eq!(v.get(), 42);
    }

    #[test]
    fn test_rating_sentinel_is_unrated() {
        let rating = Rating::decode("\"---\"").unwrap();
        assert!(rating.is_unrated());
        assert_eq!(rating.value(), None);
        assert_eq!(rating.encode(), "\"---\"");
    }

    #[test]
    fn test_rating_decodes_numbers() {
        assert_eq!(Rating::decode("1350").unwrap().value(), Some(1350));
        assert_eq!(Rating::decode("-12").unwrap().value(), Some(-12));
        assert_eq!(Rating::decode("\"2001\"").unwrap().value(), Some(2001));
        assert_eq!(Rating::new(1350).encode(), "1350");
    }

    #[test]
    fn test_rating_rejects_garbage() {
        let err = Rating::decode("\"n/a\"").unwrap_err();
        assert_eq!(err.kind, "rating");
    }

    #[test]
    fn test_rating_in_struct() {
        #[derive(Deserialize)]
        struct Licence {
            #[serde(rename = "iRating")]
            irating: Rating,
            #[serde(rename = "ttRating")]
            tt_rating: Rating,
        }

        let lic: Licence = serde_json::from_str(r#"{"iRating":1350,"ttRating":"---"}"#).unwrap();
        assert_eq!(lic.irating.value(), Some(1350));
        assert!(lic.tt_rating.is_unrated());
        assert_eq!(lic.tt_rating.to_string(), "---");
    }
}
