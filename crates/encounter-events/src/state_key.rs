//! Discrete state keys.
//!
//! A key is the pair (distance bucket, bearing bucket). Its canonical text
//! form is `"{distance}_{bearing}"`, e.g. `"3_1"`, which is also how it is
//! stored in persisted value tables. Keys must stay stable across releases:
//! changing the text form invalidates every saved table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Highest distance bucket ("far or beyond").
pub const MAX_DISTANCE_BUCKET: u8 = 10;

/// Number of angular sectors around the agent.
pub const BEARING_BUCKETS: u8 = 4;

/// Discrete summary of where the target is relative to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    /// Distance bucket, `0..=MAX_DISTANCE_BUCKET`
    pub distance: u8,
    /// Bearing sector, `0..BEARING_BUCKETS`
    pub bearing: u8,
}

impl StateKey {
    /// Creates a key, clamping the distance bucket and wrapping the bearing
    /// onto the sector ring.
    pub fn new(distance: u8, bearing: u8) -> Self {
        Self {
            distance: distance.min(MAX_DISTANCE_BUCKET),
            bearing: bearing % BEARING_BUCKETS,
        }
    }

    /// Total number of distinct keys.
    pub const fn cardinality() -> usize {
        (MAX_DISTANCE_BUCKET as usize + 1) * BEARING_BUCKETS as usize
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.distance, self.bearing)
    }
}

/// Error type for parsing a StateKey from its text form.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseStateKeyError {
    InvalidFormat(String),
    InvalidDistance(String),
    InvalidBearing(String),
}

impl fmt::Display for ParseStateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStateKeyError::InvalidFormat(s) => {
                write!(f, "invalid state key: '{}', expected 'distance_bearing'", s)
            }
            ParseStateKeyError::InvalidDistance(s) => write!(f, "invalid distance bucket: '{}'", s),
            ParseStateKeyError::InvalidBearing(s) => write!(f, "invalid bearing bucket: '{}'", s),
        }
    }
}

impl std::error::Error for ParseStateKeyError {}

impl FromStr for StateKey {
    type Err = ParseStateKeyError;

    /// Parses a key from a string like "3_1". Out-of-range buckets are
    /// rejected rather than clamped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (distance_part, bearing_part) = s
            .split_once('_')
            .ok_or_else(|| ParseStateKeyError::InvalidFormat(s.to_string()))?;

        let distance = distance_part
            .parse::<u8>()
            .ok()
            .filter(|d| *d <= MAX_DISTANCE_BUCKET)
            .ok_or_else(|| ParseStateKeyError::InvalidDistance(distance_part.to_string()))?;

        let bearing = bearing_part
            .parse::<u8>()
            .ok()
            .filter(|b| *b < BEARING_BUCKETS)
            .ok_or_else(|| ParseStateKeyError::InvalidBearing(bearing_part.to_string()))?;

        Ok(StateKey { distance, bearing })
    }
}

// Serialized as the canonical string so keys read naturally in JSON
impl Serialize for StateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_key_display() {
        assert_eq!(StateKey::new(3, 1).to_string(), "3_1");
        assert_eq!(StateKey::new(10, 0).to_string(), "10_0");
    }

    #[test]
    fn test_state_key_parse() {
        let key: StateKey = "7_2".parse().unwrap();
        assert_eq!(key.distance, 7);
        assert_eq!(key.bearing, 2);
    }

    #[test]
    fn test_state_key_parse_rejects_garbage() {
        assert!(matches!(
            "72".parse::<StateKey>(),
            Err(ParseStateKeyError::InvalidFormat(_))
        ));
        assert!(matches!(
            "x_2".parse::<StateKey>(),
            Err(ParseStateKeyError::InvalidDistance(_))
        ));
        assert!(matches!(
            "11_2".parse::<StateKey>(),
            Err(ParseStateKeyError::InvalidDistance(_))
        ));
        assert!(matches!(
            "3_4".parse::<StateKey>(),
            Err(ParseStateKeyError::InvalidBearing(_))
        ));
        assert!(matches!(
            "3_1_0".parse::<StateKey>(),
            Err(ParseStateKeyError::InvalidBearing(_))
        ));
    }

    #[test]
    fn test_new_clamps_and_wraps() {
        let key = StateKey::new(200, 5);
        assert_eq!(key.distance, MAX_DISTANCE_BUCKET);
        assert_eq!(key.bearing, 1);
    }

    #[test]
    fn test_state_key_serialization() {
        let key = StateKey::new(4, 3);
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""4_3""#);
        let parsed: StateKey = serde_json::from_str(r#""4_3""#).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_cardinality() {
        assert_eq!(StateKey::cardinality(), 44);
    }
}
