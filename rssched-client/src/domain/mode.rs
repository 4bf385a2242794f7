//! Travel mode tags carried by network links.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A travel mode tag on a network link.
///
/// Links arrive from the simulation tagged with free-form modes such as
/// `"rail"` or `"bus"`. Network masking replaces those with the two modes the
/// rolling stock scheduler understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TravelMode {
    /// The link is traversed by a scheduled, passenger-carrying route.
    ServiceTrip,
    /// The link may be used for empty repositioning movements.
    NonRevenueTrip,
    /// Any mode tag coming from the simulation.
    Other(String),
}

impl TravelMode {
    const SERVICE_TRIP: &'static str = "serviceTrip";
    const NON_REVENUE_TRIP: &'static str = "deadHeadTrip";

    /// Parse a mode tag as written in scenario files.
    pub fn parse(s: &str) -> Self {
        match s {
            Self::SERVICE_TRIP => TravelMode::ServiceTrip,
            Self::NON_REVENUE_TRIP => TravelMode::NonRevenueTrip,
            other => TravelMode::Other(other.to_string()),
        }
    }

    /// Returns the tag as written in scenario and request files.
    pub fn as_str(&self) -> &str {
        match self {
            TravelMode::ServiceTrip => Self::SERVICE_TRIP,
            TravelMode::NonRevenueTrip => Self::NON_REVENUE_TRIP,
            TravelMode::Other(s) => s,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TravelMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TravelMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TravelMode::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_tags() {
        assert_eq!(TravelMode::parse("serviceTrip"), TravelMode::ServiceTrip);
        assert_eq!(TravelMode::parse("deadHeadTrip"), TravelMode::NonRevenueTrip);
        assert_eq!(TravelMode::parse("rail"), TravelMode::Other("rail".into()));
    }

    #[test]
    fn as_str_roundtrip() {
        for tag in ["serviceTrip", "deadHeadTrip", "bus", "car"] {
            assert_eq!(TravelMode::parse(tag).as_str(), tag);
        }
    }

    #[test]
    fn serde_uses_tag_strings() {
        let modes = vec![TravelMode::ServiceTrip, TravelMode::Other("rail".into())];
        let json = serde_json::to_string(&modes).unwrap();
        assert_eq!(json, r#"["serviceTrip","rail"]"#);

        let back: Vec<TravelMode> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, modes);
    }
}
