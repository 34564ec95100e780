//! Flight status types returned to callers.
//!
//! These are built fresh for every lookup and never persisted by this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Airport name used when a leg's airport was not resolved.
pub const UNKNOWN_AIRPORT: &str = "Unknown";

/// A caller-supplied flight identifier. No format validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightStatusQuery {
    /// Airline designator, e.g. `DL`.
    pub airline_code: String,
    /// Flight number, e.g. `123`.
    pub flight_number: String,
}

impl FlightStatusQuery {
    /// Create a query.
    #[must_use]
    pub fn new(airline_code: impl Into<String>, flight_number: impl Into<String>) -> Self {
        Self {
            airline_code: airline_code.into(),
            flight_number: flight_number.into(),
        }
    }
}

impl std::fmt::Display for FlightStatusQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.airline_code, self.flight_number)
    }
}

/// One end of a flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegInfo {
    /// Airport name, or [`UNKNOWN_AIRPORT`].
    pub airport: String,
    /// Terminal, if published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// Gate, if published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,
    /// Scheduled time as reported by the provider.
    pub scheduled_time: String,
    /// Actual time as reported by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<String>,
    /// Delay in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
}

/// Aircraft operating a flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Tail number.
    pub registration: String,
    /// Aircraft type, e.g. `A321`.
    #[serde(rename = "type")]
    pub aircraft_type: String,
}

/// Status of a single flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightStatusResult {
    /// Flight number.
    pub flight_number: String,
    /// Airline designator.
    pub airline_code: String,
    /// Airline name.
    pub airline_name: String,
    /// Departure leg.
    pub departure: LegInfo,
    /// Arrival leg.
    pub arrival: LegInfo,
    /// Provider status text, e.g. `Scheduled`, `Departed`.
    pub status: String,
    /// Aircraft, only when the provider supplies it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<Aircraft>,
    /// When the provider last updated this status.
    pub last_updated: DateTime<Utc>,
}

impl FlightStatusResult {
    /// Set both legs' airport names.
    pub fn set_airports(&mut self, departure: impl Into<String>, arrival: impl Into<String>) {
        self.departure.airport = departure.into();
        self.arrival.airport = arrival.into();
    }

    /// Check whether both legs still carry the placeholder airport.
    #[must_use]
    pub fn airports_unknown(&self) -> bool {
        self.departure.airport == UNKNOWN_AIRPORT && self.arrival.airport == UNKNOWN_AIRPORT
    }
}

/// Outcome of resolving a flight's route to airport names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AirportResolution {
    /// Both airport names came from the route endpoint.
    Resolved,
    /// The status entry had no route to resolve.
    NoRoute,
    /// The route lookup failed; airports are [`UNKNOWN_AIRPORT`].
    Failed {
        /// Why the lookup failed.
        reason: String,
    },
}

impl AirportResolution {
    /// Check whether airport names were resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Check whether the route lookup was attempted and failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A flight status together with the outcome of airport resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedFlightStatus {
    /// The flight status. Always present, whatever happened to the route lookup.
    pub flight: FlightStatusResult,
    /// What happened when resolving airports.
    pub airports: AirportResolution,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_leg(scheduled: &str) -> LegInfo {
        LegInfo {
            airport: UNKNOWN_AIRPORT.to_string(),
            terminal: Some("S".to_string()),
            gate: None,
            scheduled_time: scheduled.to_string(),
            actual_time: None,
            delay: None,
        }
    }

    fn sample() -> FlightStatusResult {
        FlightStatusResult {
            flight_number: "123".to_string(),
            airline_code: "DL".to_string(),
            airline_name: "Delta Air Lines".to_string(),
            departure: sample_leg("2024-06-01T08:00:00Z"),
            arrival: sample_leg("2024-06-01T11:00:00Z"),
            status: "Scheduled".to_string(),
            aircraft: None,
            last_updated: Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_query_display() {
        assert_eq!(FlightStatusQuery::new("DL", "123").to_string(), "DL123");
    }

    #[test]
    fn test_set_airports() {
        let mut flight = sample();
        assert!(flight.airports_unknown());

        flight.set_airports("Atlanta", "Boston Logan");
        assert_eq!(flight.departure.airport, "Atlanta");
        assert_eq!(flight.arrival.airport, "Boston Logan");
        assert!(!flight.airports_unknown());
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("aircraft").is_none());
        assert!(json["departure"].get("gate").is_none());
        assert_eq!(json["departure"]["terminal"], "S");
    }

    #[test]
    fn test_aircraft_serializes_type() {
        let aircraft = Aircraft {
            registration: "N123DL".to_string(),
            aircraft_type: "A321".to_string(),
        };
        let json = serde_json::to_value(aircraft).unwrap();
        assert_eq!(json["type"], "A321");
    }

    #[test]
    fn test_airport_resolution_predicates() {
        assert!(AirportResolution::Resolved.is_resolved());
        assert!(!AirportResolution::NoRoute.is_resolved());
        assert!(AirportResolution::Failed {
            reason: "timeout".to_string()
        }
        .is_failed());
    }

    #[test]
    fn test_airport_resolution_serialization() {
        let json = serde_json::to_string(&AirportResolution::Failed {
            reason: "timeout".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"outcome":"failed","reason":"timeout"}"#);
    }
}
