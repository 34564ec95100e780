//! Provider wire format.
//!
//! Status and route responses follow a JSON:API-like shape. Decoding is
//! lenient: unknown fields are ignored and missing optional fields fall back
//! to the query or to placeholders rather than failing the lookup.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::model::{Aircraft, FlightStatusQuery, FlightStatusResult, LegInfo, UNKNOWN_AIRPORT};

/// Body of the flight-status endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusListResponse {
    /// Matching status entries, most relevant first.
    #[serde(default)]
    pub data: Vec<StatusEntry>,
}

impl StatusListResponse {
    /// Take the first entry, if any.
    #[must_use]
    pub fn into_first(self) -> Option<StatusEntry> {
        self.data.into_iter().next()
    }
}

/// One flight-status resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusEntry {
    /// Resource id.
    #[serde(default)]
    pub id: Value,
    /// Status attributes.
    #[serde(default)]
    pub attributes: StatusAttributes,
    /// Links to related resources.
    #[serde(default)]
    pub relationships: Relationships,
}

/// Attributes of a status entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusAttributes {
    /// Flight number without the airline prefix.
    pub flight_number: Option<String>,
    /// IATA airline code.
    pub airline_code: Option<String>,
    /// Display name of the operating airline.
    pub airline_name: Option<String>,
    /// Provider status text, e.g. `Delayed`.
    pub status: Option<String>,
    /// Departure leg.
    pub departure: LegAttributes,
    /// Arrival leg.
    pub arrival: LegAttributes,
    /// Aircraft, when assigned.
    pub aircraft: Option<AircraftAttributes>,
    /// RFC 3339 timestamp of the provider's last update.
    pub last_updated: Option<String>,
}

/// Attributes of one leg.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegAttributes {
    /// Terminal.
    pub terminal: Option<String>,
    /// Gate.
    pub gate: Option<String>,
    /// Scheduled time, as sent by the provider.
    pub scheduled_time: Option<String>,
    /// Actual or estimated time.
    pub actual_time: Option<String>,
    /// Delay in minutes.
    pub delay: Option<i64>,
}

/// Aircraft attributes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AircraftAttributes {
    /// Tail number.
    pub registration: Option<String>,
    /// Aircraft type code, sent as `type`.
    #[serde(rename = "type")]
    pub aircraft_type: Option<String>,
}

/// Relationships of a status entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Relationships {
    /// The flight's route.
    pub route: Option<Relationship>,
}

/// A to-one relationship.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Relationship {
    /// The related resource, or `None` when unset.
    pub data: Option<ResourceIdentifier>,
}

/// Identifies a related resource.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResourceIdentifier {
    /// Resource id, a string or a number.
    pub id: Value,
}

impl StatusEntry {
    /// The route id from `relationships.route.data.id`.
    ///
    /// Numeric ids are accepted and rendered as strings.
    #[must_use]
    pub fn route_id(&self) -> Option<String> {
        let id = &self.relationships.route.as_ref()?.data.as_ref()?.id;
        match id {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Map this entry into a result with placeholder airports.
    ///
    /// Missing flight and airline identifiers fall back to the query; a
    /// missing or unparseable `lastUpdated` falls back to `now`.
    #[must_use]
    pub fn into_result(self, query: &FlightStatusQuery, now: DateTime<Utc>) -> FlightStatusResult {
        let attrs = self.attributes;
        let last_updated = attrs
            .last_updated
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map_or(now, |t| t.with_timezone(&Utc));

        FlightStatusResult {
            flight_number: attrs
                .flight_number
                .unwrap_or_else(|| query.flight_number.clone()),
            airline_code: attrs
                .airline_code
                .unwrap_or_else(|| query.airline_code.clone()),
            airline_name: attrs.airline_name.unwrap_or_default(),
            departure: attrs.departure.into_leg(),
            arrival: attrs.arrival.into_leg(),
            status: attrs.status.unwrap_or_default(),
            aircraft: attrs.aircraft.and_then(AircraftAttributes::into_aircraft),
            last_updated,
        }
    }
}

impl LegAttributes {
    fn into_leg(self) -> LegInfo {
        LegInfo {
            airport: UNKNOWN_AIRPORT.to_string(),
            terminal: self.terminal,
            gate: self.gate,
            scheduled_time: self.scheduled_time.unwrap_or_default(),
            actual_time: self.actual_time,
            delay: self.delay,
        }
    }
}

impl AircraftAttributes {
    fn into_aircraft(self) -> Option<Aircraft> {
        if self.registration.is_none() && self.aircraft_type.is_none() {
            return None;
        }
        Some(Aircraft {
            registration: self.registration.unwrap_or_default(),
            aircraft_type: self.aircraft_type.unwrap_or_default(),
        })
    }
}

/// Body of the route endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// The route resource.
    pub data: RouteData,
}

/// The route resource.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteData {
    /// Route attributes.
    pub attributes: RouteAttributes,
}

/// Route endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteAttributes {
    /// Departure airport.
    pub origin: Option<Place>,
    /// Arrival airport.
    pub destination: Option<Place>,
}

/// A named airport.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Place {
    /// Airport name.
    pub name: Option<String>,
}

impl RouteResponse {
    /// Origin and destination names, if both are present and non-empty.
    #[must_use]
    pub fn airport_names(&self) -> Option<(String, String)> {
        let name = |p: &Option<Place>| {
            p.as_ref()
                .and_then(|p| p.name.as_deref())
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        };
        let attrs = &self.data.attributes;
        Some((name(&attrs.origin)?, name(&attrs.destination)?))
    }
}
