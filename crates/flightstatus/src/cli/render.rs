//! Plain-text and JSON rendering for CLI output.

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::Result;
use crate::model::{AirportResolution, FlightStatusResult, LegInfo};

#[derive(Serialize)]
struct FlightOutput<'a> {
    flight: &'a FlightStatusResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    airports: Option<&'a AirportResolution>,
}

/// Render a flight status as pretty-printed JSON.
///
/// The airport resolution is included only when one is given.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn render_flight_json(
    flight: &FlightStatusResult,
    airports: Option<&AirportResolution>,
) -> Result<String> {
    Ok(serde_json::to_string_pretty(&FlightOutput { flight, airports })?)
}

/// Render a flight status as aligned plain text.
#[must_use]
pub fn render_flight(flight: &FlightStatusResult, airports: Option<&AirportResolution>) -> String {
    let mut out = String::new();
    let title = format!("{}{}", flight.airline_code, flight.flight_number);
    let _ = writeln!(out, "{title}  {}", flight.airline_name);
    let _ = writeln!(out, "{}", "-".repeat(title.len() + 2 + flight.airline_name.len()));
    let _ = writeln!(out, "Status:        {}", flight.status);
    render_leg(&mut out, "Departure", &flight.departure);
    render_leg(&mut out, "Arrival", &flight.arrival);
    if let Some(aircraft) = &flight.aircraft {
        let _ = writeln!(
            out,
            "Aircraft:      {} ({})",
            aircraft.aircraft_type, aircraft.registration
        );
    }
    let _ = writeln!(
        out,
        "Last updated:  {}",
        flight.last_updated.format("%Y-%m-%d %H:%M UTC")
    );
    if let Some(AirportResolution::Failed { reason }) = airports {
        let _ = writeln!(out, "Note:          airports unavailable ({reason})");
    }
    out
}

fn render_leg(out: &mut String, label: &str, leg: &LegInfo) {
    let _ = writeln!(out, "{:<15}{}", format!("{label}:"), leg.airport);
    let mut details = Vec::new();
    if let Some(terminal) = &leg.terminal {
        details.push(format!("terminal {terminal}"));
    }
    if let Some(gate) = &leg.gate {
        details.push(format!("gate {gate}"));
    }
    if !details.is_empty() {
        let _ = writeln!(out, "               {}", details.join(", "));
    }
    let _ = writeln!(out, "  scheduled    {}", leg.scheduled_time);
    if let Some(actual) = &leg.actual_time {
        let _ = writeln!(out, "  actual       {actual}");
    }
    if let Some(delay) = leg.delay.filter(|d| *d != 0) {
        let _ = writeln!(out, "  delay        {delay} min");
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::{Aircraft, UNKNOWN_AIRPORT};

    fn flight() -> FlightStatusResult {
        FlightStatusResult {
            flight_number: "123".to_string(),
            airline_code: "DL".to_string(),
            airline_name: "Delta Air Lines".to_string(),
            departure: LegInfo {
                airport: "Atlanta".to_string(),
                terminal: Some("S".to_string()),
                gate: Some("B12".to_string()),
                scheduled_time: "08:00".to_string(),
                actual_time: Some("08:25".to_string()),
                delay: Some(25),
            },
            arrival: LegInfo {
                airport: UNKNOWN_AIRPORT.to_string(),
                terminal: None,
                gate: None,
                scheduled_time: "11:00".to_string(),
                actual_time: None,
                delay: Some(0),
            },
            status: "Delayed".to_string(),
            aircraft: Some(Aircraft {
                registration: "N123DL".to_string(),
                aircraft_type: "A321".to_string(),
            }),
            last_updated: Utc.with_ymd_and_hms(2024, 6, 1, 7, 58, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_flight() {
        let text = render_flight(&flight(), None);
        assert!(text.starts_with("DL123  Delta Air Lines\n"));
        assert!(text.contains("Status:        Delayed"));
        assert!(text.contains("Departure:     Atlanta"));
        assert!(text.contains("terminal S, gate B12"));
        assert!(text.contains("delay        25 min"));
        assert!(text.contains("Arrival:       Unknown"));
        assert!(text.contains("Aircraft:      A321 (N123DL)"));
        assert!(text.contains("Last updated:  2024-06-01 07:58 UTC"));
    }

    #[test]
    fn test_zero_delay_is_hidden() {
        let text = render_flight(&flight(), None);
        assert_eq!(text.matches("delay ").count(), 1);
    }

    #[test]
    fn test_render_failed_resolution_note() {
        let failed = AirportResolution::Failed {
            reason: "request timed out".to_string(),
        };
        let text = render_flight(&flight(), Some(&failed));
        assert!(text.contains("airports unavailable (request timed out)"));

        let text = render_flight(&flight(), Some(&AirportResolution::Resolved));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn test_render_flight_json() {
        let json = render_flight_json(&flight(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["flight"]["airline_code"], "DL");
        assert!(value.get("airports").is_none());

        let json = render_flight_json(&flight(), Some(&AirportResolution::NoRoute)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["airports"]["outcome"], "no_route");
    }
}
