//! `flightstatus` - Client for a third-party flight-status provider
//!
//! This library authenticates against the provider with an OAuth2
//! client-credentials exchange, caches the bearer token until shortly before
//! it expires, and looks up flight status, optionally resolving the route to
//! departure and arrival airport names.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod client;
pub mod clock;
pub mod config;
pub mod credential;
pub mod error;
pub mod logging;
pub mod model;
pub mod provider;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::FlightStatusClient;
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use credential::{is_token_valid, Credential};
pub use error::{Error, RequestFailure, Result};
pub use logging::init_logging;
pub use model::{
    Aircraft, AirportResolution, EnrichedFlightStatus, FlightStatusQuery, FlightStatusResult,
    LegInfo, UNKNOWN_AIRPORT,
};
pub use transport::{HttpTransport, Transport, TransportError};
