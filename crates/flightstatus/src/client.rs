//! Flight-status provider client.
//!
//! [`FlightStatusClient`] owns a single cached bearer credential and exposes
//! the two lookups. Clients are plain values: construct one per provider
//! account and share it behind an `Arc` if several tasks need it.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{ClientCredentials, Config, Endpoints};
use crate::credential::{is_token_valid, Credential, TokenResponse};
use crate::error::{Error, RequestFailure, Result};
use crate::model::{AirportResolution, EnrichedFlightStatus, FlightStatusQuery, FlightStatusResult};
use crate::provider::{RouteResponse, StatusEntry, StatusListResponse};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Transport};

/// Client for the flight-data provider.
#[derive(Debug)]
pub struct FlightStatusClient {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    endpoints: Endpoints,
    credentials: ClientCredentials,
    expiry_margin: Duration,
    /// Held across a token refresh so concurrent callers share one request.
    credential: Mutex<Option<Credential>>,
}

impl FlightStatusClient {
    /// Create a client with the default 60 second expiry margin.
    #[must_use]
    pub fn new(
        endpoints: Endpoints,
        credentials: ClientCredentials,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            clock,
            endpoints,
            credentials,
            expiry_margin: Duration::seconds(60),
            credential: Mutex::new(None),
        }
    }

    /// Build a client talking HTTP to the configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the HTTP client cannot
    /// be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.provider.credentials()?;
        let transport = HttpTransport::new(config.request_timeout(), &config.http.user_agent)?;
        Ok(Self::new(
            config.provider.endpoints(),
            credentials,
            Arc::new(transport),
            Arc::new(SystemClock),
        )
        .with_expiry_margin(config.expiry_margin()))
    }

    /// Set how long before the provider's advertised expiry a token is dropped.
    ///
    /// Negative margins are clamped to zero.
    #[must_use]
    pub fn with_expiry_margin(mut self, margin: Duration) -> Self {
        self.expiry_margin = margin.max(Duration::zero());
        self
    }

    /// Return a bearer token, refreshing it if the cached one is absent or
    /// expired.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the token exchange fails. No retry
    /// is attempted.
    pub async fn authenticate(&self) -> Result<String> {
        let mut cached = self.credential.lock().await;

        if let Some(credential) = cached.as_ref() {
            if is_token_valid(Some(credential), self.clock.now()) {
                debug!(expires_at = %credential.expires_at(), "using cached provider token");
                return Ok(credential.access_token().to_string());
            }
            debug!(expires_at = %credential.expires_at(), "provider token expired");
        }

        let credential = self.request_token().await?;
        let token = credential.access_token().to_string();
        info!(expires_at = %credential.expires_at(), "obtained provider token");
        *cached = Some(credential);
        Ok(token)
    }

    /// Drop the cached credential so the next call re-authenticates.
    pub async fn invalidate_token(&self) {
        if self.credential.lock().await.take().is_some() {
            debug!("cached provider token invalidated");
        }
    }

    /// A copy of the cached credential, if any. It may already be expired.
    pub async fn cached_credential(&self) -> Option<Credential> {
        self.credential.lock().await.clone()
    }

    /// Look up a flight's status.
    ///
    /// Returns `Ok(None)` when the provider answers 404 or returns no
    /// entries. Airports are always [`crate::model::UNKNOWN_AIRPORT`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if no token could be obtained and
    /// [`Error::Tracking`] for any other failed status lookup.
    #[instrument(skip(self))]
    pub async fn track_flight(
        &self,
        airline_code: &str,
        flight_number: &str,
    ) -> Result<Option<FlightStatusResult>> {
        let query = FlightStatusQuery::new(airline_code, flight_number);
        let Some((entry, _token)) = self.fetch_status(&query).await? else {
            return Ok(None);
        };
        Ok(Some(entry.into_result(&query, self.clock.now())))
    }

    /// Look up a flight's status and resolve its route to airport names.
    ///
    /// The route lookup is best effort: if it fails, both airports stay
    /// [`crate::model::UNKNOWN_AIRPORT`] and the outcome is recorded in
    /// [`EnrichedFlightStatus::airports`] instead of being returned as an
    /// error.
    ///
    /// # Errors
    ///
    /// Same as [`Self::track_flight`].
    #[instrument(skip(self))]
    pub async fn track_flight_with_airports(
        &self,
        airline_code: &str,
        flight_number: &str,
    ) -> Result<Option<EnrichedFlightStatus>> {
        let query = FlightStatusQuery::new(airline_code, flight_number);
        let Some((entry, token)) = self.fetch_status(&query).await? else {
            return Ok(None);
        };

        let route_id = entry.route_id();
        let mut flight = entry.into_result(&query, self.clock.now());

        let airports = match route_id {
            None => {
                debug!("status entry has no route");
                AirportResolution::NoRoute
            }
            Some(route_id) => match self.resolve_route(&route_id, &token).await {
                Ok((origin, destination)) => {
                    flight.set_airports(origin, destination);
                    AirportResolution::Resolved
                }
                Err(reason) => {
                    warn!(%route_id, %reason, "route lookup failed, airports left unknown");
                    AirportResolution::Failed { reason }
                }
            },
        };

        Ok(Some(EnrichedFlightStatus { flight, airports }))
    }

    async fn request_token(&self) -> Result<Credential> {
        // Read before sending so the computed expiry errs early
        let issued_at = self.clock.now();
        let request = HttpRequest::post_form(
            &self.endpoints.token_url,
            &[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ],
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(Error::authentication)?;
        if !response.is_success() {
            return Err(Error::authentication(status_failure(&response)));
        }

        let token: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| Error::authentication(RequestFailure::Decode(e)))?;
        Ok(Credential::from_response(token, issued_at, self.expiry_margin))
    }

    /// The first status entry for `query` and the token used to fetch it.
    async fn fetch_status(
        &self,
        query: &FlightStatusQuery,
    ) -> Result<Option<(StatusEntry, String)>> {
        let token = self.authenticate().await?;
        let request = HttpRequest::get(&self.endpoints.status_url)
            .query("airlineCode", &query.airline_code)
            .query("flightNumber", &query.flight_number)
            .bearer(&token);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(Error::tracking)?;
        if response.is_not_found() {
            debug!(flight = %query, "provider has no status for flight");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(Error::tracking(status_failure(&response)));
        }

        let list: StatusListResponse = serde_json::from_str(&response.body)
            .map_err(|e| Error::tracking(RequestFailure::Decode(e)))?;
        let entry = list.into_first();
        if entry.is_none() {
            debug!(flight = %query, "provider returned no status entries");
        }
        Ok(entry.map(|e| (e, token)))
    }

    /// Origin and destination airport names for a route.
    async fn resolve_route(
        &self,
        route_id: &str,
        token: &str,
    ) -> std::result::Result<(String, String), String> {
        let mut url =
            reqwest::Url::parse(&self.endpoints.routes_url).map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|()| format!("cannot append route id to {}", self.endpoints.routes_url))?
            .push(route_id);

        let response = self
            .transport
            .send(HttpRequest::get(url.as_str()).bearer(token))
            .await
            .map_err(|e| RequestFailure::from(e).to_string())?;
        if !response.is_success() {
            return Err(status_failure(&response).to_string());
        }

        let route: RouteResponse = serde_json::from_str(&response.body)
            .map_err(|e| RequestFailure::Decode(e).to_string())?;
        route
            .airport_names()
            .ok_or_else(|| "route response is missing airport names".to_string())
    }
}

fn status_failure(response: &HttpResponse) -> RequestFailure {
    RequestFailure::Status {
        code: response.status,
        text: response.error_text(),
    }
}
