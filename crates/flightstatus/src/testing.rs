//! Test doubles shared by unit tests.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::FlightStatusClient;
use crate::clock::Clock;
use crate::config::{ClientCredentials, Endpoints};
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

pub(crate) const TOKEN_URL: &str = "https://api.test/oauth/token";
pub(crate) const STATUS_URL: &str = "https://api.test/flight-status";
pub(crate) const ROUTES_URL: &str = "https://api.test/routes";

type Handler =
    Box<dyn Fn(&HttpRequest, usize) -> Result<HttpResponse, TransportError> + Send + Sync>;

struct Route {
    url: String,
    calls: usize,
    handler: Handler,
}

/// A [`Transport`] answering from per-URL handlers and recording every request.
///
/// Handlers receive the request and how many times they were called before.
/// The most recently registered handler for a URL wins.
pub(crate) struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
    latency: Option<Duration>,
}

impl fmt::Debug for FakeTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeTransport")
            .field("requests", &self.requests.lock().unwrap().len())
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            latency: None,
        }
    }

    /// Every request sleeps for `latency` before being answered.
    pub(crate) fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::new()
        }
    }

    pub(crate) fn on<F>(&self, url: &str, handler: F)
    where
        F: Fn(&HttpRequest, usize) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        self.routes.lock().unwrap().push(Route {
            url: url.to_string(),
            calls: 0,
            handler: Box::new(handler),
        });
    }

    pub(crate) fn respond(&self, url: &str, status: u16, body: &str) {
        let response = HttpResponse::new(status, body);
        self.on(url, move |_, _| Ok(response.clone()));
    }

    pub(crate) fn fail(&self, url: &str, error: TransportError) {
        self.on(url, move |_, _| Err(error.clone()));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    pub(crate) fn count_prefix(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut routes = self.routes.lock().unwrap();
        let Some(route) = routes.iter_mut().rev().find(|r| r.url == request.url) else {
            return Err(TransportError::Other(format!("no handler for {}", request.url)));
        };
        let calls = route.calls;
        route.calls += 1;
        (route.handler)(&request, calls)
    }
}

/// A client pointed at the fake `api.test` endpoints.
pub(crate) fn test_client(transport: Arc<FakeTransport>, clock: Arc<dyn Clock>) -> FlightStatusClient {
    FlightStatusClient::new(
        Endpoints {
            token_url: TOKEN_URL.to_string(),
            status_url: STATUS_URL.to_string(),
            routes_url: ROUTES_URL.to_string(),
        },
        ClientCredentials {
            client_id: "test-id".to_string(),
            client_secret: "test-secret".to_string(),
        },
        transport,
        clock,
    )
}

pub(crate) fn token_body(token: &str, expires_in: u64) -> String {
    serde_json::json!({
        "access_token": token,
        "expires_in": expires_in,
        "token_type": "Bearer",
    })
    .to_string()
}

/// A single delayed DL123 entry, linked to `route_id` if given.
pub(crate) fn status_body(route_id: Option<&str>) -> String {
    let relationships = match route_id {
        Some(id) => serde_json::json!({"route": {"data": {"type": "routes", "id": id}}}),
        None => serde_json::json!({}),
    };
    serde_json::json!({
        "data": [{
            "id": "fs-1",
            "attributes": {
                "flightNumber": "123",
                "airlineCode": "DL",
                "airlineName": "Delta Air Lines",
                "status": "Delayed",
                "departure": {
                    "terminal": "S",
                    "gate": "B12",
                    "scheduledTime": "2024-06-01T08:00:00Z",
                    "actualTime": "2024-06-01T08:25:00Z",
                    "delay": 25
                },
                "arrival": {"terminal": "A", "scheduledTime": "2024-06-01T11:00:00Z"},
                "aircraft": {"registration": "N123DL", "type": "A321"},
                "lastUpdated": "2024-06-01T07:58:00Z"
            },
            "relationships": relationships
        }]
    })
    .to_string()
}

pub(crate) fn route_body(origin: &str, destination: &str) -> String {
    serde_json::json!({
        "data": {
            "id": "route",
            "attributes": {
                "origin": {"name": origin},
                "destination": {"name": destination}
            }
        }
    })
    .to_string()
}
