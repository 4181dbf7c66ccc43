use std::error;
use std::fmt;
use std::sync::Arc;

pub mod client;
pub mod polyline;
pub mod response;

pub use client::{OsrmClient, RoutingApi};
pub use polyline::DecodeError;

/// Public demo instance of the Open Source Routing Machine.
pub const OSRM_PUBLIC_URL: &str = "http://router.project-osrm.org";

#[derive(Debug, Clone)]
pub enum RouteError {
    /// Transport failure or timeout reaching the routing service.
    Network(Arc<reqwest::Error>),
    /// The service responded, but reported no usable route or a non-success
    /// status code.
    Service {
        code: String,
        message: Option<String>,
    },
    /// The response body was not the expected JSON document.
    Json(Arc<serde_json::Error>),
    /// The route geometry failed to decode.
    Geometry(polyline::DecodeError),
}

impl error::Error for RouteError {}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouteError::Network(e) => write!(f, "HTTP request error: {}", e),
            RouteError::Service { code, message } => match message {
                Some(text) => write!(f, "Routing service error ({}): {}", code, text),
                None => write!(
                    f,
                    "Routing service error ({}): no route found or unexpected response.",
                    code
                ),
            },
            RouteError::Json(e) => write!(f, "JSON parse error: {}", e),
            RouteError::Geometry(e) => write!(f, "Geometry decode error: {}", e),
        }
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(e: reqwest::Error) -> Self {
        RouteError::Network(Arc::new(e))
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(e: serde_json::Error) -> Self {
        RouteError::Json(Arc::new(e))
    }
}

impl From<polyline::DecodeError> for RouteError {
    fn from(e: polyline::DecodeError) -> Self {
        RouteError::Geometry(e)
    }
}
