use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::response::RouteResponse;
use crate::RouteError;

/// An unbounded wait would stall the whole render pass, so every request
/// carries a timeout; expiry surfaces as a network error.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Seam to the external routing service. The engine only ever asks for the
/// encoded geometry of the most efficient driving route through an ordered
/// coordinate list.
#[async_trait]
pub trait RoutingApi {
    /// `coordinate_path` is the `lon,lat;lon,lat;...` visiting order.
    async fn driving_route(&self, coordinate_path: &str) -> Result<String, RouteError>;
}

pub struct OsrmClient {
    base_url: String,
    http: reqwest::Client,
}

impl OsrmClient {
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self, RouteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout<S: Into<String>>(
        base_url: S,
        timeout: Duration,
    ) -> Result<Self, RouteError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http,
        })
    }
}

#[async_trait]
impl RoutingApi for OsrmClient {
    async fn driving_route(&self, coordinate_path: &str) -> Result<String, RouteError> {
        let url = format!(
            "{}/route/v1/driving/{}?overview=full&geometries=polyline",
            self.base_url, coordinate_path
        );
        debug!("Requesting route '{url}'.");

        let response = self.http.get(&url).send().await?;
        match response.status() {
            reqwest::StatusCode::OK => {
                let parsed: RouteResponse =
                    serde_json::from_str(&response.text().await?)?;
                parsed.into_geometry()
            }
            status => {
                // OSRM reports request errors with a 4xx status and the
                // diagnostic in the body.
                let body = response.text().await.ok().filter(|text| !text.is_empty());
                Err(RouteError::Service {
                    code: status.to_string(),
                    message: body,
                })
            }
        }
    }
}
