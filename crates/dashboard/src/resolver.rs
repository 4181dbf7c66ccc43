use std::collections::HashMap;
use std::error;
use std::fmt;
use std::sync::Arc;

use futures::{stream, StreamExt};
use log::warn;
use model::{InvalidStopSet, ResolvedPath, StopSet};
use osrm::polyline::{self, DecodeError};
use osrm::{RouteError, RoutingApi};
use serde::Serialize;

/// Resolution calls for independent routes are independent, so a rebuild
/// fans them out with bounded concurrency.
pub const MAX_CONCURRENT_RESOLUTIONS: usize = 4;

#[derive(Debug, Clone)]
pub enum ResolveError {
    /// Precondition violation, rejected before any network call.
    InvalidStopSet(InvalidStopSet),
    /// Anything that went wrong talking to or decoding the routing service.
    Routing(RouteError),
}

impl error::Error for ResolveError {}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResolveError::InvalidStopSet(why) => write!(f, "{}", why),
            ResolveError::Routing(why) => write!(f, "{}", why),
        }
    }
}

impl From<InvalidStopSet> for ResolveError {
    fn from(why: InvalidStopSet) -> Self {
        ResolveError::InvalidStopSet(why)
    }
}

impl From<RouteError> for ResolveError {
    fn from(why: RouteError) -> Self {
        ResolveError::Routing(why)
    }
}

impl From<DecodeError> for ResolveError {
    fn from(why: DecodeError) -> Self {
        ResolveError::Routing(RouteError::Geometry(why))
    }
}

/// One surfaced resolution failure; the route it names is simply omitted
/// from the map for this pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub route_key: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Route '{}': {}", self.route_key, self.message)
    }
}

/// Turns stop sets into road-accurate paths via the routing service and
/// caches the results by stop-list content for the lifetime of the process.
/// Paths are handed out as shared references; the resolver stays the owner.
pub struct RouteResolver<A> {
    api: A,
    cache: tokio::sync::RwLock<HashMap<String, Arc<ResolvedPath>>>,
}

impl<A> RouteResolver<A>
where
    A: RoutingApi + Send + Sync,
{
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: tokio::sync::RwLock::new(HashMap::new()),
        }
    }

    /// Resolves one stop set to its road geometry. Identical stop-list
    /// content always yields the same shared path without a second call to
    /// the routing service.
    pub async fn resolve(
        &self,
        stop_set: &StopSet,
    ) -> Result<Arc<ResolvedPath>, ResolveError> {
        stop_set.validate()?;
        let key = stop_set.coordinate_path();

        if let Some(path) = self.cache.read().await.get(&key) {
            return Ok(Arc::clone(path));
        }

        let geometry = self.api.driving_route(&key).await?;
        let points = polyline::decode(&geometry)?;
        let path = ResolvedPath::new(points)
            .ok_or(RouteError::Geometry(DecodeError::EmptyGeometry))?;

        // two tasks may race here for the same content; the first insert
        // wins and both callers end up sharing the same path
        let mut cache = self.cache.write().await;
        let path = cache.entry(key).or_insert_with(|| Arc::new(path));
        Ok(Arc::clone(path))
    }

    /// Resolves a whole input set with bounded concurrency. Failures abort
    /// only the affected route and are surfaced once each, in input order.
    pub async fn resolve_all(
        &self,
        stop_sets: &[StopSet],
    ) -> (HashMap<String, Arc<ResolvedPath>>, Vec<Diagnostic>) {
        let mut results: HashMap<_, _> = stream::iter(stop_sets)
            .map(|stop_set| async move {
                (stop_set.route_key.clone(), self.resolve(stop_set).await)
            })
            .buffer_unordered(MAX_CONCURRENT_RESOLUTIONS)
            .collect()
            .await;

        let mut resolved = HashMap::new();
        let mut diagnostics = Vec::new();
        for stop_set in stop_sets {
            match results.remove(&stop_set.route_key) {
                Some(Ok(path)) => {
                    resolved.insert(stop_set.route_key.clone(), path);
                }
                Some(Err(why)) => {
                    let diagnostic = Diagnostic {
                        route_key: stop_set.route_key.clone(),
                        message: why.to_string(),
                    };
                    warn!("Failed to resolve route: {}", diagnostic);
                    diagnostics.push(diagnostic);
                }
                // duplicate route key, already reported for the first entry
                None => {}
            }
        }
        (resolved, diagnostics)
    }
}
