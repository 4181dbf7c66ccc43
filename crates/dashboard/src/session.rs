use std::sync::Arc;

use indexmap::IndexMap;
use log::info;
use model::{ResolvedPath, Stop, StopSet};
use osrm::RoutingApi;
use rand::rngs::StdRng;

use crate::resolver::{Diagnostic, RouteResolver};
use crate::simulator::PositionSimulator;

/// Per-route mutable record: the resolved path plus the simulated bus
/// position along it. Invariant: `position_index < path.len()`.
#[derive(Debug, Clone)]
pub struct RouteState {
    pub route_key: String,
    pub stops: Vec<Stop>,
    pub path: Arc<ResolvedPath>,
    pub position_index: usize,
}

/// One map session: owns the route table and its lifecycle. Created at
/// session start, discarded at session end; all state is in-memory only.
pub struct Session<A> {
    resolver: RouteResolver<A>,
    simulator: PositionSimulator<StdRng>,
    routes: IndexMap<String, RouteState>,
    diagnostics: Vec<Diagnostic>,
}

impl<A> Session<A>
where
    A: RoutingApi + Send + Sync,
{
    pub async fn start(
        resolver: RouteResolver<A>,
        simulator: PositionSimulator<StdRng>,
        stop_sets: &[StopSet],
    ) -> Self {
        let mut session = Self {
            resolver,
            simulator,
            routes: IndexMap::new(),
            diagnostics: Vec::new(),
        };
        session.rebuild(stop_sets).await;
        session
    }

    /// Re-resolves the input set. Routes whose content is unchanged hit the
    /// cache and keep their simulated progress; changed routes start over at
    /// the origin, and routes that disappeared from the input are dropped.
    /// Routes that failed on an earlier pass get retried here.
    pub async fn rebuild(&mut self, stop_sets: &[StopSet]) {
        let (resolved, diagnostics) = self.resolver.resolve_all(stop_sets).await;

        let mut routes = IndexMap::new();
        for stop_set in stop_sets {
            let path = match resolved.get(&stop_set.route_key) {
                Some(path) => path,
                None => continue,
            };
            let position_index = self
                .routes
                .get(&stop_set.route_key)
                .filter(|state| Arc::ptr_eq(&state.path, path))
                .map(|state| state.position_index)
                .unwrap_or(0);
            routes.insert(
                stop_set.route_key.clone(),
                RouteState {
                    route_key: stop_set.route_key.clone(),
                    stops: stop_set.stops.clone(),
                    path: Arc::clone(path),
                    position_index,
                },
            );
        }

        info!(
            "Session rebuilt with {} of {} route(s).",
            routes.len(),
            stop_sets.len()
        );
        self.routes = routes;
        self.diagnostics = diagnostics;
    }
}

impl<A> Session<A> {
    /// The refresh trigger: advances every route's bus position in one
    /// atomic pass.
    pub fn refresh(&mut self) {
        self.simulator.advance(&mut self.routes);
    }

    pub fn routes(&self) -> &IndexMap<String, RouteState> {
        &self.routes
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
