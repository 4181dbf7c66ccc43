use model::{PathPoint, Stop};
use serde::Serialize;

use crate::resolver::Diagnostic;
use crate::session::{RouteState, Session};

/// Everything a map renderer needs to draw one route: the origin marker,
/// the intermediate stop markers (origin and terminus excluded), the bus
/// marker at the simulated position, and the full road polyline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteView {
    pub route_key: String,
    pub origin: Stop,
    pub intermediate_stops: Vec<Stop>,
    pub bus: PathPoint,
    pub path: Vec<PathPoint>,
}

/// The whole render pass: every successfully resolved route plus one
/// diagnostic per route that failed to resolve. An empty route list is a
/// valid map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub routes: Vec<RouteView>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn route_view(state: &RouteState) -> RouteView {
    RouteView {
        route_key: state.route_key.clone(),
        origin: state.stops[0].clone(),
        intermediate_stops: state.stops[1..state.stops.len() - 1].to_vec(),
        bus: state.path.points()[state.position_index],
        path: state.path.points().to_vec(),
    }
}

pub fn map_view<A>(session: &Session<A>) -> MapView {
    MapView {
        routes: session.routes().values().map(route_view).collect(),
        diagnostics: session.diagnostics().to_vec(),
    }
}
