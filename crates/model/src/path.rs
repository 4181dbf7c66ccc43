use serde::{Deserialize, Serialize};

/// A single point of road geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl PathPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Dense road-following geometry for one route, as decoded from the routing
/// service's polyline. Always non-empty; read-only once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPath {
    points: Vec<PathPoint>,
}

impl ResolvedPath {
    /// Returns `None` for an empty point list, since an empty path has no
    /// position a bus could occupy.
    pub fn new(points: Vec<PathPoint>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}
