use std::error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named stop along a bus route. Coordinates are decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Stop {
    pub fn new<S: Into<String>>(name: S, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// An ordered list of stops defining one bus route. The first stop is the
/// route's origin, the last its terminus; the order defines the direction
/// the route is driven in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSet {
    pub route_key: String,
    pub stops: Vec<Stop>,
}

impl StopSet {
    pub fn new<S: Into<String>>(route_key: S, stops: Vec<Stop>) -> Self {
        Self {
            route_key: route_key.into(),
            stops,
        }
    }

    /// Checks the routing preconditions: at least two stops, all of them
    /// with plausible decimal-degree coordinates.
    pub fn validate(&self) -> Result<(), InvalidStopSet> {
        if self.stops.len() < 2 {
            return Err(InvalidStopSet::TooFewStops {
                route_key: self.route_key.clone(),
                count: self.stops.len(),
            });
        }
        for stop in &self.stops {
            if !stop.has_valid_coordinates() {
                return Err(InvalidStopSet::InvalidCoordinates {
                    route_key: self.route_key.clone(),
                    stop_name: stop.name.clone(),
                    latitude: stop.latitude,
                    longitude: stop.longitude,
                });
            }
        }
        Ok(())
    }

    /// Renders the stop coordinates in visiting order as
    /// `lon,lat;lon,lat;...`. This is both the OSRM request path segment and
    /// the content key under which resolved routes are cached, so two stop
    /// sets with identical coordinates share one cache entry regardless of
    /// their route keys.
    pub fn coordinate_path(&self) -> String {
        self.stops
            .iter()
            .map(|stop| format!("{},{}", stop.longitude, stop.latitude))
            .collect::<Vec<_>>()
            .join(";")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidStopSet {
    TooFewStops {
        route_key: String,
        count: usize,
    },
    InvalidCoordinates {
        route_key: String,
        stop_name: String,
        latitude: f64,
        longitude: f64,
    },
}

impl error::Error for InvalidStopSet {}

impl fmt::Display for InvalidStopSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidStopSet::TooFewStops { route_key, count } => write!(
                f,
                "Route '{}' has {} stop(s), but at least 2 are required.",
                route_key, count
            ),
            InvalidStopSet::InvalidCoordinates {
                route_key,
                stop_name,
                latitude,
                longitude,
            } => write!(
                f,
                "Stop '{}' of route '{}' has invalid coordinates ({}, {}).",
                stop_name, route_key, latitude, longitude
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dakar_stops() -> Vec<Stop> {
        vec![
            Stop::new("Sacré Coeur", 14.713214, -17.463984),
            Stop::new("Mermoz", 14.706808, -17.472597),
            Stop::new("Ouakam", 14.722425, -17.488613),
        ]
    }

    #[test]
    fn valid_stop_set_passes_validation() {
        let set = StopSet::new("ligne_1", dakar_stops());
        assert!(set.validate().is_ok());
    }

    #[test]
    fn single_stop_is_rejected() {
        let set = StopSet::new("ligne_1", dakar_stops()[..1].to_vec());
        assert_eq!(
            set.validate(),
            Err(InvalidStopSet::TooFewStops {
                route_key: "ligne_1".to_owned(),
                count: 1,
            })
        );
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let mut stops = dakar_stops();
        stops[1].latitude = 91.0;
        let set = StopSet::new("ligne_1", stops);
        assert!(matches!(
            set.validate(),
            Err(InvalidStopSet::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let mut stops = dakar_stops();
        stops[0].longitude = f64::NAN;
        let set = StopSet::new("ligne_1", stops);
        assert!(matches!(
            set.validate(),
            Err(InvalidStopSet::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn coordinate_path_is_longitude_first_in_visiting_order() {
        let set = StopSet::new("ligne_1", dakar_stops()[..2].to_vec());
        assert_eq!(
            set.coordinate_path(),
            "-17.463984,14.713214;-17.472597,14.706808"
        );
    }

    #[test]
    fn coordinate_path_ignores_route_key_and_names() {
        let a = StopSet::new("ligne_1", dakar_stops());
        let mut renamed = dakar_stops();
        for stop in renamed.iter_mut() {
            stop.name = "renamed".to_owned();
        }
        let b = StopSet::new("something_else", renamed);
        assert_eq!(a.coordinate_path(), b.coordinate_path());
    }
}
