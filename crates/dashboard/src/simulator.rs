use std::ops::RangeInclusive;

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::session::RouteState;

/// How many refresh ticks a full loop of a route takes, drawn uniformly per
/// route per tick.
pub const DEFAULT_TRIP_LENGTH: RangeInclusive<usize> = 5..=15;

/// Advances every route's position index along its resolved path, modeling a
/// bus that loops its route. The simulator is the only writer of
/// `position_index`.
pub struct PositionSimulator<R> {
    rng: R,
    trip_length: RangeInclusive<usize>,
}

impl PositionSimulator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic simulator for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for PositionSimulator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PositionSimulator<R>
where
    R: Rng,
{
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            trip_length: DEFAULT_TRIP_LENGTH,
        }
    }

    /// The range must be non-empty and start at 1 or more; a trip length of
    /// 0 would divide by zero and an empty range has nothing to draw from.
    pub fn trip_length(mut self, trip_length: RangeInclusive<usize>) -> Self {
        assert!(
            !trip_length.is_empty() && *trip_length.start() >= 1,
            "trip length range must be non-empty and start at 1 or more"
        );
        self.trip_length = trip_length;
        self
    }

    /// One refresh tick: every route advances in the same synchronous pass,
    /// so a renderer never observes a half-updated set of positions.
    ///
    /// Per route, a trip length is drawn and the step derived as
    /// `path_len / trip_length`, clamped to at least 1 so that a draw larger
    /// than the path still moves the bus forward. The new index wraps modulo
    /// the path length, from terminus back toward origin.
    pub fn advance(&mut self, routes: &mut IndexMap<String, RouteState>) {
        for state in routes.values_mut() {
            let path_len = state.path.len();
            let trip_length = self.rng.gen_range(self.trip_length.clone());
            let step = (path_len / trip_length).max(1);
            state.position_index = (state.position_index + step) % path_len;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use model::{PathPoint, ResolvedPath, Stop};

    use super::*;

    fn path(len: usize) -> Arc<ResolvedPath> {
        let points = (0..len)
            .map(|i| PathPoint::new(14.7 + i as f64 * 1e-4, -17.4))
            .collect();
        Arc::new(ResolvedPath::new(points).unwrap())
    }

    fn routes(len: usize) -> IndexMap<String, RouteState> {
        let mut routes = IndexMap::new();
        routes.insert(
            "ligne_1".to_owned(),
            RouteState {
                route_key: "ligne_1".to_owned(),
                stops: vec![
                    Stop::new("a", 14.7, -17.4),
                    Stop::new("b", 14.8, -17.5),
                ],
                path: path(len),
                position_index: 0,
            },
        );
        routes
    }

    #[test]
    fn index_stays_in_range_over_many_ticks() {
        let mut simulator = PositionSimulator::seeded(7);
        let mut routes = routes(97);
        for _ in 0..500 {
            simulator.advance(&mut routes);
            let index = routes["ligne_1"].position_index;
            assert!(index < 97, "index {} out of range", index);
        }
    }

    #[test]
    fn short_paths_still_advance() {
        // every draw from 5..=15 makes path_len / trip_length round to 0
        let mut simulator = PositionSimulator::seeded(7);
        let mut routes = routes(3);
        let mut previous = routes["ligne_1"].position_index;
        for _ in 0..10 {
            simulator.advance(&mut routes);
            let index = routes["ligne_1"].position_index;
            assert_eq!(index, (previous + 1) % 3, "step must clamp to 1");
            previous = index;
        }
    }

    #[test]
    fn progression_is_cyclic() {
        // step is pinned to 50 / 10 = 5, so index 0 must recur after
        // exactly 10 ticks
        let mut simulator = PositionSimulator::seeded(42).trip_length(10..=10);
        let mut routes = routes(50);
        let mut ticks_until_wrap = 0;
        loop {
            simulator.advance(&mut routes);
            ticks_until_wrap += 1;
            if routes["ligne_1"].position_index == 0 {
                break;
            }
            assert!(ticks_until_wrap < 50, "index never wrapped back to 0");
        }
        assert_eq!(ticks_until_wrap, 10);
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let run = || {
            let mut simulator = PositionSimulator::seeded(1234);
            let mut routes = routes(120);
            let mut indices = Vec::new();
            for _ in 0..8 {
                simulator.advance(&mut routes);
                indices.push(routes["ligne_1"].position_index);
            }
            indices
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn fixed_trip_length_gives_exact_step() {
        // trip length pinned to 10 on a 100-point path: step is exactly 10
        let mut simulator = PositionSimulator::seeded(5).trip_length(10..=10);
        let mut routes = routes(100);
        simulator.advance(&mut routes);
        assert_eq!(routes["ligne_1"].position_index, 10);
        simulator.advance(&mut routes);
        assert_eq!(routes["ligne_1"].position_index, 20);
    }

    #[test]
    #[should_panic(expected = "trip length range")]
    fn zero_trip_length_is_rejected() {
        let _ = PositionSimulator::seeded(1).trip_length(0..=5);
    }

    #[test]
    #[should_panic(expected = "trip length range")]
    fn empty_trip_length_range_is_rejected() {
        let _ = PositionSimulator::seeded(1).trip_length(5..=4);
    }

    #[test]
    fn all_routes_advance_on_one_tick() {
        let mut simulator = PositionSimulator::seeded(9).trip_length(10..=10);
        let mut routes = routes(100);
        routes.insert(
            "ligne_2".to_owned(),
            RouteState {
                route_key: "ligne_2".to_owned(),
                stops: vec![
                    Stop::new("c", 14.9, -17.3),
                    Stop::new("d", 15.0, -17.2),
                ],
                path: path(40),
                position_index: 0,
            },
        );
        simulator.advance(&mut routes);
        assert_eq!(routes["ligne_1"].position_index, 10);
        assert_eq!(routes["ligne_2"].position_index, 4);
    }
}
