pub mod render;
pub mod resolver;
pub mod session;
pub mod simulator;
pub mod stops;

pub use render::{map_view, route_view, MapView, RouteView};
pub use resolver::{Diagnostic, ResolveError, RouteResolver};
pub use session::{RouteState, Session};
pub use simulator::PositionSimulator;
