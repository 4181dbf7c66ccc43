pub mod path;
pub mod stop;

pub use path::{PathPoint, ResolvedPath};
pub use stop::{InvalidStopSet, Stop, StopSet};
