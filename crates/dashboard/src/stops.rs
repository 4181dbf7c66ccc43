use std::error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use model::{InvalidStopSet, Stop, StopSet};
use serde::Deserialize;

use crate::resolver::Diagnostic;

/// One row of a route's stop-list CSV.
#[derive(Debug, Deserialize)]
struct StopRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

impl From<StopRecord> for Stop {
    fn from(record: StopRecord) -> Self {
        Stop::new(record.name, record.latitude, record.longitude)
    }
}

#[derive(Debug, Clone)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: Arc<io::Error>,
    },
    Csv {
        path: PathBuf,
        source: Arc<csv::Error>,
    },
    InvalidStopSet(InvalidStopSet),
}

impl error::Error for LoadError {}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "Could not read '{}': {}", path.display(), source)
            }
            LoadError::Csv { path, source } => {
                write!(f, "Malformed stop list '{}': {}", path.display(), source)
            }
            LoadError::InvalidStopSet(why) => write!(f, "{}", why),
        }
    }
}

impl From<InvalidStopSet> for LoadError {
    fn from(why: InvalidStopSet) -> Self {
        LoadError::InvalidStopSet(why)
    }
}

/// The route key a file's stop list is loaded under.
fn route_key_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "route".to_owned())
}

/// Loads one route's stop list from a CSV file. The route key is derived
/// from the file stem.
pub fn load_stop_set(path: &Path) -> Result<StopSet, LoadError> {
    let route_key = route_key_of(path);

    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Csv {
        path: path.to_owned(),
        source: Arc::new(source),
    })?;

    let mut stops = Vec::new();
    for row in reader.deserialize() {
        let record: StopRecord = row.map_err(|source| LoadError::Csv {
            path: path.to_owned(),
            source: Arc::new(source),
        })?;
        stops.push(Stop::from(record));
    }

    let stop_set = StopSet::new(route_key, stops);
    stop_set.validate()?;
    Ok(stop_set)
}

/// Loads every `*.csv` under the routes directory, one route per file,
/// ordered by file name so the map renders routes deterministically.
///
/// A file that fails to load aborts only its own route: it is skipped and
/// surfaced once as a diagnostic, and the remaining routes still load. Only
/// an unreadable routes directory is an error.
pub fn load_stop_sets(
    directory: &Path,
) -> Result<(Vec<StopSet>, Vec<Diagnostic>), LoadError> {
    let entries = std::fs::read_dir(directory).map_err(|source| LoadError::Io {
        path: directory.to_owned(),
        source: Arc::new(source),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: directory.to_owned(),
            source: Arc::new(source),
        })?;
        let path = entry.path();
        if path.extension().map(|ext| ext == "csv").unwrap_or(false) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut stop_sets = Vec::new();
    let mut diagnostics = Vec::new();
    for path in &paths {
        match load_stop_set(path) {
            Ok(stop_set) => stop_sets.push(stop_set),
            Err(why) => {
                let diagnostic = Diagnostic {
                    route_key: route_key_of(path),
                    message: why.to_string(),
                };
                warn!("Skipped route file: {}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }
    info!(
        "Loaded {} route(s) from '{}'.",
        stop_sets.len(),
        directory.display()
    );
    Ok((stop_sets, diagnostics))
}
