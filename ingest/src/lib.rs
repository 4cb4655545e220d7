//! Reference-data ingestion: reads the raw airport/airline/route files
//! from a data directory and builds the validated in-memory snapshot the
//! analytics engine consumes.

pub mod readers;

use shared::model::FlightSnapshot;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{file} is missing required column {column}")]
    MissingColumn { file: &'static str, column: String },
    #[error("no routes files (routes*.csv) found in {0}")]
    NoRouteFiles(PathBuf),
}

/// Per-file load outcome: rows loaded plus row-numbered rejection reasons.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub file: String,
    pub loaded: usize,
    pub errors: Vec<String>,
}

impl LoadSummary {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    pub fn push_error(&mut self, row: usize, message: impl AsRef<str>) {
        self.errors.push(format!("row {row}: {}", message.as_ref()));
    }
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `airports.dat`, `airlines.csv` and every `routes*.csv` from `dir`
/// into a snapshot. Route files are processed in file-name order so route
/// ids are stable across loads of the same directory.
pub fn load_snapshot(dir: &Path) -> Result<(FlightSnapshot, Vec<LoadSummary>), IngestError> {
    let mut summaries = Vec::new();

    let (airports, summary) = readers::read_airports(open(&dir.join("airports.dat"))?)?;
    summaries.push(summary);
    let (airlines, summary) = readers::read_airlines(open(&dir.join("airlines.csv"))?)?;
    summaries.push(summary);

    let mut snapshot = FlightSnapshot {
        airports: airports.into_iter().map(|a| (a.id, a)).collect(),
        airlines: airlines.into_iter().map(|a| (a.id, a)).collect(),
        routes: Vec::new(),
    };

    let mut route_files = std::fs::read_dir(dir)
        .map_err(|source| IngestError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("routes") && n.ends_with(".csv"))
        })
        .collect::<Vec<_>>();
    if route_files.is_empty() {
        return Err(IngestError::NoRouteFiles(dir.to_path_buf()));
    }
    route_files.sort();

    let mut next_id = 1;
    for path in route_files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("routes.csv")
            .to_string();
        let (routes, summary) = readers::read_routes(
            open(&path)?,
            &name,
            &snapshot.airports,
            &snapshot.airlines,
            &mut next_id,
        )?;
        snapshot.routes.extend(routes);
        summaries.push(summary);
    }

    info!(
        airports = snapshot.airports.len(),
        airlines = snapshot.airlines.len(),
        routes = snapshot.routes.len(),
        "snapshot loaded"
    );
    Ok((snapshot, summaries))
}
