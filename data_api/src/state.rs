use parking_lot::RwLock;
use shared::AnalyticsConfig;
use shared::model::FlightSnapshot;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared handler state. The snapshot sits behind an `RwLock<Arc<_>>` so
/// a reload swaps it atomically while in-flight report computations keep
/// the `Arc` they already cloned.
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<RwLock<Arc<FlightSnapshot>>>,
    pub data_dir: Arc<PathBuf>,
    pub defaults: Arc<AnalyticsConfig>,
}

impl AppState {
    pub fn new(snapshot: FlightSnapshot, data_dir: PathBuf, defaults: AnalyticsConfig) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            data_dir: Arc::new(data_dir),
            defaults: Arc::new(defaults),
        }
    }

    pub fn snapshot(&self) -> Arc<FlightSnapshot> {
        self.snapshot.read().clone()
    }

    pub fn replace_snapshot(&self, snapshot: FlightSnapshot) {
        *self.snapshot.write() = Arc::new(snapshot);
    }
}
