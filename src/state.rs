//! Application state: the dataset loaded once at startup, plus config and the
//! load report.
//!
//! The dataset is immutable after construction, so handlers share the state
//! behind an `Arc` and serve any number of concurrent requests without
//! locking. Rebuilding means restarting the process.

use tracing::{info, instrument};

use crate::config::{load_bot_config_from_env, BotConfig};
use crate::dataset::Dataset;
use crate::source::{self, LoadReport};

pub struct AppState {
    pub dataset: Dataset,
    pub config: BotConfig,
    pub report: LoadReport,
}

impl AppState {
    /// Build state from env: load config, resolve the dataset through the
    /// candidate tiers, log the startup inventory.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_bot_config_from_env().unwrap_or_default();
        let (dataset, report) = source::resolve(&config);
        info!(
            target: "dataset",
            rows = dataset.len(),
            categories = dataset.categories().len(),
            tier = report.tier,
            source = %report.source,
            "Startup dataset inventory"
        );
        Self::from_parts(dataset, config, report)
    }

    pub fn from_parts(dataset: Dataset, config: BotConfig, report: LoadReport) -> Self {
        Self { dataset, config, report }
    }
}
