//! Run configuration for batch resolution, loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use zonal_core::ZonalSystemParams;

use crate::error::BatchError;

/// Zonal parameters plus how the batch run should execute.
///
/// Zonal fields sit at the top level of the JSON document:
///
/// ```json
/// { "cell_size": 500.0, "mapping_file_name": "link2zone.csv", "num_threads": 4 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    #[serde(flatten)]
    pub zonal: ZonalSystemParams,
    /// Worker threads for resolution. If None, uses rayon's default.
    pub num_threads: Option<usize>,
    /// Whether to display a progress bar while resolving.
    pub show_progress: bool,
    /// Also write the mapping as Parquet next to the text file.
    pub write_parquet: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            zonal: ZonalSystemParams::default(),
            num_threads: None,
            show_progress: true,
            write_parquet: false,
        }
    }
}

impl BatchConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, BatchError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.zonal = self.zonal.with_cell_size(cell_size);
        self
    }

    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}
