use serde::{Deserialize, Serialize};

use crate::error::ZonalError;

/// Default name of the exported link → zone mapping file.
pub const DEFAULT_MAPPING_FILE_NAME: &str = "link2zone.csv";

/// Parameters for building a zonal system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZonalSystemParams {
    /// Edge length of grid zones, in network units. Required for grid zones.
    pub cell_size: Option<f64>,
    /// File name of the mapping written into the output directory.
    pub mapping_file_name: String,
}

impl Default for ZonalSystemParams {
    fn default() -> Self {
        Self {
            cell_size: None,
            mapping_file_name: DEFAULT_MAPPING_FILE_NAME.to_string(),
        }
    }
}

impl ZonalSystemParams {
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    pub fn with_mapping_file_name(mut self, name: impl Into<String>) -> Self {
        self.mapping_file_name = name.into();
        self
    }

    /// The configured cell size, checked to be positive and finite.
    pub fn require_cell_size(&self) -> Result<f64, ZonalError> {
        match self.cell_size {
            None => Err(ZonalError::MissingCellSize),
            Some(size) if size.is_finite() && size > 0.0 => Ok(size),
            Some(size) => Err(ZonalError::InvalidCellSize(size)),
        }
    }
}
