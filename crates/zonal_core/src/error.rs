use crate::network::{LinkId, NodeId};
use crate::zones::ZoneId;

/// Errors raised while building the zonal system or exporting its link mapping.
///
/// Spatial misses are not errors: an unknown zone id is `None` and a link with
/// no nearest zone is cached as unresolved.
#[derive(Debug, thiserror::Error)]
pub enum ZonalError {
    #[error("grid cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f64),
    #[error("grid zones require a cell size but none was configured")]
    MissingCellSize,
    #[error("grid of {columns} x {rows} cells is too large, use a bigger cell size")]
    GridTooLarge { columns: usize, rows: usize },
    #[error("zone {0} is defined more than once")]
    DuplicateZone(ZoneId),
    #[error("node {0} is defined more than once")]
    DuplicateNode(NodeId),
    #[error("link {0} is defined more than once")]
    DuplicateLink(LinkId),
    #[error("node {0} is not part of the network")]
    UnknownNode(NodeId),
    #[error("link {0} is not part of the network")]
    UnknownLink(LinkId),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
