//! Export of the link → zone cache.
//!
//! The text format is `;`-delimited UTF-8 with a `link_id;zone` header and one
//! row per cached link in cache order. Links resolved to no zone get an empty
//! zone field:
//!
//! ```text
//! link_id;zone
//! L1;Z3
//! L2;
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::ZonalError;
use crate::link_resolver::LinkZoneCache;
use crate::zones::ZoneId;

mod parquet;

pub const MAPPING_DELIMITER: u8 = b';';
pub const MAPPING_HEADER: [&str; 2] = ["link_id", "zone"];

/// Outcome of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Data rows written, header excluded.
    pub rows_written: usize,
    /// Cache size when the export started.
    pub expected_rows: usize,
}

impl ExportSummary {
    pub fn is_complete(&self) -> bool {
        self.rows_written == self.expected_rows
    }
}

/// Write the mapping as delimited text to `writer`.
///
/// A row count that differs from the cache size (links still being resolved
/// while exporting) is logged as a warning and reported in the summary; it is
/// not an error.
///
/// # Errors
///
/// Returns an error if writing or flushing fails. Rows written before the
/// failure stay in the sink.
pub fn write_link_zone_mapping<W: Write>(
    cache: &LinkZoneCache,
    writer: W,
) -> Result<ExportSummary, ZonalError> {
    let expected_rows = cache.len();
    info!(entries = expected_rows, "writing link to zone mapping");

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(MAPPING_DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(MAPPING_HEADER)?;
    let mut rows_written = 0;
    for (link_id, zone) in cache.iter() {
        wtr.write_record([link_id.as_str(), zone.map_or("", ZoneId::as_str)])?;
        rows_written += 1;
    }
    wtr.flush()?;

    Ok(check_row_count(rows_written, expected_rows))
}

/// Write the mapping as delimited text to a new file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written. A partially
/// written file is left in place.
pub fn export_link_zone_mapping(
    cache: &LinkZoneCache,
    path: impl AsRef<Path>,
) -> Result<ExportSummary, ZonalError> {
    let file = File::create(path)?;
    write_link_zone_mapping(cache, BufWriter::new(file))
}

/// Write the mapping as a Parquet file with a non-null `link_id` column and a
/// nullable `zone` column.
///
/// # Errors
///
/// Returns an error if the file cannot be created or Parquet writing fails.
pub fn export_link_zone_parquet(
    cache: &LinkZoneCache,
    path: impl AsRef<Path>,
) -> Result<ExportSummary, ZonalError> {
    let expected_rows = cache.len();
    let rows_written = parquet::write_mapping_parquet(cache, path)?;
    Ok(check_row_count(rows_written, expected_rows))
}

fn check_row_count(rows_written: usize, expected_rows: usize) -> ExportSummary {
    let summary = ExportSummary {
        rows_written,
        expected_rows,
    };
    if !summary.is_complete() {
        warn!(
            rows_written,
            expected_rows,
            "link to zone mapping has fewer rows than cached links, links were still being resolved"
        );
    }
    summary
}
