//! Parallel link resolution using rayon.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};
use zonal_core::{ExportSummary, LinkId, Network, RoadNetwork, ZonalSystem};

use crate::config::BatchConfig;
use crate::error::BatchError;

/// Outcome of resolving every link in a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolutionStats {
    pub links: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Resolve every network link, in parallel, into the system's cache.
///
/// Cache slots are reserved in network order before any worker starts, so the
/// exported mapping is identical whatever the thread count.
///
/// * `num_threads` - If None, uses rayon's default.
/// * `show_progress` - Whether to display a progress bar
pub fn resolve_all_links(
    system: &ZonalSystem,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<ResolutionStats, BatchError> {
    let link_ids: Vec<LinkId> = system.network().link_ids().cloned().collect();
    system.resolver().reserve(&link_ids)?;

    let total = link_ids.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    let resolved = pool.install(|| {
        link_ids
            .par_iter()
            .map(|link_id| {
                let zone = system.zone_for_link(link_id);
                if let Some(ref progress_bar) = pb {
                    progress_bar.inc(1);
                }
                zone.map(|zone| usize::from(zone.is_some()))
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))
    })?;

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    let stats = ResolutionStats {
        links: total,
        resolved,
        unresolved: total - resolved,
    };
    if stats.unresolved > 0 {
        warn!(unresolved = stats.unresolved, "links without a zone");
    }
    info!(links = stats.links, resolved = stats.resolved, "resolved network links");
    Ok(stats)
}

/// Files written by [`run_batch`] and what went into them.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub stats: ResolutionStats,
    pub mapping_path: PathBuf,
    pub mapping: ExportSummary,
    pub parquet_path: Option<PathBuf>,
}

/// Build the zonal system for `network`, resolve every link and write the
/// mapping into `output_dir`.
pub fn run_batch(
    network: RoadNetwork,
    config: &BatchConfig,
    output_dir: impl AsRef<Path>,
) -> Result<BatchReport, BatchError> {
    let network: Arc<dyn Network> = Arc::new(network);
    let system = ZonalSystem::build(network, &config.zonal)?;
    let stats = resolve_all_links(&system, config.num_threads, config.show_progress)?;

    let output_dir = output_dir.as_ref();
    let mapping_path = output_dir.join(&config.zonal.mapping_file_name);
    let mapping = system.write_link_to_zone(&mapping_path)?;

    let parquet_path = if config.write_parquet {
        let path = mapping_path.with_extension("parquet");
        system.write_link_to_zone_parquet(&path)?;
        Some(path)
    } else {
        None
    };

    Ok(BatchReport {
        stats,
        mapping_path,
        mapping,
        parquet_path,
    })
}
