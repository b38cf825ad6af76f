use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use zonal_batch::{init_tracing, load_network, run_batch, BatchConfig};

/// Assign every link of a road network to its nearest zone.
#[derive(Debug, Parser)]
#[command(name = "link2zone", version)]
struct Args {
    /// Nodes CSV with columns node_id,x,y
    #[arg(long)]
    nodes: PathBuf,

    /// Links CSV with columns link_id,from_node,to_node
    #[arg(long)]
    links: PathBuf,

    /// JSON run configuration; command-line flags override it
    #[arg(long, env = "LINK2ZONE_PARAMS")]
    params: Option<PathBuf>,

    /// Grid cell size in network units
    #[arg(long)]
    cell_size: Option<f64>,

    /// Directory the mapping is written into
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Also write the mapping as Parquet
    #[arg(long)]
    parquet: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.params {
        Some(path) => BatchConfig::from_json_file(path)?,
        None => BatchConfig::default(),
    };
    if let Some(cell_size) = args.cell_size {
        config = config.with_cell_size(cell_size);
    }
    if let Some(threads) = args.threads {
        config = config.with_num_threads(threads);
    }
    if args.no_progress {
        config = config.with_progress(false);
    }
    config.write_parquet |= args.parquet;

    let network = load_network(&args.nodes, &args.links)?;
    let report = run_batch(network, &config, &args.output_dir)?;

    info!(
        path = %report.mapping_path.display(),
        rows = report.mapping.rows_written,
        unresolved = report.stats.unresolved,
        "wrote link to zone mapping"
    );
    if let Some(path) = &report.parquet_path {
        info!(path = %path.display(), "wrote parquet mapping");
    }
    Ok(())
}
