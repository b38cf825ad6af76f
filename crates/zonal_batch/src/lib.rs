//! Batch link-to-zone assignment for a whole road network.
//!
//! Loads a network from CSV, resolves every link in parallel and writes the
//! `link_id;zone` mapping. The `link2zone` binary is a thin wrapper over
//! [`run_batch`].

pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod runner;

pub use config::BatchConfig;
pub use error::BatchError;
pub use loader::load_network;
pub use logging::init_tracing;
pub use runner::{resolve_all_links, run_batch, BatchReport, ResolutionStats};
