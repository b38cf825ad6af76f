use zonal_core::ZonalError;

/// Errors raised by batch resolution and its input loading.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Zonal(#[from] ZonalError),
    #[error("failed to read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid run configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
