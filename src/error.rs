use std::path::PathBuf;

use thiserror::Error;

/// Result type for scene_markers operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the edges of the crate: loading snapshots and config files.
///
/// Marker derivation itself never fails; malformed values become NaN and
/// missing data yields empty output.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid marker policy: {0}")]
    Policy(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
