use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read registry {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("registry {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write registry {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
}
