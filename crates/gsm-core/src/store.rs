use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::Error;
use crate::model::Registry;

/// The registry JSON file on disk.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the registry, creating the file with `[]` when it does not exist yet.
    pub fn load(&self) -> Result<Registry, Error> {
        let exists = fs::exists(&self.path).map_err(|source| Error::Read {
            path: self.path.clone(),
            source,
        })?;
        if !exists {
            info!(path = %self.path.display(), "registry file missing, creating empty one");
            let empty = Registry::new();
            self.save(&empty)?;
            return Ok(empty);
        }
        let data = fs::read(&self.path).map_err(|source| Error::Read {
            path: self.path.clone(),
            source,
        })?;
        let registry: Registry = serde_json::from_slice(&data).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), records = registry.len(), "registry loaded");
        Ok(registry)
    }

    /// Replaces the whole file: write to a sibling temp file, then persist over the target.
    pub fn save(&self, registry: &Registry) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(registry)?;
        self.write_atomic(&json).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), records = registry.len(), "registry saved");
        Ok(())
    }

    fn write_atomic(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
