use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::model::SaveRecord;

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("source '{}' has no folder name to copy into '{}'", source_path.display(), destination.display())]
    NoFolderName {
        source_path: PathBuf,
        destination: PathBuf,
    },
    #[error("source '{}' is not a directory (copying to '{}')", source_path.display(), destination.display())]
    MissingSource {
        source_path: PathBuf,
        destination: PathBuf,
    },
    #[error("failed to remove existing '{}' before copying '{}': {cause}", destination.display(), source_path.display())]
    Remove {
        source_path: PathBuf,
        destination: PathBuf,
        cause: io::Error,
    },
    #[error("failed to copy '{}' to '{}': {cause}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        cause: io::Error,
    },
    #[error("source '{}' and destination '{}' overlap", source_path.display(), destination.display())]
    Overlap {
        source_path: PathBuf,
        destination: PathBuf,
    },
    #[error("failed to walk '{}': {cause}", source_path.display())]
    Walk {
        source_path: PathBuf,
        cause: walkdir::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub dirs: u64,
    pub files: u64,
    pub bytes: u64,
}

/// Outcome of backing up one record.
#[derive(Debug)]
pub struct BackupItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub result: Result<CopyStats, CopyError>,
}

#[derive(Debug)]
pub struct BackupReport {
    pub destination: PathBuf,
    pub started_at: DateTime<Local>,
    pub items: Vec<BackupItem>,
}

impl BackupReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CopyError> {
        self.items.iter().filter_map(|i| i.result.as_ref().err())
    }

    pub fn totals(&self) -> CopyStats {
        self.items
            .iter()
            .filter_map(|i| i.result.as_ref().ok())
            .fold(CopyStats::default(), |acc, s| CopyStats {
                dirs: acc.dirs + s.dirs,
                files: acc.files + s.files,
                bytes: acc.bytes + s.bytes,
            })
    }

    pub fn summary(&self) -> String {
        let totals = self.totals();
        format!(
            "Backed up {} of {} folder(s) to {} ({} files, {} bytes){}",
            self.succeeded(),
            self.items.len(),
            self.destination.display(),
            totals.files,
            totals.bytes,
            if self.failed() > 0 {
                format!(", {} failed", self.failed())
            } else {
                String::new()
            }
        )
    }
}

/// Copies every record into `dest_dir/<folder name>`, one independent result per record.
pub fn backup_all<'a, I>(records: I, dest_dir: &Path) -> BackupReport
where
    I: IntoIterator<Item = &'a SaveRecord>,
{
    let started_at = Local::now();
    let mut items = Vec::new();
    for record in records {
        let source = PathBuf::from(&record.path);
        let (destination, result) = match source.file_name() {
            Some(name) => {
                let destination = dest_dir.join(name);
                let result = replace_tree(&source, &destination);
                (destination, result)
            }
            None => (
                dest_dir.to_path_buf(),
                Err(CopyError::NoFolderName {
                    source_path: source.clone(),
                    destination: dest_dir.to_path_buf(),
                }),
            ),
        };
        match &result {
            Ok(stats) => info!(
                source = %source.display(),
                destination = %destination.display(),
                files = stats.files,
                bytes = stats.bytes,
                "folder backed up"
            ),
            Err(e) => warn!("backup failed: {e}"),
        }
        items.push(BackupItem {
            source,
            destination,
            result,
        });
    }
    let report = BackupReport {
        destination: dest_dir.to_path_buf(),
        started_at,
        items,
    };
    info!("{}", report.summary());
    report
}

fn replace_tree(source: &Path, destination: &Path) -> Result<CopyStats, CopyError> {
    if !source.is_dir() {
        return Err(CopyError::MissingSource {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    ensure_disjoint(source, destination)?;
    if let Ok(meta) = fs::symlink_metadata(destination) {
        let removed = if meta.is_dir() {
            fs::remove_dir_all(destination)
        } else {
            fs::remove_file(destination)
        };
        removed.map_err(|cause| CopyError::Remove {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
            cause,
        })?;
    }
    copy_tree(source, destination)
}

/// Recursive copy of `source` into `destination` (created if missing).
/// Symlinks are followed, so their targets are copied.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<CopyStats, CopyError> {
    ensure_disjoint(source, destination)?;
    let mut stats = CopyStats::default();
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|cause| CopyError::Walk {
            source_path: source.to_path_buf(),
            cause,
        })?;
        let from = entry.path();
        let Ok(rel) = from.strip_prefix(source) else {
            continue;
        };
        let to = destination.join(rel);
        let copy_err = |cause| CopyError::Copy {
            from: from.to_path_buf(),
            to: to.clone(),
            cause,
        };
        if entry.file_type().is_dir() {
            fs::create_dir_all(&to).map_err(copy_err)?;
            if let Ok(meta) = entry.metadata() {
                // A read-only directory would reject the files copied below it.
                if !meta.permissions().readonly() {
                    fs::set_permissions(&to, meta.permissions()).map_err(copy_err)?;
                }
            }
            stats.dirs += 1;
        } else {
            let bytes = fs::copy(from, &to).map_err(copy_err)?;
            stats.files += 1;
            stats.bytes += bytes;
        }
    }
    Ok(stats)
}

/// Neither path may equal or contain the other once symlinks and `..` are resolved.
fn ensure_disjoint(source: &Path, destination: &Path) -> Result<(), CopyError> {
    let src = resolve(source);
    let dst = resolve(destination);
    if dst.starts_with(&src) || src.starts_with(&dst) {
        return Err(CopyError::Overlap {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    Ok(())
}

// The destination usually does not exist yet, so resolve its parent instead.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(p) = fs::canonicalize(path) {
        return p;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            resolve(parent).join(name)
        }
        _ => path.to_path_buf(),
    }
}
