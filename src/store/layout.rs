use super::{StoreError, StoreResult};
use log::warn;
use crate::security::{validate_project_id, SafePath};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Name of the per-project metadata record
pub const META_FILE: &str = "project.json";

/// Subdirectory holding the project's virtual filesystem
pub const FILES_DIR: &str = "files";

/// Prefix of in-flight temp files. Listings skip these and the path
/// sanitizer refuses it for user paths.
pub const TEMP_PREFIX: &str = ".tmp.";

/// On-disk layout of the data root:
///
/// ```text
/// <root>/<project id>/project.json
/// <root>/<project id>/files/<relative path>
/// ```
#[derive(Debug, Clone)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Create the data root if it doesn't exist yet
    pub fn ensure(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            StoreError::io(format!("creating data root {}", self.root.display()), e)
        })
    }

    pub fn project_dir(&self, project_id: &str) -> StoreResult<PathBuf> {
        let id = validate_project_id(project_id)?;
        Ok(self.root.join(id))
    }

    pub fn meta_path(&self, project_id: &str) -> StoreResult<PathBuf> {
        Ok(self.project_dir(project_id)?.join(META_FILE))
    }

    pub fn files_root(&self, project_id: &str) -> StoreResult<PathBuf> {
        Ok(self.project_dir(project_id)?.join(FILES_DIR))
    }

    /// Map a sanitized path onto the project's files root
    pub fn file_path(&self, project_id: &str, path: &SafePath) -> StoreResult<PathBuf> {
        let mut full = self.files_root(project_id)?;
        for segment in path.segments() {
            full.push(segment);
        }
        Ok(full)
    }
}

/// Write `bytes` to a uniquely named sibling temp file, fsync it, then
/// rename it over `path`. The parent directory must already exist.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other(format!("no parent for {}", path.display())))?;
    let temp_path = parent.join(format!("{}{}", TEMP_PREFIX, Uuid::new_v4()));

    let result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!("Leaving temp file {}: {}", temp_path.display(), cleanup);
            }
        }
    }
    result
}
