use super::layout::{write_atomic, DataRoot, TEMP_PREFIX};
use super::meta::MetadataStore;
use super::{is_missing, StoreError, StoreResult};
use crate::security::{PathSanitizer, SafePath};
use log::debug;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One node of a project's file tree, computed per listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// `/`-separated path relative to the project's files root
    pub path: String,
    pub is_directory: bool,
    /// Length in bytes, 0 for directories
    pub size: u64,
}

/// Per-project virtual filesystem rooted at `<data root>/<id>/files`.
///
/// Every path goes through [`PathSanitizer`] before it touches the disk.
/// Writes and deletes bump the project's `updated_at`.
///
/// Two writers on the same path race; the last rename wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    layout: DataRoot,
    meta: MetadataStore,
}

impl FileStore {
    pub fn new(layout: DataRoot, meta: MetadataStore) -> Self {
        Self { layout, meta }
    }

    /// Depth-first listing, each directory before its contents.
    /// A project without a files root lists as empty.
    pub fn list(&self, project_id: &str) -> StoreResult<Vec<FileEntry>> {
        let root = self.layout.files_root(project_id)?;
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let context = format!("walking {}", root.display());
                match e.into_io_error() {
                    Some(source) => StoreError::io(context, source),
                    None => StoreError::io(context, io::Error::other("filesystem loop")),
                }
            })?;

            let file_type = entry.file_type();
            let is_directory = file_type.is_dir();
            if !is_directory && !file_type.is_file() {
                continue;
            }
            if !is_directory && entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX) {
                continue;
            }

            let size = if is_directory {
                0
            } else {
                entry
                    .metadata()
                    .map_err(|e| {
                        StoreError::io(
                            format!("reading metadata of {}", entry.path().display()),
                            e.into_io_error()
                                .unwrap_or_else(|| io::Error::other("metadata unavailable")),
                        )
                    })?
                    .len()
            };

            entries.push(FileEntry {
                path: relative_path(&root, entry.path()),
                is_directory,
                size,
            });
        }

        Ok(entries)
    }

    /// Read a file's bytes. Directories count as missing.
    pub fn read(&self, project_id: &str, raw_path: &str) -> StoreResult<Vec<u8>> {
        let (path, full) = self.resolve(project_id, raw_path)?;
        let what = format!("{}/{}", project_id, path);

        let metadata = fs::metadata(&full).map_err(|e| StoreError::from_io(&what, e))?;
        if metadata.is_dir() {
            return Err(StoreError::NotFound(what));
        }

        fs::read(&full).map_err(|e| StoreError::from_io(&what, e))
    }

    /// Create or replace a file, creating parent directories as needed
    pub fn write(&self, project_id: &str, raw_path: &str, bytes: &[u8]) -> StoreResult<()> {
        let (path, full) = self.resolve(project_id, raw_path)?;
        let files_root = self.layout.files_root(project_id)?;
        ensure_no_file_ancestor(&files_root, &path)?;

        if full.is_dir() {
            return Err(StoreError::InvalidPath(format!("{} is a directory", path)));
        }

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::io(format!("creating {}", parent.display()), e))?;
        }

        write_atomic(&full, bytes)
            .map_err(|e| StoreError::io(format!("writing {}/{}", project_id, path), e))?;
        debug!("Wrote {} bytes to {}/{}", bytes.len(), project_id, path);

        self.meta.touch_updated_at(project_id)
    }

    /// Remove a single file. Already-absent files are fine.
    pub fn delete(&self, project_id: &str, raw_path: &str) -> StoreResult<()> {
        let (path, full) = self.resolve(project_id, raw_path)?;

        match fs::symlink_metadata(&full) {
            Ok(metadata) if metadata.is_dir() => {
                return Err(StoreError::InvalidPath(format!("{} is a directory", path)));
            }
            Ok(_) => match fs::remove_file(&full) {
                Ok(()) => debug!("Deleted {}/{}", project_id, path),
                Err(e) if is_missing(&e) => {}
                Err(e) => {
                    return Err(StoreError::io(
                        format!("removing {}/{}", project_id, path),
                        e,
                    ))
                }
            },
            Err(e) if is_missing(&e) => {}
            Err(e) => return Err(StoreError::io(format!("accessing {}/{}", project_id, path), e)),
        }

        self.meta.touch_updated_at(project_id)
    }

    /// Whether `raw_path` names an existing regular file
    pub fn exists(&self, project_id: &str, raw_path: &str) -> StoreResult<bool> {
        let (_, full) = self.resolve(project_id, raw_path)?;
        Ok(full.is_file())
    }

    fn resolve(&self, project_id: &str, raw_path: &str) -> StoreResult<(SafePath, PathBuf)> {
        let path = PathSanitizer::sanitize(raw_path)?;
        let full = self.layout.file_path(project_id, &path)?;
        Ok((path, full))
    }
}

/// A regular file can't also be a directory on the way to `path`
fn ensure_no_file_ancestor(files_root: &Path, path: &SafePath) -> StoreResult<()> {
    let segments: Vec<&str> = path.segments().collect();
    let mut current = files_root.to_path_buf();
    for segment in &segments[..segments.len().saturating_sub(1)] {
        current.push(segment);
        match fs::metadata(&current) {
            Ok(metadata) if !metadata.is_dir() => {
                return Err(StoreError::InvalidPath(format!(
                    "{} is a file, not a directory",
                    current.strip_prefix(files_root).unwrap_or(&current).display()
                )));
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    Ok(())
}

fn relative_path(root: &Path, full: &Path) -> String {
    let rel = full.strip_prefix(root).unwrap_or(full);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
