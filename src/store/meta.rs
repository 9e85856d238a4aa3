use super::layout::{write_atomic, DataRoot, META_FILE};
use super::{is_missing, StoreError, StoreResult};
use crate::security::validate_project_id;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;

/// Persisted per-project record (`project.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectMeta {
    /// New record with both timestamps set to now
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Reads and writes `ProjectMeta` records under the data root.
///
/// Nothing is cached; every call goes back to disk.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    layout: DataRoot,
}

impl MetadataStore {
    pub fn new(layout: DataRoot) -> Self {
        Self { layout }
    }

    /// Persist a record, creating the project namespace if needed
    pub fn create(&self, meta: &ProjectMeta) -> StoreResult<()> {
        let dir = self.layout.project_dir(&meta.id)?;
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError::io(format!("creating {}", dir.display()), e))?;
        self.persist(meta)
    }

    /// Missing and corrupt records both read as `None`; any other
    /// storage failure is an error
    pub fn read(&self, project_id: &str) -> StoreResult<Option<ProjectMeta>> {
        let path = self.layout.meta_path(project_id)?;
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if is_missing(&e) => return Ok(None),
            Err(e) => return Err(StoreError::io(format!("reading {}", path.display()), e)),
        };

        match serde_json::from_slice::<ProjectMeta>(&raw) {
            Ok(meta) => Ok(Some(meta)),
            Err(source) => {
                let err = StoreError::Parse {
                    context: path.display().to_string(),
                    source,
                };
                warn!("{}", err);
                Ok(None)
            }
        }
    }

    /// All readable projects, most recently updated first
    pub fn list(&self) -> StoreResult<Vec<ProjectMeta>> {
        self.layout.ensure()?;
        let root = self.layout.path();
        let entries = fs::read_dir(root)
            .map_err(|e| StoreError::io(format!("reading {}", root.display()), e))?;

        let mut projects = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", root.display(), e);
                    continue;
                }
            };

            match entry.file_type() {
                Ok(ft) if ft.is_dir() => {}
                _ => continue,
            }

            let name = entry.file_name();
            let Some(id) = name.to_str() else {
                debug!("Skipping non UTF-8 directory {:?}", name);
                continue;
            };
            if validate_project_id(id).is_err() {
                debug!("Skipping directory with invalid project id {:?}", id);
                continue;
            }

            match self.read(id) {
                Ok(Some(meta)) => projects.push(meta),
                Ok(None) => debug!("Skipping {} without a valid {}", id, META_FILE),
                Err(e) => warn!("Skipping {}: {}", id, e),
            }
        }

        // sort_by is stable, ties keep directory order
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    /// Bump `updated_at` to now. Never moves it backwards, and does
    /// nothing if the project is gone.
    pub fn touch_updated_at(&self, project_id: &str) -> StoreResult<()> {
        let Some(mut meta) = self.read(project_id)? else {
            return Ok(());
        };
        meta.updated_at = meta.updated_at.max(Utc::now());

        // The namespace is not recreated here so a concurrent delete wins
        match self.persist(&meta) {
            Err(StoreError::NotFound(_)) => Ok(()),
            other => other,
        }
    }

    /// Remove the whole namespace, metadata and files
    pub fn delete(&self, project_id: &str) -> StoreResult<()> {
        let dir = self.layout.project_dir(project_id)?;
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!("Deleted project {}", project_id);
                Ok(())
            }
            Err(e) if is_missing(&e) => Ok(()),
            Err(e) => Err(StoreError::io(format!("removing {}", dir.display()), e)),
        }
    }

    fn persist(&self, meta: &ProjectMeta) -> StoreResult<()> {
        let path = self.layout.meta_path(&meta.id)?;
        let json = serde_json::to_vec_pretty(meta).map_err(|source| StoreError::Parse {
            context: format!("serializing {}", meta.id),
            source,
        })?;
        write_atomic(&path, &json).map_err(|e| StoreError::from_io(&meta.id, e))
    }
}
