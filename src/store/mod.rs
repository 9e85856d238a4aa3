mod error;
mod files;
pub mod layout;
mod meta;

#[cfg(test)]
mod tests;

pub use error::{StoreError, StoreResult};
pub(crate) use error::is_missing;
pub use files::{FileEntry, FileStore};
pub use layout::DataRoot;
pub use meta::{MetadataStore, ProjectMeta};

use crate::templates;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 10;
const MAX_ID_ATTEMPTS: usize = 8;

/// Random 10-character `[0-9a-z]` project id
pub fn generate_project_id() -> String {
    Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(ID_LEN)
        .map(|b| ID_ALPHABET[*b as usize % ID_ALPHABET.len()] as char)
        .collect()
}

/// Options for [`ProjectStore::create_project`]
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    /// Display name; blank falls back to `Project <id>`
    pub name: Option<String>,
    /// Template key; unknown keys fall back to the default template
    pub template: Option<String>,
}

/// Entry point to the project data: ties the metadata records and the
/// file store to one data root.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    layout: DataRoot,
    meta: MetadataStore,
    files: FileStore,
}

impl ProjectStore {
    /// Open (and create if needed) a data root
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let layout = DataRoot::new(root);
        layout.ensure()?;

        let meta = MetadataStore::new(layout.clone());
        let files = FileStore::new(layout.clone(), meta.clone());
        Ok(Self {
            layout,
            meta,
            files,
        })
    }

    pub fn layout(&self) -> &DataRoot {
        &self.layout
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.meta
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    /// Create the namespace, write its record and seed it from a template.
    /// A failure part way through removes the namespace again.
    pub fn create_project(&self, options: NewProject) -> StoreResult<ProjectMeta> {
        self.layout.ensure()?;

        let id = self.unused_id()?;
        let name = options
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Project {}", id));

        let meta = ProjectMeta::new(&id, name);
        let seeded = self.seed(&meta, options.template.as_deref());
        if let Err(e) = seeded {
            warn!("Creating project {} failed, rolling back: {}", id, e);
            if let Err(cleanup) = self.meta.delete(&id) {
                warn!("Rollback of {} failed: {}", id, cleanup);
            }
            return Err(e);
        }

        info!("Created project {} ({:?})", id, meta.name);
        Ok(self.meta.read(&id)?.unwrap_or(meta))
    }

    /// A project's record, or `NotFound`
    pub fn project(&self, project_id: &str) -> StoreResult<ProjectMeta> {
        self.meta
            .read(project_id)?
            .ok_or_else(|| StoreError::NotFound(format!("project {}", project_id)))
    }

    pub fn list_projects(&self) -> StoreResult<Vec<ProjectMeta>> {
        self.meta.list()
    }

    /// Idempotent
    pub fn delete_project(&self, project_id: &str) -> StoreResult<()> {
        self.meta.delete(project_id)?;
        info!("Deleted project {}", project_id);
        Ok(())
    }

    fn seed(&self, meta: &ProjectMeta, template_key: Option<&str>) -> StoreResult<()> {
        let files_root = self.layout.files_root(&meta.id)?;
        fs::create_dir_all(&files_root)
            .map_err(|e| StoreError::io(format!("creating {}", files_root.display()), e))?;
        self.meta.create(meta)?;
        templates::provision(&self.files, &meta.id, template_key.unwrap_or(templates::DEFAULT_TEMPLATE))?;
        Ok(())
    }

    fn unused_id(&self) -> StoreResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_project_id();
            if !self.layout.project_dir(&id)?.exists() {
                return Ok(id);
            }
        }
        Err(StoreError::io(
            "allocating a project id",
            std::io::Error::other("no free project id after several attempts"),
        ))
    }
}
