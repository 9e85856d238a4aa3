// Public API exports
pub mod config;
pub mod preview;
pub mod security;
pub mod server;
pub mod store;
pub mod templates;

// Re-export main types for convenience
pub use preview::{Resolved, SpaFallback, StaticResolver};
pub use security::{PathSanitizer, SafePath};
pub use store::{
    FileEntry, FileStore, MetadataStore, NewProject, ProjectMeta, ProjectStore, StoreError,
    StoreResult,
};
pub use templates::Template;
