mod mime;


pub use mime::{for_extension, is_asset_extension, OCTET_STREAM};

use crate::security::PathSanitizer;
use crate::store::{FileStore, StoreError, StoreResult};
use clap::ValueEnum;
use log::debug;
use sha2::{Digest, Sha256};

/// Page served for the project root and for SPA fallbacks
pub const INDEX_PAGE: &str = "index.html";

/// When a miss is answered with the project's `index.html`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SpaFallback {
    /// Every missing path
    #[default]
    Always,
    /// Only paths without a known asset extension (`/about`, not `/app.css`)
    ClientRoutes,
    /// Plain 404s
    Never,
}

impl SpaFallback {
    fn allows(self, request_path: &str) -> bool {
        match self {
            SpaFallback::Always => true,
            SpaFallback::Never => false,
            SpaFallback::ClientRoutes => match PathSanitizer::sanitize(request_path) {
                Ok(path) => !path.extension().is_some_and(|ext| is_asset_extension(&ext)),
                Err(_) => false,
            },
        }
    }
}

/// Bytes to serve plus how they were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    /// True when this is `index.html` standing in for a missing path
    pub fallback: bool,
}

impl Resolved {
    /// MIME type with `charset=utf-8` for text
    pub fn content_type(&self) -> String {
        if mime::is_textual(self.mime) {
            format!("{}; charset=utf-8", self.mime)
        } else {
            self.mime.to_string()
        }
    }

    /// Strong validator over the content
    pub fn etag(&self) -> String {
        format!("\"{}\"", hex::encode(Sha256::digest(&self.bytes)))
    }
}

/// Maps preview request paths onto a project's files
#[derive(Debug, Clone)]
pub struct StaticResolver {
    files: FileStore,
    fallback: SpaFallback,
}

impl StaticResolver {
    pub fn new(files: FileStore, fallback: SpaFallback) -> Self {
        Self { files, fallback }
    }

    pub fn fallback(&self) -> SpaFallback {
        self.fallback
    }

    /// Resolve `request_path` (empty means `index.html`) in a project.
    ///
    /// A missing file falls back to `index.html` as `text/html` when the
    /// policy allows it. Invalid paths and I/O failures are returned as is.
    pub fn resolve(&self, project_id: &str, request_path: &str) -> StoreResult<Resolved> {
        let trimmed = request_path.trim_start_matches(['/', '\\']);
        let path = if trimmed.is_empty() { INDEX_PAGE } else { trimmed };

        match self.files.read(project_id, path) {
            Ok(bytes) => {
                let ext = PathSanitizer::sanitize(path)?.extension();
                Ok(Resolved {
                    bytes,
                    mime: for_extension(ext.as_deref()),
                    fallback: false,
                })
            }
            Err(StoreError::NotFound(what)) => {
                if !self.fallback.allows(path) {
                    return Err(StoreError::NotFound(what));
                }
                debug!("{} missing, serving {} instead", what, INDEX_PAGE);
                let bytes = self.files.read(project_id, INDEX_PAGE)?;
                Ok(Resolved {
                    bytes,
                    mime: "text/html",
                    fallback: true,
                })
            }
            Err(e) => Err(e),
        }
    }
}
