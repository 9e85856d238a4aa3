//! Compiled-in starter templates and the provisioner that seeds a new
//! project's file store from them.

mod basic;
mod spa;

use crate::store::{FileStore, StoreResult};
use log::debug;

/// Key used when none is given or the given one is unknown
pub const DEFAULT_TEMPLATE: &str = "basic";

/// A named set of starter files
#[derive(Debug)]
pub struct Template {
    pub key: &'static str,
    pub name: &'static str,
    /// Relative path and initial content, in write order
    pub files: &'static [(&'static str, &'static str)],
}

static TEMPLATES: &[Template] = &[
    Template {
        key: "basic",
        name: "Plain HTML",
        files: &[
            ("index.html", basic::INDEX_HTML),
            ("style.css", basic::STYLE_CSS),
            ("script.js", basic::SCRIPT_JS),
        ],
    },
    Template {
        key: "spa",
        name: "Single-page app",
        files: &[
            ("index.html", spa::INDEX_HTML),
            ("css/app.css", spa::APP_CSS),
            ("js/app.js", spa::APP_JS),
        ],
    },
];

/// Every registered template
pub fn all() -> &'static [Template] {
    TEMPLATES
}

pub fn lookup(key: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.key == key)
}

/// Like [`lookup`], but unknown keys resolve to the default template
pub fn resolve(key: &str) -> &'static Template {
    lookup(key)
        .or_else(|| lookup(DEFAULT_TEMPLATE))
        .unwrap_or(&TEMPLATES[0])
}

/// Write every file of template `key` into the project
pub fn provision(files: &FileStore, project_id: &str, key: &str) -> StoreResult<&'static Template> {
    let template = resolve(key);
    if template.key != key {
        debug!("Unknown template {:?}, using {:?}", key, template.key);
    }

    for (path, content) in template.files {
        files.write(project_id, path, content.as_bytes())?;
    }
    Ok(template)
}
