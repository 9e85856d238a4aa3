use crate::store::layout::TEMP_PREFIX;
use crate::store::StoreError;
use std::fmt;

/// A project-relative path that has passed [`PathSanitizer::sanitize`].
///
/// Always relative, `/`-separated, with no empty, `.` or `..` segments.
/// The file store only accepts this type, so every access is forced
/// through the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(String);

impl SafePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the `/`-separated segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Lower-cased extension of the final segment, without the dot
    pub fn extension(&self) -> Option<String> {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                Some(ext.to_ascii_lowercase())
            }
            _ => None,
        }
    }
}

impl fmt::Display for SafePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub struct PathSanitizer;

impl PathSanitizer {
    /// Sanitize an untrusted project-relative path to prevent:
    /// - Directory traversal (`..` anywhere, `a/../b` included)
    /// - Absolute paths (`/etc/passwd`, `C:\Windows`, `\\server\share`)
    ///
    /// Backslashes are treated as separators. Empty and `.` segments
    /// are dropped. Hidden files are allowed, except names starting with
    /// the store's temp-file prefix.
    pub fn sanitize(raw_path: &str) -> Result<SafePath, StoreError> {
        if raw_path.is_empty() {
            return Err(StoreError::InvalidPath("Empty path".to_string()));
        }

        if raw_path.contains('\0') {
            return Err(StoreError::InvalidPath(format!(
                "NUL byte in path: {:?}",
                raw_path
            )));
        }

        let unified = raw_path.replace('\\', "/");

        if unified.starts_with('/') {
            return Err(StoreError::InvalidPath(format!(
                "Absolute path not allowed: {}",
                raw_path
            )));
        }

        let mut components = Vec::new();

        for part in unified.split('/') {
            match part {
                "" | "." => continue,
                ".." => {
                    return Err(StoreError::InvalidPath(format!(
                        "Parent directory traversal not allowed: {}",
                        raw_path
                    )));
                }
                _ => {
                    // A prefixed segment replaces the base on push() under Windows
                    if is_drive_prefix(part) {
                        return Err(StoreError::InvalidPath(format!(
                            "Absolute path not allowed: {}",
                            raw_path
                        )));
                    }
                    if part.starts_with(TEMP_PREFIX) {
                        return Err(StoreError::InvalidPath(format!(
                            "Reserved name {:?} in {}",
                            part, raw_path
                        )));
                    }
                    components.push(part);
                }
            }
        }

        if components.is_empty() {
            return Err(StoreError::InvalidPath(format!(
                "No valid components: {}",
                raw_path
            )));
        }

        Ok(SafePath(components.join("/")))
    }
}

/// `C:` style drive designators
fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

const MAX_PROJECT_ID_LEN: usize = 64;

/// Project ids become a directory name under the data root, so only
/// `[A-Za-z0-9_-]` is accepted.
pub fn validate_project_id(id: &str) -> Result<&str, StoreError> {
    if id.is_empty() || id.len() > MAX_PROJECT_ID_LEN {
        return Err(StoreError::InvalidProjectId(format!(
            "length must be 1..={}: {:?}",
            MAX_PROJECT_ID_LEN, id
        )));
    }

    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(StoreError::InvalidProjectId(format!(
            "unexpected character in {:?}",
            id
        )));
    }

    Ok(id)
}
