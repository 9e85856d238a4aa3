/// Fallback for extensions not in the table
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extension (lower case, no dot) -> MIME type
const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("mjs", "text/javascript"),
    ("json", "application/json"),
    ("svg", "image/svg+xml"),
    ("txt", "text/plain"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("ico", "image/x-icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
];

/// Extensions that are always assets, never client-side routes
const ASSET_EXTENSIONS: &[&str] = &["map", "wasm", "mp3", "mp4", "webm", "pdf"];

/// MIME type for an extension, `application/octet-stream` if unknown
pub fn for_extension(ext: Option<&str>) -> &'static str {
    let Some(ext) = ext else {
        return OCTET_STREAM;
    };
    MIME_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM)
}

/// Whether a request with this extension names a static asset
pub fn is_asset_extension(ext: &str) -> bool {
    MIME_TYPES.iter().any(|(known, _)| known.eq_ignore_ascii_case(ext))
        || ASSET_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext))
}

/// Text types get an explicit UTF-8 charset on the wire
pub fn is_textual(mime: &str) -> bool {
    mime.starts_with("text/") || mime == "application/json"
}
