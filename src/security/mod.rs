mod path;


pub use path::{PathSanitizer, SafePath, validate_project_id};
