use super::*;
use chrono::{Duration, TimeZone, Utc};
use std::collections::BTreeSet;
use tempfile::TempDir;

fn open_store() -> (TempDir, ProjectStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ProjectStore::open(dir.path().join("projects")).unwrap();
    (dir, store)
}

fn new_project(store: &ProjectStore) -> ProjectMeta {
    store.create_project(NewProject::default()).unwrap()
}

// ========================================================================
// Project ids and layout
// ========================================================================

#[test]
fn test_generated_ids_are_valid_path_segments() {
    for _ in 0..64 {
        let id = generate_project_id();
        assert_eq!(id.len(), 10);
        assert!(id.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        assert!(crate::security::validate_project_id(&id).is_ok());
    }
}

#[test]
fn test_layout_rejects_escaping_project_ids() {
    let (_dir, store) = open_store();
    for bad in ["..", "../other", "a/b", ""] {
        let err = store.files().read(bad, "index.html").unwrap_err();
        assert!(matches!(err, StoreError::InvalidProjectId(_)), "accepted {:?}", bad);
    }
}

#[test]
fn test_on_disk_layout() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);

    let project_dir = store.layout().path().join(&meta.id);
    assert!(project_dir.join(layout::META_FILE).is_file());
    assert!(project_dir.join(layout::FILES_DIR).join("index.html").is_file());
}

// ========================================================================
// Metadata store
// ========================================================================

#[test]
fn test_create_project_defaults() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);

    assert_eq!(meta.name, format!("Project {}", meta.id));
    assert!(meta.updated_at >= meta.created_at);
    assert_eq!(store.project(&meta.id).unwrap(), meta);
}

#[test]
fn test_create_project_trims_name() {
    let (_dir, store) = open_store();
    let meta = store
        .create_project(NewProject {
            name: Some("  Landing page ".to_string()),
            template: None,
        })
        .unwrap();
    assert_eq!(meta.name, "Landing page");

    let blank = store
        .create_project(NewProject {
            name: Some("   ".to_string()),
            template: None,
        })
        .unwrap();
    assert_eq!(blank.name, format!("Project {}", blank.id));
}

#[test]
fn test_read_missing_record_is_none() {
    let (_dir, store) = open_store();
    assert!(store.metadata().read("nothinghere").unwrap().is_none());
    assert!(store.project("nothinghere").unwrap_err().is_not_found());
}

#[test]
fn test_corrupt_record_reads_as_none() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);
    let path = store.layout().meta_path(&meta.id).unwrap();
    std::fs::write(&path, b"{ not json").unwrap();

    assert!(store.metadata().read(&meta.id).unwrap().is_none());
}

#[test]
fn test_list_orders_by_updated_at_desc() {
    let (_dir, store) = open_store();
    let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let t2 = t1 + Duration::hours(1);
    let t3 = t2 + Duration::hours(1);

    // Created in an order that differs from the expected output
    for (id, ts) in [("second", t2), ("first", t1), ("third", t3)] {
        let mut meta = ProjectMeta::new(id, id);
        meta.created_at = t1;
        meta.updated_at = ts;
        store.metadata().create(&meta).unwrap();
    }

    let ids: Vec<String> = store.list_projects().unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec!["third", "second", "first"]);
}

#[test]
fn test_list_skips_broken_entries() {
    let (_dir, store) = open_store();
    let good = new_project(&store);
    let root = store.layout().path().to_path_buf();

    // Stray file, directory without a record, corrupt record, bad id
    std::fs::write(root.join("stray.txt"), b"x").unwrap();
    std::fs::create_dir_all(root.join("emptyproj")).unwrap();
    std::fs::create_dir_all(root.join("corrupt")).unwrap();
    std::fs::write(root.join("corrupt").join(layout::META_FILE), b"[1,2").unwrap();
    std::fs::create_dir_all(root.join("has space")).unwrap();

    let listed = store.list_projects().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, good.id);
}

#[test]
fn test_list_creates_missing_data_root() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProjectStore::open(dir.path().join("data")).unwrap();
    std::fs::remove_dir_all(dir.path().join("data")).unwrap();

    assert!(store.list_projects().unwrap().is_empty());
    assert!(dir.path().join("data").is_dir());
}

#[test]
fn test_touch_missing_project_is_noop() {
    let (_dir, store) = open_store();
    store.metadata().touch_updated_at("ghost").unwrap();
    assert!(!store.layout().path().join("ghost").exists());
}

#[test]
fn test_touch_never_moves_backwards() {
    let (_dir, store) = open_store();
    let mut meta = ProjectMeta::new("future", "future");
    meta.updated_at = Utc::now() + Duration::days(365);
    store.metadata().create(&meta).unwrap();

    store.metadata().touch_updated_at("future").unwrap();
    let after = store.project("future").unwrap();
    assert_eq!(after.updated_at, meta.updated_at);
}

#[test]
fn test_delete_project_is_idempotent() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);

    store.delete_project(&meta.id).unwrap();
    assert!(store.project(&meta.id).unwrap_err().is_not_found());
    assert!(store.files().list(&meta.id).unwrap().is_empty());

    store.delete_project(&meta.id).unwrap();
}

// ========================================================================
// File store
// ========================================================================

#[test]
fn test_list_basic_template() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);
    let listing = store.files().list(&meta.id).unwrap();

    let template = crate::templates::resolve("basic");
    let expected: BTreeSet<(String, u64)> = template
        .files
        .iter()
        .map(|(path, content)| (path.to_string(), content.len() as u64))
        .collect();
    let actual: BTreeSet<(String, u64)> = listing
        .iter()
        .map(|e| (e.path.clone(), e.size))
        .collect();

    assert_eq!(actual, expected);
    assert!(listing.iter().all(|e| !e.is_directory));
}

#[test]
fn test_list_missing_root_is_empty() {
    let (_dir, store) = open_store();
    assert!(store.files().list("neverseen").unwrap().is_empty());
}

#[test]
fn test_list_directories_precede_descendants() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);
    store.files().write(&meta.id, "a/b/c/deep.txt", b"deep").unwrap();
    store.files().write(&meta.id, "a/top.txt", b"top").unwrap();
    store.files().write(&meta.id, "z/last.txt", b"").unwrap();

    let listing = store.files().list(&meta.id).unwrap();
    for (index, entry) in listing.iter().enumerate() {
        if let Some((parent, _)) = entry.path.rsplit_once('/') {
            let parent_index = listing
                .iter()
                .position(|e| e.is_directory && e.path == parent)
                .unwrap_or_else(|| panic!("no directory entry for {}", parent));
            assert!(parent_index < index, "{} listed before {}", entry.path, parent);
        }
    }

    let dir = listing.iter().find(|e| e.path == "a/b").unwrap();
    assert!(dir.is_directory);
    assert_eq!(dir.size, 0);
}

#[test]
fn test_write_read_round_trip() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);

    let non_utf8 = vec![0xff, 0xfe, 0x00, 0x80, 0xc3];
    let cases: Vec<(&str, &[u8])> = vec![
        ("empty.txt", &b""[..]),
        ("bin/blob.dat", &non_utf8[..]),
        ("index.html", &b"<h1>replaced</h1>"[..]),
    ];
    for (path, bytes) in cases {
        store.files().write(&meta.id, path, bytes).unwrap();
        assert_eq!(store.files().read(&meta.id, path).unwrap(), bytes, "for {}", path);
    }
}

#[test]
fn test_write_normalizes_path() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);
    store.files().write(&meta.id, ".\\docs//guide.md", b"# Guide").unwrap();

    assert_eq!(store.files().read(&meta.id, "docs/guide.md").unwrap(), b"# Guide");
}

#[test]
fn test_traversal_rejected_before_touching_disk() {
    let (dir, store) = open_store();
    let meta = new_project(&store);

    for raw in ["../escape.txt", "../../outside", "/etc/passwd", "a/../../b"] {
        let err = store.files().write(&meta.id, raw, b"x").unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)), "accepted {}", raw);
        assert!(matches!(
            store.files().read(&meta.id, raw).unwrap_err(),
            StoreError::InvalidPath(_)
        ));
        assert!(matches!(
            store.files().delete(&meta.id, raw).unwrap_err(),
            StoreError::InvalidPath(_)
        ));
    }

    assert!(!dir.path().join("projects").join("escape.txt").exists());
    assert!(!dir.path().join("outside").exists());
}

#[test]
fn test_read_missing_and_directory_are_not_found() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);
    store.files().write(&meta.id, "css/app.css", b"").unwrap();

    assert!(store.files().read(&meta.id, "nope.txt").unwrap_err().is_not_found());
    assert!(store.files().read(&meta.id, "css").unwrap_err().is_not_found());
}

#[test]
fn test_write_over_directory_or_through_file_is_invalid() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);
    store.files().write(&meta.id, "css/app.css", b"").unwrap();

    assert!(matches!(
        store.files().write(&meta.id, "css", b"x").unwrap_err(),
        StoreError::InvalidPath(_)
    ));
    assert!(matches!(
        store.files().write(&meta.id, "index.html/child.txt", b"x").unwrap_err(),
        StoreError::InvalidPath(_)
    ));
}

#[test]
fn test_delete_then_read_is_not_found_and_delete_is_idempotent() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);

    store.files().delete(&meta.id, "script.js").unwrap();
    assert!(store.files().read(&meta.id, "script.js").unwrap_err().is_not_found());
    store.files().delete(&meta.id, "script.js").unwrap();
    assert!(!store.files().exists(&meta.id, "script.js").unwrap());
}

#[test]
fn test_delete_directory_is_invalid() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);
    store.files().write(&meta.id, "css/app.css", b"").unwrap();

    let err = store.files().delete(&meta.id, "css").unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath(_)));
    assert!(store.files().exists(&meta.id, "css/app.css").unwrap());
}

#[test]
fn test_mutations_advance_updated_at() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);

    let before = store.project(&meta.id).unwrap().updated_at;
    store.files().write(&meta.id, "index.html", b"v2").unwrap();
    let after_write = store.project(&meta.id).unwrap().updated_at;
    assert!(after_write >= before);

    store.files().delete(&meta.id, "style.css").unwrap();
    let after_delete = store.project(&meta.id).unwrap().updated_at;
    assert!(after_delete >= after_write);

    // created_at is untouched
    assert_eq!(store.project(&meta.id).unwrap().created_at, meta.created_at);
}

#[test]
fn test_write_leaves_no_temp_files() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);
    for i in 0..5 {
        store.files().write(&meta.id, "index.html", format!("v{}", i).as_bytes()).unwrap();
    }

    let files_root = store.layout().files_root(&meta.id).unwrap();
    let leftovers: Vec<_> = std::fs::read_dir(files_root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(layout::TEMP_PREFIX))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_listing_hides_in_flight_temp_files() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);
    let files_root = store.layout().files_root(&meta.id).unwrap();
    std::fs::write(files_root.join(".tmp.1234"), b"partial").unwrap();

    let listing = store.files().list(&meta.id).unwrap();
    assert!(listing.iter().all(|e| !e.path.starts_with(".tmp.")));
}

/// Known race: concurrent writers to one path are not coordinated.
/// Whichever rename lands last wins, but the file is never a mix.
#[test]
fn test_concurrent_writes_last_writer_wins() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);

    let payloads: Vec<Vec<u8>> = (0..4u8).map(|i| vec![b'a' + i; 64 * 1024]).collect();
    std::thread::scope(|scope| {
        for payload in &payloads {
            let store = store.clone();
            let id = meta.id.clone();
            scope.spawn(move || store.files().write(&id, "race.bin", payload).unwrap());
        }
    });

    let result = store.files().read(&meta.id, "race.bin").unwrap();
    assert!(payloads.contains(&result));
}

#[test]
fn test_paths_through_a_file_are_not_found() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);

    let err = store.files().read(&meta.id, "index.html/x").unwrap_err();
    assert!(err.is_not_found(), "got {:?}", err);
    assert!(!store.files().exists(&meta.id, "index.html/x").unwrap());

    store.files().delete(&meta.id, "index.html/x").unwrap();
    store.files().delete(&meta.id, "index.html/x/y.txt").unwrap();
    assert!(store.files().exists(&meta.id, "index.html").unwrap());
}

#[test]
fn test_reserved_temp_names_are_rejected_not_hidden() {
    let (_dir, store) = open_store();
    let meta = new_project(&store);

    let err = store.files().write(&meta.id, ".tmp.notes", b"mine").unwrap_err();
    assert!(matches!(err, StoreError::InvalidPath(_)));

    // Other hidden files round-trip and are listed
    store.files().write(&meta.id, ".notes", b"mine").unwrap();
    let listing = store.files().list(&meta.id).unwrap();
    assert!(listing.iter().any(|e| e.path == ".notes" && e.size == 4));
}

#[test]
fn test_unreadable_record_is_an_error_not_missing() {
    let (_dir, store) = open_store();
    let good = new_project(&store);

    // A directory where project.json should be
    let broken_dir = store.layout().project_dir("broken").unwrap();
    std::fs::create_dir_all(broken_dir.join(layout::META_FILE)).unwrap();

    let err = store.metadata().read("broken").unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "got {:?}", err);
    assert!(matches!(store.project("broken").unwrap_err(), StoreError::Io { .. }));

    // Listing isolates the failure
    let ids: Vec<String> = store.list_projects().unwrap().into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![good.id]);
}
