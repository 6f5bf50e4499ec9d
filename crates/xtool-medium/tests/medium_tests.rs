//! Integration tests for medium resolution and the shared medium contract

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use test_case::test_case;
use xtool_medium::{
    create_medium, create_medium_with, FolderMedium, Medium, MediumKind, MediumOptions,
    PackageMedium,
};

fn write_package(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("lib")).unwrap();
    fs::write(dir.join(format!("{name}.exe")), b"MZ").unwrap();
    fs::write(dir.join("readme.md"), b"# readme").unwrap();
    fs::write(dir.join("lib").join("core.dll"), b"dll").unwrap();
    fs::write(dir.join("config.json"), br#"{"publisher": "acme"}"#).unwrap();
    dir
}

fn packed(temp: &TempDir, name: &str) -> PathBuf {
    let dir = write_package(temp.path(), name);
    let folder = FolderMedium::open(&dir, MediumOptions::default()).unwrap();
    let archive = folder.pack(None).unwrap();
    fs::remove_dir_all(&dir).unwrap();
    archive.path().to_path_buf()
}

enum Layout {
    Folder,
    Archive,
}

fn resolve(temp: &TempDir, layout: Layout) -> PackageMedium {
    let path = match layout {
        Layout::Folder => write_package(temp.path(), "trid"),
        Layout::Archive => packed(temp, "trid"),
    };
    create_medium(&path).unwrap().unwrap()
}

#[test]
fn test_directory_resolves_to_folder() {
    let temp = TempDir::new().unwrap();
    let dir = write_package(temp.path(), "trid");

    let medium = create_medium(&dir).unwrap().unwrap();
    assert_eq!(medium.kind(), MediumKind::Folder);
    assert_eq!(medium.package_name(), "trid");
}

#[test]
fn test_archive_resolves_by_exact_path() {
    let temp = TempDir::new().unwrap();
    let archive = packed(&temp, "trid");

    let medium = create_medium(&archive).unwrap().unwrap();
    assert_eq!(medium.kind(), MediumKind::Archive);
    assert_eq!(medium.package_name(), "trid");
}

#[test]
fn test_archive_resolves_from_bare_name() {
    let temp = TempDir::new().unwrap();
    let archive = packed(&temp, "trid");

    let medium = create_medium(&temp.path().join("trid")).unwrap().unwrap();
    assert_eq!(medium.kind(), MediumKind::Archive);
    assert_eq!(medium.path(), archive.as_path());
}

#[test]
fn test_corrupt_archive_is_not_resolved() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("broken.tar.gz"), b"\x1f\x8bgarbage").unwrap();

    assert!(create_medium(&temp.path().join("broken.tar.gz"))
        .unwrap()
        .is_none());
    assert!(create_medium(&temp.path().join("broken")).unwrap().is_none());
}

#[test_case(Layout::Folder, "trid.exe", true, Some("trid.exe") ; "folder exact")]
#[test_case(Layout::Archive, "trid.exe", true, Some("trid.exe") ; "archive exact")]
#[test_case(Layout::Folder, "trid.ex", true, Some("trid.exe") ; "folder fuzzy")]
#[test_case(Layout::Archive, "trid.ex", true, Some("trid.exe") ; "archive fuzzy")]
#[test_case(Layout::Folder, "trid.ex", false, None ; "fuzzy disabled")]
#[test_case(Layout::Folder, "readme.m", true, None ; "fuzzy needs executable suffix")]
#[test_case(Layout::Folder, "setup.exe", true, None ; "nothing close enough")]
fn test_has_file(layout: Layout, name: &str, fuzzy: bool, expected: Option<&str>) {
    let temp = TempDir::new().unwrap();
    let medium = resolve(&temp, layout);

    let found = medium.has_file(name, fuzzy).unwrap();
    assert_eq!(found.as_deref(), expected);
}

#[test_case(Layout::Folder ; "folder")]
#[test_case(Layout::Archive ; "archive")]
fn test_meta_and_contents(layout: Layout) {
    let temp = TempDir::new().unwrap();
    let medium = resolve(&temp, layout);

    assert_eq!(medium.meta(), &json!({ "publisher": "acme" }));
    assert!(medium.contains("readme.md").unwrap());
    assert!(!medium.contains("readme").unwrap());
    assert_eq!(medium.read_file("readme.md").unwrap(), b"# readme");
}

#[test_case(Layout::Folder ; "folder")]
#[test_case(Layout::Archive ; "archive")]
fn test_copy_to_materializes_full_tree(layout: Layout) {
    let temp = TempDir::new().unwrap();
    let medium = resolve(&temp, layout);

    let dest = temp.path().join("target").join("trid");
    let copy = medium.copy_to(&dest).unwrap();

    assert_eq!(copy.kind(), MediumKind::Folder);
    assert_eq!(
        copy.all_files().unwrap(),
        &["config.json", "lib", "readme.md", "trid.exe"]
    );
    assert_eq!(fs::read(dest.join("lib").join("core.dll")).unwrap(), b"dll");
}

#[test_case(Layout::Folder ; "folder")]
#[test_case(Layout::Archive ; "archive")]
fn test_archive_to_round_trips_contents(layout: Layout) {
    let temp = TempDir::new().unwrap();
    let medium = resolve(&temp, layout);

    let archive = medium.archive_to(&temp.path().join("export").join("trid")).unwrap();
    assert_eq!(archive.kind(), MediumKind::Archive);
    assert_eq!(archive.read_file("lib/core.dll").unwrap(), b"dll");
}

#[test_case(Layout::Folder ; "folder")]
#[test_case(Layout::Archive ; "archive")]
fn test_snapshot_is_detached(layout: Layout) {
    let temp = TempDir::new().unwrap();
    let medium = resolve(&temp, layout);

    let mut snapshot = medium.snapshot().unwrap();
    snapshot.files.push("sentinel".to_string());

    assert!(!medium.all_files().unwrap().contains(&"sentinel".to_string()));
    assert_eq!(snapshot.package_name, "trid");
}

#[test]
fn test_custom_meta_file_and_thresholds() {
    let temp = TempDir::new().unwrap();
    let dir = write_package(temp.path(), "trid");
    fs::write(dir.join("meta.json"), br#"{"custom": true}"#).unwrap();

    let mut options = MediumOptions {
        meta_file: "meta.json".to_string(),
        ..MediumOptions::default()
    };
    options.matching.accept_score = 95;

    let medium = create_medium_with(&dir, &options).unwrap().unwrap();
    assert_eq!(medium.meta(), &json!({ "custom": true }));
    assert_eq!(medium.has_file("trid.ex", true).unwrap(), None);
}
