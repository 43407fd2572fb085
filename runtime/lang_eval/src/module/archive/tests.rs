#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use std::io::Write;

fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    writer.add_directory("lang/", options).unwrap();
    for (name, text) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(text.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn test_reads_zip_entries() {
    let bytes = zip_bytes(&[
        (MANIFEST_ENTRY, "name = a\nmoduleType = lang\n"),
        (LANG_ENTRY, "fn.println(hi)"),
    ]);
    let archive = ModuleArchive::from_zip_bytes("/tmp/a.lm", &bytes).unwrap();
    assert_eq!(archive.path(), "/tmp/a.lm");
    let entries = archive.entries();
    assert!(entries["lang/"].is_dir);
    assert_eq!(entries[LANG_ENTRY].size, 14);
    assert_eq!(
        archive.read_text(MANIFEST_ENTRY).as_deref(),
        Some("name = a\nmoduleType = lang\n")
    );
    assert_eq!(archive.read("missing"), None);
}

#[test]
fn test_corrupt_zip_is_archive_error() {
    let err = ModuleArchive::from_zip_bytes("bad.lm", b"not a zip").unwrap_err();
    assert!(matches!(err, ModuleError::Archive { path, .. } if path == "bad.lm"));
}

#[test]
fn test_accessors_return_copies() {
    let archive = ModuleArchive::from_entries("mem", [("lang/module.lang", "x")]);
    let mut content = archive.content();
    content.insert("evil".to_string(), vec![1]);
    content.get_mut("lang/module.lang").unwrap().push(b'y');
    let mut entries = archive.entries();
    entries.clear();

    assert_eq!(archive.read("lang/module.lang"), Some(b"x".to_vec()));
    assert_eq!(archive.read("evil"), None);
    assert!(archive.entries()["lang/"].is_dir);
    assert_eq!(archive.entries().len(), 2);
}
