//! `langrt inspect <archive>`: manifest and entry index of a module archive.

use std::fmt::Write;

use lang_eval::module::MANIFEST_ENTRY;
use lang_eval::{parse_manifest, ModuleArchive, ModuleError};

use super::{fail, read_bytes, render_manifest};

/// Manifest followed by the entry index of `archive`.
pub fn render_archive(archive: &ModuleArchive) -> Result<String, ModuleError> {
    let text = archive
        .read_text(MANIFEST_ENTRY)
        .ok_or_else(|| ModuleError::MissingEntry {
            path: archive.path().to_string(),
            entry: MANIFEST_ENTRY,
        })?;
    let manifest = parse_manifest(&text)?;
    tracing::debug!(path = archive.path(), module = manifest.name(), "archive inspected");

    let mut out = format!("archive: {}\n", archive.path());
    out.push_str(&render_manifest(&manifest));
    out.push_str("entries:\n");
    for (name, entry) in archive.entries() {
        if entry.is_dir {
            let _ = writeln!(out, "  {name}");
        } else {
            let _ = writeln!(out, "  {name} ({} bytes)", entry.size);
        }
    }
    Ok(out)
}

pub fn inspect_archive(path: &str) {
    let bytes = read_bytes(path);
    let rendered =
        ModuleArchive::from_zip_bytes(path, &bytes).and_then(|archive| render_archive(&archive));
    match rendered {
        Ok(text) => print!("{text}"),
        Err(err) => fail(err),
    }
}
