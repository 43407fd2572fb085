//! `langrt manifest <file>`: parse a module manifest.

use std::fmt::Write;

use lang_eval::{parse_manifest, ModuleManifest};

use super::{fail, read_bytes};

/// Manifest fields, one per line; absent optional keys are omitted.
pub fn render_manifest(manifest: &ModuleManifest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "name: {}", manifest.name());
    let _ = writeln!(out, "moduleType: {}", manifest.module_type().name());
    let optional = [
        ("description", manifest.description()),
        ("version", manifest.version()),
        ("minSupportedVersion", manifest.min_supported_version()),
        ("maxSupportedVersion", manifest.max_supported_version()),
        ("nativeEntryPoint", manifest.native_entry_point()),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "{key}: {value}");
        }
    }
    if let Some(implementations) = manifest.supported_implementations() {
        let _ = writeln!(out, "supportedImplementations: {}", implementations.join(", "));
    }
    out
}

pub fn print_manifest(path: &str) {
    let bytes = read_bytes(path);
    let text = String::from_utf8_lossy(&bytes);
    match parse_manifest(&text) {
        Ok(manifest) => print!("{}", render_manifest(&manifest)),
        Err(err) => fail(format!("{path}: {err}")),
    }
}
