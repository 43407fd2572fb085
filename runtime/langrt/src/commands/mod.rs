//! Command handlers for the `langrt` CLI.
//!
//! Each command has a `render_*` function producing its output as text and
//! a thin wrapper that reads its input, prints and exits with status 1 on
//! failure.

use std::io::Read;
use std::path::Path;

use lang_eval::{Platform, StdPlatform};

mod inspect;
mod manifest;
mod vars;

pub use inspect::{inspect_archive, render_archive};
pub use manifest::{print_manifest, render_manifest};
pub use vars::{print_vars, render_vars};

/// Read a file through the platform, exiting with a message on failure.
pub(crate) fn read_bytes(path: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    let result = StdPlatform
        .open_stream(Path::new(path))
        .and_then(|mut stream| stream.read_to_end(&mut bytes));
    if let Err(e) = result {
        let msg = match e.kind() {
            std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
            std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
            _ => format!("error reading '{path}': {e}"),
        };
        fail(msg);
    }
    bytes
}

/// Print `message` to stderr and exit with status 1.
pub(crate) fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}
