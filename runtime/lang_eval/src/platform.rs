//! Host platform boundary.
//!
//! The runtime never touches the file system or the terminal directly; it
//! goes through a `Platform`. `StdPlatform` is the default, backed by the
//! standard library.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// File access, prompts and host facts used by the runtime.
pub trait Platform {
    /// Files directly below `path`, sorted.
    fn list_files(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Bare file name of `path`.
    fn file_name(&self, path: &Path) -> Option<String> {
        path.file_name().map(|name| name.to_string_lossy().into_owned())
    }

    /// Buffered character reader for `path`.
    fn read_text(&self, path: &Path) -> io::Result<Box<dyn BufRead>>;

    /// Byte stream for `path`.
    fn open_stream(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Best-effort write of a translation map to `path`.
    ///
    /// Returns `false` when unsupported or when the write failed.
    fn write_translation(&self, _path: &Path, _translations: &BTreeMap<String, String>) -> bool {
        false
    }

    /// Show `text` and block until the user answers.
    fn prompt(&self, text: &str) -> io::Result<String>;

    fn os_name(&self) -> String;

    fn os_version(&self) -> String;

    fn os_arch(&self) -> String;

    fn file_separator(&self) -> String;

    fn line_separator(&self) -> String;
}

/// `Platform` backed by `std`.
#[derive(Copy, Clone, Debug, Default)]
pub struct StdPlatform;

impl Platform for StdPlatform {
    fn list_files(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn read_text(&self, path: &Path) -> io::Result<Box<dyn BufRead>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn open_stream(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }

    fn write_translation(&self, path: &Path, translations: &BTreeMap<String, String>) -> bool {
        let mut out = String::new();
        for (key, value) in translations {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(value);
            out.push('\n');
        }
        match fs::write(path, out) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "translation not written");
                false
            }
        }
    }

    fn prompt(&self, text: &str) -> io::Result<String> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(text.as_bytes())?;
        stderr.flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn os_name(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn os_version(&self) -> String {
        fs::read_to_string("/proc/sys/kernel/osrelease")
            .map(|release| release.trim().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }

    fn os_arch(&self) -> String {
        std::env::consts::ARCH.to_string()
    }

    fn file_separator(&self) -> String {
        std::path::MAIN_SEPARATOR_STR.to_string()
    }

    fn line_separator(&self) -> String {
        if cfg!(windows) { "\r\n" } else { "\n" }.to_string()
    }
}
