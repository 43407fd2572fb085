//! Read-only module archives.
//!
//! An archive is read completely when it is opened. Afterwards it is an
//! immutable entry index plus a content map; accessors hand out copies so
//! callers can never modify what the registry holds.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};

use super::errors::ModuleError;

/// Archive entry holding the module manifest.
pub const MANIFEST_ENTRY: &str = "data.lmc";

/// Archive entry holding the script of a `lang` module.
pub const LANG_ENTRY: &str = "lang/module.lang";

/// Metadata of one archive entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub size: u64,
    pub is_dir: bool,
}

/// Immutable snapshot of a module archive.
#[derive(Clone, Debug)]
pub struct ModuleArchive {
    path: String,
    entries: BTreeMap<String, ArchiveEntry>,
    content: BTreeMap<String, Vec<u8>>,
}

impl ModuleArchive {
    /// Read a zip archive from `reader`.
    pub fn from_zip<R: Read + Seek>(
        path: impl Into<String>,
        reader: R,
    ) -> Result<Self, ModuleError> {
        let path = path.into();
        let archive_error = |source| ModuleError::Archive {
            path: path.clone(),
            source,
        };
        let mut zip = zip::ZipArchive::new(reader).map_err(archive_error)?;

        let mut entries = BTreeMap::new();
        let mut content = BTreeMap::new();
        for i in 0..zip.len() {
            let mut file = zip.by_index(i).map_err(archive_error)?;
            let name = file.name().to_string();
            let is_dir = file.is_dir();
            entries.insert(
                name.clone(),
                ArchiveEntry {
                    size: file.size(),
                    is_dir,
                },
            );
            if is_dir {
                continue;
            }
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)
                .map_err(|source| ModuleError::Io {
                    path: format!("{path}!{name}"),
                    source,
                })?;
            content.insert(name, bytes);
        }
        tracing::debug!(path = %path, entries = entries.len(), "module archive read");
        Ok(ModuleArchive {
            path,
            entries,
            content,
        })
    }

    /// Read a zip archive held in memory.
    pub fn from_zip_bytes(path: impl Into<String>, bytes: &[u8]) -> Result<Self, ModuleError> {
        Self::from_zip(path, Cursor::new(bytes))
    }

    /// Build an archive from file entries; parent directories are indexed
    /// implicitly.
    pub fn from_entries<I, N, B>(path: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: Into<Vec<u8>>,
    {
        let mut entries = BTreeMap::new();
        let mut content = BTreeMap::new();
        for (name, bytes) in files {
            let name = name.into();
            let bytes = bytes.into();
            for (i, _) in name.match_indices('/') {
                entries.insert(
                    name[..=i].to_string(),
                    ArchiveEntry {
                        size: 0,
                        is_dir: true,
                    },
                );
            }
            entries.insert(
                name.clone(),
                ArchiveEntry {
                    size: bytes.len() as u64,
                    is_dir: false,
                },
            );
            content.insert(name, bytes);
        }
        ModuleArchive {
            path: path.into(),
            entries,
            content,
        }
    }

    /// Path the archive was opened from.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Copy of the entry index.
    pub fn entries(&self) -> BTreeMap<String, ArchiveEntry> {
        self.entries.clone()
    }

    /// Copy of the content map.
    pub fn content(&self) -> BTreeMap<String, Vec<u8>> {
        self.content.clone()
    }

    /// Copy of one entry's bytes.
    pub fn read(&self, name: &str) -> Option<Vec<u8>> {
        self.content.get(name).cloned()
    }

    /// One entry decoded as UTF-8 (lossy).
    pub fn read_text(&self, name: &str) -> Option<String> {
        self.content
            .get(name)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests;
