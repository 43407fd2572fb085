//! Variable namespaces and identifier rules.
//!
//! Every key of the global variable namespace and of a module's export map
//! is built by [`Namespace::key`]; lookups go through the same function.

use std::fmt;

use lang_value::{illegal_identifier, reserved_identifier, RuntimeResult};

/// Prefix reserved for runtime-injected names.
pub const RESERVED_PREFIX: &str = "LANG";

/// Closed set of variable namespaces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `$name`
    Normal,
    /// `&name`
    Collection,
    /// `fp.name`
    FunctionPointer,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [
        Namespace::Normal,
        Namespace::Collection,
        Namespace::FunctionPointer,
    ];

    #[inline]
    pub fn sigil(self) -> &'static str {
        match self {
            Namespace::Normal => "$",
            Namespace::Collection => "&",
            Namespace::FunctionPointer => "fp.",
        }
    }

    /// Sigiled key for `name`.
    pub fn key(self, name: &str) -> String {
        let mut key = String::with_capacity(self.sigil().len() + name.len());
        key.push_str(self.sigil());
        key.push_str(name);
        key
    }

    /// Namespace of a sigiled key and the bare name behind the sigil.
    pub fn split(key: &str) -> Option<(Namespace, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|ns| key.strip_prefix(ns.sigil()).map(|name| (ns, name)))
    }

    /// Whether names in this namespace may not use the `LANG` prefix.
    #[inline]
    pub fn reserves_lang_prefix(self) -> bool {
        matches!(self, Namespace::Normal | Namespace::Collection)
    }

    /// Validate `name` for an export into this namespace.
    pub fn validate(self, name: &str) -> RuntimeResult<()> {
        validate_identifier(name)?;
        if self.reserves_lang_prefix() && name.starts_with(RESERVED_PREFIX) {
            return Err(reserved_identifier(name));
        }
        Ok(())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sigil())
    }
}

/// `true` if `name` is non-empty and only contains `[A-Za-z0-9_]`.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Fail with `IllegalIdentifier` unless `name` matches `[A-Za-z0-9_]+`.
pub fn validate_identifier(name: &str) -> RuntimeResult<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(illegal_identifier(name))
    }
}
