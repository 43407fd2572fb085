//! Language version numbers (`vMAJOR.MINOR.PATCH`).

use std::fmt;

/// Parsed language version, ordered component-wise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LangVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl LangVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        LangVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parse `vMAJOR.MINOR.PATCH`, with an optional `-suffix` that is ignored
    /// for ordering.
    pub fn parse(text: &str) -> Option<Self> {
        let numbers = text.trim().strip_prefix('v')?;
        let numbers = numbers.split_once('-').map_or(numbers, |(n, _)| n);
        let mut parts = numbers.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(LangVersion::new(major, minor, patch))
    }
}

impl fmt::Display for LangVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}
