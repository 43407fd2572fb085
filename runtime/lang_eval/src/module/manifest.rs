//! Module manifest (`data.lmc`) parsing.
//!
//! The format is line oriented: `#` starts a comment that runs to the end of
//! the line, blank lines are skipped, every other line is `key = value` with
//! the literal separator `" = "`. Unknown keys are ignored.

use std::fmt;

use super::errors::ModuleError;
use super::namespace::is_identifier;
use super::version::LangVersion;

/// Kind of code a module carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModuleType {
    /// Script code in `lang/module.lang`.
    Lang,
    /// Host code reached through a registered native entry point.
    Native,
}

impl ModuleType {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "lang" => Some(ModuleType::Lang),
            "native" => Some(ModuleType::Native),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ModuleType::Lang => "lang",
            ModuleType::Native => "native",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed, immutable module configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleManifest {
    name: String,
    description: Option<String>,
    version: Option<String>,
    min_supported_version: Option<String>,
    max_supported_version: Option<String>,
    supported_implementations: Option<Vec<String>>,
    module_type: ModuleType,
    native_entry_point: Option<String>,
}

impl ModuleManifest {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn min_supported_version(&self) -> Option<&str> {
        self.min_supported_version.as_deref()
    }

    pub fn max_supported_version(&self) -> Option<&str> {
        self.max_supported_version.as_deref()
    }

    pub fn supported_implementations(&self) -> Option<&[String]> {
        self.supported_implementations.as_deref()
    }

    #[inline]
    pub fn module_type(&self) -> ModuleType {
        self.module_type
    }

    /// Entry point of a native module; always `Some` for native modules.
    pub fn native_entry_point(&self) -> Option<&str> {
        self.native_entry_point.as_deref()
    }

    /// Check the version bounds and the implementation allow-list.
    pub fn check_compatibility(
        &self,
        lang_version: LangVersion,
        implementation: &str,
    ) -> Result<(), ModuleError> {
        if let Some(min) = &self.min_supported_version {
            if lang_version < parse_version(min)? {
                return Err(ModuleError::UnsupportedVersion {
                    module: self.name.clone(),
                    required: format!(">= {min}"),
                    actual: lang_version.to_string(),
                });
            }
        }
        if let Some(max) = &self.max_supported_version {
            if lang_version > parse_version(max)? {
                return Err(ModuleError::UnsupportedVersion {
                    module: self.name.clone(),
                    required: format!("<= {max}"),
                    actual: lang_version.to_string(),
                });
            }
        }
        if let Some(allowed) = &self.supported_implementations {
            if !allowed.iter().any(|name| name == implementation) {
                return Err(ModuleError::UnsupportedImplementation {
                    module: self.name.clone(),
                    implementation: implementation.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn parse_version(text: &str) -> Result<LangVersion, ModuleError> {
    LangVersion::parse(text).ok_or_else(|| ModuleError::InvalidVersion {
        version: text.to_string(),
    })
}

/// Parse manifest text.
pub fn parse_manifest(text: &str) -> Result<ModuleManifest, ModuleError> {
    let mut name = None;
    let mut description = None;
    let mut version = None;
    let mut min_supported_version = None;
    let mut max_supported_version = None;
    let mut supported_implementations = None;
    let mut module_type = None;
    let mut native_entry_point = None;

    for raw in text.lines() {
        let line = raw.split_once('#').map_or(raw, |(code, _)| code).trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split(" = ").collect();
        let [key, value] = tokens.as_slice() else {
            return Err(ModuleError::InvalidConfiguration {
                line: line.to_string(),
            });
        };
        let value = value.trim().to_string();
        match key.trim() {
            "name" => name = Some(value),
            "description" => description = Some(value),
            "version" => version = Some(value),
            "minSupportedVersion" => min_supported_version = Some(value),
            "maxSupportedVersion" => max_supported_version = Some(value),
            "supportedImplementations" => {
                supported_implementations = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            "moduleType" => module_type = Some(value),
            "nativeEntryPoint" => native_entry_point = Some(value),
            other => tracing::trace!(key = other, "ignoring unknown manifest key"),
        }
    }

    let name = name.ok_or(ModuleError::MissingName)?;
    if !is_identifier(&name) {
        return Err(ModuleError::IllegalName { name });
    }
    let module_type_text = module_type.ok_or(ModuleError::MissingModuleType)?;
    let module_type = ModuleType::parse(&module_type_text).ok_or_else(|| {
        ModuleError::UnknownModuleType {
            module_type: module_type_text.clone(),
        }
    })?;
    if module_type == ModuleType::Native && native_entry_point.is_none() {
        return Err(ModuleError::MissingEntryPoint { module: name });
    }

    Ok(ModuleManifest {
        name,
        description,
        version,
        min_supported_version,
        max_supported_version,
        supported_implementations,
        module_type,
        native_entry_point,
    })
}

#[cfg(test)]
mod tests;
