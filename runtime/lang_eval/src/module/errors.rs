//! Module loading errors.

use lang_value::{InterpretingError, RuntimeError};

/// Failure while parsing, opening, loading or unloading a module.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("invalid module configuration in line \"{line}\": expected \"key = value\"")]
    InvalidConfiguration { line: String },

    #[error("module configuration is missing \"name\"")]
    MissingName,

    #[error("module name \"{name}\" may only contain alphanumeric characters and '_'")]
    IllegalName { name: String },

    #[error("module configuration is missing \"moduleType\"")]
    MissingModuleType,

    #[error("unknown module type \"{module_type}\": expected \"lang\" or \"native\"")]
    UnknownModuleType { module_type: String },

    #[error("native module \"{module}\" has no \"nativeEntryPoint\"")]
    MissingEntryPoint { module: String },

    #[error("invalid version \"{version}\": expected vMAJOR.MINOR.PATCH")]
    InvalidVersion { version: String },

    #[error("module archive \"{path}\" has no \"{entry}\" entry")]
    MissingEntry { path: String, entry: &'static str },

    #[error("module archive \"{path}\" is not readable: {source}")]
    Archive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("module \"{module}\" requires language version {required}, running {actual}")]
    UnsupportedVersion {
        module: String,
        required: String,
        actual: String,
    },

    #[error("module \"{module}\" does not support the \"{implementation}\" implementation")]
    UnsupportedImplementation {
        module: String,
        implementation: String,
    },

    #[error("module \"{module}\" is already loaded")]
    AlreadyLoaded { module: String },

    #[error("module \"{module}\" is not loaded")]
    NotLoaded { module: String },

    #[error("native entry point \"{entry_point}\" of module \"{module}\" is not registered")]
    UnknownEntryPoint { module: String, entry_point: String },

    #[error("module \"{module}\" failed: {source}")]
    Runtime {
        module: String,
        #[source]
        source: RuntimeError,
    },
}

impl ModuleError {
    /// The interpreting error scripts observe for this failure.
    pub fn interpreting_error(&self) -> InterpretingError {
        match self {
            ModuleError::InvalidConfiguration { .. }
            | ModuleError::MissingName
            | ModuleError::IllegalName { .. }
            | ModuleError::MissingModuleType
            | ModuleError::UnknownModuleType { .. }
            | ModuleError::MissingEntryPoint { .. }
            | ModuleError::InvalidVersion { .. }
            | ModuleError::MissingEntry { .. }
            | ModuleError::Archive { .. }
            | ModuleError::Io { .. }
            | ModuleError::UnsupportedVersion { .. }
            | ModuleError::UnsupportedImplementation { .. } => InterpretingError::InvalidModule,
            ModuleError::AlreadyLoaded { .. }
            | ModuleError::NotLoaded { .. }
            | ModuleError::UnknownEntryPoint { .. }
            | ModuleError::Runtime { .. } => InterpretingError::ModuleLoadUnloadErr,
        }
    }
}
