//! Error types for the runtime core.
//!
//! # Structured Error Categories
//!
//! `RuntimeErrorKind` carries the structured data of each failure. Factory
//! functions (e.g. `type_mismatch()`) are the public API; they populate both
//! `kind` and `message`. Every kind maps onto an `InterpretingError` so the
//! failure can be surfaced to scripts through `$LANG_ERRNO`.

use std::fmt;

use crate::executor::ScopeId;
use crate::interpreting_error::InterpretingError;
use crate::value::DataType;

/// Result of a fallible runtime operation.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    // Types
    TypeMismatch {
        expected: DataType,
        got: DataType,
    },

    // Mutability
    FinalDataChange {
        name: Option<String>,
    },

    // Identifiers
    IllegalIdentifier {
        name: String,
    },
    ReservedIdentifier {
        name: String,
    },

    // Modules
    InvalidModuleState {
        module: String,
        state: &'static str,
    },

    // Scopes
    ScopeExhausted {
        scope: ScopeId,
    },

    // Functions
    UnknownFunction {
        name: String,
    },
    StackOverflow {
        depth: usize,
    },
    FunctionNotSupported {
        feature: String,
    },

    // Composites
    StructConstraintViolation {
        struct_name: String,
        field: String,
        got: DataType,
    },
    StructFieldCount {
        struct_name: String,
        expected: usize,
        got: usize,
    },
    StructDefinitionAccess {
        struct_name: String,
    },
    UnknownStructField {
        struct_name: String,
        field: String,
    },
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },

    /// An interpreting error raised on purpose by native or script code.
    Interpreting {
        error: InterpretingError,
        message: Option<String>,
    },

    /// Catch-all for errors without a structured kind.
    Custom {
        message: String,
    },
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::FinalDataChange { name: Some(name) } => {
                write!(f, "cannot change final data: {name}")
            }
            Self::FinalDataChange { name: None } => write!(f, "cannot change final data"),
            Self::IllegalIdentifier { name } => write!(
                f,
                "illegal identifier \"{name}\": only alphanumeric characters and '_' are allowed"
            ),
            Self::ReservedIdentifier { name } => {
                write!(f, "identifier \"{name}\" must not start with \"LANG\"")
            }
            Self::InvalidModuleState { module, state } => write!(
                f,
                "module \"{module}\" is in state {state}: exports are only possible while loading"
            ),
            Self::ScopeExhausted { scope } => write!(f, "no free scope below scope {scope}"),
            Self::UnknownFunction { name } => write!(f, "function \"{name}\" was not found"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::FunctionNotSupported { feature } => write!(f, "not supported: {feature}"),
            Self::StructConstraintViolation {
                struct_name,
                field,
                got,
            } => write!(
                f,
                "field \"{field}\" of struct \"{struct_name}\" does not accept {got}"
            ),
            Self::StructFieldCount {
                struct_name,
                expected,
                got,
            } => write!(
                f,
                "struct \"{struct_name}\" expects {expected} fields, got {got}"
            ),
            Self::StructDefinitionAccess { struct_name } => write!(
                f,
                "struct definition \"{struct_name}\" has no member values"
            ),
            Self::UnknownStructField { struct_name, field } => {
                write!(f, "struct \"{struct_name}\" has no field \"{field}\"")
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::Interpreting {
                error,
                message: Some(message),
            } => write!(f, "{}: {message}", error.description()),
            Self::Interpreting {
                error,
                message: None,
            } => write!(f, "{}", error.description()),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Runtime error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeError {
    /// Structured error category.
    pub kind: RuntimeErrorKind,
    /// Human-readable message (`kind.to_string()` for factory-created errors).
    pub message: String,
}

impl RuntimeError {
    /// Create an error with just a message (`Custom` kind).
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        RuntimeError {
            kind: RuntimeErrorKind::Custom {
                message: message.clone(),
            },
            message,
        }
    }

    fn from_kind(kind: RuntimeErrorKind) -> Self {
        let message = kind.to_string();
        RuntimeError { kind, message }
    }

    /// The interpreting error scripts observe for this failure.
    pub fn interpreting_error(&self) -> InterpretingError {
        match &self.kind {
            RuntimeErrorKind::TypeMismatch { .. }
            | RuntimeErrorKind::StructConstraintViolation { .. } => {
                InterpretingError::IncompatibleDataType
            }
            RuntimeErrorKind::FinalDataChange { .. } => InterpretingError::FinalVarChange,
            RuntimeErrorKind::IllegalIdentifier { .. }
            | RuntimeErrorKind::ReservedIdentifier { .. }
            | RuntimeErrorKind::StructFieldCount { .. } => InterpretingError::InvalidArguments,
            RuntimeErrorKind::InvalidModuleState { .. } => InterpretingError::ModuleLoadUnloadErr,
            RuntimeErrorKind::UnknownFunction { .. } => InterpretingError::FunctionNotFound,
            RuntimeErrorKind::StackOverflow { .. } | RuntimeErrorKind::ScopeExhausted { .. } => {
                InterpretingError::StackOverflow
            }
            RuntimeErrorKind::FunctionNotSupported { .. } => {
                InterpretingError::FunctionNotSupported
            }
            RuntimeErrorKind::StructDefinitionAccess { .. }
            | RuntimeErrorKind::UnknownStructField { .. } => InterpretingError::InvalidArguments,
            RuntimeErrorKind::IndexOutOfBounds { .. } => InterpretingError::IndexOutOfBounds,
            RuntimeErrorKind::Interpreting { error, .. } => *error,
            RuntimeErrorKind::Custom { .. } => InterpretingError::SystemError,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RuntimeError {}

// Type Errors

/// Accessor or operand used against the wrong tag.
#[cold]
pub fn type_mismatch(expected: DataType, got: DataType) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::TypeMismatch { expected, got })
}

// Mutability Errors

/// Write to a final value.
#[cold]
pub fn final_data_change(name: Option<&str>) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::FinalDataChange {
        name: name.map(str::to_string),
    })
}

// Identifier Errors

/// Identifier containing characters outside `[A-Za-z0-9_]`.
#[cold]
pub fn illegal_identifier(name: &str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::IllegalIdentifier {
        name: name.to_string(),
    })
}

/// Identifier using the reserved `LANG` prefix.
#[cold]
pub fn reserved_identifier(name: &str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::ReservedIdentifier {
        name: name.to_string(),
    })
}

// Module Errors

/// Export attempted outside of a module's load phase.
#[cold]
pub fn invalid_module_state(module: &str, state: &'static str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::InvalidModuleState {
        module: module.to_string(),
        state,
    })
}

// Scope Errors

/// Every scope id below `scope` is taken or out of range.
#[cold]
pub fn scope_exhausted(scope: ScopeId) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::ScopeExhausted { scope })
}

// Function Errors

/// Predefined function name that does not resolve.
#[cold]
pub fn unknown_function(name: &str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::UnknownFunction {
        name: name.to_string(),
    })
}

/// Call depth limit exceeded.
#[cold]
pub fn stack_overflow(depth: usize) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::StackOverflow { depth })
}

/// Feature that needs a host hook which is not installed.
#[cold]
pub fn function_not_supported(feature: &str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::FunctionNotSupported {
        feature: feature.to_string(),
    })
}

// Composite Errors

/// Struct field value whose tag is not allowed by the field's constraint.
#[cold]
pub fn struct_constraint_violation(struct_name: &str, field: &str, got: DataType) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::StructConstraintViolation {
        struct_name: struct_name.to_string(),
        field: field.to_string(),
        got,
    })
}

/// Struct instance created with the wrong number of fields.
#[cold]
pub fn struct_field_count(struct_name: &str, expected: usize, got: usize) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::StructFieldCount {
        struct_name: struct_name.to_string(),
        expected,
        got,
    })
}

/// Member access on a struct definition.
#[cold]
pub fn struct_definition_access(struct_name: &str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::StructDefinitionAccess {
        struct_name: struct_name.to_string(),
    })
}

/// Unknown struct member name.
#[cold]
pub fn unknown_struct_field(struct_name: &str, field: &str) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::UnknownStructField {
        struct_name: struct_name.to_string(),
        field: field.to_string(),
    })
}

/// Array index outside `0..len`.
#[cold]
pub fn index_out_of_bounds(index: usize, len: usize) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::IndexOutOfBounds { index, len })
}

// Interpreting Errors

/// Raise an interpreting error kind, optionally with a message.
#[cold]
pub fn interpreting(error: InterpretingError, message: Option<&str>) -> RuntimeError {
    RuntimeError::from_kind(RuntimeErrorKind::Interpreting {
        error,
        message: message.map(str::to_string),
    })
}
