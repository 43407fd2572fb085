//! Lang Value - value model of the Lang runtime.
//!
//! This crate provides:
//! - The tagged-union value type (`Value`, `Data`, `DataType`, `ValueFlags`)
//! - Callable descriptors (`FunctionPointer`) and struct schemas
//! - The closed `InterpretingError` enumeration scripts observe
//! - Runtime errors (`RuntimeError`, `RuntimeResult`) and their factories
//! - Equality and ordering predicates
//! - The `FunctionExecutor` seam implemented by the interpreter
//!
//! # Mutability
//!
//! Every write path (`Value::set_data`, array element and struct member
//! writes) checks the `FINAL` flag and fails with a `FinalDataChange` error
//! instead of mutating.

mod errors;
mod executor;
mod interpreting_error;
pub mod ordering;
mod stack;
mod value;

pub use errors::{
    final_data_change, function_not_supported, illegal_identifier, index_out_of_bounds,
    interpreting, invalid_module_state, reserved_identifier, scope_exhausted, stack_overflow,
    struct_constraint_violation, struct_definition_access, struct_field_count, type_mismatch,
    unknown_function, unknown_struct_field, RuntimeError, RuntimeErrorKind, RuntimeResult,
};
pub use executor::{FunctionExecutor, ScopeId};
pub use interpreting_error::InterpretingError;
pub use stack::ensure_sufficient_stack;
pub use value::{
    ArrayValue, Data, DataType, ErrorValue, FunctionPointer, NativeFn, NativeFunction,
    PredefinedFunction, StructObject, StructSchema, TypeConstraint, UserFunction, Value,
    ValueFlags,
};
