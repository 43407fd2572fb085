//! Seam between values and the interpreter that executes them.
//!
//! Native functions receive a `&mut dyn FunctionExecutor` so they can call
//! back into the interpreter (invoke other function pointers, read and write
//! scope variables, record errors) without the value crate depending on the
//! evaluator.

use std::fmt;

use crate::errors::RuntimeResult;
use crate::interpreting_error::InterpretingError;
use crate::value::{FunctionPointer, Value};

/// Integer key selecting one variable table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub i32);

impl ScopeId {
    /// Scope of the outermost execution.
    pub const ROOT: ScopeId = ScopeId(0);

    /// The scope one level deeper than `self`, `None` past `i32::MAX`.
    #[must_use]
    pub fn next(self) -> Option<ScopeId> {
        self.0.checked_add(1).map(ScopeId)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calling convention and scope access offered to native code.
pub trait FunctionExecutor {
    /// Invoke `function` with `args` in `scope`.
    ///
    /// `Ok(None)` means the callee returned nothing.
    fn call_function_pointer(
        &mut self,
        function: &FunctionPointer,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Option<Value>>;

    /// Read a variable of `scope` by its sigiled name.
    fn get_variable(&self, scope: ScopeId, name: &str) -> Option<Value>;

    /// Assign a variable of `scope`; final variables reject the write.
    fn set_variable(&mut self, scope: ScopeId, name: &str, value: Value) -> RuntimeResult<()>;

    /// Record `error` in the scope's `$LANG_ERRNO` slot.
    fn set_errno(&mut self, scope: ScopeId, error: InterpretingError);
}
