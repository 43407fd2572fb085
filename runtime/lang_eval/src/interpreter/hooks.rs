//! Host-installed execution hooks.
//!
//! The runtime core does not parse or evaluate script text. Hosts that do
//! install these hooks through the builder.

use lang_value::{RuntimeResult, ScopeId, UserFunction, Value};

use super::Interpreter;
use crate::module::ModuleBridge;

/// Executes script-defined (`Normal`) function pointers.
pub trait UserFunctionExecutor {
    fn call(
        &self,
        interpreter: &mut Interpreter,
        function: &UserFunction,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Option<Value>>;
}

/// Runs the script of a `lang` module.
///
/// Called once while the module loads and once while it unloads; the
/// module's state tells the phases apart.
pub trait ScriptRunner {
    fn run(
        &self,
        bridge: &mut ModuleBridge<'_>,
        script: &str,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value>;
}
