//! The calling convention.
//!
//! Every invocation of a function pointer, from native code, a module bridge
//! or the host, goes through `Interpreter::call_function_pointer`.

use lang_value::{
    ensure_sufficient_stack, function_not_supported, FunctionPointer, RuntimeResult, ScopeId,
    Value,
};

use super::Interpreter;

impl Interpreter {
    /// Invoke `function` with `args` in `scope`.
    ///
    /// A frame inheriting location and module from the active frame is
    /// pushed for the duration of the call. `Ok(None)` means the callee
    /// returned nothing.
    #[tracing::instrument(level = "trace", skip_all, fields(function = %function))]
    pub fn call_function_pointer(
        &mut self,
        function: &FunctionPointer,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Option<Value>> {
        let frame = self.call_stack.top().child(frame_name(function));
        self.call_stack.push(frame)?;
        let result = ensure_sufficient_stack(|| self.dispatch(function, args, scope));
        self.call_stack.pop();
        result
    }

    fn dispatch(
        &mut self,
        function: &FunctionPointer,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Option<Value>> {
        match function {
            FunctionPointer::Native(native) => native.call(self, args, scope),
            FunctionPointer::Predefined(entry) => {
                if entry.is_deprecated() {
                    tracing::warn!(
                        function = %entry.canonical_name(),
                        "deprecated function called"
                    );
                }
                entry.function().call(self, args, scope)
            }
            FunctionPointer::Normal(user) => match self.user_functions.clone() {
                Some(executor) => executor.call(self, user, args, scope),
                None => Err(function_not_supported("calls of script-defined functions")),
            },
            FunctionPointer::Combinator(left, right) => {
                let intermediate = self
                    .call_function_pointer(left, args, scope)?
                    .unwrap_or_else(Value::void);
                self.call_function_pointer(right, &[intermediate], scope)
            }
        }
    }
}

fn frame_name(function: &FunctionPointer) -> String {
    match function {
        FunctionPointer::Native(native) => native.name().to_string(),
        FunctionPointer::Predefined(entry) => entry.canonical_name(),
        FunctionPointer::Normal(_) | FunctionPointer::Combinator(..) => function.to_string(),
    }
}
