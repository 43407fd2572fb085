#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::Cell;

use super::*;
use lang_value::{DataType, NativeFunction, RuntimeErrorKind, UserFunction};
use pretty_assertions::assert_eq;

fn native(name: &str, f: impl Fn(&[Value]) -> Option<Value> + 'static) -> FunctionPointer {
    FunctionPointer::Native(NativeFunction::new(name, move |_, args, _| Ok(f(args))))
}

fn user_function() -> FunctionPointer {
    FunctionPointer::Normal(UserFunction::new(vec!["$x".to_string()], "return $x"))
}

/// Records the frame it runs in and optionally recurses.
#[derive(Default)]
struct Recorder {
    calls: Cell<usize>,
    recurse: bool,
}

impl UserFunctionExecutor for Recorder {
    fn call(
        &self,
        interpreter: &mut Interpreter,
        function: &UserFunction,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Option<Value>> {
        self.calls.set(self.calls.get() + 1);
        if self.recurse {
            let again = FunctionPointer::Normal(function.clone());
            return interpreter.call_function_pointer(&again, args, scope);
        }
        let trace = interpreter.stack_trace()?;
        Ok(Some(Value::array(trace)))
    }
}

#[test]
fn test_builder_defaults() {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.implementation(), DEFAULT_IMPLEMENTATION);
    assert_eq!(interpreter.lang_version(), DEFAULT_LANG_VERSION);
    assert_eq!(interpreter.call_stack().depth(), 1);
    assert_eq!(interpreter.call_stack().top().function_name(), "main");
    assert_eq!(
        interpreter.get_variable(ScopeId::ROOT, "$LANG_VERSION"),
        Some(Value::text("v1.0.0"))
    );
    assert_eq!(
        interpreter.get_variable(ScopeId::ROOT, "$LANG_NAME"),
        Some(Value::text(DEFAULT_LANG_NAME))
    );
}

#[test]
fn test_builder_options() {
    let interpreter = Interpreter::builder()
        .lang_version(LangVersion::new(2, 1, 0))
        .lang_name("demo")
        .implementation("embedded")
        .root_location("/scripts", Some("main.lang"))
        .build();
    assert_eq!(interpreter.implementation(), "embedded");
    assert_eq!(
        interpreter.get_variable(ScopeId::ROOT, "$LANG_VERSION"),
        Some(Value::text("v2.1.0"))
    );
    assert_eq!(
        interpreter.get_variable(ScopeId::ROOT, "$LANG_FILE"),
        Some(Value::text("main.lang"))
    );
    assert_eq!(
        interpreter.get_variable(ScopeId::ROOT, "$LANG_PATH"),
        Some(Value::text("/scripts"))
    );
}

#[test]
fn test_native_call_receives_arguments() {
    let mut interpreter = Interpreter::new();
    let first = native("first", |args| args.first().cloned());
    let result = interpreter
        .call_function_pointer(&first, &[Value::int(7), Value::int(8)], ScopeId::ROOT)
        .unwrap();
    assert_eq!(result, Some(Value::int(7)));
    assert_eq!(interpreter.call_stack().depth(), 1);
}

#[test]
fn test_combinator_pipes_left_result_into_right() {
    let mut interpreter = Interpreter::new();
    let inc = native("inc", |args| Some(Value::int(args[0].get_int().unwrap() + 1)));
    let double = native("double", |args| Some(Value::int(args[0].get_int().unwrap() * 2)));
    let piped = FunctionPointer::combinator(inc, double);
    let result = interpreter
        .call_function_pointer(&piped, &[Value::int(3)], ScopeId::ROOT)
        .unwrap();
    assert_eq!(result, Some(Value::int(8)));

    let nothing = native("nothing", |_| None);
    let echo = native("echo", |args| Some(Value::int(i32::try_from(args.len()).unwrap())));
    let echo_type = native("type", |args| Some(Value::type_value(args[0].data_type())));
    let piped = FunctionPointer::combinator(nothing, echo_type);
    let result = interpreter
        .call_function_pointer(&piped, &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(result, Some(Value::type_value(DataType::Void)));
    assert_eq!(
        interpreter.call_function_pointer(&echo, &[], ScopeId::ROOT).unwrap(),
        Some(Value::int(0))
    );
}

#[test]
fn test_combinator_recomputes_on_every_call() {
    let mut interpreter = Interpreter::new();
    let counter = Rc::new(Cell::new(0));
    let ticks = Rc::clone(&counter);
    let tick = native("tick", move |_| {
        ticks.set(ticks.get() + 1);
        Some(Value::int(ticks.get()))
    });
    let negate = native("negate", |args| Some(Value::int(-args[0].get_int().unwrap())));
    let piped = FunctionPointer::combinator(tick, negate);

    let first = interpreter
        .call_function_pointer(&piped, &[], ScopeId::ROOT)
        .unwrap();
    let second = interpreter
        .call_function_pointer(&piped, &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(first, Some(Value::int(-1)));
    assert_eq!(second, Some(Value::int(-2)));
    assert_eq!(counter.get(), 2);
}

#[test]
fn test_user_function_without_executor_is_unsupported() {
    let mut interpreter = Interpreter::new();
    let err = interpreter
        .call_function_pointer(&user_function(), &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err.kind, RuntimeErrorKind::FunctionNotSupported { .. }));
    assert_eq!(
        err.interpreting_error(),
        InterpretingError::FunctionNotSupported
    );
    assert_eq!(interpreter.call_stack().depth(), 1);
}

#[test]
fn test_user_function_runs_in_pushed_frame() {
    let recorder = Rc::new(Recorder::default());
    let mut interpreter = Interpreter::builder()
        .user_function_executor(recorder.clone())
        .build();
    let trace = interpreter
        .call_function_pointer(&user_function(), &[], ScopeId::ROOT)
        .unwrap()
        .unwrap();

    let frames = trace.get_array().unwrap().to_vec();
    assert_eq!(frames.len(), 2);
    let innermost = frames[0].get_struct().unwrap();
    assert_eq!(
        innermost.get_member("$functionName").unwrap(),
        Value::text("<function($x)>")
    );
    let root = frames[1].get_struct().unwrap();
    assert_eq!(root.get_member("$functionName").unwrap(), Value::text("main"));
    assert_eq!(root.get_member("$lineNumber").unwrap(), Value::int(-1));
    assert_eq!(recorder.calls.get(), 1);
}

#[test]
fn test_max_call_depth_stops_recursion() {
    let recorder = Rc::new(Recorder {
        recurse: true,
        ..Recorder::default()
    });
    let mut interpreter = Interpreter::builder()
        .max_call_depth(Some(5))
        .user_function_executor(recorder.clone())
        .build();
    let err = interpreter
        .call_function_pointer(&user_function(), &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err.kind, RuntimeErrorKind::StackOverflow { .. }));
    assert_eq!(recorder.calls.get(), 5);
    assert_eq!(interpreter.call_stack().depth(), 1);
}

#[test]
fn test_deprecated_function_still_runs() {
    let mut interpreter = Interpreter::new();
    let old = PredefinedFunction::new(
        "old",
        false,
        NativeFunction::new("old", |_, _, _| Ok(Some(Value::int(1)))),
    )
    .deprecated();
    assert!(interpreter.register_function(old).is_none());

    let pointer = interpreter.predefined_function_value("old").unwrap();
    assert_eq!(pointer.variable_name(), Some("func.old"));
    let result = interpreter
        .call_function_pointer(pointer.get_function_pointer().unwrap(), &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(result, Some(Value::int(1)));
    assert_eq!(
        interpreter.get_variable(ScopeId::ROOT, "$LANG_ERRNO"),
        Some(Value::int(0))
    );
}

#[test]
fn test_register_function_returns_replaced() {
    let mut interpreter = Interpreter::new();
    let make = |n| {
        PredefinedFunction::new(
            "f",
            false,
            NativeFunction::new("f", move |_, _, _| Ok(Some(Value::int(n)))),
        )
    };
    assert!(interpreter.register_function(make(1)).is_none());
    let replaced = interpreter.register_function(make(2)).unwrap();
    assert_eq!(replaced.name(), "f");
    assert_eq!(interpreter.functions().len(), 1);
}

#[test]
fn test_set_errno_ignores_warnings() {
    let mut interpreter = Interpreter::new();
    interpreter.set_errno(ScopeId::ROOT, InterpretingError::DeprecatedFuncCall);
    assert_eq!(
        interpreter.get_variable(ScopeId::ROOT, "$LANG_ERRNO"),
        Some(Value::int(0))
    );

    interpreter.set_errno(ScopeId::ROOT, InterpretingError::DivByZero);
    let errno = interpreter.get_variable(ScopeId::ROOT, "$LANG_ERRNO").unwrap();
    assert_eq!(errno, Value::int(14));
    assert!(errno.is_static() && errno.is_lang_var());
}

#[test]
fn test_variables_fall_back_to_globals() {
    let mut interpreter = Interpreter::new();
    interpreter.publish_global("$shared", Value::int(1), "m");
    interpreter.publish_global("$fixed", Value::int(1).finalized(), "m");

    assert_eq!(
        interpreter.get_variable(ScopeId::ROOT, "$shared"),
        Some(Value::int(1))
    );
    interpreter
        .set_variable(ScopeId::ROOT, "$shared", Value::int(2))
        .unwrap();
    assert_eq!(interpreter.global_variable("$shared"), Some(Value::int(2)));

    let err = interpreter
        .set_variable(ScopeId::ROOT, "$fixed", Value::int(2))
        .unwrap_err();
    assert!(matches!(err.kind, RuntimeErrorKind::FinalDataChange { .. }));

    let err = interpreter
        .set_variable(ScopeId::ROOT, "$LANG_VERSION", Value::text("v9.9.9"))
        .unwrap_err();
    assert!(matches!(err.kind, RuntimeErrorKind::FinalDataChange { .. }));

    interpreter
        .set_variable(ScopeId::ROOT, "$local", Value::int(5))
        .unwrap();
    assert!(interpreter.global_variable("$local").is_none());
    assert_eq!(
        interpreter.get_variable(ScopeId::ROOT, "$local"),
        Some(Value::int(5))
    );
}

#[test]
fn test_scopes_are_seeded_and_dropped() {
    let mut interpreter = Interpreter::new();
    let inner = ScopeId::ROOT.next().unwrap();
    interpreter.enter_scope(inner);
    assert!(interpreter.scopes().contains_scope(inner));
    assert!(interpreter.get_variable(inner, "$LANG_INT_MAX").is_some());
    interpreter.exit_scope(inner);
    assert!(!interpreter.scopes().contains_scope(inner));
    assert!(interpreter.get_variable(inner, "$LANG_INT_MAX").is_none());
}
