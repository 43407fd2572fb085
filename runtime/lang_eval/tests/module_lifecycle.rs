//! End-to-end tests of module loading and unloading.
//!
//! Archives are written with the zip writer, either in memory or to a
//! temporary directory, and loaded through a fresh interpreter.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::io::{Cursor, Write};
use std::rc::Rc;

use lang_eval::{
    DataType, FunctionExecutor, Interpreter, InterpretingError, LangVersion, ModuleArchive, ModuleBridge,
    ModuleError, ModuleState, NativeFunction, NativeModule, PredefinedFunction, RuntimeErrorKind,
    RuntimeResult, ScopeId, ScriptRunner, Value,
};
use lang_value::interpreting;
use pretty_assertions::assert_eq;

// -- Archive helpers --

fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, text) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(text.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn native_archive(name: &str, entry_point: &str, extra: &str) -> ModuleArchive {
    let manifest =
        format!("name = {name}\nmoduleType = native\nnativeEntryPoint = {entry_point}\n{extra}");
    let bytes = zip_bytes(&[("data.lmc", &manifest)]);
    ModuleArchive::from_zip_bytes(format!("/mods/{name}.lm"), &bytes).unwrap()
}

fn constant(value: &str) -> NativeFunction {
    let value = value.to_string();
    NativeFunction::new("constant", move |_, _, _| Ok(Some(Value::text(&value))))
}

fn interpreter() -> Interpreter {
    let interpreter = Interpreter::new();
    interpreter.register_native_module("test.Greeter", || Box::new(Greeter));
    interpreter.register_native_module("test.Overrider", || Box::new(Overrider));
    interpreter.register_native_module("test.Failing", || Box::new(Failing));
    interpreter.register_native_module("test.Echo", || Box::new(Echo));
    interpreter.register_native_module("test.Locator", || Box::new(Locator));
    interpreter
}

fn call(interpreter: &mut Interpreter, name: &str) -> Option<Value> {
    let pointer = interpreter.predefined_function_value(name)?;
    interpreter
        .call_function_pointer(pointer.get_function_pointer().unwrap(), &[], ScopeId::ROOT)
        .unwrap()
}

// -- Native modules --

/// Exports one symbol per namespace; tries a late export while unloading.
struct Greeter;

impl NativeModule for Greeter {
    fn load(
        &mut self,
        bridge: &mut ModuleBridge<'_>,
        _args: &[Value],
        _scope: ScopeId,
    ) -> RuntimeResult<Value> {
        bridge.export_function("greet", constant("hello"))?;
        bridge.export_linker_function("link", constant("linked"))?;
        bridge.export_normal_variable("greeting", &Value::text("hi"), true)?;
        bridge.export_collection_variable("names", &Value::array(vec![Value::text("a")]), false)?;
        let greet = bridge
            .get_predefined_function_as_data_object("greet")
            .unwrap_or_else(Value::null);
        bridge.export_function_pointer_variable("greet", &greet, false)?;
        Ok(Value::text(bridge.module_name()))
    }

    fn unload(
        &mut self,
        bridge: &mut ModuleBridge<'_>,
        _args: &[Value],
        _scope: ScopeId,
    ) -> RuntimeResult<Value> {
        match bridge.export_function("late", constant("late")) {
            Ok(()) => Ok(Value::text("exported")),
            Err(err) => Ok(Value::error(err.interpreting_error())),
        }
    }
}

/// Overwrites `greet` and the `$greeting` global.
struct Overrider;

impl NativeModule for Overrider {
    fn load(
        &mut self,
        bridge: &mut ModuleBridge<'_>,
        _args: &[Value],
        _scope: ScopeId,
    ) -> RuntimeResult<Value> {
        bridge.export_function("greet", constant("howdy"))?;
        bridge.export_normal_variable("greeting", &Value::text("yo"), false)?;
        Ok(Value::void())
    }

    fn unload(
        &mut self,
        _bridge: &mut ModuleBridge<'_>,
        _args: &[Value],
        _scope: ScopeId,
    ) -> RuntimeResult<Value> {
        Err(interpreting(InterpretingError::SystemError, Some("cannot unload")))
    }
}

/// Registers symbols, then fails.
struct Failing;

impl NativeModule for Failing {
    fn load(
        &mut self,
        bridge: &mut ModuleBridge<'_>,
        _args: &[Value],
        _scope: ScopeId,
    ) -> RuntimeResult<Value> {
        bridge.export_function("helper", constant("helper"))?;
        bridge.export_function("print", constant("hijacked"))?;
        bridge.export_normal_variable("partial", &Value::int(1), false)?;
        Err(interpreting(InterpretingError::InvalidArguments, Some("boom")))
    }

    fn unload(
        &mut self,
        _bridge: &mut ModuleBridge<'_>,
        _args: &[Value],
        _scope: ScopeId,
    ) -> RuntimeResult<Value> {
        Ok(Value::void())
    }
}

/// Returns its arguments.
struct Echo;

impl NativeModule for Echo {
    fn load(
        &mut self,
        _bridge: &mut ModuleBridge<'_>,
        args: &[Value],
        _scope: ScopeId,
    ) -> RuntimeResult<Value> {
        Ok(Value::array(args.to_vec()))
    }

    fn unload(
        &mut self,
        _bridge: &mut ModuleBridge<'_>,
        args: &[Value],
        _scope: ScopeId,
    ) -> RuntimeResult<Value> {
        Ok(Value::array(args.to_vec()))
    }
}

/// Returns the scope its hooks run in.
struct Locator;

impl NativeModule for Locator {
    fn load(
        &mut self,
        _bridge: &mut ModuleBridge<'_>,
        _args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value> {
        Ok(Value::int(scope.0))
    }

    fn unload(
        &mut self,
        _bridge: &mut ModuleBridge<'_>,
        _args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Value> {
        Ok(Value::int(scope.0))
    }
}

/// Exports the script length and echoes the module state.
struct LengthRunner;

impl ScriptRunner for LengthRunner {
    fn run(
        &self,
        bridge: &mut ModuleBridge<'_>,
        script: &str,
        _args: &[Value],
        _scope: ScopeId,
    ) -> RuntimeResult<Value> {
        if bridge.module().state() == ModuleState::Loading {
            let len = i32::try_from(script.len()).unwrap_or(i32::MAX);
            bridge.export_normal_variable("script_len", &Value::int(len), true)?;
        }
        Ok(Value::text(bridge.module().state().lang_var_text()))
    }
}

// -- Loading --

#[test]
fn test_native_module_publishes_exports() {
    let mut interpreter = interpreter();
    let result = interpreter
        .load_module(native_archive("greeter", "test.Greeter", ""), &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(result, Value::text("greeter"));
    assert_eq!(interpreter.loaded_modules(), ["greeter"]);

    let module = interpreter.module("greeter").unwrap();
    assert_eq!(module.state(), ModuleState::Active);
    assert_eq!(module.borrow().exported_functions(), ["greet", "link"]);

    assert_eq!(call(&mut interpreter, "greet"), Some(Value::text("hello")));
    assert!(interpreter.functions().get("link").unwrap().is_linker());

    let greeting = interpreter.global_variable("$greeting").unwrap();
    assert_eq!(greeting, Value::text("hi"));
    assert!(greeting.is_final());
    assert_eq!(greeting.variable_name(), Some("$greeting"));
    assert_eq!(
        interpreter.global_variable("&names").unwrap().data_type(),
        DataType::Array
    );
    assert_eq!(
        interpreter.global_variable("fp.greet").unwrap().data_type(),
        DataType::FunctionPointer
    );
    assert_eq!(interpreter.global_variable_owner("$greeting"), Some("greeter"));
}

#[test]
fn test_load_arguments_start_with_module_path() {
    let mut interpreter = interpreter();
    let result = interpreter
        .load_module(
            native_archive("echo", "test.Echo", ""),
            &[Value::int(1), Value::text("two")],
            ScopeId::ROOT,
        )
        .unwrap();
    let args = result.get_array().unwrap().to_vec();
    assert_eq!(args.len(), 4);
    assert_eq!(args[0], Value::text("/mods/echo.lm"));
    assert_eq!(args[1].data_type(), DataType::ArgumentSeparator);
    assert_eq!(args[2], Value::int(1));
    assert_eq!(args[3], Value::text("two"));

    let result = interpreter
        .unload_module("echo", &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(result.get_array().unwrap().len(), 1);
}

#[test]
fn test_duplicate_load_fails() {
    let mut interpreter = interpreter();
    interpreter
        .load_module(native_archive("greeter", "test.Greeter", ""), &[], ScopeId::ROOT)
        .unwrap();
    let err = interpreter
        .load_module(native_archive("greeter", "test.Greeter", ""), &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err, ModuleError::AlreadyLoaded { ref module } if module == "greeter"));
    assert_eq!(err.interpreting_error(), InterpretingError::ModuleLoadUnloadErr);
    assert_eq!(interpreter.module("greeter").unwrap().state(), ModuleState::Active);
}

#[test]
fn test_unknown_entry_point_fails_before_opening() {
    let mut interpreter = interpreter();
    let err = interpreter
        .load_module(native_archive("ghost", "test.Missing", ""), &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err, ModuleError::UnknownEntryPoint { .. }));
    assert!(interpreter.loaded_modules().is_empty());
}

#[test]
fn test_archive_without_manifest_is_rejected() {
    let mut interpreter = interpreter();
    let bytes = zip_bytes(&[("lang/module.lang", "")]);
    let archive = ModuleArchive::from_zip_bytes("/mods/empty.lm", &bytes).unwrap();
    let err = interpreter
        .load_module(archive, &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err, ModuleError::MissingEntry { entry: "data.lmc", .. }));
    assert_eq!(err.interpreting_error(), InterpretingError::InvalidModule);
}

#[test]
fn test_invalid_manifest_is_configuration_error() {
    let mut interpreter = interpreter();
    let bytes = zip_bytes(&[("data.lmc", "name = b@d\nmoduleType = lang\n")]);
    let archive = ModuleArchive::from_zip_bytes("/mods/bad.lm", &bytes).unwrap();
    let err = interpreter
        .load_module(archive, &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err, ModuleError::IllegalName { .. }));
}

// -- Compatibility --

#[test]
fn test_version_bounds_are_checked() {
    let mut interpreter = interpreter();
    let err = interpreter
        .load_module(
            native_archive("greeter", "test.Greeter", "minSupportedVersion = v2.0.0\n"),
            &[],
            ScopeId::ROOT,
        )
        .unwrap_err();
    assert!(matches!(err, ModuleError::UnsupportedVersion { .. }));

    let mut newer = Interpreter::builder()
        .lang_version(LangVersion::new(3, 0, 0))
        .native_modules(interpreter.native_modules().clone())
        .build();
    let err = newer
        .load_module(
            native_archive("greeter", "test.Greeter", "maxSupportedVersion = v2.9.9\n"),
            &[],
            ScopeId::ROOT,
        )
        .unwrap_err();
    assert!(matches!(err, ModuleError::UnsupportedVersion { .. }));

    newer
        .load_module(
            native_archive("greeter", "test.Greeter", "minSupportedVersion = v2.0.0\n"),
            &[],
            ScopeId::ROOT,
        )
        .unwrap();
}

#[test]
fn test_implementation_allow_list() {
    let mut interpreter = interpreter();
    let err = interpreter
        .load_module(
            native_archive("greeter", "test.Greeter", "supportedImplementations = langJava\n"),
            &[],
            ScopeId::ROOT,
        )
        .unwrap_err();
    assert!(matches!(err, ModuleError::UnsupportedImplementation { .. }));
    assert!(interpreter.loaded_modules().is_empty());

    interpreter
        .load_module(
            native_archive(
                "greeter",
                "test.Greeter",
                "supportedImplementations = langJava, langRS\n",
            ),
            &[],
            ScopeId::ROOT,
        )
        .unwrap();
}

// -- Rollback and eviction --

#[test]
fn test_failed_load_rolls_back() {
    let mut interpreter = interpreter();
    interpreter.register_function(PredefinedFunction::new("print", false, constant("host")));
    interpreter
        .load_module(native_archive("greeter", "test.Greeter", ""), &[], ScopeId::ROOT)
        .unwrap();

    let err = interpreter
        .load_module(native_archive("failing", "test.Failing", ""), &[], ScopeId::ROOT)
        .unwrap_err();
    let ModuleError::Runtime { module, source } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(module, "failing");
    assert_eq!(source.interpreting_error(), InterpretingError::InvalidArguments);

    assert!(!interpreter.functions().contains("helper"));
    assert_eq!(call(&mut interpreter, "print"), Some(Value::text("host")));
    assert!(interpreter.functions().entry("print").unwrap().owner().is_none());
    assert!(interpreter.global_variable("$partial").is_none());
    assert!(interpreter.module("failing").is_none());

    // Unrelated modules are untouched.
    assert_eq!(call(&mut interpreter, "greet"), Some(Value::text("hello")));
    assert_eq!(interpreter.loaded_modules(), ["greeter"]);
}

#[test]
fn test_unload_evicts_only_owned_symbols() {
    let mut interpreter = interpreter();
    interpreter
        .load_module(native_archive("greeter", "test.Greeter", ""), &[], ScopeId::ROOT)
        .unwrap();
    interpreter
        .load_module(native_archive("overrider", "test.Overrider", ""), &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(call(&mut interpreter, "greet"), Some(Value::text("howdy")));
    assert_eq!(interpreter.global_variable("$greeting"), Some(Value::text("yo")));

    let result = interpreter
        .unload_module("greeter", &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(result.data_type(), DataType::Error);
    assert!(!interpreter.functions().contains("late"));

    // Overwritten by `overrider`, so still bound.
    assert_eq!(call(&mut interpreter, "greet"), Some(Value::text("howdy")));
    assert_eq!(interpreter.global_variable("$greeting"), Some(Value::text("yo")));
    // Owned by `greeter` alone.
    assert!(!interpreter.functions().contains("link"));
    assert!(interpreter.global_variable("&names").is_none());
    assert!(interpreter.global_variable("fp.greet").is_none());
}

#[test]
fn test_unload_restores_replaced_globals_of_loaded_modules() {
    let mut interpreter = interpreter();
    interpreter
        .load_module(native_archive("greeter", "test.Greeter", ""), &[], ScopeId::ROOT)
        .unwrap();
    interpreter
        .load_module(native_archive("overrider", "test.Overrider", ""), &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(interpreter.global_variable_owner("$greeting"), Some("overrider"));

    let err = interpreter
        .unload_module("overrider", &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err, ModuleError::Runtime { .. }));

    assert_eq!(call(&mut interpreter, "greet"), Some(Value::text("hello")));
    let greeting = interpreter.global_variable("$greeting").unwrap();
    assert_eq!(greeting, Value::text("hi"));
    assert!(greeting.is_final());
    assert_eq!(interpreter.global_variable_owner("$greeting"), Some("greeter"));

    interpreter
        .unload_module("greeter", &[], ScopeId::ROOT)
        .unwrap();
    assert!(interpreter.global_variable("$greeting").is_none());
    assert!(!interpreter.functions().contains("greet"));
}

#[test]
fn test_failed_unload_still_closes_module() {
    let mut interpreter = interpreter();
    interpreter
        .load_module(native_archive("overrider", "test.Overrider", ""), &[], ScopeId::ROOT)
        .unwrap();
    let module = interpreter.module("overrider").unwrap();

    let err = interpreter
        .unload_module("overrider", &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err, ModuleError::Runtime { .. }));
    assert_eq!(module.state(), ModuleState::Closed);
    assert!(!interpreter.functions().contains("greet"));
    assert!(interpreter.global_variable("$greeting").is_none());
    assert!(interpreter.loaded_modules().is_empty());
}

#[test]
fn test_unload_unknown_module_fails() {
    let mut interpreter = interpreter();
    let err = interpreter
        .unload_module("nothing", &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err, ModuleError::NotLoaded { .. }));
}

#[test]
fn test_reload_after_unload() {
    let mut interpreter = interpreter();
    let archive = native_archive("greeter", "test.Greeter", "");
    interpreter
        .load_module(archive.clone(), &[], ScopeId::ROOT)
        .unwrap();
    interpreter
        .unload_module("greeter", &[], ScopeId::ROOT)
        .unwrap();
    interpreter.load_module(archive, &[], ScopeId::ROOT).unwrap();
    assert_eq!(call(&mut interpreter, "greet"), Some(Value::text("hello")));
}

// -- Hook scopes --

#[test]
fn test_hook_scope_skips_live_scopes() {
    let mut interpreter = interpreter();
    let live = ScopeId(1);
    interpreter.enter_scope(live);
    interpreter
        .set_variable(live, "$x", Value::int(42))
        .unwrap();

    let loaded = interpreter
        .load_module(native_archive("locator", "test.Locator", ""), &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(loaded, Value::int(2));
    assert!(interpreter.scopes().contains_scope(live));
    assert_eq!(interpreter.get_variable(live, "$x"), Some(Value::int(42)));
    assert!(!interpreter.scopes().contains_scope(ScopeId(2)));

    let unloaded = interpreter
        .unload_module("locator", &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(unloaded, Value::int(2));
    assert_eq!(interpreter.get_variable(live, "$x"), Some(Value::int(42)));
}

#[test]
fn test_hook_scope_beyond_last_scope_id_fails() {
    let mut interpreter = interpreter();
    let err = interpreter
        .load_module(native_archive("greeter", "test.Greeter", ""), &[], ScopeId(i32::MAX))
        .unwrap_err();
    let ModuleError::Runtime { module, source } = err else {
        panic!("expected a runtime error");
    };
    assert_eq!(module, "greeter");
    assert_eq!(
        source.kind,
        RuntimeErrorKind::ScopeExhausted {
            scope: ScopeId(i32::MAX)
        }
    );
    assert_eq!(source.interpreting_error(), InterpretingError::StackOverflow);
    assert!(interpreter.loaded_modules().is_empty());
    assert_eq!(interpreter.call_stack().depth(), 1);
}

// -- Lang modules --

fn lang_archive(script: &str) -> ModuleArchive {
    let bytes = zip_bytes(&[
        ("data.lmc", "name = scripted\nmoduleType = lang\n"),
        ("lang/module.lang", script),
    ]);
    ModuleArchive::from_zip_bytes("/mods/scripted.lm", &bytes).unwrap()
}

#[test]
fn test_lang_module_without_runner_is_unsupported() {
    let mut interpreter = interpreter();
    let err = interpreter
        .load_module(lang_archive("fn.println(hi)"), &[], ScopeId::ROOT)
        .unwrap_err();
    let ModuleError::Runtime { source, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(matches!(source.kind, RuntimeErrorKind::FunctionNotSupported { .. }));
    assert!(interpreter.loaded_modules().is_empty());
}

#[test]
fn test_lang_module_runs_through_script_runner() {
    let mut interpreter = Interpreter::builder()
        .script_runner(Rc::new(LengthRunner))
        .build();
    let result = interpreter
        .load_module(lang_archive("fn.println(hi)"), &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(result, Value::text("load"));
    assert_eq!(interpreter.global_variable("$script_len"), Some(Value::int(14)));

    let result = interpreter
        .unload_module("scripted", &[], ScopeId::ROOT)
        .unwrap();
    assert_eq!(result, Value::text("unload"));
    assert!(interpreter.global_variable("$script_len").is_none());
}

#[test]
fn test_lang_module_without_script_is_rejected() {
    let mut interpreter = interpreter();
    let bytes = zip_bytes(&[("data.lmc", "name = scripted\nmoduleType = lang\n")]);
    let archive = ModuleArchive::from_zip_bytes("/mods/scripted.lm", &bytes).unwrap();
    let err = interpreter
        .load_module(archive, &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err, ModuleError::MissingEntry { entry: "lang/module.lang", .. }));
}

// -- Files on disk --

#[test]
fn test_load_module_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greeter.lm");
    let bytes = zip_bytes(&[(
        "data.lmc",
        "name = greeter\nmoduleType = native\nnativeEntryPoint = test.Greeter\n",
    )]);
    std::fs::write(&path, bytes).unwrap();

    let mut interpreter = interpreter();
    interpreter
        .load_module_file(&path, &[], ScopeId::ROOT)
        .unwrap();
    let module = interpreter.module("greeter").unwrap();
    assert_eq!(module.file(), path.to_string_lossy());

    let err = interpreter
        .load_module_file(&dir.path().join("missing.lm"), &[], ScopeId::ROOT)
        .unwrap_err();
    assert!(matches!(err, ModuleError::Io { .. }));
}
