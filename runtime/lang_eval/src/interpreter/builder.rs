//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use std::collections::BTreeMap;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use lang_value::ScopeId;

use super::{Interpreter, ScriptRunner, UserFunctionExecutor};
use crate::call_stack::{CallStack, StackElement};
use crate::function_table::FunctionTable;
use crate::lang_vars::{BuiltinSchemas, RuntimeConstants};
use crate::module::{LangVersion, NativeModuleFactories};
use crate::platform::{Platform, StdPlatform};
use crate::scope_store::ScopeStore;
use crate::shared::SharedMutableRegistry;

/// Language version reported when none is configured.
pub const DEFAULT_LANG_VERSION: LangVersion = LangVersion::new(1, 0, 0);

/// Language name reported when none is configured.
pub const DEFAULT_LANG_NAME: &str = "lang";

/// Implementation name matched against `supportedImplementations`.
pub const DEFAULT_IMPLEMENTATION: &str = "langRS";

/// Builder for creating Interpreter instances with various configurations.
pub struct InterpreterBuilder {
    lang_version: LangVersion,
    lang_name: String,
    implementation: String,
    max_call_depth: Option<usize>,
    platform: Option<Box<dyn Platform>>,
    native_modules: Option<SharedMutableRegistry<NativeModuleFactories>>,
    user_functions: Option<Rc<dyn UserFunctionExecutor>>,
    script_runner: Option<Rc<dyn ScriptRunner>>,
    root_path: String,
    root_file: Option<String>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder {
            lang_version: DEFAULT_LANG_VERSION,
            lang_name: DEFAULT_LANG_NAME.to_string(),
            implementation: DEFAULT_IMPLEMENTATION.to_string(),
            max_call_depth: None,
            platform: None,
            native_modules: None,
            user_functions: None,
            script_runner: None,
            root_path: "/".to_string(),
            root_file: None,
        }
    }

    /// Language version checked against module version bounds.
    #[must_use]
    pub fn lang_version(mut self, version: LangVersion) -> Self {
        self.lang_version = version;
        self
    }

    #[must_use]
    pub fn lang_name(mut self, name: impl Into<String>) -> Self {
        self.lang_name = name.into();
        self
    }

    /// Host implementation name checked against module allow-lists.
    #[must_use]
    pub fn implementation(mut self, name: impl Into<String>) -> Self {
        self.implementation = name.into();
        self
    }

    /// Maximum number of nested calls below the root frame.
    ///
    /// `None` (the default) means unlimited.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Platform used for file access and host facts. Default is `StdPlatform`.
    #[must_use]
    pub fn platform(mut self, platform: Box<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Share a native module registry with other interpreters.
    #[must_use]
    pub fn native_modules(
        mut self,
        registry: SharedMutableRegistry<NativeModuleFactories>,
    ) -> Self {
        self.native_modules = Some(registry);
        self
    }

    #[must_use]
    pub fn user_function_executor(mut self, executor: Rc<dyn UserFunctionExecutor>) -> Self {
        self.user_functions = Some(executor);
        self
    }

    #[must_use]
    pub fn script_runner(mut self, runner: Rc<dyn ScriptRunner>) -> Self {
        self.script_runner = Some(runner);
        self
    }

    /// Location reported by the root frame (`$LANG_PATH`, `$LANG_FILE`).
    #[must_use]
    pub fn root_location(mut self, path: impl Into<String>, file: Option<&str>) -> Self {
        self.root_path = path.into();
        self.root_file = file.map(str::to_string);
        self
    }

    /// Build the interpreter with its root frame pushed and the root scope
    /// seeded.
    pub fn build(self) -> Interpreter {
        let platform = self.platform.unwrap_or_else(|| Box::new(StdPlatform));
        let constants = RuntimeConstants::from_platform(
            &self.lang_version.to_string(),
            &self.lang_name,
            platform.as_ref(),
        );

        // The root frame itself does not count towards the limit.
        let mut call_stack =
            CallStack::new(self.max_call_depth.map(|depth| depth.saturating_add(1)));
        let root = StackElement::new(self.root_path, self.root_file.as_deref(), "main");
        if let Err(err) = call_stack.push(root) {
            tracing::error!(error = %err, "root frame rejected");
        }

        let mut interpreter = Interpreter {
            constants,
            lang_version: self.lang_version,
            implementation: self.implementation,
            platform,
            functions: FunctionTable::new(),
            globals: FxHashMap::default(),
            global_owners: FxHashMap::default(),
            scopes: ScopeStore::new(),
            call_stack,
            modules: BTreeMap::new(),
            native_modules: self.native_modules.unwrap_or_default(),
            schemas: BuiltinSchemas::new(),
            user_functions: self.user_functions,
            script_runner: self.script_runner,
        };
        interpreter.enter_scope(ScopeId::ROOT);
        tracing::debug!(
            version = %interpreter.lang_version,
            implementation = %interpreter.implementation,
            "interpreter built"
        );
        interpreter
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
