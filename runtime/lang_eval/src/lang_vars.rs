//! Runtime-injected variables (`$LANG_*` and built-in composites).
//!
//! `inject_lang_vars` runs once for every freshly entered scope. It is a
//! function of the runtime constants, the active call stack frame and the
//! target scope; everything it writes is flagged `LANG_VAR`.
//!
//! All constants are final except `$LANG_MODULE_STATE` and `$LANG_ERRNO`.
//! `$LANG_ERRNO` and the composite definitions are static: seeding the same
//! scope again keeps the values already present.

use std::rc::Rc;

use lang_value::{
    DataType, InterpretingError, ScopeId, StructObject, StructSchema, TypeConstraint, Value,
};

use crate::call_stack::{module_relative_path, StackElement};
use crate::module::ModuleHandle;
use crate::platform::Platform;
use crate::scope_store::ScopeStore;

/// Upper bound of the runtime's random integers.
pub const LANG_RAND_MAX: i32 = i32::MAX;

/// Name of the last-error slot.
pub const ERRNO: &str = "$LANG_ERRNO";

/// Schemas of the built-in composite types, shared by every scope.
pub struct BuiltinSchemas {
    pub stack_trace_element: Rc<StructSchema>,
    pub pair: Rc<StructSchema>,
    pub complex: Rc<StructSchema>,
}

impl BuiltinSchemas {
    pub fn new() -> Self {
        let text = TypeConstraint::only(&[DataType::Text]);
        let optional_text = TypeConstraint::only(&[DataType::Text, DataType::Null]);
        let double = TypeConstraint::only(&[DataType::Double]);
        BuiltinSchemas {
            stack_trace_element: Rc::new(StructSchema::from_fields(
                "&StackTraceElement",
                [
                    ("$path", text),
                    ("$file", optional_text),
                    ("$lineNumber", TypeConstraint::only(&[DataType::Int])),
                    ("$functionName", text),
                    ("$modulePath", optional_text),
                    ("$moduleFile", optional_text),
                ],
            )),
            pair: Rc::new(StructSchema::from_fields(
                "&Pair",
                [("$first", TypeConstraint::any()), ("$second", TypeConstraint::any())],
            )),
            complex: Rc::new(StructSchema::from_fields(
                "&Complex",
                [("$real", double), ("$imag", double)],
            )),
        }
    }

    fn all(&self) -> [&Rc<StructSchema>; 3] {
        [&self.stack_trace_element, &self.pair, &self.complex]
    }
}

impl Default for BuiltinSchemas {
    fn default() -> Self {
        Self::new()
    }
}

/// Values that are identical in every scope of one interpreter.
#[derive(Clone, Debug)]
pub struct RuntimeConstants {
    pub lang_version: String,
    pub lang_name: String,
    pub os_name: String,
    pub os_version: String,
    pub os_arch: String,
    pub file_separator: String,
    pub line_separator: String,
}

impl RuntimeConstants {
    pub fn from_platform(lang_version: &str, lang_name: &str, platform: &dyn Platform) -> Self {
        RuntimeConstants {
            lang_version: lang_version.to_string(),
            lang_name: lang_name.to_string(),
            os_name: platform.os_name(),
            os_version: platform.os_version(),
            os_arch: platform.os_arch(),
            file_separator: platform.file_separator(),
            line_separator: platform.line_separator(),
        }
    }
}

/// Seed `scope` with every lang var.
pub fn inject_lang_vars(
    store: &mut ScopeStore,
    constants: &RuntimeConstants,
    schemas: &BuiltinSchemas,
    frame: &StackElement,
    scope: ScopeId,
) {
    let mut writer = Writer { store, scope };
    writer.system(constants);
    writer.execution(frame);
    writer.numeric();
    writer.errors();
    writer.types();
    writer.composites(schemas);
    tracing::trace!(scope = %scope, function = frame.function_name(), "lang vars injected");
}

struct Writer<'a> {
    store: &'a mut ScopeStore,
    scope: ScopeId,
}

impl Writer<'_> {
    fn constant(&mut self, name: &str, value: Value) {
        self.store
            .set(self.scope, name, value.finalized().as_lang_var().named(name));
    }

    fn system(&mut self, constants: &RuntimeConstants) {
        self.constant("$LANG_VERSION", Value::text(&constants.lang_version));
        self.constant("$LANG_NAME", Value::text(&constants.lang_name));
        self.constant("$LANG_RAND_MAX", Value::int(LANG_RAND_MAX));
        self.constant("$LANG_OS_NAME", Value::text(&constants.os_name));
        self.constant("$LANG_OS_VER", Value::text(&constants.os_version));
        self.constant("$LANG_OS_ARCH", Value::text(&constants.os_arch));
        self.constant("$LANG_OS_FILE_SEPARATOR", Value::text(&constants.file_separator));
        self.constant("$LANG_OS_LINE_SEPARATOR", Value::text(&constants.line_separator));
    }

    fn execution(&mut self, frame: &StackElement) {
        self.constant("$LANG_PATH", Value::text(frame.lang_path()));
        self.constant(
            "$LANG_FILE",
            frame.lang_file().map_or_else(Value::null, Value::text),
        );
        self.constant("$LANG_CURRENT_FUNCTION", Value::text(frame.function_name()));
        if let Some(module) = frame.module() {
            self.module(frame, module);
        }
    }

    fn module(&mut self, frame: &StackElement, module: &ModuleHandle) {
        let state = Value::text(module.state().lang_var_text())
            .as_lang_var()
            .named("$LANG_MODULE_STATE");
        self.store.set(self.scope, "$LANG_MODULE_STATE", state);
        self.constant(
            "$LANG_MODULE_PATH",
            Value::text(module_relative_path(frame.lang_path(), module)),
        );
        self.constant("$LANG_MODULE_FILE", Value::text(module.file()));
    }

    fn numeric(&mut self) {
        self.constant("$LANG_INT_MIN", Value::int(i32::MIN));
        self.constant("$LANG_INT_MAX", Value::int(i32::MAX));
        self.constant("$LANG_LONG_MIN", Value::long(i64::MIN));
        self.constant("$LANG_LONG_MAX", Value::long(i64::MAX));
        self.constant("$LANG_FLOAT_NAN", Value::float(f32::NAN));
        self.constant("$LANG_FLOAT_POS_INF", Value::float(f32::INFINITY));
        self.constant("$LANG_FLOAT_NEG_INF", Value::float(f32::NEG_INFINITY));
        self.constant("$LANG_DOUBLE_NAN", Value::double(f64::NAN));
        self.constant("$LANG_DOUBLE_POS_INF", Value::double(f64::INFINITY));
        self.constant("$LANG_DOUBLE_NEG_INF", Value::double(f64::NEG_INFINITY));
        self.constant("$LANG_MATH_PI", Value::double(std::f64::consts::PI));
        self.constant("$LANG_MATH_E", Value::double(std::f64::consts::E));
    }

    fn errors(&mut self) {
        for error in InterpretingError::ALL {
            self.constant(&format!("$LANG_ERROR_{}", error.name()), Value::error(error));
            self.constant(&format!("$LANG_ERRNO_{}", error.name()), Value::int(error.code()));
        }
        self.store.get_or_insert_static(self.scope, ERRNO, || {
            Value::int(InterpretingError::NoError.code())
                .as_static()
                .as_lang_var()
                .named(ERRNO)
        });
    }

    fn types(&mut self) {
        for ty in DataType::ALL {
            self.constant(&format!("$LANG_TYPE_{}", ty.name()), Value::type_value(ty));
        }
    }

    fn composites(&mut self, schemas: &BuiltinSchemas) {
        for schema in schemas.all() {
            self.store
                .get_or_insert_static(self.scope, schema.name(), || {
                    Value::struct_object(StructObject::definition(Rc::clone(schema)))
                        .finalized()
                        .as_static()
                        .as_lang_var()
                        .named(schema.name())
                });
        }
    }
}
