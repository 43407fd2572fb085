//! Runtime values for the Lang runtime.
//!
//! # Representation
//!
//! A `Value` is a tagged union (`Data`) plus three independent flags and an
//! optional diagnostic label:
//!
//! ```text
//! let x = Value::int(42);                          // plain value
//! let pi = Value::double(PI).finalized().named("$LANG_MATH_PI");
//! let arr = Value::array(vec![Value::int(1)]);     // shared element storage
//! ```
//!
//! The label and the flags are metadata: two values with different labels or
//! flags compare equal when their data does.
//!
//! # Copy Semantics
//!
//! `Clone` is reference duplication. Scalars and immutable descriptors are
//! copied by value; ARRAY and STRUCT instances share their element storage
//! until deep-copied (see `lang_eval::operators::deep_copy`).
//!
//! # Thread Safety
//!
//! Values use `Rc` internally. The runtime is single-threaded per
//! interpreter instance and values never cross instances.

mod array;
mod data_type;
mod error_value;
mod function;
mod structs;
mod text;

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::errors::{final_data_change, type_mismatch, RuntimeResult};
use crate::interpreting_error::InterpretingError;

pub use array::ArrayValue;
pub use data_type::{DataType, TypeConstraint};
pub use error_value::ErrorValue;
pub use function::{FunctionPointer, NativeFn, NativeFunction, PredefinedFunction, UserFunction};
pub use structs::{StructObject, StructSchema};

bitflags! {
    /// Per-value flags.
    ///
    /// The flags are independent of each other and of the stored data.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ValueFlags: u8 {
        /// Write-once: every later write fails.
        const FINAL = 1 << 0;
        /// Created at most once per scope and shared afterwards.
        const STATIC = 1 << 1;
        /// Injected by the runtime rather than defined by a script.
        const LANG_VAR = 1 << 2;
    }
}

/// The tagged union of a `Value`.
#[derive(Clone)]
pub enum Data {
    /// Text value.
    Text(Rc<str>),
    /// Single character.
    Char(char),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Fixed-length, element-mutable sequence.
    Array(ArrayValue),
    /// Interpreting error kind with optional message.
    Error(ErrorValue),
    /// Pointer to another value.
    VarPointer(Rc<Value>),
    /// Callable descriptor.
    FunctionPointer(FunctionPointer),
    /// Struct definition or instance.
    Struct(StructObject),
    /// Explicit null.
    Null,
    /// Absence of a value.
    Void,
    /// Separator between call arguments.
    ArgumentSeparator(Rc<str>),
    /// Runtime type token.
    Type(DataType),
}

impl Data {
    /// Tag of this variant.
    pub fn data_type(&self) -> DataType {
        match self {
            Data::Text(_) => DataType::Text,
            Data::Char(_) => DataType::Char,
            Data::Int(_) => DataType::Int,
            Data::Long(_) => DataType::Long,
            Data::Float(_) => DataType::Float,
            Data::Double(_) => DataType::Double,
            Data::Array(_) => DataType::Array,
            Data::Error(_) => DataType::Error,
            Data::VarPointer(_) => DataType::VarPointer,
            Data::FunctionPointer(_) => DataType::FunctionPointer,
            Data::Struct(_) => DataType::Struct,
            Data::Null => DataType::Null,
            Data::Void => DataType::Void,
            Data::ArgumentSeparator(_) => DataType::ArgumentSeparator,
            Data::Type(_) => DataType::Type,
        }
    }
}

/// Runtime value: data, flags and an optional label.
#[derive(Clone)]
pub struct Value {
    data: Data,
    flags: ValueFlags,
    variable_name: Option<Rc<str>>,
}

// Factory Methods

impl Value {
    /// Create an unlabeled value with no flags set.
    #[inline]
    pub fn new(data: Data) -> Self {
        Value {
            data,
            flags: ValueFlags::empty(),
            variable_name: None,
        }
    }

    #[inline]
    pub fn text(text: impl AsRef<str>) -> Self {
        Value::new(Data::Text(Rc::from(text.as_ref())))
    }

    #[inline]
    pub fn char(c: char) -> Self {
        Value::new(Data::Char(c))
    }

    #[inline]
    pub fn int(n: i32) -> Self {
        Value::new(Data::Int(n))
    }

    #[inline]
    pub fn long(n: i64) -> Self {
        Value::new(Data::Long(n))
    }

    #[inline]
    pub fn float(n: f32) -> Self {
        Value::new(Data::Float(n))
    }

    #[inline]
    pub fn double(n: f64) -> Self {
        Value::new(Data::Double(n))
    }

    /// Create an array value owning `elements`.
    #[inline]
    pub fn array(elements: Vec<Value>) -> Self {
        Value::new(Data::Array(ArrayValue::new(elements)))
    }

    /// Create an ERROR value without a message.
    #[inline]
    pub fn error(error: InterpretingError) -> Self {
        Value::new(Data::Error(ErrorValue::new(error)))
    }

    /// Create an ERROR value with a message.
    #[inline]
    pub fn error_with_message(error: InterpretingError, message: impl AsRef<str>) -> Self {
        Value::new(Data::Error(ErrorValue::with_message(error, message)))
    }

    #[inline]
    pub fn var_pointer(target: Value) -> Self {
        Value::new(Data::VarPointer(Rc::new(target)))
    }

    #[inline]
    pub fn function_pointer(function: FunctionPointer) -> Self {
        Value::new(Data::FunctionPointer(function))
    }

    #[inline]
    pub fn struct_object(object: StructObject) -> Self {
        Value::new(Data::Struct(object))
    }

    #[inline]
    pub fn null() -> Self {
        Value::new(Data::Null)
    }

    #[inline]
    pub fn void() -> Self {
        Value::new(Data::Void)
    }

    #[inline]
    pub fn argument_separator(text: impl AsRef<str>) -> Self {
        Value::new(Data::ArgumentSeparator(Rc::from(text.as_ref())))
    }

    #[inline]
    pub fn type_value(ty: DataType) -> Self {
        Value::new(Data::Type(ty))
    }
}

// Builder-style flag setters (construction time only)

impl Value {
    /// Mark the value final.
    #[must_use]
    pub fn finalized(mut self) -> Self {
        self.flags.insert(ValueFlags::FINAL);
        self
    }

    /// Mark the value static.
    #[must_use]
    pub fn as_static(mut self) -> Self {
        self.flags.insert(ValueFlags::STATIC);
        self
    }

    /// Mark the value as runtime-injected.
    #[must_use]
    pub fn as_lang_var(mut self) -> Self {
        self.flags.insert(ValueFlags::LANG_VAR);
        self
    }

    /// Attach a diagnostic label.
    #[must_use]
    pub fn named(mut self, name: impl AsRef<str>) -> Self {
        self.variable_name = Some(Rc::from(name.as_ref()));
        self
    }

    /// Duplicate the data into a fresh value labeled `name`.
    ///
    /// Flags are reset; the copy is final iff `final_data` is set. Arrays and
    /// struct instances keep sharing their storage with `self`.
    pub fn duplicate_as(&self, name: &str, final_data: bool) -> Value {
        let copy = Value::new(self.data.clone()).named(name);
        if final_data {
            copy.finalized()
        } else {
            copy
        }
    }
}

// Accessors

impl Value {
    #[inline]
    pub fn data(&self) -> &Data {
        &self.data
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    #[inline]
    pub fn flags(&self) -> ValueFlags {
        self.flags
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags.contains(ValueFlags::FINAL)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(ValueFlags::STATIC)
    }

    #[inline]
    pub fn is_lang_var(&self) -> bool {
        self.flags.contains(ValueFlags::LANG_VAR)
    }

    #[inline]
    pub fn variable_name(&self) -> Option<&str> {
        self.variable_name.as_deref()
    }

    pub fn get_text(&self) -> RuntimeResult<&str> {
        match &self.data {
            Data::Text(text) => Ok(text),
            other => Err(type_mismatch(DataType::Text, other.data_type())),
        }
    }

    pub fn get_char(&self) -> RuntimeResult<char> {
        match &self.data {
            Data::Char(c) => Ok(*c),
            other => Err(type_mismatch(DataType::Char, other.data_type())),
        }
    }

    pub fn get_int(&self) -> RuntimeResult<i32> {
        match &self.data {
            Data::Int(n) => Ok(*n),
            other => Err(type_mismatch(DataType::Int, other.data_type())),
        }
    }

    pub fn get_long(&self) -> RuntimeResult<i64> {
        match &self.data {
            Data::Long(n) => Ok(*n),
            other => Err(type_mismatch(DataType::Long, other.data_type())),
        }
    }

    pub fn get_float(&self) -> RuntimeResult<f32> {
        match &self.data {
            Data::Float(n) => Ok(*n),
            other => Err(type_mismatch(DataType::Float, other.data_type())),
        }
    }

    pub fn get_double(&self) -> RuntimeResult<f64> {
        match &self.data {
            Data::Double(n) => Ok(*n),
            other => Err(type_mismatch(DataType::Double, other.data_type())),
        }
    }

    pub fn get_array(&self) -> RuntimeResult<&ArrayValue> {
        match &self.data {
            Data::Array(array) => Ok(array),
            other => Err(type_mismatch(DataType::Array, other.data_type())),
        }
    }

    pub fn get_error(&self) -> RuntimeResult<&ErrorValue> {
        match &self.data {
            Data::Error(error) => Ok(error),
            other => Err(type_mismatch(DataType::Error, other.data_type())),
        }
    }

    pub fn get_var_pointer(&self) -> RuntimeResult<&Value> {
        match &self.data {
            Data::VarPointer(target) => Ok(target),
            other => Err(type_mismatch(DataType::VarPointer, other.data_type())),
        }
    }

    pub fn get_function_pointer(&self) -> RuntimeResult<&FunctionPointer> {
        match &self.data {
            Data::FunctionPointer(function) => Ok(function),
            other => Err(type_mismatch(DataType::FunctionPointer, other.data_type())),
        }
    }

    pub fn get_struct(&self) -> RuntimeResult<&StructObject> {
        match &self.data {
            Data::Struct(object) => Ok(object),
            other => Err(type_mismatch(DataType::Struct, other.data_type())),
        }
    }

    pub fn get_argument_separator(&self) -> RuntimeResult<&str> {
        match &self.data {
            Data::ArgumentSeparator(text) => Ok(text),
            other => Err(type_mismatch(DataType::ArgumentSeparator, other.data_type())),
        }
    }

    pub fn get_type(&self) -> RuntimeResult<DataType> {
        match &self.data {
            Data::Type(ty) => Ok(*ty),
            other => Err(type_mismatch(DataType::Type, other.data_type())),
        }
    }
}

// Mutation

impl Value {
    /// Replace the stored data.
    ///
    /// Fails with `FinalDataChange` when the value is final.
    pub fn set_data(&mut self, data: Data) -> RuntimeResult<()> {
        self.check_writable()?;
        self.data = data;
        Ok(())
    }

    /// Set or clear the final flag.
    ///
    /// Clearing it on a value that is already final is a write and fails.
    pub fn set_final(&mut self, final_data: bool) -> RuntimeResult<()> {
        if final_data {
            self.flags.insert(ValueFlags::FINAL);
            return Ok(());
        }
        self.check_writable()?;
        self.flags.remove(ValueFlags::FINAL);
        Ok(())
    }

    /// Set the static flag. Final values reject the change.
    pub fn set_static(&mut self, static_data: bool) -> RuntimeResult<()> {
        self.check_writable()?;
        self.flags.set(ValueFlags::STATIC, static_data);
        Ok(())
    }

    /// Set the lang-var flag. Final values reject the change.
    pub fn set_lang_var(&mut self, lang_var: bool) -> RuntimeResult<()> {
        self.check_writable()?;
        self.flags.set(ValueFlags::LANG_VAR, lang_var);
        Ok(())
    }

    /// Replace the diagnostic label. Labels are metadata and never final.
    pub fn set_variable_name(&mut self, name: Option<&str>) {
        self.variable_name = name.map(Rc::from);
    }

    /// Write one element of an ARRAY value in place.
    ///
    /// The write is visible through every value sharing the same array.
    pub fn set_array_element(&self, index: usize, element: Value) -> RuntimeResult<()> {
        self.check_writable()?;
        self.get_array()?.set(index, element)
    }

    /// Write one member of a STRUCT instance in place.
    pub fn set_struct_member(&self, field: &str, member: Value) -> RuntimeResult<()> {
        self.check_writable()?;
        self.get_struct()?.set_member(field, member)
    }

    fn check_writable(&self) -> RuntimeResult<()> {
        if self.is_final() {
            return Err(final_data_change(self.variable_name()));
        }
        Ok(())
    }
}

// Trait Implementations

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.data_type(), self.to_text())?;
        if let Some(name) = self.variable_name() {
            write!(f, " as {name}")?;
        }
        if !self.flags.is_empty() {
            write!(f, " {:?}", self.flags)?;
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Strict equality: same tag and equal data. Labels and flags are ignored.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::ordering::is_strictly_equal(self, other)
    }
}

impl From<Data> for Value {
    fn from(data: Data) -> Self {
        Value::new(data)
    }
}
