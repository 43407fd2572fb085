//! Callable descriptors stored in FUNCTION_POINTER values.
//!
//! The value crate only describes callables. Invocation goes through the
//! `FunctionExecutor` implemented by the interpreter, which owns the calling
//! convention (call stack frames, combinator pipelines, user functions).

use std::fmt;
use std::rc::Rc;

use super::Value;
use crate::errors::RuntimeResult;
use crate::executor::{FunctionExecutor, ScopeId};

/// Signature of host-implemented functions.
///
/// `Ok(None)` means the function returned nothing; callers that need a value
/// substitute VOID.
pub type NativeFn =
    dyn Fn(&mut dyn FunctionExecutor, &[Value], ScopeId) -> RuntimeResult<Option<Value>>;

/// Host-implemented function.
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: impl AsRef<str>,
        func: impl Fn(&mut dyn FunctionExecutor, &[Value], ScopeId) -> RuntimeResult<Option<Value>>
            + 'static,
    ) -> Self {
        NativeFunction {
            name: Rc::from(name.as_ref()),
            func: Rc::new(func),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function directly, without a call stack frame.
    pub fn call(
        &self,
        executor: &mut dyn FunctionExecutor,
        args: &[Value],
        scope: ScopeId,
    ) -> RuntimeResult<Option<Value>> {
        (self.func)(executor, args, scope)
    }

    /// Returns `true` when both descriptors wrap the same closure.
    pub fn same_function(&self, other: &NativeFunction) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

/// Entry of the global function table.
#[derive(Clone)]
pub struct PredefinedFunction {
    name: Rc<str>,
    linker: bool,
    deprecated: bool,
    function: NativeFunction,
}

impl PredefinedFunction {
    pub fn new(name: impl AsRef<str>, linker: bool, function: NativeFunction) -> Self {
        PredefinedFunction {
            name: Rc::from(name.as_ref()),
            linker,
            deprecated: false,
            function,
        }
    }

    /// Mark the entry deprecated.
    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Bare identifier the entry is registered under.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_linker(&self) -> bool {
        self.linker
    }

    #[inline]
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    #[inline]
    pub fn function(&self) -> &NativeFunction {
        &self.function
    }

    /// Canonical prefixed name: `func.NAME` or `linker.NAME`.
    pub fn canonical_name(&self) -> String {
        let prefix = if self.linker { "linker" } else { "func" };
        format!("{prefix}.{}", self.name)
    }
}

/// User-defined function, opaque to the runtime core.
///
/// The body is whatever the host's parser produced; the runtime hands it to
/// the installed user-function executor.
#[derive(Clone, Debug)]
pub struct UserFunction {
    parameters: Rc<[String]>,
    body: Rc<str>,
}

impl UserFunction {
    pub fn new(parameters: Vec<String>, body: impl AsRef<str>) -> Self {
        UserFunction {
            parameters: parameters.into(),
            body: Rc::from(body.as_ref()),
        }
    }

    #[inline]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Callable descriptor.
#[derive(Clone)]
pub enum FunctionPointer {
    /// Host closure.
    Native(NativeFunction),
    /// Global function table entry.
    Predefined(PredefinedFunction),
    /// Script-defined function.
    Normal(UserFunction),
    /// Eager left-to-right pipeline of two callables.
    Combinator(Rc<FunctionPointer>, Rc<FunctionPointer>),
}

impl FunctionPointer {
    /// Compose `left` then `right`.
    pub fn combinator(left: FunctionPointer, right: FunctionPointer) -> Self {
        FunctionPointer::Combinator(Rc::new(left), Rc::new(right))
    }

    /// Identity comparison of descriptors.
    pub fn same_function(&self, other: &FunctionPointer) -> bool {
        match (self, other) {
            (FunctionPointer::Native(a), FunctionPointer::Native(b)) => a.same_function(b),
            (FunctionPointer::Predefined(a), FunctionPointer::Predefined(b)) => {
                a.name() == b.name()
                    && a.is_linker() == b.is_linker()
                    && a.function().same_function(b.function())
            }
            (FunctionPointer::Normal(a), FunctionPointer::Normal(b)) => {
                Rc::ptr_eq(&a.body, &b.body) && Rc::ptr_eq(&a.parameters, &b.parameters)
            }
            (FunctionPointer::Combinator(al, ar), FunctionPointer::Combinator(bl, br)) => {
                al.same_function(bl) && ar.same_function(br)
            }
            _ => false,
        }
    }
}

impl fmt::Display for FunctionPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionPointer::Native(native) => write!(f, "<native function {}>", native.name()),
            FunctionPointer::Predefined(entry) => {
                write!(f, "<predefined function {}>", entry.canonical_name())
            }
            FunctionPointer::Normal(user) => {
                write!(f, "<function({})>", user.parameters().join(", "))
            }
            FunctionPointer::Combinator(left, right) => write!(f, "<{left} | {right}>"),
        }
    }
}

impl fmt::Debug for FunctionPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
