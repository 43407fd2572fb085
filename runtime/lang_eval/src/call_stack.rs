//! Execution call stack.
//!
//! Each call through the calling convention pushes a `StackElement`; return
//! or unwind pops it. The depth check is integrated into `push()`.
//!
//! ```text
//! let mut stack = CallStack::new(Some(200));
//! stack.push(StackElement::new("/scripts", Some("main.lang"), "main"))?;
//! // ... execute ...
//! stack.pop();
//! ```

use std::rc::Rc;

use lang_value::{stack_overflow, RuntimeResult, StructObject, StructSchema, Value};

use crate::module::ModuleHandle;

/// One call stack frame.
#[derive(Clone, Debug)]
pub struct StackElement {
    lang_path: String,
    lang_file: Option<String>,
    function_name: String,
    module: Option<ModuleHandle>,
}

impl StackElement {
    pub fn new(
        lang_path: impl Into<String>,
        lang_file: Option<&str>,
        function_name: impl Into<String>,
    ) -> Self {
        StackElement {
            lang_path: lang_path.into(),
            lang_file: lang_file.map(str::to_string),
            function_name: function_name.into(),
            module: None,
        }
    }

    /// Attach the module the frame's code belongs to.
    #[must_use]
    pub fn with_module(mut self, module: ModuleHandle) -> Self {
        self.module = Some(module);
        self
    }

    /// Frame for a call made from `self`: same location and module, new
    /// function name.
    #[must_use]
    pub fn child(&self, function_name: impl Into<String>) -> Self {
        StackElement {
            lang_path: self.lang_path.clone(),
            lang_file: self.lang_file.clone(),
            function_name: function_name.into(),
            module: self.module.clone(),
        }
    }

    #[inline]
    pub fn lang_path(&self) -> &str {
        &self.lang_path
    }

    #[inline]
    pub fn lang_file(&self) -> Option<&str> {
        self.lang_file.as_deref()
    }

    #[inline]
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    #[inline]
    pub fn module(&self) -> Option<&ModuleHandle> {
        self.module.as_ref()
    }
}

/// Live call stack of one interpreter.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<StackElement>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// Create an empty stack; `None` means no depth limit.
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, checking the depth limit.
    ///
    /// The frame is not pushed on overflow.
    pub fn push(&mut self, frame: StackElement) -> RuntimeResult<()> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(stack_overflow(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the most recent frame.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the stack is empty.
    pub fn pop(&mut self) -> Option<StackElement> {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop()
    }

    /// The active frame.
    ///
    /// # Panics
    ///
    /// Panics if no execution is active.
    #[track_caller]
    pub fn top(&self) -> &StackElement {
        match self.frames.last() {
            Some(frame) => frame,
            None => panic!("CallStack::top() called outside of any execution"),
        }
    }

    #[inline]
    pub fn try_top(&self) -> Option<&StackElement> {
        self.frames.last()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Frames from the most recent call outwards.
    pub fn frames(&self) -> impl Iterator<Item = &StackElement> {
        self.frames.iter().rev()
    }

    /// One `&StackTraceElement` instance per frame, most recent first.
    pub fn stack_trace(&self, schema: &Rc<StructSchema>) -> RuntimeResult<Vec<Value>> {
        self.frames()
            .map(|frame| {
                let optional_text =
                    |text: Option<String>| text.map_or_else(Value::null, Value::text);
                let (module_path, module_file) = match frame.module() {
                    Some(module) => (
                        Some(module_relative_path(frame.lang_path(), module)),
                        Some(module.file()),
                    ),
                    None => (None, None),
                };
                let instance = StructObject::instance(
                    Rc::clone(schema),
                    vec![
                        Value::text(frame.lang_path()),
                        optional_text(frame.lang_file().map(str::to_string)),
                        Value::int(-1),
                        Value::text(frame.function_name()),
                        optional_text(module_path),
                        optional_text(module_file),
                    ],
                )?;
                Ok(Value::struct_object(instance))
            })
            .collect()
    }
}

/// Synthesized path prefix of code loaded from a module archive.
pub fn module_path_prefix(module: &ModuleHandle) -> String {
    let unit = module.borrow();
    format!("<module:{}[{}]>", unit.file(), unit.name())
}

/// `path` relative to its module: the `<module:FILE[NAME]>` prefix is
/// stripped and the remainder always starts with `/`.
pub fn module_relative_path(path: &str, module: &ModuleHandle) -> String {
    let prefix = module_path_prefix(module);
    let rest = path.strip_prefix(prefix.as_str()).unwrap_or(path);
    if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{rest}")
    }
}
