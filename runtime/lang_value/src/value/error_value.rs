//! ERROR payload.

use std::rc::Rc;

use crate::interpreting_error::InterpretingError;

/// An interpreting error kind stored as ordinary data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorValue {
    error: InterpretingError,
    message: Option<Rc<str>>,
}

impl ErrorValue {
    pub fn new(error: InterpretingError) -> Self {
        ErrorValue {
            error,
            message: None,
        }
    }

    pub fn with_message(error: InterpretingError, message: impl AsRef<str>) -> Self {
        ErrorValue {
            error,
            message: Some(Rc::from(message.as_ref())),
        }
    }

    #[inline]
    pub fn error(&self) -> InterpretingError {
        self.error
    }

    #[inline]
    pub fn code(&self) -> i32 {
        self.error.code()
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
