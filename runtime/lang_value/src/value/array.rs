//! Shared array storage.

use std::cell::RefCell;
use std::rc::Rc;

use super::Value;
use crate::errors::{index_out_of_bounds, RuntimeResult};

/// Fixed-length, element-mutable sequence shared between value copies.
///
/// The length is fixed at construction. Element writes are visible through
/// every `ArrayValue` cloned from the same handle.
#[derive(Clone)]
pub struct ArrayValue(Rc<RefCell<Vec<Value>>>);

impl ArrayValue {
    pub(super) fn new(elements: Vec<Value>) -> Self {
        ArrayValue(Rc::new(RefCell::new(elements)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Reference-duplicate the element at `index`.
    pub fn get(&self, index: usize) -> RuntimeResult<Value> {
        let elements = self.0.borrow();
        elements
            .get(index)
            .cloned()
            .ok_or_else(|| index_out_of_bounds(index, elements.len()))
    }

    /// Write the element at `index`.
    ///
    /// A final element rejects the write.
    pub(super) fn set(&self, index: usize, element: Value) -> RuntimeResult<()> {
        let mut elements = self.0.borrow_mut();
        let len = elements.len();
        let slot = elements
            .get_mut(index)
            .ok_or_else(|| index_out_of_bounds(index, len))?;
        let data = element.data().clone();
        slot.set_data(data)
    }

    /// Reference-duplicates of every element, in order.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Run `f` over the elements without cloning them.
    ///
    /// `f` must not write to this array.
    pub fn with_elements<R>(&self, f: impl FnOnce(&[Value]) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Returns `true` when both handles share the same storage.
    #[inline]
    pub fn ptr_eq(&self, other: &ArrayValue) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
