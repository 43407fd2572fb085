//! Struct schemas and struct objects.
//!
//! A `StructSchema` is immutable once created and shared through `Rc` by the
//! definition value and every instance built from it. Instances keep their
//! members in shared storage so reference-duplicated values observe member
//! writes, the same way arrays do.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::{TypeConstraint, Value};
use crate::errors::{
    struct_constraint_violation, struct_definition_access, struct_field_count,
    unknown_struct_field, RuntimeResult,
};

/// Named, ordered field list with one type constraint per field.
#[derive(Debug)]
pub struct StructSchema {
    name: String,
    field_names: Vec<String>,
    constraints: Vec<TypeConstraint>,
    field_indices: FxHashMap<String, usize>,
}

impl StructSchema {
    /// Create a schema.
    ///
    /// `constraints` must have one entry per field name.
    pub fn new(
        name: impl Into<String>,
        field_names: Vec<String>,
        constraints: Vec<TypeConstraint>,
    ) -> RuntimeResult<Self> {
        let name = name.into();
        if field_names.len() != constraints.len() {
            return Err(struct_field_count(
                &name,
                field_names.len(),
                constraints.len(),
            ));
        }
        let field_indices = field_names
            .iter()
            .enumerate()
            .map(|(i, field)| (field.clone(), i))
            .collect();
        Ok(StructSchema {
            name,
            field_names,
            constraints,
            field_indices,
        })
    }

    /// Create a schema from `(field, constraint)` pairs.
    pub fn from_fields<I, N>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, TypeConstraint)>,
        N: Into<String>,
    {
        let (field_names, constraints): (Vec<String>, Vec<TypeConstraint>) = fields
            .into_iter()
            .map(|(field, constraint)| (field.into(), constraint))
            .unzip();
        let field_indices = field_names
            .iter()
            .enumerate()
            .map(|(i, field)| (field.clone(), i))
            .collect();
        StructSchema {
            name: name.into(),
            field_names,
            constraints,
            field_indices,
        }
    }

    /// Create a schema whose fields accept every tag.
    pub fn untyped(name: impl Into<String>, field_names: Vec<String>) -> Self {
        Self::from_fields(
            name,
            field_names
                .into_iter()
                .map(|field| (field, TypeConstraint::any())),
        )
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    #[inline]
    pub fn constraints(&self) -> &[TypeConstraint] {
        &self.constraints
    }

    #[inline]
    pub fn field_count(&self) -> usize {
        self.field_names.len()
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.field_indices.get(field).copied()
    }

    fn check_field(&self, index: usize, value: &Value) -> RuntimeResult<()> {
        let ty = value.data_type();
        match self.constraints.get(index) {
            Some(constraint) if constraint.allows(ty) => Ok(()),
            _ => Err(struct_constraint_violation(
                &self.name,
                self.field_names.get(index).map_or("", String::as_str),
                ty,
            )),
        }
    }
}

/// Struct definition or struct instance.
#[derive(Clone)]
pub struct StructObject {
    schema: Rc<StructSchema>,
    members: Option<Rc<RefCell<Vec<Value>>>>,
}

impl StructObject {
    /// The definition value of a schema.
    pub fn definition(schema: Rc<StructSchema>) -> Self {
        StructObject {
            schema,
            members: None,
        }
    }

    /// Build an instance, checking the field count and every constraint.
    ///
    /// Members are labeled with their field names.
    pub fn instance(schema: Rc<StructSchema>, values: Vec<Value>) -> RuntimeResult<Self> {
        if values.len() != schema.field_count() {
            return Err(struct_field_count(
                schema.name(),
                schema.field_count(),
                values.len(),
            ));
        }
        let mut members = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            schema.check_field(index, &value)?;
            members.push(value.named(&schema.field_names[index]));
        }
        Ok(StructObject {
            schema,
            members: Some(Rc::new(RefCell::new(members))),
        })
    }

    #[inline]
    pub fn schema(&self) -> &Rc<StructSchema> {
        &self.schema
    }

    #[inline]
    pub fn is_definition(&self) -> bool {
        self.members.is_none()
    }

    /// Reference-duplicate the member `field`.
    pub fn get_member(&self, field: &str) -> RuntimeResult<Value> {
        let members = self.instance_members()?;
        let index = self.field_index(field)?;
        let members = members.borrow();
        Ok(members[index].clone())
    }

    /// Write the member `field`.
    ///
    /// The constraint is checked before the write; a final member rejects it.
    pub(crate) fn set_member(&self, field: &str, value: Value) -> RuntimeResult<()> {
        let members = self.instance_members()?;
        let index = self.field_index(field)?;
        self.schema.check_field(index, &value)?;
        let mut members = members.borrow_mut();
        members[index].set_data(value.data().clone())
    }

    /// Reference-duplicates of every member, in field order.
    pub fn members(&self) -> RuntimeResult<Vec<Value>> {
        Ok(self.instance_members()?.borrow().clone())
    }

    /// Returns `true` when both objects share the schema and member storage.
    pub fn ptr_eq(&self, other: &StructObject) -> bool {
        Rc::ptr_eq(&self.schema, &other.schema)
            && match (&self.members, &other.members) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }

    fn instance_members(&self) -> RuntimeResult<&Rc<RefCell<Vec<Value>>>> {
        self.members
            .as_ref()
            .ok_or_else(|| struct_definition_access(self.schema.name()))
    }

    fn field_index(&self, field: &str) -> RuntimeResult<usize> {
        self.schema
            .index_of(field)
            .ok_or_else(|| unknown_struct_field(self.schema.name(), field))
    }
}

impl fmt::Debug for StructObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::text::struct_text(self))
    }
}
