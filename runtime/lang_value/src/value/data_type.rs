//! Type tags and per-field type constraints.

use std::fmt;

/// Tag of a `Data` variant.
///
/// Also the payload of TYPE values, which makes runtime type literals
/// (`$LANG_TYPE_INT`, ...) possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Text,
    Char,
    Int,
    Long,
    Float,
    Double,
    Array,
    Error,
    VarPointer,
    FunctionPointer,
    Struct,
    Null,
    Void,
    ArgumentSeparator,
    Type,
}

impl DataType {
    /// Every tag, in declaration order.
    pub const ALL: [DataType; 15] = [
        Self::Text,
        Self::Char,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Array,
        Self::Error,
        Self::VarPointer,
        Self::FunctionPointer,
        Self::Struct,
        Self::Null,
        Self::Void,
        Self::ArgumentSeparator,
        Self::Type,
    ];

    /// Upper-snake-case tag name (`FUNCTION_POINTER`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Char => "CHAR",
            Self::Int => "INT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Array => "ARRAY",
            Self::Error => "ERROR",
            Self::VarPointer => "VAR_POINTER",
            Self::FunctionPointer => "FUNCTION_POINTER",
            Self::Struct => "STRUCT",
            Self::Null => "NULL",
            Self::Void => "VOID",
            Self::ArgumentSeparator => "ARGUMENT_SEPARATOR",
            Self::Type => "TYPE",
        }
    }

    /// Returns `true` for INT, LONG, FLOAT and DOUBLE.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Long | Self::Float | Self::Double)
    }

    /// Bit used by `TypeConstraint` masks.
    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of tags a struct field accepts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeConstraint {
    allowed: u16,
}

impl TypeConstraint {
    /// Constraint accepting every tag.
    pub const fn any() -> Self {
        TypeConstraint { allowed: u16::MAX }
    }

    /// Constraint accepting exactly the listed tags.
    pub fn only(types: &[DataType]) -> Self {
        let allowed = types.iter().fold(0, |mask, ty| mask | ty.bit());
        TypeConstraint { allowed }
    }

    /// Constraint accepting everything but the listed tags.
    pub fn not(types: &[DataType]) -> Self {
        let denied = types.iter().fold(0, |mask, ty| mask | ty.bit());
        TypeConstraint { allowed: !denied }
    }

    /// Check whether a tag satisfies this constraint.
    #[inline]
    pub fn allows(self, ty: DataType) -> bool {
        self.allowed & ty.bit() != 0
    }

    /// Allowed tags, in declaration order.
    pub fn allowed_types(self) -> impl Iterator<Item = DataType> {
        DataType::ALL.into_iter().filter(move |ty| self.allows(*ty))
    }
}

impl Default for TypeConstraint {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Debug for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.allowed_types()).finish()
    }
}

impl fmt::Display for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, ty) in self.allowed_types().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, "}}")
    }
}
