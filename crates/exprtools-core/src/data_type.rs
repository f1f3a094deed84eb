//! DataType - the resolved semantic type of an expression node.
//!
//! A `DataType` is a kind (primitive, named host type, array, or generic
//! parameter placeholder), its element/generic arguments, and a nullable flag.
//! `Nullable<Guid>` is represented as the `Guid` type with `nullable` set, so
//! unwrapping a nullable is a flag flip rather than a lookup.
//!
//! # Example
//!
//! ```
//! use exprtools_core::{DataType, PrimitiveKind};
//!
//! let int = DataType::int32();
//! let ints = DataType::array_of(int.clone());
//! assert_eq!(ints.element_type(), Some(&int));
//!
//! let maybe = DataType::named("System.Guid").as_nullable();
//! assert!(maybe.is_nullable());
//! assert_eq!(maybe.to_string(), "Nullable<System.Guid>");
//! assert_eq!(DataType::primitive(PrimitiveKind::Double).to_string(), "Double");
//! ```

use std::fmt::{self, Display, Formatter};

use crate::types::well_known;
use crate::{PrimitiveKind, QualifiedName, TypeHash};

/// What a [`DataType`] is, without its arguments or nullable flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Built-in primitive.
    Primitive(PrimitiveKind),
    /// Host type registered by dotted name (generic definitions keep their
    /// arity suffix, e.g. `List`1`).
    Named(QualifiedName),
    /// Single-dimension array; the element type is `args[0]`.
    Array,
    /// Placeholder for the n-th generic argument of a generic method.
    GenericParam(u8),
}

/// A complete type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    /// The base kind.
    pub kind: TypeKind,
    /// Generic arguments, or the element type for arrays.
    pub args: Vec<DataType>,
    /// Whether this is the nullable wrapper of a value type.
    pub nullable: bool,
}

impl DataType {
    // ==========================================================================
    // Constructors
    // ==========================================================================

    /// Create a primitive type.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self {
            kind: TypeKind::Primitive(kind),
            args: Vec::new(),
            nullable: false,
        }
    }

    pub fn void() -> Self {
        Self::primitive(PrimitiveKind::Void)
    }

    pub fn bool() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    pub fn char() -> Self {
        Self::primitive(PrimitiveKind::Char)
    }

    pub fn int32() -> Self {
        Self::primitive(PrimitiveKind::Int32)
    }

    pub fn int64() -> Self {
        Self::primitive(PrimitiveKind::Int64)
    }

    pub fn single() -> Self {
        Self::primitive(PrimitiveKind::Single)
    }

    pub fn double() -> Self {
        Self::primitive(PrimitiveKind::Double)
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    pub fn object() -> Self {
        Self::primitive(PrimitiveKind::Object)
    }

    /// Create a non-generic named host type from its dotted name.
    pub fn named(name: impl Into<QualifiedName>) -> Self {
        Self {
            kind: TypeKind::Named(name.into()),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// Create a generic instance such as `List`1` of `[Int32]`.
    pub fn generic(definition: impl Into<QualifiedName>, args: Vec<DataType>) -> Self {
        Self {
            kind: TypeKind::Named(definition.into()),
            args,
            nullable: false,
        }
    }

    /// Create an array of `element`.
    pub fn array_of(element: DataType) -> Self {
        Self {
            kind: TypeKind::Array,
            args: vec![element],
            nullable: false,
        }
    }

    /// Create the `IEnumerable<element>` sequence interface type.
    pub fn sequence_of(element: DataType) -> Self {
        Self::generic(well_known::ENUMERABLE, vec![element])
    }

    /// Create the placeholder for the `position`-th generic method argument.
    pub fn generic_param(position: u8) -> Self {
        Self {
            kind: TypeKind::GenericParam(position),
            args: Vec::new(),
            nullable: false,
        }
    }

    pub fn date_time() -> Self {
        Self::named(well_known::DATE_TIME)
    }

    pub fn date_time_offset() -> Self {
        Self::named(well_known::DATE_TIME_OFFSET)
    }

    pub fn time_span() -> Self {
        Self::named(well_known::TIME_SPAN)
    }

    pub fn guid() -> Self {
        Self::named(well_known::GUID)
    }

    /// The nullable wrapper of this type. Reference types are returned
    /// unchanged since they already admit null.
    pub fn as_nullable(&self) -> Self {
        let mut ty = self.clone();
        if ty.is_value_type() {
            ty.nullable = true;
        }
        ty
    }

    /// This type with the nullable flag cleared.
    pub fn underlying(&self) -> Self {
        let mut ty = self.clone();
        ty.nullable = false;
        ty
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// The primitive kind, for non-nullable and nullable primitives alike.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// The named host type, if any.
    pub fn qualified_name(&self) -> Option<&QualifiedName> {
        match &self.kind {
            TypeKind::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this is the named type `dotted` (ignoring arguments and nullability).
    pub fn is_named(&self, dotted: &str) -> bool {
        self.qualified_name()
            .is_some_and(|name| name.to_string() == dotted)
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array)
    }

    /// Element type of an array.
    pub fn element_type(&self) -> Option<&DataType> {
        if self.is_array() {
            self.args.first()
        } else {
            None
        }
    }

    /// Whether this is a non-nullable primitive of `kind`.
    pub fn is_primitive(&self, kind: PrimitiveKind) -> bool {
        !self.nullable && self.kind == TypeKind::Primitive(kind)
    }

    /// Non-nullable numeric primitive.
    pub fn is_numeric(&self) -> bool {
        !self.nullable && self.primitive_kind().is_some_and(PrimitiveKind::is_numeric)
    }

    pub fn is_bool(&self) -> bool {
        self.is_primitive(PrimitiveKind::Bool)
    }

    pub fn is_string(&self) -> bool {
        self.is_primitive(PrimitiveKind::String)
    }

    pub fn is_void(&self) -> bool {
        self.is_primitive(PrimitiveKind::Void)
    }

    /// Value types can be wrapped as nullable. Arrays, strings, objects and
    /// named host types are reference types unless the host says otherwise;
    /// the well-known date, time and guid types are value types.
    pub fn is_value_type(&self) -> bool {
        match &self.kind {
            TypeKind::Primitive(kind) => kind.is_value_type(),
            TypeKind::Named(_) => {
                self.is_named(well_known::DATE_TIME)
                    || self.is_named(well_known::DATE_TIME_OFFSET)
                    || self.is_named(well_known::TIME_SPAN)
                    || self.is_named(well_known::GUID)
            }
            TypeKind::Array | TypeKind::GenericParam(_) => false,
        }
    }

    /// Whether a generic parameter placeholder appears anywhere in this type.
    pub fn contains_generic_param(&self) -> bool {
        matches!(self.kind, TypeKind::GenericParam(_))
            || self.args.iter().any(DataType::contains_generic_param)
    }

    /// Replace generic parameter placeholders with concrete arguments.
    ///
    /// Placeholders without a matching argument are left in place.
    pub fn substitute(&self, generic_args: &[DataType]) -> DataType {
        if let TypeKind::GenericParam(position) = self.kind {
            if let Some(arg) = generic_args.get(position as usize) {
                let mut ty = arg.clone();
                ty.nullable |= self.nullable;
                return ty;
            }
        }
        DataType {
            kind: self.kind.clone(),
            args: self
                .args
                .iter()
                .map(|arg| arg.substitute(generic_args))
                .collect(),
            nullable: self.nullable,
        }
    }

    /// Deterministic identity hash of the full type.
    pub fn type_hash(&self) -> TypeHash {
        let base = match &self.kind {
            TypeKind::Primitive(kind) => {
                TypeHash::from_name(&format!("System.{}", kind.host_name()))
            }
            TypeKind::Named(name) => {
                let definition = name.to_type_hash();
                if self.args.is_empty() {
                    definition
                } else {
                    let args: Vec<TypeHash> = self.args.iter().map(DataType::type_hash).collect();
                    TypeHash::from_generic_instance(definition, &args)
                }
            }
            TypeKind::Array => {
                let element = self
                    .args
                    .first()
                    .map(DataType::type_hash)
                    .unwrap_or(TypeHash::EMPTY);
                TypeHash::from_array(element)
            }
            TypeKind::GenericParam(position) => TypeHash::from_generic_param(*position),
        };
        if self.nullable {
            TypeHash::from_nullable(base)
        } else {
            base
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.nullable {
            return write!(f, "Nullable<{}>", self.underlying());
        }
        match &self.kind {
            TypeKind::Primitive(kind) => write!(f, "{}", kind.host_name()),
            TypeKind::Array => match self.args.first() {
                Some(element) => write!(f, "{}[]", element),
                None => write!(f, "[]"),
            },
            TypeKind::GenericParam(position) => write!(f, "T{}", position),
            TypeKind::Named(name) => {
                if self.args.is_empty() {
                    return write!(f, "{}", name);
                }
                if !name.is_global() {
                    write!(f, "{}.", name.namespace_string())?;
                }
                write!(f, "{}<", name.display_name())?;
                for (i, arg) in self.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_wraps_value_types_only() {
        assert!(DataType::int32().as_nullable().is_nullable());
        assert!(DataType::guid().as_nullable().is_nullable());
        assert!(!DataType::string().as_nullable().is_nullable());
        assert!(!DataType::array_of(DataType::int32()).as_nullable().is_nullable());
    }

    #[test]
    fn nullable_is_not_numeric() {
        let nullable_int = DataType::int32().as_nullable();
        assert!(!nullable_int.is_numeric());
        assert_eq!(nullable_int.underlying(), DataType::int32());
        assert_eq!(nullable_int.primitive_kind(), Some(PrimitiveKind::Int32));
    }

    #[test]
    fn substitute_generic_params() {
        let seq_t = DataType::sequence_of(DataType::generic_param(0));
        assert!(seq_t.contains_generic_param());

        let seq_int = seq_t.substitute(&[DataType::int32()]);
        assert_eq!(seq_int, DataType::sequence_of(DataType::int32()));
        assert!(!seq_int.contains_generic_param());
    }

    #[test]
    fn display_forms() {
        assert_eq!(DataType::array_of(DataType::int32()).to_string(), "Int32[]");
        assert_eq!(
            DataType::generic("System.Collections.Generic.List`1", vec![DataType::string()])
                .to_string(),
            "System.Collections.Generic.List<String>"
        );
        assert_eq!(
            DataType::int32().as_nullable().to_string(),
            "Nullable<Int32>"
        );
    }

    #[test]
    fn hashes_distinguish_shapes() {
        let int = DataType::int32();
        assert_ne!(int.type_hash(), int.as_nullable().type_hash());
        assert_ne!(int.type_hash(), DataType::array_of(int.clone()).type_hash());
        assert_eq!(int.type_hash(), DataType::int32().type_hash());
    }

    #[test]
    fn generic_param_hashes_follow_position() {
        let t0 = DataType::generic_param(0);
        let t1 = DataType::generic_param(1);
        assert_eq!(t0.type_hash(), TypeHash::from_generic_param(0));
        assert_ne!(t0.type_hash(), t1.type_hash());
        assert_ne!(
            DataType::sequence_of(t0.clone()).type_hash(),
            DataType::sequence_of(t1).type_hash()
        );
    }
}
