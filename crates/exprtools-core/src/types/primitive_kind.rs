//! Primitive type kinds for the built-in scalar, text and object types.

use std::fmt;

/// Primitive type kinds.
///
/// Each kind has a source keyword (`int`) and a host name (`Int32`) under
/// which it is registered in the `System` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    Byte,
    SByte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    String,
    Object,
}

impl PrimitiveKind {
    /// Every primitive kind, in declaration order.
    pub const ALL: [PrimitiveKind; 15] = [
        PrimitiveKind::Void,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Byte,
        PrimitiveKind::SByte,
        PrimitiveKind::Int16,
        PrimitiveKind::UInt16,
        PrimitiveKind::Int32,
        PrimitiveKind::UInt32,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt64,
        PrimitiveKind::Single,
        PrimitiveKind::Double,
        PrimitiveKind::String,
        PrimitiveKind::Object,
    ];

    /// Name of the host type in the `System` namespace.
    pub const fn host_name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "Void",
            PrimitiveKind::Bool => "Boolean",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::SByte => "SByte",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::UInt16 => "UInt16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::UInt32 => "UInt32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::UInt64 => "UInt64",
            PrimitiveKind::Single => "Single",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::String => "String",
            PrimitiveKind::Object => "Object",
        }
    }

    /// Source keyword for this kind.
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::SByte => "sbyte",
            PrimitiveKind::Int16 => "short",
            PrimitiveKind::UInt16 => "ushort",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::UInt32 => "uint",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::UInt64 => "ulong",
            PrimitiveKind::Single => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::String => "string",
            PrimitiveKind::Object => "object",
        }
    }

    /// Map a predefined type keyword used in a parameter annotation or cast.
    ///
    /// `uint` and `ulong` annotate as their signed counterparts; `decimal`
    /// has no primitive and returns `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "bool" => PrimitiveKind::Bool,
            "char" => PrimitiveKind::Char,
            "byte" => PrimitiveKind::Byte,
            "sbyte" => PrimitiveKind::SByte,
            "short" => PrimitiveKind::Int16,
            "ushort" => PrimitiveKind::UInt16,
            "int" | "uint" => PrimitiveKind::Int32,
            "long" | "ulong" => PrimitiveKind::Int64,
            "float" => PrimitiveKind::Single,
            "double" => PrimitiveKind::Double,
            "string" => PrimitiveKind::String,
            "object" => PrimitiveKind::Object,
            _ => return None,
        })
    }

    /// Reverse of [`host_name`](Self::host_name).
    pub fn from_host_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.host_name() == name)
    }

    /// Integral or floating-point kind.
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_floating()
    }

    /// Integral kind (`char` excluded).
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte
                | PrimitiveKind::SByte
                | PrimitiveKind::Int16
                | PrimitiveKind::UInt16
                | PrimitiveKind::Int32
                | PrimitiveKind::UInt32
                | PrimitiveKind::Int64
                | PrimitiveKind::UInt64
        )
    }

    /// `float` or `double`.
    pub const fn is_floating(self) -> bool {
        matches!(self, PrimitiveKind::Single | PrimitiveKind::Double)
    }

    /// Whether an implicit widening conversion exists from `self` to `target`.
    pub const fn widens_to(self, target: PrimitiveKind) -> bool {
        use PrimitiveKind::*;
        match self {
            SByte => matches!(target, Int16 | Int32 | Int64 | Single | Double),
            Byte => matches!(
                target,
                Int16 | UInt16 | Int32 | UInt32 | Int64 | UInt64 | Single | Double
            ),
            Int16 => matches!(target, Int32 | Int64 | Single | Double),
            UInt16 | Char => matches!(
                target,
                Int32 | UInt32 | Int64 | UInt64 | Single | Double
            ) || (matches!(self, Char) && matches!(target, UInt16)),
            Int32 => matches!(target, Int64 | Single | Double),
            UInt32 => matches!(target, Int64 | UInt64 | Single | Double),
            Int64 | UInt64 => matches!(target, Single | Double),
            Single => matches!(target, Double),
            _ => false,
        }
    }

    /// Value types can be wrapped in `Nullable<T>`.
    pub const fn is_value_type(self) -> bool {
        !matches!(
            self,
            PrimitiveKind::Void | PrimitiveKind::String | PrimitiveKind::Object
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host_name())
    }
}
