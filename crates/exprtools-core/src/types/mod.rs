//! Primitive kinds and well-known host type names.

mod primitive_kind;

pub use primitive_kind::PrimitiveKind;

/// Dotted names of host types the core treats specially.
///
/// The constant folder rebuilds values of these types as constructor calls,
/// and the semantic builder uses the sequence and nullable definitions when
/// deciding how to coerce and where to look for sequence operations.
pub mod well_known {
    /// `System.DateTime`
    pub const DATE_TIME: &str = "System.DateTime";
    /// `System.DateTimeOffset`
    pub const DATE_TIME_OFFSET: &str = "System.DateTimeOffset";
    /// `System.TimeSpan`
    pub const TIME_SPAN: &str = "System.TimeSpan";
    /// `System.Guid`
    pub const GUID: &str = "System.Guid";
    /// `System.Nullable`1`
    pub const NULLABLE: &str = "System.Nullable`1";
    /// `System.Collections.Generic.IEnumerable`1`
    pub const ENUMERABLE: &str = "System.Collections.Generic.IEnumerable`1";
    /// `System.Linq.Enumerable`
    pub const SEQUENCE_OPS: &str = "System.Linq.Enumerable";
    /// Module that holds the sequence operations.
    pub const SEQUENCE_OPS_MODULE: &str = "System.Linq";
}
