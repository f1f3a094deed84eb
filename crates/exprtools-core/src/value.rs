//! Runtime values carried by constants and produced by evaluation.
//!
//! `Value` is the payload of a `Constant` node and the result of evaluating a
//! tree. Floats are wrapped in `OrderedFloat` so trees can derive `Eq` and
//! `Hash`. Host objects are compared by identity.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ordered_float::OrderedFloat;
use uuid::Uuid;

use crate::time::{DateTime, DateTimeOffset, TimeSpan};
use crate::{DataType, PrimitiveKind};

// ============================================================================
// Host Objects
// ============================================================================

/// An opaque host object with its registered type.
///
/// Two host objects are equal only when they share the same allocation.
#[derive(Clone)]
pub struct HostObject {
    data_type: DataType,
    inner: Arc<dyn Any + Send + Sync>,
}

impl HostObject {
    pub fn new<T: Any + Send + Sync>(data_type: DataType, value: T) -> Self {
        Self {
            data_type,
            inner: Arc::new(value),
        }
    }

    /// Wrap an existing shared allocation.
    pub fn from_arc(data_type: DataType, inner: Arc<dyn Any + Send + Sync>) -> Self {
        Self { data_type, inner }
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &HostObject) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for HostObject {}

impl Hash for HostObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.inner) as *const () as usize).hash(state);
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("type", &self.data_type.to_string())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Value
// ============================================================================

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Byte(u8),
    SByte(i8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    String(Arc<str>),
    DateTime(DateTime),
    DateTimeOffset(DateTimeOffset),
    TimeSpan(TimeSpan),
    Guid(Uuid),
    Array(Arc<[Value]>),
    Object(HostObject),
}

impl Value {
    pub fn double(v: f64) -> Self {
        Value::Double(OrderedFloat(v))
    }

    pub fn single(v: f32) -> Self {
        Value::Single(OrderedFloat(v))
    }

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn array(items: impl Into<Arc<[Value]>>) -> Self {
        Value::Array(items.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HostObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Integral value widened to `i64` (chars count as integral).
    pub fn as_i64(&self) -> Option<i64> {
        Some(match self {
            Value::Char(c) => *c as i64,
            Value::Byte(v) => i64::from(*v),
            Value::SByte(v) => i64::from(*v),
            Value::Int16(v) => i64::from(*v),
            Value::UInt16(v) => i64::from(*v),
            Value::Int32(v) => i64::from(*v),
            Value::UInt32(v) => i64::from(*v),
            Value::Int64(v) => *v,
            Value::UInt64(v) => *v as i64,
            _ => return None,
        })
    }

    /// Any numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Single(v) => Some(f64::from(v.0)),
            Value::Double(v) => Some(v.0),
            Value::UInt64(v) => Some(*v as f64),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// The primitive kind of this value, if it is a primitive.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Value::Bool(_) => PrimitiveKind::Bool,
            Value::Char(_) => PrimitiveKind::Char,
            Value::Byte(_) => PrimitiveKind::Byte,
            Value::SByte(_) => PrimitiveKind::SByte,
            Value::Int16(_) => PrimitiveKind::Int16,
            Value::UInt16(_) => PrimitiveKind::UInt16,
            Value::Int32(_) => PrimitiveKind::Int32,
            Value::UInt32(_) => PrimitiveKind::UInt32,
            Value::Int64(_) => PrimitiveKind::Int64,
            Value::UInt64(_) => PrimitiveKind::UInt64,
            Value::Single(_) => PrimitiveKind::Single,
            Value::Double(_) => PrimitiveKind::Double,
            Value::String(_) => PrimitiveKind::String,
            _ => return None,
        })
    }

    /// Short name of the value's shape, used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::DateTime(_) => "DateTime".to_string(),
            Value::DateTimeOffset(_) => "DateTimeOffset".to_string(),
            Value::TimeSpan(_) => "TimeSpan".to_string(),
            Value::Guid(_) => "Guid".to_string(),
            Value::Array(_) => "Array".to_string(),
            Value::Object(obj) => obj.data_type().to_string(),
            other => other
                .primitive_kind()
                .map(|k| k.host_name().to_string())
                .unwrap_or_default(),
        }
    }

    /// Explicit numeric conversion with wrapping/truncating semantics.
    ///
    /// Returns `None` when either side is not numeric (or char), or when the
    /// target is not a numeric kind. Converting to the value's own kind
    /// returns a clone.
    pub fn convert_to(&self, target: PrimitiveKind) -> Option<Value> {
        if self.primitive_kind() == Some(target) {
            return Some(self.clone());
        }
        let is_float_source = matches!(self, Value::Single(_) | Value::Double(_));
        if is_float_source {
            let f = self.as_f64()?;
            return Some(match target {
                PrimitiveKind::Single => Value::single(f as f32),
                PrimitiveKind::Double => Value::double(f),
                PrimitiveKind::Char => Value::Char(char::from_u32(f as u32).unwrap_or('\0')),
                PrimitiveKind::Byte => Value::Byte(f as u8),
                PrimitiveKind::SByte => Value::SByte(f as i8),
                PrimitiveKind::Int16 => Value::Int16(f as i16),
                PrimitiveKind::UInt16 => Value::UInt16(f as u16),
                PrimitiveKind::Int32 => Value::Int32(f as i32),
                PrimitiveKind::UInt32 => Value::UInt32(f as u32),
                PrimitiveKind::Int64 => Value::Int64(f as i64),
                PrimitiveKind::UInt64 => Value::UInt64(f as u64),
                _ => return None,
            });
        }
        let i = match self {
            Value::UInt64(v) => *v as i128,
            other => i128::from(other.as_i64()?),
        };
        Some(match target {
            PrimitiveKind::Single => Value::single(i as f32),
            PrimitiveKind::Double => Value::double(i as f64),
            PrimitiveKind::Char => Value::Char(char::from_u32(i as u32).unwrap_or('\0')),
            PrimitiveKind::Byte => Value::Byte(i as u8),
            PrimitiveKind::SByte => Value::SByte(i as i8),
            PrimitiveKind::Int16 => Value::Int16(i as i16),
            PrimitiveKind::UInt16 => Value::UInt16(i as u16),
            PrimitiveKind::Int32 => Value::Int32(i as i32),
            PrimitiveKind::UInt32 => Value::UInt32(i as u32),
            PrimitiveKind::Int64 => Value::Int64(i as i64),
            PrimitiveKind::UInt64 => Value::UInt64(i as u64),
            _ => return None,
        })
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::single(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::string(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Guid(v)
    }
}

impl From<DateTime> for Value {
    fn from(v: DateTime) -> Self {
        Value::DateTime(v)
    }
}

impl fmt::Display for Value {
    /// The literal text of the value. Strings and chars are written raw;
    /// quoting is left to the caller.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::SByte(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Single(v) => write!(f, "{}", v.0),
            Value::Double(v) => write!(f, "{}", v.0),
            Value::String(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v),
            Value::DateTimeOffset(v) => write!(f, "{}", v),
            Value::TimeSpan(v) => write!(f, "{}", v),
            Value::Guid(v) => write!(f, "{}", v),
            Value::Array(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            Value::Object(obj) => write!(f, "{}", obj.data_type()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_widening() {
        assert_eq!(Value::Int32(7).as_f64(), Some(7.0));
        assert_eq!(Value::single(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Char('A').as_i64(), Some(65));
        assert_eq!(Value::string("x").as_f64(), None);
    }

    #[test]
    fn convert_truncates_and_wraps() {
        assert_eq!(
            Value::double(3.9).convert_to(PrimitiveKind::Int32),
            Some(Value::Int32(3))
        );
        assert_eq!(
            Value::Int32(300).convert_to(PrimitiveKind::Byte),
            Some(Value::Byte(44))
        );
        assert_eq!(
            Value::Int32(10).convert_to(PrimitiveKind::Double),
            Some(Value::double(10.0))
        );
        assert_eq!(Value::Bool(true).convert_to(PrimitiveKind::Int32), None);
    }

    #[test]
    fn host_objects_compare_by_identity() {
        let ty = DataType::named("Tests.Box");
        let a = HostObject::new(ty.clone(), 5_i32);
        let b = HostObject::new(ty, 5_i32);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.downcast_ref::<i32>(), Some(&5));
    }

    #[test]
    fn display_is_literal_text() {
        assert_eq!(Value::double(0.01).to_string(), "0.01");
        assert_eq!(Value::double(10.0).to_string(), "10");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(
            Value::array(vec![Value::Int32(1), Value::Int32(2)]).to_string(),
            "{1, 2}"
        );
    }
}
