//! Deterministic hash-based identity for types and method signatures.
//!
//! [`TypeHash`] is a 64-bit hash computed from a dotted type name or from a
//! method name plus its parameter type hashes. Registries and resolvers key
//! their maps by it so that lookups by `(name, argument types)` are a single
//! hash-map lookup.
//!
//! # Examples
//!
//! ```
//! use exprtools_core::TypeHash;
//!
//! let a = TypeHash::from_name("System.Int32");
//! assert_eq!(a, TypeHash::from_name("System.Int32"));
//!
//! let pow = TypeHash::from_function("Pow", &[a, a]);
//! let pow_swapped = TypeHash::from_function("Pow", &[a, TypeHash::from_name("System.Double")]);
//! assert_ne!(pow, pow_swapped);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for combining components
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for method signature hashes
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for array types
    pub const ARRAY: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for nullable wrappers
    pub const NULLABLE: u64 = 0x3e9f5d2a8c7b1403;

    /// Domain marker for generic parameter placeholders
    pub const GENERIC_PARAM: u64 = 0x9a7f3d5e2b8c4601;

    /// Position markers so that argument order changes the hash.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

fn marker(i: usize) -> u64 {
    hash_constants::PARAM_MARKERS
        .get(i)
        .copied()
        .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64))
}

/// A deterministic 64-bit identity hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Hash of a dotted type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash of a method name plus its ordered parameter type hashes.
    #[inline]
    pub fn from_function(name: &str, param_hashes: &[TypeHash]) -> Self {
        let mut hash = hash_constants::FUNCTION ^ xxh64(name.as_bytes(), 0);
        for (i, param) in param_hashes.iter().enumerate() {
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker(i) ^ param.0);
        }
        TypeHash(hash)
    }

    /// Hash of a generic instance (`List<Int32>`) from its definition and arguments.
    #[inline]
    pub fn from_generic_instance(definition: TypeHash, args: &[TypeHash]) -> Self {
        let mut hash = definition.0;
        for (i, arg) in args.iter().enumerate() {
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker(i) ^ arg.0);
        }
        TypeHash(hash)
    }

    /// Hash of an array of `element`.
    #[inline]
    pub fn from_array(element: TypeHash) -> Self {
        TypeHash(
            hash_constants::ARRAY
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(element.0),
        )
    }

    /// Hash of the nullable wrapper of `underlying`.
    #[inline]
    pub fn from_nullable(underlying: TypeHash) -> Self {
        TypeHash(
            hash_constants::NULLABLE
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(underlying.0),
        )
    }

    /// Hash of the generic parameter placeholder at `position`.
    #[inline]
    pub fn from_generic_param(position: u8) -> Self {
        TypeHash(hash_constants::GENERIC_PARAM ^ marker(position as usize))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_hash_is_deterministic() {
        assert_eq!(
            TypeHash::from_name("System.Guid"),
            TypeHash::from_name("System.Guid")
        );
        assert_ne!(
            TypeHash::from_name("System.Guid"),
            TypeHash::from_name("Guid")
        );
    }

    #[test]
    fn parameter_order_matters() {
        let a = TypeHash::from_name("System.Int32");
        let b = TypeHash::from_name("System.String");
        assert_ne!(
            TypeHash::from_function("M", &[a, b]),
            TypeHash::from_function("M", &[b, a])
        );
    }

    #[test]
    fn wrappers_are_distinct() {
        let int = TypeHash::from_name("System.Int32");
        assert_ne!(TypeHash::from_array(int), TypeHash::from_nullable(int));
        assert_ne!(TypeHash::from_array(int), int);
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("x").is_empty());
    }
}
