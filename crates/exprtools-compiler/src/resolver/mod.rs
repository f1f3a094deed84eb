//! Pluggable name resolution used while building a tree.
//!
//! The builder asks three questions it cannot answer from the host type
//! system alone:
//!
//! - [`ParameterTypeResolver`]: the type of an unannotated lambda parameter
//! - [`MethodResolver`]: the method a free identifier in call position names
//! - [`TypeNameResolver`]: the type a bare or dotted name refers to
//!
//! Each trait has table-backed implementations in the submodules, and any
//! `Fn` closure with the matching shape implements the trait directly, so a
//! host can pass a plain function:
//!
//! ```
//! use exprtools_compiler::resolver::ParameterTypeResolver;
//! use exprtools_core::DataType;
//!
//! let resolver = |name: &str| (name == "x").then(DataType::double);
//! assert_eq!(resolver.resolve_parameter_type("x"), Some(DataType::double()));
//! assert_eq!(resolver.resolve_parameter_type("y"), None);
//! ```
//!
//! [`NamespaceTypeNameResolver`] is the fallback the builder always consults
//! after a caller-supplied [`TypeNameResolver`].

mod method;
mod namespace;
mod parameter;
mod type_name;

pub use method::StaticMethodResolver;
pub use namespace::NamespaceTypeNameResolver;
pub use parameter::{DictionaryParameterTypeResolver, SingleParameterTypeResolver};
pub use type_name::TypeNameMapResolver;

use exprtools_core::{DataType, MethodSignature};

/// Supplies types for lambda parameters that carry no annotation.
pub trait ParameterTypeResolver: Send + Sync {
    fn resolve_parameter_type(&self, name: &str) -> Option<DataType>;
}

/// Maps a free identifier plus argument types to a method.
pub trait MethodResolver: Send + Sync {
    fn resolve_method(&self, name: &str, arg_types: &[DataType]) -> Option<MethodSignature>;
}

/// Maps a bare or dotted name to a type.
///
/// Generic definitions are looked up with their arity suffix, `List`1`.
pub trait TypeNameResolver: Send + Sync {
    fn resolve_type_name(&self, name: &str) -> Option<DataType>;
}

impl<F> ParameterTypeResolver for F
where
    F: Fn(&str) -> Option<DataType> + Send + Sync,
{
    fn resolve_parameter_type(&self, name: &str) -> Option<DataType> {
        self(name)
    }
}

impl<F> MethodResolver for F
where
    F: Fn(&str, &[DataType]) -> Option<MethodSignature> + Send + Sync,
{
    fn resolve_method(&self, name: &str, arg_types: &[DataType]) -> Option<MethodSignature> {
        self(name, arg_types)
    }
}

impl<F> TypeNameResolver for F
where
    F: Fn(&str) -> Option<DataType> + Send + Sync,
{
    fn resolve_type_name(&self, name: &str) -> Option<DataType> {
        self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closures_are_resolvers() {
        let types = |name: &str| (name == "Point").then(|| DataType::named("Geometry.Point"));
        assert_eq!(
            types.resolve_type_name("Point"),
            Some(DataType::named("Geometry.Point"))
        );

        let methods = |name: &str, args: &[DataType]| {
            (name == "Twice" && args == [DataType::int32()])
                .then(|| MethodSignature::new("Twice", args.to_vec(), DataType::int32()))
        };
        assert!(methods.resolve_method("Twice", &[DataType::int32()]).is_some());
        assert!(methods.resolve_method("Twice", &[DataType::double()]).is_none());
    }
}
