//! Standard host type modules for exprtools.
//!
//! This crate provides the host types an expression can reference without
//! any registration by the embedding application:
//!
//! - **system** - primitives under their host names, `Object`, `Nullable<T>`
//! - **string** - `String` members (`ToUpper`, `Substring`, `Length`, ...)
//! - **math** - `Math` constants and functions
//! - **datetime** - `DateTime`, `DateTimeOffset`, `TimeSpan`
//! - **guid** - `Guid`
//! - **globalization** - `CultureInfo`
//! - **collections** - `IEnumerable<T>`, `List<T>`
//! - **linq** - `Enumerable` sequence operations (explicit module)
//!
//! # Usage
//!
//! Each module file provides a function returning a [`Module`] that can be
//! installed into a [`TypeRegistry`](exprtools_registry::TypeRegistry):
//!
//! ```
//! use exprtools_core::HostTypeSystem;
//! use exprtools_registry::TypeRegistry;
//!
//! let registry = TypeRegistry::with_modules(exprtools_modules::standard()).unwrap();
//! assert!(registry.resolve_type_in_module("System.Linq.Enumerable", "System.Linq").is_some());
//! ```

use exprtools_registry::Module;

pub mod collections;
pub mod datetime;
pub mod globalization;
pub mod guid;
pub mod linq;
pub mod math;
pub mod string;
pub mod system;

pub use globalization::CultureInfo;

/// Every standard module, in installation order.
pub fn standard() -> Vec<Module> {
    vec![
        system::module(),
        string::module(),
        math::module(),
        datetime::module(),
        guid::module(),
        globalization::module(),
        collections::module(),
        linq::module(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprtools_core::{DataType, HostTypeSystem};
    use exprtools_registry::TypeRegistry;

    #[test]
    fn test_standard_modules_install_together() {
        let registry = TypeRegistry::with_modules(standard()).unwrap();
        assert_eq!(registry.resolve_type("System.Math"), Some(DataType::named("System.Math")));
        assert_eq!(registry.resolve_type("System.Guid"), Some(DataType::guid()));
        assert_eq!(registry.resolve_type("System.DateTime"), Some(DataType::date_time()));
        assert!(registry.resolve_type("System.Globalization.CultureInfo").is_some());
        assert!(registry.resolve_type("System.Linq.Enumerable").is_none());
        assert!(registry.sequence_ops_type().is_some());
    }

    #[test]
    fn test_array_sequence_op_lookup() {
        let registry = TypeRegistry::with_modules(standard()).unwrap();
        let ops = registry.sequence_ops_type().unwrap();
        let ints = DataType::array_of(DataType::int32());
        let element = registry.is_sequence_of(&ints).unwrap();

        let any = registry.get_methods(&ops, "Any").remove(0).instantiate(&[element]);
        assert!(registry.is_assignable(&any.params[0], &ints));
    }
}
