//! Registration errors.

use thiserror::Error;

/// Errors raised while installing modules into a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A base type was named that no installed module provides.
    #[error("type '{type_name}': unknown base type '{base}'")]
    UnknownBase {
        /// The derived type.
        type_name: String,
        /// The missing base.
        base: String,
    },

    /// Two overloads of a method share a parameter list.
    #[error("type '{type_name}': duplicate overload of '{method}'")]
    DuplicateMethod {
        /// The declaring type.
        type_name: String,
        /// The method name.
        method: String,
    },

    /// A module was declared with an empty or malformed namespace.
    #[error("invalid namespace: '{0}'")]
    InvalidNamespace(String),
}
