//! exprtools Compiler
//!
//! Turns parsed lambda syntax into a typed expression tree.
//!
//! ## Architecture
//!
//! A single top-down pass over the syntax tree. Every node is resolved to a
//! value, a type, a method awaiting invocation, or a dotted name that an
//! enclosing member access may still complete. Types are checked and implicit
//! conversions inserted as nodes are built.
//!
//! ## Modules
//!
//! - [`expr`]: The [`ExprBuilder`] and its per-node compilers
//! - [`resolver`]: Caller-supplied resolution of parameter types, free
//!   methods and type names, plus namespace-based type name lookup
//! - [`conversion`]: Implicit conversion and cast rules

pub mod conversion;
pub mod expr;
pub mod resolver;

pub use expr::{BuildContext, CallSite, Callee, ExprBuilder, LambdaShape, Resolved};
pub use resolver::{
    DictionaryParameterTypeResolver, MethodResolver, NamespaceTypeNameResolver,
    ParameterTypeResolver, SingleParameterTypeResolver, StaticMethodResolver,
    TypeNameMapResolver, TypeNameResolver,
};
