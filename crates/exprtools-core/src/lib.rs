//! exprtools core crate.
//!
//! Shared data model for every other crate in the workspace:
//! - Source spans and qualified names
//! - Resolved types ([`DataType`]) and type identity hashes
//! - Runtime values, including tick-based date/time values
//! - The typed expression tree ([`Expr`], [`LambdaExpr`])
//! - The [`HostTypeSystem`] capability and the member descriptions it returns
//! - Native function plumbing used by host members
//! - Error types and the shared [`NamespaceConfig`]

mod config;
mod data_type;
pub mod error;
pub mod expr;
pub mod host;
mod native_fn;
mod qualified_name;
mod span;
pub mod time;
mod type_hash;
pub mod types;
pub mod value;

pub use config::{NamespaceConfig, NamespaceEntry};
pub use data_type::{DataType, TypeKind};
pub use error::{EvalError, ExprError, PathError};
pub use expr::{
    BinaryExpr, BinaryOp, CallExpr, CastExpr, ConditionalExpr, ConstantExpr, Expr, IndexExpr,
    LambdaExpr, MemberExpr, NewArrayExpr, NewExpr, ParameterExpr, UnaryExpr, UnaryOp,
};
pub use host::{
    ConstructorInfo, HostTypeSystem, MemberFlags, MemberInfo, MethodFlags, MethodSignature,
    default_is_assignable,
};
pub use native_fn::{CallContext, NativeCallable, NativeFn};
pub use qualified_name::{QualifiedName, strip_arity};
pub use span::Span;
pub use type_hash::{TypeHash, hash_constants};
pub use types::{PrimitiveKind, well_known};
pub use value::{HostObject, Value};
