//! exprtools Transform
//!
//! Passes over finished expression trees. None of them fail: every pass
//! takes a lambda and returns a new one, leaving its input untouched.
//!
//! ## Modules
//!
//! - [`rewrite`]: The [`Rewriter`] traversal the passes are built on
//! - [`inline`]: Parameter inlining and its resolvers
//! - [`fold`]: Constant folding of member accesses
//! - [`serialize`]: Canonical text rendering
//! - [`property_path`]: Dotted member path of a member-access lambda

pub mod fold;
pub mod inline;
pub mod property_path;
pub mod rewrite;
pub mod serialize;

pub use fold::{ConstantFolder, fold_constants};
pub use inline::{InlineResolver, Inliner, ParameterResolver, SingleResolver, inline, inline_single};
pub use property_path::property_path;
pub use rewrite::Rewriter;
pub use serialize::{Serializer, serialize, type_name};
