//! exprtools registry crate.
//!
//! A [`HostTypeSystem`](exprtools_core::HostTypeSystem) implementation backed
//! by registered modules:
//!
//! - [`Module`] and [`TypeBuilder`] describe host types and their members
//! - [`TypeRegistry`] stores them in a [`NamespaceTree`] and answers the
//!   builder's type, member and assignability queries

mod entry;
mod error;
mod module;
mod namespace_tree;
mod registry;

pub use entry::TypeEntry;
pub use error::RegistrationError;
pub use module::{Module, TypeBuilder};
pub use namespace_tree::{NamespaceData, NamespaceEdge, NamespaceTree};
pub use registry::TypeRegistry;
