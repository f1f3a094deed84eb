//! Table-backed type name resolution.

use exprtools_core::{DataType, TypeKind};
use rustc_hash::FxHashMap;

use super::TypeNameResolver;

/// Resolves a fixed set of types by simple name, full dotted name, or any
/// dotted suffix in between (`Inner`, `Outer.Inner`, `App.Outer.Inner`).
///
/// When two types share a key the first registration wins.
#[derive(Debug, Clone, Default)]
pub struct TypeNameMapResolver {
    types: FxHashMap<String, DataType>,
}

impl TypeNameMapResolver {
    pub fn new(types: impl IntoIterator<Item = DataType>) -> Self {
        let mut resolver = Self::default();
        for ty in types {
            resolver.register(ty);
        }
        resolver
    }

    pub fn register(&mut self, ty: DataType) {
        let full = match &ty.kind {
            TypeKind::Primitive(kind) => format!("System.{}", kind.host_name()),
            TypeKind::Named(name) => name.to_string(),
            TypeKind::Array | TypeKind::GenericParam(_) => return,
        };
        let segments: Vec<&str> = full.split('.').collect();
        for start in 0..segments.len() {
            let key = segments[start..].join(".");
            self.types.entry(key).or_insert_with(|| ty.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeNameResolver for TypeNameMapResolver {
    fn resolve_type_name(&self, name: &str) -> Option<DataType> {
        self.types.get(name).cloned()
    }
}
