//! Static method table.

use exprtools_core::{DataType, MethodSignature};
use rustc_hash::FxHashMap;
use tracing::trace;

use super::MethodResolver;

/// Static methods keyed by name and exact parameter types.
///
/// Only static, non-generic methods are kept. When two methods share a key
/// the first registration wins.
#[derive(Debug, Clone, Default)]
pub struct StaticMethodResolver {
    methods: FxHashMap<(String, Vec<DataType>), MethodSignature>,
    ignore_case: bool,
}

impl StaticMethodResolver {
    pub fn new(methods: impl IntoIterator<Item = MethodSignature>) -> Self {
        Self::build(methods, false)
    }

    /// Names compare after upper-casing both sides.
    pub fn ignoring_case(methods: impl IntoIterator<Item = MethodSignature>) -> Self {
        Self::build(methods, true)
    }

    fn build(methods: impl IntoIterator<Item = MethodSignature>, ignore_case: bool) -> Self {
        let mut resolver = Self {
            methods: FxHashMap::default(),
            ignore_case,
        };
        for method in methods {
            resolver.register(method);
        }
        resolver
    }

    pub fn register(&mut self, method: MethodSignature) {
        if !method.is_static() || method.is_generic_definition() {
            trace!(method = %method.name, "skipping non-static or generic method");
            return;
        }
        let key = (self.key(&method.name), method.params.clone());
        self.methods.entry(key).or_insert(method);
    }

    fn key(&self, name: &str) -> String {
        if self.ignore_case {
            name.to_uppercase()
        } else {
            name.to_string()
        }
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl MethodResolver for StaticMethodResolver {
    fn resolve_method(&self, name: &str, arg_types: &[DataType]) -> Option<MethodSignature> {
        self.methods
            .get(&(self.key(name), arg_types.to_vec()))
            .cloned()
    }
}
