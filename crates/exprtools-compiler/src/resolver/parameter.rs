//! Parameter type resolvers.

use exprtools_core::DataType;
use rustc_hash::FxHashMap;

use super::ParameterTypeResolver;

/// Parameter types looked up by name.
#[derive(Debug, Clone, Default)]
pub struct DictionaryParameterTypeResolver {
    types: FxHashMap<String, DataType>,
}

impl DictionaryParameterTypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, ty: DataType) -> Self {
        self.types.insert(name.into(), ty);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: DataType) {
        self.types.insert(name.into(), ty);
    }
}

impl<N: Into<String>> FromIterator<(N, DataType)> for DictionaryParameterTypeResolver {
    fn from_iter<I: IntoIterator<Item = (N, DataType)>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().map(|(n, t)| (n.into(), t)).collect(),
        }
    }
}

impl ParameterTypeResolver for DictionaryParameterTypeResolver {
    fn resolve_parameter_type(&self, name: &str) -> Option<DataType> {
        self.types.get(name).cloned()
    }
}

/// One type for every parameter, or for a single named parameter.
///
/// With a name configured, any other name resolves to nothing.
#[derive(Debug, Clone)]
pub struct SingleParameterTypeResolver {
    ty: DataType,
    name: Option<String>,
}

impl SingleParameterTypeResolver {
    /// Answers `ty` for every parameter name.
    pub fn new(ty: DataType) -> Self {
        Self { ty, name: None }
    }

    /// Answers `ty` only for `name`.
    pub fn named(name: impl Into<String>, ty: DataType) -> Self {
        Self {
            ty,
            name: Some(name.into()),
        }
    }
}

impl ParameterTypeResolver for SingleParameterTypeResolver {
    fn resolve_parameter_type(&self, name: &str) -> Option<DataType> {
        match &self.name {
            Some(expected) if expected != name => None,
            _ => Some(self.ty.clone()),
        }
    }
}
