//! Registered host type entries.

use exprtools_core::{ConstructorInfo, DataType, MemberInfo, MethodSignature, QualifiedName, TypeHash};
use rustc_hash::FxHashMap;

/// Everything the registry knows about one host type.
///
/// Member types of a generic definition refer to the definition's own
/// arguments through `GenericParam` placeholders; lookups substitute the
/// receiver's arguments.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub name: QualifiedName,
    /// The type as seen by the builder; generic definitions carry
    /// placeholder arguments.
    pub data_type: DataType,
    /// Name of the module that declared the type.
    pub module: String,
    pub generic_arity: u8,
    pub properties: FxHashMap<String, MemberInfo>,
    pub fields: FxHashMap<String, MemberInfo>,
    /// Overloads by method name.
    pub methods: FxHashMap<String, Vec<MethodSignature>>,
    pub constructors: Vec<ConstructorInfo>,
    /// Nested types by simple name.
    pub nested: FxHashMap<String, DataType>,
    /// Direct base types and implemented interfaces.
    pub bases: Vec<DataType>,
    /// Element type when the type is itself a sequence.
    pub sequence_element: Option<DataType>,
}

impl TypeEntry {
    pub fn new(name: QualifiedName, data_type: DataType) -> Self {
        Self {
            name,
            data_type,
            module: String::new(),
            generic_arity: 0,
            properties: FxHashMap::default(),
            fields: FxHashMap::default(),
            methods: FxHashMap::default(),
            constructors: Vec::new(),
            nested: FxHashMap::default(),
            bases: Vec::new(),
            sequence_element: None,
        }
    }

    pub fn type_hash(&self) -> TypeHash {
        self.name.to_type_hash()
    }

    pub fn is_generic(&self) -> bool {
        self.generic_arity > 0
    }

    /// All static methods, across every name.
    pub fn static_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods.values().flatten().filter(|m| m.is_static())
    }

    pub fn method_count(&self) -> usize {
        self.methods.values().map(Vec::len).sum()
    }
}
