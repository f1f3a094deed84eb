//! TypeRegistry - module-backed host type system.
//!
//! This module provides [`TypeRegistry`], the [`HostTypeSystem`] used by the
//! facade. Types are installed a [`Module`] at a time and addressed three
//! ways:
//!
//! - **By name**: the namespace tree maps dotted names to type hashes.
//! - **By hash**: entries are stored in a single map keyed by `TypeHash`.
//! - **By ancestry**: an inheritance graph answers derived-to-base
//!   assignability.
//!
//! # Thread Safety
//!
//! Registration takes `&mut self`; afterwards the registry is read-only and
//! is shared behind an `Arc` by every build.
//!
//! # Example
//!
//! ```
//! use exprtools_core::{DataType, HostTypeSystem};
//! use exprtools_registry::{Module, TypeBuilder, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .install(Module::new("Sample").ty(TypeBuilder::new("Widget")))
//!     .unwrap();
//!
//! assert_eq!(
//!     registry.resolve_type("Sample.Widget"),
//!     Some(DataType::named("Sample.Widget"))
//! );
//! ```

use exprtools_core::types::well_known;
use exprtools_core::{
    ConstructorInfo, DataType, HostTypeSystem, MemberInfo, MethodSignature, TypeHash, TypeKind,
    default_is_assignable,
};
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use crate::{Module, NamespaceTree, RegistrationError, TypeEntry};

/// Host types installed from modules.
#[derive(Default)]
pub struct TypeRegistry {
    tree: NamespaceTree,

    /// All entries by the hash of their dotted name.
    types: FxHashMap<TypeHash, TypeEntry>,

    /// Modules only visible through `resolve_type_in_module`.
    explicit_modules: FxHashSet<String>,

    /// Derived -> base edges.
    inheritance: DiGraph<TypeHash, ()>,
    inheritance_nodes: FxHashMap<TypeHash, NodeIndex>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and install every module in order.
    pub fn with_modules(modules: impl IntoIterator<Item = Module>) -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        for module in modules {
            registry.install(module)?;
        }
        Ok(registry)
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Install a module's types.
    ///
    /// Base types must already be registered, either earlier in the same
    /// module or by a previously installed one.
    pub fn install(&mut self, module: Module) -> Result<(), RegistrationError> {
        if module.namespace().iter().any(|segment| segment.contains('`')) {
            return Err(RegistrationError::InvalidNamespace(module.name().to_string()));
        }
        if module.is_explicit() {
            self.explicit_modules.insert(module.name().to_string());
        }
        let name = module.name().to_string();
        let entries = module.into_entries();
        tracing::debug!(module = %name, types = entries.len(), "installing module");
        for entry in entries {
            self.register_type(entry)?;
        }
        Ok(())
    }

    /// Register a single entry.
    pub fn register_type(&mut self, entry: TypeEntry) -> Result<(), RegistrationError> {
        let hash = entry.type_hash();

        let mut base_hashes = Vec::with_capacity(entry.bases.len());
        for base in &entry.bases {
            match entry_key(base) {
                Some(base_hash) if self.types.contains_key(&base_hash) => base_hashes.push(base_hash),
                _ => {
                    return Err(RegistrationError::UnknownBase {
                        type_name: entry.name.to_string(),
                        base: base.to_string(),
                    });
                }
            }
        }

        check_overloads(&entry)?;

        self.tree
            .register_type(entry.name.namespace_path(), entry.name.simple_name(), hash)?;

        for base_hash in base_hashes {
            let from = self.inheritance_node(hash);
            let to = self.inheritance_node(base_hash);
            self.inheritance.add_edge(from, to, ());
        }

        tracing::trace!(name = %entry.name, module = %entry.module, "registered type");
        self.types.insert(hash, entry);
        Ok(())
    }

    fn inheritance_node(&mut self, hash: TypeHash) -> NodeIndex {
        if let Some(&node) = self.inheritance_nodes.get(&hash) {
            return node;
        }
        let node = self.inheritance.add_node(hash);
        self.inheritance_nodes.insert(hash, node);
        node
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get an entry by hash.
    pub fn get(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&hash)
    }

    /// Get an entry by dotted name, ignoring module visibility.
    pub fn get_by_name(&self, dotted: &str) -> Option<&TypeEntry> {
        self.get(self.tree.resolve_qualified_type(dotted)?)
    }

    /// The entry describing `ty`: nullable types map to `Nullable`1`,
    /// primitives to their `System` host type.
    pub fn entry_for(&self, ty: &DataType) -> Option<&TypeEntry> {
        self.get(entry_key(ty)?)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types.values()
    }

    /// Whether `module` was installed as explicit.
    pub fn is_explicit_module(&self, module: &str) -> bool {
        self.explicit_modules.contains(module)
    }

    /// Every static method declared on `ty`.
    pub fn static_methods(&self, ty: &DataType) -> Vec<MethodSignature> {
        self.entry_for(ty)
            .map(|entry| entry.static_methods().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `derived` reaches `base` through declared base types.
    pub fn derives_from(&self, derived: &DataType, base: &DataType) -> bool {
        let (Some(from), Some(to)) = (entry_key(derived), entry_key(base)) else {
            return false;
        };
        match (self.inheritance_nodes.get(&from), self.inheritance_nodes.get(&to)) {
            (Some(&from), Some(&to)) => from != to && has_path_connecting(&self.inheritance, from, to, None),
            _ => false,
        }
    }

    /// The entry for `ty` followed by its bases, breadth first. Each entry
    /// is paired with the instantiated type it was reached through and the
    /// generic arguments to substitute into its members.
    fn lineage(&self, ty: &DataType) -> Vec<Ancestor<'_>> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([ty.clone()]);
        let mut seen = FxHashSet::default();
        while let Some(current) = queue.pop_front() {
            let Some(key) = entry_key(&current) else {
                continue;
            };
            if !seen.insert(key) {
                continue;
            }
            let Some(entry) = self.get(key) else {
                continue;
            };
            let args = substitution_args(&current);
            for base in &entry.bases {
                queue.push_back(substitute_if_generic(entry, base, &args));
            }
            out.push(Ancestor {
                entry,
                receiver: current,
                args,
            });
        }
        out
    }
}

struct Ancestor<'a> {
    entry: &'a TypeEntry,
    receiver: DataType,
    args: Vec<DataType>,
}

impl Ancestor<'_> {
    fn bind_member(&self, member: &MemberInfo) -> MemberInfo {
        if !self.entry.is_generic() {
            return member.clone();
        }
        MemberInfo {
            declaring_type: self.receiver.clone(),
            data_type: member.data_type.substitute(&self.args),
            ..member.clone()
        }
    }

    fn bind_method(&self, method: &MethodSignature) -> MethodSignature {
        if !self.entry.is_generic() {
            return method.clone();
        }
        MethodSignature {
            declaring_type: Some(self.receiver.clone()),
            params: method.params.iter().map(|p| p.substitute(&self.args)).collect(),
            return_type: method.return_type.substitute(&self.args),
            ..method.clone()
        }
    }
}

/// Reject overloads that repeat a name, parameter list and staticness.
fn check_overloads(entry: &TypeEntry) -> Result<(), RegistrationError> {
    for overloads in entry.methods.values() {
        let mut seen = FxHashSet::default();
        for method in overloads {
            if !seen.insert((method.is_static(), method.signature_hash())) {
                return Err(RegistrationError::DuplicateMethod {
                    type_name: entry.name.to_string(),
                    method: method.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Hash of the entry that describes `ty`.
fn entry_key(ty: &DataType) -> Option<TypeHash> {
    if ty.is_nullable() {
        return Some(TypeHash::from_name(well_known::NULLABLE));
    }
    match &ty.kind {
        TypeKind::Primitive(kind) => Some(TypeHash::from_name(&format!("System.{}", kind.host_name()))),
        TypeKind::Named(name) => Some(name.to_type_hash()),
        TypeKind::Array | TypeKind::GenericParam(_) => None,
    }
}

/// Arguments bound to a receiver's generic parameters.
fn substitution_args(ty: &DataType) -> Vec<DataType> {
    if ty.is_nullable() {
        vec![ty.underlying()]
    } else {
        ty.args.clone()
    }
}

fn substitute_if_generic(entry: &TypeEntry, ty: &DataType, args: &[DataType]) -> DataType {
    if entry.is_generic() {
        ty.substitute(args)
    } else {
        ty.clone()
    }
}

impl HostTypeSystem for TypeRegistry {
    fn resolve_type(&self, name: &str) -> Option<DataType> {
        let entry = self.get_by_name(name)?;
        if self.explicit_modules.contains(&entry.module) {
            tracing::trace!(name, module = %entry.module, "type hidden in explicit module");
            return None;
        }
        Some(entry.data_type.clone())
    }

    fn resolve_type_in_module(&self, name: &str, module: &str) -> Option<DataType> {
        let entry = self.get_by_name(name)?;
        if entry.module == module || !self.explicit_modules.contains(&entry.module) {
            return Some(entry.data_type.clone());
        }
        None
    }

    fn get_property(&self, ty: &DataType, name: &str) -> Option<MemberInfo> {
        self.lineage(ty)
            .iter()
            .find_map(|a| a.entry.properties.get(name).map(|m| a.bind_member(m)))
    }

    fn get_field(&self, ty: &DataType, name: &str) -> Option<MemberInfo> {
        self.lineage(ty)
            .iter()
            .find_map(|a| a.entry.fields.get(name).map(|m| a.bind_member(m)))
    }

    fn get_methods(&self, ty: &DataType, name: &str) -> Vec<MethodSignature> {
        let mut methods: Vec<MethodSignature> = Vec::new();
        for ancestor in self.lineage(ty) {
            let Some(overloads) = ancestor.entry.methods.get(name) else {
                continue;
            };
            for method in overloads {
                let bound = ancestor.bind_method(method);
                // Derived overloads hide base overloads with the same parameters.
                if !methods.iter().any(|m| m.params == bound.params) {
                    methods.push(bound);
                }
            }
        }
        methods
    }

    fn get_constructor(&self, ty: &DataType, arg_types: &[DataType]) -> Option<ConstructorInfo> {
        let entry = self.entry_for(ty)?;
        let args = substitution_args(ty);
        let candidates: Vec<ConstructorInfo> = entry
            .constructors
            .iter()
            .filter(|c| c.params.len() == arg_types.len())
            .map(|c| ConstructorInfo {
                declaring_type: ty.clone(),
                params: c.params.iter().map(|p| substitute_if_generic(entry, p, &args)).collect(),
                invoker: c.invoker.clone(),
            })
            .collect();

        if let Some(exact) = candidates.iter().find(|c| c.params == arg_types) {
            return Some(exact.clone());
        }
        candidates.into_iter().find(|c| {
            c.params
                .iter()
                .zip(arg_types)
                .all(|(param, arg)| self.is_assignable(param, arg))
        })
    }

    fn get_nested_type(&self, ty: &DataType, name: &str) -> Option<DataType> {
        self.entry_for(ty)?.nested.get(name).cloned()
    }

    fn is_sequence_of(&self, ty: &DataType) -> Option<DataType> {
        if ty.is_nullable() || ty.is_string() {
            return None;
        }
        if let Some(element) = ty.element_type() {
            return Some(element.clone());
        }
        for Ancestor { entry, args, .. } in self.lineage(ty) {
            if let Some(element) = &entry.sequence_element {
                return Some(substitute_if_generic(entry, element, &args));
            }
            if entry.name.to_string() == well_known::ENUMERABLE {
                return args.first().cloned();
            }
        }
        None
    }

    fn is_assignable(&self, target: &DataType, source: &DataType) -> bool {
        default_is_assignable(self, target, source)
            || (target.args.is_empty()
                && !source.is_nullable()
                && !target.is_nullable()
                && self.derives_from(source, target))
    }
}
