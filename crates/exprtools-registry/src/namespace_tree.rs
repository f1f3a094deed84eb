//! Dotted-name index of registered host types.
//!
//! A `petgraph::DiGraph` whose nodes are namespaces, linked by edges
//! labelled with the child segment. Each node maps the simple names declared
//! at that level to their type hashes.
//!
//! Nested types live one level below their enclosing type: `Sample.Outer`
//! is stored in `Sample`, and `Sample.Outer.Inner` in the `Sample.Outer`
//! node, so a dotted name always resolves by walking its segments.

use exprtools_core::TypeHash;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::RegistrationError;

/// Label of the edge from a namespace to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceEdge(pub String);

/// Types declared directly in one namespace, by simple name.
#[derive(Debug, Default)]
pub struct NamespaceData {
    pub types: FxHashMap<String, TypeHash>,
}

pub struct NamespaceTree {
    graph: DiGraph<NamespaceData, NamespaceEdge>,
    root: NodeIndex,
    /// Dotted name of every registered type.
    names: FxHashMap<TypeHash, String>,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(NamespaceData::default());
        Self {
            graph,
            root,
            names: FxHashMap::default(),
        }
    }

    fn child(&self, parent: NodeIndex, segment: &str) -> Option<NodeIndex> {
        self.graph
            .edges(parent)
            .find(|edge| edge.weight().0 == segment)
            .map(|edge| edge.target())
    }

    fn walk<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeIndex> {
        path.iter()
            .try_fold(self.root, |node, segment| self.child(node, segment.as_ref()))
    }

    fn walk_or_create<S: AsRef<str>>(&mut self, path: &[S]) -> NodeIndex {
        let mut node = self.root;
        for segment in path {
            let segment = segment.as_ref();
            node = match self.child(node, segment) {
                Some(existing) => existing,
                None => {
                    let created = self.graph.add_node(NamespaceData::default());
                    self.graph
                        .add_edge(node, created, NamespaceEdge(segment.to_string()));
                    created
                }
            };
        }
        node
    }

    /// Register `simple_name` under `namespace_path`.
    pub fn register_type<S: AsRef<str>>(
        &mut self,
        namespace_path: &[S],
        simple_name: &str,
        type_hash: TypeHash,
    ) -> Result<(), RegistrationError> {
        let qualified = namespace_path
            .iter()
            .map(|segment| segment.as_ref())
            .chain([simple_name])
            .collect::<Vec<_>>()
            .join(".");
        if simple_name.is_empty() || namespace_path.iter().any(|s| s.as_ref().is_empty()) {
            return Err(RegistrationError::InvalidNamespace(qualified));
        }

        let node = self.walk_or_create(namespace_path);
        let types = &mut self.graph[node].types;
        if types.contains_key(simple_name) {
            return Err(RegistrationError::DuplicateType(qualified));
        }
        types.insert(simple_name.to_string(), type_hash);
        self.names.insert(type_hash, qualified);
        Ok(())
    }

    /// Resolve a fully qualified dotted name like `System.Globalization.CultureInfo`.
    pub fn resolve_qualified_type(&self, dotted: &str) -> Option<TypeHash> {
        let (namespace, simple_name): (Vec<&str>, &str) = match dotted.rsplit_once('.') {
            Some((namespace, simple_name)) => (namespace.split('.').collect(), simple_name),
            None => (Vec::new(), dotted),
        };
        let node = self.walk(&namespace)?;
        self.graph[node].types.get(simple_name).copied()
    }

    /// The dotted name a type was registered under.
    pub fn qualified_name(&self, hash: TypeHash) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }

    /// Every type declared directly in `namespace`.
    pub fn types_in_namespace<S: AsRef<str>>(&self, namespace: &[S]) -> Vec<TypeHash> {
        self.walk(namespace)
            .map(|node| self.graph[node].types.values().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(name: &str) -> TypeHash {
        TypeHash::from_name(name)
    }

    #[test]
    fn register_and_resolve_type() {
        let mut tree = NamespaceTree::new();
        tree.register_type(&["System", "Globalization"], "CultureInfo", hash("ci"))
            .unwrap();

        assert_eq!(
            tree.resolve_qualified_type("System.Globalization.CultureInfo"),
            Some(hash("ci"))
        );
        assert_eq!(tree.resolve_qualified_type("CultureInfo"), None);
        assert_eq!(tree.resolve_qualified_type("System.Globalization."), None);
        assert_eq!(tree.resolve_qualified_type("System.Linq.CultureInfo"), None);
    }

    #[test]
    fn duplicate_type_detection() {
        let mut tree = NamespaceTree::new();
        tree.register_type(&["System"], "Math", hash("a")).unwrap();
        let err = tree.register_type(&["System"], "Math", hash("b")).unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateType("System.Math".into()));
    }

    #[test]
    fn empty_segments_are_rejected() {
        let mut tree = NamespaceTree::new();
        let err = tree.register_type(&["System", ""], "Math", hash("a")).unwrap_err();
        assert_eq!(err, RegistrationError::InvalidNamespace("System..Math".into()));
    }

    #[test]
    fn nested_types_resolve_through_enclosing_type_node() {
        let mut tree = NamespaceTree::new();
        tree.register_type(&["Sample"], "Outer", hash("outer")).unwrap();
        tree.register_type(&["Sample", "Outer"], "Inner", hash("inner"))
            .unwrap();

        assert_eq!(tree.resolve_qualified_type("Sample.Outer"), Some(hash("outer")));
        assert_eq!(
            tree.resolve_qualified_type("Sample.Outer.Inner"),
            Some(hash("inner"))
        );
        assert_eq!(tree.qualified_name(hash("inner")), Some("Sample.Outer.Inner"));
    }

    #[test]
    fn global_types_have_simple_names() {
        let mut tree = NamespaceTree::new();
        tree.register_type::<&str>(&[], "Root", hash("root")).unwrap();
        assert_eq!(tree.resolve_qualified_type("Root"), Some(hash("root")));
        assert_eq!(tree.qualified_name(hash("root")), Some("Root"));
    }

    #[test]
    fn types_in_namespace_lists_direct_children_only() {
        let mut tree = NamespaceTree::new();
        tree.register_type(&["System"], "Math", hash("math")).unwrap();
        tree.register_type(&["System", "Linq"], "Enumerable", hash("enumerable"))
            .unwrap();
        assert_eq!(tree.types_in_namespace(&["System"]), vec![hash("math")]);
        assert!(tree.types_in_namespace(&["Missing"]).is_empty());
    }
}
