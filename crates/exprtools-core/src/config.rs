//! Namespace configuration shared by type-name fallback and serialization.
//!
//! The same value decides where unqualified type names are searched and
//! which namespaces are omitted when rendering type names.
//!
//! # Example
//!
//! ```
//! use exprtools_core::NamespaceConfig;
//!
//! let config = NamespaceConfig::system().with_namespace("MyApp.Model");
//! assert!(config.is_default("System.Globalization"));
//! assert!(config.is_default("MyApp.Model"));
//! assert!(!config.is_default("MyApp"));
//! ```

/// A default namespace and the module that must be consulted to see it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceEntry {
    pub namespace: String,
    /// `None` for types visible without naming a module.
    pub module: Option<String>,
}

/// Ordered list of default namespaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceConfig {
    entries: Vec<NamespaceEntry>,
}

impl NamespaceConfig {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// `System`, `System.Linq` (module `System.Linq`) and
    /// `System.Globalization`.
    pub fn system() -> Self {
        Self::new()
            .with_namespace("System")
            .with_module_namespace("System.Linq", "System.Linq")
            .with_namespace("System.Globalization")
    }

    /// Add a namespace visible without naming a module.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.entries.push(NamespaceEntry {
            namespace: namespace.into(),
            module: None,
        });
        self
    }

    /// Add a namespace whose types live in an explicitly loaded module.
    pub fn with_module_namespace(
        mut self,
        namespace: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        self.entries.push(NamespaceEntry {
            namespace: namespace.into(),
            module: Some(module.into()),
        });
        self
    }

    pub fn entries(&self) -> &[NamespaceEntry] {
        &self.entries
    }

    /// Whether types in `namespace` render without qualification.
    pub fn is_default(&self, namespace: &str) -> bool {
        self.entries.iter().any(|e| e.namespace == namespace)
    }
}
