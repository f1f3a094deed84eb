use std::fmt;

/// Dotted host type name (`System.Globalization.CultureInfo`).
///
/// Used as the primary key for type lookup. Nested types carry their
/// enclosing type as the last namespace segment (`Sample.Outer.Inner`).
/// Generic type definitions keep the arity suffix in `name` (`List`1`).
///
/// # Examples
///
/// ```
/// use exprtools_core::QualifiedName;
///
/// let math = QualifiedName::from_dotted("System.Math");
/// assert_eq!(math.simple_name(), "Math");
/// assert_eq!(math.namespace_string(), "System");
/// assert_eq!(math.to_string(), "System.Math");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Simple name (e.g., "Math", "List`1")
    pub name: String,
    /// Namespace path (e.g., ["System", "Collections", "Generic"])
    /// Empty for the global namespace
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with namespace.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Create from a dotted string. The last segment is the name.
    pub fn from_dotted(s: &str) -> Self {
        let mut parts: Vec<String> = s
            .split('.')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.pop() {
            Some(name) => Self {
                name,
                namespace: parts,
            },
            None => Self::global(""),
        }
    }

    /// Check if this is in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Simple name with any generic arity suffix removed (`List`1` -> `List`).
    pub fn display_name(&self) -> &str {
        strip_arity(&self.name)
    }

    /// Generic arity encoded in the name, 0 for non-generic names.
    pub fn arity(&self) -> usize {
        self.name
            .rsplit_once('`')
            .and_then(|(_, n)| n.parse().ok())
            .unwrap_or(0)
    }

    /// Get the namespace path.
    pub fn namespace_path(&self) -> &[String] {
        &self.namespace
    }

    /// Get the namespace as a dotted string.
    pub fn namespace_string(&self) -> String {
        self.namespace.join(".")
    }

    /// Compute the [`TypeHash`](crate::TypeHash) of this name.
    pub fn to_type_hash(&self) -> crate::TypeHash {
        crate::TypeHash::from_name(&self.to_string())
    }

    /// Create a child name within this name (`System` + `Math`).
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut child_ns = self.namespace.clone();
        if !self.name.is_empty() {
            child_ns.push(self.name.clone());
        }
        Self {
            name: name.into(),
            namespace: child_ns,
        }
    }

    /// Get the parent as a QualifiedName (if any).
    pub fn parent(&self) -> Option<Self> {
        let (last, rest) = self.namespace.split_last()?;
        Some(Self {
            name: last.clone(),
            namespace: rest.to_vec(),
        })
    }
}

/// Remove a trailing generic arity suffix from a type name.
pub fn strip_arity(name: &str) -> &str {
    match name.find('`') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace.join("."), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_dotted(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::from_dotted(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_name() {
        let name = QualifiedName::global("Data1");
        assert!(name.is_global());
        assert_eq!(name.to_string(), "Data1");
    }

    #[test]
    fn from_dotted() {
        let name = QualifiedName::from_dotted("System.Collections.Generic.List`1");
        assert_eq!(name.name, "List`1");
        assert_eq!(name.namespace, vec!["System", "Collections", "Generic"]);
        assert_eq!(name.display_name(), "List");
        assert_eq!(name.arity(), 1);
    }

    #[test]
    fn from_dotted_ignores_empty_segments() {
        assert_eq!(
            QualifiedName::from_dotted(".System..Math"),
            QualifiedName::from_dotted("System.Math")
        );
        assert_eq!(QualifiedName::from_dotted("").name, "");
    }

    #[test]
    fn child_and_parent() {
        let system = QualifiedName::global("System");
        let math = system.child("Math");
        assert_eq!(math.to_string(), "System.Math");
        assert_eq!(math.parent(), Some(system));
        assert_eq!(QualifiedName::global("x").parent(), None);
    }

    #[test]
    fn arity_of_plain_name() {
        assert_eq!(QualifiedName::from_dotted("System.Guid").arity(), 0);
        assert_eq!(strip_arity("Nullable`1"), "Nullable");
    }
}
