//! Namespace-aware fallback for type names.

use exprtools_core::{DataType, HostTypeSystem, NamespaceConfig};
use tracing::trace;

use super::TypeNameResolver;

/// Resolves a name against the host, retrying under each configured default
/// namespace and, when nothing matches, with the leading dotted segment
/// removed.
///
/// For the default configuration `Math` resolves as `System.Math`, and
/// `Enumerable` as `System.Linq.Enumerable` from the explicit `System.Linq`
/// module. Entries that name a module are also consulted for direct lookups
/// whose name falls under their namespace.
pub struct NamespaceTypeNameResolver<'a> {
    host: &'a dyn HostTypeSystem,
    config: &'a NamespaceConfig,
}

impl<'a> NamespaceTypeNameResolver<'a> {
    pub fn new(host: &'a dyn HostTypeSystem, config: &'a NamespaceConfig) -> Self {
        Self { host, config }
    }

    pub fn config(&self) -> &NamespaceConfig {
        self.config
    }

    fn try_direct(&self, name: &str) -> Option<DataType> {
        if let Some(ty) = self.host.resolve_type(name) {
            return Some(ty);
        }
        self.config.entries().iter().find_map(|entry| {
            let module = entry.module.as_deref()?;
            let inside = name
                .strip_prefix(entry.namespace.as_str())
                .is_some_and(|rest| rest.starts_with('.'));
            if inside {
                self.host.resolve_type_in_module(name, module)
            } else {
                None
            }
        })
    }

    fn try_namespaces(&self, name: &str) -> Option<DataType> {
        self.config.entries().iter().find_map(|entry| {
            let qualified = format!("{}.{}", entry.namespace, name);
            match &entry.module {
                Some(module) => self.host.resolve_type_in_module(&qualified, module),
                None => self.host.resolve_type(&qualified),
            }
        })
    }
}

impl TypeNameResolver for NamespaceTypeNameResolver<'_> {
    fn resolve_type_name(&self, name: &str) -> Option<DataType> {
        let mut candidate = name;
        loop {
            if let Some(ty) = self.try_direct(candidate).or_else(|| self.try_namespaces(candidate)) {
                trace!(name, resolved = %ty, "resolved type name");
                return Some(ty);
            }
            match candidate.split_once('.') {
                Some((_, rest)) if !rest.is_empty() => candidate = rest,
                _ => {
                    trace!(name, "type name did not resolve");
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprtools_registry::TypeRegistry;

    fn registry() -> TypeRegistry {
        TypeRegistry::with_modules(exprtools_modules::standard()).unwrap()
    }

    #[test]
    fn test_default_namespaces() {
        let registry = registry();
        let config = NamespaceConfig::system();
        let resolver = NamespaceTypeNameResolver::new(&registry, &config);

        assert_eq!(
            resolver.resolve_type_name("Math"),
            Some(DataType::named("System.Math"))
        );
        assert_eq!(resolver.resolve_type_name("Int32"), Some(DataType::int32()));
        assert_eq!(
            resolver.resolve_type_name("CultureInfo"),
            Some(DataType::named("System.Globalization.CultureInfo"))
        );
        assert_eq!(resolver.resolve_type_name("Nope"), None);
    }

    #[test]
    fn test_explicit_module_needs_its_entry() {
        let registry = registry();
        let with_linq = NamespaceConfig::system();
        let resolver = NamespaceTypeNameResolver::new(&registry, &with_linq);
        assert!(resolver.resolve_type_name("Enumerable").is_some());
        assert!(resolver.resolve_type_name("System.Linq.Enumerable").is_some());

        let without = NamespaceConfig::new().with_namespace("System");
        let resolver = NamespaceTypeNameResolver::new(&registry, &without);
        assert_eq!(resolver.resolve_type_name("Enumerable"), None);
    }

    #[test]
    fn test_leading_segments_are_stripped() {
        let registry = registry();
        let config = NamespaceConfig::system();
        let resolver = NamespaceTypeNameResolver::new(&registry, &config);
        assert_eq!(
            resolver.resolve_type_name("Unknown.Math"),
            Some(DataType::named("System.Math"))
        );
    }
}
