//! Expression context.
//!
//! A `Context` owns the host type registry and the namespace configuration
//! that every parse and serialization against it shares.
//!
//! # Example
//!
//! ```
//! use exprtools::Context;
//! use std::sync::Arc;
//!
//! // Standard modules (System, System.Linq, System.Globalization, ...)
//! let ctx = Arc::new(Context::with_default_modules().unwrap());
//!
//! let lambda = ctx.parse("(double a, double b) => Math.Pow(a, b)").unwrap();
//! assert_eq!(ctx.serialize(&lambda), "(a, b) => Math.Pow(a, b)");
//! ```

use bumpalo::Bump;
use thiserror::Error;
use tracing::debug;

use exprtools_compiler::{
    ExprBuilder, LambdaShape, MethodResolver, ParameterTypeResolver, TypeNameResolver,
};
use exprtools_core::{EvalError, ExprError, LambdaExpr, NamespaceConfig, Value};
use exprtools_parser::Parser;
use exprtools_registry::{Module, RegistrationError, TypeRegistry};
use exprtools_transform::InlineResolver;

// ============================================================================
// Configuration
// ============================================================================

/// What a [`Context`] is built from.
///
/// The default holds [`NamespaceConfig::system`] and every standard module.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Namespaces searched for unqualified type names and rendered without
    /// qualification.
    pub namespaces: NamespaceConfig,
    /// Modules installed into the registry, in order.
    pub modules: Vec<Module>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            namespaces: NamespaceConfig::system(),
            modules: exprtools_modules::standard(),
        }
    }
}

impl ContextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration with no modules and no namespaces.
    pub fn empty() -> Self {
        Self {
            namespaces: NamespaceConfig::new(),
            modules: Vec::new(),
        }
    }

    pub fn with_namespaces(mut self, namespaces: NamespaceConfig) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Install `module` after the ones already listed.
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }
}

// ============================================================================
// Parse options
// ============================================================================

/// Caller-supplied resolvers and lambda shape for a single parse.
#[derive(Default, Clone, Copy)]
pub struct ParseOptions<'a> {
    parameter_types: Option<&'a dyn ParameterTypeResolver>,
    methods: Option<&'a dyn MethodResolver>,
    type_names: Option<&'a dyn TypeNameResolver>,
    shape: Option<&'a LambdaShape>,
}

impl<'a> ParseOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameter_types(mut self, resolver: &'a dyn ParameterTypeResolver) -> Self {
        self.parameter_types = Some(resolver);
        self
    }

    pub fn methods(mut self, resolver: &'a dyn MethodResolver) -> Self {
        self.methods = Some(resolver);
        self
    }

    pub fn type_names(mut self, resolver: &'a dyn TypeNameResolver) -> Self {
        self.type_names = Some(resolver);
        self
    }

    /// Require the lambda to match `shape`.
    pub fn shape(mut self, shape: &'a LambdaShape) -> Self {
        self.shape = Some(shape);
        self
    }
}

// ============================================================================
// Context
// ============================================================================

/// Registry and namespaces shared by every operation on expressions.
///
/// A `Context` is immutable once built and can be shared across threads
/// behind an `Arc`. Each parse allocates its own syntax arena.
pub struct Context {
    registry: TypeRegistry,
    namespaces: NamespaceConfig,
}

impl Context {
    /// Build a context from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a module fails to install.
    pub fn new(config: ContextConfig) -> Result<Self, ContextError> {
        debug!(modules = config.modules.len(), "building context");
        let registry = TypeRegistry::with_modules(config.modules)?;
        Ok(Self {
            registry,
            namespaces: config.namespaces,
        })
    }

    /// Create a context with the standard modules and the `System`
    /// namespaces.
    ///
    /// # Errors
    ///
    /// Returns an error if a standard module fails to install.
    pub fn with_default_modules() -> Result<Self, ContextError> {
        Self::new(ContextConfig::default())
    }

    /// The host type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn namespaces(&self) -> &NamespaceConfig {
        &self.namespaces
    }

    /// Parse and build `text`. Unannotated parameters fail to resolve.
    pub fn parse(&self, text: &str) -> Result<LambdaExpr, ExprError> {
        self.parse_with(text, ParseOptions::new())
    }

    /// Parse and build `text` against an expected lambda shape.
    pub fn parse_typed(&self, text: &str, shape: &LambdaShape) -> Result<LambdaExpr, ExprError> {
        self.parse_with(text, ParseOptions::new().shape(shape))
    }

    /// Parse and build `text` with caller-supplied resolvers.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_with(&self, text: &str, options: ParseOptions<'_>) -> Result<LambdaExpr, ExprError> {
        debug!(len = text.len(), "parsing expression");
        let arena = Bump::new();
        let syntax = Parser::parse_lambda(text, &arena)?;

        let mut builder = ExprBuilder::new(&self.registry, &self.namespaces);
        if let Some(resolver) = options.parameter_types {
            builder = builder.with_parameter_types(resolver);
        }
        if let Some(resolver) = options.methods {
            builder = builder.with_methods(resolver);
        }
        if let Some(resolver) = options.type_names {
            builder = builder.with_type_names(resolver);
        }

        match options.shape {
            Some(shape) => builder.build_with_shape(syntax, shape),
            None => builder.build(syntax),
        }
    }

    /// Inline parameters of `lambda`.
    pub fn inline(&self, resolver: &dyn InlineResolver, lambda: &LambdaExpr) -> LambdaExpr {
        exprtools_transform::inline(resolver, lambda)
    }

    /// Fold member accesses whose value is known, rebuilding dates and guids
    /// with this context's constructors.
    pub fn fold_constants(&self, lambda: &LambdaExpr) -> LambdaExpr {
        exprtools_transform::fold_constants(&self.registry, lambda)
    }

    /// Render `lambda`, leaving types in this context's namespaces
    /// unqualified.
    pub fn serialize(&self, lambda: &LambdaExpr) -> String {
        exprtools_transform::serialize(lambda, &self.namespaces)
    }

    pub fn evaluate(&self, lambda: &LambdaExpr, args: &[Value]) -> Result<Value, EvalError> {
        crate::eval::evaluate(lambda, args)
    }
}

/// Errors that can occur when building a context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A module failed to install.
    #[error("failed to install module: {0}")]
    ModuleInstallFailed(#[from] RegistrationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprtools_compiler::SingleParameterTypeResolver;
    use exprtools_core::DataType;
    use exprtools_registry::TypeBuilder;

    #[test]
    fn test_context_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }

    #[test]
    fn test_parse_with_parameter_types() {
        let ctx = Context::with_default_modules().unwrap();
        let doubles = SingleParameterTypeResolver::new(DataType::double());
        let lambda = ctx
            .parse_with("x => x * 2", ParseOptions::new().parameter_types(&doubles))
            .unwrap();
        assert_eq!(lambda.return_type(), Some(&DataType::double()));
    }

    #[test]
    fn test_unannotated_parameter_needs_a_type() {
        let ctx = Context::with_default_modules().unwrap();
        assert!(ctx.parse("x => x").unwrap_err().is_unresolved_type());
    }

    #[test]
    fn test_empty_config_has_no_types() {
        let ctx = Context::new(ContextConfig::empty()).unwrap();
        assert!(ctx.parse("(int x) => Math.Abs(x)").is_err());
    }

    #[test]
    fn test_custom_module() {
        let config = ContextConfig::new().with_module(
            Module::new("Shop").ty(TypeBuilder::new("Order").property(
                "Total",
                DataType::double(),
                |ctx| {
                    ctx.set_return(12.5);
                    Ok(())
                },
            )),
        );
        let ctx = Context::new(config).unwrap();
        let shape = LambdaShape::new(vec![DataType::named("Shop.Order")]);
        let lambda = ctx.parse_typed("o => o.Total > 10", &shape).unwrap();
        assert_eq!(ctx.serialize(&lambda), "o => (o.Total > 10.0)");
    }

    #[test]
    fn test_duplicate_module_fails() {
        let config = ContextConfig::empty()
            .with_module(Module::new("Shop").ty(TypeBuilder::new("Order")))
            .with_module(Module::new("Shop").ty(TypeBuilder::new("Order")));
        assert!(matches!(
            Context::new(config),
            Err(ContextError::ModuleInstallFailed(RegistrationError::DuplicateType(_)))
        ));
    }
}
