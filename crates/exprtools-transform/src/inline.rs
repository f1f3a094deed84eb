//! Parameter inlining.
//!
//! Inlining replaces the parameters of a lambda with other lambdas. Given
//! `(x, y) => x + y + 1` and the replacements `x -> a => a * 3` and
//! `y -> b => b * 5`, the result is `(a, b) => a * 3 + b * 5 + 1`: each
//! replaced parameter contributes the replacement's own parameters, and every
//! reference to it becomes a copy of the replacement's body.
//!
//! Which parameters get replaced is decided by an [`InlineResolver`]:
//!
//! - [`ParameterResolver`] matches by parameter name.
//! - [`SingleResolver`] matches every parameter whose type is the
//!   replacement's return type.
//! - Any `Fn(&ParameterExpr) -> Option<LambdaExpr>` closure.
//!
//! Spliced parameters keep their names unless that would clash with a
//! parameter already in the new list, in which case a numeric suffix is
//! appended (`a`, `a1`, ...).

use exprtools_core::{DataType, Expr, LambdaExpr, ParameterExpr};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::rewrite::{Rewriter, walk_expr};

// ============================================================================
// Resolvers
// ============================================================================

/// Picks the replacement lambda for a parameter, or `None` to keep it.
pub trait InlineResolver: Send + Sync {
    fn resolve(&self, parameter: &ParameterExpr) -> Option<LambdaExpr>;
}

impl<F> InlineResolver for F
where
    F: Fn(&ParameterExpr) -> Option<LambdaExpr> + Send + Sync,
{
    fn resolve(&self, parameter: &ParameterExpr) -> Option<LambdaExpr> {
        self(parameter)
    }
}

/// Replacement lambdas keyed by the name of the parameter they replace.
#[derive(Debug, Clone, Default)]
pub struct ParameterResolver {
    replacements: FxHashMap<String, LambdaExpr>,
}

impl ParameterResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace parameters named `name` with `lambda`.
    pub fn register(mut self, name: impl Into<String>, lambda: LambdaExpr) -> Self {
        self.insert(name, lambda);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, lambda: LambdaExpr) {
        self.replacements.insert(name.into(), lambda);
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

impl InlineResolver for ParameterResolver {
    fn resolve(&self, parameter: &ParameterExpr) -> Option<LambdaExpr> {
        self.replacements.get(&parameter.name).cloned()
    }
}

/// One replacement for every parameter of its return type.
#[derive(Debug, Clone)]
pub struct SingleResolver {
    lambda: LambdaExpr,
    output: Option<DataType>,
}

impl SingleResolver {
    pub fn new(lambda: LambdaExpr) -> Self {
        let output = lambda.return_type().cloned();
        Self { lambda, output }
    }

    pub fn lambda(&self) -> &LambdaExpr {
        &self.lambda
    }
}

impl InlineResolver for SingleResolver {
    fn resolve(&self, parameter: &ParameterExpr) -> Option<LambdaExpr> {
        (self.output.as_ref() == Some(&parameter.data_type)).then(|| self.lambda.clone())
    }
}

// ============================================================================
// Inliner
// ============================================================================

/// Inline parameters of `lambda` as chosen by `resolver`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn inline(resolver: &dyn InlineResolver, lambda: &LambdaExpr) -> LambdaExpr {
    debug!(params = lambda.arity(), "inlining parameters");
    let inlined = Inliner::new(resolver).run(lambda);
    debug!(params = inlined.arity(), "inlined parameters");
    inlined
}

/// Compose two single-parameter lambdas: `to_inline` feeds the parameter of
/// `to_amend`.
///
/// `inline_single(a => a * 2, x => x + 1)` gives `a => a * 2 + 1`.
pub fn inline_single(to_inline: &LambdaExpr, to_amend: &LambdaExpr) -> LambdaExpr {
    inline(&SingleResolver::new(to_inline.clone()), to_amend)
}

/// Inlining pass. Each lambda opens a scope mapping its parameter names to
/// the subtree that replaces their references.
pub struct Inliner<'r> {
    resolver: &'r dyn InlineResolver,
    scopes: Vec<FxHashMap<String, Expr>>,
}

impl<'r> Inliner<'r> {
    pub fn new(resolver: &'r dyn InlineResolver) -> Self {
        Self {
            resolver,
            scopes: Vec::new(),
        }
    }

    /// Run the pass over a top-level lambda.
    pub fn run(mut self, lambda: &LambdaExpr) -> LambdaExpr {
        self.rewrite_lambda(lambda)
    }

    fn lookup(&self, name: &str) -> Option<&Expr> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

impl Rewriter for Inliner<'_> {
    fn rewrite_lambda(&mut self, lambda: &LambdaExpr) -> LambdaExpr {
        let mut params = Vec::with_capacity(lambda.params.len());
        let mut taken = FxHashSet::default();
        let mut scope = FxHashMap::default();

        for param in &lambda.params {
            match self.resolver.resolve(param) {
                Some(replacement) => {
                    trace!(parameter = %param.name, "inlining parameter");
                    let mut renames = FxHashMap::default();
                    for spliced in &replacement.params {
                        let name = fresh_name(&spliced.name, &taken);
                        taken.insert(name.clone());
                        if name != spliced.name {
                            renames.insert(
                                spliced.name.clone(),
                                Expr::parameter(name.clone(), spliced.data_type.clone()),
                            );
                        }
                        params.push(ParameterExpr::new(name, spliced.data_type.clone()));
                    }
                    let body = if renames.is_empty() {
                        (*replacement.body).clone()
                    } else {
                        Renamer(renames).rewrite_expr(&replacement.body)
                    };
                    scope.insert(param.name.clone(), body);
                }
                None => {
                    let name = fresh_name(&param.name, &taken);
                    taken.insert(name.clone());
                    let kept = ParameterExpr::new(name, param.data_type.clone());
                    scope.insert(param.name.clone(), Expr::Parameter(kept.clone()));
                    params.push(kept);
                }
            }
        }

        self.scopes.push(scope);
        let body = self.rewrite_expr(&lambda.body);
        self.scopes.pop();
        LambdaExpr::new(params, body)
    }

    fn rewrite_parameter(&mut self, param: &ParameterExpr) -> Expr {
        self.lookup(&param.name)
            .cloned()
            .unwrap_or_else(|| Expr::Parameter(param.clone()))
    }
}

/// `name`, or `name1`, `name2`, ... when taken.
fn fresh_name(name: &str, taken: &FxHashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    (1..)
        .map(|n| format!("{name}{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Renames parameter references of a replacement body, leaving nested
/// lambdas that redeclare a name alone.
struct Renamer(FxHashMap<String, Expr>);

impl Rewriter for Renamer {
    fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
        if let Expr::Lambda(nested) = expr {
            if nested.params.iter().any(|p| self.0.contains_key(&p.name)) {
                return expr.clone();
            }
        }
        walk_expr(self, expr)
    }

    fn rewrite_parameter(&mut self, param: &ParameterExpr) -> Expr {
        self.0
            .get(&param.name)
            .cloned()
            .unwrap_or_else(|| Expr::Parameter(param.clone()))
    }
}
