//! Rewriting traversal over typed expression trees.
//!
//! A [`Rewriter`] rebuilds a tree node by node. Each `rewrite_*` method
//! corresponds to a node kind whose behavior a pass may want to change; the
//! defaults call the matching `walk_*` function, which rebuilds the node from
//! its rewritten children. The input tree is never modified.
//!
//! # Example
//!
//! ```
//! use exprtools_core::{DataType, Expr, LambdaExpr, ParameterExpr};
//! use exprtools_transform::rewrite::Rewriter;
//!
//! /// Renames every parameter reference to `y`.
//! struct RenameToY;
//!
//! impl Rewriter for RenameToY {
//!     fn rewrite_parameter(&mut self, param: &ParameterExpr) -> Expr {
//!         Expr::parameter("y", param.data_type.clone())
//!     }
//! }
//!
//! let x = ParameterExpr::new("x", DataType::int32());
//! let lambda = LambdaExpr::new(vec![x.clone()], Expr::Parameter(x));
//! let renamed = RenameToY.rewrite_expr(&Expr::Lambda(lambda));
//! assert!(renamed.references_parameter("y"));
//! ```

use exprtools_core::{Expr, LambdaExpr, MemberExpr, ParameterExpr};

/// Tree-rebuilding traversal.
///
/// Override any `rewrite_*` method to change how that node kind is rebuilt.
pub trait Rewriter: Sized {
    /// Rewrite any node.
    fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
        walk_expr(self, expr)
    }

    /// Rewrite a lambda, including nested lambdas in a body.
    fn rewrite_lambda(&mut self, lambda: &LambdaExpr) -> LambdaExpr {
        walk_lambda(self, lambda)
    }

    /// Rewrite a parameter reference.
    fn rewrite_parameter(&mut self, param: &ParameterExpr) -> Expr {
        Expr::Parameter(param.clone())
    }

    /// Rewrite a property or field access.
    fn rewrite_member(&mut self, member: &MemberExpr) -> Expr {
        walk_member(self, member)
    }
}

/// Rebuild a lambda around its rewritten body, keeping its parameters.
pub fn walk_lambda<R: Rewriter>(rewriter: &mut R, lambda: &LambdaExpr) -> LambdaExpr {
    LambdaExpr::new(lambda.params.clone(), rewriter.rewrite_expr(&lambda.body))
}

/// Rebuild a member access around its rewritten target.
pub fn walk_member<R: Rewriter>(rewriter: &mut R, member: &MemberExpr) -> Expr {
    let target = member.target.as_deref().map(|t| rewriter.rewrite_expr(t));
    Expr::member(target, member.member.clone())
}

fn rewrite_all<R: Rewriter>(rewriter: &mut R, exprs: &[Expr]) -> Vec<Expr> {
    exprs.iter().map(|e| rewriter.rewrite_expr(e)).collect()
}

/// Rebuild `expr` from its rewritten children.
///
/// Node types are carried over rather than recomputed, so a rewrite that
/// keeps child types keeps the parent's type too.
pub fn walk_expr<R: Rewriter>(rewriter: &mut R, expr: &Expr) -> Expr {
    match expr {
        Expr::Lambda(lambda) => Expr::Lambda(rewriter.rewrite_lambda(lambda)),
        Expr::Parameter(param) => rewriter.rewrite_parameter(param),
        Expr::Constant(_) => expr.clone(),
        Expr::Member(member) => rewriter.rewrite_member(member),
        Expr::Call(call) => {
            let target = call.target.as_deref().map(|t| rewriter.rewrite_expr(t));
            let args = rewrite_all(rewriter, &call.args);
            Expr::call(target, call.method.clone(), args)
        }
        Expr::Binary(binary) => {
            let mut rebuilt = binary.clone();
            rebuilt.left = Box::new(rewriter.rewrite_expr(&binary.left));
            rebuilt.right = Box::new(rewriter.rewrite_expr(&binary.right));
            Expr::Binary(rebuilt)
        }
        Expr::Unary(unary) => {
            let mut rebuilt = unary.clone();
            rebuilt.operand = Box::new(rewriter.rewrite_expr(&unary.operand));
            Expr::Unary(rebuilt)
        }
        Expr::Conditional(cond) => Expr::conditional(
            rewriter.rewrite_expr(&cond.test),
            rewriter.rewrite_expr(&cond.if_true),
            rewriter.rewrite_expr(&cond.if_false),
        ),
        Expr::New(new) => {
            let args = rewrite_all(rewriter, &new.args);
            Expr::new_object(new.constructor.clone(), args)
        }
        Expr::NewArray(array) => {
            let items = rewrite_all(rewriter, &array.items);
            Expr::new_array(array.element_type.clone(), items)
        }
        Expr::Cast(cast) => Expr::cast(rewriter.rewrite_expr(&cast.operand), cast.data_type.clone()),
        Expr::Index(index) => {
            let target = rewriter.rewrite_expr(&index.target);
            let args = rewrite_all(rewriter, &index.args);
            Expr::index(target, index.indexer.clone(), args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprtools_core::{BinaryOp, DataType, Value};

    struct Identity;

    impl Rewriter for Identity {}

    struct CountMembers(usize);

    impl Rewriter for CountMembers {
        fn rewrite_member(&mut self, member: &MemberExpr) -> Expr {
            self.0 += 1;
            walk_member(self, member)
        }
    }

    #[test]
    fn test_identity_rewrite_is_equal() {
        let x = Expr::parameter("x", DataType::double());
        let expr = Expr::conditional(
            Expr::binary(
                BinaryOp::GreaterThan,
                x.clone(),
                Expr::constant(Value::double(1.0), DataType::double()),
            ),
            Expr::cast(x.clone(), DataType::int32()),
            Expr::new_array(DataType::double(), vec![x]),
        );
        assert_eq!(Identity.rewrite_expr(&expr), expr);
    }

    #[test]
    fn test_overridden_hook_sees_nested_nodes() {
        let ty = DataType::named("Tests.Node");
        let next = exprtools_core::MemberInfo::property("Next", ty.clone(), ty.clone());
        let chain = Expr::member(
            Some(Expr::member(Some(Expr::parameter("n", ty)), next.clone())),
            next,
        );
        let mut counter = CountMembers(0);
        let rebuilt = counter.rewrite_expr(&chain);
        assert_eq!(counter.0, 2);
        assert_eq!(rebuilt, chain);
    }
}
