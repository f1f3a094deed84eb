//! Conditional expression compilation.

use exprtools_core::{Expr, ExprError};
use exprtools_parser::ast::ConditionalExpr;

use super::{BuildContext, ExprBuilder, Result};

/// Compile `test ? a : b`.
///
/// Branch types are not unified; the node takes the type of the first
/// branch.
pub fn compile_conditional(
    builder: &ExprBuilder<'_>,
    expr: &ConditionalExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Expr> {
    let (test, test_type) = builder.build_operand(expr.condition, ctx)?;
    if !test_type.is_bool() {
        return Err(ExprError::argument_shape(
            format!("condition must be Boolean, found {test_type}"),
            expr.condition.span(),
        ));
    }
    let (if_true, _) = builder.build_operand(expr.then_expr, ctx)?;
    let (if_false, _) = builder.build_operand(expr.else_expr, ctx)?;
    Ok(Expr::conditional(test, if_true, if_false))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use exprtools_core::{DataType, Expr};

    #[test]
    fn test_conditional() {
        let lambda = build("x => x >= 10 ? 1 : 0", DataType::int32()).unwrap();
        assert!(matches!(*lambda.body, Expr::Conditional(_)));
        assert_eq!(lambda.return_type(), Some(&DataType::int32()));
    }

    #[test]
    fn test_branches_are_not_unified() {
        let lambda = build("x => x > 0 ? 1 : 2.5", DataType::int32()).unwrap();
        assert_eq!(lambda.return_type(), Some(&DataType::int32()));
    }

    #[test]
    fn test_condition_must_be_boolean() {
        let err = build("x => x ? 1 : 0", DataType::int32()).unwrap_err();
        assert!(err.is_argument_shape());
    }
}
