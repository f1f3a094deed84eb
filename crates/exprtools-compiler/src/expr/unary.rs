//! Prefix unary operator compilation.

use exprtools_core::{Expr, ExprError, UnaryOp};
use exprtools_parser::ast::{self, UnaryExpr};

use super::{BuildContext, ExprBuilder, Result};

/// Compile `-x`, `+x` or `!x`.
pub fn compile_unary(
    builder: &ExprBuilder<'_>,
    expr: &UnaryExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Expr> {
    let (operand, ty) = builder.build_operand(expr.operand, ctx)?;
    let (op, valid) = match expr.op {
        ast::UnaryOp::Neg => (UnaryOp::Negate, ty.underlying().is_numeric()),
        ast::UnaryOp::Plus => (UnaryOp::UnaryPlus, ty.underlying().is_numeric()),
        ast::UnaryOp::Not => (UnaryOp::Not, ty.underlying().is_bool()),
    };
    if !valid {
        return Err(ExprError::argument_shape(
            format!("operator '{}' cannot be applied to {ty}", expr.op),
            expr.span,
        ));
    }
    Ok(Expr::unary(op, operand))
}
