//! Explicit cast compilation.

use exprtools_core::{Expr, ExprError};
use exprtools_parser::ast::CastExpr;

use super::{BuildContext, ExprBuilder, Result};
use crate::conversion;

/// Compile `(T)operand`. The Cast node is kept even when the operand already
/// has type `T`, so the tree mirrors the source.
pub fn compile_cast(
    builder: &ExprBuilder<'_>,
    expr: &CastExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Expr> {
    let target = builder.resolve_type_expr(&expr.target_type)?;
    let (operand, source) = builder.build_operand(expr.operand, ctx)?;
    if !conversion::can_cast(builder.host(), &source, &target) {
        return Err(ExprError::argument_shape(
            format!("cannot convert {source} to {target}"),
            expr.span,
        ));
    }
    Ok(Expr::cast(operand, target))
}
