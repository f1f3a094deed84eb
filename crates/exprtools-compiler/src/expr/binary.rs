//! Binary operator compilation.
//!
//! Both operands are coerced toward each other's type before the node is
//! built (see [`conversion::coerce_operand`]). The operator is then checked
//! against the coerced operand types.

use exprtools_core::{BinaryOp, DataType, Expr, ExprError, Span, well_known};
use exprtools_parser::ast::{self, BinaryExpr};

use super::{BuildContext, ExprBuilder, Result};
use crate::conversion;

/// Compile a binary expression.
pub fn compile_binary(
    builder: &ExprBuilder<'_>,
    expr: &BinaryExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Expr> {
    let (left, left_type) = builder.build_operand(expr.left, ctx)?;
    let (right, right_type) = builder.build_operand(expr.right, ctx)?;

    let host = builder.host();
    let left = conversion::coerce_operand(host, left, &right_type);
    let right = conversion::coerce_operand(host, right, &left_type);

    let (Some(lt), Some(rt)) = (left.data_type(), right.data_type()) else {
        return Err(ExprError::argument_shape("operand has no type", expr.span));
    };
    let op = typed_operator(builder, expr.op, lt, rt, expr.span)?;
    Ok(Expr::binary(op, left, right))
}

fn typed_operator(
    builder: &ExprBuilder<'_>,
    op: ast::BinaryOp,
    left: &DataType,
    right: &DataType,
    span: Span,
) -> Result<BinaryOp> {
    let mismatch = || {
        ExprError::argument_shape(
            format!("operator '{op}' cannot be applied to {left} and {right}"),
            span,
        )
    };
    let same = left == right;

    let typed = match op {
        ast::BinaryOp::LogicalOr | ast::BinaryOp::LogicalAnd => {
            if !(left.is_bool() && right.is_bool()) {
                return Err(mismatch());
            }
            if op == ast::BinaryOp::LogicalOr {
                BinaryOp::OrElse
            } else {
                BinaryOp::AndAlso
            }
        }
        ast::BinaryOp::Xor => {
            if left.is_bool() && right.is_bool() {
                BinaryOp::ExclusiveOr
            } else if same && is_arithmetic(left) {
                BinaryOp::Power
            } else {
                return Err(mismatch());
            }
        }
        ast::BinaryOp::Add
        | ast::BinaryOp::Sub
        | ast::BinaryOp::Mul
        | ast::BinaryOp::Div
        | ast::BinaryOp::Mod => {
            let concat = op == ast::BinaryOp::Add && left.is_string();
            if !same || !(concat || is_arithmetic(left)) {
                return Err(mismatch());
            }
            match op {
                ast::BinaryOp::Add => BinaryOp::Add,
                ast::BinaryOp::Sub => BinaryOp::Subtract,
                ast::BinaryOp::Mul => BinaryOp::Multiply,
                ast::BinaryOp::Div => BinaryOp::Divide,
                _ => BinaryOp::Modulo,
            }
        }
        ast::BinaryOp::Less
        | ast::BinaryOp::LessEqual
        | ast::BinaryOp::Greater
        | ast::BinaryOp::GreaterEqual => {
            if !same || !is_ordered(left) {
                return Err(mismatch());
            }
            match op {
                ast::BinaryOp::Less => BinaryOp::LessThan,
                ast::BinaryOp::LessEqual => BinaryOp::LessThanOrEqual,
                ast::BinaryOp::Greater => BinaryOp::GreaterThan,
                _ => BinaryOp::GreaterThanOrEqual,
            }
        }
        ast::BinaryOp::Equal | ast::BinaryOp::NotEqual => {
            let host = builder.host();
            if !(same || host.is_assignable(left, right) || host.is_assignable(right, left)) {
                return Err(mismatch());
            }
            if op == ast::BinaryOp::Equal {
                BinaryOp::Equal
            } else {
                BinaryOp::NotEqual
            }
        }
    };
    Ok(typed)
}

/// Numeric, or nullable numeric through lifting.
fn is_arithmetic(ty: &DataType) -> bool {
    ty.underlying().is_numeric()
}

fn is_ordered(ty: &DataType) -> bool {
    let ty = ty.underlying();
    ty.is_numeric()
        || ty.is_primitive(exprtools_core::PrimitiveKind::Char)
        || ty.is_named(well_known::DATE_TIME)
        || ty.is_named(well_known::DATE_TIME_OFFSET)
        || ty.is_named(well_known::TIME_SPAN)
}
