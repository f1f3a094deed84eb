//! Object and array creation.

use exprtools_core::{DataType, Expr, ExprError};
use exprtools_parser::ast::{self, Argument, NewArrayExpr, NewExpr};

use super::{BuildContext, ExprBuilder, Result, calls};
use crate::conversion;

/// Compile `new T(args)` through the host constructor matching the argument
/// types.
pub fn compile_new(
    builder: &ExprBuilder<'_>,
    expr: &NewExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Expr> {
    let ty = builder.resolve_type_expr(&expr.ty)?;
    let (args, arg_types) = build_args(builder, expr.args, ctx)?;
    let constructor = builder
        .host()
        .get_constructor(&ty, &arg_types)
        .ok_or_else(|| {
            ExprError::argument_shape(
                format!(
                    "no constructor of {ty} accepts ({})",
                    calls::describe(&arg_types)
                ),
                expr.span,
            )
        })?;
    let args = args
        .into_iter()
        .zip(&constructor.params)
        .map(|(arg, param)| conversion::convert_argument(arg, param))
        .collect();
    Ok(Expr::new_object(constructor, args))
}

/// Compile `new T[] { ... }` or `new[] { ... }`.
///
/// Items are widened toward a declared element type, so `new double[] { 1 }`
/// holds a double constant. Without a declaration every item must have the
/// type of the first.
pub fn compile_new_array(
    builder: &ExprBuilder<'_>,
    expr: &NewArrayExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Expr> {
    let declared = expr
        .element_type
        .as_ref()
        .map(|ty| builder.resolve_type_expr(ty))
        .transpose()?;

    let mut items = Vec::with_capacity(expr.items.len());
    let mut element: Option<DataType> = declared.clone();
    for item in expr.items {
        let (value, ty) = builder.build_operand(item, ctx)?;
        let (value, ty) = match &declared {
            Some(expected) if expected != &ty => {
                let value = conversion::coerce_operand(builder.host(), value, expected);
                let ty = value.data_type().cloned().unwrap_or(ty);
                (value, ty)
            }
            _ => (value, ty),
        };
        match &element {
            Some(expected) if expected != &ty => {
                return Err(ExprError::argument_shape(
                    format!("array element of type {ty} does not match {expected}"),
                    item.span(),
                ));
            }
            Some(_) => {}
            None => element = Some(ty),
        }
        items.push(value);
    }

    let element = element.ok_or_else(|| {
        ExprError::argument_shape("cannot infer the element type of an empty array", expr.span)
    })?;
    Ok(Expr::new_array(element, items))
}

pub(super) fn build_args(
    builder: &ExprBuilder<'_>,
    args: &[Argument<'_>],
    ctx: BuildContext<'_>,
) -> Result<(Vec<Expr>, Vec<DataType>)> {
    let mut values = Vec::with_capacity(args.len());
    let mut types = Vec::with_capacity(args.len());
    for arg in args {
        if matches!(arg.value.unparenthesized(), ast::Expr::Lambda(_)) {
            return Err(ExprError::argument_shape(
                "lambda arguments are not supported",
                arg.span,
            ));
        }
        let (value, ty) = builder.build_operand(arg.value, ctx)?;
        values.push(value);
        types.push(ty);
    }
    Ok((values, types))
}
