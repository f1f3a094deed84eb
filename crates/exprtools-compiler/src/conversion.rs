//! Implicit and explicit conversions applied while building.
//!
//! ## Conversion Kinds
//!
//! ```text
//! Identity      - same type, operand kept as is
//! Null retype   - a null literal takes the type it is compared or passed as
//! Literal       - a numeric literal is re-emitted as a constant of the target
//! Cast          - anything else is wrapped in a Cast node
//! ```
//!
//! Binary operands go through [`coerce_operand`], call and constructor
//! arguments through [`convert_argument`], explicit `(T)x` syntax is checked
//! with [`can_cast`].

use exprtools_core::{ConstantExpr, DataType, Expr, HostTypeSystem, PrimitiveKind};

/// Whether `ty` can hold `null`.
pub fn admits_null(ty: &DataType) -> bool {
    ty.is_nullable() || !ty.is_value_type()
}

fn is_null_constant(expr: &Expr) -> bool {
    expr.as_constant().is_some_and(|c| c.value.is_null())
}

fn retype_constant(constant: &ConstantExpr, target: &DataType) -> Option<Expr> {
    if constant.value.is_null() {
        return admits_null(target).then(|| Expr::null(target.clone()));
    }
    let source = constant.data_type.primitive_kind()?;
    let kind = target.primitive_kind()?;
    if !source.is_numeric() || !kind.is_numeric() {
        return None;
    }
    let value = constant.value.convert_to(kind)?;
    Some(Expr::constant(value, target.clone()))
}

/// Convert `expr` to `target`: identity, constant retyping, else a Cast.
pub fn convert(expr: Expr, target: &DataType) -> Expr {
    match expr.data_type() {
        None => return expr,
        Some(ty) if ty == target => return expr,
        Some(_) => {}
    }
    if let Some(retyped) = expr.as_constant().and_then(|c| retype_constant(c, target)) {
        return retyped;
    }
    Expr::cast(expr, target.clone())
}

/// Coerce one binary operand toward the type of the other.
///
/// The operand is kept when the types already match, when it is nullable,
/// when the target is `object`, or when the target cannot receive it
/// implicitly. The last rule keeps `double` and `float` operands from being
/// narrowed. A null literal facing a type that admits null is retyped.
pub fn coerce_operand(host: &dyn HostTypeSystem, operand: Expr, target: &DataType) -> Expr {
    let Some(source) = operand.data_type() else {
        return operand;
    };
    if source == target || target.is_primitive(PrimitiveKind::Object) {
        return operand;
    }
    if is_null_constant(&operand) {
        return if admits_null(target) {
            Expr::null(target.clone())
        } else {
            operand
        };
    }
    if source.is_nullable() || !host.is_assignable(target, source) {
        return operand;
    }
    convert(operand, target)
}

/// Convert a call or constructor argument to its parameter type.
///
/// Value-typed parameters get numeric widening and nullable lifting.
/// Reference-typed parameters take the argument unchanged, apart from null
/// literals which adopt the parameter type.
pub fn convert_argument(arg: Expr, param: &DataType) -> Expr {
    match arg.data_type() {
        None => arg,
        Some(ty) if ty == param => arg,
        Some(_) if is_null_constant(&arg) => {
            if admits_null(param) {
                Expr::null(param.clone())
            } else {
                arg
            }
        }
        Some(_) if param.is_value_type() => convert(arg, param),
        Some(_) => arg,
    }
}

/// Whether an explicit `(to)from` cast is allowed.
pub fn can_cast(host: &dyn HostTypeSystem, from: &DataType, to: &DataType) -> bool {
    if host.is_assignable(to, from) || host.is_assignable(from, to) {
        return true;
    }
    let scalar = |ty: &DataType| {
        ty.primitive_kind()
            .is_some_and(|k| k.is_numeric() || k == PrimitiveKind::Char)
    };
    scalar(from) && scalar(to)
}
