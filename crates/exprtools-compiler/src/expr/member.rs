//! Member access and element access compilation.
//!
//! A member access resolves its left side first:
//!
//! ```text
//! Unresolved  - extend the dotted name and retry it as a type
//! Value       - instance method, array Length, property, then field
//! Type        - static method, static property or field, then nested type
//! ```

use exprtools_core::{
    BinaryOp, DataType, Expr, ExprError, MemberInfo, MethodSignature, UnaryOp,
};
use exprtools_parser::ast::{IndexExpr, MemberExpr};
use tracing::trace;

use super::{BuildContext, Callee, ExprBuilder, Resolved, Result, calls, new, types};
use crate::conversion;

/// Compile `object.member`, possibly in callee position.
pub fn compile_member(
    builder: &ExprBuilder<'_>,
    access: &MemberExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Resolved> {
    match builder.resolve(access.object, ctx.value())? {
        Resolved::Unresolved { name, span } => {
            let dotted = format!("{name}.{}", access.member.name);
            let span = span.merge(access.member.span);
            if ctx.call().is_none() {
                if !access.type_args.is_empty() {
                    let args = types::resolve_type_args(builder, access.type_args)?;
                    return types::resolve_generic(builder, &dotted, args, span).map(Resolved::Type);
                }
                if let Some(ty) = builder.resolve_type_name(&dotted) {
                    return Ok(Resolved::Type(ty));
                }
            }
            trace!(name = %dotted, "qualified name left unresolved");
            Ok(Resolved::Unresolved { name: dotted, span })
        }
        Resolved::Value(target) => member_of_value(builder, target, access, ctx),
        Resolved::Type(ty) => member_of_type(builder, ty, access, ctx),
        Resolved::Method(callee) => Err(ExprError::argument_shape(
            format!("method '{}' must be invoked", callee.method.name),
            access.object.span(),
        )),
    }
}

fn unresolved_member(ty: &DataType, access: &MemberExpr<'_>) -> ExprError {
    ExprError::UnresolvedMember {
        member: access.member.name.to_string(),
        type_name: ty.to_string(),
        span: access.member.span,
    }
}

fn no_method(ty: &DataType, name: &str, arg_types: &[DataType], access: &MemberExpr<'_>) -> ExprError {
    ExprError::argument_shape(
        format!(
            "no method '{name}' on {ty} accepts ({})",
            calls::describe(arg_types)
        ),
        access.span,
    )
}

fn member_of_value(
    builder: &ExprBuilder<'_>,
    target: Expr,
    access: &MemberExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Resolved> {
    let host = builder.host();
    let name = access.member.name;
    let Some(ty) = target.data_type().cloned() else {
        return Err(ExprError::argument_shape(
            "a lambda has no members",
            access.object.span(),
        ));
    };

    if let Some(site) = ctx.call() {
        let candidates: Vec<MethodSignature> = host
            .get_methods(&ty, name)
            .into_iter()
            .filter(|m| !m.is_static())
            .collect();
        if let Some(method) =
            calls::select_overload(host, candidates, &site.arg_types, &site.type_args)
        {
            return Ok(Resolved::Method(Callee::new(Some(target), method)));
        }
        if let Some(element) = host.is_sequence_of(&ty) {
            if let Some(method) = calls::select_sequence_op(host, &ty, &element, name, site) {
                return Ok(Resolved::Method(Callee::sequence_op(target, method)));
            }
        }
        return Err(no_method(&ty, name, &site.arg_types, access));
    }

    if ty.is_array() && name == "Length" {
        return Ok(Resolved::Value(Expr::unary(UnaryOp::ArrayLength, target)));
    }
    match find_member(builder, &ty, name) {
        Some(member) if member.is_static() => Ok(Resolved::Value(Expr::member(None, member))),
        Some(member) => Ok(Resolved::Value(Expr::member(Some(target), member))),
        None => Err(unresolved_member(&ty, access)),
    }
}

fn member_of_type(
    builder: &ExprBuilder<'_>,
    ty: DataType,
    access: &MemberExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Resolved> {
    let host = builder.host();
    let name = access.member.name;

    if let Some(site) = ctx.call() {
        let candidates: Vec<MethodSignature> = host
            .get_methods(&ty, name)
            .into_iter()
            .filter(MethodSignature::is_static)
            .collect();
        return calls::select_overload(host, candidates, &site.arg_types, &site.type_args)
            .map(|method| Resolved::Method(Callee::new(None, method)))
            .ok_or_else(|| no_method(&ty, name, &site.arg_types, access));
    }

    if let Some(member) = find_member(builder, &ty, name) {
        if !member.is_static() {
            return Err(ExprError::argument_shape(
                format!("instance member '{member}' needs an instance"),
                access.span,
            ));
        }
        return Ok(Resolved::Value(Expr::member(None, member)));
    }
    if let Some(nested) = host.get_nested_type(&ty, name) {
        return Ok(Resolved::Type(nested));
    }
    Err(unresolved_member(&ty, access))
}

/// Property first, then field.
fn find_member(builder: &ExprBuilder<'_>, ty: &DataType, name: &str) -> Option<MemberInfo> {
    let host = builder.host();
    host.get_property(ty, name)
        .or_else(|| host.get_field(ty, name))
}

/// Compile `object[args]`.
///
/// Arrays take a single `Int32` index and build an ArrayIndex binary node.
/// Other types go through their `get_Item` indexer.
pub fn compile_index(
    builder: &ExprBuilder<'_>,
    expr: &IndexExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Expr> {
    let host = builder.host();
    let (target, ty) = builder.build_operand(expr.object, ctx)?;
    let (args, arg_types) = new::build_args(builder, expr.args, ctx)?;

    if ty.is_array() {
        let [index] = <[Expr; 1]>::try_from(args).map_err(|_| {
            ExprError::argument_shape("array access takes exactly one index", expr.span)
        })?;
        let int = DataType::int32();
        let index_type = &arg_types[0];
        if index_type != &int && !(index_type.is_numeric() && host.is_assignable(&int, index_type))
        {
            return Err(ExprError::argument_shape(
                format!("array index must be Int32, found {index_type}"),
                expr.span,
            ));
        }
        let index = conversion::convert(index, &int);
        return Ok(Expr::binary(BinaryOp::ArrayIndex, target, index));
    }

    let candidates: Vec<MethodSignature> = host
        .get_methods(&ty, "get_Item")
        .into_iter()
        .filter(|m| !m.is_static())
        .collect();
    let indexer = calls::select_overload(host, candidates, &arg_types, &[]).ok_or_else(|| {
        ExprError::argument_shape(
            format!("{ty} has no indexer taking ({})", calls::describe(&arg_types)),
            expr.span,
        )
    })?;
    let args = args
        .into_iter()
        .zip(&indexer.params)
        .map(|(arg, param)| conversion::convert_argument(arg, param))
        .collect();
    Ok(Expr::index(target, indexer, args))
}
