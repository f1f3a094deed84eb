//! Invocation compilation and overload selection.
//!
//! Arguments are built first so the callee can be resolved against their
//! types. The callee comes back as a [`Callee`]; each argument is then
//! converted to the declared parameter type.

use exprtools_core::{DataType, Expr, ExprError, HostTypeSystem, MethodSignature};
use exprtools_parser::ast::{self, CallExpr};
use tracing::trace;

use super::{BuildContext, CallSite, Callee, ExprBuilder, Resolved, Result, new, types};
use crate::conversion;

/// Compile `callee(args)`.
pub fn compile_call(
    builder: &ExprBuilder<'_>,
    call: &CallExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Expr> {
    let (args, arg_types) = new::build_args(builder, call.args, ctx)?;
    let type_args = match call.callee.unparenthesized() {
        ast::Expr::Ident(ident) => types::resolve_type_args(builder, ident.type_args)?,
        ast::Expr::Member(member) => types::resolve_type_args(builder, member.type_args)?,
        _ => Vec::new(),
    };
    let site = CallSite {
        arg_types,
        type_args,
    };

    let callee = match builder.resolve(call.callee, ctx.callee(&site))? {
        Resolved::Method(callee) => callee,
        Resolved::Unresolved { name, span } => {
            return Err(ExprError::UnresolvedIdentifier { name, span });
        }
        Resolved::Value(value) => {
            let ty = value
                .data_type()
                .map_or_else(|| "lambda".to_string(), ToString::to_string);
            return Err(ExprError::argument_shape(
                format!("a value of type {ty} cannot be invoked"),
                call.callee.span(),
            ));
        }
        Resolved::Type(ty) => {
            return Err(ExprError::argument_shape(
                format!("type {ty} cannot be invoked; use 'new'"),
                call.callee.span(),
            ));
        }
    };

    let Callee {
        target,
        method,
        receiver_arg,
    } = callee;
    let args: Vec<Expr> = receiver_arg.into_iter().chain(args).collect();
    if args.len() != method.params.len() {
        return Err(ExprError::argument_shape(
            format!(
                "method '{}' takes {} arguments but {} were given",
                method.name,
                method.params.len(),
                args.len()
            ),
            call.span,
        ));
    }
    let args = args
        .into_iter()
        .zip(&method.params)
        .map(|(arg, param)| conversion::convert_argument(arg, param))
        .collect();
    Ok(Expr::call(target, method, args))
}

/// Pick the overload for `arg_types`: an exact match first, else the only
/// candidate whose parameters all accept the arguments.
///
/// Explicit `type_args` instantiate generic definitions of the same arity;
/// without them generic definitions are skipped.
pub fn select_overload(
    host: &dyn HostTypeSystem,
    candidates: Vec<MethodSignature>,
    arg_types: &[DataType],
    type_args: &[DataType],
) -> Option<MethodSignature> {
    let candidates: Vec<MethodSignature> = candidates
        .into_iter()
        .filter_map(|m| bind_generics(m, type_args))
        .filter(|m| m.params.len() == arg_types.len())
        .collect();

    if let Some(exact) = candidates.iter().find(|m| m.params == arg_types) {
        return Some(exact.clone());
    }

    let mut assignable = candidates.into_iter().filter(|m| {
        m.params
            .iter()
            .zip(arg_types)
            .all(|(param, arg)| host.is_assignable(param, arg))
    });
    let first = assignable.next()?;
    if assignable.next().is_some() {
        trace!(method = %first.name, "ambiguous overloads");
        return None;
    }
    Some(first)
}

fn bind_generics(method: MethodSignature, type_args: &[DataType]) -> Option<MethodSignature> {
    if type_args.is_empty() {
        return (!method.is_generic_definition()).then_some(method);
    }
    if method.is_generic_definition() && usize::from(method.generic_arity) == type_args.len() {
        return Some(method.instantiate(type_args));
    }
    None
}

/// Resolve `receiver.name(args)` against the host's sequence operations,
/// with the receiver as first argument.
pub fn select_sequence_op(
    host: &dyn HostTypeSystem,
    receiver: &DataType,
    element: &DataType,
    name: &str,
    site: &CallSite,
) -> Option<MethodSignature> {
    let ops = host.sequence_ops_type()?;
    let candidates: Vec<MethodSignature> = host
        .get_methods(&ops, name)
        .into_iter()
        .filter(MethodSignature::is_sequence_op)
        .map(|m| {
            if m.is_generic_definition() && site.type_args.is_empty() {
                m.instantiate(std::slice::from_ref(element))
            } else {
                m
            }
        })
        .collect();

    let mut arg_types = Vec::with_capacity(site.arg_types.len() + 1);
    arg_types.push(receiver.clone());
    arg_types.extend(site.arg_types.iter().cloned());
    let method = select_overload(host, candidates, &arg_types, &site.type_args)?;
    trace!(name, element = %element, "bound sequence operation");
    Some(method)
}

/// `Int32, String` for error messages.
pub fn describe(types: &[DataType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use exprtools_core::Value;

    #[test]
    fn test_static_call_exact() {
        let lambda = build("(a, b) => Math.Pow(a, b)", DataType::double()).unwrap();
        match &*lambda.body {
            Expr::Call(call) => {
                assert!(call.target.is_none());
                assert_eq!(call.method.name, "Pow");
                assert_eq!(call.method.declaring_type, Some(DataType::named("System.Math")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_static_call_widens_arguments() {
        let lambda = build("x => Math.Max(x, 1)", DataType::double()).unwrap();
        match &*lambda.body {
            Expr::Call(call) => {
                assert_eq!(call.args[1], Expr::constant(Value::double(1.0), DataType::double()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_instance_call() {
        let lambda = build(
            "p => p.ToUpper(CultureInfo.InvariantCulture)",
            DataType::string(),
        )
        .unwrap();
        match &*lambda.body {
            Expr::Call(call) => {
                assert!(call.target.is_some());
                assert!(matches!(call.args[0], Expr::Member(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_sequence_operation_on_array() {
        let ints = DataType::array_of(DataType::int32());
        let lambda = build("xs => xs.Count()", ints.clone()).unwrap();
        match &*lambda.body {
            Expr::Call(call) => {
                assert!(call.target.is_none());
                assert!(call.method.is_sequence_op());
                assert_eq!(call.method.generic_args, vec![DataType::int32()]);
                assert_eq!(call.args, vec![Expr::parameter("xs", ints.clone())]);
            }
            other => panic!("unexpected {other:?}"),
        }

        let lambda = build("xs => xs.Sum()", ints.clone()).unwrap();
        assert_eq!(lambda.return_type(), Some(&DataType::int32()));

        let lambda = build("xs => xs.Contains(3)", ints).unwrap();
        assert_eq!(lambda.return_type(), Some(&DataType::bool()));
    }

    #[test]
    fn test_no_matching_overload() {
        let err = build("s => Math.Pow(s, s)", DataType::string()).unwrap_err();
        assert!(err.is_argument_shape());
        let err = build("s => s.Frobnicate()", DataType::string()).unwrap_err();
        assert!(err.is_argument_shape());
    }

    #[test]
    fn test_lambda_argument_rejected() {
        let ints = DataType::array_of(DataType::int32());
        let err = build("xs => xs.Any(x => x > 1)", ints).unwrap_err();
        assert!(err.is_argument_shape());
    }

    #[test]
    fn test_overload_selection() {
        let host = registry();
        let int = DataType::int32;
        let candidates = vec![
            MethodSignature::new("F", vec![DataType::int64()], int()),
            MethodSignature::new("F", vec![DataType::double()], int()),
            MethodSignature::new("F", vec![int()], int()),
        ];
        let exact = select_overload(&host, candidates.clone(), &[int()], &[]).unwrap();
        assert_eq!(exact.params, vec![int()]);

        // int widens to both long and double
        let ambiguous = select_overload(&host, candidates[..2].to_vec(), &[int()], &[]);
        assert!(ambiguous.is_none());

        let single =
            select_overload(&host, candidates[1..2].to_vec(), &[DataType::single()], &[]).unwrap();
        assert_eq!(single.params, vec![DataType::double()]);
    }
}
