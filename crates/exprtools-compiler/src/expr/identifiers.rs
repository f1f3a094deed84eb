//! Identifier resolution.
//!
//! Order: lambda parameter, then method (callee position only), then type
//! name. Anything else stays unresolved for an enclosing member access to
//! complete.

use exprtools_core::Expr;
use exprtools_parser::ast::IdentExpr;
use tracing::trace;

use super::{BuildContext, Callee, ExprBuilder, Resolved, Result, types};

/// Compile a simple or generic name.
pub fn compile_ident(
    builder: &ExprBuilder<'_>,
    ident: &IdentExpr<'_>,
    ctx: BuildContext<'_>,
) -> Result<Resolved> {
    let name = ident.ident.name;

    if ident.type_args.is_empty() {
        if let Some(param) = ctx.parameter(name) {
            trace!(name, "identifier is a parameter");
            return Ok(Resolved::Value(Expr::Parameter(param.clone())));
        }
    }

    if let Some(site) = ctx.call() {
        if site.type_args.is_empty() {
            if let Some(method) = builder.resolve_method(name, &site.arg_types) {
                return Ok(Resolved::Method(Callee::new(None, method)));
            }
        }
        return Ok(Resolved::Unresolved {
            name: name.to_string(),
            span: ident.span,
        });
    }

    if !ident.type_args.is_empty() {
        let args = types::resolve_type_args(builder, ident.type_args)?;
        return types::resolve_generic(builder, name, args, ident.span).map(Resolved::Type);
    }

    if let Some(ty) = builder.resolve_type_name(name) {
        return Ok(Resolved::Type(ty));
    }

    trace!(name, "identifier left unresolved");
    Ok(Resolved::Unresolved {
        name: name.to_string(),
        span: ident.span,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use bumpalo::Bump;
    use exprtools_core::{DataType, Expr, MethodSignature, NamespaceConfig};
    use exprtools_parser::Parser;

    use crate::ExprBuilder;
    use crate::resolver::{SingleParameterTypeResolver, StaticMethodResolver};

    #[test]
    fn test_parameter_reference() {
        let lambda = build("s => s", DataType::string()).unwrap();
        assert_eq!(*lambda.body, Expr::parameter("s", DataType::string()));
    }

    #[test]
    fn test_free_method_via_resolver() {
        let registry = registry();
        let namespaces = NamespaceConfig::system();
        let params = SingleParameterTypeResolver::new(DataType::int32());
        let methods = StaticMethodResolver::new([MethodSignature::new(
            "M",
            vec![DataType::int32()],
            DataType::bool(),
        )
        .with_static()]);
        let builder = ExprBuilder::new(&registry, &namespaces)
            .with_parameter_types(&params)
            .with_methods(&methods);

        let arena = Bump::new();
        let syntax = Parser::parse_lambda("s => M(s)", &arena).unwrap();
        let lambda = builder.build(syntax).unwrap();
        match &*lambda.body {
            Expr::Call(call) => {
                assert!(call.target.is_none());
                assert_eq!(call.method.name, "M");
            }
            other => panic!("expected call, got {other:?}"),
        }

        let syntax = Parser::parse_lambda("s => N(s)", &arena).unwrap();
        assert!(builder.build(syntax).unwrap_err().is_unresolved_identifier());
    }

    #[test]
    fn test_parameter_shadows_type_names() {
        let lambda = build("Math => Math", DataType::int32()).unwrap();
        assert_eq!(lambda.return_type(), Some(&DataType::int32()));
    }
}
