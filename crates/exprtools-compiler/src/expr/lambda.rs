//! Lambda compilation.
//!
//! A lambda opens a parameter scope on top of the enclosing one. Nested
//! lambdas see every outer parameter; a name may not be declared twice in
//! the same chain of scopes.

use exprtools_core::{DataType, ExprError, LambdaExpr, ParameterExpr};
use exprtools_parser::ast;

use super::{BuildContext, ExprBuilder, LambdaShape, Result};
use crate::conversion;

/// Compile a lambda, optionally against an expected shape.
pub fn compile_lambda(
    builder: &ExprBuilder<'_>,
    syntax: &ast::LambdaExpr<'_>,
    ctx: BuildContext<'_>,
    shape: Option<&LambdaShape>,
) -> Result<LambdaExpr> {
    if let Some(shape) = shape {
        if shape.params.len() != syntax.params.len() {
            return Err(ExprError::argument_shape(
                format!(
                    "lambda declares {} parameters but {} are expected",
                    syntax.params.len(),
                    shape.params.len()
                ),
                syntax.span,
            ));
        }
    }

    let mut scope: Vec<ParameterExpr> = ctx.params().to_vec();
    let mut params = Vec::with_capacity(syntax.params.len());
    for (position, param) in syntax.params.iter().enumerate() {
        let name = param.name.name;
        if scope.iter().any(|p| p.name == name) {
            return Err(ExprError::argument_shape(
                format!("parameter '{name}' is declared more than once"),
                param.span,
            ));
        }
        let expected = shape.map(|s| &s.params[position]);
        let ty = parameter_type(builder, param, expected)?;
        let param = ParameterExpr::new(name, ty);
        scope.push(param.clone());
        params.push(param);
    }

    let body_ctx = BuildContext::new(&scope);
    let mut body = builder.build_value(syntax.body, body_ctx)?;

    if let Some(expected) = shape.and_then(|s| s.return_type.as_ref()) {
        body = match body.data_type() {
            Some(actual) if actual == expected => body,
            Some(actual) if builder.host().is_assignable(expected, actual) => {
                conversion::convert(body, expected)
            }
            actual => {
                return Err(ExprError::argument_shape(
                    format!(
                        "lambda returns {} but {expected} is expected",
                        actual.map_or_else(|| "a lambda".to_string(), ToString::to_string)
                    ),
                    syntax.body.span(),
                ));
            }
        };
    }

    Ok(LambdaExpr::new(params, body))
}

/// Annotation, then the expected shape, then the parameter type resolver.
fn parameter_type(
    builder: &ExprBuilder<'_>,
    param: &ast::LambdaParam<'_>,
    expected: Option<&DataType>,
) -> Result<DataType> {
    let name = param.name.name;
    if let Some(annotation) = &param.ty {
        let ty = builder.resolve_type_expr(annotation)?;
        if let Some(expected) = expected {
            if expected != &ty {
                return Err(ExprError::argument_shape(
                    format!("parameter '{name}' is declared {ty} but {expected} is expected"),
                    param.span,
                ));
            }
        }
        return Ok(ty);
    }
    if let Some(expected) = expected {
        return Ok(expected.clone());
    }
    builder
        .resolve_parameter_type(name)
        .ok_or_else(|| ExprError::UnresolvedType {
            name: format!("type of parameter '{name}'"),
            span: param.span,
        })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use bumpalo::Bump;
    use exprtools_core::{Expr, NamespaceConfig};
    use exprtools_parser::Parser;

    fn build_shaped(source: &str, shape: &LambdaShape) -> Result<LambdaExpr> {
        let registry = registry();
        let namespaces = NamespaceConfig::system();
        let builder = ExprBuilder::new(&registry, &namespaces);
        let arena = Bump::new();
        let syntax = Parser::parse_lambda(source, &arena)?;
        builder.build_with_shape(syntax, shape)
    }

    #[test]
    fn test_annotations_win() {
        let lambda = build("(int a, double b) => a", DataType::string()).unwrap();
        assert_eq!(lambda.param_types(), vec![DataType::int32(), DataType::double()]);
    }

    #[test]
    fn test_missing_parameter_type() {
        let registry = registry();
        let namespaces = NamespaceConfig::system();
        let builder = ExprBuilder::new(&registry, &namespaces);
        let arena = Bump::new();
        let syntax = Parser::parse_lambda("x => x", &arena).unwrap();
        assert!(builder.build(syntax).unwrap_err().is_unresolved_type());
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = build("(a, a) => a", DataType::int32()).unwrap_err();
        assert!(err.is_argument_shape());
    }

    #[test]
    fn test_nested_lambda_sees_outer_parameters() {
        let lambda = build("x => y => x + y", DataType::int32()).unwrap();
        let inner = lambda.body.as_lambda().unwrap();
        assert_eq!(inner.params.len(), 1);
        assert!(inner.body.references_parameter("x"));
        assert_eq!(lambda.return_type(), None);

        let err = build("x => x => x", DataType::int32()).unwrap_err();
        assert!(err.is_argument_shape());
    }

    #[test]
    fn test_shape_supplies_types_and_converts_return() {
        let shape = LambdaShape::new(vec![DataType::int32()]).returning(DataType::double());
        let lambda = build_shaped("x => x * 2", &shape).unwrap();
        assert_eq!(lambda.param_types(), vec![DataType::int32()]);
        assert!(matches!(*lambda.body, Expr::Cast(_)));
        assert_eq!(lambda.return_type(), Some(&DataType::double()));
    }

    #[test]
    fn test_shape_mismatches() {
        let shape = LambdaShape::new(vec![DataType::int32()]).returning(DataType::bool());
        assert!(build_shaped("(a, b) => a", &shape).unwrap_err().is_argument_shape());
        assert!(build_shaped("x => x + 1", &shape).unwrap_err().is_argument_shape());
        assert!(build_shaped("(double x) => x > 1", &shape).unwrap_err().is_argument_shape());
        assert!(build_shaped("x => x > 1", &shape).is_ok());
    }
}
