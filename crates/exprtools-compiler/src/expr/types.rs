//! Type expressions: annotations, cast targets, generic arguments.

use exprtools_core::{DataType, ExprError, PrimitiveKind, Span, well_known};
use exprtools_parser::ast::{Ident, TypeExpr};

use super::{ExprBuilder, Result};

/// A predefined type keyword. `decimal` has no host type and fails.
pub fn resolve_keyword(keyword: &Ident<'_>) -> Result<DataType> {
    PrimitiveKind::from_keyword(keyword.name)
        .map(DataType::primitive)
        .ok_or_else(|| ExprError::UnresolvedType {
            name: keyword.name.to_string(),
            span: keyword.span,
        })
}

pub fn resolve_type_expr(builder: &ExprBuilder<'_>, ty: &TypeExpr<'_>) -> Result<DataType> {
    match ty {
        TypeExpr::Predefined(keyword) => resolve_keyword(keyword),
        TypeExpr::Named(named) => {
            let name = named.dotted_name();
            let args = named.type_args();
            if args.is_empty() {
                builder
                    .resolve_type_name(&name)
                    .ok_or(ExprError::UnresolvedType {
                        name,
                        span: named.span,
                    })
            } else {
                let args = resolve_type_args(builder, args)?;
                resolve_generic(builder, &name, args, named.span)
            }
        }
        TypeExpr::Array(array) => Ok(DataType::array_of(resolve_type_expr(
            builder,
            &array.element,
        )?)),
        TypeExpr::Nullable(nullable) => {
            Ok(resolve_type_expr(builder, &nullable.inner)?.as_nullable())
        }
    }
}

pub fn resolve_type_args(
    builder: &ExprBuilder<'_>,
    args: &[TypeExpr<'_>],
) -> Result<Vec<DataType>> {
    args.iter().map(|arg| resolve_type_expr(builder, arg)).collect()
}

/// Resolve `name<args>` through the definition `name`N`.
///
/// `Nullable<T>` becomes the nullable flag on `T`.
pub fn resolve_generic(
    builder: &ExprBuilder<'_>,
    name: &str,
    args: Vec<DataType>,
    span: Span,
) -> Result<DataType> {
    let definition = format!("{name}`{}", args.len());
    let ty = builder
        .resolve_type_name(&definition)
        .ok_or_else(|| ExprError::UnresolvedType {
            name: definition.clone(),
            span,
        })?;
    if ty.is_named(well_known::NULLABLE) {
        if let [inner] = args.as_slice() {
            return Ok(inner.as_nullable());
        }
    }
    Ok(ty.substitute(&args))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use exprtools_core::DataType;

    #[test]
    fn test_annotation_forms() {
        let lambda = build(
            "(int? a, string[] b, System.Collections.Generic.List<double> c, Nullable<Guid> d) => a",
            DataType::object(),
        )
        .unwrap();
        assert_eq!(
            lambda.param_types(),
            vec![
                DataType::int32().as_nullable(),
                DataType::array_of(DataType::string()),
                DataType::generic("System.Collections.Generic.List`1", vec![DataType::double()]),
                DataType::guid().as_nullable(),
            ]
        );
    }

    #[test]
    fn test_keyword_mapping() {
        let lambda = build("(uint a, ulong b, float c) => a", DataType::object()).unwrap();
        assert_eq!(
            lambda.param_types(),
            vec![DataType::int32(), DataType::int64(), DataType::single()]
        );
        assert!(build("(decimal m) => m", DataType::object()).unwrap_err().is_unresolved_type());
    }

    #[test]
    fn test_unknown_type() {
        let err = build("(Widget w) => w", DataType::object()).unwrap_err();
        assert!(err.is_unresolved_type());
    }
}
