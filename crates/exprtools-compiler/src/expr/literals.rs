//! Literal compilation.
//!
//! Integer literals take the first of `int`, `uint`, `long`, `ulong` that
//! holds the value, narrowed by any suffix. Real literals are `double`
//! unless suffixed `F`; `M` literals need a decimal type the host does not
//! have.

use exprtools_core::{DataType, Expr, ExprError, PrimitiveKind, Value};
use exprtools_parser::ast::{IntSuffix, LiteralExpr, LiteralKind, RealSuffix};

use super::Result;

/// Compile a literal to a typed constant.
pub fn compile_literal(lit: &LiteralExpr<'_>) -> Result<Expr> {
    Ok(match lit.kind {
        LiteralKind::Int { value, suffix } => int_literal(value, suffix),
        LiteralKind::Real { value, suffix } => match suffix {
            RealSuffix::None | RealSuffix::Double => Expr::constant(value, DataType::double()),
            RealSuffix::Float => Expr::constant(value as f32, DataType::single()),
            RealSuffix::Decimal => {
                return Err(ExprError::UnresolvedType {
                    name: "decimal".to_string(),
                    span: lit.span,
                });
            }
        },
        LiteralKind::String(text) => Expr::constant(text, DataType::string()),
        LiteralKind::Char(c) => Expr::constant(Value::Char(c), DataType::char()),
        LiteralKind::Bool(b) => Expr::constant(b, DataType::bool()),
        LiteralKind::Null => Expr::null(DataType::object()),
    })
}

fn int_literal(value: u64, suffix: IntSuffix) -> Expr {
    let signed = matches!(suffix, IntSuffix::None | IntSuffix::Long);
    let unsigned = matches!(suffix, IntSuffix::None | IntSuffix::Unsigned);
    let short = matches!(suffix, IntSuffix::None | IntSuffix::Unsigned);

    let (value, kind) = if short && signed && value <= i32::MAX as u64 {
        (Value::Int32(value as i32), PrimitiveKind::Int32)
    } else if short && unsigned && value <= u32::MAX as u64 {
        (Value::UInt32(value as u32), PrimitiveKind::UInt32)
    } else if signed && value <= i64::MAX as u64 {
        (Value::Int64(value as i64), PrimitiveKind::Int64)
    } else {
        (Value::UInt64(value), PrimitiveKind::UInt64)
    };
    Expr::constant(value, DataType::primitive(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_type(value: u64, suffix: IntSuffix) -> DataType {
        int_literal(value, suffix).data_type().cloned().unwrap()
    }

    #[test]
    fn test_integer_typing() {
        assert_eq!(int_type(10, IntSuffix::None), DataType::int32());
        assert_eq!(
            int_type(3_000_000_000, IntSuffix::None),
            DataType::primitive(PrimitiveKind::UInt32)
        );
        assert_eq!(int_type(5_000_000_000, IntSuffix::None), DataType::int64());
        assert_eq!(int_type(255, IntSuffix::Long), DataType::int64());
        assert_eq!(
            int_type(7, IntSuffix::Unsigned),
            DataType::primitive(PrimitiveKind::UInt32)
        );
        assert_eq!(
            int_type(7, IntSuffix::UnsignedLong),
            DataType::primitive(PrimitiveKind::UInt64)
        );
        assert_eq!(
            int_type(u64::MAX, IntSuffix::Long),
            DataType::primitive(PrimitiveKind::UInt64)
        );
    }

    #[test]
    fn test_other_literals() {
        let span = exprtools_core::Span::default();
        let lit = |kind| LiteralExpr { kind, span };
        assert_eq!(
            compile_literal(&lit(LiteralKind::Real {
                value: 1.5,
                suffix: RealSuffix::Float
            }))
            .unwrap(),
            Expr::constant(1.5f32, DataType::single())
        );
        assert_eq!(
            compile_literal(&lit(LiteralKind::Null)).unwrap(),
            Expr::null(DataType::object())
        );
        assert!(
            compile_literal(&lit(LiteralKind::Real {
                value: 1.0,
                suffix: RealSuffix::Decimal
            }))
            .unwrap_err()
            .is_unresolved_type()
        );
    }
}
