//! Tree-walking evaluator.
//!
//! Interprets a built [`LambdaExpr`] against argument values. Arithmetic
//! follows the type the builder gave each node: integral nodes wrap and
//! truncate, floating nodes use `f64` and narrow back to their kind. Member
//! reads, method calls, indexers and constructors go through the native
//! functions the host registered with each [`MemberInfo`],
//! [`MethodSignature`] and [`ConstructorInfo`].
//!
//! [`MemberInfo`]: exprtools_core::MemberInfo
//! [`MethodSignature`]: exprtools_core::MethodSignature
//! [`ConstructorInfo`]: exprtools_core::ConstructorInfo
//!
//! # Example
//!
//! ```
//! use exprtools::{Context, Value};
//!
//! let ctx = Context::with_default_modules().unwrap();
//! let lambda = ctx.parse("(int x) => (x + 1) * 2").unwrap();
//! assert_eq!(exprtools::evaluate(&lambda, &[Value::Int32(1)]).unwrap(), Value::Int32(4));
//! ```

use std::cmp::Ordering;

use exprtools_core::{
    BinaryExpr, BinaryOp, DataType, EvalError, Expr, LambdaExpr, PrimitiveKind, UnaryExpr,
    UnaryOp, Value,
};
use tracing::debug;

type Result<T> = std::result::Result<T, EvalError>;

/// Evaluate `lambda` with one argument per parameter.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn evaluate(lambda: &LambdaExpr, args: &[Value]) -> Result<Value> {
    debug!(params = lambda.arity(), args = args.len(), "evaluating lambda");
    Evaluator::new().call(lambda, args)
}

/// Evaluation state: the parameter bindings of the lambdas being applied.
#[derive(Debug, Default)]
pub struct Evaluator {
    bindings: Vec<(String, Value)>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `lambda` to `args`.
    pub fn call(&mut self, lambda: &LambdaExpr, args: &[Value]) -> Result<Value> {
        if lambda.arity() != args.len() {
            return Err(EvalError::ArgumentCount {
                expected: lambda.arity(),
                got: args.len(),
            });
        }
        let mark = self.bindings.len();
        self.bindings.extend(
            lambda
                .params
                .iter()
                .zip(args)
                .map(|(param, value)| (param.name.clone(), value.clone())),
        );
        let result = self.eval(&lambda.body);
        self.bindings.truncate(mark);
        result
    }

    /// Evaluate a single node.
    pub fn eval(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Lambda(_) => Err(EvalError::Unsupported("a nested lambda".to_string())),
            Expr::Parameter(param) => self
                .bindings
                .iter()
                .rev()
                .find(|(name, _)| *name == param.name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| EvalError::UnboundParameter(param.name.clone())),
            Expr::Constant(constant) => Ok(constant.value.clone()),
            Expr::Member(member) => {
                let target = match member.target.as_deref() {
                    Some(target) => Some(self.eval(target)?),
                    None => None,
                };
                member.member.get(target)
            }
            Expr::Call(call) => {
                let this = match call.target.as_deref() {
                    Some(target) => {
                        let this = self.eval(target)?;
                        if this.is_null() && !target_is_nullable(target) {
                            return Err(EvalError::NullReference {
                                context: call.method.name.clone(),
                            });
                        }
                        Some(this)
                    }
                    None => None,
                };
                let args = self.eval_all(&call.args)?;
                call.method.invoke(this, args)
            }
            Expr::Binary(binary) => self.eval_binary(binary),
            Expr::Unary(unary) => self.eval_unary(unary),
            Expr::Conditional(cond) => {
                if expect_bool(self.eval(&cond.test)?)? {
                    self.eval(&cond.if_true)
                } else {
                    self.eval(&cond.if_false)
                }
            }
            Expr::New(new) => {
                let args = self.eval_all(&new.args)?;
                new.constructor.invoke(args)
            }
            Expr::NewArray(array) => Ok(Value::array(self.eval_all(&array.items)?)),
            Expr::Cast(cast) => cast_value(self.eval(&cast.operand)?, &cast.data_type),
            Expr::Index(index) => {
                let target = self.eval(&index.target)?;
                if target.is_null() {
                    return Err(EvalError::NullReference {
                        context: index.indexer.name.clone(),
                    });
                }
                let args = self.eval_all(&index.args)?;
                index.indexer.invoke(Some(target), args)
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>> {
        exprs.iter().map(|e| self.eval(e)).collect()
    }

    fn eval_binary(&mut self, binary: &BinaryExpr) -> Result<Value> {
        match binary.op {
            BinaryOp::AndAlso => {
                if !expect_bool(self.eval(&binary.left)?)? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(expect_bool(self.eval(&binary.right)?)?))
            }
            BinaryOp::OrElse => {
                if expect_bool(self.eval(&binary.left)?)? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(expect_bool(self.eval(&binary.right)?)?))
            }
            op => {
                let left = self.eval(&binary.left)?;
                let right = self.eval(&binary.right)?;
                apply_binary(op, &binary.data_type, left, right)
            }
        }
    }

    fn eval_unary(&mut self, unary: &UnaryExpr) -> Result<Value> {
        let operand = self.eval(&unary.operand)?;
        match unary.op {
            UnaryOp::UnaryPlus | UnaryOp::PostIncrement | UnaryOp::PostDecrement => Ok(operand),
            UnaryOp::Not => Ok(Value::Bool(!expect_bool(operand)?)),
            UnaryOp::ArrayLength => match operand {
                Value::Array(items) => Ok(Value::Int32(items.len() as i32)),
                Value::Null => Err(EvalError::NullReference {
                    context: "Length".to_string(),
                }),
                other => Err(EvalError::type_mismatch("Array", other.type_name())),
            },
            UnaryOp::Negate => {
                if operand.is_null() {
                    return Ok(Value::Null);
                }
                let kind = numeric_kind(&unary.data_type, &operand)?;
                if kind.is_floating() {
                    let v = as_f64(&operand)?;
                    narrow(Value::double(-v), kind)
                } else {
                    let v = as_i64(&operand)?;
                    narrow(Value::Int64(v.wrapping_neg()), kind)
                }
            }
        }
    }
}

fn target_is_nullable(target: &Expr) -> bool {
    target.data_type().is_some_and(DataType::is_nullable)
}

// ============================================================================
// Operators
// ============================================================================

/// Apply a non-short-circuit binary operator. `ty` is the node type.
fn apply_binary(op: BinaryOp, ty: &DataType, left: Value, right: Value) -> Result<Value> {
    match op {
        BinaryOp::Equal => Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOp::NotEqual => Ok(Value::Bool(!values_equal(&left, &right))),
        BinaryOp::GreaterThan
        | BinaryOp::GreaterThanOrEqual
        | BinaryOp::LessThan
        | BinaryOp::LessThanOrEqual => {
            if left.is_null() || right.is_null() {
                return Ok(Value::Bool(false));
            }
            let ordering = compare(&left, &right)?;
            Ok(Value::Bool(match op {
                BinaryOp::GreaterThan => ordering == Ordering::Greater,
                BinaryOp::GreaterThanOrEqual => ordering != Ordering::Less,
                BinaryOp::LessThan => ordering == Ordering::Less,
                _ => ordering != Ordering::Greater,
            }))
        }
        BinaryOp::ArrayIndex => {
            let items = match &left {
                Value::Array(items) => items,
                Value::Null => {
                    return Err(EvalError::NullReference {
                        context: "array index".to_string(),
                    });
                }
                other => return Err(EvalError::type_mismatch("Array", other.type_name())),
            };
            let index = as_i64(&right)?;
            usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or(EvalError::IndexOutOfRange {
                    index,
                    len: items.len(),
                })
        }
        BinaryOp::ExclusiveOr => match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a ^ b)),
            _ => {
                let kind = numeric_kind(ty, &left)?;
                narrow(Value::Int64(as_i64(&left)? ^ as_i64(&right)?), kind)
            }
        },
        BinaryOp::Add if ty.is_string() => Ok(Value::string(format!(
            "{}{}",
            display_or_empty(&left),
            display_or_empty(&right)
        ))),
        BinaryOp::Add
        | BinaryOp::Subtract
        | BinaryOp::Multiply
        | BinaryOp::Divide
        | BinaryOp::Modulo
        | BinaryOp::Power => arithmetic(op, ty, &left, &right),
        BinaryOp::AndAlso | BinaryOp::OrElse => Err(EvalError::Unsupported(format!(
            "'{}' without short-circuiting",
            op.symbol()
        ))),
    }
}

fn arithmetic(op: BinaryOp, ty: &DataType, left: &Value, right: &Value) -> Result<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    let kind = numeric_kind(ty, left)?;

    if kind.is_floating() || op == BinaryOp::Power {
        let (a, b) = (as_f64(left)?, as_f64(right)?);
        let result = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
            BinaryOp::Modulo => a % b,
            _ => a.powf(b),
        };
        return narrow(Value::double(result), kind);
    }

    let (a, b) = (as_i64(left)?, as_i64(right)?);
    let result = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Subtract => a.wrapping_sub(b),
        BinaryOp::Multiply => a.wrapping_mul(b),
        BinaryOp::Divide => {
            if b == 0 {
                return Err(EvalError::DivideByZero);
            }
            a.wrapping_div(b)
        }
        _ => {
            if b == 0 {
                return Err(EvalError::DivideByZero);
            }
            a.wrapping_rem(b)
        }
    };
    narrow(Value::Int64(result), kind)
}

/// Equality with `null` compares against [`Value::Null`]; numbers compare by
/// value across kinds.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ if is_number(left) && is_number(right) => compare(left, right) == Ok(Ordering::Equal),
        _ => left == right,
    }
}

fn compare(left: &Value, right: &Value) -> Result<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Ok(a.cmp(b)),
        (Value::TimeSpan(a), Value::TimeSpan(b)) => Ok(a.cmp(b)),
        (Value::DateTimeOffset(a), Value::DateTimeOffset(b)) => {
            // UTC instants, widened so extreme ticks cannot overflow.
            let utc = |ticks: i64, offset: i64| i128::from(ticks) - i128::from(offset);
            Ok(utc(a.ticks, a.offset.ticks).cmp(&utc(b.ticks, b.offset.ticks)))
        }
        _ if is_float(left) || is_float(right) => {
            let (a, b) = (as_f64(left)?, as_f64(right)?);
            Ok(a.total_cmp(&b))
        }
        _ => match (left, right) {
            (Value::UInt64(a), Value::UInt64(b)) => Ok(a.cmp(b)),
            _ => Ok(as_i64(left)?.cmp(&as_i64(right)?)),
        },
    }
}

// ============================================================================
// Casts
// ============================================================================

/// Explicit conversion to `ty`: numeric primitives convert, nullable targets
/// accept null and convert to their underlying type, anything else passes
/// through unchanged.
fn cast_value(value: Value, ty: &DataType) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let target = if ty.is_nullable() { ty.underlying() } else { ty.clone() };
    match target.primitive_kind() {
        Some(kind) if kind.is_numeric() || kind == PrimitiveKind::Char => {
            value.convert_to(kind).ok_or_else(|| {
                EvalError::type_mismatch(kind.host_name(), value.type_name())
            })
        }
        _ => Ok(value),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn expect_bool(value: Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| EvalError::type_mismatch("Boolean", value.type_name()))
}

fn as_i64(value: &Value) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| EvalError::type_mismatch("integer", value.type_name()))
}

fn as_f64(value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| EvalError::type_mismatch("number", value.type_name()))
}

fn is_float(value: &Value) -> bool {
    matches!(value, Value::Single(_) | Value::Double(_))
}

fn is_number(value: &Value) -> bool {
    value.as_f64().is_some()
}

/// The numeric kind an arithmetic node computes in: its own type, or the
/// operand's when the node type is not a numeric primitive.
fn numeric_kind(ty: &DataType, operand: &Value) -> Result<PrimitiveKind> {
    ty.underlying()
        .primitive_kind()
        .filter(|k| k.is_numeric())
        .or_else(|| operand.primitive_kind().filter(|k| k.is_numeric()))
        .ok_or_else(|| EvalError::type_mismatch("number", operand.type_name()))
}

fn narrow(value: Value, kind: PrimitiveKind) -> Result<Value> {
    value
        .convert_to(kind)
        .ok_or_else(|| EvalError::type_mismatch(kind.host_name(), value.type_name()))
}

fn display_or_empty(value: &Value) -> String {
    if value.is_null() {
        String::new()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprtools_core::ParameterExpr;

    fn int(v: i32) -> Expr {
        Expr::constant(v, DataType::int32())
    }

    fn double(v: f64) -> Expr {
        Expr::constant(v, DataType::double())
    }

    fn unary_lambda(name: &str, ty: DataType, body: impl FnOnce(Expr) -> Expr) -> LambdaExpr {
        let p = ParameterExpr::new(name, ty);
        let body = body(Expr::Parameter(p.clone()));
        LambdaExpr::new(vec![p], body)
    }

    #[test]
    fn test_integer_arithmetic_truncates() {
        let lambda = unary_lambda("x", DataType::int32(), |x| {
            Expr::binary(BinaryOp::Divide, x, int(2))
        });
        assert_eq!(evaluate(&lambda, &[Value::Int32(7)]).unwrap(), Value::Int32(3));
        assert_eq!(evaluate(&lambda, &[Value::Int32(-7)]).unwrap(), Value::Int32(-3));
    }

    #[test]
    fn test_integer_division_by_zero() {
        let lambda = unary_lambda("x", DataType::int32(), |x| {
            Expr::binary(BinaryOp::Modulo, int(1), x)
        });
        assert_eq!(evaluate(&lambda, &[Value::Int32(0)]), Err(EvalError::DivideByZero));
    }

    #[test]
    fn test_double_division_by_zero_is_infinite() {
        let lambda = unary_lambda("x", DataType::double(), |x| {
            Expr::binary(BinaryOp::Divide, double(1.0), x)
        });
        assert_eq!(
            evaluate(&lambda, &[Value::double(0.0)]).unwrap(),
            Value::double(f64::INFINITY)
        );
    }

    #[test]
    fn test_date_time_offset_compares_extreme_ticks() {
        use exprtools_core::time::{DateTimeOffset, TimeSpan};

        let at = |ticks: i64, offset: i64| {
            Value::DateTimeOffset(DateTimeOffset {
                ticks,
                offset: TimeSpan { ticks: offset },
            })
        };
        let earliest = at(i64::MIN, 36_000_000_000);
        let later = at(i64::MIN + 1, 0);
        assert_eq!(compare(&earliest, &later), Ok(Ordering::Less));
        assert_eq!(
            compare(&at(i64::MAX, -36_000_000_000), &at(i64::MAX, 0)),
            Ok(Ordering::Greater)
        );
        assert_eq!(
            compare(&at(36_000_000_000, 36_000_000_000), &at(0, 0)),
            Ok(Ordering::Equal)
        );
    }

    #[test]
    fn test_integer_power_casts_back() {
        let lambda = unary_lambda("x", DataType::int32(), |x| {
            Expr::binary(BinaryOp::Power, x, int(3))
        });
        assert_eq!(evaluate(&lambda, &[Value::Int32(2)]).unwrap(), Value::Int32(8));
    }

    #[test]
    fn test_short_circuit_skips_right() {
        // The right side would fail with an unbound parameter.
        let lambda = unary_lambda("b", DataType::bool(), |b| {
            Expr::binary(
                BinaryOp::OrElse,
                b,
                Expr::parameter("missing", DataType::bool()),
            )
        });
        assert_eq!(evaluate(&lambda, &[Value::Bool(true)]).unwrap(), Value::Bool(true));
        assert_eq!(
            evaluate(&lambda, &[Value::Bool(false)]),
            Err(EvalError::UnboundParameter("missing".into()))
        );
    }

    #[test]
    fn test_null_equality() {
        let ty = DataType::int32().as_nullable();
        let lambda = unary_lambda("d", ty.clone(), |d| {
            Expr::binary(BinaryOp::Equal, d, Expr::null(ty.clone()))
        });
        assert_eq!(evaluate(&lambda, &[Value::Null]).unwrap(), Value::Bool(true));
        assert_eq!(evaluate(&lambda, &[Value::Int32(1)]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_mixed_numeric_equality() {
        assert!(values_equal(&Value::Int32(2), &Value::double(2.0)));
        assert!(!values_equal(&Value::Int32(2), &Value::string("2")));
    }

    #[test]
    fn test_array_index_and_length() {
        let ty = DataType::array_of(DataType::int32());
        let items = Value::array(vec![Value::Int32(4), Value::Int32(5)]);

        let index = unary_lambda("a", ty.clone(), |a| Expr::binary(BinaryOp::ArrayIndex, a, int(1)));
        assert_eq!(evaluate(&index, &[items.clone()]).unwrap(), Value::Int32(5));

        let out_of_range =
            unary_lambda("a", ty.clone(), |a| Expr::binary(BinaryOp::ArrayIndex, a, int(2)));
        assert_eq!(
            evaluate(&out_of_range, &[items.clone()]),
            Err(EvalError::IndexOutOfRange { index: 2, len: 2 })
        );

        let length = unary_lambda("a", ty, |a| Expr::unary(UnaryOp::ArrayLength, a));
        assert_eq!(evaluate(&length, &[items]).unwrap(), Value::Int32(2));
    }

    #[test]
    fn test_casts() {
        let to_int = unary_lambda("x", DataType::double(), |x| Expr::cast(x, DataType::int32()));
        assert_eq!(evaluate(&to_int, &[Value::double(2.9)]).unwrap(), Value::Int32(2));

        let nullable = DataType::int32().as_nullable();
        let to_nullable = unary_lambda("x", DataType::int32(), |x| Expr::cast(x, nullable));
        assert_eq!(evaluate(&to_nullable, &[Value::Int32(3)]).unwrap(), Value::Int32(3));
    }

    #[test]
    fn test_argument_count_is_checked() {
        let lambda = unary_lambda("x", DataType::int32(), |x| x);
        assert_eq!(
            evaluate(&lambda, &[]),
            Err(EvalError::ArgumentCount { expected: 1, got: 0 })
        );
    }

    #[test]
    fn test_nested_lambda_is_unsupported() {
        let inner = unary_lambda("y", DataType::int32(), |y| y);
        let outer = LambdaExpr::new(vec![], Expr::Lambda(inner));
        assert!(matches!(evaluate(&outer, &[]), Err(EvalError::Unsupported(_))));
    }

    #[test]
    fn test_string_concatenation() {
        let lambda = unary_lambda("s", DataType::string(), |s| {
            Expr::binary(BinaryOp::Add, s, Expr::constant("!", DataType::string()))
        });
        assert_eq!(
            evaluate(&lambda, &[Value::string("hi")]).unwrap(),
            Value::string("hi!")
        );
    }
}
