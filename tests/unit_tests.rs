//! End-to-end tests: parse against a context, then evaluate.
//!
//! These tests validate the full pipeline (syntax, building, evaluation)
//! through the public API of the root crate.

mod test_harness;

use std::sync::Arc;
use std::thread;

use exprtools::{Context, DataType, EvalError, LambdaShape, Value};
use test_harness::*;

fn int() -> DataType {
    DataType::int32()
}

fn double() -> DataType {
    DataType::double()
}

fn boolean() -> DataType {
    DataType::bool()
}

// =============================================================================
// Arithmetic
// =============================================================================

#[test]
fn test_increment() {
    let harness = TestHarness::new();
    assert_eq!(harness.eval("x => x + 1", &[int()], &[Value::Int32(1)]), Value::Int32(2));
}

#[test]
fn test_parenthesized_arithmetic() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.eval("x => (x + 1) * 2", &[int()], &[Value::Int32(1)]),
        Value::Int32(4)
    );
}

#[test]
fn test_caret_is_power_on_numbers() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.eval("x => x ^ 2", &[double()], &[Value::double(3.0)]),
        Value::double(9.0)
    );
}

#[test]
fn test_caret_is_exclusive_or_on_booleans() {
    let harness = TestHarness::new();
    let cases = [(true, true, false), (true, false, true), (false, true, true), (false, false, false)];
    for (a, b, expected) in cases {
        assert_eq!(
            harness.eval(
                "(a, b) => a ^ b",
                &[boolean(), boolean()],
                &[Value::Bool(a), Value::Bool(b)]
            ),
            Value::Bool(expected),
            "{a} ^ {b}"
        );
    }
}

#[test]
fn test_double_arithmetic() {
    let harness = TestHarness::new();
    let x = [Value::double(4.0)];
    assert_eq!(harness.eval("x => x - 1", &[double()], &x), Value::double(3.0));
    assert_eq!(harness.eval("x => x * x", &[double()], &x), Value::double(16.0));
    assert_eq!(harness.eval("x => x / x", &[double()], &x), Value::double(1.0));
    assert_eq!(harness.eval("x => 1 / x", &[double()], &x), Value::double(0.25));
    assert_eq!(
        harness.eval("x => x % 2", &[double()], &[Value::double(11.0)]),
        Value::double(1.0)
    );
}

#[test]
fn test_integer_literal_widens_against_double() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.eval("x => x + 0.5", &[int()], &[Value::Int32(2)]),
        Value::double(2.5)
    );
}

#[test]
fn test_integer_division_by_zero() {
    let harness = TestHarness::new();
    let lambda = harness.build("x => 10 / x", &[int()]);
    let err = harness.context().evaluate(&lambda, &[Value::Int32(0)]).unwrap_err();
    assert_eq!(err, EvalError::DivideByZero);
}

#[test]
fn test_negation() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.eval(
            "(a, b, c) => a * b / c + -a * c",
            &[double(), double(), double()],
            &[Value::double(2.0), Value::double(3.0), Value::double(4.0)]
        ),
        Value::double(-6.5)
    );
}

// =============================================================================
// Logic and comparison
// =============================================================================

#[test]
fn test_boolean_operators() {
    let harness = TestHarness::new();
    let params = [boolean(), boolean()];
    let t = Value::Bool(true);
    let f = Value::Bool(false);
    assert_eq!(harness.eval("(a, b) => a || b", &params, &[f.clone(), t.clone()]), t);
    assert_eq!(harness.eval("(a, b) => a && b", &params, &[t.clone(), f.clone()]), f);
    assert_eq!(harness.eval("(a, b) => !a && b", &params, &[f.clone(), t.clone()]), t);
}

#[test]
fn test_relational_operators() {
    let harness = TestHarness::new();
    let five = [Value::Int32(5)];
    assert_eq!(harness.eval("x => x > 4", &[int()], &five), Value::Bool(true));
    assert_eq!(harness.eval("x => x >= 5", &[int()], &five), Value::Bool(true));
    assert_eq!(harness.eval("x => x < 5", &[int()], &five), Value::Bool(false));
    assert_eq!(harness.eval("x => x <= 4", &[int()], &five), Value::Bool(false));
    assert_eq!(harness.eval("x => x == 5", &[int()], &five), Value::Bool(true));
    assert_eq!(harness.eval("x => x != 5", &[int()], &five), Value::Bool(false));
}

#[test]
fn test_conditional() {
    let harness = TestHarness::new();
    let lambda = harness.build("x => x >= 10 ? 1 : 0", &[int()]);
    for (input, expected) in [(10, 1), (15, 1), (5, 0)] {
        assert_eq!(
            harness.context().evaluate(&lambda, &[Value::Int32(input)]).unwrap(),
            Value::Int32(expected),
            "x = {input}"
        );
    }
}

#[test]
fn test_nullable_comparison_with_null() {
    let harness = TestHarness::new();
    let lambda = harness.build("d => d == null", &[DataType::int32().as_nullable()]);
    let ctx = harness.context();
    assert_eq!(ctx.evaluate(&lambda, &[Value::Null]).unwrap(), Value::Bool(true));
    assert_eq!(ctx.evaluate(&lambda, &[Value::Int32(3)]).unwrap(), Value::Bool(false));
}

// =============================================================================
// Host members
// =============================================================================

#[test]
fn test_member_chain() {
    let harness = TestHarness::new();
    let value = data1(Some(Data2 {
        data3: Some(Data3 { value: 7 }),
    }));
    assert_eq!(
        harness.eval("d => d.Data2.Data3.Value", &[data1_type()], &[value]),
        Value::Int32(7)
    );
}

#[test]
fn test_member_of_null_fails() {
    let harness = TestHarness::new();
    let lambda = harness.build("d => d.Data2.Data3", &[data1_type()]);
    let err = harness.context().evaluate(&lambda, &[data1(None)]).unwrap_err();
    assert!(matches!(err, EvalError::NullReference { .. }));
}

#[test]
fn test_array_property() {
    let harness = TestHarness::new();
    let lambda = harness.build(
        "d => d.MyArray.Length > 0 && d.MyArray[0] % 2 == 0",
        &[property_object_type()],
    );
    let ctx = harness.context();
    assert_eq!(
        ctx.evaluate(&lambda, &[property_object(1, vec![4, 5])]).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        ctx.evaluate(&lambda, &[property_object(1, vec![3])]).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        ctx.evaluate(&lambda, &[property_object(1, vec![])]).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn test_instance_method() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.eval(
            "o => o.Greet(\"hi\")",
            &[method_object_type()],
            &[method_object("bob")]
        ),
        Value::string("bob: hi")
    );
}

#[test]
fn test_free_method() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.eval("s => M(s)", &[DataType::string()], &[Value::string("x")]),
        Value::Bool(true)
    );
}

#[test]
fn test_static_method() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.eval(
            "(a, b) => Math.Pow(a, b)",
            &[double(), double()],
            &[Value::double(2.0), Value::double(10.0)]
        ),
        Value::double(1024.0)
    );
}

#[test]
fn test_string_members() {
    let harness = TestHarness::new();
    let s = [Value::string("abc")];
    let string = [DataType::string()];
    assert_eq!(harness.eval("s => s.ToUpper()", &string, &s), Value::string("ABC"));
    assert_eq!(harness.eval("s => s.Length", &string, &s), Value::Int32(3));
    assert_eq!(
        harness.eval("s => s.ToUpper(CultureInfo.InvariantCulture)", &string, &s),
        Value::string("ABC")
    );
}

#[test]
fn test_sequence_operations() {
    let harness = TestHarness::new();
    let ints = [DataType::array_of(int())];
    let items = [Value::array(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)])];
    assert_eq!(harness.eval("xs => xs.Count()", &ints, &items), Value::Int32(3));
    assert_eq!(harness.eval("xs => xs.Sum()", &ints, &items), Value::Int32(6));
    assert_eq!(harness.eval("xs => xs.Contains(2)", &ints, &items), Value::Bool(true));
}

#[test]
fn test_constructor() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.eval("() => (new DateTime(2020, 1, 2)).Day", &[], &[]),
        Value::Int32(2)
    );
}

#[test]
fn test_static_property() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.eval("x => x < Constants.Limit", &[int()], &[Value::Int32(3)]),
        Value::Bool(true)
    );
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn test_argument_count_mismatch() {
    let harness = TestHarness::new();
    let lambda = harness.build("(a, b) => a + b", &[int(), int()]);
    let err = harness.context().evaluate(&lambda, &[Value::Int32(1)]).unwrap_err();
    assert_eq!(err, EvalError::ArgumentCount { expected: 2, got: 1 });
}

#[test]
fn test_free_functions_use_default_context() {
    let lambda = exprtools::parse("(int x) => x * 2").unwrap();
    assert_eq!(exprtools::serialize(&lambda).unwrap(), "x => (x * 2)");

    let culture = exprtools::parse("(string s) => s.ToUpper(CultureInfo.InvariantCulture)").unwrap();
    assert_eq!(
        exprtools::serialize(&culture).unwrap(),
        exprtools::default_context().unwrap().serialize(&culture)
    );
    assert_eq!(
        exprtools::serialize(&culture).unwrap(),
        "s => s.ToUpper(CultureInfo.InvariantCulture)"
    );
    assert_eq!(exprtools::evaluate(&lambda, &[Value::Int32(4)]).unwrap(), Value::Int32(8));

    let shape = LambdaShape::new(vec![double()]).returning(double());
    let typed = exprtools::parse_typed("x => Math.Sqrt(x)", &shape).unwrap();
    assert_eq!(exprtools::evaluate(&typed, &[Value::double(9.0)]).unwrap(), Value::double(3.0));
}

#[test]
fn test_free_parse_reports_expression_errors() {
    let err = exprtools::parse("(int x) => x +").unwrap_err();
    assert!(err.as_expr().is_some_and(|e| e.is_syntax()));
}

#[test]
fn test_context_shared_across_threads() {
    let ctx = Arc::new(Context::with_default_modules().unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                let lambda = ctx.parse("(int x) => x + 1").unwrap();
                ctx.evaluate(&lambda, &[Value::Int32(i)]).unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Value::Int32(i as i32 + 1));
    }
}
