//! Serialization, inlining, folding and property path tests.

mod test_harness;

use std::sync::{Arc, Mutex};

use exprtools::{
    BinaryOp, CallContext, DataType, EvalError, Expr, HostObject, LambdaExpr, MemberInfo, NativeFn,
    ParameterExpr, ParameterResolver, PathError, Value, inline_single,
};
use pretty_assertions::assert_eq;
use test_harness::*;

fn int() -> DataType {
    DataType::int32()
}

fn double() -> DataType {
    DataType::double()
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_serialize_canonical_forms() {
    let harness = TestHarness::new();
    let cases: Vec<(&str, Vec<DataType>, &str)> = vec![
        ("x => x + 1", vec![int()], "x => (x + 1)"),
        ("d => d > 10", vec![double()], "d => (d > 10.0)"),
        (
            "(a, b) => Math.Pow(a, b)",
            vec![double(), double()],
            "(a, b) => Math.Pow(a, b)",
        ),
        (
            "(a, b, c) => a * b / c + -a * c",
            vec![double(), double(), double()],
            "(a, b, c) => (((a * b) / c) + ((-(a)) * c))",
        ),
        (
            "d => d.MyArray.Length > 0 && d.MyArray[0] % 2 == 0",
            vec![property_object_type()],
            "d => ((((d.MyArray).Length) > 0) && ((d.MyArray[0] % 2) == 0))",
        ),
        (
            "d => d > 0 ? true : false",
            vec![int()],
            "d => ((d > 0) ? true : false)",
        ),
        (
            "p => p.ToUpper(CultureInfo.InvariantCulture)",
            vec![DataType::string()],
            "p => p.ToUpper(CultureInfo.InvariantCulture)",
        ),
        (
            "d => d.Data2.Data3 != null",
            vec![data1_type()],
            "d => (d.Data2.Data3 != null)",
        ),
        (
            "d => d.MyInt % 2 == 0",
            vec![property_object_type()],
            "d => ((d.MyInt % 2) == 0)",
        ),
        ("s => M(s)", vec![DataType::string()], "s => M(s)"),
        ("s => s.Data2", vec![data1_type()], "s => s.Data2"),
    ];
    for (text, params, expected) in cases {
        assert_eq!(harness.round_trip(text, &params), expected, "{text}");
    }
}

#[test]
fn test_round_trip_reparses_to_equal_tree() {
    let harness = TestHarness::new();
    for (text, params) in [
        ("x => x + 1", vec![int()]),
        ("xs => xs.Count()", vec![DataType::array_of(int())]),
        ("d => d.Data2.Data3 != null", vec![data1_type()]),
    ] {
        let first = harness.build(text, &params);
        let serialized = harness.context().serialize(&first);
        let second = harness.build(&serialized, &params);
        assert_eq!(first, second, "{text} -> {serialized}");
    }
}

#[test]
fn test_round_trip_keeps_floating_division() {
    let harness = TestHarness::new();
    let first = harness.build("x => x + 1.0 / 2.0", &[int()]);
    let serialized = harness.context().serialize(&first);
    assert_eq!(serialized, "x => (((Double)(x)) + (1.0 / 2.0))");

    let second = harness.build(&serialized, &[int()]);
    assert_eq!(first, second);
    assert_eq!(
        harness.context().evaluate(&second, &[Value::Int32(1)]).unwrap(),
        Value::double(1.5)
    );
}

#[test]
fn test_round_trip_keeps_literal_types() {
    let harness = TestHarness::new();
    for (text, expected) in [
        ("() => 1.5f", "() => 1.5F"),
        ("() => 1L", "() => 1L"),
        ("() => 7UL", "() => 7UL"),
        ("() => 1e20", "() => 1e20"),
        ("() => 0.1 + 0.2", "() => (0.1 + 0.2)"),
    ] {
        let first = harness.build(text, &[]);
        let serialized = harness.context().serialize(&first);
        assert_eq!(serialized, expected, "{text}");
        assert_eq!(harness.build(&serialized, &[]), first, "{text}");
    }
}

#[test]
fn test_fold_non_finite_reparses() {
    let harness = TestHarness::new();
    for text in [
        "() => Double.NaN",
        "() => Double.PositiveInfinity",
        "() => Single.NegativeInfinity",
    ] {
        let folded = harness.context().fold_constants(&harness.build(text, &[]));
        let serialized = harness.context().serialize(&folded);
        assert_eq!(serialized, text);
        let reparsed = harness.context().fold_constants(&harness.build(&serialized, &[]));
        assert_eq!(reparsed, folded);
    }
}

#[test]
fn test_sequence_operation_renders_type_arguments() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.round_trip("xs => xs.Count()", &[DataType::array_of(int())]),
        "xs => xs.Count<Int32>()"
    );
}

// =============================================================================
// Inlining
// =============================================================================

#[test]
fn test_multi_parameter_inlining() {
    let harness = TestHarness::new();
    let sum = harness.build("(x, y) => x + y + 1", &[int(), int()]);
    let resolver = ParameterResolver::new()
        .register("x", harness.build("a => a * 3", &[int()]))
        .register("y", harness.build("a => a * 5", &[int()]));

    let inlined = harness.context().inline(&resolver, &sum);
    assert_eq!(
        harness.context().serialize(&inlined),
        "(a, a1) => (((a * 3) + (a1 * 5)) + 1)"
    );
    assert_eq!(
        harness
            .context()
            .evaluate(&inlined, &[Value::Int32(3), Value::Int32(2)])
            .unwrap(),
        Value::Int32(20)
    );
}

#[test]
fn test_inlining_nothing_preserves_behavior() {
    let harness = TestHarness::new();
    let lambda = harness.build("(x, y) => x * y - 1", &[int(), int()]);
    let keep = |_: &ParameterExpr| -> Option<LambdaExpr> { None };
    let inlined = exprtools::inline(&keep, &lambda);

    assert_eq!(inlined.arity(), lambda.arity());
    let args = [Value::Int32(4), Value::Int32(5)];
    assert_eq!(
        exprtools::evaluate(&inlined, &args).unwrap(),
        exprtools::evaluate(&lambda, &args).unwrap()
    );
}

#[test]
fn test_inline_single_composes() {
    let harness = TestHarness::new();
    let length = harness.build("s => s.Length", &[DataType::string()]);
    let increment = harness.build("x => x + 1", &[int()]);

    let composed = inline_single(&length, &increment);
    assert_eq!(harness.context().serialize(&composed), "s => (s.Length + 1)");
    assert_eq!(
        exprtools::evaluate(&composed, &[Value::string("abc")]).unwrap(),
        Value::Int32(4)
    );
}

// =============================================================================
// Folding
// =============================================================================

fn closure_type() -> DataType {
    DataType::named("Tests.Closure")
}

/// `i => i * c`, where `c` is a field of a captured host object.
fn closure_lambda(cell: Arc<Mutex<f64>>) -> LambdaExpr {
    let getter = NativeFn::new(|ctx: &mut CallContext| {
        let value = *ctx
            .this_object::<Mutex<f64>>()?
            .lock()
            .map_err(|e| EvalError::Native(e.to_string()))?;
        ctx.set_return(value);
        Ok(())
    });
    let field = MemberInfo::field("c", closure_type(), double()).with_getter(getter);
    let closure = Expr::constant(
        Value::Object(HostObject::from_arc(closure_type(), cell)),
        closure_type(),
    );
    let i = ParameterExpr::new("i", double());
    LambdaExpr::new(
        vec![i.clone()],
        Expr::binary(
            BinaryOp::Multiply,
            Expr::Parameter(i),
            Expr::member(Some(closure), field),
        ),
    )
}

#[test]
fn test_fold_captures_closure_value() {
    let harness = TestHarness::new();
    let cell = Arc::new(Mutex::new(0.01));
    let lambda = closure_lambda(cell.clone());

    let folded = harness.context().fold_constants(&lambda);
    *cell.lock().unwrap() = 42.0;

    assert_eq!(harness.context().serialize(&folded), "i => (i * 0.01)");
    assert_eq!(
        exprtools::evaluate(&folded, &[Value::double(2.0)]).unwrap(),
        Value::double(0.02)
    );
    assert_eq!(
        exprtools::evaluate(&lambda, &[Value::double(1.0)]).unwrap(),
        Value::double(42.0)
    );
}

/// `() => c.Values`, where `Values` reads a captured array.
fn captured_array_lambda(element: DataType, items: Vec<Value>) -> LambdaExpr {
    let array = Value::array(items);
    let getter = NativeFn::new(move |ctx: &mut CallContext| {
        ctx.set_return(array.clone());
        Ok(())
    });
    let field = MemberInfo::field("Values", closure_type(), DataType::array_of(element))
        .with_getter(getter);
    let closure = Expr::constant(
        Value::Object(HostObject::from_arc(closure_type(), Arc::new(Mutex::new(0.0)))),
        closure_type(),
    );
    LambdaExpr::new(vec![], Expr::member(Some(closure), field))
}

#[test]
fn test_fold_captured_numeric_arrays_reparse() {
    let harness = TestHarness::new();
    let cases = [
        (
            DataType::int64(),
            vec![Value::Int64(1), Value::Int64(2)],
            "() => new Int64[] { 1L, 2L }",
        ),
        (
            double(),
            vec![Value::double(1.0), Value::double(2.5)],
            "() => new Double[] { 1.0, 2.5 }",
        ),
    ];
    for (element, items, expected) in cases {
        let folded = harness
            .context()
            .fold_constants(&captured_array_lambda(element, items.clone()));
        let serialized = harness.context().serialize(&folded);
        assert_eq!(serialized, expected);

        let reparsed = harness.build(&serialized, &[]);
        assert_eq!(reparsed, folded);
        assert_eq!(
            harness.context().evaluate(&reparsed, &[]).unwrap(),
            Value::array(items)
        );
    }
}

#[test]
fn test_array_literal_items_widen_on_reparse() {
    let harness = TestHarness::new();
    assert_eq!(
        harness.round_trip("x => new Double[] { 1, x }", &[int()]),
        "x => new Double[] { 1.0, ((Double)(x)) }"
    );
}

#[test]
fn test_fold_nullable_guid() {
    let harness = TestHarness::new();
    let lambda = harness.build(
        "d => d == null || d == Constants.Id",
        &[DataType::guid().as_nullable()],
    );
    let folded = harness.context().fold_constants(&lambda);
    assert_eq!(
        harness.context().serialize(&folded),
        format!("d => ((d == null) || (d == ((Nullable<Guid>)(new Guid(\"{SAMPLE_GUID}\")))))")
    );
}

#[test]
fn test_fold_date_time() {
    let harness = TestHarness::new();
    let lambda = harness.build("() => DateTime.MinValue", &[]);
    let folded = harness.context().fold_constants(&lambda);
    assert_eq!(harness.context().serialize(&folded), "() => new DateTime(0L)");
}

#[test]
fn test_fold_is_idempotent() {
    let harness = TestHarness::new();
    let lambda = harness.build("x => x * Math.PI + Constants.Limit", &[double()]);
    let once = harness.context().fold_constants(&lambda);
    let twice = harness.context().fold_constants(&once);
    assert_eq!(once, twice);
    assert!(!harness.context().serialize(&once).contains("Math.PI"));
}

#[test]
fn test_fold_leaves_parameter_members() {
    let harness = TestHarness::new();
    let lambda = harness.build("d => d.Data2.Data3 != null", &[data1_type()]);
    assert_eq!(harness.context().fold_constants(&lambda), lambda);
}

// =============================================================================
// Property paths
// =============================================================================

#[test]
fn test_property_paths() {
    let harness = TestHarness::new();
    let path = |text: &str| exprtools::property_path(&harness.build(text, &[data1_type()]));

    assert_eq!(path("x => x.Data2.Data3"), Ok("Data2.Data3".to_string()));
    assert_eq!(path("x => x.Data2"), Ok("Data2".to_string()));
    assert_eq!(path("x => x"), Err(PathError::NoMember));
    assert_eq!(
        path("x => x.Data2 != null"),
        Err(PathError::UnexpectedNode("binary operator"))
    );
}

#[test]
fn test_property_path_rejects_calls() {
    let harness = TestHarness::new();
    let lambda = harness.build("s => s.ToUpper()", &[DataType::string()]);
    assert!(matches!(
        exprtools::property_path(&lambda),
        Err(PathError::UnexpectedNode(_))
    ));
}
