//! `System.Linq` module: the static sequence operations on `Enumerable`.
//!
//! The module is explicit, so `Enumerable` only resolves through
//! [`sequence_ops_type`](exprtools_core::HostTypeSystem::sequence_ops_type) or
//! a namespace entry naming the `System.Linq` module. Every operation is a
//! sequence operation: the builder calls `xs.Count()` as
//! `Enumerable.Count<T>(xs)`.
//!
//! At runtime every sequence is a [`Value::Array`].

use std::cmp::Ordering;

use exprtools_core::{
    CallContext, DataType, EvalError, MethodSignature, NativeFn, Value, well_known,
};
use exprtools_registry::{Module, TypeBuilder};

// =============================================================================
// OPERATIONS
// =============================================================================

fn empty_sequence() -> EvalError {
    EvalError::Native("sequence contains no elements".to_string())
}

/// Order two elements: numbers numerically, strings ordinally.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering, EvalError> {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return Ok(x.total_cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
        return Ok(x.cmp(y));
    }
    Err(EvalError::Unsupported(format!(
        "cannot compare {} with {}",
        a.type_name(),
        b.type_name()
    )))
}

/// The smallest (`Ordering::Less`) or largest (`Ordering::Greater`) element.
pub fn extreme(items: &[Value], keep: Ordering) -> Result<Value, EvalError> {
    let (first, rest) = items.split_first().ok_or_else(empty_sequence)?;
    let mut best = first;
    for item in rest {
        if compare(item, best)? == keep {
            best = item;
        }
    }
    Ok(best.clone())
}

pub fn average(items: &[Value]) -> Result<f64, EvalError> {
    if items.is_empty() {
        return Err(empty_sequence());
    }
    let mut total = 0.0;
    for item in items {
        total += item
            .as_f64()
            .ok_or_else(|| EvalError::type_mismatch("number", item.type_name()))?;
    }
    Ok(total / items.len() as f64)
}

fn element_at(items: &[Value], index: i64) -> Result<Value, EvalError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or(EvalError::IndexOutOfRange {
            index,
            len: items.len(),
        })
}

// =============================================================================
// SIGNATURES
// =============================================================================

fn element() -> DataType {
    DataType::generic_param(0)
}

fn sequence() -> DataType {
    DataType::sequence_of(element())
}

/// A generic sequence operation over `IEnumerable<T>`.
fn generic_op<F>(name: &str, extra: Vec<DataType>, return_type: DataType, f: F) -> MethodSignature
where
    F: Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static,
{
    let mut params = vec![sequence()];
    params.extend(extra);
    MethodSignature::new(name, params, return_type)
        .with_static()
        .with_sequence_op()
        .with_generic_arity(1)
        .with_invoker(NativeFn::new(f))
}

/// A sequence operation fixed to one element type.
fn typed_op<F>(name: &str, element: DataType, return_type: DataType, f: F) -> MethodSignature
where
    F: Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static,
{
    MethodSignature::new(name, vec![DataType::sequence_of(element)], return_type)
        .with_static()
        .with_sequence_op()
        .with_invoker(NativeFn::new(f))
}

fn enumerable() -> TypeBuilder {
    let mut builder = TypeBuilder::new("Enumerable")
        .signature(generic_op("Count", vec![], DataType::int32(), |ctx| {
            let count = ctx.arg_array(0)?.len() as i32;
            ctx.set_return(count);
            Ok(())
        }))
        .signature(generic_op("Any", vec![], DataType::bool(), |ctx| {
            let any = !ctx.arg_array(0)?.is_empty();
            ctx.set_return(any);
            Ok(())
        }))
        .signature(generic_op("First", vec![], element(), |ctx| {
            let first = ctx.arg_array(0)?.first().cloned().ok_or_else(empty_sequence)?;
            ctx.set_return(first);
            Ok(())
        }))
        .signature(generic_op("Last", vec![], element(), |ctx| {
            let last = ctx.arg_array(0)?.last().cloned().ok_or_else(empty_sequence)?;
            ctx.set_return(last);
            Ok(())
        }))
        .signature(generic_op("Contains", vec![element()], DataType::bool(), |ctx| {
            let needle = ctx.arg(1)?;
            let found = ctx.arg_array(0)?.contains(needle);
            ctx.set_return(found);
            Ok(())
        }))
        .signature(generic_op("ElementAt", vec![DataType::int32()], element(), |ctx| {
            let item = element_at(ctx.arg_array(0)?, ctx.arg_i64(1)?)?;
            ctx.set_return(item);
            Ok(())
        }))
        .signature(generic_op("Min", vec![], element(), |ctx| {
            let min = extreme(ctx.arg_array(0)?, Ordering::Less)?;
            ctx.set_return(min);
            Ok(())
        }))
        .signature(generic_op("Max", vec![], element(), |ctx| {
            let max = extreme(ctx.arg_array(0)?, Ordering::Greater)?;
            ctx.set_return(max);
            Ok(())
        }));

    builder = builder
        .signature(typed_op("Sum", DataType::int32(), DataType::int32(), |ctx| {
            let mut total: i32 = 0;
            for item in ctx.arg_array(0)? {
                let value = item
                    .as_i64()
                    .ok_or_else(|| EvalError::type_mismatch("Int32", item.type_name()))?;
                total = total.wrapping_add(value as i32);
            }
            ctx.set_return(total);
            Ok(())
        }))
        .signature(typed_op("Sum", DataType::int64(), DataType::int64(), |ctx| {
            let mut total: i64 = 0;
            for item in ctx.arg_array(0)? {
                let value = item
                    .as_i64()
                    .ok_or_else(|| EvalError::type_mismatch("Int64", item.type_name()))?;
                total = total.wrapping_add(value);
            }
            ctx.set_return(total);
            Ok(())
        }))
        .signature(typed_op("Sum", DataType::double(), DataType::double(), |ctx| {
            let mut total = 0.0;
            for item in ctx.arg_array(0)? {
                total += item
                    .as_f64()
                    .ok_or_else(|| EvalError::type_mismatch("Double", item.type_name()))?;
            }
            ctx.set_return(total);
            Ok(())
        }));

    for element in [DataType::int32(), DataType::int64(), DataType::double()] {
        builder = builder.signature(typed_op("Average", element, DataType::double(), |ctx| {
            let mean = average(ctx.arg_array(0)?)?;
            ctx.set_return(mean);
            Ok(())
        }));
    }
    builder
}

/// Creates the explicit `System.Linq` module.
pub fn module() -> Module {
    Module::new(well_known::SEQUENCE_OPS_MODULE)
        .explicit()
        .ty(enumerable())
}
