//! Math module providing constants and functions.
//!
//! All items are static members of `System.Math`, e.g. `Math.PI`,
//! `Math.Pow(x, 2)`.

use exprtools_core::{CallContext, DataType, EvalError};
use exprtools_registry::{Module, TypeBuilder};

// =============================================================================
// FUNCTIONS
// =============================================================================

/// `x` raised to the power `y`.
pub fn pow(x: f64, y: f64) -> f64 {
    x.powf(y)
}

/// Round half to even, the default midpoint rule.
pub fn round(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - x.signum()
    } else {
        rounded
    }
}

/// Round half to even at `digits` fractional digits.
pub fn round_digits(x: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    round(x * scale) / scale
}

fn double_fn(f: fn(f64) -> f64) -> impl Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static {
    move |ctx| {
        let x = ctx.arg_f64(0)?;
        ctx.set_return(f(x));
        Ok(())
    }
}

fn double_fn2(f: fn(f64, f64) -> f64) -> impl Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static {
    move |ctx| {
        let (x, y) = (ctx.arg_f64(0)?, ctx.arg_f64(1)?);
        ctx.set_return(f(x, y));
        Ok(())
    }
}

fn int_fn2(f: fn(i64, i64) -> i64) -> impl Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static {
    move |ctx| {
        let (x, y) = (ctx.arg_i64(0)?, ctx.arg_i64(1)?);
        ctx.set_return(f(x, y) as i32);
        Ok(())
    }
}

fn long_fn2(f: fn(i64, i64) -> i64) -> impl Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static {
    move |ctx| {
        let (x, y) = (ctx.arg_i64(0)?, ctx.arg_i64(1)?);
        ctx.set_return(f(x, y));
        Ok(())
    }
}

/// Creates the `System.Math` module.
pub fn module() -> Module {
    let double = DataType::double;
    let int = DataType::int32;
    let long = DataType::int64;

    let math = TypeBuilder::new("Math")
        // Constants
        .static_property("PI", double(), |ctx| {
            ctx.set_return(std::f64::consts::PI);
            Ok(())
        })
        .static_property("E", double(), |ctx| {
            ctx.set_return(std::f64::consts::E);
            Ok(())
        })
        // Powers and roots
        .static_method("Pow", vec![double(), double()], double(), double_fn2(pow))
        .static_method("Sqrt", vec![double()], double(), double_fn(f64::sqrt))
        // Rounding
        .static_method("Floor", vec![double()], double(), double_fn(f64::floor))
        .static_method("Ceiling", vec![double()], double(), double_fn(f64::ceil))
        .static_method("Round", vec![double()], double(), double_fn(round))
        .static_method("Round", vec![double(), int()], double(), |ctx| {
            let x = ctx.arg_f64(0)?;
            let digits = ctx.arg_i64(1)? as i32;
            ctx.set_return(round_digits(x, digits));
            Ok(())
        })
        // Comparison
        .static_method("Max", vec![double(), double()], double(), double_fn2(f64::max))
        .static_method("Max", vec![int(), int()], int(), int_fn2(i64::max))
        .static_method("Max", vec![long(), long()], long(), long_fn2(i64::max))
        .static_method("Min", vec![double(), double()], double(), double_fn2(f64::min))
        .static_method("Min", vec![int(), int()], int(), int_fn2(i64::min))
        .static_method("Min", vec![long(), long()], long(), long_fn2(i64::min))
        .static_method("Abs", vec![double()], double(), double_fn(f64::abs))
        .static_method("Abs", vec![int()], int(), |ctx| {
            let x = ctx.arg_i64(0)? as i32;
            ctx.set_return(x.wrapping_abs());
            Ok(())
        })
        .static_method("Abs", vec![long()], long(), |ctx| {
            let x = ctx.arg_i64(0)?;
            ctx.set_return(x.wrapping_abs());
            Ok(())
        });

    Module::new("System").ty(math)
}
