//! Native function storage and call context.
//!
//! Host members (property getters, methods, constructors) carry a `NativeFn`
//! so the evaluator and the constant folder can call into Rust. A native
//! function receives a [`CallContext`] holding the receiver, the arguments
//! and any bound generic arguments, and writes its result back into it.
//!
//! # Example
//!
//! ```
//! use exprtools_core::{CallContext, NativeFn, Value};
//!
//! let twice = NativeFn::new(|ctx: &mut CallContext| {
//!     let x = ctx.arg_f64(0)?;
//!     ctx.set_return(Value::double(x * 2.0));
//!     Ok(())
//! });
//!
//! let result = twice.invoke(None, vec![Value::double(2.5)]).unwrap();
//! assert_eq!(result, Value::double(5.0));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::EvalError;
use crate::value::{HostObject, Value};
use crate::DataType;

/// Type-erased native function.
///
/// The callable is shared behind an `Arc`, so cloning a member description
/// that carries one is cheap.
#[derive(Clone)]
pub struct NativeFn {
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeFn {
    pub fn new<F>(f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call this native function with the given context.
    pub fn call(&self, ctx: &mut CallContext) -> Result<(), EvalError> {
        self.inner.call(ctx)
    }

    /// Build a context, call, and return the value the function produced.
    pub fn invoke(&self, this: Option<Value>, args: Vec<Value>) -> Result<Value, EvalError> {
        let mut ctx = CallContext::new(this, args);
        self.call(&mut ctx)?;
        Ok(ctx.into_return())
    }

    /// Whether both handles share the same callable.
    pub fn ptr_eq(&self, other: &NativeFn) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}

/// Trait for callable native functions.
pub trait NativeCallable {
    fn call(&self, ctx: &mut CallContext) -> Result<(), EvalError>;
}

impl<F> NativeCallable for F
where
    F: Fn(&mut CallContext) -> Result<(), EvalError>,
{
    fn call(&self, ctx: &mut CallContext) -> Result<(), EvalError> {
        (self)(ctx)
    }
}

/// Context for native function calls.
///
/// `this` is `None` for static members and constructors. The return value
/// starts as `Value::Null`.
#[derive(Debug)]
pub struct CallContext {
    this: Option<Value>,
    args: Vec<Value>,
    generic_args: Vec<DataType>,
    ret: Value,
}

impl CallContext {
    pub fn new(this: Option<Value>, args: Vec<Value>) -> Self {
        Self {
            this,
            args,
            generic_args: Vec::new(),
            ret: Value::Null,
        }
    }

    /// Attach the bound generic arguments of the called method.
    pub fn with_generic_args(mut self, generic_args: Vec<DataType>) -> Self {
        self.generic_args = generic_args;
        self
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    pub fn arg(&self, index: usize) -> Result<&Value, EvalError> {
        self.args.get(index).ok_or(EvalError::ArgumentCount {
            expected: index + 1,
            got: self.args.len(),
        })
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn arg_f64(&self, index: usize) -> Result<f64, EvalError> {
        let value = self.arg(index)?;
        value
            .as_f64()
            .ok_or_else(|| EvalError::type_mismatch("number", value.type_name()))
    }

    pub fn arg_i64(&self, index: usize) -> Result<i64, EvalError> {
        let value = self.arg(index)?;
        value
            .as_i64()
            .ok_or_else(|| EvalError::type_mismatch("integer", value.type_name()))
    }

    pub fn arg_str(&self, index: usize) -> Result<&str, EvalError> {
        let value = self.arg(index)?;
        value
            .as_str()
            .ok_or_else(|| EvalError::type_mismatch("String", value.type_name()))
    }

    pub fn arg_array(&self, index: usize) -> Result<&[Value], EvalError> {
        let value = self.arg(index)?;
        value
            .as_array()
            .ok_or_else(|| EvalError::type_mismatch("Array", value.type_name()))
    }

    pub fn generic_args(&self) -> &[DataType] {
        &self.generic_args
    }

    /// The receiver. Fails with a null reference for static calls and null
    /// receivers.
    pub fn this(&self) -> Result<&Value, EvalError> {
        match &self.this {
            Some(Value::Null) | None => Err(EvalError::NullReference {
                context: "instance member".to_string(),
            }),
            Some(value) => Ok(value),
        }
    }

    /// The receiver without the null check, for members of nullable
    /// wrappers that must answer on null.
    pub fn this_or_null(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.this.as_ref().unwrap_or(&NULL)
    }

    pub fn this_str(&self) -> Result<&str, EvalError> {
        let this = self.this()?;
        this.as_str()
            .ok_or_else(|| EvalError::type_mismatch("String", this.type_name()))
    }

    /// Downcast the receiver to a host object payload.
    pub fn this_object<T: 'static>(&self) -> Result<&T, EvalError> {
        let this = self.this()?;
        this.as_object()
            .and_then(HostObject::downcast_ref::<T>)
            .ok_or_else(|| EvalError::type_mismatch(std::any::type_name::<T>(), this.type_name()))
    }

    pub fn set_return(&mut self, value: impl Into<Value>) {
        self.ret = value.into();
    }

    pub fn into_return(self) -> Value {
        self.ret
    }
}
