// tests/test_harness.rs
//! Shared fixtures for the integration tests.
//!
//! Provides a `Sample` module of host types, a context with it installed,
//! and helpers that parse, serialize and evaluate against that context.

#![allow(dead_code)]

use std::sync::Arc;

use exprtools::{
    CallContext, Context, ContextConfig, DataType, ExprError, HostObject, LambdaExpr, LambdaShape,
    MethodSignature, Module, NamespaceConfig, NativeFn, ParseOptions, StaticMethodResolver,
    TypeBuilder, Value,
};
use uuid::Uuid;

pub const SAMPLE_GUID: &str = "f45132ed-e1cf-4ddf-b8f9-62e660d2b4cb";

// =============================================================================
// Host types
// =============================================================================

#[derive(Debug, Clone)]
pub struct Data3 {
    pub value: i32,
}

#[derive(Debug, Clone)]
pub struct Data2 {
    pub data3: Option<Data3>,
}

#[derive(Debug, Clone)]
pub struct Data1 {
    pub data2: Option<Data2>,
}

#[derive(Debug, Clone)]
pub struct ObjectWithProperty {
    pub my_int: i32,
    pub my_array: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct ObjectWithMethod {
    pub name: String,
}

pub fn data1_type() -> DataType {
    DataType::named("Sample.Data1")
}

pub fn data2_type() -> DataType {
    DataType::named("Sample.Data2")
}

pub fn data3_type() -> DataType {
    DataType::named("Sample.Data3")
}

pub fn property_object_type() -> DataType {
    DataType::named("Sample.ObjectWithProperty")
}

pub fn method_object_type() -> DataType {
    DataType::named("Sample.ObjectWithMethod")
}

fn object_or_null<T: Clone + Send + Sync + 'static>(ty: DataType, value: &Option<T>) -> Value {
    match value {
        Some(v) => Value::Object(HostObject::new(ty, v.clone())),
        None => Value::Null,
    }
}

pub fn data1(data2: Option<Data2>) -> Value {
    Value::Object(HostObject::new(data1_type(), Data1 { data2 }))
}

pub fn property_object(my_int: i32, my_array: Vec<i32>) -> Value {
    Value::Object(HostObject::new(
        property_object_type(),
        ObjectWithProperty { my_int, my_array },
    ))
}

pub fn method_object(name: &str) -> Value {
    Value::Object(HostObject::new(
        method_object_type(),
        ObjectWithMethod {
            name: name.to_string(),
        },
    ))
}

/// The `Sample` namespace: the host types above plus `Constants`.
pub fn sample_module() -> Module {
    let data3 = TypeBuilder::new("Data3").property("Value", DataType::int32(), |ctx| {
        let value = ctx.this_object::<Data3>()?.value;
        ctx.set_return(value);
        Ok(())
    });
    let data2 = TypeBuilder::new("Data2").property("Data3", data3_type(), |ctx| {
        let value = object_or_null(data3_type(), &ctx.this_object::<Data2>()?.data3);
        ctx.set_return(value);
        Ok(())
    });
    let data1 = TypeBuilder::new("Data1").property("Data2", data2_type(), |ctx| {
        let value = object_or_null(data2_type(), &ctx.this_object::<Data1>()?.data2);
        ctx.set_return(value);
        Ok(())
    });

    let with_property = TypeBuilder::new("ObjectWithProperty")
        .property("MyInt", DataType::int32(), |ctx| {
            let value = ctx.this_object::<ObjectWithProperty>()?.my_int;
            ctx.set_return(value);
            Ok(())
        })
        .property("MyArray", DataType::array_of(DataType::int32()), |ctx| {
            let items: Vec<Value> = ctx
                .this_object::<ObjectWithProperty>()?
                .my_array
                .iter()
                .map(|v| Value::Int32(*v))
                .collect();
            ctx.set_return(Value::array(items));
            Ok(())
        });

    let with_method = TypeBuilder::new("ObjectWithMethod")
        .property("Name", DataType::string(), |ctx| {
            let name = ctx.this_object::<ObjectWithMethod>()?.name.clone();
            ctx.set_return(name);
            Ok(())
        })
        .method(
            "Greet",
            vec![DataType::string()],
            DataType::string(),
            |ctx| {
                let greeting = format!(
                    "{}: {}",
                    ctx.this_object::<ObjectWithMethod>()?.name,
                    ctx.arg_str(0)?
                );
                ctx.set_return(greeting);
                Ok(())
            },
        );

    let constants = TypeBuilder::new("Constants")
        .static_property("Id", DataType::guid().as_nullable(), |ctx| {
            let id = Uuid::parse_str(SAMPLE_GUID)
                .map_err(|e| exprtools::EvalError::Native(e.to_string()))?;
            ctx.set_return(id);
            Ok(())
        })
        .static_property("Limit", DataType::int32(), |ctx| {
            ctx.set_return(10);
            Ok(())
        });

    Module::new("Sample")
        .ty(data3)
        .ty(data2)
        .ty(data1)
        .ty(with_property)
        .ty(with_method)
        .ty(constants)
}

/// `M(string)`: whether the string is non-empty.
pub fn free_method() -> MethodSignature {
    MethodSignature::new("M", vec![DataType::string()], DataType::bool())
        .with_static()
        .with_invoker(NativeFn::new(|ctx: &mut CallContext| {
            let non_empty = !ctx.arg_str(0)?.is_empty();
            ctx.set_return(non_empty);
            Ok(())
        }))
}

// =============================================================================
// Harness
// =============================================================================

/// A context with the standard modules and `Sample`, where `Sample` types
/// resolve and render unqualified, plus the free method `M`.
pub struct TestHarness {
    ctx: Arc<Context>,
    methods: StaticMethodResolver,
}

impl TestHarness {
    pub fn new() -> Self {
        let config = ContextConfig::new()
            .with_namespaces(NamespaceConfig::system().with_namespace("Sample"))
            .with_module(sample_module());
        let ctx = Context::new(config).unwrap();
        Self {
            ctx: Arc::new(ctx),
            methods: StaticMethodResolver::new([free_method()]),
        }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    /// Parse `text` expecting parameters of `params`.
    pub fn parse(&self, text: &str, params: &[DataType]) -> Result<LambdaExpr, ExprError> {
        let shape = LambdaShape::new(params.to_vec());
        self.ctx.parse_with(
            text,
            ParseOptions::new().shape(&shape).methods(&self.methods),
        )
    }

    /// Parse `text`, failing the test with the rendered error.
    pub fn build(&self, text: &str, params: &[DataType]) -> LambdaExpr {
        self.parse(text, params)
            .unwrap_or_else(|e| panic!("failed to build {text:?}: {}", e.display_with_source(text)))
    }

    pub fn round_trip(&self, text: &str, params: &[DataType]) -> String {
        self.ctx.serialize(&self.build(text, params))
    }

    pub fn eval(&self, text: &str, params: &[DataType], args: &[Value]) -> Value {
        let lambda = self.build(text, params);
        self.ctx
            .evaluate(&lambda, args)
            .unwrap_or_else(|e| panic!("failed to evaluate {text:?}: {e}"))
    }
}
