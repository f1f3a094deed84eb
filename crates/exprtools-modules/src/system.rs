//! `System` primitives, `Object` and `Nullable<T>`.
//!
//! Primitives are registered under their host names (`System.Int32`) so
//! that `Int32.MaxValue` and `System.Double` resolve like any other type.
//! `String` members live in [`crate::string`].

use exprtools_core::{DataType, PrimitiveKind, Value};
use exprtools_registry::{Module, TypeBuilder};

fn primitive(kind: PrimitiveKind) -> TypeBuilder {
    let ty = DataType::primitive(kind);
    let builder = TypeBuilder::primitive(kind);
    match kind {
        PrimitiveKind::Int32 => builder
            .static_property("MaxValue", ty.clone(), |ctx| {
                ctx.set_return(i32::MAX);
                Ok(())
            })
            .static_property("MinValue", ty, |ctx| {
                ctx.set_return(i32::MIN);
                Ok(())
            }),
        PrimitiveKind::Int64 => builder
            .static_property("MaxValue", ty.clone(), |ctx| {
                ctx.set_return(i64::MAX);
                Ok(())
            })
            .static_property("MinValue", ty, |ctx| {
                ctx.set_return(i64::MIN);
                Ok(())
            }),
        PrimitiveKind::Double => builder
            .static_property("MaxValue", ty.clone(), |ctx| {
                ctx.set_return(f64::MAX);
                Ok(())
            })
            .static_property("MinValue", ty.clone(), |ctx| {
                ctx.set_return(f64::MIN);
                Ok(())
            })
            .static_property("NaN", ty.clone(), |ctx| {
                ctx.set_return(f64::NAN);
                Ok(())
            })
            .static_property("PositiveInfinity", ty.clone(), |ctx| {
                ctx.set_return(f64::INFINITY);
                Ok(())
            })
            .static_property("NegativeInfinity", ty, |ctx| {
                ctx.set_return(f64::NEG_INFINITY);
                Ok(())
            }),
        PrimitiveKind::Single => builder
            .static_property("NaN", ty.clone(), |ctx| {
                ctx.set_return(Value::single(f32::NAN));
                Ok(())
            })
            .static_property("PositiveInfinity", ty.clone(), |ctx| {
                ctx.set_return(Value::single(f32::INFINITY));
                Ok(())
            })
            .static_property("NegativeInfinity", ty, |ctx| {
                ctx.set_return(Value::single(f32::NEG_INFINITY));
                Ok(())
            }),
        _ => builder,
    }
}

fn nullable() -> TypeBuilder {
    TypeBuilder::new("Nullable`1")
        .generic(1)
        .property("HasValue", DataType::bool(), |ctx| {
            let has_value = !ctx.this_or_null().is_null();
            ctx.set_return(has_value);
            Ok(())
        })
        .property("Value", DataType::generic_param(0), |ctx| {
            let value = ctx.this()?.clone();
            ctx.set_return(value);
            Ok(())
        })
        .method("GetValueOrDefault", vec![DataType::generic_param(0)], DataType::generic_param(0), |ctx| {
            let value = match ctx.this_or_null() {
                Value::Null => ctx.arg(0)?.clone(),
                value => value.clone(),
            };
            ctx.set_return(value);
            Ok(())
        })
}

/// Creates the `System` module of primitives and wrappers.
pub fn module() -> Module {
    let mut module = Module::new("System");
    for kind in PrimitiveKind::ALL {
        if matches!(kind, PrimitiveKind::Void | PrimitiveKind::String) {
            continue;
        }
        module = module.ty(primitive(kind));
    }
    module.ty(nullable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprtools_core::{EvalError, HostTypeSystem};
    use exprtools_registry::TypeRegistry;

    fn registry() -> TypeRegistry {
        TypeRegistry::with_modules([module()]).unwrap()
    }

    #[test]
    fn test_primitives_resolve_by_host_name() {
        let registry = registry();
        assert_eq!(registry.resolve_type("System.Int32"), Some(DataType::int32()));
        assert_eq!(registry.resolve_type("System.Object"), Some(DataType::object()));
        assert_eq!(registry.resolve_type("System.Void"), None);

        let max = registry.get_property(&DataType::int32(), "MaxValue").unwrap();
        assert_eq!(max.get(None), Ok(Value::Int32(i32::MAX)));
    }

    #[test]
    fn test_nullable_members() {
        let registry = registry();
        let ty = DataType::int32().as_nullable();

        let has_value = registry.get_property(&ty, "HasValue").unwrap();
        assert_eq!(has_value.get(Some(Value::Null)), Ok(Value::Bool(false)));
        assert_eq!(has_value.get(Some(Value::Int32(3))), Ok(Value::Bool(true)));

        let value = registry.get_property(&ty, "Value").unwrap();
        assert_eq!(value.data_type, DataType::int32());
        assert!(matches!(
            value.get(Some(Value::Null)),
            Err(EvalError::NullReference { .. })
        ));
    }

    #[test]
    fn test_get_value_or_default() {
        let registry = registry();
        let ty = DataType::double().as_nullable();
        let method = registry
            .get_method(&ty, "GetValueOrDefault", &[DataType::double()])
            .unwrap();
        assert_eq!(
            method.invoke(Some(Value::Null), vec![Value::double(1.5)]),
            Ok(Value::double(1.5))
        );
    }
}
