//! `System.Guid`, backed by [`uuid::Uuid`].

use exprtools_core::{DataType, EvalError, Value};
use exprtools_registry::{Module, TypeBuilder};
use uuid::Uuid;

/// Parse the hyphenated, braced or simple textual forms.
pub fn parse(text: &str) -> Result<Uuid, EvalError> {
    Uuid::parse_str(text.trim()).map_err(|e| EvalError::Native(format!("invalid Guid '{text}': {e}")))
}

/// Creates the module holding `System.Guid`.
pub fn module() -> Module {
    let guid = TypeBuilder::new("Guid")
        .static_property("Empty", DataType::guid(), |ctx| {
            ctx.set_return(Uuid::nil());
            Ok(())
        })
        .static_method("NewGuid", vec![], DataType::guid(), |ctx| {
            ctx.set_return(Uuid::new_v4());
            Ok(())
        })
        .static_method("Parse", vec![DataType::string()], DataType::guid(), |ctx| {
            let value = parse(ctx.arg_str(0)?)?;
            ctx.set_return(value);
            Ok(())
        })
        .constructor(vec![DataType::string()], |ctx| {
            let value = parse(ctx.arg_str(0)?)?;
            ctx.set_return(value);
            Ok(())
        })
        .method("ToString", vec![], DataType::string(), |ctx| {
            let text = match ctx.this()? {
                Value::Guid(id) => id.hyphenated().to_string(),
                other => return Err(EvalError::type_mismatch("Guid", other.type_name())),
            };
            ctx.set_return(text);
            Ok(())
        });

    Module::new("System").ty(guid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprtools_core::HostTypeSystem;
    use exprtools_registry::TypeRegistry;

    const TEXT: &str = "f45132ed-e1cf-4ddf-b8f9-62e660d2b4cb";

    #[test]
    fn test_parse() {
        let id = parse(TEXT).unwrap();
        assert_eq!(id.hyphenated().to_string(), TEXT);
        assert!(matches!(parse("not a guid"), Err(EvalError::Native(_))));
    }

    #[test]
    fn test_constructor() {
        let registry = TypeRegistry::with_modules([module()]).unwrap();
        let ctor = registry
            .get_constructor(&DataType::guid(), &[DataType::string()])
            .unwrap();
        assert_eq!(
            ctor.invoke(vec![Value::string(TEXT)]),
            Ok(Value::Guid(parse(TEXT).unwrap()))
        );
    }

    #[test]
    fn test_new_guid_is_random() {
        let registry = TypeRegistry::with_modules([module()]).unwrap();
        let new_guid = registry.get_method(&DataType::guid(), "NewGuid", &[]).unwrap();
        let a = new_guid.invoke(None, vec![]).unwrap();
        let b = new_guid.invoke(None, vec![]).unwrap();
        assert_ne!(a, b);

        let empty = registry.get_property(&DataType::guid(), "Empty").unwrap();
        assert_eq!(empty.get(None), Ok(Value::Guid(Uuid::nil())));
    }
}
