//! `System.Collections.Generic` module: `IEnumerable<T>` and `List<T>`.
//!
//! Lists are plain [`Value::Array`]s at runtime, so every list operation
//! also works on arrays passed where a sequence is expected.

use exprtools_core::{DataType, EvalError, Value};
use exprtools_registry::{Module, TypeBuilder};

fn element() -> DataType {
    DataType::generic_param(0)
}

/// Element `index` of a list, counting from zero.
pub fn get_item(items: &[Value], index: i64) -> Result<Value, EvalError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or(EvalError::IndexOutOfRange {
            index,
            len: items.len(),
        })
}

fn list() -> TypeBuilder {
    TypeBuilder::new("List`1")
        .generic(1)
        .base(DataType::sequence_of(element()))
        .constructor(vec![], |ctx| {
            ctx.set_return(Value::array(Vec::new()));
            Ok(())
        })
        .constructor(vec![DataType::sequence_of(element())], |ctx| {
            let items = ctx.arg_array(0)?.to_vec();
            ctx.set_return(Value::array(items));
            Ok(())
        })
        .property("Count", DataType::int32(), |ctx| {
            let this = ctx.this()?;
            let items = this
                .as_array()
                .ok_or_else(|| EvalError::type_mismatch("List", this.type_name()))?;
            ctx.set_return(items.len() as i32);
            Ok(())
        })
        .method("Contains", vec![element()], DataType::bool(), |ctx| {
            let needle = ctx.arg(0)?;
            let this = ctx.this()?;
            let found = this.as_array().is_some_and(|items| items.contains(needle));
            ctx.set_return(found);
            Ok(())
        })
        // Indexer
        .method("get_Item", vec![DataType::int32()], element(), |ctx| {
            let this = ctx.this()?;
            let items = this
                .as_array()
                .ok_or_else(|| EvalError::type_mismatch("List", this.type_name()))?;
            let item = get_item(items, ctx.arg_i64(0)?)?;
            ctx.set_return(item);
            Ok(())
        })
}

/// Creates the `System.Collections.Generic` module.
pub fn module() -> Module {
    Module::new("System.Collections.Generic")
        .ty(TypeBuilder::new("IEnumerable`1").generic(1).sequence_of(element()))
        .ty(list())
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprtools_core::HostTypeSystem;
    use exprtools_registry::TypeRegistry;

    fn list_of(element: DataType) -> DataType {
        DataType::generic("System.Collections.Generic.List`1", vec![element])
    }

    #[test]
    fn test_list_is_a_sequence() {
        let registry = TypeRegistry::with_modules([module()]).unwrap();
        let doubles = list_of(DataType::double());

        assert_eq!(registry.is_sequence_of(&doubles), Some(DataType::double()));
        assert!(registry.is_assignable(&DataType::sequence_of(DataType::double()), &doubles));
        assert!(!registry.is_assignable(&DataType::sequence_of(DataType::int32()), &doubles));
    }

    #[test]
    fn test_indexer_is_bound_to_element_type() {
        let registry = TypeRegistry::with_modules([module()]).unwrap();
        let strings = list_of(DataType::string());
        let indexer = registry
            .get_method(&strings, "get_Item", &[DataType::int32()])
            .unwrap();
        assert_eq!(indexer.return_type, DataType::string());

        let list = Value::array(vec![Value::string("a"), Value::string("b")]);
        assert_eq!(
            indexer.invoke(Some(list.clone()), vec![Value::Int32(1)]),
            Ok(Value::string("b"))
        );
        assert!(matches!(
            indexer.invoke(Some(list), vec![Value::Int32(2)]),
            Err(EvalError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_copy_constructor_accepts_arrays() {
        let registry = TypeRegistry::with_modules([module()]).unwrap();
        let ints = list_of(DataType::int32());
        let ctor = registry
            .get_constructor(&ints, &[DataType::array_of(DataType::int32())])
            .unwrap();
        let list = ctor
            .invoke(vec![Value::array(vec![Value::Int32(7)])])
            .unwrap();

        let count = registry.get_property(&ints, "Count").unwrap();
        assert_eq!(count.get(Some(list)), Ok(Value::Int32(1)));
    }
}
