//! String members of the `System.String` primitive.
//!
//! Indices and lengths count `char`s. Culture-taking overloads accept any
//! `CultureInfo` and apply the invariant casing rules.

use exprtools_core::{CallContext, DataType, EvalError, PrimitiveKind, Value};
use exprtools_registry::{Module, TypeBuilder};

use crate::globalization::culture_info_type;

// =============================================================================
// OPERATIONS
// =============================================================================

/// Characters from `start` to the end.
pub fn substring(s: &str, start: i64) -> Result<String, EvalError> {
    let len = s.chars().count();
    let start = char_index(start, len)?;
    Ok(s.chars().skip(start).collect())
}

/// `length` characters from `start`.
pub fn substring_len(s: &str, start: i64, length: i64) -> Result<String, EvalError> {
    let len = s.chars().count();
    let start = char_index(start, len)?;
    let end = start as i64 + length;
    if length < 0 || end > len as i64 {
        return Err(EvalError::IndexOutOfRange { index: end, len });
    }
    Ok(s.chars().skip(start).take(length as usize).collect())
}

/// The character at `index`.
pub fn char_at(s: &str, index: i64) -> Result<char, EvalError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| s.chars().nth(i))
        .ok_or(EvalError::IndexOutOfRange {
            index,
            len: s.chars().count(),
        })
}

/// Character index of the first occurrence of `needle`, or -1.
pub fn index_of(s: &str, needle: &str) -> i32 {
    match s.find(needle) {
        Some(byte_index) => s[..byte_index].chars().count() as i32,
        None => -1,
    }
}

fn char_index(index: i64, len: usize) -> Result<usize, EvalError> {
    if index < 0 || index > len as i64 {
        return Err(EvalError::IndexOutOfRange { index, len });
    }
    Ok(index as usize)
}

fn string_fn(f: fn(&str) -> String) -> impl Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static {
    move |ctx| {
        let result = f(ctx.this_str()?);
        ctx.set_return(result);
        Ok(())
    }
}

fn predicate_fn(f: fn(&str, &str) -> bool) -> impl Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static {
    move |ctx| {
        let result = f(ctx.this_str()?, ctx.arg_str(0)?);
        ctx.set_return(result);
        Ok(())
    }
}

/// Creates the module holding the `System.String` members.
pub fn module() -> Module {
    let string = DataType::string;
    let int = DataType::int32;
    let boolean = DataType::bool;

    let members = TypeBuilder::primitive(PrimitiveKind::String)
        .static_property("Empty", string(), |ctx| {
            ctx.set_return("");
            Ok(())
        })
        .static_method("IsNullOrEmpty", vec![string()], boolean(), |ctx| {
            let empty = ctx.arg(0)?.as_str().is_none_or(str::is_empty);
            ctx.set_return(empty);
            Ok(())
        })
        .property("Length", int(), |ctx| {
            let len = ctx.this_str()?.chars().count() as i32;
            ctx.set_return(len);
            Ok(())
        })
        // Casing
        .method("ToUpper", vec![], string(), string_fn(str::to_uppercase))
        .method("ToUpper", vec![culture_info_type()], string(), string_fn(str::to_uppercase))
        .method("ToLower", vec![], string(), string_fn(str::to_lowercase))
        .method("ToLower", vec![culture_info_type()], string(), string_fn(str::to_lowercase))
        .method("Trim", vec![], string(), string_fn(|s| s.trim().to_string()))
        // Search
        .method("Contains", vec![string()], boolean(), predicate_fn(|s, n| s.contains(n)))
        .method("StartsWith", vec![string()], boolean(), predicate_fn(|s, n| s.starts_with(n)))
        .method("EndsWith", vec![string()], boolean(), predicate_fn(|s, n| s.ends_with(n)))
        .method("IndexOf", vec![string()], int(), |ctx| {
            let index = index_of(ctx.this_str()?, ctx.arg_str(0)?);
            ctx.set_return(index);
            Ok(())
        })
        // Substrings
        .method("Substring", vec![int()], string(), |ctx| {
            let result = substring(ctx.this_str()?, ctx.arg_i64(0)?)?;
            ctx.set_return(result);
            Ok(())
        })
        .method("Substring", vec![int(), int()], string(), |ctx| {
            let result = substring_len(ctx.this_str()?, ctx.arg_i64(0)?, ctx.arg_i64(1)?)?;
            ctx.set_return(result);
            Ok(())
        })
        // Indexer
        .method("get_Item", vec![int()], DataType::char(), |ctx| {
            let c = char_at(ctx.this_str()?, ctx.arg_i64(0)?)?;
            ctx.set_return(Value::Char(c));
            Ok(())
        });

    Module::new("System").ty(members)
}
