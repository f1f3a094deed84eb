//! `System.Globalization` module: culture descriptors.

use exprtools_core::{DataType, HostObject, Value};
use exprtools_registry::{Module, TypeBuilder};

/// Dotted name of the culture type.
pub const CULTURE_INFO: &str = "System.Globalization.CultureInfo";

/// A named culture. The invariant culture has an empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultureInfo {
    name: String,
}

impl CultureInfo {
    pub fn invariant() -> Self {
        Self {
            name: String::new(),
        }
    }

    /// The culture named by the `LANG` environment variable
    /// (`en_US.UTF-8` becomes `en-US`), or the invariant culture.
    pub fn current() -> Self {
        std::env::var("LANG")
            .ok()
            .and_then(|lang| Self::from_locale(&lang))
            .unwrap_or_else(Self::invariant)
    }

    fn from_locale(locale: &str) -> Option<Self> {
        let tag = locale.split('.').next()?.replace('_', "-");
        if tag.is_empty() || tag == "C" || tag == "POSIX" {
            return None;
        }
        Some(Self { name: tag })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_value(self) -> Value {
        Value::Object(HostObject::new(culture_info_type(), self))
    }
}

pub fn culture_info_type() -> DataType {
    DataType::named(CULTURE_INFO)
}

/// Creates the `System.Globalization` module.
pub fn module() -> Module {
    let culture = TypeBuilder::new("CultureInfo")
        .static_property("InvariantCulture", culture_info_type(), |ctx| {
            ctx.set_return(CultureInfo::invariant().into_value());
            Ok(())
        })
        .static_property("CurrentCulture", culture_info_type(), |ctx| {
            ctx.set_return(CultureInfo::current().into_value());
            Ok(())
        })
        .property("Name", DataType::string(), |ctx| {
            let name = ctx.this_object::<CultureInfo>()?.name().to_string();
            ctx.set_return(name);
            Ok(())
        })
        .constructor(vec![DataType::string()], |ctx| {
            let name = ctx.arg_str(0)?.to_string();
            ctx.set_return(CultureInfo { name }.into_value());
            Ok(())
        });

    Module::new("System.Globalization").ty(culture)
}
