//! Module - a namespace's worth of host types, ready to install.
//!
//! A [`Module`] groups [`TypeBuilder`]s under one namespace. Installing it
//! into a [`TypeRegistry`](crate::TypeRegistry) makes its types visible to
//! `resolve_type`, or, for explicit modules, only to
//! `resolve_type_in_module`.
//!
//! # Example
//!
//! ```
//! use exprtools_core::{DataType, Value};
//! use exprtools_registry::{Module, TypeBuilder};
//!
//! let module = Module::new("Sample").ty(
//!     TypeBuilder::new("Counter")
//!         .property("Count", DataType::int32(), |ctx| {
//!             ctx.set_return(1);
//!             Ok(())
//!         })
//!         .static_method("Zero", vec![], DataType::int32(), |ctx| {
//!             ctx.set_return(Value::Int32(0));
//!             Ok(())
//!         }),
//! );
//!
//! assert_eq!(module.name(), "Sample");
//! assert_eq!(module.entries().len(), 1);
//! ```

use exprtools_core::{
    CallContext, ConstructorInfo, DataType, EvalError, MemberInfo, MethodSignature, NativeFn,
    PrimitiveKind, QualifiedName,
};

use crate::TypeEntry;

/// A set of host types registered together.
#[derive(Debug, Clone)]
pub struct Module {
    namespace: Vec<String>,
    name: String,
    explicit: bool,
    entries: Vec<TypeEntry>,
}

impl Module {
    /// Create a module for a dotted namespace. The module name defaults to
    /// the namespace.
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            name: namespace.to_string(),
            explicit: false,
            entries: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Hide this module's types from implicit resolution.
    pub fn explicit(mut self) -> Self {
        self.explicit = true;
        self
    }

    /// Add a type (and any types nested in it).
    pub fn ty(mut self, builder: TypeBuilder) -> Self {
        let namespace = QualifiedName::new("", self.namespace.clone());
        builder.build(&namespace, &self.name, &mut self.entries);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Entries in declaration order; nested types follow their enclosing type.
    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<TypeEntry> {
        self.entries
    }
}

/// Fluent description of one host type.
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    name: String,
    primitive: Option<PrimitiveKind>,
    generic_arity: u8,
    properties: Vec<MemberInfo>,
    fields: Vec<MemberInfo>,
    methods: Vec<MethodSignature>,
    constructors: Vec<ConstructorInfo>,
    nested: Vec<TypeBuilder>,
    bases: Vec<DataType>,
    sequence_element: Option<DataType>,
}

impl TypeBuilder {
    /// A named host type. Generic definitions use the arity-suffixed name
    /// together with [`generic`](Self::generic), e.g. `List`1`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitive: None,
            generic_arity: 0,
            properties: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
            bases: Vec::new(),
            sequence_element: None,
        }
    }

    /// Members of a primitive, registered under its host name (`Int32`).
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self {
            primitive: Some(kind),
            ..Self::new(kind.host_name())
        }
    }

    /// Declare the number of generic parameters.
    pub fn generic(mut self, arity: u8) -> Self {
        self.generic_arity = arity;
        self
    }

    pub fn property<F>(mut self, name: &str, data_type: DataType, getter: F) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static,
    {
        self.properties.push(
            MemberInfo::property(name, DataType::void(), data_type).with_getter(NativeFn::new(getter)),
        );
        self
    }

    pub fn static_property<F>(mut self, name: &str, data_type: DataType, getter: F) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static,
    {
        self.properties.push(
            MemberInfo::property(name, DataType::void(), data_type)
                .with_static()
                .with_getter(NativeFn::new(getter)),
        );
        self
    }

    pub fn field<F>(mut self, name: &str, data_type: DataType, getter: F) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static,
    {
        self.fields.push(
            MemberInfo::field(name, DataType::void(), data_type).with_getter(NativeFn::new(getter)),
        );
        self
    }

    pub fn method<F>(mut self, name: &str, params: Vec<DataType>, return_type: DataType, invoker: F) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static,
    {
        self.methods.push(
            MethodSignature::new(name, params, return_type).with_invoker(NativeFn::new(invoker)),
        );
        self
    }

    pub fn static_method<F>(
        mut self,
        name: &str,
        params: Vec<DataType>,
        return_type: DataType,
        invoker: F,
    ) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static,
    {
        self.methods.push(
            MethodSignature::new(name, params, return_type)
                .with_static()
                .with_invoker(NativeFn::new(invoker)),
        );
        self
    }

    /// Add a prepared signature, for generic methods and sequence operations.
    pub fn signature(mut self, signature: MethodSignature) -> Self {
        self.methods.push(signature);
        self
    }

    pub fn constructor<F>(mut self, params: Vec<DataType>, invoker: F) -> Self
    where
        F: Fn(&mut CallContext) -> Result<(), EvalError> + Send + Sync + 'static,
    {
        self.constructors
            .push(ConstructorInfo::new(DataType::void(), params).with_invoker(NativeFn::new(invoker)));
        self
    }

    pub fn nested(mut self, builder: TypeBuilder) -> Self {
        self.nested.push(builder);
        self
    }

    /// Declare a base type or implemented interface.
    pub fn base(mut self, base: DataType) -> Self {
        self.bases.push(base);
        self
    }

    /// Declare the type as a sequence of `element`.
    pub fn sequence_of(mut self, element: DataType) -> Self {
        self.sequence_element = Some(element);
        self
    }

    /// The type this builder describes, with placeholders for generic
    /// parameters.
    fn data_type(&self, name: &QualifiedName) -> DataType {
        if let Some(kind) = self.primitive {
            return DataType::primitive(kind);
        }
        if self.generic_arity == 0 {
            return DataType::named(name.clone());
        }
        let params = (0..self.generic_arity).map(DataType::generic_param).collect();
        DataType::generic(name.clone(), params)
    }

    /// Flatten into entries under `parent`, stamping the declaring type on
    /// every member.
    fn build(self, parent: &QualifiedName, module: &str, out: &mut Vec<TypeEntry>) {
        let name = parent.child(self.name.as_str());
        let data_type = self.data_type(&name);

        let mut entry = TypeEntry::new(name.clone(), data_type.clone());
        entry.module = module.to_string();
        entry.generic_arity = self.generic_arity;
        entry.bases = self.bases;
        entry.sequence_element = self.sequence_element;

        for mut member in self.properties {
            member.declaring_type = data_type.clone();
            entry.properties.insert(member.name.clone(), member);
        }
        for mut member in self.fields {
            member.declaring_type = data_type.clone();
            entry.fields.insert(member.name.clone(), member);
        }
        for method in self.methods {
            let method = method.with_declaring_type(data_type.clone());
            entry.methods.entry(method.name.clone()).or_default().push(method);
        }
        for mut constructor in self.constructors {
            constructor.declaring_type = data_type.clone();
            entry.constructors.push(constructor);
        }

        let mut nested_entries = Vec::new();
        for nested in self.nested {
            let nested_name = name.child(nested.name.as_str());
            entry
                .nested
                .insert(nested.name.clone(), nested.data_type(&nested_name));
            nested.build(&name, module, &mut nested_entries);
        }

        out.push(entry);
        out.append(&mut nested_entries);
    }
}
