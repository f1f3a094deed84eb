//! The host type system seam.
//!
//! The semantic builder never inspects host types directly. It asks a
//! [`HostTypeSystem`] for types by name, for members and methods on a type,
//! and for assignability between types. The returned descriptions
//! ([`MemberInfo`], [`MethodSignature`], [`ConstructorInfo`]) are embedded in
//! the tree and carry the native functions the evaluator and the constant
//! folder call.

use bitflags::bitflags;

use crate::error::EvalError;
use crate::native_fn::NativeFn;
use crate::types::well_known;
use crate::value::Value;
use crate::{DataType, TypeHash, TypeKind};

bitflags! {
    /// Properties of a field or property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: u8 {
        /// Accessed without a receiver.
        const STATIC = 1 << 0;
        /// A field rather than a property.
        const FIELD = 1 << 1;
    }
}

bitflags! {
    /// Properties of a method.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodFlags: u8 {
        /// Called without a receiver.
        const STATIC = 1 << 0;
        /// Static sequence operation whose first parameter is the receiver
        /// sequence, written in source as `seq.Op(rest)`.
        const SEQUENCE_OP = 1 << 1;
    }
}

// ============================================================================
// Member Descriptions
// ============================================================================

/// A resolved field or property.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub name: String,
    pub declaring_type: DataType,
    pub data_type: DataType,
    pub flags: MemberFlags,
    /// Reads the member from a receiver (or from nothing, when static).
    pub getter: Option<NativeFn>,
}

impl MemberInfo {
    pub fn property(name: impl Into<String>, declaring_type: DataType, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            declaring_type,
            data_type,
            flags: MemberFlags::empty(),
            getter: None,
        }
    }

    pub fn field(name: impl Into<String>, declaring_type: DataType, data_type: DataType) -> Self {
        Self {
            flags: MemberFlags::FIELD,
            ..Self::property(name, declaring_type, data_type)
        }
    }

    pub fn with_static(mut self) -> Self {
        self.flags |= MemberFlags::STATIC;
        self
    }

    pub fn with_getter(mut self, getter: NativeFn) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    pub fn is_field(&self) -> bool {
        self.flags.contains(MemberFlags::FIELD)
    }

    /// Read the member value from `target`.
    pub fn get(&self, target: Option<Value>) -> Result<Value, EvalError> {
        let getter = self
            .getter
            .as_ref()
            .ok_or_else(|| EvalError::NotInvocable(self.to_string()))?;
        let receiver_required = !self.is_static() && !self.declaring_type.is_nullable();
        if receiver_required && matches!(target, None | Some(Value::Null)) {
            return Err(EvalError::NullReference {
                context: self.to_string(),
            });
        }
        getter.invoke(target, Vec::new())
    }
}

impl PartialEq for MemberInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.declaring_type == other.declaring_type
            && self.data_type == other.data_type
            && self.flags == other.flags
    }
}

impl Eq for MemberInfo {}

impl std::fmt::Display for MemberInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}

/// A resolved method, possibly a generic definition or an instantiation.
#[derive(Debug, Clone)]
pub struct MethodSignature {
    pub name: String,
    /// `None` for free functions supplied by a method resolver.
    pub declaring_type: Option<DataType>,
    pub params: Vec<DataType>,
    pub return_type: DataType,
    pub flags: MethodFlags,
    /// Number of generic parameters of the definition.
    pub generic_arity: u8,
    /// Bound generic arguments, empty for definitions and non-generic methods.
    pub generic_args: Vec<DataType>,
    pub invoker: Option<NativeFn>,
}

impl MethodSignature {
    /// An instance method with no declaring type yet.
    pub fn new(name: impl Into<String>, params: Vec<DataType>, return_type: DataType) -> Self {
        Self {
            name: name.into(),
            declaring_type: None,
            params,
            return_type,
            flags: MethodFlags::empty(),
            generic_arity: 0,
            generic_args: Vec::new(),
            invoker: None,
        }
    }

    pub fn with_declaring_type(mut self, ty: DataType) -> Self {
        self.declaring_type = Some(ty);
        self
    }

    pub fn with_static(mut self) -> Self {
        self.flags |= MethodFlags::STATIC;
        self
    }

    /// Mark as a static sequence operation.
    pub fn with_sequence_op(mut self) -> Self {
        self.flags |= MethodFlags::STATIC | MethodFlags::SEQUENCE_OP;
        self
    }

    pub fn with_generic_arity(mut self, arity: u8) -> Self {
        self.generic_arity = arity;
        self
    }

    pub fn with_invoker(mut self, invoker: NativeFn) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    pub fn is_sequence_op(&self) -> bool {
        self.flags.contains(MethodFlags::SEQUENCE_OP)
    }

    /// A generic definition whose arguments are not bound yet.
    pub fn is_generic_definition(&self) -> bool {
        self.generic_arity > 0 && self.generic_args.is_empty()
    }

    /// Bind generic arguments, substituting them through the parameter and
    /// return types.
    pub fn instantiate(&self, generic_args: &[DataType]) -> MethodSignature {
        MethodSignature {
            params: self.params.iter().map(|p| p.substitute(generic_args)).collect(),
            return_type: self.return_type.substitute(generic_args),
            generic_args: generic_args.to_vec(),
            ..self.clone()
        }
    }

    /// Identity of the name and parameter list.
    pub fn signature_hash(&self) -> TypeHash {
        let params: Vec<TypeHash> = self.params.iter().map(DataType::type_hash).collect();
        TypeHash::from_function(&self.name, &params)
    }

    /// Call the native implementation.
    pub fn invoke(&self, this: Option<Value>, args: Vec<Value>) -> Result<Value, EvalError> {
        let invoker = self
            .invoker
            .as_ref()
            .ok_or_else(|| EvalError::NotInvocable(self.name.clone()))?;
        let mut ctx = crate::CallContext::new(this, args).with_generic_args(self.generic_args.clone());
        invoker.call(&mut ctx)?;
        Ok(ctx.into_return())
    }
}

impl PartialEq for MethodSignature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.declaring_type == other.declaring_type
            && self.params == other.params
            && self.return_type == other.return_type
            && self.flags == other.flags
            && self.generic_args == other.generic_args
    }
}

impl Eq for MethodSignature {}

/// A resolved constructor.
#[derive(Debug, Clone)]
pub struct ConstructorInfo {
    pub declaring_type: DataType,
    pub params: Vec<DataType>,
    pub invoker: Option<NativeFn>,
}

impl ConstructorInfo {
    pub fn new(declaring_type: DataType, params: Vec<DataType>) -> Self {
        Self {
            declaring_type,
            params,
            invoker: None,
        }
    }

    pub fn with_invoker(mut self, invoker: NativeFn) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, EvalError> {
        let invoker = self
            .invoker
            .as_ref()
            .ok_or_else(|| EvalError::NotInvocable(format!("new {}", self.declaring_type)))?;
        invoker.invoke(None, args)
    }
}

impl PartialEq for ConstructorInfo {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type == other.declaring_type && self.params == other.params
    }
}

impl Eq for ConstructorInfo {}

// ============================================================================
// Host Type System
// ============================================================================

/// Queries the builder, inliner and folder make against host types.
///
/// Implementations must be shareable across threads; a single host is
/// consulted by concurrent builds.
pub trait HostTypeSystem: Send + Sync {
    /// Resolve a dotted type name among implicitly visible modules.
    fn resolve_type(&self, name: &str) -> Option<DataType>;

    /// Resolve a dotted type name within a named module, including modules
    /// that are only visible on request.
    fn resolve_type_in_module(&self, name: &str, module: &str) -> Option<DataType> {
        let _ = module;
        self.resolve_type(name)
    }

    fn get_property(&self, ty: &DataType, name: &str) -> Option<MemberInfo>;

    fn get_field(&self, ty: &DataType, name: &str) -> Option<MemberInfo>;

    /// All methods named `name` on `ty` (instance and static).
    fn get_methods(&self, ty: &DataType, name: &str) -> Vec<MethodSignature>;

    /// The method whose parameter types equal `arg_types` exactly.
    fn get_method(&self, ty: &DataType, name: &str, arg_types: &[DataType]) -> Option<MethodSignature> {
        self.get_methods(ty, name)
            .into_iter()
            .find(|m| !m.is_generic_definition() && m.params == arg_types)
    }

    fn get_constructor(&self, ty: &DataType, arg_types: &[DataType]) -> Option<ConstructorInfo>;

    fn get_nested_type(&self, ty: &DataType, name: &str) -> Option<DataType> {
        let _ = (ty, name);
        None
    }

    /// The element type if `ty` is an array or a sequence interface.
    fn is_sequence_of(&self, ty: &DataType) -> Option<DataType> {
        if ty.is_nullable() {
            return None;
        }
        if let Some(element) = ty.element_type() {
            return Some(element.clone());
        }
        if ty.is_named(well_known::ENUMERABLE) {
            return ty.args.first().cloned();
        }
        None
    }

    /// The underlying type if `ty` is a nullable wrapper.
    fn is_nullable_of(&self, ty: &DataType) -> Option<DataType> {
        ty.is_nullable().then(|| ty.underlying())
    }

    /// Whether a value of `source` can be passed where `target` is expected.
    fn is_assignable(&self, target: &DataType, source: &DataType) -> bool {
        default_is_assignable(self, target, source)
    }

    /// The type holding the static sequence operations.
    fn sequence_ops_type(&self) -> Option<DataType> {
        self.resolve_type_in_module(well_known::SEQUENCE_OPS, well_known::SEQUENCE_OPS_MODULE)
    }
}

/// Structural assignability shared by every host: identity, `object`,
/// nullable lifting, implicit numeric widening and array-to-sequence.
pub fn default_is_assignable<H: HostTypeSystem + ?Sized>(
    host: &H,
    target: &DataType,
    source: &DataType,
) -> bool {
    if target == source || target.is_primitive(crate::PrimitiveKind::Object) {
        return true;
    }
    if let Some(inner) = host.is_nullable_of(target) {
        let source = host.is_nullable_of(source).unwrap_or_else(|| source.clone());
        return host.is_assignable(&inner, &source);
    }
    if let (Some(to), Some(from)) = (target.primitive_kind(), source.primitive_kind()) {
        return !source.is_nullable() && from.widens_to(to);
    }
    if target.is_named(well_known::ENUMERABLE) && !source.is_nullable() {
        if let (Some(expected), Some(actual)) = (target.args.first(), host.is_sequence_of(source)) {
            return expected == &actual;
        }
    }
    matches!(target.kind, TypeKind::GenericParam(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyHost;

    impl HostTypeSystem for EmptyHost {
        fn resolve_type(&self, _name: &str) -> Option<DataType> {
            None
        }
        fn get_property(&self, _ty: &DataType, _name: &str) -> Option<MemberInfo> {
            None
        }
        fn get_field(&self, _ty: &DataType, _name: &str) -> Option<MemberInfo> {
            None
        }
        fn get_methods(&self, _ty: &DataType, _name: &str) -> Vec<MethodSignature> {
            Vec::new()
        }
        fn get_constructor(&self, _ty: &DataType, _args: &[DataType]) -> Option<ConstructorInfo> {
            None
        }
    }

    #[test]
    fn assignability_rules() {
        let host = EmptyHost;
        let int = DataType::int32();
        assert!(host.is_assignable(&int, &int));
        assert!(host.is_assignable(&DataType::object(), &DataType::string()));
        assert!(host.is_assignable(&int.as_nullable(), &int));
        assert!(host.is_assignable(&DataType::double(), &int));
        assert!(!host.is_assignable(&int, &DataType::double()));
        assert!(!host.is_assignable(&int, &int.as_nullable()));
        assert!(host.is_assignable(
            &DataType::sequence_of(int.clone()),
            &DataType::array_of(int.clone())
        ));
        assert!(!host.is_assignable(
            &DataType::sequence_of(DataType::string()),
            &DataType::array_of(int)
        ));
    }

    #[test]
    fn sequence_and_nullable_queries() {
        let host = EmptyHost;
        let ints = DataType::array_of(DataType::int32());
        assert_eq!(host.is_sequence_of(&ints), Some(DataType::int32()));
        assert_eq!(
            host.is_sequence_of(&DataType::sequence_of(DataType::string())),
            Some(DataType::string())
        );
        assert_eq!(host.is_sequence_of(&DataType::string()), None);
        assert_eq!(
            host.is_nullable_of(&DataType::guid().as_nullable()),
            Some(DataType::guid())
        );
    }

    #[test]
    fn instantiate_substitutes_generic_params() {
        let t = DataType::generic_param(0);
        let count = MethodSignature::new("Count", vec![DataType::sequence_of(t)], DataType::int32())
            .with_sequence_op()
            .with_generic_arity(1);
        assert!(count.is_generic_definition());

        let bound = count.instantiate(&[DataType::double()]);
        assert!(!bound.is_generic_definition());
        assert_eq!(bound.params, vec![DataType::sequence_of(DataType::double())]);
        assert!(bound.is_static());
        assert!(bound.is_sequence_op());
    }

    #[test]
    fn member_get_requires_receiver() {
        let getter = NativeFn::new(|ctx: &mut crate::CallContext| {
            let len = ctx.this_str()?.len() as i32;
            ctx.set_return(len);
            Ok(())
        });
        let length = MemberInfo::property("Length", DataType::string(), DataType::int32())
            .with_getter(getter);
        assert_eq!(length.get(Some(Value::string("abc"))), Ok(Value::Int32(3)));
        assert!(matches!(
            length.get(None),
            Err(EvalError::NullReference { .. })
        ));
    }
}
