//! Constant folding of member accesses.
//!
//! A member read from a constant, or a static member, has a value that is
//! already known when the tree is folded. The folder reads it through the
//! member's getter and writes the value back into the tree:
//!
//! ```text
//! DateTime          new DateTime(ticks)
//! DateTimeOffset    new DateTimeOffset(ticks, new TimeSpan(offsetTicks))
//! Guid              new Guid("canonical-string")
//! Nullable<T>       null, or (Nullable<T>) of the folded T
//! sequence (!str)   new T[] { folded items }
//! anything else     Constant
//! ```
//!
//! Folding captures values: a tree folded over a host object keeps the
//! values read at folding time even if the object changes afterwards.

use exprtools_core::{DataType, Expr, HostTypeSystem, LambdaExpr, MemberExpr, Value};
use tracing::{debug, trace};

use crate::rewrite::Rewriter;

/// Fold every foldable member access of `lambda`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn fold_constants(host: &dyn HostTypeSystem, lambda: &LambdaExpr) -> LambdaExpr {
    debug!("folding constants");
    let mut folder = ConstantFolder::new(host);
    let folded = folder.rewrite_lambda(lambda);
    debug!(folded = folder.folded, "folded constants");
    folded
}

/// Folding pass. The host supplies the constructors used to rebuild
/// date, time and guid values.
pub struct ConstantFolder<'h> {
    host: &'h dyn HostTypeSystem,
    folded: usize,
}

impl<'h> ConstantFolder<'h> {
    pub fn new(host: &'h dyn HostTypeSystem) -> Self {
        Self { host, folded: 0 }
    }

    /// Number of member accesses folded so far.
    pub fn folded(&self) -> usize {
        self.folded
    }

    /// Turn a value of type `ty` into a subtree.
    pub fn wrap(&self, ty: &DataType, value: Value) -> Expr {
        if ty.is_nullable() {
            if value.is_null() {
                return Expr::null(ty.clone());
            }
            return Expr::cast(self.wrap(&ty.underlying(), value), ty.clone());
        }

        match value {
            Value::DateTime(date) => self.construct(
                ty,
                vec![Expr::constant(date.ticks, DataType::int64())],
                Value::DateTime(date),
            ),
            Value::DateTimeOffset(date) => {
                let offset = self.construct(
                    &DataType::time_span(),
                    vec![Expr::constant(date.offset.ticks, DataType::int64())],
                    Value::TimeSpan(date.offset),
                );
                self.construct(
                    ty,
                    vec![Expr::constant(date.ticks, DataType::int64()), offset],
                    Value::DateTimeOffset(date),
                )
            }
            Value::Guid(guid) => self.construct(
                ty,
                vec![Expr::constant(guid.to_string(), DataType::string())],
                Value::Guid(guid),
            ),
            Value::Array(items) if !ty.is_string() => match self.host.is_sequence_of(ty) {
                Some(element) => {
                    let items = items
                        .iter()
                        .map(|item| self.wrap(&element, item.clone()))
                        .collect();
                    Expr::new_array(element, items)
                }
                None => Expr::constant(Value::Array(items), ty.clone()),
            },
            other => Expr::constant(other, ty.clone()),
        }
    }

    /// `new ty(args)`, or the opaque constant when the host has no matching
    /// constructor.
    fn construct(&self, ty: &DataType, args: Vec<Expr>, value: Value) -> Expr {
        let arg_types: Vec<DataType> = args.iter().filter_map(|a| a.data_type().cloned()).collect();
        match self.host.get_constructor(ty, &arg_types) {
            Some(constructor) => Expr::new_object(constructor, args),
            None => {
                trace!(ty = %ty, "no constructor to rebuild folded value");
                Expr::constant(value, ty.clone())
            }
        }
    }
}

impl Rewriter for ConstantFolder<'_> {
    fn rewrite_member(&mut self, member: &MemberExpr) -> Expr {
        let target = member.target.as_deref().map(|t| self.rewrite_expr(t));
        let receiver = match &target {
            None if member.member.is_static() => Some(None),
            Some(Expr::Constant(constant)) => Some(Some(constant.value.clone())),
            _ => None,
        };
        let Some(receiver) = receiver else {
            return Expr::member(target, member.member.clone());
        };

        match member.member.get(receiver) {
            Ok(value) => {
                trace!(member = %member.member, value = %value, "folded member");
                self.folded += 1;
                self.wrap(&member.member.data_type, value)
            }
            Err(err) => {
                trace!(member = %member.member, error = %err, "member left unfolded");
                Expr::member(target, member.member.clone())
            }
        }
    }
}
