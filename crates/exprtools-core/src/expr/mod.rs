//! The typed expression tree.
//!
//! Every node except [`LambdaExpr`] has a resolved [`DataType`]. Trees are
//! plain owned values: transforms build new trees and never mutate their
//! input, and a finished tree can be shared across threads.
//!
//! # Example
//!
//! ```
//! use exprtools_core::{BinaryOp, DataType, Expr, LambdaExpr, ParameterExpr, Value};
//!
//! // d => d > 10
//! let d = ParameterExpr::new("d", DataType::double());
//! let body = Expr::binary(
//!     BinaryOp::GreaterThan,
//!     Expr::Parameter(d.clone()),
//!     Expr::constant(Value::double(10.0), DataType::double()),
//! );
//! let lambda = LambdaExpr::new(vec![d], body);
//!
//! assert_eq!(lambda.return_type(), Some(&DataType::bool()));
//! ```

mod ops;

pub use ops::{BinaryOp, UnaryOp};

use crate::host::{ConstructorInfo, MemberInfo, MethodSignature};
use crate::value::Value;
use crate::DataType;

// ============================================================================
// Nodes
// ============================================================================

/// A lambda: parameters and a single-expression body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaExpr {
    pub params: Vec<ParameterExpr>,
    pub body: Box<Expr>,
}

impl LambdaExpr {
    pub fn new(params: Vec<ParameterExpr>, body: Expr) -> Self {
        Self {
            params,
            body: Box::new(body),
        }
    }

    /// Type of the body. `None` only when the body is itself a lambda.
    pub fn return_type(&self) -> Option<&DataType> {
        self.body.data_type()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterExpr> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn param_types(&self) -> Vec<DataType> {
        self.params.iter().map(|p| p.data_type.clone()).collect()
    }
}

/// A named, typed lambda parameter.
///
/// Parameters are matched by name within their lambda.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterExpr {
    pub name: String,
    pub data_type: DataType,
}

impl ParameterExpr {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A literal, folded value or typed null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantExpr {
    pub value: Value,
    pub data_type: DataType,
}

/// Property or field access. `target` is `None` for static members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberExpr {
    pub target: Option<Box<Expr>>,
    pub member: MemberInfo,
}

/// Method call. `target` is `None` for static methods, including sequence
/// operations whose receiver is `args[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub target: Option<Box<Expr>>,
    pub method: MethodSignature,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub data_type: DataType,
}

/// `test ? if_true : if_false`, typed as `if_true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalExpr {
    pub test: Box<Expr>,
    pub if_true: Box<Expr>,
    pub if_false: Box<Expr>,
}

/// Constructor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpr {
    pub constructor: ConstructorInfo,
    pub args: Vec<Expr>,
}

/// Array creation from a list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArrayExpr {
    pub element_type: DataType,
    pub items: Vec<Expr>,
    pub data_type: DataType,
}

/// Explicit conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastExpr {
    pub operand: Box<Expr>,
    pub data_type: DataType,
}

/// Indexer call such as `list[i]` on a non-array type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexExpr {
    pub target: Box<Expr>,
    pub indexer: MethodSignature,
    pub args: Vec<Expr>,
}

/// A node of the typed expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Lambda(LambdaExpr),
    Parameter(ParameterExpr),
    Constant(ConstantExpr),
    Member(MemberExpr),
    Call(CallExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Conditional(ConditionalExpr),
    New(NewExpr),
    NewArray(NewArrayExpr),
    Cast(CastExpr),
    Index(IndexExpr),
}

// ============================================================================
// Construction
// ============================================================================

impl Expr {
    pub fn parameter(name: impl Into<String>, data_type: DataType) -> Self {
        Expr::Parameter(ParameterExpr::new(name, data_type))
    }

    pub fn constant(value: impl Into<Value>, data_type: DataType) -> Self {
        Expr::Constant(ConstantExpr {
            value: value.into(),
            data_type,
        })
    }

    /// The default value of a reference or nullable type.
    pub fn null(data_type: DataType) -> Self {
        Expr::constant(Value::Null, data_type)
    }

    pub fn member(target: Option<Expr>, member: MemberInfo) -> Self {
        Expr::Member(MemberExpr {
            target: target.map(Box::new),
            member,
        })
    }

    pub fn call(target: Option<Expr>, method: MethodSignature, args: Vec<Expr>) -> Self {
        Expr::Call(CallExpr {
            target: target.map(Box::new),
            method,
            args,
        })
    }

    /// Binary node with the result type derived from the operator and the
    /// left operand.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let data_type = if op.yields_bool() {
            DataType::bool()
        } else if op == BinaryOp::ArrayIndex {
            left.data_type()
                .and_then(DataType::element_type)
                .cloned()
                .unwrap_or_else(DataType::object)
        } else {
            left.data_type()
                .or_else(|| right.data_type())
                .cloned()
                .unwrap_or_else(DataType::object)
        };
        Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
            data_type,
        })
    }

    /// Unary node typed from the operator and operand.
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        let data_type = match op {
            UnaryOp::ArrayLength => DataType::int32(),
            UnaryOp::Not if operand.data_type().is_none_or(DataType::is_bool) => DataType::bool(),
            _ => operand.data_type().cloned().unwrap_or_else(DataType::object),
        };
        Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
            data_type,
        })
    }

    pub fn conditional(test: Expr, if_true: Expr, if_false: Expr) -> Self {
        Expr::Conditional(ConditionalExpr {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    pub fn new_object(constructor: ConstructorInfo, args: Vec<Expr>) -> Self {
        Expr::New(NewExpr { constructor, args })
    }

    pub fn new_array(element_type: DataType, items: Vec<Expr>) -> Self {
        Expr::NewArray(NewArrayExpr {
            data_type: DataType::array_of(element_type.clone()),
            element_type,
            items,
        })
    }

    pub fn cast(operand: Expr, data_type: DataType) -> Self {
        Expr::Cast(CastExpr {
            operand: Box::new(operand),
            data_type,
        })
    }

    pub fn index(target: Expr, indexer: MethodSignature, args: Vec<Expr>) -> Self {
        Expr::Index(IndexExpr {
            target: Box::new(target),
            indexer,
            args,
        })
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// The resolved type. `None` for lambdas.
    pub fn data_type(&self) -> Option<&DataType> {
        Some(match self {
            Expr::Lambda(_) => return None,
            Expr::Parameter(p) => &p.data_type,
            Expr::Constant(c) => &c.data_type,
            Expr::Member(m) => &m.member.data_type,
            Expr::Call(c) => &c.method.return_type,
            Expr::Binary(b) => &b.data_type,
            Expr::Unary(u) => &u.data_type,
            Expr::Conditional(c) => return c.if_true.data_type(),
            Expr::New(n) => &n.constructor.declaring_type,
            Expr::NewArray(a) => &a.data_type,
            Expr::Cast(c) => &c.data_type,
            Expr::Index(i) => &i.indexer.return_type,
        })
    }

    /// Human-readable node kind for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Lambda(_) => "lambda",
            Expr::Parameter(_) => "parameter",
            Expr::Constant(_) => "constant",
            Expr::Member(_) => "member access",
            Expr::Call(_) => "method call",
            Expr::Binary(_) => "binary operator",
            Expr::Unary(_) => "unary operator",
            Expr::Conditional(_) => "conditional",
            Expr::New(_) => "constructor call",
            Expr::NewArray(_) => "array creation",
            Expr::Cast(_) => "conversion",
            Expr::Index(_) => "indexer",
        }
    }

    pub fn as_constant(&self) -> Option<&ConstantExpr> {
        match self {
            Expr::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&LambdaExpr> {
        match self {
            Expr::Lambda(l) => Some(l),
            _ => None,
        }
    }

    /// Whether any parameter reference named `name` occurs in this subtree.
    pub fn references_parameter(&self, name: &str) -> bool {
        let mut found = false;
        self.walk(&mut |e| {
            if let Expr::Parameter(p) = e {
                found |= p.name == name;
            }
        });
        found
    }

    /// Visit this node and every descendant in pre-order.
    pub fn walk(&self, f: &mut impl FnMut(&Expr)) {
        f(self);
        match self {
            Expr::Lambda(l) => l.body.walk(f),
            Expr::Parameter(_) | Expr::Constant(_) => {}
            Expr::Member(m) => {
                if let Some(target) = &m.target {
                    target.walk(f);
                }
            }
            Expr::Call(c) => {
                if let Some(target) = &c.target {
                    target.walk(f);
                }
                c.args.iter().for_each(|a| a.walk(f));
            }
            Expr::Binary(b) => {
                b.left.walk(f);
                b.right.walk(f);
            }
            Expr::Unary(u) => u.operand.walk(f),
            Expr::Conditional(c) => {
                c.test.walk(f);
                c.if_true.walk(f);
                c.if_false.walk(f);
            }
            Expr::New(n) => n.args.iter().for_each(|a| a.walk(f)),
            Expr::NewArray(a) => a.items.iter().for_each(|i| i.walk(f)),
            Expr::Cast(c) => c.operand.walk(f),
            Expr::Index(i) => {
                i.target.walk(f);
                i.args.iter().for_each(|a| a.walk(f));
            }
        }
    }
}

impl From<LambdaExpr> for Expr {
    fn from(lambda: LambdaExpr) -> Self {
        Expr::Lambda(lambda)
    }
}

impl From<ParameterExpr> for Expr {
    fn from(param: ParameterExpr) -> Self {
        Expr::Parameter(param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_result_types() {
        let x = Expr::parameter("x", DataType::double());
        let one = Expr::constant(Value::double(1.0), DataType::double());

        let sum = Expr::binary(BinaryOp::Add, x.clone(), one.clone());
        assert_eq!(sum.data_type(), Some(&DataType::double()));

        let cmp = Expr::binary(BinaryOp::GreaterThan, x, one);
        assert_eq!(cmp.data_type(), Some(&DataType::bool()));
    }

    #[test]
    fn array_index_and_length_types() {
        let arr = Expr::parameter("a", DataType::array_of(DataType::int32()));
        let first = Expr::binary(
            BinaryOp::ArrayIndex,
            arr.clone(),
            Expr::constant(0, DataType::int32()),
        );
        assert_eq!(first.data_type(), Some(&DataType::int32()));

        let len = Expr::unary(UnaryOp::ArrayLength, arr);
        assert_eq!(len.data_type(), Some(&DataType::int32()));
    }

    #[test]
    fn conditional_takes_true_branch_type() {
        let cond = Expr::conditional(
            Expr::constant(true, DataType::bool()),
            Expr::constant("a", DataType::string()),
            Expr::null(DataType::string()),
        );
        assert_eq!(cond.data_type(), Some(&DataType::string()));
    }

    #[test]
    fn lambda_has_no_type_but_body_does() {
        let p = ParameterExpr::new("s", DataType::string());
        let lambda = LambdaExpr::new(vec![p.clone()], Expr::Parameter(p));
        assert_eq!(Expr::from(lambda.clone()).data_type(), None);
        assert_eq!(lambda.return_type(), Some(&DataType::string()));
        assert!(lambda.body.references_parameter("s"));
        assert!(!lambda.body.references_parameter("t"));
    }

    #[test]
    fn walk_visits_in_pre_order() {
        let tree = Expr::binary(
            BinaryOp::Multiply,
            Expr::parameter("a", DataType::int32()),
            Expr::unary(UnaryOp::Negate, Expr::parameter("b", DataType::int32())),
        );
        let mut kinds = Vec::new();
        tree.walk(&mut |e| kinds.push(e.kind_name()));
        assert_eq!(
            kinds,
            vec!["binary operator", "parameter", "unary operator", "parameter"]
        );
    }
}
