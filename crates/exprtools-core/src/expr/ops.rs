//! Operators of the typed expression tree.

use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
    /// Short-circuit `&&`.
    AndAlso,
    /// Short-circuit `||`.
    OrElse,
    /// `^` on booleans.
    ExclusiveOr,
    /// `^` on numbers.
    Power,
    /// `arr[i]` on a single-dimension array.
    ArrayIndex,
}

impl BinaryOp {
    /// The source symbol. `ArrayIndex` has no infix symbol and renders as
    /// `target[index]`.
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::AndAlso => "&&",
            BinaryOp::OrElse => "||",
            BinaryOp::ExclusiveOr | BinaryOp::Power => "^",
            BinaryOp::ArrayIndex => "[]",
        }
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Subtract
                | BinaryOp::Multiply
                | BinaryOp::Divide
                | BinaryOp::Modulo
                | BinaryOp::Power
        )
    }

    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
        )
    }

    pub const fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }

    pub const fn is_logical(self) -> bool {
        matches!(
            self,
            BinaryOp::AndAlso | BinaryOp::OrElse | BinaryOp::ExclusiveOr
        )
    }

    /// Whether the result type is `bool` regardless of operand types.
    pub const fn yields_bool(self) -> bool {
        self.is_relational() || self.is_equality() || self.is_logical()
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    UnaryPlus,
    Not,
    /// `arr.Length` on a single-dimension array.
    ArrayLength,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    /// Text written before the operand.
    pub const fn prefix(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::UnaryPlus => "+",
            UnaryOp::Not => "!",
            _ => "",
        }
    }

    /// Text written after the operand.
    pub const fn postfix(self) -> &'static str {
        match self {
            UnaryOp::ArrayLength => ".Length",
            UnaryOp::PostIncrement => "++",
            UnaryOp::PostDecrement => "--",
            _ => "",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix(), self.postfix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_and_xor_share_symbol() {
        assert_eq!(BinaryOp::Power.symbol(), "^");
        assert_eq!(BinaryOp::ExclusiveOr.symbol(), "^");
    }

    #[test]
    fn classification() {
        assert!(BinaryOp::Modulo.is_arithmetic());
        assert!(BinaryOp::LessThanOrEqual.yields_bool());
        assert!(BinaryOp::AndAlso.is_logical());
        assert!(!BinaryOp::ArrayIndex.yields_bool());
    }

    #[test]
    fn unary_affixes() {
        assert_eq!(UnaryOp::Negate.prefix(), "-");
        assert_eq!(UnaryOp::ArrayLength.postfix(), ".Length");
        assert_eq!(UnaryOp::PostIncrement.to_string(), "++");
    }
}
