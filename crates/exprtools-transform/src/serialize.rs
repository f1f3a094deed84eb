//! Canonical text rendering of expression trees.
//!
//! The output is fully parenthesized so it can be parsed back without
//! relying on operator precedence:
//!
//! ```text
//! x => x + 1 * 2        x => (x + (1 * 2))
//! a => -a               a => (-(a))
//! xs => xs.Length       xs => ((xs).Length)
//! g => (Guid?)g         g => ((Nullable<Guid>)(g))
//! ```
//!
//! Type names drop namespaces listed in the [`NamespaceConfig`] and are
//! fully qualified otherwise.

use exprtools_core::{
    BinaryOp, DataType, Expr, LambdaExpr, NamespaceConfig, TypeKind, Value,
};
use tracing::debug;

/// Render `lambda` as text.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn serialize(lambda: &LambdaExpr, namespaces: &NamespaceConfig) -> String {
    let mut serializer = Serializer::new(namespaces);
    serializer.write_lambda(lambda);
    let text = serializer.finish();
    debug!(len = text.len(), "serialized lambda");
    text
}

/// Render a type name as it appears in serialized text.
pub fn type_name(ty: &DataType, namespaces: &NamespaceConfig) -> String {
    let mut serializer = Serializer::new(namespaces);
    serializer.write_type(ty);
    serializer.finish()
}

/// Text builder for one serialization.
pub struct Serializer<'c> {
    namespaces: &'c NamespaceConfig,
    out: String,
}

impl<'c> Serializer<'c> {
    pub fn new(namespaces: &'c NamespaceConfig) -> Self {
        Self {
            namespaces,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn write_lambda(&mut self, lambda: &LambdaExpr) {
        match lambda.params.as_slice() {
            [single] => self.out.push_str(&single.name),
            params => {
                self.out.push('(');
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&param.name);
                }
                self.out.push(')');
            }
        }
        self.out.push_str(" => ");
        self.write_expr(&lambda.body);
    }

    pub fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Lambda(lambda) => self.write_lambda(lambda),
            Expr::Parameter(param) => self.out.push_str(&param.name),
            Expr::Constant(constant) => self.write_value(&constant.value),
            Expr::Member(member) => {
                match &member.target {
                    Some(target) => self.write_expr(target),
                    None => self.write_type(&member.member.declaring_type),
                }
                self.out.push('.');
                self.out.push_str(&member.member.name);
            }
            Expr::Call(call) => {
                let method = &call.method;
                let args = match (&call.target, method.declaring_type.as_ref()) {
                    (None, _) if method.is_sequence_op() && !call.args.is_empty() => {
                        self.write_expr(&call.args[0]);
                        self.out.push('.');
                        &call.args[1..]
                    }
                    (Some(target), _) => {
                        self.write_expr(target);
                        self.out.push('.');
                        &call.args[..]
                    }
                    (None, Some(declaring)) => {
                        self.write_type(declaring);
                        self.out.push('.');
                        &call.args[..]
                    }
                    (None, None) => &call.args[..],
                };
                self.out.push_str(&method.name);
                if !method.generic_args.is_empty() {
                    self.write_type_args(&method.generic_args);
                }
                self.write_args(args);
            }
            Expr::Binary(binary) if binary.op == BinaryOp::ArrayIndex => {
                self.write_expr(&binary.left);
                self.out.push('[');
                self.write_expr(&binary.right);
                self.out.push(']');
            }
            Expr::Binary(binary) => {
                self.out.push('(');
                self.write_expr(&binary.left);
                self.out.push(' ');
                self.out.push_str(binary.op.symbol());
                self.out.push(' ');
                self.write_expr(&binary.right);
                self.out.push(')');
            }
            Expr::Unary(unary) => {
                self.out.push('(');
                self.out.push_str(unary.op.prefix());
                self.out.push('(');
                self.write_expr(&unary.operand);
                self.out.push(')');
                self.out.push_str(unary.op.postfix());
                self.out.push(')');
            }
            Expr::Conditional(cond) => {
                self.out.push('(');
                self.write_expr(&cond.test);
                self.out.push_str(" ? ");
                self.write_expr(&cond.if_true);
                self.out.push_str(" : ");
                self.write_expr(&cond.if_false);
                self.out.push(')');
            }
            Expr::New(new) => {
                self.out.push_str("new ");
                self.write_type(&new.constructor.declaring_type);
                self.write_args(&new.args);
            }
            Expr::NewArray(array) => {
                self.out.push_str("new ");
                self.write_type(&array.data_type);
                self.out.push_str(" {");
                for (i, item) in array.items.iter().enumerate() {
                    self.out.push_str(if i == 0 { " " } else { ", " });
                    self.write_expr(item);
                }
                self.out.push_str(" }");
            }
            Expr::Cast(cast) => {
                self.out.push_str("((");
                self.write_type(&cast.data_type);
                self.out.push_str(")(");
                self.write_expr(&cast.operand);
                self.out.push_str("))");
            }
            Expr::Index(index) => {
                self.write_expr(&index.target);
                self.out.push('[');
                self.write_list(&index.args);
                self.out.push(']');
            }
        }
    }

    fn write_args(&mut self, args: &[Expr]) {
        self.out.push('(');
        self.write_list(args);
        self.out.push(')');
    }

    fn write_list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_expr(item);
        }
    }

    fn write_value(&mut self, value: &Value) {
        match value {
            Value::String(s) => {
                self.out.push('"');
                escape_into(&mut self.out, s, '"');
                self.out.push('"');
            }
            Value::Char(c) => {
                self.out.push('\'');
                escape_into(&mut self.out, c.encode_utf8(&mut [0; 4]), '\'');
                self.out.push('\'');
            }
            Value::Single(v) => self.write_float(f64::from(v.0), "Single", "F"),
            Value::Double(v) => self.write_float(v.0, "Double", ""),
            Value::Int64(v) => self.out.push_str(&format!("{v}L")),
            Value::UInt32(v) => self.out.push_str(&format!("{v}U")),
            Value::UInt64(v) => self.out.push_str(&format!("{v}UL")),
            Value::Byte(_) | Value::SByte(_) | Value::Int16(_) | Value::UInt16(_) => {
                // No literal suffix exists for these; cast an Int32 literal.
                let kind = value.primitive_kind().map_or("Int32", |k| k.host_name());
                let widened = value.as_i64().unwrap_or_default();
                self.out.push_str(&format!("(({kind})({widened}))"));
            }
            other => self.out.push_str(&other.to_string()),
        }
    }

    /// Floating literals always carry a decimal point or exponent so they
    /// read back as floating. Non-finite values go through the static
    /// members of the host type.
    fn write_float(&mut self, v: f64, host_name: &str, suffix: &str) {
        if v.is_nan() {
            self.out.push_str(&format!("{host_name}.NaN"));
        } else if v == f64::INFINITY {
            self.out.push_str(&format!("{host_name}.PositiveInfinity"));
        } else if v == f64::NEG_INFINITY {
            self.out.push_str(&format!("{host_name}.NegativeInfinity"));
        } else if suffix.is_empty() {
            self.out.push_str(&format!("{v:?}"));
        } else {
            self.out.push_str(&format!("{:?}{suffix}", v as f32));
        }
    }

    pub fn write_type(&mut self, ty: &DataType) {
        if ty.is_nullable() {
            self.out.push_str("Nullable<");
            self.write_type(&ty.underlying());
            self.out.push('>');
            return;
        }
        match &ty.kind {
            TypeKind::Primitive(kind) => self.out.push_str(kind.host_name()),
            TypeKind::Array => {
                if let Some(element) = ty.element_type() {
                    self.write_type(element);
                }
                self.out.push_str("[]");
            }
            TypeKind::GenericParam(position) => {
                self.out.push('T');
                self.out.push_str(&position.to_string());
            }
            TypeKind::Named(name) => {
                let namespace = name.namespace_string();
                if !name.is_global() && !self.namespaces.is_default(&namespace) {
                    self.out.push_str(&namespace);
                    self.out.push('.');
                }
                self.out.push_str(name.display_name());
                if !ty.args.is_empty() {
                    self.write_type_args(&ty.args);
                }
            }
        }
    }

    fn write_type_args(&mut self, args: &[DataType]) {
        self.out.push('<');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_type(arg);
        }
        self.out.push('>');
    }
}

/// Escape backslashes, the quote character and control characters the
/// lexer reads back as escapes.
fn escape_into(out: &mut String, text: &str, quote: char) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}
