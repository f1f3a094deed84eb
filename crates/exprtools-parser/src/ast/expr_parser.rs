//! Expression parsing using Pratt parsing (precedence climbing).
//!
//! This module implements expression parsing with proper operator precedence
//! and associativity using the Pratt parsing algorithm. Lambdas, casts and
//! generic names need more than one token of lookahead; those are decided
//! by scanning ahead or by a speculative parse that rewinds on failure.

use super::parser::Parser;
use crate::ast::expr::*;
use crate::ast::ops::{CONDITIONAL_BP, POSTFIX_BP};
use crate::ast::types::TypeExpr;
use crate::ast::{BinaryOp, Ident, ParseError, ParseErrorKind, UnaryOp};
use crate::lexer::{Token, TokenKind};

impl<'ast> Parser<'ast> {
    /// Parse an expression with a minimum binding power.
    ///
    /// This is the core of the Pratt parser. It handles operator precedence
    /// by only consuming operators with sufficient binding power.
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<&'ast Expr<'ast>, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let token = *self.peek();
            match token.kind {
                TokenKind::Dot => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    lhs = self.parse_member_access(lhs)?;
                }
                TokenKind::LeftParen => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    lhs = self.parse_call(lhs)?;
                }
                TokenKind::LeftBracket => {
                    if POSTFIX_BP < min_bp {
                        break;
                    }
                    lhs = self.parse_index(lhs)?;
                }
                TokenKind::Question => {
                    if CONDITIONAL_BP < min_bp {
                        break;
                    }
                    lhs = self.parse_conditional(lhs)?;
                }
                kind if kind.is_unsupported_operator() => {
                    return Err(unsupported_operator(&token));
                }
                kind => {
                    let Some(op) = BinaryOp::from_token(kind) else {
                        break;
                    };
                    let (l_bp, r_bp) = op.binding_power();
                    if l_bp < min_bp {
                        break;
                    }
                    self.advance();
                    let rhs = self.parse_expr(r_bp)?;
                    let span = lhs.span().merge(rhs.span());
                    lhs = self.arena.alloc(Expr::Binary(self.arena.alloc(BinaryExpr {
                        left: lhs,
                        op,
                        right: rhs,
                        span,
                    })));
                }
            }
        }

        Ok(lhs)
    }

    /// Parse a prefix expression (the start of an expression).
    fn parse_prefix(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let token = *self.peek();

        match token.kind {
            kind if kind.is_literal() => {
                self.advance();
                let kind = parse_literal(&token, self.arena)?;
                Ok(self.arena.alloc(Expr::Literal(LiteralExpr {
                    kind,
                    span: token.span,
                })))
            }

            TokenKind::Identifier if self.peek_nth(1).kind == TokenKind::Arrow => {
                self.parse_simple_lambda()
            }

            TokenKind::Identifier => {
                self.advance();
                let type_args = self.try_parse_expr_type_args().unwrap_or(&[]);
                Ok(self.arena.alloc(Expr::Ident(IdentExpr {
                    ident: Ident::new(token.lexeme, token.span),
                    type_args,
                    span: token.span.merge(self.previous_span()),
                })))
            }

            // Receiver of a static member, `int.MaxValue`
            TokenKind::TypeKeyword => {
                self.advance();
                Ok(self
                    .arena
                    .alloc(Expr::PredefinedType(Ident::new(token.lexeme, token.span))))
            }

            TokenKind::LeftParen => {
                if self.is_parenthesized_lambda() {
                    return self.parse_parenthesized_lambda();
                }
                if let Some(cast) = self.try_parse_cast()? {
                    return Ok(cast);
                }
                let start_span = self.advance().span;
                let expr = self.parse_expr(0)?;
                let end_span = self.expect(TokenKind::RightParen)?.span;
                Ok(self.arena.alloc(Expr::Paren(self.arena.alloc(ParenExpr {
                    expr,
                    span: start_span.merge(end_span),
                }))))
            }

            TokenKind::New => self.parse_new(),

            kind => {
                if let Some(op) = UnaryOp::from_token(kind) {
                    self.advance();
                    let operand = self.parse_expr(UnaryOp::binding_power())?;
                    let span = token.span.merge(operand.span());
                    return Ok(self.arena.alloc(Expr::Unary(self.arena.alloc(UnaryExpr {
                        op,
                        operand,
                        span,
                    }))));
                }
                if kind.is_unsupported_operator() {
                    return Err(unsupported_operator(&token));
                }
                Err(ParseError::new(
                    ParseErrorKind::ExpectedExpression,
                    token.span,
                    format!("expected expression, found {}", token.kind),
                ))
            }
        }
    }

    // =========================================
    // Lambdas
    // =========================================

    /// `x => body`
    fn parse_simple_lambda(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let name_token = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Arrow)?;
        let name = Ident::new(name_token.lexeme, name_token.span);
        let params = self.arena.alloc_slice_copy(&[LambdaParam {
            ty: None,
            name,
            span: name_token.span,
        }]);
        let body = self.parse_expr(0)?;
        Ok(self.arena.alloc(Expr::Lambda(self.arena.alloc(LambdaExpr {
            params,
            body,
            parenthesized: false,
            span: name_token.span.merge(body.span()),
        }))))
    }

    /// `(a, b) => body`, `(int a) => body`, `() => body`
    fn parse_parenthesized_lambda(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::LeftParen)?.span;

        let mut params = bumpalo::collections::Vec::new_in(self.arena);
        if !self.check(TokenKind::RightParen) {
            params.push(self.parse_lambda_param()?);
            while self.eat(TokenKind::Comma).is_some() {
                params.push(self.parse_lambda_param()?);
            }
        }
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Arrow)?;

        let body = self.parse_expr(0)?;
        Ok(self.arena.alloc(Expr::Lambda(self.arena.alloc(LambdaExpr {
            params: params.into_bump_slice(),
            body,
            parenthesized: true,
            span: start_span.merge(body.span()),
        }))))
    }

    /// Parse a lambda parameter: a bare name, or a type followed by a name.
    fn parse_lambda_param(&mut self) -> Result<LambdaParam<'ast>, ParseError> {
        let start_span = self.peek().span;

        let untyped = self.check(TokenKind::Identifier)
            && matches!(
                self.peek_nth(1).kind,
                TokenKind::Comma | TokenKind::RightParen
            );
        let ty = if untyped { None } else { Some(self.parse_type()?) };

        let name_token = self.expect(TokenKind::Identifier)?;
        Ok(LambdaParam {
            ty,
            name: Ident::new(name_token.lexeme, name_token.span),
            span: start_span.merge(name_token.span),
        })
    }

    /// Whether the `(` at the current position opens a lambda parameter
    /// list: its matching `)` is followed by `=>`.
    fn is_parenthesized_lambda(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            match self.peek_nth(n).kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.peek_nth(n + 1).kind == TokenKind::Arrow;
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            n += 1;
        }
    }

    // =========================================
    // Casts and creation
    // =========================================

    /// Speculatively parse `(Type)operand`.
    ///
    /// The parenthesized text must parse as a type and be followed by a
    /// token that can start an operand. Predefined types accept any operand
    /// start; other names exclude `+` and `-`, so `(a) - b` stays a
    /// subtraction.
    fn try_parse_cast(&mut self) -> Result<Option<&'ast Expr<'ast>>, ParseError> {
        let checkpoint = self.checkpoint();
        let start_span = self.advance().span;

        let target_type = match self.parse_type() {
            Ok(ty) if self.check(TokenKind::RightParen) => ty,
            _ => {
                self.rewind(checkpoint);
                return Ok(None);
            }
        };
        self.advance();

        if !self.can_start_cast_operand(&target_type) {
            self.rewind(checkpoint);
            return Ok(None);
        }

        let operand = self.parse_expr(UnaryOp::binding_power())?;
        Ok(Some(self.arena.alloc(Expr::Cast(self.arena.alloc(CastExpr {
            target_type,
            operand,
            span: start_span.merge(operand.span()),
        })))))
    }

    fn can_start_cast_operand(&self, target_type: &TypeExpr<'ast>) -> bool {
        let kind = self.peek().kind;
        match kind {
            TokenKind::Identifier
            | TokenKind::TypeKeyword
            | TokenKind::LeftParen
            | TokenKind::New
            | TokenKind::Bang => true,
            TokenKind::Plus | TokenKind::Minus => {
                matches!(target_type, TypeExpr::Predefined(_))
            }
            kind => kind.is_literal(),
        }
    }

    /// `new T(args)`, `new T[] { items }` or `new[] { items }`.
    fn parse_new(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::New)?.span;

        if self.eat(TokenKind::LeftBracket).is_some() {
            self.expect(TokenKind::RightBracket)?;
            let items = self.parse_array_initializer()?;
            return Ok(self.arena.alloc(Expr::NewArray(self.arena.alloc(NewArrayExpr {
                element_type: None,
                items,
                span: start_span.merge(self.previous_span()),
            }))));
        }

        let ty = self.parse_type()?;

        if self.check(TokenKind::LeftParen) {
            let args = self.parse_arguments(TokenKind::LeftParen, TokenKind::RightParen)?;
            return Ok(self.arena.alloc(Expr::New(self.arena.alloc(NewExpr {
                ty,
                args,
                span: start_span.merge(self.previous_span()),
            }))));
        }

        if let TypeExpr::Array(array) = ty {
            let items = self.parse_array_initializer()?;
            return Ok(self.arena.alloc(Expr::NewArray(self.arena.alloc(NewArrayExpr {
                element_type: Some(array.element),
                items,
                span: start_span.merge(self.previous_span()),
            }))));
        }

        let found = self.peek();
        let message = if found.kind == TokenKind::LeftBracket {
            "array sizes are not supported, use an initializer: new T[] { ... }".to_string()
        } else {
            format!("expected '(' after type in object creation, found {}", found.kind)
        };
        Err(ParseError::new(ParseErrorKind::ExpectedToken, found.span, message))
    }

    /// `{ e1, e2, }` with an optional trailing comma.
    fn parse_array_initializer(&mut self) -> Result<&'ast [&'ast Expr<'ast>], ParseError> {
        self.expect(TokenKind::LeftBrace)?;
        let mut items = bumpalo::collections::Vec::new_in(self.arena);
        if !self.check(TokenKind::RightBrace) {
            items.push(self.parse_expr(0)?);
            while self.eat(TokenKind::Comma).is_some() {
                if self.check(TokenKind::RightBrace) {
                    break;
                }
                items.push(self.parse_expr(0)?);
            }
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(items.into_bump_slice())
    }

    // =========================================
    // Postfix
    // =========================================

    /// Parse member access (dot operator).
    fn parse_member_access(
        &mut self,
        object: &'ast Expr<'ast>,
    ) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::Dot)?;
        let member_token = self.expect(TokenKind::Identifier)?;
        let type_args = self.try_parse_expr_type_args().unwrap_or(&[]);
        let span = object.span().merge(self.previous_span());

        Ok(self.arena.alloc(Expr::Member(self.arena.alloc(MemberExpr {
            object,
            member: Ident::new(member_token.lexeme, member_token.span),
            type_args,
            span,
        }))))
    }

    /// Parse function call.
    fn parse_call(&mut self, callee: &'ast Expr<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        let args = self.parse_arguments(TokenKind::LeftParen, TokenKind::RightParen)?;
        let span = callee.span().merge(self.previous_span());

        Ok(self.arena.alloc(Expr::Call(self.arena.alloc(CallExpr {
            callee,
            args,
            span,
        }))))
    }

    /// Parse element access.
    fn parse_index(&mut self, object: &'ast Expr<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        let args = self.parse_arguments(TokenKind::LeftBracket, TokenKind::RightBracket)?;
        if args.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedExpression,
                self.previous_span(),
                "element access needs at least one index",
            ));
        }
        let span = object.span().merge(self.previous_span());

        Ok(self.arena.alloc(Expr::Index(self.arena.alloc(IndexExpr {
            object,
            args,
            span,
        }))))
    }

    /// Parse a delimited, comma-separated argument list.
    fn parse_arguments(
        &mut self,
        open: TokenKind,
        close: TokenKind,
    ) -> Result<&'ast [Argument<'ast>], ParseError> {
        self.expect(open)?;
        let mut args = bumpalo::collections::Vec::new_in(self.arena);
        if !self.check(close) {
            loop {
                let value = self.parse_expr(0)?;
                args.push(Argument {
                    value,
                    span: value.span(),
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(close)?;
        Ok(args.into_bump_slice())
    }

    /// Parse conditional (condition ? then : else).
    fn parse_conditional(
        &mut self,
        condition: &'ast Expr<'ast>,
    ) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::Question)?;
        let then_expr = self.parse_expr(0)?;
        self.expect(TokenKind::Colon)?;
        let else_expr = self.parse_expr(CONDITIONAL_BP)?;
        let span = condition.span().merge(else_expr.span());

        Ok(self
            .arena
            .alloc(Expr::Conditional(self.arena.alloc(ConditionalExpr {
                condition,
                then_expr,
                else_expr,
                span,
            }))))
    }
}

// =========================================
// Literals
// =========================================

fn unsupported_operator(token: &Token<'_>) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnsupportedOperator,
        token.span,
        token.lexeme.to_string(),
    )
}

fn parse_literal<'ast>(
    token: &Token<'ast>,
    arena: &'ast bumpalo::Bump,
) -> Result<LiteralKind<'ast>, ParseError> {
    Ok(match token.kind {
        TokenKind::True => LiteralKind::Bool(true),
        TokenKind::False => LiteralKind::Bool(false),
        TokenKind::Null => LiteralKind::Null,
        TokenKind::IntLiteral => parse_int_literal(token)?,
        TokenKind::RealLiteral => parse_real_literal(token)?,
        TokenKind::StringLiteral => {
            let text = match token.lexeme.strip_prefix('@') {
                Some(verbatim) => unquote(verbatim).replace("\"\"", "\""),
                None => unescape(unquote(token.lexeme), token)?,
            };
            LiteralKind::String(arena.alloc_str(&text))
        }
        TokenKind::CharLiteral => {
            let text = unescape(unquote(token.lexeme), token)?;
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => LiteralKind::Char(c),
                _ => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedChar,
                        token.span,
                        "char literal must hold exactly one character",
                    ));
                }
            }
        }
        other => {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedExpression,
                token.span,
                format!("expected literal, found {}", other),
            ));
        }
    })
}

fn invalid_number(token: &Token<'_>, message: &str) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidNumber,
        token.span,
        format!("{}: {}", message, token.lexeme),
    )
}

fn parse_int_literal<'ast>(token: &Token<'ast>) -> Result<LiteralKind<'ast>, ParseError> {
    let lexeme = token.lexeme;
    let (body, radix) = match lexeme
        .strip_prefix("0x")
        .or_else(|| lexeme.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (lexeme, 10),
    };

    let digits_end = if radix == 16 {
        body.trim_end_matches(['u', 'U', 'l', 'L']).len()
    } else {
        body.trim_end_matches(|c: char| c.is_ascii_alphabetic()).len()
    };
    let (digits, suffix) = body.split_at(digits_end);

    let suffix = match suffix.to_ascii_lowercase().as_str() {
        "" => IntSuffix::None,
        "l" => IntSuffix::Long,
        "u" => IntSuffix::Unsigned,
        "ul" | "lu" => IntSuffix::UnsignedLong,
        _ => return Err(invalid_number(token, "invalid integer suffix")),
    };

    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    let value = u64::from_str_radix(&digits, radix)
        .map_err(|_| invalid_number(token, "integer literal is out of range"))?;
    Ok(LiteralKind::Int { value, suffix })
}

fn parse_real_literal<'ast>(token: &Token<'ast>) -> Result<LiteralKind<'ast>, ParseError> {
    let lexeme = token.lexeme;
    let digits_end = lexeme
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .len();
    let (digits, suffix) = lexeme.split_at(digits_end);

    let suffix = match suffix {
        "" => RealSuffix::None,
        "f" | "F" => RealSuffix::Float,
        "d" | "D" => RealSuffix::Double,
        "m" | "M" => RealSuffix::Decimal,
        _ => return Err(invalid_number(token, "invalid real suffix")),
    };

    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    let value = digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid_number(token, "real literal is out of range"))?;
    Ok(LiteralKind::Real { value, suffix })
}

/// Strip the surrounding quote characters.
fn unquote(lexeme: &str) -> &str {
    let inner = lexeme.get(1..).unwrap_or("");
    inner.get(..inner.len().saturating_sub(1)).unwrap_or("")
}

/// Process backslash escapes.
fn unescape(text: &str, token: &Token<'_>) -> Result<String, ParseError> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('\'') => '\'',
            Some('"') => '"',
            Some('\\') => '\\',
            Some('0') => '\0',
            Some('a') => '\u{7}',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('v') => '\u{b}',
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        ParseError::new(
                            ParseErrorKind::InvalidEscape,
                            token.span,
                            format!("invalid unicode escape '\\u{}'", hex),
                        )
                    })?
            }
            other => {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidEscape,
                    token.span,
                    format!("unknown escape '\\{}'", other.map(String::from).unwrap_or_default()),
                ));
            }
        };
        result.push(escaped);
    }

    Ok(result)
}
