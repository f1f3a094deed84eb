//! Type parsing functions.
//!
//! Implements parsing of type expressions:
//! - Predefined keywords (`int`, `string`)
//! - Dotted names (`System.Guid`)
//! - Generic arguments (`List<int>`, `Dictionary<string, List<int>>`)
//! - Array and nullable suffixes (`int[]`, `Guid?`)

use super::parser::Parser;
use crate::ast::types::*;
use crate::ast::{Ident, ParseError, ParseErrorKind};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a complete type expression.
    ///
    /// Grammar: `(KEYWORD | NAME TYPEARGS? ('.' NAME TYPEARGS?)*) ('?' | '[' ']')*`
    pub fn parse_type(&mut self) -> Result<TypeExpr<'ast>, ParseError> {
        let mut ty = self.parse_type_base()?;

        loop {
            if self.check(TokenKind::Question) {
                let end = self.advance().span;
                ty = TypeExpr::Nullable(self.arena.alloc(NullableType {
                    inner: ty,
                    span: ty.span().merge(end),
                }));
            } else if self.check(TokenKind::LeftBracket)
                && self.peek_nth(1).kind == TokenKind::RightBracket
            {
                self.advance();
                let end = self.advance().span;
                ty = TypeExpr::Array(self.arena.alloc(ArrayType {
                    element: ty,
                    span: ty.span().merge(end),
                }));
            } else {
                break;
            }
        }

        Ok(ty)
    }

    /// Parse a type without suffixes.
    fn parse_type_base(&mut self) -> Result<TypeExpr<'ast>, ParseError> {
        let token = *self.peek();
        match token.kind {
            TokenKind::TypeKeyword => {
                self.advance();
                Ok(TypeExpr::Predefined(Ident::new(token.lexeme, token.span)))
            }
            TokenKind::Identifier => {
                let mut segments = bumpalo::collections::Vec::new_in(self.arena);
                segments.push(self.parse_name_segment()?);
                while self.check(TokenKind::Dot) && self.peek_nth(1).kind == TokenKind::Identifier {
                    self.advance();
                    segments.push(self.parse_name_segment()?);
                }
                let span = token.span.merge(self.previous_span());
                Ok(TypeExpr::Named(NamedType {
                    segments: segments.into_bump_slice(),
                    span,
                }))
            }
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedType,
                token.span,
                format!("expected type, found {}", token.kind),
            )),
        }
    }

    fn parse_name_segment(&mut self) -> Result<NameSegment<'ast>, ParseError> {
        let token = self.expect(TokenKind::Identifier)?;
        let type_args = if self.check(TokenKind::Less) {
            self.parse_type_args()?
        } else {
            &[]
        };
        Ok(NameSegment {
            ident: Ident::new(token.lexeme, token.span),
            type_args,
        })
    }

    /// Parse a generic argument list `<T1, T2>`.
    pub(super) fn parse_type_args(&mut self) -> Result<&'ast [TypeExpr<'ast>], ParseError> {
        self.expect(TokenKind::Less)?;
        let mut args = bumpalo::collections::Vec::new_in(self.arena);
        args.push(self.parse_type()?);
        while self.eat(TokenKind::Comma).is_some() {
            args.push(self.parse_type()?);
        }
        self.expect_closing_angle()?;
        Ok(args.into_bump_slice())
    }

    /// Speculatively parse generic arguments after a name in expression
    /// position. Succeeds only when the list is followed by a token that
    /// cannot continue a relational comparison; otherwise the position is
    /// restored and `None` returned.
    pub(super) fn try_parse_expr_type_args(&mut self) -> Option<&'ast [TypeExpr<'ast>]> {
        if !self.check(TokenKind::Less) {
            return None;
        }
        let checkpoint = self.checkpoint();
        match self.parse_type_args() {
            Ok(args) if self.is_type_args_follower() => Some(args),
            _ => {
                self.rewind(checkpoint);
                None
            }
        }
    }

    fn is_type_args_follower(&self) -> bool {
        use TokenKind::*;
        matches!(
            self.peek().kind,
            LeftParen
                | RightParen
                | RightBracket
                | RightBrace
                | Colon
                | Semicolon
                | Comma
                | Dot
                | Question
                | EqualEqual
                | BangEqual
                | Eof
        )
    }
}
