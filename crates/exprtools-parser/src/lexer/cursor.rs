/// A cursor over expression text that tracks position.
///
/// Provides peek/advance access by character while keeping the byte offset,
/// line and column of the next character up to date.
pub struct Cursor<'src> {
    source: &'src str,
    /// Remaining text, starting at the current position.
    rest: &'src str,
    offset: u32,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Current byte offset from start of source.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Current line number (1-indexed).
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current column number (1-indexed, byte-based).
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.rest.is_empty()
    }

    /// Peek at the current character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peek at the nth character ahead (0 = current).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    #[inline]
    pub fn check(&self, f: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    #[inline]
    pub fn check_str(&self, s: &str) -> bool {
        self.rest.starts_with(s)
    }

    /// Consume the current character, updating line/column tracking.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.rest.chars().next()?;
        let len = ch.len_utf8();
        self.rest = &self.rest[len..];
        self.offset += len as u32;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += len as u32;
        }
        Some(ch)
    }

    /// Consume if the current character matches.
    #[inline]
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while the predicate matches and return them.
    pub fn eat_while(&mut self, f: impl Fn(char) -> bool) -> &'src str {
        let start = self.offset;
        while self.check(&f) {
            self.advance();
        }
        self.slice_from(start)
    }

    /// Source text from `start` to the current position.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.offset as usize]
    }
}

/// Check if a character can start an identifier.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cursor = Cursor::new("x => 1");
        assert_eq!(cursor.peek(), Some('x'));
        assert_eq!(cursor.advance(), Some('x'));
        assert_eq!(cursor.offset(), 1);
        assert!(cursor.eat(' '));
        assert!(cursor.check_str("=>"));
        assert_eq!(cursor.peek_nth(1), Some('>'));
    }

    #[test]
    fn eat_while_and_slice() {
        let mut cursor = Cursor::new("Data2.Data3");
        let start = cursor.offset();
        assert_eq!(cursor.eat_while(is_ident_continue), "Data2");
        assert_eq!(cursor.slice_from(start), "Data2");
        assert_eq!(cursor.peek(), Some('.'));
    }

    #[test]
    fn tracks_lines_and_utf8_columns() {
        let mut cursor = Cursor::new("é\nb");
        cursor.advance();
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.column(), 3);
        cursor.advance();
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.column(), 1);
        assert_eq!(cursor.source(), "é\nb");
    }

    #[test]
    fn identifier_classes() {
        assert!(is_ident_start('_'));
        assert!(is_ident_start('d'));
        assert!(!is_ident_start('2'));
        assert!(is_ident_continue('2'));
        assert!(!is_ident_continue('.'));
    }
}
