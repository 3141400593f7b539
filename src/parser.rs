//! Tokens consumed by the index manager, and a simple byte-level tokenizer
//! producing them from (SGML-like) document text.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Alpha,
    Numeric,
    XmlStartTag,
    XmlEndTag,
    Eof,
    Other,
}

/// A token: its kind and the span of the document it covers
///
/// For tags, the span is the element name only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a [u8],
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a [u8]) -> Self {
        Self { kind, lexeme }
    }

    /// True if this is a tag whose name is `name` (ASCII case insensitive)
    pub fn is_tag(&self, name: &str) -> bool {
        matches!(self.kind, TokenKind::XmlStartTag | TokenKind::XmlEndTag)
            && self.lexeme.eq_ignore_ascii_case(name.as_bytes())
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({})",
            self.kind,
            String::from_utf8_lossy(self.lexeme)
        )
    }
}

#[inline]
fn is_alpha(byte: u8) -> bool {
    // Non-ASCII bytes are kept together so that UTF-8 sequences are not split
    byte.is_ascii_alphabetic() || byte >= 0x80
}

#[inline]
fn is_tag_name(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':' | b'.')
}

/// Splits a document into tokens
pub struct Parser<'a> {
    document: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(document: &'a [u8]) -> Self {
        Self {
            document,
            position: 0,
        }
    }

    fn span_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'a [u8] {
        let document = self.document;
        let start = self.position;
        while self.position < document.len() && predicate(document[self.position]) {
            self.position += 1;
        }
        &document[start..self.position]
    }

    fn skip_past(&mut self, byte: u8) {
        match self.document[self.position..].iter().position(|&b| b == byte) {
            Some(offset) => self.position += offset + 1,
            None => self.position = self.document.len(),
        }
    }

    /// Reads a tag starting at `<`
    fn tag(&mut self) -> Token<'a> {
        let document = self.document;
        let start = self.position;
        self.position += 1;

        let kind = match self.document.get(self.position) {
            Some(b'/') => {
                self.position += 1;
                TokenKind::XmlEndTag
            }
            Some(&b) if b.is_ascii_alphabetic() => TokenKind::XmlStartTag,
            // comments, processing instructions, or a lone '<'
            _ => {
                self.skip_past(b'>');
                return Token::new(TokenKind::Other, &document[start..self.position]);
            }
        };

        let name = self.span_while(is_tag_name);
        self.skip_past(b'>');
        Token::new(kind, name)
    }

    /// Returns the next token, then `Eof` forever
    pub fn next_token(&mut self) -> Token<'a> {
        while self.position < self.document.len()
            && self.document[self.position].is_ascii_whitespace()
        {
            self.position += 1;
        }

        let Some(&byte) = self.document.get(self.position) else {
            return Token::new(TokenKind::Eof, &[]);
        };

        if byte == b'<' {
            self.tag()
        } else if is_alpha(byte) {
            Token::new(TokenKind::Alpha, self.span_while(is_alpha))
        } else if byte.is_ascii_digit() {
            Token::new(TokenKind::Numeric, self.span_while(|b| b.is_ascii_digit()))
        } else {
            let document = self.document;
            let start = self.position;
            self.position += 1;
            Token::new(TokenKind::Other, &document[start..self.position])
        }
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}
