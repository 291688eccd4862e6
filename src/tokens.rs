use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Quote,
    Number,
    Symbol,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let text = match self {
            LeftParen => "'('",
            RightParen => "')'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            LeftBracket => "'['",
            RightBracket => "']'",
            Semicolon => "';'",
            Quote => "'`'",
            Number => "number",
            Symbol => "symbol",
            Eof => "end of input",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the token in the source.
    pub offset: usize,
}

fn punctuation(c: u8) -> TokenKind {
    match c {
        b'(' => TokenKind::LeftParen,
        b')' => TokenKind::RightParen,
        b'{' => TokenKind::LeftBrace,
        b'}' => TokenKind::RightBrace,
        b'[' => TokenKind::LeftBracket,
        b']' => TokenKind::RightBracket,
        b';' => TokenKind::Semicolon,
        _ => TokenKind::Quote,
    }
}

lazy_static! {
    // Leftmost-first alternation: a leading digit always starts a number.
    // An apostrophe ends a symbol but may begin one.
    static ref TOKEN_RE: Regex = Regex::new(
        r"\A[ \t\r\n]*(?:([(){}\[\];`])|([0-9]+)|([^ \t\r\n(){}\[\];`][^ \t\r\n(){}\[\];`']*))?"
    )
    .unwrap();
}

/// Produces tokens lazily, one per call, from a single source string.
pub struct Scanner<'a> {
    source: &'a str,
    position: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            finished: false,
        }
    }

    pub fn next_token(&mut self) -> Token<'a> {
        let source: &'a str = self.source;
        let rest = &source[self.position..];
        let caps = match TOKEN_RE.captures(rest) {
            Some(caps) => caps,
            None => return self.eof(),
        };
        let (group, kind) = if let Some(m) = caps.get(1) {
            (m, punctuation(m.as_str().as_bytes()[0]))
        } else if let Some(m) = caps.get(2) {
            (m, TokenKind::Number)
        } else if let Some(m) = caps.get(3) {
            (m, TokenKind::Symbol)
        } else {
            if let Some(m) = caps.get(0) {
                self.position += m.end();
            }
            return self.eof();
        };
        let token = Token {
            kind,
            text: group.as_str(),
            offset: self.position + group.start(),
        };
        self.position += group.end();
        token
    }

    fn eof(&mut self) -> Token<'a> {
        self.position = self.source.len();
        Token {
            kind: TokenKind::Eof,
            text: "",
            offset: self.position,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    /// Yields the end-of-input token once, then stops.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind == TokenKind::Eof;
        Some(token)
    }
}
