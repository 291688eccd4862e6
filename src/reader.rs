use crate::tokens::{Scanner, Token, TokenKind};
use crate::types::{Atom, Int};
use std::fmt;

pub type Result<T = Atom> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    UnexpectedToken {
        found: String,
        expected: Option<TokenKind>,
        offset: usize,
    },
    UnexpectedEof {
        inside: TokenKind,
    },
    MalformedInfix {
        offset: usize,
    },
    BadInteger {
        literal: String,
        offset: usize,
    },
    DanglingQuote {
        offset: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedToken {
                found,
                expected: Some(kind),
                offset,
            } => write!(f, "expected {} but found '{}' at {}", kind, found, offset),
            Error::UnexpectedToken {
                found,
                expected: None,
                offset,
            } => write!(f, "unexpected token '{}' at {}", found, offset),
            Error::UnexpectedEof { inside } => {
                write!(f, "unexpected end of input: unclosed {}", inside)
            }
            Error::MalformedInfix { offset } => write!(
                f,
                "infix form opened at {} must contain exactly three forms",
                offset
            ),
            Error::BadInteger { literal, offset } => {
                write!(f, "integer literal {} at {} is out of range", literal, offset)
            }
            Error::DanglingQuote { offset } => {
                write!(f, "quote mark at {} is not followed by a form", offset)
            }
        }
    }
}

/// Parses a whole program into `(do 'stmt1 'stmt2 ...)`.
pub fn read_str(input: &str) -> Result {
    Reader::new(input).parse_program()
}

/// One-token-lookahead recursive descent over a [`Scanner`].
pub struct Reader<'a> {
    scanner: Scanner<'a>,
    current: Token<'a>,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut scanner = Scanner::new(input);
        let current = scanner.next_token();
        Self { scanner, current }
    }

    pub fn parse_program(mut self) -> Result {
        let program = self.read_block(TokenKind::Eof)?;
        log::trace!("read program {}", program);
        Ok(program)
    }

    fn peek(&self) -> TokenKind {
        self.current.kind
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.current;
        self.current = self.scanner.next_token();
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Result<Token<'a>> {
        if self.peek() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(Some(kind)))
        }
    }

    fn unexpected(&self, expected: Option<TokenKind>) -> Error {
        Error::UnexpectedToken {
            found: self.current.text.into(),
            expected,
            offset: self.current.offset,
        }
    }

    /// Reads semicolon-separated statements up to `end`, which is consumed
    /// unless it is the end of input.
    fn read_block(&mut self, end: TokenKind) -> Result {
        let mut statements = vec![Atom::new_symbol("do")];
        while self.peek() != end {
            let offset = self.current.offset;
            let mut forms = Vec::new();
            while self.peek() != end && self.peek() != TokenKind::Semicolon {
                if self.peek() == TokenKind::Eof {
                    return Err(Error::UnexpectedEof {
                        inside: TokenKind::LeftBrace,
                    });
                }
                forms.push(self.read_form()?);
            }
            if self.peek() == TokenKind::Semicolon {
                self.advance();
            }
            statements.push(Self::statement(forms, offset));
        }
        if end != TokenKind::Eof {
            self.eat(end)?;
        }
        Ok(Atom::wrap_list(statements))
    }

    fn statement(mut forms: Vec<Atom>, offset: usize) -> Atom {
        match forms.len() {
            1 => Atom::quote(forms.remove(0)),
            n => {
                if n > 1 {
                    log::warn!(
                        "statement at {} juxtaposes {} forms without a separator; \
                         evaluating them as one call",
                        offset,
                        n
                    );
                }
                Atom::quote(Atom::wrap_list(forms))
            }
        }
    }

    fn read_form(&mut self) -> Result {
        match self.peek() {
            TokenKind::LeftParen => self.read_list(),
            TokenKind::Quote => {
                let mark = self.advance();
                if self.peek() == TokenKind::Eof {
                    return Err(Error::DanglingQuote {
                        offset: mark.offset,
                    });
                }
                self.read_form().map(Atom::quote)
            }
            TokenKind::LeftBracket => self.read_infix(),
            TokenKind::LeftBrace => {
                self.advance();
                self.read_block(TokenKind::RightBrace)
            }
            TokenKind::Symbol => Ok(Atom::new_symbol(self.advance().text)),
            TokenKind::Number => self.read_number(),
            _ => Err(self.unexpected(None)),
        }
    }

    fn read_list(&mut self) -> Result {
        self.eat(TokenKind::LeftParen)?;
        let mut elements = Vec::new();
        loop {
            match self.peek() {
                TokenKind::RightParen => break,
                TokenKind::Eof => {
                    return Err(Error::UnexpectedEof {
                        inside: TokenKind::LeftParen,
                    })
                }
                _ => elements.push(self.read_form()?),
            }
        }
        self.advance();
        Ok(Atom::wrap_list(elements))
    }

    /// `[a op b]` becomes `(op a b)`.
    fn read_infix(&mut self) -> Result {
        let open = self.eat(TokenKind::LeftBracket)?;
        let mut forms = Vec::with_capacity(3);
        while forms.len() < 3 {
            match self.peek() {
                TokenKind::RightBracket => {
                    return Err(Error::MalformedInfix {
                        offset: open.offset,
                    })
                }
                TokenKind::Eof => {
                    return Err(Error::UnexpectedEof {
                        inside: TokenKind::LeftBracket,
                    })
                }
                _ => forms.push(self.read_form()?),
            }
        }
        match self.peek() {
            TokenKind::RightBracket => self.advance(),
            TokenKind::Eof => {
                return Err(Error::UnexpectedEof {
                    inside: TokenKind::LeftBracket,
                })
            }
            _ => return Err(Error::MalformedInfix { offset: open.offset }),
        };
        forms.swap(0, 1);
        Ok(Atom::wrap_list(forms))
    }

    fn read_number(&mut self) -> Result {
        let token = self.eat(TokenKind::Number)?;
        token
            .text
            .parse::<Int>()
            .map(Atom::Number)
            .map_err(|_| Error::BadInteger {
                literal: token.text.into(),
                offset: token.offset,
            })
    }
}
