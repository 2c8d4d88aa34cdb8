use std::rc::Rc;

use tracing::trace;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_SPAN, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Scanner over one source buffer.
///
/// Holds the cursor and hands out one token per `next_token` call; the
/// character under the cursor is the only lookahead it ever needs.
pub struct Lexer {
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source,
            pos: 0,
            file: file_name,
        }
    }

    pub fn at(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.at() {
            if !c.is_whitespace() {
                break;
            }
            self.advance(c);
        }
    }

    fn take_while(&mut self, predicate: fn(&char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.at() {
            if !predicate(&c) {
                break;
            }
            self.advance(c);
        }
        self.source[start..self.pos].to_string()
    }

    /// Scans the next token. Past the end of the buffer this keeps
    /// returning EOF tokens.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;
        let token = match self.at() {
            None => MK_TOKEN!(TokenKind::EOF, String::from("EOF"), MK_SPAN!(start, start, self.file)),
            Some(c) if c.is_ascii_alphabetic() => {
                let value = self.take_while(char::is_ascii_alphanumeric);
                let kind = RESERVED_LOOKUP
                    .get(value.as_str())
                    .copied()
                    .unwrap_or(TokenKind::Identifier);
                MK_TOKEN!(kind, value, MK_SPAN!(start, self.pos, self.file))
            }
            Some(c) if c.is_ascii_digit() => {
                let value = self.take_while(char::is_ascii_digit);
                MK_TOKEN!(TokenKind::Number, value, MK_SPAN!(start, self.pos, self.file))
            }
            Some(c) => {
                self.advance(c);
                let kind = TokenKind::from_punctuation(c).unwrap_or(TokenKind::Error);
                MK_TOKEN!(kind, c.to_string(), MK_SPAN!(start, self.pos, self.file))
            }
        };

        trace!(token = %token, offset = start, "scanned token");
        token
    }
}

/// Scans the whole source, ending with a single EOF token.
///
/// The first unrecognised character aborts with an `UnrecognisedToken`
/// error, the first out-of-range literal with a `NumberParseError`.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token();
        match token.kind {
            TokenKind::Error => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken { token: token.value },
                    token.span.start,
                ));
            }
            TokenKind::Number => {
                token.number()?;
                tokens.push(token);
            }
            TokenKind::EOF => {
                tokens.push(token);
                return Ok(tokens);
            }
            _ => tokens.push(token),
        }
    }
}
