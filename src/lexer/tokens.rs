use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span,
};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("for", TokenKind::For);
        map.insert("return", TokenKind::Return);
        map.insert("else", TokenKind::Else);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Error,
    Identifier,
    Number,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    Comma,

    Assignment, // =
    Plus,
    Dash,

    // Reserved
    If,
    For,
    Return,
    Else,
}

impl TokenKind {
    /// Maps a single punctuation character onto its token kind.
    pub fn from_punctuation(c: char) -> Option<TokenKind> {
        match c {
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            '{' => Some(TokenKind::OpenCurly),
            '}' => Some(TokenKind::CloseCurly),
            ',' => Some(TokenKind::Comma),
            '=' => Some(TokenKind::Assignment),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Dash),
            _ => None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::EOF => write!(f, "end of input"),
            TokenKind::Error => write!(f, "unrecognised character"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number => write!(f, "integer literal"),
            TokenKind::OpenParen => write!(f, "`(`"),
            TokenKind::CloseParen => write!(f, "`)`"),
            TokenKind::OpenCurly => write!(f, "`{{`"),
            TokenKind::CloseCurly => write!(f, "`}}`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::Assignment => write!(f, "`=`"),
            TokenKind::Plus => write!(f, "`+`"),
            TokenKind::Dash => write!(f, "`-`"),
            TokenKind::If => write!(f, "`if`"),
            TokenKind::For => write!(f, "`for`"),
            TokenKind::Return => write!(f, "`return`"),
            TokenKind::Else => write!(f, "`else`"),
        }
    }
}

/// A classified token; `value` holds the identifier name, the literal's
/// digits or the offending character of an error token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_payload() {
            write!(f, "{:?}({})", self.kind, self.value)
        } else {
            write!(f, "{:?}", self.kind)
        }
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    pub fn has_payload(&self) -> bool {
        self.is_one_of_many(&[TokenKind::Identifier, TokenKind::Number, TokenKind::Error])
    }

    /// The `i32` an integer literal denotes.
    ///
    /// Digits past the 32-bit signed range are a `NumberParseError`.
    pub fn number(&self) -> Result<i32, Error> {
        self.value.parse::<i32>().map_err(|_| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: self.value.clone(),
                },
                self.span.start.clone(),
            )
        })
    }
}
