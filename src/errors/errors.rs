use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::InvalidAssignmentTarget { .. } => "InvalidAssignmentTarget",
            ErrorImpl::MissingReturnValue { .. } => "MissingReturnValue",
            ErrorImpl::NoValue { .. } => "NoValue",
            ErrorImpl::UnterminatedBlock { .. } => "UnterminatedBlock",
            ErrorImpl::VerificationFailed { .. } => "VerificationFailed",
            ErrorImpl::Builder { .. } => "Builder",
        }
    }

    /// The pipeline stage that raised the error.
    pub fn get_stage(&self) -> Stage {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } | ErrorImpl::NumberParseError { .. } => Stage::Lex,
            ErrorImpl::UnexpectedToken { .. } => Stage::Parse,
            ErrorImpl::InvalidAssignmentTarget { .. }
            | ErrorImpl::MissingReturnValue { .. }
            | ErrorImpl::NoValue { .. }
            | ErrorImpl::UnterminatedBlock { .. }
            | ErrorImpl::VerificationFailed { .. }
            | ErrorImpl::Builder { .. } => Stage::Codegen,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnexpectedToken {
                expected,
                found,
                token,
            } => match found {
                TokenKind::Identifier | TokenKind::Number | TokenKind::Error => {
                    ErrorTip::Suggestion(format!(
                        "expected {}, found {} `{}`",
                        describe_expected(expected),
                        found,
                        token
                    ))
                }
                _ => ErrorTip::Suggestion(format!(
                    "expected {}, found {}",
                    describe_expected(expected),
                    found
                )),
            },
            ErrorImpl::InvalidAssignmentTarget { target } => ErrorTip::Suggestion(format!(
                "only a variable can be assigned to, found `{}`",
                target
            )),
            ErrorImpl::MissingReturnValue { function } => ErrorTip::Suggestion(format!(
                "the last statement of `{}` does not produce a value to return",
                function
            )),
            ErrorImpl::NoValue { expression } => ErrorTip::Suggestion(format!(
                "`{}` does not produce a value and cannot be used as an operand",
                expression
            )),
            ErrorImpl::UnterminatedBlock { block } => {
                ErrorTip::Suggestion(format!("block `{}` has no terminator", block))
            }
            ErrorImpl::VerificationFailed { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::Builder { message } => ErrorTip::Suggestion(message.clone()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

impl std::error::Error for Error {}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => String::from("nothing"),
        [only] => only.to_string(),
        [init @ .., last] => format!(
            "{} or {}",
            init.iter()
                .map(|kind| kind.to_string())
                .collect::<Vec<String>>()
                .join(", "),
            last
        ),
    }
}

/// Compilation stage an error belongs to; the driver maps each to an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Codegen,
}

impl Stage {
    pub fn exit_code(&self) -> u8 {
        match self {
            Stage::Lex => 2,
            Stage::Parse => 3,
            Stage::Codegen => 4,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unexpected token {found} ({token:?}), expected one of {expected:?}")]
    UnexpectedToken {
        expected: Vec<TokenKind>,
        found: TokenKind,
        token: String,
    },
    #[error("cannot assign to {target:?}")]
    InvalidAssignmentTarget { target: String },
    #[error("function {function:?} has no value to return")]
    MissingReturnValue { function: String },
    #[error("{expression:?} produces no value")]
    NoValue { expression: String },
    #[error("block {block:?} is not terminated")]
    UnterminatedBlock { block: String },
    #[error("generated function failed verification: {message}")]
    VerificationFailed { message: String },
    #[error("llvm builder error: {message}")]
    Builder { message: String },
}
