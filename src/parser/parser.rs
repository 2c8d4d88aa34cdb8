//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program entry point.
//! The parser pulls tokens from the lexer on demand and always holds exactly
//! one unconsumed token; every production is chosen by that token's kind.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for operands
//! - LED (left denotation) handlers for the binary operators

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::ast::FunctionDefinition,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
};

use super::{
    lookups::{
        create_token_lookups, LEDHandler, LEDLookup, NUDHandler, NUDLookup, StmtHandler,
        StmtLookup,
    },
    stmt::parse_fn_decl,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// Source of the tokens
    lexer: Lexer,
    /// The next unconsumed token
    current: Token,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (operand) handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (binary operator) handlers
    led_lookup: LEDLookup,
}

impl Parser {
    /// Creates a new Parser reading from `lexer`, primed with its first token.
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();

        let mut parser = Parser {
            lexer,
            current,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
        };
        create_token_lookups(&mut parser);
        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Consumes the current token, scans the next one and returns the consumed token.
    pub fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    /// Builds the error for a current token that does not fit the grammar.
    ///
    /// A lexer error token is reported as `UnrecognisedToken`, anything else
    /// as `UnexpectedToken` listing what would have been accepted.
    pub fn unexpected(&self, expected: &[TokenKind]) -> Error {
        let token = self.current_token();
        let internal = if token.kind == TokenKind::Error {
            ErrorImpl::UnrecognisedToken {
                token: token.value.clone(),
            }
        } else {
            ErrorImpl::UnexpectedToken {
                expected: expected.to_vec(),
                found: token.kind,
                token: token.value.clone(),
            }
        };

        Error::new(internal, token.span.start.clone())
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// Returns the consumed token if the current token matches.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            match error {
                Some(error) if self.current_token_kind() != TokenKind::Error => Err(error),
                _ => Err(self.unexpected(&[expected_kind])),
            }
        } else {
            Ok(self.advance())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Registers a left denotation (binary operator) handler for a token.
    pub fn led(&mut self, kind: TokenKind, led_fn: LEDHandler) {
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (operand) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Parses the single function making up a program, which must be
    /// followed by the end of input.
    pub fn parse_program(&mut self) -> Result<FunctionDefinition, Error> {
        let function = parse_fn_decl(self)?;
        self.expect(TokenKind::EOF)?;

        debug!(
            function = %function.signature.name,
            parameters = function.signature.parameters.len(),
            statements = function.body.len(),
            "parsed function"
        );

        Ok(function)
    }
}

/// Parses source text into a function definition.
///
/// This is the main entry point for parsing. Failure is immediate: the first
/// token that does not fit the grammar aborts the parse.
pub fn parse(source: String, file: Option<String>) -> Result<FunctionDefinition, Error> {
    let mut parser = Parser::new(Lexer::new(source, file));
    parser.parse_program()
}
