use std::collections::HashMap;

use crate::{ast::ast::Expr, errors::errors::Error, lexer::tokens::TokenKind};

use super::{expr::*, parser::Parser, stmt::*};

pub type StmtHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Additive, the only binary operators
    parser.led(TokenKind::Plus, parse_binary_expr);
    parser.led(TokenKind::Dash, parse_binary_expr);

    // Literals and symbols
    parser.nud(TokenKind::Number, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);

    // Statements
    parser.stmt(TokenKind::Identifier, parse_assignment_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
