use crate::{
    ast::ast::{BinaryExpr, BinaryOperator, Expr, NumberExpr, VariableExpr},
    errors::errors::Error,
    lexer::tokens::TokenKind,
    Span,
};

use super::parser::Parser;

/// `expr := (identifier | integer) (("+" | "-") expr)?`
///
/// The operator's right operand is a whole expression, so chains group to
/// the right: `a + b - c` is `a + (b - c)`.
pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected(&[TokenKind::Identifier, TokenKind::Number]));
    };

    let left = nud(parser)?;

    match parser.get_led_lookup().get(&parser.current_token_kind()).copied() {
        Some(led) => led(parser, left),
        None => Ok(left),
    }
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let value = parser.current_token().number()?;
            Ok(Expr::Number(NumberExpr {
                value,
                span: parser.advance().span,
            }))
        }
        TokenKind::Identifier => {
            let token = parser.advance();
            Ok(Expr::Variable(VariableExpr {
                name: token.value,
                span: token.span,
            }))
        }
        _ => Err(parser.unexpected(&[TokenKind::Identifier, TokenKind::Number])),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Error> {
    let operator = match parser.current_token_kind() {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Dash => BinaryOperator::Subtract,
        _ => return Err(parser.unexpected(&[TokenKind::Plus, TokenKind::Dash])),
    };
    parser.advance();

    let right = parse_expr(parser)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }))
}
