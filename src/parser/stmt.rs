use crate::{
    ast::ast::{
        BinaryExpr, BinaryOperator, ConditionalExpr, Expr, FunctionDefinition, FunctionSignature,
        LoopExpr, VariableExpr,
    },
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
    parser::expr::parse_expr,
    Span,
};

use super::parser::Parser;

const STMT_START: [TokenKind; 3] = [TokenKind::Identifier, TokenKind::If, TokenKind::For];

pub fn parse_stmt(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected(&STMT_START)),
    }
}

/// `assign := identifier "=" expr`
pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: name.span.start.clone(),
            end: value.get_span().end.clone(),
        },
        operator: BinaryOperator::Assign,
        left: Box::new(Expr::Variable(VariableExpr {
            name: name.value,
            span: name.span,
        })),
        right: Box::new(value),
    }))
}

/// `"{" assign* "}"`; returns the assignments and the closing brace.
fn parse_assignment_block(parser: &mut Parser) -> Result<(Vec<Expr>, Token), Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut body = vec![];
    while parser.current_token_kind() == TokenKind::Identifier {
        body.push(parse_assignment_stmt(parser)?);
    }

    let error = parser.unexpected(&[TokenKind::Identifier, TokenKind::CloseCurly]);
    let close = parser.expect_error(TokenKind::CloseCurly, Some(error))?;

    Ok((body, close))
}

/// `"if" "(" expr ")" "{" assign* "}" "else" "{" assign* "}"`
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let (then_body, _) = parse_assignment_block(parser)?;
    parser.expect(TokenKind::Else)?;
    let (else_body, close) = parse_assignment_block(parser)?;

    Ok(Expr::Conditional(ConditionalExpr {
        condition: Box::new(condition),
        then_body,
        else_body,
        span: Span {
            start,
            end: close.span.end,
        },
    }))
}

/// `"for" "(" assign "," expr ("," assign)? ")" "{" assign* "}"`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;

    parser.expect(TokenKind::OpenParen)?;
    let init = parse_assignment_stmt(parser)?;
    parser.expect(TokenKind::Comma)?;
    let condition = parse_expr(parser)?;

    let step = if parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        Some(Box::new(parse_assignment_stmt(parser)?))
    } else {
        None
    };

    let error = parser.unexpected(&[TokenKind::Comma, TokenKind::CloseParen]);
    parser.expect_error(TokenKind::CloseParen, step.is_none().then_some(error))?;

    let (body, close) = parse_assignment_block(parser)?;

    Ok(Expr::Loop(LoopExpr {
        init: Box::new(init),
        condition: Box::new(condition),
        step,
        body,
        span: Span {
            start,
            end: close.span.end,
        },
    }))
}

/// `function := identifier "(" paramList ")" "{" stmt* "return" expr "}"`
pub fn parse_fn_decl(parser: &mut Parser) -> Result<FunctionDefinition, Error> {
    let identifier = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    if parser.current_token_kind() == TokenKind::Identifier {
        parameters.push(parser.advance().value);

        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            parameters.push(parser.expect(TokenKind::Identifier)?.value);
        }
    }

    let error = if parameters.is_empty() {
        parser.unexpected(&[TokenKind::Identifier, TokenKind::CloseParen])
    } else {
        parser.unexpected(&[TokenKind::Comma, TokenKind::CloseParen])
    };
    let close_paren = parser.expect_error(TokenKind::CloseParen, Some(error))?;

    let signature = FunctionSignature {
        name: identifier.value,
        parameters,
        span: Span {
            start: identifier.span.start.clone(),
            end: close_paren.span.end,
        },
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut body = Vec::new();
    while parser
        .get_stmt_lookup()
        .contains_key(&parser.current_token_kind())
    {
        body.push(parse_stmt(parser)?);
    }

    let error = parser.unexpected(&[
        TokenKind::Identifier,
        TokenKind::If,
        TokenKind::For,
        TokenKind::Return,
    ]);
    parser.expect_error(TokenKind::Return, Some(error))?;
    body.push(parse_expr(parser)?);

    let close = parser.expect(TokenKind::CloseCurly)?;

    Ok(FunctionDefinition {
        signature,
        body,
        span: Span {
            start: identifier.span.start,
            end: close.span.end,
        },
    })
}
