//! Unit tests for the parser module.
//!
//! This module contains tests for parsing:
//! - Function signatures and bodies
//! - Expression grouping
//! - Conditionals and loops
//! - Grammar violations and their reported reasons

use crate::{
    ast::ast::{BinaryOperator, Expr},
    errors::errors::{ErrorImpl, Stage},
    lexer::tokens::TokenKind,
};

use crate::{ast::ast::VariableExpr, lexer::lexer::Lexer, Span};

use super::{
    expr::parse_binary_expr,
    parser::{parse, Parser},
};

fn parse_ok(source: &str) -> crate::ast::ast::FunctionDefinition {
    parse(source.to_string(), Some("test.lc".to_string())).unwrap()
}

fn parse_err(source: &str) -> crate::errors::errors::Error {
    parse(source.to_string(), Some("test.lc".to_string())).unwrap_err()
}

#[test]
fn test_parse_function_shape() {
    let function = parse_ok("f(a,b){return a+b}");

    assert_eq!(function.signature.name, "f");
    assert_eq!(function.signature.parameters, vec!["a", "b"]);
    assert_eq!(function.body.len(), 1);

    match &function.body[0] {
        Expr::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOperator::Add);
            assert!(matches!(binary.left.as_ref(), Expr::Variable(v) if v.name == "a"));
            assert!(matches!(binary.right.as_ref(), Expr::Variable(v) if v.name == "b"));
        }
        other => panic!("expected a binary expression, got {:?}", other),
    }
}

#[test]
fn test_parse_right_associative_chain() {
    let function = parse_ok("f(a,b,c){return a+b-c}");

    assert_eq!(function.to_string(), "(fn f(a b c) [(+ a (- b c))])");

    let Expr::Binary(outer) = &function.body[0] else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.operator, BinaryOperator::Add);
    let Expr::Binary(inner) = outer.right.as_ref() else {
        panic!("expected the right operand to be the subtraction");
    };
    assert_eq!(inner.operator, BinaryOperator::Subtract);
}

#[test]
fn test_parse_no_parameters() {
    let function = parse_ok("main(){return 42}");

    assert!(function.signature.parameters.is_empty());
    assert_eq!(function.to_string(), "(fn main() [42])");
}

#[test]
fn test_parse_assignment_statement() {
    let function = parse_ok("f(x){x=5 return x}");

    assert_eq!(function.to_string(), "(fn f(x) [(= x 5) x])");
    let Expr::Binary(assign) = &function.body[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(assign.assignee(), Some("x"));
}

#[test]
fn test_parse_if_else() {
    let function = parse_ok("f(a){if(a){x=1}else{x=2 y=x} return x}");

    assert_eq!(
        function.to_string(),
        "(fn f(a) [(if a [(= x 1)] [(= x 2) (= y x)]) x])"
    );
}

#[test]
fn test_parse_if_with_empty_arms() {
    let function = parse_ok("f(a){if(a){}else{} return a}");

    let Expr::Conditional(conditional) = &function.body[0] else {
        panic!("expected a conditional");
    };
    assert!(conditional.then_body.is_empty());
    assert!(conditional.else_body.is_empty());
}

#[test]
fn test_parse_for_loop() {
    let function = parse_ok("f(n){for(i=0,i-n,i=i+1){s=s+i} return s}");

    assert_eq!(
        function.to_string(),
        "(fn f(n) [(for (= i 0) (- i n) (= i (+ i 1)) [(= s (+ s i))]) s])"
    );
}

#[test]
fn test_parse_for_loop_without_step() {
    let function = parse_ok("f(n){for(i=0,i-n){} return n}");

    let Expr::Loop(looping) = &function.body[0] else {
        panic!("expected a loop");
    };
    assert!(looping.step.is_none());
    assert!(looping.body.is_empty());
}

#[test]
fn test_parse_spans() {
    let function = parse_ok("f(a){ if(a){x=1}else{x=2} return x}");

    assert_eq!(function.span.start.0, 0);
    assert_eq!(function.span.end.0, 35);
    assert_eq!(function.body[0].get_span().start.0, 6);
    assert_eq!(function.body[0].get_span().end.0, 25);
}

#[test]
fn test_parse_missing_return() {
    let error = parse_err("f(a){x=a}");

    assert_eq!(error.get_stage(), Stage::Parse);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedToken {
            expected: vec![
                TokenKind::Identifier,
                TokenKind::If,
                TokenKind::For,
                TokenKind::Return
            ],
            found: TokenKind::CloseCurly,
            token: "}".to_string(),
        }
    );
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_parse_missing_else() {
    let error = parse_err("f(a){if(a){x=1} return x}");

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedToken { expected, found: TokenKind::Return, .. }
            if expected == &vec![TokenKind::Else]
    ));
}

#[test]
fn test_parse_nested_control_flow_rejected() {
    let error = parse_err("f(a){if(a){if(a){x=1}else{x=2}}else{x=3} return x}");

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedToken { found: TokenKind::If, .. }
    ));
}

#[test]
fn test_parse_trailing_tokens_rejected() {
    let error = parse_err("f(){return 1} g");

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedToken { expected, found: TokenKind::Identifier, .. }
            if expected == &vec![TokenKind::EOF]
    ));
}

#[test]
fn test_parse_bad_parameter_list() {
    let error = parse_err("f(a b){return a}");

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedToken { expected, found: TokenKind::Identifier, .. }
            if expected == &vec![TokenKind::Comma, TokenKind::CloseParen]
    ));

    let error = parse_err("f(a,){return a}");
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedToken { expected, found: TokenKind::CloseParen, .. }
            if expected == &vec![TokenKind::Identifier]
    ));
}

#[test]
fn test_parse_return_needs_operand() {
    let error = parse_err("f(a){return}");

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedToken { expected, found: TokenKind::CloseCurly, .. }
            if expected == &vec![TokenKind::Identifier, TokenKind::Number]
    ));
}

#[test]
fn test_parse_unrecognised_character_is_lex_error() {
    let error = parse_err("f(a){return a*2}");

    assert_eq!(error.get_stage(), Stage::Lex);
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnrecognisedToken {
            token: "*".to_string()
        }
    );
    assert_eq!(error.get_position().0, 13);
}

#[test]
fn test_parse_number_out_of_range() {
    let error = parse_err("f(){return 2147483648}");

    assert_eq!(error.get_stage(), Stage::Lex);
    assert_eq!(error.get_error_name(), "NumberParseError");

    let function = parse_ok("f(){return 2147483647}");
    assert_eq!(function.to_string(), "(fn f() [2147483647])");
}

#[test]
fn test_parse_empty_source() {
    let error = parse_err("");

    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedToken { found: TokenKind::EOF, .. }
    ));
}

#[test]
fn test_binary_expr_requires_additive_operator() {
    let mut parser = Parser::new(Lexer::new("= b".to_string(), None));
    let left = Expr::Variable(VariableExpr {
        name: "a".to_string(),
        span: Span::null(),
    });

    let error = parse_binary_expr(&mut parser, left).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedToken {
            expected: vec![TokenKind::Plus, TokenKind::Dash],
            found: TokenKind::Assignment,
            token: "=".to_string(),
        }
    );
    assert_eq!(parser.current_token_kind(), TokenKind::Assignment);
}
