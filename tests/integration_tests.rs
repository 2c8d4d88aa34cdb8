//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete compilation pipeline works correctly
//! from source code through tokenization, parsing and LLVM IR generation,
//! and that the `loopc` binary reports failures without emitting IR.

use std::{fs, path::PathBuf, process::Command};

use inkwell::context::Context;
use loopc::{
    ast::ast::{BinaryOperator, Expr},
    compiler::{
        cfg::ControlFlowGraph,
        compiler::{compile, Compiler},
    },
    errors::errors::Stage,
    lexer::{lexer::tokenize, tokens::TokenKind},
    parser::parser::parse,
};
use regex::Regex;

fn compile_source<'a>(source: &str, context: &'a Context) -> Compiler<'a> {
    let ast = parse(source.to_string(), Some("test.lc".to_string())).unwrap();
    compile(&ast, "test.lc", context).unwrap()
}

fn graph(compiler: &Compiler, name: &str) -> ControlFlowGraph {
    ControlFlowGraph::from_function(compiler.module.get_function(name).unwrap()).unwrap()
}

fn write_source(name: &str, source: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("loopc_tests");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn test_tokenize_program() {
    let tokens = tokenize(
        "f(n){for(i=0,i-n){s=s+i} return s}".to_string(),
        Some("test.lc".to_string()),
    )
    .unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::For,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::Comma,
            TokenKind::Identifier,
            TokenKind::Dash,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::CloseCurly,
            TokenKind::Return,
            TokenKind::Identifier,
            TokenKind::CloseCurly,
            TokenKind::EOF,
        ]
    );

    let empty = tokenize(String::new(), None).unwrap();
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].kind, TokenKind::EOF);
}

#[test]
fn test_parse_shape() {
    let ast = parse("f(a,b){return a+b}".to_string(), None).unwrap();

    assert_eq!(ast.signature.name, "f");
    assert_eq!(ast.signature.parameters, vec!["a", "b"]);
    assert_eq!(ast.to_string(), "(fn f(a b) [(+ a b)])");
}

#[test]
fn test_right_associativity() {
    let ast = parse("f(a,b,c){return a+b-c}".to_string(), None).unwrap();

    let Expr::Binary(add) = &ast.body[0] else {
        panic!("expected a binary expression");
    };
    assert_eq!(add.operator, BinaryOperator::Add);
    assert!(matches!(add.left.as_ref(), Expr::Variable(v) if v.name == "a"));
    assert!(matches!(
        add.right.as_ref(),
        Expr::Binary(sub) if sub.operator == BinaryOperator::Subtract
    ));

    let context = Context::create();
    let ir = compile_source("f(a,b,c){return a+b-c}", &context).print_to_string();
    let sub = ir.find("subtmp = sub").unwrap();
    let add = ir.find("addtmp = add").unwrap();
    assert!(sub < add, "the subtraction must be computed first:\n{}", ir);
}

#[test]
fn test_assignment_round_trips_through_slot() {
    let context = Context::create();
    let ir = compile_source("f(x){x=5 return x}", &context).print_to_string();

    let store = Regex::new(r"store i32 5, i32\* (%[\w.]+)").unwrap();
    let slot = &store.captures(&ir).unwrap()[1];

    let load = Regex::new(&format!(r"(%[\w.]+) = load i32, i32\* {}", regex::escape(slot))).unwrap();
    let loaded = &load.captures(&ir).unwrap()[1];

    assert!(
        ir.contains(&format!("ret i32 {}", loaded)),
        "the returned value must be the reloaded slot:\n{}",
        ir
    );
}

#[test]
fn test_conditional_merges_once() {
    let context = Context::create();
    let compiler = compile_source("f(a){if(a){x=1}else{x=2} return x}", &context);
    let cfg = graph(&compiler, "f");

    let merges: Vec<&str> = cfg
        .blocks
        .iter()
        .map(|block| block.label.as_str())
        .filter(|label| cfg.predecessors(label).len() == 2)
        .collect();
    assert_eq!(merges, vec!["ifcont"]);
    assert_eq!(cfg.predecessors("ifcont"), vec!["then", "else"]);

    let stores_in = |label: &str, value: &str| {
        cfg.block(label)
            .unwrap()
            .instructions
            .iter()
            .any(|instruction| instruction.starts_with(&format!("store i32 {},", value)))
    };
    assert!(stores_in("then", "1"));
    assert!(stores_in("else", "2"));

    let ifcont = cfg.block("ifcont").unwrap();
    assert!(ifcont.instructions.iter().any(|i| i.contains("load i32")));
    assert!(ifcont.instructions.iter().any(|i| i.starts_with("ret i32")));
}

#[test]
fn test_loop_shape() {
    let context = Context::create();
    let compiler = compile_source("f(n){for(i=0,i-n,i=i+1){s=s+i} return s}", &context);
    let cfg = graph(&compiler, "f");

    assert_eq!(
        cfg.edges(),
        vec![
            ("entry", "loop"),
            ("loop", "loop"),
            ("loop", "afterloop"),
        ]
    );

    let labels: Vec<&str> = cfg.blocks.iter().map(|block| block.label.as_str()).collect();
    let back_edges: Vec<(&str, &str)> = cfg
        .edges()
        .into_iter()
        .filter(|(from, to)| {
            let from = labels.iter().position(|label| label == from).unwrap();
            let to = labels.iter().position(|label| label == to).unwrap();
            to <= from
        })
        .collect();
    assert_eq!(back_edges, vec![("loop", "loop")]);
}

#[test]
fn test_loop_default_step() {
    let context = Context::create();
    let ir = compile_source("f(n){for(i=0,i-n){s=s+i} return s}", &context).print_to_string();

    let step = Regex::new(r"%nextvar = add i32 %[\w.]+, 1").unwrap();
    assert!(step.is_match(&ir), "missing default increment:\n{}", ir);
}

#[test]
fn test_uninitialised_read_compiles() {
    let context = Context::create();
    let compiler = compile_source("f(){x=y+1 return x}", &context);

    assert!(compiler.module.verify().is_ok());
    assert!(compiler.named_allocas.contains_key("y"));
}

#[test]
fn test_malformed_input_fails_in_parser() {
    let error = parse("f(a){x=a}".to_string(), None).unwrap_err();

    assert_eq!(error.get_stage(), Stage::Parse);
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_binary_emits_ir() {
    let path = write_source("add.lc", "add(a,b){return a+b}");

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("define i32 @add(i32 %a, i32 %b)"));
}

#[test]
fn test_binary_emits_dot() {
    let path = write_source("loop.lc", "f(n){for(i=0,i-n,i=i+1){s=s+i} return s}");

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .args(["--emit", "dot"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("digraph g {"));
    assert!(stdout.contains("\"loop\" -> \"afterloop\""));
}

#[test]
fn test_binary_parse_failure_emits_nothing() {
    let path = write_source("missing_return.lc", "f(a){x=a}");

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error: UnexpectedToken"));
}

#[test]
fn test_binary_lex_failure_exit_code() {
    let path = write_source("star.lc", "f(a){return a*2}");

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_binary_argument_count() {
    let output = Command::new(env!("CARGO_BIN_EXE_loopc")).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .args(["a.lc", "b.lc"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr).unwrap().contains("usage: loopc"));
}

#[test]
fn test_binary_writes_output_file() {
    let path = write_source("to_file.lc", "add(a,b){return a+b}");
    let out = std::env::temp_dir().join("loopc_tests").join("to_file.ll");
    let _ = fs::remove_file(&out);

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .arg("-o")
        .arg(&out)
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("define i32 @add(i32 %a, i32 %b)"));
    assert!(written.contains("ret i32 %addtmp"));
}

#[test]
fn test_binary_emits_ast() {
    let path = write_source("ast.lc", "f(a,b){return a+b}");

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .args(["--emit", "ast"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "(fn f(a b) [(+ a b)])\n"
    );
}

#[test]
fn test_binary_emits_tokens() {
    let path = write_source("tokens.lc", "f(a){return a-1}");

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .args(["--emit", "tokens"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Identifier(f)",
            "OpenParen",
            "Identifier(a)",
            "CloseParen",
            "OpenCurly",
            "Return",
            "Identifier(a)",
            "Dash",
            "Number(1)",
            "CloseCurly",
            "EOF",
        ]
    );
}

#[test]
fn test_binary_dot_marks_phi_sites() {
    let path = write_source("phi.lc", "f(a){if(a){x=1}else{x=2} return x}");

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .args(["--emit", "dot"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("ifcont:\\l  phi x\\l"));
}

#[test]
fn test_binary_error_report() {
    let path = write_source("report.lc", "f(a){x=a}");

    let output = Command::new(env!("CARGO_BIN_EXE_loopc"))
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains(
        "Error: UnexpectedToken (expected identifier, `if`, `for` or `return`, found `}`)"
    ));
    assert!(stderr.contains(&format!("-> {}", path.display())));
    assert!(stderr.contains("1 | f(a){x=a}"));
    assert!(stderr.contains("  | --------^"));
}
