//! Lexical analysis module for the compiler.
//!
//! This module contains the scanner that converts source text into
//! classified tokens for the parser. It handles:
//!
//! - Recognition of the reserved words, identifiers and integer literals
//! - Single-character punctuation
//! - Token position tracking for error reporting
//! - Whitespace skipping

pub mod lexer;
pub mod tokens;
