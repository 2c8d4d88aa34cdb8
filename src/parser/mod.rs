//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the recursive-descent parser that turns the token
//! stream into a `FunctionDefinition`. It is LL(1): it keeps a single token
//! of lookahead, never backtracks, and aborts on the first mismatch.
//!
//! Statements are dispatched through a statement lookup table; expressions
//! use NUD (null denotation) handlers for operands and LED (left
//! denotation) handlers for `+` and `-`.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
