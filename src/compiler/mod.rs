//! Code generation module for the compiler.
//!
//! This module contains the LLVM-based code generator that lowers the
//! parsed function into LLVM IR. It handles:
//!
//! - The function prologue and the lazily built symbol table
//! - Expression lowering (loads, stores, arithmetic)
//! - Conditional and loop block construction
//! - Control-flow-graph inspection of the result

pub mod cfg;
pub mod compiler;
pub mod expr;
pub mod stmt;
