use std::fmt::{Display, Formatter};

use crate::Span;

/// Binary operators. `Assign` only ever appears with a variable on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Assign,
    Add,
    Subtract,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOperator::Assign => write!(f, "="),
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
        }
    }
}

/// Number Expression
/// An integer literal.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    pub value: i32,
    pub span: Span,
}

/// Variable Expression
/// A read of a variable's current value.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpr {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub operator: BinaryOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

impl BinaryExpr {
    /// The assigned variable's name, for an assignment to a plain variable.
    pub fn assignee(&self) -> Option<&str> {
        match (self.operator, self.left.as_ref()) {
            (BinaryOperator::Assign, Expr::Variable(variable)) => Some(&variable.name),
            _ => None,
        }
    }
}

/// Conditional Expression
/// `if (condition) { ... } else { ... }`; both arms always exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub condition: Box<Expr>,
    pub then_body: Vec<Expr>,
    pub else_body: Vec<Expr>,
    pub span: Span,
}

/// Loop Expression
/// `for (init, condition, step) { ... }`. Without a step the loop variable
/// (the target of `init`) is incremented by one.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopExpr {
    pub init: Box<Expr>,
    pub condition: Box<Expr>,
    pub step: Option<Box<Expr>>,
    pub body: Vec<Expr>,
    pub span: Span,
}

/// Every node that can appear in a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberExpr),
    Variable(VariableExpr),
    Binary(BinaryExpr),
    Conditional(ConditionalExpr),
    Loop(LoopExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Number(expr) => &expr.span,
            Expr::Variable(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Conditional(expr) => &expr.span,
            Expr::Loop(expr) => &expr.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    pub parameters: Vec<String>,
    pub span: Span,
}

/// A whole program: one function whose last body entry is the returned expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub signature: FunctionSignature,
    pub body: Vec<Expr>,
    pub span: Span,
}

// S-expression rendering, used by `--emit ast` and in tests

fn write_body(f: &mut Formatter<'_>, body: &[Expr]) -> std::fmt::Result {
    write!(f, "[")?;
    for (i, expr) in body.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", expr)?;
    }
    write!(f, "]")
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Number(number) => write!(f, "{}", number.value),
            Expr::Variable(variable) => write!(f, "{}", variable.name),
            Expr::Binary(binary) => {
                write!(f, "({} {} {})", binary.operator, binary.left, binary.right)
            }
            Expr::Conditional(conditional) => {
                write!(f, "(if {} ", conditional.condition)?;
                write_body(f, &conditional.then_body)?;
                write!(f, " ")?;
                write_body(f, &conditional.else_body)?;
                write!(f, ")")
            }
            Expr::Loop(looping) => {
                write!(f, "(for {} {} ", looping.init, looping.condition)?;
                match &looping.step {
                    Some(step) => write!(f, "{} ", step)?,
                    None => write!(f, "_ ")?,
                }
                write_body(f, &looping.body)?;
                write!(f, ")")
            }
        }
    }
}

impl Display for FunctionSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.parameters.join(" "))
    }
}

impl Display for FunctionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(fn {} ", self.signature)?;
        write_body(f, &self.body)?;
        write!(f, ")")
    }
}
