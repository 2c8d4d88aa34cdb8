use inkwell::values::IntValue;

use crate::{
    ast::ast::{BinaryExpr, BinaryOperator, Expr},
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compiler::{llvm, Compiler},
    stmt::{gen_conditional, gen_loop},
};

/// Generates LLVM IR for the given expression.
///
/// Returns `None` for constructs that produce no value (conditionals).
pub fn gen_expression<'a>(
    compiler: &mut Compiler<'a>,
    expression: &Expr,
) -> Result<Option<IntValue<'a>>, Error> {
    match expression {
        Expr::Number(number) => Ok(Some(
            compiler
                .context
                .i32_type()
                .const_int(number.value as u64, false),
        )),
        Expr::Variable(variable) => {
            let slot = compiler.get_or_create_slot(&variable.name)?;
            let value = llvm(compiler.builder.build_load(slot, &variable.name))?;

            Ok(Some(value.into_int_value()))
        }
        Expr::Binary(binary) => gen_binary(compiler, binary).map(Some),
        Expr::Conditional(conditional) => gen_conditional(compiler, conditional),
        Expr::Loop(looping) => gen_loop(compiler, looping),
    }
}

/// Like `gen_expression`, but the expression is an operand and must yield a value.
pub fn gen_value<'a>(compiler: &mut Compiler<'a>, expression: &Expr) -> Result<IntValue<'a>, Error> {
    match gen_expression(compiler, expression)? {
        Some(value) => Ok(value),
        None => Err(Error::new(
            ErrorImpl::NoValue {
                expression: expression.to_string(),
            },
            expression.get_span().start.clone(),
        )),
    }
}

fn gen_binary<'a>(compiler: &mut Compiler<'a>, binary: &BinaryExpr) -> Result<IntValue<'a>, Error> {
    match binary.operator {
        BinaryOperator::Assign => {
            let value = gen_value(compiler, &binary.right)?;

            let Expr::Variable(target) = binary.left.as_ref() else {
                return Err(Error::new(
                    ErrorImpl::InvalidAssignmentTarget {
                        target: binary.left.to_string(),
                    },
                    binary.left.get_span().start.clone(),
                ));
            };

            let slot = compiler.get_or_create_slot(&target.name)?;
            llvm(compiler.builder.build_store(slot, value))?;

            Ok(value)
        }
        BinaryOperator::Add => {
            let left = gen_value(compiler, &binary.left)?;
            let right = gen_value(compiler, &binary.right)?;

            llvm(compiler.builder.build_int_add(left, right, "addtmp"))
        }
        BinaryOperator::Subtract => {
            let left = gen_value(compiler, &binary.left)?;
            let right = gen_value(compiler, &binary.right)?;

            llvm(compiler.builder.build_int_sub(left, right, "subtmp"))
        }
    }
}
