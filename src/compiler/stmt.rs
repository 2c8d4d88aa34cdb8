use inkwell::{values::IntValue, IntPredicate};
use tracing::debug;

use crate::{
    ast::ast::{ConditionalExpr, Expr, LoopExpr},
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compiler::{llvm, Compiler},
    expr::{gen_expression, gen_value},
};

/// Generates every statement of a block in order; their values are discarded.
pub fn gen_body<'a>(compiler: &mut Compiler<'a>, body: &[Expr]) -> Result<(), Error> {
    for expr in body.iter() {
        gen_expression(compiler, expr)?;
    }

    Ok(())
}

/// Compares a value against zero: nonzero is true.
fn gen_truthiness<'a>(
    compiler: &Compiler<'a>,
    value: IntValue<'a>,
    name: &str,
) -> Result<IntValue<'a>, Error> {
    let zero = compiler.context.i32_type().const_zero();
    llvm(
        compiler
            .builder
            .build_int_compare(IntPredicate::NE, value, zero, name),
    )
}

/// `if` lowers to `then` / `else` arms that both fall into `ifcont`, where
/// generation resumes. The construct yields no value.
pub fn gen_conditional<'a>(
    compiler: &mut Compiler<'a>,
    conditional: &ConditionalExpr,
) -> Result<Option<IntValue<'a>>, Error> {
    let condition = gen_value(compiler, &conditional.condition)?;
    let condition = gen_truthiness(compiler, condition, "ifcond")?;

    let parent_function = compiler.current_function()?;
    let then_block = compiler.create_basic_block("then", parent_function);
    let else_block = compiler.create_basic_block("else", parent_function);
    let merge_block = compiler.create_basic_block("ifcont", parent_function);

    llvm(
        compiler
            .builder
            .build_conditional_branch(condition, then_block, else_block),
    )?;

    compiler.builder.position_at_end(then_block);
    gen_body(compiler, &conditional.then_body)?;
    llvm(compiler.builder.build_unconditional_branch(merge_block))?;

    compiler.builder.position_at_end(else_block);
    gen_body(compiler, &conditional.else_body)?;
    llvm(compiler.builder.build_unconditional_branch(merge_block))?;

    compiler.builder.position_at_end(merge_block);

    debug!(
        then_len = conditional.then_body.len(),
        else_len = conditional.else_body.len(),
        "generated conditional"
    );

    Ok(None)
}

/// `for` lowers to a single `loop` block holding the body, the step and the
/// exit test, branching back to itself or on to `afterloop`. The body runs at
/// least once. The construct yields `i32 0`.
pub fn gen_loop<'a>(
    compiler: &mut Compiler<'a>,
    looping: &LoopExpr,
) -> Result<Option<IntValue<'a>>, Error> {
    gen_value(compiler, &looping.init)?;

    let parent_function = compiler.current_function()?;
    let loop_block = compiler.create_basic_block("loop", parent_function);

    llvm(compiler.builder.build_unconditional_branch(loop_block))?;
    compiler.builder.position_at_end(loop_block);

    gen_body(compiler, &looping.body)?;

    match &looping.step {
        Some(step) => {
            gen_value(compiler, step)?;
        }
        None => gen_default_step(compiler, &looping.init)?,
    }

    let condition = gen_value(compiler, &looping.condition)?;
    let condition = gen_truthiness(compiler, condition, "loopcond")?;

    let after_block = compiler.create_basic_block("afterloop", parent_function);
    llvm(
        compiler
            .builder
            .build_conditional_branch(condition, loop_block, after_block),
    )?;

    compiler.builder.position_at_end(after_block);

    debug!(
        body_len = looping.body.len(),
        default_step = looping.step.is_none(),
        "generated loop"
    );

    Ok(Some(compiler.context.i32_type().const_zero()))
}

/// `var = var + 1` for the variable assigned by the loop's `init`.
fn gen_default_step<'a>(compiler: &mut Compiler<'a>, init: &Expr) -> Result<(), Error> {
    let variable = match init {
        Expr::Binary(binary) => binary.assignee(),
        _ => None,
    };
    let Some(variable) = variable else {
        return Err(Error::new(
            ErrorImpl::InvalidAssignmentTarget {
                target: init.to_string(),
            },
            init.get_span().start.clone(),
        ));
    };

    let slot = compiler.get_or_create_slot(variable)?;
    let current = llvm(compiler.builder.build_load(slot, variable))?.into_int_value();
    let one = compiler.context.i32_type().const_int(1, false);
    let next = llvm(compiler.builder.build_int_add(current, one, "nextvar"))?;
    llvm(compiler.builder.build_store(slot, next))?;

    Ok(())
}
