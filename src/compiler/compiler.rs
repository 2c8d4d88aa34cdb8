//! Main compiler module.
//!
//! This module contains the core Compiler structure and lowers a parsed
//! function definition into an LLVM module: one `i32` function, a stack
//! slot per variable, and the basic blocks produced by conditionals and loops.

use std::collections::HashMap;

use inkwell::{
    basic_block::BasicBlock,
    builder::{Builder, BuilderError},
    context::Context,
    module::{Linkage, Module},
    types::{BasicMetadataTypeEnum, FunctionType},
    values::{FunctionValue, PointerValue},
};
use tracing::debug;

use crate::{
    ast::ast::FunctionDefinition,
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{cfg::ControlFlowGraph, expr::gen_expression};

/// Converts a failed LLVM builder call into a codegen error.
pub fn llvm<T>(result: Result<T, BuilderError>) -> Result<T, Error> {
    result.map_err(|error| {
        Error::new(
            ErrorImpl::Builder {
                message: error.to_string(),
            },
            Position::null(),
        )
    })
}

/// The main compiler structure that holds the state of the compilation process.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the LLVM context
pub struct Compiler<'a> {
    /// Symbol table: variable name to its stack slot, reset for every function
    pub named_allocas: HashMap<String, PointerValue<'a>>,
    /// The function currently being generated
    pub function: Option<FunctionValue<'a>>,

    /// Reference to the LLVM context
    pub context: &'a Context,
    /// The LLVM module being built
    pub module: Module<'a>,
    /// The LLVM IR builder; its insertion block is the current insertion point
    pub builder: Builder<'a>,
}

impl<'a> Compiler<'a> {
    /// Creates a new Compiler with an empty module named after `file_name`.
    pub fn new(context: &'a Context, file_name: &str) -> Self {
        Compiler {
            named_allocas: HashMap::new(),
            function: None,
            module: context.create_module(file_name),
            builder: context.create_builder(),
            context,
        }
    }

    /// Renders the module as textual LLVM IR.
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Generates one function: prologue, every body statement in order,
    /// then a return of the last statement's value.
    pub fn compile_function(
        &mut self,
        definition: &FunctionDefinition,
    ) -> Result<FunctionValue<'a>, Error> {
        let signature = &definition.signature;

        self.named_allocas.clear();
        self.function = None;

        let i32_type = self.context.i32_type();
        let params: Vec<BasicMetadataTypeEnum<'a>> =
            vec![i32_type.into(); signature.parameters.len()];
        let function = self.create_function(&signature.name, i32_type.fn_type(&params, false));
        self.function = Some(function);

        for (param, name) in function.get_params().iter().zip(&signature.parameters) {
            let value = param.into_int_value();
            value.set_name(name);

            let slot = self.create_entry_block_alloca(name)?;
            llvm(self.builder.build_store(slot, value))?;
            self.named_allocas.insert(name.clone(), slot);
        }

        let mut return_value = None;
        for expr in definition.body.iter() {
            return_value = gen_expression(self, expr)?;
        }

        let Some(return_value) = return_value else {
            return Err(Error::new(
                ErrorImpl::MissingReturnValue {
                    function: signature.name.clone(),
                },
                definition.span.end.clone(),
            ));
        };
        llvm(self.builder.build_return(Some(&return_value)))?;

        self.verify(function, definition)?;

        debug!(
            function = %signature.name,
            blocks = function.count_basic_blocks(),
            slots = self.named_allocas.len(),
            "generated function"
        );

        Ok(function)
    }

    /// Control-flow graph of the function last generated, with its variables'
    /// slots attached so store-based queries can be asked per variable.
    pub fn control_flow_graph(&self) -> Result<ControlFlowGraph, Error> {
        let mut cfg = ControlFlowGraph::from_function(self.current_function()?)?;

        for (variable, slot) in self.named_allocas.iter() {
            cfg.slots.insert(
                variable.clone(),
                slot.get_name().to_string_lossy().into_owned(),
            );
        }

        Ok(cfg)
    }

    /// Checks the emitted control-flow graph, then runs the LLVM verifier.
    fn verify(
        &self,
        function: FunctionValue<'a>,
        definition: &FunctionDefinition,
    ) -> Result<(), Error> {
        ControlFlowGraph::from_function(function).map_err(|error| {
            Error::new(error.get_internal_error().clone(), definition.span.start.clone())
        })?;

        self.module.verify().map_err(|message| {
            Error::new(
                ErrorImpl::VerificationFailed {
                    message: message.to_string(),
                },
                definition.span.start.clone(),
            )
        })
    }

    /// Returns the function currently being generated.
    pub fn current_function(&self) -> Result<FunctionValue<'a>, Error> {
        self.function.ok_or_else(|| {
            Error::new(
                ErrorImpl::Builder {
                    message: String::from("no function is being generated"),
                },
                Position::null(),
            )
        })
    }

    /// Looks up a variable's slot, allocating it on first reference.
    ///
    /// The first reference to a name, read or write, creates its slot. A read
    /// before any write loads an uninitialised value.
    pub fn get_or_create_slot(&mut self, name: &str) -> Result<PointerValue<'a>, Error> {
        if let Some(slot) = self.named_allocas.get(name) {
            return Ok(*slot);
        }

        let slot = self.create_entry_block_alloca(name)?;
        self.named_allocas.insert(name.to_string(), slot);
        debug!(variable = name, "allocated storage slot");

        Ok(slot)
    }

    /// Creates an `i32` stack slot at the top of the entry block.
    fn create_entry_block_alloca(&self, name: &str) -> Result<PointerValue<'a>, Error> {
        let function = self.current_function()?;
        let entry = function.get_first_basic_block().ok_or_else(|| {
            Error::new(
                ErrorImpl::Builder {
                    message: format!("function has no entry block for `{}`", name),
                },
                Position::null(),
            )
        })?;

        let builder = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(first) => builder.position_before(&first),
            None => builder.position_at_end(entry),
        }

        llvm(builder.build_alloca(self.context.i32_type(), name))
    }

    /// Adds the function to the module and positions the builder in its
    /// fresh entry block.
    pub fn create_function(
        &self,
        name: &str,
        function_type: FunctionType<'a>,
    ) -> FunctionValue<'a> {
        let function = self.create_function_proto(name, function_type);
        self.create_function_block(function);

        function
    }

    fn create_function_proto(
        &self,
        name: &str,
        function_type: FunctionType<'a>,
    ) -> FunctionValue<'a> {
        self.module
            .add_function(name, function_type, Some(Linkage::External))
    }

    fn create_function_block(&self, function: FunctionValue<'a>) {
        let entry = self.create_basic_block("entry", function);
        self.builder.position_at_end(entry);
    }

    /// Appends a new basic block to the given function.
    ///
    /// LLVM renumbers the label if the function already has one by that name.
    pub fn create_basic_block(&self, name: &str, function: FunctionValue<'a>) -> BasicBlock<'a> {
        debug!(block = name, "created basic block");
        self.context.append_basic_block(function, name)
    }
}

/// The main compile function: lowers one function definition into a fresh
/// module named after `file_name`.
///
/// Returns the Compiler holding the finished, verified module.
pub fn compile<'a>(
    ast: &FunctionDefinition,
    file_name: &str,
    context: &'a Context,
) -> Result<Compiler<'a>, Error> {
    let mut compiler = Compiler::new(context, file_name);

    compiler.compile_function(ast)?;

    Ok(compiler)
}
