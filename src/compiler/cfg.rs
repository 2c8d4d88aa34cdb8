//! Control-flow graph view of a generated function.
//!
//! Built from the terminators LLVM already holds; used to reject blocks
//! without a terminator before verification, to answer edge and dominance
//! queries and to render `--emit dot`.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::Write,
};

use inkwell::values::{AnyValue, BasicValueEnum, FunctionValue, InstructionOpcode};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub label: String,
    /// Branch targets, the taken (true) edge first.
    pub successors: Vec<String>,
    pub instructions: Vec<String>,
    /// Names of the slots this block stores into.
    pub stores: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlFlowGraph {
    pub function: String,
    pub blocks: Vec<BlockNode>,
    /// Source variable to the name of its slot; filled in by the compiler.
    pub slots: BTreeMap<String, String>,
}

impl ControlFlowGraph {
    /// Collects every block of `function` in layout order.
    ///
    /// Fails with `UnterminatedBlock` on the first block that does not end in
    /// a branch or return.
    pub fn from_function(function: FunctionValue<'_>) -> Result<ControlFlowGraph, Error> {
        let mut blocks = Vec::new();

        for block in function.get_basic_blocks() {
            let label = block.get_name().to_string_lossy().into_owned();

            let Some(terminator) = block.get_terminator() else {
                return Err(Error::new(
                    ErrorImpl::UnterminatedBlock { block: label },
                    Position::null(),
                ));
            };

            let mut successors: Vec<String> = (0..terminator.get_num_operands())
                .filter_map(|i| terminator.get_operand(i).and_then(|op| op.right()))
                .map(|target| target.get_name().to_string_lossy().into_owned())
                .collect();
            // conditional `br` stores its targets as [false, true]
            successors.reverse();

            let mut instructions = Vec::new();
            let mut stores = Vec::new();
            let mut instruction = block.get_first_instruction();
            while let Some(current) = instruction {
                instructions.push(current.print_to_string().to_string().trim().to_string());

                if current.get_opcode() == InstructionOpcode::Store {
                    if let Some(BasicValueEnum::PointerValue(slot)) =
                        current.get_operand(1).and_then(|op| op.left())
                    {
                        let slot = slot.get_name().to_string_lossy().into_owned();
                        if !stores.contains(&slot) {
                            stores.push(slot);
                        }
                    }
                }

                instruction = current.get_next_instruction();
            }

            blocks.push(BlockNode {
                label,
                successors,
                instructions,
                stores,
            });
        }

        Ok(ControlFlowGraph {
            function: function.get_name().to_string_lossy().into_owned(),
            blocks,
            slots: BTreeMap::new(),
        })
    }

    pub fn block(&self, label: &str) -> Option<&BlockNode> {
        self.blocks.iter().find(|block| block.label == label)
    }

    pub fn successors(&self, label: &str) -> Vec<&str> {
        self.block(label)
            .map(|block| block.successors.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Blocks branching into `label`, in layout order; a block branching
    /// there from both arms is listed once.
    pub fn predecessors(&self, label: &str) -> Vec<&str> {
        self.blocks
            .iter()
            .filter(|block| block.successors.iter().any(|target| target == label))
            .map(|block| block.label.as_str())
            .collect()
    }

    /// Every `(from, to)` edge, in layout order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.blocks
            .iter()
            .flat_map(|block| {
                block
                    .successors
                    .iter()
                    .map(move |target| (block.label.as_str(), target.as_str()))
            })
            .collect()
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|block| block.label.as_str())
    }

    /// Blocks reachable from the entry block once `removed` is taken out.
    fn reachable_without(&self, removed: Option<&str>) -> HashSet<&str> {
        let mut reached = HashSet::new();
        let Some(entry) = self.blocks.first() else {
            return reached;
        };

        let mut stack = vec![entry.label.as_str()];
        while let Some(label) = stack.pop() {
            if Some(label) == removed || !reached.insert(label) {
                continue;
            }
            stack.extend(self.successors(label));
        }

        reached
    }

    /// Every reachable block mapped to the blocks dominating it, itself
    /// included, in layout order.
    ///
    /// `d` dominates `b` when taking `d` out of the graph cuts `b` off from
    /// the entry block.
    pub fn dominators(&self) -> HashMap<&str, Vec<&str>> {
        let reachable = self.reachable_without(None);
        let cut_off: Vec<(&str, HashSet<&str>)> = self
            .labels()
            .filter(|label| reachable.contains(label))
            .map(|dominator| (dominator, self.reachable_without(Some(dominator))))
            .collect();

        self.labels()
            .filter(|label| reachable.contains(label))
            .map(|label| {
                let dominators = cut_off
                    .iter()
                    .filter(|(_, reached)| !reached.contains(&label))
                    .map(|(dominator, _)| *dominator)
                    .collect();
                (label, dominators)
            })
            .collect()
    }

    /// The closest strict dominator of every reachable block but the entry.
    fn immediate_dominators(&self) -> HashMap<&str, &str> {
        let dominators = self.dominators();

        dominators
            .iter()
            .filter_map(|(label, own)| {
                own.iter()
                    .copied()
                    .filter(|dominator| dominator != label)
                    .max_by_key(|dominator| dominators.get(dominator).map_or(0, Vec::len))
                    .map(|idom| (*label, idom))
            })
            .collect()
    }

    /// The closest strict dominator of `label`; `None` for the entry block
    /// and for unreachable blocks.
    pub fn immediate_dominator(&self, label: &str) -> Option<&str> {
        self.immediate_dominators().get(label).copied()
    }

    /// Frontier of every block: the join points it reaches without
    /// strictly dominating them.
    fn dominance_frontiers(&self) -> HashMap<&str, Vec<&str>> {
        let idoms = self.immediate_dominators();
        let mut frontiers: HashMap<&str, Vec<&str>> = HashMap::new();

        for label in self.labels() {
            let Some(idom) = idoms.get(label).copied() else {
                continue;
            };
            let predecessors = self.predecessors(label);
            if predecessors.len() < 2 {
                continue;
            }

            for predecessor in predecessors {
                let mut runner = predecessor;
                while runner != idom {
                    let frontier = frontiers.entry(runner).or_default();
                    if !frontier.contains(&label) {
                        frontier.push(label);
                    }
                    match idoms.get(runner) {
                        Some(next) => runner = *next,
                        None => break,
                    }
                }
            }
        }

        frontiers
    }

    /// Dominance frontier of `label`, in layout order.
    pub fn dominance_frontier(&self, label: &str) -> Vec<&str> {
        self.dominance_frontiers()
            .remove(label)
            .unwrap_or_default()
    }

    /// Blocks where stores to `variable`'s slot from different paths meet,
    /// that is where an SSA form would need a phi: the iterated dominance
    /// frontier of every block storing to the slot. Layout order.
    pub fn phi_sites(&self, variable: &str) -> Vec<&str> {
        let Some(slot) = self.slots.get(variable) else {
            return Vec::new();
        };

        let frontiers = self.dominance_frontiers();
        let mut sites: HashSet<&str> = HashSet::new();
        let mut work: Vec<&str> = self
            .blocks
            .iter()
            .filter(|block| block.stores.contains(slot))
            .map(|block| block.label.as_str())
            .collect();

        while let Some(label) = work.pop() {
            for site in frontiers.get(label).into_iter().flatten() {
                if sites.insert(*site) {
                    work.push(*site);
                }
            }
        }

        self.labels().filter(|label| sites.contains(label)).collect()
    }

    /// Graphviz rendering: one box per block listing its phi sites and
    /// instructions.
    pub fn to_dot(&self) -> String {
        let mut phis: HashMap<&str, Vec<&str>> = HashMap::new();
        for variable in self.slots.keys() {
            for site in self.phi_sites(variable) {
                phis.entry(site).or_default().push(variable.as_str());
            }
        }

        let mut dot = String::from("digraph g {\n\tnode [shape = box]\n");

        for block in self.blocks.iter() {
            let mut label = format!("{}:\\l", escape(&block.label));
            for variable in phis.get(block.label.as_str()).into_iter().flatten() {
                let _ = write!(label, "  phi {}\\l", escape(variable));
            }
            for instruction in block.instructions.iter() {
                let _ = write!(label, "  {}\\l", escape(instruction));
            }
            let _ = writeln!(dot, "\t\"{}\" [label=\"{}\"]", escape(&block.label), label);

            for target in block.successors.iter() {
                let _ = writeln!(dot, "\t\"{}\" -> \"{}\"", escape(&block.label), escape(target));
            }
        }

        dot.push('}');
        dot.push('\n');
        dot
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
