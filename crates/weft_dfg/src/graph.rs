//! The dataflow-graph model.
//!
//! Instructions live in a slotted arena addressed by [`InstrId`]; the
//! dependency adjacency and the recurrence records are index-keyed. The
//! ordinary dependency relation must stay acyclic; edges that would close
//! a loop are recorded as recurrences with an iteration distance instead.

use crate::ids::InstrId;
use crate::instr::Instruction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weft_common::Arena;

/// A cross-iteration dependency: the owning instruction feeds `target`
/// `distance` iterations later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    /// The instruction consuming the carried value.
    pub target: InstrId,
    /// Iteration distance, at least 1.
    pub distance: u32,
}

/// Operations and their data dependencies for one kernel.
#[derive(Debug, Clone, Default)]
pub struct DataflowGraph {
    instrs: Arena<InstrId, Instruction>,
    deps: BTreeMap<InstrId, BTreeMap<InstrId, u32>>,
    recurrences: BTreeMap<InstrId, Vec<Recurrence>>,
}

impl DataflowGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instruction, returning its ID.
    pub fn add_instr(&mut self, instr: Instruction) -> InstrId {
        let id = self.instrs.alloc(instr);
        self.deps.insert(id, BTreeMap::new());
        self.recurrences.insert(id, Vec::new());
        id
    }

    /// Adds an ordinary dependency edge from `from` to `to`, and the
    /// mirrored edge as well when `bidirectional` is set.
    pub fn add_dependency(&mut self, from: InstrId, to: InstrId, weight: u32, bidirectional: bool) {
        self.deps.entry(from).or_default().insert(to, weight);
        if bidirectional {
            self.deps.entry(to).or_default().insert(from, weight);
        }
    }

    /// Records a recurrence carried from `from` into a later iteration.
    pub fn add_recurrence(&mut self, from: InstrId, target: InstrId, distance: u32) {
        self.recurrences.entry(from).or_default().push(Recurrence { target, distance });
    }

    /// Returns the instruction with the given ID, if live.
    pub fn instruction(&self, id: InstrId) -> Option<&Instruction> {
        self.instrs.get(id)
    }

    /// Iterates over `(id, instruction)` pairs in insertion order.
    pub fn instructions(&self) -> impl Iterator<Item = (InstrId, &Instruction)> {
        self.instrs.iter()
    }

    /// Returns the number of instructions.
    pub fn size(&self) -> usize {
        self.instrs.len()
    }

    /// Returns all instructions with a dependency edge into `id`.
    pub fn get_inputs(&self, id: InstrId) -> Vec<InstrId> {
        self.deps
            .iter()
            .filter(|(_, targets)| targets.contains_key(&id))
            .map(|(src, _)| *src)
            .collect()
    }

    /// Returns all instructions `id` has a dependency edge into.
    pub fn get_outputs(&self, id: InstrId) -> Vec<InstrId> {
        self.deps
            .get(&id)
            .map(|targets| targets.keys().copied().collect())
            .unwrap_or_default()
    }

    /// The recurrences carried out of `id`.
    pub fn recurrences(&self, id: InstrId) -> &[Recurrence] {
        self.recurrences.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The number of recurrences carried out of `id`.
    pub fn recurrence_count(&self, id: InstrId) -> usize {
        self.recurrences(id).len()
    }

    /// Sorts instructions into canonical order (non-constants before
    /// constants, ties broken by current ID) and reassigns export IDs
    /// 1..N in that order.
    ///
    /// Instructions whose name is empty or still derived from their own
    /// mnemonic are renamed `<mnemonic>_<new id>`. Running this twice in a
    /// row leaves both the order and the names unchanged.
    pub fn sort_and_renumber_instructions(&mut self) -> Vec<InstrId> {
        let mut order: Vec<InstrId> = self.instrs.ids().collect();
        order.sort_by_key(|&id| {
            self.instrs
                .get(id)
                .map(|i| (i.opcode.is_const(), i.id))
                .unwrap_or((true, u32::MAX))
        });
        for (index, &id) in order.iter().enumerate() {
            let new_id = index as u32 + 1;
            if let Some(instr) = self.instrs.get_mut(id) {
                instr.id = new_id;
                if instr.name.is_empty() || instr.name.starts_with(instr.opcode.mnemonic()) {
                    instr.name = format!("{}_{}", instr.opcode.mnemonic(), new_id);
                }
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instr::Opcode;

    fn node(g: &mut DataflowGraph, id: u32, op: &str, name: &str) -> InstrId {
        g.add_instr(Instruction::new(id, Opcode::parse(op), 1, name))
    }

    #[test]
    fn dependencies_and_queries() {
        let mut g = DataflowGraph::new();
        let a = node(&mut g, 1, "MUL", "a");
        let b = node(&mut g, 2, "ADD", "b");
        let c = node(&mut g, 3, "S_OUT", "c");
        g.add_dependency(a, c, 0, false);
        g.add_dependency(b, c, 0, false);

        assert_eq!(g.size(), 3);
        assert_eq!(g.get_inputs(c), vec![a, b]);
        assert_eq!(g.get_outputs(a), vec![c]);
        assert!(g.get_outputs(c).is_empty());
    }

    #[test]
    fn recurrences_are_per_source() {
        let mut g = DataflowGraph::new();
        let a = node(&mut g, 1, "ADD", "a");
        let b = node(&mut g, 2, "ADD", "b");
        g.add_recurrence(a, a, 1);
        g.add_recurrence(a, b, 2);
        assert_eq!(g.recurrence_count(a), 2);
        assert_eq!(g.recurrence_count(b), 0);
        assert_eq!(g.recurrences(a)[1], Recurrence { target: b, distance: 2 });
    }

    #[test]
    fn renumber_places_constants_last() {
        let mut g = DataflowGraph::new();
        let k = node(&mut g, 1, "CONST", "");
        let m = node(&mut g, 2, "MUL", "");
        let s = node(&mut g, 3, "S_IN", "");
        let order = g.sort_and_renumber_instructions();

        assert_eq!(order, vec![m, s, k]);
        assert_eq!(g.instruction(m).unwrap().id, 1);
        assert_eq!(g.instruction(s).unwrap().id, 2);
        assert_eq!(g.instruction(k).unwrap().id, 3);
    }

    #[test]
    fn renumber_is_idempotent() {
        let mut g = DataflowGraph::new();
        node(&mut g, 2, "CONST", "");
        node(&mut g, 1, "ADD", "");
        let first = g.sort_and_renumber_instructions();
        let names: Vec<String> = first
            .iter()
            .map(|&id| g.instruction(id).unwrap().name.clone())
            .collect();
        let second = g.sort_and_renumber_instructions();
        assert_eq!(first, second);
        let names_again: Vec<String> = second
            .iter()
            .map(|&id| g.instruction(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, names_again);
        assert_eq!(names, vec!["ADD_1", "CONST_2"]);
    }

    #[test]
    fn renumber_keeps_explicit_names() {
        let mut g = DataflowGraph::new();
        let a = node(&mut g, 1, "MUL", "m1");
        let b = node(&mut g, 2, "MUL", "MUL2");
        g.sort_and_renumber_instructions();
        // "m1" does not start with the mnemonic, so it survives; "MUL2" does.
        assert_eq!(g.instruction(a).unwrap().name, "m1");
        assert_eq!(g.instruction(b).unwrap().name, "MUL_2");
    }
}
