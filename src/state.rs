//
//   Copyright 2016 Andrew Hunter
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.
//

//!
//! # State
//!
//! A state is a node in an automaton. It carries a label (used for display and lookup only, never for identity), a flag
//! indicating whether or not it is accepting, and a transition table mapping symbols to the states that can be reached
//! on seeing them.
//!
//! States never refer to each other directly: transitions name their destinations by `StateId`, which is only meaningful
//! within the automaton that owns the state.
//!

use std::collections::BTreeMap;
use std::fmt;

use serde_derive::{Deserialize, Serialize};

use super::symbol::*;

///
/// Identifies a state within an automaton
///
/// Identifiers are indexes into the automaton's state storage: they are stable for the lifetime of the automaton and
/// are never reused after a state is removed.
///
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    ///
    /// The identifier of this state after its automaton is appended to another at `offset`
    ///
    #[inline]
    pub(crate) fn offset(&self, offset: usize) -> StateId {
        StateId(self.0 + offset)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

///
/// The transitions leaving a single state
///
/// Maps each symbol to the set of states it leads to. Destination sets contain no duplicates and are kept in the order
/// that the destinations were added. A symbol whose destination set becomes empty is removed from the table entirely.
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransitionTable<InputSymbol> {
    entries: BTreeMap<Symbol<InputSymbol>, Vec<StateId>>,
}

impl<InputSymbol: Ord> TransitionTable<InputSymbol> {
    ///
    /// Creates a table with no transitions
    ///
    pub fn new() -> TransitionTable<InputSymbol> {
        TransitionTable { entries: BTreeMap::new() }
    }

    ///
    /// Retrieves the destinations for an exact symbol (empty if there are none)
    ///
    #[inline]
    pub fn lookup(&self, symbol: &Symbol<InputSymbol>) -> &[StateId] {
        self.entries.get(symbol).map(|targets| targets.as_slice()).unwrap_or(&[])
    }

    ///
    /// Adds a destination for a symbol, returning false if it was already present
    ///
    pub fn insert(&mut self, symbol: Symbol<InputSymbol>, target: StateId) -> bool {
        let targets = self.entries.entry(symbol).or_default();

        if targets.contains(&target) {
            false
        } else {
            targets.push(target);
            true
        }
    }

    ///
    /// Removes a destination for a symbol, returning false if it wasn't present
    ///
    pub fn remove(&mut self, symbol: &Symbol<InputSymbol>, target: StateId) -> bool {
        let Some(targets) = self.entries.get_mut(symbol) else { return false; };
        let Some(pos) = targets.iter().position(|existing| *existing == target) else { return false; };

        targets.remove(pos);
        if targets.is_empty() {
            self.entries.remove(symbol);
        }

        true
    }

    ///
    /// Removes every transition leading to `target`, returning the symbols that were affected
    ///
    pub fn remove_target(&mut self, target: StateId) -> Vec<Symbol<InputSymbol>>
    where InputSymbol: Clone {
        let symbols = self.symbols_to(target);

        for symbol in symbols.iter() {
            self.remove(symbol, target);
        }

        symbols
    }

    ///
    /// The symbols that have a transition to `target`
    ///
    pub fn symbols_to(&self, target: StateId) -> Vec<Symbol<InputSymbol>>
    where InputSymbol: Clone {
        self.entries.iter()
            .filter(|(_, targets)| targets.contains(&target))
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }

    ///
    /// Iterates over the entries in this table in symbol order
    ///
    pub fn iter(&self) -> impl Iterator<Item=(&Symbol<InputSymbol>, &[StateId])> {
        self.entries.iter().map(|(symbol, targets)| (symbol, targets.as_slice()))
    }

    ///
    /// The number of symbols that have at least one destination
    ///
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    ///
    /// True if there are no transitions at all
    ///
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    ///
    /// Rewrites every destination, used when the owning automaton is merged into another
    ///
    pub(crate) fn offset_targets(&mut self, offset: usize) {
        for targets in self.entries.values_mut() {
            for target in targets.iter_mut() {
                *target = target.offset(offset);
            }
        }
    }
}

impl<InputSymbol: Ord> Default for TransitionTable<InputSymbol> {
    fn default() -> TransitionTable<InputSymbol> {
        TransitionTable::new()
    }
}

///
/// A state in an automaton
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct State<InputSymbol, Label> {
    /// Display label for this state
    label: Label,

    /// True if the automaton accepts when it finishes in this state
    accepting: bool,

    /// Transitions out of this state
    transitions: TransitionTable<InputSymbol>,
}

impl<InputSymbol: Ord, Label> State<InputSymbol, Label> {
    ///
    /// Creates a new non-accepting state with no transitions
    ///
    pub fn new(label: Label) -> State<InputSymbol, Label> {
        State { label: label, accepting: false, transitions: TransitionTable::new() }
    }

    ///
    /// Creates a new accepting state with no transitions
    ///
    pub fn accepting(label: Label) -> State<InputSymbol, Label> {
        State { label: label, accepting: true, transitions: TransitionTable::new() }
    }

    #[inline]
    pub fn label(&self) -> &Label {
        &self.label
    }

    #[inline]
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    #[inline]
    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    ///
    /// The transitions leaving this state
    ///
    #[inline]
    pub fn transitions(&self) -> &TransitionTable<InputSymbol> {
        &self.transitions
    }

    #[inline]
    pub(crate) fn transitions_mut(&mut self) -> &mut TransitionTable<InputSymbol> {
        &mut self.transitions
    }

    ///
    /// Replaces the label of this state, keeping everything else
    ///
    pub(crate) fn with_label<NewLabel>(self, label: NewLabel) -> State<InputSymbol, NewLabel> {
        State { label: label, accepting: self.accepting, transitions: self.transitions }
    }
}
