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
//! # Automaton
//!
//! An automaton owns a set of states and designates one of them as the start state. States are stored in an arena and
//! refer to one another by `StateId`, so removing a state is a plain edit of the arena plus a sweep of the transition
//! tables that still name it.
//!
//! An automaton can be deterministic or not: nothing prevents a state from having several destinations for one symbol,
//! or from having epsilon transitions. The `determinize` module converts the former into the latter.
//!
//! ```
//! # use metastate::*;
//! let mut nfa: Automaton<char, ()> = Automaton::new(());
//! let end = nfa.add_state(State::accepting(()));
//!
//! nfa.add_transition(nfa.start(), end, Symbol::Char('a'));
//!
//! assert!(nfa.accepts("a".chars()));
//! assert!(!nfa.accepts("aa".chars()));
//! ```
//!

use std::collections::BTreeSet;

use log::trace;
use serde_derive::{Deserialize, Serialize};

use super::state::*;
use super::symbol::*;

///
/// A single (source, symbol, destination) transition
///
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Transition<InputSymbol> {
    pub source: StateId,
    pub symbol: Symbol<InputSymbol>,
    pub destination: StateId,
}

///
/// A finite-state automaton
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Automaton<InputSymbol, Label> {
    /// The states in this automaton, indexed by StateId. Removed states leave a vacant slot so identifiers stay stable.
    states: Vec<Option<State<InputSymbol, Label>>>,

    /// The state where matching begins
    start: StateId,
}

impl<InputSymbol: Ord+Clone, Label> Automaton<InputSymbol, Label> {
    ///
    /// Creates a new automaton consisting of just a non-accepting start state
    ///
    pub fn new(start_label: Label) -> Automaton<InputSymbol, Label> {
        Automaton { states: vec![Some(State::new(start_label))], start: StateId(0) }
    }

    ///
    /// Creates an automaton that accepts only the empty string
    ///
    pub fn empty_string() -> Automaton<InputSymbol, Label>
    where Label: Default {
        let mut result = Automaton::new(Label::default());
        result.set_accepting(result.start, true);

        result
    }

    ///
    /// Creates the base automaton for a single symbol: a non-accepting start state joined to an accepting end state
    ///
    pub fn from_symbol(symbol: InputSymbol) -> Automaton<InputSymbol, Label>
    where Label: Default {
        let mut result  = Automaton::new(Label::default());
        let end         = result.add_state(State::accepting(Label::default()));

        result.add_transition(result.start, end, Symbol::Char(symbol));

        result
    }

    ///
    /// The state where this automaton starts
    ///
    #[inline]
    pub fn start(&self) -> StateId {
        self.start
    }

    ///
    /// Moves the start state (does nothing if `state` is not part of this automaton)
    ///
    pub fn set_start(&mut self, state: StateId) {
        if self.contains(state) {
            self.start = state;
        }
    }

    ///
    /// True if a state is a member of this automaton
    ///
    #[inline]
    pub fn contains(&self, state: StateId) -> bool {
        matches!(self.states.get(state.0), Some(Some(_)))
    }

    #[inline]
    pub fn state(&self, state: StateId) -> Option<&State<InputSymbol, Label>> {
        self.states.get(state.0).and_then(|slot| slot.as_ref())
    }

    #[inline]
    pub fn state_mut(&mut self, state: StateId) -> Option<&mut State<InputSymbol, Label>> {
        self.states.get_mut(state.0).and_then(|slot| slot.as_mut())
    }

    ///
    /// Iterates over the states of this automaton in the order they were added
    ///
    pub fn states(&self) -> impl Iterator<Item=(StateId, &State<InputSymbol, Label>)> {
        self.states.iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|state| (StateId(index), state)))
    }

    ///
    /// Iterates over the identifiers of the states of this automaton
    ///
    pub fn state_ids(&self) -> impl Iterator<Item=StateId> + '_ {
        self.states().map(|(id, _)| id)
    }

    ///
    /// The number of states in this automaton
    ///
    pub fn count_states(&self) -> usize {
        self.states.iter().filter(|slot| slot.is_some()).count()
    }

    ///
    /// True if a state is a member of this automaton and is accepting
    ///
    #[inline]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.state(state).map(|state| state.is_accepting()).unwrap_or(false)
    }

    ///
    /// Marks a state as accepting or not
    ///
    pub fn set_accepting(&mut self, state: StateId, accepting: bool) {
        if let Some(state) = self.state_mut(state) {
            state.set_accepting(accepting);
        }
    }

    ///
    /// The accepting states of this automaton
    ///
    pub fn accepting_states(&self) -> Vec<StateId> {
        self.states()
            .filter(|(_, state)| state.is_accepting())
            .map(|(id, _)| id)
            .collect()
    }

    ///
    /// Adds a state to this automaton, returning its identifier
    ///
    pub fn add_state(&mut self, state: State<InputSymbol, Label>) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(Some(state));

        trace!("Added state {}", id);

        id
    }

    ///
    /// Removes a state from this automaton, along with every transition that leads to it
    ///
    /// Destination sets that become empty as a result are removed. Removing a state that isn't part of the automaton does
    /// nothing. The start state can't be removed: use `set_start` to move it first.
    ///
    pub fn remove_state(&mut self, state: StateId) -> Option<State<InputSymbol, Label>> {
        if state == self.start {
            trace!("Refusing to remove start state {}", state);
            return None;
        }

        let removed = self.states.get_mut(state.0).and_then(|slot| slot.take())?;

        for slot in self.states.iter_mut() {
            if let Some(remaining) = slot {
                remaining.transitions_mut().remove_target(state);
            }
        }

        trace!("Removed state {}", state);

        Some(removed)
    }

    ///
    /// Adds a transition from one state to another
    ///
    /// Adding a transition that already exists does nothing, as does adding a transition where either end is not part of
    /// this automaton.
    ///
    pub fn add_transition(&mut self, from: StateId, to: StateId, symbol: Symbol<InputSymbol>) {
        if !self.contains(to) {
            return;
        }

        if let Some(source) = self.state_mut(from) {
            source.transitions_mut().insert(symbol, to);
        }
    }

    ///
    /// Removes a transition, deleting the symbol's entry if it no longer leads anywhere
    ///
    pub fn delete_transition(&mut self, from: StateId, to: StateId, symbol: &Symbol<InputSymbol>) {
        if let Some(source) = self.state_mut(from) {
            source.transitions_mut().remove(symbol, to);
        }
    }

    ///
    /// The states reached from `state` on exactly `symbol` (empty if there are none)
    ///
    pub fn transitions_from(&self, state: StateId, symbol: &Symbol<InputSymbol>) -> &[StateId] {
        self.state(state)
            .map(|state| state.transitions().lookup(symbol))
            .unwrap_or(&[])
    }

    ///
    /// Every (source, symbol) pair that has `target` among its destinations
    ///
    pub fn transitions_into(&self, target: StateId) -> Vec<(StateId, Symbol<InputSymbol>)> {
        self.states()
            .flat_map(|(id, state)| {
                state.transitions().symbols_to(target)
                    .into_iter()
                    .map(move |symbol| (id, symbol))
            })
            .collect()
    }

    ///
    /// Iterates over every transition in this automaton, by source state then by symbol
    ///
    pub fn transitions(&self) -> impl Iterator<Item=Transition<InputSymbol>> + '_ {
        self.states().flat_map(|(source, state)| {
            state.transitions().iter().flat_map(move |(symbol, targets)| {
                targets.iter().map(move |destination| Transition {
                    source:         source,
                    symbol:         symbol.clone(),
                    destination:    *destination,
                })
            })
        })
    }

    ///
    /// The concrete symbols that appear on any transition, in order and without duplicates
    ///
    pub fn alphabet(&self) -> Vec<InputSymbol> {
        let symbols: BTreeSet<InputSymbol> = self.transitions()
            .filter_map(|transition| match transition.symbol {
                Symbol::Epsilon     => None,
                Symbol::Char(input) => Some(input),
            })
            .collect();

        symbols.into_iter().collect()
    }

    ///
    /// Adds the states from another automaton to this one
    ///
    /// The states are renumbered to follow on from the ones already here: the return value is the offset that was added
    /// to every identifier from `other`. The other automaton's start state becomes an ordinary state.
    ///
    pub(crate) fn absorb(&mut self, other: Automaton<InputSymbol, Label>) -> usize {
        let offset = self.states.len();

        self.states.extend(other.states.into_iter().map(|slot| {
            slot.map(|mut state| {
                state.transitions_mut().offset_targets(offset);
                state
            })
        }));

        offset
    }

    ///
    /// Relabels every state in this automaton, keeping identifiers and transitions
    ///
    /// The function is called with the position of each state (counting only states that are present) along with its
    /// identifier and current label.
    ///
    pub fn map_labels<NewLabel>(self, mut map: impl FnMut(usize, StateId, &Label) -> NewLabel) -> Automaton<InputSymbol, NewLabel> {
        let mut position = 0;

        let states = self.states.into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.map(|state| {
                    let label = map(position, StateId(index), state.label());
                    position += 1;
                    state.with_label(label)
                })
            })
            .collect();

        Automaton { states: states, start: self.start }
    }

    ///
    /// The states that can be reached from any of `states` by following only epsilon transitions (including `states`
    /// themselves)
    ///
    pub fn epsilon_closure(&self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = states.clone();
        let mut pending: Vec<StateId> = states.iter().cloned().collect();

        while let Some(state) = pending.pop() {
            for target in self.transitions_from(state, &Symbol::Epsilon) {
                if closure.insert(*target) {
                    pending.push(*target);
                }
            }
        }

        closure
    }

    ///
    /// Runs this automaton against a sequence of input symbols, returning true if it finishes in an accepting state
    ///
    pub fn accepts<Input: IntoIterator<Item=InputSymbol>>(&self, input: Input) -> bool {
        let mut current = self.epsilon_closure(&BTreeSet::from([self.start]));

        for input_symbol in input {
            let symbol  = Symbol::Char(input_symbol);
            let moved   = current.iter()
                .flat_map(|state| self.transitions_from(*state, &symbol).iter().cloned())
                .collect();

            current = self.epsilon_closure(&moved);

            if current.is_empty() {
                return false;
            }
        }

        current.iter().any(|state| self.is_accepting(*state))
    }
}
