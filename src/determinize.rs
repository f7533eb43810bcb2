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
//! # Determinize
//!
//! Converts a non-deterministic automaton into a deterministic one using the subset construction. Each state of the
//! result is a 'metastate': the set of NFA states that the NFA could be in after reading some input. Two metastates are
//! the same if they contain exactly the same NFA states, regardless of the order they were discovered in.
//!
//! The alphabet is supplied by the caller, and is tried in the order it's given. Symbols that lead nowhere from a
//! metastate produce no transition (there's no implicit 'dead' state).
//!
//! ```
//! # use metastate::*;
//! let nfa: Automaton<char, ()> = union(Automaton::from_symbol('a'), Automaton::from_symbol('b'));
//! let dfa = determinize(&nfa, &['a', 'b']);
//!
//! assert!(dfa.count_states() == 3);
//! assert!(dfa.accepts("a".chars()));
//! ```
//!

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use log::{debug, trace};

use super::automaton::*;
use super::state::*;
use super::symbol::*;

///
/// A set of NFA states, used as the label of a metastate
///
pub type StateSet = BTreeSet<StateId>;

///
/// A deterministic automaton whose states are labelled with the NFA states they represent
///
pub type Dfa<InputSymbol> = Automaton<InputSymbol, StateSet>;

///
/// Errors that can occur while determinizing an automaton
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DeterminizeError {
    /// More metastates were needed than the limit allows
    StateLimitExceeded { limit: usize },
}

impl fmt::Display for DeterminizeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeterminizeError::StateLimitExceeded { limit } => write!(formatter, "determinized automaton needs more than {} states", limit),
        }
    }
}

impl std::error::Error for DeterminizeError {}

///
/// The epsilon closure of a set of NFA states
///
/// This is `states` plus every state that can be reached from them by following only epsilon transitions.
///
#[inline]
pub fn epsilon_closure<InputSymbol: Ord+Clone, Label>(nfa: &Automaton<InputSymbol, Label>, states: &StateSet) -> StateSet {
    nfa.epsilon_closure(states)
}

///
/// The epsilon closure of every NFA state reachable from `states` on `symbol`
///
pub fn move_on<InputSymbol: Ord+Clone, Label>(nfa: &Automaton<InputSymbol, Label>, states: &StateSet, symbol: &InputSymbol) -> StateSet {
    let symbol = Symbol::Char(symbol.clone());
    let moved  = states.iter()
        .flat_map(|state| nfa.transitions_from(*state, &symbol).iter().cloned())
        .collect();

    nfa.epsilon_closure(&moved)
}

///
/// Builds the deterministic equivalent of `nfa` over `alphabet`
///
pub fn determinize<InputSymbol: Ord+Clone, Label>(nfa: &Automaton<InputSymbol, Label>, alphabet: &[InputSymbol]) -> Dfa<InputSymbol> {
    Determinizer::new(nfa, alphabet).compile()
}

///
/// Performs the subset construction for an NFA
///
pub struct Determinizer<'a, InputSymbol, Label> {
    /// The automaton being converted
    nfa: &'a Automaton<InputSymbol, Label>,

    /// Symbols to try from each metastate, in order
    alphabet: &'a [InputSymbol],

    /// Maximum number of metastates to create, if any
    limit: Option<usize>,
}

///
/// The DFA under construction, along with the bookkeeping for the metastates that have been found so far
///
struct Construction<InputSymbol> {
    dfa: Dfa<InputSymbol>,

    /// Every metastate created so far, keyed by its content
    registered: HashMap<StateSet, StateId>,

    /// Metastates waiting to be expanded
    pending: VecDeque<StateId>,

    /// Metastates whose transitions have all been generated
    processed: HashSet<StateId>,
}

impl<'a, InputSymbol: Ord+Clone, Label> Determinizer<'a, InputSymbol, Label> {
    ///
    /// Creates a determinizer for an NFA and an alphabet
    ///
    pub fn new(nfa: &'a Automaton<InputSymbol, Label>, alphabet: &'a [InputSymbol]) -> Determinizer<'a, InputSymbol, Label> {
        Determinizer { nfa: nfa, alphabet: alphabet, limit: None }
    }

    ///
    /// Fails the construction if it needs more than `limit` metastates
    ///
    pub fn with_state_limit(mut self, limit: usize) -> Determinizer<'a, InputSymbol, Label> {
        self.limit = Some(limit);
        self
    }

    ///
    /// Builds the DFA, stopping with an error if the state limit is exceeded
    ///
    pub fn build(self) -> Result<Dfa<InputSymbol>, DeterminizeError> {
        debug!("Determinizing automaton with {} states over {} symbols", self.nfa.count_states(), self.alphabet.len());

        // The start metastate counts against the limit like any other
        if self.limit == Some(0) {
            return Err(DeterminizeError::StateLimitExceeded { limit: 0 });
        }

        let start_set       = epsilon_closure(self.nfa, &BTreeSet::from([self.nfa.start()]));
        let start_accepts   = self.any_accepting(&start_set);

        let mut dfa = Automaton::new(start_set.clone());
        dfa.set_accepting(dfa.start(), start_accepts);

        let mut construction = Construction {
            registered: HashMap::from([(start_set, dfa.start())]),
            pending:    VecDeque::from([dfa.start()]),
            processed:  HashSet::new(),
            dfa:        dfa,
        };

        while let Some(metastate) = construction.pending.pop_front() {
            if !construction.processed.insert(metastate) {
                continue;
            }

            self.expand(&mut construction, metastate)?;
        }

        debug!("Determinized automaton has {} states", construction.dfa.count_states());

        Ok(construction.dfa)
    }

    ///
    /// Builds the DFA, ignoring any state limit
    ///
    pub fn compile(self) -> Dfa<InputSymbol> {
        let unlimited = Determinizer { limit: None, ..self };

        match unlimited.build() {
            Ok(dfa)     => dfa,
            Err(_)      => unreachable!("determinization without a state limit can't fail"),
        }
    }

    ///
    /// Generates the transitions for a single metastate, registering any new metastates that they lead to
    ///
    fn expand(&self, construction: &mut Construction<InputSymbol>, metastate: StateId) -> Result<(), DeterminizeError> {
        let members = match construction.dfa.state(metastate) {
            Some(state) => state.label().clone(),
            None        => return Ok(()),
        };

        for symbol in self.alphabet.iter() {
            let target_set = move_on(self.nfa, &members, symbol);

            if target_set.is_empty() {
                continue;
            }

            let target = match construction.registered.get(&target_set) {
                Some(existing)  => *existing,
                None            => self.register(construction, target_set)?,
            };

            construction.dfa.add_transition(metastate, target, Symbol::Char(symbol.clone()));
        }

        Ok(())
    }

    ///
    /// Creates a new metastate and queues it for expansion
    ///
    fn register(&self, construction: &mut Construction<InputSymbol>, members: StateSet) -> Result<StateId, DeterminizeError> {
        if let Some(limit) = self.limit {
            if construction.registered.len() >= limit {
                return Err(DeterminizeError::StateLimitExceeded { limit: limit });
            }
        }

        let accepting   = self.any_accepting(&members);
        let state       = if accepting { State::accepting(members.clone()) } else { State::new(members.clone()) };
        let metastate   = construction.dfa.add_state(state);

        trace!("Metastate {} = {:?} (accepting: {})", metastate, members, accepting);

        construction.registered.insert(members, metastate);
        construction.pending.push_back(metastate);

        Ok(metastate)
    }

    ///
    /// True if any NFA state in a set is accepting
    ///
    fn any_accepting(&self, states: &StateSet) -> bool {
        states.iter().any(|state| self.nfa.is_accepting(*state))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::thompson::*;

    fn base(symbol: char) -> Automaton<char, ()> {
        Automaton::from_symbol(symbol)
    }

    fn is_deterministic<Label>(dfa: &Automaton<char, Label>) -> bool {
        dfa.states().all(|(_, state)| {
            state.transitions().iter().all(|(symbol, targets)| !symbol.is_epsilon() && targets.len() == 1)
        })
    }

    ///
    /// Relabels a DFA by breadth-first discovery order over the given alphabet so two DFAs can be compared
    ///
    fn canonical(dfa: &Dfa<char>, alphabet: &[char]) -> Vec<(StateSet, bool, Vec<(char, usize)>)> {
        let mut order   = vec![dfa.start()];
        let mut next    = 0;

        while next < order.len() {
            let state = order[next];
            next += 1;

            for symbol in alphabet {
                for target in dfa.transitions_from(state, &Symbol::Char(*symbol)) {
                    if !order.contains(target) {
                        order.push(*target);
                    }
                }
            }
        }

        order.iter().map(|state| {
            let edges = alphabet.iter()
                .flat_map(|symbol| dfa.transitions_from(*state, &Symbol::Char(*symbol)).iter().map(move |target| (*symbol, *target)))
                .map(|(symbol, target)| (symbol, order.iter().position(|candidate| *candidate == target).unwrap()))
                .collect();

            (dfa.state(*state).unwrap().label().clone(), dfa.is_accepting(*state), edges)
        }).collect()
    }

    #[test]
    fn union_determinizes_to_three_states() {
        let nfa = union(base('a'), base('b'));
        let dfa = determinize(&nfa, &['a', 'b']);

        assert!(dfa.count_states() == 3);
        assert!(!dfa.is_accepting(dfa.start()));
        assert!(dfa.accepting_states().len() == 2);
        assert!(dfa.transitions().all(|transition| !transition.symbol.is_epsilon()));
        assert!(dfa.transitions().all(|transition| transition.source == dfa.start()));
        assert!(is_deterministic(&dfa));
    }

    #[test]
    fn union_dfa_accepts_same_language() {
        let nfa = union(base('a'), base('b'));
        let dfa = determinize(&nfa, &['a', 'b']);

        assert!(dfa.accepts("a".chars()));
        assert!(dfa.accepts("b".chars()));
        assert!(!dfa.accepts("ab".chars()));
        assert!(!dfa.accepts("".chars()));
    }

    #[test]
    fn start_metastate_is_closure_of_start() {
        let nfa = closure(base('a'));
        let dfa = determinize(&nfa, &['a']);

        let start_set = dfa.state(dfa.start()).unwrap().label().clone();

        assert!(start_set == epsilon_closure(&nfa, &BTreeSet::from([nfa.start()])));
        assert!(dfa.is_accepting(dfa.start()));
    }

    #[test]
    fn metastates_are_reused_by_content() {
        // a* only ever reaches two distinct sets of NFA states
        let nfa = closure(base('a'));
        let dfa = determinize(&nfa, &['a']);

        assert!(dfa.count_states() == 2);
        assert!(is_deterministic(&dfa));

        let labels: HashSet<StateSet> = dfa.states().map(|(_, state)| state.label().clone()).collect();
        assert!(labels.len() == dfa.count_states());
    }

    #[test]
    fn missing_symbols_produce_no_transitions() {
        let nfa = base('a');
        let dfa = determinize(&nfa, &['a', 'b']);

        assert!(dfa.count_states() == 2);
        assert!(dfa.transitions_from(dfa.start(), &Symbol::Char('b')).is_empty());
        assert!(dfa.transitions().count() == 1);
    }

    #[test]
    fn states_without_transitions_are_expanded_once() {
        let nfa = concatenation(base('a'), base('b'));
        let dfa = determinize(&nfa, &['a', 'b', 'c']);

        assert!(dfa.count_states() == 3);
        assert!(dfa.accepts("ab".chars()));
        assert!(!dfa.accepts("abc".chars()));
    }

    #[test]
    fn determinizing_twice_gives_same_structure() {
        let nfa         = concatenation(closure(union(base('a'), base('b'))), base('a'));
        let alphabet    = ['a', 'b'];

        let first   = determinize(&nfa, &alphabet);
        let second  = determinize(&nfa, &alphabet);

        assert!(canonical(&first, &alphabet) == canonical(&second, &alphabet));
    }

    #[test]
    fn classic_example_matches_language() {
        // (a|b)*abb
        let nfa = concatenation(concatenation(concatenation(closure(union(base('a'), base('b'))), base('a')), base('b')), base('b'));
        let dfa = determinize(&nfa, &['a', 'b']);

        assert!(is_deterministic(&dfa));
        assert!(dfa.count_states() == 5);

        for input in ["abb", "aabb", "babb", "abababb"] {
            assert!(dfa.accepts(input.chars()));
            assert!(nfa.accepts(input.chars()));
        }

        for input in ["", "a", "ab", "abba", "bbb"] {
            assert!(!dfa.accepts(input.chars()));
            assert!(!nfa.accepts(input.chars()));
        }
    }

    #[test]
    fn epsilon_closure_is_idempotent() {
        let nfa = closure(concatenation(closure(base('a')), base('b')));

        for state in nfa.state_ids() {
            let once    = epsilon_closure(&nfa, &BTreeSet::from([state]));
            let twice   = epsilon_closure(&nfa, &once);

            assert!(once == twice);
            assert!(once.contains(&state));
        }
    }

    #[test]
    fn move_on_closes_over_epsilon() {
        let nfa     = concatenation(base('a'), closure(base('b')));
        let start   = epsilon_closure(&nfa, &BTreeSet::from([nfa.start()]));
        let after_a = move_on(&nfa, &start, &'a');

        assert!(after_a.iter().any(|state| nfa.is_accepting(*state)));
        assert!(move_on(&nfa, &start, &'b').is_empty());
    }

    #[test]
    fn state_limit_stops_construction() {
        let nfa     = concatenation(closure(union(base('a'), base('b'))), base('a'));
        let result  = Determinizer::new(&nfa, &['a', 'b']).with_state_limit(1).build();

        assert!(result == Err(DeterminizeError::StateLimitExceeded { limit: 1 }));
    }

    #[test]
    fn zero_state_limit_rejects_start_metastate() {
        let nfa: Automaton<char, ()> = Automaton::new(());
        let result = Determinizer::new(&nfa, &['a']).with_state_limit(0).build();

        assert!(result == Err(DeterminizeError::StateLimitExceeded { limit: 0 }));
    }

    #[test]
    fn state_limit_counts_start_metastate() {
        // a|b needs exactly three metastates, the start included
        let nfa     = union(base('a'), base('b'));
        let result  = Determinizer::new(&nfa, &['a', 'b']).with_state_limit(2).build();

        assert!(result == Err(DeterminizeError::StateLimitExceeded { limit: 2 }));
    }

    #[test]
    fn generous_state_limit_succeeds() {
        let nfa     = union(base('a'), base('b'));
        let result  = Determinizer::new(&nfa, &['a', 'b']).with_state_limit(3).build();

        assert!(result.map(|dfa| dfa.count_states()) == Ok(3));
    }

    #[test]
    fn metastate_accepts_if_any_member_accepts() {
        let nfa = union(base('a'), concatenation(base('a'), base('b')));
        let dfa = determinize(&nfa, &['a', 'b']);

        let after_a = dfa.transitions_from(dfa.start(), &Symbol::Char('a'))[0];

        assert!(dfa.is_accepting(after_a));
        assert!(dfa.state(after_a).unwrap().label().iter().any(|member| !nfa.is_accepting(*member)));
    }
}
