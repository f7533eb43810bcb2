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
//! # Thompson construction
//!
//! Builds larger automata out of smaller ones by joining them together with epsilon transitions. Each combinator takes
//! its operands by value: their states move into the result, so an operand can't be used again once it has been
//! combined.
//!
//! ```
//! # use metastate::*;
//! let a: Automaton<char, ()> = Automaton::from_symbol('a');
//! let b: Automaton<char, ()> = Automaton::from_symbol('b');
//!
//! let a_or_b      = union(a, b);
//! let any_number  = closure(a_or_b);
//!
//! assert!(any_number.accepts("abba".chars()));
//! assert!(any_number.accepts("".chars()));
//! ```
//!

use log::trace;

use super::automaton::*;
use super::state::*;
use super::symbol::*;

///
/// How `closure_with` joins the repeated automaton to its new end state
///
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ClosureStyle {
    ///
    /// Zero or more repetitions: the new start state also has an epsilon transition straight to the new end state, so
    /// the empty string is always accepted
    ///
    #[default]
    Kleene,

    ///
    /// The new start state only leads into the repeated automaton. The empty string is accepted only if the repeated
    /// automaton accepts it, which makes this one or more repetitions.
    ///
    /// This is the bare construction without any edge that skips the repeated automaton. It is not a reproduction of
    /// older closure builders that also join the repeated automaton's start to its accepting states: those accept the
    /// empty string, so they behave like `Kleene`.
    ///
    Literal,
}

///
/// Clears the accepting flag on every accepting state in `states` and adds an epsilon transition from each to `target`,
/// returning the states that were changed
///
fn redirect_accepting<InputSymbol: Ord+Clone, Label>(fsm: &mut Automaton<InputSymbol, Label>, states: Vec<StateId>, target: StateId) -> Vec<StateId> {
    let accepting: Vec<StateId> = states.into_iter().filter(|state| fsm.is_accepting(*state)).collect();

    for state in accepting.iter() {
        fsm.set_accepting(*state, false);
        fsm.add_transition(*state, target, Symbol::Epsilon);
    }

    accepting
}

///
/// Creates an automaton that accepts anything accepted by either `left` or `right`
///
/// A new start state has epsilon transitions to the start states of both operands, and every accepting state of either
/// operand is replaced by an epsilon transition to a new, single accepting state.
///
pub fn union<InputSymbol: Ord+Clone, Label: Default>(left: Automaton<InputSymbol, Label>, right: Automaton<InputSymbol, Label>) -> Automaton<InputSymbol, Label> {
    let mut result  = Automaton::new(Label::default());
    let start       = result.start();

    let left_start  = left.start();
    let right_start = right.start();

    let left_offset     = result.absorb(left);
    let right_offset    = result.absorb(right);
    let end             = result.add_state(State::accepting(Label::default()));

    result.add_transition(start, left_start.offset(left_offset), Symbol::Epsilon);
    result.add_transition(start, right_start.offset(right_offset), Symbol::Epsilon);

    let operand_states: Vec<StateId> = result.state_ids().filter(|state| *state != start && *state != end).collect();
    let redirected = redirect_accepting(&mut result, operand_states, end);

    trace!("Union: {} accepting states joined to {}", redirected.len(), end);

    result
}

///
/// Creates an automaton that accepts anything accepted by `left` followed by anything accepted by `right`
///
/// The start state of `left` is the start of the result, and every accepting state of `left` stops accepting and instead
/// gets an epsilon transition to the start of `right`. No new states are created.
///
pub fn concatenation<InputSymbol: Ord+Clone, Label>(left: Automaton<InputSymbol, Label>, right: Automaton<InputSymbol, Label>) -> Automaton<InputSymbol, Label> {
    let mut result      = left;
    let left_states: Vec<StateId> = result.state_ids().collect();

    let right_start     = right.start();
    let right_offset    = result.absorb(right);
    let right_start     = right_start.offset(right_offset);

    let redirected = redirect_accepting(&mut result, left_states, right_start);

    trace!("Concatenation: {} accepting states joined to {}", redirected.len(), right_start);

    result
}

///
/// Creates an automaton that accepts zero or more repetitions of anything that `repeat` accepts
///
pub fn closure<InputSymbol: Ord+Clone, Label: Default>(repeat: Automaton<InputSymbol, Label>) -> Automaton<InputSymbol, Label> {
    closure_with(repeat, ClosureStyle::Kleene)
}

///
/// Creates an automaton that accepts one or more repetitions of anything that `repeat` accepts
///
pub fn one_or_more<InputSymbol: Ord+Clone, Label: Default>(repeat: Automaton<InputSymbol, Label>) -> Automaton<InputSymbol, Label> {
    closure_with(repeat, ClosureStyle::Literal)
}

///
/// Creates an automaton that accepts either the empty string or anything that `optional` accepts
///
pub fn optional<InputSymbol: Ord+Clone, Label: Default>(optional: Automaton<InputSymbol, Label>) -> Automaton<InputSymbol, Label> {
    union(optional, Automaton::empty_string())
}

///
/// Creates an automaton that repeats `repeat`
///
/// A new start state has an epsilon transition to the start of `repeat`. Every accepting state of `repeat` stops accepting,
/// and gets an epsilon transition to a new accepting end state plus one back to the start of `repeat`. The style decides
/// whether the new start state can also go straight to the end.
///
pub fn closure_with<InputSymbol: Ord+Clone, Label: Default>(repeat: Automaton<InputSymbol, Label>, style: ClosureStyle) -> Automaton<InputSymbol, Label> {
    let mut result  = Automaton::new(Label::default());
    let start       = result.start();

    let repeat_start    = repeat.start();
    let repeat_offset   = result.absorb(repeat);
    let repeat_start    = repeat_start.offset(repeat_offset);
    let end             = result.add_state(State::accepting(Label::default()));

    result.add_transition(start, repeat_start, Symbol::Epsilon);

    let repeat_states: Vec<StateId> = result.state_ids().filter(|state| *state != start && *state != end).collect();
    let redirected = redirect_accepting(&mut result, repeat_states, end);

    for state in redirected.iter() {
        result.add_transition(*state, repeat_start, Symbol::Epsilon);
    }

    if style == ClosureStyle::Kleene {
        result.add_transition(start, end, Symbol::Epsilon);
    }

    trace!("Closure ({:?}): {} accepting states loop back to {}", style, redirected.len(), repeat_start);

    result
}

#[cfg(test)]
mod test {
    use super::*;

    fn base(symbol: char) -> Automaton<char, ()> {
        Automaton::from_symbol(symbol)
    }

    #[test]
    fn concatenation_accepts_only_ab() {
        let ab = concatenation(base('a'), base('b'));

        assert!(ab.accepts("ab".chars()));
        assert!(!ab.accepts("a".chars()));
        assert!(!ab.accepts("b".chars()));
        assert!(!ab.accepts("ba".chars()));
        assert!(!ab.accepts("".chars()));
    }

    #[test]
    fn concatenation_creates_no_states() {
        let ab = concatenation(base('a'), base('b'));

        assert!(ab.count_states() == 4);
        assert!(ab.accepting_states().len() == 1);
    }

    #[test]
    fn concatenation_keeps_left_start() {
        let left        = base('a');
        let left_start  = left.start();
        let ab          = concatenation(left, base('b'));

        assert!(ab.start() == left_start);
    }

    #[test]
    fn union_accepts_either_operand() {
        let a_or_b = union(base('a'), base('b'));

        assert!(a_or_b.accepts("a".chars()));
        assert!(a_or_b.accepts("b".chars()));
        assert!(!a_or_b.accepts("ab".chars()));
        assert!(!a_or_b.accepts("".chars()));
    }

    #[test]
    fn union_has_single_accepting_state() {
        let a_or_b = union(base('a'), base('b'));

        assert!(a_or_b.count_states() == 6);
        assert!(a_or_b.accepting_states().len() == 1);
        assert!(a_or_b.transitions_from(a_or_b.start(), &Symbol::Epsilon).len() == 2);
    }

    #[test]
    fn union_keeps_every_transition_inside() {
        let fsm = union(concatenation(base('a'), base('b')), closure(base('c')));

        assert!(fsm.transitions().all(|transition| fsm.contains(transition.source) && fsm.contains(transition.destination)));
    }

    #[test]
    fn closure_accepts_repetitions() {
        let a_star = closure(base('a'));

        assert!(a_star.accepts("".chars()));
        assert!(a_star.accepts("a".chars()));
        assert!(a_star.accepts("aaaa".chars()));
        assert!(!a_star.accepts("b".chars()));
        assert!(!a_star.accepts("aab".chars()));
    }

    #[test]
    fn literal_closure_needs_one_repetition() {
        let a_plus = closure_with(base('a'), ClosureStyle::Literal);

        assert!(!a_plus.accepts("".chars()));
        assert!(a_plus.accepts("a".chars()));
        assert!(a_plus.accepts("aaa".chars()));
    }

    #[test]
    fn literal_closure_accepts_empty_when_operand_does() {
        let fsm = closure_with(closure(base('a')), ClosureStyle::Literal);

        assert!(fsm.accepts("".chars()));
        assert!(fsm.accepts("aa".chars()));
    }

    #[test]
    fn closure_of_concatenation_repeats_whole_sequence() {
        let ab_star = closure(concatenation(base('a'), base('b')));

        assert!(ab_star.accepts("".chars()));
        assert!(ab_star.accepts("abab".chars()));
        assert!(!ab_star.accepts("aba".chars()));
        assert!(!ab_star.accepts("ba".chars()));
    }

    #[test]
    fn optional_accepts_empty_or_operand() {
        let maybe_a = optional(base('a'));

        assert!(maybe_a.accepts("".chars()));
        assert!(maybe_a.accepts("a".chars()));
        assert!(!maybe_a.accepts("aa".chars()));
    }

    #[test]
    fn one_or_more_rejects_empty() {
        let ab_plus = one_or_more(union(base('a'), base('b')));

        assert!(!ab_plus.accepts("".chars()));
        assert!(ab_plus.accepts("ba".chars()));
    }

    #[test]
    fn nested_combinators_match_expected_language() {
        // (a|b)*abb
        let prefix  = closure(union(base('a'), base('b')));
        let fsm     = concatenation(concatenation(concatenation(prefix, base('a')), base('b')), base('b'));

        assert!(fsm.accepts("abb".chars()));
        assert!(fsm.accepts("babaabb".chars()));
        assert!(!fsm.accepts("abba".chars()));
        assert!(!fsm.accepts("ab".chars()));
    }
}
