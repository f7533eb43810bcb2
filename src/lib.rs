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
//! # Metastate
//!
//! Metastate is a library for building finite-state automata from regular expressions and for converting
//! non-deterministic automata into equivalent deterministic ones.
//!
//! Automata are built from single-symbol pieces using the Thompson construction (`union`, `concatenation` and
//! `closure`), and made deterministic with the subset construction (`determinize`):
//!
//! ```
//! # use metastate::*;
//! let a: Automaton<char, ()> = Automaton::from_symbol('a');
//! let b: Automaton<char, ()> = Automaton::from_symbol('b');
//!
//! let nfa = concatenation(a, b);
//! let dfa = determinize(&nfa, &['a', 'b']);
//!
//! assert!(dfa.accepts("ab".chars()));
//! assert!(!dfa.accepts("ba".chars()));
//! ```
//!
//! The `parse` and `dot` modules connect this to the outside world: one reads regular expressions, the other writes
//! automata as Graphviz diagrams.
//!

pub use self::symbol::*;
pub use self::state::*;
pub use self::automaton::*;
pub use self::thompson::*;
pub use self::determinize::*;
pub use self::dot::*;
pub use self::parse::*;

pub mod symbol;
pub mod state;
pub mod automaton;
pub mod thompson;
pub mod determinize;
pub mod dot;
pub mod parse;
pub mod logging;
