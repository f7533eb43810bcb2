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
//! # Symbol
//!
//! Transitions in an automaton are labelled with symbols. A symbol is either a concrete input symbol (a character, a byte,
//! or any other ordered value) or the 'empty' input, epsilon, which can be followed without reading anything.
//!
//! Symbols are totally ordered, and epsilon always sorts before every concrete symbol:
//!
//! ```
//! # use metastate::*;
//! assert!(Symbol::Epsilon < Symbol::Char('a'));
//! assert!(Symbol::Char('a') < Symbol::Char('b'));
//! ```
//!

use serde_derive::{Deserialize, Serialize};

///
/// A symbol that labels a transition
///
/// The ordering is derived: `Epsilon` is declared first, so it compares less than any `Char`, and `Char` values compare
/// using the ordering of the input symbol type.
///
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Symbol<InputSymbol> {
    /// Transition that can be taken without reading any input
    Epsilon,

    /// Transition that is taken on reading a specific input symbol
    Char(InputSymbol),
}

impl<InputSymbol> Symbol<InputSymbol> {
    ///
    /// True if this is the epsilon symbol
    ///
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    ///
    /// Retrieves the concrete input symbol, or None for epsilon
    ///
    #[inline]
    pub fn as_char(&self) -> Option<&InputSymbol> {
        match self {
            Symbol::Epsilon     => None,
            Symbol::Char(input) => Some(input),
        }
    }
}

impl<InputSymbol> From<InputSymbol> for Symbol<InputSymbol> {
    #[inline]
    fn from(input: InputSymbol) -> Symbol<InputSymbol> {
        Symbol::Char(input)
    }
}
