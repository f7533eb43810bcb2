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
//! # Dot
//!
//! Writes an automaton out in the Graphviz 'dot' format. The renderer decides nothing about how symbols or state labels
//! look: the caller supplies a function for each, so epsilon can be drawn however the caller likes.
//!
//! ```
//! # use metastate::*;
//! let nfa: Automaton<char, String> = Automaton::from_symbol('a');
//! let mut output = vec![];
//!
//! write_dot(&mut output, &nfa, &DotStyle::default(),
//!     |symbol| match symbol { Symbol::Epsilon => "e".to_string(), Symbol::Char(c) => c.to_string() },
//!     |label| label.clone()).unwrap();
//!
//! assert!(String::from_utf8(output).unwrap().contains("0->1 [label=\"a\"]"));
//! ```
//!

use std::collections::HashMap;
use std::io::{self, Write};

use super::automaton::*;
use super::determinize::*;
use super::state::*;
use super::symbol::*;

///
/// Graph-wide attributes for the generated diagram
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DotStyle {
    /// Font used for nodes and edges
    pub font: String,

    /// Graphviz `rankdir` (`LR` lays the automaton out left-to-right)
    pub rank_direction: String,
}

impl Default for DotStyle {
    fn default() -> DotStyle {
        DotStyle { font: "Verdana".to_string(), rank_direction: "LR".to_string() }
    }
}

///
/// Escapes a string so it can appear between double quotes in a dot file
///
fn quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

///
/// Writes an automaton as a dot digraph
///
/// States are numbered by their position in the automaton. Accepting states are drawn with a double circle, and an
/// extra plaintext `start` node points at the start state.
///
pub fn write_dot<W, InputSymbol, Label, SymbolString, LabelString>(
    out:            &mut W,
    automaton:      &Automaton<InputSymbol, Label>,
    style:          &DotStyle,
    symbol_string:  SymbolString,
    label_string:   LabelString) -> io::Result<()>
where
    W:              Write,
    InputSymbol:    Ord+Clone,
    SymbolString:   Fn(&Symbol<InputSymbol>) -> String,
    LabelString:    Fn(&Label) -> String {
    writeln!(out, "digraph fsm\n{{")?;
    writeln!(out, "rankdir=\"{}\"", quoted(&style.rank_direction))?;
    writeln!(out, "edge [fontname=\"{}\"]", quoted(&style.font))?;
    writeln!(out, "node [fontname=\"{}\"]", quoted(&style.font))?;
    writeln!(out, "start [shape=\"plaintext\",label=\"start\"]")?;

    let mut positions: HashMap<StateId, usize> = HashMap::new();

    for (position, (id, state)) in automaton.states().enumerate() {
        let shape = if state.is_accepting() { "doublecircle" } else { "circle" };

        writeln!(out, "{} [shape=\"{}\",label=\"{}\"]", position, shape, quoted(&label_string(state.label())))?;
        positions.insert(id, position);
    }

    if let Some(start) = positions.get(&automaton.start()) {
        writeln!(out, "start->{}", start)?;
    }

    for transition in automaton.transitions() {
        let (Some(from), Some(to)) = (positions.get(&transition.source), positions.get(&transition.destination)) else { continue; };

        writeln!(out, "{}->{} [label=\"{}\"]", from, to, quoted(&symbol_string(&transition.symbol)))?;
    }

    writeln!(out, "}}")?;

    Ok(())
}

///
/// Formats a metastate as `{a,b,c}` using the names of its member states
///
pub fn metastate_label(members: &StateSet, name: impl Fn(StateId) -> String) -> String {
    let names: Vec<String> = members.iter().map(|member| name(*member)).collect();

    format!("{{{}}}", names.join(","))
}
