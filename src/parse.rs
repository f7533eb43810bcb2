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
//! # Parse
//!
//! A small recursive-descent parser that turns a regular expression into a non-deterministic automaton using the
//! Thompson construction. It understands alternation (`|`), concatenation, zero-or-more repetition (`*`) and
//! parentheses:
//!
//! ```text
//! regexp   -> option
//! option   -> sequence {'|' sequence}
//! sequence -> subexp {subexp}
//! subexp   -> '(' option ')' ['*'] | CHARACTER ['*']
//! ```
//!
//! Any character other than `|`, `(`, `)` and `*` is matched literally. The parser also collects the alphabet (the
//! distinct characters used, in the order they first appear), which is what `determinize` needs.
//!
//! ```
//! # use metastate::*;
//! let parsed = parse("(a|b)*c").unwrap();
//!
//! assert!(parsed.alphabet == vec!['a', 'b', 'c']);
//! assert!(parsed.nfa.accepts("abac".chars()));
//! ```
//!

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use log::debug;

use super::automaton::*;
use super::thompson::*;

///
/// The result of parsing a regular expression
///
#[derive(Clone, Debug)]
pub struct Parsed {
    /// Automaton that accepts the language of the expression
    pub nfa: Automaton<char, String>,

    /// The characters that appear in the expression, in order of first appearance
    pub alphabet: Vec<char>,
}

///
/// What went wrong while parsing
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParseErrorKind {
    /// The expression ended where more was expected
    UnexpectedEnd,

    /// A character appeared where it isn't allowed
    UnexpectedCharacter(char),

    /// A complete expression was followed by more input
    TrailingInput(char),
}

///
/// A regular expression that couldn't be parsed
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ParseError {
    /// Byte offset in the expression where the problem was found
    pub position: usize,

    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseErrorKind::UnexpectedEnd               => write!(formatter, "unexpected end of expression at {}", self.position),
            ParseErrorKind::UnexpectedCharacter(found)  => write!(formatter, "unexpected '{}' at {}", found, self.position),
            ParseErrorKind::TrailingInput(found)        => write!(formatter, "unmatched '{}' at {}", found, self.position),
        }
    }
}

impl std::error::Error for ParseError {}

///
/// Parses a regular expression into an NFA, using zero-or-more repetition for `*`
///
pub fn parse(expression: &str) -> Result<Parsed, ParseError> {
    parse_with(expression, ClosureStyle::Kleene)
}

///
/// Parses a regular expression into an NFA, using the specified closure construction for `*`
///
pub fn parse_with(expression: &str, style: ClosureStyle) -> Result<Parsed, ParseError> {
    let mut parser = Parser { input: expression.char_indices().peekable(), length: expression.len(), alphabet: vec![], style: style };
    let nfa = parser.regexp()?;

    debug!("Parsed '{}' into {} states over {} symbols", expression, nfa.count_states(), parser.alphabet.len());

    Ok(Parsed { nfa: nfa, alphabet: parser.alphabet })
}

///
/// State of a parse in progress
///
struct Parser<'a> {
    input:      Peekable<CharIndices<'a>>,
    length:     usize,
    alphabet:   Vec<char>,
    style:      ClosureStyle,
}

impl<'a> Parser<'a> {
    fn peek(&mut self) -> Option<char> {
        self.input.peek().map(|(_, c)| *c)
    }

    fn position(&mut self) -> usize {
        let length = self.length;
        self.input.peek().map(|(pos, _)| *pos).unwrap_or(length)
    }

    fn error(&mut self, kind: ParseErrorKind) -> ParseError {
        ParseError { position: self.position(), kind: kind }
    }

    fn regexp(&mut self) -> Result<Automaton<char, String>, ParseError> {
        let fsm = self.option()?;

        match self.peek() {
            None        => Ok(fsm),
            Some(c)     => Err(self.error(ParseErrorKind::TrailingInput(c))),
        }
    }

    fn option(&mut self) -> Result<Automaton<char, String>, ParseError> {
        let mut left = self.sequence()?;

        while self.peek() == Some('|') {
            self.input.next();

            let right = self.sequence()?;
            left = union(left, right);
        }

        Ok(left)
    }

    fn sequence(&mut self) -> Result<Automaton<char, String>, ParseError> {
        let mut left = self.subexp()?;

        while let Some(c) = self.peek() {
            if c == '|' || c == ')' || c == '*' {
                break;
            }

            let right = self.subexp()?;
            left = concatenation(left, right);
        }

        Ok(left)
    }

    fn subexp(&mut self) -> Result<Automaton<char, String>, ParseError> {
        let mut fsm = match self.peek() {
            None => return Err(self.error(ParseErrorKind::UnexpectedEnd)),

            Some('(') => {
                self.input.next();
                let inner = self.option()?;

                match self.peek() {
                    Some(')')   => { self.input.next(); }
                    Some(c)     => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
                    None        => return Err(self.error(ParseErrorKind::UnexpectedEnd)),
                }

                inner
            }

            Some(c) if c == '|' || c == ')' || c == '*' => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),

            Some(c) => {
                self.input.next();

                if !self.alphabet.contains(&c) {
                    self.alphabet.push(c);
                }

                Automaton::from_symbol(c)
            }
        };

        while self.peek() == Some('*') {
            self.input.next();
            fsm = closure_with(fsm, self.style);
        }

        Ok(fsm)
    }
}
