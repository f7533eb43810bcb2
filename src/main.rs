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
//! Reads regular expressions, one per line, and writes each one out as a Graphviz diagram of its automaton. The N-th
//! expression is written to `N.dot` in the output directory.
//!

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use metastate::logging::{init_log, LogMode};
use metastate::*;

#[derive(Parser, Clone, Debug)]
#[command(about = "Convert regular expressions into automata diagrams")]
struct Cli {
    /// File containing one expression per line (reads standard input if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory where the .dot files are written
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Write the deterministic automaton instead of the NFA
    #[arg(short, long, default_value_t = false)]
    deterministic: bool,

    /// Build `*` without the start-to-end epsilon edge (the empty string is then only accepted if the repeated
    /// expression accepts it)
    #[arg(long, default_value_t = false)]
    literal_closure: bool,

    /// Text used to label epsilon transitions
    #[arg(long, default_value = "&#949;")]
    epsilon: String,

    /// Give up on an expression whose deterministic automaton needs more states than this
    #[arg(long)]
    max_states: Option<usize>,

    /// Font for nodes and edges
    #[arg(long, default_value = "Verdana")]
    font: String,

    /// Graphviz rank direction
    #[arg(long, default_value = "LR")]
    rankdir: String,

    /// Report progress while converting
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn closure_style(&self) -> ClosureStyle {
        if self.literal_closure { ClosureStyle::Literal } else { ClosureStyle::Kleene }
    }

    fn dot_style(&self) -> DotStyle {
        DotStyle { font: self.font.clone(), rank_direction: self.rankdir.clone() }
    }
}

///
/// Converts a single expression and writes its diagram to `out`
///
fn convert(cli: &Cli, expression: &str, out: &mut impl Write) -> Result<()> {
    let parsed      = parse_with(expression, cli.closure_style())?;
    let nfa         = parsed.nfa.map_labels(|position, _, _| format!("s{}", position));
    let style       = cli.dot_style();

    let symbol_string = |symbol: &Symbol<char>| match symbol {
        Symbol::Epsilon     => cli.epsilon.clone(),
        Symbol::Char(c)     => c.to_string(),
    };

    if cli.deterministic {
        let mut determinizer = Determinizer::new(&nfa, &parsed.alphabet);
        if let Some(limit) = cli.max_states {
            determinizer = determinizer.with_state_limit(limit);
        }

        let dfa     = determinizer.build()?;
        let name    = |id: StateId| nfa.state(id).map(|state| state.label().clone()).unwrap_or_default();

        write_dot(out, &dfa, &style, symbol_string, |members| metastate_label(members, &name))?;
    } else {
        write_dot(out, &nfa, &style, symbol_string, |label| label.clone())?;
    }

    Ok(())
}

///
/// Converts every non-empty line of `reader`, writing the N-th expression to `N.dot` in the output directory
///
/// Returns the number of expressions seen and the number that failed. A failed expression leaves no file behind.
///
fn convert_all(cli: &Cli, reader: impl BufRead) -> Result<(usize, usize)> {
    let mut failures    = 0;
    let mut count       = 0;

    for line in reader.lines() {
        let line        = line.context("can't read expression")?;
        let expression  = line.trim_end_matches('\r');

        if expression.is_empty() {
            continue;
        }

        count += 1;

        let path        = cli.output.join(format!("{}.dot", count));
        let file        = File::create(&path).with_context(|| format!("can't create {}", path.display()))?;
        let mut out     = BufWriter::new(file);

        match convert(cli, expression, &mut out) {
            Ok(()) => {
                out.flush().with_context(|| format!("can't write {}", path.display()))?;
                info!("'{}' written to {}", expression, path.display());
            }

            Err(err) => {
                drop(out);
                if let Err(remove_err) = std::fs::remove_file(&path) {
                    warn!("can't remove {}: {}", path.display(), remove_err);
                }

                error!("'{}': {:#}", expression, err);
                failures += 1;
            }
        }
    }

    Ok((count, failures))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_log(if cli.verbose { LogMode::Verbose } else { LogMode::Normal })?;

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path)  => Box::new(BufReader::new(File::open(path).with_context(|| format!("can't open {}", path.display()))?)),
        None        => Box::new(BufReader::new(io::stdin())),
    };

    let (count, failures) = convert_all(&cli, reader)?;

    if failures > 0 {
        anyhow::bail!("{} of {} expressions could not be converted", failures, count);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("metastate").chain(args.iter().cloned())).unwrap()
    }

    fn render(cli: &Cli, expression: &str) -> Result<String> {
        let mut output = vec![];
        convert(cli, expression, &mut output)?;

        Ok(String::from_utf8(output)?)
    }

    fn count_nodes(dot: &str) -> usize {
        dot.lines().filter(|line| line.contains("circle\"")).count()
    }

    #[test]
    fn defaults_match_documented_options() {
        let cli = cli(&[]);

        assert!(cli.input.is_none());
        assert!(cli.output == PathBuf::from("."));
        assert!(!cli.deterministic);
        assert!(cli.epsilon == "&#949;");
        assert!(cli.max_states.is_none());
        assert!(cli.closure_style() == ClosureStyle::Kleene);
        assert!(cli.dot_style() == DotStyle::default());
    }

    #[test]
    fn can_parse_flags() {
        let cli = cli(&["-d", "--max-states", "4", "--literal-closure", "--rankdir", "TB", "--font", "Courier"]);

        assert!(cli.deterministic);
        assert!(cli.max_states == Some(4));
        assert!(cli.closure_style() == ClosureStyle::Literal);
        assert!(cli.dot_style() == DotStyle { font: "Courier".to_string(), rank_direction: "TB".to_string() });
    }

    #[test]
    fn nfa_output_labels_states_by_position() {
        let dot = render(&cli(&[]), "ab").unwrap();

        assert!(count_nodes(&dot) == 4);
        assert!(dot.contains("0 [shape=\"circle\",label=\"s0\"]"));
        assert!(dot.contains("label=\"s3\""));
        assert!(dot.contains("[label=\"&#949;\"]"));
        assert!(dot.contains("start->0"));
    }

    #[test]
    fn deterministic_output_for_union_has_three_states() {
        let dot = render(&cli(&["--deterministic"]), "a|b").unwrap();

        assert!(count_nodes(&dot) == 3);
        assert!(dot.lines().filter(|line| line.contains("doublecircle")).count() == 2);
        assert!(!dot.contains("&#949;"));
        assert!(dot.contains("label=\"{s0,"));
        assert!(dot.contains("0->1 [label=\"a\"]"));
        assert!(dot.contains("0->2 [label=\"b\"]"));
    }

    #[test]
    fn epsilon_text_is_configurable() {
        let dot = render(&cli(&["--epsilon", "eps"]), "a*").unwrap();

        assert!(dot.contains("[label=\"eps\"]"));
        assert!(!dot.contains("&#949;"));
    }

    #[test]
    fn state_limit_failure_is_reported() {
        let err = render(&cli(&["--deterministic", "--max-states", "1"]), "a|b").unwrap_err();

        assert!(err.downcast_ref::<DeterminizeError>() == Some(&DeterminizeError::StateLimitExceeded { limit: 1 }));
    }

    #[test]
    fn state_limit_is_ignored_for_nfa_output() {
        assert!(render(&cli(&["--max-states", "1"]), "a|b").is_ok());
    }

    #[test]
    fn bad_expression_is_reported() {
        let err = render(&cli(&[]), "(ab").unwrap_err();

        assert!(err.downcast_ref::<ParseError>().map(|err| err.kind) == Some(ParseErrorKind::UnexpectedEnd));
    }

    #[test]
    fn files_are_numbered_and_failures_removed() {
        let dir = std::env::temp_dir().join(format!("metastate-convert-all-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut cli = cli(&[]);
        cli.output  = dir.clone();

        let input = "a|b\n\n(ab\nab*\r\n";
        let (count, failures) = convert_all(&cli, input.as_bytes()).unwrap();

        let first   = std::fs::read_to_string(dir.join("1.dot")).unwrap();
        let second  = dir.join("2.dot").exists();
        let third   = std::fs::read_to_string(dir.join("3.dot")).unwrap();

        std::fs::remove_dir_all(&dir).unwrap();

        assert!(count == 3);
        assert!(failures == 1);
        assert!(first.starts_with("digraph fsm"));
        assert!(!second);
        assert!(third.ends_with("}\n"));
    }
}
