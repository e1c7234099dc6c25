//! Plain-text and Graphviz views of grammars, automata and tables.
//!
//! Everything here goes through the public lookups of the `lr0` crate
//! (`Tables::action`, `Tables::goto`, `Automaton::transitions`, ...), never
//! through table internals.

use lr0::{Action, Automaton, Conflict, Grammar, Item, Tables, item};
use std::io::{self, Write};

/// Writes the declared nonterminals on one line.
pub fn write_nonterminals<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    writeln!(
        out,
        "Nonterminals (N): {}",
        grammar.nonterminals().collect::<Vec<_>>().join(" ")
    )
}

/// Writes the declared terminals on one line.
pub fn write_terminals<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    writeln!(
        out,
        "Terminals (E): {}",
        grammar.terminals().collect::<Vec<_>>().join(" ")
    )
}

/// Writes the productions grouped per nonterminal, `A -> x | y`.
pub fn write_rules<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    writeln!(out, "Productions (P):")?;
    for (n, name) in grammar.nonterminals().enumerate() {
        let bodies: Vec<String> = grammar
            .alternatives(n)
            .iter()
            .map(|&p| grammar.format_body(p))
            .collect();
        if !bodies.is_empty() {
            writeln!(out, "  {} -> {}", name, bodies.join(" | "))?;
        }
    }
    Ok(())
}

/// Writes the start symbol and its alternatives.
pub fn write_start<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    let start = grammar.start();
    let bodies: Vec<String> = grammar
        .alternatives(start)
        .iter()
        .map(|&p| grammar.format_body(p))
        .collect();
    writeln!(
        out,
        "Start symbol (S): {}  [{}]",
        grammar.nonterminal_name(start),
        bodies.join(" | ")
    )
}

/// Writes every part of the grammar.
pub fn write_grammar<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    write_nonterminals(out, grammar)?;
    write_terminals(out, grammar)?;
    write_start(out, grammar)?;
    write_rules(out, grammar)
}

/// Writes whether the grammar is context-free. Every left-hand side of a
/// validated [`Grammar`] is a single nonterminal, so this is always true.
pub fn write_cfg_check<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    let is_cfg = grammar.productions()[Grammar::AUGMENTED + 1..]
        .iter()
        .all(|p| p.lhs() < grammar.n_nonterminals());
    writeln!(out, "Is CFG: {}", is_cfg)
}

/// Writes the numbered production arena, augmented production first.
pub fn write_productions<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    let width = grammar.productions().len().saturating_sub(1).to_string().len();
    for id in 0..grammar.productions().len() {
        writeln!(out, "{:>width$}  {}", id, grammar.format_production(id))?;
    }
    Ok(())
}

/// Writes the canonical collection: kernel items, closure items (indented),
/// then the outgoing transitions of each state.
pub fn write_states<W: Write>(out: &mut W, automaton: &Automaton) -> io::Result<()> {
    let grammar = automaton.grammar();
    writeln!(out, "{} states", automaton.len())?;
    for (id, items) in automaton.states() {
        writeln!(out, "\nState {}", id)?;
        let kernel = item::kernel(items);
        for it in &kernel {
            writeln!(out, "  {}", it.display(grammar))?;
        }
        for it in items.iter().filter(|it| !kernel.contains(it)) {
            writeln!(out, "    {}", it.display(grammar))?;
        }
        for (symbol, to) in automaton.transitions(id) {
            writeln!(out, "  on {} goto {}", grammar.symbol_name(symbol), to)?;
        }
    }
    Ok(())
}

/// Writes the ACTION/GOTO grid (`s4` shift, `r2` reduce, `acc` accept, empty
/// for error), then any conflicts the tables were built with.
pub fn write_tables<W: Write>(out: &mut W, tables: &Tables) -> io::Result<()> {
    let grammar = tables.grammar();
    let n_cols = grammar.n_terminals() + 1;

    let mut header = vec!["state".to_owned()];
    header.extend((0..n_cols).map(|t| grammar.terminal_name(t).to_owned()));
    header.extend(grammar.nonterminals().map(str::to_owned));

    let mut rows = Vec::with_capacity(tables.n_states());
    for state in tables.states() {
        let mut row = vec![state.to_string()];
        row.extend((0..n_cols).map(|t| {
            tables
                .action(state, t)
                .map(|a| a.to_string())
                .unwrap_or_default()
        }));
        row.extend((0..grammar.n_nonterminals()).map(|n| {
            tables
                .goto(state, n)
                .map(|s| s.to_string())
                .unwrap_or_default()
        }));
        rows.push(row);
    }

    let widths: Vec<usize> = (0..header.len())
        .map(|c| {
            rows.iter()
                .map(|row| row[c].len())
                .chain(std::iter::once(header[c].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    // the ACTION and GOTO halves are separated by a bar
    let write_row = |out: &mut W, row: &[String]| -> io::Result<()> {
        for (c, cell) in row.iter().enumerate() {
            if c == 1 || c == 1 + n_cols {
                write!(out, " |")?;
            }
            write!(out, " {:>w$}", cell, w = widths[c])?;
        }
        writeln!(out)
    };
    write_row(&mut *out, &header)?;
    for row in &rows {
        write_row(&mut *out, row)?;
    }

    if !tables.conflicts().is_empty() {
        writeln!(out)?;
        writeln!(out, "Resolved conflicts (shift preferred):")?;
        write_conflicts(out, grammar, tables.conflicts())?;
    }
    Ok(())
}

/// Writes one line per conflict, naming the productions of competing reduces.
pub fn write_conflicts<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    conflicts: &[Conflict],
) -> io::Result<()> {
    for c in conflicts {
        let actions: Vec<String> = c
            .actions
            .iter()
            .map(|a| match *a {
                Action::Accept => "accept".to_owned(),
                Action::Shift(s) => format!("shift {}", s),
                Action::Reduce(p) => format!("reduce {} ({})", p, grammar.format_production(p)),
            })
            .collect();
        writeln!(
            out,
            "  state {}, on `{}`: {}",
            c.state,
            c.lookahead,
            actions.join(" / ")
        )?;
    }
    Ok(())
}

/// Converts the automaton to the Graphviz [dot](https://graphviz.org/docs/layouts/dot/)
/// language. The accepting state is drawn with a double border.
pub fn to_dot(automaton: &Automaton) -> String {
    let grammar = automaton.grammar();
    let accept = Item {
        prod: Grammar::AUGMENTED,
        dot: 1,
    };

    let nodes: String = automaton
        .states()
        .map(|(id, items)| {
            let label = items
                .iter()
                .map(|it| escape(&it.display(grammar).to_string()))
                .collect::<Vec<_>>()
                .join(r"\l");
            let shape = if items.contains(&accept) {
                ", peripheries=2"
            } else {
                ""
            };
            format!("\t{} [label=\"{}: \\l{}\\l\"{}];\n", id, id, label, shape)
        })
        .collect();

    let edges: String = automaton
        .states()
        .flat_map(|(id, _)| {
            automaton.transitions(id).map(move |(symbol, to)| {
                format!(
                    "\t{} -> {} [label=\"{}\"];\n",
                    id,
                    to,
                    escape(grammar.symbol_name(symbol))
                )
            })
        })
        .collect();

    format!(
        "digraph lr0 {{\n\
            \trankdir=LR;\n\
            \tnode [shape=rectangle];\n\
            \n\
            {}\
            \n\
            {}\
        }}\n",
        nodes, edges
    )
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr0::TableOptions;

    fn balanced() -> Grammar {
        Grammar::new(
            ["S"],
            ["a", "b", "c"],
            "S",
            [(
                "S",
                vec![vec!["a", "S", "b", "S"], vec!["a", "S"], vec!["c"]],
            )],
        )
        .unwrap()
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn grammar_views() {
        let g = balanced();
        let text = render(|out| write_grammar(out, &g));
        assert_eq!(
            text,
            "Nonterminals (N): S\n\
             Terminals (E): a b c\n\
             Start symbol (S): S  [a S b S | a S | c]\n\
             Productions (P):\n  S -> a S b S | a S | c\n"
        );
        let text = render(|out| write_productions(out, &g));
        assert_eq!(text, "0  S' -> S\n1  S -> a S b S\n2  S -> a S\n3  S -> c\n");
    }

    #[test]
    fn loaded_grammars_are_context_free() {
        let text = render(|out| write_cfg_check(out, &balanced()));
        assert_eq!(text, "Is CFG: true\n");
    }

    #[test]
    fn states_listing() {
        let a = lr0::build(balanced()).unwrap();
        let text = render(|out| write_states(out, &a));
        assert!(text.starts_with("7 states\n"));
        assert!(text.contains("\nState 4\n  S -> a S • b S\n  S -> a S •\n  on b goto 5\n"));
        // closure items are indented further
        assert!(text.contains("\nState 0\n  S' -> • S\n    S -> • a S b S\n"));
    }

    #[test]
    fn table_grid_and_conflicts() {
        let a = lr0::build(balanced()).unwrap();
        let t = lr0::compile_with(&a, &TableOptions::prefer_shift()).unwrap();
        let text = render(|out| write_tables(out, &t));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], " state |  a  b  c   $ | S");
        assert_eq!(lines[1], "     0 | s2    s3     | 1");
        assert_eq!(lines[2], "     1 |          acc |  ");
        assert_eq!(lines[5], "     4 | r2 s5 r2  r2 |  ");
        assert!(text.ends_with(
            "Resolved conflicts (shift preferred):\n  state 4, on `b`: shift 5 / reduce 2 (S -> a S)\n"
        ));
    }

    #[test]
    fn conflict_listing_for_rejected_grammar() {
        let g = Grammar::new(["S"], ["a"], "S", [("S", vec![vec!["a"], vec!["a"]])]).unwrap();
        let a = lr0::build(g).unwrap();
        let err = lr0::compile(&a).unwrap_err();
        let text = render(|out| write_conflicts(out, a.grammar(), err.conflicts()));
        assert_eq!(
            text,
            "  state 2, on `a`: reduce 1 (S -> a) / reduce 2 (S -> a)\n\
             \x20 state 2, on `$`: reduce 1 (S -> a) / reduce 2 (S -> a)\n"
        );
    }

    #[test]
    fn dot_output() {
        let a = lr0::build(balanced()).unwrap();
        let dot = to_dot(&a);
        assert!(dot.starts_with("digraph lr0 {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("\t0 -> 1 [label=\"S\"];\n"));
        assert!(dot.contains("\t4 -> 5 [label=\"b\"];\n"));
        assert!(dot.contains("\t1 [label=\"1: \\lS' -> S •\\l\", peripheries=2];\n"));
        // one label per state and one per transition
        assert_eq!(dot.matches("[label=\"").count(), 7 + 10);
    }
}
