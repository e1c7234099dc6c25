//! Command-line interface for the `lr0` engine.
//!
//! Loads a grammar file and prints its parts, the canonical collection, the
//! ACTION/GOTO tables or a Graphviz view of the automaton, or parses a
//! sequence of terminals given on the command line.

#[cfg(feature = "cli")]
mod real {
    use anyhow::Result;
    use clap::{Parser, Subcommand, ValueEnum};
    use lr0::{BuildOptions, ParseDriver, ParseOutcome, TableError, TableOptions, Tables};
    use lr0_tools::{loader, report};
    use std::io::{self, Write};
    use std::path::PathBuf;
    use std::process::ExitCode;

    #[derive(Parser, Debug)]
    #[command(version, about = "LR(0) automaton, table and parse tool", long_about = None)]
    struct Args {
        /// Path to the grammar file
        grammar: PathBuf,

        /// Stop building the automaton beyond this many states
        #[arg(long)]
        max_states: Option<usize>,

        /// Enable debug logging (off by default).
        #[arg(short = 'd', long)]
        debug: bool,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand, Debug)]
    enum Commands {
        /// Shows the grammar
        Show {
            #[arg(long, value_enum, default_value_t = What::All)]
            what: What,
        },
        /// Lists the canonical collection of LR(0) item sets
        States,
        /// Prints the ACTION/GOTO tables
        Table {
            /// Resolve conflicts in favour of shifts instead of failing
            #[arg(long)]
            prefer_shift: bool,
        },
        /// Prints the automaton in Graphviz dot format
        Dot,
        /// Parses a sequence of terminals
        Parse {
            /// Resolve conflicts in favour of shifts instead of failing
            #[arg(long)]
            prefer_shift: bool,
            /// Terminal names, in input order
            tokens: Vec<String>,
        },
    }

    #[derive(ValueEnum, Clone, Copy, Debug)]
    enum What {
        Nonterminals,
        Terminals,
        Productions,
        Start,
        Cfg,
        All,
    }

    fn table_options(prefer_shift: bool) -> TableOptions {
        if prefer_shift {
            TableOptions::prefer_shift()
        } else {
            TableOptions::default()
        }
    }

    /// Compiles the tables, or prints the conflicts and returns `None`.
    fn compile(
        automaton: &lr0::Automaton,
        prefer_shift: bool,
        out: &mut impl Write,
    ) -> Result<Option<Tables>> {
        match Tables::compile_with(automaton, &table_options(prefer_shift)) {
            Ok(tables) => Ok(Some(tables)),
            Err(err @ TableError::GrammarNotLR0 { .. }) => {
                writeln!(out, "{}", err)?;
                report::write_conflicts(out, automaton.grammar(), err.conflicts())?;
                writeln!(out, "(use --prefer-shift to resolve them)")?;
                Ok(None)
            }
        }
    }

    pub fn main() -> Result<ExitCode> {
        let args = Args::parse();

        let mut logger = env_logger::Builder::from_default_env();
        if args.debug {
            logger.filter_level(log::LevelFilter::Debug);
        }
        logger.init();

        let stdout = io::stdout();
        run(args, &mut stdout.lock())
    }

    fn run(args: Args, out: &mut impl Write) -> Result<ExitCode> {
        let grammar = loader::load_file(&args.grammar)?;

        if let Commands::Show { what } = args.command {
            match what {
                What::Nonterminals => report::write_nonterminals(out, &grammar)?,
                What::Terminals => report::write_terminals(out, &grammar)?,
                What::Productions => report::write_rules(out, &grammar)?,
                What::Start => report::write_start(out, &grammar)?,
                What::Cfg => report::write_cfg_check(out, &grammar)?,
                What::All => {
                    report::write_grammar(out, &grammar)?;
                    report::write_cfg_check(out, &grammar)?;
                    writeln!(out)?;
                    report::write_productions(out, &grammar)?;
                }
            }
            return Ok(ExitCode::SUCCESS);
        }

        let options = BuildOptions {
            max_states: args.max_states,
        };
        let automaton = lr0::build_with(grammar, &options)?;

        match args.command {
            Commands::Show { .. } => {}
            Commands::States => report::write_states(out, &automaton)?,
            Commands::Dot => write!(out, "{}", report::to_dot(&automaton))?,
            Commands::Table { prefer_shift } => {
                let Some(tables) = compile(&automaton, prefer_shift, out)? else {
                    return Ok(ExitCode::FAILURE);
                };
                report::write_tables(out, &tables)?;
            }
            Commands::Parse {
                prefer_shift,
                tokens,
            } => {
                let Some(tables) = compile(&automaton, prefer_shift, out)? else {
                    return Ok(ExitCode::FAILURE);
                };
                let mut driver = ParseDriver::new(&tables);
                let outcome = driver.parse(&tokens);
                log::info!("Stats: {:?}", driver.stats());
                match outcome {
                    ParseOutcome::Accepted => writeln!(out, "accepted")?,
                    ParseOutcome::Rejected(err) => {
                        writeln!(out, "rejected: {}", err)?;
                        return Ok(ExitCode::FAILURE);
                    }
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }

}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<std::process::ExitCode> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("lr0 disabled (compiled without `cli` feature)");
}
