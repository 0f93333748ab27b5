mod error;
mod report;

use clap::{Args, Parser, Subcommand, ValueEnum};
use error::Error;
use log::debug;
use paraform_compute::{
    equiv::{assoc_generate, dist_generate},
    parallel::{parallel_form, parallel_form_with_steps},
    schedule::CostTable,
    search::{analyze, beam_search, exhaustive, SearchOptions},
    tree::depth,
};
use paraform_parser::parser::{ast::{Node, Op}, parse_expression};
use report::{FormsReport, NormalizeReport, ScheduleReport, SearchReport};
use rustyline::{error::ReadlineError, DefaultEditor};
use serde::Serialize;
use std::{fmt::Display, io::{self, IsTerminal, Read}};

/// Finds the shape of an arithmetic expression that runs fastest on a parallel machine.
///
/// Without an expression argument, the expression is read from stdin; if stdin is a terminal, an
/// interactive prompt runs the subcommand on each line entered.
#[derive(Parser)]
#[command(name = "paraform", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parallel form of an expression
    Normalize {
        /// List the rewrites that were applied
        #[arg(long)]
        steps: bool,

        /// The expression to analyze
        expression: Option<String>,
    },

    /// List the forms of the parallel form that are equivalent by associativity
    Assoc {
        /// Maximum number of forms, including the parallel form itself
        #[arg(long, default_value_t = 60)]
        limit: usize,

        /// The expression to analyze
        expression: Option<String>,
    },

    /// List the forms of the parallel form that are equivalent by distributivity
    Dist {
        /// Maximum number of forms, including the parallel form itself
        #[arg(long, default_value_t = 60)]
        limit: usize,

        /// Maximum number of rewrites away from the parallel form
        #[arg(long, default_value_t = 4)]
        depth: usize,

        /// The expression to analyze
        expression: Option<String>,
    },

    /// Schedule the parallel form of an expression on a dataflow machine
    Schedule {
        #[command(flatten)]
        machine: MachineArgs,

        /// The expression to analyze
        expression: Option<String>,
    },

    /// Search the equivalent forms of an expression for the one that runs fastest
    Search {
        #[command(flatten)]
        machine: MachineArgs,

        #[command(flatten)]
        search: SearchArgs,

        /// Which search to run
        #[arg(long, value_enum, default_value_t = Strategy::Both)]
        strategy: Strategy,

        /// The expression to analyze
        expression: Option<String>,
    },
}

impl Command {
    /// Returns the expression given on the command line, if any.
    fn expression(&self) -> Option<&str> {
        match self {
            Self::Normalize { expression, .. }
            | Self::Assoc { expression, .. }
            | Self::Dist { expression, .. }
            | Self::Schedule { expression, .. }
            | Self::Search { expression, .. } => expression.as_deref(),
        }
    }
}

#[derive(Args, Clone, Debug)]
struct MachineArgs {
    /// Number of processors
    #[arg(short = 'p', long, default_value_t = 2, allow_negative_numbers = true)]
    processors: i64,

    /// Number of memory banks
    #[arg(short = 'm', long, default_value_t = 1, allow_negative_numbers = true)]
    memory_banks: i64,

    /// Time one memory access takes
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    mem_cost: i64,

    /// Duration of an operator, overriding the default (`+` and `-` take 1, `*` and `/` take 2)
    #[arg(long = "cost", value_name = "OP=N", value_parser = parse_cost)]
    costs: Vec<(Op, u64)>,
}

impl MachineArgs {
    /// Returns the default cost table with the overrides applied.
    fn cost_table(&self) -> CostTable {
        let mut costs = CostTable::default();
        for &(op, cost) in &self.costs {
            costs.set(op, cost);
        }
        costs
    }
}

#[derive(Args, Clone, Debug)]
struct SearchArgs {
    /// Maximum number of forms found by regrouping
    #[arg(long, default_value_t = 60)]
    assoc_limit: usize,

    /// Maximum number of forms found by distributing
    #[arg(long, default_value_t = 60)]
    dist_limit: usize,

    /// Maximum number of distributive rewrites away from the base form
    #[arg(long, default_value_t = 4)]
    dist_depth: usize,

    /// Number of candidates kept between beam search rounds
    #[arg(long, default_value_t = 8)]
    beam_width: usize,

    /// Number of beam search rounds
    #[arg(long, default_value_t = 6)]
    rounds: usize,

    /// Maximum number of regrouping neighbors per candidate
    #[arg(long, default_value_t = 6)]
    neighbors_assoc: usize,

    /// Maximum number of distributive neighbors per candidate
    #[arg(long, default_value_t = 6)]
    neighbors_dist: usize,

    /// Number of candidates reported by the beam search
    #[arg(long, default_value_t = 15)]
    top_k: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Score every generated form
    Exhaustive,

    /// Walk outward from the base form
    Beam,

    /// Run both searches
    Both,
}

/// Parses an operator cost given as `OP=N`.
fn parse_cost(value: &str) -> Result<(Op, u64), String> {
    let (symbol, cost) = value.split_once('=')
        .ok_or_else(|| format!("expected OP=N, found `{}`", value))?;
    let op = Op::from_symbol(symbol.trim())
        .ok_or_else(|| format!("unknown operator `{}`; expected one of + - * /", symbol.trim()))?;
    let cost = cost.trim().parse()
        .map_err(|err| format!("invalid cost `{}`: {}", cost.trim(), err))?;
    Ok((op, cost))
}

/// Prints the report as text or as JSON.
fn emit(report: &(impl Serialize + Display), json: bool) -> Result<(), Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

/// Parses the input and runs the subcommand on it.
fn run(command: &Command, input: &str, json: bool) -> Result<(), Error> {
    let tree = parse_expression(input).map_err(Error::Parse)?;
    debug!("parsed `{}` as {}", input, tree);

    match command {
        Command::Normalize { steps, .. } => {
            let (form, applied) = parallel_form_with_steps(&tree);
            emit(&NormalizeReport {
                input,
                depth_before: depth(&tree),
                depth_after: depth(&form),
                parallel_form: form.to_string(),
                steps: steps.then_some(applied),
            }, json)
        },
        Command::Assoc { limit, .. } => {
            let base = parallel_form(&tree);
            let forms = assoc_generate(&base, *limit);
            emit(&forms_report(input, &base, &forms), json)
        },
        Command::Dist { limit, depth, .. } => {
            let base = parallel_form(&tree);
            let forms = dist_generate(&base, *limit, *depth);
            emit(&forms_report(input, &base, &forms), json)
        },
        Command::Schedule { machine: args, .. } => {
            let base = parallel_form(&tree);
            let costs = args.cost_table();
            let machine = search_options(args, None).machine()?;
            let (graph, schedule, metrics) = analyze(&base, &costs, &machine)?;
            emit(&ScheduleReport {
                input,
                parallel_form: base.to_string(),
                machine,
                costs: &costs,
                root: graph.root,
                tasks: graph.tasks,
                metrics,
                runs: schedule.runs,
            }, json)
        },
        Command::Search { machine: args, search, strategy, .. } => {
            let base = parallel_form(&tree);
            let options = search_options(args, Some(search));
            let machine = options.machine()?;

            let exhaustive = match strategy {
                Strategy::Exhaustive | Strategy::Both => Some(exhaustive(&base, &options)?.candidates),
                Strategy::Beam => None,
            };
            let beam = match strategy {
                Strategy::Beam | Strategy::Both => Some(beam_search(&base, &options)?),
                Strategy::Exhaustive => None,
            };

            emit(&SearchReport {
                input,
                base: base.to_string(),
                machine,
                costs: &options.costs,
                exhaustive,
                beam,
            }, json)
        },
    }
}

fn forms_report<'a>(input: &'a str, base: &Node, forms: &[Node]) -> FormsReport<'a> {
    FormsReport {
        input,
        base: base.to_string(),
        forms: forms.iter().map(Node::to_string).collect(),
    }
}

/// Maps the command-line options onto the search options.
fn search_options(machine: &MachineArgs, search: Option<&SearchArgs>) -> SearchOptions {
    let builder = SearchOptions::builder()
        .processors(machine.processors)
        .memory_banks(machine.memory_banks)
        .mem_cost(machine.mem_cost)
        .costs(machine.cost_table());

    match search {
        Some(search) => builder
            .assoc_limit(search.assoc_limit)
            .dist_limit(search.dist_limit, search.dist_depth)
            .beam_width(search.beam_width)
            .rounds(search.rounds)
            .neighbors(search.neighbors_assoc, search.neighbors_dist)
            .top_k(search.top_k)
            .build(),
        None => builder.build(),
    }
}

/// Runs the subcommand on the input, reporting any error to stderr. Returns true on success.
fn execute(command: &Command, input: &str, json: bool) -> bool {
    match run(command, input, json) {
        Ok(()) => true,
        Err(err) => {
            err.report_to_stderr(input);
            false
        },
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Some(input) = cli.command.expression() {
        if !execute(&cli.command, input, cli.json) {
            std::process::exit(1);
        }
    } else if !io::stdin().is_terminal() {
        // read the expression from stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            eprintln!("error: could not read stdin: {}", err);
            std::process::exit(1);
        }

        if !execute(&cli.command, input.trim(), cli.json) {
            std::process::exit(1);
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("error: could not start the prompt: {}", err);
                std::process::exit(1);
            },
        };

        fn process_line(rl: &mut DefaultEditor, cli: &Cli) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            execute(&cli.command, &input, cli.json);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &cli) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn cost_argument() {
        assert_eq!(parse_cost("*=3"), Ok((Op::Mul, 3)));
        assert_eq!(parse_cost(" / = 0 "), Ok((Op::Div, 0)));
        assert!(parse_cost("^=1").is_err());
        assert!(parse_cost("+").is_err());
        assert!(parse_cost("+=-1").is_err());
    }

    #[test]
    fn cost_overrides() {
        let cli = Cli::parse_from(["paraform", "schedule", "--cost", "*=5", "--cost", "+=2", "a*b"]);
        let Command::Schedule { machine, expression } = cli.command else {
            panic!("expected the schedule subcommand");
        };
        assert_eq!(expression.as_deref(), Some("a*b"));
        assert_eq!(machine.cost_table(), CostTable::default().with(Op::Mul, 5).with(Op::Add, 2));
    }

    #[test]
    fn negative_counts_reach_validation() {
        let cli = Cli::parse_from(["paraform", "search", "-p", "-1", "a+b"]);
        let Command::Search { machine, search, .. } = cli.command else {
            panic!("expected the search subcommand");
        };
        assert!(search_options(&machine, Some(&search)).machine().is_err());
    }

    #[test]
    fn search_defaults_match_library() {
        let cli = Cli::parse_from(["paraform", "search", "a+b"]);
        let Command::Search { machine, search, strategy, .. } = cli.command else {
            panic!("expected the search subcommand");
        };
        assert_eq!(strategy, Strategy::Both);
        assert_eq!(search_options(&machine, Some(&search)), SearchOptions::default());
    }
}
