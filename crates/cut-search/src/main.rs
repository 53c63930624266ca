//! CLI entry point for cut search.
//!
//! Usage:
//!   cut-search search <grids.txt> [options]
//!   cut-search search --stdin [options]
//!
//! The input holds the source grid, a blank line, then the destination grid.
//!
//! Options:
//!   --strategy <name>      bfs, dfs, dfs-iterative, ida-star, a-star or all (default: all)
//!   --heuristic <name>     trivial, admissible or non-admissible (default: admissible)
//!   --max-solutions <n>    Stop each strategy after n solutions (default: unbounded)
//!   --timeout <seconds>    Budget per strategy, 0 for none (default: 15)
//!   --json                 Print a JSON report instead of text
//!   -v, --verbose          Raise log level (repeatable)

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use cut_search::{
    parse_pair, solve, solve_all, Heuristic, Path, Problem, RunStats, SolverConfig, SolverResult,
    Strategy,
};

#[derive(Parser)]
#[command(name = "cut-search")]
#[command(about = "Search for row/column cut sequences between character grids")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for cut sequences from the source grid to the destination grid
    Search {
        /// Path to the grid file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read grids from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Strategy to run
        #[arg(long, value_enum, default_value_t = StrategyArg::All)]
        strategy: StrategyArg,

        /// Heuristic for IDA* and A*
        #[arg(long, value_enum, default_value_t = HeuristicArg::Admissible)]
        heuristic: HeuristicArg,

        /// Maximum solutions per strategy
        #[arg(long)]
        max_solutions: Option<usize>,

        /// Time budget per strategy in seconds (0 disables the limit)
        #[arg(long, default_value = "15")]
        timeout: u64,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StrategyArg {
    Bfs,
    Dfs,
    DfsIterative,
    IdaStar,
    AStar,
    All,
}

impl StrategyArg {
    /// `None` means every strategy
    fn resolve(self) -> Option<Strategy> {
        match self {
            StrategyArg::Bfs => Some(Strategy::Bfs),
            StrategyArg::Dfs => Some(Strategy::DfsRecursive),
            StrategyArg::DfsIterative => Some(Strategy::DfsIterative),
            StrategyArg::IdaStar => Some(Strategy::IdaStar),
            StrategyArg::AStar => Some(Strategy::AStar),
            StrategyArg::All => None,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum HeuristicArg {
    Trivial,
    Admissible,
    NonAdmissible,
}

impl From<HeuristicArg> for Heuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Trivial => Heuristic::Trivial,
            HeuristicArg::Admissible => Heuristic::Admissible,
            HeuristicArg::NonAdmissible => Heuristic::NonAdmissible,
        }
    }
}

/// JSON report for one strategy
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StrategyReport<'a> {
    strategy: &'static str,
    stats: &'a RunStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_cost: Option<f64>,
    solutions: Vec<SolutionReport<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolutionReport<'a> {
    cost: f64,
    cuts: Vec<&'a str>,
    path: &'a Path,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

/// Returns whether any strategy found a solution
fn run(command: Commands) -> Result<bool> {
    let Commands::Search {
        file,
        stdin,
        strategy,
        heuristic,
        max_solutions,
        timeout,
        json,
    } = command;

    let text = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading grids from stdin")?;
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?
    } else {
        bail!("must provide either a file path or --stdin");
    };

    let (source, destination) = parse_pair(&text).context("parsing grids")?;
    let problem = Problem::new(source, destination);

    let config = SolverConfig {
        strategy: Strategy::Bfs,
        heuristic: Some(heuristic.into()),
        max_solutions: max_solutions.unwrap_or(usize::MAX),
        timeout: (timeout > 0).then(|| Duration::from_secs(timeout)),
    };

    let results = match strategy.resolve() {
        None => solve_all(&problem, &config)?,
        Some(strategy) => vec![solve(&problem, &SolverConfig { strategy, ..config })?],
    };

    if json {
        let reports: Vec<StrategyReport> = results.iter().map(report).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for result in &results {
            print_text(result);
        }
    }

    Ok(results.iter().any(|r| !r.solutions.is_empty()))
}

fn report(result: &SolverResult) -> StrategyReport<'_> {
    StrategyReport {
        strategy: result.strategy.name(),
        stats: &result.stats,
        best_cost: result.best().map(Path::cost),
        solutions: result
            .solutions
            .iter()
            .map(|path| SolutionReport {
                cost: path.cost(),
                cuts: path.steps(),
                path,
            })
            .collect(),
    }
}

fn print_text(result: &SolverResult) {
    println!("=== {} ===", result.strategy.name());
    for (i, path) in result.solutions.iter().enumerate() {
        println!("--- Solution {} ---", i + 1);
        println!("{path}");
    }
    let stats = &result.stats;
    println!(
        "Solutions: {}  Expanded: {}  Peak frontier: {}  Time: {} ms{}",
        stats.solutions_found,
        stats.expanded_node_count,
        stats.peak_frontier_size,
        stats.elapsed_ms,
        if stats.timed_out { "  (timed out)" } else { "" }
    );
    println!();
}
