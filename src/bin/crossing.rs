use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use anstream::eprintln;
use anstream::println;
use clap::Parser;
use hrsw::Stopwatch;
use human_duration::human_duration;
use owo_colors::OwoColorize;

use crossing::algorithms::bfs::BreadthFirstSearch;
use crossing::problem::BaseProblem;
use crossing::problems::river_crossing::Crossing;
use crossing::problems::river_crossing::PuzzleConfig;
use crossing::problems::river_crossing::PuzzleParseError;
use crossing::problems::river_crossing::RiverCrossingProblem;
use crossing::problems::river_crossing::RiverCrossingSpace;
use crossing::problems::river_crossing::RiverCrossingState;
use crossing::space::Path;
use crossing::transcript::write_moves;
use crossing::transcript::write_transcript;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Solves river-crossing puzzles with the fewest crossings.
///
/// Without a puzzle file it solves the farmer, fox, goose and grain puzzle.
#[derive(Parser, Debug)]
#[clap(long_version = crossing::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// JSON puzzle description.
    #[arg(env = "CROSSING_PUZZLE")]
    pub puzzle: Option<PathBuf>,

    /// Overrides how many entities the operator can carry along.
    #[arg(short, long)]
    pub capacity: Option<usize>,

    /// How many solutions to print, closest first.
    #[arg(short = 'n', long, default_value_t = NonZeroUsize::MIN)]
    pub solutions: NonZeroUsize,

    /// Prints only the numbered moves.
    #[arg(short, long)]
    pub brief: bool,

    /// Prints search statistics and timing.
    #[arg(long)]
    pub stats: bool,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

const EXIT_INVALID_PUZZLE: u8 = 1;
const EXIT_NO_SOLUTION: u8 = 2;

fn load(args: &Args) -> Result<RiverCrossingProblem, PuzzleParseError> {
    let mut config = match &args.puzzle {
        Some(p) => PuzzleConfig::try_from(p.as_path())?,
        None => PuzzleConfig::classic(),
    };
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    RiverCrossingProblem::try_from(&config).map_err(|e| PuzzleParseError::InvalidRules { e })
}

type Search = BreadthFirstSearch<
    RiverCrossingProblem,
    RiverCrossingSpace,
    RiverCrossingState,
    Crossing,
>;

/// Finds up to `n` goals, timing only the search itself.
fn find_solutions(
    search: &mut Search,
    n: NonZeroUsize,
    stopwatch: &mut Stopwatch,
) -> Vec<Path<RiverCrossingState, Crossing>> {
    let mut solutions = Vec::new();
    while solutions.len() < n.get() {
        stopwatch.start();
        let next = search.find_next_goal();
        stopwatch.stop();

        match next {
            Some(path) => solutions.push(path),
            None => break,
        }
    }
    solutions
}

fn run(args: &Args, problem: RiverCrossingProblem) -> std::io::Result<ExitCode> {
    let space = problem.space().clone();
    let mut search = Search::new(problem);
    let mut out = anstream::stdout().lock();

    let mut stopwatch = Stopwatch::new();
    let solutions = find_solutions(&mut search, args.solutions, &mut stopwatch);
    for (i, path) in solutions.iter().enumerate() {
        if args.solutions.get() > 1 {
            writeln!(out, "{}", format!("Solution {}", i + 1).bold())?;
        }
        if args.brief {
            write_moves(&mut out, &space, path)?;
        } else {
            write_transcript(&mut out, &space, path)?;
        }
    }
    let found = solutions.len();

    if args.stats {
        writeln!(out)?;
        writeln!(out, "{}", "Search:".cyan())?;
        writeln!(out, "{}", search.stats())?;
        writeln!(
            out,
            "{} {}",
            "Elapsed:".cyan(),
            human_duration(&stopwatch.elapsed())
        )?;
        search.write_memory_stats(&mut out)?;
    }

    if found == 0 {
        writeln!(out, "{}", "No solution".red().bold())?;
        return Ok(ExitCode::from(EXIT_NO_SOLUTION));
    }
    if found < args.solutions.get() {
        log::info!("Only {found} of {} solutions exist", args.solutions);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> std::io::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();
    args.color.write_global();

    let problem = match load(&args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return Ok(ExitCode::from(EXIT_INVALID_PUZZLE));
        }
    };
    log::debug!("Solving {problem:?}");
    println!("{problem}");
    println!();

    run(&args, problem)
}
