use std::env;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::{App, Arg, ArgGroup};
use log::{info, warn};
use separator::Separatable;

use sokoban_search::background::BackgroundSolver;
use sokoban_search::config::{DepthSchedule, Format, HeuristicKind, SearchConfig, Strategy};
use sokoban_search::solver::Outcome;
use sokoban_search::LoadLevel;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() {
    env_logger::init();

    let matches = App::new("sokoban-search")
        .author("martin-t")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::with_name("xsb")
                .short("x")
                .long("xsb")
                .help("parse as XSB format"),
        )
        .arg(
            Arg::with_name("coords")
                .short("c")
                .long("coords")
                .help("parse as a list of coordinates"),
        )
        .group(ArgGroup::with_name("format").arg("xsb").arg("coords"))
        .arg(
            Arg::with_name("algorithm")
                .short("a")
                .long("algorithm")
                .takes_value(true)
                .default_value("astar")
                .help("bfs, dfs, ids, ucs, greedy or astar"),
        )
        .arg(
            Arg::with_name("heuristic")
                .short("H")
                .long("heuristic")
                .takes_value(true)
                .default_value("manhattan")
                .help("manhattan or euclidean, used by greedy and astar"),
        )
        .arg(
            Arg::with_name("ids-start")
                .long("ids-start")
                .takes_value(true)
                .help("initial depth limit of iterative deepening"),
        )
        .arg(
            Arg::with_name("ids-step")
                .long("ids-step")
                .takes_value(true)
                .help("depth limit increment of iterative deepening"),
        )
        .arg(
            Arg::with_name("ids-max")
                .long("ids-max")
                .takes_value(true)
                .help("largest depth limit of iterative deepening"),
        )
        .arg(
            Arg::with_name("check-every")
                .long("check-every")
                .takes_value(true)
                .help("expansions between progress reports and cancellation checks"),
        )
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .long("timeout")
                .takes_value(true)
                .help("cancel the search after this many seconds"),
        )
        .arg(
            Arg::with_name("steps")
                .long("steps")
                .help("print every move of the solution, not just pushes"),
        )
        .arg(
            Arg::with_name("to-coords")
                .long("to-coords")
                .help("print the level as a list of coordinates and exit"),
        )
        .arg(Arg::with_name("file").required(true))
        .get_matches();

    let strategy: Strategy = parse_or_exit(matches.value_of("algorithm").unwrap_or("astar"));
    let heuristic: HeuristicKind =
        parse_or_exit(matches.value_of("heuristic").unwrap_or("manhattan"));

    let defaults = SearchConfig::default();
    let config = SearchConfig {
        check_every: opt_or_exit(matches.value_of("check-every"), defaults.check_every),
        depth: DepthSchedule {
            start: opt_or_exit(matches.value_of("ids-start"), defaults.depth.start),
            step: opt_or_exit(matches.value_of("ids-step"), defaults.depth.step),
            max: opt_or_exit(matches.value_of("ids-max"), defaults.depth.max),
        },
    };
    if let Err(err) = config.validate() {
        eprintln!("{}", err);
        process::exit(1);
    }
    let timeout = matches
        .value_of("timeout")
        .map(|secs| Duration::from_secs(parse_or_exit(secs)));

    let path = matches.value_of("file").unwrap_or_else(|| {
        eprintln!("No level file given");
        process::exit(1);
    });
    let loaded = if matches.is_present("coords") {
        path.load_level_as(Format::Coords)
    } else if matches.is_present("xsb") {
        path.load_level_as(Format::Xsb)
    } else {
        path.load_level()
    };
    let level = loaded.unwrap_or_else(|err| {
        let current_dir = env::current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();
        eprintln!("Can't load level {} in {}: {}", path, current_dir, err);
        process::exit(1);
    });

    if matches.is_present("to-coords") {
        print!("{}", level.coords());
        return;
    }

    println!("Solving {} using {}...", path, strategy);

    let mut solver = BackgroundSolver::new();
    if let Err(err) = solver.start(level.clone(), strategy, heuristic, config) {
        eprintln!("{}", err);
        process::exit(1);
    }

    let started = Instant::now();
    let mut cancelled = false;
    let result = loop {
        if let Some(result) = solver.try_result() {
            break result;
        }
        if let Some(progress) = solver.poll_progress() {
            info!(
                "Expanded {} states in {} ms",
                progress.expanded.separated_string(),
                (progress.elapsed.as_millis() as u64).separated_string()
            );
        }
        if let Some(timeout) = timeout {
            if !cancelled && started.elapsed() >= timeout {
                warn!("Timeout reached, cancelling");
                solver.cancel();
                cancelled = true;
            }
        }
        thread::sleep(POLL_INTERVAL);
    };

    println!("{}", result.stats);
    println!(
        "Expanded {} states in {} ms",
        result.expanded.separated_string(),
        (result.elapsed.as_millis() as u64).separated_string()
    );
    match result.moves {
        Some(ref moves) => {
            println!("Found solution:");
            print!("{}", level.xsb_solution(moves, matches.is_present("steps")));
            println!("{}", moves);
            println!("Moves: {}", moves.move_cnt());
            println!("Pushes: {}", moves.push_cnt());
        }
        None => {
            println!("No solution: {}", result.reason());
            if let Outcome::Failed(_) = result.outcome {
                process::exit(2);
            }
        }
    }
}

fn parse_or_exit<T>(value: &str) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().unwrap_or_else(|err| {
        eprintln!("Invalid value '{}': {}", value, err);
        process::exit(1);
    })
}

fn opt_or_exit<T>(value: Option<&str>, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(default, parse_or_exit)
}
