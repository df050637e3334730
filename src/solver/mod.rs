pub(crate) mod frontier;
pub(crate) mod heuristic;
pub(crate) mod preprocessing;
pub(crate) mod puzzle_state;
pub(crate) mod search;
pub mod stats;

use std::fmt::{self, Debug, Display, Formatter};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use separator::Separatable;
use typed_arena::Arena;

use crate::config::{HeuristicKind, SearchConfig, Strategy};
use crate::data::Pos;
use crate::level::Level;
use crate::map::GoalMap;
use crate::moves::Moves;
use crate::state::State;
use crate::vec2d::Vec2d;

use self::puzzle_state::{PuzzleState, SearchSpace};
use self::search::Control;
use self::stats::Stats;

/// Facts about a level that hold for every state: the map and its dead ends.
///
/// Built once per search and only read afterwards.
pub struct StaticData {
    pub(crate) map: GoalMap,
    pub(crate) dead_ends: Vec2d<bool>,
}

impl StaticData {
    pub fn new(map: GoalMap) -> Self {
        let dead_ends = preprocessing::find_dead_ends(&map);
        debug!("Dead ends:\n{}", dead_ends);
        StaticData { map, dead_ends }
    }

    pub fn map(&self) -> &GoalMap {
        &self.map
    }

    pub fn is_dead_end(&self, pos: Pos) -> bool {
        self.dead_ends.get(pos) == Some(&true)
    }

    /// Dead end positions in row-major order.
    pub fn dead_ends(&self) -> Vec<Pos> {
        self.dead_ends
            .positions()
            .filter(|&pos| self.dead_ends[pos])
            .collect()
    }
}

impl Debug for StaticData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.map)?;
        write!(f, "{}", self.dead_ends)
    }
}

/// Sent every few thousand expansions while a search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub expanded: u64,
    pub elapsed: Duration,
}

/// Why a search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved,
    /// Every reachable state was expanded.
    NoSolution,
    Cancelled,
    /// Iterative deepening ran past its largest depth limit.
    DepthExceeded,
    /// The search itself failed, usually a panic caught by the background runner.
    Failed(String),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Solved => write!(f, "solved"),
            Outcome::NoSolution => write!(f, "no-solution"),
            Outcome::Cancelled => write!(f, "cancelled"),
            Outcome::DepthExceeded => write!(f, "bound ceiling exceeded"),
            Outcome::Failed(msg) => write!(f, "error: {}", msg),
        }
    }
}

pub struct SolveResult {
    pub moves: Option<Moves>,
    pub outcome: Outcome,
    pub expanded: u64,
    pub elapsed: Duration,
    pub stats: Stats,
    pub(crate) strategy: Strategy,
}

impl SolveResult {
    pub(crate) fn failed(strategy: Strategy, msg: String, expanded: u64, elapsed: Duration) -> Self {
        SolveResult {
            moves: None,
            outcome: Outcome::Failed(msg),
            expanded,
            elapsed,
            stats: Stats::new(),
            strategy,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Solved
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Short machine readable reason, `"solved"` on success.
    pub fn reason(&self) -> String {
        self.outcome.to_string()
    }
}

impl Debug for SolveResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.moves {
            None => writeln!(f, "{}: {}", self.strategy, self.outcome)?,
            Some(ref moves) => writeln!(f, "{}: {}", self.strategy, moves.move_cnt())?,
        }
        writeln!(
            f,
            "Expanded {} states in {} ms",
            self.expanded.separated_string(),
            (self.elapsed.as_millis() as u64).separated_string()
        )?;
        write!(f, "{}", self.stats)
    }
}

/// Searches for a solution of `level`.
///
/// `cancel` is polled and `progress` called every `config.check_every` expansions.
pub fn solve(
    level: &Level,
    strategy: Strategy,
    heuristic: HeuristicKind,
    config: &SearchConfig,
    cancel: &dyn Fn() -> bool,
    progress: &mut dyn FnMut(Progress),
) -> SolveResult {
    let sd = StaticData::new(level.map.clone());
    solve_from(&sd, &level.state, strategy, heuristic, config, cancel, progress)
}

/// Like `solve` but reuses already analyzed static data.
pub fn solve_from(
    sd: &StaticData,
    initial: &State,
    strategy: Strategy,
    heuristic: HeuristicKind,
    config: &SearchConfig,
    cancel: &dyn Fn() -> bool,
    progress: &mut dyn FnMut(Progress),
) -> SolveResult {
    let started = Instant::now();
    if let Err(e) = config.validate() {
        warn!("Invalid search config: {}", e);
        return SolveResult::failed(strategy, e.to_string(), 0, started.elapsed());
    }

    if strategy.uses_heuristic() {
        info!("Solving using {} with {} heuristic", strategy, heuristic);
    } else {
        info!("Solving using {}", strategy);
    }

    let arena = Arena::new();
    let space = SearchSpace::new(sd, &arena);
    let root = PuzzleState::root(&space, initial);
    let mut ctl = Control::new(config, cancel, progress, started);

    let (moves, outcome) = match search::search(root, strategy, heuristic, config, &mut ctl) {
        Ok(moves) => (Some(moves), Outcome::Solved),
        Err(outcome) => (None, outcome),
    };
    debug!(
        "Distinct box arrangements: {}",
        space.boxes.len().separated_string()
    );

    let stats = ctl.stats;
    SolveResult {
        moves,
        outcome,
        expanded: stats.total_expanded(),
        elapsed: started.elapsed(),
        stats,
        strategy,
    }
}
