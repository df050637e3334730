use std::collections::hash_map::Entry;
use std::time::Instant;

use fnv::{FnvHashMap, FnvHashSet};
use log::{debug, info};
use separator::Separatable;

use crate::config::{HeuristicKind, SearchConfig, Strategy};
use crate::moves::Moves;
use crate::solver::frontier::{Fifo, Frontier, Heap, Lifo};
use crate::solver::heuristic;
use crate::solver::puzzle_state::PuzzleState;
use crate::solver::stats::Stats;
use crate::solver::{Outcome, Progress};

/// How to treat a successor whose position was already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Duplicates {
    /// Marked when enqueued, later arrivals are dropped.
    Visited,
    /// Reinserted when reached with a strictly lower cost, outdated entries are skipped when popped.
    BestCost,
}

/// Counts expansions, reports progress and polls for cancellation.
pub(crate) struct Control<'c> {
    check_every: u64,
    cancel: &'c dyn Fn() -> bool,
    progress: &'c mut dyn FnMut(Progress),
    started: Instant,
    pub(crate) stats: Stats,
}

impl<'c> Control<'c> {
    pub(crate) fn new(
        config: &SearchConfig,
        cancel: &'c dyn Fn() -> bool,
        progress: &'c mut dyn FnMut(Progress),
        started: Instant,
    ) -> Self {
        Control {
            check_every: config.check_every,
            cancel,
            progress,
            started,
            stats: Stats::new(),
        }
    }

    /// Returns true if the search should stop.
    fn expanded(&mut self, depth: usize) -> bool {
        if self.stats.add_expanded(depth) {
            debug!("Expanding depth {}", depth);
        }
        let expanded = self.stats.total_expanded();
        if expanded % self.check_every != 0 {
            return false;
        }

        (self.progress)(Progress {
            expanded,
            elapsed: self.started.elapsed(),
        });
        if (self.cancel)() {
            info!(
                "Cancelled after {} expansions",
                expanded.separated_string()
            );
            return true;
        }
        false
    }
}

enum Pass {
    Found(Moves),
    /// The frontier ran out. `pruned` is set if the depth limit cut off any successor.
    Exhausted { pruned: bool },
    Cancelled,
}

/// Runs `strategy` from `root`.
///
/// `Err` holds the reason the search stopped without a solution, never `Outcome::Solved`.
pub(crate) fn search<'a>(
    root: PuzzleState<'a>,
    strategy: Strategy,
    heuristic: HeuristicKind,
    config: &SearchConfig,
    ctl: &mut Control<'_>,
) -> Result<Moves, Outcome> {
    if root.reached_goal() {
        debug!("Initial state is already solved");
        return Ok(Moves::default());
    }

    let estimate = |state: &PuzzleState<'a>| heuristic::estimate(heuristic, state);
    let pass = match strategy {
        Strategy::BreadthFirst => run(root, Fifo::default(), |_| 0.0, Duplicates::Visited, None, ctl),
        Strategy::DepthFirst => run(root, Lifo::default(), |_| 0.0, Duplicates::Visited, None, ctl),
        Strategy::IterativeDeepening => return iterative_deepening(root, config, ctl),
        Strategy::UniformCost => run(
            root,
            Heap::default(),
            |state| state.depth() as f64,
            Duplicates::BestCost,
            None,
            ctl,
        ),
        Strategy::Greedy => run(root, Heap::default(), estimate, Duplicates::Visited, None, ctl),
        Strategy::AStar => run(
            root,
            Heap::default(),
            |state| state.depth() as f64 + estimate(state),
            Duplicates::BestCost,
            None,
            ctl,
        ),
    };

    match pass {
        Pass::Found(moves) => Ok(moves),
        Pass::Exhausted { .. } => Err(Outcome::NoSolution),
        Pass::Cancelled => Err(Outcome::Cancelled),
    }
}

/// Depth limited DFS with a growing limit.
///
/// The expansion count keeps growing across passes.
fn iterative_deepening<'a>(
    root: PuzzleState<'a>,
    config: &SearchConfig,
    ctl: &mut Control<'_>,
) -> Result<Moves, Outcome> {
    let schedule = config.depth;
    let mut limit = schedule.start;
    while limit <= schedule.max {
        debug!("Depth limit {}", limit);
        match run(
            root.clone(),
            Lifo::default(),
            |_| 0.0,
            Duplicates::Visited,
            Some(limit),
            ctl,
        ) {
            Pass::Found(moves) => return Ok(moves),
            Pass::Cancelled => return Err(Outcome::Cancelled),
            // the whole reachable space fit under the limit
            Pass::Exhausted { pruned: false } => return Err(Outcome::NoSolution),
            Pass::Exhausted { pruned: true } => limit += schedule.step,
        }
    }
    info!("No solution up to depth {}", schedule.max);
    Err(Outcome::DepthExceeded)
}

fn run<'a, F, P>(
    root: PuzzleState<'a>,
    mut frontier: F,
    priority: P,
    duplicates: Duplicates,
    depth_limit: Option<usize>,
    ctl: &mut Control<'_>,
) -> Pass
where
    F: Frontier<'a>,
    P: Fn(&PuzzleState<'a>) -> f64,
{
    let mut visited = FnvHashSet::default();
    let mut best_costs = FnvHashMap::default();
    let mut pruned = false;

    match duplicates {
        Duplicates::Visited => {
            visited.insert(root.key());
        }
        Duplicates::BestCost => {
            best_costs.insert(root.key(), 0);
        }
    }
    ctl.stats.add_created(0);
    frontier.push(priority(&root), root);

    while let Some(cur) = frontier.pop() {
        let depth = cur.depth();

        if duplicates == Duplicates::BestCost {
            // a cheaper path to this state was found after this entry was pushed
            if best_costs.get(&cur.key()).map_or(false, |&best| best < depth) {
                continue;
            }
        }

        if cur.reached_goal() {
            info!(
                "Solution found at depth {} after {} expansions",
                depth,
                ctl.stats.total_expanded().separated_string()
            );
            return Pass::Found(cur.moves());
        }

        let child_depth = depth + 1;
        for child in cur.successors() {
            if let Some(limit) = depth_limit {
                if child_depth > limit {
                    pruned = true;
                    continue;
                }
            }

            let is_new = match duplicates {
                Duplicates::Visited => visited.insert(child.key()),
                Duplicates::BestCost => match best_costs.entry(child.key()) {
                    Entry::Vacant(entry) => {
                        entry.insert(child_depth);
                        true
                    }
                    Entry::Occupied(mut entry) => {
                        if child_depth < *entry.get() {
                            entry.insert(child_depth);
                            true
                        } else {
                            false
                        }
                    }
                },
            };

            if is_new {
                ctl.stats.add_created(child_depth);
                frontier.push(priority(child), child.clone());
            } else {
                ctl.stats.add_duplicate(child_depth);
            }
        }

        if ctl.expanded(depth) {
            debug!(
                "Cancelled with {} states in the frontier",
                frontier.len().separated_string()
            );
            return Pass::Cancelled;
        }
    }

    debug!(
        "Frontier empty, visited {} states",
        (visited.len() + best_costs.len()).separated_string()
    );
    Pass::Exhausted { pruned }
}
