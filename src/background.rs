//! Running a search on a worker thread while the caller stays responsive.

use std::any::Any;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::config::{HeuristicKind, SearchConfig, Strategy};
use crate::level::Level;
use crate::solver::{self, Progress, SolveResult};

/// Holds at most one value, newer values replace older ones.
///
/// Neither side ever waits: if the other side holds the lock, `post` drops the value
/// and `take` returns `None`.
pub struct Mailbox<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Mailbox {
            slot: Mutex::new(None),
        }
    }

    /// Returns false if the value was dropped.
    pub fn post(&self, value: T) -> bool {
        match self.slot.try_lock() {
            Ok(mut slot) => {
                *slot = Some(value);
                true
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                *poisoned.into_inner() = Some(value);
                true
            }
            Err(TryLockError::WouldBlock) => false,
        }
    }

    pub fn take(&self) -> Option<T> {
        match self.slot.try_lock() {
            Ok(mut slot) => slot.take(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().take(),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Mailbox<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Mailbox")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartErr {
    AlreadyRunning,
    Spawn(String),
}

impl Display for StartErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StartErr::AlreadyRunning => write!(f, "A search is already running"),
            StartErr::Spawn(msg) => write!(f, "Failed to start solver thread: {}", msg),
        }
    }
}

impl Error for StartErr {}

/// Runs at most one search at a time on its own thread.
///
/// Progress is published through a one-slot mailbox so a slow reader only ever sees
/// the latest report. Panics inside the search are turned into a failed result.
pub struct BackgroundSolver {
    running: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
    expanded: Arc<AtomicU64>,
    progress: Arc<Mailbox<Progress>>,
    worker: Option<JoinHandle<SolveResult>>,
    strategy: Strategy,
}

impl BackgroundSolver {
    pub fn new() -> Self {
        BackgroundSolver {
            running: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
            expanded: Arc::new(AtomicU64::new(0)),
            progress: Arc::new(Mailbox::new()),
            worker: None,
            strategy: Strategy::AStar,
        }
    }

    /// Starts solving `level` unless a search is already running.
    ///
    /// A finished result that was never collected is discarded.
    pub fn start(
        &mut self,
        level: Level,
        strategy: Strategy,
        heuristic: HeuristicKind,
        config: SearchConfig,
    ) -> Result<(), StartErr> {
        self.start_job(strategy, move |cancel, progress| {
            solver::solve(&level, strategy, heuristic, &config, cancel, progress)
        })
    }

    pub(crate) fn start_job<F>(&mut self, strategy: Strategy, job: F) -> Result<(), StartErr>
    where
        F: FnOnce(&dyn Fn() -> bool, &mut dyn FnMut(Progress)) -> SolveResult + Send + 'static,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StartErr::AlreadyRunning);
        }

        self.strategy = strategy;
        self.cancel.store(false, Ordering::SeqCst);
        self.expanded.store(0, Ordering::SeqCst);
        self.progress.take();

        let running = Arc::clone(&self.running);
        let cancel = Arc::clone(&self.cancel);
        let expanded = Arc::clone(&self.expanded);
        let mailbox = Arc::clone(&self.progress);

        let spawned = thread::Builder::new()
            .name("solver".to_owned())
            .spawn(move || {
                let started = Instant::now();
                let is_cancelled = || cancel.load(Ordering::Relaxed);
                let mut report = |progress: Progress| {
                    expanded.store(progress.expanded, Ordering::Relaxed);
                    mailbox.post(progress);
                };

                let caught =
                    panic::catch_unwind(AssertUnwindSafe(|| job(&is_cancelled, &mut report)));
                let result = match caught {
                    Ok(result) => result,
                    Err(payload) => {
                        let msg = panic_message(&*payload);
                        error!("Solver panicked: {}", msg);
                        SolveResult::failed(
                            strategy,
                            msg,
                            expanded.load(Ordering::Relaxed),
                            started.elapsed(),
                        )
                    }
                };
                debug!("Solver thread done: {}", result.outcome);
                running.store(false, Ordering::SeqCst);
                result
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(StartErr::Spawn(e.to_string()))
            }
        }
    }

    /// Asks the running search to stop at its next check.
    pub fn cancel(&self) {
        if self.is_running() {
            info!("Cancelling search");
        }
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Latest progress report since the last call, never blocks.
    pub fn poll_progress(&self) -> Option<Progress> {
        self.progress.take()
    }

    /// Expansions at the most recent progress report.
    pub fn expanded(&self) -> u64 {
        self.expanded.load(Ordering::Relaxed)
    }

    /// The result if the search finished, never blocks.
    pub fn try_result(&mut self) -> Option<SolveResult> {
        let finished = self
            .worker
            .as_ref()
            .map_or(false, |handle| handle.is_finished());
        if finished {
            self.wait()
        } else {
            None
        }
    }

    /// Blocks until the search finishes. `None` if nothing was started.
    pub fn wait(&mut self) -> Option<SolveResult> {
        let handle = self.worker.take()?;
        match handle.join() {
            Ok(result) => Some(result),
            Err(payload) => {
                // only reachable if the panic escaped catch_unwind
                self.running.store(false, Ordering::SeqCst);
                Some(SolveResult::failed(
                    self.strategy,
                    panic_message(&*payload),
                    self.expanded(),
                    Duration::default(),
                ))
            }
        }
    }
}

impl Default for BackgroundSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundSolver {
    // the thread is detached, make sure it doesn't keep searching
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

impl Debug for BackgroundSolver {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundSolver")
            .field("running", &self.is_running())
            .field("expanded", &self.expanded())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::solver::Outcome;

    fn level() -> Level {
        r"
#######
#@$  .#
#######
"
        .parse()
        .unwrap()
    }

    #[test]
    fn mailbox_keeps_latest() {
        let mailbox = Mailbox::new();
        assert_eq!(mailbox.take(), None);
        assert!(mailbox.post(1));
        assert!(mailbox.post(2));
        assert_eq!(mailbox.take(), Some(2));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn solving() {
        let mut solver = BackgroundSolver::new();
        assert!(solver.try_result().is_none());
        solver
            .start(
                level(),
                Strategy::BreadthFirst,
                HeuristicKind::Manhattan,
                SearchConfig::default(),
            )
            .unwrap();
        let result = solver.wait().unwrap();
        assert!(result.is_success());
        assert_eq!(result.moves.unwrap().to_string(), "RRR");
        assert!(!solver.is_running());
        assert!(solver.wait().is_none());
    }

    #[test]
    fn second_start_rejected() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let mut solver = BackgroundSolver::new();
        solver
            .start_job(
                Strategy::DepthFirst,
                move |_, _| {
                    release_rx.recv().unwrap();
                    SolveResult::failed(
                        Strategy::DepthFirst,
                        "done".to_owned(),
                        0,
                        Duration::from_secs(0),
                    )
                },
            )
            .unwrap();
        assert!(solver.is_running());
        assert_eq!(
            solver.start(
                level(),
                Strategy::AStar,
                HeuristicKind::Manhattan,
                SearchConfig::default()
            ),
            Err(StartErr::AlreadyRunning)
        );

        release_tx.send(()).unwrap();
        let result = solver.wait().unwrap();
        assert_eq!(result.reason(), "error: done");
        assert!(!solver.is_running());

        // free again
        solver
            .start(
                level(),
                Strategy::AStar,
                HeuristicKind::Manhattan,
                SearchConfig::default(),
            )
            .unwrap();
        assert!(solver.wait().unwrap().is_success());
    }

    #[test]
    fn cancelling() {
        let mut solver = BackgroundSolver::new();
        solver
            .start_job(
                Strategy::BreadthFirst,
                |cancel, progress| {
                    let mut expanded = 0;
                    while !cancel() {
                        expanded += 1;
                        progress(Progress {
                            expanded,
                            elapsed: Duration::from_millis(1),
                        });
                        thread::sleep(Duration::from_millis(1));
                    }
                    let mut result = SolveResult::failed(
                        Strategy::BreadthFirst,
                        String::new(),
                        expanded,
                        Duration::from_millis(expanded),
                    );
                    result.outcome = Outcome::Cancelled;
                    result
                },
            )
            .unwrap();

        // wait for the first report
        let mut seen = None;
        while seen.is_none() {
            seen = solver.poll_progress();
            thread::yield_now();
        }
        solver.cancel();
        let result = solver.wait().unwrap();
        assert_eq!(result.outcome, Outcome::Cancelled);
        assert!(result.expanded >= seen.unwrap().expanded);
        assert!(!solver.is_running());
    }

    #[test]
    fn cancelling_real_search() {
        // far too many states to finish before the cancel arrives
        let level: Level = r"
############
#          #
#  $    $  #
#          #
#   $  $   #
#     @    #
#          #
#.         #
#..        #
#.       ###
############
"
        .parse()
        .unwrap();
        let config = SearchConfig {
            check_every: 1,
            ..SearchConfig::default()
        };
        let mut solver = BackgroundSolver::new();
        solver
            .start(level, Strategy::BreadthFirst, HeuristicKind::Manhattan, config)
            .unwrap();
        solver.cancel();
        let result = solver.wait().unwrap();
        assert_eq!(result.outcome, Outcome::Cancelled);
        assert!(result.expanded >= 1);
    }

    #[test]
    fn panic_becomes_failure() {
        let mut solver = BackgroundSolver::new();
        solver
            .start_job(
                Strategy::Greedy,
                |_, progress| {
                    progress(Progress {
                        expanded: 7,
                        elapsed: Duration::from_millis(1),
                    });
                    panic!("broken heuristic");
                },
            )
            .unwrap();
        let result = solver.wait().unwrap();
        assert!(!result.is_success());
        assert_eq!(result.reason(), "error: broken heuristic");
        assert_eq!(result.expanded, 7);
        assert_eq!(result.strategy(), Strategy::Greedy);
        assert!(result.moves.is_none());
        assert!(!solver.is_running());
    }
}
