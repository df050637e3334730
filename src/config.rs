use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// The usual `#@$.` text format.
    Xsb,
    /// Dimensions followed by counted lists of 1-based `row col` pairs.
    Coords,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    BreadthFirst,
    DepthFirst,
    IterativeDeepening,
    UniformCost,
    Greedy,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::IterativeDeepening,
        Strategy::UniformCost,
        Strategy::Greedy,
        Strategy::AStar,
    ];

    pub fn uses_heuristic(self) -> bool {
        self == Strategy::Greedy || self == Strategy::AStar
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Strategy::BreadthFirst => write!(f, "bfs"),
            Strategy::DepthFirst => write!(f, "dfs"),
            Strategy::IterativeDeepening => write!(f, "ids"),
            Strategy::UniformCost => write!(f, "ucs"),
            Strategy::Greedy => write!(f, "greedy"),
            Strategy::AStar => write!(f, "astar"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Strategy::BreadthFirst),
            "dfs" | "depth-first" => Ok(Strategy::DepthFirst),
            "ids" | "iterative-deepening" => Ok(Strategy::IterativeDeepening),
            "ucs" | "uniform-cost" => Ok(Strategy::UniformCost),
            "greedy" => Ok(Strategy::Greedy),
            "astar" | "a*" => Ok(Strategy::AStar),
            _ => Err(ConfigErr::UnknownStrategy(s.to_owned())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    Manhattan,
    Euclidean,
}

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            HeuristicKind::Manhattan => write!(f, "manhattan"),
            HeuristicKind::Euclidean => write!(f, "euclidean"),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = ConfigErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            // old level packs and scripts use the misspelled name
            "manhattan" | "manhatten" => Ok(HeuristicKind::Manhattan),
            "euclidean" => Ok(HeuristicKind::Euclidean),
            _ => Err(ConfigErr::UnknownHeuristic(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigErr {
    UnknownStrategy(String),
    UnknownHeuristic(String),
    ZeroCheckInterval,
    ZeroDepthStep,
}

impl Display for ConfigErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::UnknownStrategy(name) => write!(f, "Unknown search algorithm: {}", name),
            ConfigErr::UnknownHeuristic(name) => write!(f, "Unknown heuristic: {}", name),
            ConfigErr::ZeroCheckInterval => write!(f, "Cancellation check interval must be > 0"),
            ConfigErr::ZeroDepthStep => write!(f, "Depth step must be > 0"),
        }
    }
}

impl Error for ConfigErr {}

/// Bounds used by iterative deepening.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthSchedule {
    pub start: usize,
    pub step: usize,
    pub max: usize,
}

impl Default for DepthSchedule {
    fn default() -> Self {
        Self {
            start: 50,
            step: 10,
            max: 500,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Expansions between cancellation checks and progress reports.
    pub check_every: u64,
    pub depth: DepthSchedule,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigErr> {
        if self.check_every == 0 {
            return Err(ConfigErr::ZeroCheckInterval);
        }
        if self.depth.step == 0 {
            return Err(ConfigErr::ZeroDepthStep);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            check_every: 2048,
            depth: DepthSchedule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names() {
        for &strategy in &Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("A*".parse::<Strategy>(), Ok(Strategy::AStar));
        assert_eq!(
            "bogo".parse::<Strategy>(),
            Err(ConfigErr::UnknownStrategy("bogo".to_owned()))
        );
    }

    #[test]
    fn heuristic_names() {
        assert_eq!("Manhattan".parse(), Ok(HeuristicKind::Manhattan));
        assert_eq!("manhatten".parse(), Ok(HeuristicKind::Manhattan));
        assert_eq!("euclidean".parse(), Ok(HeuristicKind::Euclidean));
        assert!("chebyshev".parse::<HeuristicKind>().is_err());
    }

    #[test]
    fn validating() {
        assert_eq!(SearchConfig::default().validate(), Ok(()));
        let mut config = SearchConfig::default();
        config.check_every = 0;
        assert_eq!(config.validate(), Err(ConfigErr::ZeroCheckInterval));
    }
}
