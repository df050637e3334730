use std::fmt::{self, Debug, Display, Formatter};

use crate::board::{Board, ReplayErr};
use crate::config::Format;
use crate::map::GoalMap;
use crate::map_formatter::MapFormatter;
use crate::moves::Moves;
use crate::solution_formatter::SolutionFormatter;
use crate::state::State;

#[derive(Clone)]
pub struct Level {
    pub map: GoalMap,
    pub state: State,
}

impl Level {
    pub(crate) fn new(map: GoalMap, state: State) -> Self {
        Level { map, state }
    }

    pub fn xsb(&self) -> MapFormatter<'_> {
        self.format(Format::Xsb)
    }

    /// The level as a coordinate list, readable by the parser again.
    pub fn coords(&self) -> MapFormatter<'_> {
        self.format(Format::Coords)
    }

    pub fn format(&self, format: Format) -> MapFormatter<'_> {
        MapFormatter::new(&self.map.grid, Some(&self.state), format)
    }

    pub fn xsb_solution<'a>(&'a self, moves: &'a Moves, include_steps: bool) -> SolutionFormatter<'a> {
        SolutionFormatter::new(&self.map, &self.state, moves, include_steps)
    }

    /// Plays the moves on a fresh board and checks the level ends up solved.
    pub fn replay(&self, moves: &Moves) -> Result<Board<'_>, ReplayErr> {
        let mut board = Board::new(&self.map, &self.state);
        for (i, &mov) in moves.iter().enumerate() {
            if !board.apply(mov.dir) {
                return Err(ReplayErr::Blocked(i, mov));
            }
        }
        if !board.is_solved() {
            return Err(ReplayErr::Unsolved);
        }
        Ok(board)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xsb())
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.xsb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_level() {
        let xsb: &str = r"
*###*
#@$.#
*###*#
"
        .trim_start_matches('\n');

        let level: Level = xsb.parse().unwrap();
        assert_eq!(level.to_string(), xsb);
        assert_eq!(level.xsb().to_string(), xsb);
        assert_eq!(level.format(Format::Xsb).to_string(), xsb);
        assert_eq!(format!("{:?}", level), xsb);
        assert_eq!(level.map.xsb_with_state(&level.state).to_string(), xsb);
    }

    #[test]
    fn formatting_map() {
        let xsb_level: &str = r"
*###*
#@$.#
*###*#
"
        .trim_start_matches('\n');
        let xsb_map: &str = "
.###.
#  .#
.###.#
"
        .trim_start_matches('\n');

        let level: Level = xsb_level.parse().unwrap();
        assert_eq!(format!("{}", level.map), xsb_map);
        assert_eq!(format!("{:?}", level.map), xsb_map);
    }

    #[test]
    fn coords_roundtrip() {
        let xsb = r"
#####
#@$.#
#####
";
        let level: Level = xsb.parse().unwrap();
        let coords = level.coords().to_string();
        assert_eq!(
            coords,
            "5 3\n12 1 1 1 2 1 3 1 4 1 5 2 1 2 5 3 1 3 2 3 3 3 4 3 5\n1 2 3\n1 2 4\n2 2\n"
        );
        let reparsed: Level = coords.parse().unwrap();
        assert_eq!(reparsed.to_string(), level.to_string());
    }

    #[test]
    fn replaying() {
        let level: Level = r"
######
#@$ .#
######
"
        .parse()
        .unwrap();

        assert!(level.replay(&"RR".parse().unwrap()).is_ok());
        assert_eq!(
            level.replay(&"R".parse().unwrap()).unwrap_err(),
            ReplayErr::Unsolved
        );
        match level.replay(&"uRR".parse().unwrap()) {
            Err(ReplayErr::Blocked(0, _)) => {}
            other => panic!("unexpected replay result: {:?}", other.map(|_| ())),
        }
    }
}
