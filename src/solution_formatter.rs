use std::fmt::{self, Debug, Display, Formatter};

use crate::board::Board;
use crate::map::GoalMap;
use crate::moves::Moves;
use crate::state::State;

pub struct SolutionFormatter<'a> {
    map: &'a GoalMap,
    initial_state: &'a State,
    moves: &'a Moves,
    include_steps: bool,
}

impl<'a> SolutionFormatter<'a> {
    pub(crate) fn new(
        map: &'a GoalMap,
        initial_state: &'a State,
        moves: &'a Moves,
        include_steps: bool,
    ) -> Self {
        Self {
            map,
            initial_state,
            moves,
            include_steps,
        }
    }
}

impl Display for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.map.xsb_with_state(self.initial_state))?;

        let mut board = Board::new(self.map, self.initial_state);
        for &mov in self.moves {
            if !board.apply(mov.dir) {
                // moves from a different level, print what we have
                return writeln!(f, "Illegal move: {}", mov);
            }
            if mov.is_push || self.include_steps {
                writeln!(f, "{}", self.map.xsb_with_state(&board.state()))?;
            }
        }
        Ok(())
    }
}

impl Debug for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
