use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{Dir, Pos};
use crate::map::GoalMap;
use crate::moves::Move;
use crate::state::State;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayErr {
    /// The move at this index ran into a wall, the edge of the map or an immovable box.
    Blocked(usize, Move),
    Unsolved,
}

impl Display for ReplayErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ReplayErr::Blocked(i, mov) => write!(f, "Move {} ({}) is blocked", i, mov),
            ReplayErr::Unsolved => write!(f, "Not all boxes are on goals after the last move"),
        }
    }
}

impl Error for ReplayErr {}

/// Mutable board used to play back solutions, independent of the solver.
pub struct Board<'a> {
    map: &'a GoalMap,
    player_pos: Pos,
    boxes: Vec2d<bool>,
}

impl<'a> Board<'a> {
    pub fn new(map: &'a GoalMap, state: &State) -> Self {
        let mut boxes = map.grid.scratchpad();
        for &b in &state.boxes {
            boxes[b] = true;
        }
        Board {
            map,
            player_pos: state.player_pos,
            boxes,
        }
    }

    fn is_free(&self, pos: Pos) -> bool {
        self.map.contains(pos) && !self.map.is_wall(pos) && !self.boxes[pos]
    }

    /// Returns false and leaves the board untouched if the move is illegal.
    pub fn apply(&mut self, dir: Dir) -> bool {
        let new_player_pos = self.player_pos + dir;
        if !self.map.contains(new_player_pos) || self.map.is_wall(new_player_pos) {
            return false;
        }
        if self.boxes[new_player_pos] {
            let push_dest = new_player_pos + dir;
            if !self.is_free(push_dest) {
                return false;
            }
            self.boxes[new_player_pos] = false;
            self.boxes[push_dest] = true;
        }
        self.player_pos = new_player_pos;
        true
    }

    pub fn player_pos(&self) -> Pos {
        self.player_pos
    }

    pub fn state(&self) -> State {
        let boxes = self
            .boxes
            .positions()
            .filter(|&pos| self.boxes[pos])
            .collect();
        State::new(self.player_pos, boxes)
    }

    pub fn is_solved(&self) -> bool {
        self.boxes
            .positions()
            .filter(|&pos| self.boxes[pos])
            .all(|pos| self.map.is_goal(pos))
    }
}

impl Debug for Board<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.map.xsb_with_state(&self.state()))
    }
}
