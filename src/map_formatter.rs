use std::fmt::{self, Debug, Display, Formatter};

use crate::config::Format;
use crate::data::{Contents, MapCell, Pos};
use crate::state::State;
use crate::vec2d::Vec2d;

pub struct MapFormatter<'a> {
    grid: &'a Vec2d<MapCell>,
    state: Option<&'a State>,
    format: Format,
}

impl<'a> MapFormatter<'a> {
    pub(crate) fn new(grid: &'a Vec2d<MapCell>, state: Option<&'a State>, format: Format) -> Self {
        Self {
            grid,
            state,
            format,
        }
    }

    fn write_xsb(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut state_grid = self.grid.scratchpad_with_default(Contents::Empty);
        if let Some(state) = self.state {
            for &b in &state.boxes {
                state_grid[b] = Contents::Box;
            }
            state_grid[state.player_pos] = Contents::Player;
        }

        for r in 1..=self.grid.rows() {
            // don't print trailing empty cells to match the input level strings
            let mut last_non_empty = 0;
            for c in 1..=self.grid.cols() {
                let pos = Pos::new(r, c);
                if self.grid[pos] != MapCell::Empty || state_grid[pos] != Contents::Empty {
                    last_non_empty = c;
                }
            }

            for c in 1..=last_non_empty {
                let pos = Pos::new(r, c);
                Self::write_cell_xsb(self.grid[pos], state_grid[pos], f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_cell_xsb(cell: MapCell, contents: Contents, f: &mut Formatter<'_>) -> fmt::Result {
        match (cell, contents) {
            (MapCell::Empty, Contents::Empty) => write!(f, " "),
            (MapCell::Empty, Contents::Box) => write!(f, "$"),
            (MapCell::Empty, Contents::Player) => write!(f, "@"),
            (MapCell::Wall, Contents::Empty) => write!(f, "#"),
            (MapCell::Wall, _) => unreachable!("Wall with non-empty contents"),
            (MapCell::Goal, Contents::Empty) => write!(f, "."),
            (MapCell::Goal, Contents::Box) => write!(f, "*"),
            (MapCell::Goal, Contents::Player) => write!(f, "+"),
        }
    }

    /// Width and height first, then one line per object kind: count followed by `row col` pairs.
    fn write_coords(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.grid.cols(), self.grid.rows())?;

        let walls: Vec<_> = self
            .grid
            .positions()
            .filter(|&pos| self.grid[pos] == MapCell::Wall)
            .collect();
        let goals: Vec<_> = self
            .grid
            .positions()
            .filter(|&pos| self.grid[pos] == MapCell::Goal)
            .collect();
        let boxes = self.state.map(|s| &s.boxes[..]).unwrap_or(&[]);

        Self::write_coord_line(&walls, f)?;
        Self::write_coord_line(boxes, f)?;
        Self::write_coord_line(&goals, f)?;
        if let Some(state) = self.state {
            writeln!(f, "{} {}", state.player_pos.r, state.player_pos.c)?;
        }
        Ok(())
    }

    fn write_coord_line(positions: &[Pos], f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", positions.len())?;
        for pos in positions {
            write!(f, " {} {}", pos.r, pos.c)?;
        }
        writeln!(f)
    }
}

impl<'a> Display for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.format {
            Format::Xsb => self.write_xsb(f),
            Format::Coords => self.write_coords(f),
        }
    }
}

impl<'a> Debug for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
