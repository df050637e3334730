// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused)]

pub mod background;
pub mod board;
pub mod config;
pub mod level;
pub mod map;
pub mod map_formatter;
pub mod moves;
pub mod parser;
pub mod solution_formatter;
pub mod solver;

mod data;
mod state;
mod vec2d;

use std::error::Error;
use std::fs;
use std::path::Path;

pub use crate::data::{Dir, MapCell, Pos, DIRECTIONS};
pub use crate::state::State;

use crate::config::{Format, HeuristicKind, SearchConfig, Strategy};
use crate::level::Level;
use crate::solver::SolveResult;

pub trait LoadLevel {
    /// Reads a level file, the format is detected from the contents.
    fn load_level(&self) -> Result<Level, Box<dyn Error>>;

    fn load_level_as(&self, format: Format) -> Result<Level, Box<dyn Error>>;
}

impl<P: AsRef<Path> + ?Sized> LoadLevel for P {
    fn load_level(&self) -> Result<Level, Box<dyn Error>> {
        let text = fs::read_to_string(self)?;
        Ok(parser::parse(&text)?)
    }

    fn load_level_as(&self, format: Format) -> Result<Level, Box<dyn Error>> {
        let text = fs::read_to_string(self)?;
        Ok(parser::parse_format(&text, format)?)
    }
}

pub trait Solve {
    /// Solves on the current thread without a way to cancel.
    fn solve(&self, strategy: Strategy, heuristic: HeuristicKind) -> SolveResult;
}

impl Solve for Level {
    fn solve(&self, strategy: Strategy, heuristic: HeuristicKind) -> SolveResult {
        solver::solve(
            self,
            strategy,
            heuristic,
            &SearchConfig::default(),
            &|| false,
            &mut |_| {},
        )
    }
}
