use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::config::Format;
use crate::data::{MapCell, Pos, MAX_SIZE};
use crate::level::Level;
use crate::map::GoalMap;
use crate::state::State;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserErr {
    /// Invalid character at 1-based row and column.
    Pos(usize, usize),
    TooLarge,
    MultiplePlayers,
    NoPlayer,
    /// A line of the coordinate format is missing or isn't a list of numbers.
    BadLine(usize),
    CountMismatch {
        line: usize,
        declared: usize,
        found: usize,
    },
    OutOfBounds(Pos),
    OnWall(Pos),
    PlayerOnBox(Pos),
    DuplicateBox(Pos),
    MoreBoxesThanGoals {
        boxes: usize,
        goals: usize,
    },
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::Pos(r, c) => write!(f, "Invalid cell at pos: [{}, {}]", r, c),
            ParserErr::TooLarge => write!(f, "Map larger than {} rows/columns", MAX_SIZE),
            ParserErr::MultiplePlayers => write!(f, "More than one player"),
            ParserErr::NoPlayer => write!(f, "No player"),
            ParserErr::BadLine(line) => write!(f, "Missing or malformed line {}", line),
            ParserErr::CountMismatch {
                line,
                declared,
                found,
            } => write!(
                f,
                "Line {} declares {} coordinates but lists {}",
                line, declared, found
            ),
            ParserErr::OutOfBounds(pos) => write!(f, "Coordinate {} is out of bounds", pos),
            ParserErr::OnWall(pos) => write!(f, "Object on a wall at {}", pos),
            ParserErr::PlayerOnBox(pos) => write!(f, "Player on a box at {}", pos),
            ParserErr::DuplicateBox(pos) => write!(f, "Two boxes at {}", pos),
            ParserErr::MoreBoxesThanGoals { boxes, goals } => {
                write!(f, "More boxes ({}) than goals ({})", boxes, goals)
            }
        }
    }
}

impl Error for ParserErr {}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

pub(crate) fn parse(level: &str) -> Result<Level, ParserErr> {
    let first_line = level.lines().find(|line| !line.trim().is_empty());
    let looks_numeric = first_line.map_or(false, |line| {
        line.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
    });
    if looks_numeric {
        parse_format(level, Format::Coords)
    } else {
        parse_format(level, Format::Xsb)
    }
}

pub(crate) fn parse_format(level: &str, format: Format) -> Result<Level, ParserErr> {
    let (grid, goals, boxes, player_pos) = match format {
        Format::Xsb => parse_xsb(level)?,
        Format::Coords => parse_coords(level)?,
    };

    let mut sorted_boxes = boxes.clone();
    sorted_boxes.sort();
    for pair in sorted_boxes.windows(2) {
        if pair[0] == pair[1] {
            return Err(ParserErr::DuplicateBox(pair[0]));
        }
    }
    if boxes.len() > goals.len() {
        return Err(ParserErr::MoreBoxesThanGoals {
            boxes: boxes.len(),
            goals: goals.len(),
        });
    }

    Ok(Level::new(
        GoalMap::new(grid, goals),
        State::new(player_pos, boxes),
    ))
}

type Parsed = (Vec2d<MapCell>, Vec<Pos>, Vec<Pos>, Pos);

/// Parses (a subset of) the format described [here](http://www.sokobano.de/wiki/index.php?title=Level_format)
fn parse_xsb(level: &str) -> Result<Parsed, ParserErr> {
    // trim so we can specify levels using raw strings more easily
    let level = level.trim_matches('\n').trim_end();

    let mut grid = Vec::new();
    let mut goals = Vec::new();
    let mut boxes = Vec::new();
    let mut player_pos = None;

    for (r, line) in level.lines().enumerate() {
        if r >= MAX_SIZE {
            return Err(ParserErr::TooLarge);
        }
        let mut line_tiles = Vec::new();
        for (c, cur_char) in line.trim_end_matches('\r').chars().enumerate() {
            if c >= MAX_SIZE {
                return Err(ParserErr::TooLarge);
            }
            let pos = Pos::new(r as i32 + 1, c as i32 + 1);

            let tile = match cur_char {
                '#' => MapCell::Wall,
                'p' | '@' => {
                    if player_pos.is_some() {
                        return Err(ParserErr::MultiplePlayers);
                    }
                    player_pos = Some(pos);
                    MapCell::Empty
                }
                'P' | '+' => {
                    if player_pos.is_some() {
                        return Err(ParserErr::MultiplePlayers);
                    }
                    player_pos = Some(pos);
                    goals.push(pos);
                    MapCell::Goal
                }
                'b' | '$' => {
                    boxes.push(pos);
                    MapCell::Empty
                }
                'B' | '*' => {
                    boxes.push(pos);
                    goals.push(pos);
                    MapCell::Goal
                }
                '.' => {
                    goals.push(pos);
                    MapCell::Goal
                }
                ' ' | '-' | '_' => MapCell::Empty,
                _ => return Err(ParserErr::Pos(r + 1, c + 1)),
            };
            line_tiles.push(tile);
        }
        grid.push(line_tiles)
    }

    let player_pos = player_pos.ok_or(ParserErr::NoPlayer)?;
    Ok((Vec2d::new(&grid), goals, boxes, player_pos))
}

/// Parses the coordinate list format:
///
/// ```text
/// width height
/// n_walls r1 c1 r2 c2 ...
/// n_boxes r1 c1 ...
/// n_goals r1 c1 ...
/// player_r player_c
/// ```
fn parse_coords(level: &str) -> Result<Parsed, ParserErr> {
    let mut lines = level.lines().filter(|line| !line.trim().is_empty());
    let mut next_numbers = |line_nr: usize| -> Result<Vec<i32>, ParserErr> {
        let line = lines.next().ok_or(ParserErr::BadLine(line_nr))?;
        line.split_whitespace()
            .map(|word| word.parse().map_err(|_| ParserErr::BadLine(line_nr)))
            .collect()
    };

    let size = next_numbers(1)?;
    let (width, height) = match size[..] {
        [w, h] if w > 0 && h > 0 => (w, h),
        _ => return Err(ParserErr::BadLine(1)),
    };
    if width as usize > MAX_SIZE || height as usize > MAX_SIZE {
        return Err(ParserErr::TooLarge);
    }

    let in_bounds = |pos: Pos| pos.r >= 1 && pos.c >= 1 && pos.r <= height && pos.c <= width;
    let mut read_list = |line_nr: usize| -> Result<Vec<Pos>, ParserErr> {
        let numbers = next_numbers(line_nr)?;
        let (&declared, coords) = numbers.split_first().ok_or(ParserErr::BadLine(line_nr))?;
        if declared < 0 || coords.len() % 2 != 0 {
            return Err(ParserErr::BadLine(line_nr));
        }
        if coords.len() / 2 != declared as usize {
            return Err(ParserErr::CountMismatch {
                line: line_nr,
                declared: declared as usize,
                found: coords.len() / 2,
            });
        }
        let positions: Vec<_> = coords.chunks(2).map(|rc| Pos::new(rc[0], rc[1])).collect();
        match positions.iter().find(|&&pos| !in_bounds(pos)) {
            Some(&pos) => Err(ParserErr::OutOfBounds(pos)),
            None => Ok(positions),
        }
    };

    let walls = read_list(2)?;
    let boxes = read_list(3)?;
    let mut goals = read_list(4)?;
    goals.sort();
    goals.dedup();

    let player = next_numbers(5)?;
    let player_pos = match player[..] {
        [r, c] => Pos::new(r, c),
        _ => return Err(ParserErr::BadLine(5)),
    };
    if !in_bounds(player_pos) {
        return Err(ParserErr::OutOfBounds(player_pos));
    }

    let mut grid = Vec2d::filled(height, width, MapCell::Empty);
    for &wall in &walls {
        grid[wall] = MapCell::Wall;
    }
    for &goal in &goals {
        if grid[goal] == MapCell::Wall {
            return Err(ParserErr::OnWall(goal));
        }
        grid[goal] = MapCell::Goal;
    }
    for &b in &boxes {
        if grid[b] == MapCell::Wall {
            return Err(ParserErr::OnWall(b));
        }
    }
    if grid[player_pos] == MapCell::Wall {
        return Err(ParserErr::OnWall(player_pos));
    }
    if boxes.contains(&player_pos) {
        return Err(ParserErr::PlayerOnBox(player_pos));
    }

    Ok((grid, goals, boxes, player_pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xsb_fail_empty() {
        assert_failure("", ParserErr::NoPlayer);
    }

    #[test]
    fn xsb_fail_no_player() {
        let level = r"
####
#$.#
####
";
        assert_failure(level, ParserErr::NoPlayer);
    }

    #[test]
    fn xsb_fail_too_large() {
        let tall = format!("#@$.#\n{}", "#\n".repeat(MAX_SIZE));
        assert_failure(&tall, ParserErr::TooLarge);

        let wide = format!("#@$.#\n{}\n", "#".repeat(MAX_SIZE + 1));
        assert_failure(&wide, ParserErr::TooLarge);

        // exactly MAX_SIZE rows is still allowed
        let largest = format!("#@$.#\n{}", "#\n".repeat(MAX_SIZE - 1));
        assert_ne!(largest.parse::<Level>().err(), Some(ParserErr::TooLarge));
    }

    #[test]
    fn xsb_fail_pos() {
        let level = r"
#####
#@X.#
#####
";
        assert_failure(level, ParserErr::Pos(2, 3));
    }

    #[test]
    fn xsb_fail_multiple_players() {
        let level = r"
#####
#@+$#
#####
";
        assert_failure(level, ParserErr::MultiplePlayers);
    }

    #[test]
    fn xsb_fail_more_boxes() {
        let level = r"
######
#@$$.#
######
";
        assert_failure(level, ParserErr::MoreBoxesThanGoals { boxes: 2, goals: 1 });
    }

    #[test]
    fn xsb_simplest() {
        let level = r"
#####
#@$.#
#####
";
        assert_success_xsb(level);
        let level: Level = level.parse().unwrap();
        assert_eq!(level.state.player_pos, Pos::new(2, 2));
        assert_eq!(level.state.boxes, vec![Pos::new(2, 3)]);
        assert_eq!(level.map.goals(), &[Pos::new(2, 4)]);
        assert_eq!(level.map.rows(), 3);
        assert_eq!(level.map.cols(), 5);
    }

    #[test]
    fn xsb_corner_boxes() {
        let level = r"
*###*
#@$.#
*###*
";
        assert_success_xsb(level);
    }

    #[test]
    fn xsb_original_1() {
        let level = r"
    #####
    #   #
    #$  #
  ###  $##
  #  $ $ #
### # ## #   ######
#   # ## #####  ..#
# $  $          ..#
##### ### #@##  ..#
    #     #########
    #######
";
        assert_success_xsb(level);
    }

    #[test]
    fn coords_simplest() {
        let level = "
5 3
12 1 1 1 2 1 3 1 4 1 5 2 1 2 5 3 1 3 2 3 3 3 4 3 5
1 2 3
1 2 4
2 2
";
        let coords: Level = level.parse().unwrap();
        let xsb: Level = "#####\n#@$.#\n#####".parse().unwrap();
        assert_eq!(coords.map, xsb.map);
        assert_eq!(coords.state, xsb.state);
    }

    #[test]
    fn coords_fail_too_large() {
        let level = "
256 3
0
0
0
1 1
";
        assert_failure(level, ParserErr::TooLarge);
    }

    #[test]
    fn coords_fail_count() {
        let level = "
3 3
2 1 1
0
0
2 2
";
        assert_failure(
            level,
            ParserErr::CountMismatch {
                line: 2,
                declared: 2,
                found: 1,
            },
        );
    }

    #[test]
    fn coords_fail_out_of_bounds() {
        let level = "
3 3
0
1 4 1
1 2 2
2 1
";
        assert_failure(level, ParserErr::OutOfBounds(Pos::new(4, 1)));
    }

    #[test]
    fn coords_fail_on_wall() {
        let level = "
3 3
1 2 2
1 2 2
1 1 1
2 1
";
        assert_failure(level, ParserErr::OnWall(Pos::new(2, 2)));
    }

    #[test]
    fn coords_fail_duplicate_box() {
        let level = "
4 1
0
2 1 2 1 2
2 1 3 1 4
1 1
";
        assert_failure(level, ParserErr::DuplicateBox(Pos::new(1, 2)));
    }

    #[test]
    fn coords_fail_player_on_box() {
        let level = "
3 1
0
1 1 2
1 1 3
1 2
";
        assert_failure(level, ParserErr::PlayerOnBox(Pos::new(1, 2)));
    }

    #[test]
    fn coords_fail_missing_player() {
        let level = "
3 1
0
1 1 2
1 1 3
";
        assert_failure(level, ParserErr::BadLine(5));
    }

    fn assert_failure(input_level: &str, expected_err: ParserErr) {
        assert_eq!(input_level.parse::<Level>().unwrap_err(), expected_err);
    }

    fn assert_success_xsb(input_level: &str) {
        let level = parse_format(input_level, Format::Xsb).unwrap();
        assert_eq!(level.to_string(), input_level.trim_start_matches('\n'));
    }
}
