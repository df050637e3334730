use std::fmt::{self, Display, Formatter};
use std::ops::Add;

/// Largest number of rows or columns a level can have.
pub(crate) const MAX_SIZE: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapCell {
    Empty,
    Wall,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Contents {
    Empty,
    Box,
    Player,
}

/// Grid coordinate, 1-based: the top-left cell is `(1, 1)`.
///
/// Derived ordering is row-major, boxes are sorted with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub r: i32,
    pub c: i32,
}

impl Pos {
    pub fn new(r: i32, c: i32) -> Pos {
        Pos { r, c }
    }

    pub fn manhattan(self, other: Pos) -> i32 {
        (self.r - other.r).abs() + (self.c - other.c).abs()
    }

    pub fn euclidean(self, other: Pos) -> f64 {
        f64::from(self.r - other.r).hypot(f64::from(self.c - other.c))
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

/// The order in which successors are generated.
pub const DIRECTIONS: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

impl Dir {
    pub(crate) fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }

    pub(crate) fn to_char(self) -> char {
        match self {
            Dir::Up => 'u',
            Dir::Down => 'd',
            Dir::Left => 'l',
            Dir::Right => 'r',
        }
    }

    pub(crate) fn from_char(c: char) -> Option<Dir> {
        match c.to_ascii_lowercase() {
            'u' => Some(Dir::Up),
            'd' => Some(Dir::Down),
            'l' => Some(Dir::Left),
            'r' => Some(Dir::Right),
            _ => None,
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Add<Dir> for Pos {
    type Output = Pos;

    fn add(self, dir: Dir) -> Pos {
        let (dr, dc) = dir.delta();
        Pos {
            r: self.r + dr,
            c: self.c + dc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Pos::new(1, 1);
        let b = Pos::new(4, 5);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(a.euclidean(b), 5.0);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn adding_dirs() {
        let pos = Pos::new(3, 3);
        let neighbors: Vec<_> = DIRECTIONS.iter().map(|&dir| pos + dir).collect();
        assert_eq!(
            neighbors,
            vec![
                Pos::new(2, 3),
                Pos::new(4, 3),
                Pos::new(3, 2),
                Pos::new(3, 4)
            ]
        );
    }

    #[test]
    fn parsing_dirs() {
        assert_eq!(Dir::from_char('U'), Some(Dir::Up));
        assert_eq!(Dir::from_char('l'), Some(Dir::Left));
        assert_eq!(Dir::from_char('x'), None);
    }
}
