use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use crate::data::Dir;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub dir: Dir,
    pub is_push: bool,
}

impl Move {
    pub fn new(dir: Dir, is_push: bool) -> Self {
        Move { dir, is_push }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = self.dir.to_char();
        write!(f, "{}", if self.is_push { c.to_ascii_uppercase() } else { c })
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Moves(Vec<Move>);

impl Moves {
    pub fn new(moves: Vec<Move>) -> Self {
        Moves(moves)
    }

    pub fn move_cnt(&self) -> usize {
        self.0.len()
    }

    pub fn push_cnt(&self) -> usize {
        self.0.iter().filter(|m| m.is_push).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> ::std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}

impl IntoIterator for Moves {
    type Item = Move;
    type IntoIter = ::std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Moves {
    type Item = &'a Move;
    type IntoIter = ::std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for mov in self {
            write!(f, "{}", mov)?;
        }
        Ok(())
    }
}

impl Debug for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidToken(pub char);

impl Display for InvalidToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid move token: {:?}", self.0)
    }
}

impl Error for InvalidToken {}

/// Tokens are `u`, `d`, `l`, `r` in any case, upper case marks a push.
impl FromStr for Moves {
    type Err = InvalidToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                Dir::from_char(c)
                    .map(|dir| Move::new(dir, c.is_ascii_uppercase()))
                    .ok_or(InvalidToken(c))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_moves() {
        use crate::data::DIRECTIONS;

        let steps = DIRECTIONS.iter().map(|&dir| Move::new(dir, false));
        let pushes = DIRECTIONS.iter().map(|&dir| Move::new(dir, true));
        let moves = Moves::new(steps.chain(pushes).collect());
        assert_eq!(moves.to_string(), "udlrUDLR");
        assert_eq!(format!("{:?}", moves), "udlrUDLR");
    }

    #[test]
    fn counting() {
        let moves: Moves = "uuRRdL".parse().unwrap();
        assert_eq!(moves.move_cnt(), 6);
        assert_eq!(moves.push_cnt(), 3);
        assert!(!moves.is_empty());
        assert!(Moves::default().is_empty());
    }

    #[test]
    fn parsing() {
        let moves: Moves = "uDl r".parse().unwrap();
        assert_eq!(moves.to_string(), "uDlr");
        assert_eq!("urx".parse::<Moves>(), Err(InvalidToken('x')));
    }
}
