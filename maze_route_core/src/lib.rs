use std::fmt;

use serde::{Deserialize, Serialize};

pub mod grid;
pub mod maze;
pub mod pathfind;
pub mod route;

/// Represents a 2D grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Returns the position offset by `(dx, dy)`, or `None` on underflow.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Whether `other` is exactly one 4-directional step away.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ties a door to the key(s) that unlock it: a door and a key sharing an id
/// match, and collecting the key permanently opens every door with that id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyId(pub char);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single step between two 4-adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// The move taking `from` to `to`, if the two cells are 4-adjacent.
    pub fn between(from: Position, to: Position) -> Option<Move> {
        let dx = to.x as isize - from.x as isize;
        let dy = to.y as isize - from.y as isize;
        match (dx, dy) {
            (0, -1) => Some(Move::Up),
            (0, 1) => Some(Move::Down),
            (-1, 0) => Some(Move::Left),
            (1, 0) => Some(Move::Right),
            _ => None,
        }
    }

    /// The wire-format character for this move.
    pub fn as_char(self) -> char {
        match self {
            Move::Up => 'u',
            Move::Down => 'd',
            Move::Left => 'l',
            Move::Right => 'r',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_checks_underflow() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.offset(-1, 0), None);
        assert_eq!(origin.offset(0, -1), None);
        assert_eq!(origin.offset(1, 2), Some(Position::new(1, 2)));
    }

    #[test]
    fn moves_between_adjacent_cells() {
        let center = Position::new(2, 2);
        assert_eq!(Move::between(center, Position::new(2, 1)), Some(Move::Up));
        assert_eq!(Move::between(center, Position::new(2, 3)), Some(Move::Down));
        assert_eq!(Move::between(center, Position::new(1, 2)), Some(Move::Left));
        assert_eq!(
            Move::between(center, Position::new(3, 2)),
            Some(Move::Right)
        );
        assert_eq!(Move::between(center, center), None);
        assert_eq!(Move::between(center, Position::new(3, 3)), None);
    }
}
