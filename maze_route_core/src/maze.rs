use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{KeyId, Position, grid::Grid};

/// Represents the static content of one maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Floor,
    Start,
    Exit,
    /// A locked door, passable once a key with the matching id is held.
    Door(KeyId),
    /// A collectible key; picking it up permanently opens every door
    /// sharing its id.
    Key(KeyId),
}

impl Cell {
    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }

    /// The route-planning role of this cell, if it has one.
    ///
    /// Doors, keys and the exit are checkpoints; walls, floor and the start
    /// cell are not (the start is the implicit head of every route).
    pub fn checkpoint_kind(self) -> Option<CheckpointKind> {
        match self {
            Cell::Door(id) => Some(CheckpointKind::Door(id)),
            Cell::Key(id) => Some(CheckpointKind::Key(id)),
            Cell::Exit => Some(CheckpointKind::Exit),
            Cell::Wall | Cell::Floor | Cell::Start => None,
        }
    }
}

/// What makes a checkpoint interesting for route planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckpointKind {
    Key(KeyId),
    Door(KeyId),
    Exit,
}

/// A door, key or exit cell together with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub position: Position,
    pub kind: CheckpointKind,
}

/// Represents errors raised while building or parsing a maze.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze has no cells")]
    Empty,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell token '{token}' at {position}")]
    UnknownToken { token: String, position: Position },
    #[error("maze has no start cell")]
    MissingStart,
    #[error("maze has more than one start cell")]
    DuplicateStart,
    #[error("maze has no exit cell")]
    MissingExit,
    #[error("maze has more than one exit cell")]
    DuplicateExit,
    #[error("door '{0}' has no matching key anywhere in the maze")]
    UnmatchedDoor(KeyId),
}

/// An immutable, validated maze: a cell grid with exactly one start, exactly
/// one exit, and a matching key somewhere for every door id.
///
/// The checkpoint list (doors, keys and the exit, in row-major scan order) is
/// collected once at construction and read by the route planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    grid: Grid<Cell>,
    start: Position,
    exit: Position,
    checkpoints: Vec<Checkpoint>,
}

impl Maze {
    /// Validates a cell grid and builds a maze from it.
    pub fn from_grid(grid: Grid<Cell>) -> Result<Maze, MazeError> {
        let mut start = None;
        let mut exit = None;
        let mut checkpoints = Vec::new();
        let mut door_ids = Vec::new();
        let mut key_ids = HashSet::new();

        for (position, cell) in grid.enumerate() {
            match *cell {
                Cell::Start => {
                    if start.is_some() {
                        return Err(MazeError::DuplicateStart);
                    }
                    start = Some(position);
                }
                Cell::Exit => {
                    if exit.is_some() {
                        return Err(MazeError::DuplicateExit);
                    }
                    exit = Some(position);
                }
                Cell::Door(id) => door_ids.push(id),
                Cell::Key(id) => {
                    key_ids.insert(id);
                }
                Cell::Wall | Cell::Floor => {}
            }
            if let Some(kind) = cell.checkpoint_kind() {
                checkpoints.push(Checkpoint { position, kind });
            }
        }

        if let Some(id) = door_ids.into_iter().find(|id| !key_ids.contains(id)) {
            return Err(MazeError::UnmatchedDoor(id));
        }

        let start = start.ok_or(MazeError::MissingStart)?;
        let exit = exit.ok_or(MazeError::MissingExit)?;

        Ok(Maze {
            grid,
            start,
            exit,
            checkpoints,
        })
    }

    /// Parses the 2-characters-per-cell text format.
    ///
    /// Tokens: `##` wall, `..` or two spaces floor, `@@` start, `<>` exit.
    /// A key is `O` followed by its id letter (the canonical wire-format key
    /// is `Om`); a door is `{` followed by its id letter, with the bare `{}`
    /// form standing for the door that `Om` opens.
    pub fn parse(text: &str) -> Result<Maze, MazeError> {
        let lines: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
        if lines.is_empty() {
            return Err(MazeError::Empty);
        }

        let width = lines[0].chars().count() / 2;
        let mut rows = Vec::with_capacity(lines.len());

        for (y, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != width * 2 {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    found: chars.len().div_ceil(2),
                });
            }
            let mut row = Vec::with_capacity(width);
            for (x, token) in chars.chunks(2).enumerate() {
                row.push(Self::parse_token(token, Position::new(x, y))?);
            }
            rows.push(row);
        }

        let grid = Grid::from_rows(rows).ok_or(MazeError::Empty)?;
        Maze::from_grid(grid)
    }

    fn parse_token(token: &[char], position: Position) -> Result<Cell, MazeError> {
        match *token {
            ['#', '#'] => Ok(Cell::Wall),
            ['.', '.'] | [' ', ' '] => Ok(Cell::Floor),
            ['@', '@'] => Ok(Cell::Start),
            ['<', '>'] => Ok(Cell::Exit),
            // `{}` is the door opened by the canonical `Om` key.
            ['{', '}'] => Ok(Cell::Door(KeyId('m'))),
            ['{', id] if id.is_ascii_alphabetic() => Ok(Cell::Door(KeyId(id))),
            ['O', id] if id.is_ascii_alphabetic() => Ok(Cell::Key(KeyId(id))),
            _ => Err(MazeError::UnknownToken {
                token: token.iter().collect(),
                position,
            }),
        }
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    /// Every door, key and exit cell, in row-major scan order.
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }
}
