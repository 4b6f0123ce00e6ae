//! Route planning over maze checkpoints.
//!
//! The planner enumerates every feasible ordering of checkpoints (doors,
//! keys, exit), composes each ordering into a concrete cell path with one
//! BFS run per segment, and keeps the shortest composition. Enumerating
//! orderings rather than searching the product state space keeps each piece
//! independently testable; the ordering count grows factorially in the
//! checkpoint count, which is fine at puzzle scale.

use serde::{Deserialize, Serialize};

use crate::{
    Move, Position,
    maze::{Checkpoint, CheckpointKind, Maze},
    pathfind::{KeySet, PathError, shortest_path},
};

/// Represents a solve that produced no route at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    /// Every candidate checkpoint ordering failed to reach the exit.
    #[error("the maze has no route from start to exit")]
    NoSolution,
}

/// The winning route through a maze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    path: Vec<Position>,
}

impl Solution {
    /// The full walk, start and exit cells inclusive.
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Number of steps (edges) walked; one less than the cell count.
    pub fn steps(&self) -> usize {
        self.path.len() - 1
    }

    /// The route as one move per step.
    pub fn moves(&self) -> Vec<Move> {
        self.path
            .windows(2)
            .map(|pair| {
                Move::between(pair[0], pair[1])
                    .expect("solution paths only ever take 4-adjacent steps")
            })
            .collect()
    }

    /// The route in the wire format, one of `u` `d` `l` `r` per step.
    pub fn move_string(&self) -> String {
        self.moves().into_iter().map(Move::as_char).collect()
    }
}

/// Exploration state for one partial route. Cloned into each recursive
/// branch so sibling branches never share mutable state.
#[derive(Clone)]
struct RouteState {
    at: Position,
    keys: KeySet,
    visited: Vec<bool>,
    sequence: Vec<usize>,
}

/// Enumerates every feasible checkpoint ordering that ends at the exit.
///
/// At each step, every unvisited checkpoint is a candidate if it is
/// reachable under the keys held so far, except that a door only becomes a
/// candidate once its key is held. Appending the exit terminates a
/// sequence; branches with no remaining candidate are dropped. A door whose
/// key can never be reached is therefore never offered and simply stays
/// impassable.
///
/// An empty result means the exit is unreachable under any ordering.
pub fn enumerate_routes(maze: &Maze) -> Vec<Vec<Checkpoint>> {
    let mut routes = Vec::new();
    let state = RouteState {
        at: maze.start(),
        keys: KeySet::new(),
        visited: vec![false; maze.checkpoints().len()],
        sequence: Vec::new(),
    };
    explore(maze, state, &mut routes);
    routes
}

fn explore(maze: &Maze, state: RouteState, routes: &mut Vec<Vec<Checkpoint>>) {
    for (index, checkpoint) in maze.checkpoints().iter().enumerate() {
        if state.visited[index] {
            continue;
        }
        if let CheckpointKind::Door(id) = checkpoint.kind {
            if !state.keys.contains(&id) {
                continue;
            }
        }
        // Per-segment unreachability is routine: the candidate is skipped,
        // not reported.
        if shortest_path(maze, state.at, checkpoint.position, &state.keys).is_err() {
            continue;
        }

        let mut next = state.clone();
        next.at = checkpoint.position;
        next.visited[index] = true;
        next.sequence.push(index);
        if let CheckpointKind::Key(id) = checkpoint.kind {
            next.keys.insert(id);
        }

        if checkpoint.kind == CheckpointKind::Exit {
            routes.push(
                next.sequence
                    .iter()
                    .map(|&i| maze.checkpoints()[i])
                    .collect(),
            );
        } else {
            explore(maze, next, routes);
        }
    }
}

/// Stitches one full path out of per-segment BFS runs along `sequence`.
///
/// The first segment starts at the maze's start cell with no keys; every
/// later segment runs under the keys accumulated from the checkpoints
/// before it and is appended without its first coordinate, which the path
/// already ends on.
pub fn compose(maze: &Maze, sequence: &[Checkpoint]) -> Result<Vec<Position>, PathError> {
    let mut keys = KeySet::new();
    let mut at = maze.start();
    let mut path = vec![at];

    for checkpoint in sequence {
        let segment = shortest_path(maze, at, checkpoint.position, &keys)?;
        path.extend(segment.into_iter().skip(1));
        at = checkpoint.position;
        if let CheckpointKind::Key(id) = checkpoint.kind {
            keys.insert(id);
        }
    }

    Ok(path)
}

/// Selects the shortest of the candidate paths by cell count. Any minimal
/// path is an acceptable winner; ties are broken arbitrarily.
fn select_shortest(paths: Vec<Vec<Position>>) -> Result<Vec<Position>, SolveError> {
    paths
        .into_iter()
        .min_by_key(Vec::len)
        .ok_or(SolveError::NoSolution)
}

/// Finds the globally shortest start-to-exit route under the lock/key
/// constraints.
///
/// All-or-nothing: on failure no partial route is returned.
pub fn solve(maze: &Maze) -> Result<Solution, SolveError> {
    let mut candidates = Vec::new();
    for sequence in enumerate_routes(maze) {
        // Enumeration already proved each segment reachable, but a compose
        // failure still only costs that one candidate.
        if let Ok(path) = compose(maze, &sequence) {
            candidates.push(path);
        }
    }
    select_shortest(candidates).map(|path| Solution { path })
}
