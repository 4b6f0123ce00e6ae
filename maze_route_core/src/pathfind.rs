use std::collections::{HashMap, HashSet, VecDeque};

use crate::{
    KeyId, Position,
    maze::{Cell, Maze},
};

/// The set of key ids held at some point along a route. Grows monotonically;
/// keys are never dropped or consumed.
pub type KeySet = HashSet<KeyId>;

/// Represents a failed point-to-point search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("no path from {from} to {to} under the held keys")]
    Unreachable { from: Position, to: Position },
}

/// Whether `cell` can be walked on while holding `keys`.
///
/// A door whose id is held counts as floor; every other door is as solid as
/// a wall. Keys, the start and the exit are always traversable.
fn is_walkable(cell: Cell, keys: &KeySet) -> bool {
    match cell {
        Cell::Wall => false,
        Cell::Door(id) => keys.contains(&id),
        Cell::Floor | Cell::Start | Cell::Exit | Cell::Key(_) => true,
    }
}

/// The 4-directional neighbors of `pos` that are walkable under `keys`.
fn walkable_neighbors(maze: &Maze, pos: Position, keys: &KeySet) -> Vec<Position> {
    const DIRECTIONS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

    DIRECTIONS
        .iter()
        .filter_map(|&(dx, dy)| {
            let neighbor = pos.offset(dx, dy)?;
            let cell = maze.grid().get(neighbor)?;
            is_walkable(*cell, keys).then_some(neighbor)
        })
        .collect()
}

/// Computes the shortest walkable path from `start` to `target` while
/// holding `keys`, inclusive of both endpoints.
///
/// Standard breadth-first search: FIFO frontier, visited map doubling as
/// parent back-pointers, so the first time `target` is dequeued the
/// reconstructed path has minimal edge count. Which of several equal-length
/// paths is returned depends on exploration order and is unspecified.
pub fn shortest_path(
    maze: &Maze,
    start: Position,
    target: Position,
    keys: &KeySet,
) -> Result<Vec<Position>, PathError> {
    let mut frontier = VecDeque::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();

    frontier.push_back(start);
    came_from.insert(start, start);

    while let Some(current) = frontier.pop_front() {
        if current == target {
            let mut path = vec![current];
            let mut pos = current;
            while pos != start {
                pos = came_from[&pos];
                path.push(pos);
            }
            path.reverse();
            return Ok(path);
        }

        for neighbor in walkable_neighbors(maze, current, keys) {
            if !came_from.contains_key(&neighbor) {
                came_from.insert(neighbor, current);
                frontier.push_back(neighbor);
            }
        }
    }

    Err(PathError::Unreachable {
        from: start,
        to: target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_straight_corridor_path() {
        let maze = Maze::parse(
            "############\n\
             ##@@....<>##\n\
             ############\n",
        )
        .unwrap();

        let path = shortest_path(&maze, maze.start(), maze.exit(), &KeySet::new()).unwrap();
        assert_eq!(path.first(), Some(&maze.start()));
        assert_eq!(path.last(), Some(&maze.exit()));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn start_equal_to_target_is_a_single_cell_path() {
        let maze = Maze::parse(
            "############\n\
             ##@@....<>##\n\
             ############\n",
        )
        .unwrap();

        let path = shortest_path(&maze, maze.start(), maze.start(), &KeySet::new()).unwrap();
        assert_eq!(path, vec![maze.start()]);
    }

    #[test]
    fn locked_door_blocks_without_key() {
        let maze = Maze::parse(
            "############\n\
             ##@@{}<>Om##\n\
             ############\n",
        )
        .unwrap();

        assert_eq!(
            shortest_path(&maze, maze.start(), maze.exit(), &KeySet::new()),
            Err(PathError::Unreachable {
                from: maze.start(),
                to: maze.exit(),
            })
        );

        let keys: KeySet = [KeyId('m')].into_iter().collect();
        let path = shortest_path(&maze, maze.start(), maze.exit(), &keys).unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn held_key_only_opens_matching_doors() {
        let maze = Maze::parse(
            "############\n\
             ##@@{a<>Oa##\n\
             ############\n",
        )
        .unwrap();

        let wrong_keys: KeySet = [KeyId('b')].into_iter().collect();
        assert!(shortest_path(&maze, maze.start(), maze.exit(), &wrong_keys).is_err());

        let keys: KeySet = [KeyId('a')].into_iter().collect();
        assert!(shortest_path(&maze, maze.start(), maze.exit(), &keys).is_ok());
    }

    #[test]
    fn takes_the_shorter_of_two_open_routes() {
        // Two ways around the central block; the southern detour is longer.
        let maze = Maze::parse(
            "##############\n\
             ##@@......<>##\n\
             ##..######..##\n\
             ##..........##\n\
             ##############\n",
        )
        .unwrap();

        let path = shortest_path(&maze, maze.start(), maze.exit(), &KeySet::new()).unwrap();
        assert_eq!(path.len(), 5);
    }
}
