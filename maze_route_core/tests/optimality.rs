//! Randomized cross-check of the route planner against a reference search
//! over the full (position, keys-held) state space.

use std::collections::{BTreeSet, HashSet, VecDeque};

use maze_route_core::{
    KeyId, Position,
    grid::Grid,
    maze::{Cell, Maze},
    route::{SolveError, solve},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

const DIRECTIONS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Minimal step count from start to exit, walking the grid one cell at a
/// time and collecting a key the moment its cell is entered. `None` when
/// the exit cannot be reached at all.
fn brute_force_steps(maze: &Maze) -> Option<usize> {
    type State = (Position, BTreeSet<KeyId>);

    let mut frontier: VecDeque<(State, usize)> = VecDeque::new();
    let mut seen: HashSet<State> = HashSet::new();

    let start = (maze.start(), BTreeSet::new());
    seen.insert(start.clone());
    frontier.push_back((start, 0));

    while let Some(((pos, keys), steps)) = frontier.pop_front() {
        if pos == maze.exit() {
            return Some(steps);
        }
        for (dx, dy) in DIRECTIONS {
            let Some(next) = pos.offset(dx, dy) else {
                continue;
            };
            let Some(&cell) = maze.grid().get(next) else {
                continue;
            };
            let passable = match cell {
                Cell::Wall => false,
                Cell::Door(id) => keys.contains(&id),
                _ => true,
            };
            if !passable {
                continue;
            }
            let mut next_keys = keys.clone();
            if let Cell::Key(id) = cell {
                next_keys.insert(id);
            }
            let state = (next, next_keys);
            if seen.insert(state.clone()) {
                frontier.push_back((state, steps + 1));
            }
        }
    }
    None
}

/// A small walled rectangle with random interior walls, a start, an exit,
/// and up to two key/door pairs on random open cells. `None` when too few
/// open cells were left to place everything.
fn random_maze(rng: &mut StdRng) -> Option<Maze> {
    let width = rng.random_range(5..9);
    let height = rng.random_range(5..8);

    let mut rows = vec![vec![Cell::Wall; width]; height];
    for row in rows.iter_mut().take(height - 1).skip(1) {
        for cell in row.iter_mut().take(width - 1).skip(1) {
            if !rng.random_bool(0.25) {
                *cell = Cell::Floor;
            }
        }
    }

    let mut open: Vec<Position> = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            if *cell == Cell::Floor {
                open.push(Position::new(x, y));
            }
        }
    }
    open.shuffle(rng);

    let pairs = rng.random_range(0..=2);
    if open.len() < 2 + 2 * pairs {
        return None;
    }

    let mut place = |cell: Cell, open: &mut Vec<Position>| {
        let pos = open.pop().expect("placement count checked above");
        rows[pos.y][pos.x] = cell;
    };
    place(Cell::Start, &mut open);
    place(Cell::Exit, &mut open);
    for i in 0..pairs {
        let id = KeyId((b'a' + i as u8) as char);
        place(Cell::Key(id), &mut open);
        place(Cell::Door(id), &mut open);
    }

    let grid = Grid::from_rows(rows).expect("rows are rectangular by construction");
    Some(Maze::from_grid(grid).expect("start, exit and key/door pairs all placed"))
}

#[test]
fn solver_matches_state_space_search_on_random_mazes() {
    let mut rng = StdRng::seed_from_u64(0x6d617a65);
    let mut solved = 0;

    for _ in 0..200 {
        let Some(maze) = random_maze(&mut rng) else {
            continue;
        };
        let reference = brute_force_steps(&maze);
        match solve(&maze) {
            Ok(solution) => {
                assert_eq!(
                    Some(solution.steps()),
                    reference,
                    "solver found a non-optimal route"
                );
                solved += 1;
            }
            Err(SolveError::NoSolution) => {
                assert_eq!(reference, None, "solver missed an existing route");
            }
        }
    }

    // The seed above yields a healthy mix of solvable and unsolvable mazes.
    assert!(solved > 20, "only {solved} solvable mazes were generated");
}
