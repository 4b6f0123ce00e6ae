//! The demo map shipped with the workspace must stay solvable.

use maze_route_core::{maze::Maze, route::solve};

const MAP01: &str = include_str!("../../maps/map01.txt");

#[test]
fn shipped_demo_map_solves() {
    let maze = Maze::parse(MAP01).unwrap();
    let solution = solve(&maze).unwrap();

    // Fetch the far `m` key first, sweep left through the `a` key, then
    // descend through both doors.
    assert_eq!(solution.steps(), 11);
    assert_eq!(solution.move_string(), "rrrlllllddd");
}
