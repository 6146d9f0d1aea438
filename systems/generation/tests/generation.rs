use std::collections::VecDeque;

use maze_sprint_core::{CellKind, GridCoord, GridDimensions, MazeGrid};
use maze_sprint_system_generation::{carve, ENTRY};

fn dimensions(width: u32, height: u32) -> GridDimensions {
    GridDimensions::new(width, height).expect("test dimensions must be valid")
}

/// Breadth-first flood over passages starting at the entry room.
fn reachable_passages(grid: &MazeGrid) -> Vec<bool> {
    let dims = grid.dimensions();
    let width = dims.width() as usize;
    let mut visited = vec![false; dims.cell_count()];
    let mut queue = VecDeque::new();

    visited[ENTRY.row() as usize * width + ENTRY.column() as usize] = true;
    queue.push_back(ENTRY);

    while let Some(cell) = queue.pop_front() {
        let neighbors = [
            (cell.column().wrapping_sub(1), cell.row()),
            (cell.column() + 1, cell.row()),
            (cell.column(), cell.row().wrapping_sub(1)),
            (cell.column(), cell.row() + 1),
        ];
        for (column, row) in neighbors {
            let neighbor = GridCoord::new(column, row);
            if !dims.contains(neighbor) || !grid.is_passage(neighbor) {
                continue;
            }
            let index = row as usize * width + column as usize;
            if !visited[index] {
                visited[index] = true;
                queue.push_back(neighbor);
            }
        }
    }

    visited
}

#[test]
fn every_room_is_reachable_from_the_entry() {
    for (width, height, seed) in [(5, 5, 0), (15, 15, 99), (21, 13, 7), (31, 31, 123456)] {
        let plan = carve(dimensions(width, height), seed);
        let visited = reachable_passages(plan.grid());
        let grid_width = width as usize;

        for row in (1..height).step_by(2) {
            for column in (1..width).step_by(2) {
                assert!(
                    visited[row as usize * grid_width + column as usize],
                    "room ({column}, {row}) unreachable in {width}x{height} seed {seed}"
                );
            }
        }
    }
}

#[test]
fn passage_graph_is_acyclic() {
    // A spanning tree over N rooms carves exactly N - 1 connector cells, so
    // total passages come to 2N - 1.
    for (width, height, seed) in [(5, 5, 1), (15, 15, 2), (25, 17, 3)] {
        let plan = carve(dimensions(width, height), seed);
        let rooms = ((width as usize - 1) / 2) * ((height as usize - 1) / 2);
        let passages = plan
            .grid()
            .cells()
            .iter()
            .filter(|kind| **kind == CellKind::Passage)
            .count();

        assert_eq!(
            passages,
            2 * rooms - 1,
            "unexpected passage count in {width}x{height} seed {seed}"
        );
    }
}

#[test]
fn border_cells_stay_solid() {
    let plan = carve(dimensions(15, 11), 31);
    let grid = plan.grid();

    for column in 0..15 {
        assert_eq!(grid.kind(GridCoord::new(column, 0)), Some(CellKind::Wall));
        assert_eq!(grid.kind(GridCoord::new(column, 10)), Some(CellKind::Wall));
    }
    for row in 0..11 {
        assert_eq!(grid.kind(GridCoord::new(0, row)), Some(CellKind::Wall));
        assert_eq!(grid.kind(GridCoord::new(14, row)), Some(CellKind::Wall));
    }
}

#[test]
fn fifteen_by_fifteen_is_deterministic_per_seed() {
    let first = carve(dimensions(15, 15), 0x5EED);
    let second = carve(dimensions(15, 15), 0x5EED);

    assert_eq!(first.grid().cells(), second.grid().cells());
    assert_eq!(first.entry(), second.entry());
    assert_eq!(first.exit(), second.exit());
}

#[test]
fn exit_lands_on_the_far_corner_room() {
    for (width, height) in [(5, 5), (9, 7), (15, 15)] {
        let plan = carve(dimensions(width, height), 11);
        assert_eq!(plan.exit(), GridCoord::new(width - 2, height - 2));
        assert!(plan.grid().is_passage(plan.exit()));
    }
}
