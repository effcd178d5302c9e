// Spatial hash grid for collision candidate lookup.
//
// Instead of testing every pair of particles, each particle is bucketed by
// the cell containing its center. With the cell size equal to the collision
// diameter, any particle closer than one diameter sits in one of the 3x3
// cells around the query point.

use super::Point;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Size of each cell in the grid.
    cell_size: f64,
    /// Map from cell coordinates to the particle indices inside that cell.
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    /// Cell size should be the largest interaction distance.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 },
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, p: Point) -> (i64, i64) {
        ((p.x / self.cell_size).floor() as i64, (p.y / self.cell_size).floor() as i64)
    }

    pub fn insert(&mut self, index: usize, p: Point) {
        let cell = self.cell_of(p);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Indices in the 3x3 block of cells around `p`, in ascending order.
    /// May include particles farther than one cell size; callers do the
    /// exact distance check.
    pub fn neighbors(&self, p: Point) -> Vec<usize> {
        let (cx, cy) = self.cell_of(p);
        let mut result = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) {
                    result.extend_from_slice(indices);
                }
            }
        }
        result.sort_unstable();
        result
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_query() {
        let mut grid = SpatialGrid::new(18.0);
        grid.insert(0, Point { x: 5.0, y: 5.0 });
        grid.insert(1, Point { x: 200.0, y: 200.0 });
        grid.insert(2, Point { x: 20.0, y: -3.0 });

        assert_eq!(grid.neighbors(Point { x: 10.0, y: 10.0 }), vec![0, 2]);
        assert_eq!(grid.neighbors(Point { x: 199.0, y: 210.0 }), vec![1]);
    }

    #[test]
    fn test_neighbors_cover_one_cell_distance() {
        let mut grid = SpatialGrid::new(18.0);
        // Just under one cell apart, across a cell boundary.
        grid.insert(7, Point { x: 35.9, y: 0.0 });
        assert_eq!(grid.neighbors(Point { x: 18.0, y: 0.0 }), vec![7]);
    }

    #[test]
    fn test_clear() {
        let mut grid = SpatialGrid::new(10.0);
        grid.insert(0, Point { x: 1.0, y: 1.0 });
        grid.clear();
        assert!(grid.neighbors(Point { x: 1.0, y: 1.0 }).is_empty());
    }
}
