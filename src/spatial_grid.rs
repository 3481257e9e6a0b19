/*
 * Spatial Grid Module
 *
 * Uniform grid over the world for neighbor lookups. With a cell size at
 * least as large as the biggest perception radius, every agent within
 * perception range lies in the 3x3 block of cells around the query point,
 * so the grid returns exactly the same neighbor sets as a full scan.
 *
 * Kept lean for the hot path:
 * - integer cell coordinates, clamped instead of bounds-checked
 * - cells are cleared and refilled, never reallocated, between ticks
 */

use nannou::prelude::Vec2;

use crate::agent::WorldBounds;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    columns: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, bounds: WorldBounds) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            bounds.width.max(bounds.height).max(1.0)
        };
        let columns = ((bounds.width / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.height / cell_size).ceil() as usize).max(1);

        Self {
            cell_size,
            columns,
            rows,
            cells: vec![Vec::new(); columns * rows],
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    // Cell coordinates of a point; points just outside the world land in the border cells
    #[inline]
    fn cell_of(&self, position: Vec2) -> (usize, usize) {
        let column = (position.x / self.cell_size).floor().clamp(0.0, (self.columns - 1) as f32);
        let row = (position.y / self.cell_size).floor().clamp(0.0, (self.rows - 1) as f32);
        (column as usize, row as usize)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    #[inline]
    pub fn insert(&mut self, index: usize, position: Vec2) {
        let (column, row) = self.cell_of(position);
        self.cells[row * self.columns + column].push(index);
    }

    /// Clears the grid and inserts every position under its slice index.
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Vec2>) {
        self.clear();
        for (index, position) in positions.into_iter().enumerate() {
            self.insert(index, position);
        }
    }

    /// Indices stored in the cell containing `position` and its eight
    /// neighbors. Candidates only; callers still check the distance.
    pub fn nearby_indices(&self, position: Vec2) -> Vec<usize> {
        let (column, row) = self.cell_of(position);
        let mut result = Vec::new();

        for check_row in row.saturating_sub(1)..=(row + 1).min(self.rows - 1) {
            let row_start = check_row * self.columns;
            for check_column in column.saturating_sub(1)..=(column + 1).min(self.columns - 1) {
                result.extend_from_slice(&self.cells[row_start + check_column]);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::prelude::vec2;

    #[test]
    fn dimensions_cover_the_world() {
        let grid = SpatialGrid::new(30.0, WorldBounds::new(100.0, 60.0));
        assert_eq!(grid.dimensions(), (4, 2));
    }

    #[test]
    fn nearby_includes_adjacent_cells_only() {
        let mut grid = SpatialGrid::new(10.0, WorldBounds::new(100.0, 100.0));
        grid.rebuild([vec2(5.0, 5.0), vec2(15.0, 15.0), vec2(45.0, 45.0), vec2(-3.0, 2.0)]);

        let mut found = grid.nearby_indices(vec2(6.0, 6.0));
        found.sort_unstable();
        assert_eq!(found, vec![0, 1, 3]);
    }

    #[test]
    fn degenerate_cell_size_falls_back_to_one_cell() {
        let grid = SpatialGrid::new(0.0, WorldBounds::new(100.0, 50.0));
        assert_eq!(grid.dimensions(), (1, 1));
    }
}
