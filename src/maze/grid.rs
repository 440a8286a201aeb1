use super::cell::Coord;

/// Row-major storage for one value per maze cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    pub data: Box<[T]>,
    rows: u16,
    cols: u16,
}

impl<T: Clone> Grid<T> {
    pub fn new(rows: u16, cols: u16, value: T) -> Self {
        let data = vec![value; rows as usize * cols as usize].into_boxed_slice();
        Grid { data, rows, cols }
    }

    /// Overwrites every slot with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|slot| *slot = value.clone());
    }
}

impl<T> Grid<T> {
    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    fn ravel_index(&self, coord: Coord) -> usize {
        // Overflow-safe since rows and cols are u16 (assuming usize is at least 32 bits)
        coord.row as usize * self.cols as usize + coord.col as usize
    }

    pub fn get(&self, coord: Coord) -> Option<&T> {
        if self.is_in_bounds(coord) {
            self.data.get(self.ravel_index(coord))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut T> {
        if self.is_in_bounds(coord) {
            let idx = self.ravel_index(coord);
            self.data.get_mut(idx)
        } else {
            None
        }
    }

    /// Iterates every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<T> {
        let (rows, cols) = (self.rows, self.cols);
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Coord::new(row, col)))
    }
}

impl<T> std::ops::Index<Coord> for Grid<T> {
    type Output = T;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.data[self.ravel_index(index)]
    }
}

impl<T> std::ops::IndexMut<Coord> for Grid<T> {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        let idx = self.ravel_index(index);
        &mut self.data[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_indexing() {
        let mut grid = Grid::new(3, 4, 0u8);
        grid[Coord::new(2, 3)] = 7;
        assert_eq!(grid[Coord::new(2, 3)], 7);
        assert_eq!(grid.data[2 * 4 + 3], 7);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::new(3, 4, 0u8);
        assert!(grid.get(Coord::new(3, 0)).is_none());
        assert!(grid.get(Coord::new(0, 4)).is_none());
        assert_eq!(grid.get(Coord::new(2, 3)), Some(&0));
    }

    #[test]
    fn test_coords_row_major() {
        let grid = Grid::new(2, 2, ());
        let coords = grid.coords().collect::<Vec<_>>();
        assert_eq!(
            coords,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(1, 0),
                Coord::new(1, 1)
            ]
        );
    }
}
