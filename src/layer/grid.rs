use std::ops::{Index, IndexMut};

/// Dense `width × height` grid of `f32` cells, stored row-major.
///
/// The same type holds input masks, the learned weights and anything the
/// codecs read back from disk. Cells are addressed as `(x, y)` with
/// `0 <= x < width` and `0 <= y < height`; anything else is a caller bug and
/// panics.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl Layer {
    pub fn zeros(width: usize, height: usize) -> Layer {
        Layer {
            width,
            height,
            cells: vec![0.0; width * height],
        }
    }

    /// Builds a layer from row-major cell values.
    ///
    /// # Panics
    /// Panics if `cells.len() != width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<f32>) -> Layer {
        if cells.len() != width * height {
            panic!(
                "Layer of {}x{} needs {} cells, got {}",
                width,
                height,
                width * height,
                cells.len()
            )
        }
        Layer { width, height, cells }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Resets every cell to `0.0`.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0.0);
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.cells[self.offset(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let i = self.offset(x, y);
        self.cells[i] = value;
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [f32] {
        &mut self.cells
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        if x >= self.width || y >= self.height {
            panic!(
                "cell ({}, {}) out of range for {}x{} layer",
                x, y, self.width, self.height
            )
        }
        y * self.width + x
    }
}

impl Index<(usize, usize)> for Layer {
    type Output = f32;

    fn index(&self, (x, y): (usize, usize)) -> &f32 {
        &self.cells[self.offset(x, y)]
    }
}

impl IndexMut<(usize, usize)> for Layer {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f32 {
        let i = self.offset(x, y);
        &mut self.cells[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_every_cell_cleared() {
        let layer = Layer::zeros(4, 3);
        assert_eq!(layer.dimensions(), (4, 3));
        assert_eq!(layer.cells().len(), 12);
        assert!(layer.cells().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn set_and_get_are_row_major() {
        let mut layer = Layer::zeros(3, 2);
        layer.set(2, 1, 5.0);
        layer[(0, 1)] = 1.5;
        assert_eq!(layer.get(2, 1), 5.0);
        assert_eq!(layer[(0, 1)], 1.5);
        assert_eq!(layer.cells(), &[0.0, 0.0, 0.0, 1.5, 0.0, 5.0]);

        layer.clear();
        assert!(layer.cells().iter().all(|&c| c == 0.0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn row_overflow_does_not_wrap_into_next_row() {
        let layer = Layer::zeros(4, 4);
        layer.get(5, 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn reading_past_the_edge_panics() {
        let layer = Layer::zeros(2, 2);
        layer.get(2, 0);
    }

    #[test]
    #[should_panic(expected = "needs 4 cells")]
    fn from_cells_checks_length() {
        Layer::from_cells(2, 2, vec![0.0; 3]);
    }
}
