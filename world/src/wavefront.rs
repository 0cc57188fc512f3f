//! Wavefront distance transform seeded from a single reference cell.

use std::collections::VecDeque;

use wavefront_chase_core::{BoardDimensions, CellCoord, Direction, DistanceFieldView};

/// Dense shortest-path distance grid seeded from one reference cell.
///
/// The field is produced by a breadth-first search over the 4-connected board.
/// With no obstacles on the board every value equals the Manhattan distance to
/// the reference. Cells the search never reaches keep `u32::MAX`, which only
/// happens when the reference lies outside the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    dimensions: BoardDimensions,
    distances: Vec<u32>,
}

impl DistanceField {
    /// Computes a fresh field for `reference` on a board of the given size.
    #[must_use]
    pub fn compute(dimensions: BoardDimensions, reference: CellCoord) -> Self {
        let mut field = Self {
            dimensions,
            distances: Vec::new(),
        };
        field.rebuild(dimensions, reference);
        field
    }

    /// Recomputes every distance in place, reusing the existing allocation.
    pub fn rebuild(&mut self, dimensions: BoardDimensions, reference: CellCoord) {
        let cell_count = dimensions.cell_count();
        if self.distances.len() != cell_count {
            self.distances = vec![u32::MAX; cell_count];
        } else {
            self.distances.fill(u32::MAX);
        }
        self.dimensions = dimensions;

        let Some(origin) = dimensions.index(reference) else {
            return;
        };
        self.distances[origin] = 0;

        let mut queue = VecDeque::with_capacity(cell_count);
        queue.push_back(reference);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = dimensions.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for direction in Direction::ALL {
                let Some(neighbor) = dimensions.neighbor(cell, direction) else {
                    continue;
                };
                let Some(neighbor_index) = dimensions.index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Dimensions of the board the field covers.
    #[must_use]
    pub const fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.distances
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.dimensions
            .index(cell)
            .and_then(|offset| self.distances.get(offset).copied())
    }

    /// Borrows the field as the read-only view systems consume.
    #[must_use]
    pub fn view(&self) -> DistanceFieldView<'_> {
        DistanceFieldView::new(&self.distances, self.dimensions)
    }
}
