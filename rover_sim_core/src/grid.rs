use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// Represents errors raised while constructing a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Grid dimensions ({width}, {height}) are invalid: width and height must be >= 0")]
    NegativeDimensions { width: i32, height: i32 },
}

/// A bounded 2D coordinate space with a fixed set of blocked cells.
///
/// The grid is immutable after construction: the obstacle set is supplied
/// once and only read afterwards, so a single grid can be shared by any
/// number of rovers without synchronisation.
///
/// A width or height of zero is accepted and yields a degenerate grid on
/// which every position is invalid; negative dimensions are rejected at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    obstacles: HashSet<Coordinate>,
}

impl Grid {
    /// Creates a grid of the given dimensions with the given obstacles.
    ///
    /// Obstacles outside the bounds are kept as supplied; they are
    /// unreachable anyway because the bounds check runs before the
    /// obstacle lookup.
    pub fn new(
        width: i32,
        height: i32,
        obstacles: impl IntoIterator<Item = Coordinate>,
    ) -> Result<Self, GridError> {
        if width < 0 || height < 0 {
            return Err(GridError::NegativeDimensions { width, height });
        }
        Ok(Grid {
            width,
            height,
            obstacles: obstacles.into_iter().collect(),
        })
    }

    /// Creates a grid with `count` obstacles scattered at random, seeded for
    /// reproducibility.
    ///
    /// The `keep_clear` cell never receives an obstacle, so a rover start
    /// position can be protected. `count` is capped at the number of
    /// remaining cells.
    pub fn with_scattered_obstacles(
        width: i32,
        height: i32,
        count: usize,
        seed: u64,
        keep_clear: Coordinate,
    ) -> Result<Self, GridError> {
        let mut grid = Grid::new(width, height, [])?;
        if width == 0 || height == 0 {
            return Ok(grid);
        }
        let free_cells = (width as usize * height as usize).saturating_sub(1);
        let target = count.min(free_cells);
        let mut rng = StdRng::seed_from_u64(seed);
        while grid.obstacles.len() < target {
            let candidate = Coordinate::new(
                rng.random_range(0..width),
                rng.random_range(0..height),
            );
            if candidate == keep_clear {
                continue;
            }
            grid.obstacles.insert(candidate);
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The blocked cells, as supplied at construction.
    pub fn obstacles(&self) -> &HashSet<Coordinate> {
        &self.obstacles
    }

    /// Checks whether a coordinate is inside the bounds and not blocked.
    ///
    /// Pure and total: always answers with a boolean. Bounds are checked
    /// before obstacle membership.
    pub fn is_valid_position(&self, coordinate: Coordinate) -> bool {
        if coordinate.x < 0
            || coordinate.x >= self.width
            || coordinate.y < 0
            || coordinate.y >= self.height
        {
            return false;
        }
        !self.obstacles.contains(&coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_by_ten() -> Grid {
        Grid::new(
            10,
            10,
            [Coordinate::new(2, 2), Coordinate::new(3, 5)],
        )
        .unwrap()
    }

    #[test]
    fn obstacle_cells_are_invalid() {
        let grid = ten_by_ten();
        assert!(!grid.is_valid_position(Coordinate::new(2, 2)));
        assert!(!grid.is_valid_position(Coordinate::new(3, 5)));
    }

    #[test]
    fn out_of_bounds_cells_are_invalid() {
        let grid = ten_by_ten();
        assert!(!grid.is_valid_position(Coordinate::new(10, 0)));
        assert!(!grid.is_valid_position(Coordinate::new(0, 10)));
        assert!(!grid.is_valid_position(Coordinate::new(-1, 0)));
        assert!(!grid.is_valid_position(Coordinate::new(0, -1)));
    }

    #[test]
    fn free_in_bounds_cells_are_valid() {
        let grid = ten_by_ten();
        assert!(grid.is_valid_position(Coordinate::new(0, 0)));
        assert!(grid.is_valid_position(Coordinate::new(9, 9)));
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        assert_eq!(
            Grid::new(-1, 5, []),
            Err(GridError::NegativeDimensions {
                width: -1,
                height: 5
            })
        );
        assert_eq!(
            Grid::new(5, -3, []),
            Err(GridError::NegativeDimensions {
                width: 5,
                height: -3
            })
        );
    }

    #[test]
    fn zero_sized_grid_has_no_valid_position() {
        let flat = Grid::new(10, 0, []).unwrap();
        let thin = Grid::new(0, 10, []).unwrap();
        assert!(!flat.is_valid_position(Coordinate::new(0, 0)));
        assert!(!thin.is_valid_position(Coordinate::new(0, 0)));
    }

    #[test]
    fn out_of_bounds_obstacles_are_kept_but_unreachable() {
        let grid = Grid::new(3, 3, [Coordinate::new(50, 50)]).unwrap();
        assert!(grid.obstacles().contains(&Coordinate::new(50, 50)));
        // Bounds check rejects the cell before the obstacle set is consulted.
        assert!(!grid.is_valid_position(Coordinate::new(50, 50)));
    }

    #[test]
    fn scattered_obstacles_are_deterministic_per_seed() {
        let start = Coordinate::new(0, 0);
        let a = Grid::with_scattered_obstacles(10, 10, 12, 7, start).unwrap();
        let b = Grid::with_scattered_obstacles(10, 10, 12, 7, start).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.obstacles().len(), 12);
        assert!(a.is_valid_position(start));
    }

    #[test]
    fn scattered_obstacle_count_is_capped_by_grid_size() {
        let start = Coordinate::new(0, 0);
        let grid = Grid::with_scattered_obstacles(2, 2, 100, 1, start).unwrap();
        assert_eq!(grid.obstacles().len(), 3);
        assert!(grid.is_valid_position(start));
    }
}
