use serde::{Deserialize, Serialize};

use crate::{Coordinate, Heading, grid::Grid};

/// Raised when a rover is constructed on a cell its grid considers invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Start position {0} is out of bounds or blocked on this grid")]
pub struct PlacementError(pub Coordinate);

/// The result of a single move attempt.
///
/// `Blocked` is a reported outcome, not an error: the rover stays where it
/// is and carries on accepting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The rover advanced to the carried coordinate.
    Moved(Coordinate),
    /// The candidate cell was out of bounds or blocked; the rover did not move.
    Blocked(Coordinate),
}

/// A rover bound to a shared grid.
///
/// The rover borrows its grid rather than owning it: the grid outlives the
/// rover and may be read concurrently by other rovers. The rover's own state
/// (coordinate and heading) is exclusively owned, so mutation goes through
/// `&mut self` and the borrow checker rules out concurrent writers.
///
/// Invariant: the current coordinate passed `Grid::is_valid_position` at the
/// moment it was assigned, whether at construction or by a validated move.
#[derive(Debug)]
pub struct Rover<'a> {
    position: Coordinate,
    heading: Heading,
    grid: &'a Grid,
}

impl<'a> Rover<'a> {
    /// Places a rover on the grid.
    ///
    /// Fails fast if the start cell is out of bounds or blocked, so the
    /// position invariant holds from the first observable state onwards.
    pub fn new(
        grid: &'a Grid,
        position: Coordinate,
        heading: Heading,
    ) -> Result<Self, PlacementError> {
        if !grid.is_valid_position(position) {
            return Err(PlacementError(position));
        }
        Ok(Rover {
            position,
            heading,
            grid,
        })
    }

    /// Attempts one step in the current heading.
    ///
    /// The candidate cell is validated against the grid before the position
    /// is updated; a rejected candidate leaves the rover untouched and is
    /// reported back inside `MoveOutcome::Blocked`.
    pub fn move_forward(&mut self) -> MoveOutcome {
        let candidate = self.position.step(self.heading);
        if self.grid.is_valid_position(candidate) {
            self.position = candidate;
            MoveOutcome::Moved(candidate)
        } else {
            MoveOutcome::Blocked(candidate)
        }
    }

    /// Rotates the heading counter-clockwise. Always succeeds.
    pub fn turn_left(&mut self) {
        self.heading = self.heading.turn_left();
    }

    /// Rotates the heading clockwise. Always succeeds.
    pub fn turn_right(&mut self) {
        self.heading = self.heading.turn_right();
    }

    #[inline]
    pub fn position(&self) -> Coordinate {
        self.position
    }

    #[inline]
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Pure read of the observable state pair.
    pub fn status(&self) -> (Coordinate, Heading) {
        (self.position, self.heading)
    }

    /// Human-readable status line for report output.
    pub fn status_report(&self) -> String {
        format!("Rover is at {} facing {}", self.position, self.heading)
    }
}
