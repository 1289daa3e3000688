use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    Coordinate, Heading,
    grid::{Grid, GridError},
    rover::{PlacementError, Rover},
    sequencer::Command,
};

/// Represents errors raised while loading a scenario file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("Scenario map is empty")]
    EmptyMap,
    #[error("Inconsistent width at row {row}: expected {expected}, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unknown map symbol '{symbol}' at ({x}, {y})")]
    UnknownSymbol { symbol: char, x: i32, y: i32 },
    #[error("No rover start marker ('^', '>', 'v' or '<') found in map")]
    MissingStart,
    #[error("Multiple rover start markers found in map")]
    DuplicateStart,
    #[error("Unknown command letter '{0}': expected M, L or R")]
    UnknownCommand(char),
}

/// The full construction-time input of one simulation run: grid dimensions,
/// obstacles, rover start pose, and the command list to replay.
///
/// A scenario can be carried as structured data (it is serde-derived) or
/// parsed from a plain-text map, e.g.:
///
/// ```text
/// ....
/// .#..
/// >...
///
/// MMRML
/// ```
///
/// `.` is free ground, `#` an obstacle, and one of `^ > v <` marks the rover
/// start while encoding its heading. The first text row is the top of the
/// grid (highest y; North points up). An optional block after a blank line
/// lists the commands as `M`/`L`/`R` letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub width: i32,
    pub height: i32,
    pub obstacles: Vec<Coordinate>,
    pub start: Coordinate,
    pub heading: Heading,
    pub commands: Vec<Command>,
}

impl Scenario {
    /// Builds the grid this scenario describes.
    pub fn grid(&self) -> Result<Grid, GridError> {
        Grid::new(self.width, self.height, self.obstacles.iter().copied())
    }

    /// Places the scenario's rover on an already-built grid.
    pub fn rover<'a>(&self, grid: &'a Grid) -> Result<Rover<'a>, PlacementError> {
        Rover::new(grid, self.start, self.heading)
    }
}

fn heading_for_marker(symbol: char) -> Option<Heading> {
    match symbol {
        '^' => Some(Heading::North),
        '>' => Some(Heading::East),
        'v' => Some(Heading::South),
        '<' => Some(Heading::West),
        _ => None,
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut lines = input.lines();

        let mut map_rows: Vec<&str> = Vec::new();
        for line in &mut lines {
            let row = line.trim();
            if row.is_empty() {
                break;
            }
            map_rows.push(row);
        }
        if map_rows.is_empty() {
            return Err(ScenarioError::EmptyMap);
        }

        let width = map_rows[0].chars().count();
        let height = map_rows.len();

        let mut obstacles = Vec::new();
        let mut start: Option<(Coordinate, Heading)> = None;

        for (row_index, row) in map_rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(ScenarioError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found,
                });
            }
            // The first text row is the top of the grid.
            let y = (height - 1 - row_index) as i32;
            for (column, symbol) in row.chars().enumerate() {
                let position = Coordinate::new(column as i32, y);
                match symbol {
                    '.' => {}
                    '#' => obstacles.push(position),
                    marker => match heading_for_marker(marker) {
                        Some(heading) => {
                            if start.is_some() {
                                return Err(ScenarioError::DuplicateStart);
                            }
                            start = Some((position, heading));
                        }
                        None => {
                            return Err(ScenarioError::UnknownSymbol {
                                symbol: marker,
                                x: position.x,
                                y: position.y,
                            });
                        }
                    },
                }
            }
        }

        let (start, heading) = start.ok_or(ScenarioError::MissingStart)?;

        let mut commands = Vec::new();
        for line in lines {
            for letter in line.chars().filter(|c| !c.is_whitespace()) {
                let command =
                    Command::from_letter(letter).ok_or(ScenarioError::UnknownCommand(letter))?;
                commands.push(command);
            }
        }

        Ok(Scenario {
            width: width as i32,
            height: height as i32,
            obstacles,
            start,
            heading,
            commands,
        })
    }
}
