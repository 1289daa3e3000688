use serde::{Deserialize, Serialize};

use crate::rover::{MoveOutcome, Rover};

/// A discrete rover instruction.
///
/// Commands are plain tags with no back-reference to a rover; the
/// sequencer owns the rover and dispatches on the tag, so no per-command
/// allocation or command-to-rover ownership cycle exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Move,
    TurnLeft,
    TurnRight,
}

impl Command {
    /// Parses the single-letter form used in scenario files (case-insensitive).
    pub fn from_letter(letter: char) -> Option<Command> {
        match letter.to_ascii_uppercase() {
            'M' => Some(Command::Move),
            'L' => Some(Command::TurnLeft),
            'R' => Some(Command::TurnRight),
            _ => None,
        }
    }

    /// The single-letter form used in scenario files and trace rendering.
    pub fn letter(self) -> char {
        match self {
            Command::Move => 'M',
            Command::TurnLeft => 'L',
            Command::TurnRight => 'R',
        }
    }
}

/// The per-command result recorded in a replay trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Outcome of a `Move` command, successful or blocked.
    Move(MoveOutcome),
    /// Turn commands cannot fail and are simply acknowledged.
    Acknowledged,
}

/// One entry of a replay trace: the command that ran and what it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub command: Command,
    pub outcome: Outcome,
}

/// Replays an ordered command list against a single rover.
///
/// Execution is strictly sequential in caller-supplied order. A blocked
/// move is recorded and replay continues; nothing is retried, reordered,
/// or aborted.
pub struct CommandSequencer<'a> {
    rover: Rover<'a>,
}

impl<'a> CommandSequencer<'a> {
    pub fn new(rover: Rover<'a>) -> Self {
        CommandSequencer { rover }
    }

    /// Executes one command and returns its trace record.
    pub fn step(&mut self, command: Command) -> StepRecord {
        let outcome = match command {
            Command::Move => Outcome::Move(self.rover.move_forward()),
            Command::TurnLeft => {
                self.rover.turn_left();
                Outcome::Acknowledged
            }
            Command::TurnRight => {
                self.rover.turn_right();
                Outcome::Acknowledged
            }
        };
        StepRecord { command, outcome }
    }

    /// Executes every command in order and returns one record per command,
    /// in the same order.
    pub fn run(&mut self, commands: &[Command]) -> Vec<StepRecord> {
        commands.iter().map(|&command| self.step(command)).collect()
    }

    /// The rover being driven, for status reads after (or during) replay.
    pub fn rover(&self) -> &Rover<'a> {
        &self.rover
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, Heading, grid::Grid};

    fn ten_by_ten() -> Grid {
        Grid::new(
            10,
            10,
            [Coordinate::new(2, 2), Coordinate::new(3, 5)],
        )
        .unwrap()
    }

    #[test]
    fn reference_mission_ends_at_1_3_facing_north() {
        let grid = ten_by_ten();
        let rover = Rover::new(&grid, Coordinate::new(0, 0), Heading::North).unwrap();
        let mut sequencer = CommandSequencer::new(rover);

        let trace = sequencer.run(&[
            Command::Move,
            Command::Move,
            Command::TurnRight,
            Command::Move,
            Command::TurnLeft,
            Command::Move,
        ]);

        assert_eq!(
            trace,
            vec![
                StepRecord {
                    command: Command::Move,
                    outcome: Outcome::Move(MoveOutcome::Moved(Coordinate::new(0, 1))),
                },
                StepRecord {
                    command: Command::Move,
                    outcome: Outcome::Move(MoveOutcome::Moved(Coordinate::new(0, 2))),
                },
                StepRecord {
                    command: Command::TurnRight,
                    outcome: Outcome::Acknowledged,
                },
                StepRecord {
                    command: Command::Move,
                    outcome: Outcome::Move(MoveOutcome::Moved(Coordinate::new(1, 2))),
                },
                StepRecord {
                    command: Command::TurnLeft,
                    outcome: Outcome::Acknowledged,
                },
                StepRecord {
                    command: Command::Move,
                    outcome: Outcome::Move(MoveOutcome::Moved(Coordinate::new(1, 3))),
                },
            ]
        );
        assert_eq!(
            sequencer.rover().status(),
            (Coordinate::new(1, 3), Heading::North)
        );
    }

    #[test]
    fn blocked_move_is_recorded_and_replay_continues() {
        let grid = ten_by_ten();
        let rover = Rover::new(&grid, Coordinate::new(2, 1), Heading::North).unwrap();
        let mut sequencer = CommandSequencer::new(rover);

        let trace = sequencer.run(&[Command::Move, Command::TurnRight, Command::Move]);

        assert_eq!(
            trace[0].outcome,
            Outcome::Move(MoveOutcome::Blocked(Coordinate::new(2, 2)))
        );
        // Replay did not stop: the turn and the eastward move still ran.
        assert_eq!(trace[1].outcome, Outcome::Acknowledged);
        assert_eq!(
            trace[2].outcome,
            Outcome::Move(MoveOutcome::Moved(Coordinate::new(3, 1)))
        );
        assert_eq!(
            sequencer.rover().status(),
            (Coordinate::new(3, 1), Heading::East)
        );
    }

    #[test]
    fn trace_has_one_record_per_command_in_input_order() {
        let grid = ten_by_ten();
        let rover = Rover::new(&grid, Coordinate::new(5, 5), Heading::North).unwrap();
        let mut sequencer = CommandSequencer::new(rover);

        let commands = vec![
            Command::TurnLeft,
            Command::Move,
            Command::TurnRight,
            Command::TurnRight,
            Command::Move,
            Command::Move,
            Command::TurnLeft,
        ];
        let trace = sequencer.run(&commands);

        assert_eq!(trace.len(), commands.len());
        let replayed: Vec<Command> = trace.iter().map(|record| record.command).collect();
        assert_eq!(replayed, commands);
    }

    #[test]
    fn empty_command_list_yields_empty_trace() {
        let grid = ten_by_ten();
        let rover = Rover::new(&grid, Coordinate::new(0, 0), Heading::East).unwrap();
        let mut sequencer = CommandSequencer::new(rover);
        assert!(sequencer.run(&[]).is_empty());
        assert_eq!(
            sequencer.rover().status(),
            (Coordinate::new(0, 0), Heading::East)
        );
    }

    #[test]
    fn command_letters_round_trip() {
        for command in [Command::Move, Command::TurnLeft, Command::TurnRight] {
            assert_eq!(Command::from_letter(command.letter()), Some(command));
        }
        assert_eq!(Command::from_letter('m'), Some(Command::Move));
        assert_eq!(Command::from_letter('x'), None);
    }
}
