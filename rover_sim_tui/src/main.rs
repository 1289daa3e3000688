use anyhow::Result;
use clap::Parser;
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use rover_sim_core::{
    Coordinate, Heading,
    grid::Grid,
    rover::{MoveOutcome, Rover},
    scenario::Scenario,
    sequencer::{Command, CommandSequencer, Outcome, StepRecord},
};
use std::{
    collections::VecDeque,
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scenario file to load
    #[arg(short, long, value_name = "SCENARIO_FILE")]
    scenario: Option<PathBuf>,

    /// Replace the scenario's obstacles with this many randomly scattered ones
    #[arg(long, value_name = "COUNT")]
    random: Option<usize>,

    /// Seed for random obstacle scattering
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

struct App<'a> {
    /// The shared grid, read-only after construction.
    grid: &'a Grid,
    /// Drives the rover one command per tick.
    sequencer: CommandSequencer<'a>,
    /// Commands not yet replayed.
    pending: VecDeque<Command>,
    /// Outcome records of the commands replayed so far.
    trace: Vec<StepRecord>,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl<'a> App<'a> {
    fn new(grid: &'a Grid, rover: Rover<'a>, commands: Vec<Command>) -> Self {
        App {
            grid,
            sequencer: CommandSequencer::new(rover),
            pending: commands.into(),
            trace: Vec::new(),
            should_quit: false,
        }
    }

    /// Replays one pending command, if any remain.
    fn tick(&mut self) {
        if let Some(command) = self.pending.pop_front() {
            let record = self.sequencer.step(command);
            self.trace.push(record);
        }
    }

    fn finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    // If no scenario file is provided, use the bundled demo
    let scenario_file = args
        .scenario
        .unwrap_or(PathBuf::from("scenarios/demo.txt"));
    if !scenario_file.exists() {
        return Err(anyhow::anyhow!(
            "Scenario file does not exist: {}",
            scenario_file.display()
        ));
    }

    let scenario: Scenario = std::fs::read_to_string(&scenario_file)?.parse()?;

    // The grid outlives the rover and the app; both only borrow it.
    let grid = match args.random {
        Some(count) => Grid::with_scattered_obstacles(
            scenario.width,
            scenario.height,
            count,
            args.seed,
            scenario.start,
        )?,
        None => scenario.grid()?,
    };
    let rover = scenario.rover(&grid)?;

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // Create the application state
    let mut app = App::new(&grid, rover, scenario.commands.clone());

    // Run the main application loop
    run_app(&mut terminal, &mut app)?;

    // Restore the terminal state
    restore_terminal(&mut terminal)?;

    Ok(())
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?; // Put terminal in raw mode
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into) // Map io::Error to anyhow::Error
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250); // Replay rate
    let mut last_tick = Instant::now();

    loop {
        // Draw the UI
        terminal.draw(|f| ui(f, app))?;

        // Calculate timeout for event polling
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        // Poll for events (keyboard, mouse, etc.)
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    _ => {}
                }
            }
        }

        // Replay the next command if enough time has passed
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        // Exit loop if requested
        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60), // Area for the grid
            Constraint::Percentage(30), // Area for the outcome trace
            Constraint::Percentage(10), // Area for status/help
        ])
        .split(frame.area());

    render_grid(frame, main_layout[0], app);
    render_trace(frame, main_layout[1], app);

    let status = if app.finished() {
        format!(
            "{}. Press 'q' or 'Esc' to quit.",
            app.sequencer.rover().status_report()
        )
    } else {
        format!(
            "Replaying ({} commands left). Press 'q' or 'Esc' to quit.",
            app.pending.len()
        )
    };
    let help_text = Paragraph::new(status)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

fn heading_marker(heading: Heading) -> &'static str {
    match heading {
        Heading::North => "^",
        Heading::East => ">",
        Heading::South => "v",
        Heading::West => "<",
    }
}

/// Renders the grid with obstacles and the rover onto the frame.
fn render_grid(frame: &mut Frame, area: Rect, app: &App) {
    let (rover_position, rover_heading) = app.sequencer.rover().status();

    // Top text row is the highest y: North points up on screen.
    let mut lines: Vec<Line> = Vec::with_capacity(app.grid.height().max(0) as usize);
    for y in (0..app.grid.height()).rev() {
        let mut spans: Vec<Span> = Vec::with_capacity(app.grid.width().max(0) as usize);
        for x in 0..app.grid.width() {
            let cell = Coordinate::new(x, y);
            let span = if cell == rover_position {
                Span::styled(
                    heading_marker(rover_heading),
                    Style::default().fg(Color::Red).bold(),
                )
            } else if app.grid.obstacles().contains(&cell) {
                Span::styled("#", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled("·", Style::default().fg(Color::Gray))
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let grid_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Rover Grid").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(grid_paragraph, area);
}

/// Renders the per-command outcome trace onto the frame.
fn render_trace(frame: &mut Frame, area: Rect, app: &App) {
    let trace_items: Vec<ListItem> = app
        .trace
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let text = match record.outcome {
                Outcome::Move(MoveOutcome::Moved(to)) => {
                    format!("{:>3}. {}  moved to {}", index + 1, record.command.letter(), to)
                }
                Outcome::Move(MoveOutcome::Blocked(at)) => {
                    format!("{:>3}. {}  blocked at {}", index + 1, record.command.letter(), at)
                }
                Outcome::Acknowledged => {
                    format!("{:>3}. {}  acknowledged", index + 1, record.command.letter())
                }
            };
            let style = match record.outcome {
                Outcome::Move(MoveOutcome::Blocked(_)) => Style::default().fg(Color::Yellow),
                _ => Style::default(),
            };
            ListItem::new(Line::styled(text, style))
        })
        .collect();

    let trace_widget =
        List::new(trace_items).block(Block::default().borders(Borders::ALL).title("Trace"));
    frame.render_widget(trace_widget, area);
}
