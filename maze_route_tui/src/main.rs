use anyhow::{Context, Result};
use clap::Parser;
use maze_route_core::{
    KeyId, Position,
    maze::{Cell, Maze},
    pathfind::KeySet,
    route::{Solution, solve},
};
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
use std::{
    collections::HashSet,
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze file to load
    #[arg(short, long, value_name = "MAZE_FILE")]
    maze: Option<PathBuf>,
}

struct App {
    /// The solved maze.
    maze: Maze,
    /// The winning route through it.
    solution: Solution,
    /// Index into the route of the cell the walker currently occupies.
    step: usize,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(maze: Maze, solution: Solution) -> Self {
        App {
            maze,
            solution,
            step: 0,
            should_quit: false,
        }
    }

    /// Advances the walker one cell along the route.
    fn tick(&mut self) {
        if self.step + 1 < self.solution.path().len() {
            self.step += 1;
        }
    }

    fn walker(&self) -> Position {
        self.solution.path()[self.step]
    }

    /// The cells the walker has already been on.
    fn visited(&self) -> HashSet<Position> {
        self.solution.path()[..=self.step].iter().copied().collect()
    }

    /// Keys collected so far, in the order their cells were stepped on.
    fn keys_held(&self) -> Vec<KeyId> {
        let mut seen = KeySet::new();
        self.solution.path()[..=self.step]
            .iter()
            .filter_map(|&pos| match self.maze.grid()[pos] {
                Cell::Key(id) => seen.insert(id).then_some(id),
                _ => None,
            })
            .collect()
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    // If no maze file is provided, use the default map
    let maze_file = args.maze.unwrap_or(PathBuf::from("maps/map01.txt"));
    let text = std::fs::read_to_string(&maze_file)
        .with_context(|| format!("Failed to read maze file: {}", maze_file.display()))?;

    // Parse and solve before touching the terminal, so failures print
    // normally instead of into the alternate screen.
    let maze = Maze::parse(&text)
        .with_context(|| format!("Invalid maze in {}", maze_file.display()))?;
    let solution = solve(&maze).context("Maze cannot be solved")?;

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // Create the application state
    let mut app = App::new(maze, solution);

    // Run the main application loop
    let result = run_app(&mut terminal, &mut app);

    // Restore the terminal state
    restore_terminal(&mut terminal)?;

    result
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?; // Put terminal in raw mode
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?; // Use alternate screen and enable mouse capture
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
    let tick_rate = Duration::from_millis(150); // Walker advance rate
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

        // Update application state if enough time has passed
        if last_tick.elapsed() >= tick_rate {
            app.tick(); // Walk one cell
            last_tick = Instant::now();
        }

        // Exit loop if requested
        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Picks a stable color for a key id; doors and keys sharing an id share a
/// color.
fn key_color(id: KeyId) -> Color {
    const COLORS: [Color; 6] = [
        Color::Red,
        Color::Blue,
        Color::Yellow,
        Color::Green,
        Color::Magenta,
        Color::Cyan,
    ];
    COLORS[(id.0 as u8).wrapping_sub(b'a') as usize % COLORS.len()]
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(70), // Area for the maze
            Constraint::Percentage(20), // Area for route progress
            Constraint::Percentage(10), // Area for status/help
        ])
        .split(frame.area());

    // Render the maze with the walker on it
    render_maze(frame, main_layout[0], app);

    // Render the route progress
    render_progress(frame, main_layout[1], app);

    // Render status/help text
    let help_text = Paragraph::new("Press 'q' or 'Esc' to quit.")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

/// Renders the walker's progress along the route onto the frame.
fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let keys: Vec<Span> = app
        .keys_held()
        .into_iter()
        .map(|id| Span::styled("k", Style::default().fg(key_color(id))))
        .collect();

    let mut status_line = vec![Span::raw(format!(
        "Step: {}/{}  Keys collected: ",
        app.step,
        app.solution.steps()
    ))];
    status_line.extend(keys);

    // Show the walked prefix of the move string brighter than the rest.
    let moves = app.solution.move_string();
    let (walked, remaining) = moves.split_at(app.step);
    let moves_line = Line::from(vec![
        Span::raw("Moves: "),
        Span::styled(walked.to_string(), Style::default().bold()),
        Span::styled(remaining.to_string(), Style::default().fg(Color::DarkGray)),
    ]);

    let progress_widget = Paragraph::new(vec![Line::from(status_line), moves_line])
        .block(Block::default().borders(Borders::ALL).title("Route"));
    frame.render_widget(progress_widget, area);
}

/// Renders the maze grid onto the frame.
fn render_maze(frame: &mut Frame, area: Rect, app: &App) {
    let grid = app.maze.grid();
    let walker = app.walker();
    let visited = app.visited();
    let keys_held: KeySet = app.keys_held().into_iter().collect();

    let mut lines: Vec<Line> = Vec::with_capacity(grid.height());

    for y in 0..grid.height() {
        let mut spans: Vec<Span> = Vec::with_capacity(grid.width());
        for x in 0..grid.width() {
            let pos = Position::new(x, y);

            // The walker covers whatever cell it stands on
            if pos == walker {
                spans.push(Span::styled("@", Style::default().fg(Color::Red).bold()));
                continue;
            }

            let span = match grid[pos] {
                Cell::Wall => Span::styled("#", Style::default().fg(Color::DarkGray)),
                Cell::Floor | Cell::Start => {
                    if visited.contains(&pos) {
                        // Breadcrumb trail behind the walker
                        Span::styled("*", Style::default().fg(Color::White))
                    } else {
                        Span::raw(" ")
                    }
                }
                Cell::Exit => Span::styled(">", Style::default().fg(Color::Green).bold()),
                Cell::Door(id) => {
                    // A door swings open the moment its key is collected
                    let glyph = if keys_held.contains(&id) { "+" } else { "|" };
                    Span::styled(glyph, Style::default().fg(key_color(id)))
                }
                Cell::Key(id) => {
                    if visited.contains(&pos) {
                        Span::styled("*", Style::default().fg(Color::White))
                    } else {
                        Span::styled("k", Style::default().fg(key_color(id)))
                    }
                }
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let maze_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Maze Route").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(maze_paragraph, area);
}
