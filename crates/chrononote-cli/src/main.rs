use anyhow::Result;
use chrononote_config::Config;
use chrononote_engine::editing::{Cmd, DeltaKind};
use chrononote_engine::{SeekRequest, SeekSink, Session, Settings, export, io};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{env, io::stdout, path::PathBuf, process, time::Duration};

/// Width of the timestamp gutter: "[HH:MM:SS] "
const GUTTER_WIDTH: usize = 11;

#[derive(Default)]
struct PlayerSink {
    last: Option<SeekRequest>,
}

impl SeekSink for PlayerSink {
    fn seek(&mut self, request: SeekRequest) {
        log::info!("seek request emitted: {}s", request.time);
        self.last = Some(request);
    }
}

struct App {
    session: Session,
    notes_path: PathBuf,
    cursor_line: usize,
    cursor_col: usize,
    scroll: usize,
    status: String,
    player: PlayerSink,
    dirty: bool,
}

impl App {
    fn new(notes_path: PathBuf, settings: Settings) -> Result<Self> {
        let document = if notes_path.exists() {
            io::load_notes(&notes_path)?
        } else {
            chrononote_engine::Document::new()
        };
        let session = Session::with_document(document, settings);

        Ok(Self {
            session,
            notes_path,
            cursor_line: 0,
            cursor_col: 0,
            scroll: 0,
            status: "Ctrl+R record | Ctrl+T seek | Ctrl+S save | Ctrl+Q quit".to_string(),
            player: PlayerSink::default(),
            dirty: false,
        })
    }

    fn current_line_len(&self) -> usize {
        self.session
            .document()
            .line(self.cursor_line)
            .map_or(0, |line| line.chars().count())
    }

    fn clamp_cursor(&mut self) {
        let last_line = self.session.document().line_count() - 1;
        self.cursor_line = self.cursor_line.min(last_line);
        self.cursor_col = self.cursor_col.min(self.current_line_len());
    }

    fn edited_line(&self, insert_at: usize, ch: Option<char>) -> String {
        let line = self
            .session
            .document()
            .line(self.cursor_line)
            .unwrap_or("");
        let mut chars: Vec<char> = line.chars().collect();
        match ch {
            Some(ch) => chars.insert(insert_at, ch),
            None => {
                chars.remove(insert_at);
            }
        }
        chars.into_iter().collect()
    }

    fn insert_char(&mut self, ch: char) {
        let text = self.edited_line(self.cursor_col, Some(ch));
        let cmd = Cmd::SetLine {
            index: self.cursor_line,
            text,
        };
        if let Ok(patch) = self.session.apply(cmd) {
            self.cursor_col += 1;
            self.dirty = true;
            if patch.created_anchor.is_some() {
                self.status = format!("anchored line {}", self.cursor_line + 1);
            }
        }
    }

    fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let text = self.edited_line(self.cursor_col - 1, None);
            let cmd = Cmd::SetLine {
                index: self.cursor_line,
                text,
            };
            if let Ok(patch) = self.session.apply(cmd) {
                self.dirty = true;
                // Emptying the line deletes it while other lines remain
                let line_removed = patch
                    .deltas
                    .iter()
                    .any(|delta| delta.kind == DeltaKind::Remove);
                if line_removed {
                    self.cursor_col = 0;
                } else {
                    self.cursor_col -= 1;
                }
                self.clamp_cursor();
            }
        } else if self.cursor_line > 0 {
            // Backspace at line start merges into the previous line
            let previous_len = self
                .session
                .document()
                .line(self.cursor_line - 1)
                .map_or(0, |line| line.chars().count());
            let cmd = Cmd::MergeWithPrevious {
                index: self.cursor_line,
            };
            if self.session.apply(cmd).is_ok() {
                self.cursor_line -= 1;
                self.cursor_col = previous_len;
                self.dirty = true;
            }
        }
    }

    fn newline(&mut self) {
        let cmd = Cmd::SplitLine {
            index: self.cursor_line,
            at: self.cursor_col,
        };
        if let Ok(patch) = self.session.apply(cmd) {
            self.cursor_line += 1;
            self.cursor_col = 0;
            self.dirty = true;
            if patch.created_anchor.is_some() {
                self.status = format!("anchored line {}", self.cursor_line + 1);
            }
        }
    }

    fn toggle_recording(&mut self) {
        if self.session.is_recording() {
            self.session.stop_recording();
            self.status = "recording stopped".to_string();
        } else {
            self.session.start_recording();
            self.status = "recording started".to_string();
        }
    }

    fn seek_current_line(&mut self) {
        if self.session.seek_line(self.cursor_line, &mut self.player) {
            if let Some(request) = self.player.last {
                self.status = format!("→ seek {:.1}s", request.time);
            }
        } else {
            self.status = "no timestamp on this line".to_string();
        }
    }

    fn save(&mut self) {
        match io::save_notes(&self.notes_path, self.session.document()) {
            Ok(()) => {
                self.dirty = false;
                self.status = format!("saved {}", self.notes_path.display());
            }
            Err(e) => {
                self.status = format!("save failed: {e}");
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('r') => self.toggle_recording(),
                KeyCode::Char('t') => self.seek_current_line(),
                KeyCode::Char('s') => self.save(),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char(ch) => self.insert_char(ch),
            KeyCode::Enter => self.newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Up => {
                self.cursor_line = self.cursor_line.saturating_sub(1);
                self.clamp_cursor();
            }
            KeyCode::Down => {
                self.cursor_line += 1;
                self.clamp_cursor();
            }
            KeyCode::Left => self.cursor_col = self.cursor_col.saturating_sub(1),
            KeyCode::Right => {
                self.cursor_col += 1;
                self.clamp_cursor();
            }
            KeyCode::Home => self.cursor_col = 0,
            KeyCode::End => self.cursor_col = self.current_line_len(),
            _ => {}
        }
        false
    }
}

fn main() -> Result<()> {
    env_logger::init();

    // Determine notes file from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let notes_path = if args.len() == 2 {
        PathBuf::from(&args[1])
    } else if args.len() == 1 {
        match &config {
            Some(config) => config.notes_path.clone(),
            None => {
                eprintln!("Error: No notes file provided and no config file found");
                eprintln!("Usage: {} <notes-file>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [notes-file]", args[0]);
        process::exit(1);
    };

    let settings = match &config {
        Some(config) => Settings {
            latency_compensation: Duration::from_millis(config.latency_compensation_ms),
            seek_match_distance: config.seek_match_distance,
        },
        None => Settings::default(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(notes_path, settings)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && app.handle_key(key)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(f.area());

    let notes_area = chunks[0];
    let inner_height = notes_area.height.saturating_sub(2) as usize;

    // Keep the cursor visible
    if app.cursor_line < app.scroll {
        app.scroll = app.cursor_line;
    } else if inner_height > 0 && app.cursor_line >= app.scroll + inner_height {
        app.scroll = app.cursor_line + 1 - inner_height;
    }

    let timestamps = app.session.timestamps();
    let lines: Vec<Line> = app
        .session
        .document()
        .lines()
        .iter()
        .enumerate()
        .skip(app.scroll)
        .take(inner_height.max(1))
        .map(|(index, text)| {
            let gutter = match timestamps.get(index) {
                Some(time_ms) => format!("{} ", export::format_marker(time_ms)),
                None => " ".repeat(GUTTER_WIDTH),
            };
            Line::from(vec![
                Span::styled(gutter, Style::default().fg(Color::DarkGray)),
                Span::raw(text.clone()),
            ])
        })
        .collect();

    let title = if app.session.is_recording() {
        "Notes ● REC"
    } else {
        "Notes"
    };
    let notes = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(notes, notes_area);

    // Status panel
    let mut status_line = app.status.clone();
    if app.dirty {
        status_line.push_str(" [+]");
    }
    if let Some(request) = app.player.last {
        status_line.push_str(&format!(" | last seek {:.1}s", request.time));
    }
    let status =
        Paragraph::new(status_line).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[1]);

    // Place the terminal cursor inside the notes text
    let x = notes_area.x + 1 + (GUTTER_WIDTH + app.cursor_col) as u16;
    let y = notes_area.y + 1 + (app.cursor_line - app.scroll) as u16;
    f.set_cursor_position(Position::new(x, y));
}
