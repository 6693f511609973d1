mod app;
mod event;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use guten::config::Config;
use guten::logging;

use app::App;
use event::{AppEvent, EventHandler};
use ui::status_bar::StatusBar;
use ui::typing_area::{TypingArea, layout_lines};

#[derive(Parser)]
#[command(
    name = "guten",
    version,
    about = "Terminal typing practice with an endless, adaptive word stream"
)]
struct Cli {
    #[arg(short, long, help = "Word service base URL")]
    backend: Option<String>,

    #[arg(long, help = "Ignore any configured word service")]
    offline: bool,

    #[arg(short, long, help = "User id sent to the word service")]
    user: Option<String>,

    #[arg(long, help = "Retype a word from the start after any mistake")]
    force_retype: bool,

    #[arg(long, help = "Block the next word until every mistake is fixed")]
    stop_on_word: bool,

    #[arg(long, help = "Longest word to practice (0 for no limit)")]
    max_word_length: Option<usize>,

    #[arg(long, help = "Words loaded when a session starts")]
    initial_words: Option<usize>,

    #[arg(long, help = "Words fetched per refill")]
    words_per_update: Option<usize>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(backend) = self.backend {
            config.backend_url = Some(backend);
        }
        if self.offline {
            config.backend_url = None;
        }
        if let Some(user) = self.user {
            config.user_id = user;
        }
        if self.force_retype {
            config.options.force_retype = true;
        }
        if self.stop_on_word {
            config.options.stop_on_word = true;
        }
        if let Some(len) = self.max_word_length {
            config.options.max_word_length = len;
        }
        if let Some(n) = self.initial_words {
            config.initial_word_count = n;
        }
        if let Some(n) = self.words_per_update {
            config.words_per_update = n;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        config.validate();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config: {e}");
        Config::default()
    });
    cli.apply(&mut config);

    if let Err(e) = logging::init_file_logging(Path::new(&config.log_file)) {
        eprintln!("Logging disabled: {e}");
    }

    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "terminal loop failed");
        app.quit();
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let status = StatusBar::new(
        app.wpm(),
        app.session.options(),
        app.mode.as_str(),
        &app.theme,
    )
    .error(app.last_error.as_deref());
    frame.render_widget(status, chunks[0]);

    // Inside the border.
    let width = chunks[1].width.saturating_sub(2) as usize;
    let rows = chunks[1].height.saturating_sub(2) as usize;
    let lines = layout_lines(app.session.state().buffer.words(), width);
    let first_line = app.session.sink_mut().anchor.first_visible_line(&lines, rows);
    let typing = TypingArea::new(app.session.state(), &app.theme, &lines, first_line);
    frame.render_widget(typing, chunks[1]);

    let colors = &app.theme.colors;
    let footer = Paragraph::new(Line::from(Span::styled(
        " [Esc] Restart  [Ctrl+C] Quit  [F1-F6] Options",
        Style::default().fg(colors.accent()),
    )))
    .style(Style::default().bg(colors.bg()));
    frame.render_widget(footer, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "guten",
            "--backend",
            "http://localhost:5007",
            "--user",
            "ada",
            "--stop-on-word",
            "--words-per-update",
            "0",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.backend_url.as_deref(), Some("http://localhost:5007"));
        assert_eq!(config.user_id, "ada");
        assert!(config.options.stop_on_word);
        assert!(!config.options.force_retype);
        assert_eq!(config.words_per_update, 1, "validated after overrides");
    }

    #[test]
    fn offline_wins_over_backend() {
        let cli = Cli::parse_from(["guten", "--backend", "http://x", "--offline"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert!(config.backend_url.is_none());
    }
}
