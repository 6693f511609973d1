use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{info, warn};

use guten::config::Config;
use guten::engine::{SharedStats, shared_stats};
use guten::error::{EngineError, FetchError};
use guten::generator::WordSource;
use guten::generator::dictionary::Dictionary;
use guten::generator::local::LocalWordSource;
use guten::session::TypingSession;
use guten::session::render::{RenderEvent, RenderSink};
use guten::session::report::{LocalStatsReporter, ProgressReporter};
use guten::session::state::EngineOptions;
use guten::store::json_store::JsonStore;

use crate::event::engine_key;
use crate::ui::theme::Theme;
use crate::ui::typing_area::ScrollAnchor;

const FREQUENCY_STEP: u32 = 10;
const MAX_FREQUENCY: u32 = 100;
const WORD_LENGTH_STEPS: [usize; 6] = [0, 4, 6, 8, 10, 12];

/// Keeps the bits of render state the terminal view cannot recompute from
/// the session itself.
#[derive(Debug, Default)]
pub struct AppSink {
    pub anchor: ScrollAnchor,
    pub wpm: f64,
}

impl RenderSink for AppSink {
    fn apply(&mut self, event: RenderEvent) {
        match event {
            RenderEvent::Reset => self.anchor.reset(),
            RenderEvent::CenterOn { word_index } => self.anchor.request(word_index),
            RenderEvent::StatsUpdated(snapshot) => self.wpm = snapshot.wpm,
            _ => {}
        }
    }
}

pub type Session = TypingSession<Box<dyn WordSource>, Box<dyn ProgressReporter>, AppSink>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceMode {
    Local,
    Remote,
}

impl SourceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceMode::Local => "Offline",
            SourceMode::Remote => "Online",
        }
    }
}

pub struct App {
    pub config: Config,
    pub session: Session,
    pub theme: Theme,
    pub mode: SourceMode,
    pub should_quit: bool,
    pub last_error: Option<String>,
    stats: Option<SharedStats>,
    store: Option<JsonStore>,
    config_path: Option<PathBuf>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(error = %e, "letter stats will not be saved");
                None
            }
        };
        Self::with_parts(config, store, Some(Config::config_path()))
    }

    pub fn with_parts(config: Config, store: Option<JsonStore>, config_path: Option<PathBuf>) -> Self {
        let theme = Theme::load_or_default(&config.theme);
        let (source, reporter, mode, stats) = build_backends(&config, store.as_ref());
        let sink = AppSink {
            wpm: stats.as_ref().map_or(0.0, |s| s.borrow().wpm()),
            ..AppSink::default()
        };
        info!(mode = mode.as_str(), user = %config.user_id, "starting session");
        let session = TypingSession::new(
            source,
            reporter,
            sink,
            config.session_context(),
            config.buffer_policy(),
        );
        Self {
            config,
            session,
            theme,
            mode,
            should_quit: false,
            last_error: None,
            stats,
            store,
            config_path,
        }
    }

    pub fn wpm(&self) -> f64 {
        self.session.sink().wpm
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        match key.code {
            KeyCode::F(1) => self.update_options(|o| o.force_retype = !o.force_retype),
            KeyCode::F(2) => self.update_options(|o| o.stop_on_word = !o.stop_on_word),
            KeyCode::F(3) => self.update_options(|o| {
                o.capitalize_frequency = next_frequency(o.capitalize_frequency);
            }),
            KeyCode::F(4) => self.update_options(|o| {
                o.surround_frequency = next_frequency(o.surround_frequency);
            }),
            KeyCode::F(5) => self.update_options(|o| {
                o.punctuation_frequency = next_frequency(o.punctuation_frequency);
            }),
            KeyCode::F(6) => self.update_options(|o| {
                o.max_word_length = next_word_length(o.max_word_length);
            }),
            _ => {
                if let Some(engine_key) = engine_key(&key) {
                    let diagnostics = self.session.handle_key(engine_key);
                    self.note_diagnostics(diagnostics);
                }
            }
        }
    }

    /// Idle tick: pick up word batches that finished in the background.
    pub fn on_tick(&mut self) {
        let diagnostics = self.session.poll_source();
        self.note_diagnostics(diagnostics);
    }

    fn update_options(&mut self, change: impl FnOnce(&mut EngineOptions)) {
        let mut options = self.config.options.clone();
        change(&mut options);
        if options == self.config.options {
            return;
        }
        info!(?options, "options changed");
        self.config.options = options.clone();
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "failed to save config");
            }
        }
        self.last_error = None;
        self.session.set_options(options);
    }

    fn note_diagnostics(&mut self, diagnostics: Vec<EngineError>) {
        if let Some(last) = diagnostics.last() {
            self.last_error = Some(last.to_string());
        }
    }

    pub fn quit(&mut self) {
        self.persist_stats();
        self.should_quit = true;
    }

    fn persist_stats(&self) {
        let (Some(store), Some(stats)) = (&self.store, &self.stats) else {
            return;
        };
        let Ok(book) = stats.try_borrow() else {
            warn!("letter stats busy, skipping save");
            return;
        };
        match store.save_letter_stats(&book) {
            Ok(()) => info!(words = book.words_completed, "letter stats saved"),
            Err(e) => warn!(error = %e, "failed to save letter stats"),
        }
    }
}

fn next_frequency(current: u32) -> u32 {
    let next = current - current % FREQUENCY_STEP + FREQUENCY_STEP;
    if next > MAX_FREQUENCY { 0 } else { next }
}

fn next_word_length(current: usize) -> usize {
    WORD_LENGTH_STEPS
        .iter()
        .copied()
        .find(|&steps| steps > current)
        .unwrap_or(0)
}

type Backends = (
    Box<dyn WordSource>,
    Box<dyn ProgressReporter>,
    SourceMode,
    Option<SharedStats>,
);

fn build_backends(config: &Config, store: Option<&JsonStore>) -> Backends {
    if let Some(url) = &config.backend_url {
        match remote_backends(url, &config.user_id) {
            Ok((source, reporter)) => return (source, reporter, SourceMode::Remote, None),
            Err(e) => warn!(url = %url, error = %e, "word service unavailable, practicing offline"),
        }
    }
    let book = store.map(JsonStore::load_letter_stats).unwrap_or_default();
    let stats = shared_stats(book);
    let source = LocalWordSource::new(Dictionary::load(), stats.clone());
    let reporter = LocalStatsReporter::new(stats.clone());
    (
        Box::new(source),
        Box::new(reporter),
        SourceMode::Local,
        Some(stats),
    )
}

#[cfg(feature = "network")]
fn remote_backends(
    url: &str,
    user_id: &str,
) -> Result<(Box<dyn WordSource>, Box<dyn ProgressReporter>), FetchError> {
    use guten::generator::background::BackgroundSource;
    use guten::generator::remote::HttpBackend;
    use guten::session::report::BackgroundReporter;

    let source = BackgroundSource::spawn(HttpBackend::new(url, user_id)?);
    let reporter = BackgroundReporter::spawn(HttpBackend::new(url, user_id)?);
    Ok((Box::new(source), Box::new(reporter)))
}

#[cfg(not(feature = "network"))]
fn remote_backends(
    _url: &str,
    _user_id: &str,
) -> Result<(Box<dyn WordSource>, Box<dyn ProgressReporter>), FetchError> {
    Err(FetchError::Unavailable(
        "built without network support".to_string(),
    ))
}
