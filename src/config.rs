use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::SessionContext;
use crate::session::state::{BufferPolicy, EngineOptions, INITIAL_WORD_COUNT, WORDS_PER_UPDATE};

const MAX_FREQUENCY: u32 = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub backend_url: Option<String>,
    #[serde(default = "default_initial_word_count")]
    pub initial_word_count: usize,
    #[serde(default = "default_words_per_update")]
    pub words_per_update: usize,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub options: EngineOptions,
}

fn default_user_id() -> String {
    "default".to_string()
}
fn default_initial_word_count() -> usize {
    INITIAL_WORD_COUNT
}
fn default_words_per_update() -> usize {
    WORDS_PER_UPDATE
}
fn default_theme() -> String {
    "default".to_string()
}
fn default_log_file() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("guten")
        .join("guten.log")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            backend_url: None,
            initial_word_count: default_initial_word_count(),
            words_per_update: default_words_per_update(),
            log_file: default_log_file(),
            theme: default_theme(),
            options: EngineOptions::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("guten")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn validate(&mut self) {
        self.initial_word_count = self.initial_word_count.max(1);
        self.words_per_update = self.words_per_update.max(1);
        let options = &mut self.options;
        options.capitalize_frequency = options.capitalize_frequency.min(MAX_FREQUENCY);
        options.surround_frequency = options.surround_frequency.min(MAX_FREQUENCY);
        options.punctuation_frequency = options.punctuation_frequency.min(MAX_FREQUENCY);
        if self.user_id.trim().is_empty() {
            self.user_id = default_user_id();
        }
    }

    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            user_id: self.user_id.clone(),
            options: self.options.clone(),
        }
    }

    pub fn buffer_policy(&self) -> BufferPolicy {
        BufferPolicy {
            initial_words: self.initial_word_count,
            words_per_update: self.words_per_update,
        }
    }
}
