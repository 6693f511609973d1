use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::engine::letter_stats::LetterStatsBook;

const LETTER_STATS_FILE: &str = "letter_stats.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("guten");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing or unreadable files yield the default value.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "discarding unreadable store file");
                T::default()
            }),
            Err(_) => T::default(),
        }
    }

    /// Write to a temp file and rename over the target.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_letter_stats(&self) -> LetterStatsBook {
        self.load(LETTER_STATS_FILE)
    }

    pub fn save_letter_stats(&self, book: &LetterStatsBook) -> Result<()> {
        self.save(LETTER_STATS_FILE, book)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::session::result::{CompletedWord, LetterRecord};

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_loads_fresh_book() {
        let (_dir, store) = make_test_store();
        let book = store.load_letter_stats();
        assert_eq!(book.letters.len(), 26);
        assert_eq!(book.words_completed, 0);
    }

    #[test]
    fn letter_stats_round_trip() {
        let (_dir, store) = make_test_store();
        let mut book = LetterStatsBook::default();
        book.record(&CompletedWord {
            word_index: 0,
            text: "go".to_string(),
            total_duration_ms: 300,
            letters: vec![
                LetterRecord {
                    ch: 'g',
                    duration_ms: 150,
                    ever_missed: true,
                },
                LetterRecord {
                    ch: 'o',
                    duration_ms: 150,
                    ever_missed: false,
                },
            ],
            completed_at: Utc::now(),
        });
        store.save_letter_stats(&book).unwrap();

        let loaded = store.load_letter_stats();
        assert_eq!(loaded.letters[&'g'], book.letters[&'g']);
        assert!(loaded.missed_words.contains("go"));
        assert_eq!(loaded.total_word_ms, 300);
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(LETTER_STATS_FILE), "{not json").unwrap();
        let book = store.load_letter_stats();
        assert_eq!(book.words_completed, 0);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let (dir, store) = make_test_store();
        store.save_letter_stats(&LetterStatsBook::default()).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }
}
