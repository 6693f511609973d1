use std::collections::BTreeMap;

const WORDS_EN_1K: &str = include_str!("../../assets/english1k.txt");

/// Whether `word` fits under `max_len` characters (0 = no limit).
pub fn fits_length(word: &str, max_len: usize) -> bool {
    max_len == 0 || word.chars().count() <= max_len
}

pub struct Dictionary {
    words: Vec<String>,
    by_letter: BTreeMap<char, Vec<usize>>,
}

impl Dictionary {
    pub fn load() -> Self {
        Self::from_words(WORDS_EN_1K.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase()))
            .collect();

        let mut by_letter: BTreeMap<char, Vec<usize>> = BTreeMap::new();
        for (i, word) in words.iter().enumerate() {
            let mut seen: Vec<char> = word.chars().collect();
            seen.sort_unstable();
            seen.dedup();
            for ch in seen {
                by_letter.entry(ch).or_default().push(i);
            }
        }

        Self { words, by_letter }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words no longer than `max_len` (0 = no limit).
    pub fn words_within(&self, max_len: usize) -> Vec<&str> {
        self.words
            .iter()
            .filter(|w| fits_length(w, max_len))
            .map(|s| s.as_str())
            .collect()
    }

    /// Words containing `letter`, no longer than `max_len` (0 = no limit).
    pub fn containing(&self, letter: char, max_len: usize) -> Vec<&str> {
        self.by_letter
            .get(&letter)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| self.words[i].as_str())
                    .filter(|w| fits_length(w, max_len))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_list_loads() {
        let dictionary = Dictionary::load();
        assert!(dictionary.len() > 500);
        assert!(!dictionary.containing('q', 0).is_empty());
    }

    #[test]
    fn letter_index_respects_length_cap() {
        let dictionary = Dictionary::from_words(["cat", "catalog", "dog"]);
        assert_eq!(dictionary.containing('c', 0), vec!["cat", "catalog"]);
        assert_eq!(dictionary.containing('c', 3), vec!["cat"]);
        assert_eq!(dictionary.words_within(3), vec!["cat", "dog"]);
    }

    #[test]
    fn length_cap_counts_characters() {
        assert!(fits_length("anything", 0));
        assert!(fits_length("caf\u{e9}", 4));
        assert!(!fits_length("cafes", 4));
    }

    #[test]
    fn repeated_letters_index_once() {
        let dictionary = Dictionary::from_words(["all"]);
        assert_eq!(dictionary.containing('l', 0).len(), 1);
    }
}
