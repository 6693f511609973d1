use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use guten::session::buffer::{RETYPE_CHAR, Word};
use guten::session::render::{LetterView, WordView};
use guten::session::state::SessionState;

use crate::ui::theme::{Theme, ThemeColors};

/// Greedy word wrap: each range holds the word indices of one line.
pub fn layout_lines(words: &[Word], width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (i, word) in words.iter().enumerate() {
        let len = word.len();
        if used > 0 && used + len > width {
            lines.push(start..i);
            start = i;
            used = 0;
        }
        used += len;
    }
    if start < words.len() {
        lines.push(start..words.len());
    }
    lines
}

fn line_of(lines: &[Range<usize>], word: usize) -> usize {
    lines
        .iter()
        .position(|line| line.contains(&word))
        .unwrap_or(0)
}

/// Which word the view is centered on. Center requests are honored when the
/// word opens a line or sits above the current anchor.
#[derive(Clone, Debug, Default)]
pub struct ScrollAnchor {
    word: usize,
    pending: Option<usize>,
}

impl ScrollAnchor {
    pub fn request(&mut self, word: usize) {
        self.pending = Some(word);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn word(&self) -> usize {
        self.word
    }

    /// Settle any pending request and return the first line to draw.
    pub fn first_visible_line(&mut self, lines: &[Range<usize>], rows: usize) -> usize {
        if let Some(requested) = self.pending.take() {
            let opens_line = lines.iter().any(|line| line.start == requested);
            let above = line_of(lines, requested) < line_of(lines, self.word);
            if opens_line || above {
                self.word = requested;
            }
        }
        line_of(lines, self.word).saturating_sub(rows / 2)
    }
}

pub struct TypingArea<'a> {
    state: &'a SessionState,
    theme: &'a Theme,
    lines: &'a [Range<usize>],
    first_line: usize,
}

impl<'a> TypingArea<'a> {
    pub fn new(
        state: &'a SessionState,
        theme: &'a Theme,
        lines: &'a [Range<usize>],
        first_line: usize,
    ) -> Self {
        Self {
            state,
            theme,
            lines,
            first_line,
        }
    }
}

fn letter_style(letter: &LetterView, word: &WordView, colors: &ThemeColors) -> Style {
    if letter.active {
        return Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg());
    }
    let style = if letter.incorrect {
        Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg())
            .add_modifier(Modifier::UNDERLINED)
    } else if letter.fix {
        Style::default()
            .fg(colors.text_fix())
            .add_modifier(Modifier::BOLD)
    } else if letter.backtrack {
        Style::default().fg(colors.text_backtrack())
    } else if letter.correct && letter.miss {
        Style::default()
            .fg(colors.text_correct())
            .add_modifier(Modifier::UNDERLINED)
    } else if letter.correct {
        Style::default().fg(colors.text_correct())
    } else if word.retype && letter.display == RETYPE_CHAR {
        Style::default()
            .fg(colors.retype())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.text_pending())
    };
    if letter.stop {
        style.bg(colors.stop())
    } else {
        style
    }
}

fn letter_glyph(letter: &LetterView, is_spacer: bool) -> char {
    match (is_spacer, letter.display) {
        (true, RETYPE_CHAR) => RETYPE_CHAR,
        (true, _) if letter.incorrect => '\u{00b7}', // ·
        (true, _) => ' ',
        (false, ch) => ch,
    }
}

fn word_spans<'s>(
    state: &SessionState,
    word_index: usize,
    word: &Word,
    colors: &ThemeColors,
) -> Vec<Span<'s>> {
    let cursor = state.cursor.position();
    let word_active = cursor.word == word_index;
    let word_view = WordView::of(word, word_active);
    word.letters
        .iter()
        .enumerate()
        .map(|(i, letter)| {
            let view = LetterView::of(word, letter, word_active && cursor.letter == i);
            Span::styled(
                letter_glyph(&view, letter.is_spacer()).to_string(),
                letter_style(&view, &word_view, colors),
            )
        })
        .collect()
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let words = self.state.buffer.words();

        let rendered: Vec<Line> = self
            .lines
            .iter()
            .skip(self.first_line)
            .map(|line| {
                let spans: Vec<Span> = line
                    .clone()
                    .filter_map(|i| words.get(i).map(|w| (i, w)))
                    .flat_map(|(i, word)| word_spans(self.state, i, word, colors))
                    .collect();
                Line::from(spans)
            })
            .collect();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(rendered).block(block).render(area, buf);
    }
}
