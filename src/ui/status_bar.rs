use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use guten::session::state::EngineOptions;

use crate::ui::theme::Theme;

/// Header line: speed, active options, and the last problem if any.
pub struct StatusBar<'a> {
    wpm: f64,
    options: &'a EngineOptions,
    mode: &'a str,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(wpm: f64, options: &'a EngineOptions, mode: &'a str, theme: &'a Theme) -> Self {
        Self {
            wpm,
            options,
            mode,
            error: None,
            theme,
        }
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

fn flag(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

fn length_label(max_word_length: usize) -> String {
    if max_word_length == 0 {
        "any".to_string()
    } else {
        max_word_length.to_string()
    }
}

pub fn options_summary(options: &EngineOptions) -> String {
    format!(
        "F1 retype:{} | F2 stop:{} | F3 caps:{}% | F4 surround:{}% | F5 punct:{}% | F6 len:{}",
        flag(options.force_retype),
        flag(options.stop_on_word),
        options.capitalize_frequency,
        options.surround_frequency,
        options.punctuation_frequency,
        length_label(options.max_word_length),
    )
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let header = Style::default().fg(colors.header_fg()).bg(colors.header_bg());

        let mut spans = vec![
            Span::styled(
                format!(" {} | WPM: {:.0} ", self.mode, self.wpm),
                header.add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("| {} ", options_summary(self.options)), header),
        ];
        if let Some(error) = self.error {
            spans.push(Span::styled(
                format!("| {error} "),
                Style::default().fg(colors.error()).bg(colors.header_bg()),
            ));
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(colors.header_bg()))
            .render(area, buf);
    }
}
