use std::time::Instant;

use tracing::{debug, info, warn};

use crate::session::buffer::TypedState;
use crate::session::cursor::Position;
use crate::session::render::{LetterView, RenderEvent, WordView};
use crate::session::result::CompletedWord;
use crate::session::state::{EngineOptions, SessionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierKey {
    Control,
    Alt,
    Shift,
    Meta,
    Tab,
    Escape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Modifier(ModifierKey),
    Backspace,
    Char(char),
}

/// What a single key did to the session, for the caller to act on.
#[derive(Clone, Debug, Default)]
pub struct KeyOutcome {
    pub completed: Option<CompletedWord>,
    pub reset_requested: bool,
    /// The word was rewound for a forced retype.
    pub retyped: bool,
    /// Completion was held back by stop-on-word.
    pub blocked: bool,
    /// Word index whose successor did not exist yet.
    pub underrun: Option<usize>,
    pub render: Vec<RenderEvent>,
}

pub fn process_key(
    state: &mut SessionState,
    options: &EngineOptions,
    key: Key,
    now: Instant,
) -> KeyOutcome {
    let mut outcome = KeyOutcome::default();
    match key {
        Key::Modifier(modifier) => {
            debug!(?modifier, "modifier key pressed");
            if modifier == ModifierKey::Escape {
                outcome.reset_requested = true;
            }
        }
        Key::Backspace => process_backspace(state, now, &mut outcome),
        Key::Char(ch) => process_char(state, options, ch, now, &mut outcome),
    }

    debug!(
        ?key,
        word = state.cursor.word_index,
        letter = state.cursor.letter_index,
        live = state.cursor.live,
        max = state.cursor.max_cursor,
        "key handled"
    );
    outcome
}

pub fn process_backspace(state: &mut SessionState, now: Instant, outcome: &mut KeyOutcome) {
    let from = state.cursor.position();
    if let Some(letter) = state.buffer.letter_mut(from.word, from.letter) {
        letter.clear_typed();
    }

    let moved = state.cursor.retreat(&state.buffer);
    state.letter_started_at = Some(now);
    if !moved {
        push_letter(state, from, &mut outcome.render);
        return;
    }

    // The watermark stays put; only the live counter steps back.
    state.cursor.live = state.cursor.live.saturating_sub(1);
    let to = state.cursor.position();
    if let Some(letter) = state.buffer.letter_mut(to.word, to.letter) {
        letter.state = TypedState::Backtracked;
    }

    push_letter(state, from, &mut outcome.render);
    push_letter(state, to, &mut outcome.render);
    outcome.render.push(RenderEvent::ActiveMoved { from, to });
    if to.word < from.word {
        outcome.render.push(RenderEvent::CenterOn { word_index: to.word });
    }
}

pub fn process_char(
    state: &mut SessionState,
    options: &EngineOptions,
    ch: char,
    now: Instant,
    outcome: &mut KeyOutcome,
) {
    let pos = state.cursor.position();
    let leading_word = pos.word == state.cursor.max_word;
    let Some(word) = state.buffer.word_mut(pos.word) else {
        warn!(word = pos.word, "key ignored: session buffer is empty");
        return;
    };

    word.clear_fix_marks();
    let letter = &mut word.letters[pos.letter];
    letter.clear_typed();
    let expected = letter.expected;
    let correct = letter.accepts(ch);
    if correct {
        letter.state = TypedState::Correct;
    } else {
        letter.state = TypedState::Incorrect;
        letter.miss = true;
        word.miss = true;
        if options.force_retype && leading_word && !word.retype_armed {
            word.retype_armed = true;
            debug!(word = pos.word, "armed for retype");
        }
    }

    if !correct {
        debug!(word = pos.word, letter = pos.letter, %expected, actual = %ch, "mistyped");
    }

    on_letter_completed(state, options, now, outcome);
}

fn on_letter_completed(
    state: &mut SessionState,
    options: &EngineOptions,
    now: Instant,
    outcome: &mut KeyOutcome,
) {
    let pos = state.cursor.position();
    let anchor = state.letter_started_at.unwrap_or(now);
    state.letter_started_at = Some(now);
    if pos.letter == 0 {
        state.word_started_at = Some(now);
    }
    let word_started = state.word_started_at.unwrap_or(now);
    let at_edge = state.cursor.at_leading_edge();
    let is_last = state.cursor.is_last_letter(&state.buffer);

    let Some(word) = state.buffer.word_mut(pos.word) else {
        return;
    };
    word.letters[pos.letter].duration_ms = elapsed_ms(anchor, now);
    word.incorrect_word = options.stop_on_word && word.has_incorrect_letter();

    if is_last && at_edge {
        if word.incorrect_word {
            let marked = word.mark_incorrect_for_fix();
            debug!(word = pos.word, marked, "stop on word: letters need fixing");
            outcome.blocked = true;
            push_word(state, pos.word, &mut outcome.render);
            return;
        }

        if word.retype_armed {
            let len = word.len();
            word.reset_for_retype();
            state.cursor.letter_index = 0;
            state.cursor.live = state.cursor.live.saturating_sub(len - 1);
            info!(word = pos.word, "word rewound for retype");
            outcome.retyped = true;
            push_word(state, pos.word, &mut outcome.render);
            outcome.render.push(RenderEvent::ActiveMoved {
                from: pos,
                to: state.cursor.position(),
            });
            return;
        }

        if !word.completed {
            word.completed = true;
            outcome.completed = Some(CompletedWord::from_word(
                pos.word,
                word,
                elapsed_ms(word_started, now),
            ));
        }
    }

    if !state.cursor.advance(&state.buffer) {
        warn!(word = pos.word, "cannot advance: no next word loaded");
        outcome.underrun = Some(pos.word);
        push_word(state, pos.word, &mut outcome.render);
        return;
    }

    let to = state.cursor.position();
    push_word(state, pos.word, &mut outcome.render);
    outcome.render.push(RenderEvent::ActiveMoved { from: pos, to });
    if to.letter == 0 {
        outcome.render.push(RenderEvent::CenterOn { word_index: to.word });
    }
    let visited = state.cursor.live;
    state.cursor.record_visit(visited);
    state.cursor.live += 1;
}

fn elapsed_ms(from: Instant, to: Instant) -> u64 {
    to.saturating_duration_since(from).as_millis() as u64
}

fn push_letter(state: &SessionState, at: Position, render: &mut Vec<RenderEvent>) {
    let Some(word) = state.buffer.word(at.word) else {
        return;
    };
    let Some(letter) = word.letters.get(at.letter) else {
        return;
    };
    let active = state.cursor.position() == at;
    render.push(RenderEvent::LetterChanged {
        at,
        view: LetterView::of(word, letter, active),
    });
}

/// Emit the word view followed by every letter view of that word.
fn push_word(state: &SessionState, word_index: usize, render: &mut Vec<RenderEvent>) {
    let Some(word) = state.buffer.word(word_index) else {
        return;
    };
    render.push(RenderEvent::WordChanged {
        word_index,
        view: WordView::of(word, state.cursor.word_index == word_index),
    });
    for letter in 0..word.len() {
        push_letter(
            state,
            Position {
                word: word_index,
                letter,
            },
            render,
        );
    }
}
