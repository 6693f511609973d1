use crate::session::input::Key;
use crate::session::state::{BufferPolicy, SessionState};

/// Whether the session should request another batch of words now.
///
/// `key` is `None` for the check that follows a session reset.
pub fn should_replenish(state: &SessionState, policy: &BufferPolicy, key: Option<Key>) -> bool {
    if key == Some(Key::Backspace) {
        return false;
    }
    let cursor = &state.cursor;
    if !cursor.at_leading_edge() || cursor.letter_index != 0 {
        return false;
    }
    if cursor.word_index % policy.words_per_update.max(1) != 0 {
        return false;
    }
    state
        .last_replenished
        .is_none_or(|done| cursor.word_index > done)
}

pub fn mark_replenished(state: &mut SessionState) {
    state.last_replenished = Some(state.cursor.word_index);
}
