use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use guten::session::input::{Key, ModifierKey};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => {
                            if tx.send(AppEvent::Key(key)).is_err() {
                                return;
                            }
                        }
                        Ok(Event::Resize(w, h)) => {
                            if tx.send(AppEvent::Resize(w, h)).is_err() {
                                return;
                            }
                        }
                        _ => {}
                    }
                } else if tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// Translate a terminal key press into an engine key. Releases and keys the
/// engine has no use for map to `None`.
pub fn engine_key(key: &KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Esc => Some(Key::Modifier(ModifierKey::Escape)),
        KeyCode::Tab | KeyCode::BackTab => Some(Key::Modifier(ModifierKey::Tab)),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Modifier(code) => Some(Key::Modifier(modifier_key(code))),
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Key::Modifier(ModifierKey::Control))
        }
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Key::Modifier(ModifierKey::Alt))
        }
        KeyCode::Char(ch) => Some(Key::Char(ch)),
        _ => None,
    }
}

fn modifier_key(code: ModifierKeyCode) -> ModifierKey {
    match code {
        ModifierKeyCode::LeftShift
        | ModifierKeyCode::RightShift
        | ModifierKeyCode::IsoLevel3Shift
        | ModifierKeyCode::IsoLevel5Shift => ModifierKey::Shift,
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => ModifierKey::Control,
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => ModifierKey::Alt,
        _ => ModifierKey::Meta,
    }
}
