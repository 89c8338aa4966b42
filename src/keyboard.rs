//! On-screen keyboard model: the QWERTY layout and which caps are lit.
//!
//! Terminals report key presses but not releases, so a pressed cap stays
//! lit for [`HIGHLIGHT_DECAY`] instead of until key-up.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// How long a pressed cap stays highlighted
pub const HIGHLIGHT_DECAY: Duration = Duration::from_millis(150);

/// Keys that do not produce a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    Escape,
    Backspace,
    Tab,
    CapsLock,
    Enter,
    ShiftLeft,
    ShiftRight,
    Control,
    Meta,
    Alt,
    Fn,
    Menu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Lit by either character; letters use lower/upper case
    Char { base: char, shifted: char },
    Special(Special),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCap {
    pub label: &'static str,
    pub trigger: Trigger,
    /// Width in terminal cells
    pub width: u16,
}

const fn key(label: &'static str, base: char, shifted: char) -> KeyCap {
    KeyCap {
        label,
        trigger: Trigger::Char { base, shifted },
        width: 3,
    }
}

const fn wide(label: &'static str, base: char, shifted: char, width: u16) -> KeyCap {
    KeyCap {
        label,
        trigger: Trigger::Char { base, shifted },
        width,
    }
}

const fn special(label: &'static str, special: Special, width: u16) -> KeyCap {
    KeyCap {
        label,
        trigger: Trigger::Special(special),
        width,
    }
}

pub static ROWS: [&[KeyCap]; 5] = [
    &[
        special("Esc", Special::Escape, 3),
        key("1", '1', '!'),
        key("2", '2', '@'),
        key("3", '3', '#'),
        key("4", '4', '$'),
        key("5", '5', '%'),
        key("6", '6', '^'),
        key("7", '7', '&'),
        key("8", '8', '*'),
        key("9", '9', '('),
        key("0", '0', ')'),
        key("-", '-', '_'),
        key("=", '=', '+'),
        special("Backspace", Special::Backspace, 11),
    ],
    &[
        special("Tab", Special::Tab, 5),
        key("Q", 'q', 'Q'),
        key("W", 'w', 'W'),
        key("E", 'e', 'E'),
        key("R", 'r', 'R'),
        key("T", 't', 'T'),
        key("Y", 'y', 'Y'),
        key("U", 'u', 'U'),
        key("I", 'i', 'I'),
        key("O", 'o', 'O'),
        key("P", 'p', 'P'),
        key("[ {", '[', '{'),
        key("] }", ']', '}'),
        wide("\\ |", '\\', '|', 6),
    ],
    &[
        special("Caps", Special::CapsLock, 6),
        key("A", 'a', 'A'),
        key("S", 's', 'S'),
        key("D", 'd', 'D'),
        key("F", 'f', 'F'),
        key("G", 'g', 'G'),
        key("H", 'h', 'H'),
        key("J", 'j', 'J'),
        key("K", 'k', 'K'),
        key("L", 'l', 'L'),
        key("; :", ';', ':'),
        key("' \"", '\'', '"'),
        special("Enter", Special::Enter, 8),
    ],
    &[
        special("Shift", Special::ShiftLeft, 8),
        key("Z", 'z', 'Z'),
        key("X", 'x', 'X'),
        key("C", 'c', 'C'),
        key("V", 'v', 'V'),
        key("B", 'b', 'B'),
        key("N", 'n', 'N'),
        key("M", 'm', 'M'),
        key(", <", ',', '<'),
        key(". >", '.', '>'),
        key("/ ?", '/', '?'),
        special("Shift", Special::ShiftRight, 9),
    ],
    &[
        special("Ctrl", Special::Control, 4),
        special("Win", Special::Meta, 4),
        special("Alt", Special::Alt, 4),
        wide("Space", ' ', ' ', 23),
        special("Alt", Special::Alt, 4),
        special("Fn", Special::Fn, 4),
        special("Menu", Special::Menu, 4),
        special("Ctrl", Special::Control, 4),
    ],
];

/// Row/column of a cap in [`ROWS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPos {
    pub row: usize,
    pub col: usize,
}

impl KeyCap {
    fn lit_by(&self, event: &KeyEvent) -> bool {
        let shifted_char = matches!(
            event.code,
            KeyCode::Char(c) if ROWS.iter().flat_map(|row| row.iter()).any(|cap| {
                matches!(cap.trigger, Trigger::Char { base, shifted } if c == shifted && c != base)
            })
        );

        match self.trigger {
            Trigger::Char { base, shifted } => {
                matches!(event.code, KeyCode::Char(c) if c == base || c == shifted)
            }
            Trigger::Special(special) => match special {
                Special::Escape => event.code == KeyCode::Esc,
                Special::Backspace => event.code == KeyCode::Backspace,
                Special::Tab => matches!(event.code, KeyCode::Tab | KeyCode::BackTab),
                Special::CapsLock => event.code == KeyCode::CapsLock,
                Special::Enter => event.code == KeyCode::Enter,
                Special::ShiftLeft | Special::ShiftRight => {
                    shifted_char || event.modifiers.contains(KeyModifiers::SHIFT)
                }
                Special::Control => event.modifiers.contains(KeyModifiers::CONTROL),
                Special::Meta => event.modifiers.contains(KeyModifiers::SUPER),
                Special::Alt => event.modifiers.contains(KeyModifiers::ALT),
                Special::Menu => event.code == KeyCode::Menu,
                Special::Fn => false,
            },
        }
    }
}

/// Every cap a key event lights, including modifier caps
pub fn locate(event: &KeyEvent) -> Vec<KeyPos> {
    ROWS.iter()
        .enumerate()
        .flat_map(|(row, caps)| {
            caps.iter()
                .enumerate()
                .filter(|(_, cap)| cap.lit_by(event))
                .map(move |(col, _)| KeyPos { row, col })
        })
        .collect()
}

/// Most recent key press and when it happened
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    lit: Vec<KeyPos>,
    pressed_at: Option<Instant>,
}

impl KeyboardState {
    pub fn press(&mut self, event: &KeyEvent, now: Instant) {
        self.lit = locate(event);
        self.pressed_at = Some(now);
    }

    pub fn lit_at(&self, now: Instant) -> &[KeyPos] {
        match self.pressed_at {
            Some(at) if now.saturating_duration_since(at) < HIGHLIGHT_DECAY => self.lit.as_slice(),
            _ => &[],
        }
    }

    pub fn is_lit(&self, pos: KeyPos, now: Instant) -> bool {
        self.lit_at(now).contains(&pos)
    }
}
