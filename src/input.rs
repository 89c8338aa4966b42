use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Session;

/// What a key press means to a typing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Type(char),
    /// Word boundary
    Space,
    Backspace,
    /// Start over with the same words
    Restart,
    /// Start over with freshly fetched words
    NewText,
    /// Cursor movement keys; the cursor is pinned to the end of the input
    Swallow,
    Quit,
}

/// What the host has to do after a command was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Restart,
    NewText,
    Quit,
}

/// Translate a terminal key event. Releases and keys with no meaning while
/// typing yield `None`.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => Some(Command::Swallow),
        };
    }

    let command = match key.code {
        KeyCode::Char(' ') => Command::Space,
        KeyCode::Char(c) => Command::Type(c),
        KeyCode::Backspace => Command::Backspace,
        KeyCode::Enter => Command::Restart,
        KeyCode::Tab => Command::NewText,
        KeyCode::Esc => Command::Quit,
        KeyCode::Left
        | KeyCode::Right
        | KeyCode::Up
        | KeyCode::Down
        | KeyCode::Home
        | KeyCode::End
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::Delete
        | KeyCode::BackTab => Command::Swallow,
        _ => return None,
    };

    Some(command)
}

/// Apply a command to the session
pub fn apply(session: &mut Session, command: Command) -> Signal {
    match command {
        Command::Type(c) => {
            let mut next = session.input().to_string();
            next.push(c);
            session.submit_input(&next);
        }
        Command::Space => session.advance_word(),
        Command::Backspace => {
            if session.input().is_empty() {
                session.retreat_word();
            } else {
                let mut next = session.input().to_string();
                next.pop();
                session.submit_input(&next);
            }
        }
        Command::Restart => {
            session.reset();
            return Signal::Restart;
        }
        Command::NewText => return Signal::NewText,
        Command::Swallow => {}
        Command::Quit => return Signal::Quit,
    }

    Signal::Continue
}
