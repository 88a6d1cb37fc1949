//! Key dispatch: two 128-entry ASCII tables (passthrough and command mode)
//! plus special-key handling for arrows and function keys, modeled as a
//! tagged `Action` instead of function-pointer tables.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::canvas::{Direction, SplitDir};

/// What a struck key does. Replaces the original's function-pointer +
/// string-argument pair with a single sum type; arities that needed an
/// argument string now carry typed payloads instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Unbound key in command mode: beep, do nothing else.
    Beep,
    /// Unbound key in passthrough mode: forward the struck character.
    Passthrough,
    /// Toggle between passthrough and command mode.
    Transition,
    /// Attach the focused canvas to the pty numbered by the prefix count.
    Attach,
    /// Scroll focused canvas's view by `n` lines (+1 down, -1 up).
    ScrollLine(i8),
    /// Scroll focused canvas's view horizontally (+1 right, -1 left).
    ScrollHist(i8),
    /// Equalize split fractions along the focused canvas's chain.
    Balance,
    /// Append `n` (prefix count, default 1) canvases along `SplitDir`.
    Create(SplitDir),
    /// Move focus one step in a screen direction.
    Mov(Direction),
    /// Grow/shrink the focused canvas's split fraction in a direction.
    Resize(Direction),
    /// Exchange the bound ptys of the focused canvas and its sibling.
    Swap,
    /// Set a tab stop at the cursor's column.
    NewTabstop,
    /// Cap the depth at which the canvas tree is drawn to the prefix count
    /// (or lift the cap entirely if no prefix was given).
    SetViewDepth,
    /// Set the default pty width to the prefix count.
    SetWidth,
    /// Set scrollback history (lines) to the prefix count.
    SetHistory,
    /// Remove the focused canvas, killing its pty.
    Prune,
    /// Accumulate a digit into the numeric prefix.
    Digit(u8),
    /// A literal escape sequence to send to the focused pty (function keys,
    /// Home/End/PageUp/PageDown/Backspace/Delete/Insert/BackTab/Enter).
    Send(&'static str),
    /// An arrow key: terminfo differs with cursor-key mode, so the final
    /// bytes are resolved against the focused pty's `TermMode` at dispatch
    /// time rather than baked in here.
    SendArrow(ArrowDir),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDir {
    Up,
    Down,
    Right,
    Left,
}

impl ArrowDir {
    pub fn final_byte(self) -> char {
        match self {
            ArrowDir::Up => 'A',
            ArrowDir::Down => 'B',
            ArrowDir::Right => 'C',
            ArrowDir::Left => 'D',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Passthrough,
    Command,
}

/// Resolve a special (non-ASCII) key the same way in either mode.
fn special_key(code: KeyCode) -> Option<Action> {
    Some(match code {
        KeyCode::F(1) => Action::Send("\x1bOP"),
        KeyCode::F(2) => Action::Send("\x1bOQ"),
        KeyCode::F(3) => Action::Send("\x1bOR"),
        KeyCode::F(4) => Action::Send("\x1bOS"),
        KeyCode::F(5) => Action::Send("\x1b[15~"),
        KeyCode::F(6) => Action::Send("\x1b[17~"),
        KeyCode::F(7) => Action::Send("\x1b[18~"),
        KeyCode::F(8) => Action::Send("\x1b[19~"),
        KeyCode::F(9) => Action::Send("\x1b[20~"),
        KeyCode::F(10) => Action::Send("\x1b[21~"),
        KeyCode::F(11) => Action::Send("\x1b[23~"),
        KeyCode::F(12) => Action::Send("\x1b[24~"),
        KeyCode::Home => Action::Send("\x1b[1~"),
        KeyCode::End => Action::Send("\x1b[4~"),
        KeyCode::PageUp => Action::Send("\x1b[5~"),
        KeyCode::PageDown => Action::Send("\x1b[6~"),
        KeyCode::Backspace => Action::Send("\x7f"),
        KeyCode::Delete => Action::Send("\x1b[3~"),
        KeyCode::Insert => Action::Send("\x1b[2~"),
        KeyCode::BackTab => Action::Send("\x1b[Z"),
        KeyCode::Enter => Action::Send("\r"),
        KeyCode::Up => Action::SendArrow(ArrowDir::Up),
        KeyCode::Down => Action::SendArrow(ArrowDir::Down),
        KeyCode::Right => Action::SendArrow(ArrowDir::Right),
        KeyCode::Left => Action::SendArrow(ArrowDir::Left),
        _ => return None,
    })
}

/// Command-mode bindings for printable ASCII.
fn command_key(c: char) -> Action {
    match c {
        '\r' | '\n' => Action::Transition,
        'a' => Action::Attach,
        'b' => Action::ScrollLine(-1),
        'f' => Action::ScrollLine(1),
        '>' => Action::ScrollHist(1),
        '<' => Action::ScrollHist(-1),
        '=' => Action::Balance,
        'c' => Action::Create(SplitDir::Horizontal),
        'C' => Action::Create(SplitDir::Vertical),
        'j' => Action::Mov(Direction::Down),
        'k' => Action::Mov(Direction::Up),
        'h' => Action::Mov(Direction::Left),
        'l' => Action::Mov(Direction::Right),
        'H' => Action::Resize(Direction::Left),
        'J' => Action::Resize(Direction::Down),
        'K' => Action::Resize(Direction::Up),
        'L' => Action::Resize(Direction::Right),
        's' => Action::Swap,
        't' => Action::NewTabstop,
        'v' => Action::SetViewDepth,
        'W' => Action::SetWidth,
        'Z' => Action::SetHistory,
        'x' => Action::Prune,
        '0'..='9' => Action::Digit(c as u8 - b'0'),
        _ => Action::Beep,
    }
}

/// Dispatch a key event in the given mode to an [`Action`].
///
/// `command_key` is the configured prefix (default `Ctrl-G`); striking it in
/// either mode toggles `mode` via [`Action::Transition`].
pub fn dispatch(mode: Mode, key: KeyEvent, prefix: u8) -> Action {
    if let Some(action) = special_key(key.code) {
        return action;
    }

    if let KeyCode::Char(c) = key.code {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            let byte = (c as u8) & 0x1f;
            if byte == prefix {
                return Action::Transition;
            }
        }

        return match mode {
            Mode::Passthrough => Action::Passthrough,
            Mode::Command => command_key(c),
        };
    }

    match mode {
        Mode::Passthrough => Action::Passthrough,
        Mode::Command => Action::Beep,
    }
}
