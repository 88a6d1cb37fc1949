//! Global state and the event loop.
//!
//! Single-threaded cooperative scheduler. Crossterm owns stdin exclusively
//! on every platform it supports, which rules out folding stdin and the pty
//! masters into one `select`/`poll` set safely without unsafe fd-borrowing.
//! Instead each iteration does a non-blocking read sweep over every live
//! pty (cheap: the underlying reads are `O_NONBLOCK` and return
//! `WouldBlock` immediately when empty) and only waits on the keyboard,
//! with a short timeout, when that sweep found nothing to do.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEventKind};

use smtx_core::Event;

use crate::canvas::{CanvasId, CanvasTree, Direction, SplitDir};
use crate::error::Result;
use crate::keymap::{self, Action, ArrowDir, Mode};
use crate::pty::PtyTable;
use crate::render;

const KEYBOARD_POLL: Duration = Duration::from_millis(16);

pub struct App {
    pub tree: CanvasTree,
    pub ptys: PtyTable,
    pub mode: Mode,
    pub prefix_count: Option<u32>,
    pub command_key: u8,
    pub default_width: u16,
    pub history: usize,
    pub term_env: String,
    pub error_line: Option<String>,
    pub rows: u16,
    pub cols: u16,
}

impl App {
    pub fn new(command_key: u8, default_width: u16, history: usize, term_env: String, rows: u16, cols: u16) -> Self {
        Self {
            tree: CanvasTree::new(),
            ptys: PtyTable::new(),
            mode: Mode::Passthrough,
            prefix_count: None,
            command_key,
            default_width,
            history,
            term_env,
            error_line: None,
            rows,
            cols,
        }
    }

    /// Spawn the first pty and bind it to a freshly created root canvas.
    pub fn bootstrap(&mut self) -> Result<()> {
        let root = self.tree.init_root();
        let pty_id = self.ptys.spawn(self.rows.saturating_sub(1), self.cols, self.history, &self.term_env, None)?;
        self.tree.get_mut(root).unwrap().pty = Some(pty_id);
        self.reshape_root();
        Ok(())
    }

    fn reshape_root(&mut self) {
        if let Some(root) = self.tree.root {
            self.tree.reshape(root, 0, 0, self.rows, self.cols);
            self.sync_pty_sizes(root);
        }
    }

    fn sync_pty_sizes(&mut self, id: CanvasId) {
        let (rect, pty, children) = {
            let c = self.tree.get(id).unwrap();
            (c.rect, c.pty, c.children)
        };
        if let Some(pty_id) = pty {
            if let Some(pty) = self.ptys.get_mut(pty_id) {
                pty.resize(rect.h.saturating_sub(1).max(1), rect.w.max(1));
            }
        }
        for child in children.into_iter().flatten() {
            self.sync_pty_sizes(child);
        }
    }

    /// Run until the root canvas is pruned away.
    pub fn run(&mut self) -> Result<()> {
        while self.tree.root.is_some() {
            render::draw(&self.tree, &self.ptys, self.mode == Mode::Command, self.error_line.as_deref())?;

            if !self.pump_all_ptys() {
                if event::poll(KEYBOARD_POLL).unwrap_or(false) {
                    match event::read() {
                        Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => self.dispatch_key(key),
                        Ok(CtEvent::Resize(w, h)) => {
                            self.cols = w;
                            self.rows = h;
                            self.reshape_root();
                        }
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    /// Sweep every live pty for available output. Returns whether any byte
    /// was read, so the caller can skip the keyboard wait and keep draining
    /// busy ptys immediately.
    fn pump_all_ptys(&mut self) -> bool {
        let ids: Vec<_> = self.ptys.iter().map(|p| p.id).collect();
        let mut did_work = false;

        for id in ids {
            let outcome = self.ptys.get_mut(id).map(crate::pty::Pty::pump_output);
            let events = self.ptys.get(id).map(crate::pty::Pty::drain_events).unwrap_or_default();
            for event in events {
                self.handle_pty_event(id, event);
            }
            match outcome {
                Some(Ok(Some(0))) | Some(Err(_)) => self.prune_pty(id),
                Some(Ok(Some(_))) => {
                    did_work = true;
                    self.autoscroll(id);
                }
                Some(Ok(None)) | None => {}
            }
        }
        did_work
    }

    /// New pty output snaps the view back to the bottom, unless the user
    /// has manually scrolled the canvas showing it.
    fn autoscroll(&mut self, pty_id: u32) {
        if let Some(canvas) = self.tree.find_by_pty(pty_id).and_then(|id| self.tree.get_mut(id)) {
            if !canvas.manual_scroll {
                canvas.offset = (0, 0);
            }
        }
    }

    fn handle_pty_event(&mut self, id: u32, event: Event) {
        match event {
            Event::Bell => {}
            Event::Title(_) | Event::ResetTitle => {}
            Event::ChildExit(_code) => self.prune_pty(id),
            Event::Wakeup | Event::PtyWrite(_) => {}
        }
    }

    fn prune_pty(&mut self, pty_id: u32) {
        if let Some(canvas) = self.tree.find_by_pty(pty_id) {
            self.tree.prune(canvas);
        }
        self.ptys.remove(pty_id);
        self.reshape_root();
    }

    fn focused_pty_id(&self) -> Option<u32> {
        self.tree.focused.and_then(|id| self.tree.get(id)).and_then(|c| c.pty)
    }

    fn take_count(&mut self, default: u32) -> u32 {
        self.prefix_count.take().map_or(default, |n| n.max(1))
    }

    fn dispatch_key(&mut self, key: crossterm::event::KeyEvent) {
        let action = keymap::dispatch(self.mode, key, self.command_key);
        self.run_action(action, key);
    }

    fn run_action(&mut self, action: Action, key: crossterm::event::KeyEvent) {
        let clears_count = !matches!(action, Action::Digit(_));

        match action {
            Action::Beep => {}
            Action::Passthrough => {
                if let crossterm::event::KeyCode::Char(c) = key.code {
                    self.write_focused(&c.to_string());
                }
            }
            Action::Transition => {
                self.mode = match self.mode {
                    Mode::Passthrough => Mode::Command,
                    Mode::Command => Mode::Passthrough,
                };
                if self.mode == Mode::Passthrough {
                    self.error_line = None;
                }
            }
            Action::Attach => {
                if let Some(n) = self.prefix_count {
                    if self.ptys.get(n).is_none() {
                        self.error_line = Some(crate::error::Error::InvalidId(n).to_string());
                    } else if let Some(canvas) = self.tree.focused {
                        self.tree.get_mut(canvas).unwrap().pty = Some(n);
                    }
                }
            }
            Action::ScrollLine(dir) => {
                let n = self.take_count(1);
                self.scroll(dir, n);
            }
            Action::ScrollHist(dir) => {
                let n = self.take_count(1);
                self.scroll_hist(dir, n);
            }
            Action::Balance => {
                if let Some(f) = self.tree.focused {
                    self.tree.balance(f);
                    self.reshape_root();
                }
            }
            Action::Create(dir) => {
                let count = self.take_count(1) as usize;
                if let Some(new) = self.tree.create(self.tree.focused, dir, count) {
                    self.tree.focused = Some(new);
                    if let Ok(id) =
                        self.ptys.spawn(self.rows.saturating_sub(1), self.default_width, self.history, &self.term_env, None)
                    {
                        self.tree.get_mut(new).unwrap().pty = Some(id);
                    }
                    self.reshape_root();
                }
            }
            Action::Mov(dir) => {
                self.tree.mov(dir);
            }
            Action::Resize(dir) => {
                let n = self.take_count(1);
                self.resize_focused(dir, n);
            }
            Action::Swap => self.swap_with_sibling(),
            Action::NewTabstop => {
                if let Some(id) = self.focused_pty_id() {
                    if let Some(pty) = self.ptys.get_mut(id) {
                        pty.term.grid_mut().set_tab_stop();
                    }
                }
            }
            Action::SetViewDepth => {
                self.tree.display_level = self.prefix_count.map(|n| n as usize);
                self.reshape_root();
            }
            Action::SetWidth => {
                if let Some(n) = self.prefix_count {
                    self.default_width = n.clamp(1, u32::from(u16::MAX)) as u16;
                }
            }
            Action::SetHistory => {
                if let Some(n) = self.prefix_count {
                    self.history = n as usize;
                }
            }
            Action::Prune => {
                if let Some(f) = self.tree.focused {
                    if let Some(pty) = self.tree.get(f).and_then(|c| c.pty) {
                        if let Some(p) = self.ptys.get_mut(pty) {
                            let _ = p.kill();
                        }
                        self.prune_pty(pty);
                    } else {
                        self.tree.prune(f);
                    }
                }
            }
            Action::Digit(d) => {
                let n = self.prefix_count.unwrap_or(0);
                self.prefix_count = Some(n * 10 + u32::from(d));
            }
            Action::Send(seq) => self.write_focused(seq),
            Action::SendArrow(dir) => self.send_arrow(dir),
        }

        if clears_count {
            self.prefix_count = None;
        }
    }

    fn write_focused(&mut self, data: &str) {
        if let Some(id) = self.focused_pty_id() {
            if let Some(pty) = self.ptys.get_mut(id) {
                let _ = pty.send(data);
            }
            if let Some(canvas) = self.tree.focused.and_then(|c| self.tree.get_mut(c)) {
                canvas.manual_scroll = false;
                canvas.offset = (0, 0);
            }
        }
    }

    fn send_arrow(&mut self, dir: ArrowDir) {
        let app_cursor = self
            .focused_pty_id()
            .and_then(|id| self.ptys.get(id))
            .is_some_and(|p| p.term.mode().contains(smtx_core::TermMode::APP_KEYPAD));
        let lead = if app_cursor { 'O' } else { '[' };
        self.write_focused(&format!("\x1b{lead}{}", dir.final_byte()));
    }

    fn scroll(&mut self, dir: i8, amount: u32) {
        if let Some(id) = self.tree.focused {
            let canvas = self.tree.get_mut(id).unwrap();
            canvas.manual_scroll = true;
            let amount = amount as u16;
            if dir < 0 {
                canvas.offset.0 = canvas.offset.0.saturating_add(amount);
            } else {
                canvas.offset.0 = canvas.offset.0.saturating_sub(amount);
            }
        }
    }

    fn scroll_hist(&mut self, dir: i8, amount: u32) {
        if let Some(id) = self.tree.focused {
            let canvas = self.tree.get_mut(id).unwrap();
            canvas.manual_scroll = true;
            let amount = amount as u16;
            if dir < 0 {
                canvas.offset.1 = canvas.offset.1.saturating_sub(amount);
            } else {
                canvas.offset.1 = canvas.offset.1.saturating_add(amount);
            }
        }
    }

    /// Grow/shrink the focused canvas's split fraction by `0.05 * amount`.
    /// `Down`/`Right` shrink the focused canvas (its parent's split fraction
    /// for that dimension); `Up`/`Left` grow it back, the inverse step.
    fn resize_focused(&mut self, dir: Direction, amount: u32) {
        let Some(id) = self.tree.focused else { return };
        let Some(parent) = self.tree.get(id).and_then(|c| c.parent) else { return };
        let (slot, sign) = match dir {
            Direction::Down => (0, -1.0),
            Direction::Up => (0, 1.0),
            Direction::Right => (1, -1.0),
            Direction::Left => (1, 1.0),
        };
        let step = 0.05 * f64::from(amount) * sign;
        if let Some(p) = self.tree.get_mut(parent) {
            p.split[slot] = (p.split[slot] + step).clamp(0.05, 0.95);
        }
        self.reshape_root();
    }

    fn swap_with_sibling(&mut self) {
        let Some(id) = self.tree.focused else { return };
        let Some(parent) = self.tree.get(id).and_then(|c| c.parent) else { return };
        let siblings = self.tree.get(parent).unwrap().children;
        let other = siblings.into_iter().flatten().find(|&c| c != id);
        if let Some(other) = other {
            self.tree.swap(id, other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn new_app() -> App {
        let mut app = App::new(0x07, 80, 256, "xterm".to_string(), 24, 80);
        app.bootstrap().unwrap();
        app
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn digits_accumulate_into_prefix_count_and_clear_after_use() {
        let mut app = new_app();
        app.mode = Mode::Command;
        app.dispatch_key(key('4'));
        app.dispatch_key(key('2'));
        assert_eq!(app.prefix_count, Some(42));
        app.dispatch_key(key('W'));
        assert_eq!(app.prefix_count, None);
        assert_eq!(app.default_width, 42);
    }

    #[test]
    fn attach_to_unknown_id_sets_an_error_line() {
        let mut app = new_app();
        app.mode = Mode::Command;
        app.prefix_count = Some(999);
        app.run_action(Action::Attach, key('a'));
        assert!(app.error_line.is_some());
    }

    #[test]
    fn attach_to_known_id_rebinds_the_focused_canvas() {
        let mut app = new_app();
        let other = app.ptys.spawn(23, 80, 256, "xterm", Some(&["sh", "-c", "sleep 1"])).unwrap();
        app.mode = Mode::Command;
        app.prefix_count = Some(other);
        app.run_action(Action::Attach, key('a'));
        assert_eq!(app.error_line, None);
        let focused = app.tree.focused.unwrap();
        assert_eq!(app.tree.get(focused).unwrap().pty, Some(other));
    }

    #[test]
    fn create_spawns_a_pty_and_focuses_the_new_canvas() {
        let mut app = new_app();
        let before = app.tree.focused;
        app.run_action(Action::Create(SplitDir::Horizontal), key('c'));
        assert_ne!(app.tree.focused, before);
        let focused = app.tree.get(app.tree.focused.unwrap()).unwrap();
        assert!(focused.pty.is_some());
    }

    #[test]
    fn prune_kills_the_bound_pty_and_removes_the_canvas() {
        let mut app = new_app();
        let root = app.tree.root.unwrap();
        app.run_action(Action::Prune, key('x'));
        assert!(app.tree.root.is_none() || app.tree.root != Some(root));
        assert_eq!(app.ptys.iter().count(), 0);
    }

    #[test]
    fn scroll_line_sets_manual_scroll_and_is_reset_by_a_keystroke() {
        let mut app = new_app();
        app.run_action(Action::ScrollLine(-1), key('b'));
        let focused = app.tree.focused.unwrap();
        assert!(app.tree.get(focused).unwrap().manual_scroll);
        assert_eq!(app.tree.get(focused).unwrap().offset.0, 1);

        app.write_focused("x");
        assert!(!app.tree.get(focused).unwrap().manual_scroll);
        assert_eq!(app.tree.get(focused).unwrap().offset, (0, 0));
    }

    #[test]
    fn scroll_line_honors_prefix_count() {
        let mut app = new_app();
        app.prefix_count = Some(4);
        app.run_action(Action::ScrollLine(-1), key('b'));
        let focused = app.tree.focused.unwrap();
        assert_eq!(app.tree.get(focused).unwrap().offset.0, 4);
    }

    #[test]
    fn resize_up_and_left_are_the_inverse_of_down_and_right() {
        let mut app = new_app();
        app.run_action(Action::Create(SplitDir::Horizontal), key('c'));
        let child = app.tree.focused.unwrap();
        let root = app.tree.get(child).unwrap().parent.unwrap();
        let before = app.tree.get(root).unwrap().split[0];

        app.run_action(Action::Resize(Direction::Down), key('J'));
        let shrunk = app.tree.get(root).unwrap().split[0];
        assert!((shrunk - (before - 0.05)).abs() < 1e-9);

        app.run_action(Action::Resize(Direction::Up), key('K'));
        let restored = app.tree.get(root).unwrap().split[0];
        assert!((restored - before).abs() < 1e-9);
    }

    #[test]
    fn set_view_depth_caps_reshape_and_clears_with_no_prefix() {
        let mut app = new_app();
        app.run_action(Action::Create(SplitDir::Horizontal), key('c'));
        let root = app.tree.root.unwrap();

        app.prefix_count = Some(0);
        app.run_action(Action::SetViewDepth, key('v'));
        assert_eq!(app.tree.display_level, Some(0));
        assert_eq!(app.tree.get(root).unwrap().rect.h, app.rows);

        app.run_action(Action::SetViewDepth, key('v'));
        assert_eq!(app.tree.display_level, None);
    }

    #[test]
    fn take_count_defaults_and_clamps_to_at_least_one() {
        let mut app = new_app();
        assert_eq!(app.take_count(3), 3);
        app.prefix_count = Some(0);
        assert_eq!(app.take_count(3), 1);
        app.prefix_count = Some(5);
        assert_eq!(app.take_count(3), 5);
    }
}
