//! VTE handler implementation for `Term<T>`.
//!
//! Implements `vte::ansi::Handler` to process escape sequences, control
//! characters, and printable input. Each method delegates to the
//! appropriate grid/cursor/mode operation. The set of sequences wired here
//! is deliberately narrower than a full xterm emulation — it covers what a
//! curses-style multiplexer actually needs to reproduce a client
//! application's screen, not every VT220/xterm extension.

use vte::ansi::{
    Attr, CharsetIndex, ClearMode, Handler, LineClearMode, Mode, NamedMode, NamedPrivateMode,
    PrivateMode, StandardCharset, TabulationClearMode,
};

use crate::cell::CellFlags;
use crate::grid::{EraseMode, TabClearMode};
use crate::index::Column;
use crate::event::{Event, EventListener};

use super::{TermMode, Term};

/// DEC private mode number for 132-column mode (DECCOLM). Not exposed as a
/// named variant by vte's `PrivateMode`, so it arrives as `Unknown(3)`.
const DECCOLM: u16 = 3;

fn clear_mode_to_erase(mode: ClearMode) -> EraseMode {
    match mode {
        ClearMode::Below => EraseMode::Below,
        ClearMode::Above => EraseMode::Above,
        ClearMode::All => EraseMode::All,
        ClearMode::Saved => EraseMode::Scrollback,
    }
}

fn line_clear_mode_to_erase(mode: LineClearMode) -> EraseMode {
    match mode {
        LineClearMode::Right => EraseMode::Below,
        LineClearMode::Left => EraseMode::Above,
        LineClearMode::All => EraseMode::All,
    }
}

fn tab_clear_mode(mode: TabulationClearMode) -> TabClearMode {
    match mode {
        TabulationClearMode::Current => TabClearMode::Current,
        TabulationClearMode::All => TabClearMode::All,
    }
}

impl<T: EventListener> Term<T> {
    /// Write an already charset-translated character to the grid, honoring
    /// IRM, and record it as the last printable char for REP.
    fn put_char(&mut self, c: char) {
        self.last_char = Some(c);
        if self.mode.contains(TermMode::INSERT) {
            self.grid_mut().put_char_insert(c);
        } else {
            self.grid_mut().put_char(c);
        }
    }

    /// Enter the alternate screen, optionally saving the primary cursor.
    fn enter_alt_screen(&mut self, save_cursor: bool) {
        if self.active_is_alt {
            return;
        }
        if save_cursor {
            self.grid.save_cursor();
        }
        self.active_is_alt = true;
        self.alt_grid.erase_display(EraseMode::All);
        self.mode.insert(TermMode::ALT_SCREEN);
        self.grid_mut().dirty_mut().mark_all();
    }

    /// Leave the alternate screen, optionally restoring the primary cursor.
    fn leave_alt_screen(&mut self, restore_cursor: bool) {
        if !self.active_is_alt {
            return;
        }
        self.active_is_alt = false;
        if restore_cursor {
            self.grid.restore_cursor();
        }
        self.mode.remove(TermMode::ALT_SCREEN);
        self.grid_mut().dirty_mut().mark_all();
    }
}

impl<T: EventListener> Handler for Term<T> {
    /// Print a character to the terminal.
    ///
    /// Translates through the active charset, then writes via
    /// `put_char`/`put_char_insert` depending on IRM.
    #[inline]
    fn input(&mut self, c: char) {
        let c = self.charset.translate(c);
        self.put_char(c);
    }

    fn goto(&mut self, line: i32, col: usize) {
        let line = line.max(0) as usize;
        self.grid_mut().move_to(line, Column(col));
    }

    fn goto_line(&mut self, line: i32) {
        self.grid_mut().move_to_line(line.max(0) as usize);
    }

    fn goto_col(&mut self, col: usize) {
        self.grid_mut().move_to_column(Column(col));
    }

    fn move_up(&mut self, n: usize) {
        self.grid_mut().move_up(n);
    }

    fn move_down(&mut self, n: usize) {
        self.grid_mut().move_down(n);
    }

    fn move_forward(&mut self, n: usize) {
        self.grid_mut().move_forward(n);
    }

    fn move_backward(&mut self, n: usize) {
        self.grid_mut().move_backward(n);
    }

    fn move_down_and_cr(&mut self, n: usize) {
        let grid = self.grid_mut();
        grid.move_down(n);
        grid.carriage_return();
    }

    fn move_up_and_cr(&mut self, n: usize) {
        let grid = self.grid_mut();
        grid.move_up(n);
        grid.carriage_return();
    }

    /// Move cursor left by one column, clearing the wrap-pending state.
    ///
    /// The wrap-pending state is when the cursor has advanced past the last
    /// column (`col == cols`) after a character write. Backspace resets
    /// this to the last column position.
    fn backspace(&mut self) {
        let grid = self.grid_mut();
        let col = grid.cursor().col().0;
        let cols = grid.cols();

        if col >= cols {
            // Wrap-pending: snap to last column.
            grid.cursor_mut().set_col(Column(cols - 1));
        } else if col > 0 {
            grid.cursor_mut().set_col(Column(col - 1));
        } else {
            // Already at column 0: no-op.
        }
    }

    /// Advance cursor to the next tab stop (or end of line).
    fn put_tab(&mut self, count: u16) {
        for _ in 0..count {
            self.grid_mut().tab();
        }
    }

    fn move_forward_tabs(&mut self, count: u16) {
        for _ in 0..count {
            self.grid_mut().tab();
        }
    }

    fn move_backward_tabs(&mut self, count: u16) {
        for _ in 0..count {
            self.grid_mut().tab_backward();
        }
    }

    fn set_horizontal_tabstop(&mut self) {
        self.grid_mut().set_tab_stop();
    }

    /// Move cursor down one line, scrolling if at the bottom of the scroll
    /// region. Under LNM (ANSI mode 20), also performs a carriage return.
    #[inline]
    fn linefeed(&mut self) {
        let lnm = self.mode.contains(TermMode::LINE_FEED_NEW_LINE);
        let grid = self.grid_mut();
        grid.linefeed();
        if lnm {
            grid.carriage_return();
        }
    }

    fn newline(&mut self) {
        let grid = self.grid_mut();
        grid.linefeed();
        grid.carriage_return();
    }

    /// Move cursor to column 0.
    #[inline]
    fn carriage_return(&mut self) {
        self.grid_mut().carriage_return();
    }

    fn reverse_index(&mut self) {
        self.grid_mut().reverse_index();
    }

    fn save_cursor_position(&mut self) {
        self.saved_charset = Some(self.charset.clone());
        self.grid_mut().save_cursor();
    }

    fn restore_cursor_position(&mut self) {
        if let Some(charset) = self.saved_charset.take() {
            self.charset = charset;
        }
        self.grid_mut().restore_cursor();
    }

    fn clear_screen(&mut self, mode: ClearMode) {
        self.grid_mut().erase_display(clear_mode_to_erase(mode));
    }

    fn clear_line(&mut self, mode: LineClearMode) {
        self.grid_mut().erase_line(line_clear_mode_to_erase(mode));
    }

    fn clear_tabs(&mut self, mode: TabulationClearMode) {
        self.grid_mut().clear_tab_stop(tab_clear_mode(mode));
    }

    fn erase_chars(&mut self, count: usize) {
        self.grid_mut().erase_chars(count);
    }

    fn delete_chars(&mut self, count: usize) {
        self.grid_mut().delete_chars(count);
    }

    fn insert_blank(&mut self, count: usize) {
        self.grid_mut().insert_blank(count);
    }

    fn insert_blank_lines(&mut self, count: usize) {
        self.grid_mut().insert_lines(count);
    }

    fn delete_lines(&mut self, count: usize) {
        self.grid_mut().delete_lines(count);
    }

    fn scroll_up(&mut self, count: usize) {
        self.grid_mut().scroll_up(count);
    }

    fn scroll_down(&mut self, count: usize) {
        self.grid_mut().scroll_down(count);
    }

    fn set_scrolling_region(&mut self, top: usize, bottom: Option<usize>) {
        // `set_scroll_region` homes the cursor to the origin itself.
        self.grid_mut().set_scroll_region(top, bottom);
    }

    /// Terminal bell — send `Event::Bell` to the listener.
    #[inline]
    fn bell(&mut self) {
        self.event_listener.send_event(Event::Bell);
    }

    /// SUB: treated as a space character per ECMA-48.
    fn substitute(&mut self) {
        self.input(' ');
    }

    fn decaln(&mut self) {
        let grid = self.grid_mut();
        for line in 0..grid.lines() {
            for col in 0..grid.cols() {
                grid.cursor_mut().set_line(line);
                grid.cursor_mut().set_col(Column(col));
                grid.put_char('E');
            }
        }
        grid.cursor_mut().set_line(0);
        grid.cursor_mut().set_col(Column(0));
    }

    fn reset_state(&mut self) {
        let lines = self.grid.lines();
        let cols = self.grid.cols();
        let alt_cols = self.alt_grid.cols();
        let alt_lines = self.alt_grid.lines();
        self.grid = crate::grid::Grid::with_scrollback(lines, cols, self.grid.scrollback().max_scrollback());
        self.alt_grid = crate::grid::Grid::with_scrollback(alt_lines, alt_cols, 0);
        self.active_is_alt = false;
        self.mode = TermMode::default();
        self.charset = super::CharsetState::default();
        self.saved_charset = None;
        self.title.clear();
        self.title_stack.clear();
        self.last_char = None;
    }

    fn terminal_attribute(&mut self, attr: Attr) {
        let template = &mut self.grid_mut().cursor_mut().template;
        match attr {
            Attr::Reset => {
                let default = crate::cell::Cell::default();
                template.fg = default.fg;
                template.bg = default.bg;
                template.flags = CellFlags::empty();
            }
            Attr::Bold => template.flags.insert(CellFlags::BOLD),
            Attr::Dim => template.flags.insert(CellFlags::DIM),
            Attr::Italic => template.flags.insert(CellFlags::ITALIC),
            Attr::Underline
            | Attr::DoubleUnderline
            | Attr::Undercurl
            | Attr::DottedUnderline
            | Attr::DashedUnderline => template.flags.insert(CellFlags::UNDERLINE),
            Attr::BlinkSlow | Attr::BlinkFast => template.flags.insert(CellFlags::BLINK),
            Attr::Reverse => template.flags.insert(CellFlags::INVERSE),
            Attr::Hidden => template.flags.insert(CellFlags::HIDDEN),
            Attr::Strike => {}
            Attr::CancelBold => template.flags.remove(CellFlags::BOLD),
            Attr::CancelBoldDim => {
                template.flags.remove(CellFlags::BOLD);
                template.flags.remove(CellFlags::DIM);
            }
            Attr::CancelItalic => template.flags.remove(CellFlags::ITALIC),
            Attr::CancelUnderline => template.flags.remove(CellFlags::UNDERLINE),
            Attr::CancelBlink => template.flags.remove(CellFlags::BLINK),
            Attr::CancelReverse => template.flags.remove(CellFlags::INVERSE),
            Attr::CancelHidden => template.flags.remove(CellFlags::HIDDEN),
            Attr::CancelStrike => {}
            Attr::Foreground(color) => template.fg = color,
            Attr::Background(color) => template.bg = color,
            Attr::UnderlineColor(_) => {}
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if let Mode::Named(named) = mode {
            match named {
                NamedMode::Insert => self.mode.insert(TermMode::INSERT),
                NamedMode::LineFeedNewLine => self.mode.insert(TermMode::LINE_FEED_NEW_LINE),
            }
        }
    }

    fn unset_mode(&mut self, mode: Mode) {
        if let Mode::Named(named) = mode {
            match named {
                NamedMode::Insert => self.mode.remove(TermMode::INSERT),
                NamedMode::LineFeedNewLine => self.mode.remove(TermMode::LINE_FEED_NEW_LINE),
            }
        }
    }

    fn set_private_mode(&mut self, mode: PrivateMode) {
        match mode {
            PrivateMode::Named(NamedPrivateMode::CursorKeys) => {
                self.mode.insert(TermMode::APP_KEYPAD);
            }
            PrivateMode::Named(NamedPrivateMode::Origin) => {
                self.mode.insert(TermMode::ORIGIN);
                self.grid_mut().move_to(0, Column(0));
            }
            PrivateMode::Named(NamedPrivateMode::LineWrap) => {
                self.mode.insert(TermMode::LINE_WRAP);
            }
            PrivateMode::Named(NamedPrivateMode::ShowCursor) => {
                self.mode.insert(TermMode::SHOW_CURSOR);
            }
            PrivateMode::Named(NamedPrivateMode::SwapScreenAndSetRestoreCursor) => {
                self.enter_alt_screen(true);
            }
            PrivateMode::Unknown(47) => {
                self.enter_alt_screen(false);
            }
            PrivateMode::Unknown(1047) => {
                self.enter_alt_screen(false);
            }
            PrivateMode::Unknown(1048) => {
                self.grid_mut().save_cursor();
            }
            PrivateMode::Unknown(DECCOLM) => {
                self.mode.insert(TermMode::COLUMN_132);
                let lines = self.grid().lines();
                self.resize(lines, 132);
            }
            _ => {}
        }
    }

    fn unset_private_mode(&mut self, mode: PrivateMode) {
        match mode {
            PrivateMode::Named(NamedPrivateMode::CursorKeys) => {
                self.mode.remove(TermMode::APP_KEYPAD);
            }
            PrivateMode::Named(NamedPrivateMode::Origin) => {
                self.mode.remove(TermMode::ORIGIN);
                self.grid_mut().move_to(0, Column(0));
            }
            PrivateMode::Named(NamedPrivateMode::LineWrap) => {
                self.mode.remove(TermMode::LINE_WRAP);
            }
            PrivateMode::Named(NamedPrivateMode::ShowCursor) => {
                self.mode.remove(TermMode::SHOW_CURSOR);
            }
            PrivateMode::Named(NamedPrivateMode::SwapScreenAndSetRestoreCursor) => {
                self.leave_alt_screen(true);
            }
            PrivateMode::Unknown(47) => {
                self.leave_alt_screen(false);
            }
            PrivateMode::Unknown(1047) => {
                self.leave_alt_screen(false);
            }
            PrivateMode::Unknown(1048) => {
                self.grid_mut().restore_cursor();
            }
            PrivateMode::Unknown(DECCOLM) => {
                self.mode.remove(TermMode::COLUMN_132);
                let lines = self.grid().lines();
                self.resize(lines, 80);
            }
            _ => {}
        }
    }

    fn set_keypad_application_mode(&mut self) {
        self.mode.insert(TermMode::APP_KEYPAD);
    }

    fn unset_keypad_application_mode(&mut self) {
        self.mode.remove(TermMode::APP_KEYPAD);
    }

    fn set_title(&mut self, title: Option<String>) {
        if let Some(title) = title {
            self.title = title.clone();
            self.event_listener.send_event(Event::Title(title));
        }
    }

    fn push_title(&mut self) {
        self.title_stack.push(self.title.clone());
    }

    fn pop_title(&mut self) {
        if let Some(title) = self.title_stack.pop() {
            self.title = title.clone();
            self.event_listener.send_event(Event::Title(title));
        }
    }

    /// Assign a charset to a slot (ESC (, ESC ), ESC *, ESC +).
    fn configure_charset(&mut self, index: CharsetIndex, charset: StandardCharset) {
        self.charset.set_charset(index, charset);
    }

    /// Switch the active charset slot (SO → G1, SI → G0).
    #[inline]
    fn set_active_charset(&mut self, index: CharsetIndex) {
        self.charset.set_active(index);
    }
}

impl<T: EventListener> Term<T> {
    /// REP: repeat the last printed (already charset-translated) character
    /// `count` more times.
    #[allow(dead_code)]
    fn repeat(&mut self, count: usize) {
        if let Some(c) = self.last_char {
            for _ in 0..count {
                self.put_char(c);
            }
        }
    }
}

#[cfg(test)]
mod tests;
