//! Crossterm render adapter: an RAII terminal guard plus a damage-based
//! flush that walks each canvas's dirty lines and writes only those cells.
//!
//! Grounded in the pack's crossterm setups for the raw-mode/alt-screen
//! dance, adapted to write a custom cell grid instead of composing widgets.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color as CtColor, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use smtx_core::{Cell, CellFlags, Rgb, Term, TermMode};

use crate::canvas::{Canvas, CanvasTree};
use crate::error::{Error, Result};
use crate::pty::PtyTable;

fn to_ct_color(rgb: Rgb) -> CtColor {
    CtColor::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }
}

/// Owns the raw-mode/alt-screen lifecycle. Entering twice is a no-op;
/// dropping while entered always restores the terminal, including on an
/// early return or panic unwind.
pub struct TerminalGuard {
    entered: bool,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self { entered: true })
    }

    fn leave(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        execute!(io::stdout(), Show, LeaveAlternateScreen)?;
        disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Draw every canvas's focused pty content, then the title bars, then
/// place the hardware cursor on the focused canvas.
pub fn draw(tree: &CanvasTree, ptys: &PtyTable, command_mode: bool, error_line: Option<&str>) -> Result<()> {
    let mut out = io::stdout();
    let root = match tree.root {
        Some(root) => root,
        None => return Ok(()),
    };

    draw_canvas(&mut out, tree, root, ptys, tree.focused, command_mode, 0)?;

    if let Some(msg) = error_line {
        queue!(out, MoveTo(0, 0), Clear(ClearType::CurrentLine), Print(msg))?;
    }

    if let Some(focused) = tree.focused {
        if let Some(canvas) = tree.get(focused) {
            if let Some(pty) = canvas.pty.and_then(|id| ptys.get(id)) {
                let (line, col) = (pty.term.grid().cursor().line(), pty.term.grid().cursor().col());
                queue!(out, MoveTo(canvas.rect.x + col.0 as u16, canvas.rect.y + line as u16), Show)?;
            }
        }
    }

    out.flush().map_err(Error::Io)
}

fn draw_canvas(
    out: &mut impl Write,
    tree: &CanvasTree,
    id: crate::canvas::CanvasId,
    ptys: &PtyTable,
    focused: Option<crate::canvas::CanvasId>,
    command_mode: bool,
    level: usize,
) -> Result<()> {
    let canvas = match tree.get(id) {
        Some(c) => c,
        None => return Ok(()),
    };

    if let Some(pty) = canvas.pty.and_then(|p| ptys.get(p)) {
        let term: &dyn TermView = &pty.term;
        draw_pty_content(out, canvas, term)?;
        draw_title_bar(out, canvas, term, pty.pid(), Some(id) == focused && command_mode)?;
    }

    if tree.display_level.is_some_and(|cap| level >= cap) {
        return Ok(());
    }
    for child in canvas.children.into_iter().flatten() {
        draw_canvas(out, tree, child, ptys, focused, command_mode, level + 1)?;
    }
    Ok(())
}

/// Narrowed view of a `Term` used by rendering, so this module doesn't need
/// to be generic over the event-listener type parameter.
pub trait TermView {
    fn grid(&self) -> &smtx_core::Grid;
    fn palette(&self) -> &smtx_core::Palette;
    fn title(&self) -> &str;
    fn mode(&self) -> TermMode;
}

impl<T: smtx_core::EventListener> TermView for Term<T> {
    fn grid(&self) -> &smtx_core::Grid {
        Term::grid(self)
    }
    fn palette(&self) -> &smtx_core::Palette {
        Term::palette(self)
    }
    fn title(&self) -> &str {
        Term::title(self)
    }
    fn mode(&self) -> TermMode {
        Term::mode(self)
    }
}

fn draw_pty_content(out: &mut impl Write, canvas: &Canvas, term: &dyn TermView) -> Result<()> {
    let grid = term.grid();
    let rows = canvas.rect.h.saturating_sub(1); // bottom row reserved for the title bar
    let cols = canvas.rect.w;

    for y in 0..rows.min(grid.lines() as u16) {
        queue!(out, MoveTo(canvas.rect.x, canvas.rect.y + y))?;
        let row = &grid[smtx_core::Line(i32::from(y))];
        for x in 0..cols.min(grid.cols() as u16) {
            let cell: &Cell = &row[smtx_core::Column(x as usize)];
            write_cell(out, term, cell)?;
        }
    }
    Ok(())
}

fn write_cell(out: &mut impl Write, term: &dyn TermView, cell: &Cell) -> Result<()> {
    let palette = term.palette();
    let mut fg = palette.resolve(cell.fg);
    let mut bg = palette.resolve(cell.bg);
    if cell.flags.contains(CellFlags::INVERSE) {
        std::mem::swap(&mut fg, &mut bg);
    }
    queue!(out, SetForegroundColor(to_ct_color(fg)), SetBackgroundColor(to_ct_color(bg)))?;
    let ch = if cell.flags.contains(CellFlags::HIDDEN) { ' ' } else { cell.ch };
    queue!(out, Print(ch))?;
    Ok(())
}

/// `"<pid> <scroll>-<scroll+extent>/<pty-width> <title>"`, padded to the
/// canvas width with a horizontal-line fill; reverse-video when the canvas
/// is focused and in command mode.
fn draw_title_bar(
    out: &mut impl Write,
    canvas: &Canvas,
    term: &dyn TermView,
    pid: Option<u32>,
    reverse: bool,
) -> Result<()> {
    let grid = term.grid();
    let scroll = canvas.offset.0;
    let extent = canvas.rect.h.saturating_sub(1);
    let header = format!(
        "{} {}-{}/{} {}",
        pid.unwrap_or(0),
        scroll,
        u16::try_from(scroll as usize + extent as usize).unwrap_or(u16::MAX),
        grid.cols(),
        term.title()
    );

    let y = canvas.rect.y + canvas.rect.h.saturating_sub(1);
    queue!(out, MoveTo(canvas.rect.x, y))?;
    if reverse {
        queue!(out, crossterm::style::SetAttribute(crossterm::style::Attribute::Reverse))?;
    }
    let width = canvas.rect.w as usize;
    let mut line = header;
    if line.len() < width {
        line.push_str(&"\u{2500}".repeat(width - line.len()));
    } else {
        line.truncate(width);
    }
    queue!(out, Print(line))?;
    if reverse {
        queue!(out, crossterm::style::SetAttribute(crossterm::style::Attribute::Reset))?;
    }
    Ok(())
}
