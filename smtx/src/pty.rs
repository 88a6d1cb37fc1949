//! PTY lifecycle: spawning a child attached to a pseudo-terminal, feeding
//! its output through a [`smtx_core::Term`], and writing keystrokes back.
//!
//! Grounded in `struct pty` from the original implementation: each pty owns
//! its own terminal state (there the primary/alternate screens live inside
//! the pty; here that's `Term`), a child pid, and a window size kept in
//! sync with the canvas rectangle that displays it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{Read, Write};

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use smtx_core::{Event, EventListener, Term, TermMode};

use crate::error::{Error, Result};

pub type PtyId = u32;

/// Routes terminal events (bell, title changes) into a queue a caller can
/// drain after feeding a chunk of output through `Term`.
///
/// `EventListener::send_event` takes `&self`, so the queue needs interior
/// mutability.
#[derive(Debug, Default)]
pub struct EventQueue(RefCell<VecDeque<Event>>);

impl EventListener for EventQueue {
    fn send_event(&self, event: Event) {
        self.0.borrow_mut().push_back(event);
    }
}

impl EventQueue {
    pub fn drain(&self) -> Vec<Event> {
        self.0.borrow_mut().drain(..).collect()
    }
}

/// One pseudo-terminal and the child process attached to it.
pub struct Pty {
    pub id: PtyId,
    pub term: Term<EventQueue>,
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
    parser: vte::ansi::Processor,
    /// Set once the child has exited; carries its exit code.
    pub exited: Option<i32>,
}

impl std::fmt::Debug for Pty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pty").field("id", &self.id).field("exited", &self.exited).finish()
    }
}

impl Pty {
    /// Spawn `command` (program name plus arguments; the user's shell if
    /// `None`) attached to a new pty of size `rows`x`cols`, with
    /// `scrollback` lines of history. The child sees `TERM`, `SMTX` (this
    /// process's pid), and `SMTX_VERSION`, with any inherited `LINES`/
    /// `COLUMNS` removed so it probes its real size instead.
    pub fn spawn(
        id: PtyId,
        rows: u16,
        cols: u16,
        scrollback: usize,
        term_env: &str,
        command: Option<&[&str]>,
    ) -> Result<Self> {
        let system = native_pty_system();
        let pair = system
            .openpty(PtySize { rows, cols, pixel_width: 0, pixel_height: 0 })
            .map_err(|e| Error::Startup(e.to_string()))?;

        let mut cmd = match command {
            Some([program, args @ ..]) => {
                let mut cmd = CommandBuilder::new(program);
                cmd.args(args);
                cmd
            }
            Some([]) | None => CommandBuilder::new(std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())),
        };
        cmd.env("TERM", term_env);
        cmd.env("SMTX", std::process::id().to_string());
        cmd.env("SMTX_VERSION", env!("CARGO_PKG_VERSION"));
        cmd.env_remove("LINES");
        cmd.env_remove("COLUMNS");

        let child = pair.slave.spawn_command(cmd).map_err(|e| Error::Startup(e.to_string()))?;
        let writer = pair.master.take_writer().map_err(|e| Error::Startup(e.to_string()))?;

        Ok(Self {
            id,
            term: Term::new(rows as usize, cols as usize, scrollback, EventQueue::default()),
            master: pair.master,
            writer,
            child,
            parser: vte::ansi::Processor::new(),
            exited: None,
        })
    }

    /// Read whatever is available from the pty and feed it through the VT
    /// parser. Returns the number of bytes read. `Ok(None)` means the pty
    /// had nothing to read right now (not EOF); `Ok(Some(0))` means the
    /// child has exited.
    pub fn pump_output(&mut self) -> Result<Option<usize>> {
        let mut reader = self.master.try_clone_reader().map_err(|e| Error::Startup(e.to_string()))?;
        let mut buf = [0u8; 4096];
        let n = match reader.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        if n == 0 {
            self.exited = Some(self.child.wait().map(|s| s.exit_code() as i32).unwrap_or(-1));
            return Ok(Some(0));
        }
        self.parser.advance(&mut self.term, &buf[..n]);
        Ok(Some(n))
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.process_id()
    }

    pub fn drain_events(&self) -> Vec<Event> {
        self.term.event_listener().drain()
    }

    /// `send`: write to the child, translating `\r` to `\r\n` when the
    /// terminal is in newline mode (LNM).
    pub fn send(&mut self, data: &str) -> Result<()> {
        if self.term.mode().contains(TermMode::LINE_FEED_NEW_LINE) && data == "\r" {
            self.writer.write_all(b"\r\n")?;
        } else {
            self.writer.write_all(data.as_bytes())?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// `pty_size`/reshape: resize the kernel pty and the virtual screen
    /// together.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        let _ = self.master.resize(PtySize { rows, cols, pixel_width: 0, pixel_height: 0 });
        self.term.resize(rows as usize, cols as usize);
    }

    /// `quit`: signal the child's process group (falls back to a direct
    /// kill of the child handle if the pid is unavailable, e.g. already
    /// reaped).
    pub fn kill(&mut self) -> Result<()> {
        let Some(pid) = self.pid() else {
            return self.child.kill().map_err(Error::Io);
        };
        let pgid = nix::unistd::Pid::from_raw(-(pid as i32));
        nix::sys::signal::kill(pgid, nix::sys::signal::Signal::SIGHUP)
            .map_err(|errno| Error::InvalidSignal(errno as i32))
    }
}

/// Owns every live pty, keyed by id, mirroring the original's linked list
/// of `struct pty`.
#[derive(Debug, Default)]
pub struct PtyTable {
    ptys: Vec<Pty>,
    next_id: PtyId,
}

impl PtyTable {
    pub fn new() -> Self {
        Self { ptys: Vec::new(), next_id: 1 }
    }

    pub fn spawn(
        &mut self,
        rows: u16,
        cols: u16,
        scrollback: usize,
        term_env: &str,
        command: Option<&[&str]>,
    ) -> Result<PtyId> {
        let id = self.next_id;
        self.next_id += 1;
        let pty = Pty::spawn(id, rows, cols, scrollback, term_env, command)?;
        self.ptys.push(pty);
        Ok(id)
    }

    pub fn get(&self, id: PtyId) -> Option<&Pty> {
        self.ptys.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PtyId) -> Option<&mut Pty> {
        self.ptys.iter_mut().find(|p| p.id == id)
    }

    pub fn remove(&mut self, id: PtyId) {
        self.ptys.retain(|p| p.id != id);
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pty> {
        self.ptys.iter_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pty> {
        self.ptys.iter()
    }
}
