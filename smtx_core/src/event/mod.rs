//! Terminal event types and listener traits.
//!
//! Events flow outward from the terminal state machine to the canvas that
//! owns it. The `EventListener` trait decouples `Term<T>` from the canvas
//! tree and event loop — tests use `VoidListener`.

use std::borrow::Cow;
use std::fmt;

pub use vte::ansi::Rgb;

/// Terminal events that flow outward to the owning canvas.
///
/// Produced by VTE handler methods on `Term<T>`. The attached
/// `EventListener` receives these via `send_event`.
#[derive(Clone)]
pub enum Event {
    /// New content available — trigger a redraw.
    Wakeup,
    /// BEL character received.
    Bell,
    /// Window title changed (OSC 0/2).
    Title(String),
    /// Window title reset to default.
    ResetTitle,
    /// Response bytes to write back to the PTY (DA, DSR, OSC 60/62 dumps).
    PtyWrite(String),
    /// Child process exited with the given status code.
    ChildExit(i32),
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wakeup => write!(f, "Wakeup"),
            Self::Bell => write!(f, "Bell"),
            Self::Title(t) => write!(f, "Title({t})"),
            Self::ResetTitle => write!(f, "ResetTitle"),
            Self::PtyWrite(text) => write!(f, "PtyWrite({text})"),
            Self::ChildExit(code) => write!(f, "ChildExit({code})"),
        }
    }
}

/// Receives terminal events from `Term<T>`.
///
/// The default implementation is a no-op, so `VoidListener` needs no
/// method body. The real binary routes events into the single-threaded
/// main loop's PTY-write queue and title bar.
pub trait EventListener: 'static {
    /// Handle a terminal event. Default: no-op.
    fn send_event(&self, _event: Event) {}
}

/// Writes response bytes back to the PTY.
///
/// VTE handler methods that need to respond (DA, DSR, DECRPM, OSC queries)
/// call `Notify::notify` to send bytes without going through the event system.
pub trait Notify: Send {
    /// Write response bytes to the PTY.
    fn notify<B: Into<Cow<'static, [u8]>>>(&self, bytes: B);
}

/// No-op event listener for tests and headless operation.
pub struct VoidListener;

impl EventListener for VoidListener {}
