//! Typed error vocabulary.
//!
//! Only [`Error::Startup`] (and `Io` errors raised before the event loop
//! starts) ever reaches `main`. Per-operation failures (bad canvas id,
//! unrecognized signal) are caught at the call site and folded into the
//! status line instead of propagating.

use std::io;

/// Errors that can cross an API boundary in this binary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("no canvas or pty with id {0}")]
    InvalidId(u32),

    #[error("invalid signal: {0}")]
    InvalidSignal(i32),

    #[error("startup failed: {0}")]
    Startup(String),
}

pub type Result<T> = std::result::Result<T, Error>;
