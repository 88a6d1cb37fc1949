//! Library surface for the `smtx` terminal multiplexer, split out from the
//! binary so integration tests can drive a real pty through the same
//! `App`/`Pty`/`Term` core the interactive binary uses.

pub mod app;
pub mod canvas;
pub mod cli;
pub mod error;
pub mod keymap;
pub mod pty;
pub mod render;
