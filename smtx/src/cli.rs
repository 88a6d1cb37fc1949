//! Command-line argument parsing.

use clap::Parser;

/// A terminal multiplexer.
#[derive(Debug, Parser)]
#[command(name = "smtx", version, about)]
pub struct Cli {
    /// Command prefix key, interpreted as Ctrl-<char>.
    #[arg(short = 'c', value_name = "CHAR", default_value_t = 'g')]
    pub command_key: char,

    /// Scrollback history size in lines.
    #[arg(short = 's', value_name = "N", default_value_t = 1024)]
    pub history: usize,

    /// TERM value advertised to child processes.
    #[arg(short = 't', long = "term", value_name = "NAME")]
    pub term: Option<String>,

    /// Alias for -t.
    #[arg(short = 'T', value_name = "NAME")]
    pub term_alias: Option<String>,

    /// Default PTY column width.
    #[arg(short = 'w', value_name = "N", default_value_t = 80)]
    pub width: u16,

    /// Path to the log file (diagnostics never go to stdout/stderr).
    #[arg(long = "log-file", value_name = "PATH", default_value = "/tmp/smtx.log")]
    pub log_file: String,
}

impl Cli {
    /// The control byte produced by striking the command-prefix key.
    pub fn command_byte(&self) -> u8 {
        (self.command_key as u8) & 0x1f
    }

    /// The effective `TERM` value, preferring `-t` then `-T` then the default.
    pub fn term_value(&self) -> String {
        self.term
            .clone()
            .or_else(|| self.term_alias.clone())
            .unwrap_or_else(|| "screen-256color-bce".to_string())
    }
}
