//! Terminal mode flags (DECSET/DECRST, SM/RM).
//!
//! Each flag corresponds to a terminal mode set/reset via escape sequences.
//! The default mode has `SHOW_CURSOR` and `LINE_WRAP` enabled.

use bitflags::bitflags;

bitflags! {
    /// Bitflags for terminal mode state.
    ///
    /// Modes are toggled by DECSET (`CSI ? n h`), DECRST (`CSI ? n l`),
    /// SM (`CSI n h`), and RM (`CSI n l`) escape sequences.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TermMode: u32 {
        /// DECTCEM (?25) — cursor visible.
        const SHOW_CURSOR        = 1;
        /// DECKPAM/DECKPNM — application keypad mode. Also governs whether
        /// cursor keys are sent as `ESC O` (set) or `ESC [` (unset).
        const APP_KEYPAD         = 1 << 1;
        /// ?1047/?1049 — alternate screen buffer.
        const ALT_SCREEN         = 1 << 2;
        /// DECAWM — auto-wrap at end of line.
        const LINE_WRAP          = 1 << 3;
        /// DECOM — origin mode (cursor relative to scroll region).
        const ORIGIN             = 1 << 4;
        /// IRM — insert mode.
        const INSERT             = 1 << 5;
        /// ANSI mode 20 (LNM) — line feed also performs carriage return.
        const LINE_FEED_NEW_LINE = 1 << 6;
        /// ?3 — 132 column mode (vs. 80).
        const COLUMN_132         = 1 << 7;
    }
}

impl Default for TermMode {
    fn default() -> Self {
        Self::SHOW_CURSOR | Self::LINE_WRAP
    }
}
