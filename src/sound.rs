//! Hit sound effect.
//!
//! The terminal bell stands in for the explosion sample.  Sound is
//! optional: when muted, or when stdout is not a terminal, it is disabled
//! and `play` does nothing.

use std::io::{IsTerminal, Write};

use crossterm::{style::Print, QueueableCommand};
use log::{info, warn};

const BELL: char = '\u{7}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitSound {
    enabled: bool,
}

impl HitSound {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Enable the bell if requested and stdout can ring it.
    pub fn detect(requested: bool) -> Self {
        if !requested {
            info!("Sound muted");
            return Self::disabled();
        }
        if !std::io::stdout().is_terminal() {
            warn!("stdout is not a terminal, disabling sound");
            return Self::disabled();
        }
        Self::new(true)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queue one bell if any enemy was destroyed this frame.  Several kills
    /// in the same frame still ring once.
    pub fn play<W: Write>(&self, out: &mut W, hits: u32) -> std::io::Result<()> {
        if self.enabled && hits > 0 {
            out.queue(Print(BELL))?;
        }
        Ok(())
    }
}
