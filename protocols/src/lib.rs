//! # Switch Console Grammars
//!
//! Turns the raw character stream of an interactive switch session into
//! structured records.
//!
//! * [`assembler`] rebuilds CRLF-terminated lines from arbitrarily chunked
//!   input and hands each one to a [`LineParser`].
//! * [`mroute`] understands the `show ip mroute` dump.
//! * [`lldp`] understands repeated `show lldp interfaces ethernet S/N remote` replies.
//! * [`transcript`] passes lines through unchanged.

pub mod assembler;
pub mod lldp;
pub mod mroute;
pub mod transcript;

pub use assembler::{EscapePolicy, LineAssembler};
pub use lldp::LldpParser;
pub use mroute::{MrouteParser, MrouteState};
pub use transcript::TranscriptParser;

/// Consumes assembled lines one at a time, in the order they completed.
///
/// Implementations own all of their state; one instance serves exactly one session.
pub trait LineParser {
    type Record;

    /// Handles one line, stripped of its CRLF terminator, and returns the
    /// record it completes, if any.
    fn process_line(&mut self, line: &str) -> Option<Self::Record>;
}
