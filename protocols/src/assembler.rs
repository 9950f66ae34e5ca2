//! Line reassembly for interactive sessions.
//!
//! The transport delivers text in chunks with no relation to line boundaries.
//! [`LineAssembler`] buffers the unterminated tail, splits on CRLF, filters
//! terminal escape sequences and forgets partial lines when the switch prompt
//! shows up, since a prompt is never followed by a newline.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::LineParser;

mod escape;

pub use escape::{ESCAPE, EscapeScanner};

pub const LINE_TERMINATOR: &str = "\r\n";
/// Ends every switch prompt, e.g. `switch [standalone: master] > `.
pub const PROMPT_MARKER: char = '>';

/// What to do with terminal escape sequences found in a chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapePolicy {
    /// Remove only the escape sequences and keep the surrounding text.
    #[default]
    Strip,
    /// Discard every chunk that contains an escape byte.
    ///
    /// Lossy when an escape sequence shares a chunk with real output.
    DropChunk,
}

pub struct LineAssembler<P> {
    parser: P,
    buffer: String,
    policy: EscapePolicy,
    escapes: EscapeScanner,
}

impl<P: LineParser> LineAssembler<P> {
    pub fn new(parser: P) -> Self {
        Self::with_policy(parser, EscapePolicy::default())
    }

    pub fn with_policy(parser: P, policy: EscapePolicy) -> Self {
        Self {
            parser,
            buffer: String::new(),
            policy,
            escapes: EscapeScanner::default(),
        }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// The unterminated text carried over to the next chunk.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Feeds one chunk, in arrival order, and returns the records completed by it.
    pub fn feed(&mut self, chunk: &str) -> Vec<P::Record> {
        let text: Cow<'_, str> = match self.policy {
            EscapePolicy::DropChunk if chunk.contains(ESCAPE) => {
                debug!(len = chunk.len(), "dropping chunk with escape sequence");
                return Vec::new();
            }
            EscapePolicy::DropChunk => Cow::Borrowed(chunk),
            EscapePolicy::Strip => self.escapes.strip(chunk),
        };
        self.buffer.push_str(&text);

        let mut records: Vec<P::Record> = Vec::new();
        let mut start: usize = 0;
        while let Some(offset) = self.buffer[start..].find(LINE_TERMINATOR) {
            let end: usize = start + offset;
            let line: &str = &self.buffer[start..end];
            trace!(line = %line.escape_debug(), "line");
            if let Some(record) = self.parser.process_line(line) {
                records.push(record);
            }
            start = end + LINE_TERMINATOR.len();
        }
        self.buffer.drain(..start);

        if self.buffer.contains(PROMPT_MARKER) {
            trace!(pending = %self.buffer.escape_debug(), "prompt reached");
            self.buffer.clear();
        }

        records
    }

    /// Closes the session: any partial line is dropped and the parser is
    /// handed back so the caller can inspect where it stopped.
    pub fn end_of_session(self) -> P {
        if !self.buffer.is_empty() {
            debug!(
                pending = %self.buffer.escape_debug(),
                "discarding unterminated line at end of session"
            );
        }
        self.parser
    }
}
