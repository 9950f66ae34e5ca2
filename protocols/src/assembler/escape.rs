//! VT100/ANSI escape sequence removal.

use std::borrow::Cow;

pub const ESCAPE: char = '\x1b';
const BELL: char = '\x07';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum State {
    #[default]
    Text,
    /// Just saw `ESC`.
    Escape,
    /// Inside `ESC [ ...` up to its final byte.
    Csi,
    /// Inside `ESC ] ...` up to `BEL` or `ESC \`.
    Osc,
    OscEscape,
    /// `ESC (` and friends take exactly one more character.
    Designate,
}

/// Removes escape sequences from a character stream. The scanner keeps its
/// position between calls, so a sequence may span chunk boundaries.
#[derive(Debug, Default)]
pub struct EscapeScanner {
    state: State,
}

impl EscapeScanner {
    pub fn strip<'a>(&mut self, chunk: &'a str) -> Cow<'a, str> {
        if self.state == State::Text && !chunk.contains(ESCAPE) {
            return Cow::Borrowed(chunk);
        }

        let mut out: String = String::with_capacity(chunk.len());
        for c in chunk.chars() {
            self.state = match (self.state, c) {
                (State::Text, ESCAPE) => State::Escape,
                (State::Text, _) => {
                    out.push(c);
                    State::Text
                }
                (State::Escape, '[') => State::Csi,
                (State::Escape, ']') => State::Osc,
                (State::Escape, '(' | ')' | '*' | '+') => State::Designate,
                (State::Escape, _) => State::Text,
                // A line break never belongs to a well-formed sequence.
                (State::Csi | State::Osc, '\r' | '\n') => {
                    out.push(c);
                    State::Text
                }
                (State::Csi, '\x40'..='\x7e') => State::Text,
                (State::Csi, _) => State::Csi,
                (State::Osc, BELL) => State::Text,
                (State::Osc, ESCAPE) => State::OscEscape,
                (State::Osc, _) => State::Osc,
                (State::OscEscape | State::Designate, _) => State::Text,
            };
        }
        Cow::Owned(out)
    }
}
