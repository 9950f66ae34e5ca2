//! Pass-through parser used to show a command's raw reply.

use crate::LineParser;

#[derive(Debug, Default, Clone, Copy)]
pub struct TranscriptParser;

impl LineParser for TranscriptParser {
    type Record = String;

    fn process_line(&mut self, line: &str) -> Option<String> {
        Some(line.to_string())
    }
}
