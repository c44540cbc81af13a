//! Offset to line/column conversion

use rowan::TextSize;

/// Zero-based line and column (column in bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Line start table for a source text
///
/// `\n`, `\r\n` and a lone `\r` all end a line, matching the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    i += 2;
                    line_starts.push(TextSize::from(i as u32));
                }
                b'\r' | b'\n' => {
                    i += 1;
                    line_starts.push(TextSize::from(i as u32));
                }
                _ => i += 1,
            }
        }
        Self {
            line_starts,
            len: TextSize::from(text.len() as u32),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line and column of `offset`; offsets past the end clamp to the end
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        LineCol {
            line: line as u32,
            col: u32::from(offset - self.line_starts[line]),
        }
    }

    /// Start offset of a zero-based line
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.line_starts.get(line as usize).copied()
    }

    /// Text of a zero-based line of `text` without its terminator
    pub fn line_text<'t>(&self, text: &'t str, line: u32) -> Option<&'t str> {
        let start = usize::from(self.line_start(line)?);
        let end = self
            .line_start(line + 1)
            .map_or(text.len(), usize::from)
            .min(text.len());
        let slice = text.get(start..end)?;
        Some(slice.trim_end_matches(['\n', '\r']))
    }
}
