//! @dose
//! purpose: Line-oriented text writer with an indentation level, used to lay out the
//!     generated declaration file.
//!
//! invariants:
//!     - Lines always end with "\n"; blank lines carry no indentation
//!     - Indentation is four spaces per level

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct IndentedWriter {
    buffer: String,
    level: usize,
}

impl IndentedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn outdent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Write one line at the current indentation
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.buffer.push_str(INDENT);
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Write a multi-line block verbatim, indenting each of its lines
    pub fn block(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
