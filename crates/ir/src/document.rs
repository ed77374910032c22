//! Line oriented view over the text of a source unit.
//!
//! The builder only uses it to snap entry ranges to whole lines so that
//! line based text operations downstream never split a line.

use crate::TextRange;

#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    /// Offset of the first byte of every line. Always starts with `0`.
    line_starts: Vec<usize>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(idx, _)| idx + 1),
        );
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero based line that contains `offset`.
    pub fn line_number(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    pub fn line_start_offset(&self, line: usize) -> usize {
        self.line_starts
            .get(line)
            .copied()
            .unwrap_or(self.text.len())
    }

    /// Offset just past the last character of `line`, line terminator excluded.
    pub fn line_end_offset(&self, line: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        if end > self.line_start_offset(line) && bytes.get(end - 1) == Some(&b'\r') {
            end -= 1;
        }
        end
    }

    /// Range covering lines `first..=last`, both 1-based.
    ///
    /// # Example
    /// ```
    /// use ir::{Document, TextRange};
    /// let doc = Document::new("a\nbb\nccc\n");
    /// assert_eq!(doc.lines_range(2, 3), Some(TextRange::new(2, 8)));
    /// assert_eq!(doc.lines_range(0, 1), None);
    /// ```
    pub fn lines_range(&self, first: usize, last: usize) -> Option<TextRange> {
        if first == 0 || first > last || last > self.line_count() {
            return None;
        }
        Some(TextRange::new(
            self.line_start_offset(first - 1),
            self.line_end_offset(last - 1),
        ))
    }

    /// Grows `range` to the full lines it touches.
    ///
    /// Returns `None` when anything other than spaces or tabs shares the
    /// first or last line with the range, or the range lies outside the text.
    ///
    /// # Example
    /// ```
    /// use ir::{Document, TextRange};
    /// let doc = Document::new("class A {\n  int i;\n}\n");
    /// assert_eq!(doc.expand_to_line(TextRange::new(12, 18)), Some(TextRange::new(10, 18)));
    /// assert_eq!(doc.expand_to_line(TextRange::new(0, 5)), None);
    /// ```
    pub fn expand_to_line(&self, range: TextRange) -> Option<TextRange> {
        if range.end > self.text.len() {
            return None;
        }
        let bytes = self.text.as_bytes();
        let line_start = self.line_start_offset(self.line_number(range.start));
        let line_end = self.line_end_offset(self.line_number(range.end));
        let blank = |b: &u8| *b == b' ' || *b == b'\t';
        if !bytes[line_start..range.start].iter().all(blank) {
            return None;
        }
        if range.end < line_end && !bytes[range.end..line_end].iter().all(blank) {
            return None;
        }
        Some(TextRange::new(line_start, line_end.max(range.end)))
    }
}
