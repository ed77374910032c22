use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open byte range `[start, end)` inside a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Creates a range. `start` must not exceed `end`.
    ///
    /// # Example
    /// ```
    /// use ir::TextRange;
    /// let r = TextRange::new(2, 5);
    /// assert_eq!(r.len(), 3);
    /// ```
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "invalid range {start}..{end}");
        Self { start, end }
    }

    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Ranges that touch at a boundary also intersect.
    ///
    /// # Example
    /// ```
    /// use ir::TextRange;
    /// assert!(TextRange::new(0, 4).intersects(&TextRange::new(4, 9)));
    /// assert!(!TextRange::new(0, 3).intersects(&TextRange::new(4, 9)));
    /// ```
    pub fn intersects(&self, other: &TextRange) -> bool {
        self.start.max(other.start) <= self.end.min(other.end)
    }

    pub fn contains_range(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &TextRange) -> TextRange {
        TextRange::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl std::str::FromStr for TextRange {
    type Err = String;

    /// Parses `start..end`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| format!("expected <start>..<end>, got '{s}'"))?;
        let start: usize = start
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| e.to_string())?;
        let end: usize = end
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| e.to_string())?;
        if start > end {
            return Err(format!("range start {start} is after end {end}"));
        }
        Ok(TextRange::new(start, end))
    }
}
