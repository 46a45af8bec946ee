//! Styled text: a string plus range-scoped attribute annotations.

use super::AttributeSet;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An attribute set applied to a byte range of the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Half-open byte range
    pub range: Range<usize>,
    /// Attributes applied over the range
    pub attributes: AttributeSet,
}

/// A maximal range sharing one effective attribute set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    /// Half-open byte range
    pub range: Range<usize>,
    /// Effective attributes over the range
    pub attributes: AttributeSet,
}

/// Text with formatting annotations.
///
/// Annotations may overlap; where they do, later annotations win per key.
/// Offsets are UTF-8 byte offsets and must fall on char boundaries.
///
/// Equality is semantic: two styled texts are equal when their strings match
/// and they produce the same [`runs`](StyledText::runs).
#[derive(Debug, Clone, Default, Serialize)]
pub struct StyledText {
    text: String,
    annotations: Vec<Annotation>,
}

impl StyledText {
    /// Creates styled text with no attributes.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: Vec::new(),
        }
    }

    /// Creates styled text with `attributes` applied to the whole string.
    pub fn with_attributes(text: impl Into<String>, attributes: AttributeSet) -> Self {
        let text = text.into();
        let mut annotations = Vec::new();
        if !text.is_empty() && !attributes.is_empty() {
            annotations.push(Annotation {
                range: 0..text.len(),
                attributes,
            });
        }
        Self { text, annotations }
    }

    /// Builds styled text from already-disjoint runs.
    pub(crate) fn from_runs(text: String, runs: Vec<Run>) -> Self {
        let annotations = runs
            .into_iter()
            .filter(|run| !run.attributes.is_empty() && !run.range.is_empty())
            .map(|run| Annotation {
                range: run.range,
                attributes: run.attributes,
            })
            .collect();
        Self { text, annotations }
    }

    /// Returns the underlying string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes self and returns the underlying string.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns the length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the annotations in application order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Applies `attributes` to `range`.
    pub fn apply(&mut self, range: Range<usize>, attributes: AttributeSet) -> Result<()> {
        let len = self.text.len();
        if range.start > range.end {
            return Err(Error::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.end > len {
            return Err(Error::InvalidBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        for index in [range.start, range.end] {
            if !self.text.is_char_boundary(index) {
                return Err(Error::NotCharBoundary { index });
            }
        }
        self.annotations.push(Annotation { range, attributes });
        Ok(())
    }

    /// Returns the effective attributes at byte `index`.
    pub fn attributes_at(&self, index: usize) -> AttributeSet {
        let mut attributes = AttributeSet::new();
        for annotation in &self.annotations {
            if annotation.range.contains(&index) {
                attributes.overlay(&annotation.attributes);
            }
        }
        attributes
    }

    /// Partitions the whole text into maximal runs of identical effective
    /// attributes, left to right, without gaps.
    pub fn runs(&self) -> Vec<Run> {
        let len = self.text.len();
        if len == 0 {
            return Vec::new();
        }

        let mut boundaries = Vec::with_capacity(2 + self.annotations.len() * 2);
        boundaries.push(0);
        boundaries.push(len);
        for annotation in &self.annotations {
            boundaries.push(annotation.range.start);
            boundaries.push(annotation.range.end);
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        let mut runs: Vec<Run> = Vec::new();
        for window in boundaries.windows(2) {
            let (start, end) = (window[0], window[1]);
            let mut attributes = AttributeSet::new();
            for annotation in &self.annotations {
                let range = &annotation.range;
                if range.start <= start && range.end >= end && !range.is_empty() {
                    attributes.overlay(&annotation.attributes);
                }
            }

            match runs.last_mut() {
                Some(last) if last.attributes == attributes => last.range.end = end,
                _ => runs.push(Run {
                    range: start..end,
                    attributes,
                }),
            }
        }
        runs
    }

    /// Returns the paragraph ranges of the text (see [`paragraph_ranges`]).
    pub fn paragraph_ranges(&self) -> Vec<Range<usize>> {
        paragraph_ranges(&self.text)
    }

    /// Serializes the model to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a model from JSON, validating every annotation range.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Repr {
            text: String,
            #[serde(default)]
            annotations: Vec<Annotation>,
        }

        let repr: Repr = serde_json::from_str(json)?;
        let mut styled = StyledText::new(repr.text);
        for annotation in repr.annotations {
            styled.apply(annotation.range, annotation.attributes)?;
        }
        Ok(styled)
    }
}

impl PartialEq for StyledText {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.runs() == other.runs()
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Splits `text` into paragraph content ranges.
///
/// Paragraphs break on LF, CR, CRLF, NEL and U+2029; each range excludes its
/// terminating separator. Text ending in a separator yields a trailing empty
/// range. Empty text yields no ranges.
pub fn paragraph_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    if text.is_empty() {
        return ranges;
    }

    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        let separator_len = match c {
            '\r' if matches!(chars.peek(), Some((_, '\n'))) => {
                chars.next();
                2
            }
            '\n' | '\r' | '\u{0085}' | '\u{2029}' => c.len_utf8(),
            _ => continue,
        };
        ranges.push(start..index);
        start = index + separator_len;
    }
    ranges.push(start..text.len());
    ranges
}
