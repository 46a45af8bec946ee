//! HTML writer implementation.
//!
//! Every paragraph becomes a `<p>` element. A paragraph styled uniformly
//! carries its attributes on the `<p>` itself; otherwise each run is wrapped
//! in a `<span>`. Links wrap the element in an anchor:
//!
//! ```text
//! <p><span>plain </span><a href='https://example.com/'><span style='color: rgba(0, 0, 255, 1.000000)'>link</span></a></p>
//! ```

use super::entities::{escape_attribute, escape_text};
use crate::model::{AttributeSet, StyledText};
use crate::options::WriteOptions;
use crate::style::write_declarations;

/// The element kinds the writer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Paragraph,
    Span,
}

impl Element {
    fn name(self) -> &'static str {
        match self {
            Element::Paragraph => "p",
            Element::Span => "span",
        }
    }
}

/// One element about to be emitted, with the attributes of its range.
#[derive(Debug)]
struct Tag<'a> {
    element: Element,
    attributes: &'a AttributeSet,
}

impl Tag<'_> {
    /// Returns true when the anchor stands in for the element.
    ///
    /// A paragraph always keeps its `<p>`; a span whose only attribute is the
    /// link is written as a bare anchor.
    fn anchor_only(&self, declarations: &[String]) -> bool {
        self.element == Element::Span && self.attributes.link.is_some() && declarations.is_empty()
    }
}

/// Styled text to markup encoder.
#[derive(Debug, Clone, Default)]
pub struct HtmlWriter {
    options: WriteOptions,
}

impl HtmlWriter {
    /// Creates a new writer with the given options.
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Returns the writer's options.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Encodes `text` to markup.
    pub fn encode(&self, text: &StyledText) -> String {
        let source = text.as_str();
        let runs = text.runs();
        let mut output = String::with_capacity(source.len() * 2);

        let mut next_run = 0;
        for paragraph in text.paragraph_ranges() {
            // Runs are sorted and gapless; skip those ending before this paragraph.
            while next_run < runs.len() && runs[next_run].range.end <= paragraph.start {
                next_run += 1;
            }

            let pieces: Vec<_> = runs[next_run..]
                .iter()
                .take_while(|run| run.range.start < paragraph.end)
                .map(|run| {
                    let start = run.range.start.max(paragraph.start);
                    let end = run.range.end.min(paragraph.end);
                    (start..end, &run.attributes)
                })
                .filter(|(range, _)| !range.is_empty())
                .collect();

            match pieces.as_slice() {
                [] => {
                    // An empty paragraph carries the style of its neighbouring separator.
                    let separator = if paragraph.start > 0 {
                        paragraph.start - 1
                    } else {
                        paragraph.end
                    };
                    let attributes = text.attributes_at(separator);
                    let tag = Tag {
                        element: Element::Paragraph,
                        attributes: &attributes,
                    };
                    self.write_element(&tag, "", &mut output);
                }
                [(range, attributes)] => {
                    let tag = Tag {
                        element: Element::Paragraph,
                        attributes,
                    };
                    self.write_element(&tag, &source[range.clone()], &mut output);
                }
                _ => {
                    output.push_str("<p>");
                    for (range, attributes) in &pieces {
                        let tag = Tag {
                            element: Element::Span,
                            attributes,
                        };
                        self.write_element(&tag, &source[range.clone()], &mut output);
                    }
                    output.push_str("</p>");
                }
            }
        }

        output
    }

    /// Writes the open markup, the escaped content and the mirrored close markup.
    fn write_element(&self, tag: &Tag<'_>, content: &str, output: &mut String) {
        let declarations = write_declarations(tag.attributes, &self.options);
        let anchor_only = tag.anchor_only(&declarations);

        if let Some(ref link) = tag.attributes.link {
            output.push_str("<a href='");
            output.push_str(&escape_attribute(link.as_str()));
            output.push_str("'>");
        }
        if !anchor_only {
            output.push('<');
            output.push_str(tag.element.name());
            if !declarations.is_empty() {
                output.push_str(" style='");
                output.push_str(&escape_attribute(&declarations.join("; ")));
                output.push('\'');
            }
            output.push('>');
        }

        output.push_str(&escape_text(content));

        if !anchor_only {
            output.push_str("</");
            output.push_str(tag.element.name());
            output.push('>');
        }
        if tag.attributes.link.is_some() {
            output.push_str("</a>");
        }
    }
}
