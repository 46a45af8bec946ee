//! HTML reader implementation.
//!
//! Decoding never fails. Each construct the reader cannot use is skipped or
//! kept as literal text and counted in a [`ReadReport`].

use super::entities::decode_entities;
use super::tokenizer::{Token, Tokenizer};
use crate::cache::DecodeCaches;
use crate::font::{FontProvider, FontResolver};
use crate::model::{AttributeSet, Run, StyledText};
use crate::options::ReadOptions;
use crate::style::{parse_style, ParsedStyle};
use serde::Serialize;
use url::Url;

/// Counts of constructs skipped or repaired while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadReport {
    /// Stray `<` and unterminated tags kept as text
    pub malformed_tags: usize,
    /// End tags with no matching open element
    pub orphan_close_tags: usize,
    /// Elements closed implicitly by an outer end tag or the end of input
    pub unclosed_elements: usize,
    /// Elements other than `p`, `span`, `a` and `br`
    pub unknown_elements: usize,
    /// Character references kept literally
    pub unknown_entities: usize,
    /// Style declarations naming an unknown property
    pub unknown_properties: usize,
    /// Style declarations whose value could not be read
    pub dropped_declarations: usize,
    /// `href` values that are not absolute URLs
    pub invalid_links: usize,
    /// Elements beyond the nesting limit whose styling was ignored
    pub flattened_elements: usize,
}

impl ReadReport {
    /// Returns true if nothing was skipped or repaired.
    pub fn is_clean(&self) -> bool {
        *self == ReadReport::default()
    }

    /// Total number of problems.
    pub fn total(&self) -> usize {
        self.malformed_tags
            + self.orphan_close_tags
            + self.unclosed_elements
            + self.unknown_elements
            + self.unknown_entities
            + self.unknown_properties
            + self.dropped_declarations
            + self.invalid_links
            + self.flattened_elements
    }
}

/// An element on the open stack with the attributes in effect inside it.
#[derive(Debug)]
struct OpenElement {
    name: String,
    effective: AttributeSet,
    /// Text length when the element opened
    text_start: usize,
}

/// Markup to styled text decoder.
pub struct HtmlReader<'a> {
    fonts: &'a dyn FontProvider,
    caches: &'a DecodeCaches,
    options: &'a ReadOptions,
}

impl<'a> HtmlReader<'a> {
    /// Creates a reader over shared caches and a font provider.
    pub fn new(fonts: &'a dyn FontProvider, caches: &'a DecodeCaches, options: &'a ReadOptions) -> Self {
        Self {
            fonts,
            caches,
            options,
        }
    }

    /// Decodes `markup`, filling unspecified attributes from `defaults`.
    pub fn decode(&self, markup: &str, defaults: &AttributeSet) -> StyledText {
        self.decode_with_report(markup, defaults).0
    }

    /// Decodes `markup` and hands the diagnostics to `on_complete` before returning.
    pub fn decode_with<F>(&self, markup: &str, defaults: &AttributeSet, on_complete: F) -> StyledText
    where
        F: FnOnce(&ReadReport),
    {
        let (text, report) = self.decode_with_report(markup, defaults);
        on_complete(&report);
        text
    }

    /// Decodes `markup` and returns the diagnostics alongside the text.
    pub fn decode_with_report(&self, markup: &str, defaults: &AttributeSet) -> (StyledText, ReadReport) {
        let mut state = DecodeState::new(defaults);

        for token in Tokenizer::new(markup) {
            match token {
                Token::Text(raw) => {
                    let (text, unknown) = decode_entities(raw);
                    state.report.unknown_entities += unknown;
                    state.push_text(&text);
                }
                Token::Malformed(raw) => {
                    state.report.malformed_tags += 1;
                    state.push_text(raw);
                }
                Token::Directive => {}
                Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => self.start_element(&mut state, name, &attributes, self_closing),
                Token::EndTag(name) => state.end_element(&name),
            }
        }

        state.finish_paragraph_separator(None);
        if !state.stack.is_empty() {
            log::debug!("{} element(s) left open at end of input", state.stack.len());
            state.report.unclosed_elements += state.stack.len();
        }

        (StyledText::from_runs(state.text, state.runs), state.report)
    }

    fn start_element(
        &self,
        state: &mut DecodeState<'_>,
        name: String,
        attributes: &[(String, &str)],
        self_closing: bool,
    ) {
        match name.as_str() {
            "br" => {
                if self.options.line_breaks {
                    state.push_line_break();
                }
                return;
            }
            "p" => {
                if state.seen_paragraph || !state.text.is_empty() {
                    state.begin_paragraph_separator();
                }
                state.seen_paragraph = true;
            }
            "span" | "a" => {}
            other => {
                log::debug!("treating unknown element <{}> as transparent", other);
                state.report.unknown_elements += 1;
            }
        }
        if self_closing {
            return;
        }

        let parent = state.current().clone();
        if state.stack.len() >= self.options.max_nesting_depth {
            log::warn!(
                "nesting deeper than {} elements; ignoring styling of <{}>",
                self.options.max_nesting_depth,
                name
            );
            state.report.flattened_elements += 1;
            state.stack.push(OpenElement {
                name,
                effective: parent,
                text_start: state.text.len(),
            });
            return;
        }

        let mut own = AttributeSet::new();
        if matches!(name.as_str(), "p" | "span" | "a") {
            for (attribute, value) in attributes {
                match (attribute.as_str(), name.as_str()) {
                    ("style", _) => {
                        let (style, unknown) = decode_entities(value);
                        state.report.unknown_entities += unknown;
                        let parsed = self.parse_style_cached(&style);
                        state.report.unknown_properties += parsed.unknown_properties;
                        state.report.dropped_declarations += parsed.dropped_declarations;
                        own.overlay(&parsed.attributes);
                    }
                    ("href", "a") => {
                        let (href, unknown) = decode_entities(value);
                        state.report.unknown_entities += unknown;
                        match Url::parse(href.trim()) {
                            Ok(url) => own.link = Some(url),
                            Err(e) => {
                                log::debug!("skipping invalid link {:?}: {}", href, e);
                                state.report.invalid_links += 1;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        state.stack.push(OpenElement {
            name,
            effective: parent.merged(&own),
            text_start: state.text.len(),
        });
    }

    /// Looks `declarations` up in the style cache, parsing and storing it on a miss.
    fn parse_style_cached(&self, declarations: &str) -> ParsedStyle {
        if !self.options.use_caches {
            return parse_style(declarations, &FontResolver::new(self.fonts, None));
        }
        self.caches
            .styles
            .get_or_insert_with(declarations.to_string(), || {
                log::trace!("style cache miss: {:?}", declarations);
                let resolver = FontResolver::new(self.fonts, Some(&self.caches.fonts));
                parse_style(declarations, &resolver)
            })
    }
}

/// Per-call scratch state.
struct DecodeState<'d> {
    defaults: &'d AttributeSet,
    text: String,
    runs: Vec<Run>,
    stack: Vec<OpenElement>,
    seen_paragraph: bool,
    /// Attributes of the content before the paragraph break awaiting its style
    pending_separator: Option<AttributeSet>,
    /// Attributes of the most recent content, including empty paragraphs
    tail: Option<AttributeSet>,
    report: ReadReport,
}

impl<'d> DecodeState<'d> {
    fn new(defaults: &'d AttributeSet) -> Self {
        Self {
            defaults,
            text: String::new(),
            runs: Vec::new(),
            stack: Vec::new(),
            seen_paragraph: false,
            pending_separator: None,
            tail: None,
            report: ReadReport::default(),
        }
    }

    /// Attributes in effect at the current position.
    fn current(&self) -> &AttributeSet {
        self.stack
            .last()
            .map_or(self.defaults, |element| &element.effective)
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let attributes = self.current().clone();
        self.finish_paragraph_separator(Some(&attributes));
        self.push_run(text, attributes);
    }

    /// Line breaks carry only the defaults.
    fn push_line_break(&mut self) {
        let attributes = self.current().clone();
        self.finish_paragraph_separator(Some(&attributes));
        self.push_run("\n", self.defaults.clone());
    }

    /// Defers the line feed between paragraphs until the content after it is known.
    fn begin_paragraph_separator(&mut self) {
        self.finish_paragraph_separator(None);
        self.pending_separator = Some(self.tail.clone().unwrap_or_else(|| self.defaults.clone()));
    }

    /// Emits a deferred paragraph line feed styled with what both sides share.
    ///
    /// `next` is the style of the content after the break; `None` uses the
    /// attributes at the current position.
    fn finish_paragraph_separator(&mut self, next: Option<&AttributeSet>) {
        let Some(previous) = self.pending_separator.take() else {
            return;
        };
        let shared = match next {
            Some(next) => previous.intersection(next),
            None => previous.intersection(self.current()),
        };
        let attributes = self.defaults.merged(&shared);
        self.push_run("\n", attributes);
    }

    fn push_run(&mut self, text: &str, attributes: AttributeSet) {
        if text.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(text);
        let end = self.text.len();
        self.tail = Some(attributes.clone());

        match self.runs.last_mut() {
            Some(last) if last.range.end == start && last.attributes == attributes => {
                last.range.end = end;
            }
            _ => self.runs.push(Run {
                range: start..end,
                attributes,
            }),
        }
    }

    fn end_element(&mut self, name: &str) {
        let Some(index) = self.stack.iter().rposition(|element| element.name == name) else {
            log::debug!("ignoring orphan close tag </{}>", name);
            self.report.orphan_close_tags += 1;
            return;
        };
        let implicitly_closed = self.stack.len() - index - 1;
        if implicitly_closed > 0 {
            log::debug!("</{}> closes {} inner element(s)", name, implicitly_closed);
            self.report.unclosed_elements += implicitly_closed;
        }
        for element in self.stack.split_off(index).into_iter().rev() {
            if element.name == "p" && element.text_start == self.text.len() {
                // Empty paragraph: its own style stands in for its content.
                self.finish_paragraph_separator(Some(&element.effective));
                self.tail = Some(element.effective);
            }
        }
    }
}
