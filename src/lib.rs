//! # stylemark
//!
//! A thread-safe codec between styled text (a string plus range-scoped
//! formatting attributes) and a small HTML dialect with inline style
//! declarations.
//!
//! ## Quick Start
//!
//! ```
//! use stylemark::{AttributeSet, Color, StyledText, Stylemark};
//!
//! let mut text = StyledText::new("Hello, world");
//! text.apply(7..12, AttributeSet::new().with_foreground_color(Color::RED))?;
//!
//! let codec = Stylemark::new();
//! let markup = codec.encode(&text);
//! assert_eq!(
//!     markup,
//!     "<p><span>Hello, </span><span style='color: rgba(255, 0, 0, 1.000000)'>world</span></p>"
//! );
//!
//! let decoded = codec.decode(&markup, &AttributeSet::new());
//! assert_eq!(decoded, text);
//! # Ok::<(), stylemark::Error>(())
//! ```
//!
//! ## Markup
//!
//! - `<p>` per paragraph; text is split on LF, CR, CRLF, NEL and U+2029
//! - `<span style='...'>` per run when a paragraph is not uniformly styled
//! - `<a href='...'>` around linked elements
//! - declarations: `background-color`, `color`, `text-decoration`, `font`,
//!   `vertical-align` and the `-x-underline`, `-x-underline-color`,
//!   `-x-strikethrough`, `-x-strikethrough-color`, `-x-font-postscriptname`,
//!   `-x-font-uiusage` vendor extensions
//!
//! ## Concurrency
//!
//! A [`Stylemark`] is `Send + Sync`. Encoding is pure; decoding shares one
//! pair of caches (style strings and fonts) guarded by reader-writer locks.
//! [`Stylemark::clear_caches`] may race with decodes on other threads
//! without affecting their results.

pub mod cache;
pub mod error;
pub mod font;
pub mod html;
pub mod model;
pub mod options;
pub mod style;

// Re-exports
pub use cache::{Cache, DecodeCaches};
pub use error::{Error, Result};
pub use font::{FontCatalog, FontDescriptor, FontProvider, FontResolver};
pub use html::{HtmlReader, HtmlWriter, ReadReport};
pub use model::{
    paragraph_ranges, Annotation, AttributeKey, AttributeSet, Color, Font, LineStyle, Run,
    StyledText,
};
pub use options::{ReadOptions, WriteOptions};
pub use style::{CssProperty, ParsedStyle};

use rayon::prelude::*;
use std::sync::Arc;

/// Encodes `text` with default options.
pub fn encode(text: &StyledText) -> String {
    HtmlWriter::default().encode(text)
}

/// Decodes `markup` with default options and the standard font catalog.
///
/// Every call starts from empty caches; keep a [`Stylemark`] around to reuse
/// parsed styles and resolved fonts between calls.
pub fn decode(markup: &str, defaults: &AttributeSet) -> StyledText {
    Stylemark::new().decode(markup, defaults)
}

/// The codec: options, a font provider and the shared decode caches.
///
/// # Example
///
/// ```
/// use stylemark::{AttributeSet, Stylemark, WriteOptions};
///
/// let codec = Stylemark::new().with_write_options(WriteOptions::new().without_vendor_extensions());
/// let text = codec.decode("<p>one</p><p>two</p>", &AttributeSet::new());
/// assert_eq!(text.as_str(), "one\ntwo");
/// ```
#[derive(Clone)]
pub struct Stylemark {
    caches: Arc<DecodeCaches>,
    fonts: Arc<dyn FontProvider>,
    read_options: ReadOptions,
    write_options: WriteOptions,
}

impl Default for Stylemark {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Stylemark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stylemark")
            .field("cached_styles", &self.caches.styles.len())
            .field("cached_fonts", &self.caches.fonts.len())
            .field("read_options", &self.read_options)
            .field("write_options", &self.write_options)
            .finish()
    }
}

impl Stylemark {
    /// Creates a codec with default options, fresh caches and the standard font catalog.
    pub fn new() -> Self {
        Self {
            caches: Arc::new(DecodeCaches::new()),
            fonts: Arc::new(FontCatalog::standard()),
            read_options: ReadOptions::default(),
            write_options: WriteOptions::default(),
        }
    }

    /// Resolves fonts through `provider`, starting from fresh caches.
    pub fn with_font_provider(mut self, provider: impl FontProvider + 'static) -> Self {
        self.fonts = Arc::new(provider);
        self.caches = Arc::new(DecodeCaches::new());
        self
    }

    /// Shares `caches` with other codecs.
    pub fn with_caches(mut self, caches: Arc<DecodeCaches>) -> Self {
        self.caches = caches;
        self
    }

    /// Sets the decoding options.
    pub fn with_read_options(mut self, options: ReadOptions) -> Self {
        self.read_options = options;
        self
    }

    /// Sets the encoding options.
    pub fn with_write_options(mut self, options: WriteOptions) -> Self {
        self.write_options = options;
        self
    }

    /// Returns the shared caches.
    pub fn caches(&self) -> &Arc<DecodeCaches> {
        &self.caches
    }

    /// Returns a writer configured with this codec's options.
    pub fn writer(&self) -> HtmlWriter {
        HtmlWriter::new(self.write_options.clone())
    }

    /// Returns a reader bound to this codec's caches and font provider.
    pub fn reader(&self) -> HtmlReader<'_> {
        HtmlReader::new(self.fonts.as_ref(), &self.caches, &self.read_options)
    }

    /// Encodes `text` to markup.
    pub fn encode(&self, text: &StyledText) -> String {
        self.writer().encode(text)
    }

    /// Decodes `markup`; `defaults` fills keys no element sets.
    pub fn decode(&self, markup: &str, defaults: &AttributeSet) -> StyledText {
        self.reader().decode(markup, defaults)
    }

    /// Decodes `markup` and passes the diagnostics to `on_complete` before returning.
    pub fn decode_with<F>(&self, markup: &str, defaults: &AttributeSet, on_complete: F) -> StyledText
    where
        F: FnOnce(&ReadReport),
    {
        self.reader().decode_with(markup, defaults, on_complete)
    }

    /// Decodes `markup` and returns the diagnostics alongside the text.
    pub fn decode_with_report(&self, markup: &str, defaults: &AttributeSet) -> (StyledText, ReadReport) {
        self.reader().decode_with_report(markup, defaults)
    }

    /// Empties the style and font caches.
    pub fn clear_caches(&self) {
        log::debug!(
            "clearing {} cached styles and {} cached fonts",
            self.caches.styles.len(),
            self.caches.fonts.len()
        );
        self.caches.clear();
    }

    /// Encodes every text in parallel.
    pub fn encode_all(&self, texts: &[StyledText]) -> Vec<String> {
        let writer = self.writer();
        texts.par_iter().map(|text| writer.encode(text)).collect()
    }

    /// Decodes every markup string in parallel, sharing the caches.
    pub fn decode_all<S>(&self, markups: &[S], defaults: &AttributeSet) -> Vec<StyledText>
    where
        S: AsRef<str> + Sync,
    {
        markups
            .par_iter()
            .map(|markup| self.decode(markup.as_ref(), defaults))
            .collect()
    }
}
