//! Encoding and decoding options.

/// Options for encoding styled text to markup.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to emit the `-x-*` vendor declarations.
    ///
    /// Without them the output is plain CSS: line styles decode as `single`
    /// and fonts resolve by family and traits only.
    pub vendor_extensions: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            vendor_extensions: true,
        }
    }
}

impl WriteOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits plain CSS only.
    pub fn without_vendor_extensions(mut self) -> Self {
        self.vendor_extensions = false;
        self
    }
}

/// Options for decoding markup to styled text.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Maximum element nesting depth.
    /// Elements opened deeper than this keep their content but lose their styling.
    pub max_nesting_depth: usize,

    /// Whether `<br>` inserts a line feed.
    pub line_breaks: bool,

    /// Whether to consult and fill the shared style and font caches.
    pub use_caches: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: 256,
            line_breaks: true,
            use_caches: true,
        }
    }
}

impl ReadOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum element nesting depth.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Ignores `<br>` elements.
    pub fn without_line_breaks(mut self) -> Self {
        self.line_breaks = false;
        self
    }

    /// Bypasses the shared caches.
    pub fn uncached(mut self) -> Self {
        self.use_caches = false;
        self
    }
}
