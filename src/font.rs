//! Font resolution for decoding.
//!
//! Markup only carries a font *description* (family, PostScript name, traits,
//! size). Turning that into a concrete [`Font`] goes through a [`FontProvider`],
//! the platform's font enumeration, in this order:
//!
//! 1. exact PostScript name,
//! 2. family name with matching bold/italic traits,
//! 3. the provider's system font at the requested size.
//!
//! Results are memoized per descriptor in a [`FontCache`].

use crate::cache::FontCache;
use crate::model::Font;
use std::hash::{Hash, Hasher};

/// Normalized font description read from markup.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    /// Family name, empty when the markup named none
    pub family: String,
    /// PostScript name of the requested face
    pub postscript_name: Option<String>,
    /// Bold trait
    pub bold: bool,
    /// Italic trait
    pub italic: bool,
    /// Point size
    pub size: f32,
    /// Platform usage hint
    pub ui_usage: Option<String>,
}

impl PartialEq for FontDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.postscript_name == other.postscript_name
            && self.bold == other.bold
            && self.italic == other.italic
            && self.size.to_bits() == other.size.to_bits()
            && self.ui_usage == other.ui_usage
    }
}

impl Eq for FontDescriptor {}

impl Hash for FontDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.postscript_name.hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.size.to_bits().hash(state);
        self.ui_usage.hash(state);
    }
}

/// Platform font enumeration.
pub trait FontProvider: Send + Sync {
    /// Looks up a face by its exact PostScript name.
    fn font_by_postscript_name(&self, name: &str, size: f32) -> Option<Font>;

    /// Looks up a face of `family` with exactly the given traits.
    fn font_by_family(&self, family: &str, bold: bool, italic: bool, size: f32) -> Option<Font>;

    /// The default font at `size`.
    fn system_font(&self, size: f32) -> Font;
}

/// An in-memory list of known faces.
#[derive(Debug, Clone)]
pub struct FontCatalog {
    faces: Vec<Font>,
    system: Font,
}

impl FontCatalog {
    /// Creates an empty catalog whose system font is `system`.
    pub fn new(system: Font) -> Self {
        Self {
            faces: vec![system.clone()],
            system,
        }
    }

    /// Catalog of the Helvetica, Times and Courier families; Helvetica is the
    /// system font.
    pub fn standard() -> Self {
        let mut catalog = Self::new(Font::new("Helvetica", "Helvetica", 12.0));
        for (family, faces) in [
            (
                "Helvetica",
                [
                    "Helvetica",
                    "Helvetica-Bold",
                    "Helvetica-Oblique",
                    "Helvetica-BoldOblique",
                ],
            ),
            (
                "Times",
                [
                    "Times-Roman",
                    "Times-Bold",
                    "Times-Italic",
                    "Times-BoldItalic",
                ],
            ),
            (
                "Courier",
                [
                    "Courier",
                    "Courier-Bold",
                    "Courier-Oblique",
                    "Courier-BoldOblique",
                ],
            ),
        ] {
            let [regular, bold, italic, bold_italic] = faces;
            catalog.register(Font::new(family, regular, 12.0));
            catalog.register(Font::new(family, bold, 12.0).bold(true));
            catalog.register(Font::new(family, italic, 12.0).italic(true));
            catalog.register(Font::new(family, bold_italic, 12.0).bold(true).italic(true));
        }
        catalog
    }

    /// Adds a face. Faces with an already registered PostScript name are ignored.
    pub fn register(&mut self, face: Font) {
        if self
            .faces
            .iter()
            .all(|known| known.postscript_name != face.postscript_name)
        {
            self.faces.push(face);
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_face(mut self, face: Font) -> Self {
        self.register(face);
        self
    }

    /// Iterates over registered faces.
    pub fn faces(&self) -> impl Iterator<Item = &Font> {
        self.faces.iter()
    }
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl FontProvider for FontCatalog {
    fn font_by_postscript_name(&self, name: &str, size: f32) -> Option<Font> {
        self.faces
            .iter()
            .find(|face| face.postscript_name == name)
            .map(|face| face.with_size(size))
    }

    fn font_by_family(&self, family: &str, bold: bool, italic: bool, size: f32) -> Option<Font> {
        let requested = normalize_family(family);
        self.faces
            .iter()
            .find(|face| {
                normalize_family(&face.family) == requested
                    && face.bold == bold
                    && face.italic == italic
            })
            .map(|face| face.with_size(size))
    }

    fn system_font(&self, size: f32) -> Font {
        self.system.with_size(size)
    }
}

fn normalize_family(family: &str) -> String {
    family.trim().to_ascii_lowercase()
}

/// Resolves descriptors to fonts, memoizing through an optional cache.
pub struct FontResolver<'a> {
    provider: &'a dyn FontProvider,
    cache: Option<&'a FontCache>,
}

impl<'a> FontResolver<'a> {
    /// Creates a resolver; pass `None` to always query the provider.
    pub fn new(provider: &'a dyn FontProvider, cache: Option<&'a FontCache>) -> Self {
        Self { provider, cache }
    }

    /// Resolves `descriptor`, consulting the cache first.
    pub fn resolve(&self, descriptor: &FontDescriptor) -> Font {
        match self.cache {
            Some(cache) => cache.get_or_insert_with(descriptor.clone(), || self.lookup(descriptor)),
            None => self.lookup(descriptor),
        }
    }

    fn lookup(&self, descriptor: &FontDescriptor) -> Font {
        log::trace!("resolving font {:?}", descriptor);

        let found = descriptor
            .postscript_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .and_then(|name| self.provider.font_by_postscript_name(name, descriptor.size))
            .or_else(|| {
                if descriptor.family.is_empty() {
                    return None;
                }
                self.provider.font_by_family(
                    &descriptor.family,
                    descriptor.bold,
                    descriptor.italic,
                    descriptor.size,
                )
            });

        let mut font = found.unwrap_or_else(|| {
            log::debug!(
                "no face for family {:?} / {:?}; using system font",
                descriptor.family,
                descriptor.postscript_name
            );
            self.provider.system_font(descriptor.size)
        });

        if font.ui_usage.is_none() {
            font.ui_usage = descriptor.ui_usage.clone();
        }
        font
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn descriptor(family: &str, ps: Option<&str>, bold: bool, italic: bool) -> FontDescriptor {
        FontDescriptor {
            family: family.to_string(),
            postscript_name: ps.map(str::to_string),
            bold,
            italic,
            size: 14.0,
            ui_usage: None,
        }
    }

    #[test]
    fn test_postscript_name_wins() {
        let catalog = FontCatalog::standard();
        let resolver = FontResolver::new(&catalog, None);
        let font = resolver.resolve(&descriptor("Times", Some("Courier-Bold"), false, false));
        assert_eq!(font.postscript_name, "Courier-Bold");
        assert!(font.bold);
        assert_eq!(font.size, 14.0);
    }

    #[test]
    fn test_family_and_traits() {
        let catalog = FontCatalog::standard();
        let resolver = FontResolver::new(&catalog, None);
        let font = resolver.resolve(&descriptor("times", Some("Missing-Face"), true, true));
        assert_eq!(font.postscript_name, "Times-BoldItalic");
    }

    #[test]
    fn test_falls_back_to_system_font() {
        let catalog = FontCatalog::standard();
        let resolver = FontResolver::new(&catalog, None);
        let font = resolver.resolve(&descriptor("Comic Sans", None, false, false));
        assert_eq!(font.family, "Helvetica");
        assert_eq!(font.size, 14.0);
    }

    #[test]
    fn test_ui_usage_is_carried() {
        let catalog = FontCatalog::standard();
        let resolver = FontResolver::new(&catalog, None);
        let mut request = descriptor("Helvetica", Some("Helvetica"), false, false);
        request.ui_usage = Some("CTFontRegularUsage".to_string());
        let font = resolver.resolve(&request);
        assert_eq!(font.ui_usage.as_deref(), Some("CTFontRegularUsage"));
    }

    struct CountingProvider {
        inner: FontCatalog,
        lookups: AtomicUsize,
    }

    impl FontProvider for CountingProvider {
        fn font_by_postscript_name(&self, name: &str, size: f32) -> Option<Font> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.font_by_postscript_name(name, size)
        }

        fn font_by_family(&self, family: &str, bold: bool, italic: bool, size: f32) -> Option<Font> {
            self.inner.font_by_family(family, bold, italic, size)
        }

        fn system_font(&self, size: f32) -> Font {
            self.inner.system_font(size)
        }
    }

    #[test]
    fn test_resolution_is_cached() {
        let provider = CountingProvider {
            inner: FontCatalog::standard(),
            lookups: AtomicUsize::new(0),
        };
        let cache = FontCache::new();
        let resolver = FontResolver::new(&provider, Some(&cache));
        let request = descriptor("Helvetica", Some("Helvetica-Bold"), true, false);

        let first = resolver.resolve(&request);
        let second = resolver.resolve(&request);
        assert_eq!(first, second);
        assert_eq!(provider.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        resolver.resolve(&request);
        assert_eq!(provider.lookups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_catalog_ignores_duplicate_postscript_names() {
        let catalog = FontCatalog::standard().with_face(Font::new("Other", "Helvetica", 9.0));
        let helveticas = catalog
            .faces()
            .filter(|f| f.postscript_name == "Helvetica")
            .count();
        assert_eq!(helveticas, 1);
    }
}
