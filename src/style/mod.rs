//! Mapping between attribute sets and inline style declarations.
//!
//! Every [`AttributeKey`] except [`AttributeKey::Link`] (carried by `href`)
//! maps to at least one [`CssProperty`], and every property maps back to the
//! keys it populates. Declarations are written as `property: value` fragments
//! and joined by the HTML writer.

pub mod color;
pub mod font;

use crate::font::{FontDescriptor, FontResolver};
use crate::model::{AttributeKey, AttributeSet, LineStyle};
use crate::options::WriteOptions;
use self::color::{parse_color, write_color};
use self::font::{parse_font_shorthand, parse_font_size, unquote, write_font, DEFAULT_FONT_SIZE};

/// Prefix of the non-standard declarations.
pub const VENDOR_PREFIX: &str = "-x-";

/// Style properties understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CssProperty {
    BackgroundColor,
    Color,
    TextDecoration,
    Underline,
    UnderlineColor,
    Strikethrough,
    StrikethroughColor,
    Font,
    FontPostscriptName,
    FontUiUsage,
    VerticalAlign,
    /// Read-only longhands accepted from foreign markup.
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
}

impl CssProperty {
    pub const ALL: [CssProperty; 15] = [
        CssProperty::BackgroundColor,
        CssProperty::Color,
        CssProperty::TextDecoration,
        CssProperty::Underline,
        CssProperty::UnderlineColor,
        CssProperty::Strikethrough,
        CssProperty::StrikethroughColor,
        CssProperty::Font,
        CssProperty::FontPostscriptName,
        CssProperty::FontUiUsage,
        CssProperty::VerticalAlign,
        CssProperty::FontFamily,
        CssProperty::FontSize,
        CssProperty::FontWeight,
        CssProperty::FontStyle,
    ];

    /// Property name as written in markup.
    pub fn name(self) -> &'static str {
        match self {
            CssProperty::BackgroundColor => "background-color",
            CssProperty::Color => "color",
            CssProperty::TextDecoration => "text-decoration",
            CssProperty::Underline => "-x-underline",
            CssProperty::UnderlineColor => "-x-underline-color",
            CssProperty::Strikethrough => "-x-strikethrough",
            CssProperty::StrikethroughColor => "-x-strikethrough-color",
            CssProperty::Font => "font",
            CssProperty::FontPostscriptName => "-x-font-postscriptname",
            CssProperty::FontUiUsage => "-x-font-uiusage",
            CssProperty::VerticalAlign => "vertical-align",
            CssProperty::FontFamily => "font-family",
            CssProperty::FontSize => "font-size",
            CssProperty::FontWeight => "font-weight",
            CssProperty::FontStyle => "font-style",
        }
    }

    /// Looks up a property by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|property| property.name().eq_ignore_ascii_case(name))
    }

    /// Returns true for `-x-*` properties.
    pub fn is_vendor(self) -> bool {
        self.name().starts_with(VENDOR_PREFIX)
    }

    /// Attribute keys this property populates when read.
    pub fn keys(self) -> &'static [AttributeKey] {
        match self {
            CssProperty::BackgroundColor => &[AttributeKey::BackgroundColor],
            CssProperty::Color => &[AttributeKey::ForegroundColor],
            CssProperty::TextDecoration => &[
                AttributeKey::UnderlineStyle,
                AttributeKey::StrikethroughStyle,
            ],
            CssProperty::Underline => &[AttributeKey::UnderlineStyle],
            CssProperty::UnderlineColor => &[AttributeKey::UnderlineColor],
            CssProperty::Strikethrough => &[AttributeKey::StrikethroughStyle],
            CssProperty::StrikethroughColor => &[AttributeKey::StrikethroughColor],
            CssProperty::Font
            | CssProperty::FontPostscriptName
            | CssProperty::FontUiUsage
            | CssProperty::FontFamily
            | CssProperty::FontSize
            | CssProperty::FontWeight
            | CssProperty::FontStyle => &[AttributeKey::Font],
            CssProperty::VerticalAlign => &[AttributeKey::Superscript],
        }
    }
}

impl AttributeKey {
    /// Properties written for this key, in emission order.
    pub fn css_properties(self) -> &'static [CssProperty] {
        match self {
            AttributeKey::BackgroundColor => &[CssProperty::BackgroundColor],
            AttributeKey::ForegroundColor => &[CssProperty::Color],
            AttributeKey::UnderlineStyle => &[CssProperty::TextDecoration, CssProperty::Underline],
            AttributeKey::UnderlineColor => &[CssProperty::UnderlineColor],
            AttributeKey::StrikethroughStyle => {
                &[CssProperty::TextDecoration, CssProperty::Strikethrough]
            }
            AttributeKey::StrikethroughColor => &[CssProperty::StrikethroughColor],
            AttributeKey::Font => &[
                CssProperty::Font,
                CssProperty::FontPostscriptName,
                CssProperty::FontUiUsage,
            ],
            AttributeKey::Superscript => &[CssProperty::VerticalAlign],
            AttributeKey::Link => &[],
        }
    }
}

/// The attributes decoded from one style string.
///
/// Diagnostic counts travel with the attributes so a cached entry reports
/// the same problems as a fresh parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStyle {
    pub attributes: AttributeSet,
    /// Declarations naming a property outside [`CssProperty`]
    pub unknown_properties: usize,
    /// Declarations with a known property but an unreadable value
    pub dropped_declarations: usize,
}

/// Writes the declarations for every style-bearing attribute in `attributes`.
pub fn write_declarations(attributes: &AttributeSet, options: &WriteOptions) -> Vec<String> {
    let vendor = options.vendor_extensions;
    let mut declarations = Vec::new();

    for key in attributes.keys() {
        match key {
            AttributeKey::BackgroundColor => {
                if let Some(ref color) = attributes.background_color {
                    declarations.push(format!("background-color: {}", write_color(color)));
                }
            }
            AttributeKey::ForegroundColor => {
                if let Some(ref color) = attributes.foreground_color {
                    declarations.push(format!("color: {}", write_color(color)));
                }
            }
            AttributeKey::UnderlineStyle | AttributeKey::StrikethroughStyle => {
                let (style, decoration, property) = if key == AttributeKey::UnderlineStyle {
                    (attributes.underline_style, "underline", CssProperty::Underline)
                } else {
                    (
                        attributes.strikethrough_style,
                        "line-through",
                        CssProperty::Strikethrough,
                    )
                };
                let Some(style) = style else { continue };
                match style.css_name() {
                    Some(name) => {
                        declarations.push(format!("text-decoration: {}", decoration));
                        if vendor {
                            declarations.push(format!("{}: {}", property.name(), name));
                        }
                    }
                    None => log::debug!("skipping {} with unmapped style {:#x}", key, style.0),
                }
            }
            AttributeKey::UnderlineColor | AttributeKey::StrikethroughColor => {
                let (color, property) = if key == AttributeKey::UnderlineColor {
                    (attributes.underline_color, CssProperty::UnderlineColor)
                } else {
                    (attributes.strikethrough_color, CssProperty::StrikethroughColor)
                };
                if let (Some(color), true) = (color, vendor) {
                    declarations.push(format!("{}: {}", property.name(), write_color(&color)));
                }
            }
            AttributeKey::Font => {
                if let Some(ref font) = attributes.font {
                    declarations.extend(write_font(font, vendor));
                }
            }
            AttributeKey::Superscript => {
                if let Some(level) = attributes.superscript {
                    let value = match level.signum() {
                        1 => "super",
                        -1 => "sub",
                        _ => "baseline",
                    };
                    declarations.push(format!("vertical-align: {}", value));
                }
            }
            AttributeKey::Link => {}
        }
    }
    declarations
}

/// Font-related values collected across declarations before resolution.
#[derive(Default)]
struct PendingFont {
    seen: bool,
    family: Option<String>,
    postscript_name: Option<String>,
    bold: bool,
    italic: bool,
    size: Option<f32>,
    ui_usage: Option<String>,
}

impl PendingFont {
    fn into_descriptor(self) -> Option<FontDescriptor> {
        if !self.seen {
            return None;
        }
        Some(FontDescriptor {
            family: self.family.unwrap_or_default(),
            postscript_name: self.postscript_name,
            bold: self.bold,
            italic: self.italic,
            size: self.size.unwrap_or(DEFAULT_FONT_SIZE),
            ui_usage: self.ui_usage,
        })
    }
}

/// Parses a style attribute value such as `color: rgba(255, 0, 0, 1.000000); font: 12px "Times"`.
///
/// Unknown properties and unreadable values are counted and skipped.
pub fn parse_style(declarations: &str, fonts: &FontResolver<'_>) -> ParsedStyle {
    let mut parsed = ParsedStyle::default();
    let mut pending_font = PendingFont::default();
    let mut decorated_underline = false;
    let mut decorated_strikethrough = false;
    let attributes = &mut parsed.attributes;

    for declaration in split_declarations(declarations) {
        let Some((name, value)) = declaration.split_once(':') else {
            log::debug!("dropping declaration without a value: {:?}", declaration);
            parsed.dropped_declarations += 1;
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        let Some(property) = CssProperty::from_name(name) else {
            log::debug!("ignoring unknown property {:?}", name);
            parsed.unknown_properties += 1;
            continue;
        };

        let accepted = match property {
            CssProperty::BackgroundColor => {
                set(&mut attributes.background_color, parse_color(value))
            }
            CssProperty::Color => set(&mut attributes.foreground_color, parse_color(value)),
            CssProperty::UnderlineColor => set(&mut attributes.underline_color, parse_color(value)),
            CssProperty::StrikethroughColor => {
                set(&mut attributes.strikethrough_color, parse_color(value))
            }
            CssProperty::TextDecoration => {
                let mut recognized = false;
                for token in value.split_whitespace() {
                    match token.to_ascii_lowercase().as_str() {
                        "underline" => decorated_underline = true,
                        "line-through" => decorated_strikethrough = true,
                        "none" => {}
                        _ => continue,
                    }
                    recognized = true;
                }
                recognized
            }
            CssProperty::Underline => set(&mut attributes.underline_style, parse_line_style(value)),
            CssProperty::Strikethrough => {
                set(&mut attributes.strikethrough_style, parse_line_style(value))
            }
            CssProperty::VerticalAlign => {
                let level = match value.to_ascii_lowercase().as_str() {
                    "super" => Some(1),
                    "sub" => Some(-1),
                    "baseline" => Some(0),
                    _ => None,
                };
                set(&mut attributes.superscript, level)
            }
            CssProperty::Font => match parse_font_shorthand(value) {
                Some(shorthand) => {
                    pending_font.bold = shorthand.bold;
                    pending_font.italic = shorthand.italic;
                    if shorthand.size.is_some() {
                        pending_font.size = shorthand.size;
                    }
                    if shorthand.family.is_some() {
                        pending_font.family = shorthand.family;
                    }
                    true
                }
                None => false,
            },
            CssProperty::FontPostscriptName => {
                set(&mut pending_font.postscript_name, non_empty(&unquote(value)))
            }
            CssProperty::FontUiUsage => set(&mut pending_font.ui_usage, non_empty(&unquote(value))),
            CssProperty::FontFamily => {
                let first = value
                    .split(',')
                    .next()
                    .and_then(|family| non_empty(&unquote(family)));
                set(&mut pending_font.family, first)
            }
            CssProperty::FontSize => set(&mut pending_font.size, parse_font_size(value)),
            CssProperty::FontWeight => {
                let bold = match value.to_ascii_lowercase().as_str() {
                    "bold" | "bolder" => Some(true),
                    "normal" | "lighter" => Some(false),
                    number => number.parse::<u16>().ok().map(|weight| weight >= 600),
                };
                bold.map(|bold| pending_font.bold = bold).is_some()
            }
            CssProperty::FontStyle => {
                let italic = match value.to_ascii_lowercase().as_str() {
                    "italic" | "oblique" => Some(true),
                    "normal" => Some(false),
                    _ => None,
                };
                italic.map(|italic| pending_font.italic = italic).is_some()
            }
        };

        if accepted {
            if property.keys().contains(&AttributeKey::Font) {
                pending_font.seen = true;
            }
        } else {
            log::debug!("dropping unreadable declaration {:?}", declaration);
            parsed.dropped_declarations += 1;
        }
    }

    if decorated_underline && attributes.underline_style.is_none() {
        attributes.underline_style = Some(LineStyle::SINGLE);
    }
    if decorated_strikethrough && attributes.strikethrough_style.is_none() {
        attributes.strikethrough_style = Some(LineStyle::SINGLE);
    }
    if let Some(descriptor) = pending_font.into_descriptor() {
        attributes.font = Some(fonts.resolve(&descriptor));
    }

    parsed
}

/// Stores `value` into `slot` when present; reports whether it was.
fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_line_style(value: &str) -> Option<LineStyle> {
    LineStyle::from_css_name(&unquote(value).to_ascii_lowercase())
}

/// Splits a style string on `;` outside of quotes, skipping blank pieces.
fn split_declarations(declarations: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (index, c) in declarations.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', Some(_)) => escaped = true,
            ('"' | '\'', None) => quote = Some(c),
            (c, Some(open)) if c == open => quote = None,
            (';', None) => {
                pieces.push(&declarations[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    pieces.push(&declarations[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontCatalog;
    use crate::model::{Color, Font};

    fn parse(declarations: &str) -> ParsedStyle {
        let catalog = FontCatalog::standard();
        parse_style(declarations, &FontResolver::new(&catalog, None))
    }

    #[test]
    fn test_mapping_is_total() {
        for key in AttributeKey::ALL {
            if key == AttributeKey::Link {
                assert!(key.css_properties().is_empty());
                continue;
            }
            assert!(!key.css_properties().is_empty(), "{} has no property", key);
            for property in key.css_properties() {
                assert!(property.keys().contains(&key), "{:?} does not map back", property);
            }
        }
        for property in CssProperty::ALL {
            assert!(!property.keys().is_empty());
            assert_eq!(CssProperty::from_name(property.name()), Some(property));
        }
    }

    #[test]
    fn test_vendor_properties() {
        assert!(CssProperty::Underline.is_vendor());
        assert!(CssProperty::FontPostscriptName.is_vendor());
        assert!(!CssProperty::TextDecoration.is_vendor());
        assert_eq!(CssProperty::from_name("COLOR"), Some(CssProperty::Color));
    }

    #[test]
    fn test_write_underline_and_colors() {
        let attributes = AttributeSet::new()
            .with_background_color(Color::BLUE)
            .with_underline(LineStyle::DOUBLE)
            .with_underline_color(Color::RED);
        assert_eq!(
            write_declarations(&attributes, &WriteOptions::default()),
            vec![
                "background-color: rgba(0, 0, 255, 1.000000)",
                "text-decoration: underline",
                "-x-underline: double",
                "-x-underline-color: rgba(255, 0, 0, 1.000000)",
            ]
        );
    }

    #[test]
    fn test_write_skips_unmapped_line_style() {
        let attributes = AttributeSet::new()
            .with_strikethrough(LineStyle(0x0200))
            .with_superscript(-2);
        assert_eq!(
            write_declarations(&attributes, &WriteOptions::default()),
            vec!["vertical-align: sub"]
        );
    }

    #[test]
    fn test_write_plain_css() {
        let attributes = AttributeSet::new()
            .with_strikethrough(LineStyle::THICK)
            .with_strikethrough_color(Color::RED)
            .with_font(Font::new("Courier", "Courier", 9.0));
        assert_eq!(
            write_declarations(&attributes, &WriteOptions::new().without_vendor_extensions()),
            vec!["text-decoration: line-through", "font: 9px \"Courier\""]
        );
    }

    #[test]
    fn test_write_ignores_link() {
        let url = url::Url::parse("https://example.com/").unwrap();
        let attributes = AttributeSet::new().with_link(url);
        assert!(write_declarations(&attributes, &WriteOptions::default()).is_empty());
    }

    #[test]
    fn test_parse_written_declarations() {
        let font = Font::new("Times", "Times-Bold", 18.0).bold(true);
        let attributes = AttributeSet::new()
            .with_foreground_color(Color::from_rgba8(10, 20, 30, 0.5))
            .with_underline(LineStyle::THICK)
            .with_strikethrough(LineStyle::SINGLE)
            .with_strikethrough_color(Color::BLUE)
            .with_font(font)
            .with_superscript(1);
        let declarations = write_declarations(&attributes, &WriteOptions::default()).join("; ");

        let parsed = parse(&declarations);
        assert_eq!(parsed.attributes, attributes);
        assert_eq!(parsed.unknown_properties, 0);
        assert_eq!(parsed.dropped_declarations, 0);
    }

    #[test]
    fn test_parse_bare_text_decoration() {
        let parsed = parse("text-decoration: underline line-through");
        assert_eq!(parsed.attributes.underline_style, Some(LineStyle::SINGLE));
        assert_eq!(parsed.attributes.strikethrough_style, Some(LineStyle::SINGLE));
    }

    #[test]
    fn test_parse_counts_problems() {
        let parsed = parse("color: nonsense; margin: 0; garbage; -x-underline: wavy; color: #0000ff");
        assert_eq!(parsed.unknown_properties, 1);
        assert_eq!(parsed.dropped_declarations, 3);
        assert_eq!(parsed.attributes.foreground_color, Some(Color::BLUE));
        assert_eq!(parsed.attributes.underline_style, None);
    }

    #[test]
    fn test_parse_font_longhands() {
        let parsed = parse("font-family: 'Courier', monospace; font-weight: 700; font-size: 10pt");
        let font = parsed.attributes.font.unwrap();
        assert_eq!(font.postscript_name, "Courier-Bold");
        assert_eq!(font.size, 10.0);
    }

    #[test]
    fn test_parse_postscript_name_only() {
        let parsed = parse("-x-font-postscriptname: \"Times-Italic\"");
        let font = parsed.attributes.font.unwrap();
        assert_eq!(font.family, "Times");
        assert!(font.italic);
        assert_eq!(font.size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_split_respects_quotes() {
        assert_eq!(
            split_declarations("font: 12px \"A;B\"; color: red;;"),
            vec!["font: 12px \"A;B\"", "color: red"]
        );
    }
}
