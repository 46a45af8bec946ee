//! Font declaration values.
//!
//! A font is written as a composite `font:` shorthand (traits, size, quoted
//! family) followed by vendor declarations for the PostScript name and the
//! optional platform usage hint:
//!
//! ```text
//! font: bold italic 14px "Helvetica"; -x-font-postscriptname: "Helvetica-BoldOblique"
//! ```

use crate::model::Font;
use std::borrow::Cow;

/// Point size used when markup names a font without a size.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// The parts of a `font:` shorthand value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontShorthand {
    pub bold: bool,
    pub italic: bool,
    pub size: Option<f32>,
    pub family: Option<String>,
}

/// Writes the declarations describing `font`.
pub fn write_font(font: &Font, vendor_extensions: bool) -> Vec<String> {
    let mut shorthand = String::from("font: ");
    if font.bold {
        shorthand.push_str("bold ");
    }
    if font.italic {
        shorthand.push_str("italic ");
    }
    shorthand.push_str(&format!("{}px {}", font.size, quote(&font.family)));

    let mut declarations = vec![shorthand];
    if vendor_extensions {
        declarations.push(format!(
            "-x-font-postscriptname: {}",
            quote(&font.postscript_name)
        ));
        if let Some(ref usage) = font.ui_usage {
            declarations.push(format!("-x-font-uiusage: {}", quote(usage)));
        }
    }
    declarations
}

/// Wraps `value` in double quotes, escaping `"` and `\\`.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Parses a `font:` shorthand value such as `bold 14px "Helvetica Neue"`.
///
/// Returns `None` if nothing in the value was recognized.
pub fn parse_font_shorthand(value: &str) -> Option<FontShorthand> {
    let value = value.trim();
    let mut shorthand = FontShorthand::default();

    let (prefix, quoted_family) = match value.find(['"', '\'']) {
        Some(quote_pos) => (
            &value[..quote_pos],
            Some(unquote(&value[quote_pos..]).into_owned()),
        ),
        None => (value, None),
    };

    let mut trailing_family = Vec::new();
    for token in prefix.split_whitespace() {
        if shorthand.size.is_some() {
            trailing_family.push(token);
            continue;
        }
        match token.to_ascii_lowercase().as_str() {
            "bold" | "bolder" => shorthand.bold = true,
            "italic" | "oblique" => shorthand.italic = true,
            "normal" | "lighter" => {}
            other => {
                if let Ok(weight) = other.parse::<u16>() {
                    shorthand.bold = weight >= 600;
                } else if let Some(size) = parse_font_size(other) {
                    shorthand.size = Some(size);
                } else {
                    trailing_family.push(token);
                }
            }
        }
    }

    shorthand.family = quoted_family.or_else(|| {
        let joined = trailing_family.join(" ");
        let first = joined.split(',').next().unwrap_or("").trim();
        (!first.is_empty()).then(|| first.to_string())
    });

    if shorthand == FontShorthand::default() {
        None
    } else {
        Some(shorthand)
    }
}

/// Parses a font size such as `14px`, `10.5pt` or `14px/1.2`.
pub fn parse_font_size(value: &str) -> Option<f32> {
    let value = value.split('/').next()?.trim().to_ascii_lowercase();
    let number = value
        .strip_suffix("px")
        .or_else(|| value.strip_suffix("pt"))?;
    number.parse::<f32>().ok().filter(|size| *size > 0.0)
}

/// Strips one layer of matching single or double quotes, resolving `\\`
/// escapes inside them.
pub fn unquote(value: &str) -> Cow<'_, str> {
    let value = value.trim();
    let Some(open) = value.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
        return Cow::Borrowed(value);
    };
    let rest = &value[1..];
    if !rest.contains('\\') {
        return Cow::Borrowed(rest.find(open).map_or(rest, |end| &rest[..end]));
    }

    let mut unquoted = String::with_capacity(rest.len());
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    unquoted.push(escaped);
                }
            }
            c if c == open => break,
            c => unquoted.push(c),
        }
    }
    Cow::Owned(unquoted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bold_italic() {
        let font = Font::new("Helvetica", "Helvetica-BoldOblique", 14.0)
            .bold(true)
            .italic(true);
        assert_eq!(
            write_font(&font, true),
            vec![
                "font: bold italic 14px \"Helvetica\"".to_string(),
                "-x-font-postscriptname: \"Helvetica-BoldOblique\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_write_compact_size_and_usage() {
        let font = Font::new("System", ".SFUI-Regular", 10.5).with_ui_usage("CTFontRegularUsage");
        let declarations = write_font(&font, true);
        assert_eq!(declarations[0], "font: 10.5px \"System\"");
        assert_eq!(declarations[2], "-x-font-uiusage: \"CTFontRegularUsage\"");
    }

    #[test]
    fn test_write_without_vendor_extensions() {
        let font = Font::new("Times", "Times-Roman", 12.0);
        assert_eq!(write_font(&font, false), vec!["font: 12px \"Times\""]);
    }

    #[test]
    fn test_parse_written_shorthand() {
        let parsed = parse_font_shorthand("bold italic 14px \"Helvetica Neue\"").unwrap();
        assert!(parsed.bold);
        assert!(parsed.italic);
        assert_eq!(parsed.size, Some(14.0));
        assert_eq!(parsed.family.as_deref(), Some("Helvetica Neue"));
    }

    #[test]
    fn test_parse_unquoted_family_list() {
        let parsed = parse_font_shorthand("700 12pt/1.5 Georgia, serif").unwrap();
        assert!(parsed.bold);
        assert_eq!(parsed.size, Some(12.0));
        assert_eq!(parsed.family.as_deref(), Some("Georgia"));
    }

    #[test]
    fn test_parse_nothing_recognized() {
        assert_eq!(parse_font_shorthand(""), None);
        assert_eq!(parse_font_shorthand("normal"), None);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"Helvetica\""), "Helvetica");
        assert_eq!(unquote("'Times'"), "Times");
        assert_eq!(unquote("\"open"), "open");
        assert_eq!(unquote("bare"), "bare");
        assert_eq!(unquote(r#""My \"Q\" Face" trailing"#), "My \"Q\" Face");
        assert_eq!(unquote(r#""back\\slash""#), "back\\slash");
    }

    #[test]
    fn test_quoted_names_are_escaped() {
        let font = Font::new("My \"Q\" Face", "Q\\Face", 12.0);
        assert_eq!(
            write_font(&font, true),
            vec![
                r#"font: 12px "My \"Q\" Face""#.to_string(),
                r#"-x-font-postscriptname: "Q\\Face""#.to_string(),
            ]
        );
        let parsed = parse_font_shorthand(r#"12px "My \"Q\" Face""#).unwrap();
        assert_eq!(parsed.family.as_deref(), Some("My \"Q\" Face"));
    }
}
