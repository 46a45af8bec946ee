//! Formatting attributes applied to ranges of text.

use super::{Color, Font};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// The closed set of formatting keys the codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeKey {
    BackgroundColor,
    ForegroundColor,
    UnderlineStyle,
    UnderlineColor,
    StrikethroughStyle,
    StrikethroughColor,
    Font,
    Link,
    Superscript,
}

impl AttributeKey {
    /// Every key, in declaration emission order.
    pub const ALL: [AttributeKey; 9] = [
        AttributeKey::BackgroundColor,
        AttributeKey::ForegroundColor,
        AttributeKey::UnderlineStyle,
        AttributeKey::UnderlineColor,
        AttributeKey::StrikethroughStyle,
        AttributeKey::StrikethroughColor,
        AttributeKey::Font,
        AttributeKey::Superscript,
        AttributeKey::Link,
    ];
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKey::BackgroundColor => "background-color",
            AttributeKey::ForegroundColor => "foreground-color",
            AttributeKey::UnderlineStyle => "underline-style",
            AttributeKey::UnderlineColor => "underline-color",
            AttributeKey::StrikethroughStyle => "strikethrough-style",
            AttributeKey::StrikethroughColor => "strikethrough-color",
            AttributeKey::Font => "font",
            AttributeKey::Link => "link",
            AttributeKey::Superscript => "superscript",
        };
        f.write_str(name)
    }
}

/// A platform underline/strikethrough style code.
///
/// The raw value is kept as-is; only [`LineStyle::SINGLE`], [`LineStyle::THICK`]
/// and [`LineStyle::DOUBLE`] have a markup representation. Other codes (pattern
/// or by-word flags) are skipped when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineStyle(pub i64);

impl LineStyle {
    pub const SINGLE: LineStyle = LineStyle(0x01);
    pub const THICK: LineStyle = LineStyle(0x02);
    pub const DOUBLE: LineStyle = LineStyle(0x09);

    /// Markup name of this style, if it has one.
    pub fn css_name(self) -> Option<&'static str> {
        match self {
            LineStyle::SINGLE => Some("single"),
            LineStyle::DOUBLE => Some("double"),
            LineStyle::THICK => Some("thick"),
            _ => None,
        }
    }

    /// Parses a markup name back into a style.
    pub fn from_css_name(name: &str) -> Option<Self> {
        match name {
            "single" => Some(LineStyle::SINGLE),
            "double" => Some(LineStyle::DOUBLE),
            "thick" => Some(LineStyle::THICK),
            _ => None,
        }
    }
}

/// A set of formatting attributes. `None` means "inherit/default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline_style: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough_style: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Url>,
    /// Baseline offset level: positive raises, negative lowers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superscript: Option<i32>,
}

impl AttributeSet {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_foreground_color(mut self, color: Color) -> Self {
        self.foreground_color = Some(color);
        self
    }

    pub fn with_underline(mut self, style: LineStyle) -> Self {
        self.underline_style = Some(style);
        self
    }

    pub fn with_underline_color(mut self, color: Color) -> Self {
        self.underline_color = Some(color);
        self
    }

    pub fn with_strikethrough(mut self, style: LineStyle) -> Self {
        self.strikethrough_style = Some(style);
        self
    }

    pub fn with_strikethrough_color(mut self, color: Color) -> Self {
        self.strikethrough_color = Some(color);
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_link(mut self, url: Url) -> Self {
        self.link = Some(url);
        self
    }

    pub fn with_superscript(mut self, level: i32) -> Self {
        self.superscript = Some(level);
        self
    }

    /// Returns true if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.keys().next().is_none()
    }

    /// Returns true if the attribute for `key` is set.
    pub fn contains(&self, key: AttributeKey) -> bool {
        match key {
            AttributeKey::BackgroundColor => self.background_color.is_some(),
            AttributeKey::ForegroundColor => self.foreground_color.is_some(),
            AttributeKey::UnderlineStyle => self.underline_style.is_some(),
            AttributeKey::UnderlineColor => self.underline_color.is_some(),
            AttributeKey::StrikethroughStyle => self.strikethrough_style.is_some(),
            AttributeKey::StrikethroughColor => self.strikethrough_color.is_some(),
            AttributeKey::Font => self.font.is_some(),
            AttributeKey::Link => self.link.is_some(),
            AttributeKey::Superscript => self.superscript.is_some(),
        }
    }

    /// Iterates over the keys that are set, in [`AttributeKey::ALL`] order.
    pub fn keys(&self) -> impl Iterator<Item = AttributeKey> + '_ {
        AttributeKey::ALL
            .into_iter()
            .filter(move |key| self.contains(*key))
    }

    /// Clears the attribute for `key`.
    pub fn remove(&mut self, key: AttributeKey) {
        match key {
            AttributeKey::BackgroundColor => self.background_color = None,
            AttributeKey::ForegroundColor => self.foreground_color = None,
            AttributeKey::UnderlineStyle => self.underline_style = None,
            AttributeKey::UnderlineColor => self.underline_color = None,
            AttributeKey::StrikethroughStyle => self.strikethrough_style = None,
            AttributeKey::StrikethroughColor => self.strikethrough_color = None,
            AttributeKey::Font => self.font = None,
            AttributeKey::Link => self.link = None,
            AttributeKey::Superscript => self.superscript = None,
        }
    }

    /// Copies every attribute set in `other` over this set (`other` wins per key).
    pub fn overlay(&mut self, other: &AttributeSet) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }

        take(&mut self.background_color, &other.background_color);
        take(&mut self.foreground_color, &other.foreground_color);
        take(&mut self.underline_style, &other.underline_style);
        take(&mut self.underline_color, &other.underline_color);
        take(&mut self.strikethrough_style, &other.strikethrough_style);
        take(&mut self.strikethrough_color, &other.strikethrough_color);
        take(&mut self.font, &other.font);
        take(&mut self.link, &other.link);
        take(&mut self.superscript, &other.superscript);
    }

    /// Returns this set overlaid with `other`.
    pub fn merged(&self, other: &AttributeSet) -> AttributeSet {
        let mut merged = self.clone();
        merged.overlay(other);
        merged
    }

    /// Returns the attributes set to the same value in both sets.
    pub fn intersection(&self, other: &AttributeSet) -> AttributeSet {
        fn keep<T: Clone + PartialEq>(a: &Option<T>, b: &Option<T>) -> Option<T> {
            match (a, b) {
                (Some(a), Some(b)) if a == b => Some(a.clone()),
                _ => None,
            }
        }

        AttributeSet {
            background_color: keep(&self.background_color, &other.background_color),
            foreground_color: keep(&self.foreground_color, &other.foreground_color),
            underline_style: keep(&self.underline_style, &other.underline_style),
            underline_color: keep(&self.underline_color, &other.underline_color),
            strikethrough_style: keep(&self.strikethrough_style, &other.strikethrough_style),
            strikethrough_color: keep(&self.strikethrough_color, &other.strikethrough_color),
            font: keep(&self.font, &other.font),
            link: keep(&self.link, &other.link),
            superscript: keep(&self.superscript, &other.superscript),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        let set = AttributeSet::new();
        assert!(set.is_empty());
        assert_eq!(set.keys().count(), 0);
    }

    #[test]
    fn test_keys_follow_emission_order() {
        let set = AttributeSet::new()
            .with_superscript(1)
            .with_foreground_color(Color::RED)
            .with_background_color(Color::BLUE);
        let keys: Vec<_> = set.keys().collect();
        assert_eq!(
            keys,
            vec![
                AttributeKey::BackgroundColor,
                AttributeKey::ForegroundColor,
                AttributeKey::Superscript
            ]
        );
    }

    #[test]
    fn test_overlay_inner_wins() {
        let outer = AttributeSet::new()
            .with_foreground_color(Color::RED)
            .with_underline(LineStyle::SINGLE);
        let inner = AttributeSet::new().with_foreground_color(Color::BLUE);

        let merged = outer.merged(&inner);
        assert_eq!(merged.foreground_color, Some(Color::BLUE));
        assert_eq!(merged.underline_style, Some(LineStyle::SINGLE));
    }

    #[test]
    fn test_intersection_keeps_equal_values() {
        let left = AttributeSet::new()
            .with_foreground_color(Color::RED)
            .with_underline(LineStyle::SINGLE)
            .with_superscript(1);
        let right = AttributeSet::new()
            .with_foreground_color(Color::RED)
            .with_underline(LineStyle::DOUBLE);

        let shared = left.intersection(&right);
        assert_eq!(shared, AttributeSet::new().with_foreground_color(Color::RED));
        assert_eq!(right.intersection(&left), shared);
    }

    #[test]
    fn test_remove() {
        let mut set = AttributeSet::new().with_superscript(-1);
        assert!(set.contains(AttributeKey::Superscript));
        set.remove(AttributeKey::Superscript);
        assert!(set.is_empty());
    }

    #[test]
    fn test_line_style_names() {
        assert_eq!(LineStyle::DOUBLE.css_name(), Some("double"));
        assert_eq!(LineStyle::from_css_name("thick"), Some(LineStyle::THICK));
        assert_eq!(LineStyle(0x0201).css_name(), None);
        assert_eq!(LineStyle::from_css_name("wavy"), None);
    }
}
