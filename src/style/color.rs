//! Color declaration values.
//!
//! Colors are written as `rgba(R, G, B, A)` with integer channels and a
//! six-decimal alpha. Reading also accepts `rgb()`, hex codes and a handful of
//! named colors, which shows up in markup this crate did not produce.

use crate::model::Color;
use regex::Regex;
use std::sync::LazyLock;

static RE_RGBA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d*\.?\d+)\s*)?\)$",
    )
    .unwrap()
});

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
];

/// Formats a color as `rgba(R, G, B, A)`.
pub fn write_color(color: &Color) -> String {
    let (red, green, blue) = color.to_rgb8();
    format!("rgba({}, {}, {}, {:.6})", red, green, blue, color.alpha)
}

/// Parses a color value, returning `None` when it is not understood.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();

    if let Some(caps) = RE_RGBA.captures(value) {
        let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
        let alpha = match caps.get(4) {
            Some(m) => m.as_str().parse::<f32>().ok()?,
            None => 1.0,
        };
        return Some(Color::from_rgba8(channel(1)?, channel(2)?, channel(3)?, alpha));
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    if value.eq_ignore_ascii_case("transparent") {
        return Some(Color::new(0.0, 0.0, 0.0, 0.0));
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| value.eq_ignore_ascii_case(name))
        .map(|(_, (r, g, b))| Color::from_rgba8(*r, *g, *b, 1.0))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 => {
            let expand = |i: usize| byte(&hex[i..=i].repeat(2));
            Some(Color::from_rgba8(expand(0)?, expand(1)?, expand(2)?, 1.0))
        }
        6 | 8 => {
            let alpha = if hex.len() == 8 {
                byte(&hex[6..8])? as f32 / 255.0
            } else {
                1.0
            };
            Some(Color::from_rgba8(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                alpha,
            ))
        }
        _ => None,
    }
}
