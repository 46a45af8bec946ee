//! Character reference escaping and decoding.

use std::borrow::Cow;

/// Escapes text content: `&`, `<` and `>`.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escapes a single-quoted attribute value: `&` and `'`.
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape(value, |c| match c {
        '&' => Some("&amp;"),
        '\'' => Some("&#39;"),
        _ => None,
    })
}

fn escape(text: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !text.chars().any(|c| replacement(c).is_some()) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match replacement(c) {
            Some(entity) => escaped.push_str(entity),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Decodes character references in `text`.
///
/// Unknown or malformed references are kept literally. Returns the decoded
/// text and the number of references that could not be decoded.
pub fn decode_entities(text: &str) -> (Cow<'_, str>, usize) {
    if !text.contains('&') {
        return (Cow::Borrowed(text), 0);
    }

    let mut decoded = String::with_capacity(text.len());
    let mut unknown = 0;
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let reference = rest[1..]
            .find(';')
            .filter(|&end| end > 0 && end <= 32)
            .map(|end| &rest[1..=end]);

        match reference.and_then(decode_reference) {
            Some(c) => {
                decoded.push(c);
                // '&' + name + ';'
                rest = &rest[reference.map_or(0, str::len) + 2..];
            }
            None => {
                unknown += 1;
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    (Cow::Owned(decoded), unknown)
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|&c| c != '\0');
    }
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert!(matches!(escape_text("plain"), Cow::Borrowed(_)));
        assert_eq!(escape_text("it's \"quoted\""), "it's \"quoted\"");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute("https://x.test/?a=1&b='2'"),
            "https://x.test/?a=1&amp;b=&#39;2&#39;"
        );
    }

    #[test]
    fn test_decode_named_and_numeric() {
        let (decoded, unknown) = decode_entities("&lt;&gt;&amp; &#65;&#x42;&#X43; &quot;&apos;&nbsp;");
        assert_eq!(decoded, "<>& ABC \"'\u{a0}");
        assert_eq!(unknown, 0);
    }

    #[test]
    fn test_decode_keeps_unknown_literal() {
        let (decoded, unknown) = decode_entities("AT&T &bogus; &#xZZ; &; tail&");
        assert_eq!(decoded, "AT&T &bogus; &#xZZ; &; tail&");
        assert_eq!(unknown, 5);
    }

    #[test]
    fn test_decode_round_trips_escape() {
        let text = "x<y & 'z' > w";
        let escaped = escape_text(text);
        let (decoded, unknown) = decode_entities(&escaped);
        assert_eq!(decoded, text);
        assert_eq!(unknown, 0);
        let escaped = escape_attribute(text);
        let (decoded, _) = decode_entities(&escaped);
        assert_eq!(decoded, text);
    }
}
