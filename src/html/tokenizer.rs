//! A forgiving tag/text tokenizer.
//!
//! The tokenizer never fails. Anything that does not look like a tag is
//! reported as [`Token::Malformed`] and the reader keeps it as literal text.

/// One lexical unit of markup.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'a> {
    /// Character data, entities still encoded.
    Text(&'a str),
    /// `<name attr='value' ...>`; names are lowercased, values are raw.
    StartTag {
        name: String,
        attributes: Vec<(String, &'a str)>,
        self_closing: bool,
    },
    /// `</name>`
    EndTag(String),
    /// Comment, doctype or processing instruction.
    Directive,
    /// Stray `<` or an unterminated tag, passed through as text.
    Malformed(&'a str),
}

pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn is_name_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':')
    }

    /// Consumes `len` bytes and returns them as malformed text.
    fn malformed(&mut self, len: usize) -> Token<'a> {
        let text = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Token::Malformed(text)
    }

    fn directive(&mut self, remaining: &'a str) -> Token<'a> {
        let end = if remaining.starts_with("<!--") {
            remaining[4..].find("-->").map(|i| 4 + i + 3)
        } else {
            remaining.find('>').map(|i| i + 1)
        };
        match end {
            Some(end) => {
                self.pos += end;
                Token::Directive
            }
            None => self.malformed(remaining.len()),
        }
    }

    fn end_tag(&mut self, remaining: &'a str) -> Token<'a> {
        let bytes = remaining.as_bytes();
        let name_len = bytes[2..]
            .iter()
            .take_while(|&&b| Self::is_name_byte(b))
            .count();
        if name_len == 0 {
            return self.malformed(1);
        }
        let name = remaining[2..2 + name_len].to_ascii_lowercase();
        match remaining[2 + name_len..].find('>') {
            Some(close) => {
                self.pos += 2 + name_len + close + 1;
                Token::EndTag(name)
            }
            None => self.malformed(remaining.len()),
        }
    }

    fn start_tag(&mut self, remaining: &'a str) -> Token<'a> {
        let bytes = remaining.as_bytes();
        let name_len = bytes[1..]
            .iter()
            .take_while(|&&b| Self::is_name_byte(b))
            .count();

        let mut quote = None;
        let mut close = None;
        for (i, &b) in bytes.iter().enumerate().skip(1 + name_len) {
            match (b, quote) {
                (b'"' | b'\'', None) => quote = Some(b),
                (b, Some(open)) if b == open => quote = None,
                (b'>', None) => {
                    close = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            return self.malformed(remaining.len());
        };

        let name = remaining[1..1 + name_len].to_ascii_lowercase();
        let mut body = remaining[1 + name_len..close].trim_end();
        let self_closing = body.ends_with('/');
        if self_closing {
            body = &body[..body.len() - 1];
        }
        self.pos += close + 1;

        Token::StartTag {
            name,
            attributes: parse_attributes(body),
            self_closing,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }

        let remaining = &self.input[self.pos..];

        let lt = remaining.find('<').unwrap_or(remaining.len());
        if lt > 0 {
            self.pos += lt;
            return Some(Token::Text(&remaining[..lt]));
        }

        let token = match remaining.as_bytes().get(1) {
            Some(b'!' | b'?') => self.directive(remaining),
            Some(b'/') => self.end_tag(remaining),
            Some(b) if b.is_ascii_alphabetic() => self.start_tag(remaining),
            _ => self.malformed(1),
        };
        Some(token)
    }
}

/// Parses `name='v' name="v" name=v name` sequences.
fn parse_attributes(body: &str) -> Vec<(String, &str)> {
    let mut attributes = Vec::new();
    let mut rest = body;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        if name_end == 0 {
            // Lone '='
            rest = &rest[1..];
            continue;
        }
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after) => {
                let after = after.trim_start();
                match after.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let inner = &after[1..];
                        let end = inner.find(quote).unwrap_or(inner.len());
                        rest = inner.get(end + 1..).unwrap_or("");
                        &inner[..end]
                    }
                    _ => {
                        let end = after
                            .find(|c: char| c.is_ascii_whitespace())
                            .unwrap_or(after.len());
                        rest = &after[end..];
                        &after[..end]
                    }
                }
            }
            None => "",
        };
        attributes.push((name, value));
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input).collect()
    }

    #[test]
    fn test_text_and_tags() {
        assert_eq!(
            tokens("<p style='color: red'>Hi</p>"),
            vec![
                Token::StartTag {
                    name: "p".to_string(),
                    attributes: vec![("style".to_string(), "color: red")],
                    self_closing: false,
                },
                Token::Text("Hi"),
                Token::EndTag("p".to_string()),
            ]
        );
    }

    #[test]
    fn test_attribute_quoting() {
        let parsed = tokens(r#"<a HREF="x'y" title=plain data-empty checked=''>"#);
        let Token::StartTag { name, attributes, .. } = &parsed[0] else {
            panic!("expected start tag");
        };
        assert_eq!(name, "a");
        assert_eq!(
            attributes,
            &vec![
                ("href".to_string(), "x'y"),
                ("title".to_string(), "plain"),
                ("data-empty".to_string(), ""),
                ("checked".to_string(), ""),
            ]
        );
    }

    #[test]
    fn test_quoted_gt_does_not_close_tag() {
        let parsed = tokens("<span style='font: 12px \"a>b\"'>x</span>");
        assert!(matches!(&parsed[0], Token::StartTag { attributes, .. } if attributes[0].1 == "font: 12px \"a>b\""));
        assert_eq!(parsed[1], Token::Text("x"));
    }

    #[test]
    fn test_self_closing_and_case() {
        assert_eq!(
            tokens("<BR/>"),
            vec![Token::StartTag {
                name: "br".to_string(),
                attributes: vec![],
                self_closing: true,
            }]
        );
        assert_eq!(tokens("</SPAN >"), vec![Token::EndTag("span".to_string())]);
    }

    #[test]
    fn test_directives_are_skipped() {
        assert_eq!(
            tokens("<!DOCTYPE html><!-- a > b -->x<?xml v?>"),
            vec![Token::Directive, Token::Directive, Token::Text("x"), Token::Directive]
        );
    }

    #[test]
    fn test_stray_brackets() {
        assert_eq!(
            tokens("<<>"),
            vec![Token::Malformed("<"), Token::Malformed("<"), Token::Text(">")]
        );
        assert_eq!(tokens("a < b"), vec![Token::Text("a "), Token::Malformed("<"), Token::Text(" b")]);
        assert_eq!(tokens("</>"), vec![Token::Malformed("<"), Token::Text("/>")]);
    }

    #[test]
    fn test_unterminated_tag_is_literal() {
        assert_eq!(
            tokens("ok<span style='x"),
            vec![Token::Text("ok"), Token::Malformed("<span style='x")]
        );
        assert_eq!(tokens("<!-- open"), vec![Token::Malformed("<!-- open")]);
    }
}
