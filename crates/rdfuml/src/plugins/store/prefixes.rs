//! Namespace declarations found in serialized RDF
//!
//! The store's parsers do not report the prefixes they saw, so the source
//! text is scanned for `@prefix`/`PREFIX` lines (Turtle family) and
//! `xmlns` attributes (RDF/XML).
//!
//! Turtle-family text has its string literals and comments blanked out
//! first, so a prefix line quoted inside a multi-line literal is not picked
//! up. RDF/XML is scanned as-is: an `xmlns` attribute written inside a
//! comment, CDATA section or text node is still reported.

use regex::Regex;
use std::sync::OnceLock;

use crate::core::InputFormat;

fn turtle_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*@?prefix\s+([A-Za-z][\w.-]*)?:\s*<([^>]*)>")
            .expect("prefix regex must compile")
    })
}

fn xmlns_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\bxmlns(?::([A-Za-z_][\w.-]*))?\s*=\s*["']([^"']*)["']"#)
            .expect("xmlns regex must compile")
    })
}

fn blank(text: &str, out: &mut String) {
    out.extend(text.chars().map(|c| if c == '\n' { '\n' } else { ' ' }));
}

/// Replace string literals and comments with spaces, keeping line breaks
///
/// IRIs are copied verbatim so a `#` inside `<...>` is not taken for a
/// comment. An unterminated literal blanks the rest of the text.
fn mask_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => {
                let end = rest[1..]
                    .find(|c: char| c == '>' || c.is_whitespace())
                    .map(|i| i + 1);
                match end {
                    Some(end) if rest[end..].starts_with('>') => {
                        out.push_str(&rest[..=end]);
                        rest = &rest[end + 1..];
                    }
                    _ => {
                        out.push('<');
                        rest = &rest[1..];
                    }
                }
            }
            '#' => {
                let end = rest.find('\n').unwrap_or(rest.len());
                blank(&rest[..end], &mut out);
                rest = &rest[end..];
            }
            '"' | '\'' => {
                let long = if c == '"' { "\"\"\"" } else { "'''" };
                let delimiter = if rest.starts_with(long) { long } else { &rest[..1] };
                let body = &rest[delimiter.len()..];
                let mut end = body.len();
                let mut escaped = false;
                for (i, ch) in body.char_indices() {
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if body[i..].starts_with(delimiter) {
                        end = i;
                        break;
                    }
                }
                let consumed = (2 * delimiter.len() + end).min(rest.len());
                blank(&rest[..consumed], &mut out);
                rest = &rest[consumed..];
            }
            _ => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// Resolve a declared namespace against the document base
///
/// Only absolute IRIs, the empty IRI and fragment-only references are
/// handled; other relative references are dropped.
fn resolve(uri: &str, base: &str) -> Option<String> {
    if uri.is_empty() {
        return Some(base.to_string());
    }
    if let Some(fragment) = uri.strip_prefix('#') {
        let document = base.split('#').next().unwrap_or(base);
        return Some(format!("{}#{}", document, fragment));
    }
    let scheme_end = uri.find(':')?;
    let scheme = &uri[..scheme_end];
    let is_scheme = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    is_scheme.then(|| uri.to_string())
}

/// Prefix declarations in document order as (prefix, namespace URI)
pub fn declared_prefixes(text: &str, format: InputFormat, base: &str) -> Vec<(String, String)> {
    let (regex, text) = match format {
        InputFormat::RdfXml => (xmlns_regex(), text.to_string()),
        format if format.has_turtle_prefixes() => (turtle_prefix_regex(), mask_literals(text)),
        _ => return Vec::new(),
    };

    regex
        .captures_iter(&text)
        .filter_map(|caps| {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let uri = resolve(caps.get(2)?.as_str(), base)?;
            Some((prefix.to_string(), uri))
        })
        .collect()
}
