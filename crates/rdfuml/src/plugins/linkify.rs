//! SVG hyperlink post-processing
//!
//! Rewrites every `prefix:localname` in rendered SVG text into an anchor
//! pointing at the namespace URI plus local name. The rewrite is textual;
//! the document is never parsed.

use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::NamespaceBinding;

enum Segment {
    Text(String),
    Link(String),
}

fn anchor(uri: &str, prefix: &str, local: &str) -> String {
    format!(
        "<a xlink:href=\"{}{}\" target=\"_blank\">{}:{}</a>",
        uri, local, prefix, local
    )
}

fn split_links(text: String, pattern: &Regex, binding: &NamespaceBinding, out: &mut Vec<Segment>) -> usize {
    let mut last = 0;
    let mut count = 0;
    for caps in pattern.captures_iter(&text) {
        let (Some(whole), Some(local)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Text(text[last..whole.start()].to_string()));
        }
        out.push(Segment::Link(anchor(&binding.uri, &binding.prefix, local.as_str())));
        last = whole.end();
        count += 1;
    }
    if count == 0 {
        out.push(Segment::Text(text));
    } else if last < text.len() {
        out.push(Segment::Text(text[last..].to_string()));
    }
    count
}

/// Link every `prefix:localname` occurrence to its namespace
///
/// Namespaces are applied one pass each in legend order; bindings with an
/// empty prefix are skipped. Text already turned into an anchor by an
/// earlier pass is not touched again, so with overlapping prefixes the
/// first matching legend entry wins.
///
/// # Example
/// ```
/// use rdfuml::core::NamespaceBinding;
/// use rdfuml::plugins::linkify::linkify;
///
/// let legend = vec![NamespaceBinding::new("ex", "http://example.org/")];
/// let svg = linkify("<text>ex:alice</text>", &legend);
/// assert_eq!(
///     svg,
///     "<text><a xlink:href=\"http://example.org/alice\" target=\"_blank\">ex:alice</a></text>"
/// );
/// ```
pub fn linkify(svg: &str, legend: &[NamespaceBinding]) -> String {
    let mut segments = vec![Segment::Text(svg.to_string())];

    for binding in legend.iter().filter(|b| !b.prefix.is_empty()) {
        let pattern = match Regex::new(&format!(r"{}:(\w+)", regex::escape(&binding.prefix))) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(prefix = %binding.prefix, error = %e, "Skipping namespace with unusable prefix");
                continue;
            }
        };

        let mut next = Vec::with_capacity(segments.len());
        let mut count = 0;
        for segment in segments {
            match segment {
                Segment::Text(text) => count += split_links(text, &pattern, binding, &mut next),
                link => next.push(link),
            }
        }
        segments = next;
        debug!(prefix = %binding.prefix, links = count, "Linked namespace");
    }

    segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) | Segment::Link(text) => text,
        })
        .collect()
}

/// Rewrite an SVG file in place with [`linkify`]
pub fn linkify_file(path: &Path, legend: &[NamespaceBinding]) -> Result<()> {
    let svg = fs::read_to_string(path)?;
    fs::write(path, linkify(&svg, legend))?;
    debug!(path = %path.display(), "Linked SVG output");
    Ok(())
}
