//! DOT syntax helpers shared by both renderers

use crate::core::{escape_html, EdgeData, EdgeStyle, LineStyle, RenderConfig};

/// Quote a string as a DOT double-quoted ID
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Whether `text` is already an HTML-like label (`<...>`)
pub fn is_html_label(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.len() >= 2 && trimmed.starts_with('<') && trimmed.ends_with('>')
}

/// Graph label value: HTML-like labels pass through, anything else is quoted
pub fn graph_label(text: &str) -> String {
    if is_html_label(text) {
        text.trim().to_string()
    } else {
        quote(text)
    }
}

fn compartments(title: &str, attributes: &[String]) -> String {
    let mut body = String::new();
    for attribute in attributes {
        body.push_str(&escape_html(attribute));
        body.push_str("<br align=\"left\"/>");
    }
    format!(
        "<<table border=\"0\" cellborder=\"1\" cellspacing=\"0\" cellpadding=\"4\">\
         <tr><td>{}</td></tr>\
         <tr><td align=\"left\" balign=\"left\">{}</td></tr>\
         </table>>",
        title, body
    )
}

/// UML class box: bold name over the attribute list
pub fn class_label(name: &str, attributes: &[String]) -> String {
    compartments(&format!("<b>{}</b>", escape_html(name)), attributes)
}

/// UML object box: underlined `name (classes)` over the attribute list
pub fn object_label(name: &str, type_label: &str, attributes: &[String]) -> String {
    let title = if type_label.is_empty() {
        escape_html(name)
    } else {
        format!("{} ({})", escape_html(name), escape_html(type_label))
    };
    compartments(&format!("<b><u>{}</u></b>", title), attributes)
}

/// Bare box showing only the raw identifier
pub fn placeholder_label(name: &str) -> String {
    compartments(&escape_html(name), &[])
}

/// `key = value` attribute pairs of an edge in a fixed order
pub fn edge_attributes(style: EdgeStyle, label: Option<&str>) -> Vec<(&'static str, String)> {
    let edge = EdgeData {
        from: String::new(),
        to: String::new(),
        style,
        label: label.map(str::to_string),
    };

    let mut attributes = Vec::new();
    if let Some(caption) = edge.caption() {
        attributes.push(("label", quote(&caption)));
    }
    attributes.push(("arrowhead", quote(&style.arrowhead().to_string())));
    if let Some(tail) = style.arrowtail() {
        attributes.push(("arrowtail", quote(&tail.to_string())));
        attributes.push(("dir", quote("both")));
    }
    if style.line() == LineStyle::Dashed {
        attributes.push(("style", quote(&style.line().to_string())));
    }
    if let Some(head) = style.head_label() {
        attributes.push(("headlabel", quote(&head)));
    }
    if let Some(tail) = style.tail_label() {
        attributes.push(("taillabel", quote(&tail)));
    }
    attributes
}

/// Render attribute pairs as a DOT attribute list
pub fn attribute_list(attributes: &[(&str, String)]) -> String {
    let pairs: Vec<String> = attributes
        .iter()
        .map(|(key, value)| format!("{} = {}", key, value))
        .collect();
    format!("[{}]", pairs.join(", "))
}

/// Graph-wide font and node defaults
pub fn defaults(config: &RenderConfig) -> Vec<String> {
    let font = quote(&config.font_name);
    vec![
        format!("fontname = {};", font),
        format!("fontsize = {};", config.font_size),
        format!(
            "node [fontname = {}, fontsize = {}, shape = \"none\", margin = 0];",
            font, config.font_size
        ),
        format!("edge [fontname = {}, fontsize = {}];", font, config.font_size),
    ]
}
