//! Streaming DOT renderer
//!
//! Writes each statement as soon as it is received. The graph label is
//! held back and emitted with the closing brace.

use anyhow::Result;
use std::path::Path;
use tracing::trace;

use super::graphviz::Graphviz;
use super::labels::{
    attribute_list, class_label, defaults, edge_attributes, graph_label, object_label,
    placeholder_label, quote,
};
use crate::core::{EdgeStyle, RenderConfig, Renderer};

/// Renderer producing DOT text line by line
pub struct DotWriter {
    config: RenderConfig,
    body: String,
    label: String,
    depth: usize,
}

impl DotWriter {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            body: String::new(),
            label: String::new(),
            depth: 1,
        }
    }

    fn line(&mut self, statement: &str) {
        for _ in 0..self.depth {
            self.body.push_str("    ");
        }
        self.body.push_str(statement);
        self.body.push('\n');
    }

    fn node(&mut self, id: &str, label: &str) {
        let statement = format!("{} [label = {}];", quote(id), label);
        self.line(&statement);
    }
}

impl Default for DotWriter {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Renderer for DotWriter {
    fn name(&self) -> &'static str {
        "writer"
    }

    fn start_cluster(&mut self, name: &str, label: &str) -> Result<()> {
        let statement = format!("subgraph {} {{", quote(&format!("cluster_{}", name)));
        self.line(&statement);
        self.depth += 1;
        let statement = format!("label = {};", quote(label));
        self.line(&statement);
        Ok(())
    }

    fn end_cluster(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_sub(1).max(1);
        self.line("}");
        Ok(())
    }

    fn add_node(&mut self, id: &str, label: &str) -> Result<()> {
        self.node(id, &placeholder_label(label));
        Ok(())
    }

    fn add_class_node(&mut self, id: &str, name: &str, attributes: &[String]) -> Result<()> {
        self.node(id, &class_label(name, attributes));
        Ok(())
    }

    fn add_object_node(
        &mut self,
        id: &str,
        name: &str,
        type_label: &str,
        attributes: &[String],
    ) -> Result<()> {
        self.node(id, &object_label(name, type_label, attributes));
        Ok(())
    }

    fn add_edge(&mut self, src: &str, dst: &str, style: EdgeStyle, label: Option<&str>) -> Result<()> {
        let statement = format!(
            "{} -> {} {};",
            quote(src),
            quote(dst),
            attribute_list(&edge_attributes(style, label))
        );
        self.line(&statement);
        Ok(())
    }

    fn set_graph_label(&mut self, text: &str) -> Result<()> {
        self.label = text.to_string();
        Ok(())
    }

    fn source(&self) -> String {
        let mut source = String::from("digraph G {\n");
        for statement in defaults(&self.config) {
            source.push_str("    ");
            source.push_str(&statement);
            source.push('\n');
        }
        source.push_str(&self.body);
        if !self.label.is_empty() {
            source.push_str(&format!("    label = {};\n", graph_label(&self.label)));
        }
        source.push_str("}\n");
        source
    }

    fn render(&self, path: &Path) -> Result<()> {
        trace!(renderer = self.name(), "Rendering");
        Graphviz::new(&self.config.dot_command).render(&self.source(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph() {
        let writer = DotWriter::default();
        let source = writer.source();
        assert!(source.starts_with("digraph G {\n"));
        assert!(source.contains("fontname = \"Bitstream Vera Sans\";"));
        assert!(source.contains("fontsize = 8;"));
        assert!(source.ends_with("}\n"));
    }

    #[test]
    fn test_cluster_nesting() {
        let mut writer = DotWriter::default();
        writer.start_cluster("file___a_ttl", "file://a.ttl").unwrap();
        writer.add_class_node("ex_A", "ex:A", &[]).unwrap();
        writer.end_cluster().unwrap();
        writer.add_node("ex_B", "ex:B").unwrap();
        writer.add_edge("ex_A", "ex_B", EdgeStyle::Subclass, None).unwrap();

        let source = writer.source();
        assert!(source.contains("    subgraph \"cluster_file___a_ttl\" {\n        label = \"file://a.ttl\";\n        \"ex_A\""));
        assert!(source.contains("\n    }\n    \"ex_B\""));
        assert!(source.contains("\"ex_A\" -> \"ex_B\" [arrowhead = \"empty\"];"));
    }

    #[test]
    fn test_html_graph_label_is_unquoted() {
        let mut writer = DotWriter::default();
        writer.set_graph_label("<<b>Namespaces</b>>").unwrap();
        assert!(writer.source().contains("label = <<b>Namespaces</b>>;"));
    }

    #[test]
    fn test_write_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg.dot");
        let mut writer = DotWriter::default();
        writer.add_node("x", "x").unwrap();
        writer.write_source(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), writer.source());
    }
}
