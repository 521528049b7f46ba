//! Core renderer trait for diagram output
//!
//! A renderer receives the finalized diagram one element at a time and
//! knows how to persist its native source and produce the final image.
//! The pipeline never branches on which renderer is active.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, span, Level};

use super::{EdgeStyle, NodeKind, RenderableGraph};

/// Rendering options shared by all renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub font_name: String,
    pub font_size: u32,
    /// Graphviz layout executable
    pub dot_command: PathBuf,
}

impl RenderConfig {
    pub fn new(font_name: impl Into<String>, font_size: u32, dot_command: impl Into<PathBuf>) -> Self {
        Self {
            font_name: font_name.into(),
            font_size,
            dot_command: dot_command.into(),
        }
    }

    pub fn with_dot_command(mut self, dot_command: impl Into<PathBuf>) -> Self {
        self.dot_command = dot_command.into();
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new("Bitstream Vera Sans", 8, "dot")
    }
}

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use rdfuml::core::{DiagramModel, Renderer, RenderConfig};
/// use rdfuml::plugins::dot::DotWriter;
///
/// let mut model = DiagramModel::new();
/// model.add_class_node("ex:Animal", vec![]).unwrap();
/// let graph = model.finalize().unwrap();
///
/// let mut renderer = DotWriter::new(RenderConfig::default());
/// graph.draw(&mut renderer).unwrap();
/// assert!(renderer.source().contains("ex_Animal"));
/// ```
pub trait Renderer {
    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Open a visual group; nodes added until `end_cluster` belong to it
    fn start_cluster(&mut self, name: &str, label: &str) -> Result<()>;

    fn end_cluster(&mut self) -> Result<()>;

    /// Add a bare node showing only its label
    fn add_node(&mut self, id: &str, label: &str) -> Result<()>;

    fn add_class_node(&mut self, id: &str, name: &str, attributes: &[String]) -> Result<()>;

    fn add_object_node(
        &mut self,
        id: &str,
        name: &str,
        type_label: &str,
        attributes: &[String],
    ) -> Result<()>;

    fn add_edge(&mut self, src: &str, dst: &str, style: EdgeStyle, label: Option<&str>) -> Result<()>;

    fn set_graph_label(&mut self, text: &str) -> Result<()>;

    /// The renderer's native textual graph description
    fn source(&self) -> String;

    /// Persist the native source next to the rendered output
    fn write_source(&self, path: &Path) -> Result<()> {
        fs::write(path, self.source())?;
        debug!(path = %path.display(), renderer = self.name(), "Wrote graph source");
        Ok(())
    }

    /// Lay out and rasterize to `path`; the extension picks the format
    fn render(&self, path: &Path) -> Result<()>;
}

impl RenderableGraph {
    /// Feed every cluster, node, edge and the label to a renderer
    ///
    /// Clustered nodes come first, then unclustered ones (placeholders
    /// last), then edges in insertion order, then the label.
    pub fn draw(&self, renderer: &mut dyn Renderer) -> Result<()> {
        let draw_span = span!(Level::DEBUG, "draw", renderer = renderer.name());
        let _enter = draw_span.enter();

        for cluster in &self.clusters {
            renderer.start_cluster(&cluster.name, &cluster.label)?;
            for id in &cluster.node_ids {
                if let Some(node) = self.node(id) {
                    draw_node(renderer, node)?;
                }
            }
            renderer.end_cluster()?;
        }

        for node in self.unclustered_nodes() {
            draw_node(renderer, node)?;
        }

        for edge in &self.edges {
            renderer.add_edge(&edge.from, &edge.to, edge.style, edge.label.as_deref())?;
        }

        if !self.label.is_empty() {
            renderer.set_graph_label(&self.label)?;
        }

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "Diagram handed to renderer"
        );
        Ok(())
    }
}

fn draw_node(renderer: &mut dyn Renderer, node: &super::NodeData) -> Result<()> {
    if node.placeholder {
        return renderer.add_node(&node.id, &node.name);
    }
    match node.kind {
        NodeKind::Class => renderer.add_class_node(&node.id, &node.name, &node.attributes),
        NodeKind::Object => {
            renderer.add_object_node(&node.id, &node.name, &node.type_label, &node.attributes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DiagramModel;

    /// Records the call sequence as strings
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<String>,
    }

    impl Renderer for RecordingRenderer {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn start_cluster(&mut self, name: &str, label: &str) -> Result<()> {
            self.calls.push(format!("cluster {} {}", name, label));
            Ok(())
        }

        fn end_cluster(&mut self) -> Result<()> {
            self.calls.push("end".to_string());
            Ok(())
        }

        fn add_node(&mut self, id: &str, label: &str) -> Result<()> {
            self.calls.push(format!("node {} {}", id, label));
            Ok(())
        }

        fn add_class_node(&mut self, id: &str, _name: &str, attributes: &[String]) -> Result<()> {
            self.calls.push(format!("class {} {}", id, attributes.len()));
            Ok(())
        }

        fn add_object_node(
            &mut self,
            id: &str,
            _name: &str,
            type_label: &str,
            _attributes: &[String],
        ) -> Result<()> {
            self.calls.push(format!("object {} ({})", id, type_label));
            Ok(())
        }

        fn add_edge(&mut self, src: &str, dst: &str, style: EdgeStyle, _label: Option<&str>) -> Result<()> {
            self.calls.push(format!("edge {} {} {}", src, dst, style));
            Ok(())
        }

        fn set_graph_label(&mut self, text: &str) -> Result<()> {
            self.calls.push(format!("label {}", text));
            Ok(())
        }

        fn source(&self) -> String {
            self.calls.join("\n")
        }

        fn render(&self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.font_size, 8);
        assert_eq!(config.dot_command, PathBuf::from("dot"));
    }

    #[test]
    fn test_draw_order() {
        let mut model = DiagramModel::new();
        model.start_cluster("ctx").unwrap();
        model.add_object_node("ex:a", "ex:T", vec![]).unwrap();
        model.close_cluster().unwrap();
        model.add_class_node("ex:T", vec!["ex:p".to_string()]).unwrap();
        model.add_edge("ex:a", "ex:b", "ex:knows").unwrap();
        model.set_label("legend").unwrap();
        let graph = model.finalize().unwrap();

        let mut renderer = RecordingRenderer::default();
        graph.draw(&mut renderer).unwrap();
        assert_eq!(
            renderer.calls,
            vec![
                "cluster ctx ctx",
                "object ex_a (ex:T)",
                "end",
                "class ex_T 1",
                "node ex_b ex:b",
                "edge ex_a ex_b plain",
                "label legend",
            ]
        );
    }
}
