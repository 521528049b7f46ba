//! Structured DOT renderer
//!
//! Builds an in-memory graph of statements and serializes it only when the
//! source is requested. Nodes are grouped under their subgraph regardless of
//! the order edges arrive in, and repeated graph labels accumulate.

use anyhow::{anyhow, Result};
use std::path::Path;

use super::graphviz::Graphviz;
use super::labels::{
    attribute_list, class_label, defaults, edge_attributes, graph_label, object_label,
    placeholder_label, quote,
};
use crate::core::{EdgeStyle, RenderConfig, Renderer};

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeStatement {
    id: String,
    label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EdgeStatement {
    src: String,
    dst: String,
    attributes: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Subgraph {
    name: String,
    label: String,
    nodes: Vec<NodeStatement>,
}

/// Renderer holding the diagram as a graph structure
pub struct DotGraph {
    config: RenderConfig,
    subgraphs: Vec<Subgraph>,
    open_subgraph: Option<usize>,
    nodes: Vec<NodeStatement>,
    edges: Vec<EdgeStatement>,
    label: String,
}

impl DotGraph {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            subgraphs: Vec::new(),
            open_subgraph: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            label: String::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len() + self.subgraphs.iter().map(|s| s.nodes.len()).sum::<usize>()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn subgraph_count(&self) -> usize {
        self.subgraphs.len()
    }

    fn insert_node(&mut self, id: &str, label: String) {
        let node = NodeStatement {
            id: id.to_string(),
            label,
        };
        match self.open_subgraph {
            Some(index) => self.subgraphs[index].nodes.push(node),
            None => self.nodes.push(node),
        }
    }
}

impl Default for DotGraph {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

fn node_line(node: &NodeStatement, indent: &str) -> String {
    format!("{}{} [label = {}];\n", indent, quote(&node.id), node.label)
}

impl Renderer for DotGraph {
    fn name(&self) -> &'static str {
        "graph"
    }

    fn start_cluster(&mut self, name: &str, label: &str) -> Result<()> {
        if self.open_subgraph.is_some() {
            return Err(anyhow!("subgraph {} opened while another is open", name));
        }
        self.subgraphs.push(Subgraph {
            name: format!("cluster_{}", name),
            label: label.to_string(),
            nodes: Vec::new(),
        });
        self.open_subgraph = Some(self.subgraphs.len() - 1);
        Ok(())
    }

    fn end_cluster(&mut self) -> Result<()> {
        self.open_subgraph = None;
        Ok(())
    }

    fn add_node(&mut self, id: &str, label: &str) -> Result<()> {
        self.insert_node(id, placeholder_label(label));
        Ok(())
    }

    fn add_class_node(&mut self, id: &str, name: &str, attributes: &[String]) -> Result<()> {
        self.insert_node(id, class_label(name, attributes));
        Ok(())
    }

    fn add_object_node(
        &mut self,
        id: &str,
        name: &str,
        type_label: &str,
        attributes: &[String],
    ) -> Result<()> {
        self.insert_node(id, object_label(name, type_label, attributes));
        Ok(())
    }

    fn add_edge(&mut self, src: &str, dst: &str, style: EdgeStyle, label: Option<&str>) -> Result<()> {
        self.edges.push(EdgeStatement {
            src: src.to_string(),
            dst: dst.to_string(),
            attributes: edge_attributes(style, label),
        });
        Ok(())
    }

    fn set_graph_label(&mut self, text: &str) -> Result<()> {
        self.label.push_str(text);
        Ok(())
    }

    fn source(&self) -> String {
        let mut source = String::from("digraph G {\n");
        for statement in defaults(&self.config) {
            source.push_str(&format!("    {}\n", statement));
        }
        if !self.label.is_empty() {
            source.push_str(&format!("    label = {};\n", graph_label(&self.label)));
        }

        for subgraph in &self.subgraphs {
            source.push_str(&format!("    subgraph {} {{\n", quote(&subgraph.name)));
            source.push_str(&format!("        label = {};\n", quote(&subgraph.label)));
            for node in &subgraph.nodes {
                source.push_str(&node_line(node, "        "));
            }
            source.push_str("    }\n");
        }
        for node in &self.nodes {
            source.push_str(&node_line(node, "    "));
        }
        for edge in &self.edges {
            source.push_str(&format!(
                "    {} -> {} {};\n",
                quote(&edge.src),
                quote(&edge.dst),
                attribute_list(&edge.attributes)
            ));
        }
        source.push_str("}\n");
        source
    }

    fn render(&self, path: &Path) -> Result<()> {
        Graphviz::new(&self.config.dot_command).render(&self.source(), path)
    }
}
