//! Diagram model
//!
//! The mutable graph-of-record an extraction pass fills: clusters, nodes,
//! edges and the free-text diagram label. Every edge endpoint is tracked as
//! *connected* and every explicitly added node as *described*; at
//! [`DiagramModel::finalize`] each connected but undescribed endpoint gets a
//! placeholder node so no edge points at a missing node.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

use super::{sanitize, Cluster, EdgeData, EdgeStyle, NodeData, NodeKind, RdfUmlError};

/// Characters stripped from both ends of a context name to form its label
const CLUSTER_DECORATION: [char; 6] = ['[', ']', '<', '>', ':', '_'];

/// Strip enclosing bracket/colon/underscore decoration from a context name
pub fn cluster_label(raw_context_name: &str) -> &str {
    raw_context_name.trim_matches(|c| CLUSTER_DECORATION.contains(&c))
}

/// Mutable diagram under construction
#[derive(Debug, Default)]
pub struct DiagramModel {
    clusters: Vec<Cluster>,
    current_cluster: Option<usize>,
    nodes: Vec<NodeData>,
    node_index: HashMap<String, usize>,
    edges: Vec<EdgeData>,
    connected: BTreeSet<String>,
    described: BTreeSet<String>,
    label: String,
    frozen: bool,
}

impl DiagramModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_mutable(&self, operation: &str) -> Result<(), RdfUmlError> {
        if self.frozen {
            Err(RdfUmlError::frozen_model(operation))
        } else {
            Ok(())
        }
    }

    /// Open a cluster for a context; node adds go into it until closed
    ///
    /// An already open cluster is closed first.
    pub fn start_cluster(&mut self, raw_context_name: &str) -> Result<(), RdfUmlError> {
        self.ensure_mutable("start_cluster")?;
        if self.current_cluster.is_some() {
            self.close_cluster()?;
        }

        let label = cluster_label(raw_context_name);
        self.clusters.push(Cluster::new(sanitize(label), label));
        self.current_cluster = Some(self.clusters.len() - 1);
        trace!(cluster = label, "Opened cluster");
        Ok(())
    }

    /// Close the open cluster
    ///
    /// Returns `false` when the cluster ended up without nodes; such a
    /// cluster is discarded so it never renders as an empty box. Also
    /// returns `false` when no cluster was open.
    pub fn close_cluster(&mut self) -> Result<bool, RdfUmlError> {
        self.ensure_mutable("close_cluster")?;
        let Some(index) = self.current_cluster.take() else {
            return Ok(false);
        };

        if self.clusters[index].node_ids.is_empty() {
            let cluster = self.clusters.remove(index);
            debug!(cluster = %cluster.label, "Discarded empty cluster");
            return Ok(false);
        }
        Ok(true)
    }

    /// Add or replace a class node
    pub fn add_class_node(&mut self, qname: &str, attributes: Vec<String>) -> Result<(), RdfUmlError> {
        self.ensure_mutable("add_class_node")?;
        self.upsert_node(NodeData::class(sanitize(qname), qname, attributes));
        Ok(())
    }

    /// Add or replace an object node
    ///
    /// `class_names_joined` is the sorted, comma-joined list of the
    /// instance's classes and may be empty.
    pub fn add_object_node(
        &mut self,
        qname: &str,
        class_names_joined: &str,
        attributes: Vec<String>,
    ) -> Result<(), RdfUmlError> {
        self.ensure_mutable("add_object_node")?;
        self.upsert_node(NodeData::object(
            sanitize(qname),
            qname,
            class_names_joined,
            attributes,
        ));
        Ok(())
    }

    fn upsert_node(&mut self, node: NodeData) {
        self.described.insert(node.name.clone());

        for cluster in &mut self.clusters {
            cluster.node_ids.retain(|id| id != &node.id);
        }
        if let Some(index) = self.current_cluster {
            self.clusters[index].node_ids.push(node.id.clone());
        }

        match self.node_index.get(&node.id) {
            Some(&position) => self.nodes[position] = node,
            None => {
                self.node_index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Add an edge labelled with the predicate's qname
    pub fn add_edge(&mut self, src: &str, dst: &str, predicate: &str) -> Result<(), RdfUmlError> {
        self.add_styled_edge(src, dst, EdgeStyle::Plain, Some(predicate))
    }

    /// Add an unlabelled generalization edge
    pub fn add_subclass_edge(&mut self, src: &str, dst: &str) -> Result<(), RdfUmlError> {
        self.add_styled_edge(src, dst, EdgeStyle::Subclass, None)
    }

    pub fn add_functional_edge(&mut self, src: &str, dst: &str, property: &str) -> Result<(), RdfUmlError> {
        self.add_styled_edge(src, dst, EdgeStyle::Functional, Some(property))
    }

    pub fn add_inverse_functional_edge(
        &mut self,
        src: &str,
        dst: &str,
        property: &str,
    ) -> Result<(), RdfUmlError> {
        self.add_styled_edge(src, dst, EdgeStyle::InverseFunctional, Some(property))
    }

    pub fn add_symmetric_edge(&mut self, src: &str, dst: &str, property: &str) -> Result<(), RdfUmlError> {
        self.add_styled_edge(src, dst, EdgeStyle::Symmetric, Some(property))
    }

    pub fn add_aggregation_edge(&mut self, src: &str, dst: &str, property: &str) -> Result<(), RdfUmlError> {
        self.add_styled_edge(src, dst, EdgeStyle::Aggregation, Some(property))
    }

    pub fn add_equivalent_class_edge(&mut self, src: &str, dst: &str) -> Result<(), RdfUmlError> {
        self.add_styled_edge(src, dst, EdgeStyle::EquivalentClass, None)
    }

    pub fn add_union_of_edge(&mut self, src: &str, dst: &str) -> Result<(), RdfUmlError> {
        self.add_styled_edge(src, dst, EdgeStyle::UnionOf, None)
    }

    pub fn add_one_of_edge(&mut self, src: &str, dst: &str) -> Result<(), RdfUmlError> {
        self.add_styled_edge(src, dst, EdgeStyle::OneOf, None)
    }

    /// Add a restriction edge with optional lower/upper bounds
    ///
    /// Without any bound the edge degrades to a plain edge.
    pub fn add_cardinality_edge(
        &mut self,
        src: &str,
        dst: &str,
        property: &str,
        min: Option<u32>,
        max: Option<u32>,
    ) -> Result<(), RdfUmlError> {
        let style = EdgeStyle::cardinality(min, max).unwrap_or(EdgeStyle::Plain);
        self.add_styled_edge(src, dst, style, Some(property))
    }

    /// Add an edge of any style between two qnames
    ///
    /// Edges are never deduplicated.
    pub fn add_styled_edge(
        &mut self,
        src: &str,
        dst: &str,
        style: EdgeStyle,
        label: Option<&str>,
    ) -> Result<(), RdfUmlError> {
        self.ensure_mutable("add_edge")?;
        self.connected.insert(src.to_string());
        self.connected.insert(dst.to_string());

        let mut edge = EdgeData::new(sanitize(src), sanitize(dst), style);
        edge.label = label.map(str::to_string);
        self.edges.push(edge);
        Ok(())
    }

    /// Replace the diagram label
    pub fn set_label(&mut self, text: &str) -> Result<(), RdfUmlError> {
        self.ensure_mutable("set_label")?;
        self.label = text.to_string();
        Ok(())
    }

    /// Append to the diagram label
    pub fn append_label(&mut self, text: &str) -> Result<(), RdfUmlError> {
        self.ensure_mutable("append_label")?;
        self.label.push_str(text);
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Qnames referenced by at least one edge
    pub fn connected_node_ids(&self) -> &BTreeSet<String> {
        &self.connected
    }

    /// Qnames explicitly added as nodes
    pub fn described_node_ids(&self) -> &BTreeSet<String> {
        &self.described
    }

    /// Connected qnames that were never described, in sorted order
    pub fn undescribed_node_ids(&self) -> Vec<String> {
        self.connected.difference(&self.described).cloned().collect()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Backfill placeholders and freeze the model
    ///
    /// Placeholders are appended after all described nodes, outside any
    /// cluster. A placeholder whose sanitized id collides with an existing
    /// node is not created.
    pub fn finalize(&mut self) -> Result<RenderableGraph, RdfUmlError> {
        self.ensure_mutable("finalize")?;
        if self.current_cluster.is_some() {
            self.close_cluster()?;
        }

        let undescribed = self.undescribed_node_ids();
        for qname in &undescribed {
            let id = sanitize(qname);
            if self.node_index.contains_key(&id) {
                continue;
            }
            self.node_index.insert(id.clone(), self.nodes.len());
            self.nodes.push(NodeData::placeholder(id, qname.as_str()));
        }
        self.frozen = true;

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            clusters = self.clusters.len(),
            placeholders = undescribed.len(),
            "Finalized diagram model"
        );

        Ok(RenderableGraph {
            clusters: self.clusters.clone(),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            label: self.label.clone(),
        })
    }
}

/// Immutable, complete diagram handed to a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderableGraph {
    pub clusters: Vec<Cluster>,
    pub nodes: Vec<NodeData>,
    pub edges: Vec<EdgeData>,
    pub label: String,
}

impl RenderableGraph {
    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes that belong to no cluster, including placeholders
    pub fn unclustered_nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter().filter(move |node| {
            !self
                .clusters
                .iter()
                .any(|cluster| cluster.node_ids.contains(&node.id))
        })
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter().filter(|n| n.placeholder)
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == kind && !n.placeholder)
            .count()
    }
}
