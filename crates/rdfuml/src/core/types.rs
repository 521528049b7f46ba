//! Core type definitions for diagram construction
//!
//! This module contains the fundamental types used throughout rdfuml:
//! node kinds, edge styles with their arrow decorations, and the node,
//! edge and cluster records of a diagram.

use serde::Serialize;
use std::fmt;

/// Kind of diagram node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A class box: bold name plus attribute list
    Class,
    /// An instance box: underlined `name (classes)` plus attribute list
    #[default]
    Object,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Class => write!(f, "class"),
            NodeKind::Object => write!(f, "object"),
        }
    }
}

/// Arrow shapes at either end of an edge, named as Graphviz names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowShape {
    /// Open `>` arrow
    Open,
    /// Hollow triangle (generalization)
    Empty,
    /// Hollow diamond (aggregation)
    HollowDiamond,
    /// No decoration
    None,
}

impl fmt::Display for ArrowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrowShape::Open => write!(f, "open"),
            ArrowShape::Empty => write!(f, "empty"),
            ArrowShape::HollowDiamond => write!(f, "odiamond"),
            ArrowShape::None => write!(f, "none"),
        }
    }
}

/// Line style of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineStyle::Solid => write!(f, "solid"),
            LineStyle::Dashed => write!(f, "dashed"),
        }
    }
}

/// Visual style of an edge
///
/// Every style fixes its arrowheads, line style and cardinality texts;
/// renderers only translate these into their own attribute syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EdgeStyle {
    /// Relation between instances or an object property: open arrow
    #[default]
    Plain,
    /// `rdfs:subClassOf`: hollow triangle
    Subclass,
    /// Functional property: at most one target
    Functional,
    /// Inverse functional property: at most one source
    InverseFunctional,
    /// Symmetric property: open arrows at both ends
    Symmetric,
    /// Property ranging over a list/container: hollow diamond at the source
    Aggregation,
    /// `owl:equivalentClass`
    EquivalentClass,
    /// Member of an `owl:unionOf` list
    UnionOf,
    /// Member of an `owl:oneOf` enumeration
    OneOf,
    /// Restriction with only a lower bound
    MinCardinality { min: u32 },
    /// Restriction with only an upper bound
    MaxCardinality { max: u32 },
    /// Restriction with both bounds
    MinMaxCardinality { min: u32, max: u32 },
}

impl EdgeStyle {
    /// Arrow at the destination end
    pub fn arrowhead(&self) -> ArrowShape {
        match self {
            EdgeStyle::Subclass | EdgeStyle::UnionOf => ArrowShape::Empty,
            EdgeStyle::EquivalentClass | EdgeStyle::Aggregation => ArrowShape::None,
            _ => ArrowShape::Open,
        }
    }

    /// Arrow at the source end, if the edge is drawn with one
    pub fn arrowtail(&self) -> Option<ArrowShape> {
        match self {
            EdgeStyle::Symmetric => Some(ArrowShape::Open),
            EdgeStyle::Aggregation => Some(ArrowShape::HollowDiamond),
            EdgeStyle::EquivalentClass => Some(ArrowShape::None),
            _ => None,
        }
    }

    pub fn line(&self) -> LineStyle {
        match self {
            EdgeStyle::EquivalentClass | EdgeStyle::UnionOf | EdgeStyle::OneOf => {
                LineStyle::Dashed
            }
            _ => LineStyle::Solid,
        }
    }

    /// Multiplicity text next to the destination
    pub fn head_label(&self) -> Option<String> {
        match *self {
            EdgeStyle::Functional => Some("0..1".to_string()),
            EdgeStyle::MinCardinality { min } => Some(format!("{}..*", min)),
            EdgeStyle::MaxCardinality { max } => Some(format!("0..{}", max)),
            EdgeStyle::MinMaxCardinality { min, max } if min == max => Some(min.to_string()),
            EdgeStyle::MinMaxCardinality { min, max } => Some(format!("{}..{}", min, max)),
            _ => None,
        }
    }

    /// Multiplicity text next to the source
    pub fn tail_label(&self) -> Option<String> {
        match self {
            EdgeStyle::InverseFunctional => Some("0..1".to_string()),
            _ => None,
        }
    }

    /// Guillemet-quoted stereotype drawn on the edge
    pub fn stereotype(&self) -> Option<&'static str> {
        match self {
            EdgeStyle::EquivalentClass => Some("«equivalentClass»"),
            EdgeStyle::UnionOf => Some("«unionOf»"),
            EdgeStyle::OneOf => Some("«oneOf»"),
            EdgeStyle::Symmetric => Some("«symmetric»"),
            _ => None,
        }
    }

    /// Build the cardinality style for optional bounds; `None` without bounds
    pub fn cardinality(min: Option<u32>, max: Option<u32>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(EdgeStyle::MinMaxCardinality { min, max }),
            (Some(min), None) => Some(EdgeStyle::MinCardinality { min }),
            (None, Some(max)) => Some(EdgeStyle::MaxCardinality { max }),
            (None, None) => None,
        }
    }
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeStyle::Plain => write!(f, "plain"),
            EdgeStyle::Subclass => write!(f, "subclass"),
            EdgeStyle::Functional => write!(f, "functional"),
            EdgeStyle::InverseFunctional => write!(f, "inverse-functional"),
            EdgeStyle::Symmetric => write!(f, "symmetric"),
            EdgeStyle::Aggregation => write!(f, "aggregation"),
            EdgeStyle::EquivalentClass => write!(f, "equivalent-class"),
            EdgeStyle::UnionOf => write!(f, "union-of"),
            EdgeStyle::OneOf => write!(f, "one-of"),
            EdgeStyle::MinCardinality { min } => write!(f, "min-cardinality({})", min),
            EdgeStyle::MaxCardinality { max } => write!(f, "max-cardinality({})", max),
            EdgeStyle::MinMaxCardinality { min, max } => {
                write!(f, "min-max-cardinality({}, {})", min, max)
            }
        }
    }
}

/// A node in the diagram with all its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    /// Sanitized identifier
    pub id: String,
    /// Qname shown as the node title
    pub name: String,
    pub kind: NodeKind,
    /// Comma-joined classes of an object node; empty for class nodes
    pub type_label: String,
    /// `key = value` lines
    pub attributes: Vec<String>,
    /// Synthesized for an edge endpoint that was never described
    pub placeholder: bool,
}

impl NodeData {
    /// Create a class node
    pub fn class(id: impl Into<String>, name: impl Into<String>, attributes: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Class,
            type_label: String::new(),
            attributes,
            placeholder: false,
        }
    }

    /// Create an object node
    pub fn object(
        id: impl Into<String>,
        name: impl Into<String>,
        type_label: impl Into<String>,
        attributes: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Object,
            type_label: type_label.into(),
            attributes,
            placeholder: false,
        }
    }

    /// Create a bare placeholder node labelled with its raw identifier
    pub fn placeholder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            placeholder: true,
            ..Self::object(id, name, "", Vec::new())
        }
    }
}

/// An edge connecting two nodes with metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeData {
    /// Source node ID
    pub from: String,
    /// Target node ID
    pub to: String,
    pub style: EdgeStyle,
    /// Predicate qname, if the edge carries one
    pub label: Option<String>,
}

impl EdgeData {
    /// Create a new edge with the given style and no label
    pub fn new(from: impl Into<String>, to: impl Into<String>, style: EdgeStyle) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            style,
            label: None,
        }
    }

    /// Create a new edge with a label
    pub fn with_label(
        from: impl Into<String>,
        to: impl Into<String>,
        style: EdgeStyle,
        label: impl Into<String>,
    ) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new(from, to, style)
        }
    }

    /// Text drawn along the edge: stereotype followed by the label
    pub fn caption(&self) -> Option<String> {
        match (self.style.stereotype(), self.label.as_deref()) {
            (Some(stereotype), Some(label)) => Some(format!("{} {}", stereotype, label)),
            (Some(stereotype), None) => Some(stereotype.to_string()),
            (None, Some(label)) => Some(label.to_string()),
            (None, None) => None,
        }
    }
}

/// A visual group of nodes, one per RDF context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    /// Sanitized context identifier
    pub name: String,
    /// Context identifier without its enclosing decoration
    pub label: String,
    /// Member node ids in insertion order
    pub node_ids: Vec<String>,
}

impl Cluster {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            node_ids: Vec::new(),
        }
    }
}
