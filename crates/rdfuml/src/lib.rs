//! rdfuml - Turn RDF datasets into UML-like diagrams
//!
//! Every context (named graph) of the input becomes a cluster. The object
//! strategy draws typed resources as instance boxes; the class strategy
//! draws RDFS/OWL classes, properties and the subclass hierarchy. Graphviz
//! lays out the result, and SVG output gets hyperlinks back to the
//! namespace URIs.
//!
//! # Quick Start
//!
//! ```rust
//! use rdfuml::turtle_to_dot;
//! use rdfuml::plugins::StrategyKind;
//!
//! let turtle = r#"
//!     @prefix ex: <http://example.org/> .
//!     ex:alice a ex:Person ; ex:name "Alice" .
//! "#;
//! let dot = turtle_to_dot(turtle, StrategyKind::Object).unwrap();
//! assert!(dot.contains("ex:name = Alice"));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use rdfuml::prelude::*;
//!
//! let mut store = OxigraphStore::new().unwrap();
//! store
//!     .load_str(
//!         "@prefix ex: <http://example.org/> .\n\
//!          @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
//!          ex:Dog a rdfs:Class .",
//!         InputFormat::Turtle,
//!         "file://zoo.ttl",
//!     )
//!     .unwrap();
//!
//! let mut model = DiagramModel::new();
//! ClassDiagramStrategy::new().run(&store, &mut model).unwrap();
//! let graph = model.finalize().unwrap();
//! assert_eq!(graph.node("ex_Dog").unwrap().kind, NodeKind::Class);
//!
//! let mut renderer = DotGraph::new(RenderConfig::default());
//! graph.draw(&mut renderer).unwrap();
//! assert!(renderer.source().contains("cluster_file___zoo_ttl"));
//! ```

pub mod core;
pub mod plugins;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        sanitize, Context, DiagramModel, EdgeStyle, ExtractionStrategy, GraphQuery,
        InputFormat, NamespaceResolver, NodeKind, RdfUmlError, RenderConfig, RenderableGraph,
        Renderer, TripleStore,
    };
    pub use crate::plugins::{
        linkify, ClassDiagramStrategy, ConvertOptions, Converter, DotGraph, DotWriter,
        ObjectDiagramStrategy, OxigraphStore, RendererKind, StrategyKind,
    };
}

/// Convert Turtle text to DOT source without running Graphviz
///
/// The text is loaded as a single context named `file://input.ttl`.
///
/// # Example
/// ```rust
/// use rdfuml::turtle_to_dot;
/// use rdfuml::plugins::StrategyKind;
///
/// let dot = turtle_to_dot("<http://e.org/a> a <http://e.org/T> .", StrategyKind::Object).unwrap();
/// assert!(dot.starts_with("digraph G {"));
/// ```
pub fn turtle_to_dot(input: &str, strategy: plugins::StrategyKind) -> anyhow::Result<String> {
    let (graph, _) = extract_turtle(input, strategy)?;
    let mut renderer = plugins::DotWriter::new(RenderConfig::default());
    graph.draw(&mut renderer)?;
    Ok(renderer.source())
}

/// Run a strategy over Turtle text and return the finalized diagram
///
/// # Example
/// ```rust
/// use rdfuml::extract_turtle;
/// use rdfuml::plugins::StrategyKind;
///
/// let (graph, report) = extract_turtle(
///     "<http://e.org/a> a <http://e.org/T> ; <http://e.org/p> <http://e.org/b> .",
///     StrategyKind::Object,
/// )
/// .unwrap();
/// assert_eq!(graph.nodes.len(), 2);
/// assert!(report.warnings.is_empty());
/// ```
pub fn extract_turtle(
    input: &str,
    strategy: plugins::StrategyKind,
) -> anyhow::Result<(RenderableGraph, ExtractionReport)> {
    let mut converter = plugins::Converter::new(plugins::ConvertOptions {
        strategy,
        ..Default::default()
    })?;
    converter.load_str(input, InputFormat::Turtle, "file://input.ttl")?;
    converter.extract()
}
