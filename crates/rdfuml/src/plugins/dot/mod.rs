//! Graphviz DOT renderers
//!
//! [`DotWriter`] streams DOT text as the diagram is drawn; [`DotGraph`]
//! keeps a graph structure and serializes it at the end. Both hand their
//! source to the same [`Graphviz`] runner.

mod graph;
mod graphviz;
mod labels;
mod writer;

pub use graph::DotGraph;
pub use graphviz::{Graphviz, OutputFormat};
pub use labels::{graph_label, is_html_label, quote};
pub use writer::DotWriter;
