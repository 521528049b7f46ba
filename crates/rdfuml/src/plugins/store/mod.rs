//! Triple store plugin
//!
//! Loads RDF files into an oxigraph dataset, one named graph per input,
//! and answers strategy queries against skolemized copies of each graph.

mod dataset;
mod prefixes;

pub use dataset::{file_context, OxigraphStore, SkolemGraph, STDIN_CONTEXT};
pub use prefixes::declared_prefixes;
