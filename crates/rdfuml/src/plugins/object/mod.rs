//! Object diagram plugin
//!
//! Draws typed resources as instance boxes and the links between them.

mod strategy;

pub use strategy::ObjectDiagramStrategy;
