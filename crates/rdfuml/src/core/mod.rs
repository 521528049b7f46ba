//! Core abstractions for RDF diagram extraction
//!
//! This module defines the diagram model, the identifier and namespace
//! helpers, and the traits at each seam: triple store, extraction strategy,
//! and renderer.

mod error;
pub mod logging;
mod model;
mod namespace;
mod renderer;
mod sanitize;
mod store;
mod strategy;
mod types;

pub use error::*;
pub use logging::*;
pub use model::*;
pub use namespace::*;
pub use renderer::*;
pub use sanitize::*;
pub use store::*;
pub use strategy::*;
pub use types::*;
