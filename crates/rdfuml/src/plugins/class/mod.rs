//! Class diagram plugin
//!
//! Draws RDFS/OWL classes with their datatype properties as attributes,
//! object properties as associations and the subclass hierarchy, decorated
//! with OWL property characteristics and restrictions.

mod owl;
mod strategy;

pub use owl::{cardinality_bounds, PropertyTraits};
pub use strategy::ClassDiagramStrategy;
