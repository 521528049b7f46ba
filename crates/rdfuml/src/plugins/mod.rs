//! Plugin implementations behind the core traits
//!
//! The triple store, the two extraction strategies, the DOT renderers and
//! the SVG post-processor, wired together by the [`Converter`].

pub mod class;
pub mod dot;
pub mod linkify;
pub mod object;
pub mod orchestrator;
pub mod store;

pub use class::*;
pub use dot::*;
pub use linkify::*;
pub use object::*;
pub use orchestrator::*;
pub use store::*;
