//! OWL vocabulary lookups used to decorate class diagram edges

use anyhow::Result;
use std::collections::HashSet;

use crate::core::{EdgeStyle, GraphQuery};

const CHARACTERISTICS: &str = "\
SELECT DISTINCT ?property ?kind WHERE {
    ?property a ?kind .
    FILTER (?kind IN (owl:FunctionalProperty, owl:InverseFunctionalProperty, owl:SymmetricProperty))
} ORDER BY ?property ?kind";

const CONTAINER_CLASSES: &str = "\
SELECT DISTINCT ?class WHERE {
    ?class rdfs:subClassOf+ ?container .
    FILTER (?container IN (rdf:List, rdf:Seq, rdf:Bag))
} ORDER BY ?class";

const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";

/// Property characteristics and container classes of one graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTraits {
    functional: HashSet<String>,
    inverse_functional: HashSet<String>,
    symmetric: HashSet<String>,
    containers: HashSet<String>,
}

impl PropertyTraits {
    /// Collect the traits declared in `graph`
    pub fn collect<G: GraphQuery>(graph: &G) -> Result<Self> {
        let mut traits = Self::default();
        for row in graph.select(CHARACTERISTICS)? {
            let property = row.require_iri("property")?.to_string();
            let kind = row.require_iri("kind")?;
            match kind.strip_prefix(OWL_NS) {
                Some("FunctionalProperty") => traits.functional.insert(property),
                Some("InverseFunctionalProperty") => traits.inverse_functional.insert(property),
                Some("SymmetricProperty") => traits.symmetric.insert(property),
                _ => false,
            };
        }
        for row in graph.select(CONTAINER_CLASSES)? {
            traits.containers.insert(row.require_iri("class")?.to_string());
        }
        Ok(traits)
    }

    /// Edge style for object property `property` ranging over `range`
    ///
    /// A container range wins, then functional, inverse functional and
    /// symmetric in that order.
    pub fn edge_style(&self, property: &str, range: &str) -> EdgeStyle {
        if self.containers.contains(range) {
            EdgeStyle::Aggregation
        } else if self.functional.contains(property) {
            EdgeStyle::Functional
        } else if self.inverse_functional.contains(property) {
            EdgeStyle::InverseFunctional
        } else if self.symmetric.contains(property) {
            EdgeStyle::Symmetric
        } else {
            EdgeStyle::Plain
        }
    }
}

/// Lower and upper bound of a restriction
///
/// An exact cardinality sets both bounds and overrides the others.
pub fn cardinality_bounds(
    min: Option<u32>,
    max: Option<u32>,
    exact: Option<u32>,
) -> (Option<u32>, Option<u32>) {
    match exact {
        Some(n) => (Some(n), Some(n)),
        None => (min, max),
    }
}
