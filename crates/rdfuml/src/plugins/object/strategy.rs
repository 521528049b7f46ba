//! Object diagram extraction
//!
//! Every typed resource that is not itself a class or property becomes an
//! object node listing its classes and literal values. Every non-literal
//! triple that is not schema vocabulary becomes a plain edge.

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use crate::core::{
    apply_legend, for_each_context, DiagramModel, ExtractionReport, ExtractionStrategy,
    GraphQuery, NamespaceResolver, RdfUmlError, TripleStore,
};

const TYPED_NODES: &str = "\
SELECT DISTINCT ?node WHERE {
    ?node a ?class .
    FILTER (?class NOT IN (rdfs:Class, owl:Class, owl:Property, owl:ObjectProperty, owl:DatatypeProperty))
} ORDER BY ?node";

const CONNECTIONS: &str = "\
SELECT DISTINCT ?c1 ?p ?c2 WHERE {
    ?c1 ?p ?c2 .
    FILTER (!isLiteral(?c2))
    FILTER (?p NOT IN (rdf:type, rdfs:domain, rdfs:range, rdfs:subClassOf))
} ORDER BY ?c1 ?p ?c2";

fn classes_query(node: &str) -> String {
    format!("SELECT DISTINCT ?class WHERE {{ {} a ?class . }} ORDER BY ?class", node)
}

fn attributes_query(node: &str) -> String {
    format!(
        "SELECT DISTINCT ?p ?o WHERE {{ {} ?p ?o . FILTER (isLiteral(?o)) }} ORDER BY ?p ?o",
        node
    )
}

/// Strategy producing a UML object diagram
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectDiagramStrategy;

impl ObjectDiagramStrategy {
    pub fn new() -> Self {
        Self
    }

    fn extract<G: GraphQuery>(
        &self,
        graph: &G,
        namespaces: &NamespaceResolver,
        model: &mut DiagramModel,
    ) -> Result<()> {
        let nodes = graph.select(TYPED_NODES)?;
        debug!(nodes = nodes.len(), "Found typed resources");

        for row in &nodes {
            let node = row
                .get("node")
                .ok_or_else(|| RdfUmlError::query_error("typed node query returned no ?node"))?;
            let node_ref = node.to_sparql();

            let mut classes = Vec::new();
            for class_row in graph.select(&classes_query(&node_ref))? {
                classes.push(namespaces.qname(class_row.require_iri("class")?));
            }

            let mut attributes = Vec::new();
            for attribute_row in graph.select(&attributes_query(&node_ref))? {
                let predicate = namespaces.qname(attribute_row.require_iri("p")?);
                let value = attribute_row.get("o").map_or("", |term| term.value());
                attributes.push(format!("{} = {}", predicate, value));
            }

            let qname = namespaces.qname(node.value());
            trace!(node = %qname, classes = classes.len(), attributes = attributes.len(), "Object node");
            model.add_object_node(&qname, &classes.join(", "), attributes)?;
        }

        let connections = graph.select(CONNECTIONS)?;
        debug!(edges = connections.len(), "Found connections");
        for row in &connections {
            let src = row.get("c1").map(|t| namespaces.qname(t.value()));
            let predicate = row.require_iri("p")?;
            let dst = row.get("c2").map(|t| namespaces.qname(t.value()));
            if let (Some(src), Some(dst)) = (src, dst) {
                model.add_edge(&src, &dst, &namespaces.qname(predicate))?;
            }
        }
        Ok(())
    }
}

impl<S: TripleStore> ExtractionStrategy<S> for ObjectDiagramStrategy {
    fn name(&self) -> &'static str {
        "object"
    }

    fn run(&self, store: &S, model: &mut DiagramModel) -> Result<ExtractionReport> {
        let run_span = span!(Level::INFO, "object_diagram");
        let _enter = run_span.enter();

        let namespaces = store.namespaces();
        let report = for_each_context(store, model, |graph, model| {
            self.extract(graph, namespaces, model)
        })?;
        apply_legend(store, model)?;
        Ok(report)
    }
}
