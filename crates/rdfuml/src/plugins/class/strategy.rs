//! Class diagram extraction
//!
//! Classes are resources typed `rdfs:Class` or `owl:Class`, including
//! anonymous ones (skolemized blank nodes, drawn as `_:label`). A
//! restriction that yields a cardinality edge is drawn as that edge instead
//! of a subclass edge to the restriction.

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use super::owl::{cardinality_bounds, PropertyTraits};
use crate::core::{
    apply_legend, for_each_context, DiagramModel, ExtractionReport, ExtractionStrategy,
    GraphQuery, NamespaceResolver, Solution, TripleStore,
};

const CLASSES: &str = "\
SELECT DISTINCT ?class WHERE {
    ?class a ?c .
    FILTER (?c IN (rdfs:Class, owl:Class))
} ORDER BY ?class";

fn datatype_properties_query(class: &str) -> String {
    format!(
        "SELECT DISTINCT ?property ?range WHERE {{
            ?property rdfs:domain <{}> ;
                a owl:DatatypeProperty .
            OPTIONAL {{ ?property rdfs:range ?range . }}
        }} ORDER BY ?property ?range",
        class
    )
}

const OBJECT_PROPERTIES: &str = "\
SELECT DISTINCT ?src ?property ?dest WHERE {
    ?property a owl:ObjectProperty ;
        rdfs:domain ?src ;
        rdfs:range ?dest .
} ORDER BY ?src ?property ?dest";

// Mirrors the restriction pattern below: only restrictions that become a
// cardinality edge lose their subclass edge.
const SUBCLASSES: &str = "\
SELECT DISTINCT ?src ?dest WHERE {
    ?src rdfs:subClassOf ?dest .
    FILTER NOT EXISTS {
        ?dest a owl:Restriction ;
            owl:onProperty ?property ;
            owl:onClass|owl:someValuesFrom|owl:allValuesFrom ?target .
    }
} ORDER BY ?src ?dest";

const EQUIVALENT_CLASSES: &str = "\
SELECT DISTINCT ?src ?dest WHERE {
    ?src owl:equivalentClass ?dest .
} ORDER BY ?src ?dest";

/// Members of the `owl:unionOf`/`owl:oneOf` list owned by each class
fn list_members_query(list_property: &str) -> String {
    format!(
        "SELECT DISTINCT ?class ?member WHERE {{
            ?class {} ?list .
            ?list rdf:rest*/rdf:first ?member .
        }} ORDER BY ?class ?member",
        list_property
    )
}

/// One row per restriction; a restriction stating both the plain and the
/// qualified form of a bound yields the tightest value.
const RESTRICTIONS: &str = "\
SELECT ?class ?property ?target
    (MAX(xsd:integer(STR(?min_value))) AS ?min)
    (MIN(xsd:integer(STR(?max_value))) AS ?max)
    (MIN(xsd:integer(STR(?exact_value))) AS ?exact)
WHERE {
    ?class rdfs:subClassOf ?restriction .
    ?restriction a owl:Restriction ;
        owl:onProperty ?property .
    OPTIONAL { ?restriction owl:onClass ?on_class . }
    OPTIONAL { ?restriction owl:someValuesFrom ?some . }
    OPTIONAL { ?restriction owl:allValuesFrom ?all . }
    OPTIONAL { ?restriction owl:minCardinality|owl:minQualifiedCardinality ?min_value . }
    OPTIONAL { ?restriction owl:maxCardinality|owl:maxQualifiedCardinality ?max_value . }
    OPTIONAL { ?restriction owl:cardinality|owl:qualifiedCardinality ?exact_value . }
    BIND (COALESCE(?on_class, ?some, ?all) AS ?target)
    FILTER (BOUND(?target))
}
GROUP BY ?restriction ?class ?property ?target
ORDER BY ?class ?property ?target ?restriction";

fn bound(row: &Solution, variable: &str) -> Option<u32> {
    row.get(variable).and_then(|term| term.value().trim().parse().ok())
}

/// Strategy producing a UML class diagram from RDFS/OWL vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassDiagramStrategy;

impl ClassDiagramStrategy {
    pub fn new() -> Self {
        Self
    }

    fn extract<G: GraphQuery>(
        &self,
        graph: &G,
        namespaces: &NamespaceResolver,
        model: &mut DiagramModel,
    ) -> Result<()> {
        self.add_classes(graph, namespaces, model)?;

        let traits = PropertyTraits::collect(graph)?;
        for row in graph.select(OBJECT_PROPERTIES)? {
            let src = row.require_iri("src")?;
            let property = row.require_iri("property")?;
            let dest = row.require_iri("dest")?;
            let style = traits.edge_style(property, dest);
            trace!(property, %style, "Object property");
            model.add_styled_edge(
                &namespaces.qname(src),
                &namespaces.qname(dest),
                style,
                Some(&namespaces.qname(property)),
            )?;
        }

        for row in graph.select(SUBCLASSES)? {
            model.add_subclass_edge(
                &namespaces.qname(row.require_iri("src")?),
                &namespaces.qname(row.require_iri("dest")?),
            )?;
        }

        self.add_owl_edges(graph, namespaces, model)
    }

    fn add_classes<G: GraphQuery>(
        &self,
        graph: &G,
        namespaces: &NamespaceResolver,
        model: &mut DiagramModel,
    ) -> Result<()> {
        let classes = graph.select(CLASSES)?;
        debug!(classes = classes.len(), "Found classes");

        for row in &classes {
            let class = row.require_iri("class")?;
            let mut attributes = Vec::new();
            for property_row in graph.select(&datatype_properties_query(class))? {
                let mut text = namespaces.qname(property_row.require_iri("property")?);
                if let Some(range) = property_row.get("range") {
                    text.push_str(" = ");
                    text.push_str(&namespaces.qname(range.value()));
                }
                attributes.push(text);
            }
            model.add_class_node(&namespaces.qname(class), attributes)?;
        }
        Ok(())
    }

    fn add_owl_edges<G: GraphQuery>(
        &self,
        graph: &G,
        namespaces: &NamespaceResolver,
        model: &mut DiagramModel,
    ) -> Result<()> {
        for row in graph.select(EQUIVALENT_CLASSES)? {
            model.add_equivalent_class_edge(
                &namespaces.qname(row.require_iri("src")?),
                &namespaces.qname(row.require_iri("dest")?),
            )?;
        }

        for row in graph.select(&list_members_query("owl:unionOf"))? {
            model.add_union_of_edge(
                &namespaces.qname(row.require_iri("class")?),
                &namespaces.qname(row.require_iri("member")?),
            )?;
        }

        for row in graph.select(&list_members_query("owl:oneOf"))? {
            model.add_one_of_edge(
                &namespaces.qname(row.require_iri("class")?),
                &namespaces.qname(row.require_iri("member")?),
            )?;
        }

        let restrictions = graph.select(RESTRICTIONS)?;
        debug!(restrictions = restrictions.len(), "Found restrictions");
        for row in &restrictions {
            let (min, max) = cardinality_bounds(bound(row, "min"), bound(row, "max"), bound(row, "exact"));
            model.add_cardinality_edge(
                &namespaces.qname(row.require_iri("class")?),
                &namespaces.qname(row.require_iri("target")?),
                &namespaces.qname(row.require_iri("property")?),
                min,
                max,
            )?;
        }
        Ok(())
    }
}

impl<S: TripleStore> ExtractionStrategy<S> for ClassDiagramStrategy {
    fn name(&self) -> &'static str {
        "class"
    }

    fn run(&self, store: &S, model: &mut DiagramModel) -> Result<ExtractionReport> {
        let run_span = span!(Level::INFO, "class_diagram");
        let _enter = run_span.enter();

        let namespaces = store.namespaces();
        let report = for_each_context(store, model, |graph, model| {
            self.extract(graph, namespaces, model)
        })?;
        apply_legend(store, model)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EdgeStyle, InputFormat, NodeKind, RenderableGraph};
    use crate::plugins::store::OxigraphStore;

    const PREFIXES: &str = r#"
        @prefix ex: <http://example.org/> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
    "#;

    fn run(body: &str) -> RenderableGraph {
        let mut store = OxigraphStore::new().unwrap();
        store
            .load_str(&format!("{}{}", PREFIXES, body), InputFormat::Turtle, "file://onto.ttl")
            .unwrap();
        let mut model = DiagramModel::new();
        ClassDiagramStrategy::new().run(&store, &mut model).unwrap();
        model.finalize().unwrap()
    }

    fn styles(graph: &RenderableGraph) -> Vec<(String, String, EdgeStyle)> {
        graph
            .edges
            .iter()
            .map(|e| (e.from.clone(), e.to.clone(), e.style))
            .collect()
    }

    #[test]
    fn test_animal_scenario() {
        let graph = run(r#"
            ex:Animal a owl:Class .
            ex:Dog a owl:Class ; rdfs:subClassOf ex:Animal .
            ex:name a owl:DatatypeProperty ; rdfs:domain ex:Animal ; rdfs:range xsd:string .
            ex:owner a owl:ObjectProperty ; rdfs:domain ex:Dog ; rdfs:range ex:Person .
        "#);

        let animal = graph.node("ex_Animal").unwrap();
        assert_eq!(animal.kind, NodeKind::Class);
        assert_eq!(animal.attributes, vec!["ex:name = xsd:string"]);
        assert!(graph.node("ex_Dog").unwrap().attributes.is_empty());

        assert_eq!(
            styles(&graph),
            vec![
                ("ex_Dog".into(), "ex_Person".into(), EdgeStyle::Plain),
                ("ex_Dog".into(), "ex_Animal".into(), EdgeStyle::Subclass),
            ]
        );
        assert_eq!(graph.edges[0].label.as_deref(), Some("ex:owner"));

        let placeholders: Vec<_> = graph.placeholders().map(|n| n.name.as_str()).collect();
        assert_eq!(placeholders, vec!["ex:Person"]);
    }

    #[test]
    fn test_datatype_property_without_range() {
        let graph = run(r#"
            ex:Thing a rdfs:Class .
            ex:code a owl:DatatypeProperty ; rdfs:domain ex:Thing .
        "#);
        assert_eq!(graph.node("ex_Thing").unwrap().attributes, vec!["ex:code"]);
    }

    #[test]
    fn test_property_characteristics() {
        let graph = run(r#"
            ex:A a owl:Class .
            ex:B a owl:Class .
            ex:f a owl:ObjectProperty, owl:FunctionalProperty ; rdfs:domain ex:A ; rdfs:range ex:B .
            ex:i a owl:ObjectProperty, owl:InverseFunctionalProperty ; rdfs:domain ex:A ; rdfs:range ex:B .
            ex:s a owl:ObjectProperty, owl:SymmetricProperty ; rdfs:domain ex:A ; rdfs:range ex:A .
        "#);
        let found: Vec<_> = graph.edges.iter().map(|e| e.style).collect();
        assert_eq!(
            found,
            vec![EdgeStyle::Functional, EdgeStyle::InverseFunctional, EdgeStyle::Symmetric]
        );
    }

    #[test]
    fn test_container_range_is_aggregation() {
        let graph = run(r#"
            ex:Order a owl:Class .
            ex:Items a owl:Class ; rdfs:subClassOf rdf:List .
            ex:items a owl:ObjectProperty, owl:FunctionalProperty ; rdfs:domain ex:Order ; rdfs:range ex:Items .
        "#);
        assert_eq!(graph.edges[0].style, EdgeStyle::Aggregation);
        assert_eq!(graph.edges[0].to, "ex_Items");
    }

    fn anonymous_class(graph: &RenderableGraph) -> String {
        let anon: Vec<_> = graph.nodes.iter().filter(|n| n.name.starts_with("_:")).collect();
        assert_eq!(anon.len(), 1, "{:?}", graph.nodes);
        assert_eq!(anon[0].kind, NodeKind::Class);
        anon[0].id.clone()
    }

    #[test]
    fn test_union_and_equivalence() {
        let graph = run(r#"
            ex:Cat a owl:Class .
            ex:Dog a owl:Class .
            ex:Pet a owl:Class ; owl:equivalentClass [ a owl:Class ; owl:unionOf (ex:Cat ex:Dog) ] .
            ex:Hound a owl:Class ; owl:equivalentClass ex:Dog .
        "#);
        let anon = anonymous_class(&graph);
        assert!(graph.nodes.iter().all(|n| !n.name.contains("genid")));
        assert_eq!(
            styles(&graph),
            vec![
                ("ex_Hound".into(), "ex_Dog".into(), EdgeStyle::EquivalentClass),
                ("ex_Pet".into(), anon.clone(), EdgeStyle::EquivalentClass),
                (anon.clone(), "ex_Cat".into(), EdgeStyle::UnionOf),
                (anon, "ex_Dog".into(), EdgeStyle::UnionOf),
            ]
        );
    }

    #[test]
    fn test_anonymous_union_range() {
        let graph = run(r#"
            ex:A a owl:Class .
            ex:B a owl:Class .
            ex:C a owl:Class .
            ex:p a owl:ObjectProperty ;
                rdfs:domain ex:A ;
                rdfs:range [ a owl:Class ; owl:unionOf (ex:B ex:C) ] .
        "#);
        let anon = anonymous_class(&graph);
        assert_eq!(graph.placeholders().count(), 0);

        let styles = styles(&graph);
        assert!(styles.contains(&("ex_A".into(), anon.clone(), EdgeStyle::Plain)));
        let members: Vec<_> = styles
            .iter()
            .filter(|(from, _, style)| *from == anon && *style == EdgeStyle::UnionOf)
            .map(|(_, to, _)| to.as_str())
            .collect();
        assert_eq!(members, vec!["ex_B", "ex_C"]);
    }

    #[test]
    fn test_one_of_enumeration() {
        let graph = run(r#"
            ex:Color a owl:Class ; owl:oneOf (ex:Red ex:Green) .
        "#);
        assert_eq!(
            styles(&graph),
            vec![
                ("ex_Color".into(), "ex_Green".into(), EdgeStyle::OneOf),
                ("ex_Color".into(), "ex_Red".into(), EdgeStyle::OneOf),
            ]
        );
    }

    #[test]
    fn test_cardinality_restrictions() {
        let graph = run(r#"
            ex:Car a owl:Class ;
                rdfs:subClassOf [
                    a owl:Restriction ;
                    owl:onProperty ex:wheel ;
                    owl:onClass ex:Wheel ;
                    owl:qualifiedCardinality "4"^^xsd:nonNegativeInteger
                ] ,
                [
                    a owl:Restriction ;
                    owl:onProperty ex:driver ;
                    owl:someValuesFrom ex:Person ;
                    owl:minCardinality "1"^^xsd:nonNegativeInteger ;
                    owl:maxCardinality "2"^^xsd:nonNegativeInteger
                ] .
        "#);

        // no subclass edge points at a restriction
        assert!(graph.edges.iter().all(|e| e.style != EdgeStyle::Subclass));
        assert_eq!(
            styles(&graph),
            vec![
                ("ex_Car".into(), "ex_Person".into(), EdgeStyle::MinMaxCardinality { min: 1, max: 2 }),
                ("ex_Car".into(), "ex_Wheel".into(), EdgeStyle::MinMaxCardinality { min: 4, max: 4 }),
            ]
        );
        assert_eq!(graph.edges[1].style.head_label().as_deref(), Some("4"));
        assert_eq!(graph.edges[0].label.as_deref(), Some("ex:driver"));
    }

    #[test]
    fn test_restriction_without_target_stays_a_superclass() {
        let graph = run(r#"
            ex:Car a owl:Class ;
                rdfs:subClassOf [
                    a owl:Restriction ;
                    owl:onProperty ex:wheel ;
                    owl:hasValue ex:FrontWheel
                ] .
        "#);
        let subclass: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.style == EdgeStyle::Subclass)
            .collect();
        assert_eq!(subclass.len(), 1);
        assert_eq!(subclass[0].from, "ex_Car");
        assert!(graph.node(&subclass[0].to).unwrap().name.starts_with("_:"));
        assert!(graph
            .edges
            .iter()
            .all(|e| !matches!(e.style, EdgeStyle::MinMaxCardinality { .. })));
    }

    #[test]
    fn test_plain_and_qualified_bound_yield_one_edge() {
        let graph = run(r#"
            ex:Car a owl:Class ;
                rdfs:subClassOf [
                    a owl:Restriction ;
                    owl:onProperty ex:seat ;
                    owl:onClass ex:Seat ;
                    owl:minCardinality "1"^^xsd:nonNegativeInteger ;
                    owl:minQualifiedCardinality "2"^^xsd:nonNegativeInteger
                ] .
        "#);
        assert_eq!(
            styles(&graph),
            vec![("ex_Car".into(), "ex_Seat".into(), EdgeStyle::MinCardinality { min: 2 })]
        );
    }
}
