//! In-memory triple store backed by oxigraph

use anyhow::Result;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{
    BlankNode, GraphName, GraphNameRef, NamedNode, NamedOrBlankNode, Quad, Subject,
    Term as OxTerm,
};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, span, trace, Level};

use super::prefixes::declared_prefixes;
use crate::core::{
    Context, GraphQuery, InputFormat, NamespaceResolver, RdfUmlError, Solution, Term, TripleStore,
    SKOLEM_BASE,
};

/// Context name used for input read from stdin
pub const STDIN_CONTEXT: &str = "file://stdin";

/// Prefixes declared for every query a strategy runs
const SPARQL_PROLOGUE: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
";

fn rdf_format(format: InputFormat) -> RdfFormat {
    match format {
        InputFormat::RdfXml => RdfFormat::RdfXml,
        InputFormat::N3 => RdfFormat::N3,
        InputFormat::Turtle => RdfFormat::Turtle,
        InputFormat::NTriples => RdfFormat::NTriples,
        InputFormat::TriG => RdfFormat::TriG,
        InputFormat::NQuads => RdfFormat::NQuads,
    }
}

/// Bytes kept as-is in a file context; everything else is percent-encoded
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Context IRI for a file: `file://` followed by the path as given
///
/// Characters an IRI cannot carry literally (spaces, brackets, `%`, `#`)
/// are percent-encoded so any readable file yields a valid context.
pub fn file_context(path: &Path) -> String {
    format!(
        "file://{}",
        utf8_percent_encode(&path.to_string_lossy(), PATH_SEGMENT)
    )
}

fn graph_name(context: &Context) -> Result<GraphName, RdfUmlError> {
    match context {
        Context::Default => Ok(GraphName::DefaultGraph),
        Context::Named(name) => match name.strip_prefix("_:") {
            Some(id) => BlankNode::new(id)
                .map(GraphName::from)
                .map_err(|e| RdfUmlError::query_error(format!("invalid graph name {}: {}", name, e))),
            None => NamedNode::new(name.as_str())
                .map(GraphName::from)
                .map_err(|e| RdfUmlError::query_error(format!("invalid graph name {}: {}", name, e))),
        },
    }
}

fn skolem_iri(node: &BlankNode) -> NamedNode {
    NamedNode::new_unchecked(format!("{}{}", SKOLEM_BASE, node.as_str()))
}

fn skolemize_subject(subject: Subject) -> Subject {
    match subject {
        Subject::BlankNode(node) => skolem_iri(&node).into(),
        other => other,
    }
}

fn skolemize_object(object: OxTerm) -> OxTerm {
    match object {
        OxTerm::BlankNode(node) => skolem_iri(&node).into(),
        other => other,
    }
}

fn convert_term(term: &OxTerm) -> Term {
    match term {
        OxTerm::NamedNode(node) => Term::Iri(node.as_str().to_string()),
        OxTerm::BlankNode(node) => Term::Blank(node.as_str().to_string()),
        OxTerm::Literal(literal) => Term::Literal(literal.value().to_string()),
        #[allow(unreachable_patterns)]
        other => Term::Literal(other.to_string()),
    }
}

/// Dataset of all loaded inputs, one named graph per input
pub struct OxigraphStore {
    store: Store,
    namespaces: NamespaceResolver,
}

impl OxigraphStore {
    /// Create an empty in-memory store with the default namespaces
    pub fn new() -> Result<Self, RdfUmlError> {
        let store = Store::new().map_err(|e| RdfUmlError::load_error(e.to_string()))?;
        Ok(Self {
            store,
            namespaces: NamespaceResolver::new(),
        })
    }

    /// Load a file into the context `file://<path>`
    ///
    /// `format_hint` overrides detection by extension.
    pub fn load_file(&mut self, path: &Path, format_hint: Option<&str>) -> Result<Context, RdfUmlError> {
        let format = InputFormat::resolve(format_hint, path)?;
        info!(path = %path.display(), %format, "Using rdf format");

        let text = fs::read_to_string(path).map_err(|e| {
            RdfUmlError::load_error(format!("failed to read '{}': {}", path.display(), e))
        })?;
        self.load_str(&text, format, &file_context(path))
    }

    /// Load everything readable from `reader` into [`STDIN_CONTEXT`]
    pub fn load_reader(
        &mut self,
        mut reader: impl Read,
        format_hint: Option<&str>,
    ) -> Result<Context, RdfUmlError> {
        let format = match format_hint {
            Some(name) => name.parse()?,
            None => InputFormat::Turtle,
        };
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.load_str(&text, format, STDIN_CONTEXT)
    }

    /// Parse `text` into the named graph `context`
    ///
    /// Quads of TriG/N-Quads input that name their own graph keep it; all
    /// other triples land in `context`. Prefixes declared by the text are
    /// bound in document order.
    pub fn load_str(&mut self, text: &str, format: InputFormat, context: &str) -> Result<Context, RdfUmlError> {
        let load_span = span!(Level::DEBUG, "load", context, %format, bytes = text.len());
        let _enter = load_span.enter();

        let graph = NamedNode::new(context)
            .map_err(|e| RdfUmlError::load_error(format!("invalid context IRI {}: {}", context, e)))?;
        let parser = RdfParser::from_format(rdf_format(format))
            .with_base_iri(context)
            .map_err(|e| RdfUmlError::load_error(format!("invalid base IRI {}: {}", context, e)))?
            .with_default_graph(graph);

        self.store
            .load_from_reader(parser, text.as_bytes())
            .map_err(|e| RdfUmlError::load_error(format!("{}: {}", context, e)))?;

        for (prefix, uri) in declared_prefixes(text, format, context) {
            trace!(prefix = %prefix, uri = %uri, "Binding declared prefix");
            self.namespaces.bind(&prefix, &uri);
        }

        debug!(triples = self.triple_count()?, "Loaded input");
        Ok(Context::named(context))
    }

    /// Total number of quads across all contexts
    pub fn triple_count(&self) -> Result<usize, RdfUmlError> {
        self.store
            .len()
            .map_err(|e| RdfUmlError::query_error(e.to_string()))
    }
}

impl TripleStore for OxigraphStore {
    type Graph = SkolemGraph;

    fn bind_namespace(&mut self, prefix: &str, uri: &str) {
        self.namespaces.bind(prefix, uri);
    }

    fn namespaces(&self) -> &NamespaceResolver {
        &self.namespaces
    }

    /// Contexts sorted by name, the default graph first when it has triples
    fn contexts(&self) -> Result<Vec<Context>> {
        let mut contexts = Vec::new();
        if self
            .store
            .quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph))
            .next()
            .is_some()
        {
            contexts.push(Context::Default);
        }

        for graph in self.store.named_graphs() {
            let graph = graph.map_err(|e| RdfUmlError::query_error(e.to_string()))?;
            contexts.push(match graph {
                NamedOrBlankNode::NamedNode(node) => Context::named(node.into_string()),
                NamedOrBlankNode::BlankNode(node) => Context::named(format!("_:{}", node.as_str())),
            });
        }

        contexts.sort();
        Ok(contexts)
    }

    fn skolemize(&self, context: &Context) -> Result<SkolemGraph> {
        let graph_name = graph_name(context)?;
        let store = Store::new().map_err(|e| RdfUmlError::query_error(e.to_string()))?;

        let mut len = 0;
        for quad in self
            .store
            .quads_for_pattern(None, None, None, Some(graph_name.as_ref()))
        {
            let quad = quad.map_err(|e| RdfUmlError::query_error(e.to_string()))?;
            let skolemized = Quad::new(
                skolemize_subject(quad.subject),
                quad.predicate,
                skolemize_object(quad.object),
                GraphName::DefaultGraph,
            );
            store
                .insert(&skolemized)
                .map_err(|e| RdfUmlError::query_error(e.to_string()))?;
            len += 1;
        }

        trace!(context = %context, triples = len, "Skolemized context");
        Ok(SkolemGraph { store, len })
    }
}

/// A context copied into its own store, blank nodes replaced by IRIs
pub struct SkolemGraph {
    store: Store,
    len: usize,
}

impl GraphQuery for SkolemGraph {
    fn len(&self) -> usize {
        self.len
    }

    fn select(&self, query: &str) -> Result<Vec<Solution>> {
        trace!(query, "Running query");
        let full_query = format!("{}{}", SPARQL_PROLOGUE, query);
        let results = self
            .store
            .query(full_query.as_str())
            .map_err(|e| RdfUmlError::query_error(e.to_string()))?;

        let QueryResults::Solutions(solutions) = results else {
            return Err(RdfUmlError::query_error("expected a SELECT query").into());
        };

        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| RdfUmlError::query_error(e.to_string()))?;
            let mut row = Solution::new();
            for (variable, term) in solution.iter() {
                row.bind(variable.as_str(), convert_term(term));
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"
        @prefix : <http://example.org/> .
        :a a :Person ;
           :knows [ a :Person ; :name "Bob" ] .
    "#;

    fn loaded() -> OxigraphStore {
        let mut store = OxigraphStore::new().unwrap();
        store
            .load_str(DATA, InputFormat::Turtle, "file://people.ttl")
            .unwrap();
        store
    }

    #[test]
    fn test_load_binds_declared_prefix() {
        let store = loaded();
        assert_eq!(store.namespaces().namespace(""), Some("http://example.org/"));
        assert_eq!(store.namespaces().qname("http://example.org/a"), ":a");
    }

    #[test]
    fn test_contexts_lists_loaded_file() {
        let store = loaded();
        assert_eq!(store.contexts().unwrap(), vec![Context::named("file://people.ttl")]);
        assert_eq!(store.triple_count().unwrap(), 4);
    }

    #[test]
    fn test_skolemize_replaces_blank_nodes() {
        let store = loaded();
        let graph = store.skolemize(&Context::named("file://people.ttl")).unwrap();
        assert_eq!(graph.len(), 4);

        let rows = graph
            .select("SELECT ?o WHERE { <http://example.org/a> <http://example.org/knows> ?o }")
            .unwrap();
        assert_eq!(rows.len(), 1);
        let iri = rows[0].iri("o").unwrap();
        assert!(iri.starts_with(SKOLEM_BASE), "{}", iri);
    }

    #[test]
    fn test_select_has_prologue() {
        let store = loaded();
        let graph = store.skolemize(&Context::named("file://people.ttl")).unwrap();
        let rows = graph
            .select("SELECT DISTINCT ?s WHERE { ?s rdf:type ?c } ORDER BY ?s")
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_ask_query_is_rejected() {
        let store = loaded();
        let graph = store.skolemize(&Context::named("file://people.ttl")).unwrap();
        assert!(graph.select("ASK { ?s ?p ?o }").is_err());
    }

    #[test]
    fn test_trig_named_graphs_become_contexts() {
        let mut store = OxigraphStore::new().unwrap();
        let trig = r#"
            @prefix ex: <http://example.org/> .
            ex:a ex:p ex:b .
            ex:g1 { ex:c ex:p ex:d . }
        "#;
        store
            .load_str(trig, InputFormat::TriG, "file://multi.trig")
            .unwrap();
        assert_eq!(
            store.contexts().unwrap(),
            vec![
                Context::named("file://multi.trig"),
                Context::named("http://example.org/g1"),
            ]
        );
    }

    #[test]
    fn test_invalid_input_is_a_load_error() {
        let mut store = OxigraphStore::new().unwrap();
        let err = store
            .load_str("this is not turtle", InputFormat::Turtle, "file://bad.ttl")
            .unwrap_err();
        assert!(matches!(err, RdfUmlError::LoadError { .. }));
    }

    #[test]
    fn test_file_context_escapes_spaces() {
        assert_eq!(file_context(Path::new("my data.ttl")), "file://my%20data.ttl");
    }

    #[test]
    fn test_file_context_escapes_iri_delimiters() {
        assert_eq!(
            file_context(Path::new("/tmp/data[1].ttl")),
            "file:///tmp/data%5B1%5D.ttl"
        );
        assert_eq!(file_context(Path::new("100%.ttl")), "file://100%25.ttl");
        assert_eq!(file_context(Path::new("a#b.ttl")), "file://a%23b.ttl");
        assert_eq!(file_context(Path::new("my-onto_v1.ttl")), "file://my-onto_v1.ttl");
    }
}
