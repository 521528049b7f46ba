//! Triple store interface
//!
//! Extraction strategies see RDF data only through these traits: a store
//! lists its contexts (named graphs) and hands out skolemized copies of
//! them, which answer ordered SPARQL SELECT queries.

use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::{NamespaceResolver, RdfUmlError};

/// Namespace of the IRIs a store mints in place of blank nodes
pub const SKOLEM_BASE: &str = "https://rdfuml.invalid/.well-known/genid/";

/// RDF serialization formats accepted as input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    RdfXml,
    N3,
    Turtle,
    NTriples,
    TriG,
    NQuads,
}

impl InputFormat {
    /// Guess the format from a file extension
    ///
    /// A path without extension (or stdin) is read as Turtle.
    ///
    /// # Example
    /// ```
    /// use rdfuml::core::InputFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(InputFormat::from_path(Path::new("a.owl")).unwrap(), InputFormat::RdfXml);
    /// assert_eq!(InputFormat::from_path(Path::new("data")).unwrap(), InputFormat::Turtle);
    /// assert!(InputFormat::from_path(Path::new("a.docx")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self, RdfUmlError> {
        let extension = match path.extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            None => return Ok(InputFormat::Turtle),
        };
        match extension.as_str() {
            "xml" | "rdf" | "owl" => Ok(InputFormat::RdfXml),
            "n3" => Ok(InputFormat::N3),
            "ttl" => Ok(InputFormat::Turtle),
            "nt" => Ok(InputFormat::NTriples),
            "trig" => Ok(InputFormat::TriG),
            "nq" => Ok(InputFormat::NQuads),
            other => Err(RdfUmlError::unsupported_format(format!(".{}", other))),
        }
    }

    /// Pick the explicit override if given, otherwise guess from the path
    pub fn resolve(hint: Option<&str>, path: &Path) -> Result<Self, RdfUmlError> {
        match hint {
            Some(name) => name.parse(),
            None => Self::from_path(path),
        }
    }

    /// Whether the format's syntax declares prefixes with `@prefix`/`PREFIX`
    pub fn has_turtle_prefixes(&self) -> bool {
        matches!(self, InputFormat::N3 | InputFormat::Turtle | InputFormat::TriG)
    }

    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["xml", "n3", "turtle", "nt", "trig", "nquads"]
    }
}

impl FromStr for InputFormat {
    type Err = RdfUmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xml" | "rdfxml" | "rdf/xml" => Ok(InputFormat::RdfXml),
            "n3" => Ok(InputFormat::N3),
            "turtle" | "ttl" => Ok(InputFormat::Turtle),
            "nt" | "ntriples" | "n-triples" => Ok(InputFormat::NTriples),
            "trig" => Ok(InputFormat::TriG),
            "nquads" | "nq" | "n-quads" => Ok(InputFormat::NQuads),
            _ => Err(RdfUmlError::unsupported_format(s)),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::RdfXml => write!(f, "xml"),
            InputFormat::N3 => write!(f, "n3"),
            InputFormat::Turtle => write!(f, "turtle"),
            InputFormat::NTriples => write!(f, "nt"),
            InputFormat::TriG => write!(f, "trig"),
            InputFormat::NQuads => write!(f, "nquads"),
        }
    }
}

/// A context (sub-graph) of a dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Context {
    /// Triples not assigned to any named graph
    Default,
    /// A named graph, identified by IRI or `_:` blank node label
    Named(String),
}

impl Context {
    pub fn named(name: impl Into<String>) -> Self {
        Context::Named(name.into())
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Context::Default)
    }

    /// Decorated name, `[<iri>]` style, used for cluster naming
    pub fn raw_name(&self) -> String {
        match self {
            Context::Default => "[<urn:x-rdfuml:default>]".to_string(),
            Context::Named(name) => format!("[<{}>]", name),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Default => write!(f, "default graph"),
            Context::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A term bound in a query solution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Blank(String),
    /// Lexical form of a literal
    Literal(String),
}

impl Term {
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Whether the term stood for a blank node before skolemization
    pub fn is_skolem(&self) -> bool {
        match self {
            Term::Iri(iri) => iri.starts_with(SKOLEM_BASE),
            Term::Blank(_) => true,
            Term::Literal(_) => false,
        }
    }

    /// IRI, blank label or lexical value
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(v) | Term::Blank(v) | Term::Literal(v) => v,
        }
    }

    /// SPARQL syntax for embedding the term in a query
    pub fn to_sparql(&self) -> String {
        match self {
            Term::Iri(iri) => format!("<{}>", iri),
            Term::Blank(label) => format!("_:{}", label),
            Term::Literal(value) => format!(
                "\"{}\"",
                value.replace('\\', "\\\\").replace('"', "\\\"")
            ),
        }
    }
}

/// One row of a SELECT result, keyed by variable name without `?`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    bindings: HashMap<String, Term>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, variable: &str, term: Term) -> Self {
        self.bind(variable, term);
        self
    }

    pub fn bind(&mut self, variable: &str, term: Term) {
        self.bindings.insert(variable.to_string(), term);
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings.get(variable)
    }

    /// The IRI bound to a variable, if it is bound to an IRI
    pub fn iri(&self, variable: &str) -> Option<&str> {
        self.get(variable).and_then(Term::as_iri)
    }

    /// Like [`Solution::iri`] but failing on a missing or non-IRI binding
    pub fn require_iri(&self, variable: &str) -> Result<&str, RdfUmlError> {
        self.iri(variable).ok_or_else(|| {
            RdfUmlError::query_error(format!("variable ?{} is not bound to an IRI", variable))
        })
    }
}

/// A skolemized, queryable copy of one context
pub trait GraphQuery {
    /// Number of triples
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evaluate a SPARQL SELECT query; `rdf:`, `rdfs:`, `owl:` and `xsd:`
    /// are predeclared
    fn select(&self, query: &str) -> Result<Vec<Solution>>;
}

/// Core trait for triple stores
pub trait TripleStore {
    /// The skolemized graph type handed to strategies
    type Graph: GraphQuery;

    /// Register an additional namespace binding
    fn bind_namespace(&mut self, prefix: &str, uri: &str);

    fn namespaces(&self) -> &NamespaceResolver;

    /// All contexts in a stable order
    fn contexts(&self) -> Result<Vec<Context>>;

    /// Copy a context with blank nodes replaced by stable IRIs
    fn skolemize(&self, context: &Context) -> Result<Self::Graph>;
}
