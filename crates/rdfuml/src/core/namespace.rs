//! Namespace prefix table
//!
//! Converts full URIs into compact `prefix:localname` labels and provides
//! the sorted namespace legend shown in the diagram.

use serde::Serialize;

use super::SKOLEM_BASE;

/// Namespaces every resolver starts with
pub const DEFAULT_NAMESPACES: [(&str, &str); 5] = [
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// A single (prefix, namespace URI) binding
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct NamespaceBinding {
    pub prefix: String,
    pub uri: String,
}

impl NamespaceBinding {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

/// Prefix table with qname abbreviation
///
/// Bindings are kept in the order they were made. Re-binding a prefix
/// replaces its URI and moves it to the most recent position.
#[derive(Debug, Clone)]
pub struct NamespaceResolver {
    bindings: Vec<NamespaceBinding>,
}

impl NamespaceResolver {
    /// Create a resolver with the default RDF/RDFS/OWL/XSD/XML bindings
    pub fn new() -> Self {
        let mut resolver = Self::empty();
        for (prefix, uri) in DEFAULT_NAMESPACES {
            resolver.bind(prefix, uri);
        }
        resolver
    }

    /// Create a resolver without any bindings
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Register a namespace, shadowing any earlier binding of the same prefix
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        self.bindings.retain(|b| b.prefix != prefix);
        self.bindings.push(NamespaceBinding::new(prefix, uri));
    }

    /// Look up the URI bound to a prefix
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.prefix == prefix)
            .map(|b| b.uri.as_str())
    }

    /// Abbreviate a URI as `prefix:localname`
    ///
    /// The longest matching namespace wins; on equal length the most recent
    /// binding wins. A URI that no namespace covers is returned unchanged.
    /// Skolemized blank nodes are shown as `_:label`.
    ///
    /// # Example
    /// ```
    /// use rdfuml::core::NamespaceResolver;
    ///
    /// let mut ns = NamespaceResolver::new();
    /// ns.bind("ex", "http://example.org/");
    /// assert_eq!(ns.qname("http://example.org/Person"), "ex:Person");
    /// assert_eq!(ns.qname("urn:isbn:123"), "urn:isbn:123");
    /// ```
    pub fn qname(&self, uri: &str) -> String {
        if let Some(label) = uri.strip_prefix(SKOLEM_BASE) {
            return format!("_:{}", label);
        }

        let mut best: Option<&NamespaceBinding> = None;
        for binding in self.bindings.iter().rev() {
            if binding.uri.is_empty() || uri.len() <= binding.uri.len() {
                continue;
            }
            if !uri.starts_with(&binding.uri) {
                continue;
            }
            if best.map_or(true, |b| binding.uri.len() > b.uri.len()) {
                best = Some(binding);
            }
        }

        match best {
            Some(binding) => format!("{}:{}", binding.prefix, &uri[binding.uri.len()..]),
            None => uri.to_string(),
        }
    }

    /// Bindings sorted by prefix, as shown in the namespace legend
    pub fn legend(&self) -> Vec<NamespaceBinding> {
        let mut legend = self.bindings.clone();
        legend.sort();
        legend
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new()
    }
}
