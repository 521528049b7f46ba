//! Extraction strategy interface
//!
//! A strategy walks the contexts of a triple store and fills a
//! [`DiagramModel`]. The per-context loop, cluster handling and namespace
//! legend are shared here; strategies supply only their query logic.

use anyhow::Result;
use std::fmt;
use tracing::{debug, info, span, warn, Level};

use super::{Context, DiagramModel, GraphQuery, NamespaceBinding, TripleStore};

/// Non-fatal notice that a context produced no diagram nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyContextWarning {
    pub context: Context,
    pub triples: usize,
}

impl fmt::Display for EmptyContextWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "context {} ({} triples) yields no diagram nodes and was skipped",
            self.context, self.triples
        )
    }
}

/// Summary of one extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Contexts that became clusters
    pub clusters: Vec<Context>,
    pub warnings: Vec<EmptyContextWarning>,
}

/// Core trait for extraction strategies
pub trait ExtractionStrategy<S: TripleStore> {
    /// Get the name of this strategy
    fn name(&self) -> &'static str;

    /// Populate `model` from `store`, ending with the namespace legend
    fn run(&self, store: &S, model: &mut DiagramModel) -> Result<ExtractionReport>;
}

/// Run `extract` once per context inside its own cluster
///
/// The default graph and contexts without triples are skipped. A context
/// whose pass adds no nodes is dropped with an [`EmptyContextWarning`].
pub fn for_each_context<S, F>(
    store: &S,
    model: &mut DiagramModel,
    mut extract: F,
) -> Result<ExtractionReport>
where
    S: TripleStore,
    F: FnMut(&S::Graph, &mut DiagramModel) -> Result<()>,
{
    let mut report = ExtractionReport::default();

    for context in store.contexts()? {
        if context.is_default() {
            debug!("Skipping default graph");
            continue;
        }

        let context_span = span!(Level::DEBUG, "context", name = %context);
        let _enter = context_span.enter();

        let graph = store.skolemize(&context)?;
        if graph.is_empty() {
            debug!("Skipping context without triples");
            continue;
        }

        model.start_cluster(&context.raw_name())?;
        extract(&graph, model)?;
        if model.close_cluster()? {
            report.clusters.push(context);
        } else {
            let warning = EmptyContextWarning {
                context,
                triples: graph.len(),
            };
            warn!(%warning, "Empty context");
            report.warnings.push(warning);
        }
    }

    info!(
        clusters = report.clusters.len(),
        skipped = report.warnings.len(),
        "Walked contexts"
    );
    Ok(report)
}

/// HTML-like Graphviz table listing the namespace bindings
pub fn legend_label(legend: &[NamespaceBinding]) -> String {
    let mut label = String::from(
        "<<table align=\"left\" cellborder=\"0\">\
         <tr><td align=\"center\" colspan=\"2\"><b>Namespaces</b></td></tr>",
    );
    for binding in legend {
        label.push_str(&format!(
            "<tr><td align=\"left\">{}:</td><td align=\"left\">{}</td></tr>",
            escape_html(&binding.prefix),
            escape_html(&binding.uri)
        ));
    }
    label.push_str("</table>>");
    label
}

/// Set the legend as diagram label
pub fn apply_legend<S: TripleStore>(store: &S, model: &mut DiagramModel) -> Result<()> {
    let legend = store.namespaces().legend();
    model.set_label(&legend_label(&legend))?;
    Ok(())
}

/// Escape text for use inside an HTML-like Graphviz label
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
