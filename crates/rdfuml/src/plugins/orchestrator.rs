//! Conversion pipeline
//!
//! The converter owns the triple store and drives every stage:
//! load → bind namespaces → extract → finalize → draw → render → linkify

use anyhow::Result;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, span, Level};

use crate::core::{
    Context, DiagramModel, ExtractionReport, ExtractionStrategy, InputFormat, RenderConfig,
    RenderableGraph, Renderer, TripleStore,
};
use crate::plugins::class::ClassDiagramStrategy;
use crate::plugins::dot::{DotGraph, DotWriter, OutputFormat};
use crate::plugins::linkify::linkify_file;
use crate::plugins::object::ObjectDiagramStrategy;
use crate::plugins::store::OxigraphStore;

/// Which extraction strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    Object,
    Class,
}

impl StrategyKind {
    pub fn strategy(&self) -> Box<dyn ExtractionStrategy<OxigraphStore>> {
        match self {
            StrategyKind::Object => Box::new(ObjectDiagramStrategy::new()),
            StrategyKind::Class => Box::new(ClassDiagramStrategy::new()),
        }
    }
}

/// Which renderer implementation draws the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    /// Streaming DOT text
    #[default]
    Writer,
    /// Structured DOT graph
    Graph,
}

impl RendererKind {
    pub fn renderer(&self, config: RenderConfig) -> Box<dyn Renderer> {
        match self {
            RendererKind::Writer => Box::new(DotWriter::new(config)),
            RendererKind::Graph => Box::new(DotGraph::new(config)),
        }
    }

    /// Get all valid renderer names
    pub fn variants() -> &'static [&'static str] {
        &["writer", "graph"]
    }
}

impl FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "writer" => Ok(RendererKind::Writer),
            "graph" => Ok(RendererKind::Graph),
            _ => Err(format!("Unknown renderer: {}", s)),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::Writer => write!(f, "writer"),
            RendererKind::Graph => write!(f, "graph"),
        }
    }
}

/// Everything a conversion run can be configured with
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub strategy: StrategyKind,
    pub renderer: RendererKind,
    /// Input format override applied to every file
    pub input_format: Option<String>,
    /// Extra (prefix, URI) bindings, applied after loading
    pub namespaces: Vec<(String, String)>,
    /// Also write the DOT source to `<output>.dot`
    pub keep_dot: bool,
    /// Also write the finalized diagram to `<output>.json`
    pub write_json: bool,
    pub render: RenderConfig,
}

/// Files written by a conversion
#[derive(Debug, Clone)]
pub struct ConvertSummary {
    pub output: PathBuf,
    pub dot: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub report: ExtractionReport,
    pub nodes: usize,
    pub edges: usize,
}

/// `<path><suffix>`, keeping the original extension
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Drives one conversion from RDF inputs to an image
pub struct Converter {
    options: ConvertOptions,
    store: OxigraphStore,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Result<Self> {
        Ok(Self {
            options,
            store: OxigraphStore::new()?,
        })
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn store(&self) -> &OxigraphStore {
        &self.store
    }

    /// Load one input file into its own context
    pub fn load_file(&mut self, path: &Path) -> Result<Context> {
        Ok(self
            .store
            .load_file(path, self.options.input_format.as_deref())?)
    }

    /// Load in-memory RDF text into `context`
    pub fn load_str(&mut self, text: &str, format: InputFormat, context: &str) -> Result<Context> {
        Ok(self.store.load_str(text, format, context)?)
    }

    /// Load RDF read from a stream, e.g. stdin
    pub fn load_reader(&mut self, reader: impl Read) -> Result<Context> {
        Ok(self
            .store
            .load_reader(reader, self.options.input_format.as_deref())?)
    }

    /// Bind the extra namespaces and run the selected strategy
    pub fn extract(&mut self) -> Result<(RenderableGraph, ExtractionReport)> {
        for (prefix, uri) in &self.options.namespaces {
            debug!(prefix = %prefix, uri = %uri, "Binding namespace");
            self.store.bind_namespace(prefix, uri);
        }

        let strategy = self.options.strategy.strategy();
        let extract_span = span!(Level::INFO, "extract", strategy = strategy.name());
        let _enter = extract_span.enter();

        let mut model = DiagramModel::new();
        let report = strategy.run(&self.store, &mut model)?;
        let graph = model.finalize()?;
        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            clusters = graph.clusters.len(),
            "Extraction completed"
        );
        Ok((graph, report))
    }

    /// Feed a finalized diagram to a fresh renderer
    pub fn draw(&self, graph: &RenderableGraph) -> Result<Box<dyn Renderer>> {
        let mut renderer = self.options.renderer.renderer(self.options.render.clone());
        graph.draw(renderer.as_mut())?;
        Ok(renderer)
    }

    /// Run the whole pipeline, writing the image to `output`
    ///
    /// The output extension is checked before anything is extracted. The
    /// `.dot` and `.json` companions are written before layout so they
    /// survive a failing layout program.
    pub fn convert(&mut self, output: &Path) -> Result<ConvertSummary> {
        let convert_span = span!(Level::INFO, "convert", output = %output.display());
        let _enter = convert_span.enter();

        let format = OutputFormat::from_path(output)?;
        let (graph, report) = self.extract()?;
        let renderer = self.draw(&graph)?;

        let dot = if self.options.keep_dot {
            let path = sibling_path(output, ".dot");
            renderer.write_source(&path)?;
            Some(path)
        } else {
            None
        };

        let json = if self.options.write_json {
            let path = sibling_path(output, ".json");
            fs::write(&path, serde_json::to_string_pretty(&graph)?)?;
            debug!(path = %path.display(), "Wrote diagram JSON");
            Some(path)
        } else {
            None
        };

        renderer.render(output)?;

        if format == OutputFormat::Svg {
            linkify_file(output, &self.store.namespaces().legend())?;
        }

        info!(path = %output.display(), "Conversion completed");
        Ok(ConvertSummary {
            output: output.to_path_buf(),
            dot,
            json,
            report,
            nodes: graph.nodes.len(),
            edges: graph.edges.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RdfUmlError;

    const PEOPLE: &str = r#"
        @prefix ex: <http://example.org/> .
        ex:alice a ex:Person ; ex:knows ex:bob .
    "#;

    fn converter(options: ConvertOptions) -> Converter {
        let mut converter = Converter::new(options).unwrap();
        converter
            .load_str(PEOPLE, InputFormat::Turtle, "file://people.ttl")
            .unwrap();
        converter
    }

    #[test]
    fn test_renderer_kind_parsing() {
        assert_eq!("graph".parse::<RendererKind>().unwrap(), RendererKind::Graph);
        assert_eq!("Writer".parse::<RendererKind>().unwrap(), RendererKind::Writer);
        assert!("cairo".parse::<RendererKind>().is_err());
        for name in RendererKind::variants() {
            assert_eq!(&name.parse::<RendererKind>().unwrap().to_string(), name);
        }
    }

    #[test]
    fn test_sibling_path_appends() {
        assert_eq!(sibling_path(Path::new("out/a.svg"), ".dot"), PathBuf::from("out/a.svg.dot"));
    }

    #[test]
    fn test_extra_namespace_overrides_declared_prefix() {
        let mut converter = converter(ConvertOptions {
            namespaces: vec![("people".to_string(), "http://example.org/".to_string())],
            ..Default::default()
        });
        let (graph, _) = converter.extract().unwrap();
        assert_eq!(graph.node("people_alice").unwrap().name, "people:alice");
    }

    #[test]
    fn test_both_renderers_draw_the_same_diagram() {
        for kind in [RendererKind::Writer, RendererKind::Graph] {
            let mut converter = converter(ConvertOptions {
                renderer: kind,
                ..Default::default()
            });
            let (graph, _) = converter.extract().unwrap();
            let source = converter.draw(&graph).unwrap().source();
            assert!(source.contains("\"ex_alice\" -> \"ex_bob\""), "{}", kind);
            assert!(source.contains("Namespaces"), "{}", kind);
        }
    }

    #[test]
    fn test_unsupported_output_fails_before_extraction() {
        let mut converter = converter(ConvertOptions::default());
        let err = converter.convert(Path::new("diagram.pdf")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RdfUmlError>(),
            Some(RdfUmlError::UnsupportedOutputFormat { .. })
        ));
    }

    #[test]
    fn test_companions_survive_failed_layout() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("people.svg");
        let mut converter = converter(ConvertOptions {
            keep_dot: true,
            write_json: true,
            render: RenderConfig::default().with_dot_command(dir.path().join("missing-dot")),
            ..Default::default()
        });

        let err = converter.convert(&output).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RdfUmlError>(),
            Some(RdfUmlError::RendererInvocation { .. })
        ));

        let dot = fs::read_to_string(sibling_path(&output, ".dot")).unwrap();
        assert!(dot.starts_with("digraph G {"));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(sibling_path(&output, ".json")).unwrap())
                .unwrap();
        assert_eq!(json["edges"][0]["label"], "ex:knows");
    }
}
