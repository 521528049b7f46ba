//! Command-line interface for the rdfuml utility
//!
//! Loads one or more RDF files and renders them as a UML-like object or
//! class diagram through Graphviz.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use rdfuml::core::logging::{init_logging, LogStyle};
use rdfuml::plugins::{sibling_path, ConvertOptions, Converter, RendererKind, StrategyKind};
use rdfuml::RenderConfig;

/// rdfuml - Creates UML object and class diagrams from RDF(S) files
#[derive(Parser, Debug)]
#[command(name = "rdfuml")]
#[command(about = "Creates UML object diagrams (or class diagrams with --rdfs) from RDF files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    /// RDF file(s); use - for stdin
    #[arg(required = true, value_name = "FILENAME")]
    pub filenames: Vec<PathBuf>,

    /// Output graphics file, .svg or .png (default is FILENAME.svg)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input format (xml, n3, turtle, nt, trig, nquads); guessed from the
    /// file extension when omitted
    #[arg(short, long = "input", value_name = "FORMAT")]
    pub input_format: Option<String>,

    /// Additional namespace binding
    #[arg(
        short,
        long = "namespace",
        num_args = 2,
        value_names = ["PREFIX", "NAMESPACE"],
        action = clap::ArgAction::Append
    )]
    pub namespace: Vec<String>,

    /// Draw a class diagram from RDFS/OWL vocabulary instead of an object diagram
    #[arg(short = 's', long)]
    pub rdfs: bool,

    /// Save the DOT file next to the output
    #[arg(short, long)]
    pub dot: bool,

    /// Save the extracted diagram as JSON next to the output
    #[arg(long)]
    pub json: bool,

    /// Renderer implementation producing the DOT source
    #[arg(long, value_enum, default_value_t = RendererChoice::Writer)]
    pub renderer: RendererChoice,

    /// Graphviz layout executable
    #[arg(long, value_name = "PATH", default_value = "dot")]
    pub dot_command: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error); RDFUML_LOG_LEVEL
    /// when omitted, warn if neither is set
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json); RDFUML_LOG_FORMAT when omitted
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// `-n` values grouped as (prefix, namespace) pairs
    pub fn namespace_pairs(&self) -> Result<Vec<(String, String)>> {
        if self.namespace.len() % 2 != 0 {
            return Err(anyhow!("--namespace takes a PREFIX and a NAMESPACE"));
        }
        Ok(self
            .namespace
            .chunks(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect())
    }

    /// The explicit output path, or the first input plus `.svg`
    pub fn output_path(&self) -> PathBuf {
        match (&self.output, self.filenames.first()) {
            (Some(output), _) => output.clone(),
            (None, Some(first)) if !is_stdin(first) => sibling_path(first, ".svg"),
            (None, _) => PathBuf::from("stdin.svg"),
        }
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl From<LogFormat> for LogStyle {
    fn from(value: LogFormat) -> Self {
        match value {
            LogFormat::Compact => LogStyle::Compact,
            LogFormat::Pretty => LogStyle::Pretty,
            LogFormat::Json => LogStyle::Json,
        }
    }
}

/// Renderer implementations selectable on the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum RendererChoice {
    /// Stream DOT statements as the diagram is drawn
    #[default]
    Writer,
    /// Build a graph structure and serialize it at the end
    Graph,
}

impl From<RendererChoice> for RendererKind {
    fn from(value: RendererChoice) -> Self {
        match value {
            RendererChoice::Writer => RendererKind::Writer,
            RendererChoice::Graph => RendererKind::Graph,
        }
    }
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct RdfUmlApp;

impl RdfUmlApp {
    pub fn new() -> Self {
        Self
    }

    /// Translate parsed arguments into pipeline options
    pub fn build_options(cli: &Cli) -> Result<ConvertOptions> {
        Ok(ConvertOptions {
            strategy: if cli.rdfs {
                StrategyKind::Class
            } else {
                StrategyKind::Object
            },
            renderer: cli.renderer.into(),
            input_format: cli.input_format.clone(),
            namespaces: cli.namespace_pairs()?,
            keep_dot: cli.dot,
            write_json: cli.json,
            render: RenderConfig::default().with_dot_command(&cli.dot_command),
        })
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        let log_level = cli.log_level.map(|level| level.as_str());
        if let Err(e) = init_logging(log_level, cli.log_format.map(LogStyle::from)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("rdfuml v{}", env!("CARGO_PKG_VERSION"));
        }

        let options = Self::build_options(&cli)?;
        let output = cli.output_path();
        debug!(?options, output = %output.display(), "Resolved options");

        if cli.verbose {
            let kind = if cli.rdfs { "class" } else { "object" };
            eprintln!("Drawing {} diagram with the {} renderer", kind, options.renderer);
        }

        let mut converter = Converter::new(options)?;
        for filename in &cli.filenames {
            let context = if is_stdin(filename) {
                converter.load_reader(io::stdin().lock())?
            } else {
                converter.load_file(filename)?
            };
            if cli.verbose {
                eprintln!("Loaded {}", context);
            }
        }

        let summary = converter.convert(&output)?;
        for warning in &summary.report.warnings {
            eprintln!("Warning: {}", warning);
        }
        if cli.verbose {
            eprintln!(
                "{} nodes and {} edges in {} clusters",
                summary.nodes,
                summary.edges,
                summary.report.clusters.len()
            );
            for companion in summary.dot.iter().chain(summary.json.iter()) {
                eprintln!("Wrote {}", companion.display());
            }
        }

        println!("graphic was created with output file name: {}", summary.output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsStr;

    #[test]
    fn test_cli_parsing_defaults() {
        let cli = Cli::try_parse_from(["rdfuml", "people.ttl"]).unwrap();
        assert_eq!(cli.filenames, vec![PathBuf::from("people.ttl")]);
        assert!(cli.output.is_none());
        assert!(!cli.rdfs);
        assert!(!cli.dot);
        assert_eq!(cli.renderer, RendererChoice::Writer);
        assert_eq!(cli.dot_command, PathBuf::from("dot"));
        assert_eq!(cli.log_level, None);
        assert_eq!(cli.output_path(), PathBuf::from("people.ttl.svg"));
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::try_parse_from([
            "rdfuml", "-o", "out.png", "-i", "nt", "-n", "ex", "http://example.org/", "-n",
            "foaf", "http://xmlns.com/foaf/0.1/", "-s", "-d", "--json", "--renderer", "graph",
            "--dot-command", "/opt/graphviz/bin/dot", "a.nt", "b.nt",
        ])
        .unwrap();

        assert_eq!(cli.filenames.len(), 2);
        assert_eq!(cli.output_path(), PathBuf::from("out.png"));
        assert_eq!(cli.input_format.as_deref(), Some("nt"));
        assert_eq!(
            cli.namespace_pairs().unwrap(),
            vec![
                ("ex".to_string(), "http://example.org/".to_string()),
                ("foaf".to_string(), "http://xmlns.com/foaf/0.1/".to_string()),
            ]
        );

        let options = RdfUmlApp::build_options(&cli).unwrap();
        assert_eq!(options.strategy, StrategyKind::Class);
        assert_eq!(options.renderer, RendererKind::Graph);
        assert!(options.keep_dot);
        assert!(options.write_json);
        assert_eq!(options.render.dot_command, PathBuf::from("/opt/graphviz/bin/dot"));
    }

    #[test]
    fn test_filename_is_required() {
        assert!(Cli::try_parse_from(["rdfuml"]).is_err());
    }

    #[test]
    fn test_namespace_needs_two_values() {
        assert!(Cli::try_parse_from(["rdfuml", "a.ttl", "-n", "ex"]).is_err());
    }

    #[test]
    fn test_stdin_output_path() {
        let cli = Cli::try_parse_from(["rdfuml", "-"]).unwrap();
        assert_eq!(cli.output_path(), PathBuf::from("stdin.svg"));
    }

    #[test]
    fn test_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, "").unwrap();
        let output = dir.path().join("notes.svg");

        let cli = Cli::try_parse_from([
            OsStr::new("rdfuml"),
            input.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
        ])
        .unwrap();
        let err = RdfUmlApp::new().run(cli).unwrap_err();
        assert!(err.to_string().contains("Unsupported input format"));
    }
}
