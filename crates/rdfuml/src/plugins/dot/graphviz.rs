//! Graphviz layout runner
//!
//! Pipes DOT source into the `dot` executable and lets it write the image.

use anyhow::Result;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, info, span, Level};

use crate::core::RdfUmlError;

/// Image formats the pipeline can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Pick the format from the output path's extension
    pub fn from_path(path: &Path) -> Result<Self, RdfUmlError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            other => Err(RdfUmlError::unsupported_output_format(other)),
        }
    }

    /// Name passed to `dot -T`
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// Invokes a Graphviz layout program
#[derive(Debug, Clone)]
pub struct Graphviz {
    command: PathBuf,
}

impl Graphviz {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Lay out `source` and write the image to `output`
    pub fn render(&self, source: &str, output: &Path) -> Result<()> {
        let format = OutputFormat::from_path(output)?;
        let render_span = span!(Level::INFO, "graphviz", format = format.as_str());
        let _enter = render_span.enter();

        let mut child = Command::new(&self.command)
            .arg(format!("-T{}", format.as_str()))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                RdfUmlError::renderer_invocation(
                    format!("failed to start `{}`", self.command.display()),
                    e.to_string(),
                )
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            RdfUmlError::renderer_invocation("failed to open stdin of layout program", "")
        })?;

        // Feed stdin while stderr is drained; a program that fails early
        // would otherwise block on a full stderr pipe while we block on stdin.
        let (written, finished) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(source.as_bytes()));
            let finished = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, finished)
        });

        let output_status = finished?;
        let stderr = String::from_utf8_lossy(&output_status.stderr);
        if !output_status.status.success() {
            return Err(RdfUmlError::renderer_invocation(
                format!("`{}` exited with {}", self.command.display(), output_status.status),
                stderr.trim(),
            )
            .into());
        }
        if let Err(e) = written {
            return Err(RdfUmlError::renderer_invocation(
                format!("`{}` did not read its input", self.command.display()),
                format!("{}; {}", e, stderr.trim()),
            )
            .into());
        }
        if !stderr.trim().is_empty() {
            debug!(diagnostics = %stderr.trim(), "Layout program warnings");
        }

        info!(path = %output.display(), "Rendered diagram");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.svg")).unwrap(), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a.PNG")).unwrap(), OutputFormat::Png);
        let err = OutputFormat::from_path(Path::new("a.pdf")).unwrap_err();
        assert!(matches!(err, RdfUmlError::UnsupportedOutputFormat { .. }));
    }

    #[test]
    fn test_missing_executable_is_invocation_error() {
        let dir = tempfile::tempdir().unwrap();
        let graphviz = Graphviz::new(dir.path().join("no-such-dot"));
        let err = graphviz
            .render("digraph G {}", &dir.path().join("out.svg"))
            .unwrap_err();
        let err = err.downcast::<RdfUmlError>().unwrap();
        assert!(matches!(err, RdfUmlError::RendererInvocation { .. }));
    }

    #[test]
    fn test_unsupported_output_checked_before_spawn() {
        let graphviz = Graphviz::new("dot");
        let err = graphviz.render("digraph G {}", Path::new("out.gif")).unwrap_err();
        assert!(err.downcast_ref::<RdfUmlError>().is_some());
    }

    #[cfg(unix)]
    fn failing_layout_program(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("failing-dot");
        std::fs::write(&path, "#!/bin/sh\necho 'Error: syntax error in line 1' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_on_large_input_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let graphviz = Graphviz::new(failing_layout_program(dir.path()));

        let mut source = String::from("digraph G {\n");
        while source.len() < 4 * 1024 * 1024 {
            source.push_str("    n0 -> n1 [label=\"padding padding padding\"];\n");
        }
        source.push('}');

        let err = graphviz
            .render(&source, &dir.path().join("out.svg"))
            .unwrap_err()
            .downcast::<RdfUmlError>()
            .unwrap();
        assert!(matches!(err, RdfUmlError::RendererInvocation { .. }));
        assert!(err.to_string().contains("syntax error"), "{}", err);
    }
}
