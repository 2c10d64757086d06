//! The conversion run: process markdown, invoke the PDF engine, clean up.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use clap::Args;

use mdink_config::{CliSettings, Config};
use mdink_diagrams::MermaidClient;
use mdink_renderer::DocumentProcessor;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for a conversion run.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Input markdown file.
    input: PathBuf,

    /// Output PDF path (default: input with a .pdf extension).
    output: Option<PathBuf>,

    /// Path to configuration file (default: mdink.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet passed to the PDF command (overrides config).
    #[arg(long)]
    css: Option<PathBuf>,

    /// Directory for rendered image artifacts (overrides config).
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Mermaid rendering service URL (overrides config).
    #[arg(long)]
    mermaid_url: Option<String>,

    /// External HTML-to-PDF command (overrides config).
    #[arg(long)]
    pdf_command: Option<String>,

    /// Enable debug logging (diagram sources and height diagnostics).
    #[arg(short, long)]
    pub(crate) debug: bool,
}

impl ConvertArgs {
    /// Execute the conversion and return the accumulated render warnings.
    pub(crate) fn execute(self, output: &Output) -> Result<Vec<String>, CliError> {
        let cli_settings = CliSettings {
            css: self.css,
            image_dir: self.image_dir,
            mermaid_url: self.mermaid_url,
            pdf_command: self.pdf_command,
        };
        let config = Config::load(self.input, self.output, self.config.as_deref(), &cli_settings)?;
        config.validate()?;

        let markdown = std::fs::read_to_string(&config.input)?;

        let client = MermaidClient::new(&config.mermaid_url, config.timeout);
        let processor = DocumentProcessor::new(client, &config.image_dir);
        output.info("Rendering diagrams...");
        let processed = processor.process_with_progress(&markdown, |done, total| {
            output.info(&format!("Rendered diagram {done}/{total}"));
        })?;

        convert_to_pdf(&config, &processed.html, output)?;
        cleanup_artifacts(&processed.images);
        output.success(&format!("PDF written to {}", config.output.display()));

        Ok(processed.warnings)
    }
}

/// Write the processed HTML to a temporary file and run the external
/// HTML-to-PDF command on it.
fn convert_to_pdf(config: &Config, html: &str, output: &Output) -> Result<(), CliError> {
    let mut temp = tempfile::Builder::new()
        .prefix("mdink-")
        .suffix(".html")
        .tempfile()?;
    temp.write_all(html.as_bytes())?;
    temp.flush()?;

    output.info("Converting to PDF...");
    let mut command = Command::new(&config.pdf_command);
    command.arg(temp.path()).arg(&config.output);
    if let Some(css) = &config.css {
        command.arg("-s").arg(css);
    }

    let status = command
        .status()
        .map_err(|err| CliError::Pdf(format!("failed to run {}: {err}", config.pdf_command)))?;
    if !status.success() {
        return Err(CliError::Pdf(format!(
            "{} exited with {status}",
            config.pdf_command
        )));
    }
    Ok(())
}

/// Remove the rendered SVG artifacts once the PDF embeds them.
fn cleanup_artifacts(images: &[PathBuf]) {
    for image in images {
        if let Err(err) = std::fs::remove_file(image) {
            tracing::debug!(path = %image.display(), %err, "failed to remove rendered diagram");
        }
    }
}
