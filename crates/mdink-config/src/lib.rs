//! Configuration management for mdink.
//!
//! Parses optional `mdink.toml` configuration files with serde and applies
//! CLI overrides via [`CliSettings`]. Paths are resolved to absolute form at
//! load time so rendered image references stay valid when the HTML is later
//! converted from a temporary location.
//!
//! Validation runs before any processing starts: a missing input file, CSS
//! file or image directory is fatal.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for in the working directory.
const CONFIG_FILENAME: &str = "mdink.toml";

/// Default mermaid.ink-compatible rendering service.
const DEFAULT_MERMAID_URL: &str = "https://mermaid.ink";

/// Default external HTML-to-PDF command.
const DEFAULT_PDF_COMMAND: &str = "weasyprint";

/// Default directory for rendered image artifacts.
const DEFAULT_IMAGE_DIR: &str = "img";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the stylesheet passed to the PDF command.
    pub css: Option<PathBuf>,
    /// Override the directory for rendered image artifacts.
    pub image_dir: Option<PathBuf>,
    /// Override the mermaid rendering service URL.
    pub mermaid_url: Option<String>,
    /// Override the external HTML-to-PDF command.
    pub pdf_command: Option<String>,
}

/// Raw configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    render: RenderSection,
    pdf: PdfSection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RenderSection {
    mermaid_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PdfSection {
    command: Option<String>,
    css: Option<String>,
    image_dir: Option<String>,
}

/// Resolved application configuration.
#[derive(Debug)]
pub struct Config {
    /// Input markdown file.
    pub input: PathBuf,
    /// Output PDF path.
    pub output: PathBuf,
    /// Stylesheet for the PDF command, when one is configured.
    pub css: Option<PathBuf>,
    /// Directory rendered image artifacts are written to (absolute).
    pub image_dir: PathBuf,
    /// Mermaid rendering service URL.
    pub mermaid_url: String,
    /// External HTML-to-PDF command.
    pub pdf_command: String,
    /// HTTP timeout for rendering requests.
    pub timeout: Duration,
}

impl Config {
    /// Load configuration for one conversion run.
    ///
    /// `config_path` selects an explicit config file (an error when missing);
    /// otherwise `mdink.toml` in the working directory is used when present.
    /// CLI settings override file values. The output path defaults to the
    /// input with a `.pdf` extension.
    pub fn load(
        input: PathBuf,
        output: Option<PathBuf>,
        config_path: Option<&Path>,
        cli: &CliSettings,
    ) -> Result<Self, ConfigError> {
        let file = Self::load_file(config_path)?;

        let output = output.unwrap_or_else(|| input.with_extension("pdf"));
        let css = cli
            .css
            .clone()
            .or_else(|| file.pdf.css.as_deref().map(PathBuf::from));
        let image_dir = cli
            .image_dir
            .clone()
            .or_else(|| file.pdf.image_dir.as_deref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR));
        let image_dir = std::path::absolute(image_dir)?;
        let mermaid_url = cli
            .mermaid_url
            .clone()
            .or(file.render.mermaid_url)
            .unwrap_or_else(|| DEFAULT_MERMAID_URL.to_owned());
        let pdf_command = cli
            .pdf_command
            .clone()
            .or(file.pdf.command)
            .unwrap_or_else(|| DEFAULT_PDF_COMMAND.to_owned());
        let timeout =
            Duration::from_secs(file.render.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        Ok(Self {
            input,
            output,
            css,
            image_dir,
            mermaid_url,
            pdf_command,
            timeout,
        })
    }

    fn load_file(config_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
        let path = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                path.to_path_buf()
            }
            None => {
                let discovered = PathBuf::from(CONFIG_FILENAME);
                if !discovered.is_file() {
                    return Ok(ConfigFile::default());
                }
                discovered
            }
        };
        let contents = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Check that every configured path exists before processing starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_file(&self.input, "Markdown file")?;
        if let Some(css) = &self.css {
            require_file(css, "CSS file")?;
        }
        if !self.image_dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "Image directory not found at {}",
                self.image_dir.display()
            )));
        }
        Ok(())
    }
}

fn require_file(path: &Path, description: &str) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{description} not found at {}",
            path.display()
        )))
    }
}

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("{0}")]
    Validation(String),
}
