//! mdink CLI - Markdown + Mermaid to print-ready PDF.
//!
//! Renders the mermaid code blocks of a markdown document as SVG images via
//! a mermaid.ink-compatible service, lays out page breaks around them, and
//! hands the result to an external HTML-to-PDF command.

mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::ConvertArgs;
use output::Output;

/// mdink - Markdown + Mermaid to PDF converter.
#[derive(Parser)]
#[command(name = "mdink", version, about)]
struct Cli {
    #[command(flatten)]
    convert: ConvertArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --debug enables DEBUG level (diagram sources, height diagnostics),
    // otherwise use RUST_LOG or default to WARN.
    let filter = if cli.convert.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.convert.execute(&output) {
        Ok(warnings) if warnings.is_empty() => {}
        Ok(warnings) => {
            // Render warnings are deferred to the end of the run; any at all
            // means the document is incomplete.
            for warning in &warnings {
                output.error(warning);
            }
            std::process::exit(1);
        }
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::exit(1);
        }
    }
}
