use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::generator::beamer::{BeamerGenerator, BeamerGeneratorOptions};
use crate::generator::highlight::LatexHighlighter;
use crate::parser::parse_document;

/// Options for a single conversion run.
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// If false, code frames use `listings` instead of the highlighter.
    pub highlight: bool,
    /// Highlight style overriding the document's `highlight_style`.
    pub highlight_style: Option<String>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            highlight: true,
            highlight_style: None,
        }
    }
}

/// Outcome of a conversion that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Markup was written to the output.
    Written,
    /// The input document was empty; nothing was written.
    Empty,
}

/// Converts the YAML outline at `input_path` and writes the markup.
///
/// `include` paths in the document are resolved against the directory of
/// `input_path`.
pub fn run_conversion(
    input_path: &Path,
    output_writer: &mut dyn Write,
    options: &ConversionOptions,
) -> Result<Conversion> {
    let input_content = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read input file {}", input_path.display()))?;

    let document = parse_document(&input_content)
        .with_context(|| format!("Failed to parse {}", input_path.display()))?;
    let Some(document) = document else {
        info!(path = %input_path.display(), "input has no document");
        return Ok(Conversion::Empty);
    };

    let base_dir = input_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut generator = BeamerGenerator::new(BeamerGeneratorOptions {
        base_dir,
        highlight_style: options.highlight_style.clone(),
    });
    if options.highlight {
        match LatexHighlighter::new() {
            Ok(highlighter) => generator = generator.with_highlighter(Box::new(highlighter)),
            Err(err) => warn!(error = %err, "highlighter unavailable, using listings"),
        }
    } else {
        info!("highlighting disabled, using listings");
    }

    let markup = generator
        .render(&document)
        .with_context(|| format!("Failed to convert {}", input_path.display()))?;
    match markup {
        Some(markup) => {
            writeln!(output_writer, "{}", markup)?;
            Ok(Conversion::Written)
        }
        None => Ok(Conversion::Empty),
    }
}
