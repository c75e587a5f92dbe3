//! Input parsing.
//!
//! The YAML outline is parsed by `yaml-rust2`; [`compose`] turns its events
//! into a [`Value`] tree, asking a [`MappingStrategy`] what each mapping
//! becomes. [`parse_document`] uses [`OrderedPairs`], which keeps authoring
//! order and duplicate keys.

pub mod compose;
pub mod pairs;

use thiserror::Error;
use tracing::debug;
use yaml_rust2::scanner::Marker;

use crate::outline::Value;

pub use compose::{compose, MappingStrategy};
pub use pairs::{OrderedPairs, UniqueKeys};

/// Errors raised while turning input text into a [`Value`] tree.
///
/// Lines are 1-based, columns are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The YAML itself is malformed.
    #[error("{message} at line {line} column {col}")]
    Syntax {
        message: String,
        line: usize,
        col: usize,
    },
    /// A sequence or mapping was used as a mapping key.
    #[error("a {kind} cannot be used as a mapping key (line {line} column {col})")]
    NonScalarKey {
        kind: &'static str,
        line: usize,
        col: usize,
    },
    /// A key repeated within one mapping, reported by [`UniqueKeys`] only.
    #[error("duplicate key \"{key}\" at line {line} column {col}")]
    DuplicateKey { key: String, line: usize, col: usize },
    /// An alias refers to a sequence that encloses it.
    #[error("alias to an unfinished sequence at line {line} column {col}")]
    UnfinishedAlias { line: usize, col: usize },
}

impl ParseError {
    fn unbalanced(container: &str, marker: Marker) -> Self {
        ParseError::Syntax {
            message: format!("unbalanced end of {container}"),
            line: marker.line(),
            col: marker.col() + 1,
        }
    }
}

impl From<yaml_rust2::ScanError> for ParseError {
    fn from(err: yaml_rust2::ScanError) -> Self {
        let marker = err.marker();
        ParseError::Syntax {
            message: err.info().to_string(),
            line: marker.line(),
            col: marker.col() + 1,
        }
    }
}

/// Parses an outline document, decoding every mapping into ordered pairs.
///
/// # Arguments
///
/// * `input` - The YAML text.
///
/// # Returns
///
/// `Ok(None)` if the input holds no document, otherwise the document root.
pub fn parse_document(input: &str) -> Result<Option<Value>, ParseError> {
    parse_with(input, OrderedPairs)
}

/// Parses an outline document with a caller-chosen mapping strategy.
pub fn parse_with<S: MappingStrategy>(
    input: &str,
    strategy: S,
) -> Result<Option<Value>, ParseError> {
    let root = compose(input, strategy)?;
    let kind = root.as_ref().map(|v| v.kind()).unwrap_or("none");
    debug!(kind, "parsed document");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_outline() -> Result<(), ParseError> {
        let input = r#"
metas:
  title: Talk
Introduction:
  Motivation:
    Example:
      - first
    Example:
      - second
"#;
        let root = parse_document(input)?.expect("document");
        let pairs = root.as_pairs().expect("mapping");
        assert_eq!(pairs.keys(), vec!["metas", "Introduction"]);

        let section = pairs.entries()[1].1.clone();
        let subsection = section.as_pairs().expect("mapping").entries()[0].1.clone();
        let frames = subsection.as_pairs().expect("mapping");
        assert_eq!(frames.keys(), vec!["Example", "Example"]);
        Ok(())
    }

    #[test]
    fn test_parse_document_empty() -> Result<(), ParseError> {
        assert_eq!(parse_document("")?, None);
        assert_eq!(parse_document("\n\n")?, None);
        Ok(())
    }

    #[test]
    fn test_parse_document_reads_first_document_only() -> Result<(), ParseError> {
        let root = parse_document("a: 1\n---\nb: 2\n")?.expect("document");
        assert_eq!(root.as_pairs().expect("mapping").keys(), vec!["a"]);
        Ok(())
    }

    #[test]
    fn test_parse_with_unique_keys() {
        let err = parse_with("a: 1\na: 2\n", UniqueKeys).unwrap_err();
        assert_eq!(err.to_string(), "duplicate key \"a\" at line 2 column 4");
    }

    #[test]
    fn test_parse_with_ordered_pairs_matches_parse_document() -> Result<(), ParseError> {
        let input = "a: 1\na: 2\n";
        assert_eq!(parse_with(input, OrderedPairs)?, parse_document(input)?);
        let root = parse_with(input, OrderedPairs)?.expect("document");
        assert_eq!(root.as_pairs().expect("mapping").keys(), vec!["a", "a"]);
        Ok(())
    }

    #[test]
    fn test_syntax_error_display() {
        let err = parse_document("key: [unclosed\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert!(err.to_string().contains("line"));
    }
}
