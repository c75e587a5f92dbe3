use tracing::debug;

use super::beamer::RenderError;
use crate::outline::{Pairs, Value};

/// Key of the optional configuration block heading a document.
pub const METAS_KEY: &str = "metas";

/// Presentation settings read from the `metas` block.
///
/// Values are emitted into the preamble verbatim, so they may contain LaTeX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metas {
    /// Presentation title.
    pub title: String,
    /// Title used in running headers; omitted when `None`.
    pub short_title: Option<String>,
    pub author: String,
    pub institute: String,
    pub date: String,
    /// If true, emit a table-of-contents frame and repeat it at every section.
    pub outline: bool,
    /// Title of the table-of-contents frames.
    pub outline_name: String,
    /// Style name handed to the highlighter.
    pub highlight_style: String,
    /// Options for the `babel` package; the package is omitted when `None`.
    pub tex_babel: Option<String>,
    /// Options for the `fontenc` package; the package is omitted when `None`.
    pub tex_fontenc: Option<String>,
}

impl Default for Metas {
    /// Returns the settings used when a document has no `metas` block.
    ///
    /// Default values:
    /// - `title`: "Example Presentation"
    /// - `author`, `institute`: empty
    /// - `date`: `\today`
    /// - `outline`: true
    /// - `outline_name`: "Outline"
    /// - `highlight_style`: "default"
    fn default() -> Self {
        Metas {
            title: "Example Presentation".to_string(),
            short_title: None,
            author: String::new(),
            institute: String::new(),
            date: "\\today".to_string(),
            outline: true,
            outline_name: "Outline".to_string(),
            highlight_style: "default".to_string(),
            tex_babel: None,
            tex_fontenc: None,
        }
    }
}

impl Metas {
    /// Reads settings from a `metas` pairs node.
    ///
    /// The block is viewed as a flat mapping: the last entry of a repeated key
    /// wins, unknown keys are ignored and an empty value counts as absent.
    ///
    /// # Returns
    ///
    /// An error if a recognized key holds a list or mapping.
    pub fn from_pairs(pairs: &Pairs) -> Result<Self, RenderError> {
        let mut metas = Metas::default();

        let text = |key: &str| -> Result<Option<String>, RenderError> {
            match pairs.get_last(key) {
                None => Ok(None),
                Some(Value::Scalar(s)) if s.is_empty() => Ok(None),
                Some(Value::Scalar(s)) => Ok(Some(s)),
                Some(other) => Err(RenderError::Structure {
                    context: "metas setting",
                    title: key.to_string(),
                    expected: "scalar",
                    found: other.kind(),
                }),
            }
        };

        if let Some(v) = text("title")? {
            metas.title = v;
        }
        metas.short_title = text("short_title")?;
        if let Some(v) = text("author")? {
            metas.author = v;
        }
        if let Some(v) = text("institute")? {
            metas.institute = v;
        }
        if let Some(v) = text("date")? {
            metas.date = v;
        }
        if let Some(v) = text("outline")? {
            metas.outline = parse_flag(&v);
        }
        if let Some(v) = text("outline_name")? {
            metas.outline_name = v;
        }
        if let Some(v) = text("highlight_style")? {
            metas.highlight_style = v;
        }
        metas.tex_babel = text("tex_babel")?;
        metas.tex_fontenc = text("tex_fontenc")?;

        debug!(title = %metas.title, outline = metas.outline, "read metas");
        Ok(metas)
    }

    /// Splits a leading `metas` entry off the document's top-level pairs.
    ///
    /// # Returns
    ///
    /// The settings (defaults when the first key is not `metas`) and the
    /// remaining section entries in order.
    pub fn extract(document: &Pairs) -> Result<(Self, Vec<(String, Value)>), RenderError> {
        let entries = document.entries();
        match entries.split_first() {
            Some(((key, value), rest)) if key == METAS_KEY => {
                let metas = match value {
                    Value::Pairs(pairs) => Metas::from_pairs(pairs)?,
                    v if v.is_empty() => Metas::default(),
                    other => {
                        return Err(RenderError::Structure {
                            context: "document",
                            title: METAS_KEY.to_string(),
                            expected: "mapping",
                            found: other.kind(),
                        })
                    }
                };
                Ok((metas, rest.to_vec()))
            }
            _ => Ok((Metas::default(), entries.to_vec())),
        }
    }
}

/// Reads a YAML 1.1 style boolean; other non-empty text counts as true.
fn parse_flag(text: &str) -> bool {
    !matches!(
        text.to_ascii_lowercase().as_str(),
        "false" | "no" | "off" | "n" | "0"
    )
}
