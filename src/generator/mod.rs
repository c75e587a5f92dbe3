//! Output generation for LaTeX Beamer.
//!
//! This module turns the decoded outline into presentation markup: the
//! document walk lives in [`beamer`], with escaping, configuration and
//! source highlighting split into their own modules.

pub mod beamer;
pub mod escape;
pub mod highlight;
pub mod metas;

pub use beamer::{BeamerGenerator, BeamerGeneratorOptions, RenderError};
pub use escape::escape_text;
pub use highlight::{Highlighter, LatexHighlighter};
pub use metas::Metas;
