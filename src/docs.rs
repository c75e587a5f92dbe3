//! Detailed documentation for the input format.
//!
//! This module describes the YAML outline accepted by yml2tex-rs and the
//! markup produced for each part of it.

/// # Document Layout
///
/// The input is a single YAML document whose top level is a mapping:
///
/// ```text
/// metas:                      # optional, must be the first key
///   title: My Talk
/// <section>:
///   <subsection>:
///     <frame title>:
///       - <bullet>
///       - <bullet>:
///           - <nested bullet>
/// ```
///
/// - `<document> ::= [ metas ] { <section> }`
/// - `<section> ::= <title> ":" { <subsection> }`
/// - `<subsection> ::= <title> ":" { <frame> }`
/// - `<frame> ::= <title> ":" <items>`
///
/// Keys keep their source order and may repeat at any level: two frames
/// both titled `Example` render as two frames.
///
/// ## `metas`
///
/// | key | default | effect |
/// |---|---|---|
/// | `title` | `Example Presentation` | `\title` |
/// | `short_title` | none | optional argument of `\title` |
/// | `author` | empty | `\author` |
/// | `institute` | empty | `\institute` |
/// | `date` | `\today` | `\date` |
/// | `outline` | `true` | outline frame after the title page and at each section |
/// | `outline_name` | `Outline` | title of the outline frames |
/// | `highlight_style` | `default` | style of highlighted code |
/// | `tex_babel` | none | `\usepackage[...]{babel}` |
/// | `tex_fontenc` | none | `\usepackage[...]{fontenc}` |
///
/// Values are copied into the preamble unescaped, so they may hold LaTeX.
/// Titles and bullets are escaped.
pub mod input_format {
    /// Documentation for bullet content
    pub mod bullets {
        //! Scalars become `\item`s; a mapping entry becomes an item followed
        //! by a nested `itemize` of its value; an inner list becomes a nested
        //! `itemize` without an item of its own.
    }
}

/// # Frame Titles
///
/// The first word of a frame title selects how the frame is rendered.
///
/// ## `include <path>`
///
/// Reads `<path>`, relative to the input file, and shows it in a
/// `[fragile,t]` frame titled `Code: "<path>"`. The language is chosen
/// from the file extension; unknown extensions are shown as plain text.
/// With `--no-highlight` the file is placed in a `lstlisting` block.
///
/// ## `image <path>`
///
/// Shows `<path>` with `\pgfimage` in a `[shrink]` frame. The frame's value
/// is a mapping (or a list of mappings) of image options, joined as
/// `key=value` in source order:
///
/// ```text
/// image logo.png:
///   width: 5cm
///   angle: 90
/// ```
///
/// ## Any other title
///
/// A regular frame with the title and the bullet content, if any.
pub mod frame_titles {
    /// Documentation for code frames
    pub mod include {
        //! Source inclusion with syntax highlighting
    }

    /// Documentation for image frames
    pub mod image {
        //! Shrink-to-fit `\pgfimage`
    }
}
