use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use super::escape::escape_text;
use super::highlight::{Highlighter, PLAIN_TEXT};
use super::metas::Metas;
use crate::outline::{Pairs, Value};

/// Errors raised while rendering a decoded document.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A node has a different shape than its position in the outline requires.
    #[error("{context} \"{title}\": expected a {expected}, found a {found}")]
    Structure {
        context: &'static str,
        title: String,
        expected: &'static str,
        found: &'static str,
    },
    /// An `include` or `image` frame title without a path.
    #[error("frame \"{title}\" does not name a file")]
    MissingPath { title: String },
    /// An included source file could not be read.
    #[error("cannot read included file {}", .path.display())]
    Include {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Bullet content that contains itself through an alias.
    #[error("bullet \"{key}\" contains itself through an alias")]
    CyclicAlias { key: String },
    /// Bullet content that expands, usually through nested aliases, past the limit.
    #[error("bullet list expands to more than {limit} bullets")]
    TooManyBullets { limit: usize },
}

/// Options for configuring the `BeamerGenerator`.
#[derive(Debug, Clone, Default)]
pub struct BeamerGeneratorOptions {
    /// Directory that `include` paths are resolved against, normally the
    /// directory of the input document.
    pub base_dir: PathBuf,
    /// Highlight style used instead of the document's `highlight_style`.
    pub highlight_style: Option<String>,
}

/// How a frame title asks for its frame to be rendered.
#[derive(Debug, PartialEq, Eq)]
enum FrameKind<'a> {
    Code(&'a str),
    Image(&'a str),
    Content,
}

/// Classifies a frame title by its first word, `include` before `image`.
fn classify(title: &str) -> Result<FrameKind<'_>, RenderError> {
    let mut words = title.split_whitespace();
    let keyword = match words.next() {
        Some(word @ ("include" | "image")) => word,
        _ => return Ok(FrameKind::Content),
    };
    let path = words.next().ok_or_else(|| RenderError::MissingPath {
        title: title.to_string(),
    })?;
    if keyword == "include" {
        Ok(FrameKind::Code(path))
    } else {
        Ok(FrameKind::Image(path))
    }
}

/// Renders a decoded outline as a LaTeX Beamer presentation.
pub struct BeamerGenerator {
    options: BeamerGeneratorOptions,
    highlighter: Option<Box<dyn Highlighter>>,
}

impl BeamerGenerator {
    /// Creates a generator without a highlighter; code frames use `listings`.
    pub fn new(options: BeamerGeneratorOptions) -> Self {
        BeamerGenerator {
            options,
            highlighter: None,
        }
    }

    /// Sets the highlighter used for code frames and the preamble style block.
    pub fn with_highlighter(mut self, highlighter: Box<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Renders the whole document.
    ///
    /// The document is walked as sections, subsections and frames, in source
    /// order. A leading `metas` entry configures the preamble and is not a section.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the document is empty, otherwise the complete markup.
    pub fn render(&self, document: &Value) -> Result<Option<String>, RenderError> {
        if document.is_empty() {
            info!("document is empty, nothing to render");
            return Ok(None);
        }
        let Value::Pairs(root) = document else {
            return Err(RenderError::Structure {
                context: "document",
                title: "(root)".to_string(),
                expected: "mapping",
                found: document.kind(),
            });
        };

        let (metas, sections) = Metas::extract(root)?;
        let mut out = self.render_header(&metas);

        for (section_title, section_body) in &sections {
            debug!(section = %section_title, "rendering section");
            out.push_str(&render_section(section_title));
            let subsections = children("section", section_title, section_body)?;
            for (subsection_title, subsection_body) in &subsections {
                out.push_str(&render_subsection(subsection_title));
                let frames = children("subsection", subsection_title, subsection_body)?;
                for (frame_title, items) in &frames {
                    out.push_str(&self.render_frame(frame_title, items)?);
                }
            }
        }

        out.push_str(&render_footer());
        Ok(Some(out))
    }

    /// Returns the preamble, title page and optional outline frames.
    pub fn render_header(&self, metas: &Metas) -> String {
        let mut out = String::from("\\documentclass[slidestop,red]{beamer}");
        out.push_str("\n\\usepackage[utf8]{inputenc}");
        if let Some(babel) = &metas.tex_babel {
            out.push_str(&format!("\n\\usepackage[{babel}]{{babel}}"));
        }
        if let Some(fontenc) = &metas.tex_fontenc {
            out.push_str(&format!("\n\\usepackage[{fontenc}]{{fontenc}}"));
        }
        out.push_str("\n\\usepackage{fancyvrb,color}\n\n");

        match &self.highlighter {
            Some(highlighter) => {
                let style = self
                    .options
                    .highlight_style
                    .as_deref()
                    .unwrap_or(&metas.highlight_style);
                out.push_str(&highlighter.style_defs(style));
            }
            None => {
                out.push_str("\\usepackage{listings}\n");
                out.push_str("\\lstset{numbers=left}");
            }
        }

        out.push_str("\n\n\\usetheme{Antibes}");
        out.push_str("\n\\setbeamertemplate{footline}[frame number]");
        out.push_str("\n\\usecolortheme{lily}");
        out.push_str("\n\\beamertemplateshadingbackground{blue!5}{yellow!10}");

        let short_title = metas
            .short_title
            .as_ref()
            .map(|s| format!("[{s}]"))
            .unwrap_or_default();
        out.push_str(&format!("\n\n\\title{short_title}{{{}}}", metas.title));
        out.push_str(&format!("\n\\author{{{}}}", metas.author));
        out.push_str(&format!("\n\\institute{{{}}}", metas.institute));
        out.push_str(&format!("\n\\date{{{}}}", metas.date));
        out.push_str("\n\n\\begin{document}");
        out.push_str("\n\n\\frame{\\titlepage}");

        if metas.outline {
            let name = &metas.outline_name;
            out.push_str(&format!("\n\n\\section*{{{name}}}"));
            out.push_str("\n\\frame {");
            out.push_str(&format!("\n\t\\frametitle{{{name}}}"));
            out.push_str("\n\t\\tableofcontents");
            out.push_str("\n}");

            out.push_str("\n\n\\AtBeginSection[] {");
            out.push_str("\n\t\\frame{");
            out.push_str(&format!("\n\t\t\\frametitle{{{name}}}"));
            out.push_str("\n\t\t\\tableofcontents[currentsection]");
            out.push_str("\n\t}");
            out.push_str("\n}");
        }
        out
    }

    /// Renders one frame, dispatching on the first word of its title.
    ///
    /// # Arguments
    ///
    /// * `title` - The frame title; `include <path>` and `image <path>` are reserved.
    /// * `items` - Bullet content, or image options for image frames.
    pub fn render_frame(&self, title: &str, items: &Value) -> Result<String, RenderError> {
        match classify(title)? {
            FrameKind::Code(path) => self.render_code_frame(path),
            FrameKind::Image(path) => render_image_frame(path, items),
            FrameKind::Content => {
                debug!(frame = %title, "rendering frame");
                let mut out = String::from("\n\\frame {");
                out.push_str(&format!("\n\t\\frametitle{{{}}}", escape_text(title)));
                if !items.is_empty() {
                    out.push_str(&render_bullet_list(items)?);
                }
                out.push_str("\n}");
                Ok(out)
            }
        }
    }

    /// Renders a frame showing the file at `path`, relative to the base directory.
    pub fn render_code_frame(&self, path: &str) -> Result<String, RenderError> {
        let full_path = self.options.base_dir.join(path);
        debug!(path = %full_path.display(), "including source file");
        let source = fs::read_to_string(&full_path).map_err(|source| RenderError::Include {
            path: full_path.clone(),
            source,
        })?;

        let mut out = String::from("\n\\begin{frame}[fragile,t]");
        out.push_str(&format!("\n\t\\frametitle{{Code: \"{}\"}}", escape_text(path)));

        match &self.highlighter {
            Some(highlighter) => {
                let language = highlighter.language_for_filename(path).unwrap_or_else(|| {
                    info!(path, "no language known for file, highlighting as plain text");
                    PLAIN_TEXT
                });
                out.push('\n');
                out.push_str(&highlighter.highlight(&source, language));
                out.push('\n');
            }
            None => {
                out.push_str("\n\t\\begin{lstlisting}\n");
                out.push_str(&source);
                out.push_str("\n\t\\end{lstlisting}");
            }
        }

        out.push_str("\n\\end{frame}");
        Ok(out)
    }
}

/// Returns the entries of a section or subsection body.
fn children(
    context: &'static str,
    title: &str,
    body: &Value,
) -> Result<Vec<(String, Value)>, RenderError> {
    match body {
        Value::Pairs(pairs) => Ok(pairs.entries().clone()),
        v if v.is_empty() => Ok(Vec::new()),
        other => Err(RenderError::Structure {
            context,
            title: title.to_string(),
            expected: "mapping",
            found: other.kind(),
        }),
    }
}

pub fn render_section(title: &str) -> String {
    format!("\n\n\\section{{{}}}", escape_text(title))
}

pub fn render_subsection(title: &str) -> String {
    format!("\n\\subsection{{{}}}", escape_text(title))
}

pub fn render_footer() -> String {
    "\n\\end{document}".to_string()
}

/// Most bullets a single frame may expand to, aliases included.
pub const MAX_BULLETS: usize = 10_000;

/// Renders `items` as an `itemize` block.
///
/// A list renders one bullet per scalar, a key bullet plus a nested block
/// per mapping entry, and a nested block per inner list. A mapping renders
/// like a list of its entries and a scalar renders as a single bullet.
/// Nesting depth is not limited here; Beamer itself stops at three levels.
///
/// # Returns
///
/// An error if the items reach themselves through an alias, or expand to
/// more than [`MAX_BULLETS`] bullets.
pub fn render_bullet_list(items: &Value) -> Result<String, RenderError> {
    let mut writer = BulletWriter {
        out: String::new(),
        open: Vec::new(),
        remaining: MAX_BULLETS,
    };
    writer.write_itemize(items)?;
    Ok(writer.out)
}

type NodeId = *const std::cell::RefCell<Vec<(String, Value)>>;

/// Output of one bullet list, with the mappings being expanded and the
/// bullet budget left.
struct BulletWriter {
    out: String,
    open: Vec<NodeId>,
    remaining: usize,
}

impl BulletWriter {
    fn write_itemize(&mut self, items: &Value) -> Result<(), RenderError> {
        self.out.push_str("\n\t\\begin{itemize}[<+-| alert@+>]");
        match items {
            Value::Scalar(text) => self.push_item(text)?,
            Value::List(entries) => {
                for entry in entries {
                    match entry {
                        Value::Scalar(text) => self.push_item(text)?,
                        Value::Pairs(pairs) => self.write_pairs(pairs)?,
                        Value::List(_) => self.write_itemize(entry)?,
                    }
                }
            }
            Value::Pairs(pairs) => self.write_pairs(pairs)?,
        }
        self.out.push_str("\n\t\\end{itemize}");
        Ok(())
    }

    fn write_pairs(&mut self, pairs: &Pairs) -> Result<(), RenderError> {
        if self.open.contains(&pairs.id()) {
            return Err(RenderError::CyclicAlias {
                key: pairs.keys().into_iter().next().unwrap_or_default(),
            });
        }
        self.open.push(pairs.id());
        for (key, value) in pairs.entries().iter() {
            self.push_item(key)?;
            if !value.is_empty() {
                self.write_itemize(value)?;
            }
        }
        self.open.pop();
        Ok(())
    }

    fn push_item(&mut self, text: &str) -> Result<(), RenderError> {
        if self.remaining == 0 {
            return Err(RenderError::TooManyBullets { limit: MAX_BULLETS });
        }
        self.remaining -= 1;
        self.out.push_str("\n\t\\item ");
        self.out.push_str(&escape_text(text));
        Ok(())
    }
}

/// Renders a shrink-to-fit frame showing the image at `path`.
///
/// `options` become `key=value` pairs joined by commas, in order.
pub fn render_image_frame(path: &str, options: &Value) -> Result<String, RenderError> {
    let options = image_options(options)?;
    debug!(path, %options, "rendering image frame");
    Ok(format!(
        "\n\\frame[shrink] {{\n\t\\pgfimage[{options}]{{{path}}}\n}}"
    ))
}

fn image_options(options: &Value) -> Result<String, RenderError> {
    let mut parts = Vec::new();
    match options {
        Value::Scalar(text) => {
            if !text.is_empty() {
                parts.push(text.clone());
            }
        }
        Value::Pairs(pairs) => push_option_pairs(&mut parts, pairs)?,
        Value::List(entries) => {
            for entry in entries {
                match entry {
                    Value::Scalar(text) => parts.push(text.clone()),
                    Value::Pairs(pairs) => push_option_pairs(&mut parts, pairs)?,
                    Value::List(_) => {
                        return Err(RenderError::Structure {
                            context: "image options",
                            title: String::new(),
                            expected: "scalar or mapping",
                            found: entry.kind(),
                        })
                    }
                }
            }
        }
    }
    Ok(parts.join(","))
}

fn push_option_pairs(parts: &mut Vec<String>, pairs: &Pairs) -> Result<(), RenderError> {
    for (key, value) in pairs.entries().iter() {
        let Value::Scalar(text) = value else {
            return Err(RenderError::Structure {
                context: "image option",
                title: key.clone(),
                expected: "scalar",
                found: value.kind(),
            });
        };
        parts.push(format!("{key}={text}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::highlight::LatexHighlighter;
    use crate::parser::parse_document;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    fn parse(input: &str) -> Value {
        parse_document(input)
            .expect("valid yaml")
            .expect("non-empty document")
    }

    fn plain_generator() -> BeamerGenerator {
        BeamerGenerator::new(BeamerGeneratorOptions::default())
    }

    fn highlighting_generator(base_dir: &Path) -> BeamerGenerator {
        BeamerGenerator::new(BeamerGeneratorOptions {
            base_dir: base_dir.to_path_buf(),
            highlight_style: None,
        })
        .with_highlighter(Box::new(LatexHighlighter::new().expect("lexers compile")))
    }

    const ITEMIZE: &str = "\n\t\\begin{itemize}[<+-| alert@+>]";
    const END_ITEMIZE: &str = "\n\t\\end{itemize}";

    #[test]
    fn test_classify() -> Result<(), RenderError> {
        assert_eq!(classify("include foo.py")?, FrameKind::Code("foo.py"));
        assert_eq!(classify("image  diagram.png")?, FrameKind::Image("diagram.png"));
        assert_eq!(classify("Example")?, FrameKind::Content);
        assert_eq!(classify("Include foo.py")?, FrameKind::Content);
        assert_eq!(classify("Images of cats")?, FrameKind::Content);
        assert!(matches!(
            classify("include"),
            Err(RenderError::MissingPath { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_render_nested_bullets() -> Result<(), RenderError> {
        let items = parse("- A\n- B:\n    - C\n    - D\n");
        let out = render_bullet_list(&items)?;
        let expected = format!(
            "{ITEMIZE}\n\t\\item A\n\t\\item B{ITEMIZE}\n\t\\item C\n\t\\item D{END_ITEMIZE}{END_ITEMIZE}"
        );
        assert_eq!(out, expected);
        Ok(())
    }

    #[test]
    fn test_render_bullets_unbounded_depth() -> Result<(), RenderError> {
        let items = parse("- a:\n  - b:\n    - c:\n      - d:\n        - e\n");
        let out = render_bullet_list(&items)?;
        assert_eq!(out.matches("\\begin{itemize}").count(), 5);
        assert_eq!(out.matches("\\end{itemize}").count(), 5);
        assert!(out.contains("\\item e"));
        Ok(())
    }

    #[test]
    fn test_render_bullets_escapes_text() -> Result<(), RenderError> {
        let out = render_bullet_list(&Value::List(vec![Value::scalar("50% of $x_1$")]))?;
        assert!(out.contains("\\item 50\\% of \\$x\\_1\\$"));
        Ok(())
    }

    #[test]
    fn test_render_bullets_duplicate_nested_keys() -> Result<(), RenderError> {
        let items = parse("Point: [x]\nPoint: [y]\n");
        let out = render_bullet_list(&items)?;
        let first = out.find("\\item x").expect("x rendered");
        let second = out.find("\\item y").expect("y rendered");
        assert_eq!(out.matches("\\item Point").count(), 2);
        assert!(first < second);
        Ok(())
    }

    #[test]
    fn test_render_bullets_cyclic_alias() {
        let items = parse("&loop\nagain: *loop\n");
        let err = render_bullet_list(&items).unwrap_err();
        assert!(matches!(err, RenderError::CyclicAlias { ref key } if key == "again"));
    }

    #[test]
    fn test_render_bullets_nested_aliases_hit_limit() {
        let mut input = String::from("l0: &l0 [x, x, x, x, x, x, x, x]\n");
        for level in 1..=4 {
            input.push_str(&format!("l{level}: &l{level}\n"));
            for _ in 0..8 {
                input.push_str(&format!("  - *l{}\n", level - 1));
            }
        }
        input.push_str("frame:\n  - *l4\n");
        let document = parse(&input);
        let Value::Pairs(root) = document else {
            panic!("expected a mapping");
        };
        let items = root.get_last("frame").expect("frame entry");

        let err = render_bullet_list(&items).unwrap_err();
        assert!(matches!(err, RenderError::TooManyBullets { limit: MAX_BULLETS }));
    }

    #[test]
    fn test_render_bullets_shared_alias_within_limit() -> Result<(), RenderError> {
        let items = parse("- &p {Point: [a, b]}\n- *p\n- *p\n");
        let out = render_bullet_list(&items)?;
        assert_eq!(out.matches("\\item Point").count(), 3);
        assert_eq!(out.matches("\\item b").count(), 3);
        Ok(())
    }

    #[test]
    fn test_render_frame_content() -> Result<(), RenderError> {
        let out = plain_generator().render_frame("R&D", &parse("- one\n"))?;
        assert_eq!(
            out,
            format!("\n\\frame {{\n\t\\frametitle{{R\\&D}}{ITEMIZE}\n\t\\item one{END_ITEMIZE}\n}}")
        );
        Ok(())
    }

    #[test]
    fn test_render_frame_without_items() -> Result<(), RenderError> {
        let out = plain_generator().render_frame("Questions?", &Value::scalar(""))?;
        assert_eq!(out, "\n\\frame {\n\t\\frametitle{Questions?}\n}");
        Ok(())
    }

    #[test]
    fn test_render_image_frame_keeps_option_order() -> Result<(), RenderError> {
        let options = parse("width: 3cm\nangle: 90\n");
        let out = plain_generator().render_frame("image figures/plot.png", &options)?;
        assert_eq!(
            out,
            "\n\\frame[shrink] {\n\t\\pgfimage[width=3cm,angle=90]{figures/plot.png}\n}"
        );
        assert!(!out.contains("\\frametitle"));
        Ok(())
    }

    #[test]
    fn test_render_image_frame_without_options() -> Result<(), RenderError> {
        let out = render_image_frame("diagram.png", &Value::scalar(""))?;
        assert_eq!(out, "\n\\frame[shrink] {\n\t\\pgfimage[]{diagram.png}\n}");
        Ok(())
    }

    #[test]
    fn test_image_options_from_list() -> Result<(), RenderError> {
        let options = parse("- scale: 0.5\n- interpolate\n");
        assert_eq!(image_options(&options)?, "scale=0.5,interpolate");
        Ok(())
    }

    #[test]
    fn test_image_option_must_be_scalar() {
        let err = image_options(&parse("width: [1, 2]\n")).unwrap_err();
        assert!(matches!(err, RenderError::Structure { found: "list", .. }));
    }

    #[test]
    fn test_render_code_frame_highlighted() -> Result<(), anyhow::Error> {
        let dir = TempDir::new()?;
        let mut file = File::create(dir.path().join("foo.py"))?;
        writeln!(file, "def hello():\n    return 1")?;

        let out = highlighting_generator(dir.path())
            .render_frame("include foo.py", &Value::scalar(""))?;
        assert!(out.starts_with("\n\\begin{frame}[fragile,t]\n\t\\frametitle{Code: \"foo.py\"}\n"));
        assert!(out.contains("\\begin{Verbatim}[commandchars=\\\\\\{\\},numbers=left"));
        assert!(out.contains("\\PY{k}{def} hello():"));
        assert!(out.ends_with("\\end{Verbatim}\n\n\n\\end{frame}"));
        assert!(!out.contains("itemize"));
        Ok(())
    }

    #[test]
    fn test_render_code_frame_unknown_language_is_plain_text() -> Result<(), anyhow::Error> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("notes.unknown"), "def x {y}\n")?;

        let out = highlighting_generator(dir.path()).render_code_frame("notes.unknown")?;
        assert!(out.contains("def x \\PYZob{}y\\PYZcb{}\n"));
        assert!(!out.contains("\\PY{k}"));
        Ok(())
    }

    #[test]
    fn test_render_code_frame_without_highlighter() -> Result<(), anyhow::Error> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("foo.py"), "print('{}')")?;

        let generator = BeamerGenerator::new(BeamerGeneratorOptions {
            base_dir: dir.path().to_path_buf(),
            highlight_style: None,
        });
        let out = generator.render_frame("include foo.py", &Value::scalar(""))?;
        assert_eq!(
            out,
            "\n\\begin{frame}[fragile,t]\n\t\\frametitle{Code: \"foo.py\"}\
             \n\t\\begin{lstlisting}\nprint('{}')\n\t\\end{lstlisting}\n\\end{frame}"
        );
        Ok(())
    }

    #[test]
    fn test_render_code_frame_missing_file() -> Result<(), anyhow::Error> {
        let dir = TempDir::new()?;
        let err = highlighting_generator(dir.path())
            .render_code_frame("missing.py")
            .unwrap_err();
        match err {
            RenderError::Include { path, .. } => assert_eq!(path, dir.path().join("missing.py")),
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn test_render_header_defaults() {
        let out = plain_generator().render_header(&Metas::default());
        assert!(out.starts_with(
            "\\documentclass[slidestop,red]{beamer}\
             \n\\usepackage[utf8]{inputenc}\
             \n\\usepackage{fancyvrb,color}"
        ));
        assert!(out.contains("\\usepackage{listings}\n\\lstset{numbers=left}"));
        assert!(out.contains("\n\n\\title{Example Presentation}"));
        assert!(out.contains("\n\\date{\\today}"));
        assert!(out.contains("\n\n\\section*{Outline}"));
        assert!(out.contains("\\tableofcontents[currentsection]"));
        assert!(!out.contains("babel"));
        assert!(!out.contains("fontenc"));
    }

    #[test]
    fn test_render_header_with_metas() {
        let metas = Metas {
            title: "T".to_string(),
            short_title: Some("S".to_string()),
            outline: false,
            tex_babel: Some("english".to_string()),
            tex_fontenc: Some("T1".to_string()),
            ..Metas::default()
        };
        let out = plain_generator().render_header(&metas);
        assert!(out.contains("\n\\usepackage[english]{babel}\n\\usepackage[T1]{fontenc}"));
        assert!(out.contains("\\title[S]{T}"));
        assert!(!out.contains("\\tableofcontents"));
        assert!(!out.contains("\\section*"));
    }

    #[test]
    fn test_render_header_style_override() {
        let generator = BeamerGenerator::new(BeamerGeneratorOptions {
            base_dir: PathBuf::new(),
            highlight_style: Some("bw".to_string()),
        })
        .with_highlighter(Box::new(LatexHighlighter::new().expect("lexers compile")));
        let out = generator.render_header(&Metas::default());
        assert!(out.contains("\\@namedef{PY@tok@k}{\\let\\PY@bf=\\textbf}"));
        assert!(!out.contains("\\usepackage{listings}"));
    }

    #[test]
    fn test_render_document() -> Result<(), RenderError> {
        let document = parse(
            r#"
Intro:
  Why:
    Example:
      - first
    Example:
      - second
Details:
  How: {}
"#,
        );
        let out = plain_generator().render(&document)?.expect("output");

        assert!(out.contains("\n\n\\section*{Outline}"));
        let intro = out.find("\\section{Intro}").expect("intro");
        let why = out.find("\\subsection{Why}").expect("why");
        let first = out.find("\\item first").expect("first");
        let second = out.find("\\item second").expect("second");
        let details = out.find("\\section{Details}").expect("details");
        assert!(intro < why && why < first && first < second && second < details);
        assert_eq!(out.matches("\\frametitle{Example}").count(), 2);
        assert!(out.ends_with("\n\\end{document}"));
        Ok(())
    }

    #[test]
    fn test_render_document_with_metas() -> Result<(), RenderError> {
        let document = parse("metas:\n  title: T\n  outline: false\nS:\n  SS:\n    F: [x]\n");
        let out = plain_generator().render(&document)?.expect("output");
        assert!(out.contains("\\title{T}"));
        assert!(!out.contains("\\tableofcontents"));
        assert!(!out.contains("\\section{metas}"));
        assert!(out.contains("\\section{S}"));
        Ok(())
    }

    #[test]
    fn test_render_is_repeatable() -> Result<(), RenderError> {
        let document = parse("S:\n  SS:\n    F: [a, {b: [c]}]\n    image x.png: {scale: 2}\n");
        let generator = plain_generator();
        assert_eq!(generator.render(&document)?, generator.render(&document)?);
        Ok(())
    }

    #[test]
    fn test_render_empty_document() -> Result<(), RenderError> {
        assert_eq!(plain_generator().render(&Value::Pairs(Pairs::new()))?, None);
        assert_eq!(plain_generator().render(&Value::scalar(""))?, None);
        Ok(())
    }

    #[test]
    fn test_render_rejects_non_mapping_bodies() {
        let err = plain_generator().render(&parse("- a\n- b\n")).unwrap_err();
        assert!(matches!(err, RenderError::Structure { context: "document", .. }));

        let err = plain_generator().render(&parse("S: [a]\n")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "section \"S\": expected a mapping, found a list"
        );

        let err = plain_generator().render(&parse("S:\n  SS: text\n")).unwrap_err();
        assert!(matches!(err, RenderError::Structure { context: "subsection", .. }));
    }
}
