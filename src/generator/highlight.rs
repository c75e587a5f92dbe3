//! Syntax highlighting for included source files.
//!
//! The renderer talks to a [`Highlighter`]; when none is configured it falls
//! back to plain `listings` output. [`LatexHighlighter`] is the built-in
//! implementation: a small regex lexer writing `fancyvrb` markup in the same
//! `\PY{class}{text}` macro scheme Pygments uses, so its style definitions
//! can be swapped for Pygments-generated ones.

use std::collections::HashSet;

use regex::Regex;
use tracing::warn;

/// Language name used when no other language applies.
pub const PLAIN_TEXT: &str = "text";

/// Names of the built-in highlight styles; the first one is the default.
pub const STYLES: &[&str] = &["default", "bw", "friendly"];

/// Turns source text into typesetting markup.
pub trait Highlighter {
    /// Returns the preamble block defining the markup used by `highlight`.
    fn style_defs(&self, style: &str) -> String;

    /// Guesses the language of a file from its name.
    fn language_for_filename(&self, filename: &str) -> Option<&'static str>;

    /// Highlights `source` as `language`, with line numbers.
    ///
    /// The result ends with a newline.
    fn highlight(&self, source: &str, language: &str) -> String;
}

struct LanguageDef {
    name: &'static str,
    extensions: &'static [&'static str],
    keywords: &'static [&'static str],
    line_comment: Option<&'static str>,
    block_comment: Option<(&'static str, &'static str)>,
    /// Single quotes delimit one character, not a string.
    char_literals: bool,
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef", "union",
    "unsigned", "void", "volatile", "while",
];

const CPP_KEYWORDS: &[&str] = &[
    "auto", "bool", "break", "case", "catch", "char", "class", "const", "continue", "default",
    "delete", "do", "double", "else", "enum", "explicit", "extern", "false", "float", "for",
    "friend", "if", "inline", "int", "long", "namespace", "new", "nullptr", "operator",
    "private", "protected", "public", "return", "short", "signed", "sizeof", "static",
    "struct", "switch", "template", "this", "throw", "true", "try", "typedef", "typename",
    "union", "unsigned", "using", "virtual", "void", "volatile", "while",
];

static LANGUAGES: &[LanguageDef] = &[
    LanguageDef {
        name: "python",
        extensions: &["py", "pyw"],
        keywords: &[
            "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
            "continue", "def", "del", "elif", "else", "except", "finally", "for", "from",
            "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass",
            "raise", "return", "try", "while", "with", "yield",
        ],
        line_comment: Some("#"),
        block_comment: None,
        char_literals: false,
    },
    LanguageDef {
        name: "rust",
        extensions: &["rs"],
        keywords: &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
            "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
            "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
            "trait", "true", "type", "unsafe", "use", "where", "while",
        ],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        char_literals: true,
    },
    LanguageDef {
        name: "c",
        extensions: &["c", "h"],
        keywords: C_KEYWORDS,
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        char_literals: true,
    },
    LanguageDef {
        name: "cpp",
        extensions: &["cpp", "cc", "cxx", "hpp", "hh"],
        keywords: CPP_KEYWORDS,
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        char_literals: true,
    },
    LanguageDef {
        name: "java",
        extensions: &["java"],
        keywords: &[
            "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "continue",
            "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
            "float", "for", "if", "implements", "import", "instanceof", "int", "interface",
            "long", "new", "null", "package", "private", "protected", "public", "return",
            "short", "static", "super", "switch", "this", "throw", "throws", "true", "try",
            "void", "while",
        ],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        char_literals: true,
    },
    LanguageDef {
        name: "javascript",
        extensions: &["js", "mjs"],
        keywords: &[
            "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
            "delete", "do", "else", "export", "extends", "false", "finally", "for", "function",
            "if", "import", "in", "instanceof", "let", "new", "null", "return", "super",
            "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void",
            "while", "with", "yield",
        ],
        line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        char_literals: false,
    },
    LanguageDef {
        name: "ruby",
        extensions: &["rb"],
        keywords: &[
            "alias", "and", "begin", "break", "case", "class", "def", "do", "else", "elsif",
            "end", "ensure", "false", "for", "if", "in", "module", "next", "nil", "not", "or",
            "redo", "rescue", "retry", "return", "self", "super", "then", "true", "undef",
            "unless", "until", "when", "while", "yield",
        ],
        line_comment: Some("#"),
        block_comment: None,
        char_literals: false,
    },
    LanguageDef {
        name: "shell",
        extensions: &["sh", "bash"],
        keywords: &[
            "case", "do", "done", "elif", "else", "esac", "export", "fi", "for", "function", "if",
            "in", "local", "return", "then", "until", "while",
        ],
        line_comment: Some("#"),
        block_comment: None,
        char_literals: false,
    },
    LanguageDef {
        name: "yaml",
        extensions: &["yml", "yaml"],
        keywords: &["true", "false", "null", "yes", "no"],
        line_comment: Some("#"),
        block_comment: None,
        char_literals: false,
    },
];

/// A compiled lexer for one language.
struct Lexer {
    name: &'static str,
    pattern: Regex,
    keywords: HashSet<&'static str>,
}

impl Lexer {
    fn new(def: &LanguageDef) -> Result<Self, regex::Error> {
        let mut comments = Vec::new();
        if let Some((open, close)) = def.block_comment {
            comments.push(format!(
                r"(?s:{}.*?{})",
                regex::escape(open),
                regex::escape(close)
            ));
        }
        if let Some(prefix) = def.line_comment {
            comments.push(format!(r"{}[^\n]*", regex::escape(prefix)));
        }

        let single = if def.char_literals {
            r"'(?:\\.|[^'\\\n])'"
        } else {
            r"'(?:\\.|[^'\\\n])*'"
        };
        let strings = format!(r#""(?:\\.|[^"\\\n])*"|{single}"#);
        let numbers = r"\b(?:0[xX][0-9A-Fa-f_]+|\d[\d_]*(?:\.\d+)?(?:[eE][+-]?\d+)?)\b";
        let words = r"[A-Za-z_][A-Za-z0-9_]*";

        let mut alternatives = Vec::new();
        if !comments.is_empty() {
            alternatives.push(format!("(?P<c>{})", comments.join("|")));
        }
        alternatives.push(format!("(?P<s>{strings})"));
        alternatives.push(format!("(?P<m>{numbers})"));
        alternatives.push(format!("(?P<w>{words})"));

        Ok(Lexer {
            name: def.name,
            pattern: Regex::new(&alternatives.join("|"))?,
            keywords: def.keywords.iter().copied().collect(),
        })
    }

    fn tokenize(&self, source: &str, out: &mut String) {
        let mut last = 0;
        for caps in self.pattern.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            push_escaped(out, &source[last..whole.start()]);
            last = whole.end();

            let text = whole.as_str();
            let class = if caps.name("c").is_some() {
                Some("c")
            } else if caps.name("s").is_some() {
                Some("s")
            } else if caps.name("m").is_some() {
                Some("m")
            } else if self.keywords.contains(text) {
                Some("k")
            } else {
                None
            };

            match class {
                Some(class) => push_token(out, class, text),
                None => push_escaped(out, text),
            }
        }
        push_escaped(out, &source[last..]);
    }
}

/// Regex-driven highlighter producing `fancyvrb` markup.
pub struct LatexHighlighter {
    lexers: Vec<Lexer>,
}

impl LatexHighlighter {
    /// Compiles the lexers of all built-in languages.
    pub fn new() -> Result<Self, regex::Error> {
        let lexers: Vec<Lexer> = LANGUAGES.iter().map(Lexer::new).collect::<Result<_, _>>()?;
        Ok(LatexHighlighter { lexers })
    }

    fn lexer(&self, language: &str) -> Option<&Lexer> {
        self.lexers.iter().find(|l| l.name == language)
    }
}

impl Highlighter for LatexHighlighter {
    fn style_defs(&self, style: &str) -> String {
        let tokens = match token_styles(style) {
            Some(tokens) => tokens,
            None => {
                warn!(style, "unknown highlight style, using \"{}\"", STYLES[0]);
                DEFAULT_STYLE
            }
        };

        let mut out = String::from(STYLE_PROLOGUE);
        for token in tokens {
            out.push_str(&token.definition());
            out.push('\n');
        }
        out.push_str(STYLE_EPILOGUE);
        out
    }

    fn language_for_filename(&self, filename: &str) -> Option<&'static str> {
        let (_, extension) = filename.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();
        LANGUAGES
            .iter()
            .find(|def| def.extensions.contains(&extension.as_str()))
            .map(|def| def.name)
    }

    fn highlight(&self, source: &str, language: &str) -> String {
        let mut out = String::from(
            "\\begin{Verbatim}[commandchars=\\\\\\{\\},numbers=left,firstnumber=1,stepnumber=1]\n",
        );
        match self.lexer(language) {
            Some(lexer) => lexer.tokenize(source, &mut out),
            None => push_escaped(&mut out, source),
        }
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("\\end{Verbatim}\n");
        out
    }
}

/// Writes source text with the Verbatim command characters replaced.
fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\PYZbs{}"),
            '{' => out.push_str("\\PYZob{}"),
            '}' => out.push_str("\\PYZcb{}"),
            _ => out.push(c),
        }
    }
}

/// Wraps a token in `\PY{class}{..}`, once per line so no macro spans a line break.
fn push_token(out: &mut String, class: &str, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.is_empty() {
            continue;
        }
        out.push_str("\\PY{");
        out.push_str(class);
        out.push_str("}{");
        push_escaped(out, line);
        out.push('}');
    }
}

struct TokenStyle {
    class: &'static str,
    bold: bool,
    italic: bool,
    rgb: Option<(f32, f32, f32)>,
}

impl TokenStyle {
    fn definition(&self) -> String {
        let mut body = String::new();
        if self.bold {
            body.push_str("\\let\\PY@bf=\\textbf");
        }
        if self.italic {
            body.push_str("\\let\\PY@it=\\textit");
        }
        if let Some((r, g, b)) = self.rgb {
            body.push_str(&format!(
                "\\def\\PY@tc##1{{\\textcolor[rgb]{{{r:.2},{g:.2},{b:.2}}}{{##1}}}}"
            ));
        }
        format!("\\@namedef{{PY@tok@{}}}{{{}}}", self.class, body)
    }
}

const DEFAULT_STYLE: &[TokenStyle] = &[
    TokenStyle { class: "k", bold: true, italic: false, rgb: Some((0.00, 0.50, 0.00)) },
    TokenStyle { class: "c", bold: false, italic: true, rgb: Some((0.24, 0.48, 0.48)) },
    TokenStyle { class: "s", bold: false, italic: false, rgb: Some((0.73, 0.13, 0.13)) },
    TokenStyle { class: "m", bold: false, italic: false, rgb: Some((0.40, 0.40, 0.40)) },
];

const BW_STYLE: &[TokenStyle] = &[
    TokenStyle { class: "k", bold: true, italic: false, rgb: None },
    TokenStyle { class: "c", bold: false, italic: true, rgb: None },
    TokenStyle { class: "s", bold: false, italic: true, rgb: None },
    TokenStyle { class: "m", bold: false, italic: false, rgb: None },
];

const FRIENDLY_STYLE: &[TokenStyle] = &[
    TokenStyle { class: "k", bold: true, italic: false, rgb: Some((0.00, 0.44, 0.13)) },
    TokenStyle { class: "c", bold: false, italic: true, rgb: Some((0.25, 0.50, 0.56)) },
    TokenStyle { class: "s", bold: false, italic: false, rgb: Some((0.25, 0.44, 0.63)) },
    TokenStyle { class: "m", bold: false, italic: false, rgb: Some((0.13, 0.50, 0.31)) },
];

fn token_styles(style: &str) -> Option<&'static [TokenStyle]> {
    match style {
        "default" => Some(DEFAULT_STYLE),
        "bw" => Some(BW_STYLE),
        "friendly" => Some(FRIENDLY_STYLE),
        _ => None,
    }
}

const STYLE_PROLOGUE: &str = r"\makeatletter
\def\PY@reset{\let\PY@it=\relax \let\PY@bf=\relax%
    \let\PY@ul=\relax \let\PY@tc=\relax%
    \let\PY@bc=\relax \let\PY@ff=\relax}
\def\PY@tok#1{\csname PY@tok@#1\endcsname}
\def\PY@toks#1+{\ifx\relax#1\empty\else%
    \PY@tok{#1}\expandafter\PY@toks\fi}
\def\PY@do#1{\PY@bc{\PY@tc{\PY@ul{%
    \PY@it{\PY@bf{\PY@ff{#1}}}}}}}
\def\PY#1#2{\PY@reset\PY@toks#1+\relax+\PY@do{#2}}

";

const STYLE_EPILOGUE: &str = r"
\def\PYZbs{\char`\\}
\def\PYZob{\char`\{}
\def\PYZcb{\char`\}}
\makeatother
";
