use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use yml2tex_rs::cli::{run_conversion, Conversion, ConversionOptions};
use yml2tex_rs::get_highlight_styles;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

/// Exit status when the input holds no document.
const EXIT_EMPTY: u8 = 3;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input YAML outline
    input: Option<String>,

    /// Output file (default: stdout)
    output: Option<String>,

    /// Render code frames with `listings` instead of the highlighter
    #[arg(long)]
    no_highlight: bool,

    /// Highlight style, overriding `highlight_style` in the metas block
    #[arg(long, value_name = "NAME")]
    highlight_style: Option<String>,

    /// List available highlight styles
    #[arg(short = 'l', long)]
    list_styles: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "yml2tex_rs=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.list_styles {
        println!("highlight styles:");
        println!("{}", get_highlight_styles().join(" "));
        return Ok(ExitCode::SUCCESS);
    }

    let Some(input_path) = cli.input else {
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    let options = ConversionOptions {
        highlight: !cli.no_highlight,
        highlight_style: cli.highlight_style,
    };

    // The output is opened only once the markup is complete.
    let mut markup = Vec::new();
    let outcome = run_conversion(Path::new(&input_path), &mut markup, &options)?;

    if outcome == Conversion::Written {
        let mut output_writer: Box<dyn Write> = match cli.output {
            Some(path) if path != "-" => Box::new(
                File::create(&path).with_context(|| format!("Failed to create {}", path))?,
            ),
            _ => Box::new(io::stdout()),
        };
        output_writer.write_all(&markup)?;
        output_writer.flush()?;
    }

    Ok(match outcome {
        Conversion::Written => ExitCode::SUCCESS,
        Conversion::Empty => ExitCode::from(EXIT_EMPTY),
    })
}
