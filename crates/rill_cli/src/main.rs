//! rill: Scan a rill source file and print its tokens.
//!
//! Usage:
//!   rill [options] <FILE>
//!
//! Prints one `<lexeme>\t<KIND>` line per token on stdout and reports
//! malformed lexemes on stderr. Set `RILL_LOG` (e.g. `RILL_LOG=rill_scanner=trace`)
//! to enable scanner logging.

mod render;

use clap::Parser as ClapParser;
use miette::{IntoDiagnostic, WrapErr};
use rill_core::SourceFile;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(ClapParser, Debug)]
#[command(name = "rill", about = "rill - tokenize rill source files", version)]
struct Cli {
    /// Source file to scan.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print tokens as a JSON array instead of one per line.
    #[arg(long)]
    json: bool,

    /// Render diagnostics with the offending source snippet.
    #[arg(long)]
    pretty: bool,
}

fn main() -> miette::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let source = SourceFile::load(&cli.file)
        .into_diagnostic()
        .wrap_err("could not load source")?;
    tracing::debug!(path = %source.name(), bytes = source.len(), "loaded source");
    let (tokens, diagnostics) = rill_scanner::scan(source.text()).into_parts();

    if cli.pretty {
        render::print_reports(&source, &diagnostics);
    } else {
        let use_color = stderr_is_terminal();
        for diag in &diagnostics {
            render::print_diagnostic(diag, use_color);
        }
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.json {
        render::write_json(&mut out, &source, &tokens)
            .into_diagnostic()
            .wrap_err("failed to write tokens")?;
    } else {
        render::write_tokens(&mut out, &tokens)
            .into_diagnostic()
            .wrap_err("failed to write tokens")?;
    }
    out.flush().into_diagnostic()?;
    Ok(())
}

/// Install a stderr subscriber, but only when `RILL_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Ok(filter) = EnvFilter::try_from_env("RILL_LOG") {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    }
}

fn stderr_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
