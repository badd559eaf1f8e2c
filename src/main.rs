use clap::{ArgAction, Parser, Subcommand};
use filetext::capability::{Capabilities, Engine};
use filetext::dispatch::Dispatcher;
use filetext::registry::{self, FormatInfo};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filetext", version, about = "Read and overwrite many file formats as plain text")]
struct Cli {
    /// Treat an engine as absent: tabular-engine, yaml-engine, pdf-engine,
    /// pdf-writer-engine, docx-engine, image-engine
    #[arg(long = "disable", value_name = "ENGINE", value_parser = parse_engine, global = true)]
    disable: Vec<Engine>,
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a file's contents as text
    Read {
        path: PathBuf,
    },
    /// Overwrite a file with new text
    Write {
        /// File to modify
        path: PathBuf,
        /// File containing the new contents; stdin if omitted
        input: Option<PathBuf>,
    },
    /// List supported extensions and engine availability
    Formats {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let caps = cli
        .disable
        .iter()
        .fold(*Capabilities::detected(), |caps, engine| caps.without(*engine));
    let files = Dispatcher::with_capabilities(&caps);

    match cli.command {

        // ── Read ─────────────────────────────────────────────────────────────
        Commands::Read { path } => {
            let text = files.read(&path)?;
            let mut out = io::stdout().lock();
            writeln!(out, "{text}")?;
        }

        // ── Write ────────────────────────────────────────────────────────────
        Commands::Write { path, input } => {
            let content = match input {
                Some(src) => std::fs::read_to_string(&src)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            files.write(&path, &content)?;
        }

        // ── Formats ──────────────────────────────────────────────────────────
        Commands::Formats { json } => {
            let rows = registry::describe(&caps);
            print_formats(&mut io::stdout().lock(), &rows, json)?;
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn print_formats<W: Write>(out: &mut W, rows: &[FormatInfo], json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, rows)?;
        return writeln!(out);
    }
    writeln!(out, "{:<7} {:<12} {:<18} {:>8}  {:<4}  {}",
             "Ext", "Format", "Engine", "Fallback", "Read", "Write")?;
    for r in rows {
        writeln!(out, "{:<7} {:<12} {:<18} {:>8}  {:<4}  {}",
            r.extension, r.format, r.engine.unwrap_or("-"),
            yes_no(r.fallback), yes_no(r.readable), yes_no(r.writable))?;
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn parse_engine(s: &str) -> Result<Engine, String> {
    Engine::from_name(s).ok_or_else(|| {
        let known: Vec<_> = Engine::ALL.iter().map(|e| e.name()).collect();
        format!("unknown engine '{s}' (expected one of: {})", known.join(", "))
    })
}

/// `RUST_LOG` wins; otherwise `-v` picks the level.  Logs go to stderr so
/// stdout only carries file contents.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stands in for stdout after the reader of a pipe has gone away.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn formats_table_lists_read_and_write() {
        let rows = registry::describe(&Capabilities::none());
        let mut out = Vec::new();
        print_formats(&mut out, &rows, false).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Ext "));
        assert_eq!(text.lines().count(), rows.len() + 1);
        let pdf = text.lines().find(|l| l.starts_with(".pdf")).unwrap();
        assert!(pdf.ends_with("no    no"), "{pdf:?}");
    }

    #[test]
    fn formats_json_is_an_array() {
        let rows = registry::describe(Capabilities::detected());
        let mut out = Vec::new();
        print_formats(&mut out, &rows, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(rows.len()));
    }

    #[test]
    fn closed_stdout_is_an_error_not_a_panic() {
        let rows = registry::describe(Capabilities::detected());
        for json in [false, true] {
            let err = print_formats(&mut ClosedPipe, &rows, json).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        }
    }
}
