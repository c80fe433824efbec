//! `jasn`: validate JSON from a file or standard input.
//!
//! Exits with `0` when every document parses, `1` on the first parse error
//! and `2` when the input cannot be read. Errors go to stderr as
//! `name:line:column: message`.

use std::{
    fs,
    io::{self, BufWriter, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser as _;
use jasn::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_VALUES, Document, ParseError, ParserOptions, ValueKind,
};
use thiserror::Error;

#[derive(clap::Parser, Debug)]
#[command(name = "jasn", version, about = "Validate JSON and report the first error")]
struct Cli {
    /// Input file. Reads standard input when omitted or `-`.
    file: Option<PathBuf>,

    /// Maximum nesting depth of arrays and objects.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum number of values per document.
    #[arg(long, default_value_t = DEFAULT_MAX_VALUES)]
    max_values: usize,

    /// Ignore anything after the first complete value.
    #[arg(long, conflicts_with = "lines")]
    allow_trailing_content: bool,

    /// Parse a whitespace-separated sequence of values, such as NDJSON.
    #[arg(long)]
    lines: bool,

    /// Print each document in compact canonical form instead of a summary.
    #[arg(long)]
    print: bool,
}

impl Cli {
    fn options(&self) -> ParserOptions {
        ParserOptions {
            max_depth: self.max_depth,
            max_values: self.max_values,
            allow_trailing_content: self.allow_trailing_content,
            ..ParserOptions::default()
        }
    }

    fn name(&self) -> String {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => path.display().to_string(),
            _ => "<stdin>".to_string(),
        }
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error("{name}: {source}")]
    Read { name: String, source: io::Error },
    #[error("{name}:{line}:{column}: {source}")]
    Parse {
        name: String,
        line: usize,
        column: usize,
        source: ParseError,
    },
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Parse { .. } => 1,
            CliError::Read { .. } | CliError::Write(_) => 2,
        }
    }
}

fn read_input(cli: &Cli) -> Result<Vec<u8>, CliError> {
    let result = match &cli.file {
        Some(path) if path.as_os_str() != "-" => fs::read(path),
        _ => {
            let mut input = Vec::new();
            io::stdin().lock().read_to_end(&mut input).map(|_| input)
        }
    };
    result.map_err(|source| CliError::Read {
        name: cli.name(),
        source,
    })
}

fn kind_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Null => "null",
        ValueKind::Bool => "boolean",
        ValueKind::Number => "number",
        ValueKind::String => "string",
        ValueKind::Array => "array",
        ValueKind::Object => "object",
    }
}

fn report(doc: &Document, print: bool, out: &mut impl Write) -> io::Result<()> {
    if print {
        writeln!(out, "{doc}")
    } else {
        writeln!(
            out,
            "ok: {}, {} values, ends at byte {}",
            kind_name(doc.root().kind()),
            doc.value_count(),
            doc.end_offset(),
        )
    }
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let input = read_input(cli)?;
    log::debug!("read {} bytes from {}", input.len(), cli.name());

    let parse_error = |source: ParseError| {
        let (line, column) = source.line_column(&input);
        CliError::Parse {
            name: cli.name(),
            line,
            column,
            source,
        }
    };

    if cli.lines {
        let mut count = 0_usize;
        for doc in jasn::parse_many(&input, cli.options()) {
            report(&doc.map_err(&parse_error)?, cli.print, out)?;
            count += 1;
        }
        log::info!("{count} documents");
    } else {
        let doc = jasn::parse_with_options(&input, cli.options()).map_err(parse_error)?;
        report(&doc, cli.print, out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let mut out = BufWriter::new(io::stdout().lock());
    match run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // flush whatever was reported before the failing document
            let _ = out.flush();
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
