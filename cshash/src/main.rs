//! cshash: Command-line tool printing certificate structure fingerprints.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use cshash_lib::{
    ContentPolicy, CshashError, DecodeOptions, FingerprintOptions, InputFormat, RenderOptions,
};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cshash",
    version,
    about = "Print the Certificate Structure Fingerprint of an X.509 certificate",
    long_about = "cshash hashes the ASN.1 structure of a DER-encoded X.509 certificate:\n\
                  the order and nesting of its fields and the OIDs it names, but not\n\
                  serial numbers, names, dates, keys or signatures. Certificates issued\n\
                  by the same CA software from the same template share a fingerprint.\n\n\
                  The certificate is read from the CERT argument (base64), from --input,\n\
                  or from stdin when neither is given or --input is '-'.",
    after_help = "EXAMPLES:\n\
                  \n  cshash MIIDhzCCAm+gAwIBAgIU...\
                  \n  cshash -i cert.pem --inform pem\
                  \n  cshash -i cert.der --inform der --struct --pretty\
                  \n  cshash -i certs/ --recurse --json\
                  \n  cshash -i cert.pem --inform pem --policy extensions\
                  \n  cat cert.pem | cshash --inform pem"
)]
struct Cli {
    /// Certificate in base64 (PEM markers and line breaks are tolerated)
    cert: Option<String>,
    /// Input file or directory; '-' reads from stdin
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,
    /// Input format
    #[arg(long, value_enum, ignore_case = true, default_value_t = Format::Base64)]
    inform: Format,
    /// Print the certificate structure instead of the fingerprint
    #[arg(long = "struct")]
    structure: bool,
    /// Pretty-print the structure
    #[arg(long, requires = "structure")]
    pretty: bool,
    /// Which field contents are kept in the structure [default: oid-only]
    #[arg(long, value_enum)]
    policy: Option<Policy>,
    /// Use the legacy binary structure fingerprint
    #[arg(long, conflicts_with_all = ["structure", "policy"])]
    csf: bool,
    /// Maximum nesting depth accepted by the decoder (1 to 256)
    #[arg(
        long,
        value_name = "N",
        value_parser = parse_max_depth,
        default_value_t = cshash_lib::DEFAULT_MAX_DEPTH
    )]
    max_depth: usize,
    /// Output one JSON object per certificate
    #[arg(long)]
    json: bool,
    /// Recurse into subdirectories (directory mode)
    #[arg(short, long)]
    recurse: bool,
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_max_depth(arg: &str) -> std::result::Result<usize, String> {
    let depth: usize = arg.parse().map_err(|e| format!("{e}"))?;
    if (1..=cshash_lib::MAX_DEPTH_LIMIT).contains(&depth) {
        Ok(depth)
    } else {
        Err(format!(
            "must be between 1 and {}",
            cshash_lib::MAX_DEPTH_LIMIT
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Format {
    Base64,
    Pem,
    Der,
}

impl From<Format> for InputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Base64 => InputFormat::Base64,
            Format::Pem => InputFormat::Pem,
            Format::Der => InputFormat::Der,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Policy {
    OidOnly,
    Extensions,
}

impl From<Policy> for ContentPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::OidOnly => ContentPolicy::OidOnly,
            Policy::Extensions => ContentPolicy::Extensions,
        }
    }
}

/// What to compute for each certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Fingerprint(ContentPolicy),
    Csf,
    Structure(RenderOptions),
}

#[derive(Clone, Copy, Debug)]
struct Job {
    mode: Mode,
    decode: DecodeOptions,
}

impl Job {
    fn from_cli(cli: &Cli) -> Self {
        let policy = cli.policy.map(ContentPolicy::from).unwrap_or_default();
        let mode = if cli.csf {
            Mode::Csf
        } else if cli.structure {
            Mode::Structure(RenderOptions {
                pretty: cli.pretty,
                policy,
            })
        } else {
            Mode::Fingerprint(policy)
        };
        Self {
            mode,
            decode: DecodeOptions {
                max_depth: cli.max_depth,
            },
        }
    }

    /// Run the job over one certificate input.
    fn process(&self, input: &[u8], format: InputFormat) -> Result<String, CshashError> {
        let der = cshash_lib::to_der(input, format)?;
        let output = match self.mode {
            Mode::Fingerprint(policy) => cshash_lib::fingerprint_with(
                &der,
                &FingerprintOptions {
                    decode: self.decode,
                    policy,
                },
            )?,
            Mode::Csf => cshash_lib::csf_fingerprint_with(&der, &self.decode)?,
            Mode::Structure(options) => {
                let root = cshash_lib::decode_with(&der, &self.decode)?;
                cshash_lib::render_with(&root, options)
            }
        };
        Ok(output)
    }
}

/// User-facing error text.
///
/// Certificate decode failures are reported generically; the typed error
/// only goes to the debug log.
fn describe_error(err: &CshashError) -> String {
    match err {
        CshashError::Decode(e) => {
            tracing::debug!(error = %e, "certificate decode failed");
            "parsing error".to_string()
        }
        other => other.to_string(),
    }
}

/// One JSON output record.
#[derive(Debug, Serialize)]
struct Report<'a> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    structure: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> Report<'a> {
    fn new(source: &'a str, mode: Mode, outcome: &'a std::result::Result<String, String>) -> Self {
        let (value, error) = match outcome {
            Ok(v) => (Some(v.as_str()), None),
            Err(e) => (None, Some(e.as_str())),
        };
        let is_structure = matches!(mode, Mode::Structure(_));
        Self {
            source,
            fingerprint: value.filter(|_| !is_structure),
            structure: value.filter(|_| is_structure),
            error,
        }
    }
}

/// Maximum file size for certificate inputs (10 MiB).
const MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Read one certificate input, from `file` or from stdin.
fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            let f = std::fs::File::open(path)
                .with_context(|| format!("Failed to open file: {}", path.display()))?;
            read_capped(f).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => read_capped(std::io::stdin().lock()).context("Failed to read from stdin"),
    }
}

/// Read `source` to the end, failing once it exceeds [`MAX_INPUT_BYTES`].
fn read_capped(source: impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    source.take(MAX_INPUT_BYTES + 1).read_to_end(&mut buf)?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        anyhow::bail!("input larger than {} bytes", MAX_INPUT_BYTES);
    }
    Ok(buf)
}

/// Extensions picked up in directory mode.
const CERT_EXTENSIONS: [&str; 4] = ["pem", "der", "crt", "cer"];

/// Extensions read as DER unless the content is PEM.
const DER_EXTENSIONS: [&str; 2] = ["der", "cer"];

fn has_extension(path: &Path, candidates: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| candidates.iter().any(|c| ext.eq_ignore_ascii_case(c)))
}

fn is_cert_file(path: &Path) -> bool {
    has_extension(path, &CERT_EXTENSIONS)
}

/// Certificate files under `dir`, sorted by path. Only the top level is
/// searched unless `recurse` is set; unreadable entries are skipped.
fn find_cert_files(dir: &Path, recurse: bool) -> Vec<PathBuf> {
    let depth = if recurse { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(depth)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| is_cert_file(path))
        .collect();
    files.sort_unstable();
    files
}

/// Pick the format for a file found in directory mode.
///
/// PEM content wins, then a `.der`/`.cer` extension, then `--inform`.
fn file_format(path: &Path, data: &[u8], fallback: InputFormat) -> InputFormat {
    if cshash_lib::is_pem(data) {
        InputFormat::Pem
    } else if has_extension(path, &DER_EXTENSIONS) {
        InputFormat::Der
    } else {
        fallback
    }
}

/// A single result from batch processing.
struct BatchResult {
    path: String,
    outcome: std::result::Result<String, String>,
}

/// Fingerprint certificate files in parallel, printing `filename: result`.
///
/// Returns the number of failures.
fn run_batch(files: &[PathBuf], job: &Job, fallback: InputFormat, json: bool) -> Result<usize> {
    let results: Vec<BatchResult> = files
        .par_iter()
        .map(|f| {
            let outcome = match read_input(Some(f)) {
                Ok(data) => job
                    .process(&data, file_format(f, &data, fallback))
                    .map_err(|e| describe_error(&e)),
                Err(e) => Err(format!("read error: {:#}", e)),
            };
            BatchResult {
                path: f.display().to_string(),
                outcome,
            }
        })
        .collect();

    let mut failures = 0;
    for r in &results {
        if r.outcome.is_err() {
            failures += 1;
        }
        if json {
            println!(
                "{}",
                serde_json::to_string(&Report::new(&r.path, job.mode, &r.outcome))?
            );
            continue;
        }
        match &r.outcome {
            Ok(value) => println!("{}: {}", r.path, value),
            Err(e) => eprintln!("{}: FAIL ({})", r.path, e),
        }
    }
    Ok(failures)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cshash={level},cshash_lib={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let job = Job::from_cli(&cli);
    let inform = InputFormat::from(cli.inform);
    let input_path = cli.input.as_deref().filter(|p| *p != Path::new("-"));

    // Directory mode: process all cert files in parallel
    if let Some(path) = input_path {
        if path.is_dir() {
            if cli.cert.is_some() {
                anyhow::bail!("Give either a CERT argument or --input, not both");
            }
            let files = find_cert_files(path, cli.recurse);
            if files.is_empty() {
                anyhow::bail!(
                    "No certificate files (.pem, .der, .crt, .cer) found in {}",
                    path.display()
                );
            }
            tracing::debug!(count = files.len(), dir = %path.display(), "processing directory");
            let failures = run_batch(&files, &job, inform, cli.json)?;
            if failures > 0 {
                std::process::exit(1);
            }
            return Ok(());
        }
    }

    // Single certificate mode
    let (label, data, format) = match (&cli.cert, input_path) {
        (Some(_), Some(_)) => anyhow::bail!("Give either a CERT argument or --input, not both"),
        (Some(cert), None) => {
            if cli.inform == Format::Der {
                anyhow::bail!("An inline CERT argument must be base64, not DER");
            }
            ("argument".to_string(), cert.clone().into_bytes(), InputFormat::Base64)
        }
        (None, Some(path)) => (path.display().to_string(), read_input(Some(path))?, inform),
        (None, None) => ("stdin".to_string(), read_input(None)?, inform),
    };

    let outcome = job.process(&data, format).map_err(|e| describe_error(&e));
    if cli.json {
        println!(
            "{}",
            serde_json::to_string(&Report::new(&label, job.mode, &outcome))?
        );
        if outcome.is_err() {
            std::process::exit(1);
        }
        return Ok(());
    }
    match outcome {
        Ok(value) => println!("{}", value),
        Err(e) => anyhow::bail!(e),
    }
    Ok(())
}
