use clap::{Parser, Subcommand, ValueEnum};
use shotprep::pipeline::Pipeline;
use shotprep::transport::{self, AnalyzeRequest};
use shotprep::upload::{CandidateFile, PreparedFile};
use shotprep::validate::AdmissionLimits;
use shotprep::{config, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "shotprep")]
#[command(about = "Validate and shrink product photos before upload")]
#[command(long_about = "\
Validate and shrink product photos before upload

Accepted types: JPG, PNG, GIF, WebP. Originals above the admission limit are
refused before decoding. Everything else is brought within the encode budget:

  1. Longer side scaled down to budget.max_dimension (aspect ratio kept)
  2. PNG stays PNG, everything else becomes JPEG
  3. JPEG is encoded at quality 85, then 60 if still over budget.max_bytes
  4. Images already within budget pass through unchanged

Set RUST_LOG=shotprep=debug to trace each encode attempt.

Run 'shotprep gen-config' to generate a documented shotprep.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that read an input image.
#[derive(clap::Args, Clone)]
struct InputArgs {
    /// Image file to read
    file: PathBuf,

    /// Declared media type, overriding the one inferred from the extension
    #[arg(long)]
    media_type: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Emit {
    /// Write the prepared image to a file
    File,
    /// Print the prepared image as base64 to stdout
    Base64,
    /// Print an analysis request body as JSON to stdout
    AnalyzeJson,
}

#[derive(Subcommand)]
enum Command {
    /// Run the admission check without decoding
    Check(InputArgs),
    /// Validate and re-encode an image within budget
    Prep {
        #[command(flatten)]
        input: InputArgs,

        /// Output path (default: <stem>.prepared.<ext> next to the input)
        #[arg(long)]
        out: Option<PathBuf>,

        /// What to do with the prepared image
        #[arg(long, value_enum, default_value = "file")]
        emit: Emit,
    },
    /// Print a stock shotprep.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Check(input) => {
            let prep_config = config::load_config(&cli.config)?;
            let pipeline = Pipeline::new(&prep_config);
            let candidate = read_candidate(&input, &prep_config.admission)?;
            let verdict = pipeline.check(&candidate);
            output::print_verdict(&candidate, &verdict);
            if !verdict.is_accepted() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Prep { input, out, emit } => {
            let prep_config = config::load_config(&cli.config)?;
            let pipeline = Pipeline::new(&prep_config);
            let candidate = read_candidate(&input, &prep_config.admission)?;
            let prepared = match pipeline.prepare(&candidate) {
                Ok(prepared) => prepared,
                Err(e) => {
                    output::print_failure(&candidate, &e);
                    return Ok(ExitCode::FAILURE);
                }
            };
            match emit {
                Emit::File => {
                    let out = out.unwrap_or_else(|| default_output_path(&input.file, &prepared));
                    std::fs::write(&out, &prepared.bytes)?;
                    output::print_prepared(&candidate, &prepared);
                    println!("==> Wrote {}", out.display());
                }
                Emit::Base64 => {
                    println!("{}", transport::to_base64(&prepared));
                }
                Emit::AnalyzeJson => {
                    let body = AnalyzeRequest::new(&prepared);
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr, `warn` and up unless `RUST_LOG` says otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Files above the admission ceiling are not read; validation rejects them
/// on their on-disk size.
fn read_candidate(
    input: &InputArgs,
    limits: &AdmissionLimits,
) -> Result<CandidateFile, Box<dyn std::error::Error>> {
    let candidate = CandidateFile::from_path_within(&input.file, limits)?;
    Ok(match &input.media_type {
        Some(media_type) => candidate.with_media_type(media_type.as_str()),
        None => candidate,
    })
}

/// `<dir>/<stem>.prepared.<ext>`, extension from the prepared media type.
fn default_output_path(input: &Path, prepared: &PreparedFile) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    input.with_file_name(format!(
        "{stem}.prepared.{}",
        prepared.media_type.extension()
    ))
}
