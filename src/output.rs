//! CLI output formatting.
//!
//! Every report follows the same two-level shape: a header line naming the
//! file with its declared type and size, then indented context lines with
//! the outcome.
//!
//! ```text
//! wide.jpg (image/jpeg, 12.0 MiB)
//!     Re-encoded: JPG 2048x1024 at quality 85 (1 attempt)
//!     Size: 12.0 MiB → 3.1 MiB
//!
//! small.png (image/png, 2.0 KiB)
//!     Passthrough: 100x100 already within budget
//!     Size: 2.0 KiB
//!
//! notes.png (text/plain, 12 B)
//!     Rejected: Unsupported file format "text/plain" (supported: JPG, PNG, GIF, WebP)
//! ```
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::pipeline::PrepError;
use crate::upload::{CandidateFile, Encoding, PreparedFile};
use crate::validate::Verdict;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Human-readable byte count: `512 B`, `2.0 KiB`, `10.0 MiB`.
pub fn human_size(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.1} MiB", b / MIB)
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn candidate_header(candidate: &CandidateFile) -> String {
    let declared = if candidate.media_type().is_empty() {
        "unknown type"
    } else {
        candidate.media_type()
    };
    format!(
        "{} ({}, {})",
        candidate.name(),
        declared,
        human_size(candidate.byte_size())
    )
}

/// Format the result of an admission check.
pub fn format_verdict(candidate: &CandidateFile, verdict: &Verdict) -> Vec<String> {
    let status = match verdict {
        Verdict::Accepted => "Accepted".to_string(),
        Verdict::Rejected(reason) => format!("Rejected: {reason}"),
    };
    vec![candidate_header(candidate), format!("{}{}", indent(1), status)]
}

/// Format a successful preparation.
pub fn format_prepared(candidate: &CandidateFile, prepared: &PreparedFile) -> Vec<String> {
    let mut lines = vec![candidate_header(candidate)];
    match prepared.encoding {
        Encoding::Passthrough => {
            lines.push(format!(
                "{}Passthrough: {} already within budget",
                indent(1),
                prepared.dimensions
            ));
            lines.push(format!(
                "{}Size: {}",
                indent(1),
                human_size(prepared.byte_size())
            ));
        }
        Encoding::Reencoded { quality, attempts } => {
            let plural = if attempts == 1 { "attempt" } else { "attempts" };
            lines.push(format!(
                "{}Re-encoded: {} {} at quality {} ({} {})",
                indent(1),
                prepared.media_type.label(),
                prepared.dimensions,
                quality.value(),
                attempts,
                plural
            ));
            lines.push(format!(
                "{}Size: {} → {}",
                indent(1),
                human_size(candidate.byte_size()),
                human_size(prepared.byte_size())
            ));
        }
    }
    lines
}

/// Format a failed preparation.
pub fn format_failure(candidate: &CandidateFile, error: &PrepError) -> Vec<String> {
    let label = match error {
        PrepError::Rejected(_) => "Rejected",
        PrepError::Reencode(_) => "Failed",
    };
    vec![
        candidate_header(candidate),
        format!("{}{}: {}", indent(1), label, error),
    ]
}

pub fn print_verdict(candidate: &CandidateFile, verdict: &Verdict) {
    for line in format_verdict(candidate, verdict) {
        println!("{}", line);
    }
}

pub fn print_prepared(candidate: &CandidateFile, prepared: &PreparedFile) {
    for line in format_prepared(candidate, prepared) {
        println!("{}", line);
    }
}

pub fn print_failure(candidate: &CandidateFile, error: &PrepError) {
    for line in format_failure(candidate, error) {
        eprintln!("{}", line);
    }
}
