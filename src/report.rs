//! One-line text rendering of verdicts and their process exit codes

use crate::error::Error;
use crate::verdict::Verdict;

/// Exit code when no verdict could be reached
pub const FATAL_EXIT_CODE: u8 = 4;

const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render a verdict as the line shown to whoever scanned the pass
pub fn render(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Valid { name, expiry } => format!(
            "Health pass for {name}, valid until {} GMT",
            expiry.format(EXPIRY_FORMAT)
        ),
        Verdict::InvalidStructure => "Invalid QR code".to_string(),
        Verdict::InvalidSignature => "Invalid signature".to_string(),
        Verdict::Expired => "Expired pass".to_string(),
    }
}

/// Render an error that prevented a verdict
pub fn render_error(error: &Error) -> String {
    match error {
        Error::SourceUnavailable { .. } => "Unable to load verification keys".to_string(),
        other => format!("Error: {other}"),
    }
}

/// Process exit code for a verdict
pub fn exit_code(verdict: &Verdict) -> u8 {
    match verdict {
        Verdict::Valid { .. } => 0,
        Verdict::InvalidStructure => 1,
        Verdict::InvalidSignature => 2,
        Verdict::Expired => 3,
    }
}
