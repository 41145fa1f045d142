// UI layer: the spinner shown while the prediction request blocks, and the
// messages printed to the terminal at the end of a run.

use crate::config::CREDENTIAL_VAR;
use crate::error::FoldError;
use crate::viewer::Artifact;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Run `f` behind a spinner. The spinner is cleared whatever the outcome.
pub fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    let out = f();
    spinner.finish_and_clear();
    out
}

/// Line printed after a successful run.
pub fn confirmation(artifact: &Artifact) -> String {
    if artifact.opened {
        format!(
            "Successfully generated 3D model. Opened '{}' in your browser.",
            artifact.path.display()
        )
    } else {
        format!(
            "Successfully generated 3D model. Open '{}' in your browser to view.",
            artifact.path.display()
        )
    }
}

/// Human-readable diagnostic for a failed run, one entry per line.
pub fn diagnostic(err: &FoldError) -> Vec<String> {
    match err {
        FoldError::MissingCredential { var } => vec![
            format!("Error: The '{var}' environment variable is not set."),
            "Please set it before running the program.".to_string(),
            format!("Example (Linux/macOS): export {CREDENTIAL_VAR}='your_api_key_here'"),
        ],
        FoldError::Http { status, body } => vec![
            format!("HTTP Error: {status}"),
            format!("Response content: {body}"),
        ],
        FoldError::ResponseShape { reason, keys } => vec![
            format!("Error: {reason} in API response."),
            format!("API Response Keys: [{}]", keys.join(", ")),
        ],
        other => vec![format!("Error: {other}")],
    }
}
