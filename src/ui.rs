//! Terminal output: logging setup and styled status lines.
//!
//! Everything here writes to stderr; stdout is reserved for reported outputs.

use console::style;
use std::env;
use tracing_subscriber::EnvFilter;

/// Initialize tracing with a `RUST_LOG` filter, defaulting to `info`
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second initialization (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn in_github_actions() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Format the single failure line reported for a failed run
pub fn failure_line(message: &str, github_actions: bool) -> String {
    if github_actions {
        // Workflow commands need newlines escaped
        format!(
            "::error::{}",
            message
                .replace('%', "%25")
                .replace('\r', "%0D")
                .replace('\n', "%0A")
        )
    } else {
        format!("{} {}", style("ERROR:").red().bold(), message)
    }
}

pub fn display_error(message: &str) {
    eprintln!("{}", failure_line(message, in_github_actions()));
}

pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format a progress line shown before a workflow touches the backend
pub fn status_line(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

pub fn display_status(message: &str) {
    eprintln!("{}", status_line(message));
}
