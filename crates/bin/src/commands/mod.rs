//! Command implementations.

pub mod auth;
pub mod profile;
pub mod stats;
pub mod upload;

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

/// Commands bubble any engine or I/O error up to main.
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Prompt on stdout and read one line from stdin (`None` on EOF).
pub(crate) async fn prompt(label: &str) -> std::io::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    lines.next_line().await
}
