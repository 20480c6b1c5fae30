//! Logging helpers
//!
//! Startup banners, the plain-text run log and preview truncation

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;

use crate::config::Config;

/// Opens the run log, writing a timestamped header when the file is new
///
/// Earlier runs' lines are kept.
///
/// # Arguments
/// - `log_file_path`: run log path
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("failed to create log file {}", log_file_path))?;
    if file.metadata()?.len() > 0 {
        return Ok(());
    }
    write!(
        file,
        "{}\nHomeschool Hub client log - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    )?;
    Ok(())
}

/// Appends one timestamped line to the run log
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("failed to open log file {}", log_file_path))?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        line
    )?;
    Ok(())
}

/// Logs the effective configuration
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Homeschool Hub client starting");
    info!("🌐 Backend: {}", config.api_base());
    info!(
        "⏱  Timeouts: request {}s, connect {}s",
        config.request_timeout_secs, config.connect_timeout_secs
    );
    info!("{}", "=".repeat(60));
}

/// Logs a submission outcome
///
/// # Arguments
/// - `title`: assignment title
/// - `score`: percentage returned by the backend
pub fn log_submission(title: &str, score: f64) {
    info!("{}", "─".repeat(60));
    info!("✅ Submitted \"{}\"", truncate_text(title, 60));
    info!("🏆 Score: {}%", score.round());
    info!("{}", "─".repeat(60));
}

/// Truncates long text for log previews
///
/// # Arguments
/// - `text`: original text
/// - `max_len`: maximum number of characters kept
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
