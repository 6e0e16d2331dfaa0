//! Terminal status lines for libforge
//!
//! Status goes to stdout, problems to stderr. The spinner covers archive
//! extraction, which can take a while on large source tarballs.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Start of a CLI step, e.g. `==> Unpacking sqlcipher-3.4.1.tar.gz`.
pub fn action(message: &str) {
    println!("{} {}", "==>".blue().bold(), message.bold());
}

/// Indented side effect of a library call, e.g. `applied patch android-config`.
pub fn detail(message: &str) {
    println!("     {}", message.dimmed());
}

pub fn success(message: &str) {
    println!("{} {}", "==>".green().bold(), message.green());
}

pub fn info(message: &str) {
    println!("{} {}", "::".cyan(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}

/// Spinner shown while `message` is in progress. Call `finish_and_clear` when done.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("     {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
