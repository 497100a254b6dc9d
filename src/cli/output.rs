//! CLI output formatting utilities.

use console::{style, StyledObject};
use std::io::{self, BufRead, Write};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        Self::stdout_line(style(">>").cyan(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        Self::stdout_line(style(">>").green(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        Self::stderr_line(style(">>").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        Self::stderr_line(style(">>").red(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    fn stdout_line(tag: StyledObject<&str>, msg: &str) {
        println!("{} {}", tag.bold(), msg);
    }

    fn stderr_line(tag: StyledObject<&str>, msg: &str) {
        eprintln!("{} {}", tag.bold(), msg);
    }
}

/// Hold the window open for interactive users so the outcome stays visible.
///
/// A no-op when stdin is not an interactive terminal, so scripted and
/// headless runs never block.
pub fn pause_on_exit() {
    if !console::user_attended() {
        return;
    }

    print!("\n{} ", style("Press Enter to close...").dim());
    let _ = io::stdout().flush();

    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
