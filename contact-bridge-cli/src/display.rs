//! Display Helpers
//!
//! Styled terminal output.

use console::style;

/// Prints a success message.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Prints an informational message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").cyan(), msg);
}

/// Prints a warning message.
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Prints an aligned `label: value` line.
pub fn field(label: &str, value: &str) {
    println!("  {:<16} {}", style(format!("{}:", label)).dim(), value);
}
