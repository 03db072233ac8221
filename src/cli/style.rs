//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Check mark used in success lines
pub const CHECK: &str = "✓";

/// Semantic styles for CLI output; colors are dropped when stdout is not a terminal
pub trait Stylize: Display + Sized {
    /// Secondary, low-contrast text
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |v| v.dimmed())
            .to_string()
    }

    /// Headings and labels
    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |v| v.bold())
            .to_string()
    }

    /// Values the user should notice (branches, PR numbers)
    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |v| v.cyan())
            .to_string()
    }

    /// Completed actions
    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |v| v.green())
            .to_string()
    }

    /// Things that need attention
    fn warning(&self) -> String {
        self.if_supports_color(Stream::Stdout, |v| v.yellow())
            .to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Spinner style for network operations
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
