/// Tagged console logging for tokenscope
///
/// Provides a small, ergonomic logging API:
/// - Standard levels (Error/Warning/Info/Debug)
/// - Per-module debug control via --debug-<module> flags
/// - Colored console output with timestamps
///
/// Debug lines are only shown when the matching --debug-<module> flag is
/// present on the command line; everything else is always shown.
use crate::arguments::{
    is_debug_analysis_enabled, is_debug_cleaning_enabled, is_debug_fetch_enabled,
};
use chrono::Utc;
use colored::*;
use std::io::{self, Write};

/// Source tag attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Config,
    Fetch,
    Cleaning,
    Analysis,
    Report,
    Chart,
    Export,
}

impl LogTag {
    fn label(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Fetch => "FETCH",
            LogTag::Cleaning => "CLEANING",
            LogTag::Analysis => "ANALYSIS",
            LogTag::Report => "REPORT",
            LogTag::Chart => "CHART",
            LogTag::Export => "EXPORT",
        }
    }

    /// Whether --debug-<module> was passed for this tag
    fn debug_enabled(&self) -> bool {
        match self {
            LogTag::Fetch => is_debug_fetch_enabled(),
            LogTag::Cleaning => is_debug_cleaning_enabled(),
            LogTag::Analysis => is_debug_analysis_enabled(),
            _ => false,
        }
    }
}

fn timestamp() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

fn write_line(icon: ColoredString, tag: LogTag, message: &str) {
    println!(
        "{} {} {} {}",
        icon,
        tag.label().bold(),
        format!("[{}]", timestamp()).dimmed(),
        message
    );
    io::stdout().flush().ok();
}

/// ERROR level - always shown, critical issues
pub fn error(tag: LogTag, message: &str) {
    write_line("❌".red().bold(), tag, &message.red().to_string());
}

/// WARNING level - important but non-fatal issues
pub fn warning(tag: LogTag, message: &str) {
    write_line("⚠".yellow().bold(), tag, &message.yellow().to_string());
}

/// INFO level - standard operational events
pub fn info(tag: LogTag, message: &str) {
    write_line("ℹ".blue().bold(), tag, message);
}

/// SUCCESS level - completed operations
pub fn success(tag: LogTag, message: &str) {
    write_line("✅".green().bold(), tag, &message.green().to_string());
}

/// DEBUG level - only shown with the matching --debug-<module> flag
pub fn debug(tag: LogTag, message: &str) {
    if tag.debug_enabled() {
        write_line("🐛".purple().bold(), tag, &message.dimmed().to_string());
    }
}
