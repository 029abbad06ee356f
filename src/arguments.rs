/// Centralized argument handling for tokenscope
///
/// Consolidates all command-line argument parsing and debug flag checking
/// so individual modules never touch `std::env` directly.
///
/// Features:
/// - Centralized CMD_ARGS storage with thread-safe access
/// - Debug flag checking functions per module
/// - Output-toggle flags for the artifact writers
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
/// Thread-safe singleton that stores arguments for access throughout the application
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
/// Returns a vector clone to avoid holding the mutex lock
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => {
            // Fallback to env::args if mutex is poisoned
            env::args().collect()
        }
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// These functions check for specific debug flags in the command-line arguments
// =============================================================================

/// Fetcher debug mode (per-page envelope and record diagnostics)
pub fn is_debug_fetch_enabled() -> bool {
    has_arg("--debug-fetch")
}

/// Cleaning debug mode (per-stage drop counts)
pub fn is_debug_cleaning_enabled() -> bool {
    has_arg("--debug-cleaning")
}

/// Analysis debug mode (raw metric values before normalization)
pub fn is_debug_analysis_enabled() -> bool {
    has_arg("--debug-analysis")
}

// =============================================================================
// RUN MODE FLAGS
// =============================================================================

/// Help requested
pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Skip writing the radar chart HTML artifact
pub fn is_chart_disabled() -> bool {
    has_arg("--no-chart")
}

/// Skip writing the Excel workbook artifact
pub fn is_excel_disabled() -> bool {
    has_arg("--no-excel")
}

/// Path of the configuration file (--config <path>, default config.json)
pub fn get_config_path() -> String {
    get_arg_value("--config").unwrap_or_else(|| "config.json".to_string())
}

/// Print usage information
pub fn print_help() {
    println!("tokenscope - ERC20 wallet activity analyzer");
    println!();
    println!("USAGE:");
    println!("    tokenscope [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>     Configuration file (default: config.json)");
    println!("    --no-chart          Skip the radar chart HTML artifact");
    println!("    --no-excel          Skip the Excel workbook artifact");
    println!("    --debug-fetch       Per-page fetch diagnostics");
    println!("    --debug-cleaning    Per-stage cleaning diagnostics");
    println!("    --debug-analysis    Raw metric values before normalization");
    println!("    -h, --help          Print this help");
}
