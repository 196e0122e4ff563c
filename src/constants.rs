//! Constants used throughout askchain

/// Chain file extensions recognised by the loader
pub const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];
pub const JSON_EXTENSION: &str = "json";

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Text printed between the prompt and the cursor unless a question overrides it
pub const DEFAULT_SUFFIX: &str = " ";

/// Validation messages
pub mod validation {
    pub const INVALID_INPUT: &str = "Invalid input";
    pub const UNLIMITED_TRIES: &str = "unlimited";
}

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    /// 128 + SIGINT, as shells report an interrupted process
    pub const INTERRUPTED: i32 = 130;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
