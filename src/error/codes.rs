/// Error code registry for EcoTrack
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Input and loading errors
/// - 3000-3999: Analysis errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1002;
    pub const CONFIG_INVALID_VALUE: u16 = 1003;

    // Input errors (2000-2999)
    pub const INPUT_NOT_FOUND: u16 = 2001;
    pub const INPUT_IO_ERROR: u16 = 2002;
    pub const INPUT_MALFORMED: u16 = 2003;

    // Analysis errors (3000-3999)
    pub const ANALYSIS_INVALID_MODE: u16 = 3001;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_GENERIC => "General configuration error",
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file not found",
        ErrorCode::CONFIG_PARSE_ERROR => "Configuration file could not be parsed",
        ErrorCode::CONFIG_INVALID_VALUE => "Invalid configuration value",

        ErrorCode::INPUT_NOT_FOUND => "Input data file not found",
        ErrorCode::INPUT_IO_ERROR => "Input data file could not be read",
        ErrorCode::INPUT_MALFORMED => "Input data file is malformed",

        ErrorCode::ANALYSIS_INVALID_MODE => "Invalid expensive transport mode",

        _ => "Unknown error code",
    }
}
