//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 20-29   | session          | Login and session restore                |
//! | 30-39   | api              | Failures reported by the API gateway     |
//! | 40-49   | files            | Local file checks and writes             |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use filehost_api_client::{ClientError, UNKNOWN_ERROR_TYPE};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Session (20-29)
// =============================================================================

/// No stored credential; the command needs one.
pub const EXIT_NOT_AUTH: u8 = 20;

/// The stored credential was rejected and has been cleared.
pub const EXIT_SESSION_EXPIRED: u8 = 21;

/// Login rejected by the server.
pub const EXIT_LOGIN_FAILED: u8 = 22;

// =============================================================================
// API (30-39)
// =============================================================================

/// Server rejected the request with an error envelope.
pub const EXIT_API_ERROR: u8 = 30;

/// Failure without an error envelope (unreachable server, bare error status).
pub const EXIT_API_UNKNOWN: u8 = 31;

/// Success response that could not be understood.
pub const EXIT_API_UNEXPECTED: u8 = 32;

// =============================================================================
// Files (40-49)
// =============================================================================

/// Upload rejected by client-side validation (size or type).
pub const EXIT_FILE_INVALID: u8 = 40;

/// Download failed (request or local write).
pub const EXIT_DOWNLOAD_FAILED: u8 = 41;

/// Local file could not be read.
pub const EXIT_FILE_IO: u8 = 42;

/// Map a gateway error to its exit code.
pub fn api_exit_code(err: &ClientError) -> u8 {
    match err {
        ClientError::Api(e) if e.is(UNKNOWN_ERROR_TYPE) => EXIT_API_UNKNOWN,
        ClientError::Api(_) => EXIT_API_ERROR,
        ClientError::Unexpected(_) => EXIT_API_UNEXPECTED,
    }
}
