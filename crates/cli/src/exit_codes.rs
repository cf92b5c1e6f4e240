//! CLI Exit Code Registry
//!
//! Single source of truth for `mushaf` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | General error (unspecified)                           |
//! | 2    | Usage error (bad args, unknown source name, bad key)  |
//! | 3    | I/O error (cannot read input, cannot write artifact)  |
//! | 4    | Parse error (invalid JSON, unsupported dataset shape) |
//! | 5    | Config error (job file unreadable or invalid)         |
//! | 6    | Findings under `--strict`                             |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

use mushaf_io::IoError;
use mushaf_recon::ReconError;

/// Success - command completed and, under `--strict`, found nothing.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown source name, malformed verse key on
/// the command line.
pub const EXIT_USAGE: u8 = 2;

/// Input could not be read or an artifact could not be written.
pub const EXIT_IO: u8 = 3;

/// Input was read but is not valid JSON, has an unsupported shape, or
/// carries malformed keys.
pub const EXIT_PARSE: u8 = 4;

/// Job file or one of its tables is invalid.
pub const EXIT_CONFIG: u8 = 5;

/// Command succeeded but reported findings (missing verses, orphans, HTML
/// leftovers, orphan references) and `--strict` was given.
pub const EXIT_FINDINGS: u8 = 6;

/// Map a loader error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Read { .. } | IoError::Write { .. } => EXIT_IO,
        IoError::Json { .. } | IoError::Shape(_) => EXIT_PARSE,
        IoError::Recon(e) => recon_exit_code(e),
    }
}

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::MalformedKey(_) | ReconError::ShapeMismatch { .. } => EXIT_PARSE,
        ReconError::InvalidSurah(_) | ReconError::InvalidAyah { .. } => EXIT_USAGE,
    }
}
