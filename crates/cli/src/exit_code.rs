//! Exit code definitions for the s3keep CLI
//!
//! Stable codes so scripts and schedulers can distinguish configuration
//! mistakes from network trouble without parsing stderr.

use sk_core::Error;

/// Exit codes for the s3keep CLI application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error (traversal, archive, local IO)
    GeneralError = 1,

    /// User input error: invalid arguments or missing required setting
    UsageError = 2,

    /// Network error: bucket check, listing, or transfer failure
    NetworkError = 3,

    /// Operation was interrupted (e.g. Ctrl+C)
    Interrupted = 130,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a core error to the exit code it should terminate with
    pub const fn from_error(error: &Error) -> Self {
        match error {
            Error::Config(_) => Self::UsageError,
            Error::Connectivity(_) | Error::List { .. } | Error::Transfer { .. } => {
                Self::NetworkError
            }
            Error::Traversal { .. }
            | Error::Archive { .. }
            | Error::UnsupportedEntry(_)
            | Error::Io(_) => Self::GeneralError,
        }
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or configuration",
            Self::NetworkError => "Network error",
            Self::Interrupted => "Operation interrupted",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}
