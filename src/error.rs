//! Lookup error taxonomy and process exit codes.
//!
//! [`LookupError`] is the closed set of failures a lookup can observe from
//! the transport fetcher or a provider's parser. Raw transport errors never
//! cross the fetcher boundary; they are classified into one of these kinds.

use thiserror::Error;

/// Failure kinds observed by the lookup orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No route to the provider host (DNS failure, unreachable network).
    #[error("No network connection: the dictionary host could not be reached")]
    NoNetwork,

    /// The request exceeded the caller's timeout at connect or read stage.
    #[error("Query timed out, try a longer --query-timeout")]
    Timeout,

    /// The provider answered but does not know the word.
    #[error("\"{word}\" not found")]
    NotFound {
        /// The normalized word that was looked up.
        word: String,
    },

    /// The provider answered with a non-200 HTTP status.
    #[error("Query for \"{word}\" failed with HTTP status {status}")]
    Query {
        /// The normalized word that was looked up.
        word: String,
        /// HTTP status code returned by the provider.
        status: u16,
    },

    /// Any failure not otherwise classified.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// How loudly a [`LookupError`] is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Connectivity problems (red).
    High,
    /// The word is simply unknown to the provider (yellow).
    Advisory,
    /// Everything else; printed without emphasis but never swallowed.
    Unclassified,
}

impl LookupError {
    /// Severity used when reporting this error.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoNetwork | Self::Timeout => Severity::High,
            Self::NotFound { .. } => Severity::Advisory,
            Self::Query { .. } | Self::Unexpected(_) => Severity::Unclassified,
        }
    }
}

/// Exit codes for the RustDict application.
///
/// Failed lookups are informational: a batch that ran to completion exits
/// with [`ExitCode::Success`] even if some words were not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// All requested lookups ran (whatever their individual outcome).
    Success = 0,
    /// Setup failed (configuration, database, no usable dictionary).
    GeneralError = 1,
    /// A batch was interrupted by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "RD000",
            Self::GeneralError => "RD001",
            Self::Interrupted => "RD130",
        }
    }
}
