//! Run-level error type.
//!
//! Every failure in this tool is fatal to the run (it is a batch report
//! generator, not a service), so errors carry the process exit code they
//! should terminate with alongside a human-readable message.

/// Broad failure categories, for callers and tests that want to branch on
/// *what* failed rather than parse the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input file missing or unreadable, or the download failed.
    DataUnavailable,
    /// A required column is absent, or the (location, date) uniqueness
    /// invariant is violated in the raw data.
    SchemaMismatch,
    /// An output file could not be created or written.
    Export,
    /// No usable rows remain after filtering.
    Empty,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::DataUnavailable | ErrorKind::SchemaMismatch | ErrorKind::Export => 2,
            ErrorKind::Empty => 3,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataUnavailable, message)
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaMismatch, message)
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Export, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
