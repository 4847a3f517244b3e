//! Error types.
//!
//! Two layers:
//!
//! - [`DataError`] is the core taxonomy: everything the pipeline itself can
//!   reject an input for. Each variant carries enough context to render a
//!   targeted, human-readable reason (no opaque faults).
//! - [`AppError`] is the shell-facing error: a message plus a process exit
//!   code, which is all the binary front-end needs.
//!
//! All `DataError`s are terminal for the current run: they stem from static
//! properties of the input, so nothing is retried.

/// Failure kinds surfaced by the core pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// One or more required columns are absent. Lists every missing column,
    /// in canonical column order.
    Schema { missing: Vec<&'static str> },
    /// The `date` column contains at least one unparseable value. The whole
    /// dataset is rejected; there is no row-level recovery.
    DateFormat { line: usize, value: String },
    /// A required numeric column contains a non-numeric cell. Only the first
    /// offending column (in canonical scan order) is reported.
    NonNumeric { column: &'static str },
    /// Filtering produced zero rows; downstream stages must not run.
    EmptyResult,
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Schema { missing } => {
                write!(f, "Missing required columns: {}", missing.join(", "))
            }
            DataError::DateFormat { line, value } => {
                write!(
                    f,
                    "Invalid date '{value}' on line {line}. \
                     Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
                )
            }
            DataError::NonNumeric { column } => {
                write!(f, "Column `{column}` must be numeric.")
            }
            DataError::EmptyResult => {
                write!(f, "No rows match the selected filters.")
            }
        }
    }
}

impl std::error::Error for DataError {}

/// Application-level error carrying a process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        // Exit code 2: the input itself is bad. Exit code 3: the input is
        // fine but the filter selection left nothing to report on.
        let code = match err {
            DataError::EmptyResult => 3,
            _ => 2,
        };
        AppError::new(code, err.to_string())
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
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
