use thiserror::Error;

/// Failures that are not scheduling outcomes: malformed input and
/// registry I/O. Contention for a slot is reported through
/// [`crate::schedule::Rejection`] instead.
#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Invalid slot: {0}")]
    InvalidSlot(String),

    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    #[error("Invalid class: {0}")]
    InvalidClass(String),

    #[error("Teacher not found: {0}")]
    UnknownTeacher(u64),

    #[error("No teacher ids left to issue")]
    IdSpaceExhausted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
