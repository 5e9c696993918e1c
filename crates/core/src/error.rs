#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Exit time must be after entry time")]
    InvalidInterval,

    #[error("No {0} spot available for the requested period")]
    NoSpotAvailable(String),

    #[error("Gate pass is malformed: {0}")]
    TokenMalformed(String),

    #[error("Gate pass checksum mismatch")]
    ChecksumMismatch,

    #[error("Gate pass already used for entry and exit")]
    TokenExhausted,

    #[error("Vehicle already entered; scan at the exit gate")]
    AlreadyEntered,

    #[error("Vehicle already exited")]
    AlreadyExited,

    #[error("Vehicle has not entered yet; scan at the entry gate first")]
    NotYetEntered,

    #[error("Reservation has been cancelled")]
    ReservationCancelled,

    #[error("Reservation is in a terminal state: {0}")]
    TerminalStateViolation(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
