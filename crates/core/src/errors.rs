use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Booking conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// Errors caused by the caller's input rather than by the service itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BookingError::Validation(_) | BookingError::Conflict(_) | BookingError::NotFound(_)
        )
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
