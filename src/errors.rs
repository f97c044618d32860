use std::io;

use thiserror::Error;

/// Error type for input parsing and artifact export failures.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("'{0}' is not a valid question id")]
    InvalidId(String),
    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("json serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_names_the_offending_input() {
        let err = ReconcileError::InvalidId("115a1".to_string());
        assert_eq!(err.to_string(), "'115a1' is not a valid question id");
    }

    #[test]
    fn io_errors_convert_and_display_transparently() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = ReconcileError::from(io_err);
        assert!(err.to_string().contains("no such file"));
    }
}
