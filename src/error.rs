use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("insufficient data: {what} requires at least {required}, got {found}")]
    DataInsufficient {
        what: &'static str,
        required: usize,
        found: usize,
    },

    #[error("invalid configuration for '{field}': {reason}")]
    Configuration { field: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read workbook {path}: {reason}")]
    Workbook { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("row {row}, column '{field}': {reason}")]
    InvalidRecord {
        row: usize,
        field: String,
        reason: String,
    },
}

impl SimError {
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True when the caller can fix the failure by correcting its inputs.
    pub fn is_input_error(&self) -> bool {
        match self {
            SimError::DataInsufficient { .. } => true,
            SimError::Configuration { .. } => true,
            SimError::MissingColumns { .. } => true,
            SimError::InvalidRecord { .. } => true,
            SimError::Parse { .. } => true,
            SimError::Io(_) => false,
            SimError::Csv(_) => false,
            SimError::Workbook { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_names_field() {
        let err = SimError::configuration("trial_count", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration for 'trial_count': must be positive"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn missing_columns_lists_all_names() {
        let err = SimError::MissingColumns {
            columns: vec!["goles".to_string(), "tiros".to_string()],
        };
        assert_eq!(err.to_string(), "missing required columns: goles, tiros");
    }

    #[test]
    fn io_errors_are_not_input_errors() {
        let err = SimError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(!err.is_input_error());
    }
}
