use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid number for '{param}': {value}")]
    InvalidNumber { param: &'static str, value: String },

    #[error("Invalid date for '{param}': {value}")]
    InvalidDate { param: &'static str, value: String },

    #[error("Invalid range for '{param}': expected two comma-separated values, got '{value}'")]
    InvalidRange { param: &'static str, value: String },

    #[error("Invalid value for '{param}': {value}")]
    InvalidEnum { param: &'static str, value: String },
}

impl FilterError {
    /// Query parameter that failed to parse
    pub fn param(&self) -> &'static str {
        match self {
            FilterError::InvalidNumber { param, .. }
            | FilterError::InvalidDate { param, .. }
            | FilterError::InvalidRange { param, .. }
            | FilterError::InvalidEnum { param, .. } => param,
        }
    }
}
