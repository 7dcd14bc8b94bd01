use thiserror::Error;

pub type TnxResult<T> = Result<T, TnxError>;

#[derive(Debug, Error)]
pub enum TnxError {
    #[error("No plate parameters loaded")]
    NotLoaded,

    #[error("Missing required keyword: {keyword}")]
    MissingKeyword { keyword: String },

    #[error("Invalid keyword '{keyword}': {message}")]
    InvalidKeyword { keyword: String, message: String },

    #[error("Malformed plate-solution record: {message}")]
    MalformedRecord { message: String },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Numeric domain error: {message}")]
    NumericDomain { message: String },

    #[error("Non-invertible CD matrix (determinant = {determinant})")]
    NonInvertibleMatrix { determinant: f64 },

    #[error("Singularity in transformation: {message}")]
    Singularity { message: String },
}

impl TnxError {
    pub fn missing_keyword(keyword: impl Into<String>) -> Self {
        Self::MissingKeyword {
            keyword: keyword.into(),
        }
    }

    pub fn invalid_keyword(keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidKeyword {
            keyword: keyword.into(),
            message: message.into(),
        }
    }

    pub fn malformed_record(message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn numeric_domain(message: impl Into<String>) -> Self {
        Self::NumericDomain {
            message: message.into(),
        }
    }

    pub fn non_invertible_matrix(determinant: f64) -> Self {
        Self::NonInvertibleMatrix { determinant }
    }

    pub fn singularity(message: impl Into<String>) -> Self {
        Self::Singularity {
            message: message.into(),
        }
    }
}
