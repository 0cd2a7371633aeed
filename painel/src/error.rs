use thiserror::Error;

/// A textual date in neither `YYYY-MM-DD` nor `DD/MM/YYYY` form, or a date
/// arithmetic result outside the representable calendar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date: {input:?}")]
pub struct InvalidDateError {
    pub input: String,
}

impl InvalidDateError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),
    #[error("unknown activity field: {0}")]
    UnknownField(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl Error {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
