use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("name is required")]
    EmptyFullName,
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("invalid country calling code: {0}")]
    InvalidCountryCode(String),
    #[error("invalid contact id: {0}")]
    InvalidContactId(u64),
    #[error("invalid label name")]
    InvalidLabelName,
}
