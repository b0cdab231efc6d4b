use leadline_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid base url: {0}")]
    BaseUrl(String),
    #[error("crm returned status {status}{}", status_suffix(.message))]
    Status { status: u16, message: Option<String> },
    #[error("{0} created but no id returned")]
    MissingId(&'static str),
    #[error("unexpected crm response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, CrmError>;

// The request URL carries the api token as a query parameter.
impl From<reqwest::Error> for CrmError {
    fn from(err: reqwest::Error) -> Self {
        CrmError::Http(err.without_url())
    }
}

fn status_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}

/// Why a submission stopped. Only required steps end up here.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(#[from] CoreError),
    #[error("{}", contact_message(.0))]
    Contact(#[source] CrmError),
    #[error("failed to create lead: {}", lead_message(.0))]
    Lead(#[source] CrmError),
}

fn contact_message(err: &CrmError) -> String {
    match err {
        CrmError::Status {
            message: Some(message),
            ..
        } => message.clone(),
        CrmError::Status { message: None, .. } | CrmError::Decode(_) => {
            "failed to create contact in CRM".to_string()
        }
        CrmError::MissingId(_) => "contact created but no id returned".to_string(),
        CrmError::Http(err) => format!("failed to reach CRM: {err}"),
        CrmError::Url(_) | CrmError::BaseUrl(_) => err.to_string(),
    }
}

fn lead_message(err: &CrmError) -> String {
    match err {
        CrmError::Status {
            message: Some(message),
            ..
        } => message.clone(),
        CrmError::Status {
            status,
            message: None,
        } => format!("HTTP error status {status}"),
        CrmError::Http(err) => format!("failed to reach CRM: {err}"),
        other => other.to_string(),
    }
}
