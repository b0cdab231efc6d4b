use crate::domain::LeadRecord;
use serde::{Deserialize, Serialize};

pub const LEAD_ADDED_MESSAGE: &str = "Lead successfully added to Pipedrive CRM";

/// The only value handed back to whoever submitted the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LeadRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowResult {
    pub fn added(lead: LeadRecord) -> Self {
        Self {
            success: true,
            data: Some(lead),
            message: Some(LEAD_ADDED_MESSAGE.to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}
