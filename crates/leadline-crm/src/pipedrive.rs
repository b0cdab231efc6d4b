use crate::api::CrmApi;
use crate::{CrmError, Result};
use async_trait::async_trait;
use leadline_core::{
    ContactDraft, ContactId, LabelColor, LabelDraft, LabelId, LabelName, LabelRecord, LeadDraft,
    LeadRecord,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

const PERSONS: &str = "persons";
const LEAD_LABELS: &str = "leadLabels";
const LEADS: &str = "leads";
const PHONE_LABEL: &str = "work";

#[derive(Debug, Clone)]
pub struct PipedriveClient {
    http: Client,
    base_url: Url,
    api_token: String,
}

impl PipedriveClient {
    /// `timeout` of `None` leaves request lifetimes to the transport.
    pub fn new(
        base_url: &str,
        api_token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CrmError::BaseUrl(base_url.to_string()));
        }
        let mut builder =
            Client::builder().user_agent(concat!("leadline/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
            api_token: api_token.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CrmError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%method, path = url.path(), "pipedrive request");
        Ok(self
            .http
            .request(method, url)
            .query(&[("api_token", self.api_token.as_str())]))
    }
}

#[derive(Debug, Serialize)]
struct PersonBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    phone: Vec<PhoneEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct PhoneEntry<'a> {
    value: &'a str,
    primary: bool,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct PersonNotesBody<'a> {
    notes: &'a str,
}

#[derive(Debug, Serialize)]
struct LabelBody<'a> {
    name: &'a str,
    color: LabelColor,
}

#[derive(Debug, Serialize)]
struct LeadBody<'a> {
    title: &'a str,
    person_id: ContactId,
    #[serde(skip_serializing_if = "<[LabelId]>::is_empty")]
    label_ids: &'a [LabelId],
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: Option<bool>,
    data: Option<T>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedPerson {
    #[serde(default)]
    id: Option<u64>,
}

#[async_trait]
impl CrmApi for PipedriveClient {
    fn crm_name(&self) -> &'static str {
        "pipedrive"
    }

    async fn create_contact(&self, draft: &ContactDraft) -> Result<ContactId> {
        let body = PersonBody {
            name: &draft.name,
            phone: draft
                .phone
                .iter()
                .map(|phone| PhoneEntry {
                    value: phone.as_str(),
                    primary: true,
                    label: PHONE_LABEL,
                })
                .collect(),
        };
        let response = self
            .request(Method::POST, &[PERSONS])?
            .json(&body)
            .send()
            .await?;
        let person: Option<CreatedPerson> = read_data(response).await?;
        person
            .and_then(|person| person.id)
            .and_then(|id| ContactId::new(id).ok())
            .ok_or(CrmError::MissingId("contact"))
    }

    async fn update_contact_notes(&self, id: ContactId, notes: &str) -> Result<()> {
        let segment = id.to_string();
        let response = self
            .request(Method::PUT, &[PERSONS, segment.as_str()])?
            .json(&PersonNotesBody { notes })
            .send()
            .await?;
        read_data::<Value>(response).await?;
        Ok(())
    }

    async fn search_labels(&self, name: &LabelName) -> Result<Vec<LabelRecord>> {
        let response = self
            .request(Method::GET, &[LEAD_LABELS])?
            .query(&[("term", name.as_str())])
            .send()
            .await?;
        let labels: Option<Vec<LabelRecord>> = read_data(response).await?;
        Ok(labels.unwrap_or_default())
    }

    async fn create_label(&self, draft: &LabelDraft) -> Result<LabelRecord> {
        let response = self
            .request(Method::POST, &[LEAD_LABELS])?
            .json(&LabelBody {
                name: draft.name.as_str(),
                color: draft.color,
            })
            .send()
            .await?;
        let label: Option<LabelRecord> = read_data(response).await?;
        label.ok_or(CrmError::MissingId("label"))
    }

    async fn create_lead(&self, draft: &LeadDraft) -> Result<LeadRecord> {
        let response = self
            .request(Method::POST, &[LEADS])?
            .json(&LeadBody {
                title: &draft.title,
                person_id: draft.contact_id,
                label_ids: &draft.label_ids,
            })
            .send()
            .await?;
        let lead: Option<LeadRecord> = read_data(response).await?;
        lead.ok_or(CrmError::MissingId("lead"))
    }
}

/// Unwraps `{success, data, error}`, turning HTTP or envelope failures into
/// [`CrmError::Status`].
async fn read_data<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|body| error_message(&body));
        debug!(status = status.as_u16(), ?message, "pipedrive rejected request");
        return Err(CrmError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> =
        serde_json::from_slice(&bytes).map_err(|err| CrmError::Decode(err.to_string()))?;
    if envelope.success == Some(false) {
        return Err(CrmError::Status {
            status: status.as_u16(),
            message: envelope.error.as_ref().and_then(error_text),
        });
    }
    Ok(envelope.data)
}

/// Pipedrive reports errors as either `"error": "text"` or
/// `"error": {"message": "text"}`.
fn error_message(body: &Value) -> Option<String> {
    body.get("error").and_then(error_text)
}

fn error_text(error: &Value) -> Option<String> {
    match error {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
            _ => Some(error.to_string()),
        },
        _ => None,
    }
}
