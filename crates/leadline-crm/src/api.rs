use crate::Result;
use async_trait::async_trait;
use leadline_core::{
    ContactDraft, ContactId, LabelDraft, LabelName, LabelRecord, LeadDraft, LeadRecord,
};

/// The CRM calls a lead submission needs.
#[async_trait]
pub trait CrmApi: Send + Sync {
    fn crm_name(&self) -> &'static str;
    async fn create_contact(&self, draft: &ContactDraft) -> Result<ContactId>;
    async fn update_contact_notes(&self, id: ContactId, notes: &str) -> Result<()>;
    async fn search_labels(&self, name: &LabelName) -> Result<Vec<LabelRecord>>;
    async fn create_label(&self, draft: &LabelDraft) -> Result<LabelRecord>;
    async fn create_lead(&self, draft: &LeadDraft) -> Result<LeadRecord>;
}
