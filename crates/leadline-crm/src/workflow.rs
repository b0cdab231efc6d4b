use crate::api::CrmApi;
use crate::error::{CrmError, WorkflowError};
use crate::outcome::BestEffort;
use leadline_core::{
    ContactId, CountryCode, LabelColor, LabelDraft, LabelName, LabelPolicy, LabelRecord, LeadDraft,
    LeadFormInput, LeadRecord, WorkflowResult,
};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Default)]
pub struct WorkflowConfig {
    pub country_code: CountryCode,
    pub label_name: LabelName,
    pub label_color: LabelColor,
    pub label_policy: LabelPolicy,
    pub stages: Stages,
}

/// Optional stages run between contact and lead creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub notes: bool,
    pub label: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            notes: true,
            label: true,
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub contact_id: ContactId,
    pub lead: LeadRecord,
    pub notes: BestEffort<()>,
    pub label: BestEffort<LabelRecord>,
}

pub struct LeadWorkflow<C> {
    crm: C,
    config: WorkflowConfig,
}

impl<C: CrmApi> LeadWorkflow<C> {
    pub fn new(crm: C, config: WorkflowConfig) -> Self {
        Self { crm, config }
    }

    pub fn crm(&self) -> &C {
        &self.crm
    }

    /// Runs the submission and folds any failure into the result value.
    pub async fn submit_lead(&self, input: &LeadFormInput) -> WorkflowResult {
        match self.execute(input).await {
            Ok(submission) => {
                info!(
                    crm = self.crm.crm_name(),
                    contact_id = %submission.contact_id,
                    lead_id = %submission.lead.id,
                    notes = submission.notes.status_label(),
                    label = submission.label.status_label(),
                    "lead submitted"
                );
                WorkflowResult::added(submission.lead)
            }
            Err(err) => {
                error!(crm = self.crm.crm_name(), error = %err, "lead submission failed");
                WorkflowResult::failed(err.to_string())
            }
        }
    }

    /// Contact and lead creation are required; notes and label are not.
    pub async fn execute(&self, input: &LeadFormInput) -> Result<Submission, WorkflowError> {
        let draft = input.contact_draft(&self.config.country_code)?;
        debug!(name = %draft.name, phone = ?draft.phone, "creating contact");
        let contact_id = self
            .crm
            .create_contact(&draft)
            .await
            .map_err(WorkflowError::Contact)?;
        info!(%contact_id, "contact created");

        let notes = self.attach_notes(contact_id, input).await;
        let label = self.resolve_label().await;

        let lead_draft = LeadDraft {
            title: input.lead_title(),
            contact_id,
            label_ids: label.applied().map(|label| vec![label.id]).unwrap_or_default(),
        };
        debug!(title = %lead_draft.title, labels = lead_draft.label_ids.len(), "creating lead");
        let lead = self
            .crm
            .create_lead(&lead_draft)
            .await
            .map_err(WorkflowError::Lead)?;
        info!(lead_id = %lead.id, "lead created");

        Ok(Submission {
            contact_id,
            lead,
            notes,
            label,
        })
    }

    async fn attach_notes(&self, contact_id: ContactId, input: &LeadFormInput) -> BestEffort<()> {
        if !self.config.stages.notes {
            return BestEffort::Skipped;
        }
        let Some(notes) = input.notes() else {
            return BestEffort::Skipped;
        };
        let outcome = BestEffort::attempt(
            "notes",
            self.crm.update_contact_notes(contact_id, &notes).await,
        );
        if outcome.applied().is_some() {
            info!(%contact_id, "contact notes attached");
        }
        outcome
    }

    async fn resolve_label(&self) -> BestEffort<LabelRecord> {
        if !self.config.stages.label {
            return BestEffort::Skipped;
        }
        let outcome = BestEffort::attempt("label", self.find_or_create_label().await);
        if let Some(label) = outcome.applied() {
            info!(label_id = %label.id, name = %label.name, "label resolved");
        }
        outcome
    }

    async fn find_or_create_label(&self) -> Result<LabelRecord, CrmError> {
        let found = self.crm.search_labels(&self.config.label_name).await?;
        debug!(count = found.len(), "labels found");
        if let Some(label) = self.config.label_policy.select(&found) {
            return Ok(label.clone());
        }
        self.crm
            .create_label(&LabelDraft {
                name: self.config.label_name.clone(),
                color: self.config.label_color,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::{LeadWorkflow, Stages, WorkflowConfig};
    use crate::api::CrmApi;
    use crate::error::{CrmError, WorkflowError};
    use crate::outcome::BestEffort;
    use crate::Result;
    use async_trait::async_trait;
    use leadline_core::{
        ContactDraft, ContactId, CoreError, LabelDraft, LabelId, LabelName, LabelPolicy,
        LabelRecord, LeadDraft, LeadFormInput, LeadId, LeadRecord, LEAD_ADDED_MESSAGE,
    };
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        CreateContact(ContactDraft),
        UpdateNotes(ContactId, String),
        SearchLabels(String),
        CreateLabel(LabelDraft),
        CreateLead(LeadDraft),
    }

    struct FakeCrm {
        calls: Mutex<Vec<Call>>,
        contact_fails: bool,
        notes_fail: bool,
        search_fails: bool,
        create_label_fails: bool,
        lead_fails: bool,
        labels: Vec<LabelRecord>,
    }

    impl FakeCrm {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                contact_fails: false,
                notes_fail: false,
                search_fails: false,
                create_label_fails: false,
                lead_fails: false,
                labels: Vec::new(),
            }
        }

        fn with_labels(count: usize) -> Self {
            Self {
                labels: (0..count).map(label).collect(),
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("calls").clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().expect("calls").push(call);
        }
    }

    fn label(idx: usize) -> LabelRecord {
        LabelRecord {
            id: LabelId::from_uuid(Uuid::from_u128(idx as u128 + 1)),
            name: format!("Landing Page {idx}"),
            color: None,
        }
    }

    fn server_error() -> CrmError {
        CrmError::Status {
            status: 500,
            message: Some("internal error".to_string()),
        }
    }

    const CREATED_LABEL: u128 = 0xfeed;

    #[async_trait]
    impl CrmApi for FakeCrm {
        fn crm_name(&self) -> &'static str {
            "fake"
        }

        async fn create_contact(&self, draft: &ContactDraft) -> Result<ContactId> {
            self.record(Call::CreateContact(draft.clone()));
            if self.contact_fails {
                return Err(CrmError::Status {
                    status: 400,
                    message: Some("Name must be given".to_string()),
                });
            }
            Ok(ContactId::new(101).expect("id"))
        }

        async fn update_contact_notes(&self, id: ContactId, notes: &str) -> Result<()> {
            self.record(Call::UpdateNotes(id, notes.to_string()));
            if self.notes_fail {
                return Err(server_error());
            }
            Ok(())
        }

        async fn search_labels(&self, name: &LabelName) -> Result<Vec<LabelRecord>> {
            self.record(Call::SearchLabels(name.as_str().to_string()));
            if self.search_fails {
                return Err(server_error());
            }
            Ok(self.labels.clone())
        }

        async fn create_label(&self, draft: &LabelDraft) -> Result<LabelRecord> {
            self.record(Call::CreateLabel(draft.clone()));
            if self.create_label_fails {
                return Err(server_error());
            }
            Ok(LabelRecord {
                id: LabelId::from_uuid(Uuid::from_u128(CREATED_LABEL)),
                name: draft.name.as_str().to_string(),
                color: Some("blue".to_string()),
            })
        }

        async fn create_lead(&self, draft: &LeadDraft) -> Result<LeadRecord> {
            self.record(Call::CreateLead(draft.clone()));
            if self.lead_fails {
                return Err(CrmError::Status {
                    status: 400,
                    message: None,
                });
            }
            Ok(LeadRecord {
                id: LeadId::from_uuid(Uuid::from_u128(7)),
                title: draft.title.clone(),
                person_id: Some(draft.contact_id),
                label_ids: draft.label_ids.clone(),
            })
        }
    }

    fn sara() -> LeadFormInput {
        LeadFormInput {
            full_name: "Sara Youssef".to_string(),
            phone: "01012345678".to_string(),
            car_type: "Sedan".to_string(),
            budget: "500000".to_string(),
        }
    }

    fn workflow(crm: FakeCrm) -> LeadWorkflow<FakeCrm> {
        LeadWorkflow::new(crm, WorkflowConfig::default())
    }

    fn lead_drafts(calls: &[Call]) -> Vec<&LeadDraft> {
        calls
            .iter()
            .filter_map(|call| match call {
                Call::CreateLead(draft) => Some(draft),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn blank_name_fails_without_crm_calls() {
        for name in ["", "   ", "\t\n"] {
            let flow = workflow(FakeCrm::new());
            let input = LeadFormInput {
                full_name: name.to_string(),
                ..sara()
            };
            let result = flow.submit_lead(&input).await;
            assert!(!result.success);
            assert_eq!(result.error.as_deref(), Some("name is required"));
            assert!(flow.crm().calls().is_empty());
        }
    }

    #[tokio::test]
    async fn execute_reports_validation_kind() {
        let flow = workflow(FakeCrm::new());
        let input = LeadFormInput::default();
        let err = flow.execute(&input).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Validation(CoreError::EmptyFullName)
        ));
    }

    #[tokio::test]
    async fn contact_failure_never_creates_lead() {
        let crm = FakeCrm {
            contact_fails: true,
            ..FakeCrm::new()
        };
        let flow = workflow(crm);
        let result = flow.submit_lead(&sara()).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Name must be given"));
        let calls = flow.crm().calls();
        assert_eq!(calls.len(), 1);
        assert!(lead_drafts(&calls).is_empty());
    }

    #[tokio::test]
    async fn best_effort_failures_do_not_block_lead() {
        let crm = FakeCrm {
            notes_fail: true,
            search_fails: true,
            ..FakeCrm::new()
        };
        let flow = workflow(crm);
        let submission = flow.execute(&sara()).await.expect("submission");
        assert!(submission.notes.is_failed());
        assert!(submission.label.is_failed());
        assert!(submission.lead.label_ids.is_empty());

        let result = flow.submit_lead(&sara()).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn lead_failure_is_reported() {
        let crm = FakeCrm {
            lead_fails: true,
            ..FakeCrm::new()
        };
        let flow = workflow(crm);
        let result = flow.submit_lead(&sara()).await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("failed to create lead: HTTP error status 400")
        );
    }

    #[tokio::test]
    async fn label_selection_takes_seventh_of_eight() {
        let flow = workflow(FakeCrm::with_labels(8));
        let submission = flow.execute(&sara()).await.expect("submission");
        assert_eq!(submission.label.applied(), Some(&label(6)));
        assert_eq!(submission.lead.label_ids, vec![label(6).id]);
    }

    #[tokio::test]
    async fn label_selection_takes_first_of_three() {
        let flow = workflow(FakeCrm::with_labels(3));
        let submission = flow.execute(&sara()).await.expect("submission");
        assert_eq!(submission.label.applied(), Some(&label(0)));
        assert!(!flow
            .crm()
            .calls()
            .iter()
            .any(|call| matches!(call, Call::CreateLabel(_))));
    }

    #[tokio::test]
    async fn missing_label_is_created() {
        let flow = workflow(FakeCrm::with_labels(0));
        let submission = flow.execute(&sara()).await.expect("submission");
        let created = LabelId::from_uuid(Uuid::from_u128(CREATED_LABEL));
        assert_eq!(submission.lead.label_ids, vec![created]);
        let calls = flow.crm().calls();
        assert!(calls.contains(&Call::CreateLabel(LabelDraft {
            name: LabelName::default(),
            color: Default::default(),
        })));
    }

    #[tokio::test]
    async fn label_create_failure_still_creates_lead_without_label() {
        let crm = FakeCrm {
            create_label_fails: true,
            ..FakeCrm::with_labels(0)
        };
        let flow = workflow(crm);
        let submission = flow.execute(&sara()).await.expect("submission");
        assert!(submission.label.is_failed());
        assert!(submission.lead.label_ids.is_empty());

        let calls = flow.crm().calls();
        assert!(calls.iter().any(|call| matches!(call, Call::CreateLabel(_))));
        let drafts = lead_drafts(&calls);
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].label_ids.is_empty());
    }

    #[tokio::test]
    async fn first_policy_ignores_legacy_index() {
        let config = WorkflowConfig {
            label_policy: LabelPolicy::First,
            ..WorkflowConfig::default()
        };
        let flow = LeadWorkflow::new(FakeCrm::with_labels(8), config);
        let submission = flow.execute(&sara()).await.expect("submission");
        assert_eq!(submission.label.applied(), Some(&label(0)));
    }

    #[tokio::test]
    async fn disabled_stages_are_skipped() {
        let config = WorkflowConfig {
            stages: Stages {
                notes: false,
                label: false,
            },
            ..WorkflowConfig::default()
        };
        let flow = LeadWorkflow::new(FakeCrm::with_labels(3), config);
        let submission = flow.execute(&sara()).await.expect("submission");
        assert_eq!(submission.notes, BestEffort::Skipped);
        assert_eq!(submission.label, BestEffort::Skipped);
        let calls = flow.crm().calls();
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn notes_skipped_without_car_type_or_budget() {
        let flow = workflow(FakeCrm::with_labels(1));
        let input = LeadFormInput {
            car_type: String::new(),
            budget: " ".to_string(),
            ..sara()
        };
        let submission = flow.execute(&input).await.expect("submission");
        assert_eq!(submission.notes, BestEffort::Skipped);
        assert_eq!(submission.lead.title, "Sara Youssef");
    }

    #[tokio::test]
    async fn end_to_end_submission() {
        let flow = workflow(FakeCrm::with_labels(2));
        let result = flow.submit_lead(&sara()).await;
        assert!(result.success);
        assert_eq!(result.message.as_deref(), Some(LEAD_ADDED_MESSAGE));
        assert!(result.error.is_none());
        let lead = result.data.expect("lead");
        assert_eq!(lead.title, "Sedan - Sara Youssef");

        let calls = flow.crm().calls();
        let contact_id = ContactId::new(101).expect("id");
        assert_eq!(
            calls,
            vec![
                Call::CreateContact(ContactDraft {
                    name: "Sara Youssef".to_string(),
                    phone: leadline_core::normalize_phone(
                        "+201012345678",
                        &Default::default()
                    ),
                }),
                Call::UpdateNotes(contact_id, "Car Type: Sedan\nBudget: 500000".to_string()),
                Call::SearchLabels("Landing Page".to_string()),
                Call::CreateLead(LeadDraft {
                    title: "Sedan - Sara Youssef".to_string(),
                    contact_id,
                    label_ids: vec![label(0).id],
                }),
            ]
        );
    }
}
