pub mod api;
pub mod error;
pub mod outcome;
pub mod pipedrive;
pub mod workflow;

pub use api::CrmApi;
pub use error::{CrmError, Result, WorkflowError};
pub use outcome::BestEffort;
pub use pipedrive::PipedriveClient;
pub use workflow::{LeadWorkflow, Stages, Submission, WorkflowConfig};
