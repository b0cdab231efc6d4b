pub mod ids;
pub mod label;
pub mod lead;
pub mod phone;

pub use ids::{ContactId, LabelId, LeadId};
pub use label::{LabelColor, LabelDraft, LabelName, LabelPolicy, LabelRecord, DEFAULT_LABEL_NAME};
pub use lead::{ContactDraft, LeadDraft, LeadFormInput, LeadRecord};
pub use phone::{normalize_phone, validate_local_mobile, CountryCode, NormalizedPhone};
