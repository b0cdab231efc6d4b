use crate::domain::ids::LabelId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LABEL_NAME: &str = "Landing Page";

/// Position picked by [`LabelPolicy::Legacy`] once the search returns more
/// than this many labels.
pub const LEGACY_LABEL_INDEX: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelName(String);

impl LabelName {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidLabelName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LabelName {
    fn default() -> Self {
        Self(DEFAULT_LABEL_NAME.to_string())
    }
}

impl TryFrom<String> for LabelName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<LabelName> for String {
    fn from(name: LabelName) -> Self {
        name.0
    }
}

/// Colors Pipedrive accepts for lead labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelColor {
    Green,
    #[default]
    Blue,
    Red,
    Yellow,
    Purple,
    Gray,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub id: LabelId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDraft {
    pub name: LabelName,
    pub color: LabelColor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// Past six results take the seventh, otherwise the first. Matches the
    /// label ordering of the production Pipedrive tenant.
    #[default]
    Legacy,
    First,
}

impl LabelPolicy {
    /// Picks a label from search results; `None` means one must be created.
    pub fn select<'a>(&self, found: &'a [LabelRecord]) -> Option<&'a LabelRecord> {
        match self {
            LabelPolicy::Legacy if found.len() > LEGACY_LABEL_INDEX => {
                found.get(LEGACY_LABEL_INDEX)
            }
            LabelPolicy::Legacy | LabelPolicy::First => found.first(),
        }
    }
}
