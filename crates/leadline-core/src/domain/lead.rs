use crate::domain::ids::{ContactId, LabelId, LeadId};
use crate::domain::phone::{normalize_phone, CountryCode, NormalizedPhone};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Raw landing-page form submission. Blank optional fields mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFormInput {
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub car_type: String,
    #[serde(default)]
    pub budget: String,
}

impl LeadFormInput {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.full_name.trim().is_empty() {
            return Err(CoreError::EmptyFullName);
        }
        Ok(())
    }

    pub fn car_type(&self) -> Option<&str> {
        non_blank(&self.car_type)
    }

    pub fn budget(&self) -> Option<&str> {
        non_blank(&self.budget)
    }

    pub fn contact_draft(&self, country_code: &CountryCode) -> Result<ContactDraft, CoreError> {
        self.validate()?;
        Ok(ContactDraft {
            name: self.full_name.trim().to_string(),
            phone: normalize_phone(&self.phone, country_code),
        })
    }

    /// `"Car Type: X"` and `"Budget: Y"` lines, skipping blank fields.
    pub fn notes(&self) -> Option<String> {
        let mut lines = Vec::new();
        if let Some(car_type) = self.car_type() {
            lines.push(format!("Car Type: {car_type}"));
        }
        if let Some(budget) = self.budget() {
            lines.push(format!("Budget: {budget}"));
        }
        if lines.is_empty() {
            return None;
        }
        Some(lines.join("\n"))
    }

    pub fn lead_title(&self) -> String {
        let name = self.full_name.trim();
        match self.car_type() {
            Some(car_type) => format!("{car_type} - {name}"),
            None => name.to_string(),
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub phone: Option<NormalizedPhone>,
}

/// A lead can only be drafted against a contact that already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadDraft {
    pub title: String,
    pub contact_id: ContactId,
    pub label_ids: Vec<LabelId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: LeadId,
    pub title: String,
    #[serde(default)]
    pub person_id: Option<ContactId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label_ids: Vec<LabelId>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<LabelId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<LabelId>>::deserialize(deserializer)?.unwrap_or_default())
}
