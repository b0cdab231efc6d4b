use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_COUNTRY_CODE: &str = "+20";

const TRUNK_PREFIX: char = '0';
const MOBILE_OPERATOR_DIGITS: [char; 4] = ['0', '1', '2', '5'];
const MOBILE_LEN: usize = 11;

/// International calling code such as `+20`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('+')
            .ok_or_else(|| CoreError::InvalidCountryCode(raw.to_string()))?;
        if digits.is_empty() || digits.len() > 3 || !digits.chars().all(|ch| ch.is_ascii_digit())
        {
            return Err(CoreError::InvalidCountryCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self(DEFAULT_COUNTRY_CODE.to_string())
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

/// Phone number after trunk-prefix rewriting. Not validated beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedPhone(String);

impl NormalizedPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rewrites a national-format number to international format.
///
/// `+`-prefixed input passes through, a leading trunk `0` is replaced by the
/// country code, anything else is kept as typed. Blank input yields `None`.
/// `01012345678` becomes `+201012345678`, not the legacy form's `+2001012345678`.
pub fn normalize_phone(raw: &str, country_code: &CountryCode) -> Option<NormalizedPhone> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('+') {
        return Some(NormalizedPhone(trimmed.to_string()));
    }

    match trimmed.strip_prefix(TRUNK_PREFIX) {
        Some(rest) => Some(NormalizedPhone(format!("{}{}", country_code.as_str(), rest))),
        None => Some(NormalizedPhone(trimmed.to_string())),
    }
}

/// Strict check for Egyptian mobile numbers in local format (`01[0125]` + 8 digits).
pub fn validate_local_mobile(raw: &str) -> Result<(), CoreError> {
    let invalid = || CoreError::InvalidPhone(raw.to_string());
    let value = raw.trim();
    if value.len() != MOBILE_LEN || !value.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut chars = value.chars();
    if chars.next() != Some('0') || chars.next() != Some('1') {
        return Err(invalid());
    }
    match chars.next() {
        Some(operator) if MOBILE_OPERATOR_DIGITS.contains(&operator) => Ok(()),
        _ => Err(invalid()),
    }
}
