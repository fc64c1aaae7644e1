use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pipeline::extraction::ClinicalRecord;

/// Input to the prompt builder.
///
/// `raw_text` is a fallback channel, used only when every structured field
/// is blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub age_sex: Option<String>,
    pub hpi: Option<String>,
    pub meds: Option<String>,
    pub raw_text: Option<String>,
}

impl PromptRequest {
    /// Structured fields from an extracted record. Labs are not part of the
    /// prompt; the meds field carries "meds/labs" free text.
    pub fn from_record(record: &ClinicalRecord) -> Self {
        Self {
            age_sex: record.age_sex.clone(),
            hpi: record.hpi.clone(),
            meds: record.meds.clone(),
            raw_text: None,
        }
    }

    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = Some(raw_text.into());
        self
    }

    /// Value of a required field, `None` if absent.
    pub fn field(&self, field: PromptField) -> Option<&str> {
        match field {
            PromptField::AgeSex => self.age_sex.as_deref(),
            PromptField::Hpi => self.hpi.as_deref(),
            PromptField::Meds => self.meds.as_deref(),
        }
    }

    /// True when every structured field is absent or whitespace-only.
    pub fn structured_fields_blank(&self) -> bool {
        PromptField::all().iter().all(|f| is_blank(self.field(*f)))
    }

    /// True when a non-blank raw text fallback is present.
    pub fn has_raw_text(&self) -> bool {
        !is_blank(self.raw_text.as_deref())
    }
}

impl From<&ClinicalRecord> for PromptRequest {
    fn from(record: &ClinicalRecord) -> Self {
        Self::from_record(record)
    }
}

/// Fields the prompt requires, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptField {
    AgeSex,
    Hpi,
    Meds,
}

impl PromptField {
    pub fn all() -> &'static [PromptField] {
        &[Self::AgeSex, Self::Hpi, Self::Meds]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgeSex => "ageSex",
            Self::Hpi => "hpi",
            Self::Meds => "meds",
        }
    }
}

impl fmt::Display for PromptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of [`validate_prompt_data`](super::validate_prompt_data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptValidation {
    pub is_valid: bool,
    pub missing: Vec<PromptField>,
    pub message: String,
    pub using_raw_text: bool,
}

/// A validated, rendered prompt ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicPrompt {
    pub prompt: String,
    pub used_raw_text: bool,
    pub status_message: &'static str,
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

pub(crate) fn join_fields(fields: &[PromptField]) -> String {
    fields
        .iter()
        .map(PromptField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
