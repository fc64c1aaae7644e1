//! Case export: slide definitions for a presentation builder and
//! Word-compatible HTML documents.
//!
//! Every field passes through [`sanitize_text`](crate::sanitize_text)
//! before it is embedded. Presentation rendering itself is delegated to a
//! [`PresentationBuilder`] supplied by the caller.

pub mod config;
pub mod document;
pub mod slides;

pub use config::*;
pub use document::*;
pub use slides::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::extraction::ClinicalRecord;
use crate::pipeline::safety::sanitize_text;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("A {0} is required for presentation export")]
    MissingCollaborator(&'static str),

    #[error("Presentation builder failed: {0}")]
    Builder(String),

    #[error("Export file name must not contain a path: {0}")]
    InvalidFileName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Case fields as they are exported. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseExport {
    pub age_sex: String,
    pub initials: String,
    pub hpi: String,
    pub meds: String,
    pub ai_response: String,
}

impl CaseExport {
    /// Export fields from an extracted record. Initials and the AI response
    /// are not part of a record and start empty.
    pub fn from_record(record: &ClinicalRecord) -> Self {
        Self {
            age_sex: record.age_sex.clone().unwrap_or_default(),
            hpi: record.hpi.clone().unwrap_or_default(),
            meds: record.meds.clone().unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn with_initials(mut self, initials: impl Into<String>) -> Self {
        self.initials = initials.into();
        self
    }

    pub fn with_ai_response(mut self, ai_response: impl Into<String>) -> Self {
        self.ai_response = ai_response.into();
        self
    }

    /// `Case_{initials}`, or `Case_export` without initials. Characters
    /// that are not allowed in file names are dropped from the initials.
    fn file_stem(&self) -> String {
        let initials: String = sanitize_text(&self.initials)
            .chars()
            .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
            .collect();
        let initials = initials.trim().trim_matches('.');
        if initials.is_empty() {
            "Case_export".to_string()
        } else {
            format!("Case_{initials}")
        }
    }
}
