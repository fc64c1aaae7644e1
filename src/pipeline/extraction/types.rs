use serde::{Deserialize, Serialize};

/// Structured fields pulled out of one free-text clinical note.
///
/// A field is `None` when its pattern found nothing. A matched field holds
/// the capture trimmed of surrounding whitespace. A capture that was only
/// whitespace is kept as `Some("")` rather than collapsed to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalRecord {
    /// Age/sex token exactly as written, e.g. `85F`, `72 M`, `90 female`.
    pub age_sex: Option<String>,
    /// History of Present Illness.
    pub hpi: Option<String>,
    /// Medication section.
    pub meds: Option<String>,
    /// Laboratory section.
    pub labs: Option<String>,
}

impl ClinicalRecord {
    /// True when no field matched at all.
    pub fn is_empty(&self) -> bool {
        self.age_sex.is_none() && self.hpi.is_none() && self.meds.is_none() && self.labs.is_none()
    }

    /// Number of fields that matched.
    pub fn matched_fields(&self) -> usize {
        [&self.age_sex, &self.hpi, &self.meds, &self.labs]
            .iter()
            .filter(|f| f.is_some())
            .count()
    }
}

/// Form fields a record can be written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    AgeSex,
    Hpi,
    Meds,
}

impl FormField {
    /// Element identifier used by the case form.
    pub fn element_id(&self) -> &'static str {
        match self {
            Self::AgeSex => "age_sex",
            Self::Hpi => "hpi",
            Self::Meds => "meds",
        }
    }
}

/// Destination for auto-populated values (e.g. a UI form).
pub trait FieldSink {
    /// Write `value` into `field`. Returns false if the field does not exist.
    fn set_field(&mut self, field: FormField, value: &str) -> bool;
}
