//! Default review template and placeholder rendering.
//!
//! The prompt is plain text: patient data is embedded verbatim, never
//! escaped.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::types::{PromptField, PromptRequest};

pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
Act as a Senior Geriatrician.
I will provide clinical data. Please output a response with TWO SECTIONS:

SECTION 1: SAFETY AUDIT (Strict)
- Flag Drug Interactions.
- Flag Beers Criteria.

SECTION 2: CLINICAL SUMMARY (Professional)
- Case Presentation style.
- Assessment & Plan.

DATA:
ID: {ageSex}
HPI: {hpi}
MEDS/LABS: {meds}";

/// Stand-in for the age/sex field when raw text carries the case.
pub const RAW_TEXT_AGE_SEX_MARKER: &str = "See below";
/// Stand-in for the HPI field when raw text carries the case.
pub const RAW_TEXT_HPI_MARKER: &str = "See clinical data below";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(ageSex|hpi|meds)\}").unwrap());

/// Render [`DEFAULT_PROMPT_TEMPLATE`] for `request`.
pub fn generate_prompt(request: &PromptRequest) -> String {
    generate_prompt_with_template(request, DEFAULT_PROMPT_TEMPLATE)
}

/// Render `template`, substituting `{ageSex}`, `{hpi}` and `{meds}`.
///
/// Absent fields render as the empty string. When all three structured
/// fields are blank and raw text is present, the age/sex and HPI slots get
/// "see below" markers and the meds slot carries the full raw text.
/// Every occurrence of a placeholder is filled, not only the first, so a
/// custom template may repeat `{ageSex}`. Substitution is a single pass
/// over the template, so placeholder-like text inside patient data is never
/// expanded.
pub fn generate_prompt_with_template(request: &PromptRequest, template: &str) -> String {
    let use_raw_text = request.structured_fields_blank() && request.has_raw_text();

    let (age_sex, hpi, meds) = if use_raw_text {
        (
            RAW_TEXT_AGE_SEX_MARKER,
            RAW_TEXT_HPI_MARKER,
            request.raw_text.as_deref().unwrap_or_default(),
        )
    } else {
        (
            request.field(PromptField::AgeSex).unwrap_or_default(),
            request.field(PromptField::Hpi).unwrap_or_default(),
            request.field(PromptField::Meds).unwrap_or_default(),
        )
    };

    tracing::debug!(
        use_raw_text,
        template_chars = template.len(),
        "Rendering review prompt"
    );

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "ageSex" => age_sex.to_string(),
            "hpi" => hpi.to_string(),
            _ => meds.to_string(),
        })
        .into_owned()
}
