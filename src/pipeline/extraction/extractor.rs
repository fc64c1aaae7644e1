//! Regex-driven extraction of age/sex, HPI, medications and labs from
//! unstructured clinical text.
//!
//! Every rule is independent and the first match in the text wins. Section
//! headers are case-insensitive. A section runs from just after its header
//! (and any following colons/whitespace) up to the next line that starts
//! with one of the rule's terminator headers, or to the end of the text.
//!
//! The `regex` crate guarantees linear-time matching, so pathological input
//! (hundreds of KB of a repeated character) cannot trigger backtracking
//! blowups.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{ClinicalRecord, FieldSink, FormField};

/// Header tokens that open each section, in match-priority order.
pub const HPI_HEADERS: &[&str] = &["HPI", "History of Present Illness", "History"];
pub const HPI_TERMINATORS: &[&str] = &[
    "PMH",
    "Past Medical History",
    "Meds",
    "Medications",
    "Assessment",
    "Physical Exam",
];

pub const MEDS_HEADERS: &[&str] = &[
    "Meds",
    "Medications",
    "Current Medications",
    "Home Medications",
];
pub const MEDS_TERMINATORS: &[&str] = &["Labs", "Laboratory", "Plan", "Assessment", "Allergies"];

pub const LABS_HEADERS: &[&str] = &["Labs", "Laboratory", "Lab Results"];
pub const LABS_TERMINATORS: &[&str] = &["Plan", "Assessment", "Imaging"];

/// Two or three digits, an optional whitespace, then a sex marker.
/// Digits are ASCII only; the sex marker is case-sensitive by list.
pub static AGE_SEX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2,3}\s?(?:male|female|Male|Female|[MmFf]))").unwrap()
});

static HPI_SECTION: LazyLock<SectionRule> =
    LazyLock::new(|| SectionRule::new(HPI_HEADERS, HPI_TERMINATORS));
static MEDS_SECTION: LazyLock<SectionRule> =
    LazyLock::new(|| SectionRule::new(MEDS_HEADERS, MEDS_TERMINATORS));
static LABS_SECTION: LazyLock<SectionRule> =
    LazyLock::new(|| SectionRule::new(LABS_HEADERS, LABS_TERMINATORS));

/// A one-shot header-to-next-header scanner.
#[derive(Debug)]
pub struct SectionRule {
    header: Regex,
    terminator: Regex,
}

impl SectionRule {
    /// Build a rule from header and terminator token lists.
    ///
    /// The header must be followed by at least one colon or whitespace
    /// character. A terminator only counts at the start of a line (after a
    /// newline and optional whitespace).
    pub fn new(headers: &[&str], terminators: &[&str]) -> Self {
        let header = format!(r"(?i)(?:{})[:\s]+", alternation(headers));
        let terminator = format!(r"(?i)\n\s*(?:{})", alternation(terminators));
        Self {
            header: Regex::new(&header).unwrap(),
            terminator: Regex::new(&terminator).unwrap(),
        }
    }

    /// Body of the first section in `text`, untrimmed.
    /// `None` when no header matches or the body is empty.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        let header = self.header.find(text)?;
        let start = header.end();
        let end = self
            .terminator
            .find(&text[start..])
            .map(|t| start + t.start())
            .unwrap_or(text.len());

        let body = &text[start..end];
        if body.is_empty() {
            None
        } else {
            Some(body)
        }
    }

    /// Trimmed body of the first section in `text`.
    pub fn extract(&self, text: &str) -> Option<String> {
        self.capture(text).map(|body| body.trim().to_string())
    }
}

fn alternation(tokens: &[&str]) -> String {
    tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}

/// Trimmed first capture group of `regex` in `text`.
///
/// `None` when the text is empty, nothing matches, or the capture itself is
/// empty. A whitespace-only capture becomes `Some("")`.
pub fn extract_value(text: &str, regex: &Regex) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    let captures = regex.captures(text)?;
    let value = captures.get(1)?.as_str();
    if value.is_empty() {
        return None;
    }
    Some(value.trim().to_string())
}

/// Extract all clinical fields from raw text.
///
/// Empty input yields a record with every field `None`.
pub fn extract_clinical_data(text: &str) -> ClinicalRecord {
    if text.is_empty() {
        return ClinicalRecord::default();
    }

    let record = ClinicalRecord {
        age_sex: extract_value(text, &AGE_SEX_PATTERN),
        hpi: HPI_SECTION.extract(text),
        meds: MEDS_SECTION.extract(text),
        labs: LABS_SECTION.extract(text),
    };

    tracing::debug!(
        input_chars = text.len(),
        matched = record.matched_fields(),
        age_sex = record.age_sex.is_some(),
        hpi = record.hpi.is_some(),
        meds = record.meds.is_some(),
        labs = record.labs.is_some(),
        "Clinical fields extracted"
    );

    record
}

/// Extract fields and write the non-empty ones into `sink`.
///
/// Absent or empty values never overwrite what the sink already holds.
/// Labs are extracted but not written; the case form has no labs field.
pub fn populate_fields(text: &str, sink: &mut dyn FieldSink) -> ClinicalRecord {
    let record = extract_clinical_data(text);

    let fields = [
        (FormField::AgeSex, record.age_sex.as_deref()),
        (FormField::Hpi, record.hpi.as_deref()),
        (FormField::Meds, record.meds.as_deref()),
    ];

    for (field, value) in fields {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            continue;
        };
        if !sink.set_field(field, value) {
            tracing::debug!(field = field.element_id(), "Form field missing, value not written");
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Instant;

    use super::*;

    // =================================================================
    // AGE / SEX
    // =================================================================

    #[test]
    fn age_sex_compact() {
        assert_eq!(extract_value("Patient is 85F admitted for...", &AGE_SEX_PATTERN).as_deref(), Some("85F"));
    }

    #[test]
    fn age_sex_with_space() {
        assert_eq!(extract_value("Patient: 72 M with chest pain", &AGE_SEX_PATTERN).as_deref(), Some("72 M"));
    }

    #[test]
    fn age_sex_lowercase_and_three_digit() {
        assert_eq!(extract_value("90f presenting with falls", &AGE_SEX_PATTERN).as_deref(), Some("90f"));
        assert_eq!(extract_value("101M with altered mental status", &AGE_SEX_PATTERN).as_deref(), Some("101M"));
    }

    #[test]
    fn age_sex_words() {
        assert_eq!(extract_value("75 male with COPD", &AGE_SEX_PATTERN).as_deref(), Some("75 male"));
        assert_eq!(extract_value("82 female with UTI", &AGE_SEX_PATTERN).as_deref(), Some("82 female"));
        assert_eq!(extract_value("75 Male with COPD", &AGE_SEX_PATTERN).as_deref(), Some("75 Male"));
        assert_eq!(extract_value("90 Female", &AGE_SEX_PATTERN).as_deref(), Some("90 Female"));
    }

    #[test]
    fn age_sex_absent() {
        assert_eq!(extract_value("Patient age unknown", &AGE_SEX_PATTERN), None);
    }

    #[test]
    fn age_sex_first_occurrence_wins() {
        let record = extract_clinical_data("88F lives with her 60M son");
        assert_eq!(record.age_sex.as_deref(), Some("88F"));
    }

    // =================================================================
    // SECTIONS
    // =================================================================

    #[test]
    fn hpi_section_stops_at_pmh() {
        let text = "\nHPI: Patient presents with 3 days of confusion and decreased appetite.\nPMH: Hypertension, diabetes\n";
        let record = extract_clinical_data(text);
        assert_eq!(
            record.hpi.as_deref(),
            Some("Patient presents with 3 days of confusion and decreased appetite.")
        );
    }

    #[test]
    fn hpi_long_header() {
        let text = "\nHistory of Present Illness: Elderly patient with falls.\nMedications: Aspirin\n";
        let record = extract_clinical_data(text);
        assert_eq!(record.hpi.as_deref(), Some("Elderly patient with falls."));
    }

    #[test]
    fn hpi_spans_multiple_lines() {
        let text = "HPI: Line one\nLine two\nLine three\nPhysical Exam: normal";
        let hpi = extract_clinical_data(text).hpi.unwrap();
        assert_eq!(hpi, "Line one\nLine two\nLine three");
    }

    #[test]
    fn headers_are_case_insensitive() {
        let text = "hpi: falls at home\nmeds: donepezil\nlabs: Na 131";
        let record = extract_clinical_data(text);
        assert_eq!(record.hpi.as_deref(), Some("falls at home"));
        assert_eq!(record.meds.as_deref(), Some("donepezil"));
        assert_eq!(record.labs.as_deref(), Some("Na 131"));
    }

    #[test]
    fn meds_section_variants() {
        let text = "\nMedications: Lisinopril 10mg, Metformin 500mg BID\nLabs: pending\n";
        assert_eq!(
            extract_clinical_data(text).meds.as_deref(),
            Some("Lisinopril 10mg, Metformin 500mg BID")
        );

        let text = "\nMeds: Aspirin 81mg daily\nAllergies: NKDA\n";
        assert_eq!(extract_clinical_data(text).meds.as_deref(), Some("Aspirin 81mg daily"));

        let text = "\nCurrent Medications: Warfarin 5mg\nPlan: continue\n";
        assert_eq!(extract_clinical_data(text).meds.as_deref(), Some("Warfarin 5mg"));
    }

    #[test]
    fn full_note_fields_are_bounded() {
        let text = "HPI: Admitted for pneumonia with 3 days of cough.\nMedications: Lisinopril 10mg, Metformin 500mg\nLabs: WBC 15.2, Cr 1.2";
        let record = extract_clinical_data(text);
        assert_eq!(record.hpi.as_deref(), Some("Admitted for pneumonia with 3 days of cough."));
        assert_eq!(record.meds.as_deref(), Some("Lisinopril 10mg, Metformin 500mg"));
        assert_eq!(record.labs.as_deref(), Some("WBC 15.2, Cr 1.2"));
    }

    #[test]
    fn labs_stop_at_imaging() {
        let text = "Lab Results: Hgb 9.1\nK 5.2\nImaging: CXR clear";
        assert_eq!(extract_clinical_data(text).labs.as_deref(), Some("Hgb 9.1\nK 5.2"));
    }

    #[test]
    fn terminator_must_start_a_line() {
        let text = "HPI: Reviewed meds with family, no changes.\nPMH: CHF";
        assert_eq!(
            extract_clinical_data(text).hpi.as_deref(),
            Some("Reviewed meds with family, no changes.")
        );
    }

    #[test]
    fn indented_terminator_still_ends_section() {
        let text = "HPI: Falls x2\n    Medications: none";
        assert_eq!(extract_clinical_data(text).hpi.as_deref(), Some("Falls x2"));
    }

    #[test]
    fn repeated_headers_first_wins() {
        let text = "HPI: first account\nPMH: none\nHPI: second account\nPMH: none";
        assert_eq!(extract_clinical_data(text).hpi.as_deref(), Some("first account"));
    }

    #[test]
    fn header_at_end_of_text_is_absent() {
        assert_eq!(extract_clinical_data("Seen today. HPI:").hpi, None);
    }

    #[test]
    fn whitespace_only_capture_is_kept_as_empty_string() {
        let rule = SectionRule::new(&["HPI"], &["PMH"]);
        assert_eq!(rule.capture("HPI:x  \nPMH: none"), Some("x  "));
        assert_eq!(rule.extract("HPI: ok  \n \nPMH: none").as_deref(), Some("ok"));

        let re = Regex::new(r"Age:(\s*)").unwrap();
        assert_eq!(extract_value("Age:   ", &re).as_deref(), Some(""));
        assert_eq!(extract_value("Age:", &re), None);
    }

    #[test]
    fn empty_section_swallows_next_header() {
        let record = extract_clinical_data("HPI:   \nPMH:");
        assert_eq!(record.hpi.as_deref(), Some("PMH:"));
        assert_eq!(record.meds, None);
        assert_eq!(record.age_sex, None);

        assert_eq!(extract_clinical_data("Notes\nHPI:   ").hpi, None);
    }

    // =================================================================
    // WHOLE RECORD
    // =================================================================

    #[test]
    fn age_sex_only() {
        let record = extract_clinical_data("Patient is 85F admitted...");
        assert_eq!(
            record,
            ClinicalRecord {
                age_sex: Some("85F".into()),
                hpi: None,
                meds: None,
                labs: None,
            }
        );
    }

    #[test]
    fn empty_input_yields_empty_record() {
        let record = extract_clinical_data("");
        assert!(record.is_empty());
        assert_eq!(record, ClinicalRecord::default());
    }

    #[test]
    fn no_clinical_content() {
        let record = extract_clinical_data("Just some random text without clinical data");
        assert!(record.is_empty());
        assert_eq!(record.matched_fields(), 0);
    }

    #[test]
    fn matched_fields_counts_present_sections() {
        let record = extract_clinical_data("85F\nHPI: falls\nMeds: none");
        assert_eq!(record.matched_fields(), 3);
        assert!(!record.is_empty());
    }

    #[test]
    fn unicode_and_markup_tolerated() {
        let record = extract_clinical_data("90M with HPI: שלום עולם condition");
        assert_eq!(record.age_sex.as_deref(), Some("90M"));
        assert_eq!(record.hpi.as_deref(), Some("שלום עולם condition"));

        let record = extract_clinical_data("85F with café-au-lait spots & <html> tags");
        assert_eq!(record.age_sex.as_deref(), Some("85F"));
    }

    #[test]
    fn very_long_section() {
        let text = format!("HPI: {}\nMeds: Test", "A".repeat(10_000));
        let record = extract_clinical_data(&text);
        assert_eq!(record.hpi.as_ref().map(|h| h.len()), Some(10_000));
        assert_eq!(record.meds.as_deref(), Some("Test"));
    }

    #[test]
    fn pathological_input_is_linear() {
        let inputs = [
            "a".repeat(100_000),
            format!("HPI:{}", " ".repeat(100_000)),
            format!("Meds: {}", "\n ".repeat(50_000)),
            "9".repeat(100_000),
            "HPI ".repeat(25_000),
        ];
        for input in &inputs {
            let start = Instant::now();
            let _ = extract_clinical_data(input);
            assert!(start.elapsed().as_secs_f64() < 1.0, "slow on input of {} bytes", input.len());
        }
    }

    // =================================================================
    // POPULATE
    // =================================================================

    #[derive(Default)]
    struct MockForm {
        values: HashMap<FormField, String>,
        missing: Vec<FormField>,
    }

    impl FieldSink for MockForm {
        fn set_field(&mut self, field: FormField, value: &str) -> bool {
            if self.missing.contains(&field) {
                return false;
            }
            self.values.insert(field, value.to_string());
            true
        }
    }

    #[test]
    fn populate_writes_found_fields() {
        let text = "78F\nHPI: Confusion since Tuesday\nMedications: Donepezil 10mg\nLabs: Na 128";
        let mut form = MockForm::default();
        let record = populate_fields(text, &mut form);

        assert_eq!(form.values[&FormField::AgeSex], "78F");
        assert!(form.values[&FormField::Hpi].contains("Confusion"));
        assert!(form.values[&FormField::Meds].contains("Donepezil"));
        assert_eq!(record.labs.as_deref(), Some("Na 128"));
    }

    #[test]
    fn populate_keeps_existing_values_when_absent() {
        let mut form = MockForm::default();
        form.values.insert(FormField::AgeSex, "existing".into());
        let record = populate_fields("No clinical data here", &mut form);

        assert_eq!(form.values[&FormField::AgeSex], "existing");
        assert!(record.is_empty());
    }

    #[test]
    fn populate_tolerates_missing_form_fields() {
        let mut form = MockForm {
            missing: vec![FormField::AgeSex, FormField::Hpi, FormField::Meds],
            ..Default::default()
        };
        let record = populate_fields("85F with HPI: test", &mut form);
        assert!(form.values.is_empty());
        assert_eq!(record.age_sex.as_deref(), Some("85F"));
    }
}
