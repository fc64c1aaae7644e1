use super::template::generate_prompt;
use super::types::{is_blank, join_fields, MagicPrompt, PromptField, PromptRequest, PromptValidation};
use super::PromptError;

pub const MSG_ALL_PRESENT: &str = "All fields present";
pub const MSG_USING_RAW_TEXT: &str = "Using raw text for prompt generation";
pub const MSG_PROMPT_READY: &str = "Prompt Copied! Paste into AI.";
pub const MSG_RAW_PROMPT_READY: &str = "Prompt generated from raw text and copied! Paste into AI.";

/// Check the fields a prompt needs.
///
/// Age/sex, HPI and meds must each be present and not whitespace-only.
/// With `allow_bypass`, a request whose three fields are all blank still
/// passes when it carries non-blank raw text (`using_raw_text` is then
/// set). Missing fields are listed in age/sex, HPI, meds order.
pub fn validate_prompt_data(request: &PromptRequest, allow_bypass: bool) -> PromptValidation {
    let missing: Vec<PromptField> = PromptField::all()
        .iter()
        .copied()
        .filter(|f| is_blank(request.field(*f)))
        .collect();

    if allow_bypass && missing.len() == PromptField::all().len() && request.has_raw_text() {
        return PromptValidation {
            is_valid: true,
            missing: Vec::new(),
            message: MSG_USING_RAW_TEXT.to_string(),
            using_raw_text: true,
        };
    }

    let message = if missing.is_empty() {
        MSG_ALL_PRESENT.to_string()
    } else {
        format!("Missing required fields: {}", join_fields(&missing))
    };

    PromptValidation {
        is_valid: missing.is_empty(),
        missing,
        message,
        using_raw_text: false,
    }
}

/// Validate, then render the default prompt.
///
/// Fails with [`PromptError::MissingFields`] when validation does not pass;
/// the caller should block delivery and show the error to the user.
pub fn build_magic_prompt(
    request: &PromptRequest,
    allow_bypass: bool,
) -> Result<MagicPrompt, PromptError> {
    let validation = validate_prompt_data(request, allow_bypass);
    if !validation.is_valid {
        tracing::info!(
            missing = %join_fields(&validation.missing),
            "Prompt blocked by validation"
        );
        return Err(PromptError::MissingFields(validation.missing));
    }

    let prompt = generate_prompt(request);
    let status_message = if validation.using_raw_text {
        MSG_RAW_PROMPT_READY
    } else {
        MSG_PROMPT_READY
    };

    tracing::info!(
        used_raw_text = validation.using_raw_text,
        prompt_chars = prompt.len(),
        "Review prompt generated"
    );

    Ok(MagicPrompt {
        prompt,
        used_raw_text: validation.using_raw_text,
        status_message,
    })
}
