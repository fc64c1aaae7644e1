pub mod config;
pub mod pipeline;
pub mod export;

pub use pipeline::extraction::{extract_clinical_data, ClinicalRecord};
pub use pipeline::formatting::{format_medical_text, format_medication_list, FormatOptions};
pub use pipeline::prompt::{generate_prompt, validate_prompt_data, PromptRequest};
pub use pipeline::safety::sanitize::{escape_html, sanitize_text, truncate_text};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
/// Reads [`config::LOG_ENV_VAR`], falling back to [`config::default_log_filter`].
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(config::LOG_ENV_VAR)
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("{} v{} tracing initialised", config::APP_NAME, config::APP_VERSION);
}
