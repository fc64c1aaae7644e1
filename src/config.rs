/// Application-level constants
pub const APP_NAME: &str = "Geriatric Review";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable consulted before falling back to [`default_log_filter`].
pub const LOG_ENV_VAR: &str = "RUST_LOG";

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
/// Debug for our own crate in dev builds, info otherwise.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "geriatric_review=debug,info"
    } else {
        "geriatric_review=info,warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_set() {
        assert_eq!(APP_NAME, "Geriatric Review");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn log_filter_read_from_rust_log() {
        assert_eq!(LOG_ENV_VAR, "RUST_LOG");
    }

    #[test]
    fn default_filter_targets_own_crate() {
        assert!(default_log_filter().starts_with("geriatric_review="));
    }
}
