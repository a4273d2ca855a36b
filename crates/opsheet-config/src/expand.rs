//! Environment variable expansion for configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `$VAR`, `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the configuration key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("docs/ops", "docs.ops_dir").unwrap(), "docs/ops");
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("OPSHEET_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${OPSHEET_EXPAND_UNSET:-Teletype}", "page.title_prefix").unwrap(),
            "Teletype"
        );
    }

    #[test]
    fn test_set_variable_expands() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("OPSHEET_EXPAND_TAG", "v4.0.0");
        }
        assert_eq!(
            expand_env("${OPSHEET_EXPAND_TAG}", "version.tag").unwrap(),
            "v4.0.0"
        );
        unsafe {
            std::env::remove_var("OPSHEET_EXPAND_TAG");
        }
    }

    #[test]
    fn test_bare_variable_expands() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("OPSHEET_EXPAND_BARE", "base");
        }
        assert_eq!(
            expand_env("$OPSHEET_EXPAND_BARE/docs/ops", "docs.ops_dir").unwrap(),
            "base/docs/ops"
        );
        unsafe {
            std::env::remove_var("OPSHEET_EXPAND_BARE");
        }
    }

    #[test]
    fn test_missing_variable_is_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("OPSHEET_EXPAND_MISSING");
        }
        let err = expand_env("${OPSHEET_EXPAND_MISSING}", "version.tag").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("version.tag"));
        assert!(msg.contains("OPSHEET_EXPAND_MISSING"));
    }
}
