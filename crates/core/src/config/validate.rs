use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - API base URL and page limit are usable
/// - Storage root is set
/// - Index alphabet is non-empty with distinct titles
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "api.base_url cannot be empty".to_string(),
        ));
    }

    if config.api.page_limit == 0 {
        return Err(ConfigError::ValidationError(
            "api.page_limit cannot be 0".to_string(),
        ));
    }

    if config.storage.root.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.root cannot be empty".to_string(),
        ));
    }

    if config.index.letters.is_empty() {
        return Err(ConfigError::ValidationError(
            "index.letters cannot be empty".to_string(),
        ));
    }

    if config.index.letters.contains(&config.index.catch_all) {
        return Err(ConfigError::ValidationError(
            "index.catch_all must not repeat a letter title".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_page_limit_fails() {
        let mut config = Config::default();
        config.api.page_limit = 0;

        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_alphabet_fails() {
        let mut config = Config::default();
        config.index.letters.clear();

        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_catch_all_collision_fails() {
        let mut config = Config::default();
        config.index.catch_all = "A".to_string();

        assert!(validate_config(&config).is_err());
    }
}
