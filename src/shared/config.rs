use std::fs;
use std::path::Path;

use tracing::debug;

use crate::shared::errors::AppError;
use crate::shared::types::AppConfig;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file. Missing keys fall back to defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AppConfig, AppError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config = Self::parse(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<AppConfig, AppError> {
        let config: AppConfig = toml::from_str(content)?;

        if config.monitor.poll_interval_secs == 0 {
            return Err(AppError::ConfigError(
                "monitor.poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(AppConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::load(None).unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 60);
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.api.latest_url.ends_with("/osrs/latest"));
        assert!(config.notifications.enabled);
        assert_eq!(config.notifications.timeout_secs, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [monitor]
            poll_interval_secs = 15

            [api]
            user_agent = "price-bot (contact@example.com)"
            "#,
        )
        .unwrap();

        assert_eq!(config.monitor.poll_interval_secs, 15);
        assert_eq!(config.api.user_agent, "price-bot (contact@example.com)");
        assert!(config.api.mapping_url.ends_with("/osrs/mapping"));
        assert_eq!(config.notifications.timeout_secs, 5);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = ConfigLoader::parse("[monitor]\npoll_interval_secs = 0\n");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[notifications]\nenabled = false").unwrap();

        let config = ConfigLoader::from_file(file.path()).unwrap();
        assert!(!config.notifications.enabled);
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::from_file("/nonexistent/ge-pricewatch.toml");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
