use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};

/// Configuration for download attempts and the retry loop.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vetch_fetch::FetchConfig;
///
/// let config = FetchConfig::default()
///     .max_attempts(5)
///     .retry_delay(Duration::from_secs(2))
///     .timeout(Duration::from_secs(30));
/// ```
///
/// Loadable from TOML; durations are written in milliseconds:
///
/// ```toml
/// max_attempts = 3
/// retry_delay_ms = 5000
/// timeout_ms = 30000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Upper bound on attempts, including the first one.
    ///
    /// Default: 3
    pub max_attempts: u32,

    /// Constant pause between a failed attempt and the next one.
    ///
    /// Default: 5s
    #[serde(rename = "retry_delay_ms", with = "millis")]
    pub retry_delay: Duration,

    /// Deadline applied to each network step (redirect probe, size probe,
    /// transfer). `None` leaves timeouts to the HTTP layer.
    ///
    /// Default: None
    #[serde(rename = "timeout_ms", with = "option_millis")]
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay:  Duration::from_secs(5),
            timeout:      None,
        }
    }
}

impl FetchConfig {
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(FetchError::InvalidConfig(
                "max_attempts must be at least 1".to_owned(),
            ));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(FetchError::InvalidConfig(
                "timeout must be non-zero when set".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn to_millis(duration: Duration) -> u64 { u64::try_from(duration.as_millis()).unwrap_or(u64::MAX) }

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(super::to_millis(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod option_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&super::to_millis(*duration)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|value| value.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_saturate() {
        assert_eq!(to_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(to_millis(Duration::from_micros(2999)), 2);
        assert_eq!(to_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(5));
        assert_eq!(config.timeout, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial_keeps_defaults() {
        let config = FetchConfig::from_toml_str("max_attempts = 7").unwrap();
        assert_eq!(config.max_attempts, 7);
        assert_eq!(config.retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_from_toml_durations_in_millis() {
        let config =
            FetchConfig::from_toml_str("retry_delay_ms = 250\ntimeout_ms = 10000").unwrap();
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(matches!(
            FetchConfig::from_toml_str("max_attempts = 0"),
            Err(FetchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            FetchConfig::from_toml_str("retries = 3"),
            Err(FetchError::ConfigParse(_))
        ));
    }
}
