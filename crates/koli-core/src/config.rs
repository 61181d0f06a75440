//! Client configuration

use std::time::Duration;

/// License key the back-office expects in every request body
pub const DEFAULT_LICENSE_KEY: &str = "16016923";

/// Suggested API base URL offered by the settings surface
pub const DEFAULT_API_URL: &str = "https://webstreme.uniteks.com.tr:8001/ExtWsLiveV2/Services";

/// Settings for the remote call layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub license_key: String,
    /// `None` leaves the transport default in place
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            license_key: DEFAULT_LICENSE_KEY.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `KOLI_LICENSE_KEY` and `KOLI_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("KOLI_LICENSE_KEY") {
            let key = key.trim();
            if !key.is_empty() {
                config.license_key = key.to_string();
            }
        }

        if let Ok(secs) = std::env::var("KOLI_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Some(Duration::from_secs(secs)),
                _ => log::warn!("[config] Ignoring invalid KOLI_TIMEOUT_SECS: {}", secs),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_has_license_key_and_no_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.license_key, "16016923");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_from_env_overrides() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var("KOLI_LICENSE_KEY", " 999 ");
        std::env::set_var("KOLI_TIMEOUT_SECS", "15");

        let config = ClientConfig::from_env();
        assert_eq!(config.license_key, "999");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));

        std::env::remove_var("KOLI_LICENSE_KEY");
        std::env::remove_var("KOLI_TIMEOUT_SECS");
    }

    #[test]
    fn test_from_env_ignores_bad_timeout() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var("KOLI_TIMEOUT_SECS", "soon");
        assert_eq!(ClientConfig::from_env().timeout, None);
        std::env::remove_var("KOLI_TIMEOUT_SECS");
    }
}
