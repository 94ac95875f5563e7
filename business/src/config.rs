use serde::Deserialize;
use std::env::vars;
use ustr::Ustr;

/// Backend used when `OAM_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    oam_api_base_url: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            api_base_url: base_url,
        }
    }

    /// Reads the configuration from environment variables.
    ///
    /// Falls back to [`DEFAULT_API_BASE_URL`] when the variable is missing or
    /// the environment cannot be deserialized.
    pub fn from_env() -> Self {
        let raw: Result<RawConfig, _> = serde_env::from_iter(vars());
        match raw {
            Ok(raw) => Self::from_raw(raw),
            Err(err) => {
                log::warn!("Failed to read configuration from environment: {err}");
                Self::default()
            }
        }
    }

    fn from_raw(raw: RawConfig) -> Self {
        match raw.oam_api_base_url {
            Some(url) if !url.trim().is_empty() => {
                log::info!("Using OAM_API_BASE_URL: {url}");
                Self::new(url.trim_end_matches('/').to_owned())
            }
            _ => Self::default(),
        }
    }

    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{}/api", self.api_base_url))
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: if cfg!(target_arch = "wasm32") {
                String::new()
            } else {
                DEFAULT_API_BASE_URL.to_owned()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_env::from_iter;

    #[test]
    fn test_default_api_url() {
        let config = BusinessConfig::default();

        if cfg!(target_arch = "wasm32") {
            assert_eq!(config.api_url(), Ustr::from("/api"));
        } else {
            assert_eq!(config.api_url(), Ustr::from("http://localhost:8080/api"));
        }
    }

    #[test]
    fn test_empty_base_url_is_relative() {
        let config = BusinessConfig::new(String::new());
        assert_eq!(config.api_url(), Ustr::from("/api"));
    }

    #[test]
    fn test_base_url_from_env() {
        let raw: RawConfig = from_iter(vec![("OAM_API_BASE_URL", "https://oam.example.com/")])
            .expect("RawConfig should deserialize");

        let config = BusinessConfig::from_raw(raw);
        assert_eq!(config.api_base_url, "https://oam.example.com");
        assert_eq!(config.api_url(), Ustr::from("https://oam.example.com/api"));
    }

    #[test]
    fn test_missing_env_falls_back_to_default() {
        let raw: RawConfig =
            from_iter(vec![("UNRELATED", "1")]).expect("RawConfig should deserialize");

        assert_eq!(BusinessConfig::from_raw(raw), BusinessConfig::default());
    }
}
