use giftdocs_base::{FilePath, GiftDocsError, GiftDocsResult, PalHandle, ResultExt, err};
use serde::Deserialize;
use tracing::{debug, info};

pub const CONFIG_FILE: &str = "giftdocs.toml";

/// Site configuration, read from `giftdocs.toml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub description: Option<String>,
    /// Host shown in the code samples.
    pub api_base_url: String,
    pub server: ServerConfig,
    pub demo: DemoConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "99Gift Corporate API".to_string(),
            description: Some(
                "Gift card ordering API for corporate merchants, with runnable samples.".to_string(),
            ),
            api_base_url: "https://api.99gift.in".to_string(),
            server: ServerConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated round trip of an executed sample.
    pub latency_ms: u64,
    /// Pages untouched for this long are closed.
    pub session_idle_secs: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1500,
            session_idle_secs: 1800,
        }
    }
}

pub fn parse_config(content: &str) -> GiftDocsResult<Config> {
    toml::from_str(content).map_err(|e| err!("Invalid configuration: {}", e))
}

pub fn load_config(pal: &PalHandle, path: &FilePath) -> GiftDocsResult<Config> {
    let content = pal
        .read_file_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config = parse_config(&content).with_context(|| format!("In {}", path))?;
    info!(path = %path, title = %config.title, "Loaded configuration");
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(pal: &PalHandle, path: &FilePath) -> GiftDocsResult<Config> {
    if !pal.file_exists(path)? {
        debug!(path = %path, "No config file, using defaults");
        return Ok(Config::default());
    }
    load_config(pal, path)
}

impl Config {
    /// The HTTP server settings, as a PAL config.
    pub fn http_server_config(&self) -> giftdocs_base::http::HttpServerConfig {
        giftdocs_base::http::HttpServerConfig::new(self.server.host.clone()).with_port(self.server.port)
    }

    pub fn validate(&self) -> GiftDocsResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(Box::new(GiftDocsError::message("api_base_url must not be empty")));
        }
        if self.demo.session_idle_secs == 0 {
            return Err(Box::new(GiftDocsError::message(
                "demo.session_idle_secs must be greater than 0",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use giftdocs_base::MockPal;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
title = "Staging Docs"
api_base_url = "https://staging.99gift.in"

[server]
host = "0.0.0.0"
port = 9000

[demo]
latency_ms = 0
session_idle_secs = 60
"#,
        )
        .unwrap();
        assert_eq!(config.title, "Staging Docs");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.demo.latency_ms, 0);
        assert_eq!(config.demo.session_idle_secs, 60);
        // unset fields keep their defaults
        assert_eq!(config.description, Config::default().description);
        assert_eq!(config.http_server_config().address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_config() {
        let error = parse_config("title = 5").unwrap_err();
        assert!(error.to_string().starts_with("Invalid configuration"), "{error}");
    }

    #[test]
    fn test_load_config_through_pal() {
        let mock = MockPal::new();
        mock.add_file(FilePath::from(CONFIG_FILE), b"[server]\nport = 3000\n".to_vec());
        let pal = PalHandle::new(mock);

        let config = load_config(&pal, &FilePath::from(CONFIG_FILE)).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_missing_config() {
        let pal = PalHandle::new(MockPal::new());
        let path = FilePath::from(CONFIG_FILE);

        assert_eq!(load_config_or_default(&pal, &path).unwrap(), Config::default());

        let error = load_config(&pal, &path).unwrap_err();
        expect!["Failed to read config file giftdocs.toml"].assert_eq(&error.get_context()[0]);
    }

    #[test]
    fn test_validate() {
        let config = Config {
            api_base_url: " ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.demo.session_idle_secs = 0;
        assert!(config.validate().is_err());
    }
}
