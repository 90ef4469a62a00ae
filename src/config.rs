//! Configuration loader and validator for the recycling admin client.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api: Api,
    #[serde(default)]
    pub panel: Panel,
    #[serde(default)]
    pub signup: Signup,
    #[serde(default)]
    pub notify: Notify,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sent verbatim as the `Cookie` header when present.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

/// Transaction panel settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Panel {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
    /// Offset from UTC used when displaying transaction timestamps.
    #[serde(default = "default_display_offset_minutes")]
    pub display_offset_minutes: i32,
}

/// Signup page settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signup {
    #[serde(default = "default_login_page")]
    pub login_page: String,
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notify {
    #[serde(default = "default_notify_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub prevent_duplicates: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_items_per_page() -> u32 {
    10
}

fn default_display_offset_minutes() -> i32 {
    5 * 60 + 30
}

fn default_login_page() -> String {
    "index.html".to_string()
}

fn default_redirect_delay_ms() -> u64 {
    2000
}

fn default_notify_timeout_ms() -> u64 {
    3000
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            display_offset_minutes: default_display_offset_minutes(),
        }
    }
}

impl Default for Signup {
    fn default() -> Self {
        Self {
            login_page: default_login_page(),
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

impl Default for Notify {
    fn default() -> Self {
        Self {
            timeout_ms: default_notify_timeout_ms(),
            prevent_duplicates: false,
        }
    }
}

impl Api {
    /// Parsed base URL; always ends with `/` so relative joins keep the prefix path.
    pub fn url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|_| ConfigError::Invalid("api.base_url must be a valid URL"))
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api.base_url must be non-empty"));
    }
    cfg.api.url()?;
    if cfg.api.timeout_secs == 0 {
        return Err(ConfigError::Invalid("api.timeout_secs must be > 0"));
    }

    if cfg.panel.items_per_page == 0 {
        return Err(ConfigError::Invalid("panel.items_per_page must be > 0"));
    }
    if cfg.panel.display_offset_minutes.abs() >= 24 * 60 {
        return Err(ConfigError::Invalid(
            "panel.display_offset_minutes must be within one day",
        ));
    }

    if cfg.signup.login_page.trim().is_empty() {
        return Err(ConfigError::Invalid("signup.login_page must be non-empty"));
    }

    Ok(())
}

/// Returns a complete example YAML configuration.
pub fn example() -> &'static str {
    r#"api:
  base_url: "http://localhost:5000/"
  timeout_secs: 30
  session_cookie: "session=YOUR_SESSION_COOKIE"

panel:
  items_per_page: 10
  display_offset_minutes: 330

signup:
  login_page: "index.html"
  redirect_delay_ms: 2000

notify:
  timeout_ms: 3000
  prevent_duplicates: true
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.panel.display_offset_minutes, 330);
        assert!(cfg.notify.prevent_duplicates);
    }

    #[test]
    fn sections_other_than_api_are_optional() {
        let cfg: Config = serde_yaml::from_str("api:\n  base_url: \"http://admin.local\"\n").unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.api.session_cookie, None);
        assert_eq!(cfg.panel.items_per_page, 10);
        assert_eq!(cfg.signup.login_page, "index.html");
        assert_eq!(cfg.signup.redirect_delay_ms, 2000);
        assert_eq!(cfg.notify.timeout_ms, 3000);
        assert!(!cfg.notify.prevent_duplicates);
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.api.base_url = "http://host:8080/app".into();
        assert_eq!(cfg.api.url().unwrap().as_str(), "http://host:8080/app/");
    }

    #[test]
    fn invalid_base_url() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.api.base_url = "".into();
        let err = validate(&cfg).unwrap_err();
        match err { ConfigError::Invalid(msg) => assert!(msg.contains("api.base_url")), _ => panic!("wrong error") }

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.api.base_url = "not a url".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn invalid_panel_settings() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.panel.items_per_page = 0;
        let err = validate(&cfg).unwrap_err();
        match err { ConfigError::Invalid(msg) => assert!(msg.contains("items_per_page")), _ => panic!("wrong error") }

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.panel.display_offset_minutes = 24 * 60;
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.api.timeout_secs = 0;
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, example()).unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.api.session_cookie.as_deref(), Some("session=YOUR_SESSION_COOKIE"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let td = tempdir().unwrap();
        let err = load(Some(&td.path().join("missing.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
