use std::path::Path;

use rsvp_core::AddEncoding;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Deployed script URL. Unset means unconfigured mode.
    pub endpoint_url: Option<String>,

    /// Admin code; `"1"` is accepted when unset.
    pub admin_secret: Option<String>,

    /// `query` (GET, older script) or `json` (POST, newer script).
    #[serde(default = "default_add_encoding")]
    pub add_encoding: String,

    /// Whole-request timeout. None waits indefinitely, like the browser.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_add_encoding() -> String {
    "query".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl StoreConfig {
    pub fn encoding(&self) -> Result<AddEncoding, config::ConfigError> {
        match self.add_encoding.to_ascii_lowercase().as_str() {
            "query" | "get" => Ok(AddEncoding::Query),
            "json" | "post" => Ok(AddEncoding::JsonBody),
            other => Err(config::ConfigError::Message(format!(
                "store.add_encoding must be \"query\" or \"json\", got {other:?}"
            ))),
        }
    }
}

impl AppConfig {
    /// Load configuration from (in order of precedence, lowest first):
    /// 1. `rsvp.toml` in the working directory, or `path` when given
    /// 2. Environment variables with `RSVP__` prefix
    ///    (e.g. `RSVP__STORE__ENDPOINT_URL`)
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("rsvp").required(false),
        };
        let config = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("RSVP").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Configuration from built-in defaults plus `overrides`, without
    /// touching the file system or environment.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [store]
            add_encoding = "query"

            [logging]
            level = "warn"
            format = "pretty"
        "#;

        let mut builder =
            config::Config::builder().add_source(config::File::from_str(defaults, config::FileFormat::Toml));
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        self.store.encoding()?;
        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(config::ConfigError::Message(format!(
                "logging.format must be \"pretty\" or \"json\", got {other:?}"
            ))),
        }
    }
}
