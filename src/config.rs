use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Path to the serialized scaler + classifier bundle
    #[serde(default = "default_model_path")]
    pub path: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

fn default_model_path() -> String { "models/sleep_model.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SLEEP__)
    /// 5. MODEL_PATH, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SLEEP__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        apply_overrides(settings)?.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("SLEEP")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply direct environment overrides that don't follow the SLEEP__ scheme
fn apply_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(model_path) = std::env::var("MODEL_PATH") {
        builder = builder.set_override("model.path", model_path)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Tests that read or write the process environment run one at a time
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Run `f` with the given variables set (or removed for `None`), then restore them
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
            .collect();

        for (key, value) in vars {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }

        f();

        for (key, value) in saved {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }

    fn config_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\nworkers = 2\n\n[model]\npath = \"/srv/models/dtc.json\"\n"
        )
        .unwrap();
        file
    }

    #[test]
    fn test_default_settings() {
        let server = ServerSettings::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8000);
        assert!(server.workers.is_none());

        assert_eq!(ModelSettings::default().path, "models/sleep_model.json");
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let file = config_file();

        with_env(&[("MODEL_PATH", None), ("SLEEP__SERVER__PORT", None)], || {
            let settings = Settings::load_from(file.path()).unwrap();
            assert_eq!(settings.server.port, 9100);
            assert_eq!(settings.server.workers, Some(2));
            assert_eq!(settings.server.host, "0.0.0.0");
            assert_eq!(settings.logging.format, "json");
            assert_eq!(settings.model.path, "/srv/models/dtc.json");
        });
    }

    #[test]
    fn test_model_path_env_override() {
        let file = config_file();

        with_env(&[("MODEL_PATH", Some("/opt/bundles/override.json"))], || {
            let settings = Settings::load_from(file.path()).unwrap();
            assert_eq!(settings.model.path, "/opt/bundles/override.json");
        });
    }

    #[test]
    fn test_prefixed_env_override() {
        let file = config_file();

        with_env(
            &[
                ("MODEL_PATH", None),
                ("SLEEP__SERVER__PORT", Some("9200")),
                ("SLEEP__LOGGING__FORMAT", Some("pretty")),
            ],
            || {
                let settings = Settings::load_from(file.path()).unwrap();
                assert_eq!(settings.server.port, 9200);
                assert_eq!(settings.logging.format, "pretty");
                assert_eq!(settings.model.path, "/srv/models/dtc.json");
            },
        );
    }
}
