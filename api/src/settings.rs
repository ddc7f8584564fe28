use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::sqlite;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub sqlite: sqlite::Settings,
}

impl Settings {
    /// Layers, lowest priority first: built-in defaults, `config/default`,
    /// `config/local`, then `GYM__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name("config/local").required(false))
                .add_source(Environment::with_prefix("GYM").separator("__")),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("sqlite.url", "sqlite://gym.db")?
            .set_default("sqlite.max_connections", 5)?
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_builder(Config::builder()).unwrap();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.sqlite.url, "sqlite://gym.db");
        assert_eq!(settings.sqlite.max_connections, 5);
        assert_eq!(settings.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn file_overrides_defaults() {
        let settings = Settings::from_builder(Config::builder().add_source(File::from_str(
            r#"
            [server]
            port = 8080

            [sqlite]
            url = "sqlite::memory:"
            "#,
            FileFormat::Toml,
        )))
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.sqlite.url, "sqlite::memory:");
    }
}
