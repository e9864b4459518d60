use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Database {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub database: String,
    /// Full connection string; overrides the individual parts when set.
    #[serde(default)]
    pub url: Option<String>,
}

impl Database {
    pub fn url(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.database
            ),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self {
            user: "notes".into(),
            password: "password".into(),
            host: "localhost".into(),
            port: "5432".into(),
            database: "notes".into(),
            url: None,
        }
    }
}

/// Token signing settings. `secret` has no usable default and must be provided.
#[derive(Deserialize, Default)]
pub struct Auth {
    pub secret: String,
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub host: String,
    pub port: u16,
}

impl Http {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Http {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    pub database: Database,
    pub auth: Auth,
    pub http: Http,
}

impl Settings {
    /// Defaults, then `config.toml` if present, then the environment
    /// (`DATABASE_HOST`, `AUTH_SECRET`, `HTTP_PORT`, ...).
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("database.user", "notes")?
            .set_default("database.password", "password")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", "5432")?
            .set_default("database.database", "notes")?
            .set_default("auth.secret", "")?
            .set_default("http.host", "0.0.0.0")?
            .set_default("http.port", 8080)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_"))
            .build()?;

        config.try_deserialize()
    }
}
