//! Runtime configuration: defaults, an optional TOML file, then environment
//! overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "RADFORM_CONFIG";

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid hardcoded regex")
});

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Config`].
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    /// The target table is not a plain SQL identifier.
    #[error("invalid table name: {0:?}")]
    InvalidTable(String),

    /// TLS was requested but the Row Store only connects in plaintext.
    #[error("ssl_disabled = false is not supported: connections are made without TLS")]
    TlsUnsupported,
}

/// Connection settings for the Row Store.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    /// Table receiving the `(username, wan_ip, speed, password)` row.
    pub table: String,
    /// Must stay `true`; there is no TLS connector.
    pub ssl_disabled: bool,
    /// Limit on each connection attempt at startup; `0` waits forever.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: String::new(),
            dbname: "radius".into(),
            table: "usergroup".into(),
            ssl_disabled: true,
            connect_timeout_secs: 10,
        }
    }
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("table", &self.table)
            .field("ssl_disabled", &self.ssl_disabled)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl DatabaseConfig {
    /// Renders a libpq-style key/value connection string.
    ///
    /// TLS is always disabled; [`Config::load_with`] rejects configs that ask
    /// for it.
    pub fn connection_string(&self) -> String {
        let mut conn = format!(
            "host={} port={} user={} password={} dbname={} sslmode=disable",
            quote(&self.host),
            self.port,
            quote(&self.user),
            quote(&self.password),
            quote(&self.dbname),
        );
        if self.connect_timeout_secs > 0 {
            conn.push_str(&format!(" connect_timeout={}", self.connect_timeout_secs));
        }
        conn
    }

    /// `user@host:port/dbname`, for log lines.
    pub fn target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.dbname)
    }
}

/// Quotes a connection string value when it is empty or contains characters
/// that would end the value early.
fn quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: DatabaseConfig,
    /// Upper bound on a single insert; `0` waits forever.
    pub insert_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            insert_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads configuration from the default file location and the process
    /// environment.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |var: &str| std::env::var(var).ok();
        let path = lookup(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .or_else(default_config_path);
        Self::load_with(path.as_deref(), lookup)
    }

    /// Loads configuration from `path` (if it exists), then applies overrides
    /// from `lookup`.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                log::info!("loading config from {}", path.display());
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            _ => {
                log::info!("no config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. Missing keys fall back to defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `RADFORM_*` overrides.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let db = &mut self.database;
        if let Some(v) = lookup("RADFORM_DB_HOST") {
            db.host = v;
        }
        if let Some(v) = lookup("RADFORM_DB_PORT") {
            db.port = parse_env("RADFORM_DB_PORT", v)?;
        }
        if let Some(v) = lookup("RADFORM_DB_USER") {
            db.user = v;
        }
        if let Some(v) = lookup("RADFORM_DB_PASSWORD") {
            db.password = v;
        }
        if let Some(v) = lookup("RADFORM_DB_NAME") {
            db.dbname = v;
        }
        if let Some(v) = lookup("RADFORM_DB_TABLE") {
            db.table = v;
        }
        if let Some(v) = lookup("RADFORM_DB_SSL_DISABLED") {
            db.ssl_disabled = parse_env("RADFORM_DB_SSL_DISABLED", v)?;
        }
        if let Some(v) = lookup("RADFORM_DB_CONNECT_TIMEOUT_SECS") {
            db.connect_timeout_secs = parse_env("RADFORM_DB_CONNECT_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("RADFORM_INSERT_TIMEOUT_SECS") {
            self.insert_timeout_secs = parse_env("RADFORM_INSERT_TIMEOUT_SECS", v)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !IDENTIFIER_RE.is_match(&self.database.table) {
            return Err(ConfigError::InvalidTable(self.database.table.clone()));
        }
        if !self.database.ssl_disabled {
            return Err(ConfigError::TlsUnsupported);
        }
        Ok(())
    }

    /// The insert timeout, or `None` when disabled.
    pub fn insert_timeout(&self) -> Option<Duration> {
        (self.insert_timeout_secs > 0).then(|| Duration::from_secs(self.insert_timeout_secs))
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

/// `<XDG config dir>/radform/config.toml`.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("radform").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        env(&[])
    }

    mod toml_file {
        use super::*;

        #[test]
        fn empty_document_is_default() {
            assert_eq!(Config::from_toml("").unwrap(), Config::default());
        }

        #[test]
        fn partial_database_section() {
            let config = Config::from_toml(
                r#"
                insert_timeout_secs = 5

                [database]
                host = "db.internal"
                user = "finn"
                "#,
            )
            .unwrap();
            assert_eq!(config.insert_timeout_secs, 5);
            assert_eq!(config.database.host, "db.internal");
            assert_eq!(config.database.user, "finn");
            assert_eq!(config.database.port, 5432);
            assert_eq!(config.database.table, "usergroup");
        }

        #[test]
        fn unknown_key_is_rejected() {
            let err = Config::from_toml("[database]\nhostname = \"x\"").unwrap_err();
            assert!(matches!(err, ConfigError::Toml(_)));
        }

        #[test]
        fn load_with_reads_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.toml");
            fs::write(&path, "[database]\ndbname = \"tuitest\"\n").unwrap();
            let config = Config::load_with(Some(path.as_path()), no_env()).unwrap();
            assert_eq!(config.database.dbname, "tuitest");
        }

        #[test]
        fn load_with_missing_file_uses_defaults() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("absent.toml");
            let config = Config::load_with(Some(path.as_path()), no_env()).unwrap();
            assert_eq!(config, Config::default());
        }

        #[test]
        fn load_with_no_path_uses_defaults() {
            let config = Config::load_with(None, no_env()).unwrap();
            assert_eq!(config, Config::default());
        }
    }

    mod env_overrides {
        use super::*;

        #[test]
        fn all_overrides_apply() {
            let mut config = Config::default();
            config
                .apply_env(env(&[
                    ("RADFORM_DB_HOST", "10.0.0.5"),
                    ("RADFORM_DB_PORT", "6543"),
                    ("RADFORM_DB_USER", "radius"),
                    ("RADFORM_DB_PASSWORD", "s3cret"),
                    ("RADFORM_DB_NAME", "radiusdb"),
                    ("RADFORM_DB_TABLE", "radusergroup"),
                    ("RADFORM_DB_SSL_DISABLED", "false"),
                    ("RADFORM_DB_CONNECT_TIMEOUT_SECS", "3"),
                    ("RADFORM_INSERT_TIMEOUT_SECS", "0"),
                ]))
                .unwrap();
            let db = &config.database;
            assert_eq!(db.host, "10.0.0.5");
            assert_eq!(db.port, 6543);
            assert_eq!(db.user, "radius");
            assert_eq!(db.password, "s3cret");
            assert_eq!(db.dbname, "radiusdb");
            assert_eq!(db.table, "radusergroup");
            assert!(!db.ssl_disabled);
            assert_eq!(db.connect_timeout_secs, 3);
            assert_eq!(config.insert_timeout(), None);
        }

        #[test]
        fn env_wins_over_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.toml");
            fs::write(&path, "[database]\nhost = \"from-file\"\n").unwrap();
            let config =
                Config::load_with(Some(path.as_path()), env(&[("RADFORM_DB_HOST", "from-env")])).unwrap();
            assert_eq!(config.database.host, "from-env");
        }

        #[test]
        fn bad_port_is_reported() {
            let mut config = Config::default();
            let err = config
                .apply_env(env(&[("RADFORM_DB_PORT", "http")]))
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidEnv { var: "RADFORM_DB_PORT", .. }
            ));
        }

        #[test]
        fn bad_table_is_rejected() {
            let err = Config::load_with(
                None,
                env(&[("RADFORM_DB_TABLE", "usergroup; drop table x")]),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTable(_)));
        }

        #[test]
        fn ssl_enabled_is_rejected() {
            let err = Config::load_with(None, env(&[("RADFORM_DB_SSL_DISABLED", "false")]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::TlsUnsupported));
        }

        #[test]
        fn ssl_enabled_in_file_is_rejected() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("config.toml");
            fs::write(&path, "[database]\nssl_disabled = false\n").unwrap();
            let err = Config::load_with(Some(path.as_path()), no_env()).unwrap_err();
            assert!(matches!(err, ConfigError::TlsUnsupported));
        }
    }

    mod connection_string {
        use super::*;

        #[test]
        fn default_disables_ssl() {
            let db = DatabaseConfig {
                password: "1234".into(),
                ..DatabaseConfig::default()
            };
            assert_eq!(
                db.connection_string(),
                "host=localhost port=5432 user=postgres password=1234 dbname=radius \
                 sslmode=disable connect_timeout=10"
            );
        }

        #[test]
        fn parses_as_plaintext_with_connect_timeout() {
            let parsed: tokio_postgres::Config =
                DatabaseConfig::default().connection_string().parse().unwrap();
            assert_eq!(parsed.get_ssl_mode(), tokio_postgres::config::SslMode::Disable);
            assert_eq!(
                parsed.get_connect_timeout(),
                Some(&Duration::from_secs(10))
            );
        }

        #[test]
        fn zero_connect_timeout_is_omitted() {
            let db = DatabaseConfig {
                connect_timeout_secs: 0,
                ..DatabaseConfig::default()
            };
            assert!(!db.connection_string().contains("connect_timeout"));
            let parsed: tokio_postgres::Config = db.connection_string().parse().unwrap();
            assert_eq!(parsed.get_connect_timeout(), None);
        }

        #[test]
        fn empty_password_is_quoted() {
            let db = DatabaseConfig::default();
            assert!(db.connection_string().contains("password=''"));
        }

        #[test]
        fn awkward_password_is_escaped() {
            let db = DatabaseConfig {
                password: r"it's a \pass".into(),
                ..DatabaseConfig::default()
            };
            assert!(
                db.connection_string()
                    .contains(r"password='it\'s a \\pass'")
            );
        }

        #[test]
        fn debug_redacts_password() {
            let db = DatabaseConfig {
                password: "topsecret".into(),
                ..DatabaseConfig::default()
            };
            let debug = format!("{db:?}");
            assert!(!debug.contains("topsecret"));
            assert!(debug.contains("<redacted>"));
        }

        #[test]
        fn target_omits_password() {
            let db = DatabaseConfig {
                password: "topsecret".into(),
                ..DatabaseConfig::default()
            };
            assert_eq!(db.target(), "postgres@localhost:5432/radius");
        }
    }
}
