use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

mod watch;

pub use watch::watch;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default, alias = "Global")]
    pub global: GlobalConfig,
    #[serde(default, alias = "Server")]
    pub server: ServerConfig,
    #[serde(default, alias = "Database")]
    pub database: DatabaseConfig,
    #[serde(default, alias = "Oauth")]
    pub oauth: OauthConfig,
    #[serde(default, alias = "Cors")]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GlobalConfig {
    #[serde(default = "default_log_level", alias = "LogLevel")]
    pub log_level: String,
    /// `compact` or `json`
    #[serde(default = "default_log_format", alias = "LogFormat")]
    pub log_format: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self { log_level: default_log_level(), log_format: default_log_format() }
    }
}

fn default_log_level() -> String { "INFO".into() }
fn default_log_format() -> String { "compact".into() }

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host", alias = "Host")]
    pub host: String,
    #[serde(default = "default_port", alias = "Port")]
    pub port: u16,
    #[serde(default, alias = "WorkerThreads")]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_read_timeout", alias = "ReadTimeout")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_write_timeout", alias = "WriteTimeout")]
    pub write_timeout_secs: u64,
    /// Poll interval of the config file watcher.
    #[serde(default = "default_reload_interval", alias = "ReloadInterval")]
    pub reload_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            read_timeout_secs: default_read_timeout(),
            write_timeout_secs: default_write_timeout(),
            reload_interval_secs: default_reload_interval(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8080 }
fn default_read_timeout() -> u64 { 15 }
fn default_write_timeout() -> u64 { 300 }
fn default_reload_interval() -> u64 { 5 }

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host", alias = "Host")]
    pub host: String,
    #[serde(default = "default_db_port", alias = "Port")]
    pub port: u16,
    #[serde(default, alias = "Username")]
    pub username: String,
    #[serde(default, alias = "Password")]
    pub password: String,
    #[serde(default, alias = "Database")]
    pub database: String,
    #[serde(default = "default_ssl_mode", alias = "SSLMode")]
    pub ssl_mode: String,
    #[serde(default = "default_timezone", alias = "Timezone")]
    pub timezone: String,
    /// Full connection URL; takes precedence over the individual fields.
    #[serde(default, alias = "Url")]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            username: String::new(),
            password: String::new(),
            database: String::new(),
            ssl_mode: default_ssl_mode(),
            timezone: default_timezone(),
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_db_host() -> String { "localhost".into() }
fn default_db_port() -> u16 { 5432 }
fn default_ssl_mode() -> String { "disable".into() }
fn default_timezone() -> String { "UTC".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }

/// OpenID Connect issuer used to verify bearer tokens.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct OauthConfig {
    /// Client id whose `resource_access` roles are honoured.
    #[serde(default, alias = "Service")]
    pub service: String,
    #[serde(default, alias = "Url")]
    pub url: String,
    #[serde(default, alias = "Realm")]
    pub realm: String,
    #[serde(default, alias = "FullCertsPath")]
    pub full_certs_path: Option<String>,
    #[serde(default, alias = "DisableSecurityCheck")]
    pub disable_security_check: bool,
}

impl OauthConfig {
    pub fn issuer(&self) -> String {
        format!("{}/realms/{}", self.url.trim_end_matches('/'), self.realm)
    }

    pub fn certs_url(&self) -> String {
        match &self.full_certs_path {
            Some(p) if !p.trim().is_empty() => p.clone(),
            _ => format!("{}/protocol/openid-connect/certs", self.issuer()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CorsConfig {
    #[serde(default = "default_origins", alias = "AllowedOrigins")]
    pub allowed_origins: Vec<String>,
    #[serde(default, alias = "AllowCredentials")]
    pub allow_credentials: bool,
    #[serde(default = "default_headers", alias = "AllowedHeaders")]
    pub allowed_headers: Vec<String>,
    #[serde(default = "default_methods", alias = "AllowedMethods")]
    pub allowed_methods: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_origins(),
            allow_credentials: false,
            allowed_headers: default_headers(),
            allowed_methods: default_methods(),
        }
    }
}

fn default_origins() -> Vec<String> { vec!["*".into()] }
fn default_headers() -> Vec<String> { vec!["Authorization".into(), "Content-Type".into()] }
fn default_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"].iter().map(|m| m.to_string()).collect()
}

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("cannot read config file {}: {}", path, e))?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.oauth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.read_timeout_secs == 0 || self.write_timeout_secs == 0 {
            return Err(anyhow!("server timeouts must be positive seconds"));
        }
        if self.reload_interval_secs == 0 {
            self.reload_interval_secs = default_reload_interval();
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        let missing = self.url.as_deref().map(|u| u.trim().is_empty()).unwrap_or(true);
        if missing {
            self.url = std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty());
        }
    }

    /// Explicit URL if configured, otherwise composed from the discrete fields.
    /// Credentials are percent-encoded.
    pub fn connection_url(&self) -> String {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return url.to_string();
        }
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}&options=-c%20TimeZone%3D{}",
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.database,
            self.ssl_mode,
            urlencoding::encode(&self.timezone)
        )
    }

    pub fn validate(&self) -> Result<()> {
        match self.url.as_deref() {
            Some(url) => {
                let lower = url.to_lowercase();
                if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
                    return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
                }
            }
            None => {
                if self.host.trim().is_empty() || self.database.trim().is_empty() {
                    return Err(anyhow!("database.host and database.database are required when database.url is not set"));
                }
                if self.port == 0 {
                    return Err(anyhow!("database.port must be within 1..=65535"));
                }
            }
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl OauthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.disable_security_check {
            return Ok(());
        }
        if self.url.trim().is_empty() || self.realm.trim().is_empty() {
            return Err(anyhow!("oauth.url and oauth.realm are required unless oauth.disable_security_check is set"));
        }
        Ok(())
    }
}
