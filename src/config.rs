use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::oauth::provider::Provider;

// ---------------------------------------------------------------------------
// Environment override tracking
// ---------------------------------------------------------------------------

/// Tracks which configuration settings are overridden by environment variables.
///
/// The provider diagnostic endpoint reports these so operators can tell
/// whether a client credential came from the file or the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    overrides: HashMap<String, String>,
}

impl EnvOverrides {
    /// Get the env var name that overrides the given setting key.
    pub fn env_var_for(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).map(String::as_str)
    }

    /// Get all overrides as a map of setting key -> env var name.
    pub fn all(&self) -> &HashMap<String, String> {
        &self.overrides
    }

    /// Setting keys under the given prefix, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .overrides
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn record(&mut self, key: &str, env_var: &str) {
        self.overrides.insert(key.to_string(), env_var.to_string());
    }
}

// ---------------------------------------------------------------------------
// Main configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Env var overrides are not serialized to TOML.
    #[serde(skip)]
    pub env_overrides: EnvOverrides,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Application-level settings shared by every provider flow.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Public origin the browser sees, used to derive default callback URLs.
    #[serde(default = "default_public_origin")]
    pub public_origin: String,
    /// Base URL of the backend REST API that performs the code exchange.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Login view; receives a `next` parameter.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Default settings/error view; receives a `message` parameter.
    #[serde(default = "default_error_path")]
    pub error_path: String,
    /// Mark client-side cookies `Secure`.
    #[serde(default)]
    pub cookie_secure: bool,
    /// Clear the stored anti-forgery token right after it is compared.
    #[serde(default = "default_true")]
    pub single_use_state: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_origin: default_public_origin(),
            api_base: default_api_base(),
            login_path: default_login_path(),
            error_path: default_error_path(),
            cookie_secure: false,
            single_use_state: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub linkedin: ProviderConfig,
    #[serde(default)]
    pub twitter: ProviderConfig,
    #[serde(default)]
    pub youtube: ProviderConfig,
    #[serde(default)]
    pub google: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::LinkedIn => &self.linkedin,
            Provider::Twitter => &self.twitter,
            Provider::YouTube => &self.youtube,
            Provider::Google => &self.google,
        }
    }

    pub fn get_mut(&mut self, provider: Provider) -> &mut ProviderConfig {
        match provider {
            Provider::LinkedIn => &mut self.linkedin,
            Provider::Twitter => &mut self.twitter,
            Provider::YouTube => &mut self.youtube,
            Provider::Google => &mut self.google,
        }
    }
}

/// Per-provider OAuth client settings. Everything is optional; a provider
/// with no `client_id` still serves its routes but fails closed.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorize_url: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiation: Option<Initiation>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_redirect: Option<String>,
}

/// Where the anti-forgery token and authorization URL come from.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Initiation {
    /// Token generated locally, URL built from the static template.
    Client,
    /// Token and URL issued by the backend `auth-url` endpoint.
    Backend,
}

impl std::fmt::Display for Initiation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Backend => write!(f, "backend"),
        }
    }
}

impl FromStr for Initiation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "backend" | "server" => Ok(Self::Backend),
            _ => Err(format!("Unknown initiation mode: {s}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_public_origin() -> String {
    "http://localhost:3000".to_string()
}
fn default_api_base() -> String {
    "http://localhost:5000".to_string()
}
fn default_login_path() -> String {
    "/login".to_string()
}
fn default_error_path() -> String {
    "/settings".to_string()
}
const fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

// ---------------------------------------------------------------------------
// Config loading and env overrides
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a TOML file, then apply environment variable
    /// overrides. Any setting prefixed with `BLOOCUBE_` takes precedence over
    /// the file value and is tracked in `env_overrides`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    ///
    /// Every supported setting has a corresponding `BLOOCUBE_*` variable. When
    /// present, the value replaces the file/default value and the setting key
    /// is recorded in `env_overrides`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ov = EnvOverrides::default();

        macro_rules! env_str {
            ($key:expr, $env:expr, $field:expr) => {
                if let Some(val) = lookup($env) {
                    $field = val;
                    ov.record($key, $env);
                }
            };
        }
        macro_rules! env_bool {
            ($key:expr, $env:expr, $field:expr) => {
                if let Some(val) = lookup($env) {
                    $field = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
                    ov.record($key, $env);
                }
            };
        }
        macro_rules! env_parse {
            ($key:expr, $env:expr, $field:expr) => {
                if let Some(val) = lookup($env) {
                    if let Ok(parsed) = val.parse() {
                        $field = parsed;
                        ov.record($key, $env);
                    }
                }
            };
        }
        macro_rules! env_opt_str {
            ($key:expr, $env:expr, $field:expr) => {
                if let Some(val) = lookup($env) {
                    $field = if val.is_empty() { None } else { Some(val) };
                    ov.record($key, $env);
                }
            };
        }

        // -- Server --
        env_str!("server.host", "BLOOCUBE_SERVER_HOST", self.server.host);
        env_parse!("server.port", "BLOOCUBE_SERVER_PORT", self.server.port);
        if let Some(val) = lookup("BLOOCUBE_SERVER_CORS_ORIGINS") {
            self.server.cors_origins = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            ov.record("server.cors_origins", "BLOOCUBE_SERVER_CORS_ORIGINS");
        }

        // -- App --
        env_str!("app.public_origin", "BLOOCUBE_PUBLIC_ORIGIN", self.app.public_origin);
        env_str!("app.api_base", "BLOOCUBE_API_BASE", self.app.api_base);
        env_str!("app.login_path", "BLOOCUBE_LOGIN_PATH", self.app.login_path);
        env_str!("app.error_path", "BLOOCUBE_ERROR_PATH", self.app.error_path);
        env_bool!("app.cookie_secure", "BLOOCUBE_COOKIE_SECURE", self.app.cookie_secure);
        env_bool!(
            "app.single_use_state",
            "BLOOCUBE_SINGLE_USE_STATE",
            self.app.single_use_state
        );

        // -- Providers --
        for provider in Provider::ALL {
            let upper = provider.as_str().to_uppercase();
            let section = format!("providers.{provider}");
            let pc = self.providers.get_mut(provider);

            let env = format!("BLOOCUBE_{upper}_CLIENT_ID");
            env_opt_str!(&format!("{section}.client_id"), &env, pc.client_id);
            let env = format!("BLOOCUBE_{upper}_CLIENT_SECRET");
            env_opt_str!(&format!("{section}.client_secret"), &env, pc.client_secret);
            let env = format!("BLOOCUBE_{upper}_AUTHORIZE_URL");
            env_opt_str!(&format!("{section}.authorize_url"), &env, pc.authorize_url);
            let env = format!("BLOOCUBE_{upper}_CALLBACK_URL");
            env_opt_str!(&format!("{section}.callback_url"), &env, pc.callback_url);
            let env = format!("BLOOCUBE_{upper}_ERROR_REDIRECT");
            env_opt_str!(&format!("{section}.error_redirect"), &env, pc.error_redirect);

            let env = format!("BLOOCUBE_{upper}_INITIATION");
            if let Some(val) = lookup(&env) {
                if let Ok(mode) = val.parse() {
                    pc.initiation = Some(mode);
                    ov.record(&format!("{section}.initiation"), &env);
                }
            }
        }

        // -- Logging --
        env_str!("logging.level", "BLOOCUBE_LOG_LEVEL", self.logging.level);
        env_bool!("logging.json", "BLOOCUBE_LOG_JSON", self.logging.json);

        self.env_overrides = ov;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
