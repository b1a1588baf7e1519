//! Session client configuration.
//!
//! The browser build has no process environment, so overrides are baked in at
//! compile time through `option_env!`. Anything unset keeps its default.

pub const DEFAULT_API_BASE: &str = "";
pub const DEFAULT_VERIFY_PATH: &str = "/api/users/verify-token";
pub const DEFAULT_PROFILE_PATH: &str = "/api/users/profile";
pub const DEFAULT_REFRESH_PATH: &str = "/api/users/refresh-token";
pub const DEFAULT_ACCESS_TOKEN_KEY: &str = "accessToken";
pub const DEFAULT_REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const DEFAULT_ADMIN_FLAG_KEY: &str = "isAdminLoggedIn";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_ADMIN_LOGIN_PATH: &str = "/admin/login";
pub const DEFAULT_ROOT_PATH: &str = "/";

/// Errors produced while parsing configuration overrides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A route override did not start with `/`.
    #[error("{key} must be an absolute path, got '{value}'")]
    RelativePath { key: &'static str, value: String },

    /// A storage key override was blank.
    #[error("{key} must not be empty")]
    EmptyValue { key: &'static str },

    /// The log level override is not a `log::LevelFilter` name.
    #[error("unknown STOREFRONT_LOG_LEVEL: {0}")]
    LogLevel(String),
}

/// Durable storage slot names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub access_token: String,
    pub refresh_token: String,
    pub admin_flag: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            access_token: DEFAULT_ACCESS_TOKEN_KEY.to_owned(),
            refresh_token: DEFAULT_REFRESH_TOKEN_KEY.to_owned(),
            admin_flag: DEFAULT_ADMIN_FLAG_KEY.to_owned(),
        }
    }
}

/// Endpoint paths, joined onto `api_base` at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub verify: String,
    pub profile: String,
    pub refresh: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            verify: DEFAULT_VERIFY_PATH.to_owned(),
            profile: DEFAULT_PROFILE_PATH.to_owned(),
            refresh: DEFAULT_REFRESH_PATH.to_owned(),
        }
    }
}

/// Redirect targets used by the guards and the expiry fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub login: String,
    pub admin_login: String,
    pub root: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN_PATH.to_owned(),
            admin_login: DEFAULT_ADMIN_LOGIN_PATH.to_owned(),
            root: DEFAULT_ROOT_PATH.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub endpoints: Endpoints,
    pub storage: StorageKeys,
    pub routes: Routes,
    pub log_level: LogLevel,
}

/// Wrapper so `SessionConfig` can derive `Default` with `Info` as the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub log::LevelFilter);

impl Default for LogLevel {
    fn default() -> Self {
        Self(log::LevelFilter::Info)
    }
}

impl SessionConfig {
    /// Build config by overlaying `STOREFRONT_*` keys from `lookup` onto the
    /// defaults.
    ///
    /// Recognized keys:
    /// - `STOREFRONT_API_BASE`: origin prefix for endpoint paths (default empty, same origin)
    /// - `STOREFRONT_VERIFY_PATH`, `STOREFRONT_PROFILE_PATH`, `STOREFRONT_REFRESH_PATH`
    /// - `STOREFRONT_ACCESS_TOKEN_KEY`, `STOREFRONT_REFRESH_TOKEN_KEY`, `STOREFRONT_ADMIN_FLAG_KEY`
    /// - `STOREFRONT_LOGIN_PATH`, `STOREFRONT_ADMIN_LOGIN_PATH`, `STOREFRONT_ROOT_PATH`
    /// - `STOREFRONT_LOG_LEVEL`: `off`, `error`, `warn`, `info` (default), `debug`, `trace`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a path is relative, a storage key is
    /// blank, or the log level is unknown.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(base) = lookup("STOREFRONT_API_BASE") {
            cfg.endpoints.api_base = base.trim().trim_end_matches('/').to_owned();
        }
        override_path(&lookup, "STOREFRONT_VERIFY_PATH", &mut cfg.endpoints.verify)?;
        override_path(&lookup, "STOREFRONT_PROFILE_PATH", &mut cfg.endpoints.profile)?;
        override_path(&lookup, "STOREFRONT_REFRESH_PATH", &mut cfg.endpoints.refresh)?;

        override_key(&lookup, "STOREFRONT_ACCESS_TOKEN_KEY", &mut cfg.storage.access_token)?;
        override_key(&lookup, "STOREFRONT_REFRESH_TOKEN_KEY", &mut cfg.storage.refresh_token)?;
        override_key(&lookup, "STOREFRONT_ADMIN_FLAG_KEY", &mut cfg.storage.admin_flag)?;

        override_path(&lookup, "STOREFRONT_LOGIN_PATH", &mut cfg.routes.login)?;
        override_path(&lookup, "STOREFRONT_ADMIN_LOGIN_PATH", &mut cfg.routes.admin_login)?;
        override_path(&lookup, "STOREFRONT_ROOT_PATH", &mut cfg.routes.root)?;

        if let Some(raw) = lookup("STOREFRONT_LOG_LEVEL") {
            cfg.log_level = parse_log_level(&raw)?;
        }

        Ok(cfg)
    }

    /// Build config from values captured when the crate was compiled.
    ///
    /// # Errors
    ///
    /// Same as [`SessionConfig::from_lookup`].
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| build_env(key).map(str::to_owned))
    }
}

fn build_env(key: &str) -> Option<&'static str> {
    match key {
        "STOREFRONT_API_BASE" => option_env!("STOREFRONT_API_BASE"),
        "STOREFRONT_VERIFY_PATH" => option_env!("STOREFRONT_VERIFY_PATH"),
        "STOREFRONT_PROFILE_PATH" => option_env!("STOREFRONT_PROFILE_PATH"),
        "STOREFRONT_REFRESH_PATH" => option_env!("STOREFRONT_REFRESH_PATH"),
        "STOREFRONT_ACCESS_TOKEN_KEY" => option_env!("STOREFRONT_ACCESS_TOKEN_KEY"),
        "STOREFRONT_REFRESH_TOKEN_KEY" => option_env!("STOREFRONT_REFRESH_TOKEN_KEY"),
        "STOREFRONT_ADMIN_FLAG_KEY" => option_env!("STOREFRONT_ADMIN_FLAG_KEY"),
        "STOREFRONT_LOGIN_PATH" => option_env!("STOREFRONT_LOGIN_PATH"),
        "STOREFRONT_ADMIN_LOGIN_PATH" => option_env!("STOREFRONT_ADMIN_LOGIN_PATH"),
        "STOREFRONT_ROOT_PATH" => option_env!("STOREFRONT_ROOT_PATH"),
        "STOREFRONT_LOG_LEVEL" => option_env!("STOREFRONT_LOG_LEVEL"),
        _ => None,
    }
}

fn override_path<F>(lookup: &F, key: &'static str, slot: &mut String) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    let value = raw.trim();
    if !value.starts_with('/') {
        return Err(ConfigError::RelativePath { key, value: value.to_owned() });
    }
    value.clone_into(slot);
    Ok(())
}

fn override_key<F>(lookup: &F, key: &'static str, slot: &mut String) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    let value = raw.trim();
    if value.is_empty() {
        return Err(ConfigError::EmptyValue { key });
    }
    value.clone_into(slot);
    Ok(())
}

fn parse_log_level(raw: &str) -> Result<LogLevel, ConfigError> {
    raw.trim()
        .parse::<log::LevelFilter>()
        .map(LogLevel)
        .map_err(|_| ConfigError::LogLevel(raw.to_owned()))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
