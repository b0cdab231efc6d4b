use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use leadline_core::{CountryCode, LabelColor, LabelName, LabelPolicy};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "leadline";
const CONFIG_FILENAME: &str = "config.toml";

pub const API_TOKEN_ENV: &str = "LEADLINE_API_TOKEN";
pub const DEFAULT_BASE_URL: &str = "https://api.pipedrive.com/v1";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub crm: CrmConfig,
    pub country_code: CountryCode,
    pub label: LabelConfig,
    pub stages: StagesConfig,
}

#[derive(Debug, Clone)]
pub struct CrmConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct LabelConfig {
    pub name: LabelName,
    pub color: LabelColor,
    pub policy: LabelPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagesConfig {
    pub notes: bool,
    pub label: bool,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            notes: true,
            label: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            crm: CrmConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_token: None,
                timeout_secs: None,
            },
            country_code: CountryCode::default(),
            label: LabelConfig::default(),
            stages: StagesConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn api_token(&self) -> Result<&str> {
        self.crm
            .api_token
            .as_deref()
            .ok_or(ConfigError::MissingApiToken)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("missing CRM api token (set crm.api_token or LEADLINE_API_TOKEN)")]
    MissingApiToken,
    #[error("invalid crm.base_url value: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid crm.timeout_secs value: {0}")]
    InvalidTimeout(u64),
    #[error("invalid country_code value: {0}")]
    InvalidCountryCode(String),
    #[error("invalid label.name value: {0:?}")]
    InvalidLabelName(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    country_code: Option<String>,
    crm: Option<CrmFile>,
    label: Option<LabelFile>,
    stages: Option<StagesFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CrmFile {
    base_url: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LabelFile {
    name: Option<String>,
    color: Option<LabelColor>,
    policy: Option<LabelPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StagesFile {
    notes: Option<bool>,
    label: Option<bool>,
}

/// Loads the config file, then applies [`API_TOKEN_ENV`] on top.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let mut config = load_file(config_path)?;
    apply_env_token(&mut config, env::var(API_TOKEN_ENV).ok());
    Ok(config)
}

fn load_file(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(code) = parsed.country_code {
        config.country_code =
            CountryCode::new(&code).map_err(|_| ConfigError::InvalidCountryCode(code))?;
    }

    if let Some(crm) = parsed.crm {
        if let Some(raw) = crm.base_url {
            config.crm.base_url = parse_base_url(&raw)?;
        }
        if let Some(token) = crm.api_token {
            config.crm.api_token = non_blank(token);
        }
        if let Some(timeout) = crm.timeout_secs {
            if timeout == 0 {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
            config.crm.timeout_secs = Some(timeout);
        }
    }

    if let Some(label) = parsed.label {
        if let Some(name) = label.name {
            config.label.name =
                LabelName::new(&name).map_err(|_| ConfigError::InvalidLabelName(name))?;
        }
        if let Some(color) = label.color {
            config.label.color = color;
        }
        if let Some(policy) = label.policy {
            config.label.policy = policy;
        }
    }

    if let Some(stages) = parsed.stages {
        if let Some(notes) = stages.notes {
            config.stages.notes = notes;
        }
        if let Some(label) = stages.label {
            config.stages.label = label;
        }
    }

    Ok(config)
}

fn apply_env_token(config: &mut AppConfig, token: Option<String>) {
    if let Some(token) = token.and_then(non_blank) {
        config.crm.api_token = Some(token);
    }
}

/// Plain http is only accepted for loopback hosts.
fn parse_base_url(raw: &str) -> Result<String> {
    let invalid = || ConfigError::InvalidBaseUrl(raw.to_string());
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    match url.scheme() {
        "https" => {}
        "http" if is_loopback(&url) => {}
        _ => return Err(invalid()),
    }
    if url.host_str().is_none() || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url.to_string())
}

fn is_loopback(url: &Url) -> bool {
    matches!(
        url.host_str(),
        Some("localhost") | Some("127.0.0.1") | Some("[::1]")
    )
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
