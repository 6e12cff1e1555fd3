use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Distinguishes runtime behavior for different stages of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Process-level configuration read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub settings_path: PathBuf,
    pub debug_limit_off: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let settings_path = env::var("SYNC_SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("settings.yaml"));

        let debug_limit_off = match env::var("SYNC_DEBUG_LIMIT_OFF") {
            Ok(raw) => Some(parse_flag(&raw).ok_or(ConfigError::InvalidDebugFlag)?),
            Err(_) => None,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            settings_path,
            debug_limit_off,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Typed contents of the settings file.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub settings: GeneralSettings,
    #[serde(default)]
    pub data_source: DataSourceSettings,
    #[serde(default)]
    pub travel_click: Option<TravelClickSettings>,
    #[serde(default)]
    pub aero_club: Option<AeroClubSettings>,
}

impl SyncSettings {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(raw).map_err(ConfigError::SettingsFormat)
    }

    pub fn travel_click(&self) -> Result<&TravelClickSettings, ConfigError> {
        self.travel_click
            .as_ref()
            .ok_or(ConfigError::MissingSection("travel_click"))
    }

    pub fn aero_club(&self) -> Result<&AeroClubSettings, ConfigError> {
        self.aero_club
            .as_ref()
            .ok_or(ConfigError::MissingSection("aero_club"))
    }

    /// Applies the environment override of the debug flag, if any.
    pub fn apply_overrides(&mut self, config: &AppConfig) {
        if let Some(flag) = config.debug_limit_off {
            self.settings.debug_limit_off = flag;
        }
    }
}

/// Run-wide switches and proxy endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralSettings {
    /// Disables minimum limits, sends one record per company, and masks personal data.
    #[serde(default)]
    pub debug_limit_off: bool,
    #[serde(default)]
    pub proxy_ip: Option<String>,
    #[serde(default)]
    pub proxy_discovery_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSourceSettings {
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for DataSourceSettings {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

/// JSON agency: one extract for the whole agency, grouped per company.
#[derive(Debug, Clone, Deserialize)]
pub struct TravelClickSettings {
    pub url: String,
    pub username: String,
    pub password: String,
    pub min_counter: usize,
    pub stored_proc: String,
    pub new_user: NewUserSettings,
    pub travel_dev: DevEndpoint,
    #[serde(default)]
    pub companies: Vec<TravelCompany>,
}

/// Credentials and policies attached to the `auth` block of every employee.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUserSettings {
    pub password: String,
    pub holding_user_role: String,
    pub holding_user_policy: String,
    pub other_user_policy: String,
}

/// Endpoint used instead of production while the debug flag is on.
#[derive(Debug, Clone, Deserialize)]
pub struct DevEndpoint {
    pub url: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TravelCompany {
    pub key: String,
    pub id: String,
    #[serde(default)]
    pub confirm: bool,
    #[serde(default)]
    pub full_update: bool,
    #[serde(default)]
    pub increment_update: bool,
}

/// XML agency: every company has its own extract and minimum.
#[derive(Debug, Clone, Deserialize)]
pub struct AeroClubSettings {
    pub url: String,
    pub source_url: String,
    pub user_agent: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub companies: Vec<AeroCompany>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AeroCompany {
    pub key: String,
    pub id: String,
    pub min_counter: usize,
    pub stored_proc: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDebugFlag,
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },
    SettingsFormat(serde_yaml::Error),
    MissingSection(&'static str),
    MissingSetting(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDebugFlag => {
                write!(f, "SYNC_DEBUG_LIMIT_OFF must be a boolean flag")
            }
            ConfigError::SettingsIo { path, .. } => {
                write!(f, "unable to read settings file '{}'", path.display())
            }
            ConfigError::SettingsFormat(err) => write!(f, "invalid settings file: {}", err),
            ConfigError::MissingSection(section) => {
                write!(f, "settings file has no '{}' section", section)
            }
            ConfigError::MissingSetting(name) => {
                write!(f, "setting '{}' is required for the selected mode", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::SettingsIo { source, .. } => Some(source),
            ConfigError::SettingsFormat(err) => Some(err),
            ConfigError::InvalidDebugFlag
            | ConfigError::MissingSection(_)
            | ConfigError::MissingSetting(_) => None,
        }
    }
}
