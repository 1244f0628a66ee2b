use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::booking::{RequiredFields, SessionTypeOption};
use crate::core::error::ConfigError;
use crate::core::summary::DEFAULT_CURRENCY_SYMBOL;

const CONFIG_DIR_NAME: &str = "coach-booking";
const LOCAL_CONFIG_FILE: &str = "coach-booking.json";
const DATA_DIR_ENV: &str = "COACH_BOOKING_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Where collections are stored, relative to `working_dir` unless absolute
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Session types offered on the first wizard step
    #[serde(default = "default_session_types")]
    pub session_types: Vec<SessionTypeOption>,

    #[serde(default)]
    pub required_fields: RequiredFields,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            data_dir: default_data_dir(),
            session_types: default_session_types(),
            required_fields: RequiredFields::default(),
            currency_symbol: default_currency_symbol(),
            debug: false,
        }
    }
}

fn default_working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_data_dir() -> String {
    ".coach-booking".into()
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.into()
}

pub fn default_session_types() -> Vec<SessionTypeOption> {
    vec![
        SessionTypeOption::new("discovery", "Discovery Call", 0, 30),
        SessionTypeOption::new("individual", "Individual Session", 7500, 45),
        SessionTypeOption::new("followup", "Follow-up Session", 5000, 30),
    ]
}

/// One config file as written. Only the keys present override what was
/// loaded before, so a later file can restore a default value.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    data_dir: Option<String>,
    session_types: Option<Vec<SessionTypeOption>>,
    required_fields: Option<RequiredFields>,
    currency_symbol: Option<String>,
    debug: Option<bool>,
}

/// `<config dir>/coach-booking/config.json`, when the platform has a config dir.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.json"))
}

pub fn load_config(working_dir: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let data_dir_override = std::env::var(DATA_DIR_ENV).ok().filter(|d| !d.is_empty());
    load_config_from(working_dir, global_config_path(), data_dir_override)
}

/// Defaults, then the global file, then `coach-booking.json` in the working
/// directory, then the data dir override.
pub fn load_config_from(
    working_dir: Option<PathBuf>,
    global_path: Option<PathBuf>,
    data_dir_override: Option<String>,
) -> Result<AppConfig, ConfigError> {
    let wd = working_dir.unwrap_or_else(default_working_dir);

    let mut config = AppConfig {
        working_dir: wd.clone(),
        ..AppConfig::default()
    };

    if let Some(global_path) = global_path.filter(|p| p.exists()) {
        merge_config(&mut config, read_config_file(&global_path)?);
    }

    let local_path = wd.join(LOCAL_CONFIG_FILE);
    if local_path.exists() {
        merge_config(&mut config, read_config_file(&local_path)?);
    }

    if let Some(dir) = data_dir_override {
        config.data_dir = dir;
    }

    validate(&config)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::File(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| ConfigError::Invalid(format!("{}: {e}", path.display())))
}

fn merge_config(base: &mut AppConfig, overlay: ConfigFile) {
    if let Some(data_dir) = overlay.data_dir {
        base.data_dir = data_dir;
    }
    if let Some(session_types) = overlay.session_types {
        base.session_types = session_types;
    }
    if let Some(required_fields) = overlay.required_fields {
        base.required_fields = required_fields;
    }
    if let Some(currency_symbol) = overlay.currency_symbol {
        base.currency_symbol = currency_symbol;
    }
    if let Some(debug) = overlay.debug {
        base.debug = debug;
    }
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.session_types.is_empty() {
        return Err(ConfigError::Invalid(
            "at least one session type must be configured".into(),
        ));
    }
    let mut seen = std::collections::HashSet::new();
    for option in &config.session_types {
        if option.type_id.trim().is_empty() {
            return Err(ConfigError::Invalid("session type with empty id".into()));
        }
        if !seen.insert(option.type_id.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate session type '{}'",
                option.type_id
            )));
        }
    }
    Ok(())
}

impl AppConfig {
    pub fn data_path(&self) -> PathBuf {
        self.working_dir.join(&self.data_dir)
    }

    pub fn session_type(&self, type_id: &str) -> Option<&SessionTypeOption> {
        self.session_types.iter().find(|t| t.type_id == type_id)
    }
}
