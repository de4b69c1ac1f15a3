use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use log::warn;
use serde::Deserialize;

/// Environment variable pointing at an alternative config file.
const CONFIG_PATH_VAR: &str = "ADDRESS_COLLECTOR_CONFIG";
/// Default config file basename, resolved by the `config` crate
/// against the working directory (yaml/toml/json all accepted).
const DEFAULT_CONFIG_NAME: &str = "address-collector";

const DEFAULT_GENERATOR_COUNT: usize = 10;

/// All runtime settings, loaded once at startup and passed by reference
/// from there on.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub api: ApiSettings,
    /// Number of generation attempts per run. Read separately from the
    /// rest so an unparsable value degrades to the default instead of
    /// failing the whole load.
    #[serde(skip)]
    pub generator_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub filename: String,
    pub sheet_name: String,
    pub columns: ColumnNames,
}

/// Header strings for the output sheet, in column order.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
    pub full_address: String,
    pub full_json: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub url: String,
    pub content_type: String,
    pub request: RequestBody,
    pub response: ResponseKeys,
}

/// The three key/value pairs posted as the JSON request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestBody {
    pub city_key: String,
    pub city_value: String,
    pub method_key: String,
    pub method_value: String,
    pub path_key: String,
    pub path_value: String,
}

/// JSON key names for picking the address fields out of a response.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResponseKeys {
    pub root: String,
    pub province: String,
    pub city: String,
    pub county: String,
    pub address: String,
}

impl Settings {
    /// Load settings from the default file location (overridable via
    /// `ADDRESS_COLLECTOR_CONFIG`) merged with environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::load_from(Path::new(&path)),
            Err(_) => Self::from_config(
                Config::builder()
                    .add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false))
                    .add_source(Environment::with_prefix("ADDRESS_COLLECTOR").separator("__"))
                    .build()?,
            ),
        }
    }

    /// Load settings from an explicit config file path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::from_config(
            Config::builder()
                .add_source(File::from(path))
                .add_source(Environment::with_prefix("ADDRESS_COLLECTOR").separator("__"))
                .build()?,
        )
    }

    fn from_config(cfg: Config) -> anyhow::Result<Self> {
        let generator_count = match cfg.get_string("generator_count") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(
                    "cannot parse generator_count [{}], falling back to [{}]",
                    raw, DEFAULT_GENERATOR_COUNT
                );
                DEFAULT_GENERATOR_COUNT
            }),
            Err(_) => DEFAULT_GENERATOR_COUNT,
        };
        let mut settings: Settings = cfg.try_deserialize()?;
        settings.generator_count = generator_count;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: OutputSettings::default(),
            api: ApiSettings::default(),
            generator_count: DEFAULT_GENERATOR_COUNT,
        }
    }
}

impl OutputSettings {
    /// Full path of the output workbook.
    pub fn target_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            filename: "addresses.xlsx".to_string(),
            sheet_name: "addresses".to_string(),
            columns: ColumnNames::default(),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            province: "province".to_string(),
            city: "city".to_string(),
            county: "county".to_string(),
            address: "address".to_string(),
            full_address: "full_address".to_string(),
            full_json: "full_json".to_string(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/api/address".to_string(),
            content_type: "application/json;charset=UTF-8".to_string(),
            request: RequestBody::default(),
            response: ResponseKeys::default(),
        }
    }
}

impl Default for RequestBody {
    fn default() -> Self {
        Self {
            city_key: "city".to_string(),
            city_value: String::new(),
            method_key: "method".to_string(),
            method_value: "generate".to_string(),
            path_key: "path".to_string(),
            path_value: String::new(),
        }
    }
}

impl Default for ResponseKeys {
    fn default() -> Self {
        Self {
            root: "address".to_string(),
            province: "province".to_string(),
            city: "city".to_string(),
            county: "county".to_string(),
            address: "address".to_string(),
        }
    }
}
