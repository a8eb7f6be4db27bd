use serde::{Serialize, Deserialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::env::runtime::utils::supports_color;

const VERSION: &str = env!("VERSION");

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub debug: bool,
    pub debug_mode: String,
    pub supports_color: bool,
    pub warnings: bool,
    pub rescan_expansions: bool,
    pub expansion_limit: usize,
    pub version: String,
    pub color_scheme: ColorScheme,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ColorScheme {
    pub exception: String,
    pub warning: String,
    pub help: String,
    pub debug: String,
    pub note: String,
    pub output_text: String,
    pub info: String,
}

pub fn default_config() -> Config {
    Config {
        debug: false,
        debug_mode: "normal".to_string(),
        supports_color: supports_color(),
        warnings: true,
        rescan_expansions: false,
        expansion_limit: 10_000,
        version: VERSION.to_string(),
        color_scheme: ColorScheme {
            exception: "#F44350".to_string(),
            warning: "#F5F534".to_string(),
            help: "#21B8DB".to_string(),
            debug: "#434343".to_string(),
            note: "#1CC58B".to_string(),
            output_text: "#BCBEC4".to_string(),
            info: "#9209B3".to_string(),
        },
    }
}

pub fn get_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join("config.json")))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Err(format!("Config file not found: {}", path.display()));
    }
    let mut file = File::open(path).map_err(|e| format!("Failed to open config file: {}", e))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    serde_json::from_str::<Config>(&contents)
        .map_err(|e| format!("Failed to deserialize JSON: {}", e))
}

pub fn load_config_or_default(path: &Path) -> Config {
    load_config(path).unwrap_or_else(|_| default_config())
}

pub fn create_config_file(path: &Path) -> std::io::Result<()> {
    let config_str = serde_json::to_string_pretty(&default_config())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidData, "Failed to serialize config"))?;

    std::fs::write(path, config_str)
}
