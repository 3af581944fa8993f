use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::PacknoteError;

pub const CONFIG_FILE_NAME: &str = "packnote.config";

/// The party printed in the "From" block of every packing note.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Sender {
    pub name: String,
    pub address_lines: Vec<String>,
    pub gstin: String,
    pub phone: String,
}

impl Default for Sender {
    fn default() -> Self {
        Self {
            name: "MADHUR MILAN SILK".into(),
            address_lines: vec![
                "No.29/1, 2nd floor,Sri Balaji Complex,".into(),
                "Appaji rao lane,S.D.D. Road Cross,".into(),
                "BENGALURU-560002".into(),
            ],
            gstin: "29AGJPR1392P1ZH".into(),
            phone: "080-41144941".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PacknoteConfig {
    pub data_file: PathBuf,
    pub output_dir: PathBuf,
    pub sender: Sender,
}

impl Default for PacknoteConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("Master.json"),
            output_dir: PathBuf::from("."),
            sender: Sender::default(),
        }
    }
}

impl PacknoteConfig {
    pub fn from_toml(s: &str) -> Result<Self, PacknoteError> {
        Ok(toml::from_str(s)?)
    }
}

/// Candidate config locations, most specific first.
fn config_candidates() -> Result<Vec<PathBuf>, PacknoteError> {
    let mut candidates = vec![std::env::current_dir()?.join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("packnote").join(CONFIG_FILE_NAME));
    }
    Ok(candidates)
}

fn read_config(path: &Path) -> Result<PacknoteConfig, PacknoteError> {
    let config = std::fs::read_to_string(path).map_err(|e| PacknoteError::file(path, e))?;
    PacknoteConfig::from_toml(&config)
}

pub fn parse_config() -> Result<PacknoteConfig, PacknoteError> {
    for path in config_candidates()? {
        if path.exists() {
            info!(path = %path.display(), "using config file");
            return read_config(&path);
        }
        debug!(path = %path.display(), "no config file");
    }
    debug!("falling back to the built-in config");
    Ok(PacknoteConfig::default())
}
