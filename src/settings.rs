use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PORT, DEFAULT_SEED};
use crate::world::generator::GenerationOptions;

/// Errors while reading or writing a settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode settings: {0}")]
    Codec(#[from] bincode::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    pub default_seed: String,
    /// Blocking threads tokio may use for generation; 0 keeps tokio's default
    pub generation_threads: usize,
    #[serde(default)]
    pub generation: GenerationOptions,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            default_seed: DEFAULT_SEED.to_string(),
            generation_threads: 0,
            generation: GenerationOptions::default(),
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

pub fn save_settings(path: &Path, settings: &ServerSettings) -> Result<(), SettingsError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, settings)?;
    writer.flush()?;
    Ok(())
}

pub fn load_settings(path: &Path) -> Result<ServerSettings, SettingsError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let settings = bincode::deserialize_from(&mut reader)?;
    Ok(settings)
}

/// Load settings if the file exists, defaults otherwise
pub fn load_or_default(path: &Path) -> Result<ServerSettings, SettingsError> {
    if path.exists() {
        load_settings(path)
    } else {
        Ok(ServerSettings::default())
    }
}
