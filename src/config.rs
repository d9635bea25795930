use crate::constants::{DEFAULT_DOWNLOAD_BUFFER_SIZE, DEFAULT_FTP_PORT, DEFAULT_UPLOAD_BUFFER_SIZE};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub server: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    pub download_dir: Option<PathBuf>,
    pub upload_buffer_size: Option<usize>, // Optional to allow default value
    pub download_buffer_size: Option<usize>, // Optional to allow default value
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
}

fn default_port() -> u16 {
    DEFAULT_FTP_PORT
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: None,
            port: DEFAULT_FTP_PORT,
            download_dir: None,
            upload_buffer_size: Some(DEFAULT_UPLOAD_BUFFER_SIZE),
            download_buffer_size: Some(DEFAULT_DOWNLOAD_BUFFER_SIZE),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str)?;

        // Set defaults if not specified
        if config.client.upload_buffer_size.is_none() {
            config.client.upload_buffer_size = Some(DEFAULT_UPLOAD_BUFFER_SIZE);
        }
        if config.client.download_buffer_size.is_none() {
            config.client.download_buffer_size = Some(DEFAULT_DOWNLOAD_BUFFER_SIZE);
        }

        Ok(config)
    }

    /// Loads `path` when one is given, otherwise the platform default file if it
    /// exists, otherwise the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        let default_path = Path::new(default_config_path());
        if default_path.is_file() {
            Self::load_from_file(default_path)
        } else {
            info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }
}

pub fn default_config_path() -> &'static str {
    if cfg!(target_os = "windows") {
        "C:\\rouilleftpc\\etc\\rouilleftpc.conf"
    } else {
        "/etc/rouilleftpc.conf"
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!(
        "  Default Server: {}",
        config.client.server.as_deref().unwrap_or("<none>")
    );
    info!("  Default Port: {}", config.client.port);
    match &config.client.download_dir {
        Some(dir) => info!("  Download Directory: {}", dir.display()),
        None => info!("  Download Directory: <working directory>"),
    }
    info!(
        "  Upload Buffer Size: {} KB",
        config
            .client
            .upload_buffer_size
            .unwrap_or(DEFAULT_UPLOAD_BUFFER_SIZE)
            / 1024
    );
    info!(
        "  Download Buffer Size: {} KB",
        config
            .client
            .download_buffer_size
            .unwrap_or(DEFAULT_DOWNLOAD_BUFFER_SIZE)
            / 1024
    );
}
