use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::telemetry::VisibilityKey;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8188";
pub const DEFAULT_REFRESH_RATE: f64 = 1.0;

/// Per-category chart visibility. Everything is shown by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisibilitySettings {
    pub cpu: bool,
    pub ram: bool,
    pub gpu_usage: bool,
    pub gpu_temp: bool,
    pub vram: bool,
    pub vram_speed: bool,
    pub shared_gpu_speed: bool,
    pub shared_gpu_mem: bool,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            cpu: true,
            ram: true,
            gpu_usage: true,
            gpu_temp: true,
            vram: true,
            vram_speed: true,
            shared_gpu_speed: true,
            shared_gpu_mem: true,
        }
    }
}

impl VisibilitySettings {
    fn slot(&mut self, key: VisibilityKey) -> &mut bool {
        match key {
            VisibilityKey::Cpu => &mut self.cpu,
            VisibilityKey::Ram => &mut self.ram,
            VisibilityKey::GpuUsage => &mut self.gpu_usage,
            VisibilityKey::GpuTemp => &mut self.gpu_temp,
            VisibilityKey::Vram => &mut self.vram,
            VisibilityKey::VramSpeed => &mut self.vram_speed,
            VisibilityKey::SharedGpuSpeed => &mut self.shared_gpu_speed,
            VisibilityKey::SharedGpuMem => &mut self.shared_gpu_mem,
        }
    }

    pub fn is_visible(&self, key: VisibilityKey) -> bool {
        match key {
            VisibilityKey::Cpu => self.cpu,
            VisibilityKey::Ram => self.ram,
            VisibilityKey::GpuUsage => self.gpu_usage,
            VisibilityKey::GpuTemp => self.gpu_temp,
            VisibilityKey::Vram => self.vram,
            VisibilityKey::VramSpeed => self.vram_speed,
            VisibilityKey::SharedGpuSpeed => self.shared_gpu_speed,
            VisibilityKey::SharedGpuMem => self.shared_gpu_mem,
        }
    }

    pub fn set(&mut self, key: VisibilityKey, visible: bool) {
        *self.slot(key) = visible;
    }

    /// Flip one category and return its new state
    pub fn toggle(&mut self, key: VisibilityKey) -> bool {
        let slot = self.slot(key);
        *slot = !*slot;
        *slot
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Base http(s) URL of the monitor server; the WebSocket URL is derived from it
    pub server_url: String,
    /// Seconds between server samples, pushed with `settings --rate`
    pub refresh_rate: f64,
    pub enabled: bool,
    /// Overrides the detected pixel ratio when set
    pub pixel_ratio: Option<f64>,
    pub visibility: VisibilitySettings,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            refresh_rate: DEFAULT_REFRESH_RATE,
            enabled: true,
            pixel_ratio: None,
            visibility: VisibilitySettings::default(),
        }
    }
}

impl MonitorConfig {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Missing, empty and unreadable files all yield the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_json::from_str(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring corrupt config file {:?}: {}", path, e);
            Self::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("hwmon-charts").join("config.json"))
    }

    pub fn set_server_url(&mut self, url: String) {
        self.server_url = url;
    }
}
