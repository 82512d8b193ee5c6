use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::device::{DeviceAdapter, DeviceConfiguration, DeviceFamily};
use crate::ingest::SourceFactory;

pub const CONFIG_PATH_ENV: &str = "MULTISOURCE_CONFIG";
pub const CAMERA_ENV: &str = "MULTISOURCE_CAMERA";
pub const FRAME_INTERVAL_ENV: &str = "MULTISOURCE_FRAME_INTERVAL";

#[derive(Debug, Deserialize, Default)]
struct CamerasConfigFile {
    cameras: Option<Vec<CameraConfigFile>>,
    default_camera: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CameraConfigFile {
    name: Option<String>,
    family: DeviceFamily,
    #[serde(flatten)]
    device: DeviceConfiguration,
}

/// Cameras known to this process, resolved from file and environment.
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    pub cameras: Vec<CameraSettings>,
    /// Camera used when none is named explicitly.
    pub default_camera: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub name: String,
    pub family: DeviceFamily,
    pub device: DeviceConfiguration,
}

impl CameraSettings {
    /// Build an adapter for this camera, configured in one step.
    pub fn build_adapter<F: SourceFactory + 'static>(&self, factory: F) -> Result<DeviceAdapter> {
        DeviceAdapter::from_configuration(self.family, factory, &self.device)
            .with_context(|| format!("configure camera '{}'", self.name))
    }
}

impl SourcesConfig {
    /// Load from the file named by `MULTISOURCE_CONFIG`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map_err(|_| anyhow!("{} must point at a camera config file", CONFIG_PATH_ENV))?;
        Self::from_path(Path::new(&path))
    }

    /// Load from `path` (JSON, or TOML for `.toml` files), then apply
    /// environment overrides.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_cfg = read_config_file(path)?;
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: CamerasConfigFile) -> Self {
        let cameras = file
            .cameras
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(idx, camera)| {
                let name = camera
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| format!("camera-{}", idx + 1));
                CameraSettings {
                    name,
                    family: camera.family,
                    device: camera.device,
                }
            })
            .collect();
        Self {
            cameras,
            default_camera: file.default_camera,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(name) = std::env::var(CAMERA_ENV) {
            if !name.trim().is_empty() {
                self.default_camera = Some(name.trim().to_string());
            }
        }
        if let Ok(interval) = std::env::var(FRAME_INTERVAL_ENV) {
            let interval: i64 = interval.trim().parse().map_err(|_| {
                anyhow!("{} must be an integer number of milliseconds", FRAME_INTERVAL_ENV)
            })?;
            for camera in &mut self.cameras {
                camera.device.frame_interval = interval;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.cameras.is_empty() {
            return Err(anyhow!("config defines no cameras"));
        }
        let mut seen = HashSet::new();
        for camera in &self.cameras {
            if !seen.insert(camera.name.as_str()) {
                return Err(anyhow!("duplicate camera name '{}'", camera.name));
            }
            if camera.device.source.trim().is_empty() {
                return Err(anyhow!("camera '{}' has no source address", camera.name));
            }
        }
        if let Some(name) = &self.default_camera {
            if self.camera(name).is_none() {
                return Err(anyhow!("default camera '{}' is not defined", name));
            }
        }
        Ok(())
    }

    pub fn camera(&self, name: &str) -> Option<&CameraSettings> {
        self.cameras.iter().find(|camera| camera.name == name)
    }

    /// The default camera, or the first one when no default is set.
    pub fn selected_camera(&self) -> Result<&CameraSettings> {
        match &self.default_camera {
            Some(name) => self
                .camera(name)
                .ok_or_else(|| anyhow!("camera '{}' is not defined", name)),
            None => self
                .cameras
                .first()
                .ok_or_else(|| anyhow!("config defines no cameras")),
        }
    }
}

fn read_config_file(path: &Path) -> Result<CamerasConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg: CamerasConfigFile = if is_toml {
        toml::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}
