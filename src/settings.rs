use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// What happens to the last-known axis values when a new session starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum AxisCarryPolicy {
    /// Zero both slots so a session never inherits readings from the previous one.
    #[default]
    ClearOnStart,
    CarryForward,
}

/// Where a sample's timestamp comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimestampSource {
    /// Wall clock at the moment the sample is appended.
    #[default]
    WallClock,
    /// The timestamp carried by the sensor event.
    Sensor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RecorderSettings {
    pub output_file_name: String,
    pub tick_interval_ms: u64,
    pub axis_carry_policy: AxisCarryPolicy,
    pub timestamp_source: TimestampSource,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            output_file_name: "har_data.csv".into(),
            tick_interval_ms: 1000,
            axis_carry_policy: AxisCarryPolicy::default(),
            timestamp_source: TimestampSource::default(),
        }
    }
}

impl RecorderSettings {
    pub fn output_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.output_file_name)
    }
}

/// Recorder settings backed by one flat JSON file. A missing or unreadable
/// file yields defaults; the file is only written on update.
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<RecorderSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let current = load(&path)?;
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub fn recorder(&self) -> RecorderSettings {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Writes `settings` to disk first and only then makes them current.
    pub fn update_recorder(&self, settings: RecorderSettings) -> Result<()> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        save(&self.path, &settings)?;
        *guard = settings;
        Ok(())
    }
}

fn load(path: &Path) -> Result<RecorderSettings> {
    if !path.exists() {
        return Ok(RecorderSettings::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read recorder settings from {}", path.display()))?;
    match serde_json::from_str(&contents) {
        Ok(settings) => Ok(settings),
        Err(err) => {
            log_warn!(
                "ignoring unreadable recorder settings in {}: {err}",
                path.display()
            );
            Ok(RecorderSettings::default())
        }
    }
}

fn save(path: &Path, settings: &RecorderSettings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)
        .with_context(|| format!("failed to write recorder settings to {}", path.display()))
}
