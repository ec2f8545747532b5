pub mod export;
pub mod models;
pub mod sensing;
pub mod session;
pub mod settings;
pub mod utils;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sensing::{AxisEventSender, SensingController};
use session::SessionController;
use settings::{RecorderSettings, SettingsStore};
use tokio::sync::Mutex;

pub use session::commands::{
    export_session, get_session_state, list_preset_labels, reset_session, start_session,
    stop_session,
};

/// Everything a presentation layer needs, created once at launch and passed
/// by reference.
pub struct AppState {
    pub session: SessionController,
    pub sensing: Mutex<SensingController>,
    pub settings: SettingsStore,
    data_dir: PathBuf,
    axis_sender: AxisEventSender,
}

impl AppState {
    pub async fn setup(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

        let settings = SettingsStore::new(data_dir.join("settings.json"))?;
        let recorder = settings.recorder();
        let session = SessionController::new(&recorder, recorder.output_path(&data_dir));

        let mut sensing = SensingController::new();
        let axis_sender = sensing.start_sensing(session.clone())?;

        Ok(Self {
            session,
            sensing: Mutex::new(sensing),
            settings,
            data_dir,
            axis_sender,
        })
    }

    /// Sender for the platform sensor bridge.
    pub fn axis_sender(&self) -> AxisEventSender {
        self.axis_sender.clone()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Stops the sensing loop. The session itself is left untouched.
    pub async fn shutdown(&self) -> Result<()> {
        self.sensing.lock().await.stop_sensing().await
    }
}

/// Entry point for a host shell: logging first, then state under `data_dir`.
pub async fn launch(data_dir: PathBuf) -> Result<AppState> {
    utils::init_logging();

    log::info!("HAR recorder starting up in {}", data_dir.display());

    AppState::setup(data_dir)
        .await
        .context("failed to set up recorder")
}

pub fn get_recorder_settings(state: &AppState) -> Result<RecorderSettings, String> {
    Ok(state.settings.recorder())
}

pub async fn update_recorder_settings(
    state: &AppState,
    settings: RecorderSettings,
) -> Result<(), String> {
    if settings.output_file_name.trim().is_empty() {
        return Err("output_file_name is required".to_string());
    }

    state
        .settings
        .update_recorder(settings.clone())
        .map_err(|e| e.to_string())?;

    state
        .session
        .apply_settings(&settings, settings.output_path(&state.data_dir))
        .await;

    Ok(())
}
