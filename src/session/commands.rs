use crate::{
    models::{preset_labels, ActivityLabel},
    session::{ExportOutcome, SessionController, SessionSnapshot},
    AppState,
};

fn controller_from_state(state: &AppState) -> SessionController {
    state.session.clone()
}

pub fn list_preset_labels() -> Vec<ActivityLabel> {
    preset_labels()
}

pub async fn get_session_state(state: &AppState) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(state);
    Ok(controller.current_state().await)
}

/// Blank labels and a start while recording leave the session unchanged;
/// the returned snapshot shows which happened.
pub async fn start_session(state: &AppState, label: String) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(state);
    controller.start(&label).await;
    Ok(controller.current_state().await)
}

pub async fn stop_session(state: &AppState) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(state);
    controller.stop().await;
    Ok(controller.current_state().await)
}

pub async fn export_session(state: &AppState) -> Result<ExportOutcome, String> {
    let controller = controller_from_state(state);
    controller.export().await.map_err(|e| format!("{e:#}"))
}

pub async fn reset_session(state: &AppState) -> Result<SessionSnapshot, String> {
    let controller = controller_from_state(state);
    controller.reset().await;
    Ok(controller.current_state().await)
}
