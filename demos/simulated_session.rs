use std::time::Duration;

use anyhow::Result;
use har_recorder_lib::{
    export_session, launch, list_preset_labels, sensing::spawn_simulated_source, start_session,
    stop_session,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let data_dir = std::env::temp_dir().join("har-recorder-demo");
    let state = launch(data_dir).await?;

    let labels = list_preset_labels();
    let label = labels
        .first()
        .map(|label| label.display_name())
        .unwrap_or_else(|| "Walking".to_string());

    let cancel = CancellationToken::new();
    let source = spawn_simulated_source(state.axis_sender(), 50, cancel.clone());

    let mut updates = state.session.subscribe();
    let started = start_session(&state, label).await.map_err(anyhow::Error::msg)?;
    log::info!("recording {:?}", started.label);

    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            log::info!(
                "{} {} samples",
                snapshot.elapsed_display,
                snapshot.sample_count
            );
            if !snapshot.recording {
                break;
            }
        }
    });

    tokio::time::sleep(Duration::from_secs(3)).await;
    let stopped = stop_session(&state).await.map_err(anyhow::Error::msg)?;
    cancel.cancel();
    let sent = source.await?;
    log::info!("simulated source sent {sent} events, {} buffered", stopped.sample_count);

    let outcome = export_session(&state).await.map_err(anyhow::Error::msg)?;
    log::info!("export: {}", serde_json::to_string(&outcome)?);

    let _ = watcher.await;
    state.shutdown().await
}
