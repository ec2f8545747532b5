use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::{AxisEvent, AxisVector, SensorKind};
use crate::session::SessionController;

use super::loop_worker::sensing_loop;

/// Handle the platform sensor bridge pushes readings through.
///
/// `send` never blocks, so it is safe to call from a hardware callback thread.
#[derive(Debug, Clone)]
pub struct AxisEventSender {
    tx: mpsc::UnboundedSender<AxisEvent>,
}

impl AxisEventSender {
    /// Returns `false` once the sensing loop has shut down.
    pub fn send(&self, event: AxisEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn push(&self, kind: SensorKind, values: [f32; 3], timestamp_ms: i64) -> bool {
        self.send(AxisEvent {
            kind,
            values: AxisVector::from(values),
            timestamp_ms,
        })
    }
}

pub struct SensingController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SensingController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start_sensing(&mut self, session: SessionController) -> Result<AxisEventSender> {
        if self.handle.is_some() {
            bail!("sensing already active");
        }

        let cancel_token = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(sensing_loop(session, rx, cancel_token.clone()));

        info!("sensing loop started");
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(AxisEventSender { tx })
    }

    pub async fn stop_sensing(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("sensing loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for SensingController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RecorderSettings;
    use std::time::Duration;
    use tempfile::tempdir;

    async fn wait_for_samples(session: &SessionController, expected: usize) -> usize {
        for _ in 0..200 {
            let count = session.current_state().await.sample_count;
            if count >= expected {
                return count;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        session.current_state().await.sample_count
    }

    #[tokio::test]
    async fn pushed_events_reach_the_session() {
        let dir = tempdir().unwrap();
        let settings = RecorderSettings::default();
        let session = SessionController::new(&settings, settings.output_path(dir.path()));
        let mut sensing = SensingController::new();

        let sender = sensing.start_sensing(session.clone()).unwrap();
        session.start("Walking").await;

        for i in 0..20 {
            let kind = if i % 2 == 0 {
                SensorKind::Accelerometer
            } else {
                SensorKind::Gyroscope
            };
            assert!(sender.push(kind, [i as f32, 0.0, 0.0], i));
        }

        assert_eq!(wait_for_samples(&session, 20).await, 20);

        sensing.stop_sensing().await.unwrap();
        assert!(!sensing.is_active());
        assert!(!sender.push(SensorKind::Accelerometer, [0.0; 3], 99));
    }

    #[tokio::test]
    async fn second_start_is_rejected() {
        let dir = tempdir().unwrap();
        let settings = RecorderSettings::default();
        let session = SessionController::new(&settings, settings.output_path(dir.path()));
        let mut sensing = SensingController::new();

        sensing.start_sensing(session.clone()).unwrap();
        assert!(sensing.start_sensing(session).is_err());

        sensing.stop_sensing().await.unwrap();
        sensing.stop_sensing().await.unwrap();
    }
}
