use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use uuid::Uuid;

use crate::{
    export::{CsvExporter, ExportReport},
    models::{normalize_label, AxisEvent, SampleRecord},
    sensing::SensorSampler,
    settings::RecorderSettings,
};

use super::{SessionSnapshot, SessionState, SessionStatus};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const MIN_TICK_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    NoSession,
    EmptyBuffer,
    ExportInProgress,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExportOutcome {
    Written(ExportReport),
    Skipped { reason: SkipReason },
}

impl ExportOutcome {
    fn skipped(reason: SkipReason) -> Self {
        ExportOutcome::Skipped { reason }
    }
}

struct RecorderCore {
    state: SessionState,
    sampler: SensorSampler,
    exporter: CsvExporter,
    tick_interval: Duration,
}

/// Owns the session and its sample buffer. Every mutation goes through the
/// one mutex, so sensor events, user commands and the display ticker are
/// serialized.
#[derive(Clone)]
pub struct SessionController {
    core: Arc<Mutex<RecorderCore>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    snapshots: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionController {
    pub fn new(settings: &RecorderSettings, output_path: PathBuf) -> Self {
        let (snapshots, _) = watch::channel(SessionSnapshot::default());

        Self {
            core: Arc::new(Mutex::new(RecorderCore {
                state: SessionState::new(),
                sampler: SensorSampler::new(settings.axis_carry_policy, settings.timestamp_source),
                exporter: CsvExporter::new(output_path),
                tick_interval: tick_interval_from(settings),
            })),
            ticker: Arc::new(Mutex::new(None)),
            snapshots: Arc::new(snapshots),
        }
    }

    /// Receives a snapshot on every transition and on every display tick.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub async fn current_state(&self) -> SessionSnapshot {
        self.core.lock().await.state.snapshot()
    }

    pub async fn apply_settings(&self, settings: &RecorderSettings, output_path: PathBuf) {
        let mut core = self.core.lock().await;
        core.sampler
            .set_policies(settings.axis_carry_policy, settings.timestamp_source);
        core.exporter = CsvExporter::new(output_path);
        core.tick_interval = tick_interval_from(settings);
    }

    /// Starts a new session under `label`. Blank labels and a start while
    /// already recording are ignored and return `false`.
    pub async fn start(&self, label: &str) -> bool {
        let Some(label) = normalize_label(label) else {
            log_warn!("ignoring start with a blank label");
            return false;
        };

        let snapshot = {
            let mut core = self.core.lock().await;
            if core.state.status == SessionStatus::Recording {
                log_warn!(
                    "ignoring start({label}); session {:?} is already recording",
                    core.state.session_id
                );
                return false;
            }
            if core.state.sample_count() > 0 {
                log_info!(
                    "discarding {} unsaved samples from session {:?}",
                    core.state.sample_count(),
                    core.state.session_id
                );
            }

            let session_id = Uuid::new_v4().to_string();
            core.state
                .begin_session(session_id.clone(), label, Utc::now(), Instant::now());
            core.sampler.on_session_start();

            // Swapped under the core lock so a concurrent stop/reset cannot
            // abort the ticker of the session started here.
            let mut ticker = self.ticker.lock().await;
            abort_ticker(&mut ticker);
            *ticker = Some(self.spawn_ticker(core.tick_interval, session_id));

            core.state.snapshot()
        };

        log_info!(
            "recording session {:?} started with label {:?}",
            snapshot.session_id,
            snapshot.label
        );
        self.publish(snapshot);
        true
    }

    /// Stops sampling and keeps the buffer. Ignored unless recording.
    pub async fn stop(&self) -> bool {
        let snapshot = {
            let mut core = self.core.lock().await;
            if !core.state.stop() {
                log_warn!("ignoring stop; no session is recording");
                return false;
            }
            abort_ticker(&mut *self.ticker.lock().await);
            core.state.snapshot()
        };

        log_info!(
            "session {:?} stopped with {} samples after {}",
            snapshot.session_id,
            snapshot.sample_count,
            snapshot.elapsed_display
        );
        self.publish(snapshot);
        true
    }

    /// Returns to idle, discarding any unsaved samples.
    pub async fn reset(&self) {
        let snapshot = {
            let mut core = self.core.lock().await;
            if core.state.sample_count() > 0 {
                log_info!(
                    "discarding {} samples from session {:?}",
                    core.state.sample_count(),
                    core.state.session_id
                );
            }
            core.state.reset();
            abort_ticker(&mut *self.ticker.lock().await);
            core.state.snapshot()
        };

        self.publish(snapshot);
    }

    /// Routes one axis event through the sampler. Returns whether a sample was buffered.
    pub async fn handle_axis_event(&self, event: AxisEvent) -> bool {
        let captured_at_ms = Utc::now().timestamp_millis();
        let mut core = self.core.lock().await;
        let RecorderCore { state, sampler, .. } = &mut *core;
        sampler.on_axis_event(&event, captured_at_ms, state)
    }

    /// Writes the buffer to CSV and resets the session.
    ///
    /// The write runs on the blocking pool without holding the session lock;
    /// events arriving meanwhile are not buffered. On failure the session is
    /// left exactly as it was so the export can be retried.
    pub async fn export(&self) -> Result<ExportOutcome> {
        let PendingExport {
            session_id,
            records,
            exporter,
        } = match self.begin_export().await {
            Ok(pending) => pending,
            Err(reason) => return Ok(ExportOutcome::skipped(reason)),
        };

        let worker = tokio::task::spawn_blocking(move || {
            let result = exporter.export(&records);
            (records, result)
        })
        .await;

        match worker {
            Ok((records, result)) => self.finish_export(session_id, records, result).await,
            Err(join_err) => {
                let mut core = self.core.lock().await;
                if core.state.session_id == session_id {
                    core.state.exporting = false;
                }
                log_error!("csv export worker failed for session {:?}: {join_err}", session_id);
                Err(anyhow!("csv export worker join failed: {join_err}"))
            }
        }
    }

    /// Takes the buffer out of the session and marks it as exporting.
    async fn begin_export(&self) -> std::result::Result<PendingExport, SkipReason> {
        let mut core = self.core.lock().await;
        if core.state.status == SessionStatus::Idle {
            log_warn!("ignoring export; no active session");
            return Err(SkipReason::NoSession);
        }
        if core.state.exporting {
            log_warn!("ignoring export; session {:?} is already exporting", core.state.session_id);
            return Err(SkipReason::ExportInProgress);
        }
        if core.state.sample_count() == 0 {
            log_info!("nothing to export for session {:?}", core.state.session_id);
            return Err(SkipReason::EmptyBuffer);
        }

        core.state.exporting = true;
        Ok(PendingExport {
            session_id: core.state.session_id.clone(),
            records: core.state.take_samples(),
            exporter: core.exporter.clone(),
        })
    }

    /// Resets the exported session on success or puts its buffer back on
    /// failure. A session started after `begin_export` is never touched.
    async fn finish_export(
        &self,
        session_id: Option<String>,
        records: Vec<SampleRecord>,
        result: Result<ExportReport>,
    ) -> Result<ExportOutcome> {
        let mut core = self.core.lock().await;
        let same_session = core.state.session_id == session_id;

        match result {
            Ok(report) => {
                if same_session {
                    core.state.reset();
                    abort_ticker(&mut *self.ticker.lock().await);
                } else {
                    log_warn!(
                        "session changed while exporting {:?}; leaving the new session in place",
                        session_id
                    );
                }
                let snapshot = core.state.snapshot();
                drop(core);

                log_info!(
                    "exported {} samples to {}",
                    report.rows,
                    report.path.display()
                );
                self.publish(snapshot);
                Ok(ExportOutcome::Written(report))
            }
            Err(err) => {
                if same_session {
                    core.state.restore_samples(records);
                    core.state.exporting = false;
                }
                log_error!("export failed for session {:?}: {err:#}", session_id);
                Err(err)
            }
        }
    }

    fn publish(&self, snapshot: SessionSnapshot) {
        self.snapshots.send_replace(snapshot);
    }

    /// Publishes a snapshot every `tick_interval` until `session_id` stops recording.
    fn spawn_ticker(&self, tick_interval: Duration, session_id: String) -> JoinHandle<()> {
        let core = self.core.clone();
        let snapshots = self.snapshots.clone();

        tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;

                let snapshot = {
                    let core = core.lock().await;
                    if core.state.status != SessionStatus::Recording
                        || core.state.session_id.as_deref() != Some(session_id.as_str())
                    {
                        break;
                    }
                    core.state.snapshot()
                };

                snapshots.send_replace(snapshot);
            }
        })
    }
}

struct PendingExport {
    session_id: Option<String>,
    records: Vec<SampleRecord>,
    exporter: CsvExporter,
}

fn abort_ticker(slot: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = slot.take() {
        handle.abort();
    }
}

fn tick_interval_from(settings: &RecorderSettings) -> Duration {
    Duration::from_millis(settings.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
}
