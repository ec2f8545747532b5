use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::models::SampleRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Recording,
    Stopped,
}

/// Read-only view of the session for a presentation layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub session_id: Option<String>,
    pub label: Option<String>,
    pub recording: bool,
    pub sample_count: usize,
    pub elapsed_ms: u64,
    pub elapsed_display: String,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        SessionState::default().snapshot()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    pub session_id: Option<String>,
    pub label: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// Elapsed time frozen at the last stop; live time is derived from `running_anchor`.
    pub elapsed_ms: u64,
    pub running_anchor: Option<Instant>,
    /// Set while the buffer is out with the exporter; the sampler skips this session meanwhile.
    pub exporting: bool,
    samples: Vec<SampleRecord>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_session(
        &mut self,
        session_id: String,
        label: String,
        start_at: DateTime<Utc>,
        now: Instant,
    ) {
        *self = Self {
            status: SessionStatus::Recording,
            session_id: Some(session_id),
            label: Some(label),
            started_at: Some(start_at),
            elapsed_ms: 0,
            running_anchor: Some(now),
            exporting: false,
            samples: Vec::new(),
        };
    }

    pub fn stop(&mut self) -> bool {
        if self.status != SessionStatus::Recording {
            return false;
        }
        self.elapsed_ms = self.current_elapsed_ms();
        self.status = SessionStatus::Stopped;
        self.running_anchor = None;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_recording(&self) -> bool {
        self.status == SessionStatus::Recording && self.label.is_some()
    }

    /// True when an incoming axis event should land in the buffer.
    pub fn accepts_samples(&self) -> bool {
        self.is_recording() && !self.exporting
    }

    pub fn current_elapsed_ms(&self) -> u64 {
        match (self.status, self.running_anchor) {
            (SessionStatus::Recording, Some(anchor)) => anchor.elapsed().as_millis() as u64,
            _ => self.elapsed_ms,
        }
    }

    pub fn samples(&self) -> &[SampleRecord] {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn push_sample(&mut self, record: SampleRecord) {
        debug_assert!(self.label.is_some(), "samples require an active label");
        self.samples.push(record);
    }

    pub fn take_samples(&mut self) -> Vec<SampleRecord> {
        std::mem::take(&mut self.samples)
    }

    pub fn restore_samples(&mut self, samples: Vec<SampleRecord>) {
        self.samples = samples;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let elapsed_ms = self.current_elapsed_ms();
        SessionSnapshot {
            status: self.status,
            session_id: self.session_id.clone(),
            label: self.label.clone(),
            recording: self.is_recording(),
            sample_count: self.samples.len(),
            elapsed_ms,
            elapsed_display: format_elapsed(elapsed_ms),
        }
    }
}

/// `MM:SS`, minutes unbounded.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_secs = elapsed_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AxisVector;
    use std::time::Duration;

    fn recording_state(label: &str) -> SessionState {
        let mut state = SessionState::new();
        state.begin_session("s-1".into(), label.into(), Utc::now(), Instant::now());
        state
    }

    #[test]
    fn begin_session_clears_previous_buffer() {
        let mut state = recording_state("Walking");
        state.push_sample(SampleRecord::new(1, AxisVector::ZERO, AxisVector::ZERO, "Walking"));
        assert_eq!(state.sample_count(), 1);

        state.begin_session("s-2".into(), "Sitting".into(), Utc::now(), Instant::now());
        assert_eq!(state.sample_count(), 0);
        assert_eq!(state.label.as_deref(), Some("Sitting"));
        assert_eq!(state.status, SessionStatus::Recording);
    }

    #[test]
    fn stop_freezes_elapsed_and_keeps_samples() {
        let mut state = SessionState::new();
        let anchor = Instant::now() - Duration::from_millis(65_000);
        state.begin_session("s-1".into(), "Running".into(), Utc::now(), anchor);
        state.push_sample(SampleRecord::new(1, AxisVector::ZERO, AxisVector::ZERO, "Running"));

        assert!(state.stop());
        assert_eq!(state.status, SessionStatus::Stopped);
        assert!(state.elapsed_ms >= 65_000);
        assert_eq!(state.current_elapsed_ms(), state.elapsed_ms);
        assert_eq!(state.sample_count(), 1);

        assert!(!state.stop());
    }

    #[test]
    fn stop_from_idle_is_ignored() {
        let mut state = SessionState::new();
        assert!(!state.stop());
        assert_eq!(state.status, SessionStatus::Idle);
    }

    #[test]
    fn reset_returns_to_idle_snapshot() {
        let mut state = recording_state("Standing");
        state.push_sample(SampleRecord::new(1, AxisVector::ZERO, AxisVector::ZERO, "Standing"));
        state.reset();

        let snapshot = state.snapshot();
        assert_eq!(snapshot.label, None);
        assert!(!snapshot.recording);
        assert_eq!(snapshot.sample_count, 0);
        assert_eq!(snapshot.elapsed_ms, 0);
        assert_eq!(snapshot.status, SessionStatus::Idle);
    }

    #[test]
    fn exporting_blocks_new_samples() {
        let mut state = recording_state("Walking");
        assert!(state.accepts_samples());
        state.exporting = true;
        assert!(state.is_recording());
        assert!(!state.accepts_samples());
    }

    #[test]
    fn elapsed_display_is_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(999), "00:00");
        assert_eq!(format_elapsed(61_500), "01:01");
        assert_eq!(format_elapsed(3_600_000), "60:00");
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let state = recording_state("Walking");
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["status"], "recording");
        assert_eq!(json["sampleCount"], 0);
        assert_eq!(json["label"], "Walking");
        assert!(json.get("elapsedDisplay").is_some());
    }
}
