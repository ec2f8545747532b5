use crate::models::{AxisEvent, AxisVector, SampleRecord, SensorKind};
use crate::session::SessionState;
use crate::settings::{AxisCarryPolicy, TimestampSource};

/// Last reading seen from each source. A source that never reported stays at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestAxisValues {
    pub accelerometer: AxisVector,
    pub gyroscope: AxisVector,
}

impl LatestAxisValues {
    fn store(&mut self, kind: SensorKind, values: AxisVector) {
        match kind {
            SensorKind::Accelerometer => self.accelerometer = values,
            SensorKind::Gyroscope => self.gyroscope = values,
        }
    }
}

/// Merges the two independent axis streams into one sample stream.
#[derive(Debug, Clone, Default)]
pub struct SensorSampler {
    latest: LatestAxisValues,
    carry_policy: AxisCarryPolicy,
    timestamp_source: TimestampSource,
}

impl SensorSampler {
    pub fn new(carry_policy: AxisCarryPolicy, timestamp_source: TimestampSource) -> Self {
        Self {
            latest: LatestAxisValues::default(),
            carry_policy,
            timestamp_source,
        }
    }

    pub fn latest(&self) -> LatestAxisValues {
        self.latest
    }

    pub fn set_policies(&mut self, carry_policy: AxisCarryPolicy, timestamp_source: TimestampSource) {
        self.carry_policy = carry_policy;
        self.timestamp_source = timestamp_source;
    }

    pub fn on_session_start(&mut self) {
        if self.carry_policy == AxisCarryPolicy::ClearOnStart {
            self.latest = LatestAxisValues::default();
        }
    }

    /// Stores the event's values and, while the session accepts samples,
    /// appends one merged record. Returns whether a record was appended.
    pub fn on_axis_event(
        &mut self,
        event: &AxisEvent,
        captured_at_ms: i64,
        session: &mut SessionState,
    ) -> bool {
        self.latest.store(event.kind, event.values);

        if !session.accepts_samples() {
            return false;
        }
        let Some(label) = session.label.clone() else {
            return false;
        };

        let timestamp = match self.timestamp_source {
            TimestampSource::WallClock => captured_at_ms,
            TimestampSource::Sensor => event.timestamp_ms,
        };

        session.push_sample(SampleRecord::new(
            timestamp,
            self.latest.accelerometer,
            self.latest.gyroscope,
            label,
        ));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Instant;

    fn recording(label: &str) -> SessionState {
        let mut state = SessionState::new();
        state.begin_session("s-1".into(), label.into(), Utc::now(), Instant::now());
        state
    }

    #[test]
    fn each_event_appends_one_merged_record() {
        let mut sampler = SensorSampler::default();
        let mut session = recording("Walking");

        assert!(sampler.on_axis_event(&AxisEvent::accelerometer([1.0, 2.0, 3.0], 1000), 5000, &mut session));
        assert!(sampler.on_axis_event(&AxisEvent::gyroscope([4.0, 5.0, 6.0], 1010), 5010, &mut session));

        let samples = session.samples();
        assert_eq!(samples.len(), 2);

        assert_eq!(samples[0].acc(), AxisVector::new(1.0, 2.0, 3.0));
        assert_eq!(samples[0].gyro(), AxisVector::ZERO);
        assert_eq!(samples[0].timestamp(), 5000);
        assert_eq!(samples[0].label(), "Walking");

        assert_eq!(samples[1].acc(), AxisVector::new(1.0, 2.0, 3.0));
        assert_eq!(samples[1].gyro(), AxisVector::new(4.0, 5.0, 6.0));
        assert_eq!(samples[1].timestamp(), 5010);
    }

    #[test]
    fn buffer_length_tracks_event_count_in_order() {
        let mut sampler = SensorSampler::default();
        let mut session = recording("Running");

        for i in 0..50 {
            let event = if i % 3 == 0 {
                AxisEvent::gyroscope([i as f32, 0.0, 0.0], i)
            } else {
                AxisEvent::accelerometer([i as f32, 0.0, 0.0], i)
            };
            sampler.on_axis_event(&event, i, &mut session);
        }

        assert_eq!(session.sample_count(), 50);
        let timestamps: Vec<_> = session.samples().iter().map(|s| s.timestamp()).collect();
        assert_eq!(timestamps, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn stopped_session_only_updates_latest_values() {
        let mut sampler = SensorSampler::default();
        let mut session = recording("Sitting");
        session.stop();

        let appended = sampler.on_axis_event(&AxisEvent::gyroscope([0.1, 0.2, 0.3], 1), 1, &mut session);

        assert!(!appended);
        assert_eq!(session.sample_count(), 0);
        assert_eq!(sampler.latest().gyroscope, AxisVector::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn idle_session_never_buffers() {
        let mut sampler = SensorSampler::default();
        let mut session = SessionState::new();

        assert!(!sampler.on_axis_event(&AxisEvent::accelerometer([1.0, 1.0, 1.0], 1), 1, &mut session));
        assert_eq!(session.sample_count(), 0);
    }

    #[test]
    fn clear_on_start_drops_previous_session_values() {
        let mut sampler = SensorSampler::new(AxisCarryPolicy::ClearOnStart, TimestampSource::WallClock);
        let mut session = recording("Walking");
        sampler.on_axis_event(&AxisEvent::gyroscope([9.0, 9.0, 9.0], 1), 1, &mut session);

        session.begin_session("s-2".into(), "Sitting".into(), Utc::now(), Instant::now());
        sampler.on_session_start();
        sampler.on_axis_event(&AxisEvent::accelerometer([1.0, 0.0, 0.0], 2), 2, &mut session);

        assert_eq!(session.samples()[0].gyro(), AxisVector::ZERO);
    }

    #[test]
    fn carry_forward_keeps_previous_session_values() {
        let mut sampler = SensorSampler::new(AxisCarryPolicy::CarryForward, TimestampSource::WallClock);
        let mut session = recording("Walking");
        sampler.on_axis_event(&AxisEvent::gyroscope([9.0, 9.0, 9.0], 1), 1, &mut session);

        session.begin_session("s-2".into(), "Sitting".into(), Utc::now(), Instant::now());
        sampler.on_session_start();
        sampler.on_axis_event(&AxisEvent::accelerometer([1.0, 0.0, 0.0], 2), 2, &mut session);

        assert_eq!(session.samples()[0].gyro(), AxisVector::new(9.0, 9.0, 9.0));
    }

    #[test]
    fn sensor_timestamp_source_uses_event_time() {
        let mut sampler = SensorSampler::new(AxisCarryPolicy::ClearOnStart, TimestampSource::Sensor);
        let mut session = recording("Standing");

        sampler.on_axis_event(&AxisEvent::accelerometer([0.0, 0.0, 9.8], 1234), 9999, &mut session);

        assert_eq!(session.samples()[0].timestamp(), 1234);
    }
}
