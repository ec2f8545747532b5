use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use crate::models::{AxisEvent, SensorKind};
use crate::session::SessionController;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub accelerometer_events: u64,
    pub gyroscope_events: u64,
    pub buffered: u64,
}

impl LoopStats {
    fn record(&mut self, kind: SensorKind, buffered: bool) {
        match kind {
            SensorKind::Accelerometer => self.accelerometer_events += 1,
            SensorKind::Gyroscope => self.gyroscope_events += 1,
        }
        if buffered {
            self.buffered += 1;
        }
    }
}

/// Drains pushed axis events into the session, in arrival order, until
/// cancelled or until every sender is dropped.
pub async fn sensing_loop(
    session: SessionController,
    mut events: UnboundedReceiver<AxisEvent>,
    cancel_token: CancellationToken,
) {
    let mut stats = LoopStats::default();

    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                let Some(event) = maybe_event else {
                    log_info!("axis event channel closed");
                    break;
                };
                let buffered = session.handle_axis_event(event).await;
                stats.record(event.kind, buffered);
            }
            _ = cancel_token.cancelled() => {
                log_info!("sensing loop shutting down");
                break;
            }
        }
    }

    log_info!(
        "sensing loop handled {} {} and {} {} events, {} buffered",
        stats.accelerometer_events,
        SensorKind::Accelerometer.as_str(),
        stats.gyroscope_events,
        SensorKind::Gyroscope.as_str(),
        stats.buffered
    );
}
