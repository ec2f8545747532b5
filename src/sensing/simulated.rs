//! Synthetic accelerometer/gyroscope feed for devices without the hardware
//! and for demos. Each tick pushes one reading from each source.

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::TAU;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::models::{AxisEvent, AxisVector};

use super::AxisEventSender;

const GRAVITY: f32 = 9.81;
const STRIDE_HZ: f32 = 1.8;
const NOISE: f32 = 0.15;

pub struct SimulatedMotion {
    rng: StdRng,
    rate_hz: u32,
    tick: u64,
}

impl SimulatedMotion {
    pub fn new(rate_hz: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            rate_hz: rate_hz.max(1),
            tick: 0,
        }
    }

    /// Gravity on z plus a stride-like oscillation and small noise.
    pub fn next_pair(&mut self) -> (AxisVector, AxisVector) {
        let t = self.tick as f32 / self.rate_hz as f32;
        self.tick += 1;

        let phase = TAU * STRIDE_HZ * t;
        let acc = AxisVector::new(
            0.8 * phase.sin() + self.noise(),
            0.3 * (2.0 * phase).sin() + self.noise(),
            GRAVITY + 1.2 * phase.cos() + self.noise(),
        );
        let gyro = AxisVector::new(
            0.5 * phase.cos() + self.noise(),
            0.2 * phase.sin() + self.noise(),
            0.1 * (0.5 * phase).sin() + self.noise(),
        );
        (acc, gyro)
    }

    fn noise(&mut self) -> f32 {
        self.rng.gen_range(-NOISE..NOISE)
    }
}

/// Pushes simulated readings at `rate_hz` until cancelled or the sensing
/// loop goes away. Resolves to the number of events sent.
pub fn spawn_simulated_source(
    sender: AxisEventSender,
    rate_hz: u32,
    cancel_token: CancellationToken,
) -> JoinHandle<u64> {
    let mut motion = SimulatedMotion::new(rate_hz, None);
    let period = Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)));

    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sent = 0u64;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let (acc, gyro) = motion.next_pair();
                    let now = Utc::now().timestamp_millis();
                    if !sender.send(AxisEvent::accelerometer(acc, now))
                        || !sender.send(AxisEvent::gyroscope(gyro, now))
                    {
                        break;
                    }
                    sent += 2;
                }
                _ = cancel_token.cancelled() => break,
            }
        }

        sent
    })
}
