pub mod controller;
pub mod loop_worker;
pub mod sampler;
pub mod simulated;

pub use controller::{AxisEventSender, SensingController};
pub use sampler::{LatestAxisValues, SensorSampler};
pub use simulated::spawn_simulated_source;
