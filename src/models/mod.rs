pub mod label;
pub mod sample;

pub use label::{normalize_label, preset_labels, ActivityLabel};
pub use sample::{AxisEvent, AxisVector, SampleRecord, SensorKind};
