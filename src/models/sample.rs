use serde::{Deserialize, Serialize};

/// Which hardware source produced an axis event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SensorKind {
    Accelerometer,
    Gyroscope,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope => "gyroscope",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AxisVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AxisVector {
    pub const ZERO: AxisVector = AxisVector {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for AxisVector {
    fn from(values: [f32; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }
}

/// One hardware callback: a three-component reading and the time the sensor
/// reported it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AxisEvent {
    pub kind: SensorKind,
    pub values: AxisVector,
    pub timestamp_ms: i64,
}

impl AxisEvent {
    pub fn accelerometer(values: impl Into<AxisVector>, timestamp_ms: i64) -> Self {
        Self {
            kind: SensorKind::Accelerometer,
            values: values.into(),
            timestamp_ms,
        }
    }

    pub fn gyroscope(values: impl Into<AxisVector>, timestamp_ms: i64) -> Self {
        Self {
            kind: SensorKind::Gyroscope,
            values: values.into(),
            timestamp_ms,
        }
    }
}

/// A merged accelerometer + gyroscope reading captured under one label.
///
/// Fields are private so a record cannot change after it lands in the
/// session buffer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SampleRecord {
    timestamp: i64,
    acc: AxisVector,
    gyro: AxisVector,
    label: String,
}

impl SampleRecord {
    pub fn new(timestamp: i64, acc: AxisVector, gyro: AxisVector, label: impl Into<String>) -> Self {
        Self {
            timestamp,
            acc,
            gyro,
            label: label.into(),
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn acc(&self) -> AxisVector {
        self.acc
    }

    pub fn gyro(&self) -> AxisVector {
        self.gyro
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
