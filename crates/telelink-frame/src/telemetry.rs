use serde::{Deserialize, Serialize};

/// One decoded telemetry sample.
///
/// Only ever produced from a frame whose checksum matched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Telemetry {
    /// Station identifier, at most [`ID_LEN`](crate::ID_LEN) bytes.
    pub id: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u32,
    pub latitude: f32,
    pub longitude: f32,
    /// Altitude in metres.
    pub altitude: f32,
    pub rpm: i16,
    pub accel_x: i16,
    pub accel_y: i16,
    pub accel_z: i16,
    /// Supply voltage in millivolts.
    pub voltage_mv: u16,
    /// Supply current in milliamps.
    pub current_ma: u16,
    pub rssi: i16,
    pub snr: f32,
    /// Incremented by the transmitter for every frame it sends.
    pub packet_count: u32,
}
