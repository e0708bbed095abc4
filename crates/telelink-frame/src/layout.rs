//! Byte layout of a telemetry frame.
//!
//! ```text
//! offset  size  field
//!      0     2  marker (0xAA 0x55)
//!      2     2  reserved (zero)
//!      4    16  identifier, NUL padded
//!     20     4  timestamp, u32 seconds since epoch
//!     24     4  latitude, f32
//!     28     4  longitude, f32
//!     32     4  altitude, f32
//!     36     2  rpm, i16
//!     38     2  accel x, i16
//!     40     2  accel y, i16
//!     42     2  accel z, i16
//!     44     2  voltage (mV), u16
//!     46     2  current (mA), u16
//!     48     2  rssi, i16
//!     50     4  snr, f32
//!     54     4  packet counter, u32
//!     58     2  CRC-16/ARC over [0, 58)
//! ```
//!
//! All multi-byte values are little-endian.

/// Synchronization marker at the start of every frame.
pub const MARKER: [u8; 2] = [0xAA, 0x55];

/// Total wire size of a frame.
pub const FRAME_SIZE: usize = 60;

/// Width of the trailing checksum.
pub const CHECKSUM_LEN: usize = 2;

/// Offset of the trailing checksum; also the length of the checksummed range.
pub const CHECKSUM: usize = FRAME_SIZE - CHECKSUM_LEN;

/// Width of the identifier slot.
pub const ID_LEN: usize = 16;

pub const RESERVED: usize = 2;
pub const ID: usize = 4;
pub const TIMESTAMP: usize = 20;
pub const LATITUDE: usize = 24;
pub const LONGITUDE: usize = 28;
pub const ALTITUDE: usize = 32;
pub const RPM: usize = 36;
pub const ACCEL_X: usize = 38;
pub const ACCEL_Y: usize = 40;
pub const ACCEL_Z: usize = 42;
pub const VOLTAGE: usize = 44;
pub const CURRENT: usize = 46;
pub const RSSI: usize = 48;
pub const SNR: usize = 50;
pub const PACKET_COUNT: usize = 54;
