use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::checksum::crc16;
use crate::error::{FormatError, Result};
use crate::layout::{self, CHECKSUM, FRAME_SIZE, ID_LEN, MARKER};
use crate::telemetry::Telemetry;

/// A candidate frame cut from the byte stream.
///
/// Starts with a marker and has the extractor's configured length. Whether it
/// is well formed is decided by a [`FrameDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    pub(crate) fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// Raw frame bytes, marker and checksum included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The wire size of this frame.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Validates a frame and maps it to a [`Telemetry`] record.
pub trait FrameDecoder {
    fn decode(&self, frame: &Frame) -> Result<Telemetry>;
}

/// Decoder for the fixed little-endian layout in [`layout`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryDecoder;

impl FrameDecoder for BinaryDecoder {
    fn decode(&self, frame: &Frame) -> Result<Telemetry> {
        decode_frame(frame.as_bytes())
    }
}

/// Decode a frame.
///
/// Checks run in order (length, marker, checksum) and the first failure is
/// returned; no field is read from a frame that failed a check.
pub fn decode_frame(raw: &[u8]) -> Result<Telemetry> {
    if raw.len() != FRAME_SIZE {
        return Err(FormatError::InvalidLength {
            actual: raw.len(),
            expected: FRAME_SIZE,
        });
    }

    if raw[0..2] != MARKER {
        return Err(FormatError::InvalidMarker {
            found: [raw[0], raw[1]],
        });
    }

    let expected = (&raw[CHECKSUM..]).get_u16_le();
    let computed = crc16(&raw[..CHECKSUM]);
    if expected != computed {
        return Err(FormatError::ChecksumMismatch { expected, computed });
    }

    Ok(Telemetry {
        id: read_id(&raw[layout::ID..layout::ID + ID_LEN]),
        timestamp: (&raw[layout::TIMESTAMP..]).get_u32_le(),
        latitude: (&raw[layout::LATITUDE..]).get_f32_le(),
        longitude: (&raw[layout::LONGITUDE..]).get_f32_le(),
        altitude: (&raw[layout::ALTITUDE..]).get_f32_le(),
        rpm: (&raw[layout::RPM..]).get_i16_le(),
        accel_x: (&raw[layout::ACCEL_X..]).get_i16_le(),
        accel_y: (&raw[layout::ACCEL_Y..]).get_i16_le(),
        accel_z: (&raw[layout::ACCEL_Z..]).get_i16_le(),
        voltage_mv: (&raw[layout::VOLTAGE..]).get_u16_le(),
        current_ma: (&raw[layout::CURRENT..]).get_u16_le(),
        rssi: (&raw[layout::RSSI..]).get_i16_le(),
        snr: (&raw[layout::SNR..]).get_f32_le(),
        packet_count: (&raw[layout::PACKET_COUNT..]).get_u32_le(),
    })
}

/// Encode a record into the wire layout, appending [`FRAME_SIZE`] bytes to `dst`.
///
/// Identifiers that would not decode back unchanged (too long, or containing
/// a NUL byte) are rejected and `dst` is left untouched.
pub fn encode_frame(record: &Telemetry, dst: &mut BytesMut) -> Result<()> {
    let id = record.id.as_bytes();
    if id.len() > ID_LEN {
        return Err(FormatError::IdentifierTooLong {
            len: id.len(),
            max: ID_LEN,
        });
    }
    if let Some(position) = id.iter().position(|&b| b == 0) {
        return Err(FormatError::IdentifierContainsNul { position });
    }

    dst.reserve(FRAME_SIZE);
    let start = dst.len();

    dst.put_slice(&MARKER);
    dst.put_u16_le(0);
    dst.put_slice(id);
    dst.put_bytes(0, ID_LEN - id.len());
    dst.put_u32_le(record.timestamp);
    dst.put_f32_le(record.latitude);
    dst.put_f32_le(record.longitude);
    dst.put_f32_le(record.altitude);
    dst.put_i16_le(record.rpm);
    dst.put_i16_le(record.accel_x);
    dst.put_i16_le(record.accel_y);
    dst.put_i16_le(record.accel_z);
    dst.put_u16_le(record.voltage_mv);
    dst.put_u16_le(record.current_ma);
    dst.put_i16_le(record.rssi);
    dst.put_f32_le(record.snr);
    dst.put_u32_le(record.packet_count);

    let crc = crc16(&dst[start..start + CHECKSUM]);
    dst.put_u16_le(crc);
    Ok(())
}

fn read_id(slot: &[u8]) -> String {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    String::from_utf8_lossy(&slot[..end]).into_owned()
}
