//! CRC-16/ARC (IBM): reflected polynomial `0xA001`, init `0`, no final XOR.

/// Reflected form of the CRC-16/IBM polynomial `0x8005`.
pub const POLY: u16 = 0xA001;

/// Compute the CRC-16/ARC of `data`, processing bits LSB first.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}
