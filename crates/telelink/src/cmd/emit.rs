use std::fs::File;
use std::io::{BufWriter, Write};

use bytes::BytesMut;
use telelink_frame::{encode_frame, layout, Telemetry, FRAME_SIZE};

use crate::cmd::EmitArgs;
use crate::exit::{format_error, io_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};

/// Largest accepted `--noise` run before each frame.
pub const MAX_NOISE: usize = 4096;

pub fn run(args: EmitArgs) -> CliResult<i32> {
    if args.corrupt_every == Some(0) {
        return Err(CliError::new(USAGE, "--corrupt-every must be greater than zero"));
    }
    if args.noise > MAX_NOISE {
        return Err(CliError::new(
            USAGE,
            format!("--noise must be at most {MAX_NOISE}"),
        ));
    }

    let start = args.start.unwrap_or_else(now_seconds);

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|err| {
                io_error(&format!("failed creating {}", path.display()), err, FAILURE)
            })?;
            synthesize(&args, start, BufWriter::new(file))
        }
        None => synthesize(&args, start, std::io::stdout().lock()),
    }?;

    Ok(SUCCESS)
}

/// Write `count` frames, optionally preceded by noise and with some corrupted.
fn synthesize<W: Write>(args: &EmitArgs, start: u32, mut out: W) -> CliResult<()> {
    let mut wire = BytesMut::with_capacity(FRAME_SIZE + args.noise);

    for n in 0..args.count {
        wire.clear();
        wire.extend(noise(args.noise, n));

        let frame_start = wire.len();
        encode_frame(&sample(&args.id, start, n), &mut wire)
            .map_err(|err| format_error("encode failed", err))?;

        if args.corrupt_every.is_some_and(|k| (n + 1) % k == 0) {
            wire[frame_start + layout::RPM] ^= 0x01;
        }
        out.write_all(&wire).map_err(write_error)?;
    }
    out.flush().map_err(write_error)
}

fn sample(id: &str, start: u32, n: u32) -> Telemetry {
    let step = n as f32;
    Telemetry {
        id: id.to_string(),
        timestamp: start.wrapping_add(n),
        latitude: -34.6037 + step * 0.0001,
        longitude: -58.3816 - step * 0.0001,
        altitude: 25.0 + step * 0.5,
        rpm: 3000 + (n % 500) as i16,
        accel_x: (n % 21) as i16 - 10,
        accel_y: 5,
        accel_z: 981,
        voltage_mv: 12_600u16.saturating_sub((n % 600) as u16),
        current_ma: 850,
        rssi: -80 - (n % 20) as i16,
        snr: 9.5,
        packet_count: n,
    }
}

// Noise stays in 0x01..=0x50 so it never forms a marker with frame bytes.
fn noise(len: usize, seed: u32) -> impl Iterator<Item = u8> {
    (0..len).map(move |i| 0x01 + ((seed as usize + i * 31) % 0x50) as u8)
}

fn write_error(err: std::io::Error) -> CliError {
    io_error("write failed", err, FAILURE)
}

fn now_seconds() -> u32 {
    u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use telelink_frame::{decode_frame, FormatError, FrameExtractor};

    use super::*;

    fn args(count: u32) -> EmitArgs {
        EmitArgs {
            count,
            id: "emit".to_string(),
            start: Some(1_700_000_000),
            corrupt_every: None,
            noise: 0,
            output: None,
        }
    }

    fn emit(args: &EmitArgs) -> CliResult<Vec<u8>> {
        let mut wire = Vec::new();
        synthesize(args, 1_700_000_000, &mut wire)?;
        Ok(wire)
    }

    fn decode_all(wire: &[u8]) -> Vec<Result<Telemetry, FormatError>> {
        let mut extractor = FrameExtractor::new();
        extractor
            .feed(wire)
            .map(|frame| decode_frame(frame.as_bytes()))
            .collect()
    }

    #[test]
    fn emits_decodable_frames() {
        let wire = emit(&args(5)).unwrap();
        assert_eq!(wire.len(), 5 * FRAME_SIZE);

        let records: Vec<Telemetry> = decode_all(&wire).into_iter().map(Result::unwrap).collect();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].id, "emit");
        assert_eq!(records[4].packet_count, 4);
        assert_eq!(records[4].timestamp, 1_700_000_004);
    }

    #[test]
    fn corrupts_every_kth_frame() {
        let mut a = args(6);
        a.corrupt_every = Some(3);
        let wire = emit(&a).unwrap();

        let results = decode_all(&wire);
        let valid: Vec<u32> = results
            .iter()
            .filter_map(|r| r.as_ref().ok().map(|t| t.packet_count))
            .collect();
        assert_eq!(valid, vec![0, 1, 3, 4]);
    }

    #[test]
    fn noise_is_skipped_by_extractor() {
        let mut a = args(3);
        a.noise = 7;
        let wire = emit(&a).unwrap();
        assert_eq!(wire.len(), 3 * (FRAME_SIZE + 7));

        let valid = decode_all(&wire).into_iter().filter(Result::is_ok).count();
        assert_eq!(valid, 3);
    }

    #[test]
    fn rejects_long_identifier() {
        let mut a = args(1);
        a.id = "identifier-longer-than-slot".to_string();
        let err = emit(&a).unwrap_err();
        assert_eq!(err.code, crate::exit::DATA_INVALID);
    }

    #[test]
    fn oversized_noise_is_a_usage_error() {
        let mut a = args(2);
        a.noise = usize::MAX - 15;
        let err = run(a).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn noise_at_limit_is_accepted() {
        let mut a = args(2);
        a.noise = MAX_NOISE;
        let wire = emit(&a).unwrap();
        assert_eq!(wire.len(), 2 * (FRAME_SIZE + MAX_NOISE));
    }
}
