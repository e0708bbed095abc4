use std::io::{IsTerminal, Write};

use chrono::{DateTime, SecondsFormat};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use telelink_frame::Telemetry;
use telelink_ingest::{RecordSink, SinkError};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Record sink that renders each record to a writer.
#[derive(Debug)]
pub struct RecordPrinter<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> RecordPrinter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordSink for RecordPrinter<W> {
    fn publish(&mut self, record: Telemetry) -> Result<(), SinkError> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &record)?;
                writeln!(self.out)?;
            }
            OutputFormat::Table => {
                writeln!(self.out, "{}", record_table(&record))?;
            }
            OutputFormat::Pretty => {
                writeln!(self.out, "{}", pretty_line(&record))?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

pub fn pretty_line(t: &Telemetry) -> String {
    format!(
        "ID={} t={} lat={:.6} lon={:.6} alt={:.1}m rpm={} acc=[{},{},{}] V={}mV I={}mA RSSI={} SNR={:.1} cnt={}",
        t.id,
        format_timestamp(t.timestamp),
        t.latitude,
        t.longitude,
        t.altitude,
        t.rpm,
        t.accel_x,
        t.accel_y,
        t.accel_z,
        t.voltage_mv,
        t.current_ma,
        t.rssi,
        t.snr,
        t.packet_count
    )
}

fn record_table(t: &Telemetry) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "ID", "TIME", "LAT", "LON", "ALT", "RPM", "ACCEL", "V (mV)", "I (mA)", "RSSI", "SNR",
            "COUNT",
        ])
        .add_row(vec![
            t.id.clone(),
            format_timestamp(t.timestamp),
            format!("{:.6}", t.latitude),
            format!("{:.6}", t.longitude),
            format!("{:.1}", t.altitude),
            t.rpm.to_string(),
            format!("{},{},{}", t.accel_x, t.accel_y, t.accel_z),
            t.voltage_mv.to_string(),
            t.current_ma.to_string(),
            t.rssi.to_string(),
            format!("{:.1}", t.snr),
            t.packet_count.to_string(),
        ]);
    table
}

/// RFC 3339 UTC rendering of a frame timestamp.
pub fn format_timestamp(seconds: u32) -> String {
    DateTime::from_timestamp(i64::from(seconds), 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| seconds.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Telemetry {
        Telemetry {
            id: "rover-01".to_string(),
            timestamp: 1_700_000_000,
            latitude: -34.5,
            longitude: -58.25,
            altitude: 25.5,
            rpm: 3200,
            accel_x: -12,
            accel_y: 7,
            accel_z: 981,
            voltage_mv: 12_400,
            current_ma: 850,
            rssi: -87,
            snr: 9.3,
            packet_count: 42,
        }
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn pretty_line_matches_console_format() {
        assert_eq!(
            pretty_line(&sample()),
            "ID=rover-01 t=2023-11-14T22:13:20Z lat=-34.500000 lon=-58.250000 alt=25.5m \
             rpm=3200 acc=[-12,7,981] V=12400mV I=850mA RSSI=-87 SNR=9.3 cnt=42"
        );
    }

    #[test]
    fn json_printer_writes_one_object_per_line() {
        let mut printer = RecordPrinter::new(Vec::new(), OutputFormat::Json);
        printer.publish(sample()).unwrap();
        printer.publish(sample()).unwrap();

        let out = String::from_utf8(printer.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["id"], "rover-01");
        assert_eq!(value["packet_count"], 42);
        assert_eq!(value["rssi"], -87);
    }

    #[test]
    fn table_printer_includes_header_and_values() {
        let mut printer = RecordPrinter::new(Vec::new(), OutputFormat::Table);
        printer.publish(sample()).unwrap();

        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert!(out.contains("COUNT"));
        assert!(out.contains("rover-01"));
        assert!(out.contains("2023-11-14T22:13:20Z"));
    }

    #[test]
    fn write_failure_is_a_sink_error() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut printer = RecordPrinter::new(Broken, OutputFormat::Pretty);
        let err = printer.publish(sample()).unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
    }
}
