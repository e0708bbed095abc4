use std::path::Path;

use telelink_frame::BinaryDecoder;
use telelink_ingest::IngestLoop;
use telelink_source::{CancellationToken, ReaderSource, SourceConfig, SUPPORTED_BAUD_RATES};
use tracing::{info, warn};

use crate::cmd::{parse_duration, RunArgs};
use crate::exit::{ingest_error, source_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{OutputFormat, RecordPrinter};

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    if args.chunk_size == 0 {
        return Err(CliError::new(USAGE, "--chunk-size must be greater than zero"));
    }
    if !SUPPORTED_BAUD_RATES.contains(&args.baud) {
        return Err(CliError::new(
            USAGE,
            format!("--baud must be one of {SUPPORTED_BAUD_RATES:?}"),
        ));
    }
    let config = SourceConfig {
        read_timeout: parse_duration(&args.read_timeout)?,
        chunk_size: args.chunk_size,
        baud_rate: args.baud,
        ..SourceConfig::default()
    };

    let source = if args.port == Path::new("-") {
        ReaderSource::stdin(config)
    } else {
        ReaderSource::open(&args.port, config)
    }
    .map_err(|err| source_error("open failed", err))?;

    let cancel = CancellationToken::new();
    install_ctrlc_handler(cancel.clone())?;

    let sink = RecordPrinter::new(std::io::stdout(), format);
    let mut ingest = IngestLoop::new(source, BinaryDecoder, sink);
    if args.report_rejects {
        ingest = ingest.on_reject(|err| warn!(kind = err.kind(), %err, "rejected frame"));
    }
    if let Some(count) = args.count {
        ingest = ingest.with_record_limit(count);
    }

    info!(port = %args.port.display(), "reading telemetry");
    let result = ingest.run(&cancel);

    let stats = ingest.stats();
    info!(
        chunks = stats.chunks,
        bytes = stats.bytes,
        published = stats.published,
        rejected = stats.rejected(),
        discarded_bytes = stats.discarded_bytes,
        "ingest summary"
    );

    match result {
        Ok(()) => Ok(SUCCESS),
        Err(err) if err.is_cancelled() || err.is_end_of_stream() => Ok(SUCCESS),
        Err(err) => Err(ingest_error("ingest failed", err)),
    }
}

fn install_ctrlc_handler(cancel: CancellationToken) -> CliResult<()> {
    ctrlc::set_handler(move || cancel.cancel()).map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })
}
