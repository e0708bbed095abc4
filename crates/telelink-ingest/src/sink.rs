use telelink_frame::Telemetry;

use crate::error::SinkError;

/// Destination for decoded records, invoked once per valid frame, in order.
pub trait RecordSink {
    fn publish(&mut self, record: Telemetry) -> Result<(), SinkError>;
}

impl<F> RecordSink for F
where
    F: FnMut(Telemetry) -> Result<(), SinkError>,
{
    fn publish(&mut self, record: Telemetry) -> Result<(), SinkError> {
        self(record)
    }
}

/// Sink that keeps every record in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectSink {
    records: Vec<Telemetry>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Telemetry] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Telemetry> {
        self.records
    }
}

impl RecordSink for CollectSink {
    fn publish(&mut self, record: Telemetry) -> Result<(), SinkError> {
        self.records.push(record);
        Ok(())
    }
}
