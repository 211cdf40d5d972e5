//! Plain-text run log.
//!
//! Records the queue size when the run starts, each request that arrives
//! during the run, and the queue size when it ends:
//!
//! ```text
//! Queue size: 1000
//! Request ID: 412
//! Request Time: 37
//! Queue size: 388
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use loadsim_core::Request;

use crate::error::ReportResult;
use crate::sink::{AdmissionKind, RunStart, StatusSink};
use crate::summary::RunSummary;

/// Writes the run log to any writer.
pub struct RunLog<W: Write> {
    out: W,
}

impl RunLog<BufWriter<File>> {
    /// Create (or truncate) a log file at `path`.
    pub fn create(path: &Path) -> ReportResult<Self> {
        let file = File::create(path)?;
        debug!(path = %path.display(), "run log opened");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RunLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatusSink for RunLog<W> {
    fn on_start(&mut self, start: &RunStart) -> ReportResult<()> {
        writeln!(self.out, "Queue size: {}", start.queue_size)?;
        Ok(())
    }

    fn on_admit(&mut self, request: &Request, kind: AdmissionKind) -> ReportResult<()> {
        if kind == AdmissionKind::Arrival {
            writeln!(self.out, "Request ID: {}", request.id())?;
            writeln!(self.out, "Request Time: {}", request.processing_time())?;
        }
        Ok(())
    }

    fn on_finish(&mut self, summary: &RunSummary) -> ReportResult<()> {
        writeln!(self.out, "Queue size: {}", summary.final_queue_size)?;
        self.out.flush()?;
        Ok(())
    }
}
