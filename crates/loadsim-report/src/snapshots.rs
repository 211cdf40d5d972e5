//! JSON-lines stream of tick snapshots.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use loadsim_core::{Server, TickSnapshot};

use crate::error::ReportResult;
use crate::sink::StatusSink;
use crate::summary::RunSummary;

/// Writes one JSON object per tick.
pub struct JsonLines<W: Write> {
    out: W,
}

impl JsonLines<BufWriter<File>> {
    pub fn create(path: &Path) -> ReportResult<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatusSink for JsonLines<W> {
    fn on_tick(&mut self, snapshot: &TickSnapshot, _servers: &[Server]) -> ReportResult<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn on_finish(&mut self, _summary: &RunSummary) -> ReportResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
