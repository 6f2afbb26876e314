use std::io::Write;

use super::{FileAnalysis, ReportError, Reporter};

/// Writes the analyses as a pretty-printed JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for JsonReporter {
    fn write_report(
        &self,
        writer: &mut dyn Write,
        analyses: &[FileAnalysis],
    ) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut *writer, analyses)?;
        writeln!(writer)?;
        Ok(())
    }
}
