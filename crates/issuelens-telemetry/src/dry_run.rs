//! Human-readable report used instead of telemetry in dry-run mode

use issuelens_domain::Record;
use std::io::{self, Write};

/// Writes a plain-text summary of extracted records
///
/// Nothing is sent anywhere; the report only goes to the wrapped writer.
pub struct DryRunReporter<W: Write> {
    out: W,
}

impl DryRunReporter<io::Stdout> {
    /// Reporter that writes to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DryRunReporter<W> {
    /// Reporter over any writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print the total followed by title, URL and summary per record
    pub fn report(&mut self, records: &[Record]) -> io::Result<()> {
        writeln!(self.out, "---- DRY RUN OUTPUT ----")?;
        writeln!(self.out, "Total issues processed: {}", records.len())?;

        for record in records {
            writeln!(self.out, "Issue Title: {}", record.title)?;
            writeln!(self.out, "URL: {}", record.url)?;
            writeln!(self.out, "Summary: {}", record.body_summary)?;
            writeln!(self.out, "-----")?;
        }

        self.out.flush()
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}
