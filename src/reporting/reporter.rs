use std::fmt;
use std::io::{self, Write};
use tokio::sync::mpsc::UnboundedReceiver;
use crate::core::{BatchEvent, BatchSummary, ItemOutcome};
use crate::utils::extract_filename;

/// Consumes batch events for display. The pipeline never prints on its own.
pub trait BatchReporter {
    fn report(&mut self, event: &BatchEvent) -> io::Result<()>;
}

/// Feeds every event of a batch to `reporter` until the stream closes.
///
/// Returns the final summary, or `None` when the batch ended with a fatal event.
pub async fn drain_events<R: BatchReporter + ?Sized>(
    mut events: UnboundedReceiver<BatchEvent>,
    reporter: &mut R,
) -> io::Result<Option<BatchSummary>> {
    while let Some(event) = events.recv().await {
        reporter.report(&event)?;
        if event.is_terminal() {
            return Ok(match event {
                BatchEvent::Finished { summary } => Some(summary),
                _ => None,
            });
        }
    }
    Ok(None)
}

/// Human-readable progress log, one line per event.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BatchReporter for ConsoleReporter<W> {
    fn report(&mut self, event: &BatchEvent) -> io::Result<()> {
        match event {
            BatchEvent::Started { total_files, .. } if *total_files == 0 => Ok(()),
            BatchEvent::Started { total_files, output_dir, .. } => {
                writeln!(self.out, "Output directory ensured at: {}", output_dir.display())?;
                writeln!(self.out, "Found {} supported image(s) in the input directory.", total_files)
            }
            BatchEvent::Item { result, progress } => match &result.outcome {
                ItemOutcome::Success { output_path } => writeln!(
                    self.out,
                    "[{}/{}] Added logo to '{}' and saved as '{}'.",
                    progress.completed,
                    progress.total,
                    result.filename,
                    extract_filename(output_path)
                ),
                ItemOutcome::Failure { reason } => writeln!(
                    self.out,
                    "[{}/{}] Failed to process '{}': {}",
                    progress.completed, progress.total, result.filename, reason
                ),
            },
            BatchEvent::Fatal { reason } => writeln!(self.out, "Batch aborted: {}", reason),
            BatchEvent::Finished { summary } if summary.total_files == 0 => {
                writeln!(self.out, "No supported images found in the input directory.")
            }
            BatchEvent::Finished { summary } => write!(self.out, "{}", SummaryReport(summary)),
        }
    }
}

/// One JSON object per event per line.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BatchReporter for JsonReporter<W> {
    fn report(&mut self, event: &BatchEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)
    }
}

/// Closing lines for a finished batch.
struct SummaryReport<'a>(&'a BatchSummary);

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        writeln!(
            f,
            "Processing completed: {} image(s) processed in {}.",
            summary.processed(),
            format_elapsed(summary.elapsed_ms)
        )?;
        writeln!(f, "- Succeeded: {}", summary.succeeded)?;
        writeln!(f, "- Failed: {}", summary.failed)?;
        if summary.cancelled > 0 {
            writeln!(f, "- Cancelled: {}", summary.cancelled)?;
        }
        writeln!(f, "- Total: {}", summary.total_files)
    }
}

/// Rounds to hundredths of a second before splitting off minutes.
fn format_elapsed(ms: u64) -> String {
    let centis = (ms + 5) / 10;
    let (minutes, rest) = (centis / 6000, centis % 6000);
    let seconds = format!("{}.{:02}s", rest / 100, rest % 100);
    if minutes > 0 {
        format!("{}m {}", minutes, seconds)
    } else {
        seconds
    }
}
