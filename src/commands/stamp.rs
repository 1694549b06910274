use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::processing::{BatchConfig, BatchCoordinator, BatchHandle};
use crate::reporting::{ConsoleReporter, JsonReporter, drain_events};
use crate::settings::SettingsStore;
use crate::core::BatchSummary;
use crate::utils::{StamperError, StamperResult};
use crate::worker::WorkerError;

use super::SettingsUpdate;

/// How batch events are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

/// Everything the `stamp` command takes on top of saved settings.
#[derive(Debug, Clone, Default)]
pub struct StampOptions {
    pub overrides: SettingsUpdate,
    pub workers: Option<usize>,
    pub quality: Option<u8>,
    pub format: ReportFormat,
    /// Persist the resolved settings before running
    pub save: bool,
}

impl StampOptions {
    fn batch_config(&self) -> BatchConfig {
        let defaults = BatchConfig::default();
        BatchConfig {
            max_workers: self.workers.unwrap_or(defaults.max_workers),
            jpeg_quality: self.quality.unwrap_or(defaults.jpeg_quality),
        }
    }
}

/// Runs one batch from saved settings overlaid with `options`.
///
/// Cancelling `shutdown` stops dispatch; in-flight items still finish and the
/// summary is still reported. Returns `Err` for validation problems and
/// batch-fatal conditions, never for individual item failures.
pub async fn stamp(
    options: StampOptions,
    store: &SettingsStore,
    shutdown: CancellationToken,
) -> StamperResult<BatchSummary> {
    let mut settings = store.load_or_default();
    options.overrides.apply(&mut settings)?;
    let request = settings.to_request()?;

    let config = options.batch_config();
    config.validate()?;

    if options.save {
        store.save(&settings)?;
        info!("Settings saved to {}", store.path().display());
    }

    debug!(
        "Resolved request: input={}, output={}, logo={}, placement={:?}",
        request.input_dir.display(),
        request.output_dir.display(),
        request.logo_path.display(),
        request.placement
    );

    let BatchHandle { events, cancel, join } = BatchCoordinator::new(config).start(request);

    let forward = tokio::spawn(async move {
        shutdown.cancelled().await;
        info!("Stopping after in-flight images finish");
        cancel.cancel();
    });

    let drained = match options.format {
        ReportFormat::Console => drain_events(events, &mut ConsoleReporter::stdout()).await,
        ReportFormat::Json => drain_events(events, &mut JsonReporter::stdout()).await,
    };
    forward.abort();

    let outcome = join.await.map_err(|e| StamperError::from(WorkerError::from(e)))?;
    report_io(drained)?;
    outcome
}

fn report_io<T>(result: io::Result<T>) -> StamperResult<T> {
    result.map_err(|e| StamperError::io(format!("Failed to write report: {e}")))
}
