use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{self, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::{
    BatchEvent, BatchJob, BatchRequest, BatchSummary, ItemOutcome, ItemResult, LogoAsset, Progress,
};
use crate::processing::executor::process_item;
use crate::utils::{
    ItemError, StamperError, StamperResult, ensure_output_dir, extract_filename, list_eligible_files,
    validate_request,
};
use crate::worker::{WorkerError, WorkerPool};

use super::BatchConfig;

/// A batch running in the background.
pub struct BatchHandle {
    /// Event stream; closes after the terminal event
    pub events: UnboundedReceiver<BatchEvent>,
    /// Cancel to stop dispatching further items
    pub cancel: CancellationToken,
    pub join: JoinHandle<StamperResult<BatchSummary>>,
}

/// Runs batches: sets up a [`BatchJob`], fans items out to a bounded worker
/// pool and turns completions into [`BatchEvent`]s.
///
/// The coordinator task is the only writer of the batch counters; workers
/// hand back [`ItemResult`]s and never touch shared state.
#[derive(Clone)]
pub struct BatchCoordinator {
    config: BatchConfig,
}

/// Running totals, owned by the coordinator loop.
struct Counters {
    total: usize,
    succeeded: usize,
    failed: usize,
}

impl Counters {
    fn record(&mut self, result: &ItemResult) -> Progress {
        if result.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        Progress::new(self.succeeded + self.failed, self.total)
    }
}

impl BatchCoordinator {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Spawns the batch on the current tokio runtime.
    pub fn start(&self, request: BatchRequest) -> BatchHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let coordinator = self.clone();
        let token = cancel.clone();
        let join = tokio::spawn(async move { coordinator.run(request, tx, token).await });

        BatchHandle { events: rx, cancel, join }
    }

    /// Runs one batch to completion, emitting events on `events`.
    ///
    /// Returns `Err` only for batch-fatal conditions (invalid request, output
    /// directory not creatable, logo not loadable, input directory not
    /// listable), in which case a single `Fatal` event was emitted and no item
    /// was processed. Item failures are reported as events and counted.
    pub async fn run(
        &self,
        request: BatchRequest,
        events: UnboundedSender<BatchEvent>,
        cancel: CancellationToken,
    ) -> StamperResult<BatchSummary> {
        let started = Instant::now();

        let job = match self.prepare(request).await {
            Ok(job) => job,
            Err(e) => {
                let reason = e.to_string();
                warn!("Batch aborted: {}", reason);
                let _ = events.send(BatchEvent::Fatal { reason: reason.clone() });
                return Err(StamperError::batch_fatal(reason));
            }
        };

        let total = job.total_files();
        let _ = events.send(BatchEvent::Started {
            total_files: total,
            input_dir: job.input_dir.clone(),
            output_dir: job.output_dir.clone(),
        });

        if total == 0 {
            info!("No supported images found in {}", job.input_dir.display());
            let summary = BatchSummary {
                elapsed_ms: started.elapsed().as_millis() as u64,
                ..BatchSummary::default()
            };
            let _ = events.send(BatchEvent::Finished { summary });
            return Ok(summary);
        }

        let (counters, cancelled) = self.dispatch(&job, &events, &cancel).await;

        let summary = BatchSummary {
            total_files: total,
            succeeded: counters.succeeded,
            failed: counters.failed,
            cancelled,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        if summary.failed > 0 || summary.cancelled > 0 {
            warn!(
                "Batch finished: {} succeeded, {} failed, {} cancelled out of {}",
                summary.succeeded, summary.failed, summary.cancelled, total
            );
        } else {
            info!("Batch finished: {} image(s) stamped in {}ms", summary.succeeded, summary.elapsed_ms);
        }

        let _ = events.send(BatchEvent::Finished { summary });
        Ok(summary)
    }

    /// Setup steps that abort the whole batch on failure, in order: output
    /// directory, logo, input listing.
    async fn prepare(&self, request: BatchRequest) -> StamperResult<BatchJob> {
        self.config.validate()?;
        validate_request(&request)?;

        ensure_output_dir(&request.output_dir)
            .await
            .map_err(|e| StamperError::batch_fatal(format!("output directory error: {e}")))?;
        debug!("Output directory ensured at: {}", request.output_dir.display());

        let logo_path = request.logo_path.clone();
        let logo = tokio::task::spawn_blocking(move || LogoAsset::open(&logo_path))
            .await
            .map_err(|e| StamperError::from(WorkerError::from(e)))
            .and_then(|loaded| loaded)
            .map_err(|e| StamperError::batch_fatal(format!("logo load error: {e}")))?;
        let (logo_w, logo_h) = logo.dimensions();
        debug!("Loaded logo from {}: {}×{}", request.logo_path.display(), logo_w, logo_h);

        let files = list_eligible_files(&request.input_dir)
            .await
            .map_err(|e| StamperError::batch_fatal(format!("input directory error: {e}")))?;

        Ok(BatchJob {
            input_dir: request.input_dir,
            output_dir: request.output_dir,
            logo: Arc::new(logo),
            placement: request.placement,
            files: files.into(),
        })
    }

    /// Dispatches every file under the worker cap and drains completions as
    /// they arrive. Returns the final counters and how many files were never
    /// dispatched because of cancellation.
    async fn dispatch(
        &self,
        job: &BatchJob,
        events: &UnboundedSender<BatchEvent>,
        cancel: &CancellationToken,
    ) -> (Counters, usize) {
        let pool = WorkerPool::new(Some(self.config.max_workers));
        let mut counters = Counters { total: job.total_files(), succeeded: 0, failed: 0 };
        let mut in_flight: JoinSet<ItemResult> = JoinSet::new();
        let mut in_flight_paths: HashMap<task::Id, PathBuf> = HashMap::new();
        info!(
            "Stamping {} image(s) with up to {} workers",
            counters.total, pool.worker_count()
        );

        let mut pending = job.files.iter();
        let mut next = pending.next();
        let mut cancelled = 0;

        loop {
            tokio::select! {
                biased;

                Some(joined) = in_flight.join_next_with_id() => {
                    let result = match joined {
                        Ok((id, result)) => {
                            in_flight_paths.remove(&id);
                            result
                        }
                        Err(e) => {
                            // Items catch their own panics; this only fires if the task was torn down.
                            let path = in_flight_paths.remove(&e.id()).unwrap_or_default();
                            warn!("Worker task for {} lost: {}", path.display(), e);
                            lost_item(&path, WorkerError::from(e))
                        }
                    };
                    self.report(&mut counters, result, events);
                    debug!("{} worker(s) still busy", pool.active_workers());
                }

                _ = cancel.cancelled(), if next.is_some() => {
                    cancelled = pending.len() + 1;
                    next = None;
                    info!("Cancellation requested, {} image(s) will not be dispatched", cancelled);
                }

                slot = pool.acquire(), if next.is_some() => {
                    let Some(path) = next.take() else { continue };
                    next = pending.next();

                    let slot = match slot {
                        Ok(slot) => slot,
                        Err(e) => {
                            self.report(&mut counters, lost_item(path, e), events);
                            continue;
                        }
                    };

                    let input_path = path.clone();
                    let output_dir = job.output_dir.clone();
                    let logo = Arc::clone(&job.logo);
                    let placement = job.placement;
                    let quality = self.config.jpeg_quality;

                    let spawned = in_flight.spawn_blocking(move || {
                        let _slot = slot;
                        catch_unwind(AssertUnwindSafe(|| {
                            process_item(&input_path, &output_dir, &logo, &placement, quality)
                        }))
                        .unwrap_or_else(|_| {
                            lost_item(&input_path, ItemError::Worker("item processing panicked".to_string()))
                        })
                    });
                    in_flight_paths.insert(spawned.id(), path.clone());
                }

                else => break,
            }
        }

        pool.close();
        (counters, cancelled)
    }

    fn report(&self, counters: &mut Counters, result: ItemResult, events: &UnboundedSender<BatchEvent>) {
        let progress = counters.record(&result);
        match &result.outcome {
            ItemOutcome::Success { output_path } => debug!(
                "[{}/{}] Added logo to '{}' and saved to {}",
                progress.completed,
                progress.total,
                result.filename,
                output_path.display()
            ),
            ItemOutcome::Failure { reason } => warn!(
                "[{}/{}] Failed to process '{}': {}",
                progress.completed, progress.total, result.filename, reason
            ),
        }
        let _ = events.send(BatchEvent::Item { result, progress });
    }
}

/// Failure result for an item whose worker never produced one.
fn lost_item(path: &Path, err: impl Into<ItemError>) -> ItemResult {
    ItemResult::failure(extract_filename(path), path.to_path_buf(), err.into().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Anchor, PlacementSpec};
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn write_logo(dir: &Path) -> PathBuf {
        let path = dir.join("logo.png");
        RgbaImage::from_pixel(50, 50, Rgba([255, 255, 255, 200])).save(&path).unwrap();
        path
    }

    fn request(input: &Path, output: &Path, logo: &Path) -> BatchRequest {
        BatchRequest {
            input_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            logo_path: logo.to_path_buf(),
            placement: PlacementSpec::new(Anchor::BottomRight, 0.2, 128).unwrap(),
        }
    }

    async fn collect(mut rx: UnboundedReceiver<BatchEvent>) -> Vec<BatchEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn every_file_yields_one_result_and_summary_comes_last() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in");
        std::fs::create_dir(&input).unwrap();
        for i in 0..12 {
            RgbImage::from_pixel(60 + i, 40, Rgb([10, 20, 30])).save(input.join(format!("img{i}.png"))).unwrap();
        }
        std::fs::write(input.join("broken.gif"), b"GIF89a?").unwrap();
        std::fs::write(input.join("notes.txt"), b"skip me").unwrap();
        let logo = write_logo(tmp.path());

        let coordinator = BatchCoordinator::new(BatchConfig { max_workers: 3, ..Default::default() });
        let (tx, rx) = mpsc::unbounded_channel();
        let summary = coordinator
            .run(request(&input, &tmp.path().join("out"), &logo), tx, CancellationToken::new())
            .await
            .unwrap();
        let events = collect(rx).await;

        assert_eq!(summary.total_files, 13);
        assert_eq!(summary.succeeded, 12);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.cancelled, 0);
        assert!(summary.is_complete());

        assert!(matches!(events.first(), Some(BatchEvent::Started { total_files: 13, .. })));
        assert!(matches!(events.last(), Some(BatchEvent::Finished { summary: s }) if *s == summary));

        let items: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Item { result, progress } => Some((result, progress)),
                _ => None,
            })
            .collect();
        assert_eq!(items.len(), 13);
        // Completion counts increase by one per event regardless of which item finished.
        for (i, (_, progress)) in items.iter().enumerate() {
            assert_eq!(progress.completed, i + 1);
            assert_eq!(progress.total, 13);
        }
        let failed: Vec<_> = items.iter().filter(|(r, _)| !r.is_success()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0.filename, "broken.gif");

        assert_eq!(std::fs::read_dir(tmp.path().join("out")).unwrap().count(), 12);
    }

    #[tokio::test]
    async fn missing_logo_is_fatal_and_processes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        RgbImage::new(20, 20).save(tmp.path().join("a.png")).unwrap();
        let out = tmp.path().join("out");

        let coordinator = BatchCoordinator::new(BatchConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let err = coordinator
            .run(request(tmp.path(), &out, &tmp.path().join("nope.png")), tx, CancellationToken::new())
            .await
            .unwrap_err();
        let events = collect(rx).await;

        assert!(err.is_batch_fatal());
        assert_eq!(events.len(), 1);
        match &events[0] {
            BatchEvent::Fatal { reason } => assert!(reason.starts_with("logo load error"), "{reason}"),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn directory_as_logo_is_a_logo_load_failure() {
        let tmp = tempfile::tempdir().unwrap();
        RgbImage::new(20, 20).save(tmp.path().join("a.png")).unwrap();
        let logo_dir = tmp.path().join("logo.png");
        std::fs::create_dir(&logo_dir).unwrap();

        let coordinator = BatchCoordinator::new(BatchConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let err = coordinator
            .run(request(tmp.path(), &tmp.path().join("out"), &logo_dir), tx, CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_batch_fatal());
        let events = collect(rx).await;
        assert!(matches!(&events[..], [BatchEvent::Fatal { reason }] if reason.starts_with("logo load error")));
    }

    #[tokio::test]
    async fn uncreatable_output_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let logo = write_logo(tmp.path());
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let coordinator = BatchCoordinator::new(BatchConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let err = coordinator
            .run(request(tmp.path(), &blocker.join("out"), &logo), tx, CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_batch_fatal());
        let events = collect(rx).await;
        assert!(matches!(&events[..], [BatchEvent::Fatal { reason }] if reason.starts_with("output directory error")));
    }

    #[tokio::test]
    async fn empty_input_dir_reports_zero_item_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in");
        std::fs::create_dir(&input).unwrap();
        std::fs::write(input.join("readme.md"), b"# nothing").unwrap();
        let logo = write_logo(tmp.path());

        let coordinator = BatchCoordinator::new(BatchConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let summary = coordinator
            .run(request(&input, &tmp.path().join("out"), &logo), tx, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.processed(), 0);
        let events = collect(rx).await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], BatchEvent::Started { total_files: 0, .. }));
        assert!(matches!(events[1], BatchEvent::Finished { .. }));
    }

    #[tokio::test]
    async fn cancelled_before_start_dispatches_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in");
        std::fs::create_dir(&input).unwrap();
        for i in 0..4 {
            RgbImage::new(30, 30).save(input.join(format!("{i}.bmp"))).unwrap();
        }
        let logo = write_logo(tmp.path());

        let coordinator = BatchCoordinator::new(BatchConfig::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = coordinator
            .run(request(&input, &tmp.path().join("out"), &logo), tx, cancel)
            .await
            .unwrap();

        assert_eq!(summary.total_files, 4);
        assert_eq!(summary.processed(), 0);
        assert_eq!(summary.cancelled, 4);
        let events = collect(rx).await;
        assert!(matches!(events.last(), Some(BatchEvent::Finished { .. })));
    }

    #[tokio::test]
    async fn start_streams_events_through_the_handle() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in");
        std::fs::create_dir(&input).unwrap();
        RgbImage::from_pixel(80, 80, Rgb([0, 0, 0])).save(input.join("a.jpg")).unwrap();
        let logo = write_logo(tmp.path());

        let coordinator = BatchCoordinator::new(BatchConfig::default());
        let handle = coordinator.start(request(&input, &tmp.path().join("out"), &logo));
        let events = collect(handle.events).await;
        let summary = handle.join.await.unwrap().unwrap();

        assert_eq!(summary.succeeded, 1);
        let outputs: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Item { result, .. } => Some(&result.outcome),
                _ => None,
            })
            .collect();
        assert_eq!(
            outputs,
            vec![&ItemOutcome::Success { output_path: tmp.path().join("out").join("a.jpg") }]
        );
    }

    #[tokio::test]
    async fn lost_worker_result_keeps_the_file_name() {
        let join_err = tokio::spawn(async { panic!("worker died") }).await.unwrap_err();
        let path = PathBuf::from("/photos/beach.png");

        let result = lost_item(&path, WorkerError::from(join_err));
        assert_eq!(result.filename, "beach.png");
        assert_eq!(result.input_path, path);
        match result.outcome {
            ItemOutcome::Failure { reason } => assert!(reason.starts_with("worker error:"), "{reason}"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
