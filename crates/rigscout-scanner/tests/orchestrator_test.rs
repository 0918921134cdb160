//! Scheduling, retry, cancellation and persistence behavior of the orchestrator.

mod common;

use async_trait::async_trait;
use common::{arc, listing_url, offerup_page, FakeSource, FakeValuation, Page};
use rigscout_core::{
    JobStatus, JobStore, MemoryJobStore, ScanJob, ScanMode, ScanOptions, ScanResultStatus,
};
use rigscout_scanner::{ListingPipeline, ProgressUpdate, ScanError, ScanOrchestrator};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn options() -> ScanOptions {
    ScanOptions {
        concurrency: 2,
        unit_timeout_ms: 1_000,
        retry_failed: false,
        retry_backoff_ms: 10,
        ..ScanOptions::default()
    }
}

fn orchestrator(source: Arc<FakeSource>, valuation: FakeValuation) -> ScanOrchestrator {
    ScanOrchestrator::new(
        ListingPipeline::new(source, arc(valuation)),
        arc(MemoryJobStore::new()),
    )
}

/// `n` fast pages valued at 1000 and priced at 800.
fn fast_pages(n: usize, delay: Duration) -> (FakeSource, FakeValuation) {
    let mut source = FakeSource::new();
    let mut valuation = FakeValuation::new();
    for i in 0..n {
        let url = listing_url(i);
        source = source.page(&url, Page::new(offerup_page(&format!("PC {i}"), 800.0)).slow(delay));
        valuation = valuation.value(&url, 1000.0);
    }
    (source, valuation)
}

#[tokio::test]
async fn test_create_job_normalizes_and_dedupes() {
    let (source, valuation) = fast_pages(2, Duration::ZERO);
    let orch = orchestrator(arc(source), valuation);

    let job = orch
        .create_job(
            &[
                "https://offerup.com/item/detail/0?utm_source=share",
                "   ",
                "http://OFFERUP.com/item/detail/0/",
                "https://offerup.com/item/detail/1#photos",
            ],
            options(),
        )
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.urls, vec![listing_url(0), listing_url(1)]);
    assert_eq!(job.progress.total, 2);
    assert_eq!(orch.list_jobs().await.len(), 1);
}

#[tokio::test]
async fn test_create_job_rejects_bad_input() {
    let (source, valuation) = fast_pages(1, Duration::ZERO);
    let orch = orchestrator(arc(source), valuation);

    let empty: [&str; 2] = ["", "  "];
    assert!(matches!(
        orch.create_job(&empty, options()).await,
        Err(ScanError::Validation(_))
    ));

    let bad = ScanOptions {
        concurrency: 0,
        ..options()
    };
    assert!(matches!(
        orch.create_job(&[listing_url(0)], bad).await,
        Err(ScanError::Validation(_))
    ));
    assert!(orch.list_jobs().await.is_empty());
}

#[tokio::test]
async fn test_counters_add_up() {
    let (source, valuation) = fast_pages(3, Duration::ZERO);
    let source = source.page(&listing_url(9), Page::new(String::new()).failing(5));
    let orch = orchestrator(arc(source), valuation);

    let urls = vec![
        listing_url(0),
        listing_url(1),
        "https://example.com/not-a-marketplace".to_string(),
        listing_url(2),
        listing_url(9),
    ];
    let job = orch.create_job(&urls, options()).await.unwrap();
    let job = orch.start_job(&job.id, None).await.unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    let p = job.progress;
    assert_eq!(p.total, 5);
    assert_eq!(p.processed, 5);
    assert_eq!(p.successful, 3);
    assert_eq!(p.skipped, 1);
    assert_eq!(p.failed, 2);
    assert_eq!(p.processed, p.successful + p.failed);
    assert_eq!(job.results.len(), 5);
    assert!(job.started_at.is_some());
    assert!(job.completed_at.is_some());

    let skipped = job
        .results
        .iter()
        .find(|r| r.status == ScanResultStatus::Skipped)
        .unwrap();
    assert_eq!(skipped.position, 2);
    assert!(skipped.error.as_deref().unwrap().contains("No extraction strategy"));
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let (source, valuation) = fast_pages(7, Duration::from_millis(40));
    let source = arc(source);
    let orch = orchestrator(Arc::clone(&source), valuation);

    let urls: Vec<String> = (0..7).map(listing_url).collect();
    let job = orch.create_job(&urls, options()).await.unwrap();
    let job = orch.start_job(&job.id, None).await.unwrap();

    assert_eq!(job.progress.successful, 7);
    assert!(source.max_in_flight() <= 2, "saw {}", source.max_in_flight());
    assert!(source.max_in_flight() >= 1);
}

#[tokio::test]
async fn test_sequential_mode_runs_one_at_a_time() {
    let (source, valuation) = fast_pages(4, Duration::from_millis(20));
    let source = arc(source);
    let orch = orchestrator(Arc::clone(&source), valuation);

    let opts = ScanOptions {
        concurrency: 8,
        mode: ScanMode::Sequential,
        ..options()
    };
    let urls: Vec<String> = (0..4).map(listing_url).collect();
    let job = orch.create_job(&urls, opts).await.unwrap();
    orch.start_job(&job.id, None).await.unwrap();

    assert_eq!(source.max_in_flight(), 1);
}

#[tokio::test]
async fn test_timeout_becomes_failed_result() {
    let (source, valuation) = fast_pages(1, Duration::from_millis(500));
    let orch = orchestrator(arc(source), valuation);

    let opts = ScanOptions {
        unit_timeout_ms: 50,
        ..options()
    };
    let job = orch.create_job(&[listing_url(0)], opts).await.unwrap();
    let job = orch.start_job(&job.id, None).await.unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    let result = &job.results[0];
    assert_eq!(result.status, ScanResultStatus::Failed);
    assert_eq!(result.error.as_deref(), Some("Timeout after 50 ms"));
    assert_eq!(result.attempts, 1);
}

#[tokio::test]
async fn test_retry_once_after_failure() {
    let (source, valuation) = fast_pages(2, Duration::ZERO);
    let source = source
        .page(&listing_url(0), Page::new(offerup_page("PC 0", 800.0)).failing(1))
        .page(&listing_url(1), Page::new(offerup_page("PC 1", 800.0)).failing(2));
    let orch = orchestrator(arc(source), valuation);

    let opts = ScanOptions {
        retry_failed: true,
        ..options()
    };
    let job = orch
        .create_job(&[listing_url(0), listing_url(1)], opts)
        .await
        .unwrap();
    let job = orch.start_job(&job.id, None).await.unwrap();

    let by_position: HashMap<usize, _> = job.results.iter().map(|r| (r.position, r)).collect();
    assert_eq!(by_position[&0].status, ScanResultStatus::Success);
    assert_eq!(by_position[&0].attempts, 2);
    assert_eq!(by_position[&1].status, ScanResultStatus::Failed);
    assert_eq!(by_position[&1].attempts, 2);
    assert!(by_position[&1].error.as_deref().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn test_cancel_pending_job() {
    let (source, valuation) = fast_pages(3, Duration::ZERO);
    let source = arc(source);
    let orch = orchestrator(Arc::clone(&source), valuation);

    let urls: Vec<String> = (0..3).map(listing_url).collect();
    let job = orch.create_job(&urls, options()).await.unwrap();
    orch.cancel_job(&job.id).await.unwrap();
    assert_eq!(orch.get_job(&job.id).await.unwrap().status, JobStatus::Cancelled);

    let job = orch.start_job(&job.id, None).await.unwrap();
    assert_eq!(job.status, JobStatus::Cancelled);
    assert!(job.results.is_empty());
    assert_eq!(source.total_calls(), 0);
}

#[tokio::test]
async fn test_cancel_running_job_keeps_finished_units() {
    let (source, valuation) = fast_pages(6, Duration::from_millis(100));
    let orch = orchestrator(arc(source), valuation);

    let opts = ScanOptions {
        concurrency: 1,
        ..options()
    };
    let urls: Vec<String> = (0..6).map(listing_url).collect();
    let job = orch.create_job(&urls, opts).await.unwrap();

    let (finished, cancelled) = tokio::join!(orch.start_job(&job.id, None), async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        orch.cancel_job(&job.id).await
    });
    cancelled.unwrap();
    let job = finished.unwrap();

    assert_eq!(job.status, JobStatus::Cancelled);
    assert!(job.progress.processed >= 1);
    assert!(job.progress.processed < 6);
    assert_eq!(job.results.len(), job.progress.processed);
    assert!(job.results.iter().all(|r| r.status == ScanResultStatus::Success));
}

#[tokio::test]
async fn test_second_start_is_rejected() {
    let (source, valuation) = fast_pages(2, Duration::from_millis(200));
    let orch = orchestrator(arc(source), valuation);

    let job = orch
        .create_job(&[listing_url(0), listing_url(1)], options())
        .await
        .unwrap();

    let (first, second) = tokio::join!(orch.start_job(&job.id, None), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        orch.start_job(&job.id, None).await
    });
    assert_eq!(first.unwrap().status, JobStatus::Completed);
    assert!(matches!(second, Err(ScanError::AlreadyRunning(_))));

    // A finished job cannot be restarted either.
    assert!(matches!(
        orch.start_job(&job.id, None).await,
        Err(ScanError::InvalidState { .. })
    ));
}

#[tokio::test]
async fn test_unknown_job() {
    let (source, valuation) = fast_pages(1, Duration::ZERO);
    let orch = orchestrator(arc(source), valuation);
    assert!(matches!(orch.get_job("missing").await, Err(ScanError::NotFound(_))));
    assert!(matches!(orch.cancel_job("missing").await, Err(ScanError::NotFound(_))));
    assert!(matches!(orch.start_job("missing", None).await, Err(ScanError::NotFound(_))));
}

#[tokio::test]
async fn test_progress_callback_after_every_unit() {
    let (source, valuation) = fast_pages(4, Duration::ZERO);
    let orch = orchestrator(arc(source), valuation);

    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::default();
    let sink = Arc::clone(&updates);
    let callback = Arc::new(move |update: ProgressUpdate| sink.lock().unwrap().push(update));

    let urls: Vec<String> = (0..4).map(listing_url).collect();
    let job = orch.create_job(&urls, options()).await.unwrap();
    orch.start_job(&job.id, Some(callback)).await.unwrap();

    let updates = updates.lock().unwrap();
    assert_eq!(updates.len(), 4);
    let currents: Vec<usize> = updates.iter().map(|u| u.current).collect();
    assert_eq!(currents, vec![1, 2, 3, 4]);
    assert!(updates.iter().all(|u| u.total == 4));
    assert!((updates[3].progress - 100.0).abs() < f64::EPSILON);
    assert!(updates[0].status_text.starts_with("Analyzed"));
}

#[tokio::test]
async fn test_no_valuation_data_is_skipped_with_listing() {
    let source = FakeSource::new().page(&listing_url(0), Page::new(offerup_page("PC 0", 300.0)));
    let orch = orchestrator(arc(source), FakeValuation::new());

    let job = orch.create_job(&[listing_url(0)], options()).await.unwrap();
    let job = orch.start_job(&job.id, None).await.unwrap();

    let result = &job.results[0];
    assert_eq!(result.status, ScanResultStatus::Skipped);
    assert!(result.listing.is_some());
    assert!(result.analysis.is_none());
    assert_eq!(job.progress.skipped, 1);
}

#[tokio::test]
async fn test_filters_skip_but_keep_analysis() {
    let (source, valuation) = fast_pages(1, Duration::ZERO);
    let orch = orchestrator(arc(source), valuation);

    let mut opts = options();
    opts.filters.max_price = Some(500.0);
    let job = orch.create_job(&[listing_url(0)], opts).await.unwrap();
    let job = orch.start_job(&job.id, None).await.unwrap();

    let result = &job.results[0];
    assert_eq!(result.status, ScanResultStatus::Skipped);
    assert!(result.error.as_deref().unwrap().starts_with("Filtered"));
    assert!(result.listing.is_some());
    assert!(result.analysis.is_some());
}

#[tokio::test]
async fn test_panicking_unit_is_recorded_as_failed() {
    let (source, valuation) = fast_pages(5, Duration::ZERO);
    let orch = orchestrator(arc(source), valuation.panic_on(&listing_url(0)));

    let urls: Vec<String> = (0..5).map(listing_url).collect();
    let job = orch.create_job(&urls, options()).await.unwrap();
    let job = orch.start_job(&job.id, None).await.unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error_message.is_none());
    assert_eq!(job.results.len(), 5);
    assert_eq!(job.progress.processed, 5);
    assert_eq!(job.progress.successful, 4);
    assert_eq!(job.progress.failed, 1);

    let crashed = job
        .results
        .iter()
        .find(|r| r.status == ScanResultStatus::Failed)
        .expect("failed unit");
    assert_eq!(crashed.position, 0);
    assert!(crashed.error.as_deref().unwrap().starts_with("Unit panicked"));
}

#[tokio::test]
async fn test_load_jobs_marks_running_as_interrupted() {
    let mut running = ScanJob::new(vec![listing_url(0)], ScanOptions::default());
    running.mark_running();
    let pending = ScanJob::new(vec![listing_url(1)], ScanOptions::default());

    let store = arc(MemoryJobStore::with_jobs(HashMap::from([
        (running.id.clone(), running.clone()),
        (pending.id.clone(), pending.clone()),
    ])));
    let (source, valuation) = fast_pages(1, Duration::ZERO);
    let orch = ScanOrchestrator::new(
        ListingPipeline::new(arc(source), arc(valuation)),
        Arc::clone(&store) as Arc<dyn JobStore>,
    );

    assert_eq!(orch.load_jobs().await.unwrap(), 2);

    let restored = orch.get_job(&running.id).await.unwrap();
    assert_eq!(restored.status, JobStatus::Failed);
    assert_eq!(restored.error_message.as_deref(), Some("interrupted"));
    assert_eq!(orch.get_job(&pending.id).await.unwrap().status, JobStatus::Pending);

    let persisted = store.load().await.unwrap();
    assert_eq!(persisted[&running.id].status, JobStatus::Failed);
}

/// Memory store that counts whole-map and single-job writes.
#[derive(Default)]
struct CountingStore {
    inner: MemoryJobStore,
    map_saves: AtomicUsize,
    job_saves: AtomicUsize,
}

#[async_trait]
impl JobStore for CountingStore {
    async fn load(&self) -> rigscout_core::Result<HashMap<String, ScanJob>> {
        self.inner.load().await
    }

    async fn save(&self, jobs: &HashMap<String, ScanJob>) -> rigscout_core::Result<()> {
        self.map_saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(jobs).await
    }

    async fn save_job(&self, job: &ScanJob) -> rigscout_core::Result<()> {
        self.job_saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_job(job).await
    }
}

#[tokio::test]
async fn test_running_job_persists_only_itself() {
    let store = arc(CountingStore::default());
    let (source, valuation) = fast_pages(3, Duration::ZERO);
    let orch = ScanOrchestrator::new(
        ListingPipeline::new(arc(source), arc(valuation)),
        Arc::clone(&store) as Arc<dyn JobStore>,
    );

    let other = orch.create_job(&[listing_url(9)], options()).await.unwrap();
    let job = orch
        .create_job(&(0..3).map(listing_url).collect::<Vec<_>>(), options())
        .await
        .unwrap();
    orch.start_job(&job.id, None).await.unwrap();

    assert_eq!(store.map_saves.load(Ordering::SeqCst), 0);
    // two creates, start, three results, finish
    assert_eq!(store.job_saves.load(Ordering::SeqCst), 7);

    let persisted = store.load().await.unwrap();
    assert_eq!(persisted[&job.id].status, JobStatus::Completed);
    assert_eq!(persisted[&job.id].results.len(), 3);
    assert_eq!(persisted[&other.id].status, JobStatus::Pending);
}
