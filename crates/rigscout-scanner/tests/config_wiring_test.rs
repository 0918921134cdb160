//! Building an orchestrator from application configuration.

use rigscout_core::{AppConfig, JobStatus, ScanOptions, ScanResultStatus};
use rigscout_scanner::{ScanError, ScanOrchestrator};

// No extraction strategy matches this host, so the unit is skipped before any fetch.
const UNSUPPORTED: &str = "https://example.com/listing/1";

fn config_file(dir: &std::path::Path, body: &str) -> AppConfig {
    let path = dir.join("config.toml");
    std::fs::write(&path, body).expect("write config");
    AppConfig::load_from(&path).expect("load config")
}

#[tokio::test]
async fn test_from_config_opens_configured_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("nested").join("jobs.db");
    let config = config_file(
        dir.path(),
        &format!(
            "[scanning]\nconcurrency = 2\nuser_agent = \"rigscout-test\"\n\n[storage]\ndatabase_path = {:?}\n",
            db_path.to_str().expect("utf-8 path")
        ),
    );

    let orchestrator = ScanOrchestrator::from_config(&config).await.expect("wire");
    let options = ScanOptions::from(&config.scanning);
    assert_eq!(options.concurrency, 2);

    let job = orchestrator.create_job(&[UNSUPPORTED], options).await.unwrap();
    let job = orchestrator.start_job(&job.id, None).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.results[0].status, ScanResultStatus::Skipped);
    drop(orchestrator);
    assert!(db_path.exists());

    let reopened = ScanOrchestrator::from_config(&config).await.expect("rewire");
    let jobs = reopened.list_jobs().await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, job.id);
    assert_eq!(jobs[0].status, JobStatus::Completed);
}

#[tokio::test]
async fn test_from_config_without_database_keeps_jobs_in_memory() {
    let config = AppConfig::default();
    assert!(config.storage.database_path.is_none());

    let first = ScanOrchestrator::from_config(&config).await.expect("wire");
    first
        .create_job(&[UNSUPPORTED], ScanOptions::default())
        .await
        .unwrap();
    assert_eq!(first.list_jobs().await.len(), 1);

    let second = ScanOrchestrator::from_config(&config).await.expect("wire");
    assert!(second.list_jobs().await.is_empty());
}

#[tokio::test]
async fn test_from_config_reports_unusable_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    let mut config = AppConfig::default();
    config.storage.database_path = Some(blocker.join("jobs.db"));

    let err = ScanOrchestrator::from_config(&config).await.err().expect("must fail");
    assert!(matches!(err, ScanError::Store(_)));
}
