use crate::config::defaults;
use crate::kb::{DocumentSync, Importer, RefreshOutcome, refresh_manifest};
use chrono::{Duration, Utc};
use std::path::PathBuf;
use tokio::sync::oneshot;
use tokio::time::{Duration as TokioDuration, interval};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Seconds between refresh cycles
    pub interval_secs: u64,
    /// Poll interval in seconds for checking whether a cycle is due
    pub poll_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            interval_secs: defaults::SYNC_INTERVAL_SECS,
            poll_interval_secs: 60,
        }
    }
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Documents were synced and the manifest reimported.
    Imported(usize),
    /// Nothing was downloaded; manifest and knowledge base left as-is.
    NoOp,
}

/// Periodically syncs the Box folder, rewrites the manifest, and reimports
/// it through the orchestrate CLI. Cycles run strictly sequentially; a
/// cycle that runs long delays the next check.
pub struct RefreshScheduler {
    sync: DocumentSync,
    importer: Importer,
    sync_dir: PathBuf,
    manifest_path: PathBuf,
    config: SchedulerConfig,
}

impl RefreshScheduler {
    pub fn new(
        sync: DocumentSync,
        importer: Importer,
        sync_dir: PathBuf,
        manifest_path: PathBuf,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            sync,
            importer,
            sync_dir,
            manifest_path,
            config,
        }
    }

    /// Run until the shutdown signal fires. A failing cycle is logged and
    /// never terminates the loop; shutdown waits for any in-flight cycle
    /// to finish since cycles run inside the select arm.
    pub async fn start(self, mut shutdown_rx: oneshot::Receiver<()>) {
        log::info!(
            "Scheduler started (cycle interval: {}s, poll: {}s)",
            self.config.interval_secs,
            self.config.poll_interval_secs
        );

        let mut poll = interval(TokioDuration::from_secs(self.config.poll_interval_secs));
        let mut next_run_at = Utc::now() + Duration::seconds(self.config.interval_secs as i64);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    log::info!("Scheduler received shutdown signal");
                    break;
                }
                _ = poll.tick() => {
                    if Utc::now() < next_run_at {
                        continue;
                    }
                    next_run_at = Utc::now() + Duration::seconds(self.config.interval_secs as i64);

                    match self.run_cycle().await {
                        Ok(CycleOutcome::Imported(count)) => {
                            log::info!("Knowledge base updated with {} documents", count);
                        }
                        Ok(CycleOutcome::NoOp) => {
                            log::info!("Nothing to import this cycle");
                        }
                        Err(e) => {
                            log::error!("Error during scheduled sync: {}", e);
                        }
                    }
                }
            }
        }

        log::info!("Scheduler stopped");
    }

    /// One sync -> manifest refresh -> import pass.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, String> {
        log::info!("Starting scheduled Box sync...");
        let started = Utc::now();

        let report = self.sync.sync(&self.sync_dir).await?;
        if !report.skipped.is_empty() {
            log::info!("Skipped {} oversized files", report.skipped.len());
        }
        if report.downloaded.is_empty() {
            log::warn!("No files downloaded from Box. Check your credentials and folder ID.");
        }

        match refresh_manifest(&self.manifest_path, &report.downloaded)? {
            RefreshOutcome::NoOp => Ok(CycleOutcome::NoOp),
            RefreshOutcome::Updated => {
                log::info!(
                    "Updated {} with {} documents",
                    self.manifest_path.display(),
                    report.downloaded.len()
                );

                self.importer
                    .import(&self.manifest_path)
                    .await
                    .map_err(|e| format!("Error updating knowledge base: {}", e))?;

                let elapsed_ms = (Utc::now() - started).num_milliseconds();
                log::info!("Knowledge base import completed in {}ms", elapsed_ms);
                Ok(CycleOutcome::Imported(report.downloaded.len()))
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
