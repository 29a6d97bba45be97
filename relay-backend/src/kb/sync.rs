//! Pulls documents from the configured Box folder into a local directory
//! for knowledge-base ingestion.

use crate::integrations::box_client::BoxApi;
use std::path::{Path, PathBuf};

/// Result of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Local paths written, in listing order.
    pub downloaded: Vec<PathBuf>,
    /// Files skipped for exceeding the size limit, as (name, size).
    pub skipped: Vec<(String, u64)>,
}

pub struct DocumentSync {
    box_api: BoxApi,
    folder_id: String,
    max_bytes: u64,
}

impl DocumentSync {
    pub fn new(box_api: BoxApi, folder_id: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            box_api,
            folder_id: folder_id.into(),
            max_bytes,
        }
    }

    /// Download every file in the remote folder into `target_dir`.
    ///
    /// Oversized files are skipped with an informational log, not an error.
    /// Existing local files of the same name are overwritten, so re-running
    /// against unchanged remote content is idempotent. Listing and download
    /// failures propagate to the caller; there is no retry here.
    pub async fn sync(&self, target_dir: &Path) -> Result<SyncReport, String> {
        tokio::fs::create_dir_all(target_dir)
            .await
            .map_err(|e| format!("Failed to create {}: {}", target_dir.display(), e))?;

        let items = self.box_api.list_folder_items(&self.folder_id).await?;

        let mut report = SyncReport::default();
        for item in items {
            if !item.is_file() {
                continue;
            }
            if item.size > self.max_bytes {
                log::info!(
                    "Skipping {} - file too large ({} bytes)",
                    item.name,
                    item.size
                );
                report.skipped.push((item.name.clone(), item.size));
                continue;
            }

            let local_path = target_dir.join(&item.name);
            let bytes = self.box_api.download_file(&item.id).await?;
            tokio::fs::write(&local_path, &bytes)
                .await
                .map_err(|e| format!("Failed to write {}: {}", local_path.display(), e))?;
            log::info!("Downloaded: {}", item.name);
            report.downloaded.push(local_path);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::box_client::MockBoxApi;

    fn sync_with(mock: MockBoxApi, max_bytes: u64) -> DocumentSync {
        DocumentSync::new(BoxApi::Mock(mock), "12345", max_bytes)
    }

    #[tokio::test]
    async fn downloads_small_files_and_skips_oversized() {
        let mock = MockBoxApi::new();
        mock.add_file("f1", "a.txt", 10, b"aaa");
        mock.add_file("f2", "big.bin", 200, b"too big");
        mock.add_file("f3", "b.txt", 90, b"bbb");

        let dir = tempfile::tempdir().unwrap();
        let report = sync_with(mock, 100).sync(dir.path()).await.unwrap();

        assert_eq!(
            report.downloaded,
            vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
        );
        assert_eq!(report.skipped, vec![("big.bin".to_string(), 200)]);
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"aaa");
        assert!(!dir.path().join("big.bin").exists());
    }

    #[tokio::test]
    async fn folders_in_listing_are_ignored() {
        let mock = MockBoxApi::new();
        mock.add_folder("d1", "archive");
        mock.add_file("f1", "a.txt", 3, b"aaa");

        let dir = tempfile::tempdir().unwrap();
        let report = sync_with(mock, 100).sync(dir.path()).await.unwrap();

        assert_eq!(report.downloaded, vec![dir.path().join("a.txt")]);
        assert!(report.skipped.is_empty());
        assert!(!dir.path().join("archive").exists());
    }

    #[tokio::test]
    async fn resync_overwrites_in_place_without_duplicates() {
        let mock = MockBoxApi::new();
        mock.add_file("f1", "a.txt", 3, b"one");

        let dir = tempfile::tempdir().unwrap();
        let sync = sync_with(mock.clone(), 100);

        let first = sync.sync(dir.path()).await.unwrap();
        mock.set_content("f1", b"two");
        let second = sync.sync(dir.path()).await.unwrap();

        assert_eq!(first.downloaded, second.downloaded);
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"two");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn empty_listing_yields_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = sync_with(MockBoxApi::new(), 100)
            .sync(dir.path())
            .await
            .unwrap();

        assert!(report.downloaded.is_empty());
        assert!(report.skipped.is_empty());
    }
}
