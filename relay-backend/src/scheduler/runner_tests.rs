//! Cycle-level tests for the refresh scheduler: the no-op short circuit,
//! import-failure survival, and the manifest/document invariant.

use crate::integrations::box_client::{BoxApi, MockBoxApi};
use crate::kb::{DocumentSync, Importer, MockImporter};
use crate::scheduler::runner::{CycleOutcome, RefreshScheduler, SchedulerConfig};
use serde_yaml::Value;
use std::path::PathBuf;

const MANIFEST: &str = "\
name: box_documents
description: Documents synced from Box
documents:
  - ./documents/stale.pdf
";

/// Wires a scheduler against a mock Box folder and a mock importer, with
/// the manifest and sync dir inside a temp directory.
struct CycleHarness {
    scheduler: RefreshScheduler,
    importer: MockImporter,
    manifest_path: PathBuf,
    _dir: tempfile::TempDir,
}

impl CycleHarness {
    fn new(mock_box: MockBoxApi, import_results: Vec<Result<(), String>>) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest_path = dir.path().join("knowledge_base_box.yaml");
        std::fs::write(&manifest_path, MANIFEST).expect("write manifest");

        let importer = MockImporter::new(import_results);
        let scheduler = RefreshScheduler::new(
            DocumentSync::new(BoxApi::Mock(mock_box), "12345", 100),
            Importer::Mock(importer.clone()),
            dir.path().join("documents"),
            manifest_path.clone(),
            SchedulerConfig::default(),
        );

        CycleHarness {
            scheduler,
            importer,
            manifest_path,
            _dir: dir,
        }
    }

    fn manifest_bytes(&self) -> String {
        std::fs::read_to_string(&self.manifest_path).expect("read manifest")
    }
}

#[tokio::test]
async fn empty_folder_is_a_noop_and_never_invokes_the_import() {
    let harness = CycleHarness::new(MockBoxApi::new(), vec![]);

    let outcome = harness.scheduler.run_cycle().await.unwrap();

    assert_eq!(outcome, CycleOutcome::NoOp);
    assert!(harness.importer.invocations().is_empty());
    assert_eq!(harness.manifest_bytes(), MANIFEST);
}

#[tokio::test]
async fn cycle_replaces_documents_and_imports_the_manifest() {
    let mock_box = MockBoxApi::new();
    mock_box.add_file("f1", "handbook.pdf", 50, b"pdf bytes");
    mock_box.add_file("f2", "faq.txt", 20, b"faq");
    let harness = CycleHarness::new(mock_box, vec![Ok(())]);

    let outcome = harness.scheduler.run_cycle().await.unwrap();

    assert_eq!(outcome, CycleOutcome::Imported(2));
    assert_eq!(
        harness.importer.invocations(),
        vec![harness.manifest_path.clone()]
    );

    let manifest: Value = serde_yaml::from_str(&harness.manifest_bytes()).unwrap();
    let documents: Vec<&str> = manifest["documents"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        documents,
        vec!["./documents/handbook.pdf", "./documents/faq.txt"]
    );
    assert_eq!(manifest["name"].as_str(), Some("box_documents"));
}

#[tokio::test]
async fn oversized_files_never_reach_the_manifest() {
    let mock_box = MockBoxApi::new();
    mock_box.add_file("f1", "small.txt", 10, b"ok");
    mock_box.add_file("f2", "huge.bin", 5000, b"nope");
    let harness = CycleHarness::new(mock_box, vec![Ok(())]);

    harness.scheduler.run_cycle().await.unwrap();

    let manifest: Value = serde_yaml::from_str(&harness.manifest_bytes()).unwrap();
    let documents: Vec<&str> = manifest["documents"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(documents, vec!["./documents/small.txt"]);
}

#[tokio::test]
async fn import_failure_is_reported_and_the_next_cycle_still_runs() {
    let mock_box = MockBoxApi::new();
    mock_box.add_file("f1", "handbook.pdf", 50, b"pdf bytes");
    let harness = CycleHarness::new(
        mock_box,
        vec![Err("orchestrate exited with 1: boom".to_string()), Ok(())],
    );

    let first = harness.scheduler.run_cycle().await;
    let err = first.unwrap_err();
    assert!(err.contains("Error updating knowledge base"));
    assert!(err.contains("boom"));

    // The loop treats a failed cycle as log-and-continue; the next cycle
    // must run and import normally.
    let second = harness.scheduler.run_cycle().await.unwrap();
    assert_eq!(second, CycleOutcome::Imported(1));
    assert_eq!(harness.importer.invocations().len(), 2);
}
