//! Invokes the orchestrate CLI to reimport the knowledge-base manifest.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::process::Command;

/// Runs `<bin> knowledge-bases import -f <manifest>` as a subprocess.
pub struct CommandImporter {
    bin: String,
}

impl CommandImporter {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub async fn import(&self, manifest_path: &Path) -> Result<(), String> {
        let output = Command::new(&self.bin)
            .arg("knowledge-bases")
            .arg("import")
            .arg("-f")
            .arg(manifest_path)
            .output()
            .await
            .map_err(|e| format!("Failed to run {}: {}", self.bin, e))?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if !stdout.trim().is_empty() {
                log::debug!("{} import output: {}", self.bin, stdout.trim());
            }
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!(
                "{} exited with {}: {}",
                self.bin,
                output.status,
                stderr.trim()
            ))
        }
    }
}

/// Mock importer for tests — records invocations and returns queued results.
#[derive(Clone, Default)]
pub struct MockImporter {
    results: Arc<Mutex<VecDeque<Result<(), String>>>>,
    invocations: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockImporter {
    pub fn new(results: Vec<Result<(), String>>) -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::from(results))),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn next_result(&self, manifest_path: &Path) -> Result<(), String> {
        self.invocations
            .lock()
            .unwrap()
            .push(manifest_path.to_path_buf());
        self.results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    /// Manifest paths the import was invoked with, in call order.
    pub fn invocations(&self) -> Vec<PathBuf> {
        self.invocations.lock().unwrap().clone()
    }
}

/// Unified import runner over the real CLI or the test mock.
pub enum Importer {
    Command(CommandImporter),
    Mock(MockImporter),
}

impl Importer {
    pub async fn import(&self, manifest_path: &Path) -> Result<(), String> {
        match self {
            Importer::Command(cmd) => cmd.import(manifest_path).await,
            Importer::Mock(mock) => mock.next_result(manifest_path),
        }
    }
}
