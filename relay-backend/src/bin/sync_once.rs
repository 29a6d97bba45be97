//! One-shot sync fixture
//!
//! Runs a single Box sync + manifest refresh without the daemon, then
//! prints the import command to run. Useful for seeding the knowledge
//! base before first start and for checking folder credentials.
//!
//! Usage:
//!   BOX_DEVELOPER_TOKEN=... BOX_FOLDER_ID=... cargo run --bin sync_once
//!
//! Environment variables: same as the main binary (SYNC_DIR,
//! KB_MANIFEST_PATH, MAX_DOCUMENT_BYTES, ORCHESTRATE_BIN, ...).

use dotenv::dotenv;
use relay_backend::config::{Config, env_vars};
use relay_backend::integrations::box_client::{BoxApi, BoxClient};
use relay_backend::kb::{DocumentSync, RefreshOutcome, refresh_manifest};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let (box_token, folder_id) = match (
        config.box_developer_token.clone(),
        config.box_folder_id.clone(),
    ) {
        (Some(token), Some(folder)) => (token, folder),
        _ => {
            eprintln!(
                "{} and {} must be set",
                env_vars::BOX_DEVELOPER_TOKEN,
                env_vars::BOX_FOLDER_ID
            );
            std::process::exit(1);
        }
    };

    let box_client = match BoxClient::new(&config.box_api_url, &box_token) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let sync = DocumentSync::new(
        BoxApi::Http(box_client),
        folder_id,
        config.max_document_bytes,
    );

    println!("Syncing documents from Box...");
    let report = match sync.sync(&config.sync_dir).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Sync failed: {}", e);
            std::process::exit(1);
        }
    };

    for (name, size) in &report.skipped {
        println!("Skipped {} ({} bytes, over the size limit)", name, size);
    }

    match refresh_manifest(&config.kb_manifest_path, &report.downloaded) {
        Ok(RefreshOutcome::NoOp) => {
            println!("No files downloaded from Box. Check your credentials and folder ID.");
        }
        Ok(RefreshOutcome::Updated) => {
            println!(
                "Updated {} with {} documents:",
                config.kb_manifest_path.display(),
                report.downloaded.len()
            );
            for path in &report.downloaded {
                println!("  - {}", path.display());
            }
            println!();
            println!("Run the following command to import the knowledge base:");
            println!(
                "{} knowledge-bases import -f {}",
                config.orchestrate_bin,
                config.kb_manifest_path.display()
            );
        }
        Err(e) => {
            eprintln!("Manifest update failed: {}", e);
            std::process::exit(1);
        }
    }
}
