use dotenv::dotenv;
use relay_backend::ai::AgentClient;
use relay_backend::channels;
use relay_backend::config::Config;
use relay_backend::integrations::box_client::{BoxApi, BoxClient};
use relay_backend::kb::{CommandImporter, DocumentSync, Importer};
use relay_backend::scheduler::{RefreshScheduler, SchedulerConfig};
use std::sync::Arc;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let agent = Arc::new(
        AgentClient::from_config(&config).expect("Failed to initialize agent client"),
    );

    // Chat relay: mention/DM listener over Socket Mode
    let slack_handle = if config.slack_configured() {
        match channels::start_slack_channel(&config, agent.clone()) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Failed to start Slack channel: {}", e);
                None
            }
        }
    } else {
        log::info!("Slack tokens not set; chat relay disabled");
        None
    };

    // Scheduled refresh loop: Box sync -> manifest -> orchestrate import
    let mut scheduler_shutdown = None;
    let mut scheduler_task = None;
    if let (Some(box_token), Some(folder_id)) =
        (config.box_developer_token.clone(), config.box_folder_id.clone())
    {
        let box_client = BoxClient::new(&config.box_api_url, &box_token)
            .expect("Failed to initialize Box client");
        let sync = DocumentSync::new(
            BoxApi::Http(box_client),
            folder_id,
            config.max_document_bytes,
        );
        let importer = Importer::Command(CommandImporter::new(&config.orchestrate_bin));
        let scheduler = RefreshScheduler::new(
            sync,
            importer,
            config.sync_dir.clone(),
            config.kb_manifest_path.clone(),
            SchedulerConfig {
                interval_secs: config.sync_interval_secs,
                ..SchedulerConfig::default()
            },
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        scheduler_task = Some(tokio::spawn(async move {
            scheduler.start(shutdown_rx).await;
        }));
        scheduler_shutdown = Some(shutdown_tx);
    } else {
        log::info!("Box settings not set; scheduled sync disabled");
    }

    if slack_handle.is_none() && scheduler_task.is_none() {
        log::error!(
            "Nothing to run: set SLACK_BOT_TOKEN/SLACK_APP_TOKEN and/or BOX_DEVELOPER_TOKEN/BOX_FOLDER_ID"
        );
        return Ok(());
    }

    tokio::signal::ctrl_c().await?;
    log::info!("Interrupt received; shutting down");

    if let Some(tx) = scheduler_shutdown {
        let _ = tx.send(());
    }
    if let Some(task) = scheduler_task {
        let _ = task.await;
    }
    if let Some(handle) = slack_handle {
        handle.stop().await;
    }

    Ok(())
}
