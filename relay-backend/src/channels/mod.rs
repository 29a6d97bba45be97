pub mod slack;
pub mod types;

pub use types::ChannelHandle;

use crate::ai::AgentClient;
use crate::config::Config;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Start the Slack channel listener in the background and return a handle.
///
/// The listener runs off the caller's execution path; a listener fault is
/// logged and finishes the task rather than propagating to the caller.
pub fn start_slack_channel(
    config: &Config,
    agent: Arc<AgentClient>,
) -> Result<ChannelHandle, String> {
    let slack_config = slack::SlackChannelConfig::from_config(config)?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(async move {
        if let Err(e) = slack::start_slack_listener(slack_config, agent, shutdown_rx).await {
            log::error!("Slack listener error: {}", e);
        }
    });

    log::info!("Started slack channel listener");
    Ok(ChannelHandle::new("slack", "slack-relay", shutdown_tx, task))
}
