use crate::ai::{AgentClient, AgentError};
use crate::config::{Config, env_vars};
use slack_morphism::prelude::*;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Slack credentials for one bot instance.
#[derive(Clone)]
pub struct SlackChannelConfig {
    pub bot_token: String,
    pub app_token: String,
}

impl SlackChannelConfig {
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let bot_token = config
            .slack_bot_token
            .clone()
            .ok_or_else(|| format!("{} is not set", env_vars::SLACK_BOT_TOKEN))?;
        let app_token = config
            .slack_app_token
            .clone()
            .ok_or_else(|| format!("{} is required for Socket Mode", env_vars::SLACK_APP_TOKEN))?;
        Ok(Self {
            bot_token,
            app_token,
        })
    }
}

// ---------------------------------------------------------------------------
// Shared state passed through SlackClientEventsUserStateStorage
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct SlackAppState {
    agent: Arc<AgentClient>,
    bot_token: SlackApiToken,
    bot_user_id: String,
}

// ---------------------------------------------------------------------------
// Outbound sender
// ---------------------------------------------------------------------------

/// Post a message to a channel. One-shot and stateless; a send failure is
/// captured into a descriptive string rather than propagated.
pub async fn send_message(
    client: &SlackHyperClient,
    token: &SlackApiToken,
    channel: &SlackChannelId,
    text: &str,
) -> Result<SlackTs, String> {
    let session = client.open_session(token);
    let content = SlackMessageContent::new().with_text(text.to_string());
    let req = SlackApiChatPostMessageRequest::new(channel.clone(), content);
    let resp = session
        .chat_post_message(&req)
        .await
        .map_err(send_error_text)?;
    Ok(resp.ts)
}

fn send_error_text(e: impl std::fmt::Display) -> String {
    format!("Error sending message: {}", e)
}

// ---------------------------------------------------------------------------
// Event text handling
// ---------------------------------------------------------------------------

/// Remove the bot's own `<@Uxxxx>` mention token from message text.
fn strip_slack_mention(text: &str, bot_user_id: &str) -> String {
    text.replace(&format!("<@{}>", bot_user_id), "")
        .trim()
        .to_string()
}

/// Direct messages are relayed only from one-to-one conversations.
fn is_direct_message(channel_type: Option<&str>) -> bool {
    channel_type == Some("im")
}

/// Turn an agent result into the reply text for the user. The handler
/// boundary is error-opaque: users always get a reply, never a crash.
fn build_reply(result: Result<String, AgentError>) -> String {
    match result {
        Ok(response) => response,
        Err(e) => format!("Sorry, I encountered an error: {}", e.message),
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > 50 {
        format!("{}...", text.chars().take(50).collect::<String>())
    } else {
        text.to_string()
    }
}

// ---------------------------------------------------------------------------
// Core message processing
// ---------------------------------------------------------------------------

async fn process_slack_message(
    client: Arc<SlackHyperClient>,
    state: SlackAppState,
    slack_channel: SlackChannelId,
    user_id: String,
    raw_text: String,
    is_mention: bool,
) {
    let text = if is_mention {
        strip_slack_mention(&raw_text, &state.bot_user_id)
    } else {
        raw_text.trim().to_string()
    };

    log::info!("Slack: Message from {}: {}", user_id, preview(&text));

    let reply = build_reply(state.agent.call_agent(&text).await);

    if let Err(e) = send_message(&client, &state.bot_token, &slack_channel, &reply).await {
        log::error!("Slack: Failed to send response: {}", e);
    }
}

// ---------------------------------------------------------------------------
// Socket Mode event handler
// ---------------------------------------------------------------------------

fn handle_push_event(
    event: SlackPushEventCallback,
    client: Arc<SlackHyperClient>,
    user_state: SlackClientEventsUserState,
) -> std::pin::Pin<
    Box<
        dyn std::future::Future<
                Output = Result<(), Box<dyn std::error::Error + Send + Sync>>,
            > + Send,
    >,
> {
    Box::pin(async move {
        let state = {
            let guard = user_state.read().await;
            match guard.get_user_state::<SlackAppState>() {
                Some(s) => s.clone(),
                None => {
                    log::error!("Slack: No SlackAppState in user_state — cannot process event");
                    return Ok(());
                }
            }
        };

        match event.event {
            // App mention: bot was @mentioned in a channel
            SlackEventCallbackBody::AppMention(mention) => {
                let text = mention.content.text.as_deref().unwrap_or("").to_string();
                if text.is_empty() {
                    return Ok(());
                }

                let user_id = mention.user.to_string();
                let slack_channel = mention.channel;

                log::info!(
                    "Slack: AppMention from {} in {}: {}",
                    user_id,
                    slack_channel,
                    preview(&text)
                );

                tokio::spawn(process_slack_message(
                    client,
                    state,
                    slack_channel,
                    user_id,
                    text,
                    true,
                ));
            }

            // DM messages: only process direct messages, not channel messages
            SlackEventCallbackBody::Message(msg_event) => {
                // Skip bot messages
                if msg_event.sender.bot_id.is_some() {
                    return Ok(());
                }
                // Skip message subtypes (edits, deletes, etc.)
                if msg_event.subtype.is_some() {
                    return Ok(());
                }

                let channel_type = msg_event.origin.channel_type.as_ref().map(|ct| ct.0.as_str());
                if !is_direct_message(channel_type) {
                    return Ok(());
                }

                // Skip messages from the bot itself
                let sender_id = msg_event
                    .sender
                    .user
                    .as_ref()
                    .map(|u| u.to_string())
                    .unwrap_or_default();
                if sender_id == state.bot_user_id {
                    return Ok(());
                }

                let text = msg_event
                    .content
                    .as_ref()
                    .and_then(|c| c.text.clone())
                    .unwrap_or_default();
                if text.is_empty() {
                    return Ok(());
                }

                let slack_channel = match msg_event.origin.channel {
                    Some(ch) => ch,
                    None => return Ok(()),
                };

                log::info!(
                    "Slack: DM from {} in {}: {}",
                    sender_id,
                    slack_channel,
                    preview(&text)
                );

                tokio::spawn(process_slack_message(
                    client,
                    state,
                    slack_channel,
                    sender_id,
                    text,
                    false,
                ));
            }

            _ => {
                // Ignore other event types
            }
        }

        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Start the Slack listener using Socket Mode and relay every mention and
/// direct message to the agent until the shutdown signal fires.
pub async fn start_slack_listener(
    config: SlackChannelConfig,
    agent: Arc<AgentClient>,
    shutdown_rx: oneshot::Receiver<()>,
) -> Result<(), String> {
    let client = Arc::new(SlackClient::new(
        SlackClientHyperConnector::new().map_err(|e| e.to_string())?,
    ));

    let bot_token = SlackApiToken::new(config.bot_token.into());
    let socket_token = SlackApiToken::new(config.app_token.into());

    // Validate bot token and get bot user ID via auth.test
    log::info!("Slack: Validating bot token via auth.test...");
    let session = client.open_session(&bot_token);
    let auth_resp = session
        .auth_test()
        .await
        .map_err(|e| format!("Slack auth.test failed — invalid bot token: {}", e))?;
    let bot_user_id = auth_resp.user_id.to_string();
    log::info!(
        "Slack: Bot validated — user_id: {}, team: {}",
        bot_user_id,
        auth_resp.team
    );

    let app_state = SlackAppState {
        agent,
        bot_token,
        bot_user_id,
    };

    let listener_environment = Arc::new(
        SlackClientEventsListenerEnvironment::new(client.clone()).with_user_state(app_state),
    );

    let socket_mode_callbacks =
        SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

    let socket_mode_listener = SlackClientSocketModeListener::new(
        &SlackClientSocketModeConfig::new(),
        listener_environment,
        socket_mode_callbacks,
    );

    tokio::select! {
        _ = shutdown_rx => {
            log::info!("Slack listener received shutdown signal");
        }
        result = socket_mode_listener.listen_for(&socket_token) => {
            if let Err(e) = result {
                return Err(format!("Slack listener error: {}", e));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_token_is_stripped_from_message_text() {
        assert_eq!(
            strip_slack_mention("<@U123> what is the refund policy?", "U123"),
            "what is the refund policy?"
        );
    }

    #[test]
    fn foreign_mention_tokens_are_left_alone() {
        assert_eq!(
            strip_slack_mention("<@U999> ping", "U123"),
            "<@U999> ping"
        );
    }

    #[test]
    fn bare_mention_strips_to_empty() {
        assert_eq!(strip_slack_mention("<@U123>", "U123"), "");
    }

    #[test]
    fn only_im_conversations_count_as_direct_messages() {
        assert!(is_direct_message(Some("im")));
        assert!(!is_direct_message(Some("channel")));
        assert!(!is_direct_message(Some("group")));
        assert!(!is_direct_message(None));
    }

    #[test]
    fn agent_failure_becomes_an_apologetic_reply() {
        let reply = build_reply(Err(AgentError::transport("connection refused")));
        assert_eq!(reply, "Sorry, I encountered an error: connection refused");
    }

    #[test]
    fn agent_success_is_relayed_verbatim() {
        let reply = build_reply(Ok("Refunds are honored within 30 days.".to_string()));
        assert_eq!(reply, "Refunds are honored within 30 days.");
    }

    #[test]
    fn send_failures_are_captured_as_descriptive_text() {
        let text = send_error_text("channel_not_found");
        assert!(text.contains("Error sending message:"));
        assert!(text.contains("channel_not_found"));
    }
}
