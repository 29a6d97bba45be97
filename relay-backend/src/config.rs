use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
    pub const SLACK_APP_TOKEN: &str = "SLACK_APP_TOKEN";
    pub const BOX_DEVELOPER_TOKEN: &str = "BOX_DEVELOPER_TOKEN";
    pub const BOX_FOLDER_ID: &str = "BOX_FOLDER_ID";
    pub const BOX_API_URL: &str = "BOX_API_URL";
    pub const ORCHESTRATE_API_URL: &str = "ORCHESTRATE_API_URL";
    pub const ORCHESTRATE_AGENT_ID: &str = "ORCHESTRATE_AGENT_ID";
    pub const ORCHESTRATE_BIN: &str = "ORCHESTRATE_BIN";
    pub const SYNC_DIR: &str = "SYNC_DIR";
    pub const KB_MANIFEST_PATH: &str = "KB_MANIFEST_PATH";
    pub const SYNC_INTERVAL_SECS: &str = "SYNC_INTERVAL_SECS";
    pub const MAX_DOCUMENT_BYTES: &str = "MAX_DOCUMENT_BYTES";
}

/// Default values
pub mod defaults {
    pub const BOX_API_URL: &str = "https://api.box.com/2.0";
    pub const ORCHESTRATE_API_URL: &str = "http://localhost:4321/api/v1";
    pub const ORCHESTRATE_AGENT_ID: &str = "slack_rag_chatbot";
    pub const ORCHESTRATE_BIN: &str = "orchestrate";
    pub const SYNC_DIR: &str = "documents";
    pub const KB_MANIFEST_PATH: &str = "knowledge_base_box.yaml";
    pub const SYNC_INTERVAL_SECS: u64 = 6 * 60 * 60;
    /// The ingestion pipeline rejects most document formats above this size.
    pub const MAX_DOCUMENT_BYTES: u64 = 25 * 1024 * 1024;
}

#[derive(Clone)]
pub struct Config {
    pub slack_bot_token: Option<String>,
    pub slack_app_token: Option<String>,
    pub box_developer_token: Option<String>,
    pub box_folder_id: Option<String>,
    pub box_api_url: String,
    pub orchestrate_api_url: String,
    pub orchestrate_agent_id: String,
    pub orchestrate_bin: String,
    pub sync_dir: PathBuf,
    pub kb_manifest_path: PathBuf,
    pub sync_interval_secs: u64,
    pub max_document_bytes: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            slack_bot_token: non_empty_var(env_vars::SLACK_BOT_TOKEN),
            slack_app_token: non_empty_var(env_vars::SLACK_APP_TOKEN),
            box_developer_token: non_empty_var(env_vars::BOX_DEVELOPER_TOKEN),
            box_folder_id: non_empty_var(env_vars::BOX_FOLDER_ID),
            box_api_url: env::var(env_vars::BOX_API_URL)
                .unwrap_or_else(|_| defaults::BOX_API_URL.to_string()),
            orchestrate_api_url: env::var(env_vars::ORCHESTRATE_API_URL)
                .unwrap_or_else(|_| defaults::ORCHESTRATE_API_URL.to_string()),
            orchestrate_agent_id: env::var(env_vars::ORCHESTRATE_AGENT_ID)
                .unwrap_or_else(|_| defaults::ORCHESTRATE_AGENT_ID.to_string()),
            orchestrate_bin: env::var(env_vars::ORCHESTRATE_BIN)
                .unwrap_or_else(|_| defaults::ORCHESTRATE_BIN.to_string()),
            sync_dir: PathBuf::from(
                env::var(env_vars::SYNC_DIR).unwrap_or_else(|_| defaults::SYNC_DIR.to_string()),
            ),
            kb_manifest_path: PathBuf::from(
                env::var(env_vars::KB_MANIFEST_PATH)
                    .unwrap_or_else(|_| defaults::KB_MANIFEST_PATH.to_string()),
            ),
            sync_interval_secs: env::var(env_vars::SYNC_INTERVAL_SECS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::SYNC_INTERVAL_SECS),
            max_document_bytes: env::var(env_vars::MAX_DOCUMENT_BYTES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::MAX_DOCUMENT_BYTES),
        }
    }

    /// Both Slack tokens are present, so the chat relay can start.
    pub fn slack_configured(&self) -> bool {
        self.slack_bot_token.is_some() && self.slack_app_token.is_some()
    }

    /// Box credentials and folder are present, so the sync loop can start.
    pub fn box_configured(&self) -> bool {
        self.box_developer_token.is_some() && self.box_folder_id.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
