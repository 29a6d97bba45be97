//! Box content API client — folder listings and file downloads.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One entry of a folder listing.
#[derive(Debug, Clone, Deserialize)]
pub struct BoxItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

impl BoxItem {
    pub fn is_file(&self) -> bool {
        self.item_type == "file"
    }
}

#[derive(Debug, Deserialize)]
struct FolderItemsPage {
    entries: Vec<BoxItem>,
    total_count: u64,
}

const PAGE_LIMIT: u64 = 1000;

pub struct BoxClient {
    http: reqwest::Client,
    base_url: String,
    developer_token: String,
}

impl BoxClient {
    pub fn new(base_url: &str, developer_token: &str) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            developer_token: developer_token.to_string(),
        })
    }

    /// List every item in a folder, in listing order.
    pub async fn list_folder_items(&self, folder_id: &str) -> Result<Vec<BoxItem>, String> {
        let url = format!("{}/folders/{}/items", self.base_url, folder_id);
        let mut items: Vec<BoxItem> = Vec::new();

        loop {
            let offset = items.len().to_string();
            let limit = PAGE_LIMIT.to_string();
            let resp = self
                .http
                .get(&url)
                .bearer_auth(&self.developer_token)
                .query(&[
                    ("fields", "type,name,size"),
                    ("limit", limit.as_str()),
                    ("offset", offset.as_str()),
                ])
                .send()
                .await
                .map_err(|e| format!("Failed to connect to Box: {}", e))?;

            if resp.status().as_u16() == 404 {
                return Err(format!("Box folder {} not found", folder_id));
            }
            if resp.status().as_u16() == 401 {
                return Err("Box rejected the developer token (HTTP 401)".to_string());
            }
            if !resp.status().is_success() {
                return Err(format!("Box returned HTTP {}", resp.status()));
            }

            let page: FolderItemsPage = resp
                .json()
                .await
                .map_err(|e| format!("Failed to parse folder listing: {}", e))?;

            let fetched = page.entries.len();
            items.extend(page.entries);

            if fetched == 0 || items.len() as u64 >= page.total_count {
                break;
            }
        }

        Ok(items)
    }

    /// Download a file's content.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, String> {
        let url = format!("{}/files/{}/content", self.base_url, file_id);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.developer_token)
            .send()
            .await
            .map_err(|e| format!("Failed to connect to Box: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("Box download returned HTTP {}", resp.status()));
        }

        resp.bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| format!("Failed to read file content: {}", e))
    }
}

/// Mock Box API for tests — serves a preset listing and file contents.
#[derive(Clone, Default)]
pub struct MockBoxApi {
    items: Arc<Mutex<Vec<BoxItem>>>,
    contents: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockBoxApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, id: &str, name: &str, size: u64, content: &[u8]) {
        self.items.lock().unwrap().push(BoxItem {
            id: id.to_string(),
            item_type: "file".to_string(),
            name: name.to_string(),
            size,
        });
        self.contents
            .lock()
            .unwrap()
            .insert(id.to_string(), content.to_vec());
    }

    pub fn add_folder(&self, id: &str, name: &str) {
        self.items.lock().unwrap().push(BoxItem {
            id: id.to_string(),
            item_type: "folder".to_string(),
            name: name.to_string(),
            size: 0,
        });
    }

    /// Replace a file's content, keeping its listing entry.
    pub fn set_content(&self, id: &str, content: &[u8]) {
        self.contents
            .lock()
            .unwrap()
            .insert(id.to_string(), content.to_vec());
    }
}

/// Unified Box API handle over the real client or the test mock.
pub enum BoxApi {
    Http(BoxClient),
    Mock(MockBoxApi),
}

impl BoxApi {
    pub async fn list_folder_items(&self, folder_id: &str) -> Result<Vec<BoxItem>, String> {
        match self {
            BoxApi::Http(client) => client.list_folder_items(folder_id).await,
            BoxApi::Mock(mock) => Ok(mock.items.lock().unwrap().clone()),
        }
    }

    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, String> {
        match self {
            BoxApi::Http(client) => client.download_file(file_id).await,
            BoxApi::Mock(mock) => mock
                .contents
                .lock()
                .unwrap()
                .get(file_id)
                .cloned()
                .ok_or_else(|| format!("Mock Box has no file {}", file_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_listing_deserializes_box_wire_format() {
        let page: FolderItemsPage = serde_json::from_str(
            r#"{
                "total_count": 2,
                "entries": [
                    {"type": "file", "id": "111", "name": "handbook.pdf", "size": 52480},
                    {"type": "folder", "id": "222", "name": "archive"}
                ],
                "offset": 0,
                "limit": 1000
            }"#,
        )
        .unwrap();

        assert_eq!(page.total_count, 2);
        assert_eq!(page.entries.len(), 2);
        assert!(page.entries[0].is_file());
        assert_eq!(page.entries[0].size, 52480);
        assert!(!page.entries[1].is_file());
        assert_eq!(page.entries[1].size, 0);
    }

    #[tokio::test]
    async fn mock_serves_listing_and_content() {
        let mock = MockBoxApi::new();
        mock.add_file("f1", "a.txt", 5, b"hello");
        let api = BoxApi::Mock(mock);

        let items = api.list_folder_items("0").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "a.txt");

        let bytes = api.download_file("f1").await.unwrap();
        assert_eq!(bytes, b"hello");

        assert!(api.download_file("missing").await.is_err());
    }
}
