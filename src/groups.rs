//! Analytics groups and their items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnippet {
    pub published_at: DateTime<Utc>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupContentDetails {
    /// Sent by the API as a string.
    #[serde(
        deserialize_with = "count_from_string",
        serialize_with = "count_to_string"
    )]
    pub item_count: u64,
    pub item_type: String,
}

/// A collection of up to 500 channels, videos, playlists or assets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub kind: String,
    pub etag: Option<String>,
    pub id: String,
    pub snippet: GroupSnippet,
    pub content_details: GroupContentDetails,
}

impl Group {
    pub fn title(&self) -> &str {
        &self.snippet.title
    }

    pub fn item_count(&self) -> u64 {
        self.content_details.item_count
    }
}

/// A page of groups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupList {
    pub kind: String,
    pub etag: Option<String>,
    #[serde(default)]
    pub items: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupItemResource {
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupItem {
    pub kind: String,
    pub etag: Option<String>,
    pub id: String,
    pub group_id: String,
    pub resource: GroupItemResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupItemList {
    pub kind: String,
    pub etag: Option<String>,
    #[serde(default)]
    pub items: Vec<GroupItem>,
}

fn count_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Text(String),
        Number(u64),
    }

    match Count::deserialize(deserializer)? {
        Count::Text(text) => text.parse().map_err(serde::de::Error::custom),
        Count::Number(n) => Ok(n),
    }
}

fn count_to_string<S>(count: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&count.to_string())
}
