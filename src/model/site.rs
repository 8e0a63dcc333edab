use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Identifier of a site within a network.
pub type BlogId = u64;

/// Timestamp layout used by the site table.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A row of the network's site table.
///
/// Sites are read once per invocation and never modified. The flag fields
/// are opaque to the scan and only used to filter what gets displayed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Site {
    pub blog_id: BlogId,
    #[serde(default = "default_site_id")]
    pub site_id: u64,
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default, deserialize_with = "deserialize_datetime")]
    pub registered: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_datetime")]
    pub last_updated: Option<NaiveDateTime>,
    #[serde(default = "default_public", deserialize_with = "deserialize_flag")]
    pub public: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub archived: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub mature: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub spam: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub deleted: bool,
    #[serde(default)]
    pub lang_id: u64,
}

fn default_site_id() -> u64 {
    1
}

fn default_path() -> String {
    "/".to_string()
}

fn default_public() -> bool {
    true
}

impl Site {
    pub fn new(blog_id: BlogId, domain: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            blog_id,
            site_id: default_site_id(),
            domain: domain.into(),
            path: path.into(),
            registered: None,
            last_updated: None,
            public: true,
            archived: false,
            mature: false,
            spam: false,
            deleted: false,
            lang_id: 0,
        }
    }

    /// Display path of the site: its domain followed by its path.
    pub fn url(&self) -> String {
        format!("{}{}", self.domain, self.path)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Accepts `true`/`false`, `0`/`1`, or `"0"`/`"1"`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(b) => Ok(b),
        FlagRepr::Int(i) => Ok(i != 0),
        FlagRepr::Text(s) => match s.trim() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(serde::de::Error::custom(format!("invalid flag value: {other}"))),
        },
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS`. The zero date reads as `None`.
fn deserialize_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("0000-00-00 00:00:00") => Ok(None),
        Some(s) => NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
