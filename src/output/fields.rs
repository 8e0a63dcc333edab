use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{Site, DATETIME_FORMAT};

/// A displayable column of a site row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    BlogId,
    Url,
    LastUpdated,
    Registered,
    SiteId,
    Domain,
    Path,
    Public,
    Archived,
    Mature,
    Spam,
    Deleted,
    LangId,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::BlogId,
        Field::Url,
        Field::LastUpdated,
        Field::Registered,
        Field::SiteId,
        Field::Domain,
        Field::Path,
        Field::Public,
        Field::Archived,
        Field::Mature,
        Field::Spam,
        Field::Deleted,
        Field::LangId,
    ];

    /// Columns shown when none are requested.
    pub const DEFAULT: [Field; 2] = [Field::BlogId, Field::Url];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::BlogId => "blog_id",
            Field::Url => "url",
            Field::LastUpdated => "last_updated",
            Field::Registered => "registered",
            Field::SiteId => "site_id",
            Field::Domain => "domain",
            Field::Path => "path",
            Field::Public => "public",
            Field::Archived => "archived",
            Field::Mature => "mature",
            Field::Spam => "spam",
            Field::Deleted => "deleted",
            Field::LangId => "lang_id",
        }
    }

    /// Parses a comma separated field list such as `"blog_id, url"`.
    ///
    /// Spaces and tabs after a comma are ignored. Duplicates are dropped.
    pub fn parse_list(s: &str) -> Result<Vec<Field>> {
        let mut fields = Vec::new();
        for name in s.split(',') {
            let name = name.trim_start_matches([' ', '\t']);
            if name.is_empty() {
                continue;
            }
            let field: Field = name.parse()?;
            if !fields.contains(&field) {
                fields.push(field);
            }
        }

        if fields.is_empty() {
            return Err(Error::InvalidField(s.to_string()));
        }
        Ok(fields)
    }

    /// The value shown in tables, CSV, and compared by filters.
    pub fn text(&self, site: &Site) -> String {
        match self {
            Field::BlogId => site.blog_id.to_string(),
            Field::Url => site.url(),
            Field::LastUpdated => format_datetime(site.last_updated),
            Field::Registered => format_datetime(site.registered),
            Field::SiteId => site.site_id.to_string(),
            Field::Domain => site.domain.clone(),
            Field::Path => site.path.clone(),
            Field::Public => flag(site.public).to_string(),
            Field::Archived => flag(site.archived).to_string(),
            Field::Mature => flag(site.mature).to_string(),
            Field::Spam => flag(site.spam).to_string(),
            Field::Deleted => flag(site.deleted).to_string(),
            Field::LangId => site.lang_id.to_string(),
        }
    }

    /// The value used in structured output. Numbers and flags stay numeric.
    pub fn value(&self, site: &Site) -> Value {
        match self {
            Field::BlogId => Value::from(site.blog_id),
            Field::SiteId => Value::from(site.site_id),
            Field::LangId => Value::from(site.lang_id),
            Field::Public => Value::from(flag(site.public)),
            Field::Archived => Value::from(flag(site.archived)),
            Field::Mature => Value::from(flag(site.mature)),
            Field::Spam => Value::from(flag(site.spam)),
            Field::Deleted => Value::from(flag(site.deleted)),
            _ => Value::from(self.text(site)),
        }
    }
}

impl std::str::FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidField(s.to_string()))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn flag(b: bool) -> u8 {
    u8::from(b)
}

fn format_datetime(dt: Option<chrono::NaiveDateTime>) -> String {
    dt.map(|d| d.format(DATETIME_FORMAT).to_string())
        .unwrap_or_else(|| "0000-00-00 00:00:00".to_string())
}
