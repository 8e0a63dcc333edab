mod csv;
mod fields;
mod json;
mod table;

pub use fields::Field;

use crate::error::Error;
use crate::model::{MatchResult, PluginSlug, Site};
use anyhow::Result;

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Comma separated values with a header row
    Csv,
    /// Blog ids only, space separated
    Ids,
    /// JSON array of objects
    Json,
    /// YAML sequence of mappings
    Yaml,
    /// Number of sites
    Count,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "ids" => Ok(OutputFormat::Ids),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "count" => Ok(OutputFormat::Count),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

/// Equality filters on site columns.
///
/// A site passes when every condition equals its column value exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteFilter {
    conditions: Vec<(Field, String)>,
}

impl SiteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.conditions.push((field, value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, site: &Site) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| field.text(site) == *expected)
    }
}

/// How results are presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    pub format: OutputFormat,
    pub fields: Vec<Field>,
    /// Print only this column's values.
    pub field: Option<Field>,
    pub filter: SiteFilter,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            fields: Field::DEFAULT.to_vec(),
            field: None,
            filter: SiteFilter::default(),
        }
    }
}

/// Line printed when the plugin was found nowhere.
pub fn no_matches_message(target: &PluginSlug) -> String {
    format!("{target} is not active on any sites.")
}

/// Renders scan results to a string, ending with a newline.
pub fn render(target: &PluginSlug, found: &MatchResult, options: &DisplayOptions) -> Result<String> {
    if found.is_empty() {
        return Ok(format!("{}\n", no_matches_message(target)));
    }

    let rows: Vec<&Site> = found
        .sites()
        .iter()
        .filter(|site| options.filter.matches(site))
        .collect();

    if let Some(field) = options.field.filter(|_| options.format != OutputFormat::Count) {
        return render_single_field(field, &rows, options.format);
    }

    let rendered = match options.format {
        OutputFormat::Table => table::render_table(&rows, &options.fields),
        OutputFormat::Csv => csv::render_csv(&rows, &options.fields),
        OutputFormat::Ids => render_ids(&rows),
        OutputFormat::Json => json::render_json(&rows, &options.fields)?,
        OutputFormat::Yaml => json::render_yaml(&rows, &options.fields)?,
        OutputFormat::Count => rows.len().to_string(),
    };

    Ok(ensure_trailing_newline(rendered))
}

pub fn display_results(target: &PluginSlug, found: &MatchResult, options: &DisplayOptions) -> Result<()> {
    print!("{}", render(target, found, options)?);
    Ok(())
}

fn render_ids(rows: &[&Site]) -> String {
    rows.iter()
        .map(|s| s.blog_id.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_single_field(field: Field, rows: &[&Site], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => json::render_json_values(field, rows)?,
        OutputFormat::Yaml => json::render_yaml_values(field, rows)?,
        _ => rows
            .iter()
            .map(|s| field.text(s))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(ensure_trailing_newline(rendered))
}

fn ensure_trailing_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn found() -> MatchResult {
        let mut archived = Site::new(3, "example.com", "/old/");
        archived.archived = true;
        MatchResult::new(vec![Site::new(1, "example.com", "/"), archived])
    }

    fn target() -> PluginSlug {
        PluginSlug::from_arg("foo")
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("TABLE").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str("yml").unwrap(), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_str("ids").unwrap(), OutputFormat::Ids);
        assert!(matches!(
            OutputFormat::from_str("xml"),
            Err(Error::InvalidFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_empty_result_prints_single_line() {
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Count] {
            let options = DisplayOptions {
                format,
                ..Default::default()
            };
            let out = render(&target(), &MatchResult::default(), &options).unwrap();
            assert_eq!(out, "foo is not active on any sites.\n");
        }
    }

    #[test]
    fn test_ids_and_count() {
        let ids = DisplayOptions {
            format: OutputFormat::Ids,
            ..Default::default()
        };
        assert_eq!(render(&target(), &found(), &ids).unwrap(), "1\n3\n");

        let count = DisplayOptions {
            format: OutputFormat::Count,
            ..Default::default()
        };
        assert_eq!(render(&target(), &found(), &count).unwrap(), "2\n");
    }

    #[test]
    fn test_filters_apply_to_every_format() {
        let ids = DisplayOptions {
            format: OutputFormat::Ids,
            filter: SiteFilter::new().with(Field::Archived, "0"),
            ..Default::default()
        };
        assert_eq!(render(&target(), &found(), &ids).unwrap(), "1\n");

        let count = DisplayOptions {
            format: OutputFormat::Count,
            filter: SiteFilter::new()
                .with(Field::Archived, "1")
                .with(Field::Domain, "example.com"),
            ..Default::default()
        };
        assert_eq!(render(&target(), &found(), &count).unwrap(), "1\n");

        let none = DisplayOptions {
            format: OutputFormat::Json,
            filter: SiteFilter::new().with(Field::Spam, "1"),
            ..Default::default()
        };
        assert_eq!(render(&target(), &found(), &none).unwrap(), "[]\n");
    }

    #[test]
    fn test_filter_is_exact() {
        let site = Site::new(10, "example.com", "/");
        assert!(SiteFilter::new().matches(&site));
        assert!(SiteFilter::new().with(Field::BlogId, "10").matches(&site));
        assert!(!SiteFilter::new().with(Field::BlogId, "1").matches(&site));
        assert!(!SiteFilter::new().with(Field::Domain, "Example.com").matches(&site));
    }

    #[test]
    fn test_single_field() {
        let options = DisplayOptions {
            field: Some(Field::Url),
            ..Default::default()
        };
        assert_eq!(
            render(&target(), &found(), &options).unwrap(),
            "example.com/\nexample.com/old/\n"
        );

        let json = DisplayOptions {
            format: OutputFormat::Json,
            field: Some(Field::BlogId),
            ..Default::default()
        };
        assert_eq!(render(&target(), &found(), &json).unwrap(), "[1,3]\n");
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let out = render(&target(), &found(), &DisplayOptions::default()).unwrap();
        assert!(out.contains("blog_id"));
        assert!(out.contains("url"));
        assert!(out.contains("example.com/old/"));
        assert!(out.ends_with('\n'));
    }
}
