use super::Field;
use crate::model::Site;
use anyhow::Result;
use serde_json::{Map, Value};

fn records(rows: &[&Site], fields: &[Field]) -> Vec<Value> {
    rows.iter()
        .map(|site| {
            let record: Map<String, Value> = fields
                .iter()
                .map(|f| (f.as_str().to_string(), f.value(site)))
                .collect();
            Value::Object(record)
        })
        .collect()
}

fn values(field: Field, rows: &[&Site]) -> Vec<Value> {
    rows.iter().map(|site| field.value(site)).collect()
}

pub fn render_json(rows: &[&Site], fields: &[Field]) -> Result<String> {
    Ok(serde_json::to_string(&records(rows, fields))?)
}

pub fn render_yaml(rows: &[&Site], fields: &[Field]) -> Result<String> {
    Ok(serde_yaml::to_string(&records(rows, fields))?)
}

pub fn render_json_values(field: Field, rows: &[&Site]) -> Result<String> {
    Ok(serde_json::to_string(&values(field, rows))?)
}

pub fn render_yaml_values(field: Field, rows: &[&Site]) -> Result<String> {
    Ok(serde_yaml::to_string(&values(field, rows))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keeps_column_order() {
        let site = Site::new(2, "example.com", "/b/");
        let out = render_json(&[&site], &[Field::Url, Field::BlogId, Field::Deleted]).unwrap();
        assert_eq!(out, r#"[{"url":"example.com/b/","blog_id":2,"deleted":0}]"#);
    }

    #[test]
    fn test_yaml_records() {
        let site = Site::new(2, "example.com", "/b/");
        let out = render_yaml(&[&site], &[Field::BlogId, Field::Url]).unwrap();
        assert_eq!(out, "- blog_id: 2\n  url: example.com/b/\n");
    }

    #[test]
    fn test_yaml_values() {
        let a = Site::new(1, "a.example.com", "/");
        let b = Site::new(5, "b.example.com", "/");
        assert_eq!(render_yaml_values(Field::BlogId, &[&a, &b]).unwrap(), "- 1\n- 5\n");
    }
}
