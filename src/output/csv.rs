use super::Field;
use crate::model::Site;

pub fn render_csv(rows: &[&Site], fields: &[Field]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_record(fields.iter().map(|f| f.as_str().to_string())));

    for site in rows {
        lines.push(join_record(fields.iter().map(|f| f.text(site))));
    }

    lines.join("\n")
}

fn join_record(cells: impl Iterator<Item = String>) -> String {
    cells.map(|c| escape(&c)).collect::<Vec<_>>().join(",")
}

/// Quotes a cell if it contains a delimiter, quote, or line break.
fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
