use super::Field;
use crate::model::Site;
use tabled::{builder::Builder, settings::Style};

pub fn render_table(rows: &[&Site], fields: &[Field]) -> String {
    let mut builder = Builder::default();
    builder.push_record(fields.iter().map(|f| f.as_str()));

    for site in rows {
        builder.push_record(fields.iter().map(|f| f.text(site)));
    }

    builder.build().with(Style::rounded()).to_string()
}
