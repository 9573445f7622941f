//! Declarative detail templates
//!
//! Each category describes its detail panel as a list of labelled field
//! accessors. One generic routine interprets any template against a record,
//! producing a [`DetailView`] that can be emitted as HTML or plain text.

use crate::data::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailTemplate {
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

/// One labelled entry of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub label: String,
    /// Dotted accessor path into the record
    pub path: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    /// An array of objects, each rendered with the nested field list
    List(Vec<FieldSpec>),
}

impl FieldSpec {
    pub fn text(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            kind: FieldKind::Text,
        }
    }

    pub fn list(label: impl Into<String>, path: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            kind: FieldKind::List(fields),
        }
    }
}

impl DetailTemplate {
    pub fn new(title: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }

    /// Interprets the template against a record. Missing fields render empty.
    pub fn render(&self, record: &Record) -> DetailView {
        DetailView {
            title: self.title.clone(),
            entries: render_fields(&self.fields, record),
        }
    }
}

fn render_fields(fields: &[FieldSpec], record: &Record) -> Vec<DetailEntry> {
    fields
        .iter()
        .map(|field| match &field.kind {
            FieldKind::Text => DetailEntry::Field {
                label: field.label.clone(),
                value: record.text(&field.path).unwrap_or_default(),
            },
            FieldKind::List(nested) => DetailEntry::List {
                label: field.label.clone(),
                items: record
                    .children(&field.path)
                    .iter()
                    .map(|child| render_fields(nested, child))
                    .collect(),
            },
        })
        .collect()
}

/// A rendered detail panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub title: String,
    pub entries: Vec<DetailEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DetailEntry {
    Field { label: String, value: String },
    List { label: String, items: Vec<Vec<DetailEntry>> },
}

impl DetailView {
    /// HTML fragment for the detail panel; record values are escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(html, "<h3>{}</h3>", escape_html(&self.title));
        write_entries_html(&mut html, &self.entries);
        html
    }

    /// Indented plain-text rendering
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{}", self.title);
        write_entries_text(&mut text, &self.entries, 1);
        text
    }

    /// Every field value in the view, depth first
    pub fn values(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_values(&self.entries, &mut out);
        out
    }
}

fn write_entries_html(html: &mut String, entries: &[DetailEntry]) {
    html.push_str("<dl>");
    for entry in entries {
        match entry {
            DetailEntry::Field { label, value } => {
                let _ = write!(
                    html,
                    "<dt>{}</dt><dd>{}</dd>",
                    escape_html(label),
                    escape_html(value)
                );
            }
            DetailEntry::List { label, items } => {
                let _ = write!(html, "<dt>{}</dt><dd><ul>", escape_html(label));
                for item in items {
                    html.push_str("<li>");
                    write_entries_html(html, item);
                    html.push_str("</li>");
                }
                html.push_str("</ul></dd>");
            }
        }
    }
    html.push_str("</dl>");
}

fn write_entries_text(text: &mut String, entries: &[DetailEntry], depth: usize) {
    let indent = "  ".repeat(depth);
    for entry in entries {
        match entry {
            DetailEntry::Field { label, value } => {
                let _ = writeln!(text, "{indent}{label}: {value}");
            }
            DetailEntry::List { label, items } => {
                let _ = writeln!(text, "{indent}{label}: ({})", items.len());
                for item in items {
                    let _ = writeln!(text, "{indent}  -");
                    write_entries_text(text, item, depth + 2);
                }
            }
        }
    }
}

fn collect_values<'a>(entries: &'a [DetailEntry], out: &mut Vec<&'a str>) {
    for entry in entries {
        match entry {
            DetailEntry::Field { value, .. } => out.push(value),
            DetailEntry::List { items, .. } => {
                for item in items {
                    collect_values(item, out);
                }
            }
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inspection_template() -> DetailTemplate {
        DetailTemplate::new(
            "Source",
            vec![
                FieldSpec::text("Habitat", "habitat"),
                FieldSpec::list(
                    "Inspections",
                    "inspections",
                    vec![
                        FieldSpec::text("Date", "created"),
                        FieldSpec::text("Condition", "condition"),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_render_missing_fields_empty() {
        let record = Record::from_value(json!({})).unwrap();
        let view = inspection_template().render(&record);
        assert_eq!(
            view.entries,
            vec![
                DetailEntry::Field {
                    label: "Habitat".into(),
                    value: String::new()
                },
                DetailEntry::List {
                    label: "Inspections".into(),
                    items: vec![]
                },
            ]
        );
    }

    #[test]
    fn test_render_nested_list() {
        let record = Record::from_value(json!({
            "habitat": "pond",
            "inspections": [
                { "created": "2024-05-01", "condition": "larvae" },
                { "created": "2024-06-01", "condition": "dry" }
            ]
        }))
        .unwrap();
        let view = inspection_template().render(&record);
        assert_eq!(
            view.values(),
            vec!["pond", "2024-05-01", "larvae", "2024-06-01", "dry"]
        );
        let text = view.to_text();
        assert!(text.contains("Inspections: (2)"));
        assert!(text.contains("Condition: dry"));
    }

    #[test]
    fn test_html_escapes_values() {
        let record = Record::from_value(json!({ "habitat": "<b>ditch</b> & drain" })).unwrap();
        let html = inspection_template().render(&record).to_html();
        assert!(html.starts_with("<h3>Source</h3><dl>"));
        assert!(html.contains("<dd>&lt;b&gt;ditch&lt;/b&gt; &amp; drain</dd>"));
        assert!(html.contains("<dt>Inspections</dt><dd><ul></ul></dd>"));
    }
}
