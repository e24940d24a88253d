// src/formatting.rs

use crate::messaging::{Fields, MessageTemplate};
use serde_json::Value;

/// A trait for rendering a templated message into a single string.
pub trait TextFormatter: Send + Sync {
    fn format_message(&self, title: &str, template: MessageTemplate, fields: &Fields) -> String;
}

/// A plain-text formatter that lists the template's placeholders in order.
///
/// Placeholders missing from the field map are shown as `-`, and extra
/// fields the template does not know about are ignored.
pub struct PlainTextFormatter;

impl PlainTextFormatter {
    fn format_line(&self, key: &str, value: Option<&Value>) -> String {
        let rendered = match value {
            None | Some(Value::Null) => "-".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        format!("{}: {}", humanize(key), rendered)
    }

    /// Renders a list of items, such as reminder entries, one block per item.
    pub fn format_items(&self, title: &str, template: MessageTemplate, items: &[Fields]) -> String {
        let blocks: Vec<String> = items
            .iter()
            .map(|item| self.format_body(template, item))
            .collect();
        format!("*{}*\n{}", title, blocks.join("\n\n"))
    }

    fn format_body(&self, template: MessageTemplate, fields: &Fields) -> String {
        template
            .placeholders()
            .iter()
            .map(|key| self.format_line(key, fields.get(*key)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TextFormatter for PlainTextFormatter {
    fn format_message(&self, title: &str, template: MessageTemplate, fields: &Fields) -> String {
        format!("*{}*\n{}", title, self.format_body(template, fields))
    }
}

/// Turns a snake_case placeholder into a label, e.g. `next_steps` -> `Next Steps`.
fn humanize(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
