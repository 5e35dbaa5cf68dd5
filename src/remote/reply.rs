use crate::query::response::truncate;
use crate::query::TableData;
use serde_json::{Map, Value};

/// Nested wrappers deeper than this are not searched for rows.
pub const MAX_DEPTH: usize = 4;

pub const TABLE_CONFIRMATION: &str = "Result added to your workspace.";

/// How a decoded webhook body should be presented.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyShape {
    Text(String),
    Table(Vec<Map<String, Value>>),
    RawFallback(String),
}

impl ReplyShape {
    pub fn to_table(&self) -> Option<TableData> {
        match self {
            Self::Table(rows) => Some(TableData::from_objects(rows)),
            Self::Text(_) | Self::RawFallback(_) => None,
        }
    }

    /// Text for the chat transcript. Tables only get a confirmation; their
    /// rows go to the workspace.
    pub fn chat_text(&self) -> &str {
        match self {
            Self::Table(_) => TABLE_CONFIRMATION,
            Self::Text(text) | Self::RawFallback(text) => text,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Table(rows) => format!("Returned a table with {} rows.", rows.len()),
            Self::Text(text) | Self::RawFallback(text) => truncate(text, 160),
        }
    }
}

pub fn classify_reply(raw: &Value) -> ReplyShape {
    let items = match raw {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };

    let Some(first) = items.first() else {
        return ReplyShape::RawFallback("[]".to_string());
    };

    if let Value::Object(object) = first {
        if let Some(rows) = object.values().find_map(|value| nested_table(value, MAX_DEPTH)) {
            return ReplyShape::Table(rows);
        }

        if object.len() == 1 {
            if let Some(Value::String(text)) = object.values().next() {
                return ReplyShape::Text(text.clone());
            }
        }

        if object.len() > 1 {
            return ReplyShape::Table(objects(items));
        }
    }

    ReplyShape::RawFallback(first.to_string())
}

/// Finds an array of multi-column rows, looking through single-key wrappers
/// such as `[{"SQL_DATA": [...]}]`.
fn nested_table(value: &Value, depth: usize) -> Option<Vec<Map<String, Value>>> {
    if depth == 0 {
        return None;
    }

    match value {
        Value::Array(items) => match items.first() {
            Some(Value::Object(first)) if first.len() > 1 => Some(objects(items)),
            Some(Value::Object(first)) if first.len() == 1 => first
                .values()
                .next()
                .and_then(|inner| nested_table(inner, depth - 1)),
            _ => None,
        },
        Value::Object(object) if object.len() == 1 => object
            .values()
            .next()
            .and_then(|inner| nested_table(inner, depth - 1)),
        _ => None,
    }
}

fn objects(items: &[Value]) -> Vec<Map<String, Value>> {
    items
        .iter()
        .filter_map(|item| item.as_object().cloned())
        .collect()
}
