use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Text,
    Table,
    Chart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub content: ResponseContent,
    pub summary: String,
}

impl QueryResponse {
    pub fn kind(&self) -> ResponseKind {
        match self.content {
            ResponseContent::Text { .. } => ResponseKind::Text,
            ResponseContent::Table(_) => ResponseKind::Table,
            ResponseContent::Chart(_) => ResponseKind::Chart,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseContent {
    Text {
        message: String,
        suggestions: Vec<String>,
    },
    Table(TableData),
    Chart(ChartData),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TableData {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from JSON objects. Columns follow the first row's key
    /// order; keys that only appear in later rows are appended.
    pub fn from_objects(objects: &[Map<String, Value>]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for object in objects {
            for key in object.keys() {
                if !headers.iter().any(|header| header == key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = objects
            .iter()
            .map(|object| {
                headers
                    .iter()
                    .map(|header| object.get(header).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|candidate| candidate == header)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// First `max_chars` characters, with `...` appended when anything was cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out = text.chars().take(max_chars).collect::<String>();
    out.push_str("...");
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub y_axis_title: Option<String>,
    pub y_max: Option<f64>,
}

impl ChartData {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            labels: Vec::new(),
            series: Vec::new(),
            y_axis_title: None,
            y_max: None,
        }
    }

    pub fn with_series(
        mut self,
        label: impl Into<String>,
        points: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        let (labels, values): (Vec<String>, Vec<f64>) = points.into_iter().unzip();
        self.labels = labels;
        self.series.push(ChartSeries {
            label: label.into(),
            values,
        });
        self
    }

    pub fn with_y_axis(mut self, title: impl Into<String>) -> Self {
        self.y_axis_title = Some(title.into());
        self
    }

    pub fn with_y_max(mut self, max: f64) -> Self {
        self.y_max = Some(max);
        self
    }

    pub fn first_series(&self) -> &[f64] {
        self.series
            .first()
            .map(|series| series.values.as_slice())
            .unwrap_or(&[])
    }
}
