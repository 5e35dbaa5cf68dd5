use crate::query::{ChartData, TableData};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Table,
    Chart,
    Text,
    Comparison,
}

impl WidgetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Chart => "chart",
            Self::Text => "text",
            Self::Comparison => "comparison",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetData {
    Table(TableData),
    Chart(ChartData),
    /// Only appears as one side of a comparison.
    Text(String),
    Comparison {
        source_widget_id: String,
        source_query: String,
        source: Box<WidgetData>,
        result: Box<WidgetData>,
    },
}

impl WidgetData {
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Table(_) => WidgetKind::Table,
            Self::Chart(_) => WidgetKind::Chart,
            Self::Text(_) => WidgetKind::Text,
            Self::Comparison { .. } => WidgetKind::Comparison,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasWidget {
    pub id: String,
    pub title: String,
    pub data: WidgetData,
    /// Prompt that produced this widget.
    pub query: String,
    pub created_at: DateTime<Utc>,
}

impl CanvasWidget {
    pub fn new(query: &str, data: WidgetData) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: format!("Result for: \"{}\"", query.trim()),
            data,
            query: query.trim().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn comparison(source: &CanvasWidget, query: &str, result: WidgetData) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: format!("Comparison: \"{}\" vs \"{}\"", source.query, query.trim()),
            data: WidgetData::Comparison {
                source_widget_id: source.id.clone(),
                source_query: source.query.clone(),
                source: Box::new(source.data.clone()),
                result: Box::new(result),
            },
            query: query.trim().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.data.kind()
    }

    pub fn can_compare(&self) -> bool {
        self.kind() != WidgetKind::Comparison
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonDialog {
    pub open: bool,
    pub source_widget_id: Option<String>,
    /// Set when the last comparison request failed; the dialog stays open.
    pub error: Option<String>,
}

/// Widgets shown in the side panel, oldest first, laid out in a grid.
#[derive(Debug, Clone, Default)]
pub struct CanvasWorkspaceState {
    pub widgets: Vec<CanvasWidget>,
    pub open: bool,
    pub comparison: ComparisonDialog,
}

impl CanvasWorkspaceState {
    pub fn add(&mut self, widget: CanvasWidget) -> &CanvasWidget {
        self.open = true;
        self.widgets.push(widget);
        &self.widgets[self.widgets.len() - 1]
    }

    pub fn get(&self, widget_id: &str) -> Option<&CanvasWidget> {
        self.widgets.iter().find(|widget| widget.id == widget_id)
    }

    pub fn remove(&mut self, widget_id: &str) -> Option<CanvasWidget> {
        let index = self.widgets.iter().position(|widget| widget.id == widget_id)?;
        if self.comparison.source_widget_id.as_deref() == Some(widget_id) {
            self.comparison = ComparisonDialog::default();
        }
        Some(self.widgets.remove(index))
    }

    pub fn open_comparison(&mut self, widget_id: &str) -> bool {
        match self.get(widget_id) {
            Some(widget) if widget.can_compare() => {
                self.comparison = ComparisonDialog {
                    open: true,
                    source_widget_id: Some(widget_id.to_string()),
                    error: None,
                };
                true
            }
            _ => false,
        }
    }

    pub fn close_comparison(&mut self) {
        self.comparison = ComparisonDialog::default();
    }

    pub fn comparison_source(&self) -> Option<&CanvasWidget> {
        if !self.comparison.open {
            return None;
        }
        self.comparison
            .source_widget_id
            .as_deref()
            .and_then(|widget_id| self.get(widget_id))
    }
}
