/// Clicks coming out of the workspace panel, applied after the frame is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    Remove { widget_id: String },
    Compare { widget_id: String },
}

impl WidgetAction {
    pub fn to_log_line(&self) -> String {
        match self {
            Self::Remove { widget_id } => format!("widget_removed widget_id={widget_id}"),
            Self::Compare { widget_id } => format!("comparison_opened widget_id={widget_id}"),
        }
    }
}

/// Sidebar clicks on conversations and folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarAction {
    NewConversation,
    SelectConversation(String),
    RenameConversation { conversation_id: String, title: String },
    DeleteConversation(String),
    CreateFolder(String),
    SelectFolder(Option<String>),
    RenameFolder { folder_id: String, name: String },
    DeleteFolder(String),
}

/// State of an inline rename field after one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameEdit {
    Editing,
    Commit(String),
    Cancel,
}

impl RenameEdit {
    pub fn from_focus(lost_focus: bool, enter_pressed: bool, buffer: &str) -> Self {
        match (lost_focus, enter_pressed) {
            (false, _) => Self::Editing,
            (true, true) => Self::Commit(buffer.to_string()),
            (true, false) => Self::Cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RenameEdit, WidgetAction};

    #[test]
    fn log_lines_name_the_widget() {
        let remove = WidgetAction::Remove {
            widget_id: "w1".to_string(),
        };
        let compare = WidgetAction::Compare {
            widget_id: "w2".to_string(),
        };
        assert_eq!(remove.to_log_line(), "widget_removed widget_id=w1");
        assert_eq!(compare.to_log_line(), "comparison_opened widget_id=w2");
    }

    #[test]
    fn rename_commits_on_enter_and_cancels_otherwise() {
        assert_eq!(RenameEdit::from_focus(false, false, "Draft"), RenameEdit::Editing);
        assert_eq!(
            RenameEdit::from_focus(true, true, "Disputes Q2"),
            RenameEdit::Commit("Disputes Q2".to_string())
        );
        assert_eq!(RenameEdit::from_focus(true, false, "Disputes Q2"), RenameEdit::Cancel);
    }
}
