use crate::audit::AuditLogger;
use crate::data::{MockDataset, UserRole};
use crate::query::{QueryProcessor, QueryResponse, ResponseContent};
use crate::remote::{classify_reply, ReplyShape};
use crate::session::{Conversation, Folder, Message};
use crate::ui::workspace::{CanvasWidget, CanvasWorkspaceState, WidgetData};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Answer from the generated dataset.
    Local,
    /// Forward questions to the webhook.
    Remote,
}

impl QueryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chat,
    AuditLog,
    Analytics,
}

impl View {
    pub const ALL: [View; 3] = [View::Chat, View::AuditLog, View::Analytics];

    pub fn label(self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::AuditLog => "Audit Log",
            Self::Analytics => "Analytics",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestTarget {
    Chat { conversation_id: String },
    Comparison { source_widget_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub request_id: u64,
    pub prompt: String,
    pub role: UserRole,
    pub target: RequestTarget,
}

/// A question the caller must hand to the webhook client.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub request_id: u64,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input.
    Ignored,
    /// Another remote request is still in flight.
    Busy,
    NoConversation,
    NoComparisonSource,
    Answered,
    Dispatched(RemoteRequest),
}

/// Structured payload of an answer, before it is placed somewhere.
struct Answer {
    chat_text: String,
    summary: String,
    widget: Option<WidgetData>,
    /// Used when the answer is one side of a comparison.
    comparison_side: WidgetData,
}

/// Owns conversations, folders, the workspace and the in-flight request.
///
/// Every operation updates state synchronously; the UI only renders what is
/// here and forwards remote requests to the webhook client.
pub struct Orchestrator {
    pub mode: QueryMode,
    pub role: UserRole,
    pub view: View,
    data: Arc<MockDataset>,
    conversations: Vec<Conversation>,
    active_conversation_id: Option<String>,
    folders: Vec<Folder>,
    active_folder_id: Option<String>,
    pub workspace: CanvasWorkspaceState,
    in_flight: Option<PendingRequest>,
    next_request_id: u64,
}

impl Orchestrator {
    pub fn new(mode: QueryMode, role: UserRole, data: Arc<MockDataset>) -> Self {
        let mut orchestrator = Self {
            mode,
            role,
            view: View::Chat,
            data,
            conversations: Vec::new(),
            active_conversation_id: None,
            folders: Vec::new(),
            active_folder_id: None,
            workspace: CanvasWorkspaceState::default(),
            in_flight: None,
            next_request_id: 1,
        };
        orchestrator.new_conversation(None);
        orchestrator
    }

    pub fn data(&self) -> &MockDataset {
        &self.data
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn active_conversation_id(&self) -> Option<&str> {
        self.active_conversation_id.as_deref()
    }

    pub fn active_folder_id(&self) -> Option<&str> {
        self.active_folder_id.as_deref()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        let id = self.active_conversation_id.as_deref()?;
        self.conversation(id)
    }

    pub fn conversation(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| conversation.id == conversation_id)
    }

    fn conversation_mut(&mut self, conversation_id: &str) -> Option<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|conversation| conversation.id == conversation_id)
    }

    pub fn in_flight(&self) -> Option<&PendingRequest> {
        self.in_flight.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn set_role(&mut self, role: UserRole) {
        if self.role != role {
            info!(role = %role, "role changed");
            self.role = role;
        }
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn toggle_workspace(&mut self) {
        self.workspace.open = !self.workspace.open;
    }

    pub fn new_conversation(&mut self, folder_id: Option<String>) -> String {
        let folder_id = folder_id.filter(|id| self.folders.iter().any(|folder| &folder.id == id));
        let conversation = Conversation::new(folder_id);
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.active_conversation_id = Some(id.clone());
        self.view = View::Chat;
        debug!(conversation_id = %id, "conversation created");
        id
    }

    pub fn select_conversation(&mut self, conversation_id: &str) {
        if self.conversation(conversation_id).is_some() {
            self.active_conversation_id = Some(conversation_id.to_string());
            self.view = View::Chat;
        }
    }

    pub fn delete_conversation(&mut self, conversation_id: &str) {
        let before = self.conversations.len();
        self.conversations
            .retain(|conversation| conversation.id != conversation_id);
        if self.conversations.len() == before {
            return;
        }

        if self.active_conversation_id.as_deref() == Some(conversation_id) {
            self.active_conversation_id = self
                .conversations
                .first()
                .map(|conversation| conversation.id.clone());
        }
        debug!(conversation_id, "conversation deleted");
    }

    pub fn rename_conversation(&mut self, conversation_id: &str, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            return;
        }
        if let Some(conversation) = self.conversation_mut(conversation_id) {
            conversation.title = title.to_string();
        }
    }

    pub fn create_folder(&mut self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let folder = Folder::new(name);
        let id = folder.id.clone();
        self.folders.push(folder);
        Some(id)
    }

    /// `None` shows every conversation.
    pub fn select_folder(&mut self, folder_id: Option<&str>) {
        match folder_id {
            Some(id) if self.folders.iter().any(|folder| folder.id == id) => {
                self.active_folder_id = Some(id.to_string());
            }
            Some(_) => {}
            None => self.active_folder_id = None,
        }
    }

    pub fn rename_folder(&mut self, folder_id: &str, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(folder) = self.folders.iter_mut().find(|folder| folder.id == folder_id) {
            folder.name = name.to_string();
        }
    }

    /// Conversations in the folder lose their folder reference; none are
    /// deleted.
    pub fn delete_folder(&mut self, folder_id: &str) {
        self.folders.retain(|folder| folder.id != folder_id);
        for conversation in &mut self.conversations {
            if conversation.folder_id.as_deref() == Some(folder_id) {
                conversation.folder_id = None;
            }
        }
        if self.active_folder_id.as_deref() == Some(folder_id) {
            self.active_folder_id = None;
        }
    }

    pub fn conversations_in_active_folder(&self) -> Vec<&Conversation> {
        self.conversations
            .iter()
            .filter(|conversation| match self.active_folder_id.as_deref() {
                Some(folder_id) => conversation.folder_id.as_deref() == Some(folder_id),
                None => true,
            })
            .collect()
    }

    pub fn submit_prompt(&mut self, text: &str, audit: &mut AuditLogger) -> SubmitOutcome {
        let prompt = text.trim();
        if prompt.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.is_busy() {
            return SubmitOutcome::Busy;
        }
        let Some(conversation_id) = self.active_conversation_id.clone() else {
            return SubmitOutcome::NoConversation;
        };
        let Some(conversation) = self.conversation_mut(&conversation_id) else {
            return SubmitOutcome::NoConversation;
        };
        conversation.messages.push(Message::user(prompt));

        match self.mode {
            QueryMode::Local => {
                let answer = self.answer_locally(prompt);
                let role = self.role;
                self.apply_chat_answer(&conversation_id, prompt, role, answer, audit);
                SubmitOutcome::Answered
            }
            QueryMode::Remote => SubmitOutcome::Dispatched(self.dispatch(
                prompt,
                RequestTarget::Chat { conversation_id },
            )),
        }
    }

    pub fn remove_widget(&mut self, widget_id: &str) {
        if self.workspace.remove(widget_id).is_some() {
            debug!(widget_id, "widget removed");
        }
    }

    pub fn open_comparison(&mut self, widget_id: &str) -> bool {
        self.workspace.open_comparison(widget_id)
    }

    pub fn close_comparison(&mut self) {
        self.workspace.close_comparison();
    }

    pub fn submit_comparison(&mut self, text: &str, audit: &mut AuditLogger) -> SubmitOutcome {
        let prompt = text.trim();
        if prompt.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.is_busy() {
            return SubmitOutcome::Busy;
        }
        let Some(source_widget_id) = self
            .workspace
            .comparison_source()
            .map(|widget| widget.id.clone())
        else {
            return SubmitOutcome::NoComparisonSource;
        };
        self.workspace.comparison.error = None;

        match self.mode {
            QueryMode::Local => {
                let answer = self.answer_locally(prompt);
                let role = self.role;
                self.apply_comparison_answer(&source_widget_id, prompt, role, answer, audit);
                SubmitOutcome::Answered
            }
            QueryMode::Remote => SubmitOutcome::Dispatched(self.dispatch(
                prompt,
                RequestTarget::Comparison { source_widget_id },
            )),
        }
    }

    /// Applies a webhook reply. Returns `false` when the reply does not belong
    /// to the in-flight request.
    pub fn complete_remote(
        &mut self,
        request_id: u64,
        reply: Result<Value, String>,
        audit: &mut AuditLogger,
    ) -> bool {
        let matches = self
            .in_flight
            .as_ref()
            .is_some_and(|pending| pending.request_id == request_id);
        if !matches {
            debug!(request_id, "ignoring stale reply");
            return false;
        }
        let Some(pending) = self.in_flight.take() else {
            return false;
        };

        match (reply, pending.target) {
            (Ok(raw), RequestTarget::Chat { conversation_id }) => {
                let answer = answer_from_reply(&classify_reply(&raw));
                self.apply_chat_answer(
                    &conversation_id,
                    &pending.prompt,
                    pending.role,
                    answer,
                    audit,
                );
            }
            (Ok(raw), RequestTarget::Comparison { source_widget_id }) => {
                let answer = answer_from_reply(&classify_reply(&raw));
                self.apply_comparison_answer(
                    &source_widget_id,
                    &pending.prompt,
                    pending.role,
                    answer,
                    audit,
                );
            }
            (Err(err), RequestTarget::Chat { conversation_id }) => {
                warn!(request_id, "query failed: {err}");
                if let Some(conversation) = self.conversation_mut(&conversation_id) {
                    conversation
                        .messages
                        .push(Message::error(format!("An error occurred: {err}")));
                }
            }
            (Err(err), RequestTarget::Comparison { source_widget_id }) => {
                warn!(request_id, "comparison failed: {err}");
                if self.workspace.comparison.source_widget_id.as_deref()
                    == Some(source_widget_id.as_str())
                {
                    self.workspace.comparison.error = Some(format!("An error occurred: {err}"));
                }
            }
        }
        true
    }

    fn dispatch(&mut self, prompt: &str, target: RequestTarget) -> RemoteRequest {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(PendingRequest {
            request_id,
            prompt: prompt.to_string(),
            role: self.role,
            target,
        });
        debug!(request_id, "remote request dispatched");
        RemoteRequest {
            request_id,
            question: prompt.to_string(),
        }
    }

    fn answer_locally(&self, prompt: &str) -> Answer {
        let response = QueryProcessor::new(&self.data, self.role).process_query(prompt);
        debug!(kind = ?response.kind(), "local answer ready");
        answer_from_response(response)
    }

    fn apply_chat_answer(
        &mut self,
        conversation_id: &str,
        prompt: &str,
        role: UserRole,
        answer: Answer,
        audit: &mut AuditLogger,
    ) {
        if let Some(conversation) = self.conversation_mut(conversation_id) {
            conversation.messages.push(Message::assistant(answer.chat_text));
        }
        if let Some(data) = answer.widget {
            self.workspace.add(CanvasWidget::new(prompt, data));
        }
        self.record(prompt, role, &answer.summary, audit);
    }

    fn apply_comparison_answer(
        &mut self,
        source_widget_id: &str,
        prompt: &str,
        role: UserRole,
        answer: Answer,
        audit: &mut AuditLogger,
    ) {
        if let Some(source) = self.workspace.get(source_widget_id).cloned() {
            self.workspace
                .add(CanvasWidget::comparison(&source, prompt, answer.comparison_side));
        } else {
            warn!(source_widget_id, "comparison source removed before reply");
        }
        self.workspace.close_comparison();
        self.record(prompt, role, &answer.summary, audit);
    }

    fn record(&self, prompt: &str, role: UserRole, summary: &str, audit: &mut AuditLogger) {
        if let Err(err) = audit.log(prompt, role, summary) {
            warn!("failed to persist audit entry: {err}");
        }
    }
}

fn answer_from_response(response: QueryResponse) -> Answer {
    let QueryResponse { content, summary } = response;
    match content {
        ResponseContent::Text {
            message,
            suggestions,
        } => {
            let chat_text = if suggestions.is_empty() {
                message
            } else {
                let lines = suggestions
                    .iter()
                    .map(|suggestion| format!("• {suggestion}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{message}\n{lines}")
            };
            Answer {
                comparison_side: WidgetData::Text(chat_text.clone()),
                chat_text,
                summary,
                widget: None,
            }
        }
        ResponseContent::Table(table) => Answer {
            chat_text: summary.clone(),
            summary,
            widget: Some(WidgetData::Table(table.clone())),
            comparison_side: WidgetData::Table(table),
        },
        ResponseContent::Chart(chart) => Answer {
            chat_text: summary.clone(),
            summary,
            widget: Some(WidgetData::Chart(chart.clone())),
            comparison_side: WidgetData::Chart(chart),
        },
    }
}

fn answer_from_reply(shape: &ReplyShape) -> Answer {
    let widget = shape.to_table().map(WidgetData::Table);
    let comparison_side = widget
        .clone()
        .unwrap_or_else(|| WidgetData::Text(shape.chat_text().to_string()));
    Answer {
        chat_text: shape.chat_text().to_string(),
        summary: shape.summary(),
        widget,
        comparison_side,
    }
}

#[cfg(test)]
mod tests {
    use super::{Orchestrator, QueryMode, RequestTarget, SubmitOutcome, View};
    use crate::audit::store::MemoryStore;
    use crate::audit::AuditLogger;
    use crate::data::{MockDataset, UserRole};
    use crate::session::{MessageRole, GREETING};
    use crate::ui::workspace::{WidgetData, WidgetKind};
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::sync::Arc;

    fn dataset() -> Arc<MockDataset> {
        let mut rng = StdRng::seed_from_u64(7);
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).expect("fixture date should be valid");
        Arc::new(MockDataset::generate(&mut rng, today))
    }

    fn setup(mode: QueryMode) -> (Orchestrator, AuditLogger) {
        let audit = AuditLogger::new(Arc::new(MemoryStore::default()));
        (Orchestrator::new(mode, UserRole::Recruiter, dataset()), audit)
    }

    fn active_messages(orchestrator: &Orchestrator) -> Vec<(MessageRole, String, bool)> {
        orchestrator
            .active_conversation()
            .expect("active conversation should exist")
            .messages
            .iter()
            .map(|message| (message.role, message.content.clone(), message.is_error))
            .collect()
    }

    #[test]
    fn starts_with_one_greeted_conversation() {
        let (orchestrator, _audit) = setup(QueryMode::Local);
        assert_eq!(orchestrator.conversations.len(), 1);
        let messages = active_messages(&orchestrator);
        assert_eq!(messages, vec![(MessageRole::Assistant, GREETING.to_string(), false)]);
    }

    #[test]
    fn new_conversation_becomes_active_and_switches_to_chat() {
        let (mut orchestrator, _audit) = setup(QueryMode::Local);
        orchestrator.set_view(View::Analytics);
        let id = orchestrator.new_conversation(None);
        assert_eq!(orchestrator.active_conversation_id(), Some(id.as_str()));
        assert_eq!(orchestrator.view, View::Chat);
        assert_eq!(orchestrator.conversations[0].id, id);
    }

    #[test]
    fn selecting_unknown_conversation_is_a_no_op() {
        let (mut orchestrator, _audit) = setup(QueryMode::Local);
        let before = orchestrator.active_conversation_id().map(str::to_string);
        orchestrator.select_conversation("missing");
        assert_eq!(orchestrator.active_conversation_id().map(str::to_string), before);
    }

    #[test]
    fn deleting_only_active_conversation_leaves_none_active() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Local);
        let id = orchestrator
            .active_conversation_id()
            .expect("initial conversation")
            .to_string();
        orchestrator.delete_conversation(&id);

        assert!(orchestrator.active_conversation_id().is_none());
        assert!(orchestrator.active_conversation().is_none());
        assert_eq!(
            orchestrator.submit_prompt("hello", &mut audit),
            SubmitOutcome::NoConversation
        );
    }

    #[test]
    fn deleting_active_conversation_falls_back_to_first_remaining() {
        let (mut orchestrator, _audit) = setup(QueryMode::Local);
        let older = orchestrator
            .active_conversation_id()
            .expect("initial conversation")
            .to_string();
        let newer = orchestrator.new_conversation(None);
        orchestrator.delete_conversation(&newer);
        assert_eq!(orchestrator.active_conversation_id(), Some(older.as_str()));
    }

    #[test]
    fn rename_ignores_blank_titles() {
        let (mut orchestrator, _audit) = setup(QueryMode::Local);
        let id = orchestrator
            .active_conversation_id()
            .expect("initial conversation")
            .to_string();
        orchestrator.rename_conversation(&id, "  Q2 review ");
        orchestrator.rename_conversation(&id, "   ");
        assert_eq!(
            orchestrator.conversation(&id).map(|c| c.title.as_str()),
            Some("Q2 review")
        );
    }

    #[test]
    fn folder_rename_keeps_members_and_delete_orphans_them() {
        let (mut orchestrator, _audit) = setup(QueryMode::Local);
        let folder = orchestrator.create_folder("Audits").expect("folder created");
        let inside = orchestrator.new_conversation(Some(folder.clone()));
        let outside = orchestrator.new_conversation(None);

        orchestrator.select_folder(Some(&folder));
        let visible = orchestrator
            .conversations_in_active_folder()
            .iter()
            .map(|c| c.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(visible, vec![inside.clone()]);

        orchestrator.rename_folder(&folder, "Compliance");
        assert_eq!(orchestrator.folders()[0].name, "Compliance");
        assert_eq!(
            orchestrator.conversation(&inside).and_then(|c| c.folder_id.clone()),
            Some(folder.clone())
        );

        let count = orchestrator.conversations.len();
        orchestrator.delete_folder(&folder);
        assert!(orchestrator.folders().is_empty());
        assert_eq!(orchestrator.conversations.len(), count);
        assert!(orchestrator
            .conversations
            .iter()
            .all(|conversation| conversation.folder_id.is_none()));
        assert!(orchestrator.active_folder_id().is_none());
        assert!(orchestrator.conversation(&outside).is_some());
    }

    #[test]
    fn local_table_answer_adds_one_message_one_widget_and_one_audit_entry() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Local);
        let audit_before = audit.entries().len();

        let outcome =
            orchestrator.submit_prompt("Show all pending CRIM checks this week", &mut audit);
        assert_eq!(outcome, SubmitOutcome::Answered);

        let messages = active_messages(&orchestrator);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].0, MessageRole::User);
        assert_eq!(messages[2].0, MessageRole::Assistant);

        assert_eq!(orchestrator.workspace.widgets.len(), 1);
        let widget = &orchestrator.workspace.widgets[0];
        assert_eq!(widget.kind(), WidgetKind::Table);
        assert_eq!(
            widget.title,
            "Result for: \"Show all pending CRIM checks this week\""
        );
        assert!(orchestrator.workspace.open);

        assert_eq!(audit.entries().len(), audit_before + 1);
        assert_eq!(audit.entries()[0].query_text, "Show all pending CRIM checks this week");
        assert_eq!(audit.entries()[0].role, UserRole::Recruiter);
    }

    #[test]
    fn local_text_answer_creates_no_widget() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Local);
        orchestrator.submit_prompt("gibberish xyz", &mut audit);

        let messages = active_messages(&orchestrator);
        assert_eq!(messages.len(), 3);
        assert!(messages[2].1.contains("Show order volume by region"));
        assert!(orchestrator.workspace.widgets.is_empty());
        assert!(!orchestrator.workspace.open);
    }

    #[test]
    fn blank_prompt_is_ignored() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Local);
        assert_eq!(orchestrator.submit_prompt("   ", &mut audit), SubmitOutcome::Ignored);
        assert_eq!(active_messages(&orchestrator).len(), 1);
    }

    #[test]
    fn remote_request_blocks_further_submissions_until_reply() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Remote);
        let SubmitOutcome::Dispatched(request) = orchestrator.submit_prompt("first", &mut audit)
        else {
            panic!("remote mode should dispatch");
        };
        assert_eq!(request.question, "first");
        assert!(orchestrator.is_busy());
        assert_eq!(orchestrator.submit_prompt("second", &mut audit), SubmitOutcome::Busy);

        assert!(!orchestrator.complete_remote(request.request_id + 1, Ok(json!([])), &mut audit));
        assert!(orchestrator.is_busy());

        assert!(orchestrator.complete_remote(
            request.request_id,
            Ok(json!([{ "RAG": "hello" }])),
            &mut audit
        ));
        assert!(!orchestrator.is_busy());
        let messages = active_messages(&orchestrator);
        assert_eq!(messages.last().map(|m| m.1.as_str()), Some("hello"));
        assert!(orchestrator.workspace.widgets.is_empty());
    }

    #[test]
    fn remote_reply_is_audited_under_the_submitting_role() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Remote);
        let SubmitOutcome::Dispatched(request) =
            orchestrator.submit_prompt("pending checks", &mut audit)
        else {
            panic!("remote mode should dispatch");
        };
        orchestrator.set_role(UserRole::ComplianceOfficer);

        assert!(orchestrator.complete_remote(
            request.request_id,
            Ok(json!([{ "RAG": "two pending" }])),
            &mut audit
        ));
        assert_eq!(audit.entries()[0].query_text, "pending checks");
        assert_eq!(audit.entries()[0].role, UserRole::Recruiter);
        assert_eq!(orchestrator.role, UserRole::ComplianceOfficer);
    }

    #[test]
    fn remote_table_reply_adds_table_widget() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Remote);
        let SubmitOutcome::Dispatched(request) =
            orchestrator.submit_prompt("orders by region", &mut audit)
        else {
            panic!("remote mode should dispatch");
        };
        orchestrator.complete_remote(
            request.request_id,
            Ok(json!([{"region": "West", "orders": 4}, {"region": "South", "orders": 2}])),
            &mut audit,
        );

        assert_eq!(orchestrator.workspace.widgets.len(), 1);
        let WidgetData::Table(table) = &orchestrator.workspace.widgets[0].data else {
            panic!("expected a table widget");
        };
        assert_eq!(table.headers, vec!["region", "orders"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(audit.entries()[0].response_summary, "Returned a table with 2 rows.");
    }

    #[test]
    fn remote_failure_is_inline_error_without_widget_or_audit() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Remote);
        let audit_before = audit.entries().len();
        let SubmitOutcome::Dispatched(request) = orchestrator.submit_prompt("anything", &mut audit)
        else {
            panic!("remote mode should dispatch");
        };
        orchestrator.complete_remote(
            request.request_id,
            Err("HTTP error: 500".to_string()),
            &mut audit,
        );

        let messages = active_messages(&orchestrator);
        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[2],
            (
                MessageRole::Assistant,
                "An error occurred: HTTP error: 500".to_string(),
                true
            )
        );
        assert!(orchestrator.workspace.widgets.is_empty());
        assert_eq!(audit.entries().len(), audit_before);
        assert!(!orchestrator.is_busy());
    }

    #[test]
    fn removing_widget_does_not_touch_conversations() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Local);
        orchestrator.submit_prompt("Show completion rates by search type", &mut audit);
        orchestrator.submit_prompt("Show order volume by region", &mut audit);
        let messages = active_messages(&orchestrator);
        let ids = orchestrator
            .workspace
            .widgets
            .iter()
            .map(|widget| widget.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(ids.len(), 2);

        orchestrator.remove_widget(&ids[0]);
        assert_eq!(orchestrator.workspace.widgets.len(), 1);
        assert_eq!(orchestrator.workspace.widgets[0].id, ids[1]);
        assert_eq!(active_messages(&orchestrator), messages);
    }

    #[test]
    fn local_comparison_references_source_and_cannot_nest() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Local);
        orchestrator.submit_prompt("Show completion rates by search type", &mut audit);
        let source_id = orchestrator.workspace.widgets[0].id.clone();

        assert!(orchestrator.open_comparison(&source_id));
        let outcome = orchestrator.submit_comparison("Show order volume by region", &mut audit);
        assert_eq!(outcome, SubmitOutcome::Answered);
        assert!(!orchestrator.workspace.comparison.open);

        assert_eq!(orchestrator.workspace.widgets.len(), 2);
        let comparison = &orchestrator.workspace.widgets[1];
        let WidgetData::Comparison {
            source_widget_id,
            source_query,
            ..
        } = &comparison.data
        else {
            panic!("expected a comparison widget");
        };
        assert_eq!(source_widget_id, &source_id);
        assert_eq!(source_query, "Show completion rates by search type");

        let comparison_id = comparison.id.clone();
        assert!(!orchestrator.open_comparison(&comparison_id));
    }

    #[test]
    fn remote_comparison_failure_keeps_dialog_open_with_error() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Local);
        orchestrator.submit_prompt("Show completion rates by search type", &mut audit);
        let source_id = orchestrator.workspace.widgets[0].id.clone();
        orchestrator.mode = QueryMode::Remote;

        assert!(orchestrator.open_comparison(&source_id));
        let SubmitOutcome::Dispatched(request) =
            orchestrator.submit_comparison("same for last quarter", &mut audit)
        else {
            panic!("remote mode should dispatch");
        };
        assert_eq!(
            orchestrator.in_flight().map(|pending| pending.target.clone()),
            Some(RequestTarget::Comparison {
                source_widget_id: source_id.clone()
            })
        );

        orchestrator.complete_remote(request.request_id, Err("timed out".to_string()), &mut audit);
        assert!(orchestrator.workspace.comparison.open);
        assert_eq!(
            orchestrator.workspace.comparison.error.as_deref(),
            Some("An error occurred: timed out")
        );
        assert_eq!(orchestrator.workspace.widgets.len(), 1);
    }

    #[test]
    fn comparison_without_open_dialog_is_rejected() {
        let (mut orchestrator, mut audit) = setup(QueryMode::Local);
        assert_eq!(
            orchestrator.submit_comparison("anything", &mut audit),
            SubmitOutcome::NoComparisonSource
        );
    }
}
