use crate::analytics::DashboardMetrics;
use crate::audit::{AuditLogger, DEFAULT_VIEW_LIMIT};
use crate::data::{OrderStatus, UserRole};
use crate::event::AppEvent;
use crate::orchestrator::{Orchestrator, QueryMode, RequestTarget, SubmitOutcome, View};
use crate::query::processor::NO_DATA;
use crate::query::response::truncate;
use crate::remote::WebhookClient;
use crate::session::MessageRole;
use crate::theme::Theme;
use crate::ui::canvas::{workspace_badge, WidgetRenderer};
use crate::ui::chart;
use crate::ui::event::{RenameEdit, SidebarAction, WidgetAction};
use eframe::egui::{self, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;
use tracing::warn;

const COMPOSER_HINT: &str = "Ask about orders, disputes or turnaround times...";
const COMPARISON_HINT: &str = "e.g., Show me the same data for last quarter";

#[derive(Debug, Clone, PartialEq, Eq)]
enum RenameTarget {
    Conversation(String),
    Folder(String),
}

#[derive(Debug, Clone)]
struct Rename {
    target: RenameTarget,
    buffer: String,
    focused: bool,
}

pub struct AccuQueryApp {
    rx: Receiver<AppEvent>,
    orchestrator: Orchestrator,
    audit: AuditLogger,
    webhook: WebhookClient,
    metrics: DashboardMetrics,
    theme: Theme,
    renderer: WidgetRenderer,
    input_buffer: String,
    comparison_input: String,
    new_folder_name: String,
    renaming: Option<Rename>,
    audit_role_filter: Option<UserRole>,
    diagnostics_log: Vec<String>,
    scroll_to_bottom: bool,
}

impl AccuQueryApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        orchestrator: Orchestrator,
        audit: AuditLogger,
        webhook: WebhookClient,
    ) -> Self {
        let metrics = DashboardMetrics::compute(orchestrator.data());
        let mut app = Self {
            rx,
            orchestrator,
            audit,
            webhook,
            metrics,
            theme: Theme::default(),
            renderer: WidgetRenderer::default(),
            input_buffer: String::new(),
            comparison_input: String::new(),
            new_folder_name: String::new(),
            renaming: None,
            audit_role_filter: None,
            diagnostics_log: Vec::new(),
            scroll_to_bottom: false,
        };
        app.log_diagnostic(format!(
            "started in {} mode ({} orders)",
            app.orchestrator.mode.as_str(),
            app.metrics.total_orders
        ));
        app
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn timestamp() -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn handle_outcome(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Dispatched(request) => {
                self.webhook.send(request.request_id, request.question);
            }
            SubmitOutcome::Answered => self.scroll_to_bottom = true,
            SubmitOutcome::Busy => self.log_diagnostic("still waiting for the previous reply"),
            SubmitOutcome::NoConversation => self.log_diagnostic("no conversation selected"),
            SubmitOutcome::NoComparisonSource => {
                self.log_diagnostic("comparison source is no longer available")
            }
            SubmitOutcome::Ignored => {}
        }
    }

    fn submit_prompt(&mut self, ctx: &egui::Context) {
        let prompt = std::mem::take(&mut self.input_buffer);
        let outcome = self.orchestrator.submit_prompt(&prompt, &mut self.audit);
        if outcome == SubmitOutcome::Busy {
            self.input_buffer = prompt;
        }
        self.scroll_to_bottom = true;
        self.handle_outcome(outcome);
        ctx.request_repaint();
    }

    fn submit_comparison(&mut self, ctx: &egui::Context) {
        let prompt = std::mem::take(&mut self.comparison_input);
        let outcome = self.orchestrator.submit_comparison(&prompt, &mut self.audit);
        self.handle_outcome(outcome);
        ctx.request_repaint();
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event, ctx),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent, ctx: &egui::Context) {
        match event {
            AppEvent::ReplyReceived { request_id, reply } => {
                let failure = reply.as_ref().err().cloned();
                if self
                    .orchestrator
                    .complete_remote(request_id, reply, &mut self.audit)
                {
                    if let Some(err) = failure {
                        self.log_diagnostic(format!("webhook error: {err}"));
                    }
                    self.scroll_to_bottom = true;
                    ctx.request_repaint();
                } else {
                    self.log_diagnostic(format!("ignored stale reply #{request_id}"));
                }
            }
            AppEvent::AuditLogsReloaded(snapshot) => {
                self.audit.apply_snapshot(snapshot);
            }
        }
    }

    fn apply_sidebar_action(&mut self, action: SidebarAction) {
        match action {
            SidebarAction::NewConversation => {
                let folder = self.orchestrator.active_folder_id().map(str::to_string);
                self.orchestrator.new_conversation(folder);
            }
            SidebarAction::SelectConversation(id) => self.orchestrator.select_conversation(&id),
            SidebarAction::RenameConversation {
                conversation_id,
                title,
            } => self.orchestrator.rename_conversation(&conversation_id, &title),
            SidebarAction::DeleteConversation(id) => self.orchestrator.delete_conversation(&id),
            SidebarAction::CreateFolder(name) => {
                if self.orchestrator.create_folder(&name).is_none() {
                    self.log_diagnostic("folder name cannot be empty");
                }
            }
            SidebarAction::SelectFolder(id) => self.orchestrator.select_folder(id.as_deref()),
            SidebarAction::RenameFolder { folder_id, name } => {
                self.orchestrator.rename_folder(&folder_id, &name)
            }
            SidebarAction::DeleteFolder(id) => self.orchestrator.delete_folder(&id),
        }
    }

    fn apply_widget_action(&mut self, action: WidgetAction) {
        self.log_diagnostic(action.to_log_line());
        match action {
            WidgetAction::Remove { widget_id } => self.orchestrator.remove_widget(&widget_id),
            WidgetAction::Compare { widget_id } => {
                if self.orchestrator.open_comparison(&widget_id) {
                    self.comparison_input.clear();
                } else {
                    warn!(widget_id, "widget cannot be compared");
                }
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("AccuQuery AI");
                ui.separator();

                for view in View::ALL {
                    if ui
                        .selectable_label(self.orchestrator.view == view, view.label())
                        .clicked()
                    {
                        self.orchestrator.set_view(view);
                    }
                }
                ui.separator();

                let mut role = self.orchestrator.role;
                egui::ComboBox::from_id_salt("role_selector")
                    .selected_text(RichText::new(role.as_str()).color(self.theme.role_color(role)))
                    .show_ui(ui, |ui| {
                        for option in UserRole::ALL {
                            ui.selectable_value(&mut role, option, option.as_str());
                        }
                    });
                self.orchestrator.set_role(role);

                let busy = self.orchestrator.is_busy();
                let mut mode = self.orchestrator.mode;
                ui.add_enabled_ui(!busy, |ui| {
                    egui::ComboBox::from_id_salt("mode_selector")
                        .selected_text(match mode {
                            QueryMode::Local => "Local data",
                            QueryMode::Remote => "Webhook",
                        })
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut mode, QueryMode::Local, "Local data");
                            ui.selectable_value(&mut mode, QueryMode::Remote, "Webhook")
                                .on_hover_text(self.webhook.url());
                        });
                });
                self.orchestrator.mode = mode;

                if busy {
                    ui.spinner();
                    ui.label(RichText::new("Waiting for response...").color(self.theme.warning));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = workspace_badge(&self.orchestrator.workspace.widgets);
                    if ui
                        .selectable_label(self.orchestrator.workspace.open, label)
                        .clicked()
                    {
                        self.orchestrator.toggle_workspace();
                    }
                });
            });
        });
    }

    fn render_left_panel(&mut self, ctx: &egui::Context) {
        let mut actions: Vec<SidebarAction> = Vec::new();

        egui::SidePanel::left("history_panel")
            .resizable(true)
            .default_width(250.0)
            .show(ctx, |ui| {
                if ui.button("+ New Chat").clicked() {
                    actions.push(SidebarAction::NewConversation);
                }
                ui.separator();

                ui.strong("Folders");
                let active_folder = self.orchestrator.active_folder_id().map(str::to_string);
                if ui
                    .selectable_label(active_folder.is_none(), "All chats")
                    .clicked()
                {
                    actions.push(SidebarAction::SelectFolder(None));
                }
                for folder in self.orchestrator.folders() {
                    let target = RenameTarget::Folder(folder.id.clone());
                    match self.renaming.as_mut() {
                        Some(rename) if rename.target == target => match rename_field(ui, rename) {
                            RenameEdit::Editing => {}
                            RenameEdit::Commit(name) => {
                                actions.push(SidebarAction::RenameFolder {
                                    folder_id: folder.id.clone(),
                                    name,
                                });
                                self.renaming = None;
                            }
                            RenameEdit::Cancel => self.renaming = None,
                        },
                        _ => {
                            ui.horizontal(|ui| {
                                let selected = active_folder.as_deref() == Some(folder.id.as_str());
                                if ui.selectable_label(selected, &folder.name).clicked() {
                                    actions.push(SidebarAction::SelectFolder(Some(folder.id.clone())));
                                }
                                if ui.small_button("✎").on_hover_text("Rename").clicked() {
                                    self.renaming = Some(Rename {
                                        target: target.clone(),
                                        buffer: folder.name.clone(),
                                        focused: false,
                                    });
                                }
                                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                    actions.push(SidebarAction::DeleteFolder(folder.id.clone()));
                                }
                            });
                        }
                    }
                }
                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.new_folder_name)
                            .hint_text("New folder")
                            .desired_width(150.0),
                    );
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.small_button("Add").clicked() || submitted {
                        actions.push(SidebarAction::CreateFolder(std::mem::take(
                            &mut self.new_folder_name,
                        )));
                    }
                });
                ui.separator();

                ui.strong("Chat History");
                let active_conversation = self.orchestrator.active_conversation_id();
                ScrollArea::vertical()
                    .id_salt("conversation_list")
                    .show(ui, |ui| {
                        let conversations = self.orchestrator.conversations_in_active_folder();
                        if conversations.is_empty() {
                            ui.label(RichText::new("No chats yet.").color(self.theme.text_muted));
                        }
                        for conversation in conversations {
                            let target = RenameTarget::Conversation(conversation.id.clone());
                            match self.renaming.as_mut() {
                                Some(rename) if rename.target == target => {
                                    match rename_field(ui, rename) {
                                        RenameEdit::Editing => {}
                                        RenameEdit::Commit(title) => {
                                            actions.push(SidebarAction::RenameConversation {
                                                conversation_id: conversation.id.clone(),
                                                title,
                                            });
                                            self.renaming = None;
                                        }
                                        RenameEdit::Cancel => self.renaming = None,
                                    }
                                    continue;
                                }
                                _ => {}
                            }

                            let selected = active_conversation == Some(conversation.id.as_str());
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    if ui.selectable_label(selected, &conversation.title).clicked() {
                                        actions.push(SidebarAction::SelectConversation(
                                            conversation.id.clone(),
                                        ));
                                    }
                                    let subtitle = conversation.subtitle();
                                    if !subtitle.is_empty() {
                                        ui.label(
                                            RichText::new(truncate(subtitle, 32))
                                                .small()
                                                .color(self.theme.text_muted),
                                        );
                                    }
                                });
                                if ui.small_button("✎").on_hover_text("Rename").clicked() {
                                    self.renaming = Some(Rename {
                                        target: target.clone(),
                                        buffer: conversation.title.clone(),
                                        focused: false,
                                    });
                                }
                                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                    actions.push(SidebarAction::DeleteConversation(
                                        conversation.id.clone(),
                                    ));
                                }
                            });
                        }
                    });
            });

        for action in actions {
            self.apply_sidebar_action(action);
        }
    }

    fn render_right_panel(&mut self, ctx: &egui::Context) {
        if !self.orchestrator.workspace.open {
            return;
        }

        let mut actions: Vec<WidgetAction> = Vec::new();
        egui::SidePanel::right("workspace_panel")
            .resizable(true)
            .default_width(460.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Workspace");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            self.orchestrator.toggle_workspace();
                        }
                    });
                });
                ui.separator();
                self.renderer.render_workspace(
                    &self.orchestrator.workspace.widgets,
                    ui,
                    &self.theme,
                    &mut |action| actions.push(action),
                );
            });

        for action in actions {
            self.apply_widget_action(action);
        }
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| match self.orchestrator.view {
            View::Chat => self.render_chat(ui, ctx),
            View::AuditLog => self.render_audit_log(ui),
            View::Analytics => self.render_analytics(ui),
        });
    }

    fn render_chat(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(conversation) = self.orchestrator.active_conversation() else {
            ui.add_space(self.theme.spacing_24 * 4.0);
            ui.vertical_centered(|ui| {
                ui.heading("No conversation selected");
                ui.label(
                    RichText::new("Start a new chat or pick one from the history.")
                        .color(self.theme.text_muted),
                );
                if ui.button("+ New Chat").clicked() {
                    self.apply_sidebar_action(SidebarAction::NewConversation);
                }
            });
            return;
        };

        ui.heading(&conversation.title);
        ui.separator();

        let waiting_here = matches!(
            self.orchestrator.in_flight().map(|pending| &pending.target),
            Some(RequestTarget::Chat { conversation_id }) if *conversation_id == conversation.id
        );
        let transcript_height = (ui.available_height() - 150.0).max(120.0);
        ScrollArea::vertical()
            .id_salt("chat_transcript")
            .max_height(transcript_height)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in &conversation.messages {
                    let (fill, speaker) = match (message.role, message.is_error) {
                        (_, true) => (self.theme.error_bubble, "AccuQuery"),
                        (MessageRole::User, false) => (self.theme.user_bubble, "You"),
                        (MessageRole::Assistant, false) => (self.theme.assistant_bubble, "AccuQuery"),
                    };
                    self.theme.bubble_frame(fill).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(speaker).small().color(self.theme.text_muted));
                        let color = if message.is_error {
                            self.theme.danger
                        } else {
                            self.theme.text_primary
                        };
                        ui.label(RichText::new(&message.content).color(color));
                    });
                    ui.add_space(self.theme.spacing_4);
                }

                if waiting_here {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Thinking...").color(self.theme.text_muted));
                    });
                }

                if self.scroll_to_bottom {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
        self.scroll_to_bottom = false;

        ui.separator();
        egui::CollapsingHeader::new("Diagnostics")
            .default_open(false)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("diagnostics_log")
                    .max_height(90.0)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in &self.diagnostics_log {
                            ui.label(RichText::new(entry).small().monospace());
                        }
                    });
            });

        let input_enabled = !self.orchestrator.is_busy();
        let hint = if input_enabled {
            COMPOSER_HINT
        } else {
            "Waiting for response..."
        };
        let mut send_now = false;
        self.theme.composer_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                let response = ui.add_enabled(
                    input_enabled,
                    egui::TextEdit::singleline(&mut self.input_buffer)
                        .desired_width(ui.available_width() - 70.0)
                        .hint_text(hint),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    send_now = true;
                }
                send_now |= ui
                    .add_enabled(
                        input_enabled && !self.input_buffer.trim().is_empty(),
                        egui::Button::new("Send"),
                    )
                    .clicked();
            });
        });

        if send_now && input_enabled {
            self.submit_prompt(ctx);
        }
    }

    fn render_audit_log(&mut self, ui: &mut egui::Ui) {
        ui.heading("Audit Log");
        ui.label(
            RichText::new("Every answered query, most recent first.").color(self.theme.text_muted),
        );
        ui.separator();

        let mut clear = false;
        ui.horizontal(|ui| {
            ui.label("Role:");
            egui::ComboBox::from_id_salt("audit_role_filter")
                .selected_text(self.audit_role_filter.map_or("All", UserRole::as_str))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.audit_role_filter, None, "All");
                    for role in UserRole::ALL {
                        ui.selectable_value(&mut self.audit_role_filter, Some(role), role.as_str());
                    }
                });
            if ui.button("Refresh").clicked() {
                self.audit.reload();
            }
            clear = ui.button("Clear log").clicked();
        });

        let entries = self
            .audit
            .filtered(self.audit_role_filter, DEFAULT_VIEW_LIMIT);
        ui.label(
            RichText::new(format!(
                "Showing {} of {} entries",
                entries.len(),
                self.audit.entries().len()
            ))
                .small()
                .color(self.theme.text_muted),
        );

        ScrollArea::both()
            .id_salt("audit_entries")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("audit_grid")
                    .striped(true)
                    .spacing(egui::vec2(self.theme.spacing_16, self.theme.spacing_8))
                    .show(ui, |ui| {
                        for header in ["Timestamp", "Role", "Query", "Response"] {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for entry in &entries {
                            ui.label(
                                entry
                                    .timestamp
                                    .with_timezone(&chrono::Local)
                                    .format("%Y-%m-%d %H:%M:%S")
                                    .to_string(),
                            );
                            ui.label(
                                RichText::new(entry.role.as_str())
                                    .color(self.theme.role_color(entry.role)),
                            );
                            ui.label(&entry.query_text);
                            ui.label(RichText::new(&entry.response_summary).color(self.theme.text_muted));
                            ui.end_row();
                        }
                    });
            });

        if clear {
            if let Err(err) = self.audit.clear() {
                warn!("failed to clear audit log: {err}");
                self.log_diagnostic(format!("failed to clear audit log: {err}"));
            }
        }
    }

    fn render_analytics(&mut self, ui: &mut egui::Ui) {
        ui.heading("Analytics Dashboard");
        ui.label(
            RichText::new("Key metrics and trends across all background checks.")
                .color(self.theme.text_muted),
        );
        ui.separator();

        let metrics = &self.metrics;
        let completion = metrics
            .completion_rate
            .map_or_else(|| NO_DATA.to_string(), |rate| format!("{rate:.1}%"));
        let average_tat = metrics
            .average_turnaround
            .map_or_else(|| NO_DATA.to_string(), |days| format!("{days:.1} days"));
        let cards = [
            ("Total Orders", metrics.total_orders.to_string(), self.theme.accent_primary),
            ("Completed", metrics.completed_orders.to_string(), self.theme.success),
            ("Pending", metrics.pending_orders.to_string(), self.theme.warning),
            ("Open Disputes", metrics.open_disputes.to_string(), self.theme.danger),
            ("Completion Rate", completion, self.theme.success),
            ("Average TAT", average_tat, self.theme.accent_primary),
        ];

        ScrollArea::vertical()
            .id_salt("analytics")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for (title, value, color) in &cards {
                        self.theme.card_frame().show(ui, |ui| {
                            ui.set_min_width(140.0);
                            ui.label(RichText::new(*title).small().color(self.theme.text_muted));
                            ui.label(RichText::new(value).size(22.0).strong().color(*color));
                        });
                    }
                });
                ui.add_space(self.theme.spacing_16);

                ui.columns(2, |columns| {
                    self.theme.card_frame().show(&mut columns[0], |ui| {
                        chart::render_chart(ui, &self.theme, &metrics.search_type_chart);
                    });
                    let status_colors = OrderStatus::ALL
                        .iter()
                        .map(|status| self.theme.status_color(*status))
                        .collect::<Vec<_>>();
                    self.theme.card_frame().show(&mut columns[1], |ui| {
                        chart::render_chart_with_colors(
                            ui,
                            &self.theme,
                            &metrics.status_chart,
                            &status_colors,
                        );
                    });
                });
            });
    }

    fn render_comparison_window(&mut self, ctx: &egui::Context) {
        let Some(source) = self.orchestrator.workspace.comparison_source() else {
            return;
        };
        let source_title = source.title.clone();
        let busy = self.orchestrator.is_busy();
        let error = self.orchestrator.workspace.comparison.error.clone();

        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Create Comparison")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label("Enter a new query to compare with the selected record.");
                ui.label(RichText::new(source_title).small().color(self.theme.text_muted));
                let response = ui.add_enabled(
                    !busy,
                    egui::TextEdit::singleline(&mut self.comparison_input)
                        .hint_text(COMPARISON_HINT)
                        .desired_width(360.0),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                if let Some(error) = &error {
                    ui.label(RichText::new(error).color(self.theme.danger));
                }
                if busy {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Comparing...");
                    });
                }
                ui.horizontal(|ui| {
                    cancel = ui.button("Cancel").clicked();
                    submit |= ui
                        .add_enabled(
                            !busy && !self.comparison_input.trim().is_empty(),
                            egui::Button::new("Compare"),
                        )
                        .clicked();
                });
            });

        if cancel {
            self.orchestrator.close_comparison();
            self.comparison_input.clear();
        } else if submit && !busy {
            self.submit_comparison(ctx);
        }
    }
}

/// Inline text edit. Enter commits; Escape or clicking away cancels.
fn rename_field(ui: &mut egui::Ui, rename: &mut Rename) -> RenameEdit {
    let response = ui.add(egui::TextEdit::singleline(&mut rename.buffer).desired_width(180.0));
    if !rename.focused {
        response.request_focus();
        rename.focused = true;
    }
    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
    RenameEdit::from_focus(response.lost_focus(), enter, &rename.buffer)
}

impl eframe::App for AccuQueryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        self.render_top_bar(ctx);
        self.render_left_panel(ctx);
        self.render_right_panel(ctx);
        self.render_center_panel(ctx);
        self.render_comparison_window(ctx);

        // Replies and audit reloads arrive over the channel without waking egui.
        let poll = if self.orchestrator.is_busy() {
            Duration::from_millis(150)
        } else {
            Duration::from_secs(1)
        };
        ctx.request_repaint_after(poll);
    }
}
