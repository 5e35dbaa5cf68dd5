use crate::audit::AuditSnapshot;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum AppEvent {
    ReplyReceived {
        request_id: u64,
        reply: Result<Value, String>,
    },
    AuditLogsReloaded(AuditSnapshot),
}
