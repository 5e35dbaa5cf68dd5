use crate::data::UserRole;
use crate::error::Result;
use crate::event::AppEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

pub mod seed;
pub mod store;

use store::KeyValueStore;

pub const AUDIT_LOG_KEY: &str = "accuquery_audit_logs";
pub const DEFAULT_VIEW_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub query_text: String,
    pub role: UserRole,
    pub timestamp: DateTime<Utc>,
    pub response_summary: String,
}

/// Entries read from the store by the background poller.
///
/// `generation` is the logger's write count observed before the read; a
/// snapshot taken before a later local write is stale.
#[derive(Debug, Clone)]
pub struct AuditSnapshot {
    pub generation: u64,
    pub entries: Vec<AuditLogEntry>,
}

/// Records every answered query and serves the audit view.
///
/// Entries are kept newest first and written through to the store on every
/// change. Persisted state that is missing or unreadable is replaced by the
/// bundled seed entries.
pub struct AuditLogger {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<AuditLogEntry>,
    generation: Arc<AtomicU64>,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = load_entries(store.as_ref());
        info!(count = entries.len(), "audit log loaded");
        Self {
            store,
            entries,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared write counter handed to the poller.
    pub fn generation(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.generation)
    }

    pub fn log(
        &mut self,
        query_text: &str,
        role: UserRole,
        response_summary: &str,
    ) -> Result<AuditLogEntry> {
        let timestamp = Utc::now();
        let entry = AuditLogEntry {
            id: format!(
                "LOG_{}_{}",
                timestamp.timestamp_millis(),
                uuid::Uuid::new_v4().simple()
            ),
            query_text: query_text.to_string(),
            role,
            timestamp,
            response_summary: response_summary.to_string(),
        };

        self.entries.insert(0, entry.clone());
        self.save()?;
        debug!(id = %entry.id, role = %role, "audit entry recorded");
        Ok(entry)
    }

    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn recent(&self, count: usize) -> &[AuditLogEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    /// Most recent `limit` entries, optionally narrowed to one role.
    pub fn filtered(&self, role: Option<UserRole>, limit: usize) -> Vec<&AuditLogEntry> {
        self.recent(limit)
            .iter()
            .filter(|entry| role.map_or(true, |role| entry.role == role))
            .collect()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    pub fn reload(&mut self) {
        self.entries = load_entries(self.store.as_ref());
    }

    /// Applies a poller snapshot unless a local write happened after it was
    /// taken. Returns whether the snapshot was applied.
    pub fn apply_snapshot(&mut self, snapshot: AuditSnapshot) -> bool {
        let current = self.generation.load(Ordering::SeqCst);
        if snapshot.generation < current {
            debug!(
                snapshot = snapshot.generation,
                current, "discarding stale audit snapshot"
            );
            return false;
        }
        self.entries = snapshot.entries;
        true
    }

    fn save(&self) -> Result<()> {
        let encoded = serde_json::to_string(&self.entries)?;
        let result = self.store.set(AUDIT_LOG_KEY, &encoded);
        self.generation.fetch_add(1, Ordering::SeqCst);
        result
    }
}

pub fn load_entries(store: &dyn KeyValueStore) -> Vec<AuditLogEntry> {
    let raw = match store.get(AUDIT_LOG_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return seed::seed_entries(Utc::now()),
        Err(err) => {
            warn!("failed to read audit log: {err}");
            return seed::seed_entries(Utc::now());
        }
    };

    match serde_json::from_str::<Vec<AuditLogEntry>>(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("failed to parse audit log, using seed entries: {err}");
            seed::seed_entries(Utc::now())
        }
    }
}

/// Re-reads the store on a fixed interval and forwards the result to the UI.
/// The task ends once the receiving side has been dropped.
pub fn spawn_poller(
    runtime_handle: &Handle,
    store: Arc<dyn KeyValueStore>,
    generation: Arc<AtomicU64>,
    interval: Duration,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    runtime_handle.spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            // Read the counter before the store so a concurrent write marks this snapshot stale.
            let snapshot = AuditSnapshot {
                generation: generation.load(Ordering::SeqCst),
                entries: load_entries(store.as_ref()),
            };
            if tx.send(AppEvent::AuditLogsReloaded(snapshot)).is_err() {
                debug!("audit poller stopping: receiver dropped");
                break;
            }
        }
    })
}
