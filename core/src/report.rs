//! Per-run counters, persisted to `sync_run` and printed by the runner.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub inserted: u64,
    pub updated: u64,
}

impl EntityCounts {
    pub fn total(&self) -> u64 {
        self.inserted + self.updated
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// RFC 3339 UTC timestamp taken when the run began.
    pub started_at: String,
    pub source: String,
    pub worksheet: Option<String>,
    pub dry_run: bool,
    /// Data rows seen, header excluded.
    pub rows_read: u64,
    pub rows_skipped: u64,
    pub customers: EntityCounts,
    pub sales: EntityCounts,
    pub revenues: EntityCounts,
}

impl SyncReport {
    pub fn new(source: &str, worksheet: Option<&str>, dry_run: bool) -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            source: source.to_string(),
            worksheet: worksheet.map(str::to_string),
            dry_run,
            ..Self::default()
        }
    }

    pub fn total_inserts(&self) -> u64 {
        self.customers.inserted + self.sales.inserted + self.revenues.inserted
    }

    pub fn total_updates(&self) -> u64 {
        self.customers.updated + self.sales.updated + self.revenues.updated
    }
}
