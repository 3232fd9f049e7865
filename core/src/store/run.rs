use super::{SalesStore, StoreTx};
use crate::{error::SyncResult, report::SyncReport, types::RowId};
use rusqlite::{params, OptionalExtension};

/// A committed run as recorded in `sync_run`.
#[derive(Debug, Clone)]
pub struct SyncRunRow {
    pub id: RowId,
    pub started_at: String,
    pub source: String,
    pub worksheet: Option<String>,
    pub rows_read: i64,
    pub rows_skipped: i64,
    pub customers_inserted: i64,
    pub customers_updated: i64,
    pub sales_inserted: i64,
    pub sales_updated: i64,
    pub revenues_inserted: i64,
    pub revenues_updated: i64,
}

impl StoreTx<'_> {
    // ── Run audit ─────────────────────────────────────────────────

    pub fn record_run(&self, report: &SyncReport) -> SyncResult<RowId> {
        self.tx.execute(
            "INSERT INTO sync_run (
                started_at, source, worksheet, rows_read, rows_skipped,
                customers_inserted, customers_updated, sales_inserted, sales_updated,
                revenues_inserted, revenues_updated
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                &report.started_at,
                &report.source,
                &report.worksheet,
                report.rows_read as i64,
                report.rows_skipped as i64,
                report.customers.inserted as i64,
                report.customers.updated as i64,
                report.sales.inserted as i64,
                report.sales.updated as i64,
                report.revenues.inserted as i64,
                report.revenues.updated as i64,
            ],
        )?;
        Ok(self.tx.last_insert_rowid())
    }
}

impl SalesStore {
    pub fn last_run(&self) -> SyncResult<Option<SyncRunRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, started_at, source, worksheet, rows_read, rows_skipped,
                        customers_inserted, customers_updated, sales_inserted, sales_updated,
                        revenues_inserted, revenues_updated
                 FROM sync_run ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(SyncRunRow {
                        id: row.get(0)?,
                        started_at: row.get(1)?,
                        source: row.get(2)?,
                        worksheet: row.get(3)?,
                        rows_read: row.get(4)?,
                        rows_skipped: row.get(5)?,
                        customers_inserted: row.get(6)?,
                        customers_updated: row.get(7)?,
                        sales_inserted: row.get(8)?,
                        sales_updated: row.get(9)?,
                        revenues_inserted: row.get(10)?,
                        revenues_updated: row.get(11)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn run_count(&self) -> SyncResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM sync_run", [], |row| row.get(0))?;
        Ok(n)
    }
}
