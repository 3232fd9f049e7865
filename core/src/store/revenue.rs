use super::{SalesStore, StoreTx};
use crate::{
    error::SyncResult,
    types::{RevenueKey, RevenueRecord, RowId},
};
use rusqlite::{params, Row};
use std::collections::HashMap;

fn revenue_from_row(row: &Row<'_>) -> rusqlite::Result<RevenueRecord> {
    Ok(RevenueRecord {
        id: row.get(0)?,
        sale_id: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        currency: row.get(4)?,
        value: row.get(5)?,
    })
}

impl StoreTx<'_> {
    // ── Revenue ───────────────────────────────────────────────────

    /// All revenue lines keyed by (sale id, year, month, currency).
    pub fn existing_revenues(&self) -> SyncResult<HashMap<RevenueKey, RevenueRecord>> {
        let mut stmt = self.tx.prepare(
            "SELECT id, sale_id, r_year, r_month, r_currency, r_value FROM revenue",
        )?;
        let revenues = stmt
            .query_map([], revenue_from_row)?
            .map(|r| r.map(|rev| (rev.key(), rev)))
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(revenues)
    }

    pub fn insert_revenue(
        &self,
        sale_id: RowId,
        year: &str,
        month: &str,
        currency: &str,
        value: Option<&str>,
    ) -> SyncResult<RowId> {
        self.tx.execute(
            "INSERT INTO revenue (sale_id, r_year, r_month, r_value, r_currency)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![sale_id, year, month, value, currency],
        )?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn update_revenue(
        &self,
        sale_id: RowId,
        year: &str,
        month: &str,
        currency: &str,
        value: Option<&str>,
    ) -> SyncResult<()> {
        self.tx.execute(
            "UPDATE revenue SET r_value = ?1
             WHERE sale_id = ?2 AND r_year = ?3 AND r_month = ?4 AND r_currency = ?5",
            params![value, sale_id, year, month, currency],
        )?;
        Ok(())
    }
}

impl SalesStore {
    pub fn revenue_count(&self) -> SyncResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM revenue", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Revenue lines of one sale, ordered by year, month, then currency.
    pub fn revenues_for_sale(&self, sale_id: RowId) -> SyncResult<Vec<RevenueRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sale_id, r_year, r_month, r_currency, r_value
             FROM revenue WHERE sale_id = ?1
             ORDER BY r_year ASC, r_month ASC, r_currency ASC",
        )?;
        let rows = stmt.query_map(params![sale_id], revenue_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
