use super::{SalesStore, StoreTx};
use crate::{
    error::SyncResult,
    types::{CustomerRecord, RowId},
};
use rusqlite::{params, OptionalExtension, Row};
use std::collections::HashMap;

const SELECT_CUSTOMER: &str = "SELECT id, c_name, c_country, c_segment FROM customer";

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<CustomerRecord> {
    Ok(CustomerRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        country: row.get(2)?,
        segment: row.get(3)?,
    })
}

impl StoreTx<'_> {
    // ── Customer ──────────────────────────────────────────────────

    /// All customers keyed by name.
    pub fn existing_customers(&self) -> SyncResult<HashMap<String, CustomerRecord>> {
        let mut stmt = self.tx.prepare(SELECT_CUSTOMER)?;
        let rows = stmt.query_map([], customer_from_row)?;
        let mut by_name = HashMap::new();
        for row in rows {
            let c = row?;
            by_name.insert(c.name.clone(), c);
        }
        Ok(by_name)
    }

    pub fn insert_customer(&self, name: &str, country: &str, segment: &str) -> SyncResult<RowId> {
        self.tx.execute(
            "INSERT INTO customer (c_name, c_country, c_segment) VALUES (?1, ?2, ?3)",
            params![name, country, segment],
        )?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn update_customer(&self, id: RowId, country: &str, segment: &str) -> SyncResult<()> {
        self.tx.execute(
            "UPDATE customer SET c_country = ?1, c_segment = ?2 WHERE id = ?3",
            params![country, segment, id],
        )?;
        Ok(())
    }
}

impl SalesStore {
    pub fn customer_count(&self) -> SyncResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))?;
        Ok(n)
    }

    pub fn customer_by_name(&self, name: &str) -> SyncResult<Option<CustomerRecord>> {
        let found = self
            .conn
            .query_row(
                &format!("{SELECT_CUSTOMER} WHERE c_name = ?1"),
                params![name],
                customer_from_row,
            )
            .optional()?;
        Ok(found)
    }
}
