use super::{SalesStore, StoreTx};
use crate::{
    error::SyncResult,
    types::{RowId, SaleRecord},
};
use rusqlite::{params, OptionalExtension, Row};
use std::collections::HashMap;

const SELECT_SALE: &str = "SELECT id, customer_id, s_type, s_consultant FROM sale";

fn sale_from_row(row: &Row<'_>) -> rusqlite::Result<SaleRecord> {
    Ok(SaleRecord {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        sale_type: row.get(2)?,
        consultant: row.get(3)?,
    })
}

impl StoreTx<'_> {
    // ── Sale ──────────────────────────────────────────────────────

    /// All sales keyed by sale type.
    pub fn existing_sales(&self) -> SyncResult<HashMap<String, SaleRecord>> {
        let mut stmt = self.tx.prepare(SELECT_SALE)?;
        let sales = stmt
            .query_map([], sale_from_row)?
            .map(|r| r.map(|s| (s.sale_type.clone(), s)))
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(sales)
    }

    pub fn insert_sale(
        &self,
        customer_id: RowId,
        sale_type: &str,
        consultant: &str,
    ) -> SyncResult<RowId> {
        self.tx.execute(
            "INSERT INTO sale (customer_id, s_type, s_consultant) VALUES (?1, ?2, ?3)",
            params![customer_id, sale_type, consultant],
        )?;
        Ok(self.tx.last_insert_rowid())
    }

    /// Only the consultant changes; a sale keeps the customer it was created under.
    pub fn update_sale(&self, id: RowId, consultant: &str) -> SyncResult<()> {
        self.tx.execute(
            "UPDATE sale SET s_consultant = ?1 WHERE id = ?2",
            params![consultant, id],
        )?;
        Ok(())
    }
}

impl SalesStore {
    pub fn sale_count(&self) -> SyncResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM sale", [], |row| row.get(0))?;
        Ok(n)
    }

    pub fn sale_by_type(&self, sale_type: &str) -> SyncResult<Option<SaleRecord>> {
        let found = self
            .conn
            .query_row(
                &format!("{SELECT_SALE} WHERE s_type = ?1"),
                params![sale_type],
                sale_from_row,
            )
            .optional()?;
        Ok(found)
    }
}
