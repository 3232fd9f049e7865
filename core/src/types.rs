//! Shared primitive types used across the sync.

/// Primary key of a persisted row (SQLite rowid).
pub type RowId = i64;

/// Natural key of a revenue line: (sale id, year, month, currency).
pub type RevenueKey = (RowId, String, String, String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    pub id: RowId,
    pub name: String,
    pub country: String,
    pub segment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    pub id: RowId,
    pub customer_id: RowId,
    pub sale_type: String,
    pub consultant: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueRecord {
    pub id: RowId,
    pub sale_id: RowId,
    pub year: String,
    pub month: String,
    pub currency: String,
    pub value: Option<String>,
}

impl RevenueRecord {
    pub fn key(&self) -> RevenueKey {
        (
            self.sale_id,
            self.year.clone(),
            self.month.clone(),
            self.currency.clone(),
        )
    }
}
