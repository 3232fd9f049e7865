//! Column layout of the sales worksheet.
//!
//! Customer and sale fields sit at fixed positions. Revenue cells are found by
//! header label; the n-th revenue column maps to a (month, currency) slot:
//! month = n / currencies + 1, currency = currencies[n % currencies].

use crate::{
    error::{SyncError, SyncResult},
    sheet::Sheet,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REVENUE_COLUMNS: [&str; 36] = [
    "p", "q", "r", "x", "y", "z", "af", "ag", "ah", "an", "ao", "ap", "av", "aw", "ax", "bd",
    "be", "bf", "bl", "bm", "bn", "bt", "bu", "bv", "cb", "cc", "cd", "cj", "ck", "cl", "cr",
    "cs", "ct", "cz", "da", "db",
];

pub const DEFAULT_CURRENCIES: [&str; 3] = ["CHF", "EUR", "GBP"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub customer_name: usize,
    pub country: usize,
    pub segment: usize,
    pub sale_type: usize,
    pub consultant: usize,
    pub revenue_columns: Vec<String>,
    pub year: String,
    pub currencies: Vec<String>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            customer_name: 0,
            country: 1,
            segment: 2,
            sale_type: 8,
            consultant: 11,
            revenue_columns: DEFAULT_REVENUE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            year: "2024".into(),
            currencies: DEFAULT_CURRENCIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Where one revenue cell lands: month is zero-padded ("01".."12").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueSlot {
    pub year: String,
    pub month: String,
    pub currency: String,
}

/// Slot for the `index`-th revenue column.
pub fn revenue_slot(index: usize, year: &str, currencies: &[String]) -> RevenueSlot {
    let n = currencies.len().max(1);
    RevenueSlot {
        year: year.to_string(),
        month: format!("{:02}", index / n + 1),
        currency: currencies.get(index % n).cloned().unwrap_or_default(),
    }
}

#[derive(Debug, Clone)]
pub struct RevenueColumn {
    pub label: String,
    pub position: usize,
    pub slot: RevenueSlot,
}

/// Layout with every revenue label resolved to a sheet position.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    pub customer_name: usize,
    pub country: usize,
    pub segment: usize,
    pub sale_type: usize,
    pub consultant: usize,
    pub revenue: Vec<RevenueColumn>,
}

impl ResolvedLayout {
    /// Minimum cell count a data row needs.
    pub fn required_width(&self) -> usize {
        let fixed = [
            self.customer_name,
            self.country,
            self.segment,
            self.sale_type,
            self.consultant,
        ];
        fixed
            .into_iter()
            .chain(self.revenue.iter().map(|c| c.position))
            .max()
            .map_or(0, |max| max + 1)
    }
}

impl SheetLayout {
    pub fn validate(&self) -> SyncResult<()> {
        let per_month = self.currencies.len();
        if per_month == 0 {
            return Err(SyncError::InvalidLayout(
                "currency rotation is empty".into(),
            ));
        }
        if self.revenue_columns.len() % per_month != 0 {
            return Err(SyncError::InvalidLayout(format!(
                "{} revenue columns do not divide into {per_month} currencies",
                self.revenue_columns.len()
            )));
        }
        if self.revenue_columns.len() / per_month > 12 {
            return Err(SyncError::InvalidLayout(format!(
                "{} revenue columns span more than 12 months",
                self.revenue_columns.len()
            )));
        }
        if self.year.trim().is_empty() {
            return Err(SyncError::InvalidLayout("year is empty".into()));
        }
        Ok(())
    }

    /// Look up every revenue label in the header row once.
    pub fn resolve(&self, sheet: &Sheet) -> SyncResult<ResolvedLayout> {
        self.validate()?;
        let revenue = self
            .revenue_columns
            .iter()
            .enumerate()
            .map(|(i, label)| {
                Ok(RevenueColumn {
                    label: label.clone(),
                    position: sheet.column_of(label)?,
                    slot: revenue_slot(i, &self.year, &self.currencies),
                })
            })
            .collect::<SyncResult<Vec<_>>>()?;
        Ok(ResolvedLayout {
            customer_name: self.customer_name,
            country: self.country,
            segment: self.segment,
            sale_type: self.sale_type,
            consultant: self.consultant,
            revenue,
        })
    }
}
