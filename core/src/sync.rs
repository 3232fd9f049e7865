//! Reconciliation loop: worksheet rows → customer, sale and revenue upserts.
//!
//! Order of work:
//!   1. Resolve revenue column labels against the header row
//!   2. Load existing customers, sales and revenues into maps keyed by natural key
//!   3. Per data row: upsert customer by name, sale by type, one revenue per column
//!   4. Record the run and commit once (or roll back for a dry run)
//!
//! Any row-level error returns before commit, so a failed run writes nothing.

use crate::{
    error::{SyncError, SyncResult},
    layout::SheetLayout,
    report::SyncReport,
    sheet::{is_blank_row, Sheet},
    store::SalesStore,
    types::{CustomerRecord, RevenueRecord, SaleRecord},
};

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Recorded in the run report and audit row.
    pub source: String,
    pub worksheet: Option<String>,
    /// Reconcile everything, then discard the transaction.
    pub dry_run: bool,
}

pub fn sync_sheet(
    store: &mut SalesStore,
    sheet: &Sheet,
    layout: &SheetLayout,
    options: &SyncOptions,
) -> SyncResult<SyncReport> {
    let mut report = SyncReport::new(
        &options.source,
        options.worksheet.as_deref(),
        options.dry_run,
    );
    let resolved = layout.resolve(sheet)?;
    let width = resolved.required_width();

    let tx = store.transaction()?;
    let mut customers = tx.existing_customers()?;
    let mut sales = tx.existing_sales()?;
    let mut revenues = tx.existing_revenues()?;
    log::debug!(
        "loaded {} customers, {} sales, {} revenue lines",
        customers.len(),
        sales.len(),
        revenues.len()
    );

    for (row_no, row) in sheet.data_rows() {
        report.rows_read += 1;
        if is_blank_row(row) {
            log::warn!("row {row_no}: blank, skipped");
            report.rows_skipped += 1;
            continue;
        }
        if row.len() < width {
            return Err(SyncError::ShortRow {
                row: row_no,
                needed: width,
                found: row.len(),
            });
        }

        let name = row[resolved.customer_name].trim();
        let country = row[resolved.country].trim();
        let segment = row[resolved.segment].trim();
        let sale_type = row[resolved.sale_type].trim();
        let consultant = row[resolved.consultant].trim();
        for (field, key) in [("customer name", name), ("sale type", sale_type)] {
            if key.is_empty() {
                log::warn!("row {row_no}: {field} is blank");
                return Err(SyncError::BlankKey { row: row_no, field });
            }
        }

        // Customer
        let customer_id = match customers.get_mut(name) {
            Some(existing) => {
                tx.update_customer(existing.id, country, segment)?;
                existing.country = country.to_string();
                existing.segment = segment.to_string();
                report.customers.updated += 1;
                existing.id
            }
            None => {
                let id = tx.insert_customer(name, country, segment)?;
                log::debug!("row {row_no}: new customer '{name}' (id {id})");
                customers.insert(
                    name.to_string(),
                    CustomerRecord {
                        id,
                        name: name.to_string(),
                        country: country.to_string(),
                        segment: segment.to_string(),
                    },
                );
                report.customers.inserted += 1;
                id
            }
        };

        // Sale
        let sale_id = match sales.get_mut(sale_type) {
            Some(existing) => {
                tx.update_sale(existing.id, consultant)?;
                existing.consultant = consultant.to_string();
                report.sales.updated += 1;
                existing.id
            }
            None => {
                let id = tx.insert_sale(customer_id, sale_type, consultant)?;
                log::debug!("row {row_no}: new sale '{sale_type}' (id {id})");
                sales.insert(
                    sale_type.to_string(),
                    SaleRecord {
                        id,
                        customer_id,
                        sale_type: sale_type.to_string(),
                        consultant: consultant.to_string(),
                    },
                );
                report.sales.inserted += 1;
                id
            }
        };

        // Revenue
        for column in &resolved.revenue {
            let value = revenue_value(&row[column.position]);
            let slot = &column.slot;
            let key = (
                sale_id,
                slot.year.clone(),
                slot.month.clone(),
                slot.currency.clone(),
            );
            match revenues.get_mut(&key) {
                Some(existing) => {
                    tx.update_revenue(
                        sale_id,
                        &slot.year,
                        &slot.month,
                        &slot.currency,
                        value.as_deref(),
                    )?;
                    existing.value = value;
                    report.revenues.updated += 1;
                }
                None => {
                    let id = tx.insert_revenue(
                        sale_id,
                        &slot.year,
                        &slot.month,
                        &slot.currency,
                        value.as_deref(),
                    )?;
                    revenues.insert(
                        key,
                        RevenueRecord {
                            id,
                            sale_id,
                            year: slot.year.clone(),
                            month: slot.month.clone(),
                            currency: slot.currency.clone(),
                            value,
                        },
                    );
                    report.revenues.inserted += 1;
                }
            }
        }
    }

    if options.dry_run {
        tx.rollback()?;
        log::info!(
            "dry run: {} rows, {} inserts and {} updates discarded",
            report.rows_read,
            report.total_inserts(),
            report.total_updates()
        );
    } else {
        tx.record_run(&report)?;
        tx.commit()?;
        log::info!(
            "synced {} rows: customers +{}/~{}, sales +{}/~{}, revenues +{}/~{}",
            report.rows_read,
            report.customers.inserted,
            report.customers.updated,
            report.sales.inserted,
            report.sales.updated,
            report.revenues.inserted,
            report.revenues.updated
        );
    }
    Ok(report)
}

/// Revenue cells are stored as written, trimmed; a blank cell is `None`.
pub fn revenue_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
