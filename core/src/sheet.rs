//! Worksheet snapshot: every row of one tab as ordered string cells.
//!
//! Sources:
//!   - CSV export of the worksheet (`csv`)
//!   - XLSX / XLS / ODS workbook, one named worksheet (`calamine`)
//!
//! The first non-blank row is the header row. Cells keep their sheet positions,
//! so a workbook whose used range starts at C3 still reports column C as index 2
//! and its rows by their zero-based sheet row index.

use crate::error::{SyncError, SyncResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    rows: Vec<Vec<String>>,
    /// Sheet row index of `rows[0]`.
    first_row: usize,
}

impl Sheet {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows, first_row: 0 }
    }

    /// Read a CSV export. Rows may differ in length; no header handling is applied.
    pub fn from_csv_reader<R: Read>(reader: R) -> SyncResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self::from_rows(rows))
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> SyncResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Read one worksheet of a workbook.
    pub fn from_workbook<P: AsRef<Path>>(path: P, worksheet: &str) -> SyncResult<Self> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        let range = workbook.worksheet_range(worksheet)?;
        Ok(Self::from_range(&range))
    }

    fn from_range(range: &Range<Data>) -> Self {
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let pad = start_col as usize;

        let mut rows: Vec<Vec<String>> = range
            .rows()
            .map(|cells| {
                let mut row = vec![String::new(); pad];
                row.extend(cells.iter().map(cell_to_string));
                row
            })
            .collect();
        let leading_blank = rows.iter().take_while(|r| is_blank_row(r)).count();
        rows.drain(..leading_blank);
        Self {
            rows,
            first_row: start_row as usize + leading_blank,
        }
    }

    /// Pick the reader from the file extension.
    pub fn open<P: AsRef<Path>>(path: P, worksheet: Option<&str>) -> SyncResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Self::from_csv_path(path),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
                let worksheet = worksheet.ok_or_else(|| {
                    anyhow::anyhow!("{} is a workbook; a worksheet name is required", path.display())
                })?;
                Self::from_workbook(path, worksheet)
            }
            other => Err(anyhow::anyhow!(
                "Unsupported sheet format '{other}' for {}",
                path.display()
            )
            .into()),
        }
    }

    pub fn header(&self) -> SyncResult<&[String]> {
        self.rows
            .first()
            .map(Vec::as_slice)
            .ok_or(SyncError::EmptySheet)
    }

    /// Rows after the header, with their zero-based sheet row index.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        let first = self.first_row;
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(move |(i, r)| (first + i, r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header cell matching `label` (trimmed, ASCII case-insensitive).
    pub fn column_of(&self, label: &str) -> SyncResult<usize> {
        let wanted = label.trim();
        self.header()?
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SyncError::MissingColumn {
                label: label.to_string(),
            })
    }
}

pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (*f as i64).to_string()
        }
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_keep_ragged_lengths() {
        let sheet = Sheet::from_csv_reader("name,country\nAcme,CH,extra\nSolo\n".as_bytes()).unwrap();
        assert_eq!(sheet.len(), 3);
        let rows: Vec<_> = sheet.data_rows().collect();
        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[0].1.len(), 3);
        assert_eq!(rows[1].1, ["Solo".to_string()]);
    }

    #[test]
    fn column_lookup_ignores_case_and_padding() {
        let sheet = Sheet::from_rows(vec![vec!["Name".into(), " AF ".into(), "af".into()]]);
        assert_eq!(sheet.column_of("af").unwrap(), 1);
        assert!(matches!(
            sheet.column_of("zz"),
            Err(SyncError::MissingColumn { .. })
        ));
    }

    #[test]
    fn empty_sheet_has_no_header() {
        let sheet = Sheet::default();
        assert!(matches!(sheet.header(), Err(SyncError::EmptySheet)));
    }

    #[test]
    fn workbook_rows_keep_sheet_positions() {
        // Used range starts at B3 and its first row is blank; header sits on sheet row 3.
        let mut range: Range<Data> = Range::new((2, 1), (5, 2));
        range.set_value((3, 1), Data::String("Customer".into()));
        range.set_value((3, 2), Data::String("p".into()));
        range.set_value((4, 1), Data::String("Acme AG".into()));
        range.set_value((4, 2), Data::Float(1200.0));
        range.set_value((5, 1), Data::String("Borealis".into()));

        let sheet = Sheet::from_range(&range);

        assert_eq!(sheet.column_of("Customer").unwrap(), 1);
        assert_eq!(sheet.column_of("p").unwrap(), 2);
        let rows: Vec<_> = sheet.data_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 4);
        assert_eq!(rows[0].1, ["", "Acme AG", "1200"]);
        assert_eq!(rows[1].0, 5);
    }

    #[test]
    fn whole_floats_render_without_fraction() {
        assert_eq!(cell_to_string(&Data::Float(1500.0)), "1500");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
