use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::path::Path;

use crate::report::{DocumentRow, Report};

const COLUMNS: [&str; 15] = [
    "doc_kind",
    "type",
    "number",
    "contact",
    "date",
    "due_date",
    "payment_date",
    "status",
    "currency",
    "subtotal",
    "tax",
    "total",
    "amount_paid",
    "amount_due",
    "amount_credited",
];

/// Write the workbook to disk: every selected row on `<year>_ALL`, the
/// authorised-only day book on `<year>_SALES_DAY_BOOK`.
pub fn write_workbook(report: &Report, year: i32, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = build_workbook(report, year)?;
    workbook.save(path)?;
    Ok(())
}

/// Same workbook as in-memory bytes, for hosts where disk writes are blocked
pub fn workbook_bytes(report: &Report, year: i32) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = build_workbook(report, year)?;
    workbook.save_to_buffer()
}

fn build_workbook(report: &Report, year: i32) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();

    let sheet_all = workbook.add_worksheet();
    sheet_all.set_name(format!("{year}_ALL").as_str())?;
    write_rows(sheet_all, &report.all)?;

    let sheet_authorised = workbook.add_worksheet();
    sheet_authorised.set_name(format!("{year}_SALES_DAY_BOOK").as_str())?;
    write_rows(sheet_authorised, &report.authorised)?;

    Ok(workbook)
}

fn write_rows(sheet: &mut Worksheet, rows: &[DocumentRow]) -> Result<(), XlsxError> {
    for (col, header) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;

        sheet.write_string(r, 0, row.doc_kind.to_string().as_str())?;
        write_text(sheet, r, 1, row.doc_type.as_deref())?;
        write_text(sheet, r, 2, row.number.as_deref())?;
        write_text(sheet, r, 3, row.contact.as_deref())?;
        write_date(sheet, r, 4, row.date)?;
        write_date(sheet, r, 5, row.due_date)?;
        write_date(sheet, r, 6, row.payment_date)?;
        write_text(sheet, r, 7, row.status.map(|s| s.to_string()).as_deref())?;
        write_text(sheet, r, 8, row.currency.as_deref())?;
        write_amount(sheet, r, 9, row.subtotal)?;
        write_amount(sheet, r, 10, row.tax)?;
        write_amount(sheet, r, 11, row.total)?;
        write_amount(sheet, r, 12, row.amount_paid)?;
        write_amount(sheet, r, 13, row.amount_due)?;
        write_amount(sheet, r, 14, row.amount_credited)?;
    }

    Ok(())
}

// Absent values stay blank cells

fn write_text(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> Result<(), XlsxError> {
    if let Some(value) = value {
        sheet.write_string(row, col, value)?;
    }
    Ok(())
}

fn write_date(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<chrono::NaiveDate>,
) -> Result<(), XlsxError> {
    if let Some(value) = value {
        sheet.write_string(row, col, value.to_string().as_str())?;
    }
    Ok(())
}

fn write_amount(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
) -> Result<(), XlsxError> {
    if let Some(value) = value {
        sheet.write_number(row, col, value)?;
    }
    Ok(())
}
