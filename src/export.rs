//! Export Formatter: flattens a session form into a single-sheet .xlsx.
//!
//! The table has one header row, one row for the farmer+nursery singleton
//! fields, then one row per spraying, harvesting, and receiving entry. Each
//! row populates only its own columns; the rest stay blank. Dates go through
//! the same coercion as the save path so the file never diverges from what
//! gets persisted.

use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use crate::models::fmt_date;
use crate::session::SessionForm;

pub const SHEET_NAME: &str = "All Data";
pub const EXPORT_FILENAME: &str = "farmer_records.xlsx";
pub const EXPORT_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Column order follows the data-model field order: farmer, nursery, then
/// the three activity record types.
pub const HEADERS: [&str; 20] = [
    "Farmer Code",
    "Farmer Name",
    "Area",
    "Soil Type",
    "Field",
    "Contract Date",
    "Contracted Area",
    "Seedling Supplier",
    "Seeding Receive Date",
    "Seeding Receive Qty",
    "Transplanting Date",
    "Transplanting Qty Seedling",
    "Spraying Chemical",
    "Spraying Date",
    "Spraying Qty",
    "Harvest Date",
    "Harvest Qty",
    "Receiving Date",
    "Receiving Qty",
    "Accepted Qty",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build workbook: {0}")]
    Workbook(#[from] XlsxError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Blank,
    Text(String),
    Int(i64),
}

fn date_cell(date: Option<chrono::NaiveDate>) -> Cell {
    Cell::Text(fmt_date(date))
}

fn blank_row() -> Vec<Cell> {
    vec![Cell::Blank; HEADERS.len()]
}

/// Assemble the data rows (headers excluded). Kept separate from the
/// workbook writer so the table shape is testable without parsing xlsx.
pub fn build_rows(form: &SessionForm) -> Vec<Vec<Cell>> {
    let mut rows = Vec::with_capacity(
        1 + form.spraying.len() + form.harvesting.len() + form.receiving.len(),
    );

    let farmer = &form.farmer;
    let nursery = &form.nursery;
    let mut row = blank_row();
    row[0] = Cell::Text(farmer.farmer_code.clone());
    row[1] = Cell::Text(farmer.farmer_name.clone());
    row[2] = Cell::Text(farmer.area.clone());
    row[3] = Cell::Text(farmer.soil_type.clone());
    row[4] = Cell::Text(farmer.field.clone());
    row[5] = date_cell(farmer.contract_date);
    row[6] = Cell::Text(farmer.contracted_area.clone());
    row[7] = Cell::Text(nursery.seedling_supplier.clone());
    row[8] = date_cell(nursery.seeding_receive_date);
    row[9] = Cell::Int(nursery.seeding_receive_qty);
    row[10] = date_cell(nursery.transplanting_date);
    row[11] = Cell::Int(nursery.transplanting_qty_seedling);
    rows.push(row);

    for spray in &form.spraying {
        let mut row = blank_row();
        row[12] = Cell::Text(spray.chemical_name.clone());
        row[13] = date_cell(spray.spraying_date);
        row[14] = Cell::Int(spray.spraying_qty);
        rows.push(row);
    }

    for harvest in &form.harvesting {
        let mut row = blank_row();
        row[15] = date_cell(harvest.harvest_date);
        row[16] = Cell::Int(harvest.harvest_qty);
        rows.push(row);
    }

    for recv in &form.receiving {
        let mut row = blank_row();
        row[17] = date_cell(recv.receiving_date);
        row[18] = Cell::Int(recv.receiving_qty);
        row[19] = Cell::Int(recv.accepted_qty);
        rows.push(row);
    }

    rows
}

/// Render the session form to an in-memory .xlsx byte stream.
pub fn export_workbook(form: &SessionForm) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (r, row) in build_rows(form).iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::Blank => {}
                Cell::Text(s) => {
                    sheet.write_string(r as u32 + 1, c as u16, s)?;
                }
                Cell::Int(n) => {
                    sheet.write_number(r as u32 + 1, c as u16, *n as f64)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
