// FILENAME: core/persistence/src/xlsx_reader.rs

use crate::{PersistenceError, RecordMap, Sheet, Workbook};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use engine::{Cell, CellValue};
use serde_json::{Number, Value};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Loads every sheet's values. Styles are not read back.
pub fn load_xlsx(path: &Path) -> Result<Workbook, PersistenceError> {
    let workbook: Xlsx<_> = open_workbook(path)?;
    read_workbook(workbook)
}

pub fn load_xlsx_from_bytes(bytes: &[u8]) -> Result<Workbook, PersistenceError> {
    let workbook = Xlsx::new(Cursor::new(bytes))?;
    read_workbook(workbook)
}

/// Loads records from a sheet whose first row holds the field names.
/// `sheet` defaults to the first sheet of the workbook.
pub fn load_records_xlsx(path: &Path, sheet: Option<&str>) -> Result<Vec<RecordMap>, PersistenceError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = sheet_range(&mut workbook, sheet)?;
    Ok(range_to_records(&range))
}

pub fn load_records_xlsx_from_bytes(
    bytes: &[u8],
    sheet: Option<&str>,
) -> Result<Vec<RecordMap>, PersistenceError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let range = sheet_range(&mut workbook, sheet)?;
    Ok(range_to_records(&range))
}

fn read_workbook<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Result<Workbook, PersistenceError> {
    let sheet_names = workbook.sheet_names().to_vec();

    if sheet_names.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Workbook contains no sheets".to_string(),
        ));
    }

    let mut sheets = Vec::new();

    for sheet_name in &sheet_names {
        let range = workbook.worksheet_range(sheet_name)?;
        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));

        let mut sheet = Sheet::new(sheet_name.clone());
        for (row_idx, row) in range.rows().enumerate() {
            for (col_idx, data) in row.iter().enumerate() {
                let value = match data {
                    Data::Empty => continue,
                    Data::String(s) => CellValue::Text(s.clone()),
                    Data::Float(f) => CellValue::Number(*f),
                    Data::Int(i) => CellValue::Number(*i as f64),
                    Data::Bool(b) => CellValue::Boolean(*b),
                    Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
                    Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
                    Data::DateTimeIso(s) => CellValue::Text(s.clone()),
                    Data::DurationIso(s) => CellValue::Text(s.clone()),
                };
                sheet.grid.set_cell(
                    row_offset + row_idx as u32,
                    col_offset + col_idx as u32,
                    Cell { value, style_index: 0 },
                );
            }
        }
        sheets.push(sheet);
    }

    Ok(Workbook {
        sheets,
        active_sheet: 0,
    })
}

fn sheet_range<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
    sheet: Option<&str>,
) -> Result<Range<Data>, PersistenceError> {
    let names = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| PersistenceError::SheetNotFound(wanted.to_string()))?,
        None => names.first().cloned().ok_or_else(|| {
            PersistenceError::InvalidFormat("Workbook contains no sheets".to_string())
        })?,
    };
    Ok(workbook.worksheet_range(&name)?)
}

/// First row = field names. Blank headers drop their column; a repeated
/// header keeps its first column. Rows with no values are skipped.
fn range_to_records(range: &Range<Data>) -> Vec<RecordMap> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };

    let mut headers: Vec<Option<String>> = Vec::with_capacity(header_row.len());
    for data in header_row {
        let name = data_to_header(data);
        let duplicate = name
            .as_ref()
            .map(|n| headers.iter().flatten().any(|h| h == n))
            .unwrap_or(false);
        headers.push(if duplicate { None } else { name });
    }

    rows.filter_map(|row| {
        let mut record = RecordMap::new();
        for (header, data) in headers.iter().zip(row) {
            let Some(field) = header else { continue };
            if let Some(value) = data_to_json(data) {
                record.insert(field.clone(), value);
            }
        }
        if record.is_empty() { None } else { Some(record) }
    })
    .collect()
}

fn data_to_header(data: &Data) -> Option<String> {
    let text = match data {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => engine::format_general_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Empty and error cells produce no value so the field counts as missing.
fn data_to_json(data: &Data) -> Option<Value> {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number),
        Data::Int(i) => Some(Value::Number((*i).into())),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => Number::from_f64(dt.as_f64()).map(Value::Number),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
    }
}
