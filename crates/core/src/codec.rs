//! Decode and encode between blob bytes and typed tables.
//!
//! CSV goes through the `csv` crate, XLSX through `calamine` (read) and
//! `rust_xlsxwriter` (write). Only the first worksheet of an XLSX workbook is
//! read, with its first row taken as the header.

use crate::error::{Error, Result};
use crate::format::FileFormat;
use crate::table::{Table, Value};
use bytes::Bytes;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// Decode a blob of the declared format into a table.
pub fn decode(bytes: &[u8], format: FileFormat) -> Result<Table> {
    match format {
        FileFormat::Csv => decode_csv(bytes),
        FileFormat::Xlsx => decode_xlsx(bytes),
    }
}

/// Encode a table into bytes of the chosen format.
pub fn encode(table: &Table, format: FileFormat) -> Result<Bytes> {
    match format {
        FileFormat::Csv => encode_csv(table),
        FileFormat::Xlsx => encode_xlsx(table),
    }
}

/// Infer a typed cell from a raw CSV field.
///
/// Empty becomes Null; integers before floats so `1` stays `Int(1)`; bare
/// `true`/`false` (any case) become Bool; everything else is Text.
fn infer_cell(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = field.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        return Value::Float(f);
    }
    match field.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Text(field.to_string()),
    }
}

fn decode_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let width = columns.len();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<Value> = record.iter().map(infer_cell).collect();
        row.resize(width, Value::Null);
        table.push_row(row);
    }
    Ok(table)
}

fn encode_csv(table: &Table) -> Result<Bytes> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.render()))?;
    }
    let buf = writer
        .into_inner()
        .map_err(|e| Error::Encode(format!("csv: {e}")))?;
    Ok(Bytes::from(buf))
}

/// Map a worksheet cell to a typed value.
///
/// Spreadsheet engines store every number as a float; integral floats are
/// narrowed back to Int so XLSX columns line up with CSV inference when the
/// two formats are joined against each other.
fn cell_from_xlsx(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Value::Int(*f as i64)
            } else {
                Value::Float(*f)
            }
        }
        Data::DateTime(dt) => Value::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

fn decode_xlsx(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Decode("xlsx: workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string()).collect(),
        None => return Ok(Table::default()),
    };
    let width = columns.len();

    let mut table = Table::new(columns);
    for row in rows {
        let mut cells: Vec<Value> = row.iter().map(cell_from_xlsx).collect();
        cells.resize(width, Value::Null);
        cells.truncate(width);
        table.push_row(cells);
    }
    Ok(table)
}

fn encode_xlsx(table: &Table) -> Result<Bytes> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }
    for (i, row) in table.rows().iter().enumerate() {
        let excel_row = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let excel_col = col as u16;
            match cell {
                Value::Null => {}
                Value::Bool(b) => {
                    worksheet.write_boolean(excel_row, excel_col, *b)?;
                }
                Value::Int(n) => {
                    worksheet.write_number(excel_row, excel_col, *n as f64)?;
                }
                Value::Float(f) => {
                    worksheet.write_number(excel_row, excel_col, *f)?;
                }
                Value::Text(s) => {
                    worksheet.write_string(excel_row, excel_col, s)?;
                }
            }
        }
    }

    let buf = workbook.save_to_buffer()?;
    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_decode_infers_types() {
        let data = b"id,name,score,active\n1,ada,9.5,true\n2,bob,,false\n";
        let table = decode(data, FileFormat::Csv).unwrap();

        assert_eq!(table.columns(), &["id", "name", "score", "active"]);
        assert_eq!(
            table.rows()[0],
            vec![
                Value::Int(1),
                Value::Text("ada".into()),
                Value::Float(9.5),
                Value::Bool(true)
            ]
        );
        assert_eq!(table.rows()[1][2], Value::Null);
    }

    #[test]
    fn csv_round_trip() {
        let data = b"id,name\n1,ada\n2,bob\n";
        let table = decode(data, FileFormat::Csv).unwrap();
        let encoded = encode(&table, FileFormat::Csv).unwrap();
        let again = decode(&encoded, FileFormat::Csv).unwrap();
        assert_eq!(again, table);
    }

    #[test]
    fn xlsx_round_trip() {
        let mut table = Table::new(vec!["id".into(), "name".into(), "score".into()]);
        table.push_row(vec![
            Value::Int(1),
            Value::Text("ada".into()),
            Value::Float(9.5),
        ]);
        table.push_row(vec![Value::Int(2), Value::Text("bob".into()), Value::Null]);

        let encoded = encode(&table, FileFormat::Xlsx).unwrap();
        let again = decode(&encoded, FileFormat::Xlsx).unwrap();
        assert_eq!(again, table);
    }

    #[test]
    fn csv_garbage_is_a_decode_error() {
        // A record wider than the header fails with flexible(false).
        let data = b"a,b\n1,2,3\n";
        assert!(decode(data, FileFormat::Csv).is_err());
    }

    #[test]
    fn xlsx_garbage_is_a_decode_error() {
        assert!(decode(b"not a zip archive", FileFormat::Xlsx).is_err());
    }
}
