//! Canned tabular fixtures for merge tests.

use granary_core::{FileFormat, Table, Value, codec};

/// Left-hand table: `id,x` with ids 1 and 2.
#[allow(dead_code)]
pub fn left_csv() -> &'static [u8] {
    b"id,x\n1,a\n2,b\n"
}

/// Right-hand table: `id,y` with ids 1 and 3.
#[allow(dead_code)]
pub fn right_csv() -> &'static [u8] {
    b"id,y\n1,p\n3,q\n"
}

/// Left-hand table with a duplicated join key: ids 1, 1.
#[allow(dead_code)]
pub fn dup_left_csv() -> &'static [u8] {
    b"id,x\n1,a1\n1,a2\n"
}

/// The `right_csv` table re-encoded as XLSX.
#[allow(dead_code)]
pub fn right_xlsx() -> Vec<u8> {
    let mut table = Table::new(vec!["id".into(), "y".into()]);
    table.push_row(vec![Value::Int(1), Value::Text("p".into())]);
    table.push_row(vec![Value::Int(3), Value::Text("q".into())]);
    codec::encode(&table, FileFormat::Xlsx)
        .expect("xlsx fixture encode")
        .to_vec()
}
