//! Typed in-memory tabular data.
//!
//! A `Table` is an ordered list of named columns plus row-oriented storage of
//! typed cell values. It replaces ad-hoc dynamic dataframes with an explicit
//! "has column" query and typed join-key comparison.

use crate::error::{Error, Result};
use serde_json::{Map, Number};

/// A single cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Display form used when writing CSV cells. Null renders as empty.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    fn from_json(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(Error::Serialization(format!(
                        "unrepresentable number: {n}"
                    )))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            other => Err(Error::Serialization(format!(
                "unexpected cell value: {other}"
            ))),
        }
    }
}

/// An in-memory table: ordered columns and rows of typed cells.
///
/// Every row holds exactly `columns.len()` values.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column layout.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether a column with this exact name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Convert to the record-oriented (sequence of row-objects) JSON form.
    ///
    /// Column order is preserved in each record's key order, so a table
    /// survives the staging cache round trip with its layout intact.
    pub fn to_records(&self) -> Vec<Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(col, cell)| (col.clone(), cell.to_json()))
                    .collect()
            })
            .collect()
    }

    /// Serialize to a record-oriented JSON string (the staging cache payload).
    pub fn to_records_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_records())?)
    }

    /// Rebuild a table from its record-oriented JSON string.
    ///
    /// The column layout is taken from the first record's key order; keys seen
    /// only in later records are appended. Records missing a column get Null.
    /// An empty record sequence yields an empty table with no columns.
    pub fn from_records_json(json: &str) -> Result<Self> {
        let records: Vec<Map<String, serde_json::Value>> = serde_json::from_str(json)?;

        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut table = Table::new(columns);
        for record in &records {
            let row = table
                .columns
                .iter()
                .map(|col| {
                    record
                        .get(col)
                        .map(Value::from_json)
                        .unwrap_or(Ok(Value::Null))
                })
                .collect::<Result<Vec<_>>>()?;
            table.rows.push(row);
        }
        Ok(table)
    }

    /// First `n` rows in record-oriented form, used for merge previews.
    pub fn head(&self, n: usize) -> Vec<Map<String, serde_json::Value>> {
        let mut records = self.to_records();
        records.truncate(n);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["id".into(), "name".into(), "score".into()]);
        t.push_row(vec![
            Value::Int(1),
            Value::Text("ada".into()),
            Value::Float(9.5),
        ]);
        t.push_row(vec![Value::Int(2), Value::Text("bob".into()), Value::Null]);
        t
    }

    #[test]
    fn has_column_is_exact() {
        let t = sample();
        assert!(t.has_column("name"));
        assert!(!t.has_column("Name"));
        assert!(!t.has_column("missing"));
    }

    #[test]
    fn records_round_trip_preserves_layout_and_types() {
        let t = sample();
        let json = t.to_records_json().unwrap();
        let back = Table::from_records_json(&json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.columns(), &["id", "name", "score"]);
    }

    #[test]
    fn empty_records_yield_empty_table() {
        let t = Table::from_records_json("[]").unwrap();
        assert_eq!(t.row_count(), 0);
        assert!(t.columns().is_empty());
    }

    #[test]
    fn head_truncates() {
        let t = sample();
        assert_eq!(t.head(1).len(), 1);
        assert_eq!(t.head(10).len(), 2);
        assert_eq!(t.head(1)[0]["name"], serde_json::json!("ada"));
    }
}
