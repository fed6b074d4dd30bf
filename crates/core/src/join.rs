//! Inner join over typed tables.

use crate::error::{Error, Result};
use crate::table::{Table, Value};
use std::collections::HashMap;

/// Hashable key form used to pair rows during the join.
///
/// Numeric coercion: an integral `Float` maps to the same key as the equal
/// `Int`, so `1` joins `1.0` (CSV inference and XLSX cells disagree on numeric
/// types often enough that strict typing would silently drop matches). A
/// non-integral float keys on its bit pattern. `Null` cells produce no key at
/// all, so null never joins null (SQL semantics).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum JoinKey {
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

fn join_key(value: &Value) -> Option<JoinKey> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(JoinKey::Bool(*b)),
        Value::Int(i) => Some(JoinKey::Int(*i)),
        Value::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Some(JoinKey::Int(*f as i64))
            } else {
                Some(JoinKey::Float(f.to_bits()))
            }
        }
        Value::Text(s) => Some(JoinKey::Text(s.clone())),
    }
}

/// Disambiguate output column names when both sides carry the same non-join
/// column: the left copy becomes `name_x`, the right copy `name_y`.
fn output_columns(left: &Table, right: &Table, on: &str) -> Vec<String> {
    let right_non_join: Vec<&String> =
        right.columns().iter().filter(|c| *c != on).collect();

    let mut columns = Vec::with_capacity(left.columns().len() + right_non_join.len());
    for col in left.columns() {
        if col != on && right_non_join.iter().any(|r| *r == col) {
            columns.push(format!("{col}_x"));
        } else {
            columns.push(col.clone());
        }
    }
    for col in &right_non_join {
        if left.has_column(col) {
            columns.push(format!("{col}_y"));
        } else {
            columns.push((*col).clone());
        }
    }
    columns
}

/// Inner join of `left` and `right` on the shared column `on`.
///
/// Only rows whose join-key value appears in both tables survive; a key value
/// repeated in either table yields the cross-product of its matching rows.
/// Output layout: the left table's columns in order, then the right table's
/// non-join columns.
///
/// Fails with `Error::MissingColumn` if `on` is absent from either table.
pub fn inner_join(left: &Table, right: &Table, on: &str) -> Result<Table> {
    let left_idx = left
        .column_index(on)
        .ok_or_else(|| Error::MissingColumn(on.to_string()))?;
    let right_idx = right
        .column_index(on)
        .ok_or_else(|| Error::MissingColumn(on.to_string()))?;

    // Hash the right side by join key, keeping row order within each key.
    let mut by_key: HashMap<JoinKey, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows().iter().enumerate() {
        if let Some(key) = join_key(&row[right_idx]) {
            by_key.entry(key).or_default().push(i);
        }
    }

    let mut joined = Table::new(output_columns(left, right, on));
    for left_row in left.rows() {
        let Some(key) = join_key(&left_row[left_idx]) else {
            continue;
        };
        let Some(matches) = by_key.get(&key) else {
            continue;
        };
        for &right_i in matches {
            let right_row = &right.rows()[right_i];
            let mut out = left_row.clone();
            out.extend(
                right_row
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != right_idx)
                    .map(|(_, v)| v.clone()),
            );
            joined.push_row(out);
        }
    }
    Ok(joined)
}
