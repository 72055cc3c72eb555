use std::cmp::Ordering;
use std::fmt;

use bitvec::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::table::{Row, RowId, Table};
use crate::value::Value;

/// Relational operators understood by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    LessThan,
    GreaterThan,
}

impl Operator {
    /// Applies the operator to two canonical forms. Absent values never match.
    fn holds(self, left: Option<&str>, right: Option<&str>) -> bool {
        let (Some(left), Some(right)) = (left, right) else {
            return false;
        };
        match self {
            Self::Equal => left == right,
            Self::LessThan => left < right,
            Self::GreaterThan => left > right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Equal => "=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
        })
    }
}

/// A WHERE condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column op "literal"`
    Literal {
        column: String,
        op: Operator,
        value: Value,
    },
    /// `left op right`, both columns of the same row.
    Column {
        left: String,
        op: Operator,
        right: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One ORDER_BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// The owned result of a `SELECT`, ready to be handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Column names in the table's declared order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Filters and orders the rows of `table`.
///
/// Column names are resolved before any row is visited: an unknown column in
/// the condition or in any ORDER_BY item fails the whole call with
/// [crate::Error::UnknownColumn].
///
/// A `column op literal` condition on an indexed column is answered from the
/// index, yielding rows grouped by ascending key and in insertion order
/// within a key. Every other condition is a full scan in insertion order.
/// Both paths select the same set of rows.
///
/// ORDER_BY items are applied with the last item as the most significant
/// sort key; the sort is stable, so ties keep the filter order.
pub fn select<'a>(
    table: &'a Table,
    condition: Option<&Condition>,
    order_by: &[OrderBy],
) -> Result<Vec<&'a Row>> {
    // save all column positions on which we have to sort + boolean if we have to reverse order
    let sort = order_by
        .iter()
        .map(|clause| {
            let idx = table.column_position(&clause.column)?;
            Ok((idx, clause.direction == SortDirection::Desc))
        })
        .collect::<Result<Vec<(usize, bool)>>>()?;

    let ids = match condition {
        None => (0..table.len()).map(RowId).collect(),
        Some(condition) => filter(table, condition)?,
    };

    let mut rows: Vec<&Row> = ids.into_iter().filter_map(|id| table.get_row(id)).collect();

    if !sort.is_empty() {
        rows.sort_by(|a, b| {
            for &(idx, is_desc) in sort.iter().rev() {
                let mut ord = compare_at(a, b, idx);
                if is_desc {
                    ord = ord.reverse();
                }
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    Ok(rows)
}

/// Like [select], but clones the rows into an owned [QueryResult].
pub fn query(
    table: &Table,
    condition: Option<&Condition>,
    order_by: &[OrderBy],
) -> Result<QueryResult> {
    let rows = select(table, condition, order_by)?
        .into_iter()
        .cloned()
        .collect();
    Ok(QueryResult {
        columns: table.columns().to_vec(),
        rows,
    })
}

fn compare_at(a: &Row, b: &Row, idx: usize) -> Ordering {
    match (a.get(idx), b.get(idx)) {
        (Some(a), Some(b)) => a.cmp_canonical(b),
        _ => Ordering::Equal,
    }
}

fn filter(table: &Table, condition: &Condition) -> Result<Vec<RowId>> {
    match condition {
        Condition::Literal { column, op, value } => {
            let idx = table.column_position(column)?;
            match table.index(column) {
                Some(index) => {
                    debug!(table = table.name(), column = %column, op = %op, "index lookup");
                    let Some(key) = value.canonical() else {
                        return Ok(Vec::new());
                    };
                    Ok(match op {
                        Operator::Equal => index.lookup(key).to_vec(),
                        Operator::GreaterThan => index.greater_than(key),
                        Operator::LessThan => index.less_than(key),
                    })
                }
                None => {
                    debug!(table = table.name(), column = %column, op = %op, "full scan");
                    let right = value.canonical();
                    Ok(scan(table, |row| op.holds(canonical_at(row, idx), right)))
                }
            }
        }
        Condition::Column { left, op, right } => {
            let left_idx = table.column_position(left)?;
            let right_idx = table.column_position(right)?;
            debug!(table = table.name(), left = %left, right = %right, op = %op, "column comparison scan");
            Ok(scan(table, |row| {
                op.holds(canonical_at(row, left_idx), canonical_at(row, right_idx))
            }))
        }
    }
}

fn canonical_at(row: &Row, idx: usize) -> Option<&str> {
    row.get(idx).and_then(Value::canonical)
}

/// Visits every row in insertion order and returns the ids matching `keep`.
fn scan(table: &Table, keep: impl Fn(&Row) -> bool) -> Vec<RowId> {
    let mut selected = bitvec![0; table.len()];
    for (i, row) in table.rows().iter().enumerate() {
        if keep(row) {
            selected.set(i, true);
        }
    }
    selected.iter_ones().map(RowId).collect()
}
