use std::collections::{HashMap, HashSet};

use allocative::Allocative;
use tracing::debug;

use crate::error::{Error, Result};
use crate::index::Index;
use crate::value::Value;

/// Stable position of a row in its table's row arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Allocative)]
pub struct RowId(pub usize);

/// One stored row: exactly one value per column, in the table's column order.
#[derive(Debug, Clone, PartialEq, Allocative)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// The value at column position `idx`.
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub indexed: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexed: false,
        }
    }

    pub fn indexed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexed: true,
        }
    }
}

/// A named, append-only collection of rows with a fixed column list and
/// optional per-column indices.
#[derive(Debug, Allocative)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
    indices: HashMap<String, Index>,
}

impl Table {
    /// Creates an empty table.
    ///
    /// # Errors
    /// Returns [Error::InvalidSchema] if there are no columns or a column
    /// name is repeated.
    pub fn new(name: impl Into<String>, schema: Vec<ColumnDef>) -> Result<Self> {
        let name = name.into();
        if schema.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "table '{name}' must have at least one column"
            )));
        }
        let mut seen = HashSet::new();
        for column in &schema {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "column '{}' is declared twice in table '{name}'",
                    column.name
                )));
            }
        }

        let indices = schema
            .iter()
            .filter(|column| column.indexed)
            .map(|column| (column.name.clone(), Index::new(column.name.clone())))
            .collect();
        let columns = schema.into_iter().map(|column| column.name).collect();

        Ok(Self {
            name,
            columns,
            rows: Vec::new(),
            indices,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_row(&self, id: RowId) -> Option<&Row> {
        self.rows.get(id.0)
    }

    /// Position of `column` in the schema.
    ///
    /// # Errors
    /// Returns [Error::UnknownColumn] if the table has no such column.
    pub fn column_position(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| Error::UnknownColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// The index over `column`, if that column was declared `INDEXED`.
    pub fn index(&self, column: &str) -> Option<&Index> {
        self.indices.get(column)
    }

    /// Names of the indexed columns, in schema order.
    pub fn indexed_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| self.indices.contains_key(*c))
            .map(String::as_str)
            .collect()
    }

    /// Appends a row built by zipping the schema with `values`, and records it
    /// in every index.
    ///
    /// # Errors
    /// Returns [Error::ArityMismatch] if the number of values differs from the
    /// number of columns. Nothing is stored in that case.
    pub fn insert(&mut self, values: Vec<Value>) -> Result<RowId> {
        if values.len() != self.columns.len() {
            return Err(Error::ArityMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                found: values.len(),
            });
        }

        let id = RowId(self.rows.len());
        for (position, column) in self.columns.iter().enumerate() {
            if let Some(index) = self.indices.get_mut(column) {
                index.insert(&values[position], id);
            }
        }
        self.rows.push(Row { values });
        debug!(table = %self.name, row = id.0, "row inserted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employees() -> Table {
        Table::new(
            "emp",
            vec![
                ColumnDef::new("id"),
                ColumnDef::new("name"),
                ColumnDef::indexed("salary"),
            ],
        )
        .unwrap()
    }

    fn row(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn test_table_creation() {
        let table = employees();

        assert_eq!(table.name(), "emp");
        assert_eq!(table.columns(), &["id", "name", "salary"]);
        assert_eq!(table.indexed_columns(), vec!["salary"]);
        assert!(table.is_empty());
        assert!(table.index("name").is_none());
    }

    #[test]
    fn test_table_insert_and_get() {
        let mut table = employees();

        let first = table.insert(row(&["1", "Alice", "75000"])).unwrap();
        let second = table.insert(row(&["2", "Bob", "85000"])).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get_row(first).unwrap().values(), &row(&["1", "Alice", "75000"])[..]);
        assert_eq!(table.get_row(second).unwrap().get(1), Some(&Value::from("Bob")));
        assert!(table.get_row(RowId(2)).is_none());

        let index = table.index("salary").unwrap();
        assert_eq!(index.lookup("85000"), &[second]);
    }

    #[test]
    fn test_column_count_mismatch() {
        let mut table = employees();
        table.insert(row(&["1", "Alice", "75000"])).unwrap();

        // Too many values
        let result = table.insert(row(&["2", "Bob", "85000", "IT"]));
        assert!(matches!(
            result,
            Err(Error::ArityMismatch { expected: 3, found: 4, .. })
        ));

        // Not enough values
        let result = table.insert(row(&["2", "Bob"]));
        assert!(matches!(
            result,
            Err(Error::ArityMismatch { expected: 3, found: 2, .. })
        ));

        // Nothing leaked into the store or the index
        assert_eq!(table.len(), 1);
        assert_eq!(table.index("salary").unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Table::new("t", vec![ColumnDef::new("a"), ColumnDef::indexed("a")]);
        assert!(matches!(result, Err(Error::InvalidSchema(_))));

        let result = Table::new("t", vec![]);
        assert!(matches!(result, Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_column_position() {
        let table = employees();

        assert_eq!(table.column_position("salary").unwrap(), 2);
        assert_eq!(
            table.column_position("age"),
            Err(Error::UnknownColumn {
                table: "emp".into(),
                column: "age".into()
            })
        );
    }

    #[test]
    fn test_null_value_is_stored_but_not_indexed() {
        let mut table = employees();
        table
            .insert(vec![Value::from("1"), Value::from("Alice"), Value::Null])
            .unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.index("salary").unwrap().is_empty());
    }
}
