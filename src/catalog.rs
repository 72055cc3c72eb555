use std::collections::HashMap;

use allocative::Allocative;
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::{ColumnDef, RowId, Table};
use crate::value::Value;

/// Owns every table of a session, keyed by name.
#[derive(Debug, Default, Allocative)]
pub struct Catalog {
    tables: HashMap<String, Table>,
}

impl Catalog {
    /// Creates a new, empty catalog.
    pub fn new() -> Self {
        Self {
            tables: HashMap::default(),
        }
    }

    /// Creates a new table with the given columns; columns marked `indexed`
    /// get an empty index.
    ///
    /// # Errors
    /// - [Error::InvalidIdentifier] if `name` is not a valid identifier.
    /// - [Error::DuplicateTable] if a table with the same name already exists.
    /// - [Error::InvalidSchema] if the column list is empty or repeats a name.
    ///
    /// The catalog is left untouched on error.
    pub fn create_table(&mut self, name: &str, columns: Vec<ColumnDef>) -> Result<&Table> {
        if !is_valid_identifier(name) {
            return Err(Error::InvalidIdentifier(name.to_string()));
        }
        if self.tables.contains_key(name) {
            return Err(Error::DuplicateTable(name.to_string()));
        }
        let table = Table::new(name, columns)?;
        debug!(
            table = name,
            columns = ?table.columns(),
            indexed = ?table.indexed_columns(),
            "table created"
        );
        Ok(self.tables.entry(name.to_string()).or_insert(table))
    }

    /// Inserts one row into `name`.
    ///
    /// # Errors
    /// Returns [Error::UnknownTable] if the table does not exist, or
    /// [Error::ArityMismatch] if the value count differs from the column count.
    pub fn insert(&mut self, name: &str, values: Vec<Value>) -> Result<RowId> {
        self.get_table_mut(name)?.insert(values)
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    fn get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    /// Returns the names of all tables, sorted.
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Heap bytes held by all tables, rows and indices.
    pub fn allocated_bytes(&self) -> usize {
        allocative::size_of_unique_allocated_data(self)
    }
}

/// Letters, digits and underscores, not starting with a digit.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
