use crate::query::{Condition, OrderBy};
use crate::table::ColumnDef;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    Insert(Insert),
    Select(Select),
    /// A bare `;`.
    Empty,
}

impl Statement {
    /// The leading keyword, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "CREATE",
            Self::Insert(_) => "INSERT",
            Self::Select(_) => "SELECT",
            Self::Empty => "EMPTY",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub condition: Option<Condition>,
    pub order_by: Vec<OrderBy>,
}
