pub mod ast;
pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod parser;
pub mod query;
pub mod render;
pub mod session;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use catalog::Catalog;
pub use config::{Config, RenderStyle};
pub use error::{Error, Result};
pub use index::Index;
pub use query::{Condition, Operator, OrderBy, QueryResult, SortDirection};
pub use render::{BoxRenderer, PlainRenderer, Renderer};
pub use session::{Outcome, Session, State};
pub use table::{ColumnDef, Row, RowId, Table};
pub use tokenizer::{LineSource, ScriptSource, Token, TokenKind, Tokenizer};
pub use value::Value;
