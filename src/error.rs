use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a statement can run into.
///
/// All variants except [Error::InputExhausted] and [Error::Io] are reported
/// and the session carries on with the next statement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Catalog errors
    #[error("table '{0}' already exists")]
    DuplicateTable(String),

    #[error("table '{0}' does not exist")]
    UnknownTable(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error(
        "table '{table}' has {expected} columns but {found} values were given ({})",
        arity_delta(.expected, .found)
    )]
    ArityMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid identifier \"{0}\": use letters, digits and underscores, not starting with a digit")]
    InvalidIdentifier(String),

    // Statement errors
    #[error("{message}, found \"{found}\"")]
    Syntax { message: String, found: String },

    #[error("values must be enclosed in double quotes, found \"{0}\"")]
    ValuesMustBeQuoted(String),

    #[error("a string must be written on a single line: \"{0}\" is not terminated")]
    UnterminatedString(String),

    #[error("column '{column}' does not exist in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("only the \">\" operator is supported, found \"{0}\"")]
    UnsupportedOperator(String),

    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),

    // Input errors
    #[error("input exhausted before QUIT")]
    InputExhausted,

    #[error("io error: {0}")]
    Io(String),
}

impl Error {
    /// Builds a structural syntax error pointing at the offending token text.
    pub fn syntax(message: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            found: found.into(),
        }
    }

    /// Returns true if the session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InputExhausted | Self::Io(_))
    }
}

fn arity_delta(expected: &usize, found: &usize) -> String {
    let (expected, found) = (*expected, *found);
    if found < expected {
        format!("{} short", expected - found)
    } else {
        format!("{} over", found - expected)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
