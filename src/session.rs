use std::io::Write;

use tracing::{debug, info, trace};

use crate::ast::Statement;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::parser;
use crate::query::{self, QueryResult};
use crate::render::Renderer;
use crate::table::{Row, RowId};
use crate::tokenizer::{LineSource, Scanned, Token, Tokenizer};

/// Where the interpreter is in the read-eval loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    AwaitingStatement,
    ParsingCreate,
    ParsingInsert,
    ParsingSelect,
    Dispatched,
    ErrorRecovery,
    /// Entered on `Q` / `QUIT`; the loop has stopped.
    Halted,
}

/// What a successfully executed statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created { table: String, columns: Vec<String> },
    Inserted { table: String, row: RowId },
    Selected(QueryResult),
    /// A bare `;`.
    Nothing,
}

/// The statement interpreter: owns the [Catalog], reads statements from a
/// [LineSource], renders results and reports errors on a separate
/// diagnostic writer, one line per error.
pub struct Session<S, R, D> {
    catalog: Catalog,
    tokenizer: Tokenizer<S>,
    renderer: R,
    diagnostics: D,
    state: State,
}

impl<S: LineSource, R: Renderer, D: Write> Session<S, R, D> {
    pub fn new(source: S, renderer: R, diagnostics: D, config: &Config) -> Self {
        Self {
            catalog: Catalog::new(),
            tokenizer: Tokenizer::with_prompts(
                source,
                &config.prompt,
                &config.continuation_prompt,
            ),
            renderer,
            diagnostics,
            state: State::AwaitingStatement,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Reads, executes and reports statements until `QUIT`.
    ///
    /// Statement errors are reported and the loop moves on to a fresh line.
    ///
    /// # Errors
    /// Only fatal errors end the loop early: the line source running dry
    /// ([crate::Error::InputExhausted]) or an output failure.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.transition(State::AwaitingStatement);
            match self.step() {
                Ok(true) => {}
                Ok(false) => {
                    self.transition(State::Halted);
                    info!(
                        tables = self.catalog.list_tables().len(),
                        bytes = self.catalog.allocated_bytes(),
                        "session halted"
                    );
                    return Ok(());
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    self.transition(State::ErrorRecovery);
                    debug!(error = %err, "statement discarded");
                    writeln!(self.diagnostics, "Error: {err}")?;
                }
            }
            self.tokenizer.reset();
        }
    }

    /// Handles one statement. Returns `false` once `QUIT` was read.
    fn step(&mut self) -> Result<bool> {
        let tokens = match self.tokenizer.next_statement()? {
            Scanned::Quit => return Ok(false),
            Scanned::Statement(tokens) => tokens,
        };
        if let Some(state) = tokens.first().and_then(parsing_state) {
            self.transition(state);
        }

        let statement = parser::parse(tokens)?;
        self.transition(State::Dispatched);
        let outcome = self.execute(statement)?;
        self.display(&outcome)?;
        Ok(true)
    }

    /// Applies one parsed statement to the catalog.
    pub fn execute(&mut self, statement: Statement) -> Result<Outcome> {
        debug!(statement = statement.kind(), "executing");
        Ok(match statement {
            Statement::CreateTable(create) => {
                let created = self.catalog.create_table(&create.name, create.columns)?;
                Outcome::Created {
                    columns: created.columns().to_vec(),
                    table: create.name,
                }
            }
            Statement::Insert(insert) => {
                let row = self.catalog.insert(&insert.table, insert.values)?;
                Outcome::Inserted {
                    table: insert.table,
                    row,
                }
            }
            Statement::Select(select) => {
                let table = self.catalog.get_table(&select.table)?;
                Outcome::Selected(query::query(
                    table,
                    select.condition.as_ref(),
                    &select.order_by,
                )?)
            }
            Statement::Empty => Outcome::Nothing,
        })
    }

    fn display(&mut self, outcome: &Outcome) -> Result<()> {
        match outcome {
            Outcome::Created { table, columns } => self.renderer.message(&format!(
                "Table '{table}' was successfully created with columns: {}.",
                columns.join(", ")
            ))?,
            Outcome::Selected(result) => {
                let rows: Vec<&Row> = result.rows.iter().collect();
                self.renderer.render(&result.columns, &rows)?
            }
            Outcome::Inserted { .. } | Outcome::Nothing => {}
        }
        Ok(())
    }

    fn transition(&mut self, state: State) {
        trace!(from = ?self.state, to = ?state, "transition");
        self.state = state;
    }
}

fn parsing_state(first: &Token) -> Option<State> {
    if first.is_keyword("CREATE") {
        Some(State::ParsingCreate)
    } else if first.is_keyword("INSERT") {
        Some(State::ParsingInsert)
    } else if first.is_keyword("SELECT") {
        Some(State::ParsingSelect)
    } else {
        None
    }
}
