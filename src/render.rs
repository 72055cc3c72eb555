use std::io::{self, Write};

use crate::table::Row;

/// Width every cell is padded to by [BoxRenderer].
const CELL_WIDTH: usize = 15;

/// Displays query results and status messages.
pub trait Renderer {
    /// Renders `rows` under the header `columns`.
    fn render(&mut self, columns: &[String], rows: &[&Row]) -> io::Result<()>;

    /// Writes a one-line status message, e.g. after `CREATE`.
    fn message(&mut self, text: &str) -> io::Result<()>;
}

/// Draws results as a bordered table:
///
/// ```text
/// +================+================+
/// ║id              ║name            ║
/// +================+================+
/// ║1               |Alice           ║
/// +----------------+----------------+
/// ```
pub struct BoxRenderer<W> {
    out: W,
}

impl<W: Write> BoxRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn rule(&mut self, fill: &str, columns: usize) -> io::Result<()> {
        let segment = format!("{}+", fill.repeat(CELL_WIDTH + 1));
        writeln!(self.out, "+{}", segment.repeat(columns))
    }

    fn line(
        &mut self,
        cells: impl Iterator<Item = String>,
        separator: &str,
    ) -> io::Result<()> {
        let cells: Vec<String> = cells
            .map(|cell| format!("{cell:<CELL_WIDTH$}"))
            .collect();
        writeln!(self.out, "║{} ║", cells.join(separator))
    }
}

impl<W: Write> Renderer for BoxRenderer<W> {
    fn render(&mut self, columns: &[String], rows: &[&Row]) -> io::Result<()> {
        self.rule("=", columns.len())?;
        self.line(columns.iter().cloned(), " ║")?;
        self.rule("=", columns.len())?;
        for row in rows {
            self.line(row.values().iter().map(|v| v.to_string()), " |")?;
            self.rule("-", columns.len())?;
        }
        self.out.flush()
    }

    fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }
}

/// Prints a header line and one comma-separated line per row.
pub struct PlainRenderer<W> {
    out: W,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Renderer for PlainRenderer<W> {
    fn render(&mut self, columns: &[String], rows: &[&Row]) -> io::Result<()> {
        writeln!(self.out, "{}", columns.join(", "))?;
        for row in rows {
            let values: Vec<String> = row.values().iter().map(|v| v.to_string()).collect();
            writeln!(self.out, "{}", values.join(", "))?;
        }
        self.out.flush()
    }

    fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, columns: &[String], rows: &[&Row]) -> io::Result<()> {
        (**self).render(columns, rows)
    }

    fn message(&mut self, text: &str) -> io::Result<()> {
        (**self).message(text)
    }
}
