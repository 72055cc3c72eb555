//! tabula is an interactive shell for a small in-memory table store. It reads
//! CREATE / INSERT / SELECT statements terminated by `;` until `QUIT`.
//! Command history is stored in ~/.tabula_history.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as _;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use tabula::{
    BoxRenderer, Config, Error, LineSource, PlainRenderer, RenderStyle, Renderer, Result,
    ScriptSource, Session,
};

fn main() -> ExitCode {
    let command = Command::parse();
    init_logging(&command.log_level);
    match command.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so that rendered tables on stdout stay clean.
/// RUST_LOG takes precedence over --log-level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// The tabula command.
#[derive(clap::Parser)]
#[command(about = "An in-memory table store with a tiny SQL dialect.", version)]
struct Command {
    /// A script of statements to run instead of the interactive prompt.
    #[arg()]
    script: Option<PathBuf>,
    /// How SELECT results are drawn.
    #[arg(short, long, value_enum, default_value_t = Style::Box)]
    style: Style,
    /// Prompt shown at the start of a statement.
    #[arg(long, default_value = "> ")]
    prompt: String,
    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Do not load or save the command history.
    #[arg(long)]
    no_history: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Style {
    Box,
    Plain,
}

impl Command {
    /// Runs the command.
    fn run(self) -> Result<()> {
        let config = Config {
            prompt: self.prompt.clone(),
            style: match self.style {
                Style::Box => RenderStyle::Box,
                Style::Plain => RenderStyle::Plain,
            },
            ..Config::default()
        };
        let renderer: Box<dyn Renderer> = match config.style {
            RenderStyle::Box => Box::new(BoxRenderer::new(io::stdout())),
            RenderStyle::Plain => Box::new(PlainRenderer::new(io::stdout())),
        };

        match &self.script {
            Some(path) => {
                let script = std::fs::read_to_string(path)?;
                Session::new(ScriptSource::new(&script), renderer, io::stderr(), &config).run()
            }
            None => {
                let history = if self.no_history {
                    None
                } else {
                    std::env::var_os("HOME")
                        .map(|home| PathBuf::from(home).join(".tabula_history"))
                };
                let mut source = Prompt::new(history)?;
                let result = Session::new(&mut source, renderer, io::stderr(), &config).run();
                source.save_history();
                result
            }
        }
    }
}

/// Reads lines interactively with Rustyline.
struct Prompt {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl Prompt {
    fn new(history_path: Option<PathBuf>) -> Result<Self> {
        let mut editor = DefaultEditor::new().map_err(readline_error)?;
        if let Some(path) = &history_path {
            match editor.load_history(path) {
                Ok(()) => {}
                Err(ReadlineError::Io(error)) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => return Err(readline_error(error)),
            }
        }
        Ok(Self {
            editor,
            history_path,
        })
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.history_path {
            if let Err(error) = self.editor.save_history(path) {
                tracing::warn!(path = %path.display(), %error, "failed to save history");
            }
        }
    }
}

impl LineSource for &mut Prompt {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str()).map_err(readline_error)?;
                }
                Ok(line)
            }
            // Ctrl-C abandons the line, not the session
            Err(ReadlineError::Interrupted) => Ok(String::new()),
            Err(ReadlineError::Eof) => Err(Error::InputExhausted),
            Err(error) => Err(readline_error(error)),
        }
    }
}

fn readline_error(error: ReadlineError) -> Error {
    Error::Io(error.to_string())
}
