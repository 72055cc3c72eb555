use std::collections::VecDeque;
use std::fmt;

use crate::error::{Error, Result};

/// Characters skipped between tokens.
const WHITESPACE: [char; 5] = [' ', '\t', '\r', '\n', '\0'];
/// Characters that end a keyword run.
const SPECIAL: [char; 7] = ['(', ')', ',', ';', '>', '<', '='];

/// Lexical class of a [Token].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers and reserved words alike, case preserved.
    Keyword,
    /// A double-quoted run, without the quotes.
    String,
    /// One of `>`, `<`, `=`.
    Sign,
    Comma,
    /// `(` or `)`.
    Bracket,
    /// `;`, terminates a statement.
    End,
    /// A line holding nothing but `Q` or `QUIT`.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// True for a keyword token equal to `word`, ignoring case.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text.eq_ignore_ascii_case(word)
    }

    /// True for the bracket token `bracket`.
    pub fn is_bracket(&self, bracket: char) -> bool {
        self.kind == TokenKind::Bracket && self.text.starts_with(bracket)
    }

}

/// True for a line made only of `Q` or `QUIT`, in any case.
pub fn is_quit_line(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit")
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Supplies input one line at a time.
pub trait LineSource {
    /// Blocks until the next line is available and returns it without its
    /// line terminator.
    ///
    /// # Errors
    /// Returns [Error::InputExhausted] when no more lines will ever come.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// A [LineSource] over a fixed script, e.g. a file or a test fixture.
#[derive(Debug, Clone, Default)]
pub struct ScriptSource {
    lines: VecDeque<String>,
}

impl ScriptSource {
    pub fn new(script: &str) -> Self {
        Self {
            lines: script.lines().map(str::to_string).collect(),
        }
    }
}

impl From<&str> for ScriptSource {
    fn from(script: &str) -> Self {
        Self::new(script)
    }
}

impl LineSource for ScriptSource {
    fn read_line(&mut self, _prompt: &str) -> Result<String> {
        self.lines.pop_front().ok_or(Error::InputExhausted)
    }
}

/// What the tokenizer produced for one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Scanned {
    /// The tokens of one statement, the final one being the `end` token.
    Statement(Vec<Token>),
    /// A `Q` or `QUIT` line was read; any unfinished statement is dropped.
    Quit,
}

/// Turns a growing line buffer into [Token]s.
///
/// When the cursor runs past the buffered text, one more line is requested
/// from the [LineSource] and appended with a trailing `\n`. The first line
/// of a statement is requested with the primary prompt, later ones with the
/// continuation prompt.
pub struct Tokenizer<S> {
    source: S,
    /// The buffered characters of the current statement.
    input: Vec<char>,
    /// The current position in the buffer.
    position: usize,
    prompt: String,
    continuation: String,
}

impl<S: LineSource> Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self::with_prompts(source, "> ", ".. ")
    }

    pub fn with_prompts(source: S, prompt: &str, continuation: &str) -> Self {
        Self {
            source,
            input: Vec::new(),
            position: 0,
            prompt: prompt.to_string(),
            continuation: continuation.to_string(),
        }
    }

    /// Drops whatever is left in the buffer, so that the next token comes
    /// from a fresh line.
    pub fn reset(&mut self) {
        self.input.clear();
        self.position = 0;
    }

    /// Reads the tokens of one statement, up to and including its `;`.
    ///
    /// A line holding only `Q` or `QUIT` is reported as [Scanned::Quit] as
    /// soon as it is pulled, even in the middle of a statement.
    ///
    /// # Errors
    /// - [Error::UnterminatedString] if a quoted run reaches the end of a line.
    /// - [Error::InputExhausted] if the source runs dry mid-statement.
    pub fn next_statement(&mut self) -> Result<Scanned> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.kind == TokenKind::Quit {
                return Ok(Scanned::Quit);
            }
            let is_end = token.kind == TokenKind::End;
            tokens.push(token);
            if is_end {
                return Ok(Scanned::Statement(tokens));
            }
        }
    }

    /// Identifies the next token based on the character at the current position.
    pub fn next_token(&mut self) -> Result<Token> {
        let Some(c) = self.skip_whitespace()? else {
            return Ok(Token::new(TokenKind::Quit, "quit"));
        };

        match c {
            '"' => self.read_string(),
            c @ ('>' | '<' | '=') => {
                self.advance();
                Ok(Token::new(TokenKind::Sign, c))
            }
            ',' => {
                self.advance();
                Ok(Token::new(TokenKind::Comma, ","))
            }
            c @ ('(' | ')') => {
                self.advance();
                Ok(Token::new(TokenKind::Bracket, c))
            }
            ';' => {
                // consume the terminator so the next statement starts after it
                self.advance();
                Ok(Token::new(TokenKind::End, ";"))
            }
            _ => self.read_keyword(),
        }
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position, pulling in another
    /// line if the buffer is used up.
    ///
    /// Returns `None` when the pulled line is a quit sentinel; the buffer is
    /// emptied in that case.
    fn current_char(&mut self) -> Result<Option<char>> {
        while self.position >= self.input.len() {
            let prompt = if self.input.is_empty() {
                &self.prompt
            } else {
                &self.continuation
            };
            let line = self.source.read_line(prompt)?;
            if is_quit_line(&line) {
                self.reset();
                return Ok(None);
            }
            self.input.extend(line.chars());
            self.input.push('\n');
        }
        Ok(Some(self.input[self.position]))
    }

    /// Moves the cursor forward by one character.
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Skips whitespace and returns the first character after it.
    fn skip_whitespace(&mut self) -> Result<Option<char>> {
        while let Some(c) = self.current_char()? {
            if !WHITESPACE.contains(&c) {
                return Ok(Some(c));
            }
            self.advance();
        }
        Ok(None)
    }

    // --- Extraction Logic ---

    /// Reads a double-quoted run. It must close on the same line.
    fn read_string(&mut self) -> Result<Token> {
        self.advance(); // Skip the opening quote

        let mut string = String::new();
        loop {
            match self.current_char()? {
                Some('"') => break,
                // the buffer always ends in '\n', so no line is pulled here
                None | Some('\n') => {
                    self.advance();
                    return Err(Error::UnterminatedString(string));
                }
                Some(c) => {
                    string.push(c);
                    self.advance();
                }
            }
        }

        // Skip the closing quote
        self.advance();

        Ok(Token::new(TokenKind::String, string))
    }

    /// Reads a maximal run of characters that are neither whitespace nor special.
    fn read_keyword(&mut self) -> Result<Token> {
        let mut keyword = String::new();
        while let Some(c) = self.current_char()? {
            if WHITESPACE.contains(&c) || SPECIAL.contains(&c) {
                break;
            }
            keyword.push(c);
            self.advance();
        }
        Ok(Token::new(TokenKind::Keyword, keyword))
    }
}
