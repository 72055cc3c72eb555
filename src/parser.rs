use crate::ast::*;
use crate::catalog::is_valid_identifier;
use crate::error::{Error, Result};
use crate::query::{Condition, Operator, OrderBy, SortDirection};
use crate::table::ColumnDef;
use crate::tokenizer::{Token, TokenKind};
use crate::value::Value;

/// Recursive-descent parser over the tokens of one statement.
///
/// Reserved words are matched case-insensitively. The token list always
/// ends with an `end` token, so lookahead never runs out.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

/// Parses the tokens of one statement.
pub fn parse(tokens: Vec<Token>) -> Result<Statement> {
    Parser::new(tokens).parse()
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::End) {
            tokens.push(Token::new(TokenKind::End, ";"));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Statement> {
        let token = self.current_token();
        if token.is_keyword("CREATE") {
            self.parse_create_table()
        } else if token.is_keyword("INSERT") {
            self.parse_insert()
        } else if token.is_keyword("SELECT") {
            self.parse_select()
        } else if token.kind == TokenKind::End {
            Ok(Statement::Empty)
        } else {
            Err(Error::UnknownCommand(token.text.clone()))
        }
    }

    //helpers
    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn syntax_error<T>(&self, message: &str) -> Result<T> {
        Err(Error::syntax(message, self.current_token().text.clone()))
    }

    /// Consumes a keyword token and returns its text as written.
    fn consume_ident(&mut self, message: &str) -> Result<String> {
        if self.current_token().kind != TokenKind::Keyword {
            return self.syntax_error(message);
        }
        let text = self.current_token().text.clone();
        self.advance();
        Ok(text)
    }

    /// Consumes the keyword `word` if it is next.
    fn consume_keyword(&mut self, word: &str) -> bool {
        if self.current_token().is_keyword(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_bracket(&mut self, bracket: char, message: &str) -> Result<()> {
        if !self.current_token().is_bracket(bracket) {
            return self.syntax_error(message);
        }
        self.advance();
        Ok(())
    }

    fn expect_end(&self, message: &str) -> Result<()> {
        if self.current_token().kind != TokenKind::End {
            return self.syntax_error(message);
        }
        Ok(())
    }

    /// `CREATE name ( col [INDEXED], ... ) ;`
    fn parse_create_table(&mut self) -> Result<Statement> {
        self.advance(); // CREATE
        let name = self.consume_ident("expected the table's name")?;
        if !is_valid_identifier(&name) {
            return Err(Error::InvalidIdentifier(name));
        }
        self.consume_bracket('(', "expected the list of columns enclosed in brackets")?;

        let mut columns = vec![];
        loop {
            let column = self.consume_ident("expected a column name")?;
            let kind = self.current_token().kind;
            let indexed = match kind {
                TokenKind::Keyword if self.consume_keyword("INDEXED") => true,
                TokenKind::Keyword => {
                    return self.syntax_error("unknown keyword after the column name, expected INDEXED");
                }
                _ => false,
            };
            columns.push(ColumnDef {
                name: column,
                indexed,
            });

            let kind = self.current_token().kind;
            match kind {
                TokenKind::Comma => self.advance(),
                TokenKind::Bracket => {
                    self.consume_bracket(')', "expected the closing bracket")?;
                    break;
                }
                _ => return self.syntax_error("did you separate the column names with commas?"),
            }
        }

        self.expect_end("expected the statement to end after the list of columns")?;
        Ok(Statement::CreateTable(CreateTable { name, columns }))
    }

    /// `INSERT [INTO] name ( "v", ... ) ;`
    fn parse_insert(&mut self) -> Result<Statement> {
        self.advance(); // INSERT
        if self.current_token().kind != TokenKind::Keyword {
            return self.syntax_error("expected a table name or INTO after INSERT");
        }
        self.consume_keyword("INTO");
        let table = self.consume_ident("expected the table's name")?;
        self.consume_bracket('(', "expected the list of values enclosed in brackets")?;

        let mut values = vec![];
        loop {
            let token = self.current_token();
            if token.kind != TokenKind::String {
                return Err(Error::ValuesMustBeQuoted(token.text.clone()));
            }
            values.push(Value::from(token.text.as_str()));
            self.advance();

            let kind = self.current_token().kind;
            match kind {
                TokenKind::Comma => self.advance(),
                TokenKind::Bracket => {
                    self.consume_bracket(')', "expected the closing bracket")?;
                    break;
                }
                _ => return self.syntax_error("did you separate the values with commas?"),
            }
        }

        self.expect_end("expected the statement to end after the list of values")?;
        Ok(Statement::Insert(Insert { table, values }))
    }

    /// `SELECT FROM name [WHERE col > (col | "v")] [ORDER_BY col [ASC|DESC], ...] ;`
    fn parse_select(&mut self) -> Result<Statement> {
        self.advance(); // SELECT
        if !self.consume_keyword("FROM") {
            return self.syntax_error(
                "expected FROM right after SELECT, only selecting all columns is supported",
            );
        }
        let table = self.consume_ident("expected the table name after FROM")?;

        let condition = if self.consume_keyword("WHERE") {
            Some(self.parse_condition()?)
        } else {
            None
        };

        let order_by = if self.consume_keyword("ORDER_BY") {
            self.parse_order_by()?
        } else {
            vec![]
        };

        self.expect_end("unexpected argument at the end of SELECT")?;
        Ok(Statement::Select(Select {
            table,
            condition,
            order_by,
        }))
    }

    fn parse_condition(&mut self) -> Result<Condition> {
        let column = self.consume_ident("expected the column name after WHERE")?;

        let sign = self.current_token();
        if sign.kind != TokenKind::Sign {
            return self.syntax_error("expected a comparison operator after the column name");
        }
        if sign.text != ">" {
            return Err(Error::UnsupportedOperator(sign.text.clone()));
        }
        self.advance();

        let operand = self.current_token();
        let condition = match operand.kind {
            TokenKind::Keyword => Condition::Column {
                left: column,
                op: Operator::GreaterThan,
                right: operand.text.clone(),
            },
            TokenKind::String => Condition::Literal {
                column,
                op: Operator::GreaterThan,
                value: Value::from(operand.text.as_str()),
            },
            _ => {
                return self
                    .syntax_error("expected a value or a column name after the comparison operator");
            }
        };
        self.advance();
        Ok(condition)
    }

    fn parse_order_by(&mut self) -> Result<Vec<OrderBy>> {
        let mut order_by = vec![];
        loop {
            let column = self.consume_ident("expected a comma-separated list of columns after ORDER_BY")?;
            let direction = if self.consume_keyword("DESC") {
                SortDirection::Desc
            } else if self.consume_keyword("ASC") || self.current_token().kind != TokenKind::Keyword {
                SortDirection::Asc
            } else {
                return self.syntax_error("unknown keyword, expected ASC or DESC");
            };
            order_by.push(OrderBy { column, direction });

            if self.current_token().kind != TokenKind::Comma {
                return Ok(order_by);
            }
            self.advance();
        }
    }
}
